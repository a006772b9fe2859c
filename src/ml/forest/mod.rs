//! Deterministic random-forest classifier over numeric label values.
//!
//! A lightweight in-crate forest that avoids external ML dependencies while
//! still supporting:
//! - Multi-class classification via bagged, depth-limited Gini trees.
//! - Per-feature importance weights (mean decrease in impurity).
//! - Fully seeded fits: identical seed and data give an identical model.

mod model;
mod train;

pub use model::{ForestModel, TreeNode};
pub use train::{ForestOptions, train_forest};
