//! Tabular dataset handling: CSV loading and deterministic splitting.

pub mod loader;
pub mod split;
