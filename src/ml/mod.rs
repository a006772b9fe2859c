//! Machine learning building blocks for the training job.

pub mod forest;
pub mod metrics;
