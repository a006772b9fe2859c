//! Library exports for reuse in the batch binary and tests.
/// Fixed run settings for the training job.
pub mod config;
/// CSV loading and train/test splitting.
pub mod dataset;
/// Logging setup.
pub mod logging;
/// Model training, inference, and evaluation metrics.
pub mod ml;
/// The linear train-and-report pipeline.
pub mod pipeline;
/// Diagnostic chart rendering.
pub mod plot;
/// Plain-text metrics output.
pub mod report;
