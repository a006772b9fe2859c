//! Fixed settings for a training run.
//!
//! The job is a one-shot batch analysis with no command-line or environment
//! surface; every knob lives here so tests can redirect paths without the
//! binary growing a flag parser.

use std::path::PathBuf;

/// All inputs, outputs, and hyperparameters for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// CSV table with one numeric column per feature plus the label column.
    pub data_path: PathBuf,
    /// Name of the label column removed from the feature set.
    pub label_column: String,
    /// Fraction of rows held out for testing.
    pub test_fraction: f32,
    /// Seed for the split shuffle, the forest fit, and the plot jitter.
    pub seed: u64,
    /// Number of trees in the forest.
    pub n_trees: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Plain-text accuracy report path.
    pub metrics_path: PathBuf,
    /// Feature-importance bar chart path.
    pub importance_chart_path: PathBuf,
    /// Residual scatter chart path.
    pub residual_chart_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("wine_quality.csv"),
            label_column: "quality".to_string(),
            test_fraction: 0.2,
            seed: 42,
            n_trees: 100,
            max_depth: 2,
            metrics_path: PathBuf::from("metrics.txt"),
            importance_chart_path: PathBuf::from("feature_importance.png"),
            residual_chart_path: PathBuf::from("residuals.png"),
        }
    }
}
