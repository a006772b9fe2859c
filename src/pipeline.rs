//! The linear train-and-report pipeline.
//!
//! One invocation runs every stage exactly once, in order: load, split,
//! fit, report, render importance chart, render residual chart. The first
//! failing stage aborts the run.

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::dataset::loader::{self, DatasetError};
use crate::dataset::split::{TrainTestSplit, train_test_split};
use crate::ml::forest::{ForestModel, ForestOptions, train_forest};
use crate::ml::metrics::{accuracy, precision_recall_by_class};
use crate::plot::{PlotError, importance, residuals};
use crate::report::{self, ReportError};

/// Errors from any stage of the run; the first one aborts the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading or reshaping the input table failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// The train/test split rejected the input.
    #[error("Failed to split dataset: {0}")]
    Split(String),
    /// The forest fit rejected the training partition.
    #[error("Failed to train forest: {0}")]
    Train(String),
    /// Writing the metrics file failed.
    #[error(transparent)]
    Report(#[from] ReportError),
    /// Rendering one of the charts failed.
    #[error(transparent)]
    Plot(#[from] PlotError),
}

/// Scores and sizes from a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Training rows after the split.
    pub n_train: usize,
    /// Held-out rows after the split.
    pub n_test: usize,
    /// Feature columns seen by the model.
    pub n_features: usize,
    /// Training accuracy as a percentage.
    pub train_accuracy_pct: f32,
    /// Test accuracy as a percentage.
    pub test_accuracy_pct: f32,
}

/// Execute the whole pipeline for one configuration.
pub fn run(config: &RunConfig) -> Result<RunSummary, PipelineError> {
    info!("Loading dataset from {}", config.data_path.display());
    let mut table = loader::load_table(&config.data_path)?;
    let labels = table.pop_column(&config.label_column)?;
    info!(
        "Loaded {} rows with {} feature columns",
        table.n_rows(),
        table.n_columns()
    );

    let split = train_test_split(&table.rows, &labels, config.test_fraction, config.seed)
        .map_err(PipelineError::Split)?;
    info!(
        "Split into {} train / {} test rows (seed {})",
        split.train_rows.len(),
        split.test_rows.len(),
        config.seed
    );

    let options = ForestOptions {
        n_trees: config.n_trees,
        max_depth: config.max_depth,
        seed: config.seed,
    };
    let model = train_forest(&split.train_rows, &split.train_labels, &options)
        .map_err(PipelineError::Train)?;
    info!(
        "Fitted {} trees (max depth {}) over {} classes",
        options.n_trees,
        options.max_depth,
        model.classes.len()
    );

    let train_accuracy_pct = model.score(&split.train_rows, &split.train_labels) * 100.0;
    let test_accuracy_pct = model.score(&split.test_rows, &split.test_labels) * 100.0;
    report::write_metrics(&config.metrics_path, train_accuracy_pct, test_accuracy_pct)?;
    info!(
        "Wrote metrics to {} (train {:.2}%, test {:.2}%)",
        config.metrics_path.display(),
        train_accuracy_pct,
        test_accuracy_pct
    );
    log_per_class_stats(&model, &split);

    let ranked = importance::ranked_importances(&table.columns, model.feature_importances());
    importance::render_importance_chart(&config.importance_chart_path, &ranked)?;
    info!(
        "Wrote importance chart to {}",
        config.importance_chart_path.display()
    );

    let predicted = model.predict(&split.test_rows);
    // The jitter source is seeded here so a whole run reproduces bit-for-bit.
    let mut jitter_rng = StdRng::seed_from_u64(config.seed);
    let points = residuals::jittered_residuals(&split.test_labels, &predicted, &mut jitter_rng);
    residuals::render_residual_chart(&config.residual_chart_path, &points)?;
    info!(
        "Wrote residual chart to {}",
        config.residual_chart_path.display()
    );

    Ok(RunSummary {
        n_train: split.train_rows.len(),
        n_test: split.test_rows.len(),
        n_features: table.n_columns(),
        train_accuracy_pct,
        test_accuracy_pct,
    })
}

fn log_per_class_stats(model: &ForestModel, split: &TrainTestSplit) {
    let cm = model.confusion_matrix(&split.test_rows, &split.test_labels);
    debug!(
        "Test accuracy over known classes: {:.4}",
        accuracy(&cm)
    );
    for (class, stats) in model.classes.iter().zip(precision_recall_by_class(&cm)) {
        debug!(
            "class {:>4}  precision={:.3}  recall={:.3}  support={}",
            class, stats.precision, stats.recall, stats.support
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_file_aborts_the_run() {
        let config = RunConfig {
            data_path: std::path::PathBuf::from("definitely/not/here.csv"),
            ..RunConfig::default()
        };
        assert!(matches!(run(&config), Err(PipelineError::Dataset(_))));
    }
}
