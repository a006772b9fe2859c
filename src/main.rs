#![deny(missing_docs)]

//! Entry point for the wine-quality training job.
//!
//! Runs the fixed pipeline once: load `wine_quality.csv`, fit the forest,
//! write `metrics.txt`, `feature_importance.png`, and `residuals.png` into
//! the working directory.

use vintner::config::RunConfig;
use vintner::{logging, pipeline};

fn main() {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), pipeline::PipelineError> {
    let summary = pipeline::run(&RunConfig::default())?;
    tracing::info!(
        "Run complete: {} train rows, {} test rows, train {:.2}%, test {:.2}%",
        summary.n_train,
        summary.n_test,
        summary.train_accuracy_pct,
        summary.test_accuracy_pct
    );
    Ok(())
}
