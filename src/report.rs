//! Plain-text accuracy report.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that may occur while writing the report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to create or overwrite the metrics file.
    #[error("Failed to write metrics file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Write the train/test accuracy percentages as two labelled lines.
///
/// Any existing file at `path` is overwritten. The label strings are part of
/// the job's output contract and consumed by downstream report tooling.
pub fn write_metrics(path: &Path, train_pct: f32, test_pct: f32) -> Result<(), ReportError> {
    let contents = format!(
        "Training variance explained: {train_pct}\nTest variance explained: {test_pct}\n"
    );
    std::fs::write(path, contents).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_two_labelled_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metrics.txt");
        write_metrics(&path, 87.5, 62.5).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "Training variance explained: 87.5\nTest variance explained: 62.5\n"
        );
    }

    #[test]
    fn overwrites_previous_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metrics.txt");
        std::fs::write(&path, "stale").unwrap();
        write_metrics(&path, 100.0, 50.0).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Training variance explained: 100"));
        assert!(!contents.contains("stale"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent").join("metrics.txt");
        assert!(matches!(
            write_metrics(&path, 1.0, 1.0),
            Err(ReportError::Write { .. })
        ));
    }
}
