//! CSV loader for the wine-quality table.

use std::path::Path;

use thiserror::Error;

/// Errors that may occur while loading or reshaping the table.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Failed to open or parse the CSV file (includes ragged rows).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// The file parsed but contained no data rows.
    #[error("table at {path} has no data rows")]
    Empty { path: String },
    /// A cell did not parse as a number.
    #[error("row {row}, column {column:?}: not a number: {value:?}")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
    /// The requested label column is absent from the header.
    #[error("label column {name:?} not found (columns: {columns:?})")]
    MissingLabel { name: String, columns: Vec<String> },
}

/// In-memory feature table: named numeric columns, row-major storage.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    /// Column names in file order.
    pub columns: Vec<String>,
    /// One `f32` per column per row.
    pub rows: Vec<Vec<f32>>,
}

impl FeatureTable {
    /// Number of samples.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Remove the named column and return its values.
    ///
    /// Used to pop the label off the feature table; afterwards the name is
    /// guaranteed absent from `columns` so the label can never leak into
    /// the model's feature set.
    pub fn pop_column(&mut self, name: &str) -> Result<Vec<f32>, DatasetError> {
        let idx = self
            .columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| DatasetError::MissingLabel {
                name: name.to_string(),
                columns: self.columns.clone(),
            })?;
        self.columns.remove(idx);
        let values = self.rows.iter_mut().map(|row| row.remove(idx)).collect();
        Ok(values)
    }
}

/// Load a headered CSV of numeric columns into memory.
///
/// Ragged rows surface as `csv` errors; any cell that does not parse as a
/// number is reported with its row and column.
pub fn load_table(path: &Path) -> Result<FeatureTable, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|column| column.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let mut row = Vec::with_capacity(columns.len());
        for (col_idx, cell) in record.iter().enumerate() {
            let value: f32 =
                cell.trim()
                    .parse()
                    .map_err(|_| DatasetError::InvalidNumber {
                        row: row_idx + 1,
                        column: columns
                            .get(col_idx)
                            .cloned()
                            .unwrap_or_else(|| col_idx.to_string()),
                        value: cell.to_string(),
                    })?;
            row.push(value);
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(DatasetError::Empty {
            path: path.display().to_string(),
        });
    }

    Ok(FeatureTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_numeric_table() {
        let (_dir, path) = write_csv("acidity,sugar,quality\n7.4,1.9,5\n7.8,2.6,6\n");
        let table = load_table(&path).unwrap();
        assert_eq!(table.columns, vec!["acidity", "sugar", "quality"]);
        assert_eq!(table.rows, vec![vec![7.4, 1.9, 5.0], vec![7.8, 2.6, 6.0]]);
    }

    #[test]
    fn pop_column_removes_label_everywhere() {
        let (_dir, path) = write_csv("acidity,quality,sugar\n7.4,5,1.9\n7.8,6,2.6\n");
        let mut table = load_table(&path).unwrap();
        let labels = table.pop_column("quality").unwrap();
        assert_eq!(labels, vec![5.0, 6.0]);
        assert!(!table.columns.iter().any(|column| column == "quality"));
        assert_eq!(table.rows, vec![vec![7.4, 1.9], vec![7.8, 2.6]]);
    }

    #[test]
    fn missing_label_column_is_reported() {
        let (_dir, path) = write_csv("acidity,sugar\n7.4,1.9\n");
        let mut table = load_table(&path).unwrap();
        let err = table.pop_column("quality").unwrap_err();
        assert!(matches!(err, DatasetError::MissingLabel { .. }));
    }

    #[test]
    fn non_numeric_cell_names_row_and_column() {
        let (_dir, path) = write_csv("acidity,quality\n7.4,5\noops,6\n");
        let err = load_table(&path).unwrap_err();
        match err {
            DatasetError::InvalidNumber { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "acidity");
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_table_is_an_error() {
        let (_dir, path) = write_csv("acidity,quality\n");
        assert!(matches!(
            load_table(&path),
            Err(DatasetError::Empty { .. })
        ));
    }
}
