//! Deterministic train/test splitting.

use rand::rngs::StdRng;
use rand::{SeedableRng, seq::SliceRandom};

/// Row partitions produced by [`train_test_split`].
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    /// Training feature rows.
    pub train_rows: Vec<Vec<f32>>,
    /// Held-out feature rows.
    pub test_rows: Vec<Vec<f32>>,
    /// Labels aligned with `train_rows`.
    pub train_labels: Vec<f32>,
    /// Labels aligned with `test_rows`.
    pub test_labels: Vec<f32>,
}

/// Split rows into disjoint train and test partitions.
///
/// A seeded shuffle fixes partition membership: identical seed and input
/// always yield identical partitions. The test partition receives
/// `ceil(n * test_fraction)` rows; nothing is stratified.
pub fn train_test_split(
    rows: &[Vec<f32>],
    labels: &[f32],
    test_fraction: f32,
    seed: u64,
) -> Result<TrainTestSplit, String> {
    if rows.len() != labels.len() {
        return Err(format!(
            "Mismatched rows ({}) and labels ({})",
            rows.len(),
            labels.len()
        ));
    }
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        return Err(format!("test_fraction must be in (0, 1), got {test_fraction}"));
    }
    let n = rows.len();
    let n_test = ((n as f32) * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(format!(
            "{n} rows cannot be split with test_fraction {test_fraction}"
        ));
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let mut split = TrainTestSplit {
        train_rows: Vec::with_capacity(n - n_test),
        test_rows: Vec::with_capacity(n_test),
        train_labels: Vec::with_capacity(n - n_test),
        test_labels: Vec::with_capacity(n_test),
    };
    for (position, &row_idx) in order.iter().enumerate() {
        if position < n_test {
            split.test_rows.push(rows[row_idx].clone());
            split.test_labels.push(labels[row_idx]);
        } else {
            split.train_rows.push(rows[row_idx].clone());
            split.train_labels.push(labels[row_idx]);
        }
    }
    Ok(split)
}
