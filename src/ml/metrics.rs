//! Evaluation metrics for classification models.

/// Confusion matrix for a `K`-class classifier.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<u32>>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            counts: vec![vec![0; n_classes]; n_classes],
        }
    }

    /// Number of classes tracked by the matrix.
    pub fn n_classes(&self) -> usize {
        self.counts.len()
    }

    /// Record one observation. Out-of-range indices are ignored.
    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes() || predicted >= self.n_classes() {
            return;
        }
        self.counts[truth][predicted] = self.counts[truth][predicted].saturating_add(1);
    }

    /// Count of samples with the given true and predicted class.
    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth][predicted]
    }
}

/// Precision/recall statistics for a single class.
#[derive(Debug, Clone)]
pub struct PerClassStats {
    /// `TP / (TP + FP)`.
    pub precision: f32,
    /// `TP / (TP + FN)`.
    pub recall: f32,
    /// Total number of true examples for the class.
    pub support: u32,
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f32 {
    let mut correct = 0u64;
    let mut total = 0u64;
    for truth in 0..cm.n_classes() {
        for predicted in 0..cm.n_classes() {
            let count = cm.get(truth, predicted) as u64;
            total += count;
            if truth == predicted {
                correct += count;
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        correct as f32 / total as f32
    }
}

/// Compute per-class precision and recall from a confusion matrix.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes();
    let mut stats = Vec::with_capacity(k);
    for class_idx in 0..k {
        let tp = cm.get(class_idx, class_idx) as f32;
        let mut fp = 0f32;
        let mut fn_ = 0f32;
        let mut support = 0u32;
        for predicted in 0..k {
            let count = cm.get(class_idx, predicted);
            support = support.saturating_add(count);
            if predicted != class_idx {
                fn_ += count as f32;
            }
        }
        for truth in 0..k {
            if truth != class_idx {
                fp += cm.get(truth, class_idx) as f32;
            }
        }
        let precision = if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) };
        let recall = if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) };
        stats.push(PerClassStats {
            precision,
            recall,
            support,
        });
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal_heavy() -> ConfusionMatrix {
        let mut cm = ConfusionMatrix::new(3);
        cm.add(0, 0);
        cm.add(0, 0);
        cm.add(1, 1);
        cm.add(1, 2);
        cm.add(2, 2);
        cm
    }

    #[test]
    fn accuracy_counts_the_diagonal() {
        let cm = diagonal_heavy();
        assert!((accuracy(&cm) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn accuracy_of_empty_matrix_is_zero() {
        assert_eq!(accuracy(&ConfusionMatrix::new(2)), 0.0);
    }

    #[test]
    fn out_of_range_observations_are_ignored() {
        let mut cm = ConfusionMatrix::new(2);
        cm.add(0, 0);
        cm.add(5, 0);
        cm.add(0, 5);
        assert_eq!(accuracy(&cm), 1.0);
    }

    #[test]
    fn per_class_stats_match_hand_counts() {
        let cm = diagonal_heavy();
        let stats = precision_recall_by_class(&cm);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].support, 2);
        assert_eq!(stats[0].precision, 1.0);
        assert_eq!(stats[0].recall, 1.0);
        assert_eq!(stats[1].support, 2);
        assert_eq!(stats[1].recall, 0.5);
        // Class 2 received one false positive from class 1.
        assert_eq!(stats[2].precision, 0.5);
        assert_eq!(stats[2].recall, 1.0);
    }
}
