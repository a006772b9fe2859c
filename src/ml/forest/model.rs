use ordered_float::OrderedFloat;

use crate::ml::metrics::ConfusionMatrix;

/// One node of a fitted decision tree.
#[derive(Debug, Clone)]
pub enum TreeNode {
    /// Terminal node predicting a class index.
    Leaf {
        /// Index into the forest's class list.
        class_index: usize,
    },
    /// Binary split on a single feature.
    Split {
        /// Feature column tested by this node.
        feature_index: usize,
        /// Rows with `feature <= threshold` go left.
        threshold: f32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Walk the tree and return the predicted class index.
    pub fn predict(&self, features: &[f32]) -> usize {
        match self {
            TreeNode::Leaf { class_index } => *class_index,
            TreeNode::Split {
                feature_index,
                threshold,
                left,
                right,
            } => {
                let value = features.get(*feature_index).copied().unwrap_or(0.0);
                if value <= *threshold {
                    left.predict(features)
                } else {
                    right.predict(features)
                }
            }
        }
    }
}

/// Fitted random forest for numeric class labels.
#[derive(Debug, Clone)]
pub struct ForestModel {
    /// Distinct label values seen at fit time, ascending.
    pub classes: Vec<f32>,
    /// Number of feature columns expected per row.
    pub n_features: usize,
    /// Tree roots; prediction is a majority vote over them.
    pub trees: Vec<TreeNode>,
    /// Normalized mean decrease in impurity, one weight per feature.
    importances: Vec<f32>,
}

impl ForestModel {
    pub(super) fn new(
        classes: Vec<f32>,
        n_features: usize,
        trees: Vec<TreeNode>,
        importances: Vec<f32>,
    ) -> Self {
        Self {
            classes,
            n_features,
            trees,
            importances,
        }
    }

    /// Per-feature importance weights, aligned with the training columns.
    ///
    /// Weights sum to 1.0 unless no split in the forest ever reduced
    /// impurity, in which case they are all zero.
    pub fn feature_importances(&self) -> &[f32] {
        &self.importances
    }

    /// Index of the majority-vote class for one feature row.
    ///
    /// Vote ties resolve to the lower class index, which keeps prediction
    /// deterministic.
    pub fn predict_class_index(&self, features: &[f32]) -> usize {
        let mut votes = vec![0u32; self.classes.len()];
        for tree in &self.trees {
            let class_index = tree.predict(features);
            if class_index < votes.len() {
                votes[class_index] += 1;
            }
        }
        let mut best_index = 0usize;
        let mut best_votes = 0u32;
        for (index, &count) in votes.iter().enumerate() {
            if count > best_votes {
                best_votes = count;
                best_index = index;
            }
        }
        best_index
    }

    /// Predict the label value for each row.
    pub fn predict(&self, rows: &[Vec<f32>]) -> Vec<f32> {
        rows.iter()
            .map(|row| self.classes[self.predict_class_index(row)])
            .collect()
    }

    /// Index of a label value in the class list, if it was seen at fit time.
    pub fn class_index_of(&self, label: f32) -> Option<usize> {
        self.classes
            .binary_search_by_key(&OrderedFloat(label), |&class| OrderedFloat(class))
            .ok()
    }

    /// Mean accuracy over `(rows, labels)` in `[0, 1]`.
    ///
    /// Labels never seen at fit time cannot be predicted and count as
    /// incorrect.
    pub fn score(&self, rows: &[Vec<f32>], labels: &[f32]) -> f32 {
        if rows.is_empty() {
            return 0.0;
        }
        let correct = rows
            .iter()
            .zip(labels.iter())
            .filter(|&(row, &label)| {
                self.class_index_of(label) == Some(self.predict_class_index(row))
            })
            .count();
        correct as f32 / rows.len() as f32
    }

    /// Build a confusion matrix over `(rows, labels)`.
    ///
    /// Labels unseen at fit time land outside the matrix and are dropped
    /// from it; [`ConfusionMatrix::add`] ignores out-of-range indices.
    pub fn confusion_matrix(&self, rows: &[Vec<f32>], labels: &[f32]) -> ConfusionMatrix {
        let mut cm = ConfusionMatrix::new(self.classes.len());
        for (row, &label) in rows.iter().zip(labels.iter()) {
            let truth = self.class_index_of(label).unwrap_or(self.classes.len());
            cm.add(truth, self.predict_class_index(row));
        }
        cm
    }
}
