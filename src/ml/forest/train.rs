use std::collections::BTreeSet;

use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, seq::SliceRandom};

use super::model::{ForestModel, TreeNode};

/// Training hyperparameters for the forest.
#[derive(Debug, Clone)]
pub struct ForestOptions {
    /// Number of bagged trees.
    pub n_trees: usize,
    /// Maximum depth of each tree.
    pub max_depth: usize,
    /// Seed for bootstrap sampling and feature subsetting.
    pub seed: u64,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 2,
            seed: 42,
        }
    }
}

/// Fit a random forest on `(rows, labels)`.
///
/// Each tree trains on a bootstrap sample and searches `sqrt(d)` randomly
/// chosen features per split, minimizing Gini impurity. All randomness comes
/// from one `StdRng` seeded with `options.seed`, so identical input and seed
/// reproduce the model exactly.
pub fn train_forest(
    rows: &[Vec<f32>],
    labels: &[f32],
    options: &ForestOptions,
) -> Result<ForestModel, String> {
    if rows.len() != labels.len() {
        return Err("Mismatched rows/labels lengths".to_string());
    }
    if rows.is_empty() {
        return Err("Empty dataset".to_string());
    }
    if options.n_trees == 0 {
        return Err("Need at least 1 tree".to_string());
    }
    let n_features = rows[0].len();
    if n_features == 0 {
        return Err("Rows must have at least one feature".to_string());
    }
    if rows.iter().any(|row| row.len() != n_features) {
        return Err("Rows must all have the same number of features".to_string());
    }

    let classes: Vec<f32> = labels
        .iter()
        .map(|&label| OrderedFloat(label))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|value| value.0)
        .collect();
    if classes.len() < 2 {
        return Err("Need at least 2 classes".to_string());
    }
    let y: Vec<usize> = labels
        .iter()
        .map(|&label| {
            classes
                .binary_search_by_key(&OrderedFloat(label), |&class| OrderedFloat(class))
                .expect("classes were built from these labels")
        })
        .collect();

    let n = rows.len();
    let features_per_split = ((n_features as f64).sqrt().floor() as usize).max(1);
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut forest_importances = vec![0f64; n_features];
    let mut trees = Vec::with_capacity(options.n_trees);

    for _tree in 0..options.n_trees {
        let bootstrap: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
        let mut builder = TreeBuilder {
            rows,
            y: &y,
            n_classes: classes.len(),
            max_depth: options.max_depth,
            features_per_split,
            n_root: bootstrap.len() as f64,
            importances: vec![0f64; n_features],
        };
        let root = builder.grow(&bootstrap, 0, &mut rng);
        trees.push(root);

        let total: f64 = builder.importances.iter().sum();
        if total > 0.0 {
            for (accumulated, raw) in forest_importances.iter_mut().zip(&builder.importances) {
                *accumulated += raw / total;
            }
        }
    }

    let importances = normalize(&forest_importances);
    Ok(ForestModel::new(classes, n_features, trees, importances))
}

fn normalize(raw: &[f64]) -> Vec<f32> {
    let total: f64 = raw.iter().sum();
    if total > 0.0 {
        raw.iter().map(|&value| (value / total) as f32).collect()
    } else {
        vec![0.0; raw.len()]
    }
}

struct TreeBuilder<'a> {
    rows: &'a [Vec<f32>],
    y: &'a [usize],
    n_classes: usize,
    max_depth: usize,
    features_per_split: usize,
    n_root: f64,
    /// Unnormalized impurity decrease accumulated per feature.
    importances: Vec<f64>,
}

/// Best threshold found for one feature at one node.
#[derive(Debug, Clone, Copy)]
struct FeatureSplit {
    feature_index: usize,
    threshold: f32,
    /// Sample-weighted Gini impurity of the two children.
    child_impurity: f64,
}

impl TreeBuilder<'_> {
    fn grow(&mut self, indices: &[usize], depth: usize, rng: &mut StdRng) -> TreeNode {
        let counts = self.class_counts(indices);
        let leaf = TreeNode::Leaf {
            class_index: majority_class(&counts),
        };
        if depth >= self.max_depth || indices.len() < 2 || is_pure(&counts) {
            return leaf;
        }

        let Some(split) = self.best_split(indices, &counts, rng) else {
            return leaf;
        };
        let parent_impurity = gini(&counts, indices.len());
        let decrease = parent_impurity - split.child_impurity;
        // A zero-gain split only reshuffles samples; stop instead.
        if decrease <= 1e-9 {
            return leaf;
        }
        self.importances[split.feature_index] += (indices.len() as f64 / self.n_root) * decrease;

        let (left_indices, right_indices) = self.partition(indices, &split);
        TreeNode::Split {
            feature_index: split.feature_index,
            threshold: split.threshold,
            left: Box::new(self.grow(&left_indices, depth + 1, rng)),
            right: Box::new(self.grow(&right_indices, depth + 1, rng)),
        }
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<u32> {
        let mut counts = vec![0u32; self.n_classes];
        for &row_idx in indices {
            counts[self.y[row_idx]] += 1;
        }
        counts
    }

    fn best_split(
        &self,
        indices: &[usize],
        parent_counts: &[u32],
        rng: &mut StdRng,
    ) -> Option<FeatureSplit> {
        let mut candidates: Vec<usize> = (0..self.importances.len()).collect();
        candidates.shuffle(rng);
        candidates.truncate(self.features_per_split);

        let mut best: Option<FeatureSplit> = None;
        for feature_index in candidates {
            let Some(split) = self.best_split_for_feature(indices, parent_counts, feature_index)
            else {
                continue;
            };
            if best
                .map(|current| split.child_impurity < current.child_impurity)
                .unwrap_or(true)
            {
                best = Some(split);
            }
        }
        best
    }

    /// Scan the midpoints between adjacent distinct values of one feature.
    fn best_split_for_feature(
        &self,
        indices: &[usize],
        parent_counts: &[u32],
        feature_index: usize,
    ) -> Option<FeatureSplit> {
        let mut ordered: Vec<(f32, usize)> = indices
            .iter()
            .map(|&row_idx| (self.rows[row_idx][feature_index], self.y[row_idx]))
            .collect();
        ordered.sort_by_key(|&(value, _)| OrderedFloat(value));

        let total = indices.len();
        let mut left_counts = vec![0u32; self.n_classes];
        let mut best: Option<FeatureSplit> = None;
        for (position, &(value, class_index)) in ordered.iter().enumerate().take(total - 1) {
            left_counts[class_index] += 1;
            let next_value = ordered[position + 1].0;
            if next_value <= value {
                continue;
            }
            let left_total = position + 1;
            let right_total = total - left_total;
            let right_counts: Vec<u32> = parent_counts
                .iter()
                .zip(&left_counts)
                .map(|(&all, &left)| all - left)
                .collect();
            let child_impurity = (left_total as f64 * gini(&left_counts, left_total)
                + right_total as f64 * gini(&right_counts, right_total))
                / total as f64;
            if best
                .map(|current| child_impurity < current.child_impurity)
                .unwrap_or(true)
            {
                best = Some(FeatureSplit {
                    feature_index,
                    threshold: value + (next_value - value) / 2.0,
                    child_impurity,
                });
            }
        }
        best
    }

    fn partition(&self, indices: &[usize], split: &FeatureSplit) -> (Vec<usize>, Vec<usize>) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for &row_idx in indices {
            if self.rows[row_idx][split.feature_index] <= split.threshold {
                left.push(row_idx);
            } else {
                right.push(row_idx);
            }
        }
        (left, right)
    }
}

fn gini(counts: &[u32], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let sum_sq: f64 = counts
        .iter()
        .map(|&count| {
            let p = count as f64 / total;
            p * p
        })
        .sum();
    1.0 - sum_sq
}

fn is_pure(counts: &[u32]) -> bool {
    counts.iter().filter(|&&count| count > 0).count() <= 1
}

fn majority_class(counts: &[u32]) -> usize {
    let mut best_index = 0usize;
    let mut best_count = 0u32;
    for (index, &count) in counts.iter().enumerate() {
        if count > best_count {
            best_count = count;
            best_index = index;
        }
    }
    best_index
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two redundant informative features so every tree can separate the
    /// classes no matter which feature it draws.
    fn separable_dataset() -> (Vec<Vec<f32>>, Vec<f32>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..10 {
            let low = i as f32 * 0.01;
            rows.push(vec![low, low]);
            labels.push(5.0);
            let high = 1.0 + i as f32 * 0.01;
            rows.push(vec![high, high]);
            labels.push(6.0);
        }
        (rows, labels)
    }

    #[test]
    fn learns_a_separable_rule() {
        let (rows, labels) = separable_dataset();
        let model = train_forest(&rows, &labels, &ForestOptions::default()).unwrap();
        assert_eq!(model.classes, vec![5.0, 6.0]);
        assert_eq!(model.score(&rows, &labels), 1.0);
        assert_eq!(model.predict(&[vec![0.05, 0.05]]), vec![5.0]);
        assert_eq!(model.predict(&[vec![1.05, 1.05]]), vec![6.0]);
    }

    #[test]
    fn importances_cover_features_and_sum_to_one() {
        let (rows, labels) = separable_dataset();
        let model = train_forest(&rows, &labels, &ForestOptions::default()).unwrap();
        let importances = model.feature_importances();
        assert_eq!(importances.len(), 2);
        let total: f32 = importances.iter().sum();
        assert!((total - 1.0).abs() < 1e-3, "importances sum to {total}");
        assert!(importances.iter().all(|&weight| weight >= 0.0));
    }

    #[test]
    fn same_seed_reproduces_the_fit() {
        let (rows, labels) = separable_dataset();
        let options = ForestOptions::default();
        let first = train_forest(&rows, &labels, &options).unwrap();
        let second = train_forest(&rows, &labels, &options).unwrap();
        assert_eq!(first.feature_importances(), second.feature_importances());
        assert_eq!(first.predict(&rows), second.predict(&rows));
    }

    #[test]
    fn depth_limit_bounds_every_tree() {
        let (rows, labels) = separable_dataset();
        let options = ForestOptions {
            max_depth: 1,
            ..ForestOptions::default()
        };
        let model = train_forest(&rows, &labels, &options).unwrap();
        assert!(model.trees.iter().all(|tree| tree_depth(tree) <= 1));
    }

    fn tree_depth(node: &TreeNode) -> usize {
        match node {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => {
                1 + tree_depth(left).max(tree_depth(right))
            }
        }
    }

    #[test]
    fn degenerate_datasets_are_rejected() {
        let rows = vec![vec![1.0], vec![2.0]];
        assert!(train_forest(&[], &[], &ForestOptions::default()).is_err());
        assert!(train_forest(&rows, &[1.0], &ForestOptions::default()).is_err());
        // Single class cannot train a classifier.
        assert!(train_forest(&rows, &[5.0, 5.0], &ForestOptions::default()).is_err());
        let ragged = vec![vec![1.0], vec![2.0, 3.0]];
        assert!(train_forest(&ragged, &[5.0, 6.0], &ForestOptions::default()).is_err());
    }

    #[test]
    fn gini_is_zero_for_pure_and_half_for_balanced() {
        assert_eq!(gini(&[4, 0], 4), 0.0);
        assert!((gini(&[2, 2], 4) - 0.5).abs() < 1e-9);
    }
}
