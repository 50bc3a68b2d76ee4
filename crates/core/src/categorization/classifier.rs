//! Seeded random-forest classifier over feature vectors.
//!
//! A small ensemble of CART-style decision trees (gini splits, bootstrap
//! sampling, square-root feature subsampling). Everything is driven by a
//! seeded `StdRng`, so training is deterministic for a given dataset and
//! configuration. The fitted forest serializes with serde as part of the
//! model blob.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Tuning knobs for the forest. Defaults are sized for per-user datasets of
/// tens to a few hundred entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForestConfig {
    pub tree_count: usize,
    pub max_depth: usize,
    pub min_leaf_size: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            tree_count: 25,
            max_depth: 8,
            min_leaf_size: 2,
            seed: 0x5eed_f00d,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
enum TreeNode {
    Leaf {
        class_counts: Vec<u32>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct DecisionTree {
    root: TreeNode,
}

impl DecisionTree {
    fn fit(
        data: &[Vec<f64>],
        labels: &[usize],
        indices: &[usize],
        class_count: usize,
        config: &ForestConfig,
        rng: &mut StdRng,
    ) -> Self {
        let root = build_node(data, labels, indices, class_count, 0, config, rng);
        Self { root }
    }

    fn leaf_counts(&self, features: &[f64]) -> &[u32] {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { class_counts } => return class_counts,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    node = if value <= *threshold { left } else { right };
                }
            }
        }
    }
}

fn class_counts(labels: &[usize], indices: &[usize], class_count: usize) -> Vec<u32> {
    let mut counts = vec![0u32; class_count];
    for &i in indices {
        counts[labels[i]] += 1;
    }
    counts
}

fn gini(counts: &[u32]) -> f64 {
    let total: u32 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

fn is_pure(counts: &[u32]) -> bool {
    counts.iter().filter(|&&c| c > 0).count() <= 1
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn find_best_split(
    data: &[Vec<f64>],
    labels: &[usize],
    indices: &[usize],
    class_count: usize,
    config: &ForestConfig,
    rng: &mut StdRng,
) -> Option<BestSplit> {
    let width = data[indices[0]].len();
    if width == 0 {
        return None;
    }
    let subset_size = ((width as f64).sqrt().ceil() as usize).clamp(1, width);
    let candidates = sample(rng, width, subset_size);

    let mut best: Option<BestSplit> = None;
    for feature in candidates {
        let mut values: Vec<f64> = indices.iter().map(|&i| data[i][feature]).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();
        if values.len() < 2 {
            continue;
        }
        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .partition(|&&i| data[i][feature] <= threshold);
            if left.len() < config.min_leaf_size || right.len() < config.min_leaf_size {
                continue;
            }
            let left_counts = class_counts(labels, &left, class_count);
            let right_counts = class_counts(labels, &right, class_count);
            let weighted = (left.len() as f64 * gini(&left_counts)
                + right.len() as f64 * gini(&right_counts))
                / indices.len() as f64;
            let better = match &best {
                Some(b) => weighted < b.impurity,
                None => true,
            };
            if better {
                best = Some(BestSplit {
                    feature,
                    threshold,
                    impurity: weighted,
                });
            }
        }
    }
    best
}

fn build_node(
    data: &[Vec<f64>],
    labels: &[usize],
    indices: &[usize],
    class_count: usize,
    depth: usize,
    config: &ForestConfig,
    rng: &mut StdRng,
) -> TreeNode {
    let counts = class_counts(labels, indices, class_count);
    if is_pure(&counts)
        || depth >= config.max_depth
        || indices.len() < 2 * config.min_leaf_size
    {
        return TreeNode::Leaf {
            class_counts: counts,
        };
    }

    let Some(split) = find_best_split(data, labels, indices, class_count, config, rng) else {
        return TreeNode::Leaf {
            class_counts: counts,
        };
    };
    if split.impurity >= gini(&counts) {
        return TreeNode::Leaf {
            class_counts: counts,
        };
    }

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .partition(|&&i| data[i][split.feature] <= split.threshold);
    TreeNode::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(build_node(
            data,
            labels,
            &left,
            class_count,
            depth + 1,
            config,
            rng,
        )),
        right: Box::new(build_node(
            data,
            labels,
            &right,
            class_count,
            depth + 1,
            config,
            rng,
        )),
    }
}

/// Fitted ensemble classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForestClassifier {
    trees: Vec<DecisionTree>,
    class_count: usize,
    feature_width: usize,
}

impl ForestClassifier {
    /// Fits the forest on the full dataset. `labels` are class indices in
    /// `0..class_count`.
    pub fn fit(
        data: &[Vec<f64>],
        labels: &[usize],
        class_count: usize,
        config: &ForestConfig,
    ) -> Result<Self, ModelError> {
        if data.is_empty() || data.len() != labels.len() {
            return Err(ModelError::Training(
                "feature matrix and labels are empty or mismatched".to_string(),
            ));
        }
        let feature_width = data[0].len();
        if data.iter().any(|row| row.len() != feature_width) {
            return Err(ModelError::Training(
                "feature rows have inconsistent widths".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let trees = (0..config.tree_count)
            .map(|_| {
                // Bootstrap sample with replacement.
                let indices: Vec<usize> =
                    (0..data.len()).map(|_| rng.gen_range(0..data.len())).collect();
                DecisionTree::fit(data, labels, &indices, class_count, config, &mut rng)
            })
            .collect();

        Ok(Self {
            trees,
            class_count,
            feature_width,
        })
    }

    pub fn class_count(&self) -> usize {
        self.class_count
    }

    /// Averaged class distribution across all trees; sums to 1.
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        if features.len() != self.feature_width {
            return Err(ModelError::FeatureWidthMismatch {
                expected: self.feature_width,
                actual: features.len(),
            });
        }
        let mut probabilities = vec![0.0; self.class_count];
        for tree in &self.trees {
            let counts = tree.leaf_counts(features);
            let total: u32 = counts.iter().sum();
            if total == 0 {
                continue;
            }
            for (p, &c) in probabilities.iter_mut().zip(counts) {
                *p += c as f64 / total as f64;
            }
        }
        let sum: f64 = probabilities.iter().sum();
        if sum > 0.0 {
            for p in &mut probabilities {
                *p /= sum;
            }
        }
        Ok(probabilities)
    }

    /// Top class index with its probability. Ties resolve to the lowest
    /// class index, keeping prediction deterministic.
    pub fn predict(&self, features: &[f64]) -> Result<(usize, f64), ModelError> {
        let probabilities = self.predict_proba(features)?;
        let mut top = 0;
        for (index, &p) in probabilities.iter().enumerate() {
            if p > probabilities[top] {
                top = index;
            }
        }
        Ok((top, probabilities[top].clamp(0.0, 1.0)))
    }
}

/// K-fold cross-validation accuracy for the given dataset and configuration.
///
/// Folds are assigned from a seeded shuffle, so the estimate is reproducible.
/// Returns a value in [0, 1].
pub fn cross_validate(
    data: &[Vec<f64>],
    labels: &[usize],
    class_count: usize,
    folds: usize,
    config: &ForestConfig,
) -> Result<f64, ModelError> {
    let n = data.len();
    if n < 2 {
        return Ok(0.0);
    }
    let folds = folds.clamp(2, n);
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    for i in (1..n).rev() {
        let j = rng.gen_range(0..=i);
        order.swap(i, j);
    }

    let mut correct = 0usize;
    let mut total = 0usize;
    for fold in 0..folds {
        let test: Vec<usize> = order
            .iter()
            .enumerate()
            .filter(|(pos, _)| pos % folds == fold)
            .map(|(_, &i)| i)
            .collect();
        let train: Vec<usize> = order
            .iter()
            .enumerate()
            .filter(|(pos, _)| pos % folds != fold)
            .map(|(_, &i)| i)
            .collect();
        if test.is_empty() || train.is_empty() {
            continue;
        }

        let train_data: Vec<Vec<f64>> = train.iter().map(|&i| data[i].clone()).collect();
        let train_labels: Vec<usize> = train.iter().map(|&i| labels[i]).collect();
        let model = ForestClassifier::fit(&train_data, &train_labels, class_count, config)?;

        for &i in &test {
            let (predicted, _) = model.predict(&data[i])?;
            if predicted == labels[i] {
                correct += 1;
            }
            total += 1;
        }
    }

    if total == 0 {
        return Ok(0.0);
    }
    Ok(correct as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two well-separated clusters in 2D.
    fn separable_dataset() -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut data = Vec::new();
        let mut labels = Vec::new();
        for i in 0..15 {
            let jitter = i as f64 * 0.01;
            data.push(vec![0.1 + jitter, 0.2]);
            labels.push(0);
            data.push(vec![0.9 - jitter, 0.8]);
            labels.push(1);
        }
        (data, labels)
    }

    #[test]
    fn test_fit_and_predict_separable_classes() {
        let (data, labels) = separable_dataset();
        let model = ForestClassifier::fit(&data, &labels, 2, &ForestConfig::default()).unwrap();
        let (class_low, p_low) = model.predict(&[0.12, 0.2]).unwrap();
        let (class_high, p_high) = model.predict(&[0.88, 0.8]).unwrap();
        assert_eq!(class_low, 0);
        assert_eq!(class_high, 1);
        assert!(p_low > 0.9);
        assert!(p_high > 0.9);
    }

    #[test]
    fn test_predict_proba_sums_to_one() {
        let (data, labels) = separable_dataset();
        let model = ForestClassifier::fit(&data, &labels, 2, &ForestConfig::default()).unwrap();
        let probabilities = model.predict_proba(&[0.5, 0.5]).unwrap();
        let sum: f64 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_same_seed_gives_identical_forest() {
        let (data, labels) = separable_dataset();
        let config = ForestConfig::default();
        let a = ForestClassifier::fit(&data, &labels, 2, &config).unwrap();
        let b = ForestClassifier::fit(&data, &labels, 2, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cross_validation_accuracy_is_bounded() {
        let (data, labels) = separable_dataset();
        let accuracy =
            cross_validate(&data, &labels, 2, 5, &ForestConfig::default()).unwrap();
        assert!((0.0..=1.0).contains(&accuracy));
        // Clean separation should be learnable.
        assert!(accuracy > 0.8, "accuracy was {accuracy}");
    }

    #[test]
    fn test_width_mismatch_is_an_error() {
        let (data, labels) = separable_dataset();
        let model = ForestClassifier::fit(&data, &labels, 2, &ForestConfig::default()).unwrap();
        assert!(matches!(
            model.predict(&[0.5]),
            Err(ModelError::FeatureWidthMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        assert!(ForestClassifier::fit(&[], &[], 2, &ForestConfig::default()).is_err());
    }
}
