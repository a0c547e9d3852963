//! CART decision tree classifier using Gini impurity.
//!
//! Trees are grown recursively: at each node the split with the largest
//! impurity reduction is chosen over all features and candidate thresholds
//! (midpoints between consecutive distinct values). Growth stops on pure
//! nodes, at `max_depth`, or when no split improves impurity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A node in a fitted decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal split: samples go left when `features[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    /// Terminal node carrying the majority class of its training samples.
    Leaf { label: usize, samples: usize },
}

impl TreeNode {
    /// Returns the depth of the subtree rooted at this node.
    ///
    /// Leaves have depth 0.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Decision tree classifier built with the CART algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    max_depth: Option<usize>,
}

impl DecisionTree {
    /// Creates an unfitted tree with unlimited depth.
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
        }
    }

    /// Sets the maximum depth of the tree (root has depth 0).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Fits the tree to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if `rows` is empty or `rows` and `labels` disagree
    /// in length.
    pub fn fit(&mut self, rows: &[Vec<f32>], labels: &[usize]) -> Result<()> {
        if rows.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if rows.len() != labels.len() {
            return Err(ModelError::SampleCountMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }

        self.root = Some(grow(rows, labels, 0, self.max_depth));
        Ok(())
    }

    /// Predicts the class label for a single feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFitted`] if called before `fit`.
    pub fn predict_one(&self, features: &[f32]) -> Result<usize> {
        let mut node = self.root.as_ref().ok_or(ModelError::NotFitted)?;
        loop {
            match node {
                TreeNode::Leaf { label, .. } => return Ok(*label),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Returns the fitted root node, if any.
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively grows a subtree for the given samples.
fn grow(rows: &[Vec<f32>], labels: &[usize], depth: usize, max_depth: Option<usize>) -> TreeNode {
    let samples = labels.len();

    let at_depth_limit = max_depth.is_some_and(|limit| depth >= limit);
    if at_depth_limit || gini(labels) == 0.0 {
        return TreeNode::Leaf {
            label: majority_label(labels),
            samples,
        };
    }

    let Some((feature, threshold)) = best_split(rows, labels) else {
        return TreeNode::Leaf {
            label: majority_label(labels),
            samples,
        };
    };

    let mut left_rows = Vec::new();
    let mut left_labels = Vec::new();
    let mut right_rows = Vec::new();
    let mut right_labels = Vec::new();
    for (row, &label) in rows.iter().zip(labels) {
        if row[feature] <= threshold {
            left_rows.push(row.clone());
            left_labels.push(label);
        } else {
            right_rows.push(row.clone());
            right_labels.push(label);
        }
    }

    TreeNode::Split {
        feature,
        threshold,
        left: Box::new(grow(&left_rows, &left_labels, depth + 1, max_depth)),
        right: Box::new(grow(&right_rows, &right_labels, depth + 1, max_depth)),
    }
}

/// Gini impurity of a label set: `1 - Σ p_i²`.
pub(crate) fn gini(labels: &[usize]) -> f32 {
    if labels.is_empty() {
        return 0.0;
    }

    // BTreeMap for deterministic iteration order
    let mut counts = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0usize) += 1;
    }

    let n = labels.len() as f32;
    let mut impurity = 1.0;
    for &count in counts.values() {
        let p = count as f32 / n;
        impurity -= p * p;
    }
    impurity
}

/// Weighted Gini impurity of a candidate split.
fn weighted_gini(left: &[usize], right: &[usize]) -> f32 {
    let n_left = left.len() as f32;
    let n_right = right.len() as f32;
    let n_total = n_left + n_right;
    if n_total == 0.0 {
        return 0.0;
    }
    (n_left / n_total) * gini(left) + (n_right / n_total) * gini(right)
}

/// Most frequent label; ties resolve to the smaller label.
pub(crate) fn majority_label(labels: &[usize]) -> usize {
    let mut counts = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0usize) += 1;
    }

    let mut best_label = 0;
    let mut best_count = 0;
    for (label, count) in counts {
        if count > best_count {
            best_count = count;
            best_label = label;
        }
    }
    best_label
}

/// Finds the split with the largest impurity reduction across all features.
///
/// Returns `None` when no split separates the samples with positive gain.
fn best_split(rows: &[Vec<f32>], labels: &[usize]) -> Option<(usize, f32)> {
    let n_features = rows[0].len();
    let parent_impurity = gini(labels);

    let mut best: Option<(usize, f32)> = None;
    let mut best_gain = 0.0f32;

    for feature in 0..n_features {
        let mut values: Vec<f32> = rows.iter().map(|row| row[feature]).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;

            let mut left = Vec::new();
            let mut right = Vec::new();
            for (row, &label) in rows.iter().zip(labels) {
                if row[feature] <= threshold {
                    left.push(label);
                } else {
                    right.push(label);
                }
            }
            if left.is_empty() || right.is_empty() {
                continue;
            }

            let gain = parent_impurity - weighted_gini(&left, &right);
            if gain > best_gain {
                best_gain = gain;
                best = Some((feature, threshold));
            }
        }
    }

    best
}
