//! Bootstrap-aggregated ensemble of decision trees.
//!
//! Each tree is trained on a bootstrap sample (drawn with replacement) of
//! the training data. Predictions are majority votes across trees, and class
//! probabilities are vote fractions.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::tree::DecisionTree;

/// Default number of trees in the ensemble.
pub const DEFAULT_TREES: usize = 100;

/// Random forest classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_trees: usize,
    max_depth: Option<usize>,
    seed: Option<u64>,
    n_features: Option<usize>,
    n_classes: usize,
}

impl RandomForest {
    /// Creates an unfitted forest with the given tree count.
    pub fn new(n_trees: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_trees,
            max_depth: None,
            seed: None,
            n_features: None,
            n_classes: 0,
        }
    }

    /// Sets the maximum depth for each tree.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the bootstrap sampling seed for reproducible training.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fits the forest to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if the training data is empty or inconsistent.
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

        self.n_features = Some(rows[0].len());
        self.n_classes = labels.iter().max().copied().unwrap_or(0) + 1;
        self.trees = Vec::with_capacity(self.n_trees);

        for i in 0..self.n_trees {
            let sample_seed = self.seed.map(|seed| seed + i as u64);
            let indices = bootstrap_sample(rows.len(), sample_seed);

            let sample_rows: Vec<Vec<f32>> =
                indices.iter().map(|&idx| rows[idx].clone()).collect();
            let sample_labels: Vec<usize> = indices.iter().map(|&idx| labels[idx]).collect();

            let mut tree = match self.max_depth {
                Some(depth) => DecisionTree::new().with_max_depth(depth),
                None => DecisionTree::new(),
            };
            tree.fit(&sample_rows, &sample_labels)?;
            self.trees.push(tree);
        }

        Ok(())
    }

    /// Predicts the class label for one feature vector by majority vote.
    ///
    /// Ties resolve to the smaller label.
    pub fn predict_one(&self, features: &[f32]) -> Result<usize> {
        let votes = self.votes(features)?;

        let mut best_label = 0;
        let mut best_count = 0;
        for (label, &count) in votes.iter().enumerate() {
            if count > best_count {
                best_count = count;
                best_label = label;
            }
        }
        Ok(best_label)
    }

    /// Predicts class probabilities for one feature vector.
    ///
    /// Returns one entry per class; entries are vote fractions and sum to 1.
    pub fn predict_proba_one(&self, features: &[f32]) -> Result<Vec<f32>> {
        let votes = self.votes(features)?;
        let total = self.trees.len() as f32;
        Ok(votes.iter().map(|&count| count as f32 / total).collect())
    }

    /// Checks that the forest was trained on `expected` features.
    pub fn check_feature_count(&self, expected: usize) -> Result<()> {
        match self.n_features {
            None => Err(ModelError::NotFitted),
            Some(actual) if actual != expected => Err(ModelError::FeatureCountMismatch {
                expected,
                actual,
            }),
            Some(_) => Ok(()),
        }
    }

    /// Counts per-class votes across all trees for one feature vector.
    fn votes(&self, features: &[f32]) -> Result<Vec<usize>> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        let expected = self.n_features.ok_or(ModelError::NotFitted)?;
        if features.len() != expected {
            return Err(ModelError::FeatureCountMismatch {
                expected,
                actual: features.len(),
            });
        }

        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            let label = tree.predict_one(features)?;
            if label < votes.len() {
                votes[label] += 1;
            }
        }
        Ok(votes)
    }
}

/// Draws `n_samples` indices with replacement.
fn bootstrap_sample(n_samples: usize, seed: Option<u64>) -> Vec<usize> {
    let dist = Uniform::from(0..n_samples);
    let mut indices = Vec::with_capacity(n_samples);

    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..n_samples {
            indices.push(dist.sample(&mut rng));
        }
    } else {
        let mut rng = rand::thread_rng();
        for _ in 0..n_samples {
            indices.push(dist.sample(&mut rng));
        }
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_data() -> (Vec<Vec<f32>>, Vec<usize>) {
        // Only feature 0 carries signal; feature 1 is noise.
        let rows = vec![
            vec![0.0, 5.0],
            vec![1.0, 6.0],
            vec![2.0, 5.0],
            vec![10.0, 6.0],
            vec![11.0, 5.0],
            vec![12.0, 6.0],
        ];
        let labels = vec![0, 0, 0, 1, 1, 1];
        (rows, labels)
    }

    #[test]
    fn unfitted_forest_fails() {
        let forest = RandomForest::new(10);
        assert!(matches!(
            forest.predict_one(&[1.0, 2.0]),
            Err(ModelError::NotFitted)
        ));
    }

    #[test]
    fn fit_rejects_empty_data() {
        let mut forest = RandomForest::new(10);
        assert!(matches!(
            forest.fit(&[], &[]),
            Err(ModelError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn seeded_training_is_reproducible() {
        let (rows, labels) = separable_data();

        let mut first = RandomForest::new(25).with_seed(42);
        first.fit(&rows, &labels).expect("fit should succeed");
        let mut second = RandomForest::new(25).with_seed(42);
        second.fit(&rows, &labels).expect("fit should succeed");

        for row in &rows {
            assert_eq!(
                first.predict_one(row).unwrap(),
                second.predict_one(row).unwrap()
            );
            assert_eq!(
                first.predict_proba_one(row).unwrap(),
                second.predict_proba_one(row).unwrap()
            );
        }
    }

    #[test]
    fn probabilities_are_valid_distribution() {
        let (rows, labels) = separable_data();
        let mut forest = RandomForest::new(25).with_seed(7);
        forest.fit(&rows, &labels).expect("fit should succeed");

        for row in &rows {
            let proba = forest.predict_proba_one(row).unwrap();
            assert_eq!(proba.len(), 2);
            for &p in &proba {
                assert!((0.0..=1.0).contains(&p));
            }
            let sum: f32 = proba.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn feature_order_is_positional() {
        let (rows, labels) = separable_data();
        let mut forest = RandomForest::new(50).with_seed(3);
        forest.fit(&rows, &labels).expect("fit should succeed");

        // Feature 0 decides the class; swapping the two values moves the
        // sample across the learned threshold.
        assert_eq!(forest.predict_one(&[0.0, 100.0]).unwrap(), 0);
        assert_eq!(forest.predict_one(&[100.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn rejects_wrong_feature_count() {
        let (rows, labels) = separable_data();
        let mut forest = RandomForest::new(5).with_seed(1);
        forest.fit(&rows, &labels).expect("fit should succeed");

        assert!(matches!(
            forest.predict_one(&[1.0]),
            Err(ModelError::FeatureCountMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn check_feature_count_validates_training_width() {
        let (rows, labels) = separable_data();
        let mut forest = RandomForest::new(5).with_seed(1);
        forest.fit(&rows, &labels).expect("fit should succeed");

        assert!(forest.check_feature_count(2).is_ok());
        assert!(forest.check_feature_count(5).is_err());
    }
}
