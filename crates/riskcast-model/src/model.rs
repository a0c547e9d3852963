//! The domain-level risk model and its on-disk artifact.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use riskcast_core::{PatientFeatures, RiskAssessment, RiskLevel, FEATURE_COUNT, POSITIVE_CLASS};

use crate::error::{ModelError, Result};
use crate::forest::{RandomForest, DEFAULT_TREES};

/// Labeled examples for training the risk classifier.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    rows: Vec<Vec<f32>>,
    labels: Vec<usize>,
}

impl TrainingSet {
    /// Creates an empty training set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one labeled example.
    pub fn push(&mut self, features: PatientFeatures, high_risk: bool) {
        self.rows.push(features.to_vector().to_vec());
        self.labels.push(high_risk as usize);
    }

    /// Number of examples in the set.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if the set holds no examples.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A fitted risk classifier.
///
/// Immutable once trained or loaded; inference never mutates the model, so a
/// single instance may be shared across concurrent request handlers without
/// coordination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskModel {
    forest: RandomForest,
}

impl RiskModel {
    /// Trains a model on the given set with a fixed bootstrap seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty.
    pub fn train(set: &TrainingSet, seed: u64) -> Result<Self> {
        let mut forest = RandomForest::new(DEFAULT_TREES).with_seed(seed);
        forest.fit(&set.rows, &set.labels)?;
        Ok(Self { forest })
    }

    /// Runs one prediction.
    ///
    /// The label and the score derive from the same tree votes, so
    /// `risk_level` is `High` exactly when the majority vote picks the
    /// positive class.
    pub fn assess(&self, features: &PatientFeatures) -> Result<RiskAssessment> {
        let vector = features.to_vector();
        let label = self.forest.predict_one(&vector)?;
        let proba = self.forest.predict_proba_one(&vector)?;
        let risk_score = proba.get(POSITIVE_CLASS).copied().unwrap_or(0.0);

        Ok(RiskAssessment {
            risk_score,
            risk_level: RiskLevel::from_label(label),
        })
    }

    /// Serializes the model to `path` as an opaque bincode blob.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the file write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes =
            bincode::serialize(self).map_err(|e| ModelError::ArtifactEncode(e.to_string()))?;
        fs::write(path, bytes)
            .map_err(|e| ModelError::artifact_io(path.display().to_string(), e))?;
        Ok(())
    }

    /// Loads a model from `path`.
    ///
    /// Validates that the artifact was trained on the five-feature schema,
    /// so a stale or foreign artifact fails at startup instead of at the
    /// first request.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, the bytes do not decode, or
    /// the trained feature count does not match [`FEATURE_COUNT`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).map_err(|e| ModelError::artifact_io(path.display().to_string(), e))?;
        let model: Self = bincode::deserialize(&bytes)
            .map_err(|e| ModelError::ArtifactDecode(e.to_string()))?;
        model.forest.check_feature_count(FEATURE_COUNT)?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(
        age: f32,
        bmi: f32,
        heart_rate: f32,
        smoker: bool,
        family_history: bool,
    ) -> PatientFeatures {
        PatientFeatures {
            age,
            bmi,
            heart_rate,
            smoker,
            family_history,
        }
    }

    fn example_set() -> TrainingSet {
        let mut set = TrainingSet::new();
        set.push(sample(30.0, 22.0, 70.0, false, false), false);
        set.push(sample(50.0, 31.0, 95.0, true, true), true);
        set.push(sample(60.0, 34.0, 100.0, true, true), true);
        set.push(sample(45.0, 28.0, 85.0, false, false), false);
        set.push(sample(35.0, 36.0, 110.0, true, true), true);
        set
    }

    fn temp_artifact(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("riskcast-{}-{}.bin", name, std::process::id()))
    }

    #[test]
    fn training_on_empty_set_fails() {
        assert!(matches!(
            RiskModel::train(&TrainingSet::new(), 42),
            Err(ModelError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn assessment_is_deterministic() {
        let model = RiskModel::train(&example_set(), 42).expect("training should succeed");
        let features = sample(60.0, 34.0, 100.0, true, true);

        let first = model.assess(&features).unwrap();
        let second = model.assess(&features).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn score_stays_in_unit_interval() {
        let model = RiskModel::train(&example_set(), 42).expect("training should succeed");

        let probes = [
            sample(30.0, 22.0, 70.0, false, false),
            sample(60.0, 34.0, 100.0, true, true),
            sample(44.0, 27.0, 88.0, true, false),
        ];
        for features in &probes {
            let assessment = model.assess(features).unwrap();
            assert!((0.0..=1.0).contains(&assessment.risk_score));
        }
    }

    #[test]
    fn level_matches_majority_vote() {
        let model = RiskModel::train(&example_set(), 42).expect("training should succeed");

        // Label and score come from the same votes: HIGH exactly when the
        // positive class holds a strict majority.
        let probes = [
            sample(30.0, 22.0, 70.0, false, false),
            sample(50.0, 31.0, 95.0, true, true),
            sample(60.0, 34.0, 100.0, true, true),
            sample(45.0, 28.0, 85.0, false, false),
            sample(35.0, 36.0, 110.0, true, true),
        ];
        for features in &probes {
            let assessment = model.assess(features).unwrap();
            let is_high = assessment.risk_level == RiskLevel::High;
            assert_eq!(is_high, assessment.risk_score > 0.5);
        }
    }

    #[test]
    fn known_high_risk_row_scores_high() {
        let model = RiskModel::train(&example_set(), 42).expect("training should succeed");

        let assessment = model.assess(&sample(60.0, 34.0, 100.0, true, true)).unwrap();
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert!(assessment.risk_score > 0.5);
    }

    #[test]
    fn artifact_round_trip_preserves_outputs() {
        let model = RiskModel::train(&example_set(), 42).expect("training should succeed");
        let path = temp_artifact("round-trip");

        model.save(&path).expect("save should succeed");
        let loaded = RiskModel::load(&path).expect("load should succeed");
        fs::remove_file(&path).ok();

        let probes = [
            sample(30.0, 22.0, 70.0, false, false),
            sample(60.0, 34.0, 100.0, true, true),
            sample(52.0, 29.0, 90.0, false, true),
        ];
        for features in &probes {
            assert_eq!(
                model.assess(features).unwrap(),
                loaded.assess(features).unwrap()
            );
        }
    }

    #[test]
    fn loading_missing_artifact_fails() {
        let result = RiskModel::load("/nonexistent/riskcast-model.bin");
        assert!(matches!(result, Err(ModelError::ArtifactIo { .. })));
    }

    #[test]
    fn loading_corrupt_artifact_fails() {
        let path = temp_artifact("corrupt");
        fs::write(&path, b"not a model artifact").expect("write should succeed");

        let result = RiskModel::load(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ModelError::ArtifactDecode(_))));
    }
}
