//! Core domain types shared between the trainer and the predictor service.
//!
//! This crate provides:
//!
//! - [`PatientFeatures`] — the five-field feature schema accepted on the wire
//! - [`RiskLevel`] — binary risk category derived from the predicted class
//! - [`RiskAssessment`] — score and level returned for one prediction
//!
//! Feature order is positional, not named: [`PatientFeatures::to_vector`] is
//! the single place the order is defined, and both training and inference go
//! through it.
//!
//! # Example
//!
//! ```rust
//! use riskcast_core::{PatientFeatures, RiskLevel};
//!
//! let features = PatientFeatures {
//!     age: 60.0,
//!     bmi: 34.0,
//!     heart_rate: 100.0,
//!     smoker: true,
//!     family_history: true,
//! };
//!
//! assert_eq!(features.to_vector(), [60.0, 34.0, 100.0, 1.0, 1.0]);
//! assert_eq!(RiskLevel::from_label(1), RiskLevel::High);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 5;

/// Class label representing high risk.
pub const POSITIVE_CLASS: usize = 1;

/// Patient features as accepted by `POST /predict` and used for training.
///
/// The two flags accept either JSON booleans or 0/1 numbers, matching what
/// callers send in practice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientFeatures {
    pub age: f32,
    pub bmi: f32,
    pub heart_rate: f32,
    #[serde(deserialize_with = "flag_from_bool_or_int")]
    pub smoker: bool,
    #[serde(deserialize_with = "flag_from_bool_or_int")]
    pub family_history: bool,
}

impl PatientFeatures {
    /// Returns the fixed-order feature vector consumed by the classifier.
    ///
    /// Order must match between training and inference; no field names are
    /// embedded in the serialized model, only this positional layout.
    pub fn to_vector(&self) -> [f32; FEATURE_COUNT] {
        [
            self.age,
            self.bmi,
            self.heart_rate,
            self.smoker as u8 as f32,
            self.family_history as u8 as f32,
        ]
    }
}

/// Deserializes a boolean flag from either a JSON boolean or a 0/1 number.
fn flag_from_bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(u8),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!(
            "expected 0, 1, or a boolean, got {other}"
        ))),
    }
}

/// Binary risk category derived from the predicted class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    /// Maps a predicted class label to its risk category.
    pub fn from_label(label: usize) -> Self {
        if label == POSITIVE_CLASS {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "HIGH",
            Self::Low => "LOW",
        };
        write!(f, "{}", s)
    }
}

/// Result of one prediction: positive-class probability and derived level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Probability of the high-risk class, in `[0, 1]`.
    pub risk_score: f32,
    pub risk_level: RiskLevel,
}
