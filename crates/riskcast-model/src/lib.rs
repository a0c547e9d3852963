//! Risk classifier training, inference, and artifact persistence.
//!
//! This crate implements the learner behind riskcast:
//!
//! - [`DecisionTree`] — CART classifier using Gini impurity
//! - [`RandomForest`] — bootstrap-aggregated ensemble with majority voting
//! - [`RiskModel`] — the domain-level model: training on
//!   [`TrainingSet`] data, per-request assessment, and the on-disk artifact
//!
//! The artifact is an opaque bincode blob with no version header; the only
//! compatibility contract is that [`RiskModel::load`] validates the trained
//! feature count against the five-feature wire schema.

pub mod error;
pub mod forest;
pub mod model;
pub mod tree;

pub use error::{ModelError, Result};
pub use forest::RandomForest;
pub use model::{RiskModel, TrainingSet};
pub use tree::DecisionTree;
