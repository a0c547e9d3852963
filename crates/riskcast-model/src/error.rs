//! Error type for training, inference, and artifact handling.

/// Errors that can occur when fitting, querying, or persisting a model.
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    /// Training was attempted with no examples.
    #[error("training set is empty")]
    EmptyTrainingSet,

    /// Feature rows and labels disagree in length.
    #[error("sample count mismatch: {rows} feature rows but {labels} labels")]
    SampleCountMismatch { rows: usize, labels: usize },

    /// Inference was attempted before `fit`.
    #[error("model has not been fitted")]
    NotFitted,

    /// An input vector does not match the trained feature count.
    #[error("feature count mismatch: model expects {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// Failed to read or write the artifact file.
    #[error("failed to access model artifact '{path}': {source}")]
    ArtifactIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The artifact bytes did not decode into a model.
    #[error("failed to decode model artifact: {0}")]
    ArtifactDecode(String),

    /// The model could not be serialized.
    #[error("failed to encode model artifact: {0}")]
    ArtifactEncode(String),
}

impl ModelError {
    /// Creates an artifact I/O error with path context.
    pub fn artifact_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ArtifactIo {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for model results.
pub type Result<T> = std::result::Result<T, ModelError>;
