use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Raised by the encoder when [`UnknownPolicy::Reject`](crate::features::UnknownPolicy) is active.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("unknown value {value:?} for field {field}")]
    UnknownValue { field: &'static str, value: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("model has not been trained or loaded")]
    NotTrained,
    #[error("feature vector has {got} values, model expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,
    #[error("{rows} feature rows but {labels} labels")]
    LabelCountMismatch { rows: usize, labels: usize },
}

#[derive(Debug, Error)]
pub enum TrainingDataError {
    #[error("failed to read training data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed training csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("training csv is missing column {0:?}")]
    MissingColumn(&'static str),
    #[error("row {row}: invalid label {value:?}")]
    InvalidLabel { row: usize, value: String },
    #[error("row {row}: {source}")]
    InvalidValue { row: usize, source: EncodeError },
    #[error("training csv has no rows")]
    Empty,
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact io: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact format: {0}")]
    Format(#[from] serde_json::Error),
    #[error("artifact schema mismatch: {0}")]
    SchemaMismatch(String),
}

/// Everything that can go wrong while bringing the model to the ready state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Training(#[from] TrainingDataError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Failures of a single assessment request.
#[derive(Debug, Error)]
pub enum AssessError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Model(#[from] ModelError),
}
