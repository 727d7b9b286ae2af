//! Error types for artifact loading, feature building and inference.
//!
//! Every failure the crate can produce is a [`PredictorError`]. Errors are
//! grouped into an [`ErrorClass`] so the presentation layer can decide how to
//! react: fatal start-up errors abort, request-scoped errors become an inline
//! message and the session stays usable.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::serialization::ArtifactKind;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PredictorError>;

/// Pipeline stage that rejected a vector of the wrong width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Encoder,
    Scaler,
    Classifier,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Encoder => write!(f, "encoder"),
            Stage::Scaler => write!(f, "scaler"),
            Stage::Classifier => write!(f, "classifier"),
        }
    }
}

/// How an error should be treated by whoever called into the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Start-up cannot continue (missing artifact, unreadable dataset, bad config).
    Fatal,
    /// The user supplied something the model cannot score.
    UserInput,
    /// Artifacts disagree with each other or with the feature layout.
    Systemic,
    /// A fitted object produced a value that should be impossible.
    Defect,
}

/// Why an artifact file could not be turned into a usable object.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("file not found")]
    Missing,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not an artifact file (bad magic bytes)")]
    BadMagic,

    #[error("artifact holds a {found}, expected a {expected}")]
    WrongKind {
        expected: ArtifactKind,
        found: ArtifactKind,
    },

    #[error("unsupported format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("corrupt payload: {0}")]
    Corrupt(String),

    #[error("inconsistent parameters: {0}")]
    Invalid(String),

    #[error("positive class {label} is not among classifier classes {classes:?}")]
    MissingPositiveClass { label: i64, classes: Vec<i64> },
}

/// Failure to load one of the three artifacts. Always fatal.
#[derive(Debug, Error)]
#[error("failed to load {kind} artifact from {}: {reason}", .path.display())]
pub struct ArtifactLoadError {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    #[source]
    pub reason: LoadFailure,
}

impl ArtifactLoadError {
    pub fn new(kind: ArtifactKind, path: impl Into<PathBuf>, reason: LoadFailure) -> Self {
        Self {
            kind,
            path: path.into(),
            reason,
        }
    }
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error(transparent)]
    ArtifactLoad(#[from] ArtifactLoadError),

    #[error("unknown {column} '{value}': not seen when the encoder was fitted")]
    UnknownCategory { column: String, value: String },

    #[error("{stage} expected {expected} features, got {got}")]
    ShapeMismatch {
        stage: Stage,
        expected: usize,
        got: usize,
    },

    #[error("feature columns {got:?} do not match the encoder's {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("classifier produced an invalid probability: {0}")]
    InvalidProbability(f64),

    #[error("non-finite value after {stage}")]
    NonFinite { stage: Stage },

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("empty data: {0}")]
    EmptyData(String),

    #[error("failed to read dataset {}: {reason}", .path.display())]
    Dataset { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PredictorError {
    /// Classify the error for logging and presentation.
    pub fn class(&self) -> ErrorClass {
        match self {
            PredictorError::UnknownCategory { .. } | PredictorError::InvalidInput { .. } => {
                ErrorClass::UserInput
            }
            PredictorError::ShapeMismatch { .. } | PredictorError::SchemaMismatch { .. } => {
                ErrorClass::Systemic
            }
            PredictorError::InvalidProbability(_) | PredictorError::NonFinite { .. } => {
                ErrorClass::Defect
            }
            PredictorError::ArtifactLoad(_)
            | PredictorError::InvalidParameter(_)
            | PredictorError::EmptyData(_)
            | PredictorError::Dataset { .. }
            | PredictorError::Config(_)
            | PredictorError::Serialization(_)
            | PredictorError::Io(_) => ErrorClass::Fatal,
        }
    }

    /// Text suitable for an inline message next to the prediction form.
    ///
    /// User-input errors are shown verbatim; anything else collapses into a
    /// generic message since the details only matter in the logs.
    pub fn user_message(&self) -> String {
        match self.class() {
            ErrorClass::UserInput => self.to_string(),
            ErrorClass::Systemic => {
                "Prediction unavailable: the model files are out of sync. Please report this."
                    .to_string()
            }
            ErrorClass::Defect => {
                "Prediction failed unexpectedly. Please try again or report this.".to_string()
            }
            ErrorClass::Fatal => format!("Predictor could not start: {}", self),
        }
    }
}

impl From<bincode::Error> for PredictorError {
    fn from(err: bincode::Error) -> Self {
        PredictorError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for PredictorError {
    fn from(err: serde_json::Error) -> Self {
        PredictorError::Serialization(err.to_string())
    }
}
