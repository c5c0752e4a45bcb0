use crate::grammar::ActionParseError;
use crate::logging::{codes, Code};

/// Action scorer errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScorerError {
    #[error("Cannot read model {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid model: {message}")]
    InvalidModel { message: String },

    #[error("Invalid action label in model: {0}")]
    Label(#[from] ActionParseError),

    #[error("Scorer returned {actual} scores for {expected} action labels")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("Scorer exposes no action labels")]
    NoActionLabels,
}

impl ScorerError {
    pub fn invalid_model(message: &str) -> Self {
        Self::InvalidModel {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Io { .. } => codes::scorer::MODEL_IO_ERROR,
            Self::InvalidModel { .. } => codes::scorer::INVALID_MODEL_FORMAT,
            Self::Label(e) => e.error_code(),
            Self::ArityMismatch { .. } => codes::scorer::SCORE_ARITY_MISMATCH,
            Self::NoActionLabels => codes::scorer::NO_ACTION_LABELS,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}
