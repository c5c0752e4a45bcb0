use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::logging::{codes, Code};
use crate::scorer::ScorerError;
use crate::search::ParseError;

/// Pipeline processing errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error("Document loading failed: {0}")]
    Document(#[from] DocumentError),

    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Model loading failed: {0}")]
    Scorer(#[from] ScorerError),

    #[error("Configuration failed: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {message}")]
    Output { message: String },
}

impl PipelineError {
    pub fn output_error(message: &str) -> Self {
        Self::Output {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Document(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
            Self::Scorer(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Output { .. } => codes::pipeline::OUTPUT_ERROR,
        }
    }

    /// True when every later document would fail the same way
    pub fn requires_halt(&self) -> bool {
        match self {
            Self::Document(e) => !e.is_recoverable(),
            Self::Parse(e) => e.requires_halt(),
            Self::Scorer(e) => e.requires_halt(),
            Self::Config(_) => codes::requires_halt(self.error_code().as_str()),
            Self::Output { .. } => false,
        }
    }
}
