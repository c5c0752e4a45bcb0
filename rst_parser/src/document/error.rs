use crate::logging::{codes, Code};

/// Errors raised while loading or validating a segmented document
#[derive(Debug, Clone, thiserror::Error)]
pub enum DocumentError {
    #[error("Cannot read document {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid document format: {message}")]
    InvalidFormat { message: String },

    #[error("EDU {index} has no tokens")]
    EmptyEdu { index: usize },

    #[error("Document too large: {what} is {size} (max: {max})")]
    TooLarge {
        what: &'static str,
        size: u64,
        max: u64,
    },

    #[error("Sentence-boundary table has {entries} entries for {edus} EDUs")]
    BoundaryMismatch { edus: usize, entries: usize },
}

impl DocumentError {
    pub fn io(path: &std::path::Path, error: &std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    pub fn invalid_format(message: &str) -> Self {
        Self::InvalidFormat {
            message: message.to_string(),
        }
    }

    pub fn too_large(what: &'static str, size: u64, max: u64) -> Self {
        Self::TooLarge { what, size, max }
    }

    /// Get error code for the logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::Io { .. } => codes::document::DOCUMENT_IO_ERROR,
            Self::InvalidFormat { .. } => codes::document::INVALID_DOCUMENT_FORMAT,
            Self::EmptyEdu { .. } => codes::document::EMPTY_EDU,
            Self::TooLarge { .. } => codes::document::DOCUMENT_TOO_LARGE,
            Self::BoundaryMismatch { .. } => codes::document::BOUNDARY_TABLE_MISMATCH,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}
