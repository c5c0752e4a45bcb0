use crate::logging::{codes, Code};

/// Failures while applying an action to a parser configuration.
///
/// In decoding mode the validity filter rules all of these out; they are
/// reachable only through gold actions or a broken invariant.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransitionError {
    #[error("Binary reduce '{label}' has no head: left child '{left}', right child '{right}'")]
    InvalidReduce {
        label: String,
        left: String,
        right: String,
    },

    #[error("Action {action} needs more stack items (stack length {stack_len})")]
    StackUnderflow { action: String, stack_len: usize },

    #[error("Shift with an empty queue")]
    EmptyQueue,

    #[error("Completed tree does not start with the LEFTWALL sentinel: {tree}")]
    SentinelMissing { tree: String },
}

impl TransitionError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidReduce { .. } => codes::search::HEADLESS_REDUCE,
            Self::StackUnderflow { .. } => codes::search::STACK_UNDERFLOW,
            Self::EmptyQueue => codes::search::EMPTY_QUEUE_SHIFT,
            Self::SentinelMissing { .. } => codes::search::SENTINEL_MISSING,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}
