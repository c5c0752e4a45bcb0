use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::grammar::Action;
use crate::logging::{codes, Code};
use crate::scorer::ScorerError;
use crate::transition::TransitionError;

/// Errors that abort the search for one document
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("Gold action sequence exhausted before the tree was complete; state: {state}")]
    GoldActionsExhausted { state: String },

    #[error("Invalid gold action at position {position} ('{label}'): {reason}")]
    InvalidGoldAction {
        position: usize,
        label: String,
        reason: String,
    },

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Scorer(#[from] ScorerError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ParseError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::GoldActionsExhausted { .. } => codes::search::GOLD_ACTIONS_EXHAUSTED,
            Self::InvalidGoldAction { .. } => codes::search::INVALID_GOLD_ACTION,
            Self::Transition(e) => e.error_code(),
            Self::Scorer(e) => e.error_code(),
            Self::Document(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }

    pub fn requires_halt(&self) -> bool {
        match self {
            Self::Transition(e) => e.requires_halt(),
            Self::Scorer(e) => e.requires_halt(),
            Self::Document(e) => !e.is_recoverable(),
            _ => codes::requires_halt(self.error_code().as_str()),
        }
    }
}

/// Parse a gold derivation given as `"<S|U|B>:<label>"` strings
pub fn parse_gold_actions<S: AsRef<str>>(labels: &[S]) -> Result<Vec<Action>, ParseError> {
    labels
        .iter()
        .enumerate()
        .map(|(position, label)| {
            let label = label.as_ref().trim();
            label
                .parse::<Action>()
                .map_err(|e| ParseError::InvalidGoldAction {
                    position,
                    label: label.to_string(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_gold_actions_parsed() {
        let actions = parse_gold_actions(&["S:text", "U:nucleus:span", " B:ROOT "]).unwrap();
        assert_eq!(actions, vec![Action::Shift, Action::unary("nucleus:span"), Action::root()]);
    }

    #[test]
    fn test_gold_shift_must_be_text() {
        let err = parse_gold_actions(&["S:text", "S:word"]).unwrap_err();
        assert_matches!(err, ParseError::InvalidGoldAction { position: 1, .. });
        assert_eq!(err.error_code(), codes::search::INVALID_GOLD_ACTION);
    }

    #[test]
    fn test_wrapped_codes_preserved() {
        let err = ParseError::from(TransitionError::EmptyQueue);
        assert_eq!(err.error_code(), codes::search::EMPTY_QUEUE_SHIFT);
        assert_eq!(err.to_string(), "Shift with an empty queue");

        let err = ParseError::from(ScorerError::NoActionLabels);
        assert_eq!(err.error_code(), codes::scorer::NO_ACTION_LABELS);
    }

    #[test]
    fn test_halting_follows_wrapped_error() {
        assert!(ParseError::from(TransitionError::EmptyQueue).requires_halt());
        assert!(ParseError::from(ScorerError::ArityMismatch { expected: 4, actual: 3 }).requires_halt());
        assert!(!ParseError::from(DocumentError::EmptyEdu { index: 0 }).requires_halt());
        assert!(!ParseError::GoldActionsExhausted { state: String::new() }.requires_halt());
    }
}
