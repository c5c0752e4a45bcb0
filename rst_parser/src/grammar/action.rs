//! Shift-reduce actions and their `"<type>:<label>"` text form

use crate::logging::{codes, Code};
use std::fmt;
use std::str::FromStr;

/// Label carried by every shift in the text form
pub const SHIFT_LABEL: &str = "text";

/// Label of the unique finishing reduce
pub const ROOT_LABEL: &str = "ROOT";

/// Prefix marking a nucleus-bearing constituent
pub const NUCLEUS_PREFIX: &str = "nucleus:";

/// Suffix marking a still-open partial constituent of a binarized rule
pub const PARTIAL_MARKER: char = '*';

/// Check whether a label is a still-open partial constituent
pub fn is_partial(label: &str) -> bool {
    label.ends_with(PARTIAL_MARKER)
}

/// Check whether a label can supply the head of a binary reduce
pub fn is_head_bearing(label: &str) -> bool {
    label.starts_with(NUCLEUS_PREFIX) || is_partial(label)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    Shift,
    Unary,
    Binary,
}

impl ActionType {
    pub fn letter(&self) -> char {
        match self {
            ActionType::Shift => 'S',
            ActionType::Unary => 'U',
            ActionType::Binary => 'B',
        }
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'S' => Some(ActionType::Shift),
            'U' => Some(ActionType::Unary),
            'B' => Some(ActionType::Binary),
            _ => None,
        }
    }
}

/// A transition of the parser.
///
/// Equality is by (type, label), so `Unary("x") != Binary("x")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Shift,
    Unary(String),
    Binary(String),
}

impl Action {
    pub fn unary(label: &str) -> Self {
        Action::Unary(label.to_string())
    }

    pub fn binary(label: &str) -> Self {
        Action::Binary(label.to_string())
    }

    pub fn root() -> Self {
        Action::Binary(ROOT_LABEL.to_string())
    }

    pub fn action_type(&self) -> ActionType {
        match self {
            Action::Shift => ActionType::Shift,
            Action::Unary(_) => ActionType::Unary,
            Action::Binary(_) => ActionType::Binary,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Action::Shift => SHIFT_LABEL,
            Action::Unary(label) | Action::Binary(label) => label,
        }
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, Action::Unary(_))
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Action::Binary(label) if label == ROOT_LABEL)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.action_type().letter(), self.label())
    }
}

/// Errors raised while reading an action label
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionParseError {
    #[error("Malformed action label '{label}': expected <S|U|B>:<label>")]
    Malformed { label: String },

    #[error("Unknown action type '{letter}' in label '{label}'")]
    UnknownType { letter: char, label: String },

    #[error("Shift actions must carry the label 'text', found '{label}'")]
    ShiftLabel { label: String },
}

impl ActionParseError {
    pub fn error_code(&self) -> Code {
        codes::scorer::MALFORMED_ACTION_LABEL
    }
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || ActionParseError::Malformed {
            label: text.to_string(),
        };

        let mut chars = text.chars();
        let letter = chars.next().ok_or_else(malformed)?;
        if chars.next() != Some(':') {
            return Err(malformed());
        }
        let label = chars.as_str();
        if label.is_empty() {
            return Err(malformed());
        }

        match ActionType::from_letter(letter) {
            Some(ActionType::Shift) if label == SHIFT_LABEL => Ok(Action::Shift),
            Some(ActionType::Shift) => Err(ActionParseError::ShiftLabel {
                label: label.to_string(),
            }),
            Some(ActionType::Unary) => Ok(Action::Unary(label.to_string())),
            Some(ActionType::Binary) => Ok(Action::Binary(label.to_string())),
            None => Err(ActionParseError::UnknownType {
                letter,
                label: text.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_text_form() {
        assert_eq!(Action::Shift.to_string(), "S:text");
        assert_eq!(Action::unary("nucleus:span").to_string(), "U:nucleus:span");
        assert_eq!(Action::root().to_string(), "B:ROOT");
    }

    #[test]
    fn test_parse_splits_at_first_separator() {
        assert_eq!("S:text".parse::<Action>(), Ok(Action::Shift));
        assert_eq!(
            "B:nucleus:elaboration".parse::<Action>(),
            Ok(Action::binary("nucleus:elaboration"))
        );
        assert_eq!("U:satellite:attribution*".parse::<Action>().map(|a| a.is_unary()), Ok(true));
        assert!("B:ROOT".parse::<Action>().unwrap().is_root());
    }

    #[test]
    fn test_malformed_labels_rejected() {
        assert_matches!("".parse::<Action>(), Err(ActionParseError::Malformed { .. }));
        assert_matches!("S".parse::<Action>(), Err(ActionParseError::Malformed { .. }));
        assert_matches!("Sx:text".parse::<Action>(), Err(ActionParseError::Malformed { .. }));
        assert_matches!("U:".parse::<Action>(), Err(ActionParseError::Malformed { .. }));
        assert_matches!(
            "X:span".parse::<Action>(),
            Err(ActionParseError::UnknownType { letter: 'X', .. })
        );
        assert_matches!("S:span".parse::<Action>(), Err(ActionParseError::ShiftLabel { .. }));
    }

    #[test]
    fn test_equality_is_by_type_and_label() {
        assert_ne!(Action::unary("span"), Action::binary("span"));
        assert_eq!(Action::binary("span"), "B:span".parse().unwrap());
    }

    #[test]
    fn test_label_predicates() {
        assert!(is_head_bearing("nucleus:span"));
        assert!(is_head_bearing("satellite:list*"));
        assert!(!is_head_bearing("satellite:list"));
        assert!(!is_head_bearing("nucleus"));
        assert!(is_partial("ROOT*"));
        assert!(!is_partial("text"));
    }
}
