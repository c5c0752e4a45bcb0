//! Transition grammar types: actions, stack nodes and discourse trees

pub mod action;
pub mod node;
pub mod tree;

pub use action::{Action, ActionParseError, ActionType, ROOT_LABEL, SHIFT_LABEL};
pub use node::{ChildHead, HeadList, Node};
pub use tree::{DiscourseTree, TreeFragment};
