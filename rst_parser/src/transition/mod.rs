//! Shift-reduce transition system: parser states, the legal-move filter
//! and the tree builder

mod builder;
mod error;
mod state;
mod validity;

pub use builder::apply_action;
pub use error::TransitionError;
pub use state::ParserState;
pub use validity::is_valid_action;
