//! Search driver: decoding with a scorer and gold-derivation replay

mod driver;
mod error;
mod result;

pub use driver::ShiftReduceParser;
pub use error::{parse_gold_actions, ParseError};
pub use result::{ScoredTree, SearchResult, SearchStats, TrainingExample, TrainingRun};
