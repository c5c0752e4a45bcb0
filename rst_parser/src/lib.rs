// Internal modules
#[macro_use]
pub mod logging;

pub mod batch;
pub mod config;
pub mod document;
pub mod features;
pub mod grammar;
pub mod pipeline;
pub mod scorer;
pub mod search;
pub mod transition;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use config::{ParserConfig, RuntimeConfig};
pub use document::{Document, EduBoundary, Token};
pub use grammar::{Action, DiscourseTree};
pub use pipeline::{ParseOutput, PipelineError};
pub use scorer::{ActionScorer, LinearModel, ScorerError};
pub use search::{ParseError, ScoredTree, ShiftReduceParser, TrainingExample, TrainingRun};
