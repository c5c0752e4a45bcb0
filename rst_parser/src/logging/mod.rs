//! Logging module for the RST parser
//!
//! Coded log events, pluggable backends, and macros. There is no global
//! logger: a [`LoggingService`] is passed to every component that logs.

pub mod codes;
pub mod events;
#[macro_use]
pub mod macros;
pub mod service;

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    create_test_logger, ConsoleLogger, EventSummary, LogCrateLogger, Logger, LoggingService,
    MemoryLogger, NullLogger, StructuredLogger,
};
