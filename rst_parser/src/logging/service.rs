//! Logging service and logger backends

use super::codes::Code;
use super::events::{LogEvent, LogLevel};
use crate::config::LoggingPreferences;
use std::sync::{Arc, Mutex, MutexGuard};

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Logging service handed to the parser, pipeline and batch processor.
///
/// The service is cheap to clone; clones share the same backend.
#[derive(Clone)]
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    /// Create new logging service with specified logger and minimum level
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create a console or structured service from user preferences
    pub fn from_preferences(preferences: &LoggingPreferences) -> Self {
        let min_level = preferences.min_log_level;
        let logger: Arc<dyn Logger> = if preferences.use_structured_logging {
            Arc::new(StructuredLogger::new(min_level))
        } else {
            Arc::new(ConsoleLogger::new(min_level))
        };
        Self::new(logger, min_level)
    }

    /// Service that forwards every event to the `log` facade
    pub fn log_crate(min_level: LogLevel) -> Self {
        Self::new(Arc::new(LogCrateLogger), min_level)
    }

    /// Service that drops every event
    pub fn disabled() -> Self {
        Self::new(Arc::new(NullLogger), LogLevel::Error)
    }

    /// Check if level should be logged
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    /// Log an event
    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

    /// Convenience method: log error with context
    pub fn log_error_with_context(
        &self,
        error_code: Code,
        message: &str,
        context: Vec<(&str, &str)>,
    ) {
        let mut event = LogEvent::error(error_code, message);
        for (key, value) in context {
            event = event.with_context(key, value);
        }
        self.log_event(event);
    }

    pub fn log_info(&self, message: &str) {
        self.log_event(LogEvent::info(message));
    }

    pub fn log_success(&self, success_code: Code, message: &str) {
        self.log_event(LogEvent::success(success_code, message));
    }

    pub fn log_warning(&self, message: &str) {
        self.log_event(LogEvent::warning(message));
    }

    pub fn log_warning_with_code(&self, warning_code: Code, message: &str) {
        self.log_event(LogEvent::warning_with_code(warning_code, message));
    }

    pub fn log_debug(&self, message: &str) {
        self.log_event(LogEvent::debug(message));
    }
}

impl std::fmt::Debug for LoggingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingService")
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

/// Human-readable logger writing to stderr
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level > self.min_level {
            return;
        }
        if event.is_error() && self.min_level == LogLevel::Debug {
            eprintln!("{}", event.format_detailed());
        } else {
            eprintln!("{}", event.format());
        }
    }
}

/// Structured logger for JSON output and better tooling integration
pub struct StructuredLogger {
    min_level: LogLevel,
}

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            // stdout carries parse results, so diagnostics always go to stderr
            match event.format_json() {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", event.format()),
            }
        }
    }
}

/// Bridge into the `log` facade so binaries can pick their own backend
pub struct LogCrateLogger;

impl Logger for LogCrateLogger {
    fn log(&self, event: &LogEvent) {
        let level = match event.level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        };
        if event.context.is_empty() {
            log::log!(target: "rst_parser", level, "{}", event.format());
        } else {
            let mut pairs: Vec<String> = event
                .context
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            pairs.sort();
            log::log!(target: "rst_parser", level, "{} {{{}}}", event.format(), pairs.join(", "));
        }
    }
}

pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// Memory logger for testing
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.lock().iter().filter(|e| e.is_error()).cloned().collect()
    }

    pub fn get_warnings(&self) -> Vec<LogEvent> {
        self.lock().iter().filter(|e| e.is_warning()).cloned().collect()
    }

    pub fn get_events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.lock()
            .iter()
            .filter(|e| e.code == code)
            .cloned()
            .collect()
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_error() && e.code == code)
    }

    pub fn has_warning_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_warning() && e.code == code)
    }

    pub fn has_success_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_info() && e.code == code)
    }

    pub fn get_summary(&self) -> EventSummary {
        let events = self.lock();
        EventSummary {
            total_count: events.len(),
            error_count: events.iter().filter(|e| e.is_error()).count(),
            warning_count: events.iter().filter(|e| e.is_warning()).count(),
            info_count: events.iter().filter(|e| e.is_info()).count(),
            debug_count: events.iter().filter(|e| e.is_debug()).count(),
        }
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        self.lock().push(event.clone());
    }
}

/// Summary of events in memory logger
#[derive(Debug, Clone)]
pub struct EventSummary {
    pub total_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub debug_count: usize,
}

impl EventSummary {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }
}

/// Create testing logger (memory-based, all events captured)
pub fn create_test_logger() -> (LoggingService, Arc<MemoryLogger>) {
    let memory = Arc::new(MemoryLogger::new());
    let service = LoggingService::new(memory.clone(), LogLevel::Debug);
    (service, memory)
}
