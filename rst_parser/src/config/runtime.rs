// RUNTIME PREFERENCES (search shape and logging)

use super::compile_time::search::{MAX_ACTIONS_PER_STATE, MAX_BEAM_WIDTH, MAX_N_BEST, MAX_STEPS_CEILING};
use crate::logging::{codes, Code, LogLevel};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Runtime configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cannot read configuration file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid TOML configuration: {message}")]
    Toml { message: String },
}

impl ConfigError {
    pub fn invalid_value(field: &'static str, value: impl ToString, reason: &str) -> Self {
        Self::InvalidValue {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Get error code for the logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidValue { .. } => codes::config::INVALID_VALUE,
            Self::Io { .. } => codes::config::CONFIG_IO_ERROR,
            Self::Toml { .. } => codes::config::INVALID_TOML,
        }
    }
}

/// Shape of the beam search.
///
/// `max_acts` is the branching factor per expanded state, `max_states` the
/// beam width and `n_best` the number of completed trees to return. The
/// greedy parser is `max_acts = max_states = n_best = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub max_acts: usize,
    pub max_states: usize,
    pub n_best: usize,
    /// Optional ceiling on the per-state step counter. A popped state past
    /// this ceiling ends the search.
    pub max_steps: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_acts: env::var("RST_MAX_ACTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            max_states: env::var("RST_MAX_STATES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            n_best: env::var("RST_N_BEST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            max_steps: env::var("RST_MAX_STEPS").ok().and_then(|v| v.parse().ok()),
        }
    }
}

impl ParserConfig {
    /// Greedy configuration, independent of the environment
    pub fn greedy() -> Self {
        Self {
            max_acts: 1,
            max_states: 1,
            n_best: 1,
            max_steps: None,
        }
    }

    pub fn with_beam(max_acts: usize, max_states: usize, n_best: usize) -> Self {
        Self {
            max_acts,
            max_states,
            n_best,
            max_steps: None,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Check values against the compile-time ceilings
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("max_acts", self.max_acts, MAX_ACTIONS_PER_STATE)?;
        check_range("max_states", self.max_states, MAX_BEAM_WIDTH)?;
        check_range("n_best", self.n_best, MAX_N_BEST)?;
        if let Some(steps) = self.max_steps {
            check_range("max_steps", steps, MAX_STEPS_CEILING)?;
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: usize, ceiling: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::invalid_value(field, value, "must be at least 1"));
    }
    if value > ceiling {
        return Err(ConfigError::invalid_value(
            field,
            value,
            &format!("exceeds compile-time ceiling {}", ceiling),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var("RST_LOGGING_USE_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var("RST_LOGGING_MIN_LEVEL")
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub parser: ParserConfig,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; missing sections fall back to the defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content).map_err(|e| ConfigError::Toml {
            message: e.to_string(),
        })?;
        config.parser.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    pub const MAX_ACTS: &str = "RST_MAX_ACTS";
    pub const MAX_STATES: &str = "RST_MAX_STATES";
    pub const N_BEST: &str = "RST_N_BEST";
    pub const MAX_STEPS: &str = "RST_MAX_STEPS";
    pub const LOGGING_USE_STRUCTURED: &str = "RST_LOGGING_USE_STRUCTURED";
    pub const LOGGING_MIN_LEVEL: &str = "RST_LOGGING_MIN_LEVEL";
}
