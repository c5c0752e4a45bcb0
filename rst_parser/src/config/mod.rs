//! Configuration module for the RST parser
//! Compile-time limits are generated from the TOML profile by build.rs;
//! runtime preferences live in [`runtime`].

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{ConfigError, LoggingPreferences, ParserConfig, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("RST_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("RST_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_limits_are_usable() {
        assert!(compile_time::search::MAX_BEAM_WIDTH >= 1);
        assert!(compile_time::search::MAX_ACTIONS_PER_STATE >= 1);
        assert!(compile_time::search::MAX_N_BEST >= 1);
        assert_eq!(compile_time::search::MAX_CONSECUTIVE_UNARY, 2);
    }

    #[test]
    fn test_source_info_mentions_profile() {
        let info = super::build_info::source_info();
        assert!(info.contains(super::build_info::profile()));
        assert!(info.ends_with(".toml"));
    }
}
