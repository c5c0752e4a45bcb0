// build.rs - TOML-driven compile-time constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    input: InputLimits,
    search: SearchLimits,
    scorer: ScorerLimits,
    batch_processing: BatchProcessingLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct InputLimits {
    max_document_bytes: u64,
    max_edus_per_document: usize,
    max_tokens_per_edu: usize,
}

#[derive(serde::Deserialize)]
struct SearchLimits {
    max_beam_width: usize,
    max_actions_per_state: usize,
    max_n_best: usize,
    max_steps_ceiling: usize,
    max_consecutive_unary: usize,
}

#[derive(serde::Deserialize)]
struct ScorerLimits {
    max_model_bytes: u64,
    max_action_labels: usize,
}

#[derive(serde::Deserialize)]
struct BatchProcessingLimits {
    max_worker_threads: usize,
    max_documents_per_batch: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_log_message_length: usize,
    max_state_items_in_diagnostics: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RST_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=RST_CONFIG_DIR");

    let profile = env::var("RST_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("RST_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    println!("cargo:rustc-env=RST_BUILD_PROFILE={}", profile);
    println!("cargo:rustc-env=RST_CONFIG_DIR={}", config_dir);

    // Find workspace root (parent of rst_parser directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_constraints(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_constraints(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_DOCUMENT_BYTES: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_BEAM_WIDTH: usize = 100_000;

    if config.input.max_document_bytes > ABSOLUTE_MAX_DOCUMENT_BYTES {
        panic!("LIMITS: max_document_bytes exceeds absolute maximum");
    }

    if config.search.max_beam_width > ABSOLUTE_MAX_BEAM_WIDTH {
        panic!("LIMITS: max_beam_width exceeds absolute maximum");
    }

    if config.search.max_beam_width == 0
        || config.search.max_actions_per_state == 0
        || config.search.max_n_best == 0
    {
        panic!("LIMITS: search ceilings must be at least 1");
    }

    // The transition grammar allows at most two consecutive unary reduces.
    if config.search.max_consecutive_unary != 2 {
        panic!("LIMITS: max_consecutive_unary is fixed by the discourse grammar (2)");
    }

    if profile == "production" && config.search.max_beam_width > 1_000 {
        panic!("PRODUCTION: max_beam_width too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod input {{
        pub const MAX_DOCUMENT_BYTES: u64 = {};
        pub const MAX_EDUS_PER_DOCUMENT: usize = {};
        pub const MAX_TOKENS_PER_EDU: usize = {};
    }}

    pub mod search {{
        pub const MAX_BEAM_WIDTH: usize = {};
        pub const MAX_ACTIONS_PER_STATE: usize = {};
        pub const MAX_N_BEST: usize = {};
        pub const MAX_STEPS_CEILING: usize = {};
        pub const MAX_CONSECUTIVE_UNARY: usize = {};
    }}

    pub mod scorer {{
        pub const MAX_MODEL_BYTES: u64 = {};
        pub const MAX_ACTION_LABELS: usize = {};
    }}

    pub mod batch_processing {{
        pub const MAX_WORKER_THREADS: usize = {};
        pub const MAX_DOCUMENTS_PER_BATCH: usize = {};
    }}

    pub mod logging {{
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_STATE_ITEMS_IN_DIAGNOSTICS: usize = {};
    }}
}}
"#,
        profile,
        // Input
        config.input.max_document_bytes,
        config.input.max_edus_per_document,
        config.input.max_tokens_per_edu,
        // Search
        config.search.max_beam_width,
        config.search.max_actions_per_state,
        config.search.max_n_best,
        config.search.max_steps_ceiling,
        config.search.max_consecutive_unary,
        // Scorer
        config.scorer.max_model_bytes,
        config.scorer.max_action_labels,
        // Batch Processing
        config.batch_processing.max_worker_threads,
        config.batch_processing.max_documents_per_batch,
        // Logging
        config.logging.max_log_message_length,
        config.logging.max_state_items_in_diagnostics,
    );

    fs::write(output_path, constants_code).unwrap();
}
