//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
}

/// Configuration error codes
pub mod config {
    use super::Code;

    pub const INVALID_VALUE: Code = Code::new("E001");
    pub const CONFIG_IO_ERROR: Code = Code::new("E002");
    pub const INVALID_TOML: Code = Code::new("E003");
}

/// Document input error codes
pub mod document {
    use super::Code;

    pub const DOCUMENT_IO_ERROR: Code = Code::new("E010");
    pub const INVALID_DOCUMENT_FORMAT: Code = Code::new("E011");
    pub const EMPTY_EDU: Code = Code::new("E012");
    pub const DOCUMENT_TOO_LARGE: Code = Code::new("E013");
    pub const BOUNDARY_TABLE_MISMATCH: Code = Code::new("E014");
    pub const BLANK_INPUT: Code = Code::new("W010");
}

/// Action scorer error codes
pub mod scorer {
    use super::Code;

    pub const MODEL_IO_ERROR: Code = Code::new("E020");
    pub const INVALID_MODEL_FORMAT: Code = Code::new("E021");
    pub const MALFORMED_ACTION_LABEL: Code = Code::new("E022");
    pub const SCORE_ARITY_MISMATCH: Code = Code::new("E023");
    pub const NO_ACTION_LABELS: Code = Code::new("E024");
}

/// Transition system and search error codes
pub mod search {
    use super::Code;

    pub const GOLD_ACTIONS_EXHAUSTED: Code = Code::new("E040");
    pub const INVALID_GOLD_ACTION: Code = Code::new("E041");
    pub const HEADLESS_REDUCE: Code = Code::new("E042");
    pub const STACK_UNDERFLOW: Code = Code::new("E043");
    pub const EMPTY_QUEUE_SHIFT: Code = Code::new("E044");
    pub const SENTINEL_MISSING: Code = Code::new("E045");
    pub const FLAT_TREE_FALLBACK: Code = Code::new("W040");
    pub const STEP_CEILING_REACHED: Code = Code::new("W041");
}

/// Pipeline output error codes
pub mod pipeline {
    use super::Code;

    pub const OUTPUT_ERROR: Code = Code::new("E050");
}

/// Batch processing error codes
pub mod batch {
    use super::Code;

    pub const TOO_MANY_DOCUMENTS: Code = Code::new("E060");
    pub const WORKER_FAILURE: Code = Code::new("E061");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const DOCUMENT_LOADED: Code = Code::new("I010");
    pub const MODEL_LOADED: Code = Code::new("I020");
    pub const TREE_COMPLETED: Code = Code::new("I040");
    pub const SEARCH_COMPLETED: Code = Code::new("I041");
    pub const TRAINING_EXAMPLES_EXTRACTED: Code = Code::new("I042");
    pub const DOCUMENT_PARSED: Code = Code::new("I050");
    pub const BATCH_COMPLETED: Code = Code::new("I060");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

const REGISTERED: &[ErrorMetadata] = &[
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal system error",
        "File a bug report with the offending input",
    ),
    // Configuration
    ErrorMetadata::new(
        "E001",
        "Configuration",
        Severity::High,
        false,
        true,
        "Configuration value out of range",
        "Use values between 1 and the compile-time ceiling",
    ),
    ErrorMetadata::new(
        "E002",
        "Configuration",
        Severity::High,
        false,
        true,
        "Configuration file could not be read",
        "Check the configuration path and permissions",
    ),
    ErrorMetadata::new(
        "E003",
        "Configuration",
        Severity::High,
        false,
        true,
        "Configuration file is not valid TOML",
        "Fix the TOML syntax or field types",
    ),
    // Document input
    ErrorMetadata::new(
        "E010",
        "Document",
        Severity::Medium,
        true,
        false,
        "Document file could not be read",
        "Check the input path and permissions",
    ),
    ErrorMetadata::new(
        "E011",
        "Document",
        Severity::Medium,
        true,
        false,
        "Document is not valid segmented-document JSON",
        "Provide edu_tokens and edu_start_indices fields",
    ),
    ErrorMetadata::new(
        "E012",
        "Document",
        Severity::Medium,
        true,
        false,
        "Document contains an EDU without tokens",
        "Re-run segmentation; every EDU needs at least one token",
    ),
    ErrorMetadata::new(
        "E013",
        "Document",
        Severity::Medium,
        true,
        false,
        "Document exceeds compile-time input limits",
        "Split the document or raise the limits in the build profile",
    ),
    ErrorMetadata::new(
        "E014",
        "Document",
        Severity::Medium,
        true,
        false,
        "Sentence-boundary table does not cover every EDU",
        "Regenerate edu_start_indices together with edu_tokens",
    ),
    ErrorMetadata::new(
        "W010",
        "Document",
        Severity::Low,
        true,
        false,
        "Input contained no non-whitespace characters",
        "No action required; the document yields no trees",
    ),
    // Scorer
    ErrorMetadata::new(
        "E020",
        "Scorer",
        Severity::High,
        false,
        true,
        "Model file could not be read",
        "Check the model path",
    ),
    ErrorMetadata::new(
        "E021",
        "Scorer",
        Severity::High,
        false,
        true,
        "Model file is malformed",
        "Re-export the model weights",
    ),
    ErrorMetadata::new(
        "E022",
        "Scorer",
        Severity::High,
        false,
        true,
        "Action label is not of the form <S|U|B>:<label>",
        "Re-export the model with valid action labels",
    ),
    ErrorMetadata::new(
        "E023",
        "Scorer",
        Severity::High,
        false,
        true,
        "Scorer returned a score vector of the wrong length",
        "Check that the scorer labels match its output",
    ),
    ErrorMetadata::new(
        "E024",
        "Scorer",
        Severity::High,
        false,
        true,
        "Scorer exposes no action labels",
        "Load a trained model before parsing",
    ),
    // Search
    ErrorMetadata::new(
        "E040",
        "Search",
        Severity::High,
        true,
        false,
        "Gold action sequence ran out before the parse completed",
        "Check the gold derivation for this document",
    ),
    ErrorMetadata::new(
        "E041",
        "Search",
        Severity::High,
        true,
        false,
        "Gold action is not applicable to the parser state",
        "Check the gold derivation for this document",
    ),
    ErrorMetadata::new(
        "E042",
        "Search",
        Severity::Critical,
        false,
        true,
        "Binary reduce without a nucleus or partial child",
        "Internal invariant violation; file a bug report",
    ),
    ErrorMetadata::new(
        "E043",
        "Search",
        Severity::Critical,
        false,
        true,
        "Reduce attempted with too few stack items",
        "Internal invariant violation; file a bug report",
    ),
    ErrorMetadata::new(
        "E044",
        "Search",
        Severity::Critical,
        false,
        true,
        "Shift attempted with an empty queue",
        "Internal invariant violation; file a bug report",
    ),
    ErrorMetadata::new(
        "E045",
        "Search",
        Severity::Critical,
        false,
        true,
        "Completed tree does not start with the LEFTWALL sentinel",
        "Internal invariant violation; file a bug report",
    ),
    ErrorMetadata::new(
        "W040",
        "Search",
        Severity::Low,
        true,
        false,
        "No complete parse found; using a flat tree",
        "Consider a wider beam",
    ),
    ErrorMetadata::new(
        "W041",
        "Search",
        Severity::Low,
        true,
        false,
        "Search stopped at the configured step ceiling",
        "Raise max_steps if truncated results are unexpected",
    ),
    // Pipeline
    ErrorMetadata::new(
        "E050",
        "Pipeline",
        Severity::Medium,
        true,
        false,
        "Parse output could not be serialized or written",
        "Check the output directory and permissions",
    ),
    // Batch
    ErrorMetadata::new(
        "E060",
        "Batch",
        Severity::Medium,
        true,
        false,
        "Too many documents for a single batch",
        "Split the input into smaller batches",
    ),
    ErrorMetadata::new(
        "E061",
        "Batch",
        Severity::High,
        false,
        false,
        "Batch worker thread failed",
        "Re-run the batch sequentially to isolate the document",
    ),
];

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTERED
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
