use super::error::PipelineError;
use crate::document::Document;
use crate::search::{ScoredTree, TrainingExample};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-document parse record as written by the CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutput {
    pub doc_id: String,
    pub edu_tokens: Vec<Vec<String>>,
    pub scored_rst_trees: Vec<ScoredTree>,
}

impl ParseOutput {
    pub fn new(document: &Document, scored_rst_trees: Vec<ScoredTree>) -> Self {
        Self {
            doc_id: document.id().to_string(),
            edu_tokens: document.edu_words(),
            scored_rst_trees,
        }
    }

    /// Record for blank input: no EDUs and no trees, only the id
    pub fn empty(document: &Document) -> Self {
        Self {
            doc_id: document.id().to_string(),
            edu_tokens: Vec::new(),
            scored_rst_trees: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, PipelineError> {
        serde_json::to_string(self).map_err(|e| PipelineError::output_error(&e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, PipelineError> {
        serde_json::to_string_pretty(self).map_err(|e| PipelineError::output_error(&e.to_string()))
    }

    /// Write each tree to `<input>_<rank>.parentedtree`, ranks starting at 1.
    ///
    /// Files hold the same single-line bracketed form as the `tree` field of
    /// the JSON record (e.g. `(ROOT (text 0) (text 1))`), not an NLTK
    /// `ParentedTree(...)` repr.
    pub fn write_parented_trees(&self, input_path: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        let mut written = Vec::with_capacity(self.scored_rst_trees.len());
        for (rank, scored) in (1..).zip(&self.scored_rst_trees) {
            let path = PathBuf::from(format!("{}_{}.parentedtree", input_path.display(), rank));
            fs::write(&path, format!("{}\n", scored.tree)).map_err(|e| {
                PipelineError::output_error(&format!("cannot write {}: {}", path.display(), e))
            })?;
            written.push(path);
        }
        Ok(written)
    }
}

/// One JSON object per line: `{"label": ..., "features": {...}}`
pub fn training_examples_to_json_lines(
    examples: &[TrainingExample],
) -> Result<String, PipelineError> {
    let mut lines = String::new();
    for example in examples {
        let line =
            serde_json::to_string(example).map_err(|e| PipelineError::output_error(&e.to_string()))?;
        lines.push_str(&line);
        lines.push('\n');
    }
    Ok(lines)
}
