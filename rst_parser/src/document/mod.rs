//! Pre-segmented input documents
//!
//! A document is a list of EDUs, each a list of `[word, POS]` pairs, plus the
//! sentence-boundary table produced by the segmenter: one
//! `[sentence, token]` (or `[sentence, token, edu]`) entry per EDU.

mod error;
mod initializer;

pub use error::DocumentError;
pub use initializer::initialize_edus;

use crate::config::compile_time::input::{
    MAX_DOCUMENT_BYTES, MAX_EDUS_PER_DOCUMENT, MAX_TOKENS_PER_EDU,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A (word, POS) pair, serialized as a two-element array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Token {
    pub word: String,
    pub pos: String,
}

impl Token {
    pub fn new(word: &str, pos: &str) -> Self {
        Self {
            word: word.to_string(),
            pos: pos.to_string(),
        }
    }
}

impl From<(String, String)> for Token {
    fn from((word, pos): (String, String)) -> Self {
        Self { word, pos }
    }
}

impl From<Token> for (String, String) {
    fn from(token: Token) -> Self {
        (token.word, token.pos)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum BoundaryEntry {
    Pair(usize, usize),
    Triple(usize, usize, usize),
}

/// Start position of an EDU: the sentence it belongs to and the token
/// offset inside that sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BoundaryEntry", into = "BoundaryEntry")]
pub struct EduBoundary {
    pub sentence: usize,
    pub token: usize,
    pub edu: Option<usize>,
}

impl EduBoundary {
    pub fn new(sentence: usize, token: usize) -> Self {
        Self {
            sentence,
            token,
            edu: None,
        }
    }
}

impl From<BoundaryEntry> for EduBoundary {
    fn from(entry: BoundaryEntry) -> Self {
        match entry {
            BoundaryEntry::Pair(sentence, token) => Self {
                sentence,
                token,
                edu: None,
            },
            BoundaryEntry::Triple(sentence, token, edu) => Self {
                sentence,
                token,
                edu: Some(edu),
            },
        }
    }
}

impl From<EduBoundary> for BoundaryEntry {
    fn from(boundary: EduBoundary) -> Self {
        match boundary.edu {
            Some(edu) => BoundaryEntry::Triple(boundary.sentence, boundary.token, edu),
            None => BoundaryEntry::Pair(boundary.sentence, boundary.token),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    pub edu_tokens: Vec<Vec<Token>>,

    #[serde(default)]
    pub edu_start_indices: Vec<EduBoundary>,
}

impl Document {
    pub fn new(edu_tokens: Vec<Vec<Token>>, edu_start_indices: Vec<EduBoundary>) -> Self {
        Self {
            doc_id: None,
            raw_text: None,
            edu_tokens,
            edu_start_indices,
        }
    }

    pub fn with_doc_id(mut self, doc_id: &str) -> Self {
        self.doc_id = Some(doc_id.to_string());
        self
    }

    pub fn from_json_str(content: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(content).map_err(|e| DocumentError::invalid_format(&e.to_string()))
    }

    /// Load a document from a JSON file. The file name becomes the
    /// document id when the file does not carry one.
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let metadata = std::fs::metadata(path).map_err(|e| DocumentError::io(path, &e))?;
        if metadata.len() > MAX_DOCUMENT_BYTES {
            return Err(DocumentError::too_large(
                "file size",
                metadata.len(),
                MAX_DOCUMENT_BYTES,
            ));
        }

        let content = std::fs::read_to_string(path).map_err(|e| DocumentError::io(path, &e))?;
        let mut document = Self::from_json_str(&content)?;
        if document.doc_id.is_none() {
            document.doc_id = Some(path.display().to_string());
        }
        Ok(document)
    }

    /// Identifier used in logs and output
    pub fn id(&self) -> &str {
        self.doc_id.as_deref().unwrap_or("<unnamed>")
    }

    pub fn edu_count(&self) -> usize {
        self.edu_tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edu_tokens.is_empty()
    }

    /// True when raw text is present but holds only whitespace
    pub fn is_blank(&self) -> bool {
        self.raw_text
            .as_deref()
            .map(|text| text.trim().is_empty())
            .unwrap_or(false)
    }

    /// Words of each EDU, without POS tags
    pub fn edu_words(&self) -> Vec<Vec<String>> {
        self.edu_tokens
            .iter()
            .map(|edu| edu.iter().map(|token| token.word.clone()).collect())
            .collect()
    }

    /// Sentence index of the EDU at `position`, if the table covers it
    pub fn sentence_of(&self, position: i64) -> Option<usize> {
        sentence_of(&self.edu_start_indices, position)
    }

    /// Check the document against the compile-time input limits
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.edu_count() > MAX_EDUS_PER_DOCUMENT {
            return Err(DocumentError::too_large(
                "EDU count",
                self.edu_count() as u64,
                MAX_EDUS_PER_DOCUMENT as u64,
            ));
        }

        for (index, edu) in self.edu_tokens.iter().enumerate() {
            if edu.is_empty() {
                return Err(DocumentError::EmptyEdu { index });
            }
            if edu.len() > MAX_TOKENS_PER_EDU {
                return Err(DocumentError::too_large(
                    "EDU token count",
                    edu.len() as u64,
                    MAX_TOKENS_PER_EDU as u64,
                ));
            }
        }

        if self.edu_start_indices.len() != self.edu_count() {
            return Err(DocumentError::BoundaryMismatch {
                edus: self.edu_count(),
                entries: self.edu_start_indices.len(),
            });
        }

        Ok(())
    }
}

/// Sentence lookup that treats negative or out-of-range positions as absent
pub fn sentence_of(boundaries: &[EduBoundary], position: i64) -> Option<usize> {
    usize::try_from(position)
        .ok()
        .and_then(|index| boundaries.get(index))
        .map(|boundary| boundary.sentence)
}
