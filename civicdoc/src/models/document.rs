use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{DocumentFormat, Metadata};

/// Normalized text and bounded metadata for one source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedDocument {
    pub source: PathBuf,
    pub format: DocumentFormat,
    pub text: String,
    pub metadata: Metadata,
}

impl ParsedDocument {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Splits into the `(text, metadata)` pair handed to chunking.
    pub fn into_parts(self) -> (String, Metadata) {
        (self.text, self.metadata)
    }
}

/// Raw output of a format extractor, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub segments: Vec<String>,
    pub metadata: Metadata,
}

impl Extraction {
    pub fn new(segments: Vec<String>) -> Self {
        Self {
            segments,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}
