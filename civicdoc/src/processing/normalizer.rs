use std::path::Path;

use crate::config::NormalizerConfig;
use crate::error::DocumentParseError;
use crate::models::{DocumentFormat, Metadata, ParsedDocument, SUPPORTED_EXTENSIONS};

use super::extractors;
use super::normalize::{bound_metadata, normalize_segments};

/// Turns a file on disk into normalized text and bounded metadata.
///
/// Stateless apart from its configuration: concurrent calls on distinct
/// paths do not interact.
#[derive(Debug, Clone, Default)]
pub struct DocumentNormalizer {
    config: NormalizerConfig,
}

impl DocumentNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn parse(&self, path: impl AsRef<Path>) -> Result<ParsedDocument, DocumentParseError> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(DocumentParseError::missing_file(path));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(DocumentParseError::unsupported_extension(path, &extension));
        }

        let format = DocumentFormat::from_extension(&extension)
            .ok_or_else(|| DocumentParseError::no_extractor(path, &extension))?;

        if let Some(limit) = self.config.max_file_size {
            let size = std::fs::metadata(path)
                .map_err(|e| DocumentParseError::extraction("Failed to stat file", e).with_path(path))?
                .len();
            if size > limit {
                return Err(DocumentParseError::too_large(path, size, limit));
            }
        }

        tracing::debug!(path = %path.display(), %format, "Extracting document");

        let bytes = std::fs::read(path)
            .map_err(|e| DocumentParseError::extraction("Failed to read file", e).with_path(path))?;

        let extraction = extractors::extract(format, &bytes).map_err(|e| e.with_path(path))?;

        let text = normalize_segments(&extraction.segments);
        if text.is_empty() {
            return Err(DocumentParseError::empty_document(path));
        }

        let metadata = bound_metadata(
            &extraction.metadata,
            self.config.metadata_list_limit,
            &self.config.truncation_marker,
        )
        .map_err(|e| e.with_path(path))?;

        tracing::debug!(
            path = %path.display(),
            %format,
            segments = extraction.segments.len(),
            chars = text.len(),
            "Document normalized"
        );

        Ok(ParsedDocument {
            source: path.to_path_buf(),
            format,
            text,
            metadata,
        })
    }
}

/// Parses `path` with the default bounds, returning `(text, metadata)`.
pub fn parse_document_file(
    path: impl AsRef<Path>,
) -> Result<(String, Metadata), DocumentParseError> {
    DocumentNormalizer::default()
        .parse(path)
        .map(ParsedDocument::into_parts)
}
