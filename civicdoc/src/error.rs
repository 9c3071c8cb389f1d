use std::path::{Path, PathBuf};

use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The single failure kind of document normalization.
///
/// Every precondition and extraction failure is reported through this type,
/// distinguished only by its message. Library errors from the underlying
/// format readers are kept as the `source` so callers can still inspect them.
#[derive(Error, Debug)]
#[error("{message}{}", path_suffix(.path))]
pub struct DocumentParseError {
    message: String,
    path: Option<PathBuf>,
    #[source]
    source: Option<BoxedSource>,
}

impl DocumentParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            source: None,
        }
    }

    pub fn missing_file(path: &Path) -> Self {
        Self::new("file does not exist or is not a regular file").with_path(path)
    }

    pub fn unsupported_extension(path: &Path, extension: &str) -> Self {
        let shown = if extension.is_empty() {
            "<none>".to_string()
        } else {
            format!(".{extension}")
        };
        Self::new(format!("unsupported file extension: {shown}")).with_path(path)
    }

    pub fn no_extractor(path: &Path, extension: &str) -> Self {
        Self::new(format!("no extractor registered for extension: .{extension}")).with_path(path)
    }

    pub fn empty_document(path: &Path) -> Self {
        Self::new("parsed document is empty after extraction").with_path(path)
    }

    pub fn too_large(path: &Path, size: u64, limit: u64) -> Self {
        Self::new(format!(
            "file is {size} bytes, larger than the {limit} byte limit"
        ))
        .with_path(path)
    }

    /// Wraps a library error raised while reading a specific format.
    pub fn extraction<E>(context: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: format!("{context}: {source}"),
            path: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attaches the document path unless one is already recorded.
    pub fn with_path(mut self, path: &Path) -> Self {
        if self.path.is_none() {
            self.path = Some(path.to_path_buf());
        }
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}

#[derive(Error, Debug)]
pub enum CivicdocError {
    #[error(transparent)]
    Parse(#[from] DocumentParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parsing {} timed out after {secs} seconds", .path.display())]
    Timeout { path: PathBuf, secs: u64 },

    #[error("Worker error: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, CivicdocError>;
