use serde::{Deserialize, Serialize};

/// Structural facts about a parsed document, keyed by name.
///
/// A JSON object so that every value is representable in the canonical
/// serialization used when bounding metadata.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Extensions accepted by the normalizer, lower-cased and without the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "docx", "md", "pdf", "txt", "xls", "xlsx"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    Markdown,
    Csv,
    Xls,
    Xlsx,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 7] = [
        Self::Pdf,
        Self::Docx,
        Self::Txt,
        Self::Markdown,
        Self::Csv,
        Self::Xls,
        Self::Xlsx,
    ];

    /// Maps a file extension (case-insensitive, leading dot optional) to its format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            "md" => Some(Self::Markdown),
            "csv" => Some(Self::Csv),
            "xls" => Some(Self::Xls),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
            Self::Markdown => "md",
            Self::Csv => "csv",
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, Self::Xls | Self::Xlsx)
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Docx => write!(f, "docx"),
            Self::Txt => write!(f, "txt"),
            Self::Markdown => write!(f, "markdown"),
            Self::Csv => write!(f, "csv"),
            Self::Xls => write!(f, "xls"),
            Self::Xlsx => write!(f, "xlsx"),
        }
    }
}

impl std::str::FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" => Ok(Self::Markdown),
            other => {
                Self::from_extension(other).ok_or_else(|| format!("Unknown document format: {s}"))
            }
        }
    }
}
