//! Format-specific extractors.
//!
//! Each extractor turns raw file bytes into an ordered list of text segments
//! plus format-specific metadata. Normalization happens afterwards, in one
//! place, so extractors never trim or filter their own output.

use crate::error::DocumentParseError;
use crate::models::{DocumentFormat, Extraction};

pub mod csv;
pub mod docx;
pub mod pdf;
pub mod spreadsheet;
pub mod text;

pub use self::csv::CsvExtractor;
pub use self::docx::DocxExtractor;
pub use self::pdf::PdfExtractor;
pub use self::spreadsheet::SpreadsheetExtractor;
pub use self::text::TextExtractor;

/// Dispatches to the extractor registered for `format`.
pub fn extract(format: DocumentFormat, bytes: &[u8]) -> Result<Extraction, DocumentParseError> {
    match format {
        DocumentFormat::Pdf => PdfExtractor::extract(bytes),
        DocumentFormat::Docx => DocxExtractor::extract(bytes),
        DocumentFormat::Txt | DocumentFormat::Markdown => Ok(TextExtractor::extract(bytes)),
        DocumentFormat::Csv => CsvExtractor::extract(bytes),
        DocumentFormat::Xls | DocumentFormat::Xlsx => SpreadsheetExtractor::extract(bytes),
    }
}

/// Strip UTF-8 BOM if present
pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes)
}
