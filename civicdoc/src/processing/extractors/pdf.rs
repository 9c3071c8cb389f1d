use std::any::Any;
use std::panic;

use crate::error::DocumentParseError;
use crate::models::Extraction;

/// Extracts page text from PDF documents.
///
/// Pages without a text layer (scans, images) yield empty segments rather
/// than errors; the normalizer decides whether anything usable remains.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn extract(bytes: &[u8]) -> Result<Extraction, DocumentParseError> {
        // pdf-extract panics on some malformed font tables instead of returning an error.
        let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|payload| {
                DocumentParseError::new(format!(
                    "PDF extraction failed: {}",
                    panic_message(payload.as_ref())
                ))
            })?
            .map_err(|e| DocumentParseError::new(format!("PDF extraction failed: {e}")))?;

        let page_count = pages.len();
        Ok(Extraction::new(pages).with_metadata("page_count", page_count))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "reader panicked".to_string()
    }
}
