use crate::error::DocumentParseError;
use crate::models::Extraction;

use super::strip_bom;

/// Renders comma-separated files row by row, cells joined with `", "`.
///
/// Every record is data: there is no header detection, so `row_count`
/// includes a header row when the file has one.
pub struct CsvExtractor;

impl CsvExtractor {
    pub const CELL_SEPARATOR: &'static str = ", ";

    pub fn extract(bytes: &[u8]) -> Result<Extraction, DocumentParseError> {
        let bytes = strip_bom(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result
                .map_err(|e| DocumentParseError::extraction("Failed to read CSV record", e))?;
            rows.push(record.iter().collect::<Vec<_>>().join(Self::CELL_SEPARATOR));
        }

        let row_count = rows.len();
        Ok(Extraction::new(rows).with_metadata("row_count", row_count))
    }
}
