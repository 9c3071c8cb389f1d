use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Range, Reader, SheetType, Xls, Xlsx};

use crate::error::DocumentParseError;
use crate::models::Extraction;

type Sheets = Vec<(String, Range<Data>)>;

/// Extracts every worksheet of an Excel workbook as CSV text.
///
/// The Office Open XML reader is tried first; workbooks it rejects (legacy
/// BIFF `.xls` files, including ones saved with an `.xlsx` name) are retried
/// with the legacy reader before giving up.
pub struct SpreadsheetExtractor;

impl SpreadsheetExtractor {
    pub fn extract(bytes: &[u8]) -> Result<Extraction, DocumentParseError> {
        let sheets = open_with_fallback(
            || read_sheets::<Xlsx<_>>(bytes),
            || read_sheets::<Xls<_>>(bytes),
        )?;

        let mut segments = Vec::with_capacity(sheets.len());
        let mut sheet_names = Vec::with_capacity(sheets.len());

        for (name, range) in &sheets {
            let csv_text = Self::render_csv(range)?;
            segments.push(format!("Sheet: {name}\n{csv_text}"));
            sheet_names.push(name.clone());
        }

        Ok(Extraction::new(segments).with_metadata("sheet_names", sheet_names))
    }

    fn render_csv(range: &Range<Data>) -> Result<String, DocumentParseError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        for row in range.rows() {
            writer
                .write_record(row.iter().map(|cell| Self::format_cell_value(Some(cell))))
                .map_err(|e| DocumentParseError::extraction("Failed to render sheet as CSV", e))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| DocumentParseError::new(format!("Failed to render sheet as CSV: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| DocumentParseError::extraction("Sheet CSV is not valid UTF-8", e))
    }

    fn format_cell_value(cell: Option<&Data>) -> String {
        match cell {
            Some(Data::String(s)) => s.clone(),
            Some(Data::Int(i)) => i.to_string(),
            Some(Data::Float(f)) => {
                let s = format!("{f}");
                if s.contains('.') {
                    s.trim_end_matches('0').trim_end_matches('.').to_string()
                } else {
                    s
                }
            }
            Some(Data::Bool(b)) => b.to_string(),
            Some(Data::DateTime(dt)) => dt.to_string(),
            Some(Data::DateTimeIso(dt)) => dt.to_string(),
            Some(Data::DurationIso(d)) => d.to_string(),
            Some(Data::Empty) | None => String::new(),
            _ => String::new(),
        }
    }
}

/// Loads every worksheet in workbook order. A sheet that cannot be read fails
/// the whole workbook rather than being left out of the text.
fn read_sheets<'a, R>(bytes: &'a [u8]) -> Result<Sheets, String>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: std::fmt::Display,
{
    let mut workbook: R = match open_workbook_from_rs(Cursor::new(bytes)) {
        Ok(workbook) => workbook,
        Err(e) => return Err(e.to_string()),
    };

    let names: Vec<String> = workbook
        .sheets_metadata()
        .iter()
        .filter(|sheet| sheet.typ == SheetType::WorkSheet)
        .map(|sheet| sheet.name.clone())
        .collect();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        match workbook.worksheet_range(&name) {
            Ok(range) => sheets.push((name, range)),
            Err(e) => return Err(format!("sheet '{name}': {e}")),
        }
    }
    Ok(sheets)
}

/// Runs `primary`, and `legacy` only if `primary` fails.
fn open_with_fallback<T>(
    primary: impl FnOnce() -> Result<T, String>,
    legacy: impl FnOnce() -> Result<T, String>,
) -> Result<T, DocumentParseError> {
    match primary() {
        Ok(value) => Ok(value),
        Err(primary_err) => {
            tracing::warn!(
                error = %primary_err,
                "Default spreadsheet reader rejected workbook, retrying with legacy reader"
            );
            legacy().map_err(|legacy_err| {
                DocumentParseError::new(format!(
                    "Spreadsheet parse error: {primary_err}; legacy reader: {legacy_err}"
                ))
            })
        }
    }
}
