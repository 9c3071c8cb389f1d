#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;

use tempfile::TempDir;

/// Write `bytes` to `name` inside `dir` and return the full path
pub fn write_fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap_or_else(|e| panic!("Failed to write fixture '{name}': {e}"));
    path
}

pub fn build_docx<F>(builder_fn: F) -> Vec<u8>
where
    F: FnOnce(docx_rs::Docx) -> docx_rs::Docx,
{
    let docx = builder_fn(docx_rs::Docx::new());
    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).expect("Failed to pack DOCX");
    buffer.into_inner()
}

pub fn sample_docx() -> Vec<u8> {
    use docx_rs::{Paragraph, Run};

    build_docx(|docx| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text("Residential Parking Permits").bold()))
            .add_paragraph(Paragraph::new())
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("  Apply at the City Clerk's office.  ")),
            )
            .add_paragraph(
                Paragraph::new().add_run(Run::new().add_text("Permits renew every January.")),
            )
    })
}

/// Build a PDF with one page per entry; `None` produces a page with no text.
pub fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("Failed to encode PDF content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("Failed to write PDF");
    buffer
}

/// Build an XLSX workbook. Cells that parse as numbers are written as numeric
/// values, everything else as inline strings; empty strings leave the cell out.
pub fn build_xlsx(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
    let sheets: Vec<(&str, String)> = sheets
        .iter()
        .map(|(name, rows)| (*name, sheet_xml(rows)))
        .collect();
    build_xlsx_from_sheet_xml(&sheets)
}

/// Build an XLSX workbook from already-rendered worksheet XML parts.
pub fn build_xlsx_from_sheet_xml(sheets: &[(&str, String)]) -> Vec<u8> {
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    let names: Vec<&str> = sheets.iter().map(|(name, _)| *name).collect();
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buffer);
        let options: FileOptions<zip::write::ExtendedFileOptions> = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        zip.start_file("[Content_Types].xml", options.clone())
            .unwrap();
        zip.write_all(content_types_xml(sheets.len()).as_bytes())
            .unwrap();

        zip.start_file("_rels/.rels", options.clone()).unwrap();
        zip.write_all(RELS_XLSX.as_bytes()).unwrap();

        zip.start_file("xl/workbook.xml", options.clone()).unwrap();
        zip.write_all(workbook_xml(&names).as_bytes()).unwrap();

        zip.start_file("xl/_rels/workbook.xml.rels", options.clone())
            .unwrap();
        zip.write_all(workbook_rels_xml(sheets.len()).as_bytes())
            .unwrap();

        for (index, (_, xml)) in sheets.iter().enumerate() {
            zip.start_file(
                format!("xl/worksheets/sheet{}.xml", index + 1),
                options.clone(),
            )
            .unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
        }

        zip.finish().unwrap();
    }

    buffer.into_inner()
}

fn content_types_xml(sheet_count: usize) -> String {
    let overrides: String = (1..=sheet_count)
        .map(|i| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    {overrides}
</Types>"#
    )
}

const RELS_XLSX: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

fn workbook_xml(names: &[&str]) -> String {
    let entries: String = names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let id = index + 1;
            format!(r#"<sheet name="{name}" sheetId="{id}" r:id="rId{id}"/>"#)
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>{entries}</sheets>
</workbook>"#
    )
}

fn workbook_rels_xml(sheet_count: usize) -> String {
    let relationships: String = (1..=sheet_count)
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    {relationships}
</Relationships>"#
    )
}

pub fn sheet_xml(rows: &[Vec<&str>]) -> String {
    let mut data = String::new();
    for (row_index, row) in rows.iter().enumerate() {
        let row_number = row_index + 1;
        data.push_str(&format!(r#"<row r="{row_number}">"#));
        for (col_index, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let cell_ref = format!("{}{row_number}", column_name(col_index));
            if value.parse::<f64>().is_ok() {
                data.push_str(&format!(r#"<c r="{cell_ref}"><v>{value}</v></c>"#));
            } else {
                data.push_str(&format!(
                    r#"<c r="{cell_ref}" t="inlineStr"><is><t>{value}</t></is></c>"#
                ));
            }
        }
        data.push_str("</row>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <sheetData>{data}</sheetData>
</worksheet>"#
    )
}

fn column_name(index: usize) -> char {
    assert!(index < 26, "fixture builder only supports columns A-Z");
    (b'A' + index as u8) as char
}

/// Build a legacy BIFF8 `.xls` workbook inside a minimal compound file.
/// Cells that parse as numbers become NUMBER records, everything else LABEL
/// records; empty strings leave the cell out. Text must be ASCII.
pub fn build_xls(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
    compound_file("Workbook", &biff_workbook_stream(sheets))
}

const BIFF_BOF: u16 = 0x0809;
const BIFF_EOF: u16 = 0x000A;
const BIFF_CODEPAGE: u16 = 0x0042;
const BIFF_BOUNDSHEET: u16 = 0x0085;
const BIFF_NUMBER: u16 = 0x0203;
const BIFF_LABEL: u16 = 0x0204;

fn biff_record(out: &mut Vec<u8>, typ: u16, data: &[u8]) {
    out.extend_from_slice(&typ.to_le_bytes());
    out.extend_from_slice(&(data.len() as u16).to_le_bytes());
    out.extend_from_slice(data);
}

/// BOF payload; `substream` is 0x0005 for workbook globals, 0x0010 for a worksheet.
fn biff_bof(substream: u16) -> Vec<u8> {
    let mut data = Vec::with_capacity(16);
    data.extend_from_slice(&0x0600u16.to_le_bytes());
    data.extend_from_slice(&substream.to_le_bytes());
    data.extend_from_slice(&0x0DBBu16.to_le_bytes());
    data.extend_from_slice(&0x07CCu16.to_le_bytes());
    data.extend_from_slice(&[0u8; 8]);
    data
}

fn biff_workbook_stream(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
    let mut stream = Vec::new();
    biff_record(&mut stream, BIFF_BOF, &biff_bof(0x0005));
    biff_record(&mut stream, BIFF_CODEPAGE, &1200u16.to_le_bytes());

    // Sheet offsets are patched in once each worksheet substream is laid out
    let mut offset_slots = Vec::with_capacity(sheets.len());
    for (name, _) in sheets {
        assert!(name.is_ascii(), "fixture builder only supports ASCII sheet names");
        let mut data = vec![0u8; 4];
        data.push(0); // visible
        data.push(0); // worksheet
        data.push(name.len() as u8);
        data.push(0); // 8-bit characters
        data.extend_from_slice(name.as_bytes());
        offset_slots.push(stream.len() + 4);
        biff_record(&mut stream, BIFF_BOUNDSHEET, &data);
    }
    biff_record(&mut stream, BIFF_EOF, &[]);

    for ((_, rows), slot) in sheets.iter().zip(offset_slots) {
        let position = stream.len() as u32;
        stream[slot..slot + 4].copy_from_slice(&position.to_le_bytes());

        biff_record(&mut stream, BIFF_BOF, &biff_bof(0x0010));
        for (row_index, row) in rows.iter().enumerate() {
            for (col_index, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let mut data = Vec::new();
                data.extend_from_slice(&(row_index as u16).to_le_bytes());
                data.extend_from_slice(&(col_index as u16).to_le_bytes());
                data.extend_from_slice(&0u16.to_le_bytes());
                match value.parse::<f64>() {
                    Ok(number) => {
                        data.extend_from_slice(&number.to_le_bytes());
                        biff_record(&mut stream, BIFF_NUMBER, &data);
                    }
                    Err(_) => {
                        assert!(value.is_ascii(), "fixture builder only supports ASCII cells");
                        data.extend_from_slice(&(value.len() as u16).to_le_bytes());
                        data.push(0);
                        data.extend_from_slice(value.as_bytes());
                        biff_record(&mut stream, BIFF_LABEL, &data);
                    }
                }
            }
        }
        biff_record(&mut stream, BIFF_EOF, &[]);
    }

    stream
}

const CFB_SECTOR: usize = 512;
const CFB_MINI_CUTOFF: usize = 4096;
const CFB_FREESECT: u32 = 0xFFFF_FFFF;
const CFB_ENDOFCHAIN: u32 = 0xFFFF_FFFE;
const CFB_FATSECT: u32 = 0xFFFF_FFFD;
const CFB_NOSTREAM: u32 = 0xFFFF_FFFF;

/// Wrap one stream in a version 3 compound file laid out as
/// `[header][FAT][directory][stream sectors...]`.
fn compound_file(stream_name: &str, stream: &[u8]) -> Vec<u8> {
    // Streams below the cutoff would belong in the mini stream
    let mut stream = stream.to_vec();
    let padded = stream.len().max(CFB_MINI_CUTOFF).div_ceil(CFB_SECTOR) * CFB_SECTOR;
    stream.resize(padded, 0);
    let stream_sectors = padded / CFB_SECTOR;
    assert!(
        2 + stream_sectors <= CFB_SECTOR / 4,
        "fixture workbook does not fit a single FAT sector"
    );

    let mut fat = vec![CFB_FREESECT; CFB_SECTOR / 4];
    fat[0] = CFB_FATSECT;
    fat[1] = CFB_ENDOFCHAIN;
    for i in 0..stream_sectors {
        let id = 2 + i;
        fat[id] = if i + 1 == stream_sectors {
            CFB_ENDOFCHAIN
        } else {
            (id + 1) as u32
        };
    }

    let mut header = vec![0u8; CFB_SECTOR];
    header[0..8].copy_from_slice(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]);
    header[24..26].copy_from_slice(&0x003Eu16.to_le_bytes());
    header[26..28].copy_from_slice(&3u16.to_le_bytes());
    header[28..30].copy_from_slice(&0xFFFEu16.to_le_bytes());
    header[30..32].copy_from_slice(&9u16.to_le_bytes());
    header[32..34].copy_from_slice(&6u16.to_le_bytes());
    header[44..48].copy_from_slice(&1u32.to_le_bytes());
    header[48..52].copy_from_slice(&1u32.to_le_bytes());
    header[56..60].copy_from_slice(&(CFB_MINI_CUTOFF as u32).to_le_bytes());
    header[60..64].copy_from_slice(&CFB_ENDOFCHAIN.to_le_bytes());
    header[68..72].copy_from_slice(&CFB_ENDOFCHAIN.to_le_bytes());
    for (i, slot) in header[76..].chunks_exact_mut(4).enumerate() {
        let sector = if i == 0 { 0 } else { CFB_FREESECT };
        slot.copy_from_slice(&sector.to_le_bytes());
    }

    let mut directory = Vec::with_capacity(CFB_SECTOR);
    directory.extend(cfb_directory_entry("Root Entry", 5, 1, CFB_ENDOFCHAIN, 0));
    directory.extend(cfb_directory_entry(stream_name, 2, CFB_NOSTREAM, 2, padded as u32));
    directory.extend(cfb_directory_entry("", 0, CFB_NOSTREAM, 0, 0));
    directory.extend(cfb_directory_entry("", 0, CFB_NOSTREAM, 0, 0));

    let mut file = header;
    for entry in fat {
        file.extend_from_slice(&entry.to_le_bytes());
    }
    file.extend(directory);
    file.extend(stream);
    file
}

fn cfb_directory_entry(name: &str, kind: u8, child: u32, start: u32, size: u32) -> Vec<u8> {
    let mut entry = vec![0u8; 128];
    let units: Vec<u16> = name.encode_utf16().collect();
    for (i, unit) in units.iter().enumerate() {
        entry[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
    }
    if !name.is_empty() {
        entry[64..66].copy_from_slice(&(((units.len() + 1) * 2) as u16).to_le_bytes());
    }
    entry[66] = kind;
    entry[67] = 1;
    entry[68..72].copy_from_slice(&CFB_NOSTREAM.to_le_bytes());
    entry[72..76].copy_from_slice(&CFB_NOSTREAM.to_le_bytes());
    entry[76..80].copy_from_slice(&child.to_le_bytes());
    entry[116..120].copy_from_slice(&start.to_le_bytes());
    entry[120..124].copy_from_slice(&size.to_le_bytes());
    entry
}
