use crate::error::DocumentParseError;
use crate::models::Extraction;

/// Extracts body paragraphs from Word documents, one segment per paragraph.
///
/// Only top-level paragraphs count; table cells, headers and footers are not
/// part of the body paragraph stream.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn extract(bytes: &[u8]) -> Result<Extraction, DocumentParseError> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| DocumentParseError::new(format!("DOCX parse error: {e}")))?;

        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                docx_rs::DocumentChild::Paragraph(paragraph) => {
                    Some(Self::paragraph_text(paragraph))
                }
                _ => None,
            })
            .collect();

        let paragraph_count = paragraphs.len();
        Ok(Extraction::new(paragraphs).with_metadata("paragraph_count", paragraph_count))
    }

    fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
        let mut content = String::new();
        Self::push_children(&paragraph.children, &mut content);
        content
    }

    fn push_children(children: &[docx_rs::ParagraphChild], content: &mut String) {
        for para_child in children {
            match para_child {
                docx_rs::ParagraphChild::Run(run) => Self::push_run(run, content),
                docx_rs::ParagraphChild::Hyperlink(link) => {
                    Self::push_children(&link.children, content)
                }
                _ => {}
            }
        }
    }

    fn push_run(run: &docx_rs::Run, content: &mut String) {
        for run_child in &run.children {
            match run_child {
                docx_rs::RunChild::Text(text) => content.push_str(&text.text),
                docx_rs::RunChild::Tab(_) => content.push('\t'),
                docx_rs::RunChild::Break(_) => content.push('\n'),
                _ => {}
            }
        }
    }
}
