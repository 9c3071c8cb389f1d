use crate::models::Extraction;

use super::strip_bom;

/// Plain text and Markdown. Markdown is not interpreted; both are read as
/// UTF-8 with undecodable byte sequences dropped.
pub struct TextExtractor;

impl TextExtractor {
    pub const ENCODING: &'static str = "utf-8";

    pub fn extract(bytes: &[u8]) -> Extraction {
        let text = decode_utf8_dropping_invalid(strip_bom(bytes));
        let segments = text.lines().map(str::to_string).collect();

        Extraction::new(segments).with_metadata("encoding", Self::ENCODING)
    }
}

/// Decodes UTF-8, skipping invalid sequences instead of substituting U+FFFD.
fn decode_utf8_dropping_invalid(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());

    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(len) => bytes = &rest[len..],
                    // Truncated sequence at end of input.
                    None => return out,
                }
            }
        }
    }
}
