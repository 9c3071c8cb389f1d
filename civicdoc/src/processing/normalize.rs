use serde_json::Value;

use crate::error::DocumentParseError;
use crate::models::Metadata;

/// Trims every segment, drops blank ones and joins the rest with `\n`.
pub fn normalize_segments<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for segment in segments {
        let trimmed = segment.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(trimmed);
    }
    text
}

/// Produces a bounded copy of `metadata`.
///
/// Arrays longer than `list_limit` keep their first `list_limit` elements
/// followed by `marker`. Objects are round-tripped through JSON text.
/// Scalars pass through untouched.
pub fn bound_metadata(
    metadata: &Metadata,
    list_limit: usize,
    marker: &str,
) -> Result<Metadata, DocumentParseError> {
    metadata
        .iter()
        .map(|(key, value)| {
            let bounded = match value {
                Value::Array(items) if items.len() > list_limit => {
                    let mut kept = items[..list_limit].to_vec();
                    kept.push(Value::String(marker.to_string()));
                    Value::Array(kept)
                }
                Value::Object(_) => canonicalize(value).map_err(|e| {
                    DocumentParseError::extraction(&format!("metadata entry '{key}' is not serializable"), e)
                })?,
                other => other.clone(),
            };
            Ok((key.clone(), bounded))
        })
        .collect()
}

fn canonicalize(value: &Value) -> Result<Value, serde_json::Error> {
    let encoded = serde_json::to_string(value)?;
    serde_json::from_str(&encoded)
}
