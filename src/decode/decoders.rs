//! Decoder implementations

use super::layout::PageLayout;
use crate::error::{Error, Result};
use crate::pagination::Page;
use serde_json::Value;

/// Trait for decoding reply bodies into pages
pub trait PageDecoder: Send + Sync {
    /// Decode a reply body into a page
    fn decode(&self, body: &str) -> Result<Page<Value>>;

    /// Decode an already parsed reply into a page
    fn decode_value(&self, value: &Value) -> Result<Page<Value>>;
}

// ============================================================================
// JSON Page Decoder
// ============================================================================

/// JSON decoder driven by a [`PageLayout`]
#[derive(Debug, Clone, Default)]
pub struct JsonPageDecoder {
    layout: PageLayout,
}

impl JsonPageDecoder {
    /// Create a decoder with the default layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with a custom layout
    pub fn with_layout(layout: PageLayout) -> Self {
        Self { layout }
    }

    /// Layout in use
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Fail with the remote error when the reply reports a failed call
    fn check_status(&self, value: &Value) -> Result<()> {
        let Some(status_path) = &self.layout.status_path else {
            return Ok(());
        };

        match extract_simple_path(value, status_path).and_then(scalar_to_string) {
            Some(status) if status.eq_ignore_ascii_case("failed") => {
                let errno = extract_simple_path(value, &self.layout.errno_path)
                    .and_then(scalar_to_string)
                    .unwrap_or_default();
                let reason = extract_simple_path(value, &self.layout.reason_path)
                    .and_then(scalar_to_string)
                    .unwrap_or_else(|| "unknown error".to_string());
                Err(Error::api(errno, reason))
            }
            _ => Ok(()),
        }
    }

    /// Extract the item container, `None` when the reply has none
    fn extract_items(&self, value: &Value) -> Result<Option<Vec<Value>>> {
        let path = &self.layout.items_path;
        if path.contains('*') {
            // No container means no item list, not an empty one.
            let container = wildcard_container(path);
            if !container.is_empty()
                && matches!(extract_simple_path(value, container), None | Some(Value::Null))
            {
                return Ok(None);
            }
            return extract_with_jsonpath(value, path).map(Some);
        }

        match extract_simple_path(value, path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            // Element-style container: every child is a record, repeated
            // children arrive as arrays.
            Some(Value::Object(children)) => {
                let mut items = Vec::new();
                for child in children.into_iter().map(|(_, v)| v) {
                    match child {
                        Value::Array(nested) => items.extend(nested),
                        other => items.push(other),
                    }
                }
                Ok(Some(items))
            }
            Some(Value::String(s)) if s.trim().is_empty() => Ok(Some(Vec::new())),
            Some(other) => Err(Error::decode(format!(
                "item container at '{path}' is not a list: {other}"
            ))),
        }
    }
}

impl PageDecoder for JsonPageDecoder {
    fn decode(&self, body: &str) -> Result<Page<Value>> {
        let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;
        self.decode_value(&value)
    }

    fn decode_value(&self, value: &Value) -> Result<Page<Value>> {
        self.check_status(value)?;

        Ok(Page {
            num_records: extract_simple_path(value, &self.layout.num_records_path)
                .and_then(scalar_to_string),
            items: self.extract_items(value)?,
            next_tag: extract_simple_path(value, &self.layout.next_tag_path)
                .and_then(scalar_to_string),
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Render a scalar as a string; objects, arrays and null yield `None`
fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Extract a value using simple dot-notation path
fn extract_simple_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let parts: Vec<&str> = path.split('.').collect();

    let mut current = value;
    for part in parts {
        // Handle array indexing like "results[0]"
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].trim_end_matches(']');

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index = index_str.parse::<usize>().ok()?;
            current = current.as_array()?.get(index)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current.clone())
}

/// Dot path of the value a wildcard path expands over, e.g. `records` for
/// `$.records[*].attributes`. Empty when the wildcard applies to the root
/// or the path uses recursive descent.
pub(super) fn wildcard_container(path: &str) -> &str {
    let path = path.strip_prefix('$').unwrap_or(path);
    if path.starts_with("..") {
        return "";
    }
    let path = path.strip_prefix('.').unwrap_or(path);
    let Some(star) = path.find('*') else {
        return path;
    };
    let prefix = &path[..star];
    let end = prefix.rfind(['[', '.']).unwrap_or(prefix.len());
    prefix[..end].trim_end_matches('.')
}

/// Extract records using jsonpath-rust
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath '{path}': {e}")))?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
