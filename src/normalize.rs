//! Normalizing heterogeneous prompt objects into one display schema
//!
//! Field names drift between API versions, so each logical field is read from
//! a priority list of keys. A key that is missing or `null` falls through to
//! the next one; when every key is absent the field's default is used.

use serde::Serialize;
use serde_json::Value;

pub const NAME_KEYS: [&str; 2] = ["name", "promptName"];
pub const TYPE_KEYS: [&str; 2] = ["type", "promptType"];
pub const LABEL_KEYS: [&str; 2] = ["labels", "label"];
/// `versions` is the list form returned by the v2 listing; its last entry wins
pub const VERSION_KEYS: [&str; 3] = ["version", "versionNumber", "versions"];
pub const CONTENT_KEYS: [&str; 3] = ["prompt", "content", "text"];

pub const DEFAULT_NAME: &str = "untitled";
pub const DEFAULT_TYPE: &str = "unknown";
pub const DEFAULT_VERSION: &str = "N/A";

/// Appended to a preview that was cut short
pub const TRUNCATION_MARKER: &str = "...";

/// A prompt in the fixed display schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub prompt_type: String,
    pub labels: Vec<String>,
    pub version: String,
    /// Full content; `None` when the source had none
    pub content: Option<String>,
}

impl PromptRecord {
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(_) = value else {
            return Self {
                name: DEFAULT_NAME.to_string(),
                prompt_type: DEFAULT_TYPE.to_string(),
                labels: Vec::new(),
                version: DEFAULT_VERSION.to_string(),
                content: content_text(value),
            };
        };

        Self {
            name: first_present(value, &NAME_KEYS)
                .map(scalar_text)
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            prompt_type: first_present(value, &TYPE_KEYS)
                .map(scalar_text)
                .unwrap_or_else(|| DEFAULT_TYPE.to_string()),
            labels: first_present(value, &LABEL_KEYS)
                .map(normalize_labels)
                .unwrap_or_default(),
            version: first_present(value, &VERSION_KEYS)
                .and_then(version_text)
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            content: first_present(value, &CONTENT_KEYS).and_then(content_text),
        }
    }

    /// Content cut to `max_chars` characters, or `None` when there is none
    pub fn preview(&self, max_chars: usize) -> Option<String> {
        self.content
            .as_deref()
            .map(|content| truncate_preview(content, max_chars))
    }
}

/// First value under `keys` that is present and not `null`
pub fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|v| !v.is_null())
}

/// A single string becomes a one-element list; arrays keep their elements
pub fn normalize_labels(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(scalar_text)
            .collect(),
        other => vec![scalar_text(other)],
    }
}

/// Cut `text` to at most `max_chars` characters, adding the truncation marker
/// when anything was dropped
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{}", &text[..idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn version_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.iter().rev().find(|v| !v.is_null()).map(scalar_text),
        other => Some(scalar_text(other)),
    }
}

/// Strings are used as-is and structured content becomes compact JSON.
/// Empty content counts as absent.
fn content_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}
