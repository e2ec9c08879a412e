//! Recognizing a prompt list in a response body

use serde_json::Value;

/// Keys of a wrapping object that may hold the prompt list, in priority order
pub const LIST_KEYS: [&str; 2] = ["data", "prompts"];

/// Pull the prompt list out of a parsed body
///
/// Accepts a bare array, or an object whose `data` or `prompts` member is an
/// array. An empty array is a valid list. Anything else is `None`.
pub fn extract_prompt_list(body: Value) -> Option<Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => LIST_KEYS.iter().find_map(|key| match map.remove(*key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }),
        _ => None,
    }
}

/// Parse a 200 body and pull out the prompt list, or say why it is not one
pub(crate) fn parse_prompt_list(body: &str) -> Result<Vec<Value>, String> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("invalid JSON body: {}", e))?;
    prompt_list_from_value(value)
}

pub(crate) fn prompt_list_from_value(value: Value) -> Result<Vec<Value>, String> {
    let shape = match &value {
        Value::Array(_) => None,
        Value::Object(map)
            if LIST_KEYS
                .iter()
                .any(|key| matches!(map.get(*key), Some(Value::Array(_)))) =>
        {
            None
        }
        other => Some(describe_shape(other)),
    };
    match shape {
        Some(shape) => Err(shape),
        None => extract_prompt_list(value).ok_or_else(|| "no prompt list in body".to_string()),
    }
}

/// Describe the shape of a body that did not contain a prompt list
pub(crate) fn describe_shape(body: &Value) -> String {
    match body {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).take(8).collect();
            format!("object without a 'data' or 'prompts' list (keys: {})", keys.join(", "))
        }
        Value::Null => "null body".to_string(),
        Value::Bool(_) => "boolean body".to_string(),
        Value::Number(_) => "numeric body".to_string(),
        Value::String(_) => "string body".to_string(),
        Value::Array(_) => "array body".to_string(),
    }
}
