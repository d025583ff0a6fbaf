//! Response Envelopes
//!
//! The API is inconsistent about wrapping. A list may come back as a bare
//! array or wrapped under `data`, `results`, `items` or a resource-specific
//! key, sometimes nested one level under `data`. A single record may be
//! bare or wrapped under `data` or its singular name.

use serde_json::Value;

use super::ClientError;

const GENERIC_LIST_KEYS: &[&str] = &["data", "results", "items"];

/// Extract the array of records from a list response
pub fn unwrap_list(value: Value, resource_keys: &[&str]) -> Result<Vec<Value>, ClientError> {
    unwrap_list_at_depth(value, resource_keys, 0)
}

fn unwrap_list_at_depth(
    value: Value,
    resource_keys: &[&str],
    depth: usize,
) -> Result<Vec<Value>, ClientError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) if depth <= 1 => {
            let key = resource_keys
                .iter()
                .chain(GENERIC_LIST_KEYS)
                .find(|k| matches!(map.get(**k), Some(Value::Array(_)) | Some(Value::Object(_))))
                .copied();

            match key.and_then(|k| map.remove(k)) {
                Some(inner) => unwrap_list_at_depth(inner, resource_keys, depth + 1),
                None => Err(ClientError::UnexpectedShape(format!(
                    "expected a list, found object with keys [{}]",
                    map.keys().cloned().collect::<Vec<_>>().join(", ")
                ))),
            }
        }
        Value::Null => Ok(Vec::new()),
        other => Err(ClientError::UnexpectedShape(format!(
            "expected a list, found {}",
            kind_of(&other)
        ))),
    }
}

/// Extract one record from a single-record response
pub fn unwrap_one(value: Value, singular: &str) -> Result<Value, ClientError> {
    match value {
        Value::Object(mut map) => {
            if map.contains_key("id") {
                return Ok(Value::Object(map));
            }
            for key in [singular, "data"] {
                if let Some(Value::Object(_)) = map.get(key) {
                    if let Some(inner) = map.remove(key) {
                        return Ok(inner);
                    }
                }
            }
            Ok(Value::Object(map))
        }
        other => Err(ClientError::UnexpectedShape(format!(
            "expected a record, found {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
