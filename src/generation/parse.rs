//! Parses raw provider text into the structured payload it promised.

use serde_json::{Map, Value};

use crate::error::EngineError;

/// Extracts the JSON object from a raw completion.
///
/// Providers routinely wrap payloads in markdown fences or prose, so the
/// parser takes the outermost `{ ... }` span rather than requiring the whole
/// response to be JSON. Anything that does not contain a parseable object is
/// a contract mismatch.
pub fn parse_object_payload(raw: &str) -> Result<Map<String, Value>, EngineError> {
    let start = raw.find('{');
    let end = raw.rfind('}');
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(EngineError::ContractMismatch(
                "no JSON object found in provider output".to_string(),
            ))
        }
    };
    match serde_json::from_str::<Value>(&raw[start..=end]) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(EngineError::ContractMismatch(format!(
            "expected a JSON object, got {}",
            value_kind(&other)
        ))),
        Err(err) => Err(EngineError::ContractMismatch(err.to_string())),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
