//! Inline data parsing.
//!
//! Data passed on the command line may be JSON (`{"Name":"Ada"}`) or YAML
//! (`Name: Ada`). JSON is attempted first; YAML is the fallback.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{GpcError, GpcResult};

/// Variable values supplied by the caller.
pub type InlineData = Map<String, Value>;

/// Parse inline data text into a name/value mapping.
pub fn parse_data(text: &str) -> GpcResult<InlineData> {
    if text.trim().is_empty() {
        return Ok(InlineData::new());
    }

    match serde_json::from_str::<InlineData>(text) {
        Ok(map) => {
            debug!("Parsed inline data as JSON ({} keys)", map.len());
            Ok(map)
        }
        Err(json_err) => {
            let value: Value = serde_yaml::from_str(text).map_err(|yaml_err| {
                GpcError::InvalidData(format!(
                    "not valid JSON ({}) or YAML ({})",
                    json_err, yaml_err
                ))
            })?;

            match value {
                Value::Object(map) => {
                    debug!("Parsed inline data as YAML ({} keys)", map.len());
                    Ok(map)
                }
                Value::Null => Ok(InlineData::new()),
                other => Err(GpcError::InvalidData(format!(
                    "expected a mapping of variable names to values, got {}",
                    kind_of(&other)
                ))),
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
