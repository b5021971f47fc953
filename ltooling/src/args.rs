//! JSON argument helpers for function and trait-based tools.
//!
//! ```rust
//! use ltooling::{optional_u64, parse_json_object, required_string};
//!
//! let args = parse_json_object(r#"{"query":"standup","max":"5"}"#).expect("object should parse");
//! assert_eq!(required_string(&args, "query").expect("query should be present"), "standup");
//! assert_eq!(optional_u64(&args, "max"), Some(5));
//! ```

use serde_json::{Map, Value};

use crate::{ToolArguments, ToolError};

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

pub fn parse_json_object(args_json: &str) -> Result<ToolArguments, ToolError> {
    match parse_json_value(args_json)? {
        Value::Object(map) => Ok(map),
        _ => Err(ToolError::invalid_arguments("expected JSON object arguments")),
    }
}

pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    optional_string(args, key)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}

/// Reads `key` as text. Numbers and booleans are rendered; blank strings
/// count as absent.
pub fn optional_string(args: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match args.get(key)? {
        Value::String(value) => value.clone(),
        Value::Number(value) => value.to_string(),
        Value::Bool(value) => value.to_string(),
        _ => return None,
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Reads `key` as an unsigned integer, accepting numeric strings.
pub fn optional_u64(args: &Map<String, Value>, key: &str) -> Option<u64> {
    match args.get(key)? {
        Value::Number(value) => value.as_u64(),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}
