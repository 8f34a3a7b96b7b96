//! JSON Operations

use log::debug;

use crate::adapter::adapt;
use crate::error::ErrorKind;
use crate::json::parse;
use crate::value::Value;

/// Implementation of `json_parse`
///
/// Parses a string argument and adapts the document lazily. Anything else
/// (a non-string argument, malformed text) becomes an error value; this
/// never panics and has no side effects.
///
/// ```rust
/// use celjson::{json_parse, Value};
///
/// let parsed = json_parse(&Value::from(r#"{"cpu": 512}"#));
/// assert_eq!(parsed.as_map().unwrap().get("cpu"), Some(Value::from(512)));
///
/// assert!(json_parse(&Value::from("not json")).is_error());
/// assert!(json_parse(&Value::from(42)).is_error());
/// ```
pub fn parse_string(arg: &Value) -> Value {
    let text = match arg {
        Value::String(text) => text,
        Value::Error(_) => return arg.clone(),
        other => {
            return Value::error(
                ErrorKind::NoMatchingOverload,
                format!("expected a string, got {}", other.kind()),
            )
        }
    };

    match parse(text) {
        Ok(native) => adapt(&native),
        Err(err) => {
            debug!("json_parse rejected input: {}", err);
            Value::error(
                ErrorKind::InvalidJson,
                format!("error while parsing JSON: {}", err),
            )
        }
    }
}
