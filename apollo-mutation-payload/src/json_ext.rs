//! Helpers for working with loosely-typed wire values.

use serde_json_bytes::ByteString;
use serde_json_bytes::Map;
pub use serde_json_bytes::Value;

/// A JSON object.
pub type Object = Map<ByteString, Value>;

/// Renders a scalar the way it reads once it has gone through a text round trip.
///
/// `null` renders as the empty string. Arrays and objects render as compact JSON.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(s) => s.as_str().to_string(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Replaces every scalar leaf of `value` with its text rendering, keeping arrays and objects.
pub(crate) fn textify(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(textify).collect()),
        Value::Object(object) => Value::Object(
            object
                .iter()
                .map(|(key, value)| (key.clone(), textify(value)))
                .collect(),
        ),
        scalar => Value::String(value_to_text(scalar).into()),
    }
}
