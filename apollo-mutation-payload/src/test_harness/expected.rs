use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDateTime;
use chrono::SecondsFormat;
use chrono::TimeZone;
use indexmap::IndexMap;
use serde::Serialize;

use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::message::ValidationMessage;

/// Text an association that was never loaded renders as.
pub const NOT_LOADED: &str = "association";

/// An expected value, as the application holds it before serialization.
#[derive(Clone, Debug, PartialEq)]
pub enum Expected {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<FixedOffset>),
    NaiveTimestamp(NaiveDateTime),
    List(Vec<Expected>),
    Map(IndexMap<String, Expected>),
    /// An association that was not loaded.
    NotLoaded,
}

impl Expected {
    /// A map from its entries, in order.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Expected>,
    {
        Expected::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Goes through serde, so every serializable type can be expected.
    ///
    /// Timestamps serialized as strings stay strings, which compares the same once
    /// the field is declared as a date.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json_bytes::to_value(value).map(Expected::from)
    }
}

/// Renders `expected` the way it reads after a round trip through the wire.
///
/// Every scalar becomes text: `null` is empty, booleans are `true`/`false`, numbers
/// and timestamps use their canonical rendering. Lists and maps keep their structure.
pub fn stringify(expected: &Expected) -> Value {
    let text = |s: String| Value::String(s.into());
    match expected {
        Expected::Null => text(String::new()),
        Expected::Bool(b) => text(b.to_string()),
        Expected::Integer(i) => text(i.to_string()),
        Expected::Float(f) => text(f.to_string()),
        Expected::Text(s) => text(s.clone()),
        Expected::Timestamp(t) => text(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        Expected::NaiveTimestamp(t) => text(t.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        Expected::List(items) => Value::Array(items.iter().map(stringify).collect()),
        Expected::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.as_str().into(), stringify(value)))
                .collect::<Object>(),
        ),
        Expected::NotLoaded => text(NOT_LOADED.to_string()),
    }
}

impl From<Value> for Expected {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Expected::Null,
            Value::Bool(b) => Expected::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Expected::Integer(i),
                None => Expected::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Expected::Text(s.as_str().to_string()),
            Value::Array(items) => Expected::List(items.into_iter().map(Expected::from).collect()),
            Value::Object(object) => Expected::Map(
                object
                    .into_iter()
                    .map(|(key, value)| (key.as_str().to_string(), Expected::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&ValidationMessage> for Expected {
    fn from(message: &ValidationMessage) -> Self {
        Expected::map([
            ("code", Expected::from(message.code.as_str())),
            ("key", Expected::from(message.key.clone())),
            ("template", Expected::from(message.template.as_str())),
            ("message", Expected::from(message.message.as_str())),
            (
                "options",
                Expected::List(
                    message
                        .options
                        .iter()
                        .map(|option| {
                            Expected::map([
                                ("key", Expected::from(option.key.as_str())),
                                ("value", Expected::from(option.value.clone())),
                            ])
                        })
                        .collect(),
                ),
            ),
            ("value", Expected::from(message.value.clone())),
        ])
    }
}

impl From<bool> for Expected {
    fn from(b: bool) -> Self {
        Expected::Bool(b)
    }
}

impl From<i32> for Expected {
    fn from(i: i32) -> Self {
        Expected::Integer(i.into())
    }
}

impl From<i64> for Expected {
    fn from(i: i64) -> Self {
        Expected::Integer(i)
    }
}

impl From<u32> for Expected {
    fn from(i: u32) -> Self {
        Expected::Integer(i.into())
    }
}

impl From<f64> for Expected {
    fn from(f: f64) -> Self {
        Expected::Float(f)
    }
}

impl From<&str> for Expected {
    fn from(s: &str) -> Self {
        Expected::Text(s.to_string())
    }
}

impl From<String> for Expected {
    fn from(s: String) -> Self {
        Expected::Text(s)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Expected {
    fn from(t: DateTime<Tz>) -> Self {
        Expected::Timestamp(t.fixed_offset())
    }
}

impl From<NaiveDateTime> for Expected {
    fn from(t: NaiveDateTime) -> Self {
        Expected::NaiveTimestamp(t)
    }
}

impl<T: Into<Expected>> From<Option<T>> for Expected {
    fn from(value: Option<T>) -> Self {
        value.map_or(Expected::Null, Into::into)
    }
}

impl<T: Into<Expected>> From<Vec<T>> for Expected {
    fn from(items: Vec<T>) -> Self {
        Expected::List(items.into_iter().map(Into::into).collect())
    }
}
