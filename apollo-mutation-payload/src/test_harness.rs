//! Assertions comparing expected values against mutation responses read back from the wire.
//!
//! The response side is loosely typed: most scalars come back as text, keys are cased
//! for the API consumer. Each field is therefore compared according to its declared
//! [`FieldType`] rather than by plain equality.
//!
//! ```ignore
//! let fields = field_types([("id", FieldType::Integer), ("first_name", FieldType::String)]);
//! assert_mutation_success(&expected_user, &response["data"]["createUser"], &fields);
//! ```

mod expected;

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDateTime;
use chrono::Utc;
use displaydoc::Display;
use indexmap::IndexMap;
use thiserror::Error;

pub use self::expected::Expected;
pub use self::expected::NOT_LOADED;
pub use self::expected::stringify;
use crate::casing::CasingFn;
use crate::casing::convert_key;
use crate::casing::lower_camel_case;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::json_ext::textify;
use crate::json_ext::value_to_text;
use crate::message::ValidationMessage;

const ROOT: &str = "<root>";

/// Declared type of a field, driving how its values are compared.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldType {
    String,
    /// Compared numerically.
    Integer,
    /// Compared numerically.
    Float,
    Boolean,
    /// The response holds the upper-cased expected value.
    Enum,
    /// ISO-8601 timestamps, compared as instants.
    Date,
    List,
    /// A nested object, or a list of them, compared with its own field types.
    Object(FieldTypeMap),
}

/// Field name, in the producer's casing, to declared type. Fields are compared in order.
pub type FieldTypeMap = IndexMap<String, FieldType>;

/// Builds a [`FieldTypeMap`] from its entries.
pub fn field_types<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, FieldType)>,
) -> FieldTypeMap {
    entries
        .into_iter()
        .map(|(name, ty)| (name.into(), ty))
        .collect()
}

/// The field types of a [`ValidationMessage`] as it appears in a response.
pub fn message_fields() -> FieldTypeMap {
    field_types([
        ("code", FieldType::String),
        ("key", FieldType::String),
        ("template", FieldType::String),
        ("message", FieldType::String),
        ("options", FieldType::List),
        ("value", FieldType::String),
    ])
}

/// Why a response did not match what was expected.
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ComparisonError {
    /// field `{field}` mismatch: expected {expected:?}, got {actual:?}
    Mismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// field `{field}` count mismatch: expected {expected} items, got {actual}
    CountMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// field `{field}` is not a valid ISO-8601 timestamp: {value:?}
    InvalidDate { field: String, value: String },

    /// field `{field}` is not a valid number: {value:?}
    InvalidNumber { field: String, value: String },

    /// expected an object at `{field}`
    NotAnObject { field: String },
}

/// Compares expected values against responses, looking response fields up through a casing.
#[derive(Clone, Copy, Debug)]
pub struct Comparator {
    casing: CasingFn,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::with_casing(lower_camel_case)
    }
}

impl Comparator {
    pub fn with_casing(casing: CasingFn) -> Self {
        Self { casing }
    }

    /// Compares `expected` against `response` for every field of `fields`.
    ///
    /// When `expected` is a list, `response` must be a list of the same length and
    /// elements are compared pairwise.
    pub fn compare(
        &self,
        expected: &Expected,
        response: &Value,
        fields: &FieldTypeMap,
    ) -> Result<(), ComparisonError> {
        self.compare_stringified(ROOT, &stringify(expected), response, fields)
    }

    /// Checks a successful payload, then compares its `result`.
    pub fn compare_success(
        &self,
        expected: &Expected,
        response: &Value,
        fields: &FieldTypeMap,
    ) -> Result<(), ComparisonError> {
        let payload = as_object(ROOT, response)?;
        expect_text("successful", "true", payload.get("successful"))?;
        let messages = payload.get("messages").unwrap_or(&Value::Null);
        if !messages.as_array().is_some_and(Vec::is_empty) {
            return Err(ComparisonError::Mismatch {
                field: "messages".to_string(),
                expected: "[]".to_string(),
                actual: value_to_text(messages),
            });
        }
        let result = payload.get("result").unwrap_or(&Value::Null);
        self.compare_stringified("result", &stringify(expected), result, fields)
    }

    /// Checks a failed payload, then compares its `messages`.
    ///
    /// Expected message keys go through the same casing as response keys.
    pub fn compare_failure(
        &self,
        expected: &[ValidationMessage],
        response: &Value,
        fields: &FieldTypeMap,
    ) -> Result<(), ComparisonError> {
        let payload = as_object(ROOT, response)?;
        expect_text("successful", "false", payload.get("successful"))?;
        match payload.get("result") {
            Some(Value::Null) => {}
            other => {
                return Err(ComparisonError::Mismatch {
                    field: "result".to_string(),
                    expected: "null".to_string(),
                    actual: other.map_or_else(|| "<missing>".to_string(), render_json),
                });
            }
        }
        let expected = Expected::List(
            expected
                .iter()
                .map(|message| Expected::from(&convert_key(message.clone(), self.casing)))
                .collect(),
        );
        let messages = payload.get("messages").unwrap_or(&Value::Null);
        self.compare_stringified("messages", &stringify(&expected), messages, fields)
    }

    fn compare_stringified(
        &self,
        path: &str,
        expected: &Value,
        response: &Value,
        fields: &FieldTypeMap,
    ) -> Result<(), ComparisonError> {
        if let Value::Array(expected) = expected {
            let response = response.as_array().ok_or_else(|| ComparisonError::Mismatch {
                field: path.to_string(),
                expected: value_to_text(&Value::Array(expected.clone())),
                actual: value_to_text(response),
            })?;
            expect_count(path, expected.len(), response.len())?;
            return expected
                .iter()
                .zip(response)
                .enumerate()
                .try_for_each(|(index, (expected, response))| {
                    let path = format!("{path}[{index}]");
                    self.compare_stringified(&path, expected, response, fields)
                });
        }

        let expected = as_object(path, expected)?;
        let response = as_object(path, response)?;
        for (name, ty) in fields {
            let field = if path == ROOT {
                name.clone()
            } else {
                format!("{path}.{name}")
            };
            let expected = expected.get(name.as_str()).unwrap_or(&Value::Null);
            // stringified expectations carry native keys
            let actual = response
                .get((self.casing)(name).as_str())
                .or_else(|| response.get(name.as_str()))
                .unwrap_or(&Value::Null);
            tracing::trace!(%field, ?expected, ?actual, "comparing field");
            self.compare_field(&field, ty, expected, actual)?;
        }
        Ok(())
    }

    fn compare_field(
        &self,
        field: &str,
        ty: &FieldType,
        expected: &Value,
        actual: &Value,
    ) -> Result<(), ComparisonError> {
        let equal = match ty {
            FieldType::Object(fields) => {
                return self.compare_stringified(field, expected, actual, fields);
            }
            FieldType::Date | FieldType::Integer | FieldType::Float
                if is_blank(expected) || is_blank(actual) =>
            {
                is_blank(expected) && is_blank(actual)
            }
            FieldType::Date => parse_instant(field, expected)? == parse_instant(field, actual)?,
            FieldType::Enum => value_to_text(expected).to_uppercase() == value_to_text(actual),
            FieldType::Integer => integers_equal(field, expected, actual)?,
            FieldType::Float => {
                parse_number::<f64>(field, expected)? == parse_number::<f64>(field, actual)?
            }
            FieldType::String | FieldType::Boolean | FieldType::List => {
                if let (Value::Array(expected), Value::Array(actual)) = (expected, actual) {
                    expect_count(field, expected.len(), actual.len())?;
                }
                expected == &textify(actual)
            }
        };
        if equal {
            Ok(())
        } else {
            Err(ComparisonError::Mismatch {
                field: field.to_string(),
                expected: value_to_text(expected),
                actual: value_to_text(actual),
            })
        }
    }
}

fn as_object<'a>(field: &str, value: &'a Value) -> Result<&'a Object, ComparisonError> {
    value.as_object().ok_or_else(|| ComparisonError::NotAnObject {
        field: field.to_string(),
    })
}

fn expect_count(field: &str, expected: usize, actual: usize) -> Result<(), ComparisonError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ComparisonError::CountMismatch {
            field: field.to_string(),
            expected,
            actual,
        })
    }
}

fn expect_text(field: &str, expected: &str, actual: Option<&Value>) -> Result<(), ComparisonError> {
    let actual = actual.map(value_to_text).unwrap_or_default();
    if actual == expected {
        Ok(())
    } else {
        Err(ComparisonError::Mismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            actual,
        })
    }
}

/// Null, missing and empty values all render as empty text.
fn is_blank(value: &Value) -> bool {
    value_to_text(value).trim().is_empty()
}

fn render_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Integral floats such as `6.0` are accepted on either side.
fn integers_equal(field: &str, expected: &Value, actual: &Value) -> Result<bool, ComparisonError> {
    match (
        parse_number::<i64>(field, expected),
        parse_number::<i64>(field, actual),
    ) {
        (Ok(expected), Ok(actual)) => Ok(expected == actual),
        _ => {
            let expected = parse_number::<f64>(field, expected)?;
            let actual = parse_number::<f64>(field, actual)?;
            Ok(expected.fract() == 0.0 && actual.fract() == 0.0 && expected == actual)
        }
    }
}

fn parse_number<N: std::str::FromStr>(field: &str, value: &Value) -> Result<N, ComparisonError> {
    let text = value_to_text(value);
    text.trim()
        .parse()
        .map_err(|_| ComparisonError::InvalidNumber {
            field: field.to_string(),
            value: text,
        })
}

/// Offsets are honored. Timestamps without one are taken as UTC.
fn parse_instant(field: &str, value: &Value) -> Result<DateTime<Utc>, ComparisonError> {
    let text = value_to_text(value);
    DateTime::<FixedOffset>::parse_from_rfc3339(&text)
        .map(|instant| instant.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
        })
        .map_err(|_| ComparisonError::InvalidDate {
            field: field.to_string(),
            value: text,
        })
}

/// Compares with the default [`Comparator`], without panicking.
pub fn compare(
    expected: &Expected,
    response: &Value,
    fields: &FieldTypeMap,
) -> Result<(), ComparisonError> {
    Comparator::default().compare(expected, response, fields)
}

/// Asserts that `response` is equivalent to `expected` for every field of `fields`.
///
/// # Panics
///
/// Panics with the field, expected and actual values on the first mismatch.
#[track_caller]
pub fn assert_equivalent(expected: &Expected, response: &Value, fields: &FieldTypeMap) {
    if let Err(err) = compare(expected, response, fields) {
        panic!("{err}");
    }
}

/// Asserts that `response` is a successful payload whose result matches `expected`.
///
/// # Panics
///
/// Panics on the first mismatch.
#[track_caller]
pub fn assert_mutation_success(expected: &Expected, response: &Value, fields: &FieldTypeMap) {
    if let Err(err) = Comparator::default().compare_success(expected, response, fields) {
        panic!("{err}");
    }
}

/// Asserts that `response` is a failed payload carrying `expected` messages.
///
/// `fields` is usually [`message_fields`], or a subset of it.
///
/// # Panics
///
/// Panics on the first mismatch.
#[track_caller]
pub fn assert_mutation_failure(
    expected: &[ValidationMessage],
    response: &Value,
    fields: &FieldTypeMap,
) {
    if let Err(err) = Comparator::default().compare_failure(expected, response, fields) {
        panic!("{err}");
    }
}
