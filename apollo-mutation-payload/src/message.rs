//! Structured validation messages, as found in the `messages` field of a [`Payload`].
//!
//! [`Payload`]: crate::Payload

use serde::Deserialize;
use serde::Serialize;

use crate::json_ext::Value;
use crate::json_ext::value_to_text;

/// Code given to errors that carry no validation kind.
pub const UNKNOWN_CODE: &str = "unknown";

/// One key/value pair used to render the template of a [`ValidationMessage`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ValidationOption {
    /// Name of the placeholder, as used in `%{name}`.
    pub key: String,
    /// Value substituted for the placeholder.
    pub value: Value,
}

impl ValidationOption {
    /// Creates an option from its components.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K, V> From<(K, V)> for ValidationOption
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// A field-level or general validation failure.
///
/// Converted to (or from) JSON with serde. Every field is always serialized,
/// `key` and `value` as `null` when absent.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ValidationMessage {
    /// Symbolic identifier of the failure kind, such as `required` or `too_short`.
    pub code: String,

    /// The offending field, or `None` for errors not scoped to a field.
    #[serde(default)]
    pub key: Option<String>,

    /// Message template, which may contain `%{name}` placeholders.
    pub template: String,

    /// Fully rendered message.
    pub message: String,

    /// Values used to render the template.
    #[serde(default)]
    pub options: Vec<ValidationOption>,

    /// The offending value, when the producer of the message knows it.
    #[serde(default)]
    pub value: Option<Value>,
}

#[buildstructor::buildstructor]
impl ValidationMessage {
    /// Returns a builder that builds a [`ValidationMessage`] from its components.
    ///
    /// Builder methods:
    ///
    /// * `.code(impl Into<`[`String`]`>)`
    ///   Required.
    ///
    /// * `.message(impl Into<`[`String`]`>)`
    ///   Required.
    ///
    /// * `.template(impl Into<`[`String`]`>)`
    ///   Optional. Defaults to the message.
    ///
    /// * `.key(impl Into<`[`String`]`>)`
    ///   Optional.
    ///
    /// * `.options(impl Into<`[`Vec`]`<`[`ValidationOption`]`>>)`
    ///   Optional. Sets every option at once.
    ///
    /// * `.option(impl Into<`[`ValidationOption`]`>)`
    ///   Optional, may be called multiple times.
    ///
    /// * `.value(impl Into<`[`Value`]`>)`
    ///   Optional.
    ///
    /// * `.build()`
    ///   Finishes the builder and returns a [`ValidationMessage`].
    #[builder(visibility = "pub")]
    fn new(
        code: String,
        key: Option<String>,
        template: Option<String>,
        message: String,
        options: Vec<ValidationOption>,
        value: Option<Value>,
    ) -> Self {
        Self {
            code,
            key,
            template: template.unwrap_or_else(|| message.clone()),
            message,
            options,
            value,
        }
    }
}

impl ValidationMessage {
    /// A general message whose template and rendered text are both `text`.
    pub fn from_text(code: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            code: code.into(),
            key: None,
            template: text.clone(),
            message: text,
            options: Vec::new(),
            value: None,
        }
    }

    /// Returns the option named `key`, if any.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options
            .iter()
            .find(|option| option.key == key)
            .map(|option| &option.value)
    }
}

/// Substitutes every `%{name}` placeholder for which an option exists.
///
/// Placeholders without a matching option are left untouched.
pub(crate) fn render_template(template: &str, options: &[ValidationOption]) -> String {
    options.iter().fold(template.to_string(), |rendered, option| {
        rendered.replace(
            &format!("%{{{}}}", option.key),
            &value_to_text(&option.value),
        )
    })
}
