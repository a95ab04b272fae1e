//! Mapping of raw resolver results to a [`Payload`].

use displaydoc::Display;
use serde_json_bytes::ByteString;
use thiserror::Error;

use crate::casing::CasingFn;
use crate::casing::convert_key;
use crate::casing::lower_camel_case;
use crate::changeset::ChangeDiff;
use crate::changeset::Changeset;
use crate::changeset::extract_messages;
use crate::configuration::Configuration;
use crate::json_ext::Value;
use crate::message::UNKNOWN_CODE;
use crate::message::ValidationMessage;
use crate::payload::Payload;

/// Contract violations found while reading resolver errors.
///
/// These point at a defect in the resolver and are never turned into a [`Payload`].
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NormalizeError {
    /// error list items must be validation messages or strings, found {kind}
    UnrecognizedErrorItem {
        /// The JSON kind of the rejected item.
        kind: &'static str,
    },

    /// malformed validation message: {reason}
    MalformedMessage {
        /// Why the message could not be decoded.
        reason: String,
    },
}

/// One entry of an error list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorItem {
    Message(ValidationMessage),
    Text(String),
}

impl From<ValidationMessage> for ErrorItem {
    fn from(message: ValidationMessage) -> Self {
        ErrorItem::Message(message)
    }
}

impl From<String> for ErrorItem {
    fn from(text: String) -> Self {
        ErrorItem::Text(text)
    }
}

impl From<&str> for ErrorItem {
    fn from(text: &str) -> Self {
        ErrorItem::Text(text.to_string())
    }
}

impl TryFrom<Value> for ErrorItem {
    type Error = NormalizeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(ErrorItem::Text(text.as_str().to_string())),
            Value::Object(mut object) => {
                // wire messages may omit either text field, but not both
                match (object.get("template").is_some(), object.get("message").cloned()) {
                    (false, Some(message)) => {
                        object.insert(ByteString::from("template"), message);
                    }
                    (true, None) => {
                        let template = object.get("template").cloned().unwrap_or_default();
                        object.insert(ByteString::from("message"), template);
                    }
                    _ => {}
                }
                serde_json_bytes::from_value(Value::Object(object))
                    .map(ErrorItem::Message)
                    .map_err(|err| NormalizeError::MalformedMessage {
                        reason: err.to_string(),
                    })
            }
            other => Err(NormalizeError::UnrecognizedErrorItem {
                kind: json_kind(&other),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// What a mutation resolver produced.
#[derive(Clone, Debug, PartialEq)]
pub enum MutationResult<T, D = Changeset<T>> {
    /// The mutation succeeded with this value.
    Success(T),
    /// The mutation failed with a single structured message.
    ErrorMessage(ValidationMessage),
    /// The mutation failed with a plain text error.
    ErrorText(String),
    /// The mutation failed with several errors.
    ErrorList(Vec<ErrorItem>),
    /// The mutation produced a change set. Only an invalid one is an error.
    Diff(D),
}

impl<T, D> MutationResult<T, D> {
    /// An error list read from loosely-typed values.
    ///
    /// Any item that is neither a string nor a message object is rejected.
    pub fn error_values(values: Vec<Value>) -> Result<Self, NormalizeError> {
        values
            .into_iter()
            .map(ErrorItem::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map(MutationResult::ErrorList)
            .inspect_err(|err| {
                tracing::error!(error = %err, "resolver returned an unrecognized error")
            })
    }

    /// A resolution that may already carry errors.
    ///
    /// Accumulated errors take precedence over the value.
    pub fn from_resolution(value: T, errors: Vec<ErrorItem>) -> Self {
        if errors.is_empty() {
            MutationResult::Success(value)
        } else {
            MutationResult::ErrorList(errors)
        }
    }
}

impl<T, D, E> From<Result<T, E>> for MutationResult<T, D>
where
    E: Into<ErrorItem>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => MutationResult::Success(value),
            Err(error) => match error.into() {
                ErrorItem::Message(message) => MutationResult::ErrorMessage(message),
                ErrorItem::Text(text) => MutationResult::ErrorText(text),
            },
        }
    }
}

/// Builds payloads from mutation results.
#[derive(Clone, Debug)]
pub struct Normalizer {
    casing: CasingFn,
    unknown_code: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::with_casing(lower_camel_case)
    }
}

impl From<&Configuration> for Normalizer {
    fn from(configuration: &Configuration) -> Self {
        Self {
            casing: configuration.key_casing.casing(),
            unknown_code: configuration.unknown_code.clone(),
        }
    }
}

impl Normalizer {
    /// A normalizer passing message keys through `casing`.
    pub fn with_casing(casing: CasingFn) -> Self {
        Self {
            casing,
            unknown_code: UNKNOWN_CODE.to_string(),
        }
    }

    /// The casing applied to message keys.
    pub fn casing(&self) -> CasingFn {
        self.casing
    }

    pub fn normalize<T, D>(&self, raw: MutationResult<T, D>) -> Payload<T>
    where
        D: ChangeDiff<Data = T>,
    {
        let messages = match raw {
            MutationResult::Success(value) => return self.success(value),
            MutationResult::Diff(diff) if diff.is_valid() => return self.success(diff.into_data()),
            MutationResult::Diff(diff) => extract_messages(&diff),
            MutationResult::ErrorMessage(message) => vec![message],
            MutationResult::ErrorText(text) => vec![self.text_message(text)],
            MutationResult::ErrorList(items) => items
                .into_iter()
                .map(|item| match item {
                    ErrorItem::Message(message) => message,
                    ErrorItem::Text(text) => self.text_message(text),
                })
                .collect(),
        };
        tracing::debug!(count = messages.len(), "mutation failed");
        Payload::error(
            messages
                .into_iter()
                .map(|message| convert_key(message, self.casing))
                .collect(),
        )
    }

    fn success<T>(&self, value: T) -> Payload<T> {
        tracing::trace!("mutation succeeded");
        Payload::success(value)
    }

    fn text_message(&self, text: String) -> ValidationMessage {
        ValidationMessage::from_text(self.unknown_code.as_str(), text)
    }
}

/// Normalizes `raw` with the default [`Normalizer`].
pub fn normalize<T, D>(raw: MutationResult<T, D>) -> Payload<T>
where
    D: ChangeDiff<Data = T>,
{
    Normalizer::default().normalize(raw)
}
