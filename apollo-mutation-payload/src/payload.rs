use serde::Serialize;

use crate::message::ValidationMessage;

/// The canonical response of a mutation.
///
/// Either `successful` with a `result` and no messages, or unsuccessful
/// with messages and a `null` result. Serializes to exactly those three fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Payload<T> {
    successful: bool,
    messages: Vec<ValidationMessage>,
    result: Option<T>,
}

impl<T> Payload<T> {
    /// A successful payload carrying `result`.
    pub fn success(result: T) -> Self {
        Self {
            successful: true,
            messages: Vec::new(),
            result: Some(result),
        }
    }

    /// An unsuccessful payload carrying `messages`.
    pub fn error(messages: Vec<ValidationMessage>) -> Self {
        Self {
            successful: false,
            messages,
            result: None,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.successful
    }

    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Consumes the payload, returning the mutation result if it succeeded.
    pub fn into_result(self) -> Option<T> {
        self.result
    }
}
