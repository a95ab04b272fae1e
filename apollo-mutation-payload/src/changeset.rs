//! Record change sets and the extraction of their field errors.
//!
//! A change set records the changes proposed for a record along with a validity flag.
//! When it is invalid, every [`FieldError`] it carries becomes one [`ValidationMessage`].

use serde_json_bytes::ByteString;

use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::message::UNKNOWN_CODE;
use crate::message::ValidationMessage;
use crate::message::ValidationOption;
use crate::message::render_template;

/// Anything that can report whether a proposed set of changes is valid.
pub trait ChangeDiff {
    /// The record produced by a valid diff.
    type Data;

    /// Whether the proposed changes passed validation.
    fn is_valid(&self) -> bool;

    /// The per-field errors, in the order they were recorded.
    fn field_errors(&self) -> Vec<FieldError>;

    /// Consumes the diff, returning the record it describes.
    fn into_data(self) -> Self::Data;
}

/// The comparison a `length` validation performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum LengthKind {
    /// At least `count`.
    Min,
    /// At most `count`.
    Max,
    /// Exactly `count`.
    Is,
}

/// The comparison a `number` validation performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum NumberKind {
    LessThan,
    GreaterThan,
    LessThanOrEqualTo,
    GreaterThanOrEqualTo,
    EqualTo,
    NotEqualTo,
}

/// The validation a field failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validation {
    Required,
    Format,
    Inclusion,
    Exclusion,
    Subset,
    Acceptance,
    Confirmation,
    Cast,
    Unique,
    Length(LengthKind),
    Number(NumberKind),
    /// A validation defined by the application.
    Custom(String),
}

impl Validation {
    /// The message code reported for this validation.
    pub fn code(&self) -> &str {
        match self {
            Validation::Required => "required",
            Validation::Format => "format",
            Validation::Inclusion => "inclusion",
            Validation::Exclusion => "exclusion",
            Validation::Subset => "subset",
            Validation::Acceptance => "acceptance",
            Validation::Confirmation => "confirmation",
            Validation::Cast => "cast",
            Validation::Unique => "unique",
            Validation::Length(LengthKind::Is) => "length",
            Validation::Length(kind) => (*kind).into(),
            Validation::Number(kind) => (*kind).into(),
            Validation::Custom(name) => name,
        }
    }
}

/// One error recorded against one field of a diff.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    /// The field, in the producer's casing.
    pub field: String,
    /// Message template, which may contain `%{name}` placeholders.
    pub template: String,
    /// The failed validation, if known.
    pub validation: Option<Validation>,
    /// Values used to render the template.
    pub options: Vec<ValidationOption>,
    /// The value that failed validation.
    pub value: Option<Value>,
}

impl From<FieldError> for ValidationMessage {
    fn from(error: FieldError) -> Self {
        let code = error
            .validation
            .as_ref()
            .map_or(UNKNOWN_CODE, Validation::code)
            .to_string();
        let message = render_template(&error.template, &error.options);
        ValidationMessage {
            code,
            key: Some(error.field),
            template: error.template,
            message,
            options: error.options,
            value: error.value,
        }
    }
}

/// Returns one message per field error of an invalid diff, in order.
///
/// A valid diff never yields messages.
pub fn extract_messages<D: ChangeDiff>(diff: &D) -> Vec<ValidationMessage> {
    if diff.is_valid() {
        return Vec::new();
    }
    diff.field_errors()
        .into_iter()
        .map(ValidationMessage::from)
        .collect()
}

/// Changes proposed for a record of type `T`.
///
/// The change set becomes invalid as soon as an error is added.
#[derive(Clone, Debug, PartialEq)]
pub struct Changeset<T> {
    data: T,
    changes: Object,
    errors: Vec<FieldError>,
}

impl<T> Changeset<T> {
    /// A valid change set with no changes.
    pub fn new(data: T) -> Self {
        Self {
            data,
            changes: Object::new(),
            errors: Vec::new(),
        }
    }

    /// Records the new value of `field`.
    pub fn change(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.changes
            .insert(ByteString::from(field.into()), value.into());
        self
    }

    /// Records an error against `field`, invalidating the change set.
    ///
    /// The offending value is taken from the change recorded for `field`, if any.
    pub fn add_error(
        mut self,
        field: impl Into<String>,
        template: impl Into<String>,
        validation: Option<Validation>,
        options: Vec<ValidationOption>,
    ) -> Self {
        let field = field.into();
        let value = self.changes.get(field.as_str()).cloned();
        self.errors.push(FieldError {
            field,
            template: template.into(),
            validation,
            options,
            value,
        });
        self
    }

    /// The recorded changes.
    pub fn changes(&self) -> &Object {
        &self.changes
    }

    /// The record the changes apply to.
    pub fn data(&self) -> &T {
        &self.data
    }
}

impl<T> ChangeDiff for Changeset<T> {
    type Data = T;

    fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn field_errors(&self) -> Vec<FieldError> {
        self.errors.clone()
    }

    fn into_data(self) -> T {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use serde_json_bytes::json;

    use super::*;

    #[test]
    fn validation_codes() {
        assert_eq!(Validation::Required.code(), "required");
        assert_eq!(Validation::Length(LengthKind::Min).code(), "min");
        assert_eq!(Validation::Length(LengthKind::Max).code(), "max");
        assert_eq!(Validation::Length(LengthKind::Is).code(), "length");
        assert_eq!(
            Validation::Number(NumberKind::GreaterThanOrEqualTo).code(),
            "greater_than_or_equal_to"
        );
        assert_eq!(Validation::Custom("too_short".into()).code(), "too_short");
    }

    #[test]
    fn valid_changeset_yields_no_messages() {
        let changeset = Changeset::new(()).change("first_name", "Lilo");
        assert!(changeset.is_valid());
        assert!(extract_messages(&changeset).is_empty());
    }

    #[test]
    fn extracts_messages_in_order() {
        let changeset = Changeset::new(())
            .change("first_name", "Li")
            .add_error(
                "first_name",
                "should be at least %{count} character(s)",
                Some(Validation::Length(LengthKind::Min)),
                vec![ValidationOption::new("count", 3)],
            )
            .add_error(
                "last_name",
                "can't be blank",
                Some(Validation::Required),
                vec![],
            );
        assert!(!changeset.is_valid());

        let messages = extract_messages(&changeset);
        assert_eq!(messages.len(), 2);

        assert_eq!(messages[0].code, "min");
        assert_eq!(messages[0].key.as_deref(), Some("first_name"));
        assert_eq!(
            messages[0].template,
            "should be at least %{count} character(s)"
        );
        assert_eq!(messages[0].message, "should be at least 3 character(s)");
        assert_eq!(messages[0].options, vec![ValidationOption::new("count", 3)]);
        assert_eq!(messages[0].value, Some(json!("Li")));

        assert_eq!(messages[1].code, "required");
        assert_eq!(messages[1].key.as_deref(), Some("last_name"));
        assert_eq!(messages[1].message, "can't be blank");
        assert_eq!(messages[1].value, None);
    }

    #[test]
    fn untyped_field_errors_are_unknown() {
        let changeset = Changeset::new(()).add_error("email", "is invalid", None, vec![]);
        let messages = extract_messages(&changeset);
        assert_eq!(messages[0].code, UNKNOWN_CODE);
    }
}
