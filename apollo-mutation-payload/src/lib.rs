//! Canonical mutation payloads.
//!
//! A mutation resolver may succeed with a value, fail with one or several errors, or
//! hand back an invalid change set. [`normalize()`] maps all of these to one [`Payload`]
//! shape: `successful`, a list of [`ValidationMessage`]s and a `result`.
//!
//! The [`test_harness`] module checks such payloads once they have gone through the wire.

mod casing;
mod changeset;
mod configuration;
mod json_ext;
mod message;
mod normalize;
mod payload;
pub mod test_harness;

pub use casing::CasingFn;
pub use casing::convert_key;
pub use casing::lower_camel_case;
pub use casing::preserve;
pub use changeset::ChangeDiff;
pub use changeset::Changeset;
pub use changeset::FieldError;
pub use changeset::LengthKind;
pub use changeset::NumberKind;
pub use changeset::Validation;
pub use changeset::extract_messages;
pub use configuration::Configuration;
pub use configuration::ConfigurationError;
pub use configuration::KeyCasing;
pub use configuration::generate_config_schema;
pub use json_ext::Object;
pub use json_ext::Value;
pub use message::UNKNOWN_CODE;
pub use message::ValidationMessage;
pub use message::ValidationOption;
pub use normalize::ErrorItem;
pub use normalize::MutationResult;
pub use normalize::NormalizeError;
pub use normalize::Normalizer;
pub use normalize::normalize;
pub use payload::Payload;
