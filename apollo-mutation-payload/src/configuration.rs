//! Logic for loading configuration in to an object model

use displaydoc::Display;
use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::casing::CasingFn;
use crate::casing::lower_camel_case;
use crate::casing::preserve;
use crate::message::UNKNOWN_CODE;

/// Configuration error.
#[derive(Debug, Error, Display)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// could not deserialize configuration: {0}
    DeserializeConfigError(serde_yaml::Error),
}

/// How mutation payloads are built.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct Configuration {
    /// Casing applied to the key of every validation message.
    /// default: lower_camel_case
    pub key_casing: KeyCasing,

    /// Code given to errors reported as plain text.
    /// default: "unknown"
    pub unknown_code: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            key_casing: KeyCasing::default(),
            unknown_code: UNKNOWN_CODE.to_string(),
        }
    }
}

impl Configuration {
    /// Parses a YAML document. Missing fields take their default.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigurationError> {
        serde_yaml::from_str(raw).map_err(ConfigurationError::DeserializeConfigError)
    }
}

/// Casing of message keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum KeyCasing {
    /// `first_name` becomes `firstName`
    #[default]
    LowerCamelCase,
    /// Keys are reported as the validation layer wrote them
    Preserve,
}

impl KeyCasing {
    pub fn casing(self) -> CasingFn {
        match self {
            KeyCasing::LowerCamelCase => lower_camel_case,
            KeyCasing::Preserve => preserve,
        }
    }
}

/// Generate a JSON schema for the configuration.
pub fn generate_config_schema() -> RootSchema {
    schemars::schema_for!(Configuration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let configuration = Configuration::from_yaml("{}").unwrap();
        assert_eq!(configuration, Configuration::default());
        assert_eq!(configuration.key_casing, KeyCasing::LowerCamelCase);
        assert_eq!(configuration.unknown_code, "unknown");
    }

    #[test]
    fn key_casing_is_read() {
        let configuration = Configuration::from_yaml("key_casing: preserve").unwrap();
        assert_eq!(configuration.key_casing, KeyCasing::Preserve);
        assert_eq!((configuration.key_casing.casing())("first_name"), "first_name");
        assert_eq!(
            (KeyCasing::LowerCamelCase.casing())("first_name"),
            "firstName"
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = Configuration::from_yaml("key_casing: preserve\nunknown: true").unwrap_err();
        assert!(error.to_string().starts_with("could not deserialize configuration"));
    }

    #[test]
    fn unknown_casing_is_rejected() {
        assert!(Configuration::from_yaml("key_casing: kebab").is_err());
    }

    #[test]
    fn schema_lists_every_field() {
        let schema = serde_json::to_value(generate_config_schema()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("key_casing"));
        assert!(properties.contains_key("unknown_code"));
        assert_eq!(schema["additionalProperties"], serde_json::json!(false));
    }
}
