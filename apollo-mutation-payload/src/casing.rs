//! Field key casing.

use crate::message::ValidationMessage;

/// A pure function mapping a field identifier to the casing the API consumer expects.
pub type CasingFn = fn(&str) -> String;

/// `first_name` becomes `firstName`.
///
/// Only underscores delimit words. Characters other than the first of each word are
/// kept as written, so `user_ID` becomes `userID` and casing an already cased key is a no-op.
pub fn lower_camel_case(key: &str) -> String {
    let mut camel = String::with_capacity(key.len());
    for (index, word) in key.split('_').enumerate() {
        let mut chars = word.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        if index == 0 {
            camel.push(first);
        } else {
            camel.extend(first.to_uppercase());
        }
        camel.push_str(chars.as_str());
    }
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => camel,
    }
}

/// Leaves keys as the producer wrote them.
pub fn preserve(key: &str) -> String {
    key.to_string()
}

/// Returns `message` with its key passed through `casing`.
///
/// General messages (no key) come back unchanged.
pub fn convert_key(message: ValidationMessage, casing: CasingFn) -> ValidationMessage {
    ValidationMessage {
        key: message.key.as_deref().map(casing),
        ..message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camelizes_underscored_keys() {
        assert_eq!(lower_camel_case("first_name"), "firstName");
        assert_eq!(lower_camel_case("address_line_2"), "addressLine2");
        assert_eq!(lower_camel_case("name"), "name");
        assert_eq!(lower_camel_case("firstName"), "firstName");
        assert_eq!(lower_camel_case("a_b_c"), "aBC");
        assert_eq!(lower_camel_case("_id"), "id");
        assert_eq!(lower_camel_case("Name"), "name");
        assert_eq!(lower_camel_case(""), "");
    }

    #[test]
    fn inner_capitals_are_kept() {
        assert_eq!(lower_camel_case("user_ID"), "userID");
        assert_eq!(lower_camel_case("already_camelCase"), "alreadyCamelCase");
        assert_eq!(lower_camel_case("html_URL_path"), "htmlURLPath");
    }

    #[test]
    fn convert_key_only_touches_the_key() {
        let message = ValidationMessage::builder()
            .code("required")
            .key("first_name")
            .template("%{field} can't be blank")
            .message("first_name can't be blank")
            .option(("field", "first_name"))
            .value("")
            .build();
        let converted = convert_key(message.clone(), lower_camel_case);
        assert_eq!(converted.key.as_deref(), Some("firstName"));
        assert_eq!(
            ValidationMessage {
                key: message.key.clone(),
                ..converted
            },
            message
        );
    }

    #[test]
    fn convert_key_ignores_general_messages() {
        let message = ValidationMessage::from_text("unknown", "name taken");
        assert_eq!(convert_key(message.clone(), lower_camel_case), message);
    }

    #[test]
    fn convert_key_is_idempotent() {
        for key in ["first_name", "a_b_c", "already_camelCase", "x", "user_ID", "_id", "Name"] {
            let message = ValidationMessage::builder()
                .code("required")
                .key(key)
                .message("can't be blank")
                .build();
            let once = convert_key(message, lower_camel_case);
            let twice = convert_key(once.clone(), lower_camel_case);
            assert_eq!(once, twice, "casing of {key} is not stable");
        }
    }

    #[test]
    fn preserve_keeps_keys() {
        let message = ValidationMessage::builder()
            .code("required")
            .key("first_name")
            .message("can't be blank")
            .build();
        assert_eq!(convert_key(message.clone(), preserve), message);
    }
}
