//! Payloads built by the normalizer, serialized, and checked with the test harness.

use apollo_mutation_payload::Changeset;
use apollo_mutation_payload::LengthKind;
use apollo_mutation_payload::MutationResult;
use apollo_mutation_payload::Payload;
use apollo_mutation_payload::Validation;
use apollo_mutation_payload::ValidationMessage;
use apollo_mutation_payload::ValidationOption;
use apollo_mutation_payload::normalize;
use apollo_mutation_payload::test_harness::Expected;
use apollo_mutation_payload::test_harness::FieldType;
use apollo_mutation_payload::test_harness::assert_mutation_failure;
use apollo_mutation_payload::test_harness::assert_mutation_success;
use apollo_mutation_payload::test_harness::field_types;
use apollo_mutation_payload::test_harness::message_fields;
use serde::Serialize;
use serde_json_bytes::Value;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct User {
    id: u32,
    first_name: String,
    role: &'static str,
    inserted_at: &'static str,
}

fn lilo() -> User {
    User {
        id: 1,
        first_name: "Lilo".to_string(),
        role: "ADMIN",
        inserted_at: "2017-03-24T20:05:00Z",
    }
}

fn wire<T: Serialize>(payload: &Payload<T>) -> Value {
    serde_json::from_str(&serde_json::to_string(payload).unwrap()).unwrap()
}

fn user_fields() -> apollo_mutation_payload::test_harness::FieldTypeMap {
    field_types([
        ("id", FieldType::Integer),
        ("first_name", FieldType::String),
        ("role", FieldType::Enum),
        ("inserted_at", FieldType::Date),
    ])
}

#[test]
fn successful_mutation_round_trips() {
    let payload = normalize::<_, Changeset<User>>(Ok::<_, String>(lilo()).into());
    assert!(payload.is_successful());

    let expected = Expected::map([
        ("id", Expected::from(1)),
        ("first_name", Expected::from("Lilo")),
        ("role", Expected::from("admin")),
        ("inserted_at", Expected::from("2017-03-24T20:05:00.000Z")),
    ]);
    assert_mutation_success(&expected, &wire(&payload), &user_fields());
}

#[test]
fn valid_changeset_round_trips() {
    let payload = normalize(MutationResult::Diff(
        Changeset::new(lilo()).change("first_name", "Lilo"),
    ));
    let expected = Expected::from_serializable(&lilo()).unwrap();
    // serialized keys are already camelCased, so compare them as they are
    let fields = field_types([
        ("id", FieldType::Integer),
        ("firstName", FieldType::String),
        ("insertedAt", FieldType::Date),
    ]);
    assert_mutation_success(&expected, &wire(&payload), &fields);
}

#[test]
fn invalid_changeset_round_trips() {
    let changeset = Changeset::new(lilo())
        .change("first_name", "Li")
        .add_error(
            "first_name",
            "should be at least %{count} character(s)",
            Some(Validation::Length(LengthKind::Min)),
            vec![ValidationOption::new("count", 3)],
        )
        .add_error("role", "is invalid", Some(Validation::Inclusion), vec![]);
    let payload = normalize(MutationResult::Diff(changeset));

    let expected = vec![
        ValidationMessage::builder()
            .code("min")
            .key("first_name")
            .template("should be at least %{count} character(s)")
            .message("should be at least 3 character(s)")
            .option(("count", 3))
            .value("Li")
            .build(),
        ValidationMessage::builder()
            .code("inclusion")
            .key("role")
            .message("is invalid")
            .build(),
    ];
    assert_mutation_failure(&expected, &wire(&payload), &message_fields());
}

#[test]
fn text_errors_round_trip() {
    let payload = normalize::<User, Changeset<User>>(Err::<User, _>("name taken").into());
    let expected = vec![ValidationMessage::from_text("unknown", "name taken")];
    assert_mutation_failure(&expected, &wire(&payload), &message_fields());
}

#[test]
#[should_panic(expected = "count mismatch")]
fn missing_messages_are_reported() {
    let payload = normalize::<User, Changeset<User>>(MutationResult::ErrorList(vec![
        "name taken".into(),
        "email taken".into(),
    ]));
    let expected = vec![ValidationMessage::from_text("unknown", "name taken")];
    assert_mutation_failure(&expected, &wire(&payload), &message_fields());
}
