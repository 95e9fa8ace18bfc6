//! Serialize → parse round-trip properties: re-parsing a serialized
//! graph is stable, and values survive unchanged.

use formwright::{Field, FieldRegistry, Fieldset, FieldsetEntry, Form};
use serde_json::json;

fn registry() -> FieldRegistry {
    FieldRegistry::with_defaults()
}

#[test]
fn test_field_value_survives_the_round_trip() {
    let field = Field::parse(
        &registry(),
        &json!({"id": "email", "value": "kept@example.com"}),
    )
    .unwrap();

    let reparsed = Field::parse(&registry(), &field.to_json()).unwrap();
    assert_eq!(reparsed.value(), field.value());
    assert_eq!(reparsed.id(), field.id());
    assert_eq!(reparsed.label(), field.label());
}

#[test]
fn test_serialized_type_tags_resolve_again() {
    // serialization writes lowercase tags; parsing must still resolve them
    for type_name in ["TextArea", "SelectOneWithOther", "SubmitButton", "Hidden"] {
        let field = Field::parse(&registry(), &json!({"id": "x", "type": type_name})).unwrap();
        let reparsed = Field::parse(&registry(), &field.to_json()).unwrap();
        assert_eq!(reparsed.type_tag(), field.type_tag(), "{}", type_name);
    }
}

#[test]
fn test_field_reparse_is_idempotent() {
    let field = Field::parse(
        &registry(),
        &json!({
            "id": "pick",
            "type": "SelectMany",
            "required": true,
            "classes": "wide tall",
            "options": {"a": "Ay", "b": "Bee"},
            "additionalAttributes": {"data-x": "1"},
            "validation": ["notEmpty"],
            "value": ["a"],
        }),
    )
    .unwrap();

    let first = field.to_json();
    let second = Field::parse(&registry(), &first).unwrap().to_json();
    assert_eq!(first, second);
}

#[test]
fn test_fieldset_reparse_is_idempotent() {
    let fieldset = Fieldset::parse(
        &registry(),
        &json!({
            "id": "outer",
            "legend": "Outer",
            "classes": "boxed",
            "fields": [
                {"id": "name"},
                {"id": "inner", "legend": "Inner", "fields": [{"id": "deep"}]},
            ],
        }),
    )
    .unwrap();

    let first = fieldset.to_json();
    let reparsed = Fieldset::parse(&registry(), &first).unwrap();
    assert_eq!(first, reparsed.to_json());

    // the nested child fieldset came back as a child fieldset
    match reparsed.fields().nth(1).unwrap() {
        FieldsetEntry::Fieldset(inner) => {
            assert!(inner.is_child());
            assert!(inner.has_field("deep"));
        }
        FieldsetEntry::Field(_) => panic!("nested fieldset was flattened"),
    };
}

#[test]
fn test_form_reparse_is_idempotent() {
    let form = Form::parse(
        &registry(),
        &json!({
            "id": "contact",
            "action": "/send",
            "method": "post",
            "enctype": "multipart/form-data",
            "classes": ["compact"],
            "instructions": "Say hello.",
            "fieldsets": [
                {"id": "you", "legend": "You", "fields": [
                    {"id": "name", "required": true},
                    {"id": "age", "type": "Number", "additionalAttributes": {"min": "0"}},
                ]},
            ],
            "buttons": [{"id": "send", "type": "SubmitButton", "label": "Send"}],
        }),
    )
    .unwrap();

    let first = form.to_json();
    let reparsed = Form::parse(&registry(), &first).unwrap();
    assert_eq!(first, reparsed.to_json());
    assert_eq!(form, reparsed);
}

#[test]
fn test_feedback_survives_serialization() {
    let mut form = Form::parse(
        &registry(),
        &json!({
            "id": "f",
            "fieldsets": [{"id": "s", "fields": [{"id": "email"}]}],
        }),
    )
    .unwrap();

    form.add_field_error("email", "looks wrong", Some("bad@"));

    let reparsed = Form::parse(&registry(), &form.to_json()).unwrap();
    let field = reparsed.field("email").unwrap();
    assert!(field.error());
    assert_eq!(field.error_message(), "looks wrong");
    assert_eq!(field.value(), "bad@");
}
