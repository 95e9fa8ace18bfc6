//! Tests for form parsing, rendering, and submission feedback.

use formwright::{FieldRegistry, Form, FormError, ENCTYPE_MULTIPART, ENCTYPE_TEXT};
use serde_json::json;

fn registry() -> FieldRegistry {
    FieldRegistry::with_defaults()
}

fn simple_form() -> Form {
    Form::parse(
        &registry(),
        &json!({
            "id": "contact",
            "action": "/contact",
            "method": "post",
            "fieldsets": [
                {"id": "you", "legend": "You", "fields": [{"id": "name"}, {"id": "email"}]},
                {"id": "note", "legend": "Note", "fields": [{"id": "message", "type": "TextArea"}]},
            ],
        }),
    )
    .unwrap()
}

#[test]
fn test_parse_resolves_attributes() {
    let form = Form::parse(
        &registry(),
        &json!({
            "id": "f",
            "method": "GET",
            "enctype": "text/plain",
            "classes": "[\"compact\"]",
        }),
    )
    .unwrap();

    assert_eq!(form.method(), "get");
    assert_eq!(form.enctype(), ENCTYPE_TEXT);
    assert_eq!(form.classes(), ["compact".to_string()]);
}

#[test]
fn test_invalid_enctype_resets_to_default() {
    let form = Form::parse(&registry(), &json!({"id": "f", "enctype": "application/json"}))
        .unwrap();
    assert_eq!(form.enctype(), "application/x-www-form-urlencoded");
}

#[test]
fn test_classes_reject_unusable_shapes() {
    let err = Form::parse(&registry(), &json!({"id": "f", "classes": 5})).unwrap_err();
    assert!(matches!(err, FormError::InvalidClasses { .. }));

    let err = Form::parse(&registry(), &json!({"id": "f", "classes": "not json"})).unwrap_err();
    assert!(matches!(err, FormError::InvalidClasses { .. }));
}

#[test]
fn test_fieldset_failures_wrap_as_not_a_fieldset() {
    let err = Form::parse(
        &registry(),
        &json!({"id": "f", "fieldsets": [{"fields": [{"type": "Imaginary"}]}]}),
    )
    .unwrap_err();

    assert!(matches!(err, FormError::NotAFieldset(Some(_))));
}

#[test]
fn test_buttons_must_be_buttons() {
    let err = Form::parse(
        &registry(),
        &json!({"id": "f", "buttons": [{"id": "b", "type": "Text"}]}),
    )
    .unwrap_err();
    assert!(matches!(err, FormError::NotAButton(_)));

    let form = Form::parse(
        &registry(),
        &json!({"id": "f", "buttons": [{"type": "ResetButton", "label": "Clear"}]}),
    )
    .unwrap();
    assert_eq!(form.buttons().len(), 1);
}

#[test]
fn test_field_lookup_spans_fieldsets() {
    let form = simple_form();
    assert!(form.has_field("name"));
    assert!(form.has_field("message"));
    assert!(!form.has_field("missing"));
    assert_eq!(form.field("message").unwrap().type_tag(), "textarea");
    assert_eq!(form.fields().len(), 3);
}

#[test]
fn test_add_field_error_finds_the_owning_fieldset() {
    let mut form = simple_form();

    assert!(form.add_field_error("message", "too short", Some("hi")));
    let field = form.field("message").unwrap();
    assert!(field.error());
    assert_eq!(field.error_message(), "too short");
    assert_eq!(field.value(), "hi");

    // ids nowhere in the form report not-found
    assert!(!form.add_field_error("missing", "msg", None));
}

#[test]
fn test_add_field_value_keeps_submissions_on_redisplay() {
    let mut form = simple_form();
    assert!(form.add_field_value("email", "kept@example.com"));

    let html = form.render(false).unwrap();
    assert!(html.contains("value=\"kept@example.com\""));
}

#[test]
fn test_render_opening_tag_attributes() {
    let mut form = simple_form();
    let html = form.render(false).unwrap();

    assert!(html.starts_with("<form id=\"contact\" method=\"post\" action=\"/contact\""));
    assert!(html.contains("class=\"\""));
    assert!(html.contains("enctype=\"application/x-www-form-urlencoded\""));
    assert!(html.ends_with("</form>"));
}

#[test]
fn test_empty_action_is_omitted() {
    let mut form = Form::parse(&registry(), &json!({"id": "f"})).unwrap();
    let html = form.render(false).unwrap();
    assert!(!html.contains("action="));
}

#[test]
fn test_get_forms_never_emit_an_enctype() {
    let mut form = Form::parse(
        &registry(),
        &json!({
            "id": "f",
            "method": "get",
            "fieldsets": [{"id": "s", "fields": [{"id": "upload", "type": "File"}]}],
        }),
    )
    .unwrap();

    let html = form.render(false).unwrap();
    assert!(!html.contains("enctype="));
}

#[test]
fn test_file_fields_upgrade_post_forms_to_multipart() {
    let mut form = Form::parse(
        &registry(),
        &json!({
            "id": "f",
            "method": "post",
            "fieldsets": [{"id": "s", "fields": [{"id": "upload", "type": "File"}]}],
        }),
    )
    .unwrap();

    let html = form.render(false).unwrap();
    assert!(html.contains("enctype=\"multipart/form-data\""));
    assert_eq!(form.enctype(), ENCTYPE_MULTIPART);
}

#[test]
fn test_default_button_synthesis() {
    let mut form = simple_form();
    let html = form.render(false).unwrap();

    assert_eq!(html.matches("<button").count(), 1);
    assert!(html.contains("<button type=\"submit\""));
    assert!(html.contains("Submit</button>"));
}

#[test]
fn test_explicit_buttons_suppress_the_default() {
    let mut form = Form::parse(
        &registry(),
        &json!({
            "id": "f",
            "buttons": [{"type": "Button", "label": "Preview"}],
        }),
    )
    .unwrap();

    let html = form.render(false).unwrap();
    assert_eq!(html.matches("<button").count(), 1);
    assert!(html.contains("<button type=\"button\""));
    assert!(html.contains("Preview</button>"));
}

#[test]
fn test_error_state_renders_a_notice() {
    let mut form = simple_form();
    form.set_error("Please fix the marked fields.", true);

    let html = form.render(false).unwrap();
    assert!(html.contains("<div class=\"instructions notice notice-error\">"));
    assert!(html.contains("<p>Please fix the marked fields.</p>"));
}

#[test]
fn test_instructions_without_error_are_plain() {
    let mut form = simple_form();
    form.set_instructions("Fill this in.");

    let html = form.render(false).unwrap();
    assert!(html.contains("<div class=\"instructions\"><p>Fill this in.</p></div>"));
}
