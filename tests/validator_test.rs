//! Tests for the named validation rules and composite evaluators.

use std::sync::Arc;

use formwright::{RuleMode, RuleSet, Validator, ValidatorError};
use serde_json::json;

#[test]
fn test_email_rule() {
    let validator = Validator::new();
    assert!(validator
        .validate(&json!("dash@example.com"), "email", &[])
        .unwrap());
    assert!(!validator.validate(&json!("not-an-email"), "email", &[]).unwrap());
    assert!(!validator.validate(&json!("two@@example.com"), "email", &[]).unwrap());
    assert!(!validator.validate(&json!(42), "email", &[]).unwrap());
}

#[test]
fn test_url_rule() {
    let validator = Validator::new();
    assert!(validator
        .validate(&json!("https://example.com/path"), "url", &[])
        .unwrap());
    assert!(validator.validate(&json!("http://example.com"), "url", &[]).unwrap());
    assert!(!validator.validate(&json!("example.com"), "url", &[]).unwrap());
}

#[test]
fn test_date_rule_accepts_common_formats() {
    let validator = Validator::new();
    assert!(validator.validate(&json!("2024-02-29"), "date", &[]).unwrap());
    assert!(validator.validate(&json!("02/29/2024"), "date", &[]).unwrap());
    assert!(!validator.validate(&json!("2023-02-29"), "date", &[]).unwrap());
    assert!(!validator.validate(&json!("yesterday"), "date", &[]).unwrap());
}

#[test]
fn test_time_rule() {
    let validator = Validator::new();
    assert!(validator.validate(&json!("23:59"), "time", &[]).unwrap());
    assert!(validator.validate(&json!("09:30:15"), "time", &[]).unwrap());
    assert!(!validator.validate(&json!("25:00"), "time", &[]).unwrap());
}

#[test]
fn test_string_rules() {
    let validator = Validator::new();
    assert!(validator.validate(&json!("abc"), "string", &[]).unwrap());
    assert!(!validator.validate(&json!(3), "string", &[]).unwrap());
    assert!(validator.validate(&json!("x"), "notEmpty", &[]).unwrap());
    assert!(!validator.validate(&json!(""), "notEmpty", &[]).unwrap());
}

#[test]
fn test_length_rules_take_a_parameter() {
    let validator = Validator::new();
    assert!(validator
        .validate(&json!("short"), "maxLength", &[json!(10)])
        .unwrap());
    assert!(!validator
        .validate(&json!("much too long"), "maxLength", &[json!(10)])
        .unwrap());
    assert!(validator
        .validate(&json!("long enough"), "minLength", &[json!(5)])
        .unwrap());

    let err = validator.validate(&json!("x"), "maxLength", &[]).unwrap_err();
    assert!(matches!(err, ValidatorError::UnableToValidate { .. }));
}

#[test]
fn test_unknown_rule_name() {
    let validator = Validator::new();
    let err = validator.validate(&json!("x"), "telepathy", &[]).unwrap_err();
    match err {
        ValidatorError::UnknownFunction(name) => assert_eq!(name, "telepathy"),
        other => panic!("expected UnknownFunction, got {:?}", other),
    }
}

#[test]
fn test_uploaded_file_type() {
    let validator = Validator::new();

    assert!(validator
        .validate(
            &json!("photo.JPG"),
            "uploadedFileType",
            &[json!("image/jpeg"), json!("image/png")],
        )
        .unwrap());
    assert!(!validator
        .validate(&json!("photo.gif"), "uploadedFileType", &[json!("image/jpeg")])
        .unwrap());

    let err = validator
        .validate(&json!("archive"), "uploadedFileType", &[json!("image/jpeg")])
        .unwrap_err();
    assert!(matches!(err, ValidatorError::NoExtension(_)));

    let err = validator
        .validate(&json!("data.xyz"), "uploadedFileType", &[json!("image/jpeg")])
        .unwrap_err();
    assert!(matches!(err, ValidatorError::MimeNotFound(_)));
}

#[test]
fn test_validate_all_requires_every_rule() {
    let validator = Validator::new();
    let rules = vec![json!("string"), json!(["maxLength", 5])];

    assert!(validator.validate_all(&json!("ok"), &rules).unwrap());
    assert!(!validator.validate_all(&json!("too long here"), &rules).unwrap());
}

#[test]
fn test_validate_any_requires_one_rule() {
    let validator = Validator::new();
    let rules = vec![json!("number"), json!("email")];

    assert!(validator.validate_any(&json!("17"), &rules).unwrap());
    assert!(validator
        .validate_any(&json!("dash@example.com"), &rules)
        .unwrap());
    assert!(!validator.validate_any(&json!("neither"), &rules).unwrap());
}

#[test]
fn test_composites_reject_empty_rule_lists() {
    let validator = Validator::new();
    assert!(matches!(
        validator.validate_all(&json!("x"), &[]),
        Err(ValidatorError::NoFunctions)
    ));
    assert!(matches!(
        validator.validate_any(&json!("x"), &[]),
        Err(ValidatorError::NoFunctions)
    ));
}

#[test]
fn test_composites_propagate_rule_errors() {
    let validator = Validator::new();
    let rules = vec![json!("imaginary"), json!("string")];

    assert!(matches!(
        validator.validate_all(&json!("x"), &rules),
        Err(ValidatorError::UnknownFunction(_))
    ));
    assert!(matches!(
        validator.validate_any(&json!("x"), &rules),
        Err(ValidatorError::UnknownFunction(_))
    ));
}

#[test]
fn test_rule_sets_dispatch_on_mode() {
    let validator = Validator::new();

    let all = Validator::rule_set(RuleMode::All, vec![json!("number"), json!("positive")]);
    assert!(validator.validate_set(&json!(4), &all).unwrap());
    assert!(!validator.validate_set(&json!(-4), &all).unwrap());

    let any = RuleSet::any(vec![json!("zero"), json!("positive")]);
    assert!(validator.validate_set(&json!(0), &any).unwrap());
    assert!(!validator.validate_set(&json!(-1), &any).unwrap());
}

#[test]
fn test_custom_rules_must_return_booleans() {
    let mut validator = Validator::new();
    validator.register(
        "shouting",
        Arc::new(|value, _params| {
            json!(value
                .as_str()
                .map(|s| s == s.to_uppercase())
                .unwrap_or(false))
        }),
    );
    validator.register("confused", Arc::new(|_value, _params| json!("maybe")));

    assert!(validator.validate(&json!("HELLO"), "shouting", &[]).unwrap());
    assert!(!validator.validate(&json!("hello"), "shouting", &[]).unwrap());

    let err = validator.validate(&json!("x"), "confused", &[]).unwrap_err();
    assert!(matches!(err, ValidatorError::InvalidReturnType { .. }));
}

#[test]
fn test_field_validation_descriptors_feed_the_validator() {
    // the form model carries descriptors opaquely; application code hands
    // them to the validator
    use formwright::{Field, FieldRegistry};

    let registry = FieldRegistry::with_defaults();
    let field = Field::parse(
        &registry,
        &json!({"id": "email", "validation": ["notEmpty", "email"]}),
    )
    .unwrap();

    let validator = Validator::new();
    assert!(validator
        .validate_all(&json!("dash@example.com"), field.validation())
        .unwrap());
    assert!(!validator.validate_all(&json!(""), field.validation()).unwrap());
}
