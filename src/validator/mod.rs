//! Named validation rules evaluated against submitted values.
//!
//! A [`Validator`] maps rule names to boolean predicates through a static
//! table; the set of built-in rules is fixed at compile time, so there
//! is no runtime discovery. Values arrive as [`serde_json::Value`]
//! because submissions mix strings, numbers, and arrays; the numeric
//! rules accept numeric strings the way form data actually arrives.
//!
//! The form model never calls the validator itself: fields carry rule
//! descriptors opaquely, and application code wires the two together,
//! typically via [`Validator::validate_all`] over a field's `validation`
//! list.

mod ruleset;

pub use ruleset::{RuleMode, RuleSet};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::coerce::scalar_text;
use crate::error::ValidatorError;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("static pattern"));
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#]+[^\s]*$").expect("static pattern"));

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Extension → MIME lookups for the upload rule.
const MIME_TYPES: [(&str, &str); 18] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("pdf", "application/pdf"),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("html", "text/html"),
    ("json", "application/json"),
    ("zip", "application/zip"),
    ("doc", "application/msword"),
    ("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    ("xls", "application/vnd.ms-excel"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
];

/// A custom rule: receives the value and parameters and returns a JSON
/// value that must be a boolean.
pub type CustomRule = Arc<dyn Fn(&Value, &[Value]) -> Value + Send + Sync>;

/// Evaluates named boolean rules against submitted values.
///
/// # Example
///
/// ```rust
/// use formwright::Validator;
/// use serde_json::json;
///
/// let validator = Validator::new();
/// assert!(validator.validate(&json!("12"), "integer", &[]).unwrap());
/// assert!(!validator.validate(&json!("12.5"), "integer", &[]).unwrap());
///
/// let rules = vec![json!("string"), json!(["maxLength", 5])];
/// assert!(validator.validate_all(&json!("ok"), &rules).unwrap());
/// ```
pub struct Validator {
    custom: HashMap<String, CustomRule>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            custom: HashMap::new(),
        }
    }

    /// Registers a custom rule under `name`. Custom rules shadow nothing:
    /// built-in names are checked first.
    pub fn register(&mut self, name: impl Into<String>, rule: CustomRule) {
        self.custom.insert(name.into(), rule);
    }

    /// Evaluates one named rule against a value.
    ///
    /// # Errors
    ///
    /// [`ValidatorError::UnknownFunction`] for an unrecognized name;
    /// [`ValidatorError::UnableToValidate`] when a required parameter is
    /// missing or mistyped; [`ValidatorError::InvalidReturnType`] when a
    /// custom rule produces a non-boolean;
    /// [`ValidatorError::NoExtension`] / [`ValidatorError::MimeNotFound`]
    /// from the upload rule.
    pub fn validate(
        &self,
        value: &Value,
        rule: &str,
        parameters: &[Value],
    ) -> Result<bool, ValidatorError> {
        match rule {
            "number" => Ok(number(value)),
            "integer" => Ok(integer(value)),
            "float" => Ok(number(value) && !integer(value)),
            "positive" => Ok(to_f64(value).map(|f| f > 0.0).unwrap_or(false)),
            "negative" => Ok(to_f64(value).map(|f| f < 0.0).unwrap_or(false)),
            "zero" => Ok(to_f64(value).map(|f| f == 0.0).unwrap_or(false)),
            "string" => Ok(value.is_string()),
            "notEmpty" => Ok(!scalar_text(value).is_empty()),
            "maxLength" => {
                let max = length_parameter(value, rule, parameters)?;
                Ok(value
                    .as_str()
                    .map(|s| s.chars().count() <= max)
                    .unwrap_or(false))
            }
            "minLength" => {
                let min = length_parameter(value, rule, parameters)?;
                Ok(value
                    .as_str()
                    .map(|s| s.chars().count() >= min)
                    .unwrap_or(false))
            }
            "email" => Ok(value.as_str().map(|s| EMAIL.is_match(s)).unwrap_or(false)),
            "url" => Ok(value.as_str().map(|s| URL.is_match(s)).unwrap_or(false)),
            "date" => Ok(value
                .as_str()
                .map(|s| {
                    DATE_FORMATS
                        .iter()
                        .any(|f| NaiveDate::parse_from_str(s, f).is_ok())
                })
                .unwrap_or(false)),
            "time" => Ok(value
                .as_str()
                .map(|s| {
                    TIME_FORMATS
                        .iter()
                        .any(|f| NaiveTime::parse_from_str(s, f).is_ok())
                })
                .unwrap_or(false)),
            "uploadedFileType" => uploaded_file_type(value, parameters),
            name => match self.custom.get(name) {
                Some(custom) => match custom(value, parameters) {
                    Value::Bool(result) => Ok(result),
                    other => Err(ValidatorError::InvalidReturnType {
                        got: crate::coerce::type_name(&other).to_string(),
                    }),
                },
                None => Err(ValidatorError::UnknownFunction(name.to_string())),
            },
        }
    }

    /// True when the value passes every rule in the list. The first rule
    /// that errors propagates; the first rule that merely fails
    /// short-circuits to false.
    ///
    /// # Errors
    ///
    /// [`ValidatorError::NoFunctions`] for an empty list, plus anything
    /// [`Validator::validate`] raises.
    pub fn validate_all(&self, value: &Value, rules: &[Value]) -> Result<bool, ValidatorError> {
        if rules.is_empty() {
            return Err(ValidatorError::NoFunctions);
        }

        for descriptor in rules {
            let (rule, parameters) = split_descriptor(value, descriptor)?;
            if !self.validate(value, &rule, &parameters)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// True when the value passes at least one rule in the list.
    ///
    /// # Errors
    ///
    /// [`ValidatorError::NoFunctions`] for an empty list, plus anything
    /// [`Validator::validate`] raises.
    pub fn validate_any(&self, value: &Value, rules: &[Value]) -> Result<bool, ValidatorError> {
        if rules.is_empty() {
            return Err(ValidatorError::NoFunctions);
        }

        for descriptor in rules {
            let (rule, parameters) = split_descriptor(value, descriptor)?;
            if self.validate(value, &rule, &parameters)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Bundles a combination mode with rule descriptors.
    pub fn rule_set(mode: RuleMode, rules: Vec<Value>) -> RuleSet {
        RuleSet::new(mode, rules)
    }

    /// Evaluates a [`RuleSet`] according to its mode.
    pub fn validate_set(&self, value: &Value, set: &RuleSet) -> Result<bool, ValidatorError> {
        match set.mode() {
            RuleMode::All => self.validate_all(value, set.rules()),
            RuleMode::Any => self.validate_any(value, set.rules()),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

// rule helpers ------------------------------------------------------------

fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn number(value: &Value) -> bool {
    to_f64(value).is_some()
}

/// Integral check via the fractional part, so `"4.0"` and `4.0` both
/// count as integers.
fn integer(value: &Value) -> bool {
    to_f64(value).map(|f| f.fract() == 0.0).unwrap_or(false)
}

fn length_parameter(
    value: &Value,
    rule: &str,
    parameters: &[Value],
) -> Result<usize, ValidatorError> {
    parameters
        .first()
        .and_then(|p| match p {
            Value::Number(n) => n.as_u64().map(|n| n as usize),
            Value::String(s) => s.parse::<usize>().ok(),
            _ => None,
        })
        .ok_or_else(|| ValidatorError::UnableToValidate {
            rule: rule.to_string(),
            value: scalar_text(value),
        })
}

/// Checks an uploaded filename's MIME type (derived from its extension)
/// against the allowed types in `parameters`.
fn uploaded_file_type(value: &Value, parameters: &[Value]) -> Result<bool, ValidatorError> {
    let filename = scalar_text(value);

    let extension = filename
        .rsplit_once('.')
        .map(|(stem, ext)| (stem, ext.to_ascii_lowercase()))
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .map(|(_, ext)| ext)
        .ok_or_else(|| ValidatorError::NoExtension(filename.clone()))?;

    let mime = MIME_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .ok_or(ValidatorError::MimeNotFound(extension))?;

    Ok(parameters.iter().any(|allowed| scalar_text(allowed) == mime))
}

/// Splits a rule descriptor into its name and parameters: a bare string
/// is a parameterless rule, an array's head names the rule and its tail
/// carries the parameters.
fn split_descriptor(
    value: &Value,
    descriptor: &Value,
) -> Result<(String, Vec<Value>), ValidatorError> {
    match descriptor {
        Value::String(name) => Ok((name.clone(), Vec::new())),
        Value::Array(parts) => {
            let name = parts.first().and_then(Value::as_str).ok_or_else(|| {
                ValidatorError::UnableToValidate {
                    rule: descriptor.to_string(),
                    value: scalar_text(value),
                }
            })?;
            Ok((name.to_string(), parts[1..].to_vec()))
        }
        other => Err(ValidatorError::UnableToValidate {
            rule: other.to_string(),
            value: scalar_text(value),
        }),
    }
}
