//! Tolerant-shape coercion for wire-format properties.
//!
//! Several properties in the JSON form description accept more than one
//! shape: a native array or object, a JSON-encoded string, or a delimited
//! string. This module pins the precedence order in one place so every
//! parse surface coerces identically:
//!
//! 1. A native array or object is used as-is.
//! 2. A string is decoded as JSON; the result is used only when it is an
//!    array or object (a string that decodes to a scalar falls through).
//! 3. Otherwise the string is split on `|` when one is present, else on
//!    whitespace; entries are trimmed and empties dropped.
//!
//! The order matters: `"a b c"` and `"[\"a\",\"b\",\"c\"]"` are both valid
//! inputs for the same property and must not collide.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::FieldError;
use crate::field::OptionEntry;

/// An intermediate canonical shape: an ordered list or an ordered mapping.
///
/// Adapters below turn a `Shape` into the concrete representation each
/// property wants (class list, option map, attribute map, rule list).
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

/// Coerces a wire value into a [`Shape`] using the documented precedence.
///
/// `Null` coerces to an empty list. Scalars other than strings coerce to a
/// single-entry list of their text form; only class-list callers reject
/// them first (see [`coerce_classes`]).
pub fn coerce(value: &Value) -> Shape {
    match value {
        Value::Array(items) => Shape::List(items.clone()),
        Value::Object(map) => Shape::Map(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
        Value::String(s) => coerce_string(s),
        Value::Null => Shape::List(Vec::new()),
        other => Shape::List(vec![Value::String(scalar_text(other))]),
    }
}

/// Strict variant for class-list properties: anything that is not an
/// array, object, or string fails with [`FieldError::InvalidClasses`].
pub fn coerce_classes(value: &Value) -> Result<Vec<String>, FieldError> {
    match value {
        Value::Array(_) | Value::Object(_) | Value::String(_) | Value::Null => {
            Ok(as_string_list(coerce(value)))
        }
        other => Err(FieldError::InvalidClasses {
            got: type_name(other).to_string(),
        }),
    }
}

fn coerce_string(s: &str) -> Shape {
    // JSON first: a decoded array or object wins outright.  a decoded
    // scalar is indistinguishable from its delimited form, so it falls
    // through to the split below.
    if let Ok(decoded) = serde_json::from_str::<Value>(s) {
        match decoded {
            Value::Array(items) => return Shape::List(items),
            Value::Object(map) => {
                return Shape::Map(map.into_iter().collect());
            }
            _ => {}
        }
    }

    let entries: Vec<Value> = if s.contains('|') {
        s.split('|')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| Value::String(entry.to_string()))
            .collect()
    } else {
        s.split_whitespace()
            .map(|entry| Value::String(entry.to_string()))
            .collect()
    };

    Shape::List(entries)
}

/// Flattens a shape into an ordered string list; a mapping contributes its
/// values in order. Empty entries are dropped.
pub fn as_string_list(shape: Shape) -> Vec<String> {
    let values: Vec<Value> = match shape {
        Shape::List(items) => items,
        Shape::Map(map) => map.into_values().collect(),
    };

    values
        .iter()
        .map(scalar_text)
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Builds the canonical option map. A mapping is taken as
/// value → label, with one optional level of grouping (an object value
/// becomes a labeled group). A list canonicalizes each entry to
/// value == label.
pub fn as_option_map(shape: Shape) -> IndexMap<String, OptionEntry> {
    match shape {
        Shape::Map(map) => map
            .into_iter()
            .map(|(value, label)| match label {
                Value::Object(group) => {
                    let inner: IndexMap<String, String> = group
                        .into_iter()
                        .map(|(v, l)| (v, scalar_text(&l)))
                        .collect();
                    (value, OptionEntry::Group(inner))
                }
                other => (value, OptionEntry::Label(scalar_text(&other))),
            })
            .collect(),
        Shape::List(items) => items
            .iter()
            .map(scalar_text)
            .filter(|entry| !entry.is_empty())
            .map(|entry| (entry.clone(), OptionEntry::Label(entry)))
            .collect(),
    }
}

/// Builds the attribute map. A mapping stringifies its values; a list
/// splits each entry on the first `=` (`"maxlength=80"`), defaulting the
/// value to the empty string.
pub fn as_attribute_map(shape: Shape) -> IndexMap<String, String> {
    match shape {
        Shape::Map(map) => map.into_iter().map(|(k, v)| (k, scalar_text(&v))).collect(),
        Shape::List(items) => items
            .iter()
            .map(scalar_text)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let pair = entry
                    .split_once('=')
                    .map(|(key, value)| (key.to_string(), value.to_string()));
                pair.unwrap_or((entry, String::new()))
            })
            .collect(),
    }
}

/// Builds the rule-descriptor list, keeping entries as raw JSON values so
/// parameterized descriptors like `["maxLength", 10]` survive intact.
pub fn as_rule_list(shape: Shape) -> Vec<Value> {
    match shape {
        Shape::List(items) => items,
        Shape::Map(map) => map.into_values().collect(),
    }
}

/// Text form of a scalar: strings verbatim, other values via their JSON
/// encoding, null as empty.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Reads a string-valued property, accepting numbers by stringifying
/// them; empty strings count as absent so defaults apply.
pub(crate) fn string_prop(data: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    data.get(key).and_then(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Truthiness for wire booleans that may arrive as bools, numbers, or
/// strings.
pub(crate) fn json_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false"),
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
