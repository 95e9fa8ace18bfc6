//! Assembles the JSON form description consumed by [`Form::parse`].
//!
//! The builder is not quite a factory: it returns the wire-format
//! description rather than live objects, which keeps programmatic form
//! assembly and stored form definitions on the same code path. Supplied
//! property maps are filtered against the known wire keys so stray keys
//! never reach the description.
//!
//! [`Form::parse`]: crate::Form::parse

use serde_json::{json, Map, Value};

use crate::error::FormBuilderError;

const FORM_KEYS: [&str; 9] = [
    "id",
    "action",
    "method",
    "enctype",
    "instructions",
    "classes",
    "fieldsets",
    "buttons",
    "error",
];

const FIELDSET_KEYS: [&str; 6] = ["id", "legend", "child", "instructions", "classes", "fields"];

const FIELD_KEYS: [&str; 13] = [
    "id",
    "name",
    "label",
    "type",
    "classes",
    "inputClasses",
    "instructions",
    "required",
    "options",
    "additionalAttributes",
    "validation",
    "value",
    "errorMessage",
];

/// Accumulates a form description one fieldset and field at a time.
///
/// # Example
///
/// ```rust
/// use formwright::{FieldRegistry, Form, FormBuilder};
/// use serde_json::json;
///
/// let mut builder = FormBuilder::new(&json!({"id": "contact"}));
/// builder.open_fieldset(&json!({"legend": "Your Details"})).unwrap();
/// builder.add_field(&json!({"id": "email", "type": "Text"})).unwrap();
///
/// let registry = FieldRegistry::with_defaults();
/// let form = Form::parse(&registry, &builder.build()).unwrap();
/// assert!(form.has_field("email"));
/// ```
pub struct FormBuilder {
    form: Map<String, Value>,
    current_fieldset: Option<usize>,
}

impl FormBuilder {
    /// Starts a description from the supplied form-level properties,
    /// keeping only known wire keys. Space for fieldsets is reserved
    /// whether or not the description mentioned them.
    pub fn new(description: &Value) -> Self {
        let mut form = filtered(description, &FORM_KEYS);
        form.entry("fieldsets".to_string()).or_insert(json!([]));

        Self {
            form,
            current_fieldset: None,
        }
    }

    /// Opens a new fieldset; subsequent [`add_field`](Self::add_field)
    /// calls append to it.
    ///
    /// # Errors
    ///
    /// [`FormBuilderError::MissingLegend`] when the description omits a
    /// legend. Parsing would tolerate the omission, but a fieldset
    /// without a legend is an accessibility problem worth refusing here.
    pub fn open_fieldset(&mut self, description: &Value) -> Result<(), FormBuilderError> {
        if description.get("legend").is_none() {
            return Err(FormBuilderError::MissingLegend);
        }

        let mut fieldset = filtered(description, &FIELDSET_KEYS);
        fieldset.entry("fields".to_string()).or_insert(json!([]));

        let fieldsets = self.fieldsets_mut();
        fieldsets.push(Value::Object(fieldset));
        self.current_fieldset = Some(self.fieldsets_mut().len() - 1);

        Ok(())
    }

    /// Appends a field description to the currently open fieldset.
    ///
    /// # Errors
    ///
    /// [`FormBuilderError::MissingFieldType`] when the description omits
    /// a type; [`FormBuilderError::NoOpenFieldset`] when no fieldset has
    /// been opened yet.
    pub fn add_field(&mut self, description: &Value) -> Result<(), FormBuilderError> {
        if description.get("type").is_none() {
            return Err(FormBuilderError::MissingFieldType);
        }

        let index = self
            .current_fieldset
            .ok_or(FormBuilderError::NoOpenFieldset)?;
        let field = Value::Object(filtered(description, &FIELD_KEYS));

        if let Some(Value::Object(fieldset)) = self.fieldsets_mut().get_mut(index) {
            if let Some(Value::Array(fields)) = fieldset.get_mut("fields") {
                fields.push(field);
            }
        }

        Ok(())
    }

    /// The accumulated description, ready for [`Form::parse`].
    ///
    /// [`Form::parse`]: crate::Form::parse
    pub fn build(&self) -> Value {
        Value::Object(self.form.clone())
    }

    /// The accumulated description as a JSON string.
    pub fn build_string(&self) -> String {
        self.build().to_string()
    }

    fn fieldsets_mut(&mut self) -> &mut Vec<Value> {
        match self
            .form
            .get_mut("fieldsets")
            .expect("fieldsets slot is reserved at construction")
        {
            Value::Array(fieldsets) => fieldsets,
            // a caller-supplied non-array fieldsets value is replaced;
            // the builder owns this slot
            slot => {
                *slot = json!([]);
                match slot {
                    Value::Array(fieldsets) => fieldsets,
                    _ => unreachable!(),
                }
            }
        }
    }
}

/// Copies only the known wire keys out of a description map.
fn filtered(description: &Value, keys: &[&str]) -> Map<String, Value> {
    let mut out = Map::new();

    if let Value::Object(map) = description {
        for (key, value) in map {
            if keys.contains(&key.as_str()) {
                out.insert(key.clone(), value.clone());
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_are_filtered() {
        let builder = FormBuilder::new(&json!({"id": "f", "bogus": true}));
        let built = builder.build();
        assert_eq!(built.get("id"), Some(&json!("f")));
        assert!(built.get("bogus").is_none());
    }

    #[test]
    fn test_fieldsets_require_legends() {
        let mut builder = FormBuilder::new(&json!({}));
        let err = builder.open_fieldset(&json!({"id": "about"})).unwrap_err();
        assert!(matches!(err, FormBuilderError::MissingLegend));
    }

    #[test]
    fn test_fields_require_a_type() {
        let mut builder = FormBuilder::new(&json!({}));
        builder.open_fieldset(&json!({"legend": "About"})).unwrap();
        let err = builder.add_field(&json!({"id": "x"})).unwrap_err();
        assert!(matches!(err, FormBuilderError::MissingFieldType));
    }

    #[test]
    fn test_field_before_fieldset_fails() {
        let mut builder = FormBuilder::new(&json!({}));
        let err = builder
            .add_field(&json!({"id": "x", "type": "Text"}))
            .unwrap_err();
        assert!(matches!(err, FormBuilderError::NoOpenFieldset));
    }

    #[test]
    fn test_fields_land_in_the_open_fieldset() {
        let mut builder = FormBuilder::new(&json!({"id": "f"}));
        builder.open_fieldset(&json!({"legend": "One"})).unwrap();
        builder
            .add_field(&json!({"id": "a", "type": "Text"}))
            .unwrap();
        builder.open_fieldset(&json!({"legend": "Two"})).unwrap();
        builder
            .add_field(&json!({"id": "b", "type": "Number"}))
            .unwrap();

        let built = builder.build();
        let fieldsets = built.get("fieldsets").unwrap().as_array().unwrap();
        assert_eq!(fieldsets.len(), 2);
        assert_eq!(fieldsets[0]["fields"][0]["id"], json!("a"));
        assert_eq!(fieldsets[1]["fields"][0]["id"], json!("b"));
    }
}
