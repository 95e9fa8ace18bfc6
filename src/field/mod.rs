//! The field aggregate: one input-producing unit of a form.
//!
//! A [`Field`] holds the state every concrete variant shares (identity,
//! value, classes, options, attributes, validation descriptors, and error
//! feedback) while the variant itself is a [`FieldKind`] tag. Fields are
//! built programmatically through the setters or reconstructed from a
//! JSON description via [`Field::parse`], which resolves the wire-format
//! type name through a [`FieldRegistry`].

mod kind;
mod registry;
mod render;

pub use kind::{ButtonIcon, ButtonStyle, FieldKind, OptionEntry, SelectDisplay};
pub use registry::{FieldFactory, FieldRegistry, RegistryError};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::coerce::{self, json_truthy, string_prop};
use crate::error::FieldError;
use crate::naming;

/// Selects one of a field's two class lists: the one emitted on the input
/// element itself, and the one folded into its containing list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Input,
    Wrapper,
}

impl ClassKind {
    /// Maps a wire-format property name to the class list it targets.
    /// Both `classes` and `inputClasses` name the input-element list; any
    /// other name is rejected.
    pub fn from_json_key(key: &str) -> Result<Self, FieldError> {
        match key {
            "classes" | "inputClasses" => Ok(ClassKind::Input),
            other => Err(FieldError::UnknownProperty(other.to_string())),
        }
    }
}

/// One input-producing unit of a form.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    id: String,
    name: String,
    label: String,
    type_tag: String,
    kind: FieldKind,
    value: String,
    required: bool,
    instructions: String,
    options: IndexMap<String, OptionEntry>,
    input_classes: Vec<String>,
    wrapper_classes: Vec<String>,
    additional_attributes: IndexMap<String, String>,
    validation: Vec<Value>,
    error: bool,
    error_message: String,
    locked: bool,
    decoded_value: Option<Vec<Value>>,
}

impl Field {
    /// Constructs a field of the given kind.
    ///
    /// An empty `name` falls back to the id, and an empty `label` is
    /// derived from the name, so a field with id `first-name` gets the
    /// matching name and the label "First Name" without further setup.
    ///
    /// A [`FieldKind::Honeypot`] constructs locked, with its canned
    /// bot-trap instructions; parsing will not overwrite them.
    pub fn new(kind: FieldKind, id: &str, name: &str, label: &str) -> Self {
        let name = if name.is_empty() { id } else { name };
        let label = if label.is_empty() {
            naming::unsanitize(name)
        } else {
            label.to_string()
        };

        let mut field = Self {
            id: id.to_string(),
            name: name.to_string(),
            label,
            type_tag: kind.tag().to_string(),
            kind,
            value: String::new(),
            required: false,
            instructions: String::new(),
            options: IndexMap::new(),
            input_classes: Vec::new(),
            wrapper_classes: Vec::new(),
            additional_attributes: IndexMap::new(),
            validation: Vec::new(),
            error: false,
            error_message: String::new(),
            locked: false,
            decoded_value: None,
        };

        if matches!(field.kind, FieldKind::Honeypot) {
            field.instructions = HONEYPOT_INSTRUCTIONS.to_string();
            field.locked = true;
        }

        field
    }

    /// Reconstructs a field from its JSON description.
    ///
    /// The algorithm follows the wire contract: identity properties are
    /// resolved first (generating a fresh id when absent), the type name
    /// is resolved through the registry, and the remaining properties are
    /// assigned generically, unless the constructed field is locked, in
    /// which case only the value and error feedback are applied.
    ///
    /// # Errors
    ///
    /// [`FieldError::UnknownField`] when the type name resolves to
    /// nothing; [`FieldError::InvalidClasses`] when a classes property
    /// has an unusable shape.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formwright::{Field, FieldRegistry};
    /// use serde_json::json;
    ///
    /// let registry = FieldRegistry::with_defaults();
    /// let field = Field::parse(&registry, &json!({
    ///     "id": "first-name",
    ///     "required": true,
    /// })).unwrap();
    ///
    /// assert_eq!(field.label(), "First Name");
    /// assert_eq!(field.type_tag(), "text");
    /// ```
    pub fn parse(registry: &FieldRegistry, data: &Value) -> Result<Field, FieldError> {
        let empty = Map::new();
        let data = data.as_object().unwrap_or(&empty);

        // these first three are interdependent; their order matters
        let id = string_prop(data, "id").unwrap_or_else(generated_id);
        let name = string_prop(data, "name").unwrap_or_else(|| id.clone());
        let label = string_prop(data, "label").unwrap_or_else(|| naming::unsanitize(&name));
        let type_name = string_prop(data, "type").unwrap_or_else(|| "Text".to_string());

        let factory = registry
            .resolve(&type_name)
            .ok_or_else(|| FieldError::UnknownField(type_name.clone()))?;

        let mut field = factory(&id, &name, &label);

        // a locked field fixed its own configuration in its constructor;
        // the generic property phase must not overwrite it
        if !field.locked {
            if let Some(instructions) = string_prop(data, "instructions") {
                field.set_instructions(&instructions);
            }
            field.set_required(data.get("required").map(json_truthy).unwrap_or(false));

            if let Some(attrs) = data.get("additionalAttributes") {
                field.set_additional_attributes(coerce::as_attribute_map(coerce::coerce(attrs)));
            }
            if let Some(rules) = data.get("validation") {
                field.set_validation(coerce::as_rule_list(coerce::coerce(rules)));
            }
            if let Some(options) = data.get("options") {
                field.set_options(coerce::as_option_map(coerce::coerce(options)));
            }

            for key in ["classes", "inputClasses"] {
                if let Some(classes) = data.get(key) {
                    let list_kind = ClassKind::from_json_key(key)?;
                    field.set_classes(list_kind, coerce::coerce_classes(classes)?);
                }
            }
        }

        // identity feedback applies even to locked fields
        let message = string_prop(data, "errorMessage").unwrap_or_default();
        field.set_error(&message, None);
        if data.get("error").map(json_truthy).unwrap_or(false) {
            field.error = true;
        }

        if let Some(value) = data.get("value") {
            field.set_value(&canonical_value(value)?);
        }

        Ok(field)
    }

    /// Parses a field from a JSON string. See [`Field::parse`].
    pub fn parse_str(registry: &FieldRegistry, json: &str) -> Result<Field, FieldError> {
        let data: Value = serde_json::from_str(json)?;
        Self::parse(registry, &data)
    }

    /// Serializes this field back into its wire-format description.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("id".into(), Value::String(self.id.clone()));
        out.insert("name".into(), Value::String(self.name.clone()));
        out.insert("label".into(), Value::String(self.label.clone()));
        out.insert("type".into(), Value::String(self.type_tag.clone()));
        out.insert("required".into(), Value::Bool(self.required));
        out.insert("value".into(), Value::String(self.value.clone()));

        if !self.instructions.is_empty() {
            out.insert(
                "instructions".into(),
                Value::String(self.instructions.clone()),
            );
        }
        if !self.input_classes.is_empty() {
            out.insert(
                "classes".into(),
                Value::Array(
                    self.input_classes
                        .iter()
                        .map(|c| Value::String(c.clone()))
                        .collect(),
                ),
            );
        }
        if !self.options.is_empty() {
            let mut options = Map::new();
            for (value, entry) in &self.options {
                match entry {
                    OptionEntry::Label(label) => {
                        options.insert(value.clone(), Value::String(label.clone()));
                    }
                    OptionEntry::Group(group) => {
                        let inner: Map<String, Value> = group
                            .iter()
                            .map(|(v, l)| (v.clone(), Value::String(l.clone())))
                            .collect();
                        options.insert(value.clone(), Value::Object(inner));
                    }
                }
            }
            out.insert("options".into(), Value::Object(options));
        }
        if !self.additional_attributes.is_empty() {
            let attrs: Map<String, Value> = self
                .additional_attributes
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            out.insert("additionalAttributes".into(), Value::Object(attrs));
        }
        if !self.validation.is_empty() {
            out.insert("validation".into(), Value::Array(self.validation.clone()));
        }

        out.insert("error".into(), Value::Bool(self.error));
        if !self.error_message.is_empty() {
            out.insert(
                "errorMessage".into(),
                Value::String(self.error_message.clone()),
            );
        }

        Value::Object(out)
    }

    /// Renders this field to an HTML fragment.
    ///
    /// With `display` set, the fragment is written to standard output and
    /// an empty string returned, so callers never double-handle output.
    /// Takes `&mut self` because rendering memoizes decoded composite
    /// values and select-with-other fields split their canonical value.
    pub fn render(&mut self, display: bool) -> Result<String, FieldError> {
        render::render(self, display)
    }

    // identity ------------------------------------------------------------

    /// True when this field's id matches `id`.
    pub fn is(&self, id: &str) -> bool {
        self.id == id
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The id with a suffix appended, for fields composed of more than
    /// one DOM element.
    pub fn suffixed_id(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            self.id.clone()
        } else {
            format!("{}-{}", self.id, suffix)
        }
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn suffixed_name(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            self.name.clone()
        } else {
            format!("{}-{}", self.name, suffix)
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    /// The lowercase type tag (e.g. `text`, `selectone`, `submitbutton`).
    /// Set at construction and immutable afterwards.
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// How many DOM input elements constitute this logical field.
    pub fn element_count(&self) -> usize {
        self.kind.element_count()
    }

    /// True when this field's constructor fixed its configuration and
    /// parse must skip the generic property phase.
    pub fn locked(&self) -> bool {
        self.locked
    }

    // value and feedback --------------------------------------------------

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Buttons are never empty; every other field is empty when its
    /// canonical value is.
    pub fn is_empty(&self) -> bool {
        match self.kind {
            FieldKind::Button { .. } => false,
            _ => self.value.is_empty(),
        }
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.decoded_value = None;
    }

    pub fn error(&self) -> bool {
        self.error
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Records error feedback: the message is stored, the error flag
    /// follows the message's non-emptiness, and an optionally supplied
    /// submitted value is applied in the same step.
    pub fn set_error(&mut self, message: &str, value: Option<&str>) {
        self.error_message = message.to_string();
        self.error = !message.is_empty();

        if let Some(value) = value {
            self.set_value(value);
        }
    }

    /// Clears error feedback, optionally re-applying a value.
    pub fn reset_error(&mut self, value: Option<&str>) {
        self.set_error("", value);
    }

    // generic properties --------------------------------------------------

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn set_instructions(&mut self, instructions: &str) {
        self.instructions = instructions.to_string();
    }

    pub fn options(&self) -> &IndexMap<String, OptionEntry> {
        &self.options
    }

    /// Replaces the option set wholesale; there is nothing to merge.
    pub fn set_options(&mut self, options: IndexMap<String, OptionEntry>) {
        self.options = options;
    }

    pub fn additional_attributes(&self) -> &IndexMap<String, String> {
        &self.additional_attributes
    }

    pub fn set_additional_attributes(&mut self, attributes: IndexMap<String, String>) {
        self.additional_attributes = attributes;
    }

    pub fn validation(&self) -> &[Value] {
        &self.validation
    }

    /// Replaces the ordered rule-descriptor list. The descriptors are
    /// opaque here; a validator consumes them elsewhere.
    pub fn set_validation(&mut self, validation: Vec<Value>) {
        self.validation = validation;
    }

    // class lists ---------------------------------------------------------

    pub fn classes(&self, kind: ClassKind) -> &[String] {
        match kind {
            ClassKind::Input => &self.input_classes,
            ClassKind::Wrapper => &self.wrapper_classes,
        }
    }

    /// Adds a single class, preserving first-insertion order and
    /// filtering duplicates.
    pub fn set_class(&mut self, kind: ClassKind, class: &str) {
        if class.is_empty() {
            return;
        }
        let list = self.class_list_mut(kind);
        if !list.iter().any(|existing| existing == class) {
            list.push(class.to_string());
        }
    }

    /// Merges classes into the list rather than replacing it, so work
    /// done elsewhere is not undone; duplicates and empties are dropped.
    pub fn set_classes(&mut self, kind: ClassKind, classes: impl IntoIterator<Item = String>) {
        for class in classes {
            self.set_class(kind, &class);
        }
    }

    /// The list joined for direct use in an HTML class attribute.
    pub fn classes_as_string(&self, kind: ClassKind) -> String {
        self.classes(kind).join(" ")
    }

    fn class_list_mut(&mut self, kind: ClassKind) -> &mut Vec<String> {
        match kind {
            ClassKind::Input => &mut self.input_classes,
            ClassKind::Wrapper => &mut self.wrapper_classes,
        }
    }

    // variant configuration -----------------------------------------------

    /// Overrides a selection field's display strategy. Ignored for
    /// non-selection kinds.
    pub fn set_select_display(&mut self, display: SelectDisplay) {
        match &mut self.kind {
            FieldKind::SelectOne { display: slot } | FieldKind::SelectMany { display: slot } => {
                *slot = Some(display);
            }
            _ => {}
        }
    }

    // composite values ----------------------------------------------------

    /// Decodes the canonical value as a JSON structure, memoizing the
    /// result; selection variants whose value encodes several entries use
    /// this at render time. An empty value yields `default` without
    /// attempting to decode.
    ///
    /// # Errors
    ///
    /// [`FieldError::InvalidFieldValue`] when the value is non-empty but
    /// not a JSON array or object.
    pub fn decode_composite_value(&mut self, default: &[Value]) -> Result<Vec<Value>, FieldError> {
        if self.value.is_empty() {
            return Ok(default.to_vec());
        }

        if let Some(cached) = &self.decoded_value {
            return Ok(cached.clone());
        }

        let invalid = || FieldError::InvalidFieldValue {
            type_tag: self.type_tag.clone(),
        };

        let decoded: Value = serde_json::from_str(&self.value).map_err(|_| invalid())?;
        let values = match decoded {
            Value::Array(items) => items,
            Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
            _ => return Err(invalid()),
        };

        self.decoded_value = Some(values.clone());
        Ok(values)
    }
}

const HONEYPOT_INSTRUCTIONS: &str = "If you're encountering this field, we apologize. It's used \
to try and stop bots from submitting this form, and it must remain blank. We've tried to hide it \
from legitimate (and welcome) visitors, like you, but it's not a foolproof thing. Hide it too \
well, and the illegitimate visitors might be able to slip by as well. Regardless, please leave \
this one blank when you submit the form.";

fn generated_id() -> String {
    format!("field-{}", Uuid::new_v4())
}

/// Canonicalizes a wire value into the single string slot: strings pass
/// through, null empties, and anything structured is re-encoded as JSON
/// for the field's own rendering logic to decode back out.
fn canonical_value(value: &Value) -> Result<String, FieldError> {
    Ok(match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => serde_json::to_string(other)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_falls_back_to_id() {
        let field = Field::new(FieldKind::Text, "first-name", "", "");
        assert_eq!(field.name(), "first-name");
        assert_eq!(field.label(), "First Name");
    }

    #[test]
    fn test_explicit_label_wins() {
        let field = Field::new(FieldKind::Text, "first-name", "", "Given Name");
        assert_eq!(field.label(), "Given Name");
    }

    #[test]
    fn test_honeypot_constructs_locked() {
        let field = Field::new(FieldKind::Honeypot, "trap", "", "");
        assert!(field.locked());
        assert_eq!(field.type_tag(), "text");
        assert!(!field.instructions().is_empty());
    }

    #[test]
    fn test_set_class_is_set_like() {
        let mut field = Field::new(FieldKind::Text, "a", "", "");
        field.set_class(ClassKind::Input, "wide");
        field.set_class(ClassKind::Input, "wide");
        field.set_class(ClassKind::Input, "tall");
        assert_eq!(field.classes_as_string(ClassKind::Input), "wide tall");
    }

    #[test]
    fn test_class_lists_are_independent() {
        let mut field = Field::new(FieldKind::Text, "a", "", "");
        field.set_class(ClassKind::Input, "inner");
        field.set_class(ClassKind::Wrapper, "outer");
        assert_eq!(field.classes(ClassKind::Input), ["inner".to_string()]);
        assert_eq!(field.classes(ClassKind::Wrapper), ["outer".to_string()]);
    }

    #[test]
    fn test_class_kind_rejects_unknown_key() {
        let err = ClassKind::from_json_key("outerClasses").unwrap_err();
        assert!(matches!(err, FieldError::UnknownProperty(_)));
    }

    #[test]
    fn test_set_error_couples_flag_and_message() {
        let mut field = Field::new(FieldKind::Text, "a", "", "");
        field.set_error("required", Some("submitted"));
        assert!(field.error());
        assert_eq!(field.error_message(), "required");
        assert_eq!(field.value(), "submitted");

        field.reset_error(None);
        assert!(!field.error());
        assert_eq!(field.error_message(), "");
        assert_eq!(field.value(), "submitted");
    }

    #[test]
    fn test_buttons_are_never_empty() {
        let field = Field::new(
            FieldKind::Button {
                style: ButtonStyle::Submit,
                icon: ButtonIcon::Save,
            },
            "go",
            "",
            "",
        );
        assert!(!field.is_empty());
    }

    #[test]
    fn test_decode_composite_value_memoizes() {
        let mut field = Field::new(FieldKind::SelectMany { display: None }, "a", "", "");
        field.set_value("[\"x\",\"y\"]");

        let first = field.decode_composite_value(&[]).unwrap();
        assert_eq!(first, vec![json!("x"), json!("y")]);

        // the memo survives until the value changes
        let second = field.decode_composite_value(&[]).unwrap();
        assert_eq!(first, second);

        field.set_value("[\"z\"]");
        assert_eq!(field.decode_composite_value(&[]).unwrap(), vec![json!("z")]);
    }

    #[test]
    fn test_decode_composite_value_empty_uses_default() {
        let mut field = Field::new(FieldKind::SelectMany { display: None }, "a", "", "");
        let values = field
            .decode_composite_value(&[json!(""), json!("")])
            .unwrap();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_decode_composite_value_rejects_plain_text() {
        let mut field = Field::new(FieldKind::SelectMany { display: None }, "a", "", "");
        field.set_value("not json");
        let err = field.decode_composite_value(&[]).unwrap_err();
        assert!(matches!(err, FieldError::InvalidFieldValue { .. }));
    }
}
