//! The root aggregate: ordered fieldsets, buttons, and form-level state.
//!
//! A [`Form`] owns its fieldsets and button fields, normalizes its method
//! and enctype, and routes post-submission feedback to the owning
//! fieldset by field id. Rendering produces the complete `<form>` markup,
//! upgrading the enctype to multipart when a file field is present and
//! synthesizing a submit button when none was supplied.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::coerce::{self, json_truthy, string_prop};
use crate::error::FormError;
use crate::field::{ButtonIcon, ButtonStyle, Field, FieldKind, FieldRegistry};
use crate::fieldset::{Fieldset, FieldsetEntry};

/// The valid form enctypes.
pub const ENCTYPES: [&str; 3] = [
    "application/x-www-form-urlencoded",
    "multipart/form-data",
    "text/plain",
];

pub const ENCTYPE_DEFAULT: &str = ENCTYPES[0];
pub const ENCTYPE_URLENCODED: &str = ENCTYPES[0];
pub const ENCTYPE_MULTIPART: &str = ENCTYPES[1];
pub const ENCTYPE_TEXT: &str = ENCTYPES[2];

/// The root form aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    id: String,
    action: String,
    method: String,
    enctype: String,
    instructions: String,
    classes: Vec<String>,
    fieldsets: Vec<Fieldset>,
    buttons: Vec<Field>,
    error: bool,
}

impl Form {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            action: String::new(),
            method: "post".to_string(),
            enctype: ENCTYPE_DEFAULT.to_string(),
            instructions: String::new(),
            classes: Vec::new(),
            fieldsets: Vec::new(),
            buttons: Vec::new(),
            error: false,
        }
    }

    /// Reconstructs a form from its JSON description, delegating each
    /// fieldset to [`Fieldset::parse`] and each button to
    /// [`Field::parse`].
    ///
    /// # Errors
    ///
    /// Fieldset-level failures are wrapped as [`FormError::NotAFieldset`]
    /// and button parse failures as [`FormError::NotAButton`], each with
    /// the original cause attached. A `classes` property that is neither
    /// an array nor a JSON-encoded array fails with
    /// [`FormError::InvalidClasses`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use formwright::{FieldRegistry, Form};
    /// use serde_json::json;
    ///
    /// let registry = FieldRegistry::with_defaults();
    /// let form = Form::parse(&registry, &json!({
    ///     "id": "contact",
    ///     "method": "post",
    ///     "fieldsets": [{
    ///         "legend": "Your Details",
    ///         "fields": [{"id": "email", "type": "Text"}],
    ///     }],
    /// })).unwrap();
    ///
    /// assert!(form.has_field("email"));
    /// ```
    pub fn parse(registry: &FieldRegistry, data: &Value) -> Result<Form, FormError> {
        let empty = Map::new();
        let data = data.as_object().unwrap_or(&empty);

        let id = string_prop(data, "id").unwrap_or_else(|| format!("form-{}", Uuid::new_v4()));
        let mut form = Form::new(&id);

        form.set_action(&string_prop(data, "action").unwrap_or_default());
        form.set_method(&string_prop(data, "method").unwrap_or_else(|| "post".to_string()));
        form.set_enctype(&string_prop(data, "enctype").unwrap_or_else(|| ENCTYPE_DEFAULT.into()));
        if let Some(instructions) = string_prop(data, "instructions") {
            form.set_instructions(&instructions);
        }
        if data.get("error").map(json_truthy).unwrap_or(false) {
            form.error = true;
        }

        // classes should arrive as an array but may be a JSON-encoded one
        if let Some(classes) = data.get("classes") {
            let list: Vec<String> = match classes {
                Value::Array(items) => items.iter().map(coerce::scalar_text).collect(),
                Value::String(s) => match serde_json::from_str::<Value>(s) {
                    Ok(Value::Array(items)) => items.iter().map(coerce::scalar_text).collect(),
                    _ => {
                        return Err(FormError::InvalidClasses {
                            got: "unparseable string".to_string(),
                        })
                    }
                },
                other => {
                    return Err(FormError::InvalidClasses {
                        got: coerce::type_name(other).to_string(),
                    })
                }
            };
            form.set_classes(list);
        }

        if let Some(Value::Array(fieldsets)) = data.get("fieldsets") {
            for fieldset in fieldsets {
                let fieldset = Fieldset::parse(registry, fieldset)
                    .map_err(|e| FormError::NotAFieldset(Some(e)))?;
                form.add_fieldset(fieldset);
            }
        }

        if let Some(Value::Array(buttons)) = data.get("buttons") {
            for button in buttons {
                let button =
                    Field::parse(registry, button).map_err(|e| FormError::NotAButton(Some(e)))?;
                form.add_button(button)?;
            }
        }

        Ok(form)
    }

    /// Parses a form from a JSON string. See [`Form::parse`].
    pub fn parse_str(registry: &FieldRegistry, json: &str) -> Result<Form, FormError> {
        let data: Value = serde_json::from_str(json)?;
        Self::parse(registry, &data)
    }

    /// Serializes this form back into its wire-format description.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("id".into(), Value::String(self.id.clone()));
        out.insert("action".into(), Value::String(self.action.clone()));
        out.insert("method".into(), Value::String(self.method.clone()));
        out.insert("enctype".into(), Value::String(self.enctype.clone()));
        out.insert("error".into(), Value::Bool(self.error));

        if !self.instructions.is_empty() {
            out.insert(
                "instructions".into(),
                Value::String(self.instructions.clone()),
            );
        }
        if !self.classes.is_empty() {
            out.insert(
                "classes".into(),
                Value::Array(
                    self.classes
                        .iter()
                        .map(|c| Value::String(c.clone()))
                        .collect(),
                ),
            );
        }

        out.insert(
            "fieldsets".into(),
            Value::Array(self.fieldsets.iter().map(Fieldset::to_json).collect()),
        );
        out.insert(
            "buttons".into(),
            Value::Array(self.buttons.iter().map(Field::to_json).collect()),
        );

        Value::Object(out)
    }

    // attributes ----------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Forms can only get or post; anything other than `get` becomes
    /// `post`, the more common of the two.
    pub fn set_method(&mut self, method: &str) {
        self.method = if method.eq_ignore_ascii_case("get") {
            "get".to_string()
        } else {
            "post".to_string()
        };
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// An empty action submits back to the URL the form was displayed on.
    pub fn set_action(&mut self, action: &str) {
        self.action = action.to_string();
    }

    pub fn enctype(&self) -> &str {
        &self.enctype
    }

    /// Anything outside the valid enctype set resets to the urlencoded
    /// default.
    pub fn set_enctype(&mut self, enctype: &str) {
        self.enctype = if ENCTYPES.contains(&enctype) {
            enctype.to_string()
        } else {
            ENCTYPE_DEFAULT.to_string()
        };
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn set_instructions(&mut self, instructions: &str) {
        self.instructions = instructions.to_string();
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn set_classes(&mut self, classes: Vec<String>) {
        self.classes = classes;
    }

    // error state ---------------------------------------------------------

    pub fn error(&self) -> bool {
        self.error
    }

    /// Flags the form's error state together with the instructions that
    /// explain it; the two are coupled so an error always carries a
    /// message the visitor can act on.
    pub fn set_error(&mut self, instructions: &str, state: bool) {
        self.set_instructions(instructions);
        self.error = state;
    }

    pub fn reset_error(&mut self, instructions: &str) {
        self.set_error(instructions, false);
    }

    // composition ---------------------------------------------------------

    pub fn add_fieldset(&mut self, fieldset: Fieldset) {
        self.fieldsets.push(fieldset);
    }

    /// Bulk-adds entries that must all be fieldsets.
    ///
    /// # Errors
    ///
    /// [`FormError::NotAFieldset`] when an entry is a field.
    pub fn add_fieldsets(
        &mut self,
        entries: impl IntoIterator<Item = FieldsetEntry>,
    ) -> Result<(), FormError> {
        for entry in entries {
            match entry {
                FieldsetEntry::Fieldset(fieldset) => self.add_fieldset(fieldset),
                FieldsetEntry::Field(_) => return Err(FormError::NotAFieldset(None)),
            }
        }
        Ok(())
    }

    pub fn fieldsets(&self) -> &[Fieldset] {
        &self.fieldsets
    }

    /// Adds a button, verifying that the field's resolved type tag
    /// actually denotes a button-family field.
    ///
    /// # Errors
    ///
    /// [`FormError::NotAButton`] otherwise.
    pub fn add_button(&mut self, button: Field) -> Result<(), FormError> {
        if button.type_tag().contains("button") {
            self.buttons.push(button);
            Ok(())
        } else {
            Err(FormError::NotAButton(None))
        }
    }

    /// Bulk-adds buttons through [`Form::add_button`].
    pub fn add_buttons(&mut self, buttons: impl IntoIterator<Item = Field>) -> Result<(), FormError> {
        for button in buttons {
            self.add_button(button)?;
        }
        Ok(())
    }

    pub fn buttons(&self) -> &[Field] {
        &self.buttons
    }

    // lookup --------------------------------------------------------------

    /// True when any owned fieldset contains a field with this id.
    pub fn has_field(&self, id: &str) -> bool {
        self.fieldsets.iter().any(|fieldset| fieldset.has_field(id))
    }

    /// True when any owned fieldset contains a field of this type tag.
    pub fn has_field_of_type(&self, type_tag: &str) -> bool {
        self.fieldsets
            .iter()
            .any(|fieldset| fieldset.has_field_of_type(type_tag))
    }

    /// Finds a field by id across all fieldsets.
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fieldsets
            .iter()
            .find(|fieldset| fieldset.has_field(id))
            .and_then(|fieldset| fieldset.field(id))
    }

    /// Every field in the form, in fieldset-then-insertion order.
    pub fn fields(&self) -> Vec<&FieldsetEntry> {
        self.fieldsets
            .iter()
            .flat_map(|fieldset| fieldset.fields())
            .collect()
    }

    // feedback ------------------------------------------------------------

    /// Applies a submitted value to the field with this id, wherever it
    /// lives. Returns whether any fieldset claimed the id.
    pub fn add_field_value(&mut self, field_id: &str, value: &str) -> bool {
        self.add_field_error(field_id, "", Some(value))
    }

    /// Applies error feedback to the field with this id, delegating to
    /// the first fieldset that reports owning it. Returns false when no
    /// fieldset contains the id, which the caller must treat as "field
    /// not found anywhere in this form".
    pub fn add_field_error(&mut self, field_id: &str, message: &str, value: Option<&str>) -> bool {
        for fieldset in &mut self.fieldsets {
            if fieldset.has_field(field_id) {
                return fieldset.add_error(field_id, message, value);
            }
        }

        false
    }

    // rendering -----------------------------------------------------------

    /// Renders the complete form.
    ///
    /// The opening tag always carries id, method, and class; action only
    /// when non-empty; and enctype only when the method is post, with an
    /// automatic upgrade to multipart when a file field is present and no
    /// explicit multipart enctype was already set. Verbose instructions
    /// follow (flagged as an error notice when the error state is set),
    /// then the fieldsets, then the buttons (or one synthesized submit
    /// button when none were supplied.
    pub fn render(&mut self, display: bool) -> Result<String, FormError> {
        let mut form = format!("<form id=\"{}\" method=\"{}\"", self.id, self.method);

        if !self.action.is_empty() {
            form.push_str(&format!(" action=\"{}\"", self.action));
        }

        form.push_str(&format!(" class=\"{}\"", self.classes.join(" ")));

        if self.method == "post" {
            // posting a file requires the multipart enctype or the file
            // never arrives
            if self.enctype != ENCTYPE_MULTIPART && self.has_field_of_type("file") {
                self.set_enctype(ENCTYPE_MULTIPART);
            }
            form.push_str(&format!(" enctype=\"{}\"", self.enctype));
        }

        form.push('>');
        form.push_str(&self.verbose_instructions());

        for fieldset in &mut self.fieldsets {
            let id = fieldset.id().to_string();
            form.push_str(
                &fieldset
                    .render(false)
                    .map_err(|source| FormError::Fieldset { id, source })?,
            );
        }

        form.push_str(&self.rendered_buttons()?);
        form.push_str("</form>");

        if display {
            print!("{}", form);
            form = String::new();
        }

        Ok(form)
    }

    fn verbose_instructions(&self) -> String {
        let mut classes = vec!["instructions"];
        let mut content = String::new();

        if !self.instructions.is_empty() {
            if self.error {
                classes.push("notice");
                classes.push("notice-error");
            }
            content = format!("<p>{}</p>", self.instructions);
        }

        format!("<div class=\"{}\">{}</div>", classes.join(" "), content)
    }

    fn rendered_buttons(&mut self) -> Result<String, FormError> {
        let mut rendered = String::new();

        for button in &mut self.buttons {
            let id = button.id().to_string();
            rendered.push_str(
                &button
                    .render(false)
                    .map_err(|source| FormError::Button { id, source })?,
            );
        }

        if rendered.is_empty() {
            let mut fallback = Self::default_button();
            let id = fallback.id().to_string();
            rendered = fallback
                .render(false)
                .map_err(|source| FormError::Button { id, source })?;
        }

        Ok(rendered)
    }

    /// The submit button every form falls back to when no buttons were
    /// added before rendering.
    fn default_button() -> Field {
        Field::new(
            FieldKind::Button {
                style: ButtonStyle::Submit,
                icon: ButtonIcon::Save,
            },
            &format!("field-{}", Uuid::new_v4()),
            "",
            "Submit",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_normalizes_to_post() {
        let mut form = Form::new("f");
        form.set_method("DELETE");
        assert_eq!(form.method(), "post");

        form.set_method("GET");
        assert_eq!(form.method(), "get");
    }

    #[test]
    fn test_enctype_validates_against_the_fixed_set() {
        let mut form = Form::new("f");
        form.set_enctype("text/plain");
        assert_eq!(form.enctype(), ENCTYPE_TEXT);

        form.set_enctype("application/json");
        assert_eq!(form.enctype(), ENCTYPE_DEFAULT);
    }

    #[test]
    fn test_set_error_couples_instructions_and_flag() {
        let mut form = Form::new("f");
        form.set_error("please fix the marked fields", true);
        assert!(form.error());
        assert_eq!(form.instructions(), "please fix the marked fields");

        form.reset_error("all good now");
        assert!(!form.error());
        assert_eq!(form.instructions(), "all good now");
    }

    #[test]
    fn test_add_button_rejects_non_buttons() {
        let mut form = Form::new("f");
        let err = form
            .add_button(Field::new(FieldKind::Text, "not-a-button", "", ""))
            .unwrap_err();
        assert!(matches!(err, FormError::NotAButton(_)));
    }

    #[test]
    fn test_add_button_accepts_the_button_family() {
        let mut form = Form::new("f");
        for kind in [ButtonStyle::Button, ButtonStyle::Submit, ButtonStyle::Reset] {
            form.add_button(Field::new(
                FieldKind::Button {
                    style: kind,
                    icon: ButtonIcon::ChevronCircleRight,
                },
                "b",
                "",
                "",
            ))
            .unwrap();
        }
        assert_eq!(form.buttons().len(), 3);
    }
}
