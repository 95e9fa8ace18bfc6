//! An ordered, keyed group of fields and, when composing, of nested
//! child fieldsets.
//!
//! A [`Fieldset`] maps field ids to entries in insertion order; insertion
//! order is rendering order, and an id collision overwrites the earlier
//! entry. Error and value feedback after a failed submission is applied
//! here by field id.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::coerce::{self, json_truthy, string_prop};
use crate::error::FieldsetError;
use crate::field::{Field, FieldRegistry};
use crate::naming;

/// One entry in a fieldset: a field, or a nested child fieldset.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldsetEntry {
    Field(Field),
    Fieldset(Fieldset),
}

impl FieldsetEntry {
    /// The entry's id, whichever kind it holds.
    pub fn id(&self) -> &str {
        match self {
            FieldsetEntry::Field(field) => field.id(),
            FieldsetEntry::Fieldset(fieldset) => fieldset.id(),
        }
    }
}

/// A named, ordered group of fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Fieldset {
    id: String,
    legend: String,
    instructions: String,
    classes: Vec<String>,
    child: bool,
    fields: IndexMap<String, FieldsetEntry>,
}

impl Fieldset {
    /// Constructs a fieldset. An empty `legend` is derived from the id,
    /// the same way a field derives its label from its name.
    pub fn new(id: &str, legend: &str) -> Self {
        let legend = if legend.is_empty() {
            naming::unsanitize(id)
        } else {
            legend.to_string()
        };

        Self {
            id: id.to_string(),
            legend,
            instructions: String::new(),
            classes: Vec::new(),
            child: false,
            fields: IndexMap::new(),
        }
    }

    /// Reconstructs a fieldset from its JSON description, delegating each
    /// entry of `fields` to [`Field::parse`]. Entries shaped like
    /// fieldsets recurse instead and come back marked as children.
    ///
    /// # Errors
    ///
    /// Field-level parse failures are wrapped as
    /// [`FieldsetError::NotAField`] with the cause attached; a classes
    /// property that is neither an array nor a string fails with
    /// [`FieldsetError::InvalidClasses`]; a `fields` entry that is not an
    /// object at all fails with
    /// [`FieldsetError::NeitherFieldNorFieldset`].
    pub fn parse(registry: &FieldRegistry, data: &Value) -> Result<Fieldset, FieldsetError> {
        let empty = Map::new();
        let data = data.as_object().unwrap_or(&empty);

        let id = string_prop(data, "id").unwrap_or_else(|| format!("fieldset-{}", Uuid::new_v4()));
        let legend = string_prop(data, "legend").unwrap_or_else(|| naming::unsanitize(&id));
        let mut fieldset = Fieldset::new(&id, &legend);

        fieldset.set_child(data.get("child").map(json_truthy).unwrap_or(false));
        if let Some(instructions) = string_prop(data, "instructions") {
            fieldset.set_instructions(&instructions);
        }

        // classes here accept an array or a space-separated string only;
        // the field-level pipe/JSON tolerance does not apply
        if let Some(classes) = data.get("classes") {
            let list: Vec<String> = match classes {
                Value::Array(items) => items.iter().map(coerce::scalar_text).collect(),
                Value::String(s) => s.split_whitespace().map(str::to_string).collect(),
                other => {
                    return Err(FieldsetError::InvalidClasses {
                        got: coerce::type_name(other).to_string(),
                    })
                }
            };
            fieldset.set_classes(list);
        }

        if let Some(Value::Array(entries)) = data.get("fields") {
            for entry in entries {
                match entry {
                    Value::Object(map) if describes_fieldset(map) => {
                        let child = Fieldset::parse(registry, entry)
                            .map_err(|e| FieldsetError::NotAFieldset(Some(Box::new(e))))?;
                        fieldset.add_fieldset(child);
                    }
                    Value::Object(_) => {
                        let field = Field::parse(registry, entry)
                            .map_err(|e| FieldsetError::NotAField(Some(e)))?;
                        fieldset.add_field(field);
                    }
                    other => {
                        return Err(FieldsetError::NeitherFieldNorFieldset {
                            got: coerce::type_name(other).to_string(),
                        })
                    }
                }
            }
        }

        Ok(fieldset)
    }

    /// Parses a fieldset from a JSON string. See [`Fieldset::parse`].
    pub fn parse_str(registry: &FieldRegistry, json: &str) -> Result<Fieldset, FieldsetError> {
        let data: Value = serde_json::from_str(json)?;
        Self::parse(registry, &data)
    }

    /// Serializes this fieldset back into its wire-format description.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("id".into(), Value::String(self.id.clone()));
        out.insert("legend".into(), Value::String(self.legend.clone()));
        out.insert("child".into(), Value::Bool(self.child));

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

        let fields: Vec<Value> = self
            .fields
            .values()
            .map(|entry| match entry {
                FieldsetEntry::Field(field) => field.to_json(),
                FieldsetEntry::Fieldset(fieldset) => fieldset.to_json(),
            })
            .collect();
        out.insert("fields".into(), Value::Array(fields));

        Value::Object(out)
    }

    // identity ------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn legend(&self) -> &str {
        &self.legend
    }

    pub fn set_legend(&mut self, legend: &str) {
        self.legend = legend.to_string();
    }

    /// True when this fieldset renders embedded in a parent fieldset's
    /// field list rather than as a standalone block.
    pub fn is_child(&self) -> bool {
        self.child
    }

    pub fn set_child(&mut self, child: bool) {
        self.child = child;
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn set_instructions(&mut self, instructions: &str) {
        self.instructions = instructions.to_string();
    }

    // classes -------------------------------------------------------------

    /// The class list, with `child` appended when this fieldset is
    /// nested.
    pub fn classes(&self) -> Vec<String> {
        let mut classes = self.classes.clone();
        if self.child && !classes.iter().any(|c| c == "child") {
            classes.push("child".to_string());
        }
        classes
    }

    pub fn classes_as_string(&self) -> String {
        self.classes().join(" ")
    }

    pub fn set_class(&mut self, class: &str) {
        if !class.is_empty() && !self.classes.iter().any(|existing| existing == class) {
            self.classes.push(class.to_string());
        }
    }

    /// Merges classes rather than replacing, keeping the list unique.
    pub fn set_classes(&mut self, classes: impl IntoIterator<Item = String>) {
        for class in classes {
            self.set_class(&class);
        }
    }

    // composition ---------------------------------------------------------

    /// Inserts a field, keyed by its id; a second field with the same id
    /// replaces the first.
    pub fn add_field(&mut self, field: Field) {
        self.fields
            .insert(field.id().to_string(), FieldsetEntry::Field(field));
    }

    /// Inserts a nested fieldset, marking it as a child if it is not
    /// already.
    pub fn add_fieldset(&mut self, mut fieldset: Fieldset) {
        if !fieldset.is_child() {
            fieldset.set_child(true);
        }
        self.fields
            .insert(fieldset.id().to_string(), FieldsetEntry::Fieldset(fieldset));
    }

    /// Bulk-inserts entries that must all be fields.
    ///
    /// # Errors
    ///
    /// [`FieldsetError::NotAField`] when an entry is a fieldset.
    pub fn add_fields(
        &mut self,
        entries: impl IntoIterator<Item = FieldsetEntry>,
    ) -> Result<(), FieldsetError> {
        for entry in entries {
            match entry {
                FieldsetEntry::Field(field) => self.add_field(field),
                FieldsetEntry::Fieldset(_) => return Err(FieldsetError::NotAField(None)),
            }
        }
        Ok(())
    }

    /// Bulk-inserts entries that must all be fieldsets, marking each as a
    /// child.
    ///
    /// # Errors
    ///
    /// [`FieldsetError::NotAFieldset`] when an entry is a field.
    pub fn add_fieldsets(
        &mut self,
        entries: impl IntoIterator<Item = FieldsetEntry>,
    ) -> Result<(), FieldsetError> {
        for entry in entries {
            match entry {
                FieldsetEntry::Fieldset(fieldset) => self.add_fieldset(fieldset),
                FieldsetEntry::Field(_) => return Err(FieldsetError::NotAFieldset(None)),
            }
        }
        Ok(())
    }

    /// The entries in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldsetEntry> {
        self.fields.values()
    }

    /// O(1) membership test against the keyed mapping.
    pub fn has_field(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    /// Linear scan for a field whose resolved type tag matches.
    pub fn has_field_of_type(&self, type_tag: &str) -> bool {
        self.fields.values().any(|entry| match entry {
            FieldsetEntry::Field(field) => field.type_tag() == type_tag,
            FieldsetEntry::Fieldset(_) => false,
        })
    }

    /// Linear scan returning the first field with this id.
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.values().find_map(|entry| match entry {
            FieldsetEntry::Field(field) if field.is(id) => Some(field),
            _ => None,
        })
    }

    // feedback ------------------------------------------------------------

    /// Applies a submitted value to the field with this id. Returns
    /// whether the id named a field in this set.
    pub fn add_value(&mut self, field_id: &str, value: &str) -> bool {
        self.add_error(field_id, "", Some(value))
    }

    /// Applies error feedback (and optionally the submitted value) to the
    /// field with this id, in place. Returns whether the id named a
    /// field in this set; a missing id mutates nothing.
    pub fn add_error(&mut self, field_id: &str, message: &str, value: Option<&str>) -> bool {
        match self.fields.get_mut(field_id) {
            Some(FieldsetEntry::Field(field)) => {
                field.set_error(message, value);
                true
            }
            _ => false,
        }
    }

    // rendering -----------------------------------------------------------

    /// Renders the fieldset shell around the concatenation of every
    /// entry's own markup. Child fieldsets additionally wrap themselves
    /// in a list item so they sit inside the parent's `<ol>`.
    pub fn render(&mut self, display: bool) -> Result<String, FieldsetError> {
        let contents = self.contents()?;

        let mut fieldset = format!(
            "<fieldset id=\"{}\" class=\"{}\">\n<legend><label for=\"{}\">{}</label></legend>\n{}<ol>\n{}\n</ol>\n</fieldset>",
            self.id,
            self.classes_as_string(),
            self.id,
            self.legend,
            self.verbose_instructions(),
            contents,
        );

        if self.is_child() {
            fieldset = format!(
                "<li class=\"{}\">{}</li>",
                self.child_container_classes(),
                fieldset
            );
        }

        if display {
            print!("{}", fieldset);
            fieldset = String::new();
        }

        Ok(fieldset)
    }

    fn contents(&mut self) -> Result<String, FieldsetError> {
        let mut contents = Vec::new();

        for entry in self.fields.values_mut() {
            match entry {
                FieldsetEntry::Field(field) => {
                    let id = field.id().to_string();
                    contents.push(
                        field
                            .render(false)
                            .map_err(|source| FieldsetError::Field { id, source })?,
                    );
                }
                FieldsetEntry::Fieldset(fieldset) => {
                    contents.push(fieldset.render(false)?);
                }
            }
        }

        Ok(contents.join("\n"))
    }

    fn verbose_instructions(&self) -> String {
        if self.instructions.is_empty() {
            String::new()
        } else {
            format!("<p>{}</p>\n", self.instructions)
        }
    }

    fn child_container_classes(&self) -> String {
        format!(
            "field field-fieldset field-fieldset-child field-fieldset-{}",
            self.id
        )
    }
}

/// A `fields` entry describes a nested fieldset when it carries fieldset
/// structure (`fields` or `legend`) and no field type.
fn describes_fieldset(map: &Map<String, Value>) -> bool {
    !map.contains_key("type") && (map.contains_key("fields") || map.contains_key("legend"))
}
