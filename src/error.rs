//! Error types for form construction, parsing, and rendering.
//!
//! Each component level owns one error enum, and parse failures at a child
//! level are re-wrapped with the parent's kind while keeping the original
//! cause attached. A caller therefore only ever matches one error type per
//! call level and can still walk `source()` for diagnostics.

use thiserror::Error;

/// Failures raised while parsing or rendering a single field.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A type name could not be resolved to a registered field
    /// implementation.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A classes-like property was neither an array, object, nor string.
    #[error("classes must be array, object, or string, got {got}")]
    InvalidClasses { got: String },

    /// A field whose value must be a JSON-encoded structure failed to
    /// decode it.
    #[error("{type_tag} requires a JSON value")]
    InvalidFieldValue { type_tag: String },

    /// A class-list selector name outside the known set.
    #[error("unknown class list: {0}")]
    UnknownProperty(String),

    /// A selection field cannot render without options.
    #[error("cannot build selection: no options")]
    OptionsRequired,

    /// A selection field was given grouped options where a flat list is
    /// required.
    #[error("cannot build selection: options too deep")]
    OptionsTooDeep,

    /// The input was not valid JSON at all.
    #[error("field description is not valid JSON")]
    InvalidJson(#[from] serde_json::Error),
}

/// Failures raised while parsing, composing, or rendering a fieldset.
#[derive(Debug, Error)]
pub enum FieldsetError {
    /// Something other than a field was supplied where a field was
    /// required; wraps the field-level cause when one exists.
    #[error("must add a field")]
    NotAField(#[source] Option<FieldError>),

    /// Something other than a fieldset was supplied where a fieldset was
    /// required; wraps the nested parse cause when one exists.
    #[error("must add a fieldset")]
    NotAFieldset(#[source] Option<Box<FieldsetError>>),

    /// A classes property was neither an array nor a string.
    #[error("fieldset classes must be array or string, got {got}")]
    InvalidClasses { got: String },

    /// A collection entry that describes neither a field nor a fieldset.
    #[error("can only hold fields and fieldsets, got {got}")]
    NeitherFieldNorFieldset { got: String },

    /// A contained field failed to render.
    #[error("field {id} failed to render")]
    Field {
        id: String,
        #[source]
        source: FieldError,
    },

    /// The input was not valid JSON at all.
    #[error("fieldset description is not valid JSON")]
    InvalidJson(#[from] serde_json::Error),
}

/// Failures raised while parsing, composing, or rendering a form.
#[derive(Debug, Error)]
pub enum FormError {
    /// Something other than a fieldset was supplied; wraps the
    /// fieldset-level cause when one exists.
    #[error("must add a fieldset")]
    NotAFieldset(#[source] Option<FieldsetError>),

    /// Something other than a button was supplied to a button adder;
    /// wraps the field-level parse cause when one exists.
    #[error("must add a button")]
    NotAButton(#[source] Option<FieldError>),

    /// A classes property was neither an array nor a JSON-encoded array.
    #[error("form classes must be array or JSON-encoded array, got {got}")]
    InvalidClasses { got: String },

    /// A contained fieldset failed to render.
    #[error("fieldset {id} failed to render")]
    Fieldset {
        id: String,
        #[source]
        source: FieldsetError,
    },

    /// A button field failed to render.
    #[error("button {id} failed to render")]
    Button {
        id: String,
        #[source]
        source: FieldError,
    },

    /// The input was not valid JSON at all.
    #[error("form description is not valid JSON")]
    InvalidJson(#[from] serde_json::Error),
}

/// Failures raised by [`FormBuilder`](crate::FormBuilder) calls.
#[derive(Debug, Error)]
pub enum FormBuilderError {
    /// Fieldsets require legends.
    #[error("fieldsets require legends")]
    MissingLegend,

    /// Fields require a type.
    #[error("fields require a type")]
    MissingFieldType,

    /// A field was added before any fieldset was opened.
    #[error("no fieldset is open")]
    NoOpenFieldset,
}

/// Failures raised by a single [`Validator`](crate::Validator) call.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// No rule with this name is known.
    #[error("unknown validation function: {0}")]
    UnknownFunction(String),

    /// A custom rule produced something other than a boolean.
    #[error("invalid return type: {got}")]
    InvalidReturnType { got: String },

    /// A rule could not be applied to the value, usually because a
    /// required parameter was missing or mistyped.
    #[error("unable to validate '{value}' with '{rule}'")]
    UnableToValidate { rule: String, value: String },

    /// A composite evaluator was called with an empty rule list.
    #[error("cannot validate without functions")]
    NoFunctions,

    /// A filename had no extension to derive a MIME type from.
    #[error("no extension on '{0}'")]
    NoExtension(String),

    /// A filename extension outside the known MIME table.
    #[error("no MIME type known for '.{0}'")]
    MimeNotFound(String),
}
