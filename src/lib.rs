//! # Formwright
//!
//! A server-side HTML form builder: a small object model (form, fieldset,
//! field) that can be constructed programmatically or reconstructed from a
//! JSON description, rendered to HTML, and re-populated with submitted
//! values and error messages for redisplay.
//!
//! ## Overview
//!
//! A JSON form description flows top-down through
//! [`Form::parse`] → [`Fieldset::parse`] → [`Field::parse`], producing a
//! live object graph; rendering flows the same direction and concatenates
//! markup bottom-up into a single string. After a failed submission,
//! feedback flows top-down by field id through
//! [`Form::add_field_error`], which finds the owning fieldset and mutates
//! the target field in place.
//!
//! Field type names resolve through a [`FieldRegistry`], an explicit,
//! injectable catalog constructed once at startup. The wire format is
//! deliberately tolerant: several properties accept a native array or
//! object, a JSON-encoded string, or a delimited string.
//!
//! A companion [`Validator`] evaluates named boolean rules (`number`,
//! `email`, `date`, ...) against submitted values. The form model never
//! calls it; fields carry their rule descriptors opaquely and application
//! code wires the two together.
//!
//! ## Example
//!
//! ```rust
//! use formwright::{FieldRegistry, Form};
//! use serde_json::json;
//!
//! let registry = FieldRegistry::with_defaults();
//! let mut form = Form::parse(&registry, &json!({
//!     "id": "contact",
//!     "method": "post",
//!     "fieldsets": [{
//!         "legend": "Your Details",
//!         "fields": [
//!             {"id": "email", "required": true},
//!             {"id": "message", "type": "TextArea"},
//!         ],
//!     }],
//! })).unwrap();
//!
//! // a failed submission comes back with feedback applied by field id
//! assert!(form.add_field_error("email", "that address looks wrong", Some("not-an-email")));
//!
//! let html = form.render(false).unwrap();
//! assert!(html.contains("that address looks wrong"));
//! ```

mod builder;
mod coerce;
pub mod error;
mod field;
mod fieldset;
mod form;
pub mod naming;
mod validator;

pub use builder::FormBuilder;
pub use error::{FieldError, FieldsetError, FormBuilderError, FormError, ValidatorError};
pub use field::{
    ButtonIcon, ButtonStyle, ClassKind, Field, FieldFactory, FieldKind, FieldRegistry, OptionEntry,
    RegistryError, SelectDisplay,
};
pub use fieldset::{Fieldset, FieldsetEntry};
pub use form::{
    Form, ENCTYPES, ENCTYPE_DEFAULT, ENCTYPE_MULTIPART, ENCTYPE_TEXT, ENCTYPE_URLENCODED,
};
pub use validator::{CustomRule, RuleMode, RuleSet, Validator};
