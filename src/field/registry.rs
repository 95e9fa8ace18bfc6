//! Field-type catalog: name → constructor resolution.
//!
//! This module provides the [`FieldRegistry`] that maps type names from
//! the wire format (e.g. `"Text"`, `"SelectOne"`) to field constructors.
//! The catalog is explicit and populated up front (there is no runtime
//! discovery) and it doubles as the resolution cache: lookups that only
//! succeed through the fallback rules (path-qualified names, differing
//! case) append an alias entry so the scan happens once per name.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::kind::{ButtonIcon, ButtonStyle, FieldKind};
use super::Field;

/// Constructs a concrete field from `(id, name, label)`.
pub type FieldFactory = Arc<dyn Fn(&str, &str, &str) -> Field + Send + Sync>;

/// Type alias for the factory storage map.
type FactoryMap = Arc<RwLock<HashMap<String, FieldFactory>>>;

/// A thread-safe registry of field implementations.
///
/// The registry is read-mostly: parses resolve through it constantly,
/// while writes happen at startup (registration) or at most once per
/// resolved alias (memoization). Clones share the underlying catalog.
///
/// # Example
///
/// ```rust
/// use formwright::{Field, FieldRegistry};
/// use serde_json::json;
///
/// let registry = FieldRegistry::with_defaults();
/// let field = Field::parse(&registry, &json!({"id": "age", "type": "Number"})).unwrap();
/// assert_eq!(field.type_tag(), "number");
/// ```
pub struct FieldRegistry {
    factories: FactoryMap,
}

impl FieldRegistry {
    /// Creates an empty registry with no field implementations.
    pub fn new() -> Self {
        Self {
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a registry pre-populated with the built-in catalog: Text,
    /// TextArea, Number, Password, File, Hidden, Note, Honeypot,
    /// SelectOne, SelectMany, SelectOneWithOther, Button, SubmitButton,
    /// and ResetButton.
    pub fn with_defaults() -> Self {
        let registry = Self::new();

        let builtins: [(&str, FieldKind); 14] = [
            ("Text", FieldKind::Text),
            ("TextArea", FieldKind::TextArea),
            ("Number", FieldKind::Number),
            ("Password", FieldKind::Password),
            ("File", FieldKind::File),
            ("Hidden", FieldKind::Hidden),
            ("Note", FieldKind::Note),
            ("Honeypot", FieldKind::Honeypot),
            ("SelectOne", FieldKind::SelectOne { display: None }),
            ("SelectMany", FieldKind::SelectMany { display: None }),
            ("SelectOneWithOther", FieldKind::SelectOneWithOther),
            (
                "Button",
                FieldKind::Button {
                    style: ButtonStyle::Button,
                    icon: ButtonIcon::ChevronCircleRight,
                },
            ),
            (
                "SubmitButton",
                FieldKind::Button {
                    style: ButtonStyle::Submit,
                    icon: ButtonIcon::Save,
                },
            ),
            (
                "ResetButton",
                FieldKind::Button {
                    style: ButtonStyle::Reset,
                    icon: ButtonIcon::Undo,
                },
            ),
        ];

        for (name, kind) in builtins {
            let factory: FieldFactory =
                Arc::new(move |id, field_name, label| Field::new(kind.clone(), id, field_name, label));
            registry
                .register(name, factory)
                .expect("built-in names are distinct");
        }

        registry
    }

    /// Registers a field factory under the given short name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is already
    /// registered.
    pub fn register(
        &self,
        name: impl Into<String>,
        factory: FieldFactory,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut factories = self.factories.write();

        if factories.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        factories.insert(name, factory);
        Ok(())
    }

    /// Retrieves a factory by its exact registered name.
    pub fn get(&self, name: &str) -> Option<FieldFactory> {
        self.factories.read().get(name).cloned()
    }

    /// Resolves a wire-format type name to a factory.
    ///
    /// Resolution order: exact name; the final segment of a
    /// path-qualified name (`"fields::Text"`); a case-insensitive match
    /// against the catalog (covers serialized lowercase tags like
    /// `"selectone"`). Fallback hits are memoized by appending the
    /// requested name as an alias, so each spelling is scanned at most
    /// once per process.
    pub fn resolve(&self, type_name: &str) -> Option<FieldFactory> {
        if let Some(factory) = self.get(type_name) {
            return Some(factory);
        }

        let short = match type_name.rsplit("::").next() {
            Some(segment) if segment != type_name => {
                if let Some(factory) = self.get(segment) {
                    self.memoize(type_name, factory.clone());
                    return Some(factory);
                }
                segment
            }
            _ => type_name,
        };

        let found = {
            let factories = self.factories.read();
            factories
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(short))
                .map(|(_, factory)| factory.clone())
        };

        if let Some(factory) = found {
            self.memoize(type_name, factory.clone());
            return Some(factory);
        }

        None
    }

    /// Returns the registered names, sorted, for diagnostics and tests.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn memoize(&self, alias: &str, factory: FieldFactory) {
        self.factories
            .write()
            .entry(alias.to_string())
            .or_insert(factory);
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Clone for FieldRegistry {
    fn clone(&self) -> Self {
        Self {
            factories: Arc::clone(&self.factories),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a factory under a name that already exists.
    #[error("field type '{0}' already registered")]
    DuplicateName(String),
}
