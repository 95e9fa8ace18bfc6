//! The concrete field variants and their per-variant configuration.
//!
//! Every field the catalog knows is one [`FieldKind`] variant; the markup
//! differences between them live in the render module, and the small
//! pieces of configuration a variant owns (a select's display strategy, a
//! button's style and icon) live on the variant itself.

use indexmap::IndexMap;

/// One option in a selection field: either a plain label, or a labeled
/// group of value → label pairs (rendered as an `<optgroup>`).
#[derive(Debug, Clone, PartialEq)]
pub enum OptionEntry {
    Label(String),
    Group(IndexMap<String, String>),
}

/// How a selection field presents itself: a `<select>` element, or a
/// nested fieldset of radio buttons / checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectDisplay {
    Select,
    Fieldset,
}

/// The HTML `type` attribute of a button field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Button,
    Submit,
    Reset,
}

impl ButtonStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonStyle::Button => "button",
            ButtonStyle::Submit => "submit",
            ButtonStyle::Reset => "reset",
        }
    }
}

/// The icon rendered inside a button. Each style has a conventional icon;
/// anything else falls back to the default chevron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonIcon {
    ChevronCircleRight,
    Save,
    Undo,
}

impl ButtonIcon {
    pub fn class(self) -> &'static str {
        match self {
            ButtonIcon::ChevronCircleRight => "fa-chevron-circle-right",
            ButtonIcon::Save => "fa-save",
            ButtonIcon::Undo => "fa-undo",
        }
    }

    /// Maps an icon class name to the known set, defaulting to the
    /// chevron when the name is unrecognized.
    pub fn from_class(class: &str) -> Self {
        match class {
            "fa-save" => ButtonIcon::Save,
            "fa-undo" => ButtonIcon::Undo,
            _ => ButtonIcon::ChevronCircleRight,
        }
    }
}

/// The tagged set of concrete field implementations.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    TextArea,
    Number,
    Password,
    File,
    Hidden,
    Note,
    Honeypot,
    SelectOne { display: Option<SelectDisplay> },
    SelectMany { display: Option<SelectDisplay> },
    SelectOneWithOther,
    Button { style: ButtonStyle, icon: ButtonIcon },
}

impl FieldKind {
    /// The lowercase type tag this variant reports. A honeypot reports
    /// `text` so it renders as an ordinary text input; buttons report a
    /// style-specific tag so the button family remains recognizable.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::TextArea => "textarea",
            FieldKind::Number => "number",
            FieldKind::Password => "password",
            FieldKind::File => "file",
            FieldKind::Hidden => "hidden",
            FieldKind::Note => "note",
            FieldKind::Honeypot => "text",
            FieldKind::SelectOne { .. } => "selectone",
            FieldKind::SelectMany { .. } => "selectmany",
            FieldKind::SelectOneWithOther => "selectonewithother",
            FieldKind::Button { style, .. } => match style {
                ButtonStyle::Button => "button",
                ButtonStyle::Submit => "submitbutton",
                ButtonStyle::Reset => "resetbutton",
            },
        }
    }

    /// How many DOM input elements make up one logical field.
    pub fn element_count(&self) -> usize {
        match self {
            FieldKind::SelectOneWithOther => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_honeypot_reports_text_tag() {
        assert_eq!(FieldKind::Honeypot.tag(), "text");
    }

    #[test]
    fn test_button_tags_follow_style() {
        let submit = FieldKind::Button {
            style: ButtonStyle::Submit,
            icon: ButtonIcon::Save,
        };
        assert_eq!(submit.tag(), "submitbutton");

        let reset = FieldKind::Button {
            style: ButtonStyle::Reset,
            icon: ButtonIcon::Undo,
        };
        assert_eq!(reset.tag(), "resetbutton");
    }

    #[test]
    fn test_element_counts() {
        assert_eq!(FieldKind::Text.element_count(), 1);
        assert_eq!(FieldKind::SelectOneWithOther.element_count(), 2);
    }

    #[test]
    fn test_unknown_icon_falls_back() {
        assert_eq!(
            ButtonIcon::from_class("fa-rocket"),
            ButtonIcon::ChevronCircleRight
        );
    }
}
