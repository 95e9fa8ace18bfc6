//! HTML fragment templates for each field kind.
//!
//! Fields render as `<li>` items carrying a computed class list, a
//! `<label>` that reflects required/error state, optional instructions,
//! and the input element(s). Hidden fields and buttons stand alone. The
//! fragment strings here are the whole of a field's markup; fieldsets and
//! forms only concatenate them.

use serde_json::json;
use uuid::Uuid;

use super::kind::{ButtonIcon, ButtonStyle, FieldKind, OptionEntry, SelectDisplay};
use super::{ClassKind, Field};
use crate::coerce::scalar_text;
use crate::error::FieldError;

pub(super) fn render(field: &mut Field, display: bool) -> Result<String, FieldError> {
    let kind = field.kind.clone();

    let fragment = match kind {
        FieldKind::Text | FieldKind::Password => {
            text_input(field, &["maxlength", "placeholder"], false)
        }
        FieldKind::Honeypot => text_input(field, &["maxlength", "placeholder"], true),
        FieldKind::Number => text_input(field, &["step", "min", "max"], false),
        FieldKind::File => file_input(field),
        FieldKind::TextArea => textarea(field),
        FieldKind::Hidden => hidden(field),
        FieldKind::Note => note(field),
        FieldKind::SelectOne { display: choice } => select_one(field, choice)?,
        FieldKind::SelectMany { display: choice } => select_many(field, choice)?,
        FieldKind::SelectOneWithOther => select_with_other(field)?,
        FieldKind::Button { style, icon } => button(field, style, icon),
    };

    Ok(display_or_return(fragment, display))
}

/// Either echoes the fragment to standard output (returning an empty
/// string so the caller does not double-handle it) or returns it.
fn display_or_return(fragment: String, display: bool) -> String {
    if display {
        print!("{}", fragment);
        String::new()
    } else {
        fragment
    }
}

// shared pieces -----------------------------------------------------------

/// The computed class attribute of a field's containing list item:
/// caller extras, the wrapper class list, then `field`, `field-<tag>`,
/// and the id, de-duplicated in first-seen order.
fn item_classes(field: &Field, extras: &[&str]) -> String {
    let mut classes: Vec<String> = extras.iter().map(|c| c.to_string()).collect();
    classes.extend(field.classes(ClassKind::Wrapper).iter().cloned());
    classes.push("field".to_string());
    classes.push(format!("field-{}", field.type_tag()));
    classes.push(field.id().to_string());

    join_unique(&classes)
}

/// The `<label>` element: state classes, the label text, a star when
/// required, and the alert message when the field is in error.
fn label_html(field: &Field, extras: &[&str]) -> String {
    let mut classes: Vec<String> = extras.iter().map(|c| c.to_string()).collect();
    classes.push(if field.required() { "required" } else { "optional" }.to_string());
    classes.push(if field.error() { "error" } else { "no-error" }.to_string());
    classes.push(field.type_tag().to_string());
    classes.push(field.name().to_string());
    classes.push(field.id().to_string());

    let mut label = format!(
        "<label for=\"{}\" class=\"{}\"><span>{}</span>",
        field.id(),
        join_unique(&classes),
        field.label()
    );

    if field.required() {
        label.push_str("<i class=\"fa fa-star\" aria-hidden=\"true\" title=\"required\"></i>");
    }
    if field.error() {
        label.push_str(&format!(
            "<strong role=\"alert\">{}</strong>",
            field.error_message()
        ));
    }

    label.push_str("</label>");
    label
}

/// Instructions ready for immediate use in markup: a paragraph, or
/// nothing at all rather than an empty paragraph.
fn verbose_instructions(field: &Field) -> String {
    if field.instructions().is_empty() {
        String::new()
    } else {
        format!("<p>{}</p>", field.instructions())
    }
}

/// Splices the additional attributes a variant cares about, producing
/// something like ` step="1" min="0" max="10"` (leading space included
/// when non-empty).
fn spliced_attributes(field: &Field, potentials: &[&str]) -> String {
    let mut out = String::new();
    for potential in potentials {
        if let Some(value) = field.additional_attributes().get(*potential) {
            out.push_str(&format!(" {}=\"{}\"", potential, value));
        }
    }
    out
}

fn required_attributes(field: &Field) -> String {
    format!(
        " aria-required=\"{}\"{}",
        field.required(),
        if field.required() { " required" } else { "" }
    )
}

fn join_unique(classes: &[String]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for class in classes {
        if !class.is_empty() && !seen.contains(&class.as_str()) {
            seen.push(class);
        }
    }
    seen.join(" ")
}

fn item(field: &Field, extras: &[&str], body: String) -> String {
    format!(
        "<li class=\"{}\">\n{}\n{}{}\n</li>",
        item_classes(field, extras),
        label_html(field, &[]),
        instructions_block(field),
        body
    )
}

fn instructions_block(field: &Field) -> String {
    let instructions = verbose_instructions(field);
    if instructions.is_empty() {
        instructions
    } else {
        format!("{}\n", instructions)
    }
}

// plain entries -----------------------------------------------------------

fn text_input(field: &Field, potentials: &[&str], honeypot: bool) -> String {
    let input = format!(
        "<input type=\"{}\"{} id=\"{}\" name=\"{}\" class=\"{}\" value=\"{}\"{}{}>",
        field.type_tag(),
        if honeypot { " tabindex=\"-1\"" } else { "" },
        field.id(),
        field.name(),
        field.classes_as_string(ClassKind::Input),
        field.value(),
        required_attributes(field),
        spliced_attributes(field, potentials),
    );

    item(field, &[], input)
}

fn file_input(field: &Field) -> String {
    // a file input's value cannot be set, so the current value (if any)
    // is reported alongside the input instead
    let mut input = format!(
        "<input type=\"file\" id=\"{}\" name=\"{}\" class=\"{}\"{}>",
        field.id(),
        field.name(),
        field.classes_as_string(ClassKind::Input),
        required_attributes(field),
    );

    if !field.value().is_empty() {
        input.push_str(&format!(
            "<span class=\"file-field-value\">Current file: <em>{}</em></span>",
            field.value()
        ));
    }

    item(field, &[], input)
}

fn textarea(field: &Field) -> String {
    let area = format!(
        "<textarea id=\"{}\" name=\"{}\" class=\"{}\"{}{}>{}</textarea>",
        field.id(),
        field.name(),
        field.classes_as_string(ClassKind::Input),
        required_attributes(field),
        spliced_attributes(field, &["maxlength", "placeholder"]),
        field.value(),
    );

    item(field, &[], area)
}

fn hidden(field: &Field) -> String {
    // completely hidden: no surrounding item, label, or instructions
    format!(
        "<input type=\"hidden\" id=\"{}\" name=\"{}\" value=\"{}\">",
        field.id(),
        field.name(),
        field.value()
    )
}

fn note(field: &Field) -> String {
    // a note is just words, placed in the field flow
    format!(
        "<li class=\"{}\">\n{}\n</li>",
        item_classes(field, &[]),
        verbose_instructions(field)
    )
}

// selections --------------------------------------------------------------

fn select_one(field: &mut Field, display: Option<SelectDisplay>) -> Result<String, FieldError> {
    let display = display.unwrap_or_else(|| default_select_one_display(field));
    let selected = vec![field.value().to_string()];

    match display {
        SelectDisplay::Select => select_element(field, &selected, None),
        SelectDisplay::Fieldset => input_set(field, &selected, "radio", ""),
    }
}

fn select_many(field: &mut Field, display: Option<SelectDisplay>) -> Result<String, FieldError> {
    let selected: Vec<String> = field
        .decode_composite_value(&[])?
        .iter()
        .map(scalar_text)
        .collect();

    match display.unwrap_or(SelectDisplay::Fieldset) {
        SelectDisplay::Select => {
            let size = usize::min(field.options().len() / 2, 10);
            select_element(field, &selected, Some(size))
        }
        SelectDisplay::Fieldset => input_set(field, &selected, "checkbox", "[]"),
    }
}

/// A select is the default at five or more options; below that, a radio
/// set reads better.
fn default_select_one_display(field: &Field) -> SelectDisplay {
    if field.options().len() >= 5 {
        SelectDisplay::Select
    } else {
        SelectDisplay::Fieldset
    }
}

/// Renders the `<select>` form of a selection field. `multiple_size`
/// marks the multi-valued variant.
fn select_element(
    field: &Field,
    selected: &[String],
    multiple_size: Option<usize>,
) -> Result<String, FieldError> {
    let options = options_html(field, selected)?;

    let multiple = match multiple_size {
        Some(size) => format!(" size=\"{}\" multiple", size),
        None => String::new(),
    };

    let select = format!(
        "<select{} id=\"{}\" name=\"{}\" class=\"{}\"{}>\n{}\n</select>",
        multiple,
        field.suffixed_id(select_suffix(field)),
        field.suffixed_name(select_suffix(field)),
        field.classes_as_string(ClassKind::Input),
        required_attributes(field),
        options,
    );

    Ok(item(field, &[], select))
}

/// The select-with-other variant suffixes its element ids to tell its two
/// inputs apart; plain selects use their ids as-is.
fn select_suffix(field: &Field) -> &'static str {
    match field.kind() {
        FieldKind::SelectOneWithOther => "known",
        _ => "",
    }
}

/// `<option>` (and `<optgroup>`) content for the select form. Grouped
/// options are allowed here but not in input sets.
fn options_html(field: &Field, selected: &[String]) -> Result<String, FieldError> {
    if field.options().is_empty() {
        return Err(FieldError::OptionsRequired);
    }

    let mut out = Vec::new();
    for (value, entry) in field.options() {
        match entry {
            OptionEntry::Label(label) => {
                out.push(option_html(value, label, selected));
            }
            OptionEntry::Group(group) => {
                let inner: Vec<String> = group
                    .iter()
                    .map(|(v, l)| option_html(v, l, selected))
                    .collect();
                out.push(format!(
                    "<optgroup label=\"{}\">{}</optgroup>",
                    value,
                    inner.join("")
                ));
            }
        }
    }

    Ok(out.join(""))
}

fn option_html(value: &str, label: &str, selected: &[String]) -> String {
    format!(
        "<option value=\"{}\"{}>{}</option>",
        value,
        if selected.iter().any(|s| s == value) {
            " selected"
        } else {
            ""
        },
        label
    )
}

/// The fieldset form of a selection: a legend plus an ordered list of
/// radio buttons or checkboxes. Options must be flat here.
fn input_set(
    field: &Field,
    selected: &[String],
    input_kind: &str,
    name_suffix: &str,
) -> Result<String, FieldError> {
    if field.options().is_empty() {
        return Err(FieldError::OptionsRequired);
    }

    let mut inputs = Vec::new();
    for (value, entry) in field.options() {
        let label = match entry {
            OptionEntry::Label(label) => label,
            OptionEntry::Group(_) => return Err(FieldError::OptionsTooDeep),
        };

        inputs.push(format!(
            "<li class=\"{kind}\"><label>\
             <input type=\"{kind}\" name=\"{name}{suffix}\" value=\"{value}\" class=\"{classes}\"{checked}>\
             <span class=\"{kind}-label\">{label}</span>\
             </label></li>",
            kind = input_kind,
            name = field.name(),
            suffix = name_suffix,
            value = value,
            classes = field.classes_as_string(ClassKind::Input),
            checked = if selected.iter().any(|s| s == value) {
                " checked"
            } else {
                ""
            },
            label = label,
        ));
    }

    let shell = format!(
        "<li class=\"{}\">\n<fieldset id=\"{}\">\n<legend>{}</legend>\n{}<ol>\n{}\n</ol>\n</fieldset>\n</li>",
        item_classes(field, &["fieldset"]),
        field.id(),
        label_html(field, &[]),
        instructions_block(field),
        inputs.join("\n"),
    );

    Ok(shell)
}

fn select_with_other(field: &mut Field) -> Result<String, FieldError> {
    field.set_class(ClassKind::Input, "with-other");

    // the canonical value encodes the pair (known, other); split it so
    // the select compares against the known half.  the decoded pair is
    // already memoized, so assigning the plain value here keeps
    // re-renders stable.
    let parts = field.decode_composite_value(&[json!(""), json!("")])?;
    let known = parts.first().map(scalar_text).unwrap_or_default();
    let other = parts.get(1).map(scalar_text).unwrap_or_default();
    field.value = known.clone();

    let selected = vec![known];
    let fragment = select_element(field, &selected, None)?;

    let companion = format!(
        "<input type=\"text\" id=\"{}\" name=\"{}\" class=\"{} other other-hidden\"{} value=\"{}\">",
        field.suffixed_id("unknown"),
        field.suffixed_name("unknown"),
        field.classes_as_string(ClassKind::Input),
        spliced_attributes(field, &["placeholder"]),
        other,
    );

    // the companion input follows the select; a small inline handler
    // toggles it when the "?" option is picked
    let toggle = format!("selectWithOther_{}", Uuid::new_v4().simple());
    let fragment = fragment.replace("<select", &format!("<select onchange=\"{}(this)\"", toggle));
    let fragment = fragment.replace("</select>", &format!("</select>\n{}", companion));

    let script = format!(
        "\n<script type=\"text/javascript\">\n\
         function {}(select) {{\n\
         var other = select.nextElementSibling;\n\
         var value = select.options[select.selectedIndex].value;\n\
         other.classList.toggle(\"other-hidden\", value !== \"?\");\n\
         }}\n\
         </script>",
        toggle
    );

    Ok(format!("{}{}", fragment, script))
}

// buttons -----------------------------------------------------------------

fn button(field: &Field, style: ButtonStyle, icon: ButtonIcon) -> String {
    // a button's label is its text content, not a <label> element
    format!(
        "<button type=\"{}\" class=\"{}\"><i class=\"fa fa-fw {}\" aria-hidden=\"true\"></i>{}</button>",
        style.as_str(),
        field.classes_as_string(ClassKind::Input),
        icon.class(),
        field.label(),
    )
}
