//! Slug helpers for deriving display text from identifiers.
//!
//! Form descriptions frequently supply only an id like `first-name`. The
//! helpers here turn that into the display form ("First Name") and back
//! into a slug, so labels and legends can default deterministically.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("static pattern"));
static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_-]").expect("static pattern"));

/// Reduces a string to a lowercase slug, replacing runs of non-word
/// characters with `replacement`.
///
/// This is not reversible in general; [`unsanitize`] recovers a display
/// form, not the original string.
///
/// # Example
///
/// ```rust
/// use formwright::naming::sanitize;
///
/// assert_eq!(sanitize("First Name", "-"), "first-name");
/// ```
pub fn sanitize(string: &str, replacement: &str) -> String {
    NON_WORD.replace_all(string, replacement).to_lowercase()
}

/// Turns a slug back into display text: separators become spaces and each
/// word is capitalized.
///
/// # Example
///
/// ```rust
/// use formwright::naming::unsanitize;
///
/// assert_eq!(unsanitize("first-name"), "First Name");
/// assert_eq!(unsanitize("contact_us"), "Contact Us");
/// ```
pub fn unsanitize(string: &str) -> String {
    ucwords(&SLUG_SEPARATORS.replace_all(string, " "))
}

/// Uppercases the first character of each whitespace-separated word,
/// leaving the remainder of each word untouched.
fn ucwords(string: &str) -> String {
    let mut out = String::with_capacity(string.len());
    let mut at_word_start = true;

    for ch in string.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_lowercases_and_replaces() {
        assert_eq!(sanitize("First Name", "-"), "first-name");
        assert_eq!(sanitize("a  b!!c", "-"), "a-b-c");
    }

    #[test]
    fn test_sanitize_custom_replacement() {
        assert_eq!(sanitize("First Name", "_"), "first_name");
    }

    #[test]
    fn test_unsanitize_hyphens_and_underscores() {
        assert_eq!(unsanitize("first-name"), "First Name");
        assert_eq!(unsanitize("contact_us_now"), "Contact Us Now");
    }

    #[test]
    fn test_unsanitize_preserves_inner_case() {
        assert_eq!(unsanitize("select-URL"), "Select URL");
    }

    #[test]
    fn test_unsanitize_plain_word() {
        assert_eq!(unsanitize("email"), "Email");
    }

    #[test]
    fn test_round_trip_is_not_identity() {
        // unsanitize(sanitize(..)) recovers display text, not the input
        assert_eq!(unsanitize(&sanitize("What's your name?", "-")), "What S Your Name ");
    }
}
