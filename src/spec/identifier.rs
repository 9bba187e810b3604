//! Identifier validation for generated class and method names.
//!
//! Names derived from titles and step sentences become Python class and
//! method names, so they must match the ASCII pattern
//! `^[A-Za-z_][A-Za-z0-9_]*$` and must not be a Python keyword.

use super::error::SpecError;

/// Python hard keywords. Soft keywords (`match`, `case`, `type`) remain legal names.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Validates that a string is a legal generated Python identifier.
///
/// # Errors
///
/// Returns [`SpecError::InvalidIdentifier`] if the string is empty, does not
/// match `^[A-Za-z_][A-Za-z0-9_]*$`, or is a Python keyword.
///
/// # Examples
///
///     use storyc::spec::validate_identifier;
///
///     assert!(validate_identifier("even_boards").is_ok());
///     assert!(validate_identifier("NewGame").is_ok());
///     assert!(validate_identifier("pass").is_err());
///     assert!(validate_identifier("400_response").is_err());
pub fn validate_identifier(s: &str) -> Result<(), SpecError> {
    if s.is_empty() {
        return Err(SpecError::InvalidIdentifier {
            identifier: s.to_owned(),
            reason: "identifier must not be empty".to_owned(),
        });
    }

    if !is_valid_identifier_pattern(s) {
        return Err(SpecError::InvalidIdentifier {
            identifier: s.to_owned(),
            reason: concat!(
                "must match the pattern ",
                "^[A-Za-z_][A-Za-z0-9_]*$ ",
                "(ASCII letters, digits, and underscores; ",
                "must not start with a digit)"
            )
            .to_owned(),
        });
    }

    if PYTHON_KEYWORDS.contains(&s) {
        return Err(SpecError::InvalidIdentifier {
            identifier: s.to_owned(),
            reason: "this is a Python keyword and cannot name a generated method or class"
                .to_owned(),
        });
    }

    Ok(())
}

fn is_valid_identifier_pattern(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
