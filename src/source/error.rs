//! Error types for generated-source parsing.

use super::lint::LintViolation;

/// Errors raised when generated Python source does not match the layout the
/// splitter and the patcher rely on.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The structural lint found violations.
    #[error("{file}: structural lint failed:\n{}", render_violations(violations))]
    Lint {
        /// File or module identifier.
        file: String,
        /// Every violation found, in line order.
        violations: Vec<LintViolation>,
    },

    /// A piece of the module does not match the expected grammar.
    #[error("{file}: {reason}: {excerpt:?}")]
    Structure {
        /// File or module identifier.
        file: String,
        /// What was expected.
        reason: String,
        /// The first line of the offending text.
        excerpt: String,
    },
}

impl SourceError {
    pub(crate) fn structure(file: &str, reason: impl Into<String>, text: &str) -> Self {
        Self::Structure {
            file: file.to_owned(),
            reason: reason.into(),
            excerpt: text.lines().next().unwrap_or_default().to_owned(),
        }
    }
}

fn render_violations(violations: &[LintViolation]) -> String {
    violations
        .iter()
        .map(LintViolation::render)
        .collect::<Vec<_>>()
        .join("\n")
}
