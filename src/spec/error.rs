//! Error types for specification loading and hierarchy resolution.

use indexmap::IndexMap;

use super::diagnostic::SpecDiagnostic;

/// Errors that can occur when loading or resolving behaviour specifications.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// YAML deserialization failed (malformed YAML or document shape mismatch).
    #[error("YAML deserialization failed: {message}")]
    Deserialize {
        /// Deterministic human-readable parser failure message.
        message: String,
        /// Structured parser diagnostic, when a source location is available.
        diagnostic: Option<SpecDiagnostic>,
    },

    /// A derived class, scenario or step identifier is not a legal Python name.
    #[error("invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier {
        /// The identifier string that failed validation.
        identifier: String,
        /// A human-readable explanation of why the identifier is invalid.
        reason: String,
    },

    /// A step sentence could not be parsed.
    #[error("malformed step sentence '{sentence}': {reason}")]
    MalformedSentence {
        /// The offending sentence, verbatim.
        sentence: String,
        /// A human-readable explanation of the problem.
        reason: String,
    },

    /// A structural constraint was violated after deserialization.
    #[error("validation failed for feature '{feature}': {reason}")]
    ValidationFailed {
        /// The feature title that failed validation.
        feature: String,
        /// A human-readable explanation of the violation.
        reason: String,
    },

    /// Feature titles or scenario names collide across the documents.
    #[error("{}", render_conflicts(duplicate_titles, repeated_scenarios))]
    Conflicts {
        /// Class names produced by more than one document.
        duplicate_titles: Vec<String>,
        /// Scenario names mapped to every class declaring them.
        repeated_scenarios: IndexMap<String, Vec<String>>,
    },

    /// Step references between scenarios form an inheritance cycle.
    #[error("Cyclical inheritance between {first} and {second}")]
    CyclicalInheritance {
        /// First class of the shortest cycle, alphabetically.
        first: String,
        /// Second class of the shortest cycle, alphabetically.
        second: String,
    },

    /// A specification file or directory could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path of the file or directory being read.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

impl SpecError {
    /// Returns the structured diagnostic payload when one is available.
    #[must_use]
    pub const fn diagnostic(&self) -> Option<&SpecDiagnostic> {
        match self {
            Self::Deserialize { diagnostic, .. } => diagnostic.as_ref(),
            _ => None,
        }
    }
}

fn render_conflicts(
    duplicate_titles: &[String],
    repeated_scenarios: &IndexMap<String, Vec<String>>,
) -> String {
    let mut lines = Vec::new();
    if !duplicate_titles.is_empty() {
        lines.push(format!(
            "Duplicate titles are not supported, [{}]",
            duplicate_titles.join(", ")
        ));
    }
    if !repeated_scenarios.is_empty() {
        let entries = repeated_scenarios
            .iter()
            .map(|(name, classes)| format!("{name}: [{}]", classes.join(", ")))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "Repeated scenario names are not supported, {{{entries}}}"
        ));
    }
    lines.join("\n")
}
