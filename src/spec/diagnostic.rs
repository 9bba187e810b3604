//! Source-located diagnostics for specification documents.
//!
//! A specification directory holds two kinds of YAML document, the feature
//! files and the alias table. A parse failure in either carries the kind of
//! document, the file and the position reported by the YAML parser.

use std::fmt;

/// Which document failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecDiagnosticCode {
    /// A feature document under `features/`.
    FeatureParseFailure,
    /// The `aliases.yml` table.
    AliasParseFailure,
}

impl SpecDiagnosticCode {
    /// Returns the stable, machine-readable code string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FeatureParseFailure => "spec.feature_parse_failure",
            Self::AliasParseFailure => "spec.alias_parse_failure",
        }
    }
}

/// A 1-indexed position in a named document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// File path or synthetic source identifier.
    pub source: String,
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number.
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

/// A parse failure pinned to a document position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDiagnostic {
    /// Kind of document that failed.
    pub code: SpecDiagnosticCode,
    /// Where the parser stopped.
    pub location: SourceLocation,
    /// First line of the parser message.
    pub message: String,
}

impl SpecDiagnostic {
    /// Builds a diagnostic from a YAML parser error, when the parser reports
    /// a position.
    #[must_use]
    pub fn from_yaml_error(
        code: SpecDiagnosticCode,
        source: &str,
        error: &serde_saphyr::Error,
    ) -> Option<Self> {
        let position = error.location()?;
        let message = error.to_string();
        Some(Self {
            code,
            location: SourceLocation {
                source: source.to_owned(),
                line: usize::try_from(position.line()).unwrap_or(usize::MAX),
                column: usize::try_from(position.column()).unwrap_or(usize::MAX),
            },
            message: message.lines().next().unwrap_or_default().to_owned(),
        })
    }

    /// Renders the diagnostic as `code | source:line:column | message`.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SpecDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.code.as_str(), self.location, self.message)
    }
}
