//! Error type for package generation, patching and validation.

use camino::Utf8Path;

use crate::source::SourceError;
use crate::spec::SpecError;
use crate::tracker::TrackerError;

use super::config::ConfigError;

/// Errors raised while generating, patching or checking a test package.
#[derive(Debug, thiserror::Error)]
pub enum CoderError {
    /// The specification could not be loaded or resolved.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// Generated source does not have the expected structure.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Execution history could not be read or written.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// A package file or directory could not be read or written.
    #[error("cannot access {path}: {source}")]
    Io {
        /// Path of the file or directory.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The target package directory exists and overwriting was not
    /// requested.
    #[error("{path} already exists; pass overwrite to replace it")]
    Overwrite {
        /// Path of the existing package directory.
        path: String,
    },

    /// A generated module is missing from the package.
    #[error("{path} is not a generated test package: missing {module}")]
    MissingModule {
        /// Package directory.
        path: String,
        /// Missing module file name.
        module: String,
    },

    /// The declared classes disagree with the specification.
    #[error("Inconsistent class structure:\n{}", differences.join("\n"))]
    InconsistentClassStructure {
        /// One line per mismatch.
        differences: Vec<String>,
    },
}

impl CoderError {
    /// Returns the process exit code reported for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Overwrite { .. } | Self::Spec(_) | Self::MissingModule { .. } => 4,
            Self::InconsistentClassStructure { .. } => 6,
            Self::Source(_) => 7,
            Self::Tracker(error) => error.exit_code(),
            Self::Config(_) => 2,
            Self::Io { .. } => 1,
        }
    }

    pub(crate) fn io(path: &Utf8Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}
