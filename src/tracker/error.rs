//! Error type for execution tracking.

use camino::Utf8Path;

/// Errors raised while recording or reading execution history.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// No history log exists under the logs parent.
    #[error("no run logs found in {path}")]
    LogsNotFound {
        /// The directory searched.
        path: String,
    },

    /// A run was recorded for a scenario that was never registered.
    #[error("scenario {qualname} is not registered")]
    UnknownScenario {
        /// `Class.method` name of the scenario.
        qualname: String,
    },

    /// A history file could not be read or written.
    #[error("cannot access {path}: {source}")]
    Io {
        /// Path of the file or directory.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl TrackerError {
    /// Returns the process exit code reported for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::LogsNotFound { .. } => 4,
            Self::UnknownScenario { .. } | Self::Io { .. } => 1,
        }
    }

    pub(crate) fn io(path: &Utf8Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}
