//! Completion status of the latest test session.

use camino::Utf8Path;

use super::error::TrackerError;
use super::execution::{COMPLETION_MESSAGE, FAIL, OK};
use super::history::{LOGS_DIR, read_latest};

/// Outcome of the latest recorded session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// Every scenario ran and passed.
    Passed,
    /// Every scenario ran and at least one failed.
    Failed,
    /// Some scenarios have not run.
    Pending,
}

impl CompletionStatus {
    /// Returns the process exit code reported for this status.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Passed => 0,
            Self::Failed => 1,
            Self::Pending => 3,
        }
    }
}

/// Reads the status from the text of a history log: the last non-blank
/// line must be a completion line.
#[must_use]
pub fn completion_status(log: &str) -> CompletionStatus {
    let last = log.lines().rev().map(str::trim).find(|line| !line.is_empty());
    match last {
        Some(line) if line.starts_with(COMPLETION_MESSAGE) && line.ends_with(OK) => {
            CompletionStatus::Passed
        }
        Some(line) if line.starts_with(COMPLETION_MESSAGE) && line.ends_with(FAIL) => {
            CompletionStatus::Failed
        }
        _ => CompletionStatus::Pending,
    }
}

/// Checks the newest history log under `logs_parent`.
///
/// # Errors
///
/// Returns [`TrackerError::LogsNotFound`] when no log exists and
/// [`TrackerError::Io`] when it cannot be read.
pub fn check_pending_scenarios(logs_parent: &Utf8Path) -> Result<CompletionStatus, TrackerError> {
    let log = read_latest(logs_parent)?.ok_or_else(|| TrackerError::LogsNotFound {
        path: logs_parent.join(LOGS_DIR).to_string(),
    })?;
    Ok(completion_status(&log))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::all_passed("1 ✅ A.test_a:\n\nAll scenarios ran ▌ 1 ✅\n\n", CompletionStatus::Passed)]
    #[case::some_failed("All scenarios ran ▌ 2 ✅ ▌ 1 ❌\n", CompletionStatus::Failed)]
    #[case::pending("Scenario runs\nPending [A.test_a]\n\n", CompletionStatus::Pending)]
    #[case::older_completion("All scenarios ran ▌ 1 ✅\n\nPending [A.test_b]\n", CompletionStatus::Pending)]
    #[case::empty("", CompletionStatus::Pending)]
    fn reads_the_last_line(#[case] log: &str, #[case] expected: CompletionStatus) {
        assert_eq!(completion_status(log), expected);
    }

    #[rstest]
    #[case(CompletionStatus::Passed, 0)]
    #[case(CompletionStatus::Failed, 1)]
    #[case(CompletionStatus::Pending, 3)]
    fn exit_codes(#[case] status: CompletionStatus, #[case] code: i32) {
        assert_eq!(status.exit_code(), code);
    }

    #[test]
    fn missing_logs_are_reported() {
        let temp = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let parent = Utf8Path::from_path(temp.path()).unwrap_or_else(|| panic!("UTF-8 path"));
        let error = check_pending_scenarios(parent)
            .err()
            .unwrap_or_else(|| panic!("should fail"));
        assert_eq!(error.exit_code(), 4);
    }
}
