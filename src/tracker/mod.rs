//! Execution tracking for generated test packages.
//!
//! [`ExecutionTracker`] numbers scenario runs and reports which scenarios
//! passed, failed or are still pending; [`HistoryLog`] keeps the daily run
//! logs that [`check_pending_scenarios`] reads back.

mod error;
mod execution;
mod history;
mod status;

pub use error::TrackerError;
pub use execution::{
    COMPLETION_MESSAGE, ExecutionTracker, FAIL, OK, ScenarioRun, ScenarioStatus, StepResult,
};
pub use history::{HistoryLog, LOGS_DIR, log_file_name};
pub use status::{CompletionStatus, check_pending_scenarios, completion_status};
