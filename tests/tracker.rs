//! Integration tests for recording scenario sessions in the run history.

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use storyc::tracker::{
    COMPLETION_MESSAGE, CompletionStatus, ExecutionTracker, HistoryLog, StepResult,
    TrackerError, check_pending_scenarios,
};
use tempfile::TempDir;

struct LogsParent {
    _temp: TempDir,
    path: Utf8PathBuf,
}

#[fixture]
fn logs_parent() -> LogsParent {
    let temp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
        .unwrap_or_else(|path| panic!("non UTF-8 path {}", path.display()));
    LogsParent { _temp: temp, path }
}

fn session(logs: &LogsParent) -> ExecutionTracker {
    let history = HistoryLog::open(&logs.path, 5).unwrap_or_else(|e| panic!("open logs: {e}"));
    let mut tracker =
        ExecutionTracker::with_history(history).unwrap_or_else(|e| panic!("session: {e}"));
    tracker.register_scenario("NewGame", "test_odd_boards");
    tracker.register_scenario("ClearBoard", "test_start_board");
    tracker
}

fn ok(name: &str) -> StepResult {
    StepResult::passed(name, Vec::new(), "()")
}

fn run(tracker: &mut ExecutionTracker, qualname: &str, steps: Vec<StepResult>) {
    tracker
        .record_run(qualname, steps)
        .unwrap_or_else(|e| panic!("record {qualname}: {e}"));
}

#[rstest]
fn complete_passing_session_is_reported_as_passed(logs_parent: LogsParent) {
    let mut tracker = session(&logs_parent);
    run(&mut tracker, "NewGame.test_odd_boards", vec![ok("i_request_a_new_game_with_boards")]);
    run(&mut tracker, "ClearBoard.test_start_board", vec![ok("even_boards")]);

    let completion = tracker
        .finish()
        .unwrap_or_else(|e| panic!("finish session: {e}"));

    assert_eq!(completion, Some(format!("{COMPLETION_MESSAGE} ▌ 2 ✅")));
    let status = check_pending_scenarios(&logs_parent.path)
        .unwrap_or_else(|e| panic!("check logs: {e}"));
    assert_eq!(status, CompletionStatus::Passed);
    assert_eq!(status.exit_code(), 0);
}

#[rstest]
fn failing_step_fails_the_session(logs_parent: LogsParent) {
    let mut tracker = session(&logs_parent);
    run(
        &mut tracker,
        "NewGame.test_odd_boards",
        vec![
            StepResult::failed(
                "i_request_a_new_game_with_boards",
                vec!["9".to_owned()],
                "AssertionError",
            ),
            ok("i_get_a_400_response_saying_it_must_be_even"),
        ],
    );
    run(&mut tracker, "ClearBoard.test_start_board", vec![ok("even_boards")]);
    tracker
        .finish()
        .unwrap_or_else(|e| panic!("finish session: {e}"));

    assert_eq!(tracker.runs("NewGame.test_odd_boards").first().map(|recorded| recorded.steps.len()), Some(1));
    let status = check_pending_scenarios(&logs_parent.path)
        .unwrap_or_else(|e| panic!("check logs: {e}"));
    assert_eq!(status, CompletionStatus::Failed);
    assert_eq!(status.exit_code(), 1);
}

#[rstest]
fn unfinished_session_is_pending(logs_parent: LogsParent) {
    let mut tracker = session(&logs_parent);
    run(&mut tracker, "NewGame.test_odd_boards", vec![ok("i_request_a_new_game_with_boards")]);

    let completion = tracker
        .finish()
        .unwrap_or_else(|e| panic!("finish session: {e}"));

    assert_eq!(completion, None);
    assert_eq!(tracker.pending_scenarios(), vec!["ClearBoard.test_start_board"]);
    let log = HistoryLog::open(&logs_parent.path, 5)
        .and_then(|history| history.latest())
        .unwrap_or_else(|e| panic!("read log: {e}"))
        .unwrap_or_default();
    assert!(log.contains("Pending [ClearBoard.test_start_board]"));
    assert!(log.contains("1 ✅ NewGame.test_odd_boards:\n  1.1 - ✅ i_request_a_new_game_with_boards"));
    let status = check_pending_scenarios(&logs_parent.path)
        .unwrap_or_else(|e| panic!("check logs: {e}"));
    assert_eq!(status, CompletionStatus::Pending);
    assert_eq!(status.exit_code(), 3);
}

#[rstest]
fn missing_logs_are_an_error(logs_parent: LogsParent) {
    let error = check_pending_scenarios(&logs_parent.path)
        .err()
        .unwrap_or_else(|| panic!("no logs should be an error"));
    assert!(matches!(error, TrackerError::LogsNotFound { .. }), "got {error:?}");
    assert_eq!(error.exit_code(), 4);
}

#[rstest]
fn unknown_scenarios_are_rejected(logs_parent: LogsParent) {
    let mut tracker = session(&logs_parent);
    let error = tracker
        .record_run("MakeGuess.test_first_guess", vec![ok("i_guess")])
        .err()
        .unwrap_or_else(|| panic!("unregistered scenario should fail"));
    assert!(matches!(error, TrackerError::UnknownScenario { .. }), "got {error:?}");
}
