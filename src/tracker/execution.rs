//! Scenario run bookkeeping.

use std::fmt;

use chrono::Utc;
use indexmap::IndexMap;
use tracing::{info, warn};

use super::error::TrackerError;
use super::history::HistoryLog;

/// Symbol of a passed step or scenario.
pub const OK: &str = "✅";

/// Symbol of a failed step or scenario.
pub const FAIL: &str = "❌";

/// First words of the completion line.
pub const COMPLETION_MESSAGE: &str = "All scenarios ran";

/// The outcome of one executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// Step method name.
    pub name: String,
    /// Inputs passed to the step.
    pub inputs: Vec<String>,
    /// Whether the step succeeded.
    pub passed: bool,
    /// Returned outputs or the failure message.
    pub detail: String,
}

impl StepResult {
    /// A successful step.
    #[must_use]
    pub fn passed(name: impl Into<String>, inputs: Vec<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs,
            passed: true,
            detail: detail.into(),
        }
    }

    /// A failed step.
    #[must_use]
    pub fn failed(name: impl Into<String>, inputs: Vec<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs,
            passed: false,
            detail: detail.into(),
        }
    }

    const fn symbol(&self) -> &'static str {
        if self.passed { OK } else { FAIL }
    }
}

/// One recorded run of a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRun {
    /// Global run number, starting at 1.
    pub number: usize,
    /// Steps executed, up to and including the first failure.
    pub steps: Vec<StepResult>,
}

impl ScenarioRun {
    /// Whether every executed step passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|step| step.passed)
    }
}

/// The state of a scenario after its latest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioStatus {
    /// Not run yet.
    Pending,
    /// Latest run passed.
    Passed,
    /// Latest run failed.
    Failed,
}

/// Records scenario runs and reports completion.
///
/// Scenarios are registered up front; a session is complete when every
/// registered scenario has run at least once.
#[derive(Debug, Default)]
pub struct ExecutionTracker {
    scenarios: IndexMap<String, Vec<ScenarioRun>>,
    run_number: usize,
    history: Option<HistoryLog>,
}

impl ExecutionTracker {
    /// A tracker without history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker writing every run to `history`, starting with a session
    /// note.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Io`] when the note cannot be written.
    pub fn with_history(history: HistoryLog) -> Result<Self, TrackerError> {
        let note = format!(
            "{} Steps prepared to run {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S%.6f"),
            history.path()
        );
        history.append(&format!("{}\n{note}", "_".repeat(note.chars().count())))?;
        Ok(Self {
            history: Some(history),
            ..Self::default()
        })
    }

    /// Registers a scenario as `Class.method`; registering twice keeps the
    /// recorded runs.
    pub fn register_scenario(&mut self, class_name: &str, method_name: &str) {
        self.scenarios
            .entry(format!("{class_name}.{method_name}"))
            .or_default();
    }

    /// Records a run. Steps after the first failure are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::UnknownScenario`] for an unregistered
    /// scenario and [`TrackerError::Io`] when the history cannot be written.
    pub fn record_run(
        &mut self,
        qualname: &str,
        mut steps: Vec<StepResult>,
    ) -> Result<&ScenarioRun, TrackerError> {
        if !self.scenarios.contains_key(qualname) {
            return Err(TrackerError::UnknownScenario {
                qualname: qualname.to_owned(),
            });
        }
        let executed = steps
            .iter()
            .position(|step| !step.passed)
            .map_or(steps.len(), |index| index.saturating_add(1));
        steps.truncate(executed);

        self.run_number = self.run_number.saturating_add(1);
        let run = ScenarioRun {
            number: self.run_number,
            steps,
        };
        if let Some(history) = &self.history {
            history.append(&render_run(qualname, &run))?;
        }
        if !run.passed() {
            warn!(scenario = qualname, run = run.number, "scenario failed");
        }

        let runs = self.scenarios.entry(qualname.to_owned()).or_default();
        runs.push(run);
        runs.last().ok_or_else(|| TrackerError::UnknownScenario {
            qualname: qualname.to_owned(),
        })
    }

    /// The status of one scenario; unknown scenarios are pending.
    #[must_use]
    pub fn status(&self, qualname: &str) -> ScenarioStatus {
        match self.scenarios.get(qualname).and_then(|runs| runs.last()) {
            None => ScenarioStatus::Pending,
            Some(run) if run.passed() => ScenarioStatus::Passed,
            Some(_) => ScenarioStatus::Failed,
        }
    }

    /// Runs of a scenario, oldest first.
    #[must_use]
    pub fn runs(&self, qualname: &str) -> &[ScenarioRun] {
        self.scenarios
            .get(qualname)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn count(&self, status: ScenarioStatus) -> usize {
        self.scenarios
            .keys()
            .filter(|qualname| self.status(qualname) == status)
            .count()
    }

    /// Number of scenarios whose latest run passed.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Number of scenarios whose latest run failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Scenarios that have not run, in registration order.
    #[must_use]
    pub fn pending_scenarios(&self) -> Vec<&str> {
        self.scenarios
            .iter()
            .filter(|(_, runs)| runs.is_empty())
            .map(|(qualname, _)| qualname.as_str())
            .collect()
    }

    /// The completion line, or `None` while scenarios are pending.
    #[must_use]
    pub fn completion_line(&self) -> Option<String> {
        if !self.pending_scenarios().is_empty() {
            return None;
        }
        let mut line = COMPLETION_MESSAGE.to_owned();
        let passed = self.passed();
        let failed = self.failed();
        if passed > 0 {
            line.push_str(&format!(" ▌ {passed} {OK}"));
        }
        if failed > 0 {
            line.push_str(&format!(" ▌ {failed} {FAIL}"));
        }
        Some(line)
    }

    /// Writes the session summary, plus the completion line when nothing is
    /// pending, to the history.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Io`] when the history cannot be written.
    pub fn finish(&self) -> Result<Option<String>, TrackerError> {
        let completion = self.completion_line();
        let mut text = self.to_string();
        if let Some(line) = &completion {
            text.push_str("\n\n");
            text.push_str(line);
        }
        if let Some(history) = &self.history {
            history.append(&text)?;
        }
        info!(
            passed = self.passed(),
            failed = self.failed(),
            pending = self.pending_scenarios().len(),
            "finished scenario session"
        );
        Ok(completion)
    }
}

impl fmt::Display for ExecutionTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scenario runs")?;
        for (qualname, runs) in &self.scenarios {
            let numbers: Vec<String> = runs
                .iter()
                .map(|run| format!("{}{}", run.number, if run.passed() { OK } else { FAIL }))
                .collect();
            if !numbers.is_empty() {
                writeln!(f, "  {qualname}: {}", numbers.join(" "))?;
            }
        }
        write!(f, "Pending [{}]", self.pending_scenarios().join(", "))
    }
}

fn render_run(qualname: &str, run: &ScenarioRun) -> String {
    let symbol = if run.passed() { OK } else { FAIL };
    let mut text = format!("{} {symbol} {qualname}:", run.number);
    for (index, step) in run.steps.iter().enumerate() {
        text.push_str(&format!(
            "\n  {}.{} - {} {} {:?} |--> {}",
            run.number,
            index.saturating_add(1),
            step.symbol(),
            step.name,
            step.inputs,
            step.detail
        ));
    }
    text
}
