//! Specification data model.
//!
//! [`FeatureDoc`] is the document shape read from `features/*.yml`;
//! [`FeatureSpec`], [`ScenarioSpec`] and [`StepSpec`] are the resolved
//! model produced by hierarchy resolution.

use indexmap::IndexMap;
use serde::Deserialize;

use super::newtypes::{ClassName, MethodName};
use super::value::SpecValue;

// ── Documents ───────────────────────────────────────────────────────

/// One feature document as written in a `features/*.yml` file.
///
/// Keys other than `Title`, `Story` and `Scenarios` are collected into
/// [`FeatureDoc::extra`] and become class attributes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureDoc {
    /// Feature title; the class name derives from it.
    #[serde(rename = "Title", alias = "title")]
    pub title: String,
    /// User-story narrative, rendered as the class docstring.
    #[serde(rename = "Story", alias = "story")]
    pub story: String,
    /// Scenario titles mapped to their ordered step lines.
    #[serde(rename = "Scenarios", alias = "scenarios")]
    pub scenarios: IndexMap<String, Vec<String>>,
    /// Auxiliary keys, in document order.
    #[serde(flatten)]
    pub extra: IndexMap<String, SpecValue>,
}

// ── Resolved model ──────────────────────────────────────────────────

/// A parsed step line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSpec {
    /// The step line as written, keyword included.
    pub raw_text: String,
    /// Canonical method name, after alias substitution.
    pub name: MethodName,
    /// Double-quoted literal inputs, left to right.
    pub inputs: Vec<String>,
    /// Backtick-quoted output names, left to right.
    pub output_names: Vec<String>,
    /// Whether the declaring class needs a generated stub for this step.
    pub own: bool,
}

/// A scenario of a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSpec {
    /// Method name derived from the title.
    pub name: MethodName,
    /// Scenario title as written.
    pub title: String,
    /// Step lines as written, rendered as the method docstring.
    pub doc_lines: Vec<String>,
    /// Parsed steps.
    pub steps: Vec<StepSpec>,
    /// Whether another scenario calls this one as a step.
    pub inherited: bool,
}

impl ScenarioSpec {
    /// Returns the generated method name: `test_`-prefixed unless the
    /// scenario is inherited.
    #[must_use]
    pub fn method_name(&self) -> String {
        if self.inherited {
            self.name.to_string()
        } else {
            format!("test_{}", self.name)
        }
    }
}

/// A feature, generated as one Python class.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpec {
    /// Generated class name.
    pub class_name: ClassName,
    /// Feature title as written.
    pub title: String,
    /// User-story narrative.
    pub doc: String,
    /// Minimal direct base classes, in declaration order.
    pub bases: Vec<ClassName>,
    /// Whether other classes inherit this one to reuse its scenarios.
    pub inherited: bool,
    /// Scenarios keyed by name, in declaration order.
    pub scenarios: IndexMap<MethodName, ScenarioSpec>,
    /// Extra class attributes, keyed by normalised name.
    pub extra_class_attrs: IndexMap<String, SpecValue>,
}

impl FeatureSpec {
    /// Returns the steps that need a stub on this class, deduplicated by
    /// name in first-encounter order.
    #[must_use]
    pub fn own_steps(&self) -> Vec<&StepSpec> {
        let mut seen = IndexMap::new();
        for step in self.scenarios.values().flat_map(|scenario| &scenario.steps) {
            if step.own {
                seen.entry(step.name.as_str()).or_insert(step);
            }
        }
        seen.into_values().collect()
    }

    /// Returns the story as trimmed docstring lines.
    #[must_use]
    pub fn doc_lines(&self) -> Vec<String> {
        strip_lines(self.doc.lines())
    }
}

/// Trims every line and drops empty ones.
pub(crate) fn strip_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    lines
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
