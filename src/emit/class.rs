//! Rendering of one feature as a Python test class.

use crate::spec::{FeatureSpec, MethodName, ScenarioSpec, StepSpec};

use super::text::{make_class, make_doc, make_method};

/// Decorator marking a scenario method for step-sequence execution.
pub const SCENARIO_DECORATOR: &str = "base.scenario";

/// Base of every class without feature bases.
pub const BDD_TESTER: &str = "base.BddTester";

/// Test-case mixin of every class that is not only a step supplier.
pub const BASE_TEST_CASE: &str = "base.BaseTestCase";

/// Returns the declared bases of a feature class.
#[must_use]
pub fn class_bases(feature: &FeatureSpec) -> Vec<String> {
    let mut bases: Vec<String> = if feature.bases.is_empty() {
        vec![BDD_TESTER.to_owned()]
    } else {
        feature.bases.iter().map(ToString::to_string).collect()
    };
    if !feature.inherited {
        bases.push(BASE_TEST_CASE.to_owned());
    }
    bases
}

/// Renders the class signature line, for example
/// `class ClearBoard(NewGame, base.BaseTestCase):`.
#[must_use]
pub fn class_signature(name: &str, bases: &[String]) -> String {
    format!("class {name}({}):", bases.join(", "))
}

/// Renders a scenario method: decorator, name and a docstring of step lines.
#[must_use]
pub fn scenario_method(scenario: &ScenarioSpec) -> String {
    make_method(
        &scenario.method_name(),
        &scenario.doc_lines,
        "",
        &[SCENARIO_DECORATOR],
        "",
    )
}

/// Renders the stub of a step: an arity check and placeholder outputs.
#[must_use]
pub fn step_stub(step: &StepSpec) -> String {
    let mut body = format!("assert len(args) == {}", step.inputs.len());
    if !step.output_names.is_empty() {
        let outputs: Vec<String> = step
            .output_names
            .iter()
            .map(|output| format!("'{output}',"))
            .collect();
        body.push_str(&format!("\n\nreturn {}", outputs.join(" ")));
    }
    make_method(step.name.as_str(), &[], ", *args", &[], &body)
}

/// Renders a canonical alias step on the shared base test case.
#[must_use]
pub fn base_method_stub(name: &MethodName) -> String {
    make_method(name.as_str(), &[], ", *args", &[], "pass")
}

/// Renders the docstring and attribute lines that follow a class signature.
#[must_use]
pub fn class_preamble(feature: &FeatureSpec) -> String {
    let mut lines = Vec::new();
    let doc = make_doc(&feature.doc_lines());
    if !doc.is_empty() {
        lines.push(doc);
    }
    for (name, value) in &feature.extra_class_attrs {
        lines.push(format!("{name} = {}", value.to_python()));
    }
    lines.join("\n")
}

/// Renders a feature class: signature, docstring, attributes, scenario
/// methods in declaration order and own-step stubs in first-use order.
#[must_use]
pub fn render_feature_class(feature: &FeatureSpec) -> String {
    let members: Vec<String> = feature
        .scenarios
        .values()
        .map(scenario_method)
        .chain(feature.own_steps().into_iter().map(step_stub))
        .collect();
    make_class(
        feature.class_name.as_str(),
        &class_bases(feature),
        &class_preamble(feature),
        &members,
    )
}
