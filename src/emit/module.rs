//! Rendering of the generated package modules.

use crate::spec::{AliasTable, FeaturesSpecCollection, quote_single};

use super::class::{base_method_stub, render_feature_class};
use super::text::{indent, make_class, normalize};

/// Name of the base-class module, without extension.
pub const BASE_MODULE: &str = "base";

/// Name of the alias map module, without extension.
pub const ALIASES_MODULE: &str = "aliases";

/// Class of `base.py` holding the canonical alias steps.
pub const BASE_TEST_CASE_CLASS: &str = "BaseTestCase";

/// Renders the stories module: one class per feature, bases first.
#[must_use]
pub fn render_stories_module(spec: &FeaturesSpecCollection) -> String {
    let mut pieces = vec!["from . import base".to_owned()];
    pieces.extend(spec.features().values().map(render_feature_class));
    normalize(&pieces.join("\n\n\n"))
}

/// Renders `base.py`: the step decorators, the `BddTester` root class and
/// `BaseTestCase` with a stub per canonical alias step.
///
/// `base_class` is an optional dotted path to an extra test-case class (for
/// example `django.test.TestCase`) mixed into `BaseTestCase`.
#[must_use]
pub fn render_base_module(
    spec: &FeaturesSpecCollection,
    base_class: Option<&str>,
    logs_parent: &str,
) -> String {
    let mut imports = Vec::new();
    let mut test_case_bases = vec!["tester.BaseTestCase".to_owned()];
    if let Some((module, class)) = base_class.and_then(|path| path.rsplit_once('.')) {
        imports.push(format!("from {module} import {class}\n"));
        test_case_bases.push(class.to_owned());
    }
    imports.push(
        [
            "from bdd_coder.tester import decorators",
            "from bdd_coder.tester import tester",
            "",
            "from . import aliases",
        ]
        .join("\n"),
    );

    let setup = format!(
        "steps = decorators.Steps(aliases.MAP, {})\nscenario = decorators.Scenario(steps)",
        quote_single(logs_parent)
    );
    let bdd_tester = format!(
        "@steps\n{}",
        make_class("BddTester", &["tester.BddTester".to_owned()], "", &[])
    );
    let base_methods: Vec<String> = spec.base_methods().iter().map(base_method_stub).collect();
    let base_test_case = make_class(BASE_TEST_CASE_CLASS, &test_case_bases, "", &base_methods);

    normalize(&format!(
        "{}\n\n{setup}\n\n\n{bdd_tester}\n\n\n{base_test_case}",
        imports.join("\n")
    ))
}

/// Renders `aliases.py`: the alias map sorted by alias name.
#[must_use]
pub fn render_aliases_module(aliases: &AliasTable) -> String {
    if aliases.is_empty() {
        return "MAP = {}\n".to_owned();
    }
    let entries: Vec<String> = aliases
        .sorted_pairs()
        .into_iter()
        .map(|(alias, canonical)| format!("{}: {},", quote_single(alias), quote_single(canonical)))
        .collect();
    format!("MAP = {{\n{}\n}}\n", indent(&entries.join("\n"), 1))
}
