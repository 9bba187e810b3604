//! Ordered mutations applied to the split modules.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::coder::CoderError;
use crate::emit::{
    BASE_TEST_CASE_CLASS, BDD_TESTER, base_method_stub, class_bases, indent,
    render_feature_class, scenario_method, step_stub,
};
use crate::source::{ClassPiece, ModulePieces, ScenarioPiece, SourceError};
use crate::spec::{FeaturesSpecCollection, ScenarioSpec};

use super::delta::PatchDelta;

fn class_mut<'a>(module: &'a mut ModulePieces, name: &str) -> Result<&'a mut ClassPiece, CoderError> {
    let file = module.file().to_owned();
    module.class_mut(name).ok_or_else(|| {
        SourceError::structure(&file, format!("class {name} is not declared"), "").into()
    })
}

fn scenario_piece(scenario: &ScenarioSpec) -> ScenarioPiece {
    ScenarioPiece::new(indent(&scenario_method(scenario), 1), !scenario.inherited)
}

fn method_block(methods: &[String]) -> String {
    indent(&methods.join("\n\n"), 1)
}

pub(super) fn remove_scenarios(
    stories: &mut ModulePieces,
    delta: &PatchDelta,
) -> Result<(), CoderError> {
    for (name, class_name) in &delta.removed {
        class_mut(stories, class_name.as_str())?.remove_scenario(name.as_str());
        debug!(class = %class_name, scenario = %name, "removed scenario");
    }
    Ok(())
}

pub(super) fn update_scenarios(
    stories: &mut ModulePieces,
    spec: &FeaturesSpecCollection,
    delta: &PatchDelta,
) -> Result<(), CoderError> {
    for (name, class_name) in &delta.updated {
        let Some(scenario) = spec
            .feature(class_name.as_str())
            .and_then(|feature| feature.scenarios.get(name))
        else {
            continue;
        };
        let piece = scenario_piece(scenario);
        class_mut(stories, class_name.as_str())?.replace_scenario_method(
            name.as_str(),
            piece.method().to_owned(),
            piece.is_test(),
        );
        debug!(class = %class_name, scenario = %name, "updated scenario");
    }
    Ok(())
}

pub(super) fn add_scenarios(
    stories: &mut ModulePieces,
    spec: &FeaturesSpecCollection,
    delta: &PatchDelta,
) -> Result<(), CoderError> {
    for (class_name, names) in &delta.added {
        let Some(feature) = spec.feature(class_name.as_str()) else {
            continue;
        };
        let pieces: Vec<(String, ScenarioPiece)> = names
            .iter()
            .filter_map(|name| feature.scenarios.get(name))
            .map(|scenario| (scenario.name.to_string(), scenario_piece(scenario)))
            .collect();
        debug!(class = %class_name, scenarios = pieces.len(), "added scenarios");
        class_mut(stories, class_name.as_str())?.insert_scenarios_after_head(pieces);
    }
    Ok(())
}

pub(super) fn add_new_classes(
    stories: &mut ModulePieces,
    spec: &FeaturesSpecCollection,
    delta: &PatchDelta,
) -> Result<(), CoderError> {
    for class_name in &delta.new_classes {
        let Some(feature) = spec.feature(class_name.as_str()) else {
            continue;
        };
        let piece = ClassPiece::parse(stories.file(), &render_feature_class(feature))?;
        stories.push_class(piece)?;
        debug!(class = %class_name, "added class");
    }
    Ok(())
}

/// Rewrites every specified class with its current bases, in topological
/// order, and demotes classes that left the specification.
pub(super) fn sort_hierarchy(
    stories: &mut ModulePieces,
    spec: &FeaturesSpecCollection,
    delta: &PatchDelta,
) -> Result<(), CoderError> {
    for (class_name, feature) in spec.features() {
        class_mut(stories, class_name.as_str())?.set_bases(&class_bases(feature));
        stories.move_to_end(class_name.as_str());
    }
    for class_name in &delta.empty_classes {
        class_mut(stories, class_name.as_str())?.set_bases(&[BDD_TESTER.to_owned()]);
        debug!(class = %class_name, "demoted class");
    }
    Ok(())
}

/// Appends stubs for own steps that neither the class, its ancestors nor
/// `BaseTestCase` define. Returns the added step names per class.
pub(super) fn add_new_steps(
    stories: &mut ModulePieces,
    base: &ModulePieces,
    spec: &FeaturesSpecCollection,
    delta: &PatchDelta,
) -> Result<IndexMap<String, Vec<String>>, CoderError> {
    let shared: IndexSet<String> = base
        .class(BASE_TEST_CASE_CLASS)
        .map(ClassPiece::defined_methods)
        .unwrap_or_default();
    let mut added = IndexMap::new();

    for (class_name, feature) in spec.features() {
        if delta.new_classes.contains(class_name) {
            continue;
        }
        let mut defined = shared.clone();
        for owner in std::iter::once(class_name).chain(spec.ancestors(class_name.as_str())) {
            if let Some(piece) = stories.class(owner.as_str()) {
                defined.extend(piece.defined_methods());
            }
        }
        let missing: Vec<_> = feature
            .own_steps()
            .into_iter()
            .filter(|step| !defined.contains(step.name.as_str()))
            .collect();
        if missing.is_empty() {
            continue;
        }
        let stubs: Vec<String> = missing.iter().map(|step| step_stub(step)).collect();
        class_mut(stories, class_name.as_str())?.append_methods(&method_block(&stubs));
        debug!(class = %class_name, steps = missing.len(), "added step stubs");
        added.insert(
            class_name.to_string(),
            missing.iter().map(|step| step.name.to_string()).collect(),
        );
    }
    Ok(added)
}

/// Appends stubs for canonical alias steps missing from `BaseTestCase`.
pub(super) fn add_base_methods(
    base: &mut ModulePieces,
    spec: &FeaturesSpecCollection,
) -> Result<Vec<String>, CoderError> {
    let test_case = class_mut(base, BASE_TEST_CASE_CLASS)?;
    let defined = test_case.defined_methods();
    let missing: Vec<_> = spec
        .base_methods()
        .iter()
        .filter(|name| !defined.contains(name.as_str()))
        .collect();
    if !missing.is_empty() {
        let stubs: Vec<String> = missing.iter().map(|name| base_method_stub(name)).collect();
        test_case.append_methods(&method_block(&stubs));
        debug!(methods = missing.len(), "added base methods");
    }
    Ok(missing.iter().map(ToString::to_string).collect())
}
