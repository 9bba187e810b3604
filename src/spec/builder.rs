//! Inheritance resolution for feature specifications.
//!
//! A step whose name equals a scenario name reuses that scenario: the
//! scenario's class becomes a base of the calling class. Resolution runs in
//! this order: shared-step and alias detection, cycle detection with a
//! stable topological sort, redundant-base elimination, and finally the
//! removal of stubs that an ancestor already provides.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use super::aliases::AliasTable;
use super::collection::FeaturesSpecCollection;
use super::error::SpecError;
use super::newtypes::{ClassName, MethodName};
use super::sentence::{parse_step, sentence_to_name, title_to_class_name};
use super::types::{FeatureDoc, FeatureSpec, ScenarioSpec, strip_lines};

type Features = IndexMap<ClassName, FeatureSpec>;

/// Builds the resolved collection from an alias table and feature documents.
pub(crate) fn resolve(
    aliases: AliasTable,
    docs: &[FeatureDoc],
) -> Result<FeaturesSpecCollection, SpecError> {
    let parsed = parse_features(&aliases, docs)?;
    let (mut features, base_methods) = mark_shared_steps(parsed, &aliases);
    features = sort_topologically(features)?;
    let ancestors = collect_ancestors(&features);
    drop_redundant_bases(&mut features, &ancestors);
    drop_inherited_stubs(&mut features, &ancestors);

    debug!(
        features = features.len(),
        base_methods = base_methods.len(),
        "resolved feature hierarchy"
    );
    Ok(FeaturesSpecCollection::new(features, aliases, base_methods))
}

// ── Parsing ─────────────────────────────────────────────────────────

fn parse_features(aliases: &AliasTable, docs: &[FeatureDoc]) -> Result<Features, SpecError> {
    let mut features = Features::new();
    let mut duplicate_titles = Vec::new();
    let mut scenario_classes: IndexMap<String, Vec<String>> = IndexMap::new();

    for doc in docs {
        let feature = parse_feature(aliases, doc)?;
        for name in doc.scenarios.keys().map(|title| sentence_to_name(title)) {
            scenario_classes
                .entry(name)
                .or_default()
                .push(feature.class_name.to_string());
        }
        if features.contains_key(&feature.class_name) {
            duplicate_titles.push(feature.class_name.to_string());
        } else {
            features.insert(feature.class_name.clone(), feature);
        }
    }

    scenario_classes.retain(|_, classes| classes.len() > 1);
    if !duplicate_titles.is_empty() || !scenario_classes.is_empty() {
        return Err(SpecError::Conflicts {
            duplicate_titles,
            repeated_scenarios: scenario_classes,
        });
    }
    Ok(features)
}

fn parse_feature(aliases: &AliasTable, doc: &FeatureDoc) -> Result<FeatureSpec, SpecError> {
    let class_name = ClassName::new(title_to_class_name(&doc.title))?;

    let mut scenarios = IndexMap::with_capacity(doc.scenarios.len());
    for (title, lines) in &doc.scenarios {
        let name = MethodName::new(sentence_to_name(title))?;
        let doc_lines = strip_lines(lines.iter().map(String::as_str));
        let steps = doc_lines
            .iter()
            .map(|line| parse_step(line, aliases))
            .collect::<Result<Vec<_>, _>>()?;
        scenarios.insert(
            name.clone(),
            ScenarioSpec {
                name,
                title: title.trim().to_owned(),
                doc_lines,
                steps,
                inherited: false,
            },
        );
    }

    let mut extra_class_attrs = IndexMap::with_capacity(doc.extra.len());
    for (key, value) in &doc.extra {
        let attr = MethodName::new(sentence_to_name(key))?;
        extra_class_attrs.insert(attr.to_string(), value.clone());
    }

    Ok(FeatureSpec {
        class_name,
        title: doc.title.trim().to_owned(),
        doc: doc.story.trim().to_owned(),
        bases: Vec::new(),
        inherited: false,
        scenarios,
        extra_class_attrs,
    })
}

// ── Shared steps and aliases ────────────────────────────────────────

fn mark_shared_steps(
    mut features: Features,
    aliases: &AliasTable,
) -> (Features, IndexSet<MethodName>) {
    let owners: IndexMap<MethodName, ClassName> = features
        .values()
        .flat_map(|feature| {
            feature
                .scenarios
                .keys()
                .map(|name| (name.clone(), feature.class_name.clone()))
        })
        .collect();

    let mut reused = Vec::new();
    let mut base_methods = IndexSet::new();
    for feature in features.values_mut() {
        for scenario in feature.scenarios.values_mut() {
            for step in &mut scenario.steps {
                let shared = owners
                    .get(&step.name)
                    .filter(|owner| **owner != feature.class_name);
                if let Some(owner) = shared {
                    step.own = false;
                    reused.push((owner.clone(), step.name.clone()));
                    if !feature.bases.contains(owner) {
                        feature.bases.push(owner.clone());
                    }
                } else if aliases.is_canonical(step.name.as_str()) {
                    step.own = false;
                    base_methods.insert(step.name.clone());
                } else {
                    step.own = true;
                }
            }
        }
    }

    let bases: IndexSet<ClassName> = features
        .values()
        .flat_map(|feature| feature.bases.iter().cloned())
        .collect();
    for base in &bases {
        if let Some(feature) = features.get_mut(base) {
            feature.inherited = true;
        }
    }
    for (owner, scenario_name) in reused {
        if let Some(scenario) = features
            .get_mut(&owner)
            .and_then(|feature| feature.scenarios.get_mut(&scenario_name))
        {
            scenario.inherited = true;
        }
    }

    (features, base_methods)
}

// ── Ordering and cycles ─────────────────────────────────────────────

/// Orders features so that every class follows its bases, keeping
/// declaration order among independent classes.
fn sort_topologically(mut features: Features) -> Result<Features, SpecError> {
    let mut ordered = Features::with_capacity(features.len());
    while !features.is_empty() {
        let ready = features.values().position(|feature| {
            feature
                .bases
                .iter()
                .all(|base| ordered.contains_key(base))
        });
        let Some((name, feature)) = ready.and_then(|position| features.shift_remove_index(position))
        else {
            return Err(shortest_cycle_error(&features));
        };
        ordered.insert(name, feature);
    }
    Ok(ordered)
}

/// Finds the shortest base cycle among the unsorted features and names two
/// classes on it.
fn shortest_cycle_error(features: &Features) -> SpecError {
    let mut best: Option<(usize, &ClassName, &ClassName)> = None;
    for start in features.keys() {
        let Some((length, closing)) = cycle_through(features, start) else {
            continue;
        };
        if best.is_none_or(|(best_length, _, _)| length < best_length) {
            best = Some((length, start, closing));
        }
    }

    let (first, second) = best.map_or_else(
        || {
            let mut names = features.keys();
            (names.next(), names.next())
        },
        |(_, start, closing)| {
            if start <= closing {
                (Some(start), Some(closing))
            } else {
                (Some(closing), Some(start))
            }
        },
    );
    SpecError::CyclicalInheritance {
        first: first.map(ToString::to_string).unwrap_or_default(),
        second: second.map(ToString::to_string).unwrap_or_default(),
    }
}

/// Breadth-first search along base edges back to `start`; returns the cycle
/// length and the class whose base closes the cycle.
fn cycle_through<'a>(features: &'a Features, start: &ClassName) -> Option<(usize, &'a ClassName)> {
    let mut visited = IndexSet::new();
    let mut queue = VecDeque::new();
    queue.push_back((features.get_key_value(start)?.0, 1_usize));
    while let Some((current, depth)) = queue.pop_front() {
        let Some(feature) = features.get(current) else {
            continue;
        };
        for base in &feature.bases {
            if base == start {
                return Some((depth, current));
            }
            if let Some((key, _)) = features.get_key_value(base) {
                if visited.insert(key) {
                    queue.push_back((key, depth + 1));
                }
            }
        }
    }
    None
}

// ── Minimal bases ───────────────────────────────────────────────────

/// Transitive bases of every class, computed in topological order.
fn collect_ancestors(features: &Features) -> IndexMap<ClassName, IndexSet<ClassName>> {
    let mut ancestors: IndexMap<ClassName, IndexSet<ClassName>> = IndexMap::new();
    for feature in features.values() {
        let mut closure = IndexSet::new();
        for base in &feature.bases {
            closure.insert(base.clone());
            if let Some(inherited) = ancestors.get(base) {
                closure.extend(inherited.iter().cloned());
            }
        }
        ancestors.insert(feature.class_name.clone(), closure);
    }
    ancestors
}

fn drop_redundant_bases(
    features: &mut Features,
    ancestors: &IndexMap<ClassName, IndexSet<ClassName>>,
) {
    for feature in features.values_mut() {
        let direct = feature.bases.clone();
        feature.bases.retain(|base| {
            !direct.iter().any(|other| {
                other != base
                    && ancestors
                        .get(other)
                        .is_some_and(|reachable| reachable.contains(base))
            })
        });
    }
}

/// Marks own steps as not own when an ancestor already generates the stub.
fn drop_inherited_stubs(
    features: &mut Features,
    ancestors: &IndexMap<ClassName, IndexSet<ClassName>>,
) {
    let stubs: IndexMap<ClassName, IndexSet<MethodName>> = features
        .values()
        .map(|feature| {
            let names = feature
                .own_steps()
                .into_iter()
                .map(|step| step.name.clone())
                .collect();
            (feature.class_name.clone(), names)
        })
        .collect();

    for feature in features.values_mut() {
        let Some(class_ancestors) = ancestors.get(&feature.class_name) else {
            continue;
        };
        let provided: IndexSet<&MethodName> = class_ancestors
            .iter()
            .filter_map(|ancestor| stubs.get(ancestor))
            .flatten()
            .collect();
        for step in feature
            .scenarios
            .values_mut()
            .flat_map(|scenario| scenario.steps.iter_mut())
        {
            if step.own && provided.contains(&step.name) {
                step.own = false;
            }
        }
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
