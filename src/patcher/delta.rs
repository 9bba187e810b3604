//! Differences between the recovered and the new specification.

use indexmap::{IndexMap, IndexSet};

use crate::emit::{indent, scenario_method};
use crate::source::ModulePieces;
use crate::spec::{ClassName, FeaturesSpecCollection, MethodName};

/// What a patch changes in the stories module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchDelta {
    /// Scenarios to delete, with the class currently declaring them.
    pub removed: IndexMap<MethodName, ClassName>,
    /// Scenarios to insert into classes that already exist, in the order
    /// the new specification declares them.
    pub added: IndexMap<ClassName, Vec<MethodName>>,
    /// Scenarios whose rendered method text changed, with their class.
    pub updated: IndexMap<MethodName, ClassName>,
    /// Classes to append.
    pub new_classes: Vec<ClassName>,
    /// Classes that declared scenarios and are no longer specified.
    pub empty_classes: Vec<ClassName>,
}

impl PatchDelta {
    /// Compares the recovered specification with the new one.
    ///
    /// A scenario that moves to another class is removed from the old class
    /// and added to the new one. A class is new when the stories module does
    /// not declare it yet.
    #[must_use]
    pub fn compute(
        old: &FeaturesSpecCollection,
        new: &FeaturesSpecCollection,
        stories: &ModulePieces,
    ) -> Self {
        let old_scenarios = old.scenario_classes();
        let new_scenarios = new.scenario_classes();

        let removed = old_scenarios
            .iter()
            .filter(|&(name, class_name)| new_scenarios.get(*name) != Some(class_name))
            .map(|(name, class_name)| ((*name).clone(), (*class_name).clone()))
            .collect();

        let new_classes: Vec<ClassName> = new
            .features()
            .keys()
            .filter(|class_name| stories.class(class_name.as_str()).is_none())
            .cloned()
            .collect();

        let mut added: IndexMap<ClassName, Vec<MethodName>> = IndexMap::new();
        let mut updated = IndexMap::new();
        for (class_name, feature) in new.features() {
            let Some(piece) = stories.class(class_name.as_str()) else {
                continue;
            };
            for (name, scenario) in &feature.scenarios {
                if old_scenarios.get(name) != Some(&class_name) {
                    added.entry(class_name.clone()).or_default().push(name.clone());
                    continue;
                }
                let rendered = indent(&scenario_method(scenario), 1);
                let current = piece.scenarios().get(name.as_str()).map(|found| found.method());
                if current != Some(rendered.as_str()) {
                    updated.insert(name.clone(), class_name.clone());
                }
            }
        }

        let empty_classes = old
            .features()
            .keys()
            .filter(|class_name| new.feature(class_name.as_str()).is_none())
            .cloned()
            .collect();

        Self {
            removed,
            added,
            updated,
            new_classes,
            empty_classes,
        }
    }

    /// Whether the scenario layout is unchanged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
            && self.added.is_empty()
            && self.updated.is_empty()
            && self.new_classes.is_empty()
            && self.empty_classes.is_empty()
    }

    /// Classes touched by scenario changes, in first-mention order.
    #[must_use]
    pub fn touched_classes(&self) -> IndexSet<&str> {
        self.removed
            .values()
            .chain(self.updated.values())
            .chain(self.added.keys())
            .chain(&self.new_classes)
            .chain(&self.empty_classes)
            .map(ClassName::as_str)
            .collect()
    }
}
