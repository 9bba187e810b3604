//! The resolved specification of a whole test package.

use camino::Utf8Path;
use indexmap::{IndexMap, IndexSet};

use super::aliases::AliasTable;
use super::builder;
use super::error::SpecError;
use super::loader::load_specs_dir;
use super::newtypes::{ClassName, MethodName};
use super::types::{FeatureDoc, FeatureSpec};

/// All features of a specification, resolved into a class hierarchy.
///
/// Features are kept in topological order: every class follows its bases.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturesSpecCollection {
    features: IndexMap<ClassName, FeatureSpec>,
    aliases: AliasTable,
    base_methods: IndexSet<MethodName>,
}

impl FeaturesSpecCollection {
    pub(crate) const fn new(
        features: IndexMap<ClassName, FeatureSpec>,
        aliases: AliasTable,
        base_methods: IndexSet<MethodName>,
    ) -> Self {
        Self {
            features,
            aliases,
            base_methods,
        }
    }

    /// Loads and resolves a specification directory.
    ///
    /// # Errors
    ///
    /// Returns any [`SpecError`] raised while reading documents or resolving
    /// the hierarchy.
    pub fn from_specs_dir(path: &Utf8Path) -> Result<Self, SpecError> {
        let (aliases, docs) = load_specs_dir(path)?;
        Self::from_documents(aliases, &docs)
    }

    /// Resolves already loaded documents.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Conflicts`] for duplicate titles or repeated
    /// scenario names, [`SpecError::CyclicalInheritance`] for step cycles,
    /// and sentence or identifier errors from step parsing.
    pub fn from_documents(aliases: AliasTable, docs: &[FeatureDoc]) -> Result<Self, SpecError> {
        builder::resolve(aliases, docs)
    }

    /// Features keyed by class name, bases first.
    #[must_use]
    pub const fn features(&self) -> &IndexMap<ClassName, FeatureSpec> {
        &self.features
    }

    /// Looks up a feature by class name.
    #[must_use]
    pub fn feature(&self, class_name: &str) -> Option<&FeatureSpec> {
        self.features.get(class_name)
    }

    /// The alias table the steps were resolved against.
    #[must_use]
    pub const fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Canonical alias steps, implemented on the shared base test case.
    #[must_use]
    pub const fn base_methods(&self) -> &IndexSet<MethodName> {
        &self.base_methods
    }

    /// Every class with its minimal set of direct bases, in topological
    /// order.
    #[must_use]
    pub fn class_bases(&self) -> Vec<(&ClassName, IndexSet<&ClassName>)> {
        self.features
            .values()
            .map(|feature| (&feature.class_name, feature.bases.iter().collect()))
            .collect()
    }

    /// Maps every scenario name to the class declaring it.
    #[must_use]
    pub fn scenario_classes(&self) -> IndexMap<&MethodName, &ClassName> {
        self.features
            .values()
            .flat_map(|feature| {
                feature
                    .scenarios
                    .keys()
                    .map(move |name| (name, &feature.class_name))
            })
            .collect()
    }

    /// Returns every transitive base of `class_name`, depth first in
    /// declaration order.
    #[must_use]
    pub fn ancestors(&self, class_name: &str) -> IndexSet<&ClassName> {
        let mut found = IndexSet::new();
        let mut pending: Vec<&ClassName> = self
            .feature(class_name)
            .map(|feature| feature.bases.iter().collect())
            .unwrap_or_default();
        pending.reverse();
        while let Some(next) = pending.pop() {
            if found.insert(next) {
                if let Some(feature) = self.features.get(next) {
                    pending.extend(feature.bases.iter().rev());
                }
            }
        }
        found
    }
}
