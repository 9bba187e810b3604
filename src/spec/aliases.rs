//! Step alias table.
//!
//! `aliases.yml` groups equivalent step sentences under one canonical
//! sentence. The table maps every alias step name to the canonical step
//! name; canonical steps are implemented once, on the shared base test case.

use indexmap::IndexMap;

use super::sentence::sentence_to_name;

/// Mapping from alias step names to canonical step names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    map: IndexMap<String, String>,
}

impl AliasTable {
    /// Builds a table from canonical sentences and their equivalent sentences.
    ///
    /// Both sides are normalised with [`sentence_to_name`].
    #[must_use]
    pub fn from_groups(groups: &IndexMap<String, Vec<String>>) -> Self {
        let map = groups
            .iter()
            .flat_map(|(canonical, sentences)| {
                let canonical_name = sentence_to_name(canonical);
                sentences
                    .iter()
                    .map(move |sentence| (sentence_to_name(sentence), canonical_name.clone()))
            })
            .collect();
        Self { map }
    }

    /// Builds a table from already normalised `(alias, canonical)` pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(alias, canonical)| (alias.into(), canonical.into()))
            .collect();
        Self { map }
    }

    /// Returns the canonical name for an alias step name.
    #[must_use]
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// Returns `true` when `name` is the canonical target of some alias.
    #[must_use]
    pub fn is_canonical(&self, name: &str) -> bool {
        self.map.values().any(|canonical| canonical == name)
    }

    /// Returns a table holding this table's entries overridden by `newer`.
    #[must_use]
    pub fn merged(&self, newer: &Self) -> Self {
        let mut map = self.map.clone();
        for (alias, canonical) in &newer.map {
            map.insert(alias.clone(), canonical.clone());
        }
        Self { map }
    }

    /// Returns the `(alias, canonical)` pairs sorted by alias name.
    #[must_use]
    pub fn sorted_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .map
            .iter()
            .map(|(alias, canonical)| (alias.as_str(), canonical.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Groups alias names under their canonical name, in insertion order.
    #[must_use]
    pub fn groups(&self) -> IndexMap<&str, Vec<&str>> {
        let mut groups: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for (alias, canonical) in &self.map {
            groups
                .entry(canonical.as_str())
                .or_default()
                .push(alias.as_str());
        }
        groups
    }

    /// Returns the number of alias entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` when the table holds no aliases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
