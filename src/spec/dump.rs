//! Rendering of a resolved specification back into YAML documents.
//!
//! The output is accepted by the loader and resolves to an equivalent
//! collection, which lets a specification directory be recovered from an
//! existing generated test package.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tracing::info;

use super::aliases::AliasTable;
use super::collection::FeaturesSpecCollection;
use super::error::SpecError;
use super::loader::{ALIASES_FILE, FEATURES_DIR};
use super::sentence::to_sentence;
use super::types::FeatureSpec;
use super::value::quote_yaml;

/// Renders one feature as a YAML document.
#[must_use]
pub fn render_feature_yaml(feature: &FeatureSpec) -> String {
    let mut yaml = String::new();
    yaml.push_str(&format!("Title: {}\n", quote_yaml(&feature.title)));
    yaml.push_str("Story: |-\n");
    for line in feature.doc_lines() {
        yaml.push_str(&format!("  {line}\n"));
    }
    if feature.scenarios.is_empty() {
        yaml.push_str("Scenarios: {}\n");
    } else {
        yaml.push_str("Scenarios:\n");
        for scenario in feature.scenarios.values() {
            yaml.push_str(&format!("  {}:\n", quote_yaml(&scenario.title)));
            for line in &scenario.doc_lines {
                yaml.push_str(&format!("    - {}\n", quote_yaml(line)));
            }
        }
    }
    for (name, value) in &feature.extra_class_attrs {
        yaml.push_str(&format!(
            "{}: {}\n",
            quote_yaml(&to_sentence(name)),
            value.to_yaml_flow()
        ));
    }
    yaml
}

/// Renders the alias table grouped by canonical sentence.
#[must_use]
pub fn render_aliases_yaml(aliases: &AliasTable) -> String {
    let groups = aliases.groups();
    if groups.is_empty() {
        return "{}\n".to_owned();
    }
    let mut yaml = String::new();
    for (canonical, names) in groups {
        yaml.push_str(&format!("{}:\n", quote_yaml(&to_sentence(canonical))));
        for name in names {
            yaml.push_str(&format!("  - {}\n", quote_yaml(&to_sentence(name))));
        }
    }
    yaml
}

/// File name for a feature document: the title in kebab case.
///
/// # Examples
///
///     use storyc::spec::dump::feature_file_name;
///
///     assert_eq!(feature_file_name("Clear board"), "clear-board.yml");
#[must_use]
pub fn feature_file_name(title: &str) -> String {
    let words: Vec<String> = title
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(char::is_ascii_alphanumeric)
                .flat_map(|c| c.to_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();
    format!("{}.yml", words.join("-"))
}

/// Writes a collection as a specification directory: `aliases.yml` and one
/// `features/<title>.yml` per feature.
///
/// # Errors
///
/// Returns [`SpecError::Io`] when the directory or a file cannot be
/// written.
pub fn write_specs_dir(spec: &FeaturesSpecCollection, path: &Utf8Path) -> Result<(), SpecError> {
    let io_error = |target: &Utf8Path, source: std::io::Error| SpecError::Io {
        path: target.to_string(),
        source,
    };
    Dir::create_ambient_dir_all(path, ambient_authority()).map_err(|source| io_error(path, source))?;
    let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(|source| io_error(path, source))?;

    dir.write(ALIASES_FILE, render_aliases_yaml(spec.aliases()))
        .map_err(|source| io_error(&path.join(ALIASES_FILE), source))?;

    let features_path = path.join(FEATURES_DIR);
    dir.create_dir_all(FEATURES_DIR)
        .map_err(|source| io_error(&features_path, source))?;
    for feature in spec.features().values() {
        let file_name = format!("{FEATURES_DIR}/{}", feature_file_name(&feature.title));
        dir.write(&file_name, render_feature_yaml(feature))
            .map_err(|source| io_error(&path.join(&file_name), source))?;
    }
    info!(path = %path, features = spec.features().len(), "wrote specification documents");
    Ok(())
}
