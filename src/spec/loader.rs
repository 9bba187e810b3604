//! Specification document loading.
//!
//! A specification directory holds an optional `aliases.yml` and a
//! `features/` directory of YAML files. Each feature file may contain one
//! document or several separated by `---`; files are read in file-name
//! order so that resolution is deterministic.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use indexmap::IndexMap;
use tracing::debug;

use super::aliases::AliasTable;
use super::diagnostic::{SpecDiagnostic, SpecDiagnosticCode};
use super::error::SpecError;
use super::types::FeatureDoc;
use super::validate::validate_feature_doc;

/// Synthetic source identifier used by [`load_feature_docs`].
const INLINE_SOURCE: &str = "<inline>";

/// Name of the alias table document inside a specification directory.
pub const ALIASES_FILE: &str = "aliases.yml";

/// Name of the feature document directory inside a specification directory.
pub const FEATURES_DIR: &str = "features";

/// Loads one or more feature documents from a YAML string.
///
/// # Errors
///
/// Returns [`SpecError::Deserialize`] if the YAML is malformed or does not
/// match the feature document shape, and [`SpecError::ValidationFailed`] if
/// a document has a blank title or story, or a scenario without steps.
///
/// # Examples
///
///     use storyc::spec::load_feature_docs;
///
///     let yaml = r#"
///     Title: New game
///     Story: As a codebreaker I want to start a new game
///     Scenarios:
///       Even boards:
///         - When I request a new `game` with "8" boards
///     "#;
///     let docs = load_feature_docs(yaml).unwrap();
///     assert_eq!(docs.len(), 1);
pub fn load_feature_docs(input: &str) -> Result<Vec<FeatureDoc>, SpecError> {
    load_feature_docs_with_source(INLINE_SOURCE, input)
}

/// Loads feature documents from YAML and records diagnostics against an
/// explicit source identifier.
///
/// # Errors
///
/// Returns [`SpecError::Deserialize`] when YAML parsing or deserialization
/// fails and [`SpecError::ValidationFailed`] when semantic validation fails.
pub fn load_feature_docs_with_source(
    source: &str,
    input: &str,
) -> Result<Vec<FeatureDoc>, SpecError> {
    let docs: Vec<FeatureDoc> =
        serde_saphyr::from_multiple(input).map_err(|error| {
            deserialize_error(SpecDiagnosticCode::FeatureParseFailure, source, &error)
        })?;
    for doc in &docs {
        validate_feature_doc(doc)?;
    }
    Ok(docs)
}

/// Loads an alias table document: canonical sentences mapped to lists of
/// equivalent sentences. A blank document yields an empty table.
///
/// # Errors
///
/// Returns [`SpecError::Deserialize`] when the document is not a mapping of
/// strings to string lists.
pub fn load_alias_table(source: &str, input: &str) -> Result<AliasTable, SpecError> {
    if input.trim().is_empty() {
        return Ok(AliasTable::default());
    }
    let groups: IndexMap<String, Vec<String>> =
        serde_saphyr::from_str(input).map_err(|error| {
            deserialize_error(SpecDiagnosticCode::AliasParseFailure, source, &error)
        })?;
    Ok(AliasTable::from_groups(&groups))
}

/// Reads the alias table and every feature document of a specification
/// directory.
///
/// # Errors
///
/// Returns [`SpecError::Io`] when the directory or a file cannot be read,
/// and any loading error of the individual documents.
pub fn load_specs_dir(path: &Utf8Path) -> Result<(AliasTable, Vec<FeatureDoc>), SpecError> {
    let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(|source| io_error(path, source))?;

    let aliases = if dir.is_file(ALIASES_FILE) {
        let text = dir
            .read_to_string(ALIASES_FILE)
            .map_err(|source| io_error(&path.join(ALIASES_FILE), source))?;
        load_alias_table(path.join(ALIASES_FILE).as_str(), &text)?
    } else {
        AliasTable::default()
    };

    let features_path = path.join(FEATURES_DIR);
    let features = dir
        .open_dir(FEATURES_DIR)
        .map_err(|source| io_error(&features_path, source))?;
    let mut file_names = Vec::new();
    for entry in features
        .entries()
        .map_err(|source| io_error(&features_path, source))?
    {
        let file_name = entry
            .and_then(|found| found.file_name())
            .map_err(|source| io_error(&features_path, source))?;
        if is_yaml_file(&file_name) {
            file_names.push(file_name);
        }
    }
    file_names.sort_unstable();

    let mut docs = Vec::new();
    for file_name in file_names {
        let file_path = features_path.join(&file_name);
        let text = features
            .read_to_string(&file_name)
            .map_err(|source| io_error(&file_path, source))?;
        let loaded = load_feature_docs_with_source(file_path.as_str(), &text)?;
        debug!(file = %file_path, documents = loaded.len(), "loaded feature file");
        docs.extend(loaded);
    }

    Ok((aliases, docs))
}

fn is_yaml_file(file_name: &str) -> bool {
    Utf8Path::new(file_name)
        .extension()
        .is_some_and(|extension| extension == "yml" || extension == "yaml")
}

fn io_error(path: &Utf8Path, source: std::io::Error) -> SpecError {
    SpecError::Io {
        path: path.to_string(),
        source,
    }
}

fn deserialize_error(
    code: SpecDiagnosticCode,
    source: &str,
    error: &serde_saphyr::Error,
) -> SpecError {
    SpecError::Deserialize {
        message: error.to_string(),
        diagnostic: SpecDiagnostic::from_yaml_error(code, source, error),
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
