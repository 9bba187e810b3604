//! Unit tests for specification document loading.

use rstest::*;

use super::*;
use crate::spec::SpecValue;

/// Minimal valid YAML for a feature document.
const MINIMAL_YAML: &str = r#"
Title: New game
Story: |
  As a codebreaker
  I want to start a new game
Scenarios:
  Even boards:
    - When I request a new `game` with "8" boards
    - Then a game is created
"#;

#[fixture]
fn minimal_doc() -> FeatureDoc {
    load_feature_docs(MINIMAL_YAML)
        .unwrap_or_else(|e| panic!("should parse: {e}"))
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("fixture should have one doc"))
}

#[rstest]
fn load_single_minimal_document(minimal_doc: FeatureDoc) {
    assert_eq!(minimal_doc.title, "New game");
    assert!(minimal_doc.story.starts_with("As a codebreaker"));
    assert_eq!(
        minimal_doc.scenarios.get("Even boards").map(Vec::len),
        Some(2)
    );
    assert!(minimal_doc.extra.is_empty());
}

#[rstest]
fn load_multi_document_file() {
    let yaml = format!("{MINIMAL_YAML}---\n{}", MINIMAL_YAML.replace("New game", "Clear board"));
    let docs = load_feature_docs(&yaml).unwrap_or_else(|e| panic!("should parse: {e}"));
    let titles: Vec<&str> = docs.iter().map(|doc| doc.title.as_str()).collect();
    assert_eq!(titles, vec!["New game", "Clear board"]);
}

#[rstest]
fn accepts_lowercase_keys() {
    let yaml = r"
title: Lowercase
story: Keys may be lowercase
scenarios:
  Only one:
    - Given something
";
    let docs = load_feature_docs(yaml).unwrap_or_else(|e| panic!("should parse: {e}"));
    assert_eq!(docs.first().map(|doc| doc.title.as_str()), Some("Lowercase"));
}

#[rstest]
fn collects_extra_keys_in_order() {
    let yaml = format!("{MINIMAL_YAML}Fixtures:\n  - player-alice\nRetries: 3\n");
    let docs = load_feature_docs(&yaml).unwrap_or_else(|e| panic!("should parse: {e}"));
    let extra = docs.first().map(|doc| doc.extra.clone()).unwrap_or_default();
    let keys: Vec<&str> = extra.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Fixtures", "Retries"]);
    assert_eq!(extra.get("Retries"), Some(&SpecValue::Integer(3)));
}

#[rstest]
#[case::missing_title("Story: x\nScenarios: {}\n", "YAML deserialization failed")]
#[case::scenarios_not_mapping(
    "Title: x\nStory: y\nScenarios: [a]\n",
    "YAML deserialization failed"
)]
#[case::null_extra("Title: x\nStory: y\nScenarios: {}\nFixtures: ~\n", "null values")]
#[case::blank_story("Title: x\nStory: '  '\nScenarios: {}\n", "Story must be non-empty")]
fn rejects_invalid_documents(#[case] yaml: &str, #[case] fragment: &str) {
    let msg = load_feature_docs(yaml)
        .err()
        .map(|e| e.to_string())
        .unwrap_or_default();
    assert!(msg.contains(fragment), "unexpected message: {msg}");
}

#[rstest]
fn parse_failures_carry_a_diagnostic() {
    let error = load_feature_docs_with_source("features/bad.yml", "Title: [unclosed\n")
        .err()
        .unwrap_or_else(|| panic!("malformed YAML should fail"));
    let rendered = error
        .diagnostic()
        .map(SpecDiagnostic::render)
        .unwrap_or_default();
    assert!(
        rendered.starts_with("spec.feature_parse_failure | features/bad.yml:"),
        "unexpected diagnostic: {rendered}"
    );
}

#[rstest]
#[case::empty("")]
#[case::whitespace("  \n")]
fn blank_alias_document_is_empty(#[case] yaml: &str) {
    let aliases = load_alias_table("aliases.yml", yaml).unwrap_or_else(|e| panic!("{e}"));
    assert!(aliases.is_empty());
}

#[rstest]
fn alias_parse_failures_name_the_alias_document() {
    let error = load_alias_table("specs/aliases.yml", "Record score: [unclosed\n")
        .err()
        .unwrap_or_else(|| panic!("malformed YAML should fail"));
    let code = error.diagnostic().map(|diagnostic| diagnostic.code);
    assert_eq!(code, Some(SpecDiagnosticCode::AliasParseFailure));
}

#[rstest]
fn loads_alias_groups() {
    let yaml = "Record score:\n  - Post score\n  - Save score\n";
    let aliases = load_alias_table("aliases.yml", yaml).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(aliases.canonical("save_score"), Some("record_score"));
}

#[rstest]
fn loads_specs_directory_in_file_name_order() {
    let temp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let root = camino::Utf8Path::from_path(temp.path())
        .unwrap_or_else(|| panic!("temp path should be UTF-8"))
        .to_owned();
    let features = root.join(FEATURES_DIR);
    std::fs::create_dir_all(&features).unwrap_or_else(|e| panic!("mkdir: {e}"));
    std::fs::write(
        features.join("b-second.yml"),
        MINIMAL_YAML.replace("New game", "Second").replace("Even", "Other"),
    )
    .unwrap_or_else(|e| panic!("write: {e}"));
    std::fs::write(features.join("a-first.yml"), MINIMAL_YAML)
        .unwrap_or_else(|e| panic!("write: {e}"));
    std::fs::write(features.join("notes.txt"), "ignored").unwrap_or_else(|e| panic!("write: {e}"));

    let (aliases, docs) = load_specs_dir(&root).unwrap_or_else(|e| panic!("load: {e}"));
    assert!(aliases.is_empty());
    let titles: Vec<&str> = docs.iter().map(|doc| doc.title.as_str()).collect();
    assert_eq!(titles, vec!["New game", "Second"]);
}

#[rstest]
fn missing_features_directory_is_an_io_error() {
    let temp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let root = camino::Utf8Path::from_path(temp.path())
        .unwrap_or_else(|| panic!("temp path should be UTF-8"))
        .to_owned();
    let result = load_specs_dir(&root);
    assert!(matches!(result, Err(SpecError::Io { .. })));
}
