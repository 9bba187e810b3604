//! Consistency check between a stories module and its specification.

use crate::emit::{BASE_TEST_CASE, BDD_TESTER};
use crate::source::ModulePieces;
use crate::spec::{FeaturesSpecCollection, MethodName};

use super::error::CoderError;

/// Checks that the classes of a stories module match the specification.
///
/// Every feature must be declared with its minimal bases (or
/// `base.BddTester`), carry `base.BaseTestCase` exactly once unless it is
/// inherited, and define the scenarios of the feature. Classes unknown to
/// the specification are tolerated when they hold no scenarios.
///
/// # Errors
///
/// Returns [`CoderError::InconsistentClassStructure`] listing every
/// mismatch.
pub fn validate_class_structure(
    spec: &FeaturesSpecCollection,
    stories: &ModulePieces,
) -> Result<(), CoderError> {
    let mut differences = Vec::new();

    for (class_name, feature) in spec.features() {
        let Some(piece) = stories.class(class_name.as_str()) else {
            differences.push(format!("{class_name}: class is missing"));
            continue;
        };
        let declared = piece.bases();
        let test_cases = declared
            .iter()
            .filter(|base| base.as_str() == BASE_TEST_CASE)
            .count();
        if feature.inherited && test_cases > 0 {
            differences.push(format!(
                "{class_name}: inherited class must not extend {BASE_TEST_CASE}"
            ));
        }
        if !feature.inherited && test_cases != 1 {
            differences.push(format!(
                "{class_name}: expected {BASE_TEST_CASE} once, found {test_cases}"
            ));
        }

        let expected: Vec<String> = if feature.bases.is_empty() {
            vec![BDD_TESTER.to_owned()]
        } else {
            feature.bases.iter().map(ToString::to_string).collect()
        };
        let found: Vec<String> = declared
            .into_iter()
            .filter(|base| base != BASE_TEST_CASE)
            .collect();
        if found != expected {
            differences.push(format!(
                "{class_name}: expected bases ({}), found ({})",
                expected.join(", "),
                found.join(", ")
            ));
        }

        let mut expected_scenarios: Vec<&str> =
            feature.scenarios.keys().map(MethodName::as_str).collect();
        let mut found_scenarios: Vec<&str> = piece.scenarios().keys().map(String::as_str).collect();
        expected_scenarios.sort_unstable();
        found_scenarios.sort_unstable();
        if found_scenarios != expected_scenarios {
            differences.push(format!(
                "{class_name}: expected scenarios [{}], found [{}]",
                expected_scenarios.join(", "),
                found_scenarios.join(", ")
            ));
        }
    }

    for (name, piece) in stories.classes() {
        if spec.feature(name).is_none() && !piece.scenarios().is_empty() {
            differences.push(format!(
                "{name}: class is not specified but declares scenarios"
            ));
        }
    }

    if differences.is_empty() {
        Ok(())
    } else {
        Err(CoderError::InconsistentClassStructure { differences })
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::emit::render_stories_module;
    use crate::spec::{AliasTable, load_feature_docs};

    const SPECS: &str = r#"
Title: New game
Story: As a codebreaker I want to start a new game
Scenarios:
  Even boards:
    - When I request a new `game` with "8" boards
    - Then a game is created
---
Title: Clear board
Story: As a codebreaker I want a clear board
Scenarios:
  Start board:
    - Given even boards
    - Then the board is empty
"#;

    #[fixture]
    fn spec() -> FeaturesSpecCollection {
        let docs = load_feature_docs(SPECS).unwrap_or_else(|e| panic!("{e}"));
        FeaturesSpecCollection::from_documents(AliasTable::default(), &docs)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    fn differences(spec: &FeaturesSpecCollection, text: &str) -> Vec<String> {
        let stories = ModulePieces::parse("test_stories.py", text).unwrap_or_else(|e| panic!("{e}"));
        match validate_class_structure(spec, &stories) {
            Ok(()) => Vec::new(),
            Err(CoderError::InconsistentClassStructure { differences }) => differences,
            Err(other) => panic!("unexpected error {other}"),
        }
    }

    #[rstest]
    fn generated_module_is_consistent(spec: FeaturesSpecCollection) {
        assert!(differences(&spec, &render_stories_module(&spec)).is_empty());
    }

    #[rstest]
    fn reports_test_case_mixin_on_inherited_class(spec: FeaturesSpecCollection) {
        let text = render_stories_module(&spec).replace(
            "class NewGame(base.BddTester):",
            "class NewGame(base.BddTester, base.BaseTestCase):",
        );
        assert_eq!(
            differences(&spec, &text),
            vec!["NewGame: inherited class must not extend base.BaseTestCase"]
        );
    }

    #[rstest]
    fn reports_wrong_bases_and_stray_scenarios(spec: FeaturesSpecCollection) {
        let text = render_stories_module(&spec)
            .replace(
                "class ClearBoard(NewGame, base.BaseTestCase):",
                "class ClearBoard(base.BddTester):",
            )
            .replace("class NewGame(", "class OldGame(");
        let found = differences(&spec, &text);
        assert_eq!(
            found,
            vec![
                "NewGame: class is missing",
                "ClearBoard: expected base.BaseTestCase once, found 0",
                "ClearBoard: expected bases (NewGame), found (base.BddTester)",
                "OldGame: class is not specified but declares scenarios",
            ]
        );
    }
}
