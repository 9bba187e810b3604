//! Unit tests for step sentence parsing.

use indexmap::IndexMap;
use proptest::prelude::*;
use rstest::*;

use super::*;

#[fixture]
fn no_aliases() -> AliasTable {
    AliasTable::default()
}

#[rstest]
fn parses_name_inputs_and_outputs(no_aliases: AliasTable) {
    let step = parse_step("When I request a new `game` with \"9\" boards", &no_aliases)
        .unwrap_or_else(|e| panic!("should parse: {e}"));
    assert_eq!(step.name.as_str(), "i_request_a_new_game_with_boards");
    assert_eq!(step.inputs, vec!["9"]);
    assert_eq!(step.output_names, vec!["game"]);
    assert!(step.own);
    assert_eq!(
        step.raw_text,
        "When I request a new `game` with \"9\" boards"
    );
}

#[rstest]
#[case::plain("Given even boards", "even_boards", 0, 0)]
#[case::several_inputs(
    "Then the \"first\" board has \"12\" guesses",
    "the_board_has_guesses",
    2,
    0
)]
#[case::several_outputs(
    "When I get a `board` and a `code`",
    "i_get_a_board_and_a_code",
    0,
    2
)]
#[case::lowercase_keyword("and the score is posted", "the_score_is_posted", 0, 0)]
#[case::punctuation("But it's over!", "its_over", 0, 0)]
#[case::gap_collapse("Then a - - - b", "a__b", 0, 0)]
fn parses_sentence_shapes(
    no_aliases: AliasTable,
    #[case] line: &str,
    #[case] name: &str,
    #[case] inputs: usize,
    #[case] outputs: usize,
) {
    let step = parse_step(line, &no_aliases).unwrap_or_else(|e| panic!("{line}: {e}"));
    assert_eq!(step.name.as_str(), name);
    assert_eq!(step.inputs.len(), inputs);
    assert_eq!(step.output_names.len(), outputs);
}

#[rstest]
#[case::missing_keyword("I request a new game", "must start with")]
#[case::keyword_only("When", "text after its keyword")]
#[case::odd_double_quotes("When I send \"9 boards", "unbalanced double quotes")]
#[case::odd_backticks("When I get a `game", "unbalanced backticks")]
#[case::digit_name("Then 3 boards exist", "invalid identifier")]
#[case::only_input("When \"9\"", "invalid identifier")]
fn rejects_malformed_sentences(
    no_aliases: AliasTable,
    #[case] line: &str,
    #[case] fragment: &str,
) {
    let msg = parse_step(line, &no_aliases)
        .err()
        .map(|e| e.to_string())
        .unwrap_or_default();
    assert!(msg.contains(fragment), "unexpected message for {line}: {msg}");
}

#[test]
fn substitutes_canonical_alias() {
    let mut groups = IndexMap::new();
    groups.insert("Record score".to_owned(), vec!["Post score".to_owned()]);
    let aliases = AliasTable::from_groups(&groups);
    let step = parse_step("Then post score", &aliases)
        .unwrap_or_else(|e| panic!("should parse: {e}"));
    assert_eq!(step.name.as_str(), "record_score");
}

#[rstest]
#[case::two_words("Clear board", "ClearBoard")]
#[case::shouting("NEW game", "NewGame")]
#[case::punctuation("Player's turn!", "PlayersTurn")]
fn derives_class_names(#[case] title: &str, #[case] expected: &str) {
    assert_eq!(title_to_class_name(title), expected);
}

#[test]
fn class_name_round_trips_through_title() {
    for class_name in ["NewGame", "ClearBoard", "Game2Boards", "HTTPServer"] {
        let title = class_name_to_title(class_name);
        assert_eq!(title_to_class_name(&title), class_name);
    }
}

proptest! {
    #[test]
    fn names_survive_sentence_round_trip(
        name in "[a-z][a-z0-9]{0,6}(_[a-z0-9]{1,6}){0,4}(__[a-z]{1,4})?"
    ) {
        prop_assert_eq!(sentence_to_name(&to_sentence(&name)), name);
    }

    #[test]
    fn names_never_contain_triple_underscores(text in "[a-z \\-!]{0,40}") {
        prop_assert!(!sentence_to_name(&text).contains("___"));
    }
}
