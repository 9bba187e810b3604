//! Integration tests for patching a generated package after its
//! specification changed.

mod common;

use common::Project;
use storyc::coder::{CoderConfig, CoderError, PackageCoder};
use storyc::patcher::PackagePatcher;
use storyc::source::{ClassPiece, ModulePieces};
use storyc::spec::{ClassName, MethodName};
use storyc::{PatchReport, SpecError};

const STORIES: &str = "test_stories.py";

fn generated(specs: &str) -> Project {
    let project = Project::with_specs(specs);
    let config = CoderConfig {
        specs_path: project.specs_path(),
        tests_path: Some(project.tests_path()),
        ..CoderConfig::default()
    };
    PackageCoder::new(config)
        .and_then(|coder| coder.create_tester_package())
        .unwrap_or_else(|e| panic!("package should be generated: {e}"));
    project
}

fn patcher(project: &Project) -> Result<PackagePatcher, CoderError> {
    PackagePatcher::new(&project.tests_path(), "stories", &project.specs_path())
}

fn patch(project: &Project) -> PatchReport {
    patcher(project)
        .and_then(|patcher| patcher.patch())
        .unwrap_or_else(|e| panic!("patch should succeed: {e}"))
}

fn stories_pieces(project: &Project) -> ModulePieces {
    ModulePieces::parse(STORIES, &project.read_module(STORIES))
        .unwrap_or_else(|e| panic!("patched module should split: {e}"))
}

const CLEAR_BOARD_WITHOUT_NEW_GAME: &str = r"Title: Clear board
Story: |
  As a codebreaker
  I want a clear board with a new code
Scenarios:
  Start board:
    - When I request a clear board in my new `game`
    - Then the board is clear
    - And save the score
";

const NEW_GAME_WITHOUT_ODD_BOARDS: &str = r#"Title: New game
Story: |
  As a codebreaker
  I want to start a new game
Scenarios:
  Even boards:
    - When I request a new `game` with "8" boards
    - Then I get a game with "8" boards
Fixtures:
  - player-alice
"#;

const NEW_GAME_WITH_ERROR_RESPONSE: &str = r#"Title: New game
Story: |
  As a codebreaker
  I want to start a new game
Scenarios:
  Even boards:
    - When I request a new `game` with "8" boards
    - Then I get a game with "8" boards
  Odd boards:
    - When I request a new `game` with "9" boards
    - Then I get an error saying it must be even
    - And post the score
Fixtures:
  - player-alice
"#;

const ODD_BOARDS_METHOD: &str = r#"

    @base.scenario
    def test_odd_boards(self):
        """
        When I request a new `game` with "9" boards
        Then I get a 400 response saying it must be even
        And post the score
        """"#;

#[test]
fn patching_an_unchanged_specification_changes_nothing() {
    let project = generated("mastermind");
    let before = project.read_module(STORIES);

    let report = patch(&project);

    assert!(report.delta.is_empty(), "got {:?}", report.delta);
    assert!(report.is_unchanged(), "changed {:?}", report.changed_files);
    assert_eq!(project.read_module(STORIES), before);
}

#[test]
fn recovered_specification_matches_the_generating_one() {
    let project = generated("mastermind");
    let patcher = patcher(&project).unwrap_or_else(|e| panic!("package should read: {e}"));
    let old: Vec<&str> = patcher
        .old_spec()
        .features()
        .keys()
        .map(ClassName::as_str)
        .collect();
    assert_eq!(old, vec!["NewGame", "ClearBoard"]);
    assert_eq!(
        patcher.old_spec().scenario_classes(),
        patcher.new_spec().scenario_classes()
    );
}

#[test]
fn removed_scenario_is_cut_out_and_nothing_else_moves() {
    let project = generated("mastermind");
    let before = project.read_module(STORIES);
    project.write_feature("new-game.yml", NEW_GAME_WITHOUT_ODD_BOARDS);

    let report = patch(&project);

    assert_eq!(
        report.delta.removed.get("odd_boards").map(ClassName::as_str),
        Some("NewGame")
    );
    assert_eq!(report.changed_files, vec![STORIES.to_owned()]);
    assert_eq!(
        project.read_module(STORIES),
        before.replace(ODD_BOARDS_METHOD, "")
    );
}

#[test]
fn updated_step_rewrites_only_its_scenario_and_adds_a_stub() {
    let project = generated("mastermind");
    let before = project.read_module(STORIES);
    project.write_feature("new-game.yml", NEW_GAME_WITH_ERROR_RESPONSE);

    let report = patch(&project);

    let updated: Vec<&str> = report.delta.updated.keys().map(MethodName::as_str).collect();
    assert_eq!(updated, vec!["odd_boards"]);
    assert!(report.delta.removed.is_empty());
    assert!(report.delta.added.is_empty());
    assert_eq!(report.changed_files, vec![STORIES.to_owned()]);
    let stale_stub = concat!(
        "    def i_get_a_400_response_saying_it_must_be_even(self, *args):\n",
        "        assert len(args) == 0\n",
    );
    let expected = before
        .replace(
            "        Then I get a 400 response saying it must be even\n",
            "        Then I get an error saying it must be even\n",
        )
        .replace(
            stale_stub,
            &format!(
                "{stale_stub}\n    def i_get_an_error_saying_it_must_be_even(self, *args):\n        assert len(args) == 0\n"
            ),
        );
    assert_eq!(project.read_module(STORIES), expected);
}

#[test]
fn evolves_the_package_to_the_next_specification() {
    let project = generated("mastermind");
    project.replace_specs("mastermind_v2");

    let report = patch(&project);
    let stories = project.read_module(STORIES);

    assert_eq!(report.changed_files, vec![STORIES.to_owned()]);
    assert!(!stories.contains("odd_boards"));
    assert!(stories.contains(concat!(
        "    @base.scenario\n",
        "    def test_wide_boards(self):\n",
        "        \"\"\"\n",
        "        When I request a new `game` with \"12\" boards\n",
        "        Then the game has \"12\" columns\n",
        "        \"\"\"\n",
        "\n",
        "    @base.scenario\n",
        "    def even_boards(self):\n",
    )));
    assert!(stories.contains(concat!(
        "    def the_game_has_columns(self, *args):\n",
        "        assert len(args) == 1\n",
    )));
    assert!(stories.contains(concat!(
        "class ClearBoard(NewGame):\n",
        "    \"\"\"\n",
        "    As a codebreaker\n",
        "    I want a clear board with a new code\n",
        "    \"\"\"\n",
        "\n",
        "    @base.scenario\n",
        "    def start_board(self):\n",
        "        \"\"\"\n",
        "        Given even boards\n",
        "        When I request a clear board in my new `game`\n",
        "        Then the board is empty\n",
        "        And save the score\n",
        "        \"\"\"\n",
    )));
    assert!(stories.ends_with(concat!(
        "class MakeGuess(ClearBoard, base.BaseTestCase):\n",
        "    \"\"\"\n",
        "    As a codebreaker\n",
        "    I want to make a guess\n",
        "    \"\"\"\n",
        "\n",
        "    @base.scenario\n",
        "    def test_first_guess(self):\n",
        "        \"\"\"\n",
        "        Given start board\n",
        "        When I guess \"RGBY\"\n",
        "        Then I get feedback\n",
        "        \"\"\"\n",
        "\n",
        "    def i_guess(self, *args):\n",
        "        assert len(args) == 1\n",
        "\n",
        "    def i_get_feedback(self, *args):\n",
        "        assert len(args) == 0\n",
    )));

    let clear_board = stories_pieces(&project);
    let methods = clear_board
        .class("ClearBoard")
        .map(ClassPiece::defined_methods)
        .unwrap_or_default();
    assert!(methods.contains("the_board_is_empty"));
    assert!(methods.contains("the_board_is_clear"));
    assert_eq!(
        report.new_steps.get("NewGame"),
        Some(&vec!["the_game_has_columns".to_owned()])
    );
}

#[test]
fn class_order_follows_the_inheritance_order() {
    let project = generated("mastermind");
    project.replace_specs("mastermind_v2");
    patch(&project);

    let names: Vec<String> = stories_pieces(&project).classes().keys().cloned().collect();
    assert_eq!(names, vec!["NewGame", "ClearBoard", "MakeGuess"]);
}

#[test]
fn hand_written_step_bodies_survive() {
    let project = generated("mastermind");
    let edited = project.read_module(STORIES).replace(
        "    def i_get_a_game_with_boards(self, *args):\n        assert len(args) == 1\n",
        "    def i_get_a_game_with_boards(self, *args):\n        assert self.game.boards == int(args[0])\n",
    );
    project.write_module(STORIES, &edited);
    project.replace_specs("mastermind_v2");

    patch(&project);

    assert!(
        project
            .read_module(STORIES)
            .contains("        assert self.game.boards == int(args[0])\n")
    );
}

#[test]
fn second_patch_is_a_no_op() {
    let project = generated("mastermind");
    project.replace_specs("mastermind_v2");
    patch(&project);
    let once = project.read_module(STORIES);

    let report = patch(&project);

    assert!(report.is_unchanged(), "changed {:?}", report.changed_files);
    assert_eq!(project.read_module(STORIES), once);
}

#[test]
fn dropping_the_inheriting_step_restores_a_standalone_class() {
    let project = generated("mastermind");
    project.write_feature("clear-board.yml", CLEAR_BOARD_WITHOUT_NEW_GAME);

    let report = patch(&project);
    let stories = project.read_module(STORIES);

    assert!(report.delta.updated.contains_key("even_boards"));
    assert!(stories.contains("class NewGame(base.BddTester, base.BaseTestCase):\n"));
    assert!(stories.contains("    def test_even_boards(self):\n"));
    assert!(stories.contains("class ClearBoard(base.BddTester, base.BaseTestCase):\n"));
    assert!(stories.contains(ODD_BOARDS_METHOD));
}

#[test]
fn removed_feature_leaves_a_demoted_class() {
    let project = generated("mastermind");
    std::fs::remove_file(project.specs_path().join("features/clear-board.yml"))
        .unwrap_or_else(|e| panic!("remove feature: {e}"));

    let report = patch(&project);
    let stories = project.read_module(STORIES);

    assert_eq!(report.delta.empty_classes, vec!["ClearBoard"]);
    assert!(stories.contains("class ClearBoard(base.BddTester):\n    \"\"\"\n"));
    assert!(!stories.contains("start_board"));
    assert!(stories.contains("class NewGame(base.BddTester, base.BaseTestCase):\n"));
}

#[test]
fn restored_feature_puts_scenarios_back_before_the_stubs() {
    let project = generated("mastermind");
    let original = project.read_module(STORIES);
    let clear_board = project.specs_path().join("features/clear-board.yml");
    let feature = std::fs::read_to_string(&clear_board)
        .unwrap_or_else(|e| panic!("read feature: {e}"));
    std::fs::remove_file(&clear_board).unwrap_or_else(|e| panic!("remove feature: {e}"));
    patch(&project);

    project.write_feature("clear-board.yml", &feature);
    let report = patch(&project);

    let added: Vec<&str> = report
        .delta
        .added
        .get("ClearBoard")
        .map(|names| names.iter().map(MethodName::as_str).collect())
        .unwrap_or_default();
    assert_eq!(added, vec!["start_board"]);
    assert_eq!(project.read_module(STORIES), original);
}

#[test]
fn new_alias_adds_a_base_method_and_map_entry() {
    let project = generated("mastermind");
    std::fs::write(
        project.specs_path().join("aliases.yml"),
        "Record the score:\n  - Post the score\n  - Save the score\nStart the clock:\n  - I request a clear board in my new `game`\n",
    )
    .unwrap_or_else(|e| panic!("write aliases: {e}"));

    // The scenario text is unchanged; only the step it names moves to the base.
    let report = patch(&project);
    assert_eq!(report.new_base_methods, vec!["start_the_clock".to_owned()]);
    assert!(
        project
            .read_module("base.py")
            .contains("    def start_the_clock(self, *args):\n        pass\n")
    );
    assert!(
        project
            .read_module("aliases.py")
            .contains("    'i_request_a_clear_board_in_my_new_game': 'start_the_clock',\n")
    );
}

#[test]
fn lint_failure_leaves_every_file_untouched() {
    let project = generated("mastermind");
    let broken = format!("{}   misplaced = True\n", project.read_module(STORIES));
    project.write_module(STORIES, &broken);
    project.replace_specs("mastermind_v2");

    let error = patcher(&project)
        .and_then(|patcher| patcher.patch())
        .err()
        .unwrap_or_else(|| panic!("patch should fail"));

    assert!(matches!(error, CoderError::Source(_)), "got {error:?}");
    assert_eq!(error.exit_code(), 7);
    assert_eq!(project.read_module(STORIES), broken);
}

#[test]
fn missing_stories_module_is_reported() {
    let project = generated("mastermind");
    std::fs::remove_file(project.tests_path().join(STORIES))
        .unwrap_or_else(|e| panic!("remove module: {e}"));

    let error = patcher(&project)
        .err()
        .unwrap_or_else(|| panic!("reading should fail"));

    assert!(matches!(error, CoderError::MissingModule { .. }), "got {error:?}");
}

#[test]
fn invalid_new_specification_is_reported_before_patching() {
    let project = generated("mastermind");
    project.replace_specs("cyclic");

    let error = patcher(&project)
        .err()
        .unwrap_or_else(|| panic!("cyclic specification should fail"));

    assert!(
        matches!(error, CoderError::Spec(SpecError::CyclicalInheritance { .. })),
        "got {error:?}"
    );
}
