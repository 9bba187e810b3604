//! Compiled regular expressions for source parsing.

use std::sync::LazyLock;

use regex::Regex;

#[expect(
    clippy::expect_used,
    reason = "patterns are string literals exercised by unit tests"
)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("source pattern should compile")
}

/// A scenario method: decorator, `def [test_]name(self):` and a docstring,
/// followed by anything up to the next scenario.
pub(crate) static SCENARIO: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r#"(?s)\A(    @base\.scenario\n    def (test_)?(\w+)\(self\):\n        """\n.*?\n        """)(.*)\z"#,
    )
});

/// A class signature with optional bases.
pub(crate) static SIGNATURE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\Aclass (\w+)(?:\(([^)]*)\))?:"));

/// A method defined directly on a class.
pub(crate) static METHOD: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^    def (\w+)\("));

/// A class attribute assignment.
pub(crate) static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\A    (\w+) = (.+)\z"));

/// One entry of the `MAP` dictionary in `aliases.py`.
pub(crate) static ALIAS_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?m)^\s*'([^']*)': '([^']*)',?\s*$"));
