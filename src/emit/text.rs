//! Python source text helpers.
//!
//! Everything here is pure string building with four-space indentation; the
//! layouts match the grammar the module splitter parses back.

/// One indentation level.
pub const INDENT: &str = "    ";

/// Indents every non-empty line of `text` by `levels` indentation levels.
#[must_use]
pub fn indent(text: &str, levels: usize) -> String {
    let prefix = INDENT.repeat(levels);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a docstring whose quotes sit on their own lines, or nothing when
/// there are no lines.
#[must_use]
pub fn make_doc(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    format!("\"\"\"\n{}\n\"\"\"", lines.join("\n"))
}

/// Renders a method of `self`.
///
/// `args` is appended after `self` verbatim (for example `", *args"`). A
/// method without docstring and body gets `pass`.
#[must_use]
pub fn make_method(
    name: &str,
    doc_lines: &[String],
    args: &str,
    decorators: &[&str],
    body: &str,
) -> String {
    let mut text: String = decorators
        .iter()
        .map(|decorator| format!("@{decorator}\n"))
        .collect();
    text.push_str(&format!("def {name}(self{args}):\n"));
    let content: Vec<String> = [make_doc(doc_lines), body.to_owned()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if content.is_empty() {
        text.push_str(&indent("pass", 1));
    } else {
        text.push_str(&indent(&content.join("\n"), 1));
    }
    text
}

/// Renders a class.
///
/// `preamble` (docstring and attributes) follows the signature directly;
/// each member is preceded by one blank line. An empty class gets `pass`.
#[must_use]
pub fn make_class(name: &str, bases: &[String], preamble: &str, members: &[String]) -> String {
    let mut text = format!("class {name}({}):", bases.join(", "));
    if !preamble.is_empty() {
        text.push('\n');
        text.push_str(&indent(preamble, 1));
    }
    for member in members {
        text.push_str("\n\n");
        text.push_str(&indent(member, 1));
    }
    if preamble.is_empty() && members.is_empty() {
        text.push('\n');
        text.push_str(&indent("pass", 1));
    }
    text
}

/// Right-trims every line, drops leading and trailing blank lines and ends
/// non-empty text with exactly one newline.
#[must_use]
pub fn normalize(text: &str) -> String {
    let joined = text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    let trimmed = joined.trim_matches('\n');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}
