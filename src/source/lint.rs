//! Structural lint for generated Python modules.
//!
//! A line-based subset of the pycodestyle checks the splitter depends on:
//! indentation in multiples of four, blank lines around definitions, and a
//! single statement per line. Lines inside strings and brackets are skipped.

/// Lint rule identifiers, named after their pycodestyle codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCode {
    /// Indentation is not a multiple of four.
    E111,
    /// Expected one blank line before a nested definition, found none.
    E301,
    /// Expected two blank lines before a top-level definition.
    E302,
    /// Too many blank lines.
    E303,
    /// Multiple statements on one line (colon).
    E701,
    /// Multiple statements on one line (semicolon).
    E702,
}

impl LintCode {
    /// Returns the stable code string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::E111 => "E111",
            Self::E301 => "E301",
            Self::E302 => "E302",
            Self::E303 => "E303",
            Self::E701 => "E701",
            Self::E702 => "E702",
        }
    }
}

/// One lint finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintViolation {
    /// Rule that fired.
    pub code: LintCode,
    /// 1-indexed line number.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

impl LintViolation {
    /// Renders the violation as `line: CODE message`.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}: {} {}", self.line, self.code.as_str(), self.message)
    }
}

const COMPOUND_KEYWORDS: &[&str] = &[
    "if ", "elif ", "else:", "for ", "while ", "with ", "try:", "except", "finally:",
];

#[derive(Default)]
struct Scanner {
    triple_quote: Option<char>,
    depth: usize,
    continued: bool,
}

#[derive(Default)]
struct Previous {
    seen: bool,
    indent: usize,
    decorator: bool,
    docstring: bool,
}

/// Lints a module and returns every violation, in line order.
#[must_use]
pub fn lint(text: &str) -> Vec<LintViolation> {
    let mut violations = Vec::new();
    let mut scanner = Scanner::default();
    let mut previous = Previous::default();
    let mut blank_lines = 0_usize;

    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        let starts_logical =
            scanner.triple_quote.is_none() && scanner.depth == 0 && !scanner.continued;
        let masked = scanner.mask(line);

        if starts_logical {
            let content = line.trim_start();
            if content.is_empty() {
                blank_lines += 1;
                continue;
            }
            let indent = line.len() - content.len();
            let mut report = |code: LintCode, message: String| {
                violations.push(LintViolation {
                    code,
                    line: number,
                    message,
                });
            };

            if blank_lines > 2 || (indent > 0 && blank_lines == 2) {
                report(LintCode::E303, format!("too many blank lines ({blank_lines})"));
            }
            if !content.starts_with('#') {
                if indent & 3 != 0 {
                    report(
                        LintCode::E111,
                        "indentation is not a multiple of four".to_owned(),
                    );
                }
                if is_definition(content) && !previous.decorator {
                    if indent == 0 && previous.seen && blank_lines < 2 {
                        report(
                            LintCode::E302,
                            format!("expected 2 blank lines, found {blank_lines}"),
                        );
                    }
                    if indent > 0
                        && blank_lines == 0
                        && previous.indent >= indent
                        && !previous.docstring
                    {
                        report(LintCode::E301, "expected 1 blank line, found 0".to_owned());
                    }
                }
                let code = masked.trim_start();
                if has_inline_body(code) {
                    report(
                        LintCode::E701,
                        "multiple statements on one line (colon)".to_owned(),
                    );
                }
                previous = Previous {
                    seen: true,
                    indent,
                    decorator: content.starts_with('@'),
                    docstring: content.starts_with("\"\"\"") || content.starts_with("'''"),
                };
            }
            blank_lines = 0;
        }

        if has_semicolon_statement(&masked) {
            violations.push(LintViolation {
                code: LintCode::E702,
                line: number,
                message: "multiple statements on one line (semicolon)".to_owned(),
            });
        }
        scanner.track(&masked);
    }

    violations
}

fn is_definition(content: &str) -> bool {
    ["def ", "async def ", "class ", "@"]
        .iter()
        .any(|prefix| content.starts_with(prefix))
}

/// `true` when a block header has a statement after its colon.
fn has_inline_body(code: &str) -> bool {
    let is_header = ["def ", "async def ", "class "]
        .iter()
        .chain(COMPOUND_KEYWORDS)
        .any(|prefix| code.starts_with(prefix));
    if !is_header {
        return false;
    }
    let mut depth = 0_usize;
    let mut chars = code.char_indices().peekable();
    while let Some((position, c)) = chars.next() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                if chars.peek().is_some_and(|(_, next)| *next == '=') {
                    continue;
                }
                return code
                    .get(position + 1..)
                    .is_some_and(|rest| !rest.trim().is_empty());
            }
            _ => {}
        }
    }
    false
}

fn has_semicolon_statement(masked: &str) -> bool {
    masked.contains(';')
}

impl Scanner {
    /// Returns `line` with string contents blanked and comments removed,
    /// updating the open triple-quote state.
    fn mask(&mut self, line: &str) -> String {
        let chars: Vec<char> = line.chars().collect();
        let mut masked = String::with_capacity(line.len());
        let mut index = 0;
        while let Some(&c) = chars.get(index) {
            if let Some(quote) = self.triple_quote {
                if is_triple(&chars, index, quote) {
                    masked.push_str("   ");
                    index += 3;
                    self.triple_quote = None;
                } else {
                    masked.push(' ');
                    index += if c == '\\' { 2 } else { 1 };
                }
                continue;
            }
            match c {
                '#' => break,
                '"' | '\'' if is_triple(&chars, index, c) => {
                    masked.push_str("   ");
                    index += 3;
                    self.triple_quote = Some(c);
                }
                '"' | '\'' => {
                    masked.push(c);
                    index += 1;
                    while let Some(&inner) = chars.get(index) {
                        index += 1;
                        if inner == '\\' {
                            index += 1;
                            masked.push_str("  ");
                        } else if inner == c {
                            masked.push(c);
                            break;
                        } else {
                            masked.push(' ');
                        }
                    }
                }
                _ => {
                    masked.push(c);
                    index += 1;
                }
            }
        }
        masked
    }

    /// Updates bracket depth and line continuation from a masked line.
    fn track(&mut self, masked: &str) {
        for c in masked.chars() {
            match c {
                '(' | '[' | '{' => self.depth += 1,
                ')' | ']' | '}' => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }
        }
        self.continued = self.triple_quote.is_none() && masked.trim_end().ends_with('\\');
    }
}

fn is_triple(chars: &[char], index: usize, quote: char) -> bool {
    (index..index + 3).all(|position| chars.get(position) == Some(&quote))
}

#[cfg(test)]
#[path = "lint_tests.rs"]
mod tests;
