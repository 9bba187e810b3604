//! Editable pieces of a generated module.
//!
//! A stories module is a top piece (imports) followed by classes separated
//! by two blank lines. Each class is a head (signature, docstring and
//! attributes) followed by scenario methods, each of which may be followed
//! by hand-written methods. Parsing then serializing reproduces the
//! normalized text exactly.

use indexmap::{IndexMap, IndexSet};

use crate::emit::{class_signature, normalize};

use super::error::SourceError;
use super::lint::lint;
use super::pattern::{ATTRIBUTE, METHOD, SCENARIO, SIGNATURE};

/// Separator between top-level classes.
pub const CLASS_DELIMITER: &str = "\n\n\nclass ";

/// Separator between scenario methods inside a class.
pub const SCENARIO_DELIMITER: &str = "\n\n    @base.scenario\n";

const METHOD_GAP: &str = "\n\n";
const DOCSTRING_QUOTES: &str = "\"\"\"";

/// Where the first method of a class without scenarios begins.
const HEAD_METHOD_MARKERS: [&str; 2] = ["\n\n    def ", "\n\n    @"];

// ── ScenarioPiece ───────────────────────────────────────────────────

/// A scenario method and the hand-written methods that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioPiece {
    method: String,
    test: bool,
    trailing: String,
}

impl ScenarioPiece {
    /// Wraps rendered scenario method text, already indented into the class.
    #[must_use]
    pub const fn new(method: String, test: bool) -> Self {
        Self {
            method,
            test,
            trailing: String::new(),
        }
    }

    /// The scenario method text, decorator included.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Whether the method carries the `test_` prefix.
    #[must_use]
    pub const fn is_test(&self) -> bool {
        self.test
    }

    /// Methods written between this scenario and the next one.
    #[must_use]
    pub fn trailing(&self) -> &str {
        &self.trailing
    }

    /// The docstring lines of the scenario method, trimmed.
    #[must_use]
    pub fn doc_lines(&self) -> Vec<String> {
        self.method
            .lines()
            .skip(2)
            .map(str::trim)
            .filter(|line| *line != DOCSTRING_QUOTES)
            .map(str::to_owned)
            .collect()
    }
}

// ── ClassPiece ──────────────────────────────────────────────────────

/// One top-level class of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPiece {
    name: String,
    head: String,
    scenarios: IndexMap<String, ScenarioPiece>,
    tail: String,
}

impl ClassPiece {
    /// Splits the text of one class into its head and scenario pieces.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Structure`] when the signature or a scenario
    /// method does not match the expected layout, or a scenario name repeats.
    pub fn parse(file: &str, text: &str) -> Result<Self, SourceError> {
        let name = SIGNATURE
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|found| found.as_str().to_owned())
            .ok_or_else(|| SourceError::structure(file, "expected a class signature", text))?;

        let mut split = text.split(SCENARIO_DELIMITER);
        let head = split.next().unwrap_or_default().to_owned();
        let mut piece = Self {
            name,
            head,
            scenarios: IndexMap::new(),
            tail: String::new(),
        };

        let mut segments = split.peekable();
        while let Some(segment) = segments.next() {
            let candidate = format!("    @base.scenario\n{segment}");
            let captures = SCENARIO.captures(&candidate).ok_or_else(|| {
                SourceError::structure(
                    file,
                    format!(
                        "scenario method in class {} does not match the scenario layout",
                        piece.name
                    ),
                    segment,
                )
            })?;
            let method = captures.get(1).map_or("", |found| found.as_str()).to_owned();
            let test = captures.get(2).is_some();
            let scenario_name = captures.get(3).map_or("", |found| found.as_str()).to_owned();
            let rest = captures.get(4).map_or("", |found| found.as_str());
            let following = if rest.is_empty() {
                String::new()
            } else {
                rest.strip_prefix(METHOD_GAP)
                    .map(str::to_owned)
                    .ok_or_else(|| {
                        SourceError::structure(
                            file,
                            format!("expected a blank line after scenario {scenario_name}"),
                            rest.trim_start(),
                        )
                    })?
            };

            let mut scenario = ScenarioPiece::new(method, test);
            if segments.peek().is_some() {
                scenario.trailing = following;
            } else {
                piece.tail = following;
            }
            if piece.scenarios.insert(scenario_name.clone(), scenario).is_some() {
                return Err(SourceError::structure(
                    file,
                    format!("scenario {scenario_name} is defined twice in {}", piece.name),
                    segment,
                ));
            }
        }
        Ok(piece)
    }

    /// The class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signature, docstring and attributes, plus any methods written before
    /// the first scenario.
    #[must_use]
    pub fn head(&self) -> &str {
        &self.head
    }

    /// Methods written after the last scenario.
    #[must_use]
    pub fn tail(&self) -> &str {
        &self.tail
    }

    /// Scenario pieces keyed by scenario name, in source order.
    #[must_use]
    pub const fn scenarios(&self) -> &IndexMap<String, ScenarioPiece> {
        &self.scenarios
    }

    /// The bases listed in the class signature.
    #[must_use]
    pub fn bases(&self) -> Vec<String> {
        SIGNATURE
            .captures(&self.head)
            .and_then(|captures| captures.get(2))
            .map(|found| {
                found
                    .as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|base| !base.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Rewrites the class signature with new bases.
    pub fn set_bases(&mut self, bases: &[String]) {
        let signature = class_signature(&self.name, bases);
        let body = SIGNATURE
            .find(&self.head)
            .and_then(|found| self.head.get(found.end()..))
            .unwrap_or_default();
        self.head = format!("{signature}{body}");
    }

    /// The class docstring lines, trimmed.
    #[must_use]
    pub fn docstring_lines(&self) -> Vec<String> {
        let mut lines = self.head.lines().skip(1);
        if lines.next().map(str::trim) != Some(DOCSTRING_QUOTES) {
            return Vec::new();
        }
        lines
            .map(str::trim)
            .take_while(|line| *line != DOCSTRING_QUOTES)
            .map(str::to_owned)
            .collect()
    }

    /// Attribute assignments following the docstring, as name to Python
    /// expression.
    #[must_use]
    pub fn attributes(&self) -> IndexMap<String, String> {
        let mut lines = self.head.lines().skip(1).peekable();
        if lines.peek().map(|line| line.trim()) == Some(DOCSTRING_QUOTES) {
            lines.next();
            for line in lines.by_ref() {
                if line.trim() == DOCSTRING_QUOTES {
                    break;
                }
            }
        }
        lines
            .map_while(|line| ATTRIBUTE.captures(line))
            .filter_map(|captures| {
                Some((
                    captures.get(1)?.as_str().to_owned(),
                    captures.get(2)?.as_str().to_owned(),
                ))
            })
            .collect()
    }

    /// Every method name defined directly on the class, scenario methods
    /// included.
    #[must_use]
    pub fn defined_methods(&self) -> IndexSet<String> {
        let mut texts = vec![self.head.as_str()];
        for scenario in self.scenarios.values() {
            texts.push(&scenario.method);
            texts.push(&scenario.trailing);
        }
        texts.push(&self.tail);
        texts
            .into_iter()
            .flat_map(|text| METHOD.captures_iter(text))
            .filter_map(|captures| captures.get(1).map(|found| found.as_str().to_owned()))
            .collect()
    }

    /// Removes a scenario method, keeping the methods that followed it.
    pub fn remove_scenario(&mut self, name: &str) -> Option<ScenarioPiece> {
        let index = self.scenarios.get_index_of(name)?;
        let (_, removed) = self.scenarios.shift_remove_index(index)?;
        if !removed.trailing.is_empty() {
            let target = index
                .checked_sub(1)
                .and_then(|position| self.scenarios.get_index_mut(position))
                .map_or(&mut self.head, |(_, scenario)| &mut scenario.trailing);
            append_block(target, &removed.trailing);
        }
        if self.scenarios.is_empty() && self.tail.is_empty() && self.head.lines().count() == 1 {
            self.head.push_str("\n    pass");
        }
        Some(removed)
    }

    /// Replaces the method text of a scenario; returns `false` when the
    /// scenario is absent.
    pub fn replace_scenario_method(&mut self, name: &str, method: String, test: bool) -> bool {
        let Some(scenario) = self.scenarios.get_mut(name) else {
            return false;
        };
        scenario.method = method;
        scenario.test = test;
        true
    }

    /// Inserts scenario pieces right after the class head, before the
    /// existing scenarios.
    ///
    /// A class without scenarios keeps its methods in the head; those move
    /// behind the new scenarios so that only the signature, docstring and
    /// attributes precede them.
    pub fn insert_scenarios_after_head(&mut self, pieces: Vec<(String, ScenarioPiece)>) {
        if self.scenarios.is_empty() {
            self.move_head_methods_to_tail();
        }
        let existing = std::mem::take(&mut self.scenarios);
        self.scenarios = pieces.into_iter().chain(existing).collect();
    }

    fn move_head_methods_to_tail(&mut self) {
        let Some(start) = HEAD_METHOD_MARKERS
            .iter()
            .filter_map(|marker| self.head.find(marker))
            .min()
        else {
            return;
        };
        let methods = self
            .head
            .get(start..)
            .unwrap_or_default()
            .trim_start_matches('\n')
            .to_owned();
        self.head.truncate(start);
        let tail = std::mem::replace(&mut self.tail, methods);
        if !tail.is_empty() {
            append_block(&mut self.tail, &tail);
        }
    }

    /// Appends already indented methods at the end of the class.
    pub fn append_methods(&mut self, methods: &str) {
        if self.scenarios.is_empty() && self.tail.is_empty() {
            let pass_only = self.head.lines().count() == 2 && self.head.ends_with("\n    pass");
            if pass_only {
                let signature = self.head.lines().next().unwrap_or_default();
                self.head = format!("{signature}{METHOD_GAP}{methods}");
            } else {
                append_block(&mut self.head, methods);
            }
        } else {
            append_block(&mut self.tail, methods);
        }
    }

    /// Serializes the class back to source text.
    #[must_use]
    pub fn to_source(&self) -> String {
        let mut text = self.head.clone();
        for scenario in self.scenarios.values() {
            text.push_str(METHOD_GAP);
            text.push_str(&scenario.method);
            if !scenario.trailing.is_empty() {
                text.push_str(METHOD_GAP);
                text.push_str(&scenario.trailing);
            }
        }
        if !self.tail.is_empty() {
            text.push_str(METHOD_GAP);
            text.push_str(&self.tail);
        }
        text
    }
}

fn append_block(target: &mut String, block: &str) {
    if !target.is_empty() {
        target.push_str(METHOD_GAP);
    }
    target.push_str(block);
}

// ── ModulePieces ────────────────────────────────────────────────────

/// A module split into its top piece and its classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePieces {
    file: String,
    top: String,
    classes: IndexMap<String, ClassPiece>,
}

impl ModulePieces {
    /// Normalizes, lints and splits module text.
    ///
    /// Decorated classes are kept inside the preceding piece.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Lint`] when the structural lint fails and
    /// [`SourceError::Structure`] when a class or scenario does not match
    /// the expected layout.
    pub fn parse(file: &str, text: &str) -> Result<Self, SourceError> {
        let normalized = normalize(text);
        let violations = lint(&normalized);
        if !violations.is_empty() {
            return Err(SourceError::Lint {
                file: file.to_owned(),
                violations,
            });
        }

        let body = normalized.strip_suffix('\n').unwrap_or(&normalized);
        let (top, rest) = if body.starts_with("class ") {
            ("", Some(body))
        } else {
            body.split_once(CLASS_DELIMITER)
                .map_or((body, None), |(head, classes)| (head, Some(classes)))
        };

        let mut module = Self {
            file: file.to_owned(),
            top: top.to_owned(),
            classes: IndexMap::new(),
        };
        let class_texts = rest.map(|classes| {
            classes
                .strip_prefix("class ")
                .unwrap_or(classes)
                .split(CLASS_DELIMITER)
                .map(|class_body| format!("class {class_body}"))
                .collect::<Vec<_>>()
        });
        for class_text in class_texts.unwrap_or_default() {
            let piece = ClassPiece::parse(file, &class_text)?;
            module.push_class(piece)?;
        }
        Ok(module)
    }

    /// The file or module identifier used in errors.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Everything before the first undecorated class.
    #[must_use]
    pub fn top(&self) -> &str {
        &self.top
    }

    /// Classes keyed by name, in source order.
    #[must_use]
    pub const fn classes(&self) -> &IndexMap<String, ClassPiece> {
        &self.classes
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ClassPiece> {
        self.classes.get(name)
    }

    /// Looks up a class by name for editing.
    pub fn class_mut(&mut self, name: &str) -> Option<&mut ClassPiece> {
        self.classes.get_mut(name)
    }

    /// Appends a class.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Structure`] when a class of that name exists.
    pub fn push_class(&mut self, piece: ClassPiece) -> Result<(), SourceError> {
        if self.classes.contains_key(piece.name()) {
            return Err(SourceError::structure(
                &self.file,
                format!("class {} is defined twice", piece.name()),
                &piece.head,
            ));
        }
        self.classes.insert(piece.name().to_owned(), piece);
        Ok(())
    }

    /// Moves a class after every other class.
    pub fn move_to_end(&mut self, name: &str) {
        if let Some(index) = self.classes.get_index_of(name) {
            let last = self.classes.len().saturating_sub(1);
            self.classes.move_index(index, last);
        }
    }

    /// Serializes the module back to normalized source text.
    #[must_use]
    pub fn to_source(&self) -> String {
        let mut parts = Vec::with_capacity(self.classes.len() + 1);
        if !self.top.is_empty() {
            parts.push(self.top.clone());
        }
        parts.extend(self.classes.values().map(ClassPiece::to_source));
        if parts.is_empty() {
            return String::new();
        }
        format!("{}\n", parts.join("\n\n\n"))
    }
}

#[cfg(test)]
#[path = "pieces_tests.rs"]
mod tests;
