//! Step sentence parsing and name normalisation.
//!
//! A step line such as ``When I request a new `game` with "9" boards``
//! carries three things: a canonical method name, the literal inputs quoted
//! with `"` and the output names quoted with backticks. The same
//! normalisation turns scenario titles into method names and feature titles
//! into class names.

use super::aliases::AliasTable;
use super::error::SpecError;
use super::identifier::validate_identifier;
use super::newtypes::MethodName;
use super::types::StepSpec;

/// Gherkin keywords accepted at the start of a step line.
const STEP_KEYWORDS: &[&str] = &["given", "when", "then", "and", "but"];

/// Parses one step line into a [`StepSpec`].
///
/// The leading keyword is stripped, inputs and outputs are extracted left to
/// right, and the derived name is replaced by its canonical alias when the
/// table maps it. The returned step is marked as own; hierarchy resolution
/// decides the final ownership.
///
/// # Errors
///
/// Returns [`SpecError::MalformedSentence`] when the keyword is missing or
/// the quoting is unbalanced, and [`SpecError::InvalidIdentifier`] when the
/// derived name is not a legal Python method name.
///
/// # Examples
///
///     use storyc::spec::{AliasTable, parse_step};
///
///     let step = parse_step(
///         "When I request a new `game` with \"9\" boards",
///         &AliasTable::default(),
///     )
///     .unwrap();
///     assert_eq!(step.name.as_str(), "i_request_a_new_game_with_boards");
///     assert_eq!(step.inputs, vec!["9"]);
///     assert_eq!(step.output_names, vec!["game"]);
pub fn parse_step(line: &str, aliases: &AliasTable) -> Result<StepSpec, SpecError> {
    let raw_text = line.trim();
    let sentence = strip_keyword(raw_text)?;
    check_balanced(raw_text, sentence)?;

    let inputs = quoted_spans(sentence, '"').map(str::to_owned).collect();
    let output_names = quoted_spans(sentence, '`')
        .map(|output| {
            let name = sentence_to_name(output);
            validate_identifier(&name).map(|()| name)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let derived = sentence_to_name(sentence);
    let resolved = aliases.canonical(&derived).unwrap_or(&derived);
    let name = MethodName::new(resolved)?;

    Ok(StepSpec {
        raw_text: raw_text.to_owned(),
        name,
        inputs,
        output_names,
        own: true,
    })
}

/// Derives the canonical snake-case name of a sentence.
///
/// Double-quoted input spans are removed together with the whitespace before
/// them, every space-separated word is lowercased and stripped of non-word
/// characters, and the words are joined with `_`. Runs of three or more
/// underscores collapse to exactly two, which marks an anonymous gap.
///
/// # Examples
///
///     use storyc::spec::sentence_to_name;
///
///     assert_eq!(sentence_to_name("Even boards"), "even_boards");
///     assert_eq!(
///         sentence_to_name("a game is created with boards of \"12\" guesses"),
///         "a_game_is_created_with_boards_of_guesses"
///     );
#[must_use]
pub fn sentence_to_name(text: &str) -> String {
    let without_inputs = strip_inputs(text.trim());
    let joined = without_inputs
        .trim()
        .split(' ')
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("_");
    collapse_underscores(&joined)
}

/// Renders a method name back into a sentence whose name is `name` again.
///
/// # Examples
///
///     use storyc::spec::to_sentence;
///
///     assert_eq!(to_sentence("even_boards"), "Even boards");
#[must_use]
pub fn to_sentence(name: &str) -> String {
    capitalize(&name.replace('_', " "))
}

/// Derives a class name from a feature title by capitalising every word.
///
/// # Examples
///
///     use storyc::spec::title_to_class_name;
///
///     assert_eq!(title_to_class_name("Clear board"), "ClearBoard");
#[must_use]
pub fn title_to_class_name(title: &str) -> String {
    title
        .split_whitespace()
        .map(|word| {
            let cleaned: String = word.chars().filter(char::is_ascii_alphanumeric).collect();
            capitalize(&cleaned)
        })
        .collect()
}

/// Splits a class name back into a title that maps to the same class name.
///
/// # Examples
///
///     use storyc::spec::class_name_to_title;
///
///     assert_eq!(class_name_to_title("ClearBoard"), "Clear Board");
#[must_use]
pub fn class_name_to_title(class_name: &str) -> String {
    let mut title = String::with_capacity(class_name.len() + 4);
    for (position, c) in class_name.chars().enumerate() {
        if position > 0 && c.is_uppercase() {
            title.push(' ');
        }
        title.push(c);
    }
    title
}

fn strip_keyword(line: &str) -> Result<&str, SpecError> {
    let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    if !STEP_KEYWORDS.contains(&keyword.to_lowercase().as_str()) {
        return Err(SpecError::MalformedSentence {
            sentence: line.to_owned(),
            reason: "a step must start with Given, When, Then, And or But".to_owned(),
        });
    }
    let sentence = rest.trim();
    if sentence.is_empty() {
        return Err(SpecError::MalformedSentence {
            sentence: line.to_owned(),
            reason: "a step must contain text after its keyword".to_owned(),
        });
    }
    Ok(sentence)
}

fn check_balanced(line: &str, sentence: &str) -> Result<(), SpecError> {
    for (quote, label) in [('"', "double quotes"), ('`', "backticks")] {
        if sentence.matches(quote).count() & 1 == 1 {
            return Err(SpecError::MalformedSentence {
                sentence: line.to_owned(),
                reason: format!("unbalanced {label}"),
            });
        }
    }
    Ok(())
}

/// Yields the spans enclosed by `quote`, assuming balanced quoting.
fn quoted_spans(text: &str, quote: char) -> impl Iterator<Item = &str> {
    text.split(quote).skip(1).step_by(2)
}

fn strip_inputs(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut quoted = false;
    for segment in text.split('"') {
        if quoted {
            let kept = stripped.trim_end().len();
            stripped.truncate(kept);
        } else {
            stripped.push_str(segment);
        }
        quoted = !quoted;
    }
    stripped
}

fn collapse_underscores(name: &str) -> String {
    let mut collapsed = String::with_capacity(name.len());
    let mut run = 0_usize;
    for c in name.chars() {
        if c == '_' {
            run += 1;
            if run <= 2 {
                collapsed.push(c);
            }
        } else {
            run = 0;
            collapsed.push(c);
        }
    }
    collapsed
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

#[cfg(test)]
#[path = "sentence_tests.rs"]
mod tests;
