//! Post-deserialization validation for feature documents.
//!
//! These checks enforce constraints that `serde` attributes cannot express,
//! such as "non-empty after trimming".

use super::error::SpecError;
use super::types::FeatureDoc;

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn fail(doc: &FeatureDoc, reason: String) -> SpecError {
    SpecError::ValidationFailed {
        feature: doc.title.trim().to_owned(),
        reason,
    }
}

/// Validates a deserialized feature document.
///
/// Checks applied (in order):
///
/// - `Title` is non-empty after trimming.
/// - `Story` is non-empty after trimming.
/// - Every scenario title is non-empty after trimming.
/// - Every scenario has at least one non-blank step line.
///
/// # Errors
///
/// Returns [`SpecError::ValidationFailed`] on the first violation.
pub(crate) fn validate_feature_doc(doc: &FeatureDoc) -> Result<(), SpecError> {
    if is_blank(&doc.title) {
        return Err(fail(doc, "Title must be non-empty after trimming".to_owned()));
    }
    if is_blank(&doc.story) {
        return Err(fail(doc, "Story must be non-empty after trimming".to_owned()));
    }
    for (title, steps) in &doc.scenarios {
        if is_blank(title) {
            return Err(fail(
                doc,
                "scenario titles must be non-empty after trimming".to_owned(),
            ));
        }
        if steps.iter().all(|step| is_blank(step)) {
            return Err(fail(
                doc,
                format!("scenario '{title}' must contain at least one step"),
            ));
        }
    }
    Ok(())
}
