//! Parsing of generated Python source back into editable pieces.
//!
//! Generated modules follow a strict layout. The [`lint`] pass checks the
//! blank-line and indentation rules that layout depends on, and
//! [`ModulePieces`] splits a module into classes and scenario methods that
//! the patcher edits in place.

mod error;
mod lint;
pub(crate) mod pattern;
mod pieces;

pub use error::SourceError;
pub use lint::{LintCode, LintViolation, lint};
pub use pieces::{CLASS_DELIMITER, ClassPiece, ModulePieces, SCENARIO_DELIMITER, ScenarioPiece};
