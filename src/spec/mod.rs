//! Behaviour specification model.
//!
//! Feature documents are YAML files with a `Title`, a `Story` and ordered
//! `Scenarios` of Given/When/Then step lines. They are deserialized with
//! `serde-saphyr`, accept TitleCase and lowercase keys, and resolve into a
//! [`FeaturesSpecCollection`]: a class hierarchy in which scenarios reused as
//! steps make their class a base of the calling class.

mod aliases;
mod builder;
mod collection;
mod diagnostic;
pub mod dump;
mod error;
mod identifier;
mod loader;
mod newtypes;
mod sentence;
mod types;
mod validate;
mod value;

pub use aliases::AliasTable;
pub use collection::FeaturesSpecCollection;
pub use diagnostic::{SourceLocation, SpecDiagnostic, SpecDiagnosticCode};
pub use error::SpecError;
pub use identifier::validate_identifier;
pub use loader::{
    ALIASES_FILE, FEATURES_DIR, load_alias_table, load_feature_docs,
    load_feature_docs_with_source, load_specs_dir,
};
pub use newtypes::{ClassName, MethodName};
pub use sentence::{
    class_name_to_title, parse_step, sentence_to_name, title_to_class_name, to_sentence,
};
pub use types::{FeatureDoc, FeatureSpec, ScenarioSpec, StepSpec};
pub use value::SpecValue;

pub(crate) use value::quote_single;
