//! `storyc` compiles behaviour specifications into Python test packages.
//!
//! A specification is a directory of YAML feature documents: each feature
//! has a title, a user story and scenarios made of Given/When/Then step
//! lines. `storyc` resolves the features into a class hierarchy (a scenario
//! used as a step by another feature makes its class a base), renders the
//! hierarchy as `unittest` source, patches previously generated source when
//! the specification changes, and tracks scenario runs across sessions.

/// Specification documents, step sentences and hierarchy resolution.
pub mod spec;

/// Python source rendering.
pub mod emit;

/// Structural lint and splitting of generated source.
pub mod source;

/// Package generation, configuration and class-structure checks.
pub mod coder;

/// Incremental patching of generated packages.
pub mod patcher;

/// Scenario run history and completion status.
pub mod tracker;

/// Tracing subscriber setup.
pub mod telemetry;

pub use coder::{CoderConfig, CoderError, PackageCoder};
pub use patcher::{PackagePatcher, PatchReport};
pub use spec::{FeaturesSpecCollection, SpecError};
