//! Test package generation.
//!
//! [`PackageCoder`] renders a resolved specification into a Python package
//! (`__init__.py`, `aliases.py`, `base.py` and the stories module), checks
//! the rendered classes with [`validate_class_structure`] and writes it.
//! [`make_yaml_specs`] goes the other way and recovers specification
//! documents from an existing package.

mod config;
mod error;
mod package;
mod structure;

pub use config::{CoderConfig, ConfigError, ENV_PREFIX};
pub use error::CoderError;
pub use package::{GeneratedPackage, INIT_FILE, PackageCoder, make_yaml_specs, module_file};
pub use structure::validate_class_structure;
