//! Fresh generation of a test package.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::emit::{
    ALIASES_MODULE, BASE_MODULE, render_aliases_module, render_base_module,
    render_stories_module,
};
use crate::source::ModulePieces;
use crate::spec::FeaturesSpecCollection;
use crate::spec::dump::write_specs_dir;

use super::config::CoderConfig;
use super::error::CoderError;
use super::structure::validate_class_structure;

/// Package marker module.
pub const INIT_FILE: &str = "__init__.py";

/// Returns the file name of a module.
#[must_use]
pub fn module_file(module: &str) -> String {
    format!("{module}.py")
}

/// The rendered files of a test package, keyed by file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPackage {
    files: IndexMap<String, String>,
}

impl GeneratedPackage {
    pub(crate) const fn new(files: IndexMap<String, String>) -> Self {
        Self { files }
    }

    /// Every file, in write order.
    #[must_use]
    pub const fn files(&self) -> &IndexMap<String, String> {
        &self.files
    }

    /// The content of one file.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    /// Writes every file into `path`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns [`CoderError::Io`] when a file cannot be written.
    pub fn write_to(&self, path: &Utf8Path) -> Result<(), CoderError> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(|source| CoderError::io(path, source))?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|source| CoderError::io(path, source))?;
        for (name, text) in &self.files {
            dir.write(name, text)
                .map_err(|source| CoderError::io(&path.join(name), source))?;
            debug!(file = %path.join(name), bytes = text.len(), "wrote module");
        }
        Ok(())
    }
}

/// Generates a test package from a specification directory.
#[derive(Debug, Clone)]
pub struct PackageCoder {
    config: CoderConfig,
    spec: FeaturesSpecCollection,
}

impl PackageCoder {
    /// Validates the configuration and loads the specification.
    ///
    /// # Errors
    ///
    /// Returns [`CoderError::Config`] for an invalid configuration and
    /// [`CoderError::Spec`] when the specification cannot be resolved.
    pub fn new(config: CoderConfig) -> Result<Self, CoderError> {
        config.validate()?;
        let spec = FeaturesSpecCollection::from_specs_dir(&config.specs_path)?;
        info!(
            specs = %config.specs_path,
            features = spec.features().len(),
            "loaded specification"
        );
        Ok(Self { config, spec })
    }

    /// Uses an already resolved specification.
    #[must_use]
    pub const fn from_spec(config: CoderConfig, spec: FeaturesSpecCollection) -> Self {
        Self { config, spec }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &CoderConfig {
        &self.config
    }

    /// The resolved specification.
    #[must_use]
    pub const fn spec(&self) -> &FeaturesSpecCollection {
        &self.spec
    }

    /// Renders every package module and checks the stories module against
    /// the specification.
    ///
    /// # Errors
    ///
    /// Returns [`CoderError::Source`] if a rendered module fails the
    /// structural lint and [`CoderError::InconsistentClassStructure`] if the
    /// declared classes disagree with the specification.
    pub fn render(&self) -> Result<GeneratedPackage, CoderError> {
        let logs_parent = self.config.resolved_logs_parent();
        let stories_file = self.config.stories_file_name();
        let base_file = module_file(BASE_MODULE);

        let stories = render_stories_module(&self.spec);
        let base = render_base_module(
            &self.spec,
            self.config.base_class.as_deref(),
            logs_parent.as_str(),
        );
        let pieces = ModulePieces::parse(&stories_file, &stories)?;
        ModulePieces::parse(&base_file, &base)?;
        validate_class_structure(&self.spec, &pieces)?;

        let files = IndexMap::from([
            (INIT_FILE.to_owned(), String::new()),
            (base_file, base),
            (stories_file, stories),
            (
                module_file(ALIASES_MODULE),
                render_aliases_module(self.spec.aliases()),
            ),
        ]);
        Ok(GeneratedPackage::new(files))
    }

    /// Renders the package and writes it to the configured directory.
    ///
    /// # Errors
    ///
    /// Returns [`CoderError::Overwrite`] when the directory exists and
    /// overwriting is disabled, plus any error of [`Self::render`] and
    /// [`GeneratedPackage::write_to`]. Nothing is written on error.
    pub fn create_tester_package(&self) -> Result<Utf8PathBuf, CoderError> {
        let tests_path = self.config.resolved_tests_path();
        if tests_path.exists() && !self.config.overwrite {
            return Err(CoderError::Overwrite {
                path: tests_path.to_string(),
            });
        }
        let package = self.render()?;
        package.write_to(&tests_path)?;
        info!(
            path = %tests_path,
            classes = self.spec.features().len(),
            "created test package"
        );
        Ok(tests_path)
    }
}

/// Recovers the specification of an existing test package and writes it as
/// YAML documents into `specs_path`.
///
/// # Errors
///
/// Returns [`CoderError::Overwrite`] when `specs_path` exists and
/// `overwrite` is false, [`CoderError::MissingModule`] or
/// [`CoderError::Source`] when the package cannot be read, and
/// [`CoderError::Spec`] when the recovered specification does not resolve
/// or cannot be written.
pub fn make_yaml_specs(
    tests_path: &Utf8Path,
    test_module_name: &str,
    specs_path: &Utf8Path,
    overwrite: bool,
) -> Result<FeaturesSpecCollection, CoderError> {
    if specs_path.exists() && !overwrite {
        return Err(CoderError::Overwrite {
            path: specs_path.to_string(),
        });
    }
    let sources = crate::patcher::PackageSources::read(tests_path, test_module_name)?;
    let spec = crate::patcher::reconstruct_spec(&sources)?;
    write_specs_dir(&spec, specs_path)?;
    info!(
        tests = %tests_path,
        specs = %specs_path,
        features = spec.features().len(),
        "wrote YAML specification from test package"
    );
    Ok(spec)
}
