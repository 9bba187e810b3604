//! Incremental patching of a generated test package.
//!
//! The patcher recovers the specification a package was generated from,
//! compares it with the current specification documents and edits the
//! split modules in place: scenario methods are removed, rewritten or
//! spliced in, new classes are appended, bases are re-sorted and missing
//! step stubs are added. Hand-written step implementations are kept. Every
//! edited module is linted and the class structure is checked before any
//! file is written.

mod delta;
mod passes;
mod sources;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::coder::{CoderConfig, CoderError, GeneratedPackage, module_file, validate_class_structure};
use crate::emit::{ALIASES_MODULE, render_aliases_module};
use crate::source::ModulePieces;
use crate::spec::FeaturesSpecCollection;

pub use delta::PatchDelta;
pub use sources::{PackageSources, parse_aliases_module, reconstruct_spec};

/// Summary of an applied patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Scenario-level changes.
    pub delta: PatchDelta,
    /// Step stubs appended per class.
    pub new_steps: IndexMap<String, Vec<String>>,
    /// Canonical alias steps appended to `BaseTestCase`.
    pub new_base_methods: Vec<String>,
    /// Files whose content changed, in write order.
    pub changed_files: Vec<String>,
}

impl PatchReport {
    /// Whether the patch leaves every file untouched.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.changed_files.is_empty()
    }
}

/// Brings a generated package up to date with its specification.
#[derive(Debug, Clone)]
pub struct PackagePatcher {
    sources: PackageSources,
    old: FeaturesSpecCollection,
    new: FeaturesSpecCollection,
    delta: PatchDelta,
}

impl PackagePatcher {
    /// Reads the package at `tests_path` and the specification at
    /// `specs_path`.
    ///
    /// # Errors
    ///
    /// Returns [`CoderError`] when the package cannot be read or split, or
    /// when either specification does not resolve.
    pub fn new(
        tests_path: &Utf8Path,
        test_module_name: &str,
        specs_path: &Utf8Path,
    ) -> Result<Self, CoderError> {
        let sources = PackageSources::read(tests_path, test_module_name)?;
        let new = FeaturesSpecCollection::from_specs_dir(specs_path)?;
        Self::with_spec(sources, new)
    }

    /// Reads the package and specification named by a configuration.
    ///
    /// # Errors
    ///
    /// As [`Self::new`], plus [`CoderError::Config`] for an invalid
    /// configuration.
    pub fn from_config(config: &CoderConfig) -> Result<Self, CoderError> {
        config.validate()?;
        Self::new(
            &config.resolved_tests_path(),
            &config.test_module_name,
            &config.specs_path,
        )
    }

    /// Compares already read sources with a resolved specification.
    ///
    /// # Errors
    ///
    /// Returns [`CoderError::Spec`] when the package's own specification
    /// does not resolve.
    pub fn with_spec(
        sources: PackageSources,
        new: FeaturesSpecCollection,
    ) -> Result<Self, CoderError> {
        let old = reconstruct_spec(&sources)?;
        let delta = PatchDelta::compute(&old, &new, sources.stories());
        debug!(
            removed = delta.removed.len(),
            added = delta.added.values().map(Vec::len).sum::<usize>(),
            updated = delta.updated.len(),
            new_classes = delta.new_classes.len(),
            empty_classes = delta.empty_classes.len(),
            "computed patch delta"
        );
        Ok(Self {
            sources,
            old,
            new,
            delta,
        })
    }

    /// The specification recovered from the package.
    #[must_use]
    pub const fn old_spec(&self) -> &FeaturesSpecCollection {
        &self.old
    }

    /// The specification the package is patched to.
    #[must_use]
    pub const fn new_spec(&self) -> &FeaturesSpecCollection {
        &self.new
    }

    /// The scenario-level differences.
    #[must_use]
    pub const fn delta(&self) -> &PatchDelta {
        &self.delta
    }

    /// Applies every pass in memory and returns the patched modules.
    ///
    /// # Errors
    ///
    /// Returns [`CoderError::Source`] when a patched module fails the
    /// structural lint and [`CoderError::InconsistentClassStructure`] when
    /// the result disagrees with the specification.
    pub fn apply(&self) -> Result<(GeneratedPackage, PatchReport), CoderError> {
        let mut stories = self.sources.stories().clone();
        let mut base = self.sources.base().clone();

        passes::remove_scenarios(&mut stories, &self.delta)?;
        passes::update_scenarios(&mut stories, &self.new, &self.delta)?;
        passes::add_scenarios(&mut stories, &self.new, &self.delta)?;
        passes::add_new_classes(&mut stories, &self.new, &self.delta)?;
        passes::sort_hierarchy(&mut stories, &self.new, &self.delta)?;
        let new_steps = passes::add_new_steps(&mut stories, &base, &self.new, &self.delta)?;
        let new_base_methods = passes::add_base_methods(&mut base, &self.new)?;
        let aliases = self.sources.aliases().merged(self.new.aliases());

        let stories_text = stories.to_source();
        let base_text = base.to_source();
        let checked = ModulePieces::parse(stories.file(), &stories_text)?;
        ModulePieces::parse(base.file(), &base_text)?;
        validate_class_structure(&self.new, &checked)?;

        let files = IndexMap::from([
            (base.file().to_owned(), base_text),
            (stories.file().to_owned(), stories_text),
            (module_file(ALIASES_MODULE), render_aliases_module(&aliases)),
        ]);
        let current = self.sources.current_files();
        let changed_files = files
            .iter()
            .filter(|&(name, text)| current.get(name) != Some(text))
            .map(|(name, _)| name.clone())
            .collect();

        let report = PatchReport {
            delta: self.delta.clone(),
            new_steps,
            new_base_methods,
            changed_files,
        };
        Ok((GeneratedPackage::new(files), report))
    }

    /// Applies the patch and writes the changed modules. Nothing is written
    /// when any pass or check fails.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::apply`], plus [`CoderError::Io`] when a module
    /// cannot be written.
    pub fn patch(&self) -> Result<PatchReport, CoderError> {
        let (package, report) = self.apply()?;
        let path = self.sources.path();
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|source| CoderError::io(path, source))?;
        for name in &report.changed_files {
            let Some(text) = package.file(name) else {
                continue;
            };
            dir.write(name, text)
                .map_err(|source| CoderError::io(&path.join(name), source))?;
        }
        info!(
            path = %path,
            changed = report.changed_files.len(),
            classes = report.delta.touched_classes().len(),
            "patched test package"
        );
        Ok(report)
    }
}
