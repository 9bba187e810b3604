//! Shared test helpers for integration tests.

#![expect(dead_code, reason = "each test crate uses a different subset")]

use std::fs;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Returns the path of a file or directory under `tests/fixtures/`.
pub fn fixture_path(name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Loads a fixture file from the `tests/fixtures/` directory.
///
/// # Panics
///
/// Panics if the file cannot be read.
pub fn load_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
}

/// A scratch project: a `specs` directory copied from a fixture and a
/// sibling `tests` package path.
pub struct Project {
    temp: TempDir,
}

impl Project {
    /// Copies `tests/fixtures/specs/<specs>` into a fresh `behaviour/specs`.
    ///
    /// # Panics
    ///
    /// Panics if the copy fails.
    pub fn with_specs(specs: &str) -> Self {
        let temp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let project = Self { temp };
        copy_dir(&fixture_path(&format!("specs/{specs}")), project.specs_path().as_std_path());
        project
    }

    /// Project root.
    pub fn root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.temp.path().to_path_buf())
            .unwrap_or_else(|path| panic!("non UTF-8 path {}", path.display()))
    }

    /// The specification directory.
    pub fn specs_path(&self) -> Utf8PathBuf {
        self.root().join("behaviour/specs")
    }

    /// The generated package directory.
    pub fn tests_path(&self) -> Utf8PathBuf {
        self.root().join("behaviour/tests")
    }

    /// Replaces the specification with another fixture.
    ///
    /// # Panics
    ///
    /// Panics if the copy fails.
    pub fn replace_specs(&self, specs: &str) {
        let target = self.specs_path();
        fs::remove_dir_all(&target).unwrap_or_else(|e| panic!("remove {target}: {e}"));
        copy_dir(&fixture_path(&format!("specs/{specs}")), target.as_std_path());
    }

    /// Overwrites one feature document of the specification.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_feature(&self, file: &str, yaml: &str) {
        let path = self.specs_path().join("features").join(file);
        fs::write(&path, yaml).unwrap_or_else(|e| panic!("write {path}: {e}"));
    }

    /// Reads a file of the generated package.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be read.
    pub fn read_module(&self, file: &str) -> String {
        let path = self.tests_path().join(file);
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {path}: {e}"))
    }

    /// Overwrites a file of the generated package.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_module(&self, file: &str, text: &str) {
        let path = self.tests_path().join(file);
        fs::write(&path, text).unwrap_or_else(|e| panic!("write {path}: {e}"));
    }
}

fn copy_dir(source: &Utf8Path, target: &Path) {
    fs::create_dir_all(target).unwrap_or_else(|e| panic!("create {}: {e}", target.display()));
    for entry in fs::read_dir(source).unwrap_or_else(|e| panic!("read {source}: {e}")) {
        let entry = entry.unwrap_or_else(|e| panic!("entry in {source}: {e}"));
        let from = entry.path();
        let to = target.join(entry.file_name());
        if from.is_dir() {
            let from_utf8 = Utf8PathBuf::from_path_buf(from)
                .unwrap_or_else(|path| panic!("non UTF-8 path {}", path.display()));
            copy_dir(&from_utf8, &to);
        } else {
            fs::copy(&from, &to).unwrap_or_else(|e| panic!("copy {}: {e}", from.display()));
        }
    }
}
