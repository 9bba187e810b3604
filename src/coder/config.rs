//! Layered configuration for package generation and patching.
//!
//! Values are merged, lowest precedence first, from programmatic defaults,
//! an optional YAML file and `STORYC_`-prefixed environment variables, then
//! validated.

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::spec::validate_identifier;

/// Prefix of the environment variables read by [`CoderConfig::load`].
pub const ENV_PREFIX: &str = "STORYC_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Layered extraction failed (bad YAML, wrong types).
    #[error("cannot load configuration: {0}")]
    Extract(String),

    /// A value is out of range or malformed.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Settings of a [`PackageCoder`](super::PackageCoder) or
/// [`PackagePatcher`](crate::patcher::PackagePatcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoderConfig {
    /// Specification directory holding `aliases.yml` and `features/`.
    pub specs_path: Utf8PathBuf,
    /// Generated package directory; defaults to `tests` next to the
    /// specification directory.
    pub tests_path: Option<Utf8PathBuf>,
    /// Stories module name, without the `test_` prefix.
    pub test_module_name: String,
    /// Dotted path of an extra test-case class mixed into `BaseTestCase`.
    pub base_class: Option<String>,
    /// Directory holding `.bdd-run-logs`; defaults to the package directory.
    pub logs_parent: Option<Utf8PathBuf>,
    /// Whether an existing package directory may be replaced.
    pub overwrite: bool,
    /// Number of daily history logs kept.
    pub max_history_length: usize,
    /// Default tracing level.
    pub log_level: String,
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self {
            specs_path: Utf8PathBuf::from("behaviour/specs"),
            tests_path: None,
            test_module_name: "stories".to_owned(),
            base_class: None,
            logs_parent: None,
            overwrite: false,
            max_history_length: 5,
            log_level: "info".to_owned(),
        }
    }
}

impl CoderConfig {
    /// Loads defaults, then `path` when given and present, then the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when extraction or validation fails.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(file) = path {
            figment = figment.merge(Yaml::file(file.as_std_path()));
        }
        Self::extract(&figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Loads defaults overridden by a YAML file only.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when extraction or validation fails.
    pub fn load_from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::extract(
            &Figment::new()
                .merge(Serialized::defaults(Self::default()))
                .merge(Yaml::file(path.as_std_path())),
        )
    }

    fn extract(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment
            .extract()
            .map_err(|error| ConfigError::Extract(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges and names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.specs_path.as_str().is_empty() {
            return Err(invalid("specs_path", "must not be empty"));
        }
        validate_identifier(&self.test_module_name)
            .map_err(|error| invalid("test_module_name", error.to_string()))?;
        if self.max_history_length == 0 {
            return Err(invalid("max_history_length", "must be at least 1"));
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(invalid(
                "log_level",
                format!("{} is not one of {}", self.log_level, LOG_LEVELS.join(", ")),
            ));
        }
        if let Some(base_class) = &self.base_class {
            let valid = base_class
                .rsplit_once('.')
                .is_some_and(|(module, class)| !module.is_empty() && validate_identifier(class).is_ok());
            if !valid {
                return Err(invalid(
                    "base_class",
                    format!("{base_class} is not a dotted module.Class path"),
                ));
            }
        }
        Ok(())
    }

    /// The package directory, defaulting to `tests` beside `specs_path`.
    #[must_use]
    pub fn resolved_tests_path(&self) -> Utf8PathBuf {
        self.tests_path.clone().unwrap_or_else(|| {
            self.specs_path
                .parent()
                .unwrap_or_else(|| Utf8Path::new(""))
                .join("tests")
        })
    }

    /// The logs parent directory, defaulting to the package directory.
    #[must_use]
    pub fn resolved_logs_parent(&self) -> Utf8PathBuf {
        let parent = self
            .logs_parent
            .clone()
            .unwrap_or_else(|| self.resolved_tests_path());
        Utf8PathBuf::from(parent.as_str().trim_end_matches('/'))
    }

    /// File name of the stories module.
    #[must_use]
    pub fn stories_file_name(&self) -> String {
        format!("test_{}.py", self.test_module_name)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
