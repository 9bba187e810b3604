//! Reading a generated package and recovering its specification.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use indexmap::IndexMap;
use tracing::debug;

use crate::coder::{CoderError, module_file};
use crate::emit::{ALIASES_MODULE, BASE_MODULE};
use crate::source::ModulePieces;
use crate::source::pattern::ALIAS_ENTRY;
use crate::spec::{
    AliasTable, FeatureDoc, FeaturesSpecCollection, SpecValue, class_name_to_title, to_sentence,
};

/// The editable modules of a generated test package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSources {
    path: Utf8PathBuf,
    stories_file: String,
    stories: ModulePieces,
    base: ModulePieces,
    aliases: AliasTable,
    aliases_text: String,
}

impl PackageSources {
    /// Reads and splits `base.py`, the stories module and `aliases.py`.
    ///
    /// # Errors
    ///
    /// Returns [`CoderError::MissingModule`] when a module is absent,
    /// [`CoderError::Io`] when one cannot be read and
    /// [`CoderError::Source`] when one fails the structural lint or does not
    /// split.
    pub fn read(tests_path: &Utf8Path, test_module_name: &str) -> Result<Self, CoderError> {
        let dir = Dir::open_ambient_dir(tests_path, ambient_authority())
            .map_err(|source| CoderError::io(tests_path, source))?;
        let stories_file = module_file(&format!("test_{test_module_name}"));
        let base_file = module_file(BASE_MODULE);
        let aliases_file = module_file(ALIASES_MODULE);

        let stories_text = read_module(&dir, tests_path, &stories_file)?;
        let base_text = read_module(&dir, tests_path, &base_file)?;
        let aliases_text = read_module(&dir, tests_path, &aliases_file)?;

        let sources = Self {
            path: tests_path.to_owned(),
            stories: ModulePieces::parse(&stories_file, &stories_text)?,
            base: ModulePieces::parse(&base_file, &base_text)?,
            aliases: parse_aliases_module(&aliases_text),
            aliases_text,
            stories_file,
        };
        debug!(
            path = %tests_path,
            classes = sources.stories.classes().len(),
            aliases = sources.aliases.len(),
            "read test package"
        );
        Ok(sources)
    }

    /// The package directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// File name of the stories module.
    #[must_use]
    pub fn stories_file(&self) -> &str {
        &self.stories_file
    }

    /// The split stories module.
    #[must_use]
    pub const fn stories(&self) -> &ModulePieces {
        &self.stories
    }

    /// The split `base.py`.
    #[must_use]
    pub const fn base(&self) -> &ModulePieces {
        &self.base
    }

    /// The alias map declared in `aliases.py`.
    #[must_use]
    pub const fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// The current content of every editable module, keyed by file name.
    /// Split modules are given in normalized form.
    #[must_use]
    pub fn current_files(&self) -> IndexMap<String, String> {
        IndexMap::from([
            (self.base.file().to_owned(), self.base.to_source()),
            (self.stories_file.clone(), self.stories.to_source()),
            (module_file(ALIASES_MODULE), self.aliases_text.clone()),
        ])
    }
}

fn read_module(dir: &Dir, tests_path: &Utf8Path, file: &str) -> Result<String, CoderError> {
    if !dir.is_file(file) {
        return Err(CoderError::MissingModule {
            path: tests_path.to_string(),
            module: file.to_owned(),
        });
    }
    dir.read_to_string(file)
        .map_err(|source| CoderError::io(&tests_path.join(file), source))
}

/// Reads the `MAP` entries of an `aliases.py` module.
#[must_use]
pub fn parse_aliases_module(text: &str) -> AliasTable {
    AliasTable::from_pairs(ALIAS_ENTRY.captures_iter(text).filter_map(|captures| {
        Some((
            captures.get(1)?.as_str().to_owned(),
            captures.get(2)?.as_str().to_owned(),
        ))
    }))
}

/// Rebuilds the specification a package was generated from.
///
/// Each class with scenarios becomes a feature: the title comes from the
/// class name, the story from the class docstring, scenario titles from
/// method names and steps from scenario docstrings. Class attributes that
/// read back as literal values rendering to the same text become plain
/// values; anything else is kept as a verbatim Python expression.
/// Classes without scenarios are skipped.
///
/// # Errors
///
/// Returns [`CoderError::Spec`] when the recovered documents do not resolve.
pub fn reconstruct_spec(sources: &PackageSources) -> Result<FeaturesSpecCollection, CoderError> {
    let docs: Vec<FeatureDoc> = sources
        .stories
        .classes()
        .values()
        .filter(|piece| !piece.scenarios().is_empty())
        .map(|piece| FeatureDoc {
            title: class_name_to_title(piece.name()),
            story: piece.docstring_lines().join("\n"),
            scenarios: piece
                .scenarios()
                .iter()
                .map(|(name, scenario)| (to_sentence(name), scenario.doc_lines()))
                .collect(),
            extra: piece
                .attributes()
                .into_iter()
                .map(|(name, expression)| (name, attribute_value(expression)))
                .collect::<IndexMap<_, _>>(),
        })
        .collect();
    FeaturesSpecCollection::from_documents(sources.aliases.clone(), &docs).map_err(CoderError::from)
}

fn attribute_value(expression: String) -> SpecValue {
    match serde_saphyr::from_str::<SpecValue>(&expression) {
        Ok(value) if value.to_python() == expression => value,
        _ => SpecValue::Python(expression),
    }
}
