//! Language registry for code listings.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::{ListingsError, Result};

/// What the tool knows about one listing language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    /// Language name as written after the opening fence, e.g. "python".
    pub name: String,
    /// Source file extension including the dot, e.g. ".py".
    pub file_extension: String,
    /// Single-line comment token used by the slug line.
    pub comment: Option<String>,
    /// Directory searched when a listing needs a code path synthesized.
    pub search_root: Option<PathBuf>,
    /// Whether listings must name their source file on the slug line.
    pub requires_file_name: bool,
}

impl LanguageInfo {
    /// Creates a language whose listings carry a slug line.
    pub fn new(
        name: impl Into<String>,
        file_extension: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            file_extension: file_extension.into(),
            comment: Some(comment.into()),
            search_root: None,
            requires_file_name: true,
        }
    }

    /// Creates a language for listings that are not tied to a source file.
    pub fn plain(name: impl Into<String>, file_extension: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_extension: file_extension.into(),
            comment: None,
            search_root: None,
            requires_file_name: false,
        }
    }

    /// Sets the default search root.
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_root = Some(root.into());
        self
    }

    /// Checks if this language matches a name or a file extension.
    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.file_extension == key
    }

    /// Extracts the source file name from a slug line.
    ///
    /// The trimmed line must start with the comment token and end with the
    /// file extension, and the name between them must be more than the bare
    /// extension.
    pub fn slug_file_name<'a>(&self, line: &'a str) -> Option<&'a str> {
        let comment = self.comment.as_deref()?;
        let line = line.trim();
        let name = line.strip_prefix(comment)?.trim();
        if !name.ends_with(&self.file_extension) || name == self.file_extension {
            return None;
        }
        Some(name)
    }

    /// Builds the slug line naming `file_name`, without a line ending.
    pub fn slug_line(&self, file_name: &str) -> Option<String> {
        self.comment
            .as_ref()
            .map(|comment| format!("{} {}", comment, file_name))
    }
}

/// Lookup table from language name or extension to [`LanguageInfo`].
///
/// Built once per run and passed explicitly to the parser and validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LanguageRegistry {
    languages: IndexMap<String, LanguageInfo>,
}

impl LanguageRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in language table.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for lang in super::templates::builtin_languages() {
            registry.insert(lang.clone());
        }
        registry
    }

    /// Adds or replaces a language, keyed by name.
    pub fn insert(&mut self, language: LanguageInfo) {
        self.languages.insert(language.name.clone(), language);
    }

    /// Sets the search root of a registered language.
    pub fn set_search_root(&mut self, name: &str, root: impl Into<PathBuf>) -> Result<()> {
        let lang = self.languages.get_mut(name).ok_or_else(|| {
            ListingsError::Config(format!("search root given for unknown language '{}'", name))
        })?;
        lang.search_root = Some(root.into());
        Ok(())
    }

    /// Looks up a language by name or by extension (".py").
    pub fn get(&self, key: &str) -> Option<&LanguageInfo> {
        self.languages
            .get(key)
            .or_else(|| self.languages.values().find(|lang| lang.matches(key)))
    }

    /// Looks up the language of a source file from its extension.
    pub fn for_path(&self, path: &Path) -> Option<&LanguageInfo> {
        let ext = path.extension()?.to_str()?;
        self.get(&format!(".{}", ext))
    }

    /// Returns true if `key` names a registered language or extension.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over the registered languages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LanguageInfo> {
        self.languages.values()
    }

    /// Returns the number of registered languages.
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Returns true if no languages are registered.
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
