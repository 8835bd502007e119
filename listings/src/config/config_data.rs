//! Configuration data structures.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::language::LanguageRegistry;
use crate::errors::Result;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Glob patterns for manuscript files, relative to the working directory.
    #[serde(default = "default_source_patterns")]
    pub source_patterns: Vec<String>,

    /// Glob patterns removed from the matched manuscript files.
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Suffix replacing `.md` in regenerated sibling files.
    #[serde(default = "default_regenerated_suffix")]
    pub regenerated_suffix: String,

    /// Suffix appended to a manuscript name when its round-trip fails.
    #[serde(default = "default_mismatch_suffix")]
    pub mismatch_suffix: String,

    /// Default search root per language name, used when inserting code paths.
    #[serde(default)]
    pub search_roots: IndexMap<String, PathBuf>,
}

fn default_source_patterns() -> Vec<String> {
    vec!["*.md".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["*.tmp.md".to_string()]
}

fn default_regenerated_suffix() -> String {
    "tmp.md".to_string()
}

fn default_mismatch_suffix() -> String {
    "mtmp".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_patterns: default_source_patterns(),
            exclude_patterns: default_exclude_patterns(),
            regenerated_suffix: default_regenerated_suffix(),
            mismatch_suffix: default_mismatch_suffix(),
            search_roots: IndexMap::new(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the language registry for a run: the built-in table with the
    /// configured search roots applied.
    pub fn registry(&self) -> Result<LanguageRegistry> {
        let mut registry = LanguageRegistry::builtin();
        for (name, root) in &self.search_roots {
            registry.set_search_root(name, root.clone())?;
        }
        Ok(registry)
    }

    /// Returns the sibling path a regenerated manuscript is written to.
    pub fn regenerated_path(&self, path: &std::path::Path) -> PathBuf {
        path.with_extension(&self.regenerated_suffix)
    }

    /// Returns the side file path used when a round-trip fails.
    pub fn mismatch_path(&self, path: &std::path::Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(&self.mismatch_suffix);
        path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source_patterns, vec!["*.md"]);
        assert_eq!(config.exclude_patterns, vec!["*.tmp.md"]);
        assert!(config.search_roots.is_empty());
    }

    #[test]
    fn test_registry_applies_search_roots() {
        let mut config = Config::default();
        config
            .search_roots
            .insert("python".to_string(), PathBuf::from("../python-examples"));
        let registry = config.registry().unwrap();
        assert_eq!(
            registry.get("python").unwrap().search_root,
            Some(PathBuf::from("../python-examples"))
        );
        assert_eq!(registry.get("go").unwrap().search_root, None);
    }

    #[test]
    fn test_registry_rejects_unknown_language() {
        let mut config = Config::default();
        config
            .search_roots
            .insert("cobol".to_string(), PathBuf::from("/src"));
        assert!(config.registry().is_err());
    }

    #[test]
    fn test_sibling_paths() {
        let config = Config::default();
        assert_eq!(
            config.regenerated_path(Path::new("book/01 Intro.md")),
            PathBuf::from("book/01 Intro.tmp.md")
        );
        assert_eq!(
            config.mismatch_path(Path::new("book/01 Intro.md")),
            PathBuf::from("book/01 Intro.md.mtmp")
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
