//! Execution context for listing operations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, LanguageRegistry};
use crate::errors::Result;
use crate::io::{FileCache, RealFileCache};

use super::document::Document;
use super::validator::Validator;

/// Context for one run over a set of manuscripts.
///
/// Contains configuration, the language table, and file system access.
#[derive(Debug)]
pub struct Context {
    /// Configuration.
    pub config: Config,
    /// Languages with their configured search roots.
    pub registry: LanguageRegistry,
    /// File system access.
    pub file_cache: Arc<dyn FileCache>,
    /// Base directory for operations.
    pub base_dir: PathBuf,
}

impl Context {
    /// Creates a new context with the given configuration.
    pub fn new(config: Config, base_dir: PathBuf) -> Result<Self> {
        let file_cache = Arc::new(RealFileCache::new(base_dir.clone()));
        Self::with_file_cache(config, base_dir, file_cache)
    }

    /// Creates a context over an arbitrary file system.
    pub fn with_file_cache(
        config: Config,
        base_dir: PathBuf,
        file_cache: Arc<dyn FileCache>,
    ) -> Result<Self> {
        let registry = config.registry()?;
        Ok(Self {
            config,
            registry,
            file_cache,
            base_dir,
        })
    }

    /// Creates a context with default configuration.
    pub fn default_for_dir(base_dir: PathBuf) -> Result<Self> {
        Self::new(Config::default(), base_dir)
    }

    /// Creates a context from the configuration found at or above `base_dir`.
    pub fn for_dir(base_dir: PathBuf) -> Result<Self> {
        let config = crate::config::read_config(&base_dir)?;
        Self::new(config, base_dir)
    }

    /// Returns a validator over this context's file system.
    pub fn validator(&self) -> Validator<'_> {
        Validator::new(self.file_cache.as_ref(), &self.registry, &self.base_dir)
    }

    /// Loads and parses one manuscript.
    pub fn load_document(&self, path: &Path) -> Result<Document> {
        let doc = Document::load(&self.resolve_path(path), &self.registry)?;
        tracing::info!("Read {} ({} blocks)", path.display(), doc.len());
        Ok(doc)
    }

    /// Returns manuscript paths matching the source patterns and none of the
    /// exclude patterns.
    pub fn source_files(&self) -> Result<Vec<PathBuf>> {
        let excludes = self
            .config
            .exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut files = Vec::new();
        for pattern in &self.config.source_patterns {
            files.extend(
                self.file_cache
                    .glob(pattern)?
                    .into_iter()
                    .filter(|p| !excludes.iter().any(|e| e.matches_path(p))),
            );
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Returns the named files, or every source file when none are named.
    pub fn select_files(&self, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
        if files.is_empty() {
            return self.source_files();
        }
        let mut selected = files.to_vec();
        selected.sort();
        selected.dedup();
        Ok(selected)
    }

    /// Resolves a path relative to the base directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
