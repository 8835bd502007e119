//! Resolving listings to the source files they came from.

use std::path::{Path, PathBuf};

use crate::config::LanguageRegistry;
use crate::errors::{ListingsError, Result};
use crate::io::FileCache;
use crate::model::{CodeListing, CodePath};
use crate::text_location::TextLocation;

/// Checks code paths against the file system and synthesizes missing ones.
///
/// Relative paths in code paths and search roots are taken relative to
/// `base_dir`.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    fs: &'a dyn FileCache,
    registry: &'a LanguageRegistry,
    base_dir: &'a Path,
    document: Option<&'a Path>,
}

impl<'a> Validator<'a> {
    pub fn new(fs: &'a dyn FileCache, registry: &'a LanguageRegistry, base_dir: &'a Path) -> Self {
        Self {
            fs,
            registry,
            base_dir,
            document: None,
        }
    }

    /// Names the manuscript that errors should point into.
    pub fn in_document(mut self, document: Option<&'a Path>) -> Self {
        self.document = document;
        self
    }

    pub fn fs(&self) -> &'a dyn FileCache {
        self.fs
    }

    pub fn registry(&self) -> &'a LanguageRegistry {
        self.registry
    }

    /// Returns the file `listing` was taken from according to `code_path`.
    pub fn validate(&self, code_path: &CodePath, listing: &CodeListing) -> Result<PathBuf> {
        let dir = code_path.path.as_deref().ok_or_else(|| {
            self.error(
                listing,
                format!("code path at line {} has no 'path:' entry", code_path.line()),
            )
        })?;

        let dir = self.resolve(dir);
        if !self.fs.is_dir(&dir) {
            return Err(self.error(
                listing,
                format!("directory '{}' does not exist", dir.display()),
            ));
        }

        let file = dir.join(&listing.source_file_name);
        if !self.fs.exists(&file) || self.fs.is_dir(&file) {
            return Err(self.error(listing, format!("'{}' does not exist", file.display())));
        }

        tracing::debug!("Resolved {} to {}", listing.source_file_name, file.display());
        Ok(file)
    }

    /// Builds a code path for `listing` by searching its language's search
    /// root for a file of the same name.
    ///
    /// When several files match, the first one found wins.
    pub fn synthesize(&self, listing: &CodeListing) -> Result<CodePath> {
        let language = self.registry.get(&listing.language).ok_or_else(|| {
            self.error(listing, format!("unregistered language '{}'", listing.language))
        })?;

        let root = language.search_root.as_deref().ok_or_else(|| {
            self.error(
                listing,
                format!("no search root configured for language '{}'", language.name),
            )
        })?;

        let root = self.resolve(root);
        if !self.fs.is_dir(&root) {
            return Err(self.error(
                listing,
                format!("search root '{}' does not exist", root.display()),
            ));
        }

        let found = self
            .fs
            .find_first(&root, &listing.source_file_name)?
            .ok_or_else(|| {
                self.error(
                    listing,
                    format!(
                        "no file named '{}' under '{}'",
                        listing.source_file_name,
                        root.display()
                    ),
                )
            })?;

        let dir = found.parent().unwrap_or_else(|| Path::new(""));
        let dir = dir.strip_prefix(self.base_dir).unwrap_or(dir);
        tracing::debug!(
            "Found {} in {}",
            listing.source_file_name,
            dir.display()
        );
        Ok(CodePath::for_directory(dir, listing.line))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn error(&self, listing: &CodeListing, message: String) -> ListingsError {
        ListingsError::path_resolution(TextLocation::at(self.document, listing.line), message)
    }
}
