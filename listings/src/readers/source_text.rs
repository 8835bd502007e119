//! Line-at-a-time access to one input file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::LanguageRegistry;
use crate::errors::{ListingsError, Result};
use crate::text_location::TextLocation;

/// The full text of one file, delivered a line at a time.
///
/// Lines keep their line endings so that concatenating them reproduces the
/// input exactly. The cursor moves forward only.
#[derive(Debug, Clone)]
pub struct SourceText {
    path: Option<PathBuf>,
    original: String,
    /// Byte ranges of each line within `original`.
    lines: Vec<(usize, usize)>,
    cursor: usize,
}

impl SourceText {
    /// Opens a markdown manuscript.
    pub fn open_markdown(path: &Path) -> Result<Self> {
        check_file(path)?;
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            return Err(invalid(path, "does not end with '.md'"));
        }
        let text = fs::read_to_string(path)?;
        Ok(Self::from_text(text, Some(path.to_path_buf())))
    }

    /// Opens a source file whose extension belongs to a registered language.
    pub fn open_source_file(path: &Path, registry: &LanguageRegistry) -> Result<Self> {
        check_file(path)?;
        if registry.for_path(path).is_none() {
            return Err(invalid(path, "does not have a registered code-language extension"));
        }
        let text = fs::read_to_string(path)?;
        Ok(Self::from_text(text, Some(path.to_path_buf())))
    }

    /// Wraps in-memory text.
    pub fn from_text(text: impl Into<String>, path: Option<PathBuf>) -> Self {
        let original = text.into();
        let mut lines = Vec::new();
        let mut start = 0;
        for line in original.split_inclusive('\n') {
            lines.push((start, start + line.len()));
            start += line.len();
        }
        Self {
            path,
            original,
            lines,
            cursor: 0,
        }
    }

    /// Returns true while lines remain.
    pub fn has_next(&self) -> bool {
        self.cursor < self.lines.len()
    }

    /// Returns the current line and advances past it.
    pub fn next_line(&mut self) -> Option<&str> {
        let (start, end) = *self.lines.get(self.cursor)?;
        self.cursor += 1;
        Some(&self.original[start..end])
    }

    /// Returns the current line without advancing.
    pub fn peek(&self) -> Option<&str> {
        self.lines
            .get(self.cursor)
            .map(|&(start, end)| &self.original[start..end])
    }

    /// Returns the 1-based number of the line `peek` would return.
    pub fn line_number(&self) -> usize {
        self.cursor + 1
    }

    /// Returns the file this text came from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the complete original text.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Returns the number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the text has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Builds a location in this file.
    pub fn location(&self, line: usize) -> TextLocation {
        TextLocation::at(self.path(), line)
    }
}

fn check_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(invalid(path, "does not exist"));
    }
    if path.is_dir() {
        return Err(invalid(path, "is a directory"));
    }
    Ok(())
}

fn invalid(path: &Path, reason: &str) -> ListingsError {
    ListingsError::InvalidInput {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
