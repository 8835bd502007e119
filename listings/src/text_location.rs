//! Text location tracking for error reporting.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Represents a location within a text file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TextLocation {
    /// The file path (if known).
    pub filename: Option<PathBuf>,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl TextLocation {
    /// Creates a TextLocation with only line information.
    pub fn line_only(line: usize) -> Self {
        Self {
            filename: None,
            line,
            column: 1,
        }
    }

    /// Creates a TextLocation with file and line.
    pub fn file_line(filename: PathBuf, line: usize) -> Self {
        Self {
            filename: Some(filename),
            line,
            column: 1,
        }
    }

    /// Creates a location at `line`, attached to `filename` when one is known.
    pub fn at(filename: Option<&std::path::Path>, line: usize) -> Self {
        Self {
            filename: filename.map(|p| p.to_path_buf()),
            line,
            column: 1,
        }
    }
}

impl Default for TextLocation {
    fn default() -> Self {
        Self {
            filename: None,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(path) => write!(f, "{}:{}:{}", path.display(), self.line, self.column),
            None => write!(f, "line {}:{}", self.line, self.column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_filename() {
        let loc = TextLocation::file_line(PathBuf::from("test.md"), 10);
        assert_eq!(format!("{}", loc), "test.md:10:1");
    }

    #[test]
    fn test_display_without_filename() {
        let loc = TextLocation::line_only(10);
        assert_eq!(format!("{}", loc), "line 10:1");
    }

    #[test]
    fn test_at_optional_file() {
        let loc = TextLocation::at(None, 4);
        assert!(loc.filename.is_none());
        let loc = TextLocation::at(Some(std::path::Path::new("a.md")), 4);
        assert_eq!(loc.filename, Some(PathBuf::from("a.md")));
    }
}
