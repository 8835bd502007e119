//! Blocks of a parsed manuscript.

use std::fmt;
use std::path::PathBuf;

/// Metadata line prefix naming the directory of subsequent listings.
pub const PATH_PREFIX: &str = "path:";
/// Metadata line prefix naming a URL for subsequent listings.
pub const URL_PREFIX: &str = "url:";
/// Comment open and close marker.
pub const COMMENT_MARKER: &str = "%%";
/// Code fence.
pub const FENCE: &str = "```";

/// Ordinary markdown text between listings and comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prose {
    /// The text, verbatim.
    pub text: String,
    /// Line the text starts on (1-indexed).
    pub line: usize,
}

/// A fenced source-code listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeListing {
    /// Language token from the opening fence.
    pub language: String,
    /// File named on the slug line; empty when the language needs none or
    /// the listing is ignore-flagged.
    pub source_file_name: String,
    /// Everything strictly between the fences, slug line included.
    pub code: String,
    /// Set by a trailing `!` on the opening fence.
    pub ignore: bool,
    /// Whether the language requires a slug line.
    pub requires_file_name: bool,
    /// Opening fence through closing fence, verbatim.
    pub raw: String,
    /// Line of the opening fence (1-indexed).
    pub line: usize,
}

impl CodeListing {
    /// Returns true if this listing is tied to a source file on disk.
    pub fn needs_validation(&self) -> bool {
        self.requires_file_name && !self.ignore
    }

    /// Returns the opening fence line including its line ending.
    pub fn fence_line(&self) -> &str {
        first_line(&self.raw)
    }

    /// Returns the closing fence line including its line ending, if any.
    pub fn closing_line(&self) -> &str {
        let without_last = self.raw.trim_end_matches(['\n', '\r']);
        let start = without_last.rfind('\n').map(|i| i + 1).unwrap_or(0);
        &self.raw[start..]
    }

    /// Returns the code after the slug line.
    ///
    /// For listings without a source file name this is the whole code.
    pub fn body(&self) -> &str {
        if self.source_file_name.is_empty() {
            return &self.code;
        }
        let slug = first_line(&self.code);
        &self.code[slug.len()..]
    }
}

/// A `%%` comment block without metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Lines between the markers, verbatim with their line endings.
    pub lines: Vec<String>,
    /// Opening marker through closing marker, verbatim.
    pub raw: String,
    /// Line of the opening marker (1-indexed).
    pub line: usize,
}

impl Comment {
    /// Returns true if any interior line carries `path:` or `url:` metadata.
    pub fn has_metadata(&self) -> bool {
        self.lines
            .iter()
            .any(|l| l.starts_with(PATH_PREFIX) || l.starts_with(URL_PREFIX))
    }

    fn metadata(&self, prefix: &str) -> Option<String> {
        self.lines
            .iter()
            .find_map(|l| l.strip_prefix(prefix))
            .map(|rest| rest.trim().to_string())
    }
}

/// A comment block recording where subsequent listings live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePath {
    /// The underlying comment.
    pub comment: Comment,
    /// Directory from the `path:` line.
    pub path: Option<PathBuf>,
    /// Value of the `url:` line.
    pub url: Option<String>,
}

impl CodePath {
    /// Creates a code path block for `dir`, as inserted ahead of a listing.
    pub fn for_directory(dir: impl Into<PathBuf>, line: usize) -> Self {
        let dir = dir.into();
        let path_line = format!("{} {}\n", PATH_PREFIX, display_path(&dir));
        let raw = format!("{0}\n{1}{0}\n", COMMENT_MARKER, path_line);
        Self {
            comment: Comment {
                lines: vec![path_line],
                raw,
                line,
            },
            path: Some(dir),
            url: None,
        }
    }

    /// Interprets a comment; returns it unchanged if it has no metadata.
    pub fn from_comment(comment: Comment) -> std::result::Result<Self, Comment> {
        if !comment.has_metadata() {
            return Err(comment);
        }
        let path = comment
            .metadata(PATH_PREFIX)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        let url = comment.metadata(URL_PREFIX).filter(|u| !u.is_empty());
        Ok(Self { comment, path, url })
    }

    /// Line of the opening marker.
    pub fn line(&self) -> usize {
        self.comment.line
    }
}

/// One block of a manuscript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Prose(Prose),
    Listing(CodeListing),
    Comment(Comment),
    CodePath(CodePath),
}

impl Block {
    /// Classifies a parsed comment as a plain comment or a code path.
    pub fn from_comment(comment: Comment) -> Self {
        match CodePath::from_comment(comment) {
            Ok(code_path) => Block::CodePath(code_path),
            Err(comment) => Block::Comment(comment),
        }
    }

    /// Returns the block's canonical text, which is its original text.
    pub fn raw(&self) -> &str {
        match self {
            Block::Prose(p) => &p.text,
            Block::Listing(l) => &l.raw,
            Block::Comment(c) => &c.raw,
            Block::CodePath(cp) => &cp.comment.raw,
        }
    }

    /// Returns the line the block starts on.
    pub fn line(&self) -> usize {
        match self {
            Block::Prose(p) => p.line,
            Block::Listing(l) => l.line,
            Block::Comment(c) => c.line,
            Block::CodePath(cp) => cp.comment.line,
        }
    }

    /// Returns a short name for the block kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Prose(_) => "prose",
            Block::Listing(_) => "listing",
            Block::Comment(_) => "comment",
            Block::CodePath(_) => "code path",
        }
    }

    /// Returns the listing if this is one.
    pub fn as_listing(&self) -> Option<&CodeListing> {
        match self {
            Block::Listing(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the code path if this is one.
    pub fn as_code_path(&self) -> Option<&CodePath> {
        match self {
            Block::CodePath(cp) => Some(cp),
            _ => None,
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}

fn first_line(text: &str) -> &str {
    match text.find('\n') {
        Some(i) => &text[..=i],
        None => text,
    }
}

/// Paths in code path comments use forward slashes on every platform.
fn display_path(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
