//! Error types for listing maintenance.

use std::path::PathBuf;
use thiserror::Error;

use crate::text_location::TextLocation;

/// Main error type for listing operations.
#[derive(Error, Debug)]
pub enum ListingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    /// The scanner refused to open its input.
    #[error("[{}] {reason}", path.display())]
    InvalidInput { path: PathBuf, reason: String },

    /// Unterminated or nested fence, unterminated comment.
    #[error("Structural error at {location}: {message}")]
    Structural { location: TextLocation, message: String },

    /// Missing or unregistered language token on a fence.
    #[error("Language error at {location}: {message}")]
    Language { location: TextLocation, message: String },

    /// Slug line does not name a source file the way the language requires.
    #[error("Filename error at {location}: {message}")]
    Filename { location: TextLocation, message: String },

    /// A listing could not be tied to a file on disk.
    #[error("Path resolution error at {location}: {message}")]
    PathResolution { location: TextLocation, message: String },

    /// Serializing the parsed document did not reproduce the input.
    #[error("Round-trip mismatch in {}: regenerated text written to {}", path.display(), side_file.display())]
    RoundTrip { path: PathBuf, side_file: PathBuf },

    #[error("Block not found in document")]
    BlockNotFound,

    #[error("{0}")]
    Other(String),
}

impl ListingsError {
    pub(crate) fn structural(location: TextLocation, message: impl Into<String>) -> Self {
        Self::Structural {
            location,
            message: message.into(),
        }
    }

    pub(crate) fn language(location: TextLocation, message: impl Into<String>) -> Self {
        Self::Language {
            location,
            message: message.into(),
        }
    }

    pub(crate) fn filename(location: TextLocation, message: impl Into<String>) -> Self {
        Self::Filename {
            location,
            message: message.into(),
        }
    }

    pub(crate) fn path_resolution(location: TextLocation, message: impl Into<String>) -> Self {
        Self::PathResolution {
            location,
            message: message.into(),
        }
    }

    /// Returns true for errors raised while parsing a document.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Structural { .. } | Self::Language { .. } | Self::Filename { .. }
        )
    }

    /// Returns the location attached to this error, if any.
    pub fn location(&self) -> Option<&TextLocation> {
        match self {
            Self::Structural { location, .. }
            | Self::Language { location, .. }
            | Self::Filename { location, .. }
            | Self::PathResolution { location, .. } => Some(location),
            _ => None,
        }
    }
}

/// Result type alias for listing operations.
pub type Result<T> = std::result::Result<T, ListingsError>;
