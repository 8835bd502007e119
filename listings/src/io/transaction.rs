//! Deferred writes, performed only once a file's transformation succeeded.

use std::fmt;
use std::path::{Path, PathBuf};

use super::file_cache::FileCache;
use crate::errors::Result;

/// What a queued write produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// A sibling copy of a manuscript, left for review.
    Regenerated,
    /// The manuscript itself.
    Replaced,
    /// Text that failed to round-trip, kept for inspection.
    Mismatch,
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Output::Regenerated => "regenerated",
            Output::Replaced => "replaced",
            Output::Mismatch => "mismatch",
        })
    }
}

/// One whole-file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAction {
    pub output: Output,
    pub path: PathBuf,
    pub content: String,
}

impl WriteAction {
    pub fn target(&self) -> &Path {
        &self.path
    }

    /// Returns e.g. `regenerated ch1.tmp.md`.
    pub fn describe(&self) -> String {
        format!("{} {}", self.output, self.path.display())
    }
}

/// Writes queued while a document is transformed.
///
/// Nothing touches the file system until [`Transaction::execute`].
#[derive(Debug, Default)]
pub struct Transaction {
    actions: Vec<WriteAction>,
}

impl Transaction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `content` for `path`.
    pub fn write(&mut self, output: Output, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.actions.push(WriteAction {
            output,
            path: path.into(),
            content: content.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[WriteAction] {
        &self.actions
    }

    pub fn describe(&self) -> Vec<String> {
        self.actions.iter().map(WriteAction::describe).collect()
    }

    /// Performs every write in order, stopping at the first failure.
    pub fn execute(&self, fs: &dyn FileCache) -> Result<()> {
        for action in &self.actions {
            tracing::debug!("Writing {}", action.describe());
            fs.write(&action.path, &action.content)?;
        }
        Ok(())
    }
}
