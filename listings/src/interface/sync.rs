//! Keeping embedded listings and their source files in step.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::document::{fenced, listing_code, Document};
use super::validator::Validator;
use crate::config::Config;
use crate::errors::{ListingsError, Result};
use crate::io::{FileCache, Output, Transaction};
use crate::model::{compare, Block, CodeListing, CodePath, Comparison, DiffResult};

/// The outcome of comparing one listing with its source file.
#[derive(Debug, Clone, Serialize)]
pub struct ListingReport {
    /// Line of the listing's opening fence.
    pub line: usize,
    pub language: String,
    pub source_file_name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
    /// The source file was found and compared.
    Compared { file: PathBuf, comparison: Comparison },
    /// The listing could not be tied to a readable file.
    Unresolved { message: String },
}

impl ListingReport {
    fn new(listing: &CodeListing, outcome: Outcome) -> Self {
        Self {
            line: listing.line,
            language: listing.language.clone(),
            source_file_name: listing.source_file_name.clone(),
            outcome,
        }
    }

    /// Returns the diff classification, if the listing was compared.
    pub fn result(&self) -> Option<DiffResult> {
        match &self.outcome {
            Outcome::Compared { comparison, .. } => Some(comparison.result),
            Outcome::Unresolved { .. } => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.outcome, Outcome::Unresolved { .. })
    }
}

/// Which differences `update_listings` may overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Replace listings that differ from their file in blank lines only.
    #[default]
    WhitespaceOnly,
    /// Also replace listings whose content differs.
    IncludeContent,
}

impl UpdatePolicy {
    pub fn replaces(&self, result: DiffResult) -> bool {
        match result {
            DiffResult::Match => false,
            DiffResult::WhitespaceOnly => true,
            DiffResult::ContentDiffers => *self == UpdatePolicy::IncludeContent,
        }
    }
}

/// What `update_listings` did with one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    Replaced,
    Kept,
    /// The file's contents could not be turned into a listing.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub listing: ListingReport,
    pub action: UpdateAction,
}

/// Compares every listing that names a source file against that file.
///
/// Listings that cannot be resolved are reported and the walk continues.
pub fn compare_listings(doc: &Document, validator: &Validator<'_>) -> Vec<ListingReport> {
    let validator = validator.in_document(doc.path());
    let mut reports = Vec::new();

    for item in doc.code_path_then_listing() {
        let report = match item {
            Ok((code_path, listing)) => compare_one(code_path, listing, &validator),
            Err(e) => match listing_for(doc, &e) {
                Some(listing) => ListingReport::new(listing, unresolved(&e)),
                None => continue,
            },
        };
        match &report.outcome {
            Outcome::Compared { comparison, .. } => tracing::debug!(
                "{} (line {}): {}",
                report.source_file_name,
                report.line,
                comparison.result
            ),
            Outcome::Unresolved { message } => tracing::warn!("{}", message),
        }
        reports.push(report);
    }

    reports
}

/// Finds the listing an error points at.
fn listing_for<'d>(doc: &'d Document, error: &ListingsError) -> Option<&'d CodeListing> {
    let line = error.location()?.line;
    doc.code_listings().into_iter().find(|l| l.line == line)
}

fn compare_one(code_path: &CodePath, listing: &CodeListing, validator: &Validator<'_>) -> ListingReport {
    let outcome = validator
        .validate(code_path, listing)
        .and_then(|file| {
            let contents = validator.fs().read(&file).map_err(|e| {
                ListingsError::Other(format!("cannot read {}: {}", file.display(), e))
            })?;
            Ok(Outcome::Compared {
                comparison: compare(&listing.code, &listing_code(&contents)),
                file,
            })
        })
        .unwrap_or_else(|e| unresolved(&e));
    ListingReport::new(listing, outcome)
}

fn unresolved(error: &ListingsError) -> Outcome {
    Outcome::Unresolved {
        message: error.to_string(),
    }
}

/// Replaces listings with the contents of their source files.
///
/// Which differences are overwritten is decided by `policy`. The replacement
/// keeps the listing's own fence lines, so an ignore flag survives.
pub fn update_listings(
    doc: &mut Document,
    validator: &Validator<'_>,
    policy: UpdatePolicy,
) -> Result<Vec<UpdateReport>> {
    let mut updates = Vec::new();

    for report in compare_listings(doc, validator) {
        let source = match &report.outcome {
            Outcome::Compared { file, comparison } if policy.replaces(comparison.result) => {
                Some(file.clone())
            }
            _ => None,
        };
        let Some(file) = source else {
            updates.push(UpdateReport {
                listing: report,
                action: UpdateAction::Kept,
            });
            continue;
        };

        let index = doc
            .blocks()
            .iter()
            .position(|b| b.as_listing().is_some_and(|l| l.line == report.line))
            .ok_or(ListingsError::BlockNotFound)?;
        let template = doc.blocks()[index]
            .as_listing()
            .cloned()
            .ok_or(ListingsError::BlockNotFound)?;

        let action = match rebuild_listing(&template, &file, validator) {
            Ok(listing) => {
                doc.replace(index, Block::Listing(listing))?;
                tracing::info!("Updated {} from {}", template.source_file_name, file.display());
                UpdateAction::Replaced
            }
            Err(e) => {
                tracing::warn!("{}", e);
                UpdateAction::Failed(e.to_string())
            }
        };
        updates.push(UpdateReport {
            listing: report,
            action,
        });
    }

    Ok(updates)
}

/// Builds a listing from a source file, wrapped in `template`'s fences.
fn rebuild_listing(template: &CodeListing, file: &Path, validator: &Validator<'_>) -> Result<CodeListing> {
    let contents = validator.fs().read(file)?;
    let text = fenced(template.fence_line(), &contents, template.closing_line());
    let fragment = Document::from_text(text, Some(file.to_path_buf()), validator.registry())?;

    match fragment.blocks() {
        [Block::Listing(listing)] => {
            let mut listing = listing.clone();
            listing.line = template.line;
            Ok(listing)
        }
        _ => Err(ListingsError::Other(format!(
            "{} does not form a single listing",
            file.display()
        ))),
    }
}

/// Inserts a code path ahead of each listing that has no valid one.
///
/// Running this twice inserts nothing the second time. Any listing whose
/// code path cannot be synthesized fails the whole document.
pub fn insert_code_paths(doc: &mut Document, validator: &Validator<'_>) -> Result<usize> {
    let validator = validator.in_document(doc.path());
    let mut insertions: Vec<(usize, CodePath)> = Vec::new();
    let mut current: Option<CodePath> = None;

    for (index, block) in doc.blocks().iter().enumerate() {
        match block {
            Block::CodePath(cp) => current = Some(cp.clone()),
            Block::Listing(listing) if listing.needs_validation() => {
                let valid = current
                    .as_ref()
                    .is_some_and(|cp| validator.validate(cp, listing).is_ok());
                if !valid {
                    let cp = validator.synthesize(listing)?;
                    tracing::debug!(
                        "Inserting code path for {} at line {}",
                        listing.source_file_name,
                        listing.line
                    );
                    current = Some(cp.clone());
                    insertions.push((index, cp));
                }
            }
            Block::Listing(_) | Block::Prose(_) | Block::Comment(_) => {}
        }
    }

    let count = insertions.len();
    for (index, cp) in insertions.into_iter().rev() {
        doc.insert(index, Block::CodePath(cp))?;
    }
    Ok(count)
}

/// Verifies that the document serializes back to its input.
///
/// On a mismatch the regenerated text is written to the mismatch side file
/// and a `RoundTrip` error names it.
pub fn check_round_trip(doc: &Document, config: &Config, fs: &dyn FileCache) -> Result<()> {
    if doc.is_round_trip() {
        return Ok(());
    }
    let path = doc
        .path()
        .ok_or_else(|| ListingsError::Other("round-trip mismatch in unnamed document".to_string()))?;
    let side_file = config.mismatch_path(path);

    let mut transaction = Transaction::new();
    transaction.write(Output::Mismatch, &side_file, doc.serialize());
    transaction.execute(fs)?;

    Err(ListingsError::RoundTrip {
        path: path.to_path_buf(),
        side_file,
    })
}

/// Deletes a mismatch side file left by an earlier run.
pub fn clear_mismatch(path: &Path, config: &Config, fs: &dyn FileCache) -> Result<bool> {
    let side_file = config.mismatch_path(path);
    if !fs.exists(&side_file) {
        return Ok(false);
    }
    fs.remove(&side_file)?;
    tracing::debug!("Removed stale {}", side_file.display());
    Ok(true)
}

/// Queues the document's text for writing.
///
/// With `apply` the original file is replaced, otherwise the text goes to the
/// regenerated sibling file.
pub fn output_transaction(doc: &Document, config: &Config, apply: bool) -> Result<Transaction> {
    let path = doc
        .path()
        .ok_or_else(|| ListingsError::Other("cannot write an unnamed document".to_string()))?;
    let (output, target) = if apply {
        (Output::Replaced, path.to_path_buf())
    } else {
        (Output::Regenerated, config.regenerated_path(path))
    };

    let mut transaction = Transaction::new();
    transaction.write(output, target, doc.serialize());
    Ok(transaction)
}

/// Returns `language: file` for every listing tied to a source file.
pub fn listing_summaries(doc: &Document) -> Vec<String> {
    doc.code_listings()
        .into_iter()
        .filter(|l| l.needs_validation())
        .map(|l| format!("{}: {}", l.language, l.source_file_name))
        .collect()
}

/// Returns the `url:` values of the document's code paths.
pub fn code_path_urls(doc: &Document) -> Vec<&str> {
    doc.code_paths()
        .into_iter()
        .filter_map(|cp| cp.url.as_deref())
        .collect()
}
