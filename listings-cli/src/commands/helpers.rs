//! Shared command helpers.

use std::path::{Path, PathBuf};

use listings::errors::{ListingsError, Result};
use listings::interface::{output_transaction, Context, Document};

/// Runs `run` on each selected manuscript.
///
/// A failure is logged and the batch moves on to the next file; the batch
/// fails at the end if any file did.
pub fn for_each_file<F>(ctx: &Context, files: &[PathBuf], mut run: F) -> Result<()>
where
    F: FnMut(&Path) -> Result<()>,
{
    let selected = ctx.select_files(&expand_patterns(ctx, files)?)?;
    if selected.is_empty() {
        println!("No manuscripts found.");
        return Ok(());
    }

    let mut failed = 0;
    for path in &selected {
        if let Err(e) = run(path) {
            tracing::error!("{}: {}", path.display(), e);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(ListingsError::Other(format!(
            "{} of {} files failed",
            failed,
            selected.len()
        )));
    }
    Ok(())
}

/// Expands arguments containing glob characters relative to the base directory.
fn expand_patterns(ctx: &Context, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();
    for file in files {
        let text = file.to_string_lossy();
        if !text.contains(['*', '?', '[']) {
            expanded.push(file.clone());
            continue;
        }

        let pattern = ctx.resolve_path(file);
        let before = expanded.len();
        expanded.extend(glob::glob(&pattern.to_string_lossy())?.filter_map(|r| r.ok()));
        if expanded.len() == before {
            return Err(ListingsError::Config(format!(
                "Glob pattern '{}' matched no files",
                text
            )));
        }
    }
    Ok(expanded)
}

/// Writes a modified document next to the original, or over it with `apply`.
pub fn write_document(ctx: &Context, doc: &Document, apply: bool) -> Result<()> {
    let transaction = output_transaction(doc, &ctx.config, apply)?;
    transaction.execute(ctx.file_cache.as_ref())?;
    for action in transaction.actions() {
        println!("Wrote {}", action.describe());
    }
    Ok(())
}
