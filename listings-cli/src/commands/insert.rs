//! Insert-paths command implementation.

use std::path::PathBuf;

use listings::errors::Result;
use listings::interface::{insert_code_paths, Context};

use super::helpers::{for_each_file, write_document};

/// Options for the insert-paths command.
#[derive(Debug, Clone, Default)]
pub struct InsertOptions {
    /// Replace the manuscript instead of writing the regenerated sibling.
    pub apply: bool,
    pub files: Vec<PathBuf>,
}

/// Adds a code path comment ahead of every listing that lacks a valid one.
pub fn insert_paths(ctx: &Context, options: InsertOptions) -> Result<()> {
    let validator = ctx.validator();
    for_each_file(ctx, &options.files, |path| {
        let mut doc = ctx.load_document(path)?;
        let inserted = insert_code_paths(&mut doc, &validator)?;
        if inserted == 0 {
            println!("{}: no code paths needed", path.display());
            return Ok(());
        }
        println!("{}: inserted {} code paths", path.display(), inserted);
        write_document(ctx, &doc, options.apply)
    })
}
