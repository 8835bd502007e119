//! Check command implementation.

use std::path::PathBuf;

use listings::errors::{ListingsError, Result};
use listings::interface::{check_round_trip, clear_mismatch, code_path_urls, Context};

use super::helpers::for_each_file;

/// Options for the check command.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Specific files to check (empty means all).
    pub files: Vec<PathBuf>,
}

/// Parses each manuscript and verifies that it serializes back unchanged.
pub fn check(ctx: &Context, options: CheckOptions) -> Result<()> {
    for_each_file(ctx, &options.files, |path| {
        if clear_mismatch(path, &ctx.config, ctx.file_cache.as_ref())? {
            tracing::info!("Removed stale mismatch file for {}", path.display());
        }

        let doc = ctx.load_document(path)?;
        for url in code_path_urls(&doc) {
            println!("{}: url {}", path.display(), url);
        }

        match check_round_trip(&doc, &ctx.config, ctx.file_cache.as_ref()) {
            Ok(()) => {
                println!("{}: OK", path.display());
                Ok(())
            }
            Err(e @ ListingsError::RoundTrip { .. }) => {
                println!("{}: Not the same", path.display());
                Err(e)
            }
            Err(e) => Err(e),
        }
    })
}
