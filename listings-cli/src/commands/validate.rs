//! Validate-paths command implementation.

use std::path::PathBuf;

use listings::errors::{ListingsError, Result};
use listings::interface::Context;

use super::helpers::for_each_file;

/// Options for the validate-paths command.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    pub files: Vec<PathBuf>,
}

/// Reports, without changing anything, whether each listing resolves to a
/// file on disk.
pub fn validate_paths(ctx: &Context, options: ValidateOptions) -> Result<()> {
    for_each_file(ctx, &options.files, |path| {
        let doc = ctx.load_document(path)?;
        let validator = ctx.validator().in_document(doc.path());

        let mut unresolved = 0;
        for item in doc.code_path_then_listing() {
            match item.and_then(|(cp, listing)| validator.validate(cp, listing)) {
                Ok(file) => println!("  OK {}", file.display()),
                Err(e) => {
                    println!("  {}", e);
                    unresolved += 1;
                }
            }
        }

        if unresolved > 0 {
            return Err(ListingsError::Other(format!(
                "{} listings could not be resolved",
                unresolved
            )));
        }
        Ok(())
    })
}
