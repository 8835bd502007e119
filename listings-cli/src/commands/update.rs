//! Update command implementation.

use std::path::PathBuf;

use listings::errors::Result;
use listings::interface::{update_listings, Context, Outcome, UpdateAction, UpdatePolicy};

use super::helpers::{for_each_file, write_document};

/// Options for the update command.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Also overwrite listings whose content differs from the file.
    pub include_content: bool,
    /// Replace the manuscript instead of writing the regenerated sibling.
    pub apply: bool,
    /// Print the diff of every replaced listing.
    pub diff: bool,
    pub files: Vec<PathBuf>,
}

/// Replaces embedded listings with the contents of their source files.
pub fn update(ctx: &Context, options: UpdateOptions) -> Result<()> {
    let policy = if options.include_content {
        UpdatePolicy::IncludeContent
    } else {
        UpdatePolicy::WhitespaceOnly
    };
    let validator = ctx.validator();

    for_each_file(ctx, &options.files, |path| {
        let mut doc = ctx.load_document(path)?;
        let reports = update_listings(&mut doc, &validator, policy)?;

        for report in &reports {
            let listing = &report.listing;
            let status = match (&report.action, &listing.outcome) {
                (UpdateAction::Replaced, _) => "updated".to_string(),
                (UpdateAction::Failed(message), _) => format!("not updated: {}", message),
                (UpdateAction::Kept, Outcome::Compared { comparison, .. }) => {
                    comparison.result.description().to_string()
                }
                (UpdateAction::Kept, Outcome::Unresolved { message }) => message.clone(),
            };
            println!(
                "{}:{} {}: {}",
                path.display(),
                listing.line,
                listing.source_file_name,
                status
            );
            if let (true, UpdateAction::Replaced, Outcome::Compared { comparison, .. }) =
                (options.diff, &report.action, &listing.outcome)
            {
                for line in &comparison.lines {
                    println!("    {}", line);
                }
            }
        }

        if doc.is_modified() {
            write_document(ctx, &doc, options.apply)
        } else {
            println!("{}: no changes", path.display());
            Ok(())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn setup(file: &str, listing_body: &str) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/a.py"), file).unwrap();
        fs::write(
            dir.path().join("ch.md"),
            format!("%%\npath: src\n%%\n```python\n# a.py\n{}```\n", listing_body),
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_update_whitespace_difference() {
        let dir = setup("# a.py\n\nprint(1)\n", "print(1)\n");
        let ctx = Context::default_for_dir(dir.path().to_path_buf()).unwrap();

        update(&ctx, UpdateOptions::default()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("ch.tmp.md")).unwrap(),
            "%%\npath: src\n%%\n```python\n# a.py\n\nprint(1)\n```\n"
        );
    }

    #[test]
    fn test_update_content_needs_flag() {
        let dir = setup("# a.py\nprint(2)\n", "print(1)\n");
        let ctx = Context::default_for_dir(dir.path().to_path_buf()).unwrap();

        update(&ctx, UpdateOptions::default()).unwrap();
        assert!(!dir.path().join("ch.tmp.md").exists());

        let options = UpdateOptions {
            include_content: true,
            apply: true,
            diff: true,
            ..Default::default()
        };
        update(&ctx, options).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("ch.md")).unwrap(),
            "%%\npath: src\n%%\n```python\n# a.py\nprint(2)\n```\n"
        );
    }
}
