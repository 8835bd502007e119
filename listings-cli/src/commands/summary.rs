//! Listings command implementation.

use std::path::{Path, PathBuf};

use listings::errors::Result;
use listings::interface::{listing_summaries, Context, Document};

use super::helpers::for_each_file;

/// Options for the listings command.
#[derive(Debug, Clone, Default)]
pub struct ListingsOptions {
    pub files: Vec<PathBuf>,
}

/// Prints `language: file` for each listing tied to a source file.
pub fn listings(ctx: &Context, options: ListingsOptions) -> Result<()> {
    for_each_file(ctx, &options.files, |path| {
        let doc = ctx.load_document(path)?;
        print!("{}", render_summaries(path, &doc));
        Ok(())
    })
}

fn render_summaries(path: &Path, doc: &Document) -> String {
    let mut out = format!("{}\n", path.display());
    for summary in listing_summaries(doc) {
        out.push_str(&format!("  {}\n", summary));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_listings() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("ch.md"),
            "```rust\n// main.rs\nfn main() {}\n```\n```text\noutput\n```\n```python!\n# skip.py\n```\n```python\n# util.py\n```\n",
        )
        .unwrap();

        let ctx = Context::default_for_dir(dir.path().to_path_buf()).unwrap();
        listings(&ctx, ListingsOptions::default()).unwrap();

        let doc = ctx.load_document(Path::new("ch.md")).unwrap();
        assert_eq!(
            render_summaries(Path::new("ch.md"), &doc),
            "ch.md\n  rust: main.rs\n  python: util.py\n"
        );
    }

    #[test]
    fn test_listings_missing_file() {
        let dir = tempdir().unwrap();
        let ctx = Context::default_for_dir(dir.path().to_path_buf()).unwrap();
        let options = ListingsOptions {
            files: vec![PathBuf::from("missing.md")],
        };
        assert!(listings(&ctx, options).is_err());
    }
}
