//! Comments command implementation.

use std::path::{Path, PathBuf};

use listings::errors::Result;
use listings::interface::{Context, Document};

use super::helpers::for_each_file;

/// Options for the comments command.
#[derive(Debug, Clone, Default)]
pub struct CommentsOptions {
    pub files: Vec<PathBuf>,
}

/// Prints every comment block, code paths included.
pub fn comments(ctx: &Context, options: CommentsOptions) -> Result<()> {
    for_each_file(ctx, &options.files, |path| {
        let doc = ctx.load_document(path)?;
        print!("{}", render_comments(path, &doc));
        Ok(())
    })
}

fn render_comments(path: &Path, doc: &Document) -> String {
    let mut out = String::new();
    for comment in doc.comments() {
        out.push_str(&format!("{}:{}\n", path.display(), comment.line));
        out.push_str(&comment.raw);
    }
    out
}
