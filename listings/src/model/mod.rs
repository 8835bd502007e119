//! Core model types.

mod block;
mod diff;

pub use block::{
    Block, CodeListing, CodePath, Comment, Prose, COMMENT_MARKER, FENCE, PATH_PREFIX, URL_PREFIX,
};
pub use diff::{compare, diff_lines, Comparison, DiffLine, DiffResult, DiffTag};
