//! Readers for manuscripts and source files.

mod markdown;
mod source_text;

pub use markdown::{parse_markdown, BlockParser, ParserState};
pub use source_text::SourceText;
