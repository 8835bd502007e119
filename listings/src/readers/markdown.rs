//! Block parser for manuscripts.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LanguageRegistry;
use crate::errors::{ListingsError, Result};
use crate::model::{Block, CodeListing, Comment, Prose, COMMENT_MARKER, FENCE};
use crate::text_location::TextLocation;

use super::source_text::SourceText;

/// Pattern for an opening fence with its trailing whitespace removed.
static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(?P<language>.*?)(?P<ignore>!?)$").unwrap());

/// Parser state between blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Scanning,
    InCodeBlock,
    InComment,
    Done,
}

/// Splits a [`SourceText`] into blocks.
pub struct BlockParser<'a> {
    source: &'a mut SourceText,
    registry: &'a LanguageRegistry,
    state: ParserState,
}

impl<'a> BlockParser<'a> {
    /// Creates a parser positioned at the source's cursor.
    pub fn new(source: &'a mut SourceText, registry: &'a LanguageRegistry) -> Self {
        Self {
            source,
            registry,
            state: ParserState::Scanning,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Parses the next block, or returns `None` at the end of input.
    pub fn next_block(&mut self) -> Result<Option<Block>> {
        let Some(line) = self.source.peek() else {
            self.state = ParserState::Done;
            return Ok(None);
        };

        let block = if is_fence(line) {
            self.state = ParserState::InCodeBlock;
            Block::Listing(self.parse_listing()?)
        } else if is_comment_marker(line) {
            self.state = ParserState::InComment;
            Block::from_comment(self.parse_comment()?)
        } else {
            Block::Prose(self.parse_prose())
        };

        tracing::debug!("Parsed {} at line {}", block.kind(), block.line());
        self.state = ParserState::Scanning;
        Ok(Some(block))
    }

    /// Parses all remaining blocks.
    pub fn parse_all(mut self) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        while let Some(block) = self.next_block()? {
            blocks.push(block);
        }
        Ok(blocks)
    }

    fn parse_prose(&mut self) -> Prose {
        let line = self.source.line_number();
        let mut text = String::new();

        while let Some(next) = self.source.peek() {
            if is_fence(next) || is_comment_marker(next) {
                break;
            }
            text.push_str(next);
            self.source.next_line();
        }

        Prose { text, line }
    }

    fn parse_listing(&mut self) -> Result<CodeListing> {
        let start = self.source.line_number();
        let location = self.source.location(start);

        let mut raw = String::new();
        let mut code = String::new();
        let opening = self.source.next_line().unwrap_or_default().to_string();
        raw.push_str(&opening);

        loop {
            let Some(line) = self.source.next_line() else {
                return Err(ListingsError::structural(
                    location,
                    "unterminated or nested code block",
                ));
            };
            raw.push_str(line);
            if line.trim_end() == FENCE {
                break;
            }
            if is_fence(line) {
                return Err(ListingsError::structural(
                    location,
                    "unterminated or nested code block",
                ));
            }
            code.push_str(line);
        }

        let (language, ignore) = parse_fence(&opening, &location)?;
        let Some(info) = self
            .registry
            .get(language)
            .filter(|info| info.name == language)
        else {
            return Err(ListingsError::language(
                location,
                format!("unregistered language '{}'", language),
            ));
        };

        let mut source_file_name = String::new();
        if info.requires_file_name && !ignore {
            let slug = code.lines().next().unwrap_or_default();
            match info.slug_file_name(slug) {
                Some(name) => source_file_name = name.to_string(),
                None => {
                    return Err(ListingsError::filename(
                        location,
                        format!(
                            "first line must be '{} <file>{}' naming the source file, found {:?}",
                            info.comment.as_deref().unwrap_or_default(),
                            info.file_extension,
                            slug
                        ),
                    ));
                }
            }
        }

        Ok(CodeListing {
            language: info.name.clone(),
            source_file_name,
            code,
            ignore,
            requires_file_name: info.requires_file_name,
            raw,
            line: start,
        })
    }

    fn parse_comment(&mut self) -> Result<Comment> {
        let start = self.source.line_number();
        let mut raw = String::new();
        let mut lines = Vec::new();
        if let Some(opening) = self.source.next_line() {
            raw.push_str(opening);
        }

        loop {
            let Some(line) = self.source.next_line() else {
                return Err(ListingsError::structural(
                    self.source.location(start),
                    "unterminated comment",
                ));
            };
            raw.push_str(line);
            if is_comment_marker(line) {
                break;
            }
            lines.push(line.to_string());
        }

        Ok(Comment {
            lines,
            raw,
            line: start,
        })
    }
}

/// Parses every block of `source`.
pub fn parse_markdown(source: &mut SourceText, registry: &LanguageRegistry) -> Result<Vec<Block>> {
    BlockParser::new(source, registry).parse_all()
}

fn is_fence(line: &str) -> bool {
    line.starts_with(FENCE)
}

fn is_comment_marker(line: &str) -> bool {
    line.trim_end() == COMMENT_MARKER
}

/// Splits an opening fence into language token and ignore flag.
fn parse_fence<'l>(opening: &'l str, location: &TextLocation) -> Result<(&'l str, bool)> {
    let caps = FENCE_OPEN
        .captures(opening.trim_end())
        .ok_or_else(|| ListingsError::language(location.clone(), "malformed opening fence"))?;
    let language = caps.name("language").map_or("", |m| m.as_str());
    let ignore = caps.name("ignore").is_some_and(|m| !m.as_str().is_empty());
    if language.is_empty() {
        return Err(ListingsError::language(
            location.clone(),
            "missing language name after ```",
        ));
    }
    Ok((language, ignore))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn parse(input: &str) -> Result<Vec<Block>> {
        let registry = LanguageRegistry::builtin();
        let mut source = SourceText::from_text(input, Some(PathBuf::from("test.md")));
        parse_markdown(&mut source, &registry)
    }

    fn serialize(blocks: &[Block]) -> String {
        blocks.iter().map(|b| b.raw()).collect()
    }

    #[test]
    fn test_single_python_listing() {
        let input = "```python\n# a.py\nprint(1)\n```\n";
        let blocks = parse(input).unwrap();
        assert_eq!(blocks.len(), 1);
        let listing = blocks[0].as_listing().unwrap();
        assert_eq!(listing.language, "python");
        assert_eq!(listing.source_file_name, "a.py");
        assert_eq!(listing.code, "# a.py\nprint(1)\n");
        assert_eq!(listing.body(), "print(1)\n");
        assert!(!listing.ignore);
        assert_eq!(listing.line, 1);
    }

    #[test]
    fn test_unterminated_listing_cites_line() {
        let err = parse("```python\n# a.py\n").unwrap_err();
        match err {
            ListingsError::Structural { location, message } => {
                assert_eq!(location.line, 1);
                assert_eq!(location.filename, Some(PathBuf::from("test.md")));
                assert_eq!(message, "unterminated or nested code block");
            }
            other => panic!("expected structural error, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_fence_is_structural() {
        let input = "intro\n\n```python\n# a.py\n```rust\n```\n";
        let err = parse(input).unwrap_err();
        assert!(matches!(err, ListingsError::Structural { .. }));
        assert_eq!(err.location().unwrap().line, 3);
    }

    #[test]
    fn test_closing_fence_with_content_is_structural() {
        let err = parse("```text\nout\n``` trailing\n").unwrap_err();
        assert!(matches!(err, ListingsError::Structural { .. }));
    }

    #[test]
    fn test_missing_language() {
        let err = parse("```\nplain\n```\n").unwrap_err();
        assert!(matches!(err, ListingsError::Language { .. }));
        let err = parse("```!\nplain\n```\n").unwrap_err();
        assert!(matches!(err, ListingsError::Language { .. }));
    }

    #[test]
    fn test_unregistered_language() {
        let err = parse("```cobol\nDISPLAY 'X'.\n```\n").unwrap_err();
        assert!(err.to_string().contains("unregistered language 'cobol'"));
        let err = parse("``` python\n# a.py\n```\n").unwrap_err();
        assert!(matches!(err, ListingsError::Language { .. }));
        let err = parse("```.py\n# a.py\n```\n").unwrap_err();
        assert!(matches!(err, ListingsError::Language { .. }));
    }

    #[test]
    fn test_wrong_comment_token_is_filename_error() {
        let err = parse("```python\n// example.py\nprint(1)\n```\n").unwrap_err();
        assert!(matches!(err, ListingsError::Filename { .. }));
        assert_eq!(err.location().unwrap().line, 1);
    }

    #[test]
    fn test_go_slug_line() {
        let blocks = parse("```go\n// main.go\npackage main\n```\n").unwrap();
        assert_eq!(blocks[0].as_listing().unwrap().source_file_name, "main.go");
    }

    #[test]
    fn test_missing_or_empty_slug() {
        assert!(matches!(
            parse("```rust\nfn main() {}\n```\n").unwrap_err(),
            ListingsError::Filename { .. }
        ));
        assert!(matches!(
            parse("```rust\n// .rs\n```\n").unwrap_err(),
            ListingsError::Filename { .. }
        ));
        assert!(matches!(
            parse("```rust\n```\n").unwrap_err(),
            ListingsError::Filename { .. }
        ));
    }

    #[test]
    fn test_ignore_flag_skips_slug() {
        let blocks = parse("```python!\nx = 1\n```\n").unwrap();
        let listing = blocks[0].as_listing().unwrap();
        assert!(listing.ignore);
        assert_eq!(listing.source_file_name, "");
        assert!(!listing.needs_validation());
    }

    #[test]
    fn test_text_listing_needs_no_slug() {
        let blocks = parse("```text\nHello\n```\n").unwrap();
        let listing = blocks[0].as_listing().unwrap();
        assert_eq!(listing.language, "text");
        assert!(!listing.needs_validation());
    }

    #[test]
    fn test_plain_comment() {
        let blocks = parse("%%\nThis is just a note\n%%\n").unwrap();
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::Comment(c) => assert_eq!(c.lines, vec!["This is just a note\n".to_string()]),
            other => panic!("expected comment, got {:?}", other),
        }
    }

    #[test]
    fn test_code_path_comment() {
        let blocks = parse("%%\npath: /tmp/src\nurl: https://example.com/repo\n%%\n").unwrap();
        let cp = blocks[0].as_code_path().unwrap();
        assert_eq!(cp.path, Some(PathBuf::from("/tmp/src")));
        assert_eq!(cp.url.as_deref(), Some("https://example.com/repo"));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = parse("text\n%%\npath: /tmp\n").unwrap_err();
        assert!(matches!(err, ListingsError::Structural { .. }));
        assert_eq!(err.location().unwrap().line, 2);
        assert!(err.to_string().contains("unterminated comment"));
    }

    #[test]
    fn test_mixed_document_blocks_and_lines() {
        let input = "# Chapter\n\nSome text.\n%%\npath: src\n%%\n```python\n# a.py\nprint(1)\n```\nMore.\n```text\nout\n```";
        let blocks = parse(input).unwrap();
        let kinds: Vec<&str> = blocks.iter().map(|b| b.kind()).collect();
        assert_eq!(
            kinds,
            vec!["prose", "code path", "listing", "prose", "listing"]
        );
        let lines: Vec<usize> = blocks.iter().map(|b| b.line()).collect();
        assert_eq!(lines, vec![1, 4, 7, 11, 12]);
        assert_eq!(serialize(&blocks), input);
    }

    #[test]
    fn test_round_trip_preserves_odd_spacing() {
        let inputs = [
            "",
            "no newline at end",
            "\n\n\n",
            "%%  \nnote\n%%\t\n",
            "a\r\n```python\r\n# a.py\r\nx\r\n```\r\nb\r\n",
            "```text\n```   \n",
        ];
        for input in inputs {
            let blocks = parse(input).unwrap();
            assert_eq!(serialize(&blocks), input);
        }
    }

    #[test]
    fn test_parser_state() {
        let registry = LanguageRegistry::builtin();
        let mut source = SourceText::from_text("text\n", None);
        let mut parser = BlockParser::new(&mut source, &registry);
        assert_eq!(parser.state(), ParserState::Scanning);
        assert!(parser.next_block().unwrap().is_some());
        assert_eq!(parser.state(), ParserState::Scanning);
        assert!(parser.next_block().unwrap().is_none());
        assert_eq!(parser.state(), ParserState::Done);
    }
}
