//! Parsed manuscripts.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::config::LanguageRegistry;
use crate::errors::{ListingsError, Result};
use crate::model::{Block, CodeListing, CodePath, Comment, FENCE};
use crate::readers::{parse_markdown, SourceText};
use crate::text_location::TextLocation;

/// A manuscript parsed into blocks.
///
/// Owns the text it was parsed from. Blocks change only through
/// [`Document::insert`] and [`Document::replace`].
#[derive(Debug, Clone)]
pub struct Document {
    source: SourceText,
    blocks: Vec<Block>,
    modified: bool,
}

impl Document {
    /// Parses all of `source`.
    pub fn parse(mut source: SourceText, registry: &LanguageRegistry) -> Result<Self> {
        let blocks = parse_markdown(&mut source, registry)?;
        Ok(Self {
            source,
            blocks,
            modified: false,
        })
    }

    /// Loads and parses a markdown file.
    pub fn load(path: &Path, registry: &LanguageRegistry) -> Result<Self> {
        let doc = Self::parse(SourceText::open_markdown(path)?, registry)?;
        tracing::debug!("Parsed {} blocks from {}", doc.len(), path.display());
        Ok(doc)
    }

    /// Parses in-memory text.
    pub fn from_text(
        text: impl Into<String>,
        path: Option<PathBuf>,
        registry: &LanguageRegistry,
    ) -> Result<Self> {
        Self::parse(SourceText::from_text(text, path), registry)
    }

    /// Reads a source file as a document holding a single listing.
    ///
    /// The file's language comes from its extension, and its first line must
    /// be a valid slug line for that language.
    pub fn from_source_file(path: &Path, registry: &LanguageRegistry) -> Result<Self> {
        let source = SourceText::open_source_file(path, registry)?;
        let language = registry.for_path(path).ok_or_else(|| ListingsError::InvalidInput {
            path: path.to_path_buf(),
            reason: "does not have a registered code-language extension".to_string(),
        })?;
        let text = fenced(&format!("{}{}\n", FENCE, language.name), source.original(), FENCE);
        Self::from_text(text, Some(path.to_path_buf()), registry)
    }

    /// Returns the file this document was parsed from.
    pub fn path(&self) -> Option<&Path> {
        self.source.path()
    }

    /// Returns the text this document was parsed from.
    pub fn source_text(&self) -> &SourceText {
        &self.source
    }

    /// Returns the blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns true once a block was inserted or replaced.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns the position of `block`.
    pub fn index_of(&self, block: &Block) -> Result<usize> {
        self.blocks
            .iter()
            .position(|b| b == block)
            .ok_or(ListingsError::BlockNotFound)
    }

    /// Returns the position of `listing`.
    pub fn index_of_listing(&self, listing: &CodeListing) -> Result<usize> {
        self.blocks
            .iter()
            .position(|b| b.as_listing() == Some(listing))
            .ok_or(ListingsError::BlockNotFound)
    }

    /// Inserts a block before position `index`.
    pub fn insert(&mut self, index: usize, block: Block) -> Result<()> {
        if index > self.blocks.len() {
            return Err(ListingsError::Other(format!(
                "insert position {} is past the end of {} blocks",
                index,
                self.blocks.len()
            )));
        }
        self.blocks.insert(index, block);
        self.modified = true;
        Ok(())
    }

    /// Replaces the block at `index`, returning the old one.
    pub fn replace(&mut self, index: usize, block: Block) -> Result<Block> {
        let slot = self.blocks.get_mut(index).ok_or(ListingsError::BlockNotFound)?;
        self.modified = true;
        Ok(std::mem::replace(slot, block))
    }

    /// Returns all listings.
    pub fn code_listings(&self) -> Vec<&CodeListing> {
        self.blocks.iter().filter_map(Block::as_listing).collect()
    }

    /// Returns all code paths.
    pub fn code_paths(&self) -> Vec<&CodePath> {
        self.blocks.iter().filter_map(Block::as_code_path).collect()
    }

    /// Returns every comment block, code paths included.
    pub fn comments(&self) -> Vec<&Comment> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Comment(c) => Some(c),
                Block::CodePath(cp) => Some(&cp.comment),
                Block::Prose(_) | Block::Listing(_) => None,
            })
            .collect()
    }

    /// Pairs each listing that names a source file with the code path in
    /// force at that point.
    pub fn code_path_then_listing(&self) -> CodePathListings<'_> {
        CodePathListings {
            blocks: self.blocks.iter(),
            current: None,
            path: self.path(),
        }
    }

    /// Concatenates the text of every block.
    pub fn serialize(&self) -> String {
        self.blocks.iter().map(Block::raw).collect()
    }

    /// Returns true if serializing reproduces the parsed text exactly.
    pub fn is_round_trip(&self) -> bool {
        self.serialize() == self.source.original()
    }

    /// Builds a location in this document's file.
    pub fn location(&self, line: usize) -> TextLocation {
        self.source.location(line)
    }
}

/// Iterator returned by [`Document::code_path_then_listing`].
///
/// A listing with no code path ahead of it yields an error item.
#[derive(Debug, Clone)]
pub struct CodePathListings<'d> {
    blocks: std::slice::Iter<'d, Block>,
    current: Option<&'d CodePath>,
    path: Option<&'d Path>,
}

impl<'d> Iterator for CodePathListings<'d> {
    type Item = Result<(&'d CodePath, &'d CodeListing)>;

    fn next(&mut self) -> Option<Self::Item> {
        for block in self.blocks.by_ref() {
            match block {
                Block::CodePath(cp) => self.current = Some(cp),
                Block::Listing(listing) if listing.needs_validation() => {
                    return Some(match self.current {
                        Some(cp) => Ok((cp, listing)),
                        None => Err(ListingsError::path_resolution(
                            TextLocation::at(self.path, listing.line),
                            format!("no code path precedes listing of '{}'", listing.source_file_name),
                        )),
                    });
                }
                Block::Listing(_) | Block::Prose(_) | Block::Comment(_) => {}
            }
        }
        None
    }
}

/// Returns file contents as they read once placed inside a fence.
///
/// The closing fence sits on its own line, so non-empty code always ends
/// with a newline.
pub(crate) fn listing_code(contents: &str) -> Cow<'_, str> {
    if contents.is_empty() || contents.ends_with('\n') {
        Cow::Borrowed(contents)
    } else {
        Cow::Owned(format!("{}\n", contents))
    }
}

/// Wraps `code` between an opening fence line and a closing fence.
pub(crate) fn fenced(opening: &str, code: &str, closing: &str) -> String {
    let code = listing_code(code);
    let mut text = String::with_capacity(opening.len() + code.len() + closing.len());
    text.push_str(opening);
    text.push_str(&code);
    text.push_str(closing);
    text
}
