//! Listings - keeps code listings in Markdown manuscripts in sync with source files
//!
//! A manuscript is parsed into prose, fenced code listings, and `%%` comment
//! blocks. Comments carrying a `path:` line tie the listings that follow
//! them to a directory on disk, and each listing names its file on a slug
//! line such as `# hello.py`.
//!
//! # Features
//!
//! - **Check**: verify that a manuscript survives a parse/serialize round trip
//! - **Compare**: diff each listing against its source file
//! - **Update**: replace listings from their source files
//! - **Insert paths**: add missing code path comments by searching for files
//!
//! # Example
//!
//! ```no_run
//! use listings::interface::{compare_listings, Context};
//! use std::path::Path;
//!
//! let ctx = Context::for_dir(std::env::current_dir().unwrap()).unwrap();
//! let doc = ctx.load_document(Path::new("chapter1.md")).unwrap();
//! for report in compare_listings(&doc, &ctx.validator()) {
//!     println!("{}: {:?}", report.source_file_name, report.result());
//! }
//! ```

pub mod config;
pub mod errors;
pub mod interface;
pub mod io;
pub mod model;
pub mod readers;
pub mod text_location;

// Re-export commonly used types
pub use config::{Config, LanguageInfo, LanguageRegistry};
pub use errors::{ListingsError, Result};
pub use interface::{Context, Document};
pub use model::{Block, CodeListing, CodePath, Comment, DiffResult};
