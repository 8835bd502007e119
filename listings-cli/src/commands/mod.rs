//! CLI command implementations.

pub mod check;
pub mod comments;
pub mod compare;
pub mod config;
mod helpers;
pub mod insert;
pub mod summary;
pub mod update;
pub mod validate;

pub use check::{check, CheckOptions};
pub use comments::{comments, CommentsOptions};
pub use compare::{compare, CompareOptions};
pub use config::config;
pub use insert::{insert_paths, InsertOptions};
pub use summary::{listings, ListingsOptions};
pub use update::{update, UpdateOptions};
pub use validate::{validate_paths, ValidateOptions};
