//! High-level interface for listing operations.

mod context;
mod document;
mod sync;
mod validator;

pub use context::Context;
pub use document::{CodePathListings, Document};
pub use sync::{
    check_round_trip, clear_mismatch, code_path_urls, compare_listings, insert_code_paths,
    listing_summaries, output_transaction, update_listings, ListingReport, Outcome,
    UpdateAction, UpdatePolicy, UpdateReport,
};
pub use validator::Validator;
