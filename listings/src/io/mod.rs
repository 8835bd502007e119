//! I/O operations for reading and writing manuscripts and source files.

mod file_cache;
mod transaction;

pub use file_cache::{FileCache, RealFileCache, VirtualFS};
pub use transaction::{Output, Transaction, WriteAction};
