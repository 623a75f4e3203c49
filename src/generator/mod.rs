//! # Generation Pipeline
//!
//! Walks the change records in diff order and, for each one, finds the
//! operation, resolves example values, renders the curl text and writes an
//! example file into a kind-partitioned tree:
//!
//! ```text
//! curl_files/
//! ├── added/
//! │   └── POST__users.txt
//! ├── removed/
//! │   └── DELETE__legacy.txt
//! ├── modified/
//! │   └── GET__orders.txt
//! └── summary.txt            # one JSON line per change record
//! ```
//!
//! Records are independent of each other. Lookup misses become skipped rows
//! in `summary.txt`; only I/O errors stop the run. Previous example files are
//! removed first, so running twice on the same inputs yields the same bytes.

mod naming;
mod pipeline;
mod summary;

pub use naming::sanitize_file_stem;
pub use pipeline::*;
pub use summary::*;
