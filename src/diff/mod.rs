//! Change Record extraction.
//!
//! Turns a diff document into an ordered `Vec<ChangeRecord>`. Order is the
//! order of entries in the file and is preserved all the way to the README.

mod load;
mod text;
mod types;

pub use load::{load_diff, parse_structured_diff};
pub use text::parse_text_diff;
pub use types::*;
