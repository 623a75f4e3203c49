//! OpenAPI document loading and the operation index.
//!
//! The document is parsed into a `serde_json::Value`, its `info` and
//! `servers` are read through `oas3`, and the paths are flattened into one [`OperationRef`] per `(path, method)` with
//! parameters, request body, responses and security already resolved.

mod build;
mod index;
mod load;
mod types;

pub use build::*;
pub use index::*;
pub use load::*;
pub use types::*;
