//! # diff2curl
//!
//! **diff2curl** turns a structural diff between two OpenAPI documents into
//! runnable curl examples, then renders those examples into per-endpoint
//! markdown pages and a README of release notes.
//!
//! The crate only generates text. It never computes the diff and never sends
//! a request.
//!
//! ## Architecture
//!
//! - **[`spec`]** - OpenAPI loading and the Spec Index (`lookup(path, method)`)
//! - **[`diff`]** - Change Record extraction from structured or text diffs
//! - **[`example`]** - Example Resolver: an ordered chain of value strategies
//! - **[`curl`]** - Curl Renderer
//! - **[`document`]** - The example file format, written and parsed by one type
//! - **[`generator`]** - Generation Pipeline and the `summary.txt` log
//! - **[`convert`]** - Markdown and README converters over the output tree
//! - **[`cli`]** - The `diff2curl` command line
//!
//! ### Data Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(diff2curl generate)
//!     participant Spec as spec::load_spec
//!     participant Diff as diff::load_diff
//!     participant Gen as generator::generate
//!     participant Res as example::Resolver
//!     participant Curl as curl::render
//!     participant FS as Output tree
//!     participant Conv as convert
//!
//!     CLI->>Spec: load_spec("openapi.yaml")
//!     Spec-->>CLI: SpecIndex
//!     CLI->>Diff: load_diff("api-diff.json")
//!     Diff-->>CLI: Vec<ChangeRecord>
//!     CLI->>Gen: generate(&spec, &records, &config)
//!     loop every change record, in diff order
//!         Gen->>Spec: lookup(path, method)
//!         Gen->>Res: resolve_request(&op, base_url)
//!         Gen->>Curl: render(&request)
//!         Gen->>FS: <kind>/<METHOD__path>.txt
//!     end
//!     Gen->>FS: summary.txt
//!     CLI->>Conv: markdown_convert / summary_convert
//!     Conv->>FS: read summary.txt + example files
//!     Conv-->>CLI: markdown pages, README.md
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use diff2curl::{generate, load_diff, load_spec, GeneratorConfig};
//! use std::path::Path;
//!
//! let spec = load_spec(Path::new("openapi.yaml"), None)?;
//! let records = load_diff(Path::new("api-diff.json"))?;
//! let results = generate(&spec, &records, &GeneratorConfig::default())?;
//! assert_eq!(results.len(), records.len());
//! ```
//!
//! ## Logging
//!
//! All diagnostics go through `tracing`. The binary configures the subscriber
//! from `DIFF2CURL_LOG_LEVEL`, `DIFF2CURL_LOG_FORMAT` (`pretty` or `json`),
//! `DIFF2CURL_LOG_TARGET_FILTER` and `DIFF2CURL_LOG_INCLUDE_LOCATION`; see
//! [`logging`].

pub mod cli;
pub mod convert;
pub mod curl;
pub mod diff;
pub mod document;
pub mod error;
pub mod example;
pub mod generator;
pub mod logging;
pub mod spec;

pub use convert::{markdown_convert, summary_convert, SummaryOptions};
pub use diff::{load_diff, ChangeKind, ChangeRecord, FieldChange};
pub use error::{Error, Result, SkipReason};
pub use example::{ResolvedRequest, Resolver};
pub use generator::{generate, GenerationResult, GeneratorConfig, SummaryRecord};
pub use spec::{load_spec, OperationRef, SpecIndex};
