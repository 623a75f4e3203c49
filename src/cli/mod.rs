//! # CLI Module
//!
//! Command-line front end for the generator and both converters.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Run the whole pipeline and write the README:
//!
//! ```bash
//! diff2curl generate openapi.yaml api-diff.json \
//!     --output-dir curl_files \
//!     --markdown-dir docs/endpoints \
//!     --github-url https://github.com/acme/api/blob --branch main
//! ```
//!
//! ### `markdown`
//!
//! Turn an existing output tree into markdown pages:
//!
//! ```bash
//! diff2curl markdown curl_files docs/endpoints
//! ```
//!
//! ### `summary`
//!
//! Render a README from `summary.txt`:
//!
//! ```bash
//! diff2curl summary curl_files/summary.txt --output README.md --no-badges
//! ```
//!
//! Every command exits 0 when the run completes, including runs where some
//! change records were skipped, and 1 on fatal input errors.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use diff2curl::cli::{run, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run(cli)?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands};
