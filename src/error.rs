//! Error taxonomy for the generator.
//!
//! Fatal conditions (a broken diff, an unreadable spec, I/O failure) are
//! variants of [`Error`] and abort the run. Per-record problems that the run
//! survives are [`SkipReason`]s and end up in the summary log instead.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Each one names the file it is about.
#[derive(Debug, Error)]
pub enum Error {
    /// A diff entry is missing its path or method, or carries an unknown kind.
    #[error("malformed diff {file}: entry {entry}: {reason}")]
    MalformedDiff {
        /// Diff file that contains the entry.
        file: PathBuf,
        /// Zero-based position of the entry in the diff.
        entry: usize,
        /// What is wrong with the entry.
        reason: String,
    },
    /// The OpenAPI document could not be parsed.
    #[error("failed to load OpenAPI document {file}: {reason}")]
    SpecLoad {
        /// Path of the OpenAPI document.
        file: PathBuf,
        /// Parser message.
        reason: String,
    },
    /// The diff document is not valid YAML/JSON or has the wrong shape.
    #[error("failed to load diff {file}: {reason}")]
    DiffLoad {
        /// Path of the diff document.
        file: PathBuf,
        /// Parser message.
        reason: String,
    },
    /// An input file does not exist.
    #[error("input file not found: {file}")]
    MissingInput {
        /// The missing path.
        file: PathBuf,
    },
    /// A line of the summary log is not a valid record.
    #[error("invalid summary log {file}: line {line}: {reason}")]
    SummaryParse {
        /// Path of the summary log.
        file: PathBuf,
        /// One-based line number.
        line: usize,
        /// Parser message.
        reason: String,
    },
    /// A generated example file does not follow the example format.
    #[error("invalid example file {file}: {reason}")]
    DocumentParse {
        /// Path of the example file.
        file: PathBuf,
        /// What is missing or malformed.
        reason: String,
    },
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A documentation template failed to render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a change record produced no example file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// An `added`/`modified` record names an operation the document lacks.
    OperationNotFound,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::OperationNotFound => write!(f, "operation not found in OpenAPI document"),
        }
    }
}
