use crate::diff::ChangeKind;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the summary log inside the output directory.
pub const SUMMARY_FILE: &str = "summary.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Generated,
    Skipped,
}

/// One line of `summary.txt`.
///
/// This is the whole contract between the generator and the converters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub kind: ChangeKind,
    pub method: String,
    pub path: String,
    pub status: GenerationStatus,
    /// Example file relative to the output directory, e.g. `added/POST__users.txt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
}

impl SummaryRecord {
    pub fn is_generated(&self) -> bool {
        self.status == GenerationStatus::Generated
    }

    /// `METHOD /path`
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Serialize records as JSON lines, one per record, with a trailing newline.
pub fn format_summary(records: &[SummaryRecord]) -> std::result::Result<String, serde_json::Error> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Write `records` to `path`, replacing any previous log.
pub fn write_summary(path: &Path, records: &[SummaryRecord]) -> Result<()> {
    let text = format_summary(records).map_err(|e| {
        Error::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    std::fs::write(path, text).map_err(|e| Error::io(path, e))
}

/// Parse a summary log. Blank lines are ignored.
pub fn parse_summary(file: &Path, text: &str) -> Result<Vec<SummaryRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| Error::SummaryParse {
                file: file.to_path_buf(),
                line: i + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Read and parse the summary log at `path`.
pub fn read_summary(path: &Path) -> Result<Vec<SummaryRecord>> {
    if !path.exists() {
        return Err(Error::MissingInput {
            file: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_summary(path, &text)
}
