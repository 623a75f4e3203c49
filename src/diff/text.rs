use super::load::parse_method;
use super::types::{ChangeKind, ChangeRecord, FieldChange};
use crate::error::{Error, Result};
use std::path::Path;

const NEW_HEADER: &str = "### New Endpoints";
const DELETED_HEADER: &str = "### Deleted Endpoints";
const MODIFIED_HEADER: &str = "### Modified Endpoints";

fn section_kind(line: &str) -> Option<ChangeKind> {
    if line.starts_with(NEW_HEADER) {
        Some(ChangeKind::Added)
    } else if line.starts_with(DELETED_HEADER) {
        Some(ChangeKind::Removed)
    } else if line.starts_with(MODIFIED_HEADER) {
        Some(ChangeKind::Modified)
    } else {
        None
    }
}

/// Parse the sectioned text diff format.
///
/// ```text
/// ### New Endpoints: 1
/// ---------------------
/// POST /users
///
/// ### Modified Endpoints: 1
/// --------------------------
/// GET /users
///   - Query param limit added
/// ```
///
/// Lines outside a section are ignored. Within a section every non-blank line
/// that is not a `-` detail or a `---` rule is an endpoint line.
pub fn parse_text_diff(file: &Path, content: &str) -> Result<Vec<ChangeRecord>> {
    let mut records: Vec<ChangeRecord> = Vec::new();
    let mut current: Option<ChangeKind> = None;

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("---") {
            continue;
        }
        if let Some(kind) = section_kind(line) {
            current = Some(kind);
            continue;
        }
        if line.starts_with("###") {
            current = None;
            continue;
        }
        let Some(kind) = current else {
            continue;
        };

        if line.starts_with('-') {
            if kind == ChangeKind::Modified {
                if let Some(last) = records.last_mut().filter(|r| r.kind == ChangeKind::Modified) {
                    last.field_changes.push(FieldChange::described(
                        line.trim_start_matches('-').trim(),
                    ));
                }
            }
            continue;
        }

        let entry = records.len();
        let malformed = |reason: String| Error::MalformedDiff {
            file: file.to_path_buf(),
            entry,
            reason,
        };
        let mut parts = line.split_whitespace();
        let (Some(method_raw), Some(path), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed(format!("expected 'METHOD /path', got '{line}'")));
        };
        let method =
            parse_method(method_raw).ok_or_else(|| malformed(format!("invalid method '{method_raw}'")))?;
        if !path.starts_with('/') {
            return Err(malformed(format!("invalid path '{path}'")));
        }
        records.push(ChangeRecord::new(path, method, kind));
    }

    Ok(records)
}
