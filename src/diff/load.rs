use super::text::parse_text_diff;
use super::types::{ChangeKind, ChangeRecord, FieldChange};
use crate::error::{Error, Result};
use crate::spec::parse_document;
use http::Method;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Parse an HTTP method token case-insensitively.
pub(crate) fn parse_method(token: &str) -> Option<Method> {
    let upper = token.trim().to_ascii_uppercase();
    if upper.is_empty() || !upper.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Method::from_bytes(upper.as_bytes()).ok()
}

fn is_structured(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "json" | "yaml" | "yml"))
        .unwrap_or(false)
}

/// Load the diff at `file_path` into an ordered list of change records.
///
/// `.json`, `.yaml` and `.yml` files are read as structured diffs; anything
/// else is read as the sectioned text format.
///
/// # Errors
///
/// * [`Error::MissingInput`] when the file does not exist
/// * [`Error::DiffLoad`] when a structured diff cannot be parsed
/// * [`Error::MalformedDiff`] when an entry lacks its path or method or has an
///   unknown kind
pub fn load_diff(file_path: &Path) -> Result<Vec<ChangeRecord>> {
    if !file_path.exists() {
        return Err(Error::MissingInput {
            file: file_path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(file_path).map_err(|e| Error::io(file_path, e))?;

    let records = if is_structured(file_path) {
        let value = parse_document(file_path, &content).map_err(|reason| Error::DiffLoad {
            file: file_path.to_path_buf(),
            reason,
        })?;
        parse_structured_diff(file_path, &value)?
    } else {
        parse_text_diff(file_path, &content)?
    };

    info!(diff = %file_path.display(), records = records.len(), "Diff loaded");
    Ok(records)
}

/// Convert a parsed structured diff into change records.
///
/// Accepts a top-level list or a mapping with a `changes` list.
pub fn parse_structured_diff(file: &Path, value: &Value) -> Result<Vec<ChangeRecord>> {
    let entries = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("changes") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::DiffLoad {
                    file: file.to_path_buf(),
                    reason: "expected a list of changes or a mapping with a 'changes' list"
                        .to_string(),
                })
            }
        },
        // An empty YAML document parses to null
        Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(Error::DiffLoad {
                file: file.to_path_buf(),
                reason: "expected a list of changes".to_string(),
            })
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(entry, item)| parse_entry(file, entry, item))
        .collect()
}

fn parse_entry(file: &Path, entry: usize, item: &Value) -> Result<ChangeRecord> {
    let malformed = |reason: String| Error::MalformedDiff {
        file: file.to_path_buf(),
        entry,
        reason,
    };

    let obj = item
        .as_object()
        .ok_or_else(|| malformed("entry is not a mapping".to_string()))?;

    let path = obj
        .get("path")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| malformed("missing path".to_string()))?;

    let method_raw = obj
        .get("method")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| malformed("missing method".to_string()))?;
    let method =
        parse_method(method_raw).ok_or_else(|| malformed(format!("invalid method '{method_raw}'")))?;

    let kind_raw = obj
        .get("kind")
        .or_else(|| obj.get("type"))
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing kind".to_string()))?;
    let kind = ChangeKind::parse(kind_raw)
        .ok_or_else(|| malformed(format!("unknown kind '{kind_raw}'")))?;

    let mut record = ChangeRecord::new(path, method, kind);
    if kind == ChangeKind::Modified {
        record.field_changes = obj
            .get("changes")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(parse_field_change).collect())
            .unwrap_or_default();
    }
    record.before = obj.get("before").filter(|v| v.is_object()).cloned();

    debug!(
        entry,
        method = %record.method,
        path = %record.path,
        kind = %record.kind,
        "Parsed diff entry"
    );
    Ok(record)
}

fn parse_field_change(item: &Value) -> Option<FieldChange> {
    match item {
        Value::String(s) => Some(FieldChange::described(s.clone())),
        Value::Object(map) => {
            let field = map
                .get("field")
                .or_else(|| map.get("path"))
                .and_then(Value::as_str)?;
            Some(FieldChange {
                field: field.to_string(),
                before: map.get("before").filter(|v| !v.is_null()).cloned(),
                after: map.get("after").filter(|v| !v.is_null()).cloned(),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file() -> &'static Path {
        Path::new("diff.json")
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("get"), Some(Method::GET));
        assert_eq!(parse_method(" Patch "), Some(Method::PATCH));
        assert_eq!(parse_method(""), None);
        assert_eq!(parse_method("/users"), None);
    }

    #[test]
    fn test_list_and_mapping_forms() {
        let list = json!([{ "path": "/users", "method": "post", "kind": "added" }]);
        let mapping = json!({ "changes": [{ "path": "/users", "method": "POST", "kind": "new" }] });
        let a = parse_structured_diff(file(), &list).unwrap();
        let b = parse_structured_diff(file(), &mapping).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].method, Method::POST);
        assert_eq!(a[0].kind, ChangeKind::Added);
    }

    #[test]
    fn test_modified_field_changes() {
        let diff = json!([{
            "path": "/users",
            "method": "GET",
            "kind": "modified",
            "changes": [
                { "field": "parameters.limit.default", "before": 10, "after": 20 },
                "summary reworded"
            ]
        }]);
        let records = parse_structured_diff(file(), &diff).unwrap();
        assert_eq!(records[0].field_changes.len(), 2);
        assert_eq!(records[0].field_changes[0].after, Some(json!(20)));
        assert_eq!(records[0].field_changes[1].field, "summary reworded");
    }

    #[test]
    fn test_before_is_kept() {
        let diff = json!([{
            "path": "/legacy",
            "method": "DELETE",
            "kind": "removed",
            "before": { "summary": "Old endpoint" }
        }]);
        let records = parse_structured_diff(file(), &diff).unwrap();
        assert_eq!(records[0].before, Some(json!({ "summary": "Old endpoint" })));
    }

    #[test]
    fn test_malformed_entries_name_the_index() {
        let diff = json!([
            { "path": "/ok", "method": "GET", "kind": "added" },
            { "method": "GET", "kind": "added" }
        ]);
        match parse_structured_diff(file(), &diff) {
            Err(Error::MalformedDiff { entry, reason, .. }) => {
                assert_eq!(entry, 1);
                assert!(reason.contains("path"));
            }
            other => panic!("expected MalformedDiff, got {other:?}"),
        }

        let no_method = json!([{ "path": "/ok", "kind": "added" }]);
        assert!(matches!(
            parse_structured_diff(file(), &no_method),
            Err(Error::MalformedDiff { entry: 0, .. })
        ));

        let bad_kind = json!([{ "path": "/ok", "method": "GET", "kind": "renamed" }]);
        assert!(matches!(
            parse_structured_diff(file(), &bad_kind),
            Err(Error::MalformedDiff { .. })
        ));
    }

    #[test]
    fn test_wrong_shape_is_diff_load_error() {
        let diff = json!({ "paths": {} });
        assert!(matches!(
            parse_structured_diff(file(), &diff),
            Err(Error::DiffLoad { .. })
        ));
    }
}
