#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::fixtures::{MIXED_DIFF, TEXT_DIFF};
use common::temp_files::write_file;
use diff2curl::{load_diff, ChangeKind, Error};
use http::Method;

#[test]
fn test_load_json_diff() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "api-diff.json", MIXED_DIFF);

    let records = load_diff(&path).unwrap();
    let summary: Vec<_> = records
        .iter()
        .map(|r| (r.method.clone(), r.path.as_str(), r.kind))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Method::POST, "/users", ChangeKind::Added),
            (Method::DELETE, "/widgets", ChangeKind::Modified),
            (Method::GET, "/users", ChangeKind::Modified),
            (Method::DELETE, "/legacy/{id}", ChangeKind::Removed),
        ]
    );
    assert_eq!(
        records[2].field_changes[0].describe(),
        "parameters.limit.default: 10 -> 20"
    );
    assert!(records[3].before.is_some());
}

#[test]
fn test_load_yaml_diff_with_changes_key() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = "\
changes:
  - path: /users/{id}
    method: patch
    type: modified
    changes:
      - summary
";
    let path = write_file(dir.path(), "api-diff.yaml", yaml);

    let records = load_diff(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].method, Method::PATCH);
    assert_eq!(records[0].kind, ChangeKind::Modified);
    assert_eq!(records[0].field_changes[0].describe(), "summary");
}

#[test]
fn test_load_text_diff() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "api-diff.txt", TEXT_DIFF);

    let records = load_diff(&path).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].kind, ChangeKind::Added);
    assert_eq!(records[1].kind, ChangeKind::Removed);
    assert_eq!(records[1].path, "/legacy/{id}");
    assert_eq!(records[2].kind, ChangeKind::Modified);
    assert_eq!(
        records[2].field_changes[0].describe(),
        "Query param status added"
    );
}

#[test]
fn test_empty_diff() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "api-diff.json", "[]");
    assert!(load_diff(&path).unwrap().is_empty());
}

#[test]
fn test_malformed_entry_names_file_and_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "api-diff.json",
        r#"[{"path": "/users", "method": "GET", "kind": "added"}, {"path": "/users", "kind": "added"}]"#,
    );

    match load_diff(&path).unwrap_err() {
        Error::MalformedDiff { file, entry, .. } => {
            assert_eq!(file, path);
            assert_eq!(entry, 1);
        }
        other => panic!("expected MalformedDiff, got {other:?}"),
    }
}

#[test]
fn test_unknown_kind_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "api-diff.json",
        r#"[{"path": "/users", "method": "GET", "kind": "renamed"}]"#,
    );
    let err = load_diff(&path).unwrap_err();
    assert!(matches!(err, Error::MalformedDiff { entry: 0, .. }));
}

#[test]
fn test_wrong_shape_and_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "api-diff.json", r#""just a string""#);
    assert!(matches!(load_diff(&path).unwrap_err(), Error::DiffLoad { .. }));

    let err = load_diff(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, Error::MissingInput { .. }));
}
