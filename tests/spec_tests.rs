#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::fixtures::USERS_SPEC;
use common::temp_files::write_file;
use diff2curl::spec::{AuthRequirement, ParameterLocation, DEFAULT_BASE_URL};
use diff2curl::{load_spec, Error};
use http::Method;

#[test]
fn test_load_yaml_spec() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "openapi.yaml", USERS_SPEC);

    let spec = load_spec(&path, None).unwrap();
    assert_eq!(spec.title(), "User Service");
    assert_eq!(spec.base_url(), "https://api.example.com/v1");
    assert_eq!(spec.len(), 4);

    let create = spec.lookup("/users", &Method::POST).unwrap();
    assert_eq!(create.operation_id.as_deref(), Some("createUser"));
    let body = create.request_body.as_ref().unwrap();
    assert_eq!(body.content_type, "application/json");
    assert!(body.required);
    // $ref into components is expanded
    assert_eq!(body.schema.as_ref().unwrap()["properties"]["name"]["type"], "string");
    assert_eq!(create.security, vec![AuthRequirement::Bearer]);
}

#[test]
fn test_load_json_spec() {
    let dir = tempfile::tempdir().unwrap();
    let yaml: serde_json::Value = serde_yaml::from_str(USERS_SPEC).unwrap();
    let path = write_file(
        dir.path(),
        "openapi.json",
        &serde_json::to_string_pretty(&yaml).unwrap(),
    );

    let spec = load_spec(&path, None).unwrap();
    assert_eq!(spec.len(), 4);
    assert!(spec.lookup("/users/{id}", &Method::DELETE).is_some());
}

#[test]
fn test_path_level_parameters_and_operation_security() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "openapi.yaml", USERS_SPEC);
    let spec = load_spec(&path, None).unwrap();

    let get = spec.lookup("/users/{id}", &Method::GET).unwrap();
    let ids: Vec<_> = get.parameters_in(ParameterLocation::Path).collect();
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0].name, "id");
    assert!(ids[0].required);

    // `security: []` on the operation clears the document default
    let delete = spec.lookup("/users/{id}", &Method::DELETE).unwrap();
    assert!(delete.security.is_empty());
}

#[test]
fn test_lookup_tolerates_trailing_slash_and_param_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "openapi.yaml", USERS_SPEC);
    let spec = load_spec(&path, None).unwrap();

    assert!(spec.lookup("/users/", &Method::GET).is_some());
    let by_other_name = spec.lookup("/users/{user_id}", &Method::GET).unwrap();
    assert_eq!(by_other_name.operation_id.as_deref(), Some("getUser"));
    assert!(spec.lookup("/users", &Method::PATCH).is_none());
    assert!(spec.lookup("/widgets", &Method::DELETE).is_none());
}

#[test]
fn test_base_url_override_and_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "openapi.yaml", USERS_SPEC);
    let spec = load_spec(&path, Some("https://staging.example.com/")).unwrap();
    assert_eq!(spec.base_url(), "https://staging.example.com");

    let no_servers = "openapi: 3.1.0\ninfo:\n  title: Bare\n  version: '1'\npaths: {}\n";
    let path = write_file(dir.path(), "bare.yaml", no_servers);
    let spec = load_spec(&path, None).unwrap();
    assert_eq!(spec.base_url(), DEFAULT_BASE_URL);
    assert!(spec.is_empty());
}

#[test]
fn test_missing_spec_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_spec(&dir.path().join("nope.yaml"), None).unwrap_err();
    assert!(matches!(err, Error::MissingInput { .. }));
}

#[test]
fn test_invalid_spec_is_spec_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "broken.yaml", "openapi: [unterminated");
    let err = load_spec(&path, None).unwrap_err();
    assert!(matches!(err, Error::SpecLoad { .. }));

    let path = write_file(dir.path(), "not_openapi.json", r#"{"hello": "world"}"#);
    let err = load_spec(&path, None).unwrap_err();
    match err {
        Error::SpecLoad { file, .. } => assert_eq!(file, path),
        other => panic!("expected SpecLoad, got {other:?}"),
    }
}

#[test]
fn test_openapi_30_schema_keywords_load() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = r#"openapi: 3.0.3
info:
  title: Legacy Billing
  version: "2.0"
servers:
  - url: https://billing.example.com
paths:
  /invoices:
    post:
      summary: Create an invoice
      requestBody:
        content:
          application/json:
            schema:
              type: object
              properties:
                amount:
                  type: number
                  minimum: 0
                  exclusiveMinimum: true
                note:
                  type: string
                  nullable: true
      responses:
        "201":
          description: Created
"#;
    let path = write_file(dir.path(), "legacy.yaml", legacy);

    let spec = load_spec(&path, None).unwrap();
    assert_eq!(spec.title(), "Legacy Billing");
    assert_eq!(spec.base_url(), "https://billing.example.com");
    let create = spec.lookup("/invoices", &Method::POST).unwrap();
    let schema = create.request_body.as_ref().unwrap().schema.as_ref().unwrap();
    assert_eq!(schema["properties"]["amount"]["exclusiveMinimum"], true);
}

#[test]
fn test_spec_without_info_is_spec_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "no_info.yaml", "openapi: 3.1.0\npaths: {}\n");
    let err = load_spec(&path, None).unwrap_err();
    assert!(matches!(err, Error::SpecLoad { .. }));
}
