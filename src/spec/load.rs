use super::index::SpecIndex;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::info;

/// Base URL used when neither an override nor `servers` provides one.
pub const DEFAULT_BASE_URL: &str = "https://api.example.com";

/// Drop non-operation keys from path items so typed validation accepts vendor noise.
pub(crate) fn strip_unknown_verbs(val: &mut serde_json::Value) {
    const METHODS: [&str; 8] = ["get", "post", "put", "delete", "patch", "options", "head", "trace"];

    if let Some(serde_json::Value::Object(paths_map)) = val.get_mut("paths") {
        for item in paths_map.values_mut() {
            if let serde_json::Value::Object(obj) = item {
                let keys: Vec<String> = obj.keys().cloned().collect();
                for k in keys {
                    let lk = k.to_ascii_lowercase();
                    let keep = match lk.as_str() {
                        "summary" | "description" | "servers" | "parameters" | "$ref" => true,
                        m if METHODS.contains(&m) => true,
                        _ => k.starts_with("x-"),
                    };
                    if !keep {
                        obj.remove(&k);
                    }
                }
            }
        }
    }
}

/// Parse YAML or JSON text according to the file extension.
pub(crate) fn parse_document(path: &Path, content: &str) -> std::result::Result<serde_json::Value, String> {
    let is_yaml = path
        .extension()
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);
    if is_yaml {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }
}

/// Normalise a base URL: trim trailing slashes and anchor relative server URLs
/// (`/v1`) on [`DEFAULT_BASE_URL`].
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_BASE_URL.to_string();
    }
    if url::Url::parse(trimmed).is_ok() {
        trimmed.to_string()
    } else if trimmed.starts_with('/') {
        format!("{DEFAULT_BASE_URL}{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Load an OpenAPI document from disk and index its operations.
///
/// `base_url` overrides the document's first `servers` entry.
///
/// # Errors
///
/// * [`Error::MissingInput`] when the file does not exist
/// * [`Error::SpecLoad`] when it is not valid YAML/JSON or not an OpenAPI document
pub fn load_spec(file_path: &Path, base_url: Option<&str>) -> Result<SpecIndex> {
    if !file_path.exists() {
        return Err(Error::MissingInput {
            file: file_path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(file_path).map_err(|e| Error::io(file_path, e))?;
    let mut value = parse_document(file_path, &content).map_err(|reason| Error::SpecLoad {
        file: file_path.to_path_buf(),
        reason,
    })?;
    strip_unknown_verbs(&mut value);

    let mut index = SpecIndex::from_document(value).map_err(|e| Error::SpecLoad {
        file: file_path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if let Some(url) = base_url {
        index.set_base_url(url);
    }

    info!(
        spec = %file_path.display(),
        title = %index.title(),
        base_url = %index.base_url(),
        operations = index.len(),
        "OpenAPI document loaded"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_unknown_verbs() {
        let mut v = json!({
            "paths": {
                "/x": { "get": {}, "patch": {}, "unknown": {}, "x-keep": true }
            }
        });
        strip_unknown_verbs(&mut v);
        assert!(v["paths"]["/x"].get("unknown").is_none());
        assert!(v["paths"]["/x"].get("x-keep").is_some());
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("https://api.test/v1/"), "https://api.test/v1");
        assert_eq!(normalize_base_url("/v2"), "https://api.example.com/v2");
        assert_eq!(normalize_base_url("  "), DEFAULT_BASE_URL);
    }
}
