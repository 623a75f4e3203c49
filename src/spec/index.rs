use super::build::build_operations;
use super::load::{normalize_base_url, DEFAULT_BASE_URL};
use super::types::OperationRef;
use http::Method;
use oas3::spec::{Info, Server};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// The top-level fields read through `oas3`.
///
/// Operations and schemas stay raw: a full typed parse rejects valid 3.0
/// documents that use the boolean `exclusiveMinimum` form.
#[derive(Debug, Deserialize)]
struct DocumentHead {
    openapi: String,
    info: Info,
    #[serde(default)]
    servers: Vec<Server>,
}

/// Read-only view over a loaded OpenAPI document.
///
/// Answers "what is the operation at `(path, method)`?". Lookups never fail
/// loudly: a miss is `None` so callers can record a skip and carry on.
#[derive(Debug, Clone)]
pub struct SpecIndex {
    document: Value,
    title: String,
    base_url: String,
    operations: Vec<OperationRef>,
    exact: HashMap<(Method, String), usize>,
    normalized: HashMap<(Method, String), usize>,
}

/// Canonical form of a path template for tolerant matching.
///
/// Trailing slashes are dropped (except for `/`) and every `{param}` segment
/// collapses to `{}`, so `/users/{id}/` and `/users/{user_id}` compare equal.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    let trimmed = if trimmed.len() > 1 {
        trimmed.trim_end_matches('/')
    } else {
        trimmed
    };
    let mut out = String::with_capacity(trimmed.len());
    let mut in_param = false;
    for c in trimmed.chars() {
        match c {
            '{' => {
                in_param = true;
                out.push_str("{}");
            }
            '}' => in_param = false,
            _ if in_param => {}
            _ => out.push(c),
        }
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

impl SpecIndex {
    /// Check that `document` looks like OpenAPI (an `openapi` version and an
    /// `info` block) and index every operation in it.
    pub fn from_document(document: Value) -> Result<Self, serde_json::Error> {
        let head = DocumentHead::deserialize(&document)?;
        debug!(openapi = %head.openapi, title = %head.info.title, "OpenAPI document recognized");
        let base_url = head
            .servers
            .first()
            .map(|server| normalize_base_url(&server.url))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let operations = build_operations(&document);
        let mut exact = HashMap::new();
        let mut normalized = HashMap::new();
        for (i, op) in operations.iter().enumerate() {
            exact.insert((op.method.clone(), op.path.clone()), i);
            normalized
                .entry((op.method.clone(), normalize_path(&op.path)))
                .or_insert(i);
        }

        Ok(Self {
            document,
            title: head.info.title,
            base_url,
            operations,
            exact,
            normalized,
        })
    }

    /// Look up the operation at `(path, method)`.
    ///
    /// An exact match wins; otherwise the normalized template form is tried.
    pub fn lookup(&self, path: &str, method: &Method) -> Option<&OperationRef> {
        self.exact
            .get(&(method.clone(), path.to_string()))
            .or_else(|| {
                self.normalized
                    .get(&(method.clone(), normalize_path(path)))
            })
            .and_then(|&i| self.operations.get(i))
    }

    /// The raw document, for resolving references in reconstructed operations.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the base URL taken from `servers`.
    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = normalize_base_url(url);
    }

    pub fn operations(&self) -> &[OperationRef] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/users/{id}/"), "/users/{}");
        assert_eq!(normalize_path("/users/{user_id}"), "/users/{}");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/a/{x}/b/{y}"), "/a/{}/b/{}");
    }
}
