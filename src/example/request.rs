use super::resolver::{Resolved, Resolver};
use super::schema::binary_properties;
use crate::spec::{AuthRequirement, MediaTypeMeta, OperationRef, ParameterLocation, ParameterMeta};
use http::Method;
use serde_json::Value;
use tracing::debug;

pub const BEARER_PLACEHOLDER: &str = "Bearer YOUR_TOKEN_HERE";
pub const BASIC_PLACEHOLDER: &str = "Basic YOUR_CREDENTIALS_HERE";
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

/// How a request body is passed to curl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Multipart,
    UrlEncoded,
    Raw,
}

impl BodyKind {
    pub fn for_content_type(content_type: &str) -> Self {
        let ct = content_type.to_ascii_lowercase();
        if ct.starts_with("multipart/form-data") {
            BodyKind::Multipart
        } else if ct.starts_with("application/x-www-form-urlencoded") {
            BodyKind::UrlEncoded
        } else if ct.contains("json") {
            BodyKind::Json
        } else {
            BodyKind::Raw
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    pub content_type: String,
    pub kind: BodyKind,
    pub value: Value,
    /// Multipart fields uploaded from a file.
    pub binary_fields: Vec<String>,
}

/// A parameter together with the value chosen for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParameter {
    pub meta: ParameterMeta,
    pub resolved: Resolved,
}

/// Everything needed to print one request. Built per change record and dropped
/// after rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub method: Method,
    /// Base URL, substituted path and encoded query string.
    pub url: String,
    /// Header flags in emission order: auth, declared headers, content type.
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Declared parameters in declaration order with their resolved values.
    pub parameters: Vec<ResolvedParameter>,
}

/// Flatten a parameter value to the text form used in URLs and headers.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

fn query_pairs(name: &str, value: &Value) -> Vec<String> {
    let key = urlencoding::encode(name);
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| format!("{key}={}", urlencoding::encode(&value_text(item))))
            .collect(),
        other => vec![format!("{key}={}", urlencoding::encode(&value_text(other)))],
    }
}

/// Build the body for `content_type` and add its `Content-Type` header.
///
/// Multipart and form bodies get no header; curl sets it (with the boundary)
/// from the `-F` / `--data-urlencode` flags.
fn attach_body(
    headers: &mut Vec<(String, String)>,
    content_type: &str,
    schema: Option<&Value>,
    value: Value,
) -> RequestBody {
    let kind = BodyKind::for_content_type(content_type);
    if matches!(kind, BodyKind::Json | BodyKind::Raw) {
        headers.push(("Content-Type".to_string(), content_type.to_string()));
    }
    RequestBody {
        content_type: content_type.to_string(),
        kind,
        value,
        binary_fields: schema.map(binary_properties).unwrap_or_default(),
    }
}

impl Resolver {
    /// Resolve every parameter and the body of `op` into a request against
    /// `base_url`.
    ///
    /// Path parameters are substituted only with values declared in the
    /// document; otherwise the `{name}` template stays in the URL.
    pub fn resolve_request(&self, op: &OperationRef, base_url: &str) -> ResolvedRequest {
        let parameters: Vec<ResolvedParameter> = op
            .parameters
            .iter()
            .map(|meta| {
                let resolved = self.resolve_parameter(meta);
                if meta.required && !resolved.source.is_declared() {
                    debug!(
                        method = %op.method,
                        path = %op.path,
                        parameter = %meta.name,
                        location = %meta.location,
                        "No example declared, using placeholder"
                    );
                }
                ResolvedParameter {
                    meta: meta.clone(),
                    resolved,
                }
            })
            .collect();

        let mut path = op.path.clone();
        for p in parameters.iter().filter(|p| p.meta.location == ParameterLocation::Path) {
            if p.resolved.source.is_declared() {
                let text = value_text(&p.resolved.value);
                path = path.replace(
                    &format!("{{{}}}", p.meta.name),
                    &urlencoding::encode(&text),
                );
            }
        }

        let mut headers = Vec::new();
        let mut cookies = Vec::new();
        let mut query: Vec<String> = parameters
            .iter()
            .filter(|p| p.meta.location == ParameterLocation::Query)
            .flat_map(|p| query_pairs(&p.meta.name, &p.resolved.value))
            .collect();

        for auth in &op.security {
            match auth {
                AuthRequirement::Bearer => {
                    headers.push(("Authorization".to_string(), BEARER_PLACEHOLDER.to_string()))
                }
                AuthRequirement::Basic => {
                    headers.push(("Authorization".to_string(), BASIC_PLACEHOLDER.to_string()))
                }
                AuthRequirement::ApiKey { name, location } => match location {
                    ParameterLocation::Query => query.push(format!(
                        "{}={API_KEY_PLACEHOLDER}",
                        urlencoding::encode(name)
                    )),
                    ParameterLocation::Cookie => {
                        cookies.push((name.clone(), API_KEY_PLACEHOLDER.to_string()))
                    }
                    _ => headers.push((name.clone(), API_KEY_PLACEHOLDER.to_string())),
                },
            }
        }

        for p in &parameters {
            match p.meta.location {
                ParameterLocation::Header => {
                    headers.push((p.meta.name.clone(), value_text(&p.resolved.value)))
                }
                ParameterLocation::Cookie => {
                    cookies.push((p.meta.name.clone(), value_text(&p.resolved.value)))
                }
                _ => {}
            }
        }

        let body = op.request_body.as_ref().map(|meta| {
            let resolved = self.resolve_body(meta);
            if !resolved.source.is_declared() {
                debug!(
                    method = %op.method,
                    path = %op.path,
                    content_type = %meta.content_type,
                    "No body example declared, using placeholder"
                );
            }
            attach_body(&mut headers, &meta.content_type, meta.schema.as_ref(), resolved.value)
        });

        let mut url = format!("{}{}", base_url.trim_end_matches('/'), path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }

        ResolvedRequest {
            method: op.method.clone(),
            url,
            headers,
            cookies,
            body,
            parameters,
        }
    }

    /// The same request sending `media` as its body.
    ///
    /// URL, auth, parameters and cookies are kept; only the body and the
    /// `Content-Type` header change.
    pub fn with_media_type(&self, request: &ResolvedRequest, media: &MediaTypeMeta) -> ResolvedRequest {
        let mut headers: Vec<(String, String)> = request
            .headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("Content-Type"))
            .cloned()
            .collect();
        let value = self.resolve_media_type(media).value;
        let body = attach_body(&mut headers, &media.content_type, media.schema.as_ref(), value);
        ResolvedRequest {
            headers,
            body: Some(body),
            ..request.clone()
        }
    }
}
