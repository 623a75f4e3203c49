use http::Method;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// Parse the `in` field of an OpenAPI parameter.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "Path"),
            ParameterLocation::Query => write!(f, "Query"),
            ParameterLocation::Header => write!(f, "Header"),
            ParameterLocation::Cookie => write!(f, "Cookie"),
        }
    }
}

/// A single operation as seen by the example generator.
///
/// Built once per `(path, method)` by the [`SpecIndex`](super::SpecIndex), or
/// reconstructed from a diff entry's recorded prior shape for removed
/// endpoints. Schemas are stored with `$ref`s already expanded.
#[derive(Debug, Clone)]
pub struct OperationRef {
    pub path: String,
    pub method: Method,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    /// Declaration order: path-level parameters first, then operation-level.
    pub parameters: Vec<ParameterMeta>,
    pub request_body: Option<RequestBodyMeta>,
    /// Named examples declared on the request body media type.
    pub examples: BTreeMap<String, Value>,
    pub responses: Vec<ResponseMeta>,
    pub security: Vec<AuthRequirement>,
}

impl OperationRef {
    /// Parameters at `location`, in declaration order.
    pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &ParameterMeta> {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMeta {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<Value>,
    /// Parameter-level `example`, or the first entry of `examples`.
    pub example: Option<Value>,
}

/// One entry of a `content` map.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaTypeMeta {
    pub content_type: String,
    pub schema: Option<Value>,
    /// `example`, or the first entry of `examples`.
    pub example: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestBodyMeta {
    /// The media type used for the curl example.
    pub content_type: String,
    /// Every declared media type, in declaration order.
    pub media_types: Vec<MediaTypeMeta>,
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<Value>,
    /// Media-type level `example`, or the first entry of `examples`.
    pub example: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMeta {
    pub status: String,
    pub description: Option<String>,
    /// Declared media types, in declaration order.
    pub content: Vec<MediaTypeMeta>,
}

/// Credential placement implied by a security scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequirement {
    Bearer,
    Basic,
    ApiKey {
        name: String,
        location: ParameterLocation,
    },
}
