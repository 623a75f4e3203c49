use super::types::{
    AuthRequirement, MediaTypeMeta, OperationRef, ParameterLocation, ParameterMeta,
    RequestBodyMeta, ResponseMeta,
};
use http::Method;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// HTTP verbs recognised as operations inside a path item, in output order.
pub const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Resolve a local `$ref` (e.g. `#/components/schemas/Pet`) against the document.
///
/// Only same-document references are supported; anything else returns `None`.
pub fn resolve_ref<'a>(document: &'a Value, ref_path: &str) -> Option<&'a Value> {
    let pointer = ref_path.strip_prefix('#')?;
    document.pointer(pointer)
}

/// Follow `$ref` chains on `value` until a concrete object is reached.
fn deref<'a>(document: &'a Value, value: &'a Value) -> &'a Value {
    let mut current = value;
    // Bounded so that a ref pointing at itself cannot spin forever.
    for _ in 0..16 {
        match current.get("$ref").and_then(Value::as_str) {
            Some(r) => match resolve_ref(document, r) {
                Some(target) => current = target,
                None => return current,
            },
            None => return current,
        }
    }
    current
}

/// Recursively expand all JSON Schema `$ref` references in a value
///
/// Replaces `$ref` objects with their resolved definitions and records the
/// component name under `x-ref-name`. A reference that is already being
/// expanded higher up the tree is left in place, so self-referential schemas
/// terminate.
pub fn expand_schema_refs(document: &Value, value: &mut Value) {
    let mut stack = Vec::new();
    expand_with_stack(document, value, &mut stack);
}

fn expand_with_stack(document: &Value, value: &mut Value, stack: &mut Vec<String>) {
    match value {
        Value::Object(obj) => {
            if let Some(ref_path) = obj.get("$ref").and_then(|v| v.as_str()).map(str::to_string) {
                if stack.contains(&ref_path) {
                    return;
                }
                if let Some(target) = resolve_ref(document, &ref_path) {
                    let mut new_val = target.clone();
                    stack.push(ref_path.clone());
                    expand_with_stack(document, &mut new_val, stack);
                    stack.pop();
                    if let Some(name) = ref_path.strip_prefix("#/components/schemas/") {
                        if let Value::Object(o) = &mut new_val {
                            o.entry("x-ref-name".to_string())
                                .or_insert_with(|| Value::String(name.to_string()));
                        }
                    }
                    *value = new_val;
                    return;
                }
                debug!(reference = %ref_path, "Unresolvable $ref left in place");
                return;
            }
            for v in obj.values_mut() {
                expand_with_stack(document, v, stack);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                expand_with_stack(document, v, stack);
            }
        }
        _ => {}
    }
}

fn expanded(document: &Value, value: &Value) -> Value {
    let mut v = value.clone();
    expand_schema_refs(document, &mut v);
    v
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

/// First value of an OpenAPI `examples` map (`{name: {value: ...}}`).
fn first_named_example(document: &Value, examples: Option<&Value>) -> Option<Value> {
    examples
        .and_then(Value::as_object)
        .and_then(|map| map.values().next())
        .map(|ex| deref(document, ex))
        .and_then(|ex| ex.get("value").cloned())
}

/// Extract parameter metadata, resolving `#/components/parameters` references.
///
/// Entries that cannot be resolved or lack a name or location are dropped.
pub fn extract_parameters(document: &Value, params: &[Value]) -> Vec<ParameterMeta> {
    let mut out = Vec::new();
    for p in params {
        let param = deref(document, p);
        let name = match param.get("name").and_then(Value::as_str) {
            Some(n) => n.to_string(),
            None => continue,
        };
        let location = match param
            .get("in")
            .and_then(Value::as_str)
            .and_then(ParameterLocation::parse)
        {
            Some(l) => l,
            None => continue,
        };
        let schema = param.get("schema").map(|s| expanded(document, s));
        let example = param
            .get("example")
            .cloned()
            .or_else(|| first_named_example(document, param.get("examples")));

        out.push(ParameterMeta {
            name,
            // Path parameters are always required, whatever the document says.
            required: location == ParameterLocation::Path
                || param.get("required").and_then(Value::as_bool).unwrap_or(false),
            location,
            description: string_field(param, "description"),
            schema,
            example,
        });
    }
    out
}

/// Merge path-level and operation-level parameters.
///
/// Operation-level entries replace path-level ones with the same name and
/// location in place; new ones are appended in declaration order.
pub fn merge_parameters(
    path_level: Vec<ParameterMeta>,
    operation_level: Vec<ParameterMeta>,
) -> Vec<ParameterMeta> {
    let mut merged = path_level;
    for p in operation_level {
        match merged
            .iter_mut()
            .find(|m| m.name == p.name && m.location == p.location)
        {
            Some(slot) => *slot = p,
            None => merged.push(p),
        }
    }
    merged
}

/// Every entry of a `content` map, in declaration order.
fn extract_media_types(document: &Value, content: &Map<String, Value>) -> Vec<MediaTypeMeta> {
    content
        .iter()
        .map(|(content_type, media)| {
            let media = deref(document, media);
            MediaTypeMeta {
                content_type: content_type.clone(),
                schema: media.get("schema").map(|s| expanded(document, s)),
                example: media
                    .get("example")
                    .cloned()
                    .or_else(|| first_named_example(document, media.get("examples"))),
            }
        })
        .collect()
}

/// Extract the request body and its named examples from an operation.
///
/// `application/json` is used for the curl example when declared; otherwise
/// the first declared media type. Named examples come from that media type.
pub fn extract_request_body(
    document: &Value,
    operation: &Value,
) -> (Option<RequestBodyMeta>, BTreeMap<String, Value>) {
    let mut named = BTreeMap::new();
    let body = match operation.get("requestBody") {
        Some(b) => deref(document, b),
        None => return (None, named),
    };
    let content = match body.get("content").and_then(Value::as_object) {
        Some(c) if !c.is_empty() => c,
        _ => return (None, named),
    };

    let media_types = extract_media_types(document, content);
    let Some(primary) = media_types
        .iter()
        .find(|m| m.content_type == "application/json")
        .or_else(|| media_types.first())
        .cloned()
    else {
        return (None, named);
    };

    if let Some(examples) = content
        .get(&primary.content_type)
        .and_then(|media| media.get("examples"))
        .and_then(Value::as_object)
    {
        for (name, ex) in examples {
            if let Some(v) = deref(document, ex).get("value") {
                named.insert(name.clone(), v.clone());
            }
        }
    }

    let meta = RequestBodyMeta {
        content_type: primary.content_type,
        media_types,
        required: body.get("required").and_then(Value::as_bool).unwrap_or(false),
        description: string_field(body, "description"),
        schema: primary.schema,
        example: primary.example,
    };
    (Some(meta), named)
}

/// Extract response status codes, descriptions and media types.
pub fn extract_responses(document: &Value, operation: &Value) -> Vec<ResponseMeta> {
    operation
        .get("responses")
        .and_then(Value::as_object)
        .map(|responses| {
            responses
                .iter()
                .map(|(status, resp)| {
                    let resp = deref(document, resp);
                    ResponseMeta {
                        status: status.clone(),
                        description: string_field(resp, "description"),
                        content: resp
                            .get("content")
                            .and_then(Value::as_object)
                            .map(|c| extract_media_types(document, c))
                            .unwrap_or_default(),
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Credential placements for the first security alternative of an operation.
///
/// Operation-level `security` wins over the document-level default. An empty
/// requirement object (optional auth) yields no credentials.
pub fn extract_security(document: &Value, operation: &Value) -> Vec<AuthRequirement> {
    let requirements = operation
        .get("security")
        .or_else(|| document.get("security"))
        .and_then(Value::as_array);
    let first = match requirements.and_then(|r| r.first()).and_then(Value::as_object) {
        Some(f) => f,
        None => return Vec::new(),
    };

    let schemes = document.pointer("/components/securitySchemes");
    first
        .keys()
        .filter_map(|name| {
            let scheme = schemes.and_then(|s| s.get(name)).map(|s| deref(document, s))?;
            let kind = scheme.get("type").and_then(Value::as_str)?;
            match kind {
                "http" => match scheme
                    .get("scheme")
                    .and_then(Value::as_str)
                    .map(str::to_ascii_lowercase)
                    .as_deref()
                {
                    Some("basic") => Some(AuthRequirement::Basic),
                    _ => Some(AuthRequirement::Bearer),
                },
                "apiKey" => {
                    let key_name = string_field(scheme, "name")?;
                    let location = scheme
                        .get("in")
                        .and_then(Value::as_str)
                        .and_then(ParameterLocation::parse)
                        .unwrap_or(ParameterLocation::Header);
                    Some(AuthRequirement::ApiKey {
                        name: key_name,
                        location,
                    })
                }
                "oauth2" | "openIdConnect" => Some(AuthRequirement::Bearer),
                _ => None,
            }
        })
        .collect()
}

/// Build the [`OperationRef`] for one operation object.
///
/// `path_level_params` are the raw `parameters` of the enclosing path item
/// (empty when reconstructing from a diff entry).
pub fn build_operation(
    document: &Value,
    path: &str,
    method: Method,
    path_level_params: &[Value],
    operation: &Value,
) -> OperationRef {
    let operation = deref(document, operation);
    let op_params: Vec<Value> = operation
        .get("parameters")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let parameters = merge_parameters(
        extract_parameters(document, path_level_params),
        extract_parameters(document, &op_params),
    );
    let (request_body, examples) = extract_request_body(document, operation);

    OperationRef {
        path: path.to_string(),
        method,
        operation_id: string_field(operation, "operationId"),
        summary: string_field(operation, "summary"),
        description: string_field(operation, "description"),
        tags: operation
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        deprecated: operation
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        parameters,
        request_body,
        examples,
        responses: extract_responses(document, operation),
        security: extract_security(document, operation),
    }
}

/// Build an [`OperationRef`] for every operation under `paths`.
pub fn build_operations(document: &Value) -> Vec<OperationRef> {
    let mut out = Vec::new();
    let paths = match document.get("paths").and_then(Value::as_object) {
        Some(p) => p,
        None => return out,
    };
    for (path, item) in paths {
        let item = deref(document, item);
        let path_params: Vec<Value> = item
            .get("parameters")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for verb in METHODS {
            let operation = match item.get(verb) {
                Some(op) => op,
                None => continue,
            };
            let method = match Method::from_bytes(verb.to_ascii_uppercase().as_bytes()) {
                Ok(m) => m,
                Err(_) => continue,
            };
            out.push(build_operation(document, path, method, &path_params, operation));
        }
    }
    out
}
