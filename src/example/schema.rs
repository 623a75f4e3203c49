use super::resolver::MAX_DEPTH;
use serde_json::{Map, Value};

/// Collapse composition keywords so the resolver sees one plain schema.
///
/// `allOf` members are merged into the parent (properties and `required`
/// unioned, first scalar keyword wins). `oneOf`/`anyOf` pick the first
/// alternative that is not `type: null`.
pub fn flatten_schema(schema: &Value) -> Value {
    let Some(obj) = schema.as_object() else {
        return schema.clone();
    };

    let mut base: Map<String, Value> = obj
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), "allOf" | "oneOf" | "anyOf"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    if let Some(members) = obj.get("allOf").and_then(Value::as_array) {
        for member in members {
            merge_into(&mut base, &flatten_schema(member));
        }
    }

    let alternatives = obj
        .get("oneOf")
        .or_else(|| obj.get("anyOf"))
        .and_then(Value::as_array);
    if let Some(alts) = alternatives {
        let chosen = alts
            .iter()
            .find(|a| a.get("type").and_then(Value::as_str) != Some("null"))
            .or_else(|| alts.first());
        if let Some(alt) = chosen {
            merge_into(&mut base, &flatten_schema(alt));
        }
    }

    Value::Object(base)
}

fn merge_into(target: &mut Map<String, Value>, member: &Value) {
    let Some(member) = member.as_object() else {
        return;
    };
    for (key, value) in member {
        match key.as_str() {
            "properties" => {
                let props = target
                    .entry("properties")
                    .or_insert_with(|| Value::Object(Map::new()));
                if let (Some(dst), Some(src)) = (props.as_object_mut(), value.as_object()) {
                    for (name, prop) in src {
                        dst.entry(name.clone()).or_insert_with(|| prop.clone());
                    }
                }
            }
            "required" => {
                let req = target
                    .entry("required")
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let (Some(dst), Some(src)) = (req.as_array_mut(), value.as_array()) {
                    for name in src {
                        if !dst.contains(name) {
                            dst.push(name.clone());
                        }
                    }
                }
            }
            _ => {
                target.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
    }
}

/// Effective `type` of a schema.
///
/// Type arrays (`["string", "null"]`) use the first non-null entry. A schema
/// without `type` is an object when it has properties, an array when it has
/// items, and a string otherwise.
pub fn schema_type(schema: &Value) -> &str {
    match schema.get("type") {
        Some(Value::String(t)) => t.as_str(),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")
            .unwrap_or("null"),
        _ if schema.get("properties").is_some() => "object",
        _ if schema.get("items").is_some() => "array",
        _ if schema.get("$ref").is_some() => "object",
        _ => "string",
    }
}

/// Names of properties declared as binary (`format: binary` or a
/// `contentMediaType`), used to render multipart file fields.
pub fn binary_properties(schema: &Value) -> Vec<String> {
    flatten_schema(schema)
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .filter(|(_, p)| {
                    p.get("format").and_then(Value::as_str) == Some("binary")
                        || p.get("contentMediaType").is_some()
                })
                .map(|(name, _)| name.clone())
                .collect()
        })
        .unwrap_or_default()
}

/// One named field of a body schema, as listed under "Field Structure".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    /// Nesting level; fields of an object or array-of-objects property sit
    /// one level below it.
    pub depth: usize,
    /// `string`, `object`, `array of objects`, `array of integer`, ...
    pub type_name: String,
    pub format: Option<String>,
    pub enum_values: Vec<String>,
    pub required: bool,
    pub description: Option<String>,
}

/// Named fields of `schema` in declaration order, nested fields following
/// their parent.
///
/// A top-level array lists the fields of its items. Schemas without
/// properties yield nothing.
pub fn schema_fields(schema: &Value) -> Vec<SchemaField> {
    let flat = flatten_schema(schema);
    let mut out = Vec::new();
    match (schema_type(&flat), flat.get("items")) {
        ("array", Some(items)) => collect_fields(&flatten_schema(items), 0, &mut out),
        _ => collect_fields(&flat, 0, &mut out),
    }
    out
}

fn collect_fields(schema: &Value, depth: usize, out: &mut Vec<SchemaField>) {
    if depth > MAX_DEPTH {
        return;
    }
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    for (name, property) in properties {
        let property = flatten_schema(property);
        let (type_name, nested) = match schema_type(&property) {
            "object" => ("object".to_string(), Some(property.clone())),
            "array" => match property.get("items").map(flatten_schema) {
                Some(items) if schema_type(&items) == "object" => {
                    ("array of objects".to_string(), Some(items))
                }
                Some(items) => (format!("array of {}", schema_type(&items)), None),
                None => ("array".to_string(), None),
            },
            other => (other.to_string(), None),
        };
        out.push(SchemaField {
            name: name.clone(),
            depth,
            type_name,
            format: property.get("format").and_then(Value::as_str).map(str::to_string),
            enum_values: property
                .get("enum")
                .and_then(Value::as_array)
                .map(|values| {
                    values
                        .iter()
                        .map(|v| match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            required: required.contains(&name.as_str()),
            description: property
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
        });
        if let Some(nested) = nested {
            collect_fields(&nested, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_of_merge() {
        let schema = json!({
            "allOf": [
                { "type": "object", "properties": { "id": { "type": "integer" } }, "required": ["id"] },
                { "properties": { "name": { "type": "string" } }, "required": ["name"] }
            ]
        });
        let flat = flatten_schema(&schema);
        assert_eq!(flat["type"], "object");
        let keys: Vec<_> = flat["properties"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["id", "name"]);
        assert_eq!(flat["required"], json!(["id", "name"]));
    }

    #[test]
    fn test_one_of_skips_null() {
        let schema = json!({ "oneOf": [{ "type": "null" }, { "type": "integer" }] });
        assert_eq!(flatten_schema(&schema)["type"], "integer");
    }

    #[test]
    fn test_schema_type_inference() {
        assert_eq!(schema_type(&json!({ "type": ["null", "number"] })), "number");
        assert_eq!(schema_type(&json!({ "properties": {} })), "object");
        assert_eq!(schema_type(&json!({ "items": {} })), "array");
        assert_eq!(schema_type(&json!({})), "string");
    }

    #[test]
    fn test_binary_properties() {
        let schema = json!({
            "type": "object",
            "properties": {
                "file": { "type": "string", "format": "binary" },
                "caption": { "type": "string" }
            }
        });
        assert_eq!(binary_properties(&schema), vec!["file".to_string()]);
    }

    #[test]
    fn test_schema_fields_nesting() {
        let schema = json!({
            "type": "object",
            "required": ["email"],
            "properties": {
                "email": { "type": "string", "format": "email", "description": "Login" },
                "role": { "type": "string", "enum": ["admin", "member"] },
                "address": {
                    "type": "object",
                    "required": ["city"],
                    "properties": { "city": { "type": "string" } }
                },
                "phones": {
                    "type": "array",
                    "items": { "type": "object", "properties": { "number": { "type": "string" } } }
                },
                "tags": { "type": "array", "items": { "type": "string" } }
            }
        });
        let fields = schema_fields(&schema);
        let rows: Vec<_> = fields
            .iter()
            .map(|f| (f.name.as_str(), f.depth, f.type_name.as_str(), f.required))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("email", 0, "string", true),
                ("role", 0, "string", false),
                ("address", 0, "object", false),
                ("city", 1, "string", true),
                ("phones", 0, "array of objects", false),
                ("number", 1, "string", false),
                ("tags", 0, "array of string", false),
            ]
        );
        assert_eq!(fields[0].format.as_deref(), Some("email"));
        assert_eq!(fields[0].description.as_deref(), Some("Login"));
        assert_eq!(fields[1].enum_values, vec!["admin", "member"]);
    }

    #[test]
    fn test_schema_fields_of_array_and_scalar() {
        let list = json!({
            "type": "array",
            "items": { "type": "object", "properties": { "id": { "type": "integer" } } }
        });
        assert_eq!(schema_fields(&list)[0].name, "id");
        assert!(schema_fields(&json!({ "type": "string" })).is_empty());
    }
}
