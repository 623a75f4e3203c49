use super::schema::{flatten_schema, schema_type};
use crate::spec::{MediaTypeMeta, ParameterMeta, RequestBodyMeta};
use serde_json::{json, Map, Value};

/// Schemas nested deeper than this resolve to an empty object.
pub const MAX_DEPTH: usize = 10;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// `example` / `examples` on the parameter, media type or schema.
    Example,
    /// Schema `default`.
    Default,
    /// First `enum` value.
    Enum,
    /// Canned value for a string `format`.
    Format,
    /// Synthesized from the schema type.
    Placeholder,
}

impl ValueSource {
    /// True when the value is written down in the document rather than made up.
    pub fn is_declared(&self) -> bool {
        matches!(self, ValueSource::Example | ValueSource::Default | ValueSource::Enum)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: Value,
    pub source: ValueSource,
}

impl Resolved {
    pub fn new(value: Value, source: ValueSource) -> Self {
        Self { value, source }
    }

    fn placeholder(value: Value) -> Self {
        Self::new(value, ValueSource::Placeholder)
    }
}

/// Input to a strategy: a flattened schema plus an example attached outside
/// the schema (on a parameter or media type).
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub schema: Option<&'a Value>,
    pub example: Option<&'a Value>,
}

/// One step of the fallback chain. Returns `None` to defer to the next step.
pub trait ResolutionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn resolve(&self, target: &Target<'_>, resolver: &Resolver, depth: usize) -> Option<Resolved>;
}

/// Explicit `example`, then the first of `examples`.
pub struct ExplicitExample;

impl ResolutionStrategy for ExplicitExample {
    fn name(&self) -> &'static str {
        "example"
    }

    fn resolve(&self, target: &Target<'_>, _: &Resolver, _: usize) -> Option<Resolved> {
        let from_schema = || {
            let schema = target.schema?;
            schema.get("example").cloned().or_else(|| match schema.get("examples") {
                Some(Value::Array(items)) => items.first().cloned(),
                Some(Value::Object(named)) => named
                    .values()
                    .next()
                    .map(|ex| ex.get("value").unwrap_or(ex).clone()),
                _ => None,
            })
        };
        target
            .example
            .cloned()
            .or_else(from_schema)
            .map(|v| Resolved::new(v, ValueSource::Example))
    }
}

pub struct DefaultValue;

impl ResolutionStrategy for DefaultValue {
    fn name(&self) -> &'static str {
        "default"
    }

    fn resolve(&self, target: &Target<'_>, _: &Resolver, _: usize) -> Option<Resolved> {
        target
            .schema?
            .get("default")
            .map(|v| Resolved::new(v.clone(), ValueSource::Default))
    }
}

/// First `enum` member, or `const`.
pub struct EnumValue;

impl ResolutionStrategy for EnumValue {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn resolve(&self, target: &Target<'_>, _: &Resolver, _: usize) -> Option<Resolved> {
        let schema = target.schema?;
        schema
            .get("enum")
            .and_then(Value::as_array)
            .and_then(|values| values.first())
            .or_else(|| schema.get("const"))
            .map(|v| Resolved::new(v.clone(), ValueSource::Enum))
    }
}

/// Realistic strings for well-known formats.
pub struct FormatHint;

impl ResolutionStrategy for FormatHint {
    fn name(&self) -> &'static str {
        "format"
    }

    fn resolve(&self, target: &Target<'_>, _: &Resolver, _: usize) -> Option<Resolved> {
        let schema = target.schema?;
        if schema_type(schema) != "string" {
            return None;
        }
        let value = match schema.get("format").and_then(Value::as_str)? {
            "date" => "2024-01-15",
            "date-time" => "2024-01-15T10:30:00Z",
            "email" => "user@example.com",
            "uuid" => "550e8400-e29b-41d4-a716-446655440000",
            "uri" | "url" => "https://example.com/resource",
            "binary" => "@/path/to/file",
            _ => return None,
        };
        Some(Resolved::new(json!(value), ValueSource::Format))
    }
}

/// Last resort: a value of the right shape built from `type`.
pub struct TypePlaceholder;

impl ResolutionStrategy for TypePlaceholder {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn resolve(&self, target: &Target<'_>, resolver: &Resolver, depth: usize) -> Option<Resolved> {
        let Some(schema) = target.schema else {
            return Some(Resolved::placeholder(json!("string")));
        };
        let value = match schema_type(schema) {
            "integer" => json!(0),
            "number" => json!(0.0),
            "boolean" => json!(true),
            "null" => Value::Null,
            "array" => {
                let item = resolver.resolve_at(schema.get("items"), None, depth + 1);
                Value::Array(vec![item.value])
            }
            "object" => {
                let mut obj = Map::new();
                if let Some(props) = schema.get("properties").and_then(Value::as_object) {
                    for (name, prop) in props {
                        let resolved = resolver.resolve_at(Some(prop), None, depth + 1);
                        obj.insert(name.clone(), resolved.value);
                    }
                }
                Value::Object(obj)
            }
            _ => json!("string"),
        };
        Some(Resolved::placeholder(value))
    }
}

/// Ordered, short-circuiting list of [`ResolutionStrategy`]s.
///
/// The default chain is example, default, enum, format, placeholder. Custom
/// rules can be spliced in with [`Resolver::insert`].
pub struct Resolver {
    strategies: Vec<Box<dyn ResolutionStrategy>>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(vec![
            Box::new(ExplicitExample),
            Box::new(DefaultValue),
            Box::new(EnumValue),
            Box::new(FormatHint),
            Box::new(TypePlaceholder),
        ])
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.name()))
            .finish()
    }
}

impl Resolver {
    pub fn new(strategies: Vec<Box<dyn ResolutionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Insert `strategy` at `index` (clamped to the end of the chain).
    pub fn insert(&mut self, index: usize, strategy: Box<dyn ResolutionStrategy>) {
        let index = index.min(self.strategies.len());
        self.strategies.insert(index, strategy);
    }

    /// Names of the strategies in evaluation order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve a value for `schema`. Never fails.
    pub fn resolve(&self, schema: Option<&Value>, example: Option<&Value>) -> Resolved {
        self.resolve_at(schema, example, 0)
    }

    pub(crate) fn resolve_at(
        &self,
        schema: Option<&Value>,
        example: Option<&Value>,
        depth: usize,
    ) -> Resolved {
        if depth > MAX_DEPTH {
            return Resolved::placeholder(Value::Object(Map::new()));
        }
        let flat = schema.map(flatten_schema);
        let target = Target {
            schema: flat.as_ref(),
            example,
        };
        self.strategies
            .iter()
            .find_map(|s| s.resolve(&target, self, depth))
            .unwrap_or_else(|| Resolved::placeholder(json!("string")))
    }

    pub fn resolve_parameter(&self, param: &ParameterMeta) -> Resolved {
        self.resolve(param.schema.as_ref(), param.example.as_ref())
    }

    /// Media-type examples win over anything derived from the schema.
    pub fn resolve_body(&self, body: &RequestBodyMeta) -> Resolved {
        self.resolve_payload(body.schema.as_ref(), body.example.as_ref())
    }

    /// Resolve one declared media type of a request or response body.
    pub fn resolve_media_type(&self, media: &MediaTypeMeta) -> Resolved {
        self.resolve_payload(media.schema.as_ref(), media.example.as_ref())
    }

    fn resolve_payload(&self, schema: Option<&Value>, example: Option<&Value>) -> Resolved {
        if schema.is_none() && example.is_none() {
            return Resolved::placeholder(Value::Object(Map::new()));
        }
        self.resolve(schema, example)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_soundness() {
        let schema = json!({
            "type": "object",
            "properties": {
                "age": { "type": "integer" },
                "name": { "type": "string" },
                "active": { "type": "boolean" },
                "score": { "type": "number" },
                "tags": { "type": "array", "items": { "type": "string" } }
            }
        });
        let r = Resolver::default().resolve(Some(&schema), None);
        assert_eq!(r.source, ValueSource::Placeholder);
        assert_eq!(
            r.value,
            json!({ "age": 0, "name": "string", "active": true, "score": 0.0, "tags": ["string"] })
        );
        assert_eq!(serde_json::to_string(&r.value["score"]).unwrap(), "0.0");
    }

    #[test]
    fn test_priority_order() {
        let resolver = Resolver::default();
        let schema = json!({ "type": "string", "example": "ex", "default": "def", "enum": ["a"] });
        assert_eq!(resolver.resolve(Some(&schema), None).value, json!("ex"));

        let schema = json!({ "type": "string", "default": "def", "enum": ["a"] });
        let r = resolver.resolve(Some(&schema), None);
        assert_eq!((r.value, r.source), (json!("def"), ValueSource::Default));

        let schema = json!({ "type": "string", "enum": ["a", "b"], "format": "uuid" });
        assert_eq!(resolver.resolve(Some(&schema), None).value, json!("a"));

        let schema = json!({ "type": "string", "format": "date" });
        let r = resolver.resolve(Some(&schema), None);
        assert_eq!(r.source, ValueSource::Format);
        assert!(!r.source.is_declared());
    }

    #[test]
    fn test_outer_example_beats_schema() {
        let schema = json!({ "type": "integer", "example": 5 });
        let r = Resolver::default().resolve(Some(&schema), Some(&json!(7)));
        assert_eq!(r.value, json!(7));
    }

    #[test]
    fn test_nested_property_examples_are_used() {
        let schema = json!({
            "type": "object",
            "properties": {
                "email": { "type": "string", "example": "a@b.c" },
                "role": { "type": "string", "enum": ["admin", "user"] }
            }
        });
        let r = Resolver::default().resolve(Some(&schema), None);
        assert_eq!(r.value, json!({ "email": "a@b.c", "role": "admin" }));
    }

    #[test]
    fn test_depth_cap_terminates() {
        // Unexpanded cyclic reference plus deep nesting
        let mut schema = json!({ "$ref": "#/components/schemas/Node" });
        for _ in 0..20 {
            schema = json!({ "type": "object", "properties": { "child": schema } });
        }
        let r = Resolver::default().resolve(Some(&schema), None);
        let mut cursor = &r.value;
        let mut levels = 0;
        while let Some(next) = cursor.get("child") {
            cursor = next;
            levels += 1;
        }
        assert_eq!(levels, MAX_DEPTH + 1);
        assert_eq!(cursor, &json!({}));
    }

    #[test]
    fn test_insert_custom_strategy() {
        struct Always42;
        impl ResolutionStrategy for Always42 {
            fn name(&self) -> &'static str {
                "always42"
            }
            fn resolve(&self, _: &Target<'_>, _: &Resolver, _: usize) -> Option<Resolved> {
                Some(Resolved::new(json!(42), ValueSource::Placeholder))
            }
        }
        let mut resolver = Resolver::default();
        resolver.insert(1, Box::new(Always42));
        assert_eq!(
            resolver.strategy_names(),
            vec!["example", "always42", "default", "enum", "format", "placeholder"]
        );
        let schema = json!({ "type": "string", "default": "x" });
        assert_eq!(resolver.resolve(Some(&schema), None).value, json!(42));
    }

    #[test]
    fn test_body_without_schema() {
        let body = RequestBodyMeta {
            content_type: "application/json".to_string(),
            media_types: Vec::new(),
            required: false,
            description: None,
            schema: None,
            example: None,
        };
        assert_eq!(Resolver::default().resolve_body(&body).value, json!({}));
    }

    #[test]
    fn test_media_type_example_wins() {
        let media = MediaTypeMeta {
            content_type: "application/json".to_string(),
            schema: Some(json!({ "type": "object", "properties": { "id": { "type": "integer" } } })),
            example: Some(json!({ "id": 7 })),
        };
        let resolver = Resolver::default();
        let r = resolver.resolve_media_type(&media);
        assert_eq!(r.value, json!({ "id": 7 }));
        assert_eq!(r.source, ValueSource::Example);

        let media = MediaTypeMeta { example: None, ..media };
        assert_eq!(resolver.resolve_media_type(&media).value, json!({ "id": 0 }));
    }
}
