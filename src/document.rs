//! Example file format.
//!
//! Every generated file is a plain-text document that a person can read and
//! the Markdown Converter can parse back. [`ExampleDocument`] owns both
//! directions so the format has a single definition.
//!
//! ```text
//! ================================================================================
//! ENDPOINT: POST /users
//! ================================================================================
//! Change: added
//! Summary: Create a user
//!
//! REQUEST BODY:
//! ----------------------------------------
//! Content-Type: application/json
//! ...
//! ```

use crate::curl::{render, render_variant, CurlVariant};
use crate::diff::{ChangeKind, ChangeRecord};
use crate::example::{schema_fields, schema_type, value_text, ResolvedRequest, Resolver, SchemaField};
use crate::spec::{MediaTypeMeta, OperationRef, ParameterLocation};
use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const BANNER: &str =
    "================================================================================";
const RULE: &str = "----------------------------------------";

static ENDPOINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ENDPOINT: (\S+) (\S+)$").expect("endpoint regex should be valid"));
static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^• (\S+) \((REQUIRED|optional)\)$").expect("bullet regex should be valid")
});
static STATUS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Status (\S+): ?(.*)$").expect("status regex should be valid"));
static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:  )*)([^:]+): (.+?)(?: \(format: ([^)]*)\))?(?: \(enum: (.*?)\))? \((required|optional)\)(?: - (.*))?$",
    )
    .expect("field regex should be valid")
});

const FIELD_STRUCTURE: &str = "Field Structure:";
const RESPONSE_STRUCTURE: &str = "  Response Structure:";
const EXAMPLE_RESPONSE: &str = "  Example Response:";
/// Prefix of structure and example lines under a response media type.
const RESPONSE_INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Changes,
    Parameters(ParameterLocation),
    RequestBody,
    Responses,
    Curl,
    Advanced,
    ContentTypes,
}

impl Section {
    fn title(&self) -> &'static str {
        match self {
            Section::Changes => "CHANGES:",
            Section::Parameters(ParameterLocation::Path) => "PATH PARAMETERS:",
            Section::Parameters(ParameterLocation::Query) => "QUERY PARAMETERS:",
            Section::Parameters(ParameterLocation::Header) => "HEADER PARAMETERS:",
            Section::Parameters(ParameterLocation::Cookie) => "COOKIE PARAMETERS:",
            Section::RequestBody => "REQUEST BODY:",
            Section::Responses => "RESPONSES:",
            Section::Curl => "CURL COMMAND:",
            Section::Advanced => "ADVANCED USAGE EXAMPLES:",
            Section::ContentTypes => "CONTENT-TYPE SPECIFIC EXAMPLES:",
        }
    }

    fn from_title(line: &str) -> Option<Self> {
        const ALL: [Section; 10] = [
            Section::Changes,
            Section::Parameters(ParameterLocation::Path),
            Section::Parameters(ParameterLocation::Query),
            Section::Parameters(ParameterLocation::Header),
            Section::Parameters(ParameterLocation::Cookie),
            Section::RequestBody,
            Section::Responses,
            Section::Curl,
            Section::Advanced,
            Section::ContentTypes,
        ];
        ALL.into_iter().find(|s| s.title() == line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub type_name: String,
    pub description: Option<String>,
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBody {
    pub content_type: String,
    pub required: bool,
    pub description: Option<String>,
    pub fields: Vec<SchemaField>,
    pub example: String,
}

/// One media type of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocMedia {
    pub content_type: String,
    pub fields: Vec<SchemaField>,
    /// `None` when the media type declares neither a schema nor an example.
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocResponse {
    pub status: String,
    pub description: Option<String>,
    pub content: Vec<DocMedia>,
}

/// Parsed form of one generated example file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleDocument {
    pub method: Method,
    pub path: String,
    pub kind: ChangeKind,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub operation_id: Option<String>,
    pub deprecated: bool,
    pub changes: Vec<String>,
    pub parameters: Vec<DocParameter>,
    pub request_body: Option<DocBody>,
    pub responses: Vec<DocResponse>,
    pub curl: String,
    /// `(caption, command)` pairs.
    pub advanced: Vec<(String, String)>,
    /// `(caption, command)` pairs, one per request media type and then one
    /// per named example when there are several.
    pub content_type_examples: Vec<(String, String)>,
}

/// Collapse every run of whitespace, newlines included, to one space.
pub(crate) fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn example_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn documented_fields(schema: Option<&Value>) -> Vec<SchemaField> {
    schema
        .map(schema_fields)
        .unwrap_or_default()
        .into_iter()
        .map(|field| SchemaField {
            name: one_line(&field.name),
            type_name: one_line(&field.type_name),
            format: field.format.as_deref().map(one_line),
            enum_values: field.enum_values.iter().map(|v| one_line(v)).collect(),
            description: field.description.as_deref().map(one_line),
            ..field
        })
        .collect()
}

fn field_line(field: &SchemaField) -> String {
    let mut line = format!("{}{}: {}", "  ".repeat(field.depth), field.name, field.type_name);
    if let Some(format) = &field.format {
        line.push_str(&format!(" (format: {format})"));
    }
    if !field.enum_values.is_empty() {
        line.push_str(&format!(" (enum: {})", field.enum_values.join(", ")));
    }
    line.push_str(if field.required { " (required)" } else { " (optional)" });
    if let Some(description) = &field.description {
        line.push_str(&format!(" - {description}"));
    }
    line
}

fn parse_field_line(line: &str) -> Option<SchemaField> {
    let c = FIELD_RE.captures(line)?;
    Some(SchemaField {
        depth: c.get(1).map_or(0, |m| m.as_str().len() / 2),
        name: c.get(2)?.as_str().to_string(),
        type_name: c.get(3)?.as_str().to_string(),
        format: c.get(4).map(|m| m.as_str().to_string()),
        enum_values: c
            .get(5)
            .map(|m| m.as_str().split(", ").map(str::to_string).collect())
            .unwrap_or_default(),
        required: c.get(6).is_some_and(|m| m.as_str() == "required"),
        description: c.get(7).map(|m| m.as_str().to_string()),
    })
}

fn documented_media(media: &MediaTypeMeta, resolver: &Resolver) -> DocMedia {
    let example = (media.schema.is_some() || media.example.is_some())
        .then(|| example_text(&resolver.resolve_media_type(media).value));
    DocMedia {
        content_type: media.content_type.clone(),
        fields: documented_fields(media.schema.as_ref()),
        example,
    }
}

/// One command per declared request media type, then one per named example
/// of the primary media type when there is more than one.
fn content_type_examples(
    op: &OperationRef,
    request: &ResolvedRequest,
    resolver: &Resolver,
) -> Vec<(String, String)> {
    let Some(body) = &op.request_body else {
        return Vec::new();
    };
    let mut out: Vec<(String, String)> = body
        .media_types
        .iter()
        .map(|media| {
            (
                format!("# For {}:", media.content_type),
                render(&resolver.with_media_type(request, media)),
            )
        })
        .collect();
    if op.examples.len() > 1 {
        for (name, value) in &op.examples {
            let media = MediaTypeMeta {
                content_type: body.content_type.clone(),
                schema: body.schema.clone(),
                example: Some(value.clone()),
            };
            out.push((
                format!("# For {} (example: {}):", body.content_type, one_line(name)),
                render(&resolver.with_media_type(request, &media)),
            ));
        }
    }
    out
}

fn type_name(schema: Option<&Value>) -> String {
    let Some(schema) = schema else {
        return "unknown".to_string();
    };
    let ty = schema_type(schema);
    match schema.get("format").and_then(Value::as_str) {
        Some(format) => format!("{ty} ({format})"),
        None => ty.to_string(),
    }
}

impl ExampleDocument {
    /// Assemble the document for one change record.
    ///
    /// `resolver` supplies response examples and the per-media-type requests.
    pub fn new(
        record: &ChangeRecord,
        op: &OperationRef,
        request: &ResolvedRequest,
        resolver: &Resolver,
    ) -> Self {
        let parameters = request
            .parameters
            .iter()
            .map(|p| DocParameter {
                name: p.meta.name.clone(),
                location: p.meta.location,
                required: p.meta.required,
                type_name: type_name(p.meta.schema.as_ref()),
                description: p.meta.description.as_deref().map(one_line),
                example: one_line(&value_text(&p.resolved.value)),
            })
            .collect();

        let request_body = op.request_body.as_ref().map(|meta| DocBody {
            content_type: meta.content_type.clone(),
            required: meta.required,
            description: meta.description.as_deref().map(one_line),
            fields: documented_fields(meta.schema.as_ref()),
            example: request
                .body
                .as_ref()
                .map(|b| example_text(&b.value))
                .unwrap_or_default(),
        });

        Self {
            method: record.method.clone(),
            path: record.path.clone(),
            kind: record.kind,
            summary: op.summary.as_deref().map(one_line),
            description: op.description.as_deref().map(one_line),
            tags: op.tags.clone(),
            operation_id: op.operation_id.clone(),
            deprecated: op.deprecated,
            changes: record.field_changes.iter().map(|c| one_line(&c.describe())).collect(),
            parameters,
            request_body,
            responses: op
                .responses
                .iter()
                .map(|r| DocResponse {
                    status: r.status.clone(),
                    description: r.description.as_deref().map(one_line),
                    content: r.content.iter().map(|m| documented_media(m, resolver)).collect(),
                })
                .collect(),
            curl: render(request),
            advanced: CurlVariant::ADVANCED
                .iter()
                .map(|v| (v.caption().to_string(), render_variant(request, *v)))
                .collect(),
            content_type_examples: content_type_examples(op, request, resolver),
        }
    }

    /// Parameters declared in `location`, in declaration order.
    pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &DocParameter> {
        self.parameters.iter().filter(move |p| p.location == location)
    }

    /// Serialize to the example file format. Ends with a newline.
    pub fn to_text(&self) -> String {
        let mut out: Vec<String> = vec![
            BANNER.to_string(),
            format!("ENDPOINT: {} {}", self.method, self.path),
            BANNER.to_string(),
            format!("Change: {}", self.kind),
        ];
        if let Some(s) = &self.summary {
            out.push(format!("Summary: {s}"));
        }
        if let Some(d) = &self.description {
            out.push(format!("Description: {d}"));
        }
        if !self.tags.is_empty() {
            out.push(format!("Tags: {}", self.tags.join(", ")));
        }
        if let Some(id) = &self.operation_id {
            out.push(format!("Operation ID: {id}"));
        }
        if self.deprecated {
            out.push("Deprecated: yes".to_string());
        }
        out.push(String::new());

        let open = |out: &mut Vec<String>, section: Section| {
            out.push(section.title().to_string());
            out.push(RULE.to_string());
        };

        if !self.changes.is_empty() {
            open(&mut out, Section::Changes);
            out.extend(self.changes.iter().map(|c| format!("- {c}")));
            out.push(String::new());
        }

        for location in [
            ParameterLocation::Path,
            ParameterLocation::Query,
            ParameterLocation::Header,
            ParameterLocation::Cookie,
        ] {
            let params: Vec<_> = self.parameters_in(location).collect();
            if params.is_empty() {
                continue;
            }
            open(&mut out, Section::Parameters(location));
            for p in params {
                let req = if p.required { "REQUIRED" } else { "optional" };
                out.push(format!("• {} ({req})", p.name));
                out.push(format!("  Type: {}", p.type_name));
                if let Some(d) = &p.description {
                    out.push(format!("  Description: {d}"));
                }
                out.push(format!("  Example: {}", p.example));
                out.push(String::new());
            }
        }

        if let Some(body) = &self.request_body {
            open(&mut out, Section::RequestBody);
            out.push(format!("Content-Type: {}", body.content_type));
            out.push(format!("Required: {}", if body.required { "Yes" } else { "No" }));
            if let Some(d) = &body.description {
                out.push(format!("Description: {d}"));
            }
            if !body.fields.is_empty() {
                out.push(FIELD_STRUCTURE.to_string());
                out.extend(body.fields.iter().map(field_line));
            }
            out.push("Example:".to_string());
            out.push(body.example.clone());
            out.push(String::new());
        }

        if !self.responses.is_empty() {
            open(&mut out, Section::Responses);
            for r in &self.responses {
                out.push(format!(
                    "Status {}: {}",
                    r.status,
                    r.description.as_deref().unwrap_or_default()
                ));
                for media in &r.content {
                    out.push(format!("  Content-Type: {}", media.content_type));
                    if !media.fields.is_empty() {
                        out.push(RESPONSE_STRUCTURE.to_string());
                        out.extend(
                            media
                                .fields
                                .iter()
                                .map(|f| format!("{RESPONSE_INDENT}{}", field_line(f))),
                        );
                    }
                    if let Some(example) = &media.example {
                        out.push(EXAMPLE_RESPONSE.to_string());
                        out.extend(example.split('\n').map(|l| format!("{RESPONSE_INDENT}{l}")));
                    }
                }
            }
            out.push(String::new());
        }

        open(&mut out, Section::Curl);
        out.push(self.curl.clone());
        out.push(String::new());

        if !self.advanced.is_empty() {
            open(&mut out, Section::Advanced);
            for (caption, command) in &self.advanced {
                out.push(caption.clone());
                out.push(command.clone());
                out.push(String::new());
            }
        }

        if !self.content_type_examples.is_empty() {
            open(&mut out, Section::ContentTypes);
            for (caption, command) in &self.content_type_examples {
                out.push(caption.clone());
                out.push(command.clone());
                out.push(String::new());
            }
        }

        let mut text = out.join("\n");
        while text.ends_with("\n\n") {
            text.pop();
        }
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text
    }

    /// Parse a document produced by [`ExampleDocument::to_text`].
    ///
    /// Returns a description of the first problem found when the text does
    /// not follow the format.
    pub fn parse(text: &str) -> Result<Self, String> {
        let lines: Vec<&str> = text.lines().collect();

        let (method, path) = lines
            .iter()
            .find_map(|l| ENDPOINT_RE.captures(l))
            .and_then(|c| {
                let method = Method::from_bytes(c.get(1)?.as_str().as_bytes()).ok()?;
                Some((method, c.get(2)?.as_str().to_string()))
            })
            .ok_or_else(|| "missing ENDPOINT line".to_string())?;

        // Section boundaries: a title line immediately followed by the rule
        let mut starts: Vec<(usize, Section)> = Vec::new();
        for (i, window) in lines.windows(2).enumerate() {
            if window[1] == RULE {
                if let Some(section) = Section::from_title(window[0]) {
                    starts.push((i, section));
                }
            }
        }
        let header_end = starts.first().map(|(i, _)| *i).unwrap_or(lines.len());

        let mut doc = ExampleDocument {
            method,
            path,
            kind: ChangeKind::Added,
            summary: None,
            description: None,
            tags: Vec::new(),
            operation_id: None,
            deprecated: false,
            changes: Vec::new(),
            parameters: Vec::new(),
            request_body: None,
            responses: Vec::new(),
            curl: String::new(),
            advanced: Vec::new(),
            content_type_examples: Vec::new(),
        };

        let mut kind = None;
        for line in &lines[..header_end] {
            if let Some(v) = line.strip_prefix("Change: ") {
                kind = ChangeKind::parse(v);
            } else if let Some(v) = line.strip_prefix("Summary: ") {
                doc.summary = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("Description: ") {
                doc.description = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("Tags: ") {
                doc.tags = v.split(", ").map(str::to_string).collect();
            } else if let Some(v) = line.strip_prefix("Operation ID: ") {
                doc.operation_id = Some(v.to_string());
            } else if line.starts_with("Deprecated: ") {
                doc.deprecated = true;
            }
        }
        doc.kind = kind.ok_or_else(|| "missing or unknown Change line".to_string())?;

        for (n, (start, section)) in starts.iter().enumerate() {
            let end = starts.get(n + 1).map(|(i, _)| *i).unwrap_or(lines.len());
            let mut body: &[&str] = &lines[start + 2..end];
            while let Some((last, rest)) = body.split_last() {
                if last.trim().is_empty() {
                    body = rest;
                } else {
                    break;
                }
            }
            match section {
                Section::Changes => {
                    doc.changes = body
                        .iter()
                        .filter_map(|l| l.strip_prefix("- "))
                        .map(str::to_string)
                        .collect();
                }
                Section::Parameters(location) => parse_parameters(body, *location, &mut doc.parameters),
                Section::RequestBody => doc.request_body = Some(parse_body(body)),
                Section::Responses => doc.responses = parse_responses(body),
                Section::Curl => doc.curl = body.join("\n"),
                Section::Advanced => doc.advanced = parse_captioned(body),
                Section::ContentTypes => doc.content_type_examples = parse_captioned(body),
            }
        }

        Ok(doc)
    }
}

fn parse_parameters(lines: &[&str], location: ParameterLocation, out: &mut Vec<DocParameter>) {
    for line in lines {
        if let Some(c) = BULLET_RE.captures(line) {
            out.push(DocParameter {
                name: c[1].to_string(),
                location,
                required: &c[2] == "REQUIRED",
                type_name: String::new(),
                description: None,
                example: String::new(),
            });
        } else if let Some(p) = out.last_mut() {
            if let Some(v) = line.strip_prefix("  Type: ") {
                p.type_name = v.to_string();
            } else if let Some(v) = line.strip_prefix("  Description: ") {
                p.description = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("  Example: ") {
                p.example = v.to_string();
            }
        }
    }
}

fn parse_body(lines: &[&str]) -> DocBody {
    let mut body = DocBody {
        content_type: String::new(),
        required: false,
        description: None,
        fields: Vec::new(),
        example: String::new(),
    };
    let mut in_fields = false;
    for (i, line) in lines.iter().enumerate() {
        if *line == "Example:" {
            body.example = lines[i + 1..].join("\n");
            break;
        }
        if in_fields {
            body.fields.extend(parse_field_line(line));
        } else if *line == FIELD_STRUCTURE {
            in_fields = true;
        } else if let Some(v) = line.strip_prefix("Content-Type: ") {
            body.content_type = v.to_string();
        } else if let Some(v) = line.strip_prefix("Required: ") {
            body.required = v == "Yes";
        } else if let Some(v) = line.strip_prefix("Description: ") {
            body.description = Some(v.to_string());
        }
    }
    body
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ResponseBlock {
    None,
    Structure,
    Example,
}

fn parse_responses(lines: &[&str]) -> Vec<DocResponse> {
    let mut out: Vec<DocResponse> = Vec::new();
    let mut block = ResponseBlock::None;
    for line in lines {
        if let Some(c) = STATUS_RE.captures(line) {
            let description = c[2].trim();
            out.push(DocResponse {
                status: c[1].to_string(),
                description: (!description.is_empty()).then(|| description.to_string()),
                content: Vec::new(),
            });
            block = ResponseBlock::None;
            continue;
        }
        let Some(response) = out.last_mut() else {
            continue;
        };
        if let Some(v) = line.strip_prefix("  Content-Type: ") {
            response.content.push(DocMedia {
                content_type: v.to_string(),
                fields: Vec::new(),
                example: None,
            });
            block = ResponseBlock::None;
        } else if *line == RESPONSE_STRUCTURE {
            block = ResponseBlock::Structure;
        } else if *line == EXAMPLE_RESPONSE {
            block = ResponseBlock::Example;
            if let Some(media) = response.content.last_mut() {
                media.example = Some(String::new());
            }
        } else if let Some(rest) = line.strip_prefix(RESPONSE_INDENT) {
            let Some(media) = response.content.last_mut() else {
                continue;
            };
            match block {
                ResponseBlock::Structure => media.fields.extend(parse_field_line(rest)),
                ResponseBlock::Example => {
                    if let Some(example) = media.example.as_mut() {
                        example.push_str(rest);
                        example.push('\n');
                    }
                }
                ResponseBlock::None => {}
            }
        }
    }
    for media in out.iter_mut().flat_map(|r| r.content.iter_mut()) {
        if let Some(example) = media.example.as_mut() {
            example.pop();
        }
    }
    out
}

fn parse_captioned(lines: &[&str]) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;
    for line in lines {
        if line.starts_with("# ") {
            if let Some((caption, cmd)) = current.take() {
                out.push((caption, cmd.join("\n").trim_end().to_string()));
            }
            current = Some((line.to_string(), Vec::new()));
        } else if let Some((_, cmd)) = current.as_mut() {
            cmd.push(line);
        }
    }
    if let Some((caption, cmd)) = current {
        out.push((caption, cmd.join("\n").trim_end().to_string()));
    }
    out
}
