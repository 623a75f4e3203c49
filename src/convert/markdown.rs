use super::templates::{environment, ENDPOINT_TEMPLATE};
use crate::diff::ChangeKind;
use crate::document::ExampleDocument;
use crate::error::{Error, Result};
use crate::example::{BodyKind, SchemaField};
use crate::generator::{read_summary, SUMMARY_FILE};
use crate::spec::ParameterLocation;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Serialize)]
struct ParamView {
    name: String,
    type_name: String,
    required: bool,
    description: String,
    example: String,
}

#[derive(Serialize)]
struct ParamGroup {
    title: &'static str,
    params: Vec<ParamView>,
}

#[derive(Serialize)]
struct FieldView {
    /// Dotted path from the top-level field.
    name: String,
    type_name: String,
    format: String,
    required: bool,
    description: String,
}

#[derive(Serialize)]
struct BodyView {
    content_type: String,
    required: bool,
    description: String,
    fields: Vec<FieldView>,
    fence: &'static str,
    example: String,
}

#[derive(Serialize)]
struct MediaView {
    content_type: String,
    fields: Vec<FieldView>,
    fence: &'static str,
    example: Option<String>,
}

#[derive(Serialize)]
struct ResponseView {
    status: String,
    description: String,
    content_types: String,
    content: Vec<MediaView>,
}

#[derive(Serialize)]
struct ExampleView {
    title: String,
    command: String,
}

#[derive(Serialize)]
struct EndpointPage {
    method: String,
    path: String,
    kind: ChangeKind,
    summary: String,
    description: String,
    operation_id: String,
    tags: String,
    deprecated: bool,
    changes: Vec<String>,
    parameter_groups: Vec<ParamGroup>,
    request_body: Option<BodyView>,
    responses: Vec<ResponseView>,
    curl: String,
    advanced: Vec<ExampleView>,
    content_type_examples: Vec<ExampleView>,
}

fn fence(content_type: &str) -> &'static str {
    match BodyKind::for_content_type(content_type) {
        BodyKind::Json => "json",
        _ => "",
    }
}

fn field_views(fields: &[SchemaField]) -> Vec<FieldView> {
    let mut parents: Vec<&str> = Vec::new();
    fields
        .iter()
        .map(|field| {
            parents.truncate(field.depth);
            let name = parents
                .iter()
                .copied()
                .chain([field.name.as_str()])
                .collect::<Vec<_>>()
                .join(".");
            parents.push(&field.name);

            let mut description = field.description.clone().unwrap_or_default();
            if !field.enum_values.is_empty() {
                if !description.is_empty() {
                    description.push(' ');
                }
                description.push_str(&format!("One of: {}", field.enum_values.join(", ")));
            }
            FieldView {
                name,
                type_name: field.type_name.clone(),
                format: field.format.clone().unwrap_or_default(),
                required: field.required,
                description,
            }
        })
        .collect()
}

fn example_views(captioned: &[(String, String)]) -> Vec<ExampleView> {
    captioned
        .iter()
        .map(|(caption, command)| ExampleView {
            title: caption
                .trim_start_matches('#')
                .trim()
                .trim_end_matches(':')
                .to_string(),
            command: command.clone(),
        })
        .collect()
}

impl EndpointPage {
    fn from_document(doc: &ExampleDocument) -> Self {
        let groups = [
            (ParameterLocation::Path, "Path Parameters"),
            (ParameterLocation::Query, "Query Parameters"),
            (ParameterLocation::Header, "Header Parameters"),
            (ParameterLocation::Cookie, "Cookie Parameters"),
        ];
        let parameter_groups = groups
            .into_iter()
            .map(|(location, title)| ParamGroup {
                title,
                params: doc
                    .parameters_in(location)
                    .map(|p| ParamView {
                        name: p.name.clone(),
                        type_name: p.type_name.clone(),
                        required: p.required,
                        description: p.description.clone().unwrap_or_default(),
                        example: p.example.clone(),
                    })
                    .collect(),
            })
            .filter(|g| !g.params.is_empty())
            .collect();

        Self {
            method: doc.method.to_string(),
            path: doc.path.clone(),
            kind: doc.kind,
            summary: doc.summary.clone().unwrap_or_default(),
            description: doc.description.clone().unwrap_or_default(),
            operation_id: doc.operation_id.clone().unwrap_or_default(),
            tags: doc.tags.join(", "),
            deprecated: doc.deprecated,
            changes: doc.changes.clone(),
            parameter_groups,
            request_body: doc.request_body.as_ref().map(|b| BodyView {
                content_type: b.content_type.clone(),
                required: b.required,
                description: b.description.clone().unwrap_or_default(),
                fields: field_views(&b.fields),
                fence: fence(&b.content_type),
                example: b.example.clone(),
            }),
            responses: doc
                .responses
                .iter()
                .map(|r| ResponseView {
                    status: r.status.clone(),
                    description: r.description.clone().unwrap_or_default(),
                    content_types: r
                        .content
                        .iter()
                        .map(|m| m.content_type.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    content: r
                        .content
                        .iter()
                        .map(|m| MediaView {
                            content_type: m.content_type.clone(),
                            fields: field_views(&m.fields),
                            fence: fence(&m.content_type),
                            example: m.example.clone(),
                        })
                        .collect(),
                })
                .collect(),
            curl: doc.curl.clone(),
            advanced: example_views(&doc.advanced),
            content_type_examples: example_views(&doc.content_type_examples),
        }
    }
}

/// Render one example document as a markdown page.
pub fn render_endpoint_page(doc: &ExampleDocument) -> Result<String> {
    let env = environment()?;
    let page = EndpointPage::from_document(doc);
    Ok(env.get_template(ENDPOINT_TEMPLATE)?.render(&page)?)
}

fn remove_stale_pages(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        }
    }
    Ok(())
}

/// Convert every generated example listed in `<output_dir>/summary.txt` into
/// `<markdown_dir>/<kind>/<stem>.md`.
///
/// Reads only the output tree. Pages from a previous run are removed first;
/// other files in the kind directories are left alone, so `markdown_dir` may
/// be the output directory itself.
/// Returns the written pages in summary order.
pub fn markdown_convert(output_dir: &Path, markdown_dir: &Path) -> Result<Vec<PathBuf>> {
    let rows = read_summary(&output_dir.join(SUMMARY_FILE))?;

    fs::create_dir_all(markdown_dir).map_err(|e| Error::io(markdown_dir, e))?;
    for kind in ChangeKind::ALL {
        remove_stale_pages(&markdown_dir.join(kind.as_str()))?;
    }

    let mut written = Vec::new();
    for row in rows.iter().filter(|r| r.is_generated()) {
        let Some(file) = &row.file else {
            continue;
        };
        let source = output_dir.join(file);
        if !source.exists() {
            return Err(Error::MissingInput { file: source });
        }
        let text = fs::read_to_string(&source).map_err(|e| Error::io(&source, e))?;
        let doc = ExampleDocument::parse(&text).map_err(|reason| Error::DocumentParse {
            file: source.clone(),
            reason,
        })?;

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "endpoint".to_string());
        let dir = markdown_dir.join(row.kind.as_str());
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        let target = dir.join(format!("{stem}.md"));
        fs::write(&target, render_endpoint_page(&doc)?).map_err(|e| Error::io(&target, e))?;
        debug!(source = %source.display(), page = %target.display(), "Markdown page written");
        written.push(target);
    }

    info!(
        markdown_dir = %markdown_dir.display(),
        pages = written.len(),
        "Markdown conversion complete"
    );
    Ok(written)
}
