use super::templates::{environment, README_TEMPLATE};
use crate::diff::ChangeKind;
use crate::document::one_line;
use crate::error::Result;
use crate::generator::{read_summary, SummaryRecord};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Default README title.
pub const DEFAULT_TITLE: &str = "API Changes";
/// Default branch used in hyperlinks.
pub const DEFAULT_BRANCH: &str = "main";

/// Presentation options for the README.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    pub title: String,
    /// Base URL for links, e.g. `https://github.com/acme/api/blob`. Plain text
    /// rows when absent.
    pub github_url: Option<String>,
    pub branch: String,
    /// Directory of the output tree inside the repository.
    pub source_dir: Option<String>,
    pub include_badges: bool,
    pub include_toc: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            github_url: None,
            branch: DEFAULT_BRANCH.to_string(),
            source_dir: None,
            include_badges: true,
            include_toc: true,
        }
    }
}

impl SummaryOptions {
    /// `<github_url>/<branch>/<source_dir>/<file>`, or `None` without a base URL.
    pub fn link_for(&self, file: &str) -> Option<String> {
        let base = self.github_url.as_deref()?.trim_end_matches('/');
        let mut parts = vec![base, self.branch.trim_matches('/')];
        if let Some(dir) = self.source_dir.as_deref().map(|d| d.trim_matches('/')) {
            if !dir.is_empty() {
                parts.push(dir);
            }
        }
        parts.push(file.trim_start_matches('/'));
        Some(parts.join("/"))
    }
}

#[derive(Serialize, Default)]
struct Counts {
    total: usize,
    added: usize,
    modified: usize,
    removed: usize,
    generated: usize,
    skipped: usize,
}

#[derive(Serialize)]
struct MethodRow {
    method: String,
    count: usize,
    percentage: String,
}

#[derive(Serialize)]
struct Row {
    line: String,
    changes: Vec<String>,
}

#[derive(Serialize)]
struct Section {
    heading: &'static str,
    anchor: &'static str,
    empty: &'static str,
    rows: Vec<Row>,
}

#[derive(Serialize)]
struct ReadmeView {
    title: String,
    badges: String,
    include_toc: bool,
    counts: Counts,
    methods: Vec<MethodRow>,
    sections: Vec<Section>,
    skipped: Vec<String>,
}

const METHOD_ORDER: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

fn method_rank(method: &str) -> (usize, String) {
    let rank = METHOD_ORDER
        .iter()
        .position(|m| *m == method)
        .unwrap_or(METHOD_ORDER.len());
    (rank, method.to_string())
}

fn badge(label: &str, count: usize, color: &str) -> String {
    format!(
        "![{label}](https://img.shields.io/badge/{}-{count}-{color})",
        urlencoding::encode(label)
    )
}

fn endpoint_line(row: &SummaryRecord, options: &SummaryOptions) -> String {
    let target = row.file.as_deref().and_then(|f| options.link_for(f));
    let mut line = match target {
        Some(url) => format!("- **`{}`** [`{}`]({url})", row.method, row.path),
        None => format!("- **`{}`** `{}`", row.method, row.path),
    };
    if let Some(summary) = row.summary.as_deref().map(one_line).filter(|s| !s.is_empty()) {
        line.push_str(": ");
        line.push_str(&summary);
    }
    if !row.is_generated() {
        line.push_str(" _(skipped)_");
    }
    line
}

/// Render the README for summary rows. Row order is kept as given.
pub fn render_readme(rows: &[SummaryRecord], options: &SummaryOptions) -> Result<String> {
    let mut counts = Counts {
        total: rows.len(),
        ..Counts::default()
    };
    for row in rows {
        match row.kind {
            ChangeKind::Added => counts.added += 1,
            ChangeKind::Modified => counts.modified += 1,
            ChangeKind::Removed => counts.removed += 1,
        }
        if row.is_generated() {
            counts.generated += 1;
        } else {
            counts.skipped += 1;
        }
    }

    let mut by_method: Vec<(String, usize)> = Vec::new();
    for row in rows {
        match by_method.iter_mut().find(|(m, _)| *m == row.method) {
            Some((_, n)) => *n += 1,
            None => by_method.push((row.method.clone(), 1)),
        }
    }
    by_method.sort_by_key(|(m, _)| method_rank(m));
    let methods = by_method
        .into_iter()
        .map(|(method, count)| MethodRow {
            method,
            count,
            percentage: format!("{:.1}%", count as f64 * 100.0 / counts.total as f64),
        })
        .collect();

    let section = |kind: ChangeKind,
                   heading: &'static str,
                   anchor: &'static str,
                   empty: &'static str| Section {
        heading,
        anchor,
        empty,
        rows: rows
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| Row {
                line: endpoint_line(r, options),
                changes: r.changes.clone(),
            })
            .collect(),
    };
    let sections = vec![
        section(ChangeKind::Added, "Added Endpoints", "added-endpoints", "No endpoints added"),
        section(
            ChangeKind::Modified,
            "Modified Endpoints",
            "modified-endpoints",
            "No endpoints modified",
        ),
        section(ChangeKind::Removed, "Removed Endpoints", "removed-endpoints", "No endpoints removed"),
    ];

    let skipped = rows
        .iter()
        .filter(|r| !r.is_generated())
        .map(|r| {
            format!(
                "could not generate example for {}: {}",
                r.endpoint(),
                r.reason.as_deref().unwrap_or("unknown reason")
            )
        })
        .collect();

    let badges = if options.include_badges {
        let mut list = vec![badge("Total Changes", counts.total, "blue")];
        if counts.added > 0 {
            list.push(badge("Added", counts.added, "green"));
        }
        if counts.modified > 0 {
            list.push(badge("Modified", counts.modified, "yellow"));
        }
        if counts.removed > 0 {
            list.push(badge("Removed", counts.removed, "red"));
        }
        if counts.skipped > 0 {
            list.push(badge("Skipped", counts.skipped, "lightgrey"));
        }
        list.join(" ")
    } else {
        String::new()
    };

    let view = ReadmeView {
        title: options.title.clone(),
        badges,
        include_toc: options.include_toc,
        counts,
        methods,
        sections,
        skipped,
    };
    let env = environment()?;
    Ok(env.get_template(README_TEMPLATE)?.render(&view)?)
}

/// Read `summary_file` and render the README.
///
/// Consumes only the summary log; the OpenAPI document and diff are never
/// read here.
pub fn summary_convert(summary_file: &Path, options: &SummaryOptions) -> Result<String> {
    let rows = read_summary(summary_file)?;
    let readme = render_readme(&rows, options)?;
    info!(
        summary = %summary_file.display(),
        rows = rows.len(),
        links = options.github_url.is_some(),
        "README rendered"
    );
    Ok(readme)
}
