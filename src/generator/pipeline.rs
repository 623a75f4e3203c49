use super::naming::{sanitize_file_stem, unique_file_stem};
use super::summary::{write_summary, GenerationStatus, SummaryRecord, SUMMARY_FILE};
use crate::diff::{ChangeKind, ChangeRecord};
use crate::document::{one_line, ExampleDocument};
use crate::error::{Error, Result, SkipReason};
use crate::example::{ResolvedRequest, Resolver};
use crate::spec::{build_operation, normalize_base_url, OperationRef, SpecIndex};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default output directory for example files.
pub const DEFAULT_OUTPUT_DIR: &str = "curl_files";

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    /// Replaces the base URL taken from the document when set.
    pub base_url: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated {
        /// Path relative to the output directory.
        file: String,
        request: ResolvedRequest,
    },
    Skipped(SkipReason),
}

/// What happened to one change record.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub record: ChangeRecord,
    pub summary: Option<String>,
    pub outcome: GenerationOutcome,
}

impl GenerationResult {
    pub fn is_generated(&self) -> bool {
        matches!(self.outcome, GenerationOutcome::Generated { .. })
    }

    /// Row for the summary log.
    pub fn to_summary_record(&self) -> SummaryRecord {
        let (status, file, reason) = match &self.outcome {
            GenerationOutcome::Generated { file, .. } => {
                (GenerationStatus::Generated, Some(file.clone()), None)
            }
            GenerationOutcome::Skipped(reason) => {
                (GenerationStatus::Skipped, None, Some(reason.to_string()))
            }
        };
        SummaryRecord {
            kind: self.record.kind,
            method: self.record.method.to_string(),
            path: self.record.path.clone(),
            status,
            file,
            summary: self.summary.clone(),
            reason,
            changes: self
                .record
                .field_changes
                .iter()
                .map(|c| c.describe())
                .collect(),
        }
    }
}

/// Operation shape for a removed endpoint.
///
/// The diff's recorded `before` object is authoritative. References inside it
/// resolve against the current document's components. Without it only the
/// path template is known.
fn reconstruct_removed(spec: &SpecIndex, record: &ChangeRecord) -> OperationRef {
    let empty = json!({});
    let before: &Value = record.before.as_ref().unwrap_or(&empty);
    build_operation(
        spec.document(),
        &record.path,
        record.method.clone(),
        &[],
        before,
    )
}

/// Remove example files left by a previous run.
fn clear_output(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;
    for kind in ChangeKind::ALL {
        let dir = output_dir.join(kind.as_str());
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        }
    }
    Ok(())
}

/// Run the pipeline over `records` in order.
///
/// Every record yields exactly one [`GenerationResult`]. Example files go to
/// `<output_dir>/<kind>/<METHOD__path>.txt` and one summary row per record is
/// written to `<output_dir>/summary.txt`. A lookup miss for an added or
/// modified record is a skip, not an error.
///
/// # Errors
///
/// Only I/O failures on the output tree.
pub fn generate(
    spec: &SpecIndex,
    records: &[ChangeRecord],
    config: &GeneratorConfig,
) -> Result<Vec<GenerationResult>> {
    let output_dir = config.output_dir.as_path();
    let base_url = config
        .base_url
        .as_deref()
        .map(normalize_base_url)
        .unwrap_or_else(|| spec.base_url().to_string());
    info!(
        output_dir = %output_dir.display(),
        base_url = %base_url,
        records = records.len(),
        "Generating examples"
    );

    clear_output(output_dir)?;
    let resolver = Resolver::default();
    let mut seen: HashMap<ChangeKind, HashSet<String>> = HashMap::new();
    let mut results = Vec::with_capacity(records.len());

    for record in records {
        let op = match record.kind {
            ChangeKind::Removed => Some(reconstruct_removed(spec, record)),
            ChangeKind::Added | ChangeKind::Modified => {
                spec.lookup(&record.path, &record.method).cloned()
            }
        };

        let Some(op) = op else {
            warn!(
                method = %record.method,
                path = %record.path,
                kind = %record.kind,
                "Operation not found in OpenAPI document, skipping"
            );
            results.push(GenerationResult {
                record: record.clone(),
                summary: None,
                outcome: GenerationOutcome::Skipped(SkipReason::OperationNotFound),
            });
            continue;
        };

        let request = resolver.resolve_request(&op, &base_url);
        let document = ExampleDocument::new(record, &op, &request, &resolver);

        let kind_dir = output_dir.join(record.kind.as_str());
        fs::create_dir_all(&kind_dir).map_err(|e| Error::io(&kind_dir, e))?;
        let stem = unique_file_stem(
            seen.entry(record.kind).or_default(),
            &sanitize_file_stem(&record.method, &record.path),
        );
        let file_name = format!("{stem}.txt");
        let file_path = kind_dir.join(&file_name);
        fs::write(&file_path, document.to_text()).map_err(|e| Error::io(&file_path, e))?;
        debug!(
            method = %record.method,
            path = %record.path,
            kind = %record.kind,
            file = %file_path.display(),
            "Example written"
        );

        results.push(GenerationResult {
            record: record.clone(),
            summary: op.summary.as_deref().map(one_line),
            outcome: GenerationOutcome::Generated {
                file: format!("{}/{file_name}", record.kind.as_str()),
                request,
            },
        });
    }

    let rows: Vec<SummaryRecord> = results.iter().map(GenerationResult::to_summary_record).collect();
    let summary_path = output_dir.join(SUMMARY_FILE);
    write_summary(&summary_path, &rows)?;

    let generated = results.iter().filter(|r| r.is_generated()).count();
    info!(
        generated,
        skipped = results.len() - generated,
        summary = %summary_path.display(),
        "Generation complete"
    );
    Ok(results)
}
