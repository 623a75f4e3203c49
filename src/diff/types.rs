use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification of a diff entry. Also names the output subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 3] = [ChangeKind::Added, ChangeKind::Removed, ChangeKind::Modified];

    /// Accepts the canonical names plus the aliases used by common diff tools.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "added" | "new" | "add" => Some(ChangeKind::Added),
            "removed" | "deleted" | "delete" | "remove" => Some(ChangeKind::Removed),
            "modified" | "changed" | "modify" | "change" => Some(ChangeKind::Modified),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level difference inside a modified operation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl FieldChange {
    /// A change known only by its description (text diffs).
    pub fn described(text: impl Into<String>) -> Self {
        Self {
            field: text.into(),
            before: None,
            after: None,
        }
    }

    /// Single-line rendering used in example files and the summary log.
    pub fn describe(&self) -> String {
        match (&self.before, &self.after) {
            (Some(b), Some(a)) => format!("{}: {} -> {}", self.field, compact(b), compact(a)),
            (None, Some(a)) => format!("{}: added {}", self.field, compact(a)),
            (Some(b), None) => format!("{}: removed {}", self.field, compact(b)),
            (None, None) => self.field.clone(),
        }
    }
}

/// One entry of the diff input, in diff order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    pub path: String,
    pub method: Method,
    pub kind: ChangeKind,
    /// Populated only for [`ChangeKind::Modified`].
    pub field_changes: Vec<FieldChange>,
    /// Prior operation object recorded by the diff (used for removed entries).
    pub before: Option<Value>,
}

impl ChangeRecord {
    pub fn new(path: impl Into<String>, method: Method, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            method,
            kind,
            field_changes: Vec::new(),
            before: None,
        }
    }

    /// `METHOD /path`
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}
