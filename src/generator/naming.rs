use http::Method;
use std::collections::HashSet;
use tracing::warn;

/// File stem for an endpoint: `METHOD__clean_path`.
///
/// Separators and characters that are unsafe in file names collapse to a
/// single `_`; `/` becomes `root`.
pub fn sanitize_file_stem(method: &Method, path: &str) -> String {
    let mut clean = String::with_capacity(path.len());
    for c in path.trim_start_matches('/').chars() {
        let safe = c.is_ascii_alphanumeric() || matches!(c, '-' | '.');
        if safe {
            clean.push(c);
        } else if !clean.ends_with('_') {
            clean.push('_');
        }
    }
    let clean = clean.trim_matches('_');
    let clean = if clean.is_empty() { "root" } else { clean };
    format!("{}__{}", method.as_str().to_ascii_uppercase(), clean)
}

/// Make `stem` unique within `seen` by appending `_1`, `_2`, ...
pub(crate) fn unique_file_stem(seen: &mut HashSet<String>, stem: &str) -> String {
    if seen.insert(stem.to_string()) {
        return stem.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{stem}_{counter}");
        if !seen.contains(&candidate) {
            warn!(stem = %stem, file = %candidate, "Duplicate output name, using suffixed file");
            seen.insert(candidate.clone());
            return candidate;
        }
        counter += 1;
    }
}
