//! Filesystem-safe document names.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

/// Name used when nothing survives sanitization.
pub const PLACEHOLDER_NAME: &str = "pdf";

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9]+").expect("valid regex"))
}

/// Collapse runs of non-ASCII-alphanumerics into `_` and trim underscores.
///
/// Returns [`PLACEHOLDER_NAME`] when the result would be empty.
pub fn sanitize(name: &str) -> String {
    let replaced = non_alphanumeric().replace_all(name, "_");
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sanitized file stem of a document label (`"My Paper (v2).pdf"` -> `"My_Paper_v2"`).
pub fn document_base_name(label: &str) -> String {
    let stem = Path::new(label)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    sanitize(&stem)
}
