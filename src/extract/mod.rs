//! Content extraction into an in-memory file tree.
//!
//! Each document produces an [`ExtractionManifest`] rooted at its sanitized
//! name, with `text/`, `formulas/`, `images/`, `tables/` and
//! `combined_text/` subdirectories.

mod formula;
mod manifest;
mod npy;
mod pipeline;
mod sanitize;

pub use formula::{extract_formulas, formulas_markdown, is_formula, MATH_INDICATORS};
pub use manifest::{
    ExtractionManifest, ExtractionSummary, COMBINED_DIR, FORMULAS_DIR, IMAGES_DIR, TABLES_DIR,
    TEXT_DIR,
};
pub use npy::npy_u8;
pub use pipeline::{extract_document, ContentExtractor, Extraction, SpanTableSource, TableSource};
pub use sanitize::{document_base_name, sanitize, PLACEHOLDER_NAME};
