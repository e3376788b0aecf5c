//! # pdf-workbench
//!
//! Page-level PDF assembly and content extraction for Rust.
//!
//! Load one or more PDFs, pick pages per document, then produce a merged
//! PDF, one filtered PDF per input, a PDF in an arbitrary cross-document
//! page order, or a ZIP archive of the extracted content.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_workbench::Session;
//!
//! fn main() -> pdf_workbench::Result<()> {
//!     let mut session = Session::new();
//!     session.add_bytes("a.pdf", std::fs::read("a.pdf")?)?;
//!     session.add_bytes("b.pdf", std::fs::read("b.pdf")?)?;
//!
//!     // Pages 1 and 3 of a.pdf, all of b.pdf
//!     session.set_selection("a.pdf", [0, 2])?;
//!     std::fs::write("merged.pdf", session.merge()?)?;
//!
//!     // b.pdf page 1, then a.pdf page 2
//!     session.set_ordering(["1:0", "0:1"])?;
//!     std::fs::write("organized.pdf", session.build_ordered()?)?;
//!
//!     std::fs::write("extracted.zip", session.extract_zip()?)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Structural page copy**: content streams, fonts and images are carried
//!   over byte for byte, inherited page attributes are materialized
//! - **Selection model**: per-document page sets where an empty set means
//!   every page
//! - **Cross-document ordering**: `"<doc>:<page>"` keys with duplicates and
//!   omissions allowed
//! - **Content extraction**: per-page text, formula lines, images with
//!   `.npy` dumps, tables as CSV and Markdown, combined text

pub mod archive;
pub mod assemble;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use archive::{
    build_extraction_zip, build_extraction_zip_with, bundle_filtered, filtered_output_name,
    ArchiveOptions, ExtractionArchive, FILTERED_BUNDLE_NAME, MERGED_OUTPUT_NAME,
    ORGANIZED_OUTPUT_NAME,
};
pub use assemble::{build_in_order, filter_selected, merge_selected};
pub use detect::{detect_format_from_bytes, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use extract::{
    sanitize, ContentExtractor, Extraction, ExtractionManifest, ExtractionSummary, TableSource,
};
pub use model::{
    parse_page_list, DocumentSet, ImportReport, OrganizerLists, PageKey, PageOrdering, PagePlan,
    PageRef, PageSet, SelectionStore, Session, SourceDocument, Table,
};
pub use parser::{ExtractOptions, TableDetectorConfig};
pub use render::TableMarkdown;

use std::path::Path;

/// Load a PDF file as a source document labelled with its file name.
///
/// # Example
///
/// ```no_run
/// let doc = pdf_workbench::load_file("report.pdf").unwrap();
/// println!("{}: {} pages", doc.label, doc.page_count);
/// ```
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<SourceDocument> {
    SourceDocument::open(path)
}

/// Load several PDF files into a session, failing on the first bad file.
pub fn load_session<I, P>(paths: I) -> Result<Session>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut session = Session::new();
    for path in paths {
        let document = SourceDocument::open(path)?;
        let label = document.label.clone();
        if !session.add_document(document) {
            log::warn!("{} is already loaded, keeping the first file", label);
        }
    }
    Ok(session)
}

/// Filter one PDF file to the given zero-based pages.
///
/// An empty set keeps every page.
///
/// # Example
///
/// ```no_run
/// use pdf_workbench::{filter_file, parse_page_list};
///
/// let pages = parse_page_list("1,3-4").unwrap();
/// let bytes = filter_file("report.pdf", &pages).unwrap();
/// std::fs::write("report_filtered.pdf", bytes).unwrap();
/// ```
pub fn filter_file<P: AsRef<Path>>(path: P, pages: &PageSet) -> Result<Vec<u8>> {
    let document = SourceDocument::open(path)?;
    filter_selected(&document.label, document.data(), pages)
}

/// Extract one PDF file into an in-memory manifest with default options.
///
/// # Example
///
/// ```no_run
/// let extraction = pdf_workbench::extract_file("report.pdf").unwrap();
/// for path in extraction.manifest.paths() {
///     println!("{}", path);
/// }
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Extraction> {
    let document = SourceDocument::open(path)?;
    extract::extract_document(&document)
}
