//! Content extraction pipeline for one document.
//!
//! The document is walked twice. The first pass reads each page's plain
//! text and images and classifies formula lines. The second pass runs table
//! detection on positioned text spans, which is a different view of the
//! page than the flat text. Combined text is assembled last from the
//! per-page text.

use crate::error::Result;
use crate::model::{SourceDocument, Table};
use crate::parser::{
    ExtractOptions, LopdfBackend, PdfBackend, SpanExtractor, TableDetector,
};
use crate::render::{table_to_csv, table_to_markdown};

use super::formula::{extract_formulas, formulas_markdown};
use super::manifest::{
    ExtractionManifest, ExtractionSummary, COMBINED_DIR, FORMULAS_DIR, IMAGES_DIR, TABLES_DIR,
    TEXT_DIR,
};
use super::npy::npy_u8;
use super::sanitize::document_base_name;

/// Source of detected tables for a page.
pub trait TableSource {
    /// Tables on a zero-based page, in detection order.
    fn page_tables(&self, backend: &dyn PdfBackend, page: usize) -> Result<Vec<Table>>;
}

/// Default [`TableSource`]: span extraction plus the stream-mode detector.
#[derive(Debug, Clone, Default)]
pub struct SpanTableSource {
    detector: TableDetector,
}

impl SpanTableSource {
    /// Create a source around a configured detector.
    pub fn new(detector: TableDetector) -> Self {
        Self { detector }
    }
}

impl TableSource for SpanTableSource {
    fn page_tables(&self, backend: &dyn PdfBackend, page: usize) -> Result<Vec<Table>> {
        let spans = SpanExtractor::new(backend).extract_page_spans(page)?;
        Ok(self.detector.detect_tables(&spans))
    }
}

/// Manifest and counts for one extracted document.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Files produced
    pub manifest: ExtractionManifest,
    /// What was found
    pub summary: ExtractionSummary,
}

/// Runs the extraction passes and lays the results out as files.
pub struct ContentExtractor {
    options: ExtractOptions,
    tables: Box<dyn TableSource>,
}

impl ContentExtractor {
    /// Create an extractor using span-based table detection.
    pub fn new(options: ExtractOptions) -> Self {
        let detector = TableDetector::with_config(options.table_config.clone());
        Self {
            options,
            tables: Box::new(SpanTableSource::new(detector)),
        }
    }

    /// Replace the table source.
    pub fn with_table_source(mut self, source: impl TableSource + 'static) -> Self {
        self.tables = Box::new(source);
        self
    }

    /// Options in effect.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract a loaded document under its sanitized file stem.
    pub fn extract_document(&self, document: &SourceDocument) -> Result<Extraction> {
        let name = document_base_name(&document.label);
        let backend = LopdfBackend::load_bytes(&document.label, document.data())?;
        self.extract(&backend, &name)
    }

    /// Extract every page of `backend`, naming files after `name`.
    ///
    /// `name` must already be sanitized; it is both the manifest root and
    /// the file name prefix.
    pub fn extract(&self, backend: &dyn PdfBackend, name: &str) -> Result<Extraction> {
        let mut manifest = ExtractionManifest::new(name);
        let mut summary = ExtractionSummary::default();
        let page_count = backend.page_count();
        let mut page_texts = Vec::with_capacity(page_count);

        for page in 0..page_count {
            let n = page + 1;
            let text = backend.page_text(page)?;

            manifest.insert(TEXT_DIR, &format!("{}_page_{}.txt", name, n), text.as_bytes());
            manifest.insert(
                TEXT_DIR,
                &format!("{}_page_{}.md", name, n),
                format!("# Page {}\n\n{}", n, text),
            );

            if self.options.formulas {
                let formulas = extract_formulas(&text);
                if !formulas.is_empty() {
                    summary.formulas += formulas.len();
                    manifest.insert(
                        FORMULAS_DIR,
                        &format!("{}_page_{}_formulas.md", name, n),
                        formulas_markdown(&formulas),
                    );
                }
            }

            if self.options.images {
                for (k, image) in backend.page_images(page)?.into_iter().enumerate() {
                    let stem = format!("{}_page_{}_img_{}", name, n, k + 1);
                    manifest.insert(IMAGES_DIR, &format!("{}.npy", stem), npy_u8(&image.data));
                    manifest.insert(
                        IMAGES_DIR,
                        &format!("{}.{}", stem, image.extension()),
                        image.data,
                    );
                    summary.images += 1;
                }
            }

            page_texts.push(text);
        }
        summary.pages = page_count;

        if self.options.tables {
            for page in 0..page_count {
                let n = page + 1;
                for (k, table) in self.tables.page_tables(backend, page)?.iter().enumerate() {
                    let stem = format!("{}_page_{}_table_{}", name, n, k + 1);
                    manifest.insert(TABLES_DIR, &format!("{}.csv", stem), table_to_csv(table)?);

                    let markdown = table_to_markdown(table);
                    if markdown.is_fallback() {
                        summary.markdown_fallbacks += 1;
                    }
                    manifest.insert(TABLES_DIR, &format!("{}.md", stem), markdown.into_text());
                    summary.tables += 1;
                }
            }
        }

        let combined = page_texts.join("\n\n");
        manifest.insert(
            COMBINED_DIR,
            &format!("{}_combined_all_text.md", name),
            format!("# {} Combined Text\n\n{}", name, combined),
        );
        manifest.insert(
            COMBINED_DIR,
            &format!("{}_combined_all_text.txt", name),
            combined,
        );

        log::info!(
            "Extracted {}: {} pages, {} formulas, {} images, {} tables",
            name,
            summary.pages,
            summary.formulas,
            summary.images,
            summary.tables
        );
        Ok(Extraction { manifest, summary })
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}

/// Extract a document with default options.
pub fn extract_document(document: &SourceDocument) -> Result<Extraction> {
    ContentExtractor::default().extract_document(document)
}
