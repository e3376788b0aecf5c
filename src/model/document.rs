//! Loaded source documents.

use std::path::Path;

use serde::Serialize;

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::parser::{LopdfBackend, PdfBackend};

use super::PageRef;

/// An uploaded PDF: display label, raw bytes and cached page count.
///
/// Immutable once loaded. The bytes are parsed once on construction so a
/// malformed upload is rejected before any build starts.
#[derive(Debug, Clone, Serialize)]
pub struct SourceDocument {
    /// Display label (original filename)
    pub label: String,

    /// Raw PDF bytes
    #[serde(skip_serializing)]
    data: Vec<u8>,

    /// Number of pages
    pub page_count: usize,

    /// PDF version from the file header
    pub pdf_version: String,
}

impl SourceDocument {
    /// Load a document from bytes.
    pub fn from_bytes(label: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let label = label.into();

        let format = detect_format_from_bytes(&data).map_err(|e| Error::parse(&label, e))?;
        let backend = LopdfBackend::load_bytes(&label, &data)?;
        let page_count = backend.page_count();

        log::debug!("Loaded {} ({} pages, {})", label, page_count, format);

        Ok(Self {
            label,
            data,
            page_count,
            pdf_version: format.version,
        })
    }

    /// Load a document from a file, labelled with its file name.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let data = std::fs::read(path)?;
        Self::from_bytes(label, data)
    }

    /// Raw PDF bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Ordered list of loaded documents.
///
/// Labels are unique: adding a label that is already present keeps the
/// bytes that were loaded first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentSet {
    documents: Vec<SourceDocument>,
}

impl DocumentSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document. Returns `false` if its label was already loaded.
    pub fn add(&mut self, document: SourceDocument) -> bool {
        if self.contains(&document.label) {
            log::debug!("Keeping existing document {}", document.label);
            return false;
        }
        self.documents.push(document);
        true
    }

    /// Check whether a label is loaded.
    pub fn contains(&self, label: &str) -> bool {
        self.documents.iter().any(|d| d.label == label)
    }

    /// Get a document by label.
    pub fn get(&self, label: &str) -> Option<&SourceDocument> {
        self.documents.iter().find(|d| d.label == label)
    }

    /// Get a document by position.
    pub fn get_index(&self, index: usize) -> Option<&SourceDocument> {
        self.documents.get(index)
    }

    /// Documents in load order.
    pub fn as_slice(&self) -> &[SourceDocument] {
        &self.documents
    }

    /// Iterate over documents in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, SourceDocument> {
        self.documents.iter()
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if no documents are loaded.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Sum of all page counts.
    pub fn total_pages(&self) -> usize {
        self.documents.iter().map(|d| d.page_count).sum()
    }

    /// Every page of every document, in document then page order.
    pub fn page_refs(&self) -> Vec<PageRef> {
        PageRef::enumerate(&self.documents)
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a SourceDocument;
    type IntoIter = std::slice::Iter<'a, SourceDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
