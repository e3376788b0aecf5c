//! Working session: loaded documents, their selections and the current order.

use serde::Serialize;

use crate::archive::{build_extraction_zip, filtered_output_name};
use crate::assemble::{build_in_order, filter_selected, merge_selected};
use crate::error::Result;

use super::{DocumentSet, OrganizerLists, PageOrdering, PageSet, SelectionStore, SourceDocument};

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Labels that were loaded
    pub loaded: Vec<String>,
    /// Labels that were already present and kept their first bytes
    pub duplicates: Vec<String>,
    /// Labels that failed to parse, with the reason
    pub skipped: Vec<(String, String)>,
}

impl ImportReport {
    /// Check if every input was loaded.
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.skipped.is_empty()
    }
}

/// Owns the loaded documents, the selection store and the current ordering.
///
/// Every document added to the session is registered for selection, so the
/// selection store and the document set always cover the same labels.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    documents: DocumentSet,
    selections: SelectionStore,
    ordering: PageOrdering,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a loaded document. Returns `false` if its label was already present.
    pub fn add_document(&mut self, document: SourceDocument) -> bool {
        let label = document.label.clone();
        let page_count = document.page_count;
        if !self.documents.add(document) {
            return false;
        }
        self.selections.register(label, page_count);
        true
    }

    /// Parse and add a document, surfacing parse errors.
    pub fn add_bytes(&mut self, label: impl Into<String>, data: Vec<u8>) -> Result<bool> {
        let document = SourceDocument::from_bytes(label, data)?;
        Ok(self.add_document(document))
    }

    /// Parse and add several documents, skipping any that fail to parse.
    pub fn import_all<I, S>(&mut self, inputs: I) -> ImportReport
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        let mut report = ImportReport::default();
        for (label, data) in inputs {
            let label = label.into();
            match SourceDocument::from_bytes(label.clone(), data) {
                Ok(document) => {
                    if self.add_document(document) {
                        report.loaded.push(label);
                    } else {
                        report.duplicates.push(label);
                    }
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", label, e);
                    report.skipped.push((label, e.to_string()));
                }
            }
        }
        report
    }

    /// Loaded documents.
    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    /// Selection store.
    pub fn selections(&self) -> &SelectionStore {
        &self.selections
    }

    /// Mutable selection store, for toggling individual pages.
    pub fn selections_mut(&mut self) -> &mut SelectionStore {
        &mut self.selections
    }

    /// Selected pages of a document.
    pub fn get_selection(&self, label: &str) -> Result<&PageSet> {
        self.selections.get(label)
    }

    /// Replace the selected pages of a document.
    pub fn set_selection(&mut self, label: &str, pages: impl IntoIterator<Item = usize>) -> Result<()> {
        self.selections.set(label, pages)
    }

    /// Number of explicitly selected pages across all documents.
    pub fn total_selected(&self) -> usize {
        self.selections.total_selected()
    }

    /// Current ordering.
    pub fn get_ordering(&self) -> &PageOrdering {
        &self.ordering
    }

    /// Replace the ordering with parsed keys or list items.
    ///
    /// Keys are only checked for syntax here; they are resolved when the
    /// ordered build runs.
    pub fn set_ordering<I, S>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ordering = PageOrdering::parse(items)?;
        Ok(())
    }

    /// Replace the ordering.
    pub fn set_page_ordering(&mut self, ordering: PageOrdering) {
        self.ordering = ordering;
    }

    /// Fresh organizer lists for the loaded documents.
    pub fn organizer(&self) -> OrganizerLists {
        OrganizerLists::new(self.documents.as_slice())
    }

    /// Take the organizer's flattened order as the current ordering.
    pub fn apply_organizer(&mut self, organizer: &OrganizerLists) {
        self.ordering = organizer.flatten();
    }

    /// Merge the selected pages of every document.
    pub fn merge(&self) -> Result<Vec<u8>> {
        merge_selected(self.documents.as_slice(), &self.selections)
    }

    /// One filtered PDF per document, named `<stem>_filtered.pdf`.
    pub fn filter_all(&self) -> Result<Vec<(String, Vec<u8>)>> {
        self.documents
            .iter()
            .map(|document| {
                let selected = self.selections.get(&document.label)?;
                let bytes = filter_selected(&document.label, document.data(), selected)?;
                Ok((filtered_output_name(&document.label), bytes))
            })
            .collect()
    }

    /// Build the current ordering.
    pub fn build_ordered(&self) -> Result<Vec<u8>> {
        build_in_order(self.documents.as_slice(), &self.ordering)
    }

    /// Extraction archive of every document.
    pub fn extract_zip(&self) -> Result<Vec<u8>> {
        build_extraction_zip(self.documents.as_slice())
    }
}
