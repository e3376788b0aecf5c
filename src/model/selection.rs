//! Per-document page selections.
//!
//! A selection is a set, not a sequence: the order in which pages were
//! toggled never matters, and pages are always emitted in ascending order.
//! An empty selection means "every page of the document". That rule lives
//! in [`PagePlan`] so callers branch on it explicitly.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{Error, Result};

/// Set of zero-based page indices.
pub type PageSet = BTreeSet<usize>;

/// The pages a merge or filter takes from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PagePlan {
    /// Nothing was selected: take every page in original order.
    AllPages,
    /// Take exactly these pages, ascending.
    Selected(Vec<usize>),
}

impl PagePlan {
    /// Resolve a selection into a plan. An empty set becomes [`PagePlan::AllPages`].
    pub fn from_selection(selected: &PageSet) -> Self {
        if selected.is_empty() {
            PagePlan::AllPages
        } else {
            PagePlan::Selected(selected.iter().copied().collect())
        }
    }

    /// Concrete zero-based page list for a document with `page_count` pages.
    pub fn pages(&self, page_count: usize) -> Vec<usize> {
        match self {
            PagePlan::AllPages => (0..page_count).collect(),
            PagePlan::Selected(pages) => pages.clone(),
        }
    }

    /// Number of pages the plan produces.
    pub fn len(&self, page_count: usize) -> usize {
        match self {
            PagePlan::AllPages => page_count,
            PagePlan::Selected(pages) => pages.len(),
        }
    }

    /// Check whether every page is taken implicitly.
    pub fn is_all(&self) -> bool {
        matches!(self, PagePlan::AllPages)
    }
}

#[derive(Debug, Clone, Serialize)]
struct DocumentSelection {
    page_count: usize,
    pages: PageSet,
}

/// Selected pages per document label.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectionStore {
    documents: BTreeMap<String, DocumentSelection>,
}

impl SelectionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a document selectable. Re-registering keeps pages still in range.
    pub fn register(&mut self, label: impl Into<String>, page_count: usize) {
        let entry = self
            .documents
            .entry(label.into())
            .or_insert_with(|| DocumentSelection {
                page_count,
                pages: PageSet::new(),
            });
        entry.page_count = page_count;
        entry.pages.retain(|&p| p < page_count);
    }

    /// Check whether a document is registered.
    pub fn contains(&self, label: &str) -> bool {
        self.documents.contains_key(label)
    }

    /// Flip one page. Returns whether the page is selected afterwards.
    pub fn toggle(&mut self, label: &str, page: usize) -> Result<bool> {
        let entry = self.entry_checked(label, page)?;
        if entry.pages.remove(&page) {
            Ok(false)
        } else {
            entry.pages.insert(page);
            Ok(true)
        }
    }

    /// Mark one page selected.
    pub fn select(&mut self, label: &str, page: usize) -> Result<()> {
        self.entry_checked(label, page)?.pages.insert(page);
        Ok(())
    }

    /// Mark one page unselected.
    pub fn deselect(&mut self, label: &str, page: usize) -> Result<()> {
        self.entry_checked(label, page)?.pages.remove(&page);
        Ok(())
    }

    /// Select pages `0..count` (clamped to the page count).
    pub fn select_all(&mut self, label: &str, count: usize) -> Result<()> {
        let entry = self.entry_mut(label)?;
        let count = count.min(entry.page_count);
        entry.pages = (0..count).collect();
        Ok(())
    }

    /// Unselect every page, which makes the document contribute all pages.
    pub fn clear_all(&mut self, label: &str) -> Result<()> {
        self.entry_mut(label)?.pages.clear();
        Ok(())
    }

    /// Selected pages of a document.
    pub fn get(&self, label: &str) -> Result<&PageSet> {
        self.documents
            .get(label)
            .map(|d| &d.pages)
            .ok_or_else(|| Error::UnknownDocument(label.to_string()))
    }

    /// Replace the selection of a document. Every index must be in range.
    pub fn set(&mut self, label: &str, pages: impl IntoIterator<Item = usize>) -> Result<()> {
        let entry = self.entry_mut(label)?;
        let pages: PageSet = pages.into_iter().collect();
        if let Some(&page) = pages.iter().find(|&&p| p >= entry.page_count) {
            return Err(Error::PageOutOfRange {
                label: label.to_string(),
                page,
                count: entry.page_count,
            });
        }
        entry.pages = pages;
        Ok(())
    }

    /// Merge/filter plan for a document. Unregistered documents take all pages.
    pub fn plan(&self, label: &str) -> PagePlan {
        match self.documents.get(label) {
            Some(selection) => PagePlan::from_selection(&selection.pages),
            None => PagePlan::AllPages,
        }
    }

    /// Number of explicitly selected pages across all documents.
    pub fn total_selected(&self) -> usize {
        self.documents.values().map(|d| d.pages.len()).sum()
    }

    fn entry_mut(&mut self, label: &str) -> Result<&mut DocumentSelection> {
        self.documents
            .get_mut(label)
            .ok_or_else(|| Error::UnknownDocument(label.to_string()))
    }

    fn entry_checked(&mut self, label: &str, page: usize) -> Result<&mut DocumentSelection> {
        let entry = self.entry_mut(label)?;
        if page >= entry.page_count {
            return Err(Error::PageOutOfRange {
                label: label.to_string(),
                page,
                count: entry.page_count,
            });
        }
        Ok(entry)
    }
}

/// Parse a one-based page list such as `"1,3,5-7"` into zero-based indices.
///
/// `""` and `"all"` yield an empty set, i.e. every page.
pub fn parse_page_list(s: &str) -> Result<PageSet> {
    let s = s.trim();
    let mut pages = PageSet::new();

    if s.is_empty() || s.eq_ignore_ascii_case("all") {
        return Ok(pages);
    }

    for part in s.split(',') {
        let part = part.trim();
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_page_number(start)?, parse_page_number(end)?),
            None => {
                let page = parse_page_number(part)?;
                (page, page)
            }
        };
        if start > end {
            return Err(Error::unresolved(part, "descending page range"));
        }
        pages.extend(start - 1..end);
    }

    Ok(pages)
}

fn parse_page_number(s: &str) -> Result<usize> {
    let s = s.trim();
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(Error::unresolved(s, "invalid page number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SelectionStore {
        let mut store = SelectionStore::new();
        store.register("a.pdf", 5);
        store.register("b.pdf", 2);
        store
    }

    #[test]
    fn test_toggle() {
        let mut store = store();
        assert!(store.toggle("a.pdf", 3).unwrap());
        assert!(store.toggle("a.pdf", 1).unwrap());
        assert!(!store.toggle("a.pdf", 3).unwrap());
        assert_eq!(store.get("a.pdf").unwrap(), &PageSet::from([1]));
    }

    #[test]
    fn test_plan_is_ascending_regardless_of_order() {
        let mut store = store();
        for page in [4, 0, 2] {
            store.select("a.pdf", page).unwrap();
        }
        assert_eq!(store.plan("a.pdf"), PagePlan::Selected(vec![0, 2, 4]));
    }

    #[test]
    fn test_empty_selection_means_all_pages() {
        let store = store();
        let plan = store.plan("b.pdf");
        assert!(plan.is_all());
        assert_eq!(plan.pages(2), vec![0, 1]);
        assert_eq!(plan.len(2), 2);
    }

    #[test]
    fn test_select_all_and_clear_all() {
        let mut store = store();
        store.select_all("a.pdf", 5).unwrap();
        assert_eq!(store.total_selected(), 5);
        store.select_all("b.pdf", 10).unwrap();
        assert_eq!(store.get("b.pdf").unwrap().len(), 2);
        store.clear_all("a.pdf").unwrap();
        assert_eq!(store.total_selected(), 2);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut store = store();
        let err = store.toggle("b.pdf", 2).unwrap_err();
        assert!(matches!(err, Error::PageOutOfRange { page: 2, count: 2, .. }));
        assert!(err.is_input_error());

        let err = store.set("a.pdf", [0, 9]).unwrap_err();
        assert!(matches!(err, Error::PageOutOfRange { page: 9, .. }));
        assert!(store.get("a.pdf").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_document() {
        let mut store = store();
        assert!(matches!(
            store.select("missing.pdf", 0),
            Err(Error::UnknownDocument(_))
        ));
        assert!(store.get("missing.pdf").is_err());
    }

    #[test]
    fn test_reregister_drops_stale_pages() {
        let mut store = store();
        store.set("a.pdf", [1, 4]).unwrap();
        store.register("a.pdf", 3);
        assert_eq!(store.get("a.pdf").unwrap(), &PageSet::from([1]));
    }

    #[test]
    fn test_parse_page_list() {
        assert!(parse_page_list("all").unwrap().is_empty());
        assert!(parse_page_list("").unwrap().is_empty());
        assert_eq!(
            parse_page_list("1,3,5-7,3").unwrap(),
            PageSet::from([0, 2, 4, 5, 6])
        );
        assert!(parse_page_list("0").is_err());
        assert!(parse_page_list("4-2").is_err());
        assert!(parse_page_list("x").is_err());
    }
}
