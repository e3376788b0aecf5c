//! Per-document page lists for arranging a reordered build.

use serde::Serialize;

use crate::error::{Error, Result};

use super::{PageKey, PageOrdering, PageRef, SourceDocument};

/// One list of the organizer, headed by a document label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageList {
    /// Document label the list started with
    pub header: String,
    /// Page keys in list order
    pub items: Vec<PageKey>,
}

/// Lists of page keys, one per document, that pages can be moved between.
///
/// Lists start out holding every page of their document in order.
/// Flattening walks the lists top to bottom to produce a [`PageOrdering`].
#[derive(Debug, Clone, Serialize)]
pub struct OrganizerLists {
    lists: Vec<PageList>,
    #[serde(skip)]
    initial: Vec<PageList>,
}

impl OrganizerLists {
    /// Build the initial lists for a document set.
    pub fn new(documents: &[SourceDocument]) -> Self {
        let initial: Vec<PageList> = documents
            .iter()
            .enumerate()
            .map(|(di, document)| PageList {
                header: document.label.clone(),
                items: PageRef::for_document(di, document)
                    .into_iter()
                    .map(|r| r.key)
                    .collect(),
            })
            .collect();

        Self {
            lists: initial.clone(),
            initial,
        }
    }

    /// Current lists.
    pub fn lists(&self) -> &[PageList] {
        &self.lists
    }

    /// Move the item at `from_pos` of list `from` to `to_pos` of list `to`.
    ///
    /// `to_pos` is an index into the destination list after removal and is
    /// clamped to its length, so a large value appends.
    pub fn move_item(&mut self, from: usize, from_pos: usize, to: usize, to_pos: usize) -> Result<()> {
        let list_count = self.lists.len();
        if to >= list_count {
            return Err(Error::unresolved(
                format!("list {}", to),
                format!("only {} lists", list_count),
            ));
        }
        let source = self.lists.get_mut(from).ok_or_else(|| {
            Error::unresolved(format!("list {}", from), format!("only {} lists", list_count))
        })?;
        if from_pos >= source.items.len() {
            return Err(Error::unresolved(
                format!("list {} item {}", from, from_pos),
                format!("list has {} items", source.items.len()),
            ));
        }

        let key = source.items.remove(from_pos);
        let target = &mut self.lists[to].items;
        let to_pos = to_pos.min(target.len());
        target.insert(to_pos, key);

        log::debug!("Moved page {} to list {} position {}", key, to, to_pos);
        Ok(())
    }

    /// Replace the lists with externally arranged items (e.g. from a sorting widget).
    pub fn set_items(&mut self, items: Vec<Vec<String>>) -> Result<()> {
        let mut lists = Vec::with_capacity(items.len());
        for (i, list) in items.into_iter().enumerate() {
            let header = self
                .initial
                .get(i)
                .map(|l| l.header.clone())
                .unwrap_or_default();
            let items = list
                .iter()
                .map(|item| PageKey::from_item(item))
                .collect::<Result<Vec<_>>>()?;
            lists.push(PageList { header, items });
        }
        self.lists = lists;
        Ok(())
    }

    /// Concatenate the lists into one ordering.
    pub fn flatten(&self) -> PageOrdering {
        self.lists
            .iter()
            .flat_map(|l| l.items.iter().copied())
            .collect()
    }

    /// Restore the initial one-list-per-document layout.
    pub fn reset(&mut self) {
        self.lists = self.initial.clone();
    }

    /// Visible slice of the flattened order, see [`PageOrdering::window`].
    pub fn window(&self, start: usize, max: usize) -> Vec<PageKey> {
        self.flatten().window(start, max).to_vec()
    }

    /// Total number of items across all lists.
    pub fn len(&self) -> usize {
        self.lists.iter().map(|l| l.items.len()).sum()
    }

    /// Check if every list is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
