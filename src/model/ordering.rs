//! Explicit cross-document page order.

use serde::Serialize;

use crate::error::{Error, Result};

use super::{page_label, PageKey, PageRef, SourceDocument};

/// Flat sequence of page keys defining the pages of a reordered build.
///
/// Keys are not deduplicated and need not cover every page. They are only
/// checked against the documents when a build resolves them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageOrdering {
    keys: Vec<PageKey>,
}

impl PageOrdering {
    /// Create an empty ordering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse keys or list items (`"0:1"`, `"0:1 | a.pdf • p2"`).
    pub fn parse<I, S>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = items
            .into_iter()
            .map(|item| PageKey::from_item(item.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { keys })
    }

    /// Every page of every document in natural order.
    pub fn natural(documents: &[SourceDocument]) -> Self {
        PageRef::enumerate(documents)
            .into_iter()
            .map(|r| r.key)
            .collect()
    }

    /// Append a page.
    pub fn push(&mut self, key: PageKey) {
        self.keys.push(key);
    }

    /// Keys in build order.
    pub fn keys(&self) -> &[PageKey] {
        &self.keys
    }

    /// Iterate over keys.
    pub fn iter(&self) -> std::slice::Iter<'_, PageKey> {
        self.keys.iter()
    }

    /// Number of output pages.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the ordering has no pages.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Resolve every key to a page reference, failing on the first bad key.
    pub fn resolve(&self, documents: &[SourceDocument]) -> Result<Vec<PageRef>> {
        self.keys
            .iter()
            .map(|key| {
                let document = key.resolve(documents)?;
                Ok(PageRef {
                    key: *key,
                    label: page_label(&document.label, key.page),
                })
            })
            .collect()
    }

    /// Preview window over the ordering.
    ///
    /// `start` is clamped to the last key so an overshooting window still
    /// shows the tail; at most `max` keys are returned.
    pub fn window(&self, start: usize, max: usize) -> &[PageKey] {
        let total = self.keys.len();
        let start = start.min(total.saturating_sub(1));
        let end = start.saturating_add(max).min(total);
        &self.keys[start..end]
    }

    /// Fail with [`Error::EmptyOrdering`] when there is nothing to build.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.keys.is_empty() {
            Err(Error::EmptyOrdering)
        } else {
            Ok(())
        }
    }
}

impl FromIterator<PageKey> for PageOrdering {
    fn from_iter<T: IntoIterator<Item = PageKey>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<PageKey>> for PageOrdering {
    fn from(keys: Vec<PageKey>) -> Self {
        Self { keys }
    }
}

impl<'a> IntoIterator for &'a PageOrdering {
    type Item = &'a PageKey;
    type IntoIter = std::slice::Iter<'a, PageKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
