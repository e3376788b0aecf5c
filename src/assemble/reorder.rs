//! Build a document from an explicit cross-document page ordering.

use std::collections::hash_map::{Entry, HashMap};

use crate::error::Result;
use crate::model::{PageOrdering, SourceDocument};

use super::importer::{OpenSource, PageAssembler};

/// Append the pages named by `ordering`, in exactly that order.
///
/// Duplicated keys produce repeated pages; pages that are never named are
/// left out. Every key is resolved before any source is parsed, so a bad
/// key fails fast. Each referenced document is parsed at most once and all
/// parsed sources are dropped when the call returns.
pub fn build_in_order(documents: &[SourceDocument], ordering: &PageOrdering) -> Result<Vec<u8>> {
    ordering.ensure_not_empty()?;
    for key in ordering {
        key.resolve(documents)?;
    }

    let mut opened: HashMap<usize, OpenSource> = HashMap::new();
    let mut assembler = PageAssembler::new();

    for key in ordering {
        let source = match opened.entry(key.doc) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                log::debug!("Opening {}", documents[key.doc].label);
                entry.insert(OpenSource::open(&documents[key.doc])?)
            }
        };
        assembler.append_page(source, key.page)?;
    }

    log::info!(
        "Built {} page(s) from {} document(s)",
        assembler.page_count(),
        opened.len()
    );
    assembler.finish()
}
