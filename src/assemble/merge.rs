//! Merge and filter by per-document selection.

use crate::error::Result;
use crate::model::{PagePlan, PageSet, SelectionStore, SourceDocument};

use super::importer::{OpenSource, PageAssembler};

/// Merge documents in input order, taking each document's selected pages.
///
/// A document with an empty selection contributes every page in original
/// order; otherwise its selected pages are appended in ascending order.
pub fn merge_selected(documents: &[SourceDocument], selections: &SelectionStore) -> Result<Vec<u8>> {
    let mut assembler = PageAssembler::new();

    for document in documents {
        let plan = selections.plan(&document.label);
        let mut source = OpenSource::open(document)?;
        append_plan(&mut assembler, &mut source, &plan)?;
    }

    log::info!(
        "Merged {} document(s) into {} page(s)",
        documents.len(),
        assembler.page_count()
    );
    assembler.finish()
}

/// Build a copy of one document holding only the selected pages.
///
/// An empty selection keeps every page.
pub fn filter_selected(label: &str, data: &[u8], selected: &PageSet) -> Result<Vec<u8>> {
    let mut source = OpenSource::load(label, data)?;
    let mut assembler = PageAssembler::new();
    append_plan(&mut assembler, &mut source, &PagePlan::from_selection(selected))?;

    log::info!("Filtered {} to {} page(s)", label, assembler.page_count());
    assembler.finish()
}

fn append_plan(assembler: &mut PageAssembler, source: &mut OpenSource, plan: &PagePlan) -> Result<()> {
    if plan.is_all() {
        log::debug!("{}: no pages selected, taking all", source.label());
    }
    for page in plan.pages(source.page_count()) {
        assembler.append_page(source, page)?;
    }
    Ok(())
}
