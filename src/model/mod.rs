//! Data model: loaded documents, page references, selections and orderings.
//!
//! These types map user interactions (ticking pages, dragging pages between
//! lists) to the ordered (document, page) references that the assembly
//! engines consume.

mod document;
mod ordering;
mod organizer;
mod page_ref;
mod resource;
mod selection;
mod session;
mod table;

pub use document::{DocumentSet, SourceDocument};
pub use ordering::PageOrdering;
pub use organizer::{OrganizerLists, PageList};
pub use page_ref::{page_label, PageKey, PageRef};
pub use resource::{extension_for_filter, ExtractedImage, ImageId};
pub use selection::{parse_page_list, PagePlan, PageSet, SelectionStore};
pub use session::{ImportReport, Session};
pub use table::Table;
