//! Page assembly: merge, filter and reorder.
//!
//! All builds copy pages structurally. Nothing is re-rendered, so content
//! streams, fonts and images reach the output byte for byte.

mod importer;
mod merge;
mod reorder;

pub use importer::{OpenSource, PageAssembler};
pub use merge::{filter_selected, merge_selected};
pub use reorder::build_in_order;
