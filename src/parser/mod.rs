//! PDF reading: backend, positioned text and table detection.

mod backend;
mod layout;
mod options;
mod table_detector;

pub(crate) use backend::find_inherited;
pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue,
};
pub use layout::{SpanExtractor, TextSpan};
pub use options::ExtractOptions;
pub use table_detector::{DetectedTable, SpanRow, TableDetector, TableDetectorConfig};
