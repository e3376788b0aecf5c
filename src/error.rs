//! Error types for pdf-workbench.

use std::io;
use thiserror::Error;

/// Result type alias for pdf-workbench operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while assembling or extracting documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The data is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The bytes of a document could not be parsed as a PDF container.
    #[error("Failed to parse {label}: {reason}")]
    DocumentParse { label: String, reason: String },

    /// A page reference in an ordering does not resolve to a document page.
    #[error("Cannot resolve page reference '{key}': {reason}")]
    InputResolution { key: String, reason: String },

    /// A reordered build was requested with no pages.
    #[error("No pages in ordering")]
    EmptyOrdering,

    /// A page index is outside the document (0-indexed).
    #[error("Page index {page} is out of range for {label} ({count} pages)")]
    PageOutOfRange {
        label: String,
        page: usize,
        count: usize,
    },

    /// A selection refers to a document that is not loaded.
    #[error("Unknown document: {0}")]
    UnknownDocument(String),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error extracting images from PDF.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Error serializing an output document.
    #[error("Failed to write PDF: {0}")]
    Write(String),

    /// Error writing CSV output.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Error writing the ZIP container.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl Error {
    /// Build a [`Error::DocumentParse`] for a labelled document.
    pub fn parse(label: impl Into<String>, reason: impl ToString) -> Self {
        Error::DocumentParse {
            label: label.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`Error::InputResolution`] for an ordering key.
    pub fn unresolved(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InputResolution {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by caller input rather than document content.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::InputResolution { .. }
                | Error::EmptyOrdering
                | Error::PageOutOfRange { .. }
                | Error::UnknownDocument(_)
        )
    }
}

/// Unlabelled conversion. Code that knows the document label maps with
/// [`Error::parse`] instead.
impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::parse("document", err),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}
