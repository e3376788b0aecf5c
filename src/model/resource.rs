//! Embedded image resources.

use serde::Serialize;

/// Object id of the image stream inside its source document.
pub type ImageId = (u32, u16);

/// An image XObject pulled from a page, with its bytes still encoded.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedImage {
    /// Object id of the image stream
    pub id: ImageId,

    /// Raw (still encoded) stream bytes
    #[serde(skip_serializing)]
    pub data: Vec<u8>,

    /// Last filter in the stream's filter chain, if any
    pub filter: Option<String>,

    /// Width in pixels
    pub width: Option<u32>,

    /// Height in pixels
    pub height: Option<u32>,
}

impl ExtractedImage {
    /// Create an image from raw stream bytes.
    pub fn new(id: ImageId, data: Vec<u8>, filter: Option<String>) -> Self {
        Self {
            id,
            data,
            filter,
            width: None,
            height: None,
        }
    }

    /// Set image dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// File extension for the encoded bytes, derived from the stream filter.
    ///
    /// Streams that are not in a self-contained image format (Flate,
    /// LZW, unfiltered) are reported as `raw`.
    pub fn extension(&self) -> &'static str {
        extension_for_filter(self.filter.as_deref())
    }

    /// Get the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Map a PDF stream filter name to a file extension.
pub fn extension_for_filter(filter: Option<&str>) -> &'static str {
    match filter {
        Some("DCTDecode") | Some("DCT") => "jpeg",
        Some("JPXDecode") => "jpx",
        Some("JBIG2Decode") => "jb2",
        Some("CCITTFaxDecode") | Some("CCF") => "ccitt",
        _ => "raw",
    }
}
