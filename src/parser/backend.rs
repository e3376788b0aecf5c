//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for the per-page reads the extraction
//! pipeline needs, isolating the concrete PDF library (lopdf) from the
//! extraction and table detection logic.

use std::collections::{BTreeMap, HashSet};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::ExtractedImage;

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// Parent links followed before giving up on an inherited attribute.
const MAX_INHERIT_DEPTH: usize = 32;

/// Form XObjects nested deeper than this are not searched for images.
const MAX_FORM_DEPTH: usize = 8;

/// `TJ` adjustments beyond this (thousandths of text space) read as a word gap.
const TJ_WORD_GAP: f32 = 100.0;

/// Font information returned by the backend.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Font resource name (key in the page's font dictionary).
    pub name: Vec<u8>,
    /// Base font name (e.g., "Helvetica-Bold").
    pub base_font: String,
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

/// Abstract interface for page-level document access.
///
/// Pages are addressed by zero-based index. Implementations must not expose
/// concrete PDF library types.
pub trait PdfBackend {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Plain text of a page, trailing whitespace removed.
    fn page_text(&self, page: usize) -> Result<String>;

    /// Image XObjects reachable from the page resources, in resource order.
    fn page_images(&self, page: usize) -> Result<Vec<ExtractedImage>>;

    /// Font info for the fonts in the page resources.
    fn page_fonts(&self, page: usize) -> Result<Vec<BackendFontInfo>>;

    /// Decoded content stream operations of a page.
    fn page_operations(&self, page: usize) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: usize, font_name: &[u8], bytes: &[u8]) -> String;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Look up a page attribute, following `Parent` links for inheritable keys.
///
/// Returns the first value found, still unresolved (it may be a reference).
pub(crate) fn find_inherited<'a>(
    doc: &'a LopdfDocument,
    page: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = page;
    for _ in 0..MAX_INHERIT_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Resolve an object that may be a reference into a dictionary.
fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Name of the last filter of a stream (the one that yields the final data).
fn last_filter(dict: &Dictionary) -> Option<String> {
    let filter = dict.get(b"Filter").ok()?;
    let name = match filter {
        Object::Name(name) => name.as_slice(),
        Object::Array(filters) => filters.last()?.as_name().ok()?,
        _ => return None,
    };
    Some(String::from_utf8_lossy(name).to_string())
}

fn dict_u32(dict: &Dictionary, key: &[u8]) -> Option<u32> {
    dict.get(key)
        .ok()
        .and_then(|o| o.as_i64().ok())
        .and_then(|n| u32::try_from(n).ok())
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    label: String,
    doc: LopdfDocument,
    pages: Vec<PageId>,
}

impl LopdfBackend {
    /// Parse a document from memory. Failures carry the document label.
    pub fn load_bytes(label: &str, data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| Error::parse(label, e))?;
        Ok(Self::from_document(label, doc))
    }

    /// Wrap an already parsed document.
    pub fn from_document(label: &str, doc: LopdfDocument) -> Self {
        let pages = doc.get_pages().into_values().collect();
        Self {
            label: label.to_string(),
            doc,
            pages,
        }
    }

    /// Direct access to the underlying `lopdf::Document`.
    ///
    /// Used by page assembly, which copies objects rather than reading content.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Document label used in error messages.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Object id of a zero-based page.
    pub fn page_id(&self, page: usize) -> Result<PageId> {
        self.pages
            .get(page)
            .copied()
            .ok_or_else(|| Error::PageOutOfRange {
                label: self.label.clone(),
                page,
                count: self.pages.len(),
            })
    }

    /// Page dictionary of a zero-based page.
    fn page_dict(&self, page: usize) -> Result<&Dictionary> {
        let page_id = self.page_id(page)?;
        self.doc
            .get_dictionary(page_id)
            .map_err(|e| Error::parse(&self.label, e))
    }

    /// Resources of a page, inherited from the page tree when the page has none.
    fn page_resources(&self, page: usize) -> Result<Option<&Dictionary>> {
        let page_dict = self.page_dict(page)?;
        Ok(find_inherited(&self.doc, page_dict, b"Resources")
            .and_then(|o| resolve_dict(&self.doc, o)))
    }

    fn page_fonts_raw(&self, page: usize) -> Result<BTreeMap<Vec<u8>, &Dictionary>> {
        let mut fonts = BTreeMap::new();
        let font_dict = self
            .page_resources(page)?
            .and_then(|resources| resources.get(b"Font").ok())
            .and_then(|o| resolve_dict(&self.doc, o));
        if let Some(font_dict) = font_dict {
            for (name, value) in font_dict.iter() {
                if let Some(font) = resolve_dict(&self.doc, value) {
                    fonts.insert(name.clone(), font);
                }
            }
        }
        Ok(fonts)
    }

    /// Decode a string operand with a font from an already resolved font map.
    fn decode_with(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font_name: &[u8],
        bytes: &[u8],
    ) -> String {
        fonts
            .get(font_name)
            .and_then(|font| font.get_font_encoding(&self.doc).ok())
            .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }

    /// Collect images from one resources dictionary, recursing into forms.
    fn collect_images(
        &self,
        resources: &Dictionary,
        seen: &mut HashSet<ObjectId>,
        images: &mut Vec<ExtractedImage>,
        depth: usize,
    ) -> Result<()> {
        let xobjects = match resources
            .get(b"XObject")
            .ok()
            .and_then(|o| resolve_dict(&self.doc, o))
        {
            Some(dict) => dict,
            None => return Ok(()),
        };

        for (name, entry) in xobjects.iter() {
            let id = match entry.as_reference() {
                Ok(id) => id,
                Err(_) => continue,
            };
            if !seen.insert(id) {
                continue;
            }
            let stream = self
                .doc
                .get_object(id)
                .and_then(Object::as_stream)
                .map_err(|e| {
                    Error::ImageExtract(format!(
                        "{}: XObject {} ({} {} R): {}",
                        self.label,
                        String::from_utf8_lossy(name),
                        id.0,
                        id.1,
                        e
                    ))
                })?;

            let subtype = stream.dict.get(b"Subtype").and_then(Object::as_name).ok();
            match subtype {
                Some(b"Image") => {
                    let mut image =
                        ExtractedImage::new(id, stream.content.clone(), last_filter(&stream.dict));
                    if let (Some(w), Some(h)) = (
                        dict_u32(&stream.dict, b"Width"),
                        dict_u32(&stream.dict, b"Height"),
                    ) {
                        image = image.with_dimensions(w, h);
                    }
                    images.push(image);
                }
                Some(b"Form") if depth < MAX_FORM_DEPTH => {
                    if let Some(form_resources) = stream
                        .dict
                        .get(b"Resources")
                        .ok()
                        .and_then(|o| resolve_dict(&self.doc, o))
                    {
                        self.collect_images(form_resources, seen, images, depth + 1)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl PdfBackend for LopdfBackend {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page: usize) -> Result<String> {
        let fonts = self.page_fonts_raw(page)?;
        let operations = self.page_operations(page)?;

        let mut text = String::new();
        let mut font: &[u8] = &[];
        for op in &operations {
            match op.operator.as_str() {
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        font = name;
                    }
                }
                "Tj" | "'" | "\"" => {
                    if op.operator != "Tj" {
                        end_line(&mut text);
                    }
                    if let Some(PdfValue::Str(bytes)) = op.operands.last() {
                        text.push_str(&self.decode_with(&fonts, font, bytes));
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = op.operands.first() {
                        for item in items {
                            match item {
                                PdfValue::Str(bytes) => {
                                    text.push_str(&self.decode_with(&fonts, font, bytes));
                                }
                                other => {
                                    let gap = get_number_from_value(other)
                                        .is_some_and(|n| n < -TJ_WORD_GAP);
                                    if gap && !text.is_empty() && !text.ends_with([' ', '\n']) {
                                        text.push(' ');
                                    }
                                }
                            }
                        }
                    }
                }
                "ET" => end_line(&mut text),
                _ => {}
            }
        }

        Ok(text.trim_end().to_string())
    }

    fn page_images(&self, page: usize) -> Result<Vec<ExtractedImage>> {
        let mut images = Vec::new();
        if let Some(resources) = self.page_resources(page)? {
            let mut seen = HashSet::new();
            self.collect_images(resources, &mut seen, &mut images, 0)?;
        }

        log::debug!(
            "{} page {}: {} image(s)",
            self.label,
            page + 1,
            images.len()
        );
        Ok(images)
    }

    fn page_fonts(&self, page: usize) -> Result<Vec<BackendFontInfo>> {
        let fonts = self.page_fonts_raw(page)?;

        Ok(fonts
            .iter()
            .map(|(name, font_dict)| BackendFontInfo {
                name: name.clone(),
                base_font: font_dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
            })
            .collect())
    }

    fn page_operations(&self, page: usize) -> Result<Vec<ContentOp>> {
        let page_id = self.page_id(page)?;
        let data = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| Error::TextExtract(format!("{} page {}: {}", self.label, page + 1, e)))?;
        let content = lopdf::content::Content::decode(&data)
            .map_err(|e| Error::TextExtract(format!("{} page {}: {}", self.label, page + 1, e)))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operands: op.operands.iter().map(convert_object).collect(),
                operator: op.operator,
            })
            .collect())
    }

    fn decode_text(&self, page: usize, font_name: &[u8], bytes: &[u8]) -> String {
        match self.page_fonts_raw(page) {
            Ok(fonts) => self.decode_with(&fonts, font_name, bytes),
            Err(_) => decode_text_simple(bytes),
        }
    }
}

/// Close the current line unless it is empty or already closed.
fn end_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}
