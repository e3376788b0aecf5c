//! Positioned text spans.
//!
//! Walks a page's content stream and records every text-showing operation
//! with its position and font size. Table detection works on these spans
//! rather than on the flat page text.

use std::collections::HashMap;

use crate::error::Result;

use super::backend::{get_number_from_value, ContentOp, PdfBackend, PdfValue};

/// Average glyph width as a fraction of the font size, used for span widths.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Default leading when `TL` was never set.
const DEFAULT_LEADING: f32 = 12.0;

/// Adjustments in a `TJ` array above this (thousandths of text space) read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A text span with position and font information.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Create a new text span. The width is estimated from the character count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let width = text.chars().count() as f32 * font_size * AVG_GLYPH_WIDTH;
        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
        }
    }

    /// Right edge of the span.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Extracts [`TextSpan`]s from pages of any [`PdfBackend`].
pub struct SpanExtractor<'a> {
    backend: &'a dyn PdfBackend,
}

impl<'a> SpanExtractor<'a> {
    /// Create an extractor over a backend.
    pub fn new(backend: &'a dyn PdfBackend) -> Self {
        Self { backend }
    }

    /// Extract the text spans of a zero-based page.
    pub fn extract_page_spans(&self, page: usize) -> Result<Vec<TextSpan>> {
        let fonts: HashMap<Vec<u8>, String> = self
            .backend
            .page_fonts(page)?
            .into_iter()
            .map(|f| (f.name, f.base_font))
            .collect();
        let operations = self.backend.page_operations(page)?;

        let spans = self.walk(page, &operations, &fonts);
        log::debug!("Page {}: {} text spans", page + 1, spans.len());
        Ok(spans)
    }

    fn walk(
        &self,
        page: usize,
        operations: &[ContentOp],
        fonts: &HashMap<Vec<u8>, String>,
    ) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        let mut state = TextState::default();

        for op in operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "BT" => {
                    state.in_text = true;
                    state.matrix = TextMatrix::default();
                }
                "ET" => state.in_text = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = operands.first() {
                        state.font_name = fonts
                            .get(name)
                            .cloned()
                            .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                        state.font_key = name.clone();
                    }
                    if let Some(size) = operands.get(1).and_then(get_number_from_value) {
                        state.font_size = size;
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number_from_value) {
                        state.leading = leading;
                    }
                }
                "Td" => {
                    if let Some((tx, ty)) = pair(operands) {
                        state.matrix.translate(tx, ty);
                    }
                }
                "TD" => {
                    if let Some((tx, ty)) = pair(operands) {
                        state.leading = -ty;
                        state.matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    let n: Vec<f32> = operands.iter().filter_map(get_number_from_value).collect();
                    if n.len() >= 6 {
                        state.matrix = TextMatrix::from_operands(&n);
                    }
                }
                "T*" => state.matrix.translate(0.0, -state.leading),
                "Tj" => {
                    if let Some(PdfValue::Str(bytes)) = operands.first() {
                        let text = self.backend.decode_text(page, &state.font_key, bytes);
                        state.emit(text, &mut spans);
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = operands.first() {
                        let text = self.decode_array(page, &state.font_key, items);
                        state.emit(text, &mut spans);
                    }
                }
                "'" | "\"" => {
                    state.matrix.translate(0.0, -state.leading);
                    let index = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(PdfValue::Str(bytes)) = operands.get(index) {
                        let text = self.backend.decode_text(page, &state.font_key, bytes);
                        state.emit(text, &mut spans);
                    }
                }
                _ => {}
            }
        }

        spans
    }

    /// Decode a `TJ` array, turning large negative kerning into spaces.
    fn decode_array(&self, page: usize, font: &[u8], items: &[PdfValue]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    combined.push_str(&self.backend.decode_text(page, font, bytes));
                }
                other => {
                    let adjustment = get_number_from_value(other).map(|n| -n).unwrap_or(0.0);
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                        && !combined.chars().last().is_some_and(is_spaceless_script_char)
                    {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }
}

fn pair(operands: &[PdfValue]) -> Option<(f32, f32)> {
    let tx = operands.first().and_then(get_number_from_value)?;
    let ty = operands.get(1).and_then(get_number_from_value)?;
    Some((tx, ty))
}

/// Text state tracked while walking a content stream.
#[derive(Debug)]
struct TextState {
    in_text: bool,
    matrix: TextMatrix,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            in_text: false,
            matrix: TextMatrix::default(),
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            leading: DEFAULT_LEADING,
        }
    }
}

impl TextState {
    fn emit(&self, text: String, spans: &mut Vec<TextSpan>) {
        if !self.in_text || text.trim().is_empty() {
            return;
        }
        let (x, y) = self.matrix.position();
        spans.push(TextSpan::new(
            text,
            x,
            y,
            self.font_size * self.matrix.scale(),
            self.font_name.clone(),
        ));
    }
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn from_operands(n: &[f32]) -> Self {
        Self {
            a: n[0],
            b: n[1],
            c: n[2],
            d: n[3],
            e: n[4],
            f: n[5],
        }
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
