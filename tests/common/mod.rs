//! In-memory fixture PDFs for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Bytes standing in for an encoded JPEG (SOI ... EOI).
pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0xFF, 0xD9];

/// Contents of one fixture page.
#[derive(Default, Clone)]
pub struct PageBuilder {
    texts: Vec<(f32, f32, String)>,
    images: Vec<Vec<u8>>,
    form_images: Vec<Vec<u8>>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text at an absolute position.
    pub fn text(mut self, x: f32, y: f32, text: &str) -> Self {
        self.texts.push((x, y, text.to_string()));
        self
    }

    /// Lines stacked from the top margin.
    pub fn lines(mut self, lines: &[&str]) -> Self {
        for line in lines {
            let y = 720.0 - 14.0 * self.texts.len() as f32;
            self.texts.push((72.0, y, line.to_string()));
        }
        self
    }

    /// A DCT image drawn directly by the page.
    pub fn image(mut self, data: &[u8]) -> Self {
        self.images.push(data.to_vec());
        self
    }

    /// A DCT image drawn through a form XObject.
    pub fn form_image(mut self, data: &[u8]) -> Self {
        self.form_images.push(data.to_vec());
        self
    }
}

/// Builds a small PDF whose font, resources and media box live on the
/// page tree root and are inherited by pages without their own images.
pub struct PdfBuilder {
    version: &'static str,
    pages: Vec<PageBuilder>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self {
            version: "1.5",
            pages: Vec::new(),
        }
    }

    pub fn version(mut self, version: &'static str) -> Self {
        self.version = version;
        self
    }

    pub fn page(mut self, page: PageBuilder) -> Self {
        self.pages.push(page);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version(self.version);
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids = Vec::new();
        for page in &self.pages {
            let mut operations = Vec::new();
            for (x, y, text) in &page.texts {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
                operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(text.as_str())]));
                operations.push(Operation::new("ET", vec![]));
            }

            let mut xobjects = lopdf::Dictionary::new();
            for (i, data) in page.images.iter().enumerate() {
                let name = format!("Im{}", i + 1);
                xobjects.set(name.as_bytes(), image_object(&mut doc, data));
                operations.extend(draw(&name));
            }
            for (i, data) in page.form_images.iter().enumerate() {
                let image_id = image_object(&mut doc, data);
                let form = Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Form",
                        "BBox" => vec![0.into(), 0.into(), 1.into(), 1.into()],
                        "Resources" => dictionary! {
                            "XObject" => dictionary! { "Inner" => image_id },
                        },
                    },
                    b"/Inner Do".to_vec(),
                );
                let name = format!("Fm{}", i + 1);
                xobjects.set(name.as_bytes(), doc.add_object(form));
                operations.extend(draw(&name));
            }

            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                lopdf::Dictionary::new(),
                content.encode().expect("encode content"),
            ));
            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            };
            if !xobjects.is_empty() {
                page_dict.set(
                    "Resources",
                    dictionary! {
                        "Font" => dictionary! { "F1" => font_id },
                        "XObject" => xobjects,
                    },
                );
            }
            kids.push(Object::Reference(doc.add_object(page_dict)));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).expect("save fixture");
        out
    }
}

fn image_object(doc: &mut Document, data: &[u8]) -> ObjectId {
    doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 1,
            "Height" => 1,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        data.to_vec(),
    ))
}

fn draw(name: &str) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![100.into(), 0.into(), 0.into(), 100.into(), 72.into(), 72.into()],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

/// One page per entry, each holding a single line of text.
pub fn text_pdf(pages: &[&str]) -> Vec<u8> {
    pages
        .iter()
        .fold(PdfBuilder::new(), |builder, text| {
            builder.page(PageBuilder::new().lines(&[text]))
        })
        .build()
}

/// Trimmed text of every page of a PDF.
pub fn page_texts(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("load output");
    let count = doc.get_pages().len() as u32;
    (1..=count)
        .map(|n| doc.extract_text(&[n]).expect("extract text").trim().to_string())
        .collect()
}

/// Number of pages in a PDF.
pub fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).expect("load output").get_pages().len()
}
