//! Integration tests for content extraction from real documents.

mod common;

use common::{PageBuilder, PdfBuilder, JPEG};
use pdf_workbench::extract::{ContentExtractor, Extraction, TableSource};
use pdf_workbench::parser::PdfBackend;
use pdf_workbench::{ExtractOptions, Result, SourceDocument, Table};

/// Returns a fixed table on one page.
struct OneTable {
    page: usize,
    table: Table,
}

impl TableSource for OneTable {
    fn page_tables(&self, _backend: &dyn PdfBackend, page: usize) -> Result<Vec<Table>> {
        Ok(if page == self.page {
            vec![self.table.clone()]
        } else {
            Vec::new()
        })
    }
}

fn two_page_document() -> SourceDocument {
    let bytes = PdfBuilder::new()
        .page(PageBuilder::new().lines(&["x = 1"]).image(JPEG))
        .page(PageBuilder::new().lines(&["a b", "1 2"]))
        .build();
    SourceDocument::from_bytes("doc.pdf", bytes).unwrap()
}

#[test]
fn test_two_page_document() {
    let extractor = ContentExtractor::default().with_table_source(OneTable {
        page: 1,
        table: Table::from_rows([["a", "b"], ["1", "2"]]),
    });
    let Extraction { manifest, summary } = extractor.extract_document(&two_page_document()).unwrap();

    assert_eq!(manifest.base(), "doc");
    assert_eq!(manifest.text("text/doc_page_1.txt"), Some("x = 1"));
    assert_eq!(manifest.text("text/doc_page_1.md"), Some("# Page 1\n\nx = 1"));
    // Page 2 has no resources of its own; its font comes from the page tree.
    assert_eq!(manifest.text("text/doc_page_2.txt"), Some("a b\n1 2"));
    assert_eq!(manifest.text("text/doc_page_2.md"), Some("# Page 2\n\na b\n1 2"));

    let formulas = manifest.text("formulas/doc_page_1_formulas.md").unwrap();
    assert!(formulas.starts_with("# Formulas\n\n$$\n"));
    assert!(formulas.contains("x = 1"));
    assert!(!manifest.contains_relative("formulas/doc_page_2_formulas.md"));

    assert_eq!(manifest.get_relative("images/doc_page_1_img_1.jpeg"), Some(JPEG));
    let npy = manifest.get_relative("images/doc_page_1_img_1.npy").unwrap();
    assert!(npy.starts_with(b"\x93NUMPY"));
    assert!(npy.ends_with(JPEG));

    assert_eq!(manifest.text("tables/doc_page_2_table_1.csv"), Some("a,b\n1,2\n"));
    assert!(manifest.contains_relative("tables/doc_page_2_table_1.md"));

    assert_eq!(
        manifest.text("combined_text/doc_combined_all_text.txt"),
        Some("x = 1\n\na b\n1 2")
    );
    assert_eq!(
        manifest.text("combined_text/doc_combined_all_text.md"),
        Some("# doc Combined Text\n\nx = 1\n\na b\n1 2")
    );

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.images, 1);
    assert_eq!(summary.tables, 1);
}

#[test]
fn test_plain_document_has_only_text_and_combined() {
    let bytes = PdfBuilder::new()
        .page(PageBuilder::new().lines(&["Just some prose"]))
        .build();
    let document = SourceDocument::from_bytes("My Notes (final).pdf", bytes).unwrap();
    let manifest = ContentExtractor::default()
        .extract_document(&document)
        .unwrap()
        .manifest;

    assert_eq!(manifest.base(), "My_Notes_final");
    assert_eq!(
        manifest.paths().collect::<Vec<_>>(),
        vec![
            "My_Notes_final/combined_text/My_Notes_final_combined_all_text.md",
            "My_Notes_final/combined_text/My_Notes_final_combined_all_text.txt",
            "My_Notes_final/text/My_Notes_final_page_1.md",
            "My_Notes_final/text/My_Notes_final_page_1.txt",
        ]
    );
}

#[test]
fn test_images_inside_forms_are_found_once() {
    let bytes = PdfBuilder::new()
        .page(PageBuilder::new().lines(&["figure"]).form_image(JPEG).image(JPEG))
        .build();
    let document = SourceDocument::from_bytes("forms.pdf", bytes).unwrap();
    let extraction = ContentExtractor::new(ExtractOptions::new().with_tables(false))
        .extract_document(&document)
        .unwrap();

    assert_eq!(extraction.summary.images, 2);
    assert!(extraction
        .manifest
        .contains_relative("images/forms_page_1_img_2.jpeg"));
}

#[test]
fn test_detected_table_from_positioned_text() {
    let page = [
        (["Name", "Age", "City"], 700.0),
        (["Alice", "30", "Paris"], 685.0),
        (["Bob", "25", "Lyon"], 670.0),
    ]
    .iter()
    .fold(PageBuilder::new(), |page, (cells, y)| {
        cells
            .iter()
            .zip([72.0, 200.0, 300.0])
            .fold(page, |page, (cell, x)| page.text(x, *y, cell))
    });
    let bytes = PdfBuilder::new().page(page).build();
    let document = SourceDocument::from_bytes("people.pdf", bytes).unwrap();

    let manifest = ContentExtractor::default()
        .extract_document(&document)
        .unwrap()
        .manifest;
    assert_eq!(
        manifest.text("tables/people_page_1_table_1.csv"),
        Some("Name,Age,City\nAlice,30,Paris\nBob,25,Lyon\n")
    );
    let markdown = manifest.text("tables/people_page_1_table_1.md").unwrap();
    assert!(markdown.starts_with("| 0 "));
    assert!(markdown.contains("| Alice "));
}

#[test]
fn test_wide_table_is_kept() {
    let rows = [
        ["id", "name", "qty", "unit", "price", "tax", "total", "note"],
        ["a1", "bolt", "q4", "pc", "p2", "t0", "s8", "ok"],
        ["a2", "nut", "q9", "pc", "p1", "t0", "s9", "low"],
    ];
    let page = rows
        .iter()
        .zip([700.0, 685.0, 670.0])
        .fold(PageBuilder::new(), |page, (cells, y)| {
            cells
                .iter()
                .enumerate()
                .fold(page, |page, (i, cell)| page.text(40.0 + 60.0 * i as f32, y, cell))
        });
    let bytes = PdfBuilder::new().page(page).build();
    let document = SourceDocument::from_bytes("parts.pdf", bytes).unwrap();

    let extraction = ContentExtractor::default().extract_document(&document).unwrap();
    assert_eq!(extraction.summary.tables, 1);
    assert_eq!(
        extraction.manifest.text("tables/parts_page_1_table_1.csv"),
        Some("id,name,qty,unit,price,tax,total,note\na1,bolt,q4,pc,p2,t0,s8,ok\na2,nut,q9,pc,p1,t0,s9,low\n")
    );
}
