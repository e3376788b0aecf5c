//! Integration tests for building documents from an explicit page ordering.

mod common;

use common::{page_count, page_texts, text_pdf};
use pdf_workbench::{build_in_order, Error, PageKey, PageOrdering, SourceDocument};

fn documents() -> Vec<SourceDocument> {
    vec![
        SourceDocument::from_bytes("a.pdf", text_pdf(&["A1", "A2", "A3"])).unwrap(),
        SourceDocument::from_bytes("b.pdf", text_pdf(&["B1", "B2"])).unwrap(),
    ]
}

#[test]
fn test_cross_document_order() {
    let ordering = PageOrdering::parse(["1:1", "0:0", "1:0", "0:2"]).unwrap();
    let bytes = build_in_order(&documents(), &ordering).unwrap();
    assert_eq!(page_texts(&bytes), vec!["B2", "A1", "B1", "A3"]);
}

#[test]
fn test_duplicates_and_omissions() {
    let ordering = PageOrdering::parse(["0:1", "0:1", "0:1"]).unwrap();
    let bytes = build_in_order(&documents(), &ordering).unwrap();
    assert_eq!(page_count(&bytes), ordering.len());
    assert_eq!(page_texts(&bytes), vec!["A2", "A2", "A2"]);
}

#[test]
fn test_natural_order_matches_all_pages() {
    let documents = documents();
    let ordering = PageOrdering::natural(&documents);
    let bytes = build_in_order(&documents, &ordering).unwrap();
    assert_eq!(page_texts(&bytes), vec!["A1", "A2", "A3", "B1", "B2"]);
}

#[test]
fn test_list_items_are_accepted() {
    let ordering = PageOrdering::parse(["1:0 | b.pdf • p1", "0:0 | a.pdf • p1"]).unwrap();
    assert_eq!(ordering.keys(), &[PageKey::new(1, 0), PageKey::new(0, 0)]);
}

#[test]
fn test_empty_ordering() {
    let result = build_in_order(&documents(), &PageOrdering::new());
    assert!(matches!(result, Err(Error::EmptyOrdering)));
}

#[test]
fn test_page_out_of_range_is_input_resolution() {
    let ordering = PageOrdering::parse(["0:0", "1:2"]).unwrap();
    match build_in_order(&documents(), &ordering) {
        Err(err @ Error::InputResolution { .. }) => {
            assert!(err.is_input_error());
            assert!(err.to_string().contains("1:2"));
        }
        other => panic!("expected InputResolution, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_unknown_document_is_input_resolution() {
    let ordering = PageOrdering::from(vec![PageKey::new(5, 0)]);
    assert!(matches!(
        build_in_order(&documents(), &ordering),
        Err(Error::InputResolution { .. })
    ));
}

#[test]
fn test_malformed_key_is_rejected() {
    assert!(matches!(
        PageOrdering::parse(["zero:one"]),
        Err(Error::InputResolution { .. })
    ));
}
