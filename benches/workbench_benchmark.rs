//! Benchmarks for page assembly and extraction.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdf_workbench::{
    build_extraction_zip, build_in_order, merge_selected, PageOrdering, SelectionStore,
    SourceDocument,
};

/// Creates a PDF with `page_count` pages of a few text lines each.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let kids: Vec<Object> = (0..page_count)
        .map(|i| {
            let mut operations = Vec::new();
            for line in 0..5 {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
                operations.push(Operation::new("Td", vec![72.into(), (720 - line * 14).into()]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!(
                        "Page {} line {}: x = {} + y",
                        i + 1,
                        line,
                        line
                    ))],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations }.encode().unwrap();
            let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content));
            Object::Reference(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }))
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

fn load(label: &str, pages: usize) -> SourceDocument {
    SourceDocument::from_bytes(label, create_test_pdf(pages)).unwrap()
}

fn bench_format_detection(c: &mut Criterion) {
    let pdf_data = create_test_pdf(1);

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| pdf_workbench::detect_format_from_bytes(black_box(&pdf_data)).unwrap());
    });
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_selected");

    for pages in [1, 10, 50] {
        let documents = vec![load("a.pdf", pages), load("b.pdf", pages)];
        let mut store = SelectionStore::new();
        for document in &documents {
            store.register(&document.label, document.page_count);
        }

        group.bench_with_input(BenchmarkId::from_parameter(pages), &documents, |b, docs| {
            b.iter(|| merge_selected(black_box(docs), &store).unwrap());
        });
    }

    group.finish();
}

fn bench_reorder(c: &mut Criterion) {
    let documents = vec![load("a.pdf", 20), load("b.pdf", 20)];
    let ordering: PageOrdering = PageOrdering::natural(&documents).iter().rev().copied().collect();

    c.bench_function("build_in_order_reversed_40", |b| {
        b.iter(|| build_in_order(black_box(&documents), &ordering).unwrap());
    });
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_extraction_zip");
    group.sample_size(20);

    for pages in [1, 10] {
        let documents = vec![load("doc.pdf", pages)];
        group.bench_with_input(BenchmarkId::from_parameter(pages), &documents, |b, docs| {
            b.iter(|| build_extraction_zip(black_box(docs)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_merge,
    bench_reorder,
    bench_extraction
);
criterion_main!(benches);
