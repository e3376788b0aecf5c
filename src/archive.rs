//! ZIP output: extraction archives and bundles of filtered PDFs.
//!
//! Archives are assembled in memory. A failure in any document aborts the
//! whole build, so callers never see a partial archive.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::extract::{ContentExtractor, ExtractionSummary};
use crate::model::SourceDocument;
use crate::parser::ExtractOptions;

/// Name of the archive bundling several filtered PDFs.
pub const FILTERED_BUNDLE_NAME: &str = "filtered_pdfs.zip";

/// Name of the reordered build.
pub const ORGANIZED_OUTPUT_NAME: &str = "organized.pdf";

/// Name of the merged build.
pub const MERGED_OUTPUT_NAME: &str = "merged.pdf";

/// Options for writing ZIP archives.
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Compression method for every entry
    pub compression: CompressionMethod,

    /// Compression level, `None` for the method's default
    pub level: Option<i64>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
            level: None,
        }
    }
}

impl ArchiveOptions {
    /// Create default options (deflate, default level).
    pub fn new() -> Self {
        Self::default()
    }

    /// Store entries without compression.
    pub fn stored(mut self) -> Self {
        self.compression = CompressionMethod::Stored;
        self.level = None;
        self
    }

    /// Set the compression level.
    pub fn with_level(mut self, level: i64) -> Self {
        self.level = Some(level);
        self
    }

    fn file_options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(self.compression)
            .compression_level(self.level)
    }
}

/// Extraction archive with the counts gathered while building it.
#[derive(Debug, Clone)]
pub struct ExtractionArchive {
    /// ZIP bytes
    pub bytes: Vec<u8>,
    /// Counts summed over all documents
    pub summary: ExtractionSummary,
    /// Number of entries written
    pub entries: usize,
}

/// Extract every document with default options into one deflated ZIP.
pub fn build_extraction_zip(documents: &[SourceDocument]) -> Result<Vec<u8>> {
    build_extraction_zip_with(documents, &ExtractOptions::default(), &ArchiveOptions::default())
        .map(|archive| archive.bytes)
}

/// Extract every document into one ZIP.
///
/// Documents whose sanitized names collide write to the same paths; the
/// later document's files replace the earlier ones.
pub fn build_extraction_zip_with(
    documents: &[SourceDocument],
    extract_options: &ExtractOptions,
    archive_options: &ArchiveOptions,
) -> Result<ExtractionArchive> {
    build_extraction_zip_using(
        documents,
        &ContentExtractor::new(extract_options.clone()),
        archive_options,
    )
}

/// Extract every document with a prepared extractor into one ZIP.
pub fn build_extraction_zip_using(
    documents: &[SourceDocument],
    extractor: &ContentExtractor,
    archive_options: &ArchiveOptions,
) -> Result<ExtractionArchive> {
    let mut files: BTreeMap<String, Vec<u8>> = BTreeMap::new();
    let mut summary = ExtractionSummary::default();

    for document in documents {
        let extraction = extractor.extract_document(document)?;
        summary.absorb(&extraction.summary);
        for (path, data) in extraction.manifest {
            if files.insert(path.clone(), data).is_some() {
                log::warn!("{}: overwriting archive entry {}", document.label, path);
            }
        }
    }

    let entries = files.len();
    let bytes = write_zip(files, archive_options)?;
    log::info!(
        "Built extraction archive: {} document(s), {} entries, {} bytes",
        documents.len(),
        entries,
        bytes.len()
    );

    Ok(ExtractionArchive {
        bytes,
        summary,
        entries,
    })
}

/// `<stem>_filtered.pdf` for a document label.
pub fn filtered_output_name(label: &str) -> String {
    let stem = std::path::Path::new(label)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| label.to_string());
    format!("{}_filtered.pdf", stem)
}

/// Bundle named PDFs into one deflated ZIP, one entry per file.
///
/// A repeated name keeps the last file.
pub fn bundle_filtered(outputs: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>> {
    bundle_filtered_with(outputs, &ArchiveOptions::default())
}

/// Bundle named PDFs into one ZIP with the given options.
pub fn bundle_filtered_with(
    outputs: Vec<(String, Vec<u8>)>,
    options: &ArchiveOptions,
) -> Result<Vec<u8>> {
    let mut files = BTreeMap::new();
    for (name, data) in outputs {
        if files.insert(name.clone(), data).is_some() {
            log::warn!("Duplicate filtered output {}, keeping the last", name);
        }
    }
    write_zip(files, options)
}

fn write_zip(files: BTreeMap<String, Vec<u8>>, options: &ArchiveOptions) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let file_options = options.file_options();

    for (path, data) in files {
        log::debug!("Writing {} ({} bytes)", path, data.len());
        writer.start_file(path, file_options)?;
        writer.write_all(&data)?;
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_entries(bytes: Vec<u8>) -> Vec<(String, Vec<u8>, CompressionMethod)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut data = Vec::new();
                file.read_to_end(&mut data).unwrap();
                (file.name().to_string(), data, file.compression())
            })
            .collect()
    }

    #[test]
    fn test_filtered_output_name() {
        assert_eq!(filtered_output_name("report.pdf"), "report_filtered.pdf");
        assert_eq!(filtered_output_name("a.b.pdf"), "a.b_filtered.pdf");
        assert_eq!(filtered_output_name("noext"), "noext_filtered.pdf");
    }

    #[test]
    fn test_bundle_is_deflated() {
        let bytes = bundle_filtered(vec![
            ("a_filtered.pdf".into(), b"%PDF-a".to_vec()),
            ("b_filtered.pdf".into(), b"%PDF-b".to_vec()),
        ])
        .unwrap();

        let entries = read_entries(bytes);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "a_filtered.pdf");
        assert_eq!(entries[1].1, b"%PDF-b");
        assert!(entries.iter().all(|e| e.2 == CompressionMethod::Deflated));
    }

    #[test]
    fn test_bundle_duplicate_keeps_last() {
        let bytes = bundle_filtered(vec![
            ("x.pdf".into(), b"first".to_vec()),
            ("x.pdf".into(), b"second".to_vec()),
        ])
        .unwrap();
        let entries = read_entries(bytes);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1, b"second");
    }

    #[test]
    fn test_stored_option() {
        let bytes =
            bundle_filtered_with(vec![("x.pdf".into(), b"x".to_vec())], &ArchiveOptions::new().stored())
                .unwrap();
        assert_eq!(read_entries(bytes)[0].2, CompressionMethod::Stored);
    }

    #[test]
    fn test_empty_extraction_archive() {
        let archive =
            build_extraction_zip_with(&[], &ExtractOptions::default(), &ArchiveOptions::default())
                .unwrap();
        assert_eq!(archive.entries, 0);
        assert!(read_entries(archive.bytes).is_empty());
    }
}
