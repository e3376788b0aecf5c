//! Structural page copy between documents.
//!
//! A page is copied together with every object it references (content
//! streams, fonts, images, annotations). Object ids are remapped per source
//! so objects shared between pages of one source are copied once. Stream
//! bytes are cloned as-is and never re-encoded.
//!
//! References into the source page tree (a page's `Parent`, an annotation's
//! `P`, link destinations naming other pages) are dropped, otherwise copying
//! one page would drag every page of the source along.

use std::collections::HashMap;

use lopdf::{dictionary, Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::SourceDocument;
use crate::parser::{find_inherited, LopdfBackend, PdfBackend};

/// Page attributes that may be inherited from the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// US Letter, used when neither the page nor its ancestors carry a MediaBox.
const DEFAULT_MEDIA_BOX: [i64; 4] = [0, 0, 612, 792];

/// Output version when no source has been appended.
const DEFAULT_VERSION: &str = "1.5";

/// A parsed source document plus the ids already copied out of it.
pub struct OpenSource {
    backend: LopdfBackend,
    copied: HashMap<ObjectId, ObjectId>,
}

impl OpenSource {
    /// Parse a labelled byte buffer.
    pub fn load(label: &str, data: &[u8]) -> Result<Self> {
        Ok(Self {
            backend: LopdfBackend::load_bytes(label, data)?,
            copied: HashMap::new(),
        })
    }

    /// Parse a loaded source document.
    pub fn open(document: &SourceDocument) -> Result<Self> {
        Self::load(&document.label, document.data())
    }

    /// Number of pages in the source.
    pub fn page_count(&self) -> usize {
        self.backend.page_count()
    }

    /// Source label.
    pub fn label(&self) -> &str {
        self.backend.label()
    }

    fn doc(&self) -> &LopdfDocument {
        self.backend.raw_doc()
    }

    fn is_page_node(&self, id: ObjectId) -> bool {
        match self.doc().get_dictionary(id) {
            Ok(dict) => matches!(
                dict.get(b"Type").and_then(Object::as_name),
                Ok(b"Page") | Ok(b"Pages")
            ),
            Err(_) => false,
        }
    }
}

/// Builds a new document out of pages copied from [`OpenSource`]s.
pub struct PageAssembler {
    output: LopdfDocument,
    pages_id: ObjectId,
    kids: Vec<Object>,
    version: Option<String>,
}

impl PageAssembler {
    /// Start an empty output document.
    pub fn new() -> Self {
        let mut output = LopdfDocument::with_version(DEFAULT_VERSION);
        let pages_id = output.new_object_id();
        Self {
            output,
            pages_id,
            kids: Vec::new(),
            version: None,
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append one zero-based page of `source`.
    ///
    /// Appending the same page twice yields two pages sharing the copied
    /// content and resources.
    pub fn append_page(&mut self, source: &mut OpenSource, page: usize) -> Result<()> {
        let page_id = source.backend.page_id(page)?;
        let page_dict = source.doc().get_dictionary(page_id).map_err(|e| {
            Error::parse(source.label(), format!("page {}: {}", page + 1, e))
        })?;

        let mut flattened = page_dict.clone();
        flattened.remove(b"Parent");
        for key in INHERITABLE {
            if flattened.has(key) {
                continue;
            }
            if let Some(value) = find_inherited(source.doc(), page_dict, key) {
                flattened.set(key.to_vec(), value.clone());
            }
        }
        if !flattened.has(b"MediaBox") {
            flattened.set(
                "MediaBox",
                DEFAULT_MEDIA_BOX.iter().map(|&n| Object::Integer(n)).collect::<Vec<_>>(),
            );
        }

        let mut pending = Vec::new();
        let mut new_page = remap_dict(&flattened, source, &mut self.output, &mut pending);
        self.copy_pending(source, pending);

        new_page.set("Parent", self.pages_id);
        let new_page_id = self.output.add_object(new_page);
        self.kids.push(Object::Reference(new_page_id));

        let source_version = source.doc().version.clone();
        if self.version.as_deref().map_or(true, |v| source_version.as_str() > v) {
            self.version = Some(source_version);
        }

        log::debug!(
            "Copied {} page {} as output page {}",
            source.label(),
            page + 1,
            self.kids.len()
        );
        Ok(())
    }

    /// Copy queued source objects and everything they reference.
    fn copy_pending(&mut self, source: &mut OpenSource, mut pending: Vec<(ObjectId, ObjectId)>) {
        while let Some((old_id, new_id)) = pending.pop() {
            let object = source.doc().get_object(old_id).ok().cloned();
            let copied = match object {
                Some(object) => {
                    remap(&object, source, &mut self.output, &mut pending).unwrap_or(Object::Null)
                }
                None => {
                    log::debug!(
                        "{}: dangling reference {} {} R",
                        source.label(),
                        old_id.0,
                        old_id.1
                    );
                    Object::Null
                }
            };
            self.output.objects.insert(new_id, copied);
        }
    }

    /// Write the page tree and catalog and serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let count = self.kids.len() as i64;
        self.output.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.output.trailer.set("Root", catalog_id);
        if let Some(version) = self.version {
            self.output.version = version;
        }

        let mut buffer = Vec::new();
        self.output
            .save_to(&mut buffer)
            .map_err(|e| Error::Write(e.to_string()))?;
        log::debug!("Serialized {} pages ({} bytes)", count, buffer.len());
        Ok(buffer)
    }
}

impl Default for PageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy an object, remapping references. `None` means "drop this value".
fn remap(
    object: &Object,
    source: &mut OpenSource,
    output: &mut LopdfDocument,
    pending: &mut Vec<(ObjectId, ObjectId)>,
) -> Option<Object> {
    match object {
        Object::Reference(id) => {
            if let Some(&new_id) = source.copied.get(id) {
                return Some(Object::Reference(new_id));
            }
            if source.is_page_node(*id) {
                return None;
            }
            let new_id = output.new_object_id();
            source.copied.insert(*id, new_id);
            pending.push((*id, new_id));
            Some(Object::Reference(new_id))
        }
        Object::Array(items) => Some(Object::Array(
            items
                .iter()
                .map(|item| remap(item, source, output, pending).unwrap_or(Object::Null))
                .collect(),
        )),
        Object::Dictionary(dict) => Some(Object::Dictionary(remap_dict(
            dict, source, output, pending,
        ))),
        Object::Stream(stream) => {
            let mut stream = stream.clone();
            stream.dict = remap_dict(&stream.dict, source, output, pending);
            Some(Object::Stream(stream))
        }
        other => Some(other.clone()),
    }
}

fn remap_dict(
    dict: &Dictionary,
    source: &mut OpenSource,
    output: &mut LopdfDocument,
    pending: &mut Vec<(ObjectId, ObjectId)>,
) -> Dictionary {
    let mut copy = Dictionary::new();
    for (key, value) in dict.iter() {
        if let Some(value) = remap(value, source, output, pending) {
            copy.set(key.clone(), value);
        }
    }
    copy
}
