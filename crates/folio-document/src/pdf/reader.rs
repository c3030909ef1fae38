// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open, inspect, and merge rendered PDF documents using the
// `lopdf` crate.

use std::collections::BTreeMap;
use std::path::Path;

use folio_core::error::{FolioError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, instrument, warn};

/// Reads and concatenates existing PDF files.
///
/// Wraps `lopdf::Document`; merging appends the pages of further documents
/// after this one's, in order.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        debug!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            FolioError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            FolioError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    // -- Merging --------------------------------------------------------------

    /// Merge this document with further PDF byte-slices. Pages appear in the
    /// order: self, then each supplied document in order.
    #[instrument(skip_all, fields(additional_count = others.len()))]
    pub fn merge(&self, others: &[&[u8]]) -> Result<Vec<u8>> {
        let mut loaded = Vec::with_capacity(others.len());
        for (index, other_bytes) in others.iter().enumerate() {
            let other = Document::load_mem(other_bytes).map_err(|err| {
                FolioError::PdfError(format!(
                    "failed to load additional PDF #{}: {}",
                    index + 1,
                    err
                ))
            })?;
            loaded.push(other);
        }
        self.merge_documents(&loaded)
    }

    /// Merge this document with further readers, in order.
    pub fn merge_readers(&self, others: &[PdfReader]) -> Result<Vec<u8>> {
        let documents: Vec<Document> = others.iter().map(|r| r.document.clone()).collect();
        self.merge_documents(&documents)
    }

    /// Open every file in `paths` and concatenate them in order.
    ///
    /// Fails on an empty list.
    #[instrument(skip_all, fields(files = paths.len()))]
    pub fn merge_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<u8>> {
        let (first, rest) = paths
            .split_first()
            .ok_or_else(|| FolioError::PdfError("nothing to merge".into()))?;

        let base = Self::open(first)?;
        let others = rest.iter().map(Self::open).collect::<Result<Vec<_>>>()?;
        base.merge_readers(&others)
    }

    fn merge_documents(&self, others: &[Document]) -> Result<Vec<u8>> {
        info!(
            base_pages = self.page_count(),
            additional_documents = others.len(),
            "Merging PDFs"
        );

        let mut merged = self.document.clone();

        for other in others {
            // Shared resources (fonts, mostly) are copied once per source.
            let mut copied: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();
            for (_, page_id) in other.get_pages() {
                clone_page_into(other, &mut merged, page_id, &mut copied)?;
            }
        }

        let mut output = Vec::new();
        merged.save_to(&mut output).map_err(|err| {
            FolioError::PdfError(format!("failed to serialise merged PDF: {}", err))
        })?;

        debug!(output_bytes = output.len(), "Merge complete");
        Ok(output)
    }
}

/// Clone a single page object (and everything it references) from `source`
/// into `target`, appending it as the last page.
fn clone_page_into(
    source: &Document,
    target: &mut Document,
    page_id: ObjectId,
    copied: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<()> {
    let page_object = source.get_object(page_id).map_err(|err| {
        FolioError::PdfError(format!("cannot read page object {:?}: {}", page_id, err))
    })?;

    let cloned = deep_clone_object(source, target, page_object, copied)?;
    let cloned_id = target.add_object(cloned);

    let pages_id = target
        .catalog()
        .map_err(|err| FolioError::PdfError(format!("no catalog: {}", err)))
        .and_then(|catalog| {
            catalog
                .get(b"Pages")
                .map_err(|err| FolioError::PdfError(format!("no /Pages: {}", err)))
                .and_then(|pages_ref| match pages_ref {
                    Object::Reference(id) => Ok(*id),
                    _ => Err(FolioError::PdfError("/Pages is not a reference".to_string())),
                })
        })?;

    match target.get_object_mut(pages_id) {
        Ok(Object::Dictionary(pages_dict)) => {
            if let Ok(Object::Array(kids)) = pages_dict.get_mut(b"Kids") {
                kids.push(Object::Reference(cloned_id));
            }
            if let Ok(Object::Integer(count)) = pages_dict.get_mut(b"Count") {
                *count += 1;
            }
        }
        _ => {
            return Err(FolioError::PdfError(
                "/Pages is not a dictionary".to_string(),
            ));
        }
    }

    if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(cloned_id) {
        page_dict.set("Parent", Object::Reference(pages_id));
    }

    Ok(())
}

/// Deep-clone a lopdf object, resolving references through `copied` so each
/// source object lands in `target` once. /Parent is skipped; the caller
/// patches it.
fn deep_clone_object(
    source: &Document,
    target: &mut Document,
    object: &Object,
    copied: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match object {
        Object::Dictionary(dict) => Ok(Object::Dictionary(clone_dictionary(
            source, target, dict, copied,
        )?)),
        Object::Array(arr) => {
            let mut new_arr = Vec::with_capacity(arr.len());
            for item in arr {
                new_arr.push(deep_clone_object(source, target, item, copied)?);
            }
            Ok(Object::Array(new_arr))
        }
        Object::Reference(ref_id) => {
            if let Some(existing) = copied.get(ref_id) {
                return Ok(Object::Reference(*existing));
            }
            match source.get_object(*ref_id) {
                Ok(referenced) => {
                    let cloned = deep_clone_object(source, target, referenced, copied)?;
                    let new_id = target.add_object(cloned);
                    copied.insert(*ref_id, new_id);
                    Ok(Object::Reference(new_id))
                }
                Err(err) => {
                    warn!(?ref_id, %err, "Cannot resolve reference, using Null");
                    Ok(Object::Null)
                }
            }
        }
        Object::Stream(stream) => {
            let dict = clone_dictionary(source, target, &stream.dict, copied)?;
            Ok(Object::Stream(Stream::new(dict, stream.content.clone())))
        }
        other => Ok(other.clone()),
    }
}

fn clone_dictionary(
    source: &Document,
    target: &mut Document,
    dict: &Dictionary,
    copied: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        if key == b"Parent" {
            continue;
        }
        let cloned_value = deep_clone_object(source, target, value, copied)?;
        new_dict.set(key.clone(), cloned_value);
    }
    Ok(new_dict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::writer::PdfWriter;

    fn render(text: &str) -> Vec<u8> {
        PdfWriter::book().render_markdown(text).unwrap()
    }

    fn long_text() -> String {
        "Body text that keeps going for a while.\n".repeat(150)
    }

    #[test]
    fn garbage_is_a_pdf_error() {
        let err = PdfReader::from_bytes(b"not a pdf").err().unwrap();
        assert!(matches!(err, FolioError::PdfError(_)));
    }

    #[test]
    fn merge_sums_page_counts() {
        let first = render("# One");
        let second = render(&long_text());
        let second_pages = PdfReader::from_bytes(&second).unwrap().page_count();
        assert!(second_pages > 1);

        let merged = PdfReader::from_bytes(&first)
            .unwrap()
            .merge(&[second.as_slice()])
            .unwrap();
        let reader = PdfReader::from_bytes(&merged).unwrap();
        assert_eq!(reader.page_count(), 1 + second_pages);
    }

    #[test]
    fn merge_with_nothing_keeps_pages() {
        let only = render(&long_text());
        let expected = PdfReader::from_bytes(&only).unwrap().page_count();
        let merged = PdfReader::from_bytes(&only).unwrap().merge(&[]).unwrap();
        assert_eq!(PdfReader::from_bytes(&merged).unwrap().page_count(), expected);
    }

    #[test]
    fn merge_files_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.pdf");
        std::fs::write(&a, render("first")).unwrap();
        std::fs::write(&b, render("second")).unwrap();

        let merged = PdfReader::merge_files(&[&a, &b]).unwrap();
        assert_eq!(PdfReader::from_bytes(&merged).unwrap().page_count(), 2);

        let opened = PdfReader::open(&a).unwrap();
        assert!(opened.source_path().is_some());
    }

    #[test]
    fn merge_files_rejects_empty_list() {
        let paths: [&Path; 0] = [];
        assert!(PdfReader::merge_files(&paths).is_err());
    }
}
