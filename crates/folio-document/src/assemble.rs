// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document assembly — render every source document and concatenate the
// results into one PDF.
//
// Rendering is fail-fast: the first document that cannot be typeset aborts
// the batch and nothing is merged. When a staging directory is supplied the
// intermediate PDFs are written there as named temporary files, which are
// removed when this call returns whatever the outcome.

use std::path::{Path, PathBuf};

use folio_core::error::{FolioError, Result};
use folio_core::integrity::hash_bytes;
use folio_core::types::SourceDocument;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::pdf::reader::PdfReader;
use crate::pdf::writer::PdfWriter;

/// One source document after rendering.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// The final concatenated PDF.
#[derive(Debug, Clone)]
pub struct MergedOutput {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Lowercase hex SHA-256 of `bytes`.
    pub sha256: String,
}

/// Renders a batch of source documents and merges them in input order.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    writer: PdfWriter,
    staging: Option<PathBuf>,
}

impl DocumentAssembler {
    pub fn new(writer: PdfWriter) -> Self {
        Self {
            writer,
            staging: None,
        }
    }

    /// Stage intermediate PDFs as files under `dir` instead of merging in
    /// memory. The directory must exist and outlive the call.
    pub fn with_staging(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging = Some(dir.into());
        self
    }

    pub fn writer(&self) -> &PdfWriter {
        &self.writer
    }

    /// Render one document, titled with its file name.
    #[instrument(
        skip_all,
        fields(name = source.name(), kind = ?source.kind(), text_len = source.text().len())
    )]
    pub fn render(&self, source: &SourceDocument) -> Result<RenderedDocument> {
        let mut writer = self.writer.clone();
        writer.set_title(source.name());

        let pages = writer.layout_markdown(source.text());
        let page_count = pages.len();
        let bytes = writer.serialise(&pages)?;

        debug!(page_count, bytes = bytes.len(), "Rendered document");
        Ok(RenderedDocument {
            name: source.name().to_owned(),
            bytes,
            page_count,
        })
    }

    /// Render every document and merge them in order.
    ///
    /// Fails with [`FolioError::NoFiles`] on an empty batch. Merge failures
    /// surface as [`FolioError::Assembly`].
    #[instrument(skip_all, fields(documents = sources.len()))]
    pub fn assemble(&self, sources: &[SourceDocument]) -> Result<MergedOutput> {
        if sources.is_empty() {
            return Err(FolioError::NoFiles);
        }

        let rendered = sources
            .iter()
            .map(|source| self.render(source))
            .collect::<Result<Vec<_>>>()?;
        let expected: usize = rendered.iter().map(|doc| doc.page_count).sum();

        let bytes = match &self.staging {
            Some(dir) => merge_staged(dir, &rendered),
            None => merge_in_memory(&rendered),
        }
        .map_err(|err| FolioError::Assembly(err.to_string()))?;

        let page_count = PdfReader::from_bytes(&bytes)
            .map_err(|err| FolioError::Assembly(err.to_string()))?
            .page_count();
        if page_count != expected {
            return Err(FolioError::Assembly(format!(
                "merged PDF has {page_count} pages, expected {expected}"
            )));
        }

        let sha256 = hash_bytes(&bytes);
        info!(
            documents = rendered.len(),
            page_count,
            bytes = bytes.len(),
            sha256 = %sha256,
            "Assembled merged PDF"
        );

        Ok(MergedOutput {
            bytes,
            page_count,
            sha256,
        })
    }
}

fn merge_in_memory(rendered: &[RenderedDocument]) -> Result<Vec<u8>> {
    let (first, rest) = rendered
        .split_first()
        .ok_or_else(|| FolioError::Assembly("nothing to merge".into()))?;
    let others: Vec<&[u8]> = rest.iter().map(|doc| doc.bytes.as_slice()).collect();
    PdfReader::from_bytes(&first.bytes)?.merge(&others)
}

fn merge_staged(dir: &Path, rendered: &[RenderedDocument]) -> Result<Vec<u8>> {
    // Handles stay alive until the merge is done; dropping them deletes the files.
    let mut staged: Vec<NamedTempFile> = Vec::with_capacity(rendered.len());
    for doc in rendered {
        let file = tempfile::Builder::new()
            .prefix("folio-")
            .suffix(".pdf")
            .tempfile_in(dir)?;
        std::fs::write(file.path(), &doc.bytes)?;
        debug!(name = %doc.name, path = %file.path().display(), "Staged intermediate PDF");
        staged.push(file);
    }

    let paths: Vec<&Path> = staged.iter().map(NamedTempFile::path).collect();
    PdfReader::merge_files(&paths)
}
