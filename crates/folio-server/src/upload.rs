// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload handling — pull the `markdown_files` parts out of a multipart body
// and validate the whole batch before anything is converted.

use axum::body::Bytes;
use axum::extract::Multipart;
use folio_core::error::{FolioError, Result};
use folio_core::types::{SourceDocument, SourceKind};
use tracing::debug;

/// Multipart field carrying the uploaded files.
pub const FILE_FIELD: &str = "markdown_files";

/// One raw uploaded part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Bytes,
}

/// Read every `markdown_files` part in upload order. Other fields are ignored.
pub async fn collect_files(multipart: &mut Multipart) -> Result<Vec<UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| FolioError::Upload(err.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = base_name(field.file_name().unwrap_or_default()).to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| FolioError::Upload(err.body_text()))?;
        debug!(name = %name, bytes = bytes.len(), "Received upload part");
        files.push(UploadedFile { name, bytes });
    }

    Ok(files)
}

/// Check the batch and decode it.
///
/// Order matters: no files, then an empty first file name, then the
/// extension of every file, and only then UTF-8 decoding.
pub fn validate(files: &[UploadedFile]) -> Result<Vec<SourceDocument>> {
    let first = files.first().ok_or(FolioError::NoFiles)?;
    if first.name.is_empty() {
        return Err(FolioError::EmptyFileName);
    }

    if let Some(bad) = files
        .iter()
        .find(|file| SourceKind::from_file_name(&file.name).is_none())
    {
        return Err(FolioError::UnsupportedExtension(bad.name.clone()));
    }

    files
        .iter()
        .map(|file| SourceDocument::from_bytes(file.name.clone(), &file.bytes))
        .collect()
}

/// Strip any client-supplied directory components.
fn base_name(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim()
}
