// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use thiserror::Error;

/// Top-level error type for all Folio operations.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Input errors --
    #[error("{name} is not valid UTF-8 text: {source}")]
    InputDecode {
        name: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("no files uploaded")]
    NoFiles,

    #[error("no files selected")]
    EmptyFileName,

    #[error("malformed upload: {0}")]
    Upload(String),

    // -- Rendering errors --
    #[error("layout failed: {0}")]
    Layout(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("merging PDFs failed: {0}")]
    Assembly(String),

    // -- Configuration / serving --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
