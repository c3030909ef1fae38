// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document — Markdown to book-style PDF.
//
// Classifies markdown into typed blocks, formats inline emphasis, flows the
// styled blocks through a fixed book page geometry, renders each document with
// printpdf, and concatenates per-document PDFs with lopdf.

pub mod assemble;
pub mod markdown;
pub mod pdf;
pub mod style;

// Re-export the primary structs so callers can use `folio_document::PdfWriter` etc.
pub use assemble::{DocumentAssembler, MergedOutput, RenderedDocument};
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
pub use style::{Alignment, PageGeometry, StyleRegistry};
