// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — typeset markdown into a book-style PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Layout happens first on `PageCanvas` display lists
// (see `composer`), which are converted to ops page by page.

use std::path::Path;

use folio_core::config::DEFAULT_FOOTER;
use folio_core::error::Result;
use folio_core::types::POINTS_PER_MM;
use printpdf::{Mm, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg};
use tracing::{debug, info, instrument};

use super::canvas::{PageCanvas, book_decoration};
use super::composer::{PageComposer, StyledBlock, style_blocks};
use crate::markdown::{Block, classify};
use crate::style::{PageGeometry, StyleRegistry};

/// Title used when none is set.
const DEFAULT_TITLE: &str = "Folio Document";

/// Typesets markdown or pre-classified blocks into a single PDF.
///
/// Geometry and styles are fixed at construction; a writer can be cloned and
/// shared across threads.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    geometry: PageGeometry,
    styles: StyleRegistry,
    /// Footer text drawn in the bottom margin of every page.
    footer: String,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// Create a writer with explicit geometry and styles.
    pub fn new(geometry: PageGeometry, styles: StyleRegistry) -> Self {
        Self {
            geometry,
            styles,
            footer: DEFAULT_FOOTER.to_owned(),
            title: None,
        }
    }

    /// The book layout on US Letter.
    pub fn book() -> Self {
        Self::new(PageGeometry::book(), StyleRegistry::book())
    }

    /// Set the footer text.
    pub fn set_footer(&mut self, footer: impl Into<String>) {
        self.footer = footer.into();
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    // -- Layout ---------------------------------------------------------------

    /// Lay out markdown without serialising; one canvas per page.
    pub fn layout_markdown(&self, text: &str) -> Vec<PageCanvas> {
        let outcome = classify(text);
        self.layout_blocks(&outcome.blocks)
    }

    /// Lay out already-classified blocks.
    pub fn layout_blocks(&self, blocks: &[Block]) -> Vec<PageCanvas> {
        let styled: Vec<StyledBlock> = style_blocks(blocks);
        let mut decorate = book_decoration(self.geometry, self.footer.clone());
        PageComposer::new(&self.geometry, &self.styles).compose(&styled, &mut decorate)
    }

    // -- Markdown to PDF ------------------------------------------------------

    /// Typeset markdown text into PDF bytes.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn render_markdown(&self, text: &str) -> Result<Vec<u8>> {
        let pages = self.layout_markdown(text);
        self.serialise(&pages)
    }

    /// Serialise laid-out pages.
    pub fn serialise(&self, canvases: &[PageCanvas]) -> Result<Vec<u8>> {
        let title = self.title.as_deref().unwrap_or(DEFAULT_TITLE);
        let page_w = Mm(self.geometry.page_width / POINTS_PER_MM);
        let page_h = Mm(self.geometry.page_height / POINTS_PER_MM);

        info!(title, pages = canvases.len(), "Creating book PDF");

        let mut doc = PdfDocument::new(title);
        let pages: Vec<PdfPage> = canvases
            .iter()
            .map(|canvas| PdfPage::new(page_w, page_h, canvas.to_ops()))
            .collect();
        doc.with_pages(pages);

        // Text is emitted as raw `Tj` ops, which secure mode would drop.
        let options = PdfSaveOptions {
            secure: false,
            ..PdfSaveOptions::default()
        };
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&options, &mut warnings);

        debug!(
            pages = canvases.len(),
            output_bytes = output.len(),
            warnings = warnings.len(),
            "Serialisation complete"
        );
        Ok(output)
    }

    // -- File output convenience ----------------------------------------------

    /// Typeset markdown and write the PDF directly to a file.
    pub fn write_markdown_to_file(&self, text: &str, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.render_markdown(text)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote book PDF to {}", path.as_ref().display());
        Ok(())
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::book()
    }
}
