// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — page layout, rendering, and merging.

pub mod canvas;
pub mod composer;
pub mod encoding;
pub mod markup;
pub mod metrics;
pub mod reader;
pub mod wrap;
pub mod writer;

pub use canvas::{Decorate, Mark, PageCanvas, PlacedText, book_decoration};
pub use composer::{PageComposer, StyledBlock, compose, style_blocks};
pub use markup::{Run, parse_markup};
pub use reader::PdfReader;
pub use writer::PdfWriter;
