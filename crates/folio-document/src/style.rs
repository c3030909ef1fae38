// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Style registry and page geometry for the book layout.
//
// All values are PDF points. The registry is a plain lookup table built at
// compile time; nothing here is mutated after construction, so one instance is
// shared freely across concurrent conversions.

use folio_core::error::{FolioError, Result};
use folio_core::types::{POINTS_PER_INCH, PaperSize};

use crate::markdown::BlockKind;

/// Horizontal alignment of wrapped lines within the block's text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    /// Stretch every line but the last to the full column width.
    Justify,
}

/// The two font families the layout uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Times-Roman and its bold/italic faces.
    Serif,
    /// Courier and its bold/oblique faces.
    Mono,
}

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::gray(0.0);

    /// Background behind quotes and code.
    pub const SHADE: Color = Color::gray(0.95);

    pub const fn gray(level: f32) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }
}

/// Presentation attributes for one block kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleSpec {
    pub name: &'static str,
    pub family: FontFamily,
    pub font_size: f32,
    /// Baseline-to-baseline distance.
    pub leading: f32,
    /// Dropped when the block starts at the top of a page.
    pub space_before: f32,
    pub space_after: f32,
    pub left_indent: f32,
    pub right_indent: f32,
    pub alignment: Alignment,
    pub background: Option<Color>,
    pub text_color: Color,
    /// Keep runs of spaces and break long lines by character (code).
    pub preserve_whitespace: bool,
}

impl StyleSpec {
    const fn serif(name: &'static str, font_size: f32, leading: f32) -> Self {
        Self {
            name,
            family: FontFamily::Serif,
            font_size,
            leading,
            space_before: 0.0,
            space_after: 0.0,
            left_indent: 0.0,
            right_indent: 0.0,
            alignment: Alignment::Left,
            background: None,
            text_color: Color::BLACK,
            preserve_whitespace: false,
        }
    }

    const fn spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    const fn indent(mut self, left: f32, right: f32) -> Self {
        self.left_indent = left;
        self.right_indent = right;
        self
    }

    const fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    const fn shaded(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

/// One style per block kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleRegistry {
    heading1: StyleSpec,
    heading2: StyleSpec,
    heading3: StyleSpec,
    body: StyleSpec,
    bullet: StyleSpec,
    blockquote: StyleSpec,
    code: StyleSpec,
    /// Only `leading` matters: it is the height of a blank-line gap.
    spacer: StyleSpec,
}

/// The default book styles, shared process-wide.
pub static BOOK_STYLES: StyleRegistry = StyleRegistry::book();

impl StyleRegistry {
    /// The book layout: serif body text, centered title, shaded quotes and
    /// code.
    pub const fn book() -> Self {
        let mut code = StyleSpec::serif("Code", 9.0, 12.0)
            .spacing(6.0, 6.0)
            .indent(36.0, 36.0)
            .shaded(Color::SHADE);
        code.family = FontFamily::Mono;
        code.preserve_whitespace = true;

        Self {
            heading1: StyleSpec::serif("Heading1", 24.0, 28.0)
                .spacing(24.0, 12.0)
                .aligned(Alignment::Center),
            heading2: StyleSpec::serif("Heading2", 18.0, 20.0).spacing(12.0, 6.0),
            heading3: StyleSpec::serif("Heading3", 14.0, 16.0).spacing(4.0, 4.0),
            body: StyleSpec::serif("Body", 11.0, 14.0)
                .spacing(3.0, 3.0)
                .aligned(Alignment::Justify),
            bullet: StyleSpec::serif("Bullet", 11.0, 14.0)
                .spacing(2.0, 2.0)
                .indent(24.0, 0.0),
            blockquote: StyleSpec::serif("Blockquote", 10.0, 14.0)
                .spacing(8.0, 8.0)
                .indent(36.0, 36.0)
                .shaded(Color::SHADE),
            code,
            spacer: StyleSpec::serif("Spacer", 11.0, 12.0),
        }
    }

    /// Override the alignment of level-2 headings.
    pub fn with_h2_alignment(mut self, alignment: Alignment) -> Self {
        self.heading2.alignment = alignment;
        self
    }

    /// Look up the style for a block kind.
    pub fn get(&self, kind: BlockKind) -> &StyleSpec {
        match kind {
            BlockKind::Heading1 => &self.heading1,
            BlockKind::Heading2 => &self.heading2,
            BlockKind::Heading3 => &self.heading3,
            BlockKind::Paragraph => &self.body,
            BlockKind::BulletItem => &self.bullet,
            BlockKind::BlockquoteGroup => &self.blockquote,
            BlockKind::CodeGroup => &self.code,
            BlockKind::BlankSpacer => &self.spacer,
        }
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::book()
    }
}

/// The rectangular content area of a page after margins are removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn top(&self) -> f32 {
        self.bottom + self.height
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

/// Page size, margins, and where the page decoration sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Baseline of the footer and page number, measured up from the bottom
    /// edge. Lies inside the bottom margin.
    pub decoration_baseline: f32,
}

impl PageGeometry {
    /// US Letter with 1in top/bottom and 1.25in side margins; decoration at
    /// 0.75in.
    pub const fn book() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin_top: POINTS_PER_INCH,
            margin_bottom: POINTS_PER_INCH,
            margin_left: 1.25 * POINTS_PER_INCH,
            margin_right: 1.25 * POINTS_PER_INCH,
            decoration_baseline: 0.75 * POINTS_PER_INCH,
        }
    }

    /// Build a geometry for `paper` with explicit margins (top, right,
    /// bottom, left).
    ///
    /// Fails when the margins leave no flow frame, or when the decoration
    /// baseline would fall inside the frame.
    pub fn new(
        paper: PaperSize,
        margins: (f32, f32, f32, f32),
        decoration_baseline: f32,
    ) -> Result<Self> {
        let (page_width, page_height) = paper.dimensions_pt();
        let (margin_top, margin_right, margin_bottom, margin_left) = margins;
        let geometry = Self {
            page_width,
            page_height,
            margin_top,
            margin_bottom,
            margin_left,
            margin_right,
            decoration_baseline,
        };

        let frame = geometry.frame();
        if [margin_top, margin_right, margin_bottom, margin_left]
            .iter()
            .any(|m| *m < 0.0)
        {
            return Err(FolioError::Layout("margins must not be negative".into()));
        }
        if frame.width <= 0.0 || frame.height <= 0.0 {
            return Err(FolioError::Layout(format!(
                "margins leave no content frame ({:.1} x {:.1} pt)",
                frame.width, frame.height
            )));
        }
        if decoration_baseline < 0.0 || decoration_baseline >= margin_bottom {
            return Err(FolioError::Layout(format!(
                "decoration baseline {decoration_baseline:.1} pt is outside the bottom margin"
            )));
        }
        Ok(geometry)
    }

    /// The flow frame.
    pub fn frame(&self) -> Frame {
        Frame {
            left: self.margin_left,
            bottom: self.margin_bottom,
            width: self.page_width - self.margin_left - self.margin_right,
            height: self.page_height - self.margin_top - self.margin_bottom,
        }
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::book()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_sizes_decrease() {
        let styles = StyleRegistry::book();
        let h1 = styles.get(BlockKind::Heading1);
        let h2 = styles.get(BlockKind::Heading2);
        let h3 = styles.get(BlockKind::Heading3);
        assert_eq!((h1.font_size, h2.font_size, h3.font_size), (24.0, 18.0, 14.0));
        assert_eq!(h1.alignment, Alignment::Center);
        assert_eq!(h2.alignment, Alignment::Left);
    }

    #[test]
    fn h2_alignment_is_configurable() {
        let styles = StyleRegistry::book().with_h2_alignment(Alignment::Center);
        assert_eq!(styles.get(BlockKind::Heading2).alignment, Alignment::Center);
        // The shared default is untouched.
        assert_eq!(BOOK_STYLES.get(BlockKind::Heading2).alignment, Alignment::Left);
    }

    #[test]
    fn quote_and_code_are_shaded_and_indented() {
        let quote = BOOK_STYLES.get(BlockKind::BlockquoteGroup);
        assert_eq!(quote.background, Some(Color::SHADE));
        assert_eq!((quote.left_indent, quote.right_indent), (36.0, 36.0));
        assert!(quote.font_size < BOOK_STYLES.get(BlockKind::Paragraph).font_size);

        let code = BOOK_STYLES.get(BlockKind::CodeGroup);
        assert_eq!(code.family, FontFamily::Mono);
        assert!(code.preserve_whitespace);
        assert!(code.background.is_some());
    }

    #[test]
    fn body_is_justified() {
        assert_eq!(BOOK_STYLES.get(BlockKind::Paragraph).alignment, Alignment::Justify);
    }

    #[test]
    fn book_frame() {
        let frame = PageGeometry::book().frame();
        assert_eq!(frame.left, 90.0);
        assert_eq!(frame.width, 432.0);
        assert_eq!(frame.height, 648.0);
        assert_eq!(frame.top(), 720.0);
    }

    #[test]
    fn degenerate_margins_rejected() {
        let err = PageGeometry::new(PaperSize::Letter, (400.0, 72.0, 400.0, 72.0), 10.0);
        assert!(matches!(err, Err(FolioError::Layout(_))));
    }

    #[test]
    fn decoration_must_sit_in_bottom_margin() {
        let err = PageGeometry::new(PaperSize::A4, (72.0, 72.0, 36.0, 72.0), 40.0);
        assert!(err.is_err());
        assert!(PageGeometry::new(PaperSize::A4, (72.0, 72.0, 72.0, 72.0), 40.0).is_ok());
    }
}
