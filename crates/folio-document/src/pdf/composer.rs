// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page composer — flow styled blocks top-to-bottom through the page frame.
//
// Each block is wrapped at its text column (frame width minus the style's
// indents) and placed line by line. When the next line would cross the bottom
// of the frame a new page is started and the rest of the block carries over.
// Every new page is handed to the decoration hook before anything else is
// drawn on it. Space-before is dropped at the top of a page and space-after is
// clamped to the frame, so the result depends only on the blocks and the
// geometry.

use tracing::{debug, instrument};

use super::canvas::{Decorate, Mark, PageCanvas, PlacedText};
use super::markup::{Run, parse_markup};
use super::wrap::{WrappedLine, space_width, wrap_runs};
use crate::markdown::{Block, BlockKind, format_blockquote, format_code_block, format_inline};
use crate::style::{Alignment, Frame, PageGeometry, StyleRegistry, StyleSpec};

/// Narrowest text column the composer will wrap at.
const MIN_COLUMN_WIDTH: f32 = 1.0;

/// Descender allowance below the baseline, as a fraction of the font size.
const DESCENT: f32 = 0.22;

/// A block ready for layout: its kind plus one run list per hard line.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledBlock {
    pub kind: BlockKind,
    pub lines: Vec<Vec<Run>>,
}

impl StyledBlock {
    /// Apply the inline and block formatters to a classified block.
    pub fn from_block(block: &Block) -> Self {
        let kind = block.kind();
        let lines = match block {
            Block::Heading1(text)
            | Block::Heading2(text)
            | Block::Heading3(text)
            | Block::Paragraph(text)
            | Block::BulletItem(text) => vec![parse_markup(&format_inline(text))],
            Block::BlockquoteGroup(lines) => format_blockquote(lines)
                .iter()
                .map(|line| parse_markup(line))
                .collect(),
            Block::CodeGroup(lines) => format_code_block(lines)
                .into_iter()
                .map(|line| if line.is_empty() { Vec::new() } else { vec![Run::plain(line)] })
                .collect(),
            Block::BlankSpacer => Vec::new(),
        };
        Self { kind, lines }
    }
}

/// Prepare a classified document for layout.
pub fn style_blocks(blocks: &[Block]) -> Vec<StyledBlock> {
    blocks.iter().map(StyledBlock::from_block).collect()
}

/// Lays blocks out onto pages of one geometry with one style registry.
pub struct PageComposer<'a> {
    geometry: &'a PageGeometry,
    styles: &'a StyleRegistry,
}

impl<'a> PageComposer<'a> {
    pub fn new(geometry: &'a PageGeometry, styles: &'a StyleRegistry) -> Self {
        Self { geometry, styles }
    }

    /// Lay out `blocks`, calling `decorate` once per page before its content.
    ///
    /// Always returns at least one page.
    #[instrument(skip_all, fields(blocks = blocks.len()))]
    pub fn compose(&self, blocks: &[StyledBlock], decorate: &mut Decorate<'_>) -> Vec<PageCanvas> {
        let mut flow = Flow::new(self.geometry, decorate);

        for block in blocks {
            let style = self.styles.get(block.kind);
            if block.kind == BlockKind::BlankSpacer {
                flow.gap(style.leading);
            } else {
                flow.place_block(block, style);
            }
        }

        let pages = flow.finish();
        debug!(pages = pages.len(), "Composition complete");
        pages
    }
}

/// Free-function form of [`PageComposer::compose`].
pub fn compose(
    blocks: &[StyledBlock],
    geometry: &PageGeometry,
    styles: &StyleRegistry,
    decorate: &mut Decorate<'_>,
) -> Vec<PageCanvas> {
    PageComposer::new(geometry, styles).compose(blocks, decorate)
}

/// Mutable layout state for one composition.
struct Flow<'g, 'd, 'f> {
    geometry: &'g PageGeometry,
    frame: Frame,
    decorate: &'d mut Decorate<'f>,
    /// Finished pages, in order.
    pages: Vec<PageCanvas>,
    /// The page being filled.
    current: PageCanvas,
    /// Vertical space consumed on the current page, measured down from the
    /// frame top.
    used: f32,
}

impl<'g, 'd, 'f> Flow<'g, 'd, 'f> {
    fn new(geometry: &'g PageGeometry, decorate: &'d mut Decorate<'f>) -> Self {
        let current = decorated_page(geometry, decorate, 1);
        Self {
            geometry,
            frame: geometry.frame(),
            decorate,
            pages: Vec::new(),
            current,
            used: 0.0,
        }
    }

    fn new_page(&mut self) {
        let number = self.current.number + 1;
        let next = decorated_page(self.geometry, self.decorate, number);
        self.pages.push(std::mem::replace(&mut self.current, next));
        self.used = 0.0;
    }

    fn at_top(&self) -> bool {
        self.used <= 0.0
    }

    fn fits(&self, height: f32) -> bool {
        self.used + height <= self.frame.height
    }

    /// A blank-line gap. A gap that does not fit ends the page and is not
    /// carried over.
    fn gap(&mut self, height: f32) {
        if self.fits(height) {
            self.used += height;
        } else {
            self.new_page();
        }
    }

    fn place_block(&mut self, block: &StyledBlock, style: &StyleSpec) {
        let column_left = self.frame.left + style.left_indent;
        let column_width =
            (self.frame.width - style.left_indent - style.right_indent).max(MIN_COLUMN_WIDTH);

        let lines: Vec<WrappedLine> = block
            .lines
            .iter()
            .flat_map(|runs| {
                wrap_runs(
                    runs,
                    style.family,
                    style.font_size,
                    column_width,
                    style.preserve_whitespace,
                )
            })
            .collect();
        if lines.is_empty() {
            return;
        }

        let mut before = if self.at_top() { 0.0 } else { style.space_before };
        let mut segment = Segment::default();

        for line in &lines {
            // An empty page always accepts a line, so layout advances even
            // when the frame is shorter than the leading.
            if !self.at_top() && !self.fits(before + style.leading) {
                self.close_segment(&mut segment, style, column_left, column_width);
                self.new_page();
                before = 0.0;
            }
            self.used += before;
            before = 0.0;

            if segment.lines == 0 {
                segment.top = self.frame.top() - self.used;
            }
            let baseline = self.frame.top() - self.used - style.leading
                + (style.leading - style.font_size) / 2.0
                + DESCENT * style.font_size;
            segment
                .marks
                .extend(line_marks(line, style, column_left, column_width, baseline));
            segment.lines += 1;
            self.used += style.leading;
        }

        self.close_segment(&mut segment, style, column_left, column_width);
        self.used = (self.used + style.space_after).min(self.frame.height);
    }

    /// Paint the lines placed on the current page, shaded if the style asks.
    fn close_segment(
        &mut self,
        segment: &mut Segment,
        style: &StyleSpec,
        column_left: f32,
        column_width: f32,
    ) {
        if segment.lines == 0 {
            return;
        }
        let bottom = self.frame.top() - self.used;
        let top = segment.top;
        let marks = std::mem::take(&mut segment.marks);
        segment.lines = 0;

        let canvas = &mut self.current;
        if let Some(color) = style.background {
            canvas.fill_rect(column_left, bottom, column_width, top - bottom, color);
        }
        canvas.extend(marks);
    }

    fn finish(self) -> Vec<PageCanvas> {
        let mut pages = self.pages;
        pages.push(self.current);
        pages
    }
}

/// A blank page with its decoration already drawn.
fn decorated_page(geometry: &PageGeometry, decorate: &mut Decorate<'_>, number: u32) -> PageCanvas {
    let mut canvas = PageCanvas::new(number, geometry.page_width, geometry.page_height);
    decorate(&mut canvas, number);
    canvas
}

/// Lines of one block placed on the current page but not yet painted.
#[derive(Default)]
struct Segment {
    top: f32,
    lines: usize,
    marks: Vec<Mark>,
}

/// Position every piece of a wrapped line according to the style's alignment.
fn line_marks(
    line: &WrappedLine,
    style: &StyleSpec,
    column_left: f32,
    column_width: f32,
    baseline: f32,
) -> Vec<Mark> {
    let space = space_width(style.family, style.font_size);
    let slack = (column_width - line.natural_width).max(0.0);
    let gaps = line.words.len().saturating_sub(1);

    let (mut x, gap) = match style.alignment {
        Alignment::Left => (column_left, space),
        Alignment::Center => (column_left + slack / 2.0, space),
        Alignment::Right => (column_left + slack, space),
        Alignment::Justify if !line.last && gaps > 0 => {
            (column_left, space + slack / gaps as f32)
        }
        Alignment::Justify => (column_left, space),
    };

    let mut marks = Vec::new();
    for word in &line.words {
        for piece in &word.pieces {
            marks.push(Mark::Text(PlacedText {
                x,
                y: baseline,
                face: piece.face,
                size: style.font_size,
                color: style.text_color,
                text: piece.text.clone(),
            }));
            x += piece.width;
        }
        x += gap;
    }
    marks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::classify;
    use crate::style::{BOOK_STYLES, Color};
    use folio_core::types::PaperSize;

    fn layout(text: &str, geometry: &PageGeometry) -> (Vec<PageCanvas>, Vec<u32>) {
        let blocks = style_blocks(&classify(text).blocks);
        let mut seen = Vec::new();
        let mut record = |_: &mut PageCanvas, n: u32| seen.push(n);
        let pages = compose(&blocks, geometry, &BOOK_STYLES, &mut record);
        (pages, seen)
    }

    fn long_document(paragraphs: usize) -> String {
        let sentence = "The quick brown fox jumps over the lazy dog. ";
        (0..paragraphs)
            .map(|i| format!("Paragraph {i}: {}", sentence.repeat(6)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    #[test]
    fn empty_document_is_one_decorated_page() {
        let (pages, seen) = layout("", &PageGeometry::book());
        assert_eq!(pages.len(), 1);
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn overflow_spans_pages_with_increasing_numbers() {
        let (pages, seen) = layout(&long_document(60), &PageGeometry::book());
        assert!(pages.len() > 1);
        let expected: Vec<u32> = (1..=pages.len() as u32).collect();
        assert_eq!(seen, expected);
        assert_eq!(
            pages.iter().map(|p| p.number).collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn closing_block_lands_on_final_page() {
        let text = format!("{}\n\nClosing", long_document(60));
        let (pages, _) = layout(&text, &PageGeometry::book());
        assert!(pages.len() > 1);

        let holders: Vec<u32> = pages
            .iter()
            .filter(|page| page.texts().any(|t| t.text == "Closing"))
            .map(|page| page.number)
            .collect();
        assert_eq!(holders, vec![pages.len() as u32]);
    }

    #[test]
    fn layout_is_deterministic() {
        let text = long_document(25);
        let (first, _) = layout(&text, &PageGeometry::book());
        let (second, _) = layout(&text, &PageGeometry::book());
        assert_eq!(first, second);
    }

    #[test]
    fn content_stays_inside_the_frame() {
        let geometry = PageGeometry::book();
        let frame = geometry.frame();
        let (pages, _) = layout(&long_document(30), &geometry);

        for page in &pages {
            for text in page.texts() {
                assert!(text.y > frame.bottom, "{text:?}");
                assert!(text.y < frame.top(), "{text:?}");
            }
        }
    }

    #[test]
    fn decoration_is_painted_first() {
        let geometry = PageGeometry::book();
        let blocks = style_blocks(&classify(&long_document(40)).blocks);
        let mut decorate = crate::pdf::canvas::book_decoration(geometry, "foot".into());
        let pages = compose(&blocks, &geometry, &BOOK_STYLES, &mut decorate);

        for page in &pages {
            let first: Vec<&PlacedText> = page.texts().take(2).collect();
            assert_eq!(first[0].text, page.number.to_string());
            assert_eq!(first[1].text, "foot");
            assert!(first.iter().all(|t| t.y == geometry.decoration_baseline));
        }
    }

    #[test]
    fn heading_is_centered() {
        let geometry = PageGeometry::book();
        let (pages, _) = layout("# Title", &geometry);
        let title = pages[0].texts().find(|t| t.text == "Title").unwrap();
        let width = title.face.text_width("Title", 24.0);
        let frame = geometry.frame();
        let center = title.x + width / 2.0;
        assert!((center - (frame.left + frame.width / 2.0)).abs() < 0.01);
    }

    #[test]
    fn justified_lines_fill_the_column() {
        let geometry = PageGeometry::book();
        let frame = geometry.frame();
        let (pages, _) = layout(&long_document(1), &geometry);
        let body: Vec<&PlacedText> = pages[0].texts().filter(|t| t.size == 11.0).collect();

        let first_y = body[0].y;
        let last_on_first_line = body.iter().filter(|t| t.y == first_y).last().unwrap();
        let right = last_on_first_line.x
            + last_on_first_line.face.text_width(&last_on_first_line.text, 11.0);
        assert!((right - frame.right()).abs() < 0.01, "right edge {right}");
    }

    #[test]
    fn shaded_blocks_draw_background_before_text() {
        let (pages, _) = layout("```\nlet x = 1;\n```", &PageGeometry::book());
        let marks = pages[0].marks();
        let rect_at = marks
            .iter()
            .position(|m| matches!(m, Mark::Rect(r) if r.color == Color::SHADE))
            .unwrap();
        let code_at = marks
            .iter()
            .position(|m| matches!(m, Mark::Text(t) if t.text == "let x = 1;"))
            .unwrap();
        assert!(rect_at < code_at);
    }

    #[test]
    fn split_block_is_shaded_on_each_page() {
        let code: String = (0..120).map(|i| format!("line {i}\n")).collect();
        let (pages, _) = layout(&format!("```\n{code}```"), &PageGeometry::book());
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(page.marks().iter().any(|m| matches!(m, Mark::Rect(_))));
        }
    }

    #[test]
    fn tiny_frame_still_terminates() {
        // Frame shorter than one line of body text.
        let geometry =
            PageGeometry::new(PaperSize::Custom { width_mm: 40, height_mm: 40 }, (50.0, 20.0, 50.0, 20.0), 10.0)
                .unwrap();
        let (pages, seen) = layout("one two three four five six seven eight nine ten", &geometry);
        assert!(pages.len() >= 2);
        assert_eq!(seen.len(), pages.len());
        assert!(pages.iter().all(|page| page.texts().count() > 0));
    }

    #[test]
    fn spacer_adds_vertical_gap() {
        let geometry = PageGeometry::book();
        let y_of = |text: &str| {
            let (pages, _) = layout(text, &geometry);
            pages[0].texts().find(|t| t.text == "b").unwrap().y
        };
        let tight = y_of("a\nb");
        let spaced = y_of("a\n\nb");
        assert!((tight - spaced - 12.0).abs() < 1e-3);
    }
}
