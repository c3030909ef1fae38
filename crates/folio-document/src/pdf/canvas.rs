// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page canvas — an ordered display list for one page, plus the per-page
// decoration hook.
//
// The composer and the decoration callback both draw onto a `PageCanvas`;
// the writer later converts the marks into printpdf operations. The display
// list itself holds no printpdf types.
//
// Text is shown with a raw `Tj` carrying WinAnsi bytes. printpdf's own text
// op writes UTF-8, which the WinAnsi builtin fonts would misread; an empty
// builtin-font text op still precedes it so the font lands in the page
// resources. Pages must be saved with `secure: false` for the raw op to be
// written.

use printpdf::{
    Color as PdfColor, DictItem, LinePoint, Op, PaintMode, Point, Polygon, PolygonRing, Pt,
    Rgb, WindingOrder,
};

use super::encoding::encode_winansi;
use super::metrics::Face;
use crate::style::{Color, FontFamily, PageGeometry};

/// Text placed at an absolute position (left end of the baseline).
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub x: f32,
    pub y: f32,
    pub face: Face,
    pub size: f32,
    pub color: Color,
    pub text: String,
}

/// A filled rectangle; `(x, y)` is the lower-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

/// One drawing operation, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text(PlacedText),
    Rect(FilledRect),
}

/// Everything drawn on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCanvas {
    /// 1-based page number, in emission order.
    pub number: u32,
    pub width: f32,
    pub height: f32,
    marks: Vec<Mark>,
}

impl PageCanvas {
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            marks: Vec::new(),
        }
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Text marks only, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &PlacedText> {
        self.marks.iter().filter_map(|mark| match mark {
            Mark::Text(text) => Some(text),
            Mark::Rect(_) => None,
        })
    }

    pub fn extend(&mut self, marks: impl IntoIterator<Item = Mark>) {
        self.marks.extend(marks);
    }

    /// Draw `text` with its baseline starting at `(x, y)`.
    pub fn draw_string(&mut self, x: f32, y: f32, face: Face, size: f32, text: &str) {
        self.marks.push(Mark::Text(PlacedText {
            x,
            y,
            face,
            size,
            color: Color::BLACK,
            text: text.to_owned(),
        }));
    }

    /// Draw `text` so that it ends at `x_right`.
    pub fn draw_right_string(&mut self, x_right: f32, y: f32, face: Face, size: f32, text: &str) {
        let width = face.text_width(text, size);
        self.draw_string(x_right - width, y, face, size, text);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.marks.push(Mark::Rect(FilledRect {
            x,
            y,
            width,
            height,
            color,
        }));
    }

    /// Convert the display list into printpdf operations.
    pub fn to_ops(&self) -> Vec<Op> {
        let mut ops: Vec<Op> = Vec::with_capacity(self.marks.len() * 6);

        for mark in &self.marks {
            match mark {
                Mark::Rect(rect) => {
                    ops.push(Op::SaveGraphicsState);
                    ops.push(Op::SetFillColor {
                        col: pdf_color(rect.color),
                    });
                    ops.push(Op::DrawPolygon {
                        polygon: rect_polygon(rect),
                    });
                    ops.push(Op::RestoreGraphicsState);
                }
                Mark::Text(text) => {
                    let font = text.face.builtin();
                    ops.push(Op::SetFillColor {
                        col: pdf_color(text.color),
                    });
                    ops.push(Op::StartTextSection);
                    ops.push(Op::SetTextCursor {
                        pos: Point {
                            x: Pt(text.x),
                            y: Pt(text.y),
                        },
                    });
                    ops.push(Op::SetFontSizeBuiltinFont {
                        size: Pt(text.size),
                        font,
                    });
                    ops.push(Op::WriteTextBuiltinFont {
                        items: Vec::new(),
                        font,
                    });
                    ops.push(show_text(&text.text));
                    ops.push(Op::EndTextSection);
                }
            }
        }

        ops
    }
}

/// Per-page decoration hook: called once for every new page, before any
/// content is placed on it, with the 1-based page number.
pub type Decorate<'a> = dyn FnMut(&mut PageCanvas, u32) + 'a;

/// Point size of the footer and page number.
pub const DECORATION_FONT_SIZE: f32 = 9.0;

/// The book decoration: page number right-aligned to the frame's right edge
/// and `footer` left-aligned to its left edge, both on the decoration
/// baseline in the bottom margin.
pub fn book_decoration(geometry: PageGeometry, footer: String) -> impl FnMut(&mut PageCanvas, u32) {
    let face = Face::regular(FontFamily::Serif);
    move |canvas: &mut PageCanvas, page_number: u32| {
        let frame = geometry.frame();
        let y = geometry.decoration_baseline;
        canvas.draw_right_string(
            frame.right(),
            y,
            face,
            DECORATION_FONT_SIZE,
            &page_number.to_string(),
        );
        if !footer.is_empty() {
            canvas.draw_string(frame.left, y, face, DECORATION_FONT_SIZE, &footer);
        }
    }
}

fn show_text(text: &str) -> Op {
    Op::Unknown {
        key: "Tj".to_owned(),
        value: vec![DictItem::String {
            data: encode_winansi(text),
            literal: false,
        }],
    }
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
        icc_profile: None,
    })
}

fn rect_polygon(rect: &FilledRect) -> Polygon {
    let corner = |x: f32, y: f32| LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    };
    let (x0, y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.x + rect.width, rect.y + rect.height);

    Polygon {
        rings: vec![PolygonRing {
            points: vec![corner(x0, y0), corner(x1, y0), corner(x1, y1), corner(x0, y1)],
        }],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoration_sits_in_bottom_margin() {
        let geometry = PageGeometry::book();
        let mut decorate = book_decoration(geometry, "footer".into());
        let mut canvas = PageCanvas::new(3, geometry.page_width, geometry.page_height);
        decorate(&mut canvas, 3);

        let texts: Vec<&PlacedText> = canvas.texts().collect();
        assert_eq!(texts.len(), 2);

        let number = texts[0];
        assert_eq!(number.text, "3");
        assert_eq!(number.y, 54.0);
        let right_edge = number.x + number.face.text_width("3", number.size);
        assert!((right_edge - geometry.frame().right()).abs() < 1e-3);

        let footer = texts[1];
        assert_eq!(footer.text, "footer");
        assert_eq!(footer.x, geometry.frame().left);
        assert!(footer.y < geometry.frame().bottom);
    }

    #[test]
    fn empty_footer_draws_only_page_number() {
        let geometry = PageGeometry::book();
        let mut decorate = book_decoration(geometry, String::new());
        let mut canvas = PageCanvas::new(1, geometry.page_width, geometry.page_height);
        decorate(&mut canvas, 1);
        assert_eq!(canvas.texts().count(), 1);
    }

    #[test]
    fn ops_follow_mark_order() {
        let mut canvas = PageCanvas::new(1, 612.0, 792.0);
        canvas.fill_rect(10.0, 10.0, 100.0, 20.0, Color::SHADE);
        canvas.draw_string(12.0, 14.0, Face::regular(FontFamily::Mono), 9.0, "x");

        let ops = canvas.to_ops();
        assert!(matches!(ops[0], Op::SaveGraphicsState));
        assert!(matches!(ops[2], Op::DrawPolygon { .. }));
        assert!(matches!(ops[3], Op::RestoreGraphicsState));
        assert!(matches!(ops.last(), Some(Op::EndTextSection)));
    }

    #[test]
    fn text_is_shown_as_winansi_bytes() {
        let mut canvas = PageCanvas::new(1, 612.0, 792.0);
        canvas.draw_string(72.0, 700.0, Face::regular(FontFamily::Serif), 11.0, "\u{2022} \u{a9}");

        let ops = canvas.to_ops();
        let shown: Vec<&DictItem> = ops
            .iter()
            .filter_map(|op| match op {
                Op::Unknown { key, value } if key == "Tj" => value.first(),
                _ => None,
            })
            .collect();
        assert_eq!(
            shown,
            vec![&DictItem::String {
                data: vec![0x95, b' ', 0xa9],
                literal: false,
            }]
        );
    }
}
