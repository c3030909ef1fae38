// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font faces and advance widths for the builtin serif/monospace pair.
//
// Widths are in thousandths of an em, taken from the Adobe core-font metrics
// for Times-Roman (printable ASCII). Bold faces are approximated by widening
// the roman advance by 5%; italic faces reuse the roman advance. Courier is
// fixed-pitch at 600 for every glyph. Characters outside WinAnsi are measured
// as the replacement glyph that is actually drawn.

use printpdf::BuiltinFont;

use super::encoding::{REPLACEMENT, winansi_byte};
use crate::style::FontFamily;

/// Advance for characters outside the table.
const FALLBACK_WIDTH: u16 = 500;

/// Courier advance.
const MONO_WIDTH: u16 = 600;

/// Bold widening factor relative to the roman advance.
const BOLD_FACTOR: f32 = 1.05;

/// Times-Roman advances for U+0020..=U+007E.
#[rustfmt::skip]
const TIMES_ASCII: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, // ' '..'/'
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444, // '0'..'?'
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, // '@'..'O'
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500, // 'P'..'_'
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, // '`'..'o'
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,      // 'p'..'~'
];

/// One concrete face: family plus weight and slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

impl Face {
    pub const fn regular(family: FontFamily) -> Self {
        Self {
            family,
            bold: false,
            italic: false,
        }
    }

    /// The printpdf builtin font for this face.
    pub fn builtin(&self) -> BuiltinFont {
        match (self.family, self.bold, self.italic) {
            (FontFamily::Serif, false, false) => BuiltinFont::TimesRoman,
            (FontFamily::Serif, true, false) => BuiltinFont::TimesBold,
            (FontFamily::Serif, false, true) => BuiltinFont::TimesItalic,
            (FontFamily::Serif, true, true) => BuiltinFont::TimesBoldItalic,
            (FontFamily::Mono, false, false) => BuiltinFont::Courier,
            (FontFamily::Mono, true, false) => BuiltinFont::CourierBold,
            (FontFamily::Mono, false, true) => BuiltinFont::CourierOblique,
            (FontFamily::Mono, true, true) => BuiltinFont::CourierBoldOblique,
        }
    }

    /// Advance of one character at `size` points.
    pub fn char_width(&self, ch: char, size: f32) -> f32 {
        let units = match self.family {
            FontFamily::Mono => MONO_WIDTH,
            FontFamily::Serif => serif_units(ch),
        };
        let mut width = f32::from(units) * size / 1000.0;
        if self.bold && self.family == FontFamily::Serif {
            width *= BOLD_FACTOR;
        }
        width
    }

    /// Advance of a string at `size` points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, size)).sum()
    }
}

fn serif_units(ch: char) -> u16 {
    match ch {
        ' '..='~' => TIMES_ASCII[ch as usize - 0x20],
        '\u{2022}' => 350,
        '\u{a9}' => 760,
        '\u{2013}' => 500,
        '\u{2014}' => 1000,
        _ if winansi_byte(ch).is_none() => serif_units(char::from(REPLACEMENT)),
        _ => FALLBACK_WIDTH,
    }
}
