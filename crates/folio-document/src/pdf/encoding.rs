// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WinAnsi text encoding for the builtin Type1 fonts.
//
// The builtin fonts are declared with /Encoding /WinAnsiEncoding, so every
// string shown with them must be one byte per glyph in that code page.

/// Byte drawn for characters the code page cannot represent.
pub const REPLACEMENT: u8 = b'?';

/// The WinAnsi code for `ch`, if it has one.
pub fn winansi_byte(ch: char) -> Option<u8> {
    let code = match ch {
        ' '..='~' | '\u{a0}'..='\u{ff}' => return Some(ch as u8),
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => return None,
    };
    Some(code)
}

/// Encode `text` for a WinAnsi font, substituting [`REPLACEMENT`].
pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| winansi_byte(ch).unwrap_or(REPLACEMENT))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(encode_winansi("Hello, world!"), b"Hello, world!".to_vec());
    }

    #[test]
    fn typographic_characters_use_single_bytes() {
        assert_eq!(encode_winansi("\u{2022} item"), b"\x95 item".to_vec());
        assert_eq!(encode_winansi("\u{a9}2026"), b"\xa92026".to_vec());
        assert_eq!(encode_winansi("caf\u{e9}"), b"caf\xe9".to_vec());
        assert_eq!(encode_winansi("a\u{2014}b"), b"a\x97b".to_vec());
    }

    #[test]
    fn unrepresentable_characters_become_question_marks() {
        assert_eq!(encode_winansi("\u{4e2d}x"), b"?x".to_vec());
        assert_eq!(encode_winansi("\u{1f600}"), b"?".to_vec());
        assert_eq!(winansi_byte('\u{81}'), None);
    }
}
