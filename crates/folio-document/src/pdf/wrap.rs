// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line breaking — greedy word wrap of styled runs at a measured width.
//
// Words longer than the column are force-broken at character boundaries, and
// every output line carries at least one character, so wrapping always
// terminates even when the column is narrower than a single glyph.

use super::markup::Run;
use super::metrics::Face;
use crate::style::FontFamily;

/// A same-face fragment of a word.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub text: String,
    pub face: Face,
    pub width: f32,
}

/// A whitespace-delimited word, possibly spanning several faces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Word {
    pub pieces: Vec<Piece>,
    pub width: f32,
}

impl Word {
    fn push_char(&mut self, ch: char, face: Face, size: f32) {
        let advance = face.char_width(ch, size);
        match self.pieces.last_mut() {
            Some(piece) if piece.face == face => {
                piece.text.push(ch);
                piece.width += advance;
            }
            _ => self.pieces.push(Piece {
                text: ch.to_string(),
                face,
                width: advance,
            }),
        }
        self.width += advance;
    }

    fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    fn chars(&self) -> impl Iterator<Item = (char, Face)> + '_ {
        self.pieces
            .iter()
            .flat_map(|piece| piece.text.chars().map(move |ch| (ch, piece.face)))
    }

    #[cfg(test)]
    pub fn text(&self) -> String {
        self.pieces.iter().map(|piece| piece.text.as_str()).collect()
    }
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WrappedLine {
    pub words: Vec<Word>,
    /// Width with single (unstretched) spaces between words.
    pub natural_width: f32,
    /// Last line of its source line: never stretched when justifying.
    pub last: bool,
}

#[cfg(test)]
impl WrappedLine {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(Word::text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Width of the inter-word space for a family at `size`.
pub fn space_width(family: FontFamily, size: f32) -> f32 {
    Face::regular(family).char_width(' ', size)
}

/// Wrap one source line of runs into lines no wider than `max_width`.
///
/// With `preserve_whitespace` the whole line is one literal word (spaces
/// included) broken only by character. An empty source line still yields one
/// empty output line.
pub fn wrap_runs(
    runs: &[Run],
    family: FontFamily,
    size: f32,
    max_width: f32,
    preserve_whitespace: bool,
) -> Vec<WrappedLine> {
    let words = if preserve_whitespace {
        literal_word(runs, family, size)
    } else {
        split_words(runs, family, size)
    };

    let space = space_width(family, size);
    let mut lines: Vec<WrappedLine> = Vec::new();
    let mut current = WrappedLine::default();

    for word in words {
        if word.width > max_width {
            if !current.words.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut chunks = hard_break(&word, size, max_width);
            let tail = chunks.pop();
            for chunk in chunks {
                lines.push(WrappedLine {
                    natural_width: chunk.width,
                    words: vec![chunk],
                    last: false,
                });
            }
            if let Some(tail) = tail {
                current.natural_width = tail.width;
                current.words.push(tail);
            }
            continue;
        }

        if current.words.is_empty() {
            current.natural_width = word.width;
            current.words.push(word);
        } else if current.natural_width + space + word.width <= max_width {
            current.natural_width += space + word.width;
            current.words.push(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.natural_width = word.width;
            current.words.push(word);
        }
    }

    current.last = true;
    lines.push(current);
    lines
}

fn split_words(runs: &[Run], family: FontFamily, size: f32) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut word = Word::default();

    for run in runs {
        let face = Face {
            family,
            bold: run.bold,
            italic: run.italic,
        };
        for ch in run.text.chars() {
            if ch.is_whitespace() {
                if !word.is_empty() {
                    words.push(std::mem::take(&mut word));
                }
            } else {
                word.push_char(ch, face, size);
            }
        }
    }

    if !word.is_empty() {
        words.push(word);
    }
    words
}

fn literal_word(runs: &[Run], family: FontFamily, size: f32) -> Vec<Word> {
    let mut word = Word::default();
    for run in runs {
        let face = Face {
            family,
            bold: run.bold,
            italic: run.italic,
        };
        for ch in run.text.chars() {
            // Tabs have no glyph in the builtin fonts.
            if ch == '\t' {
                for _ in 0..4 {
                    word.push_char(' ', face, size);
                }
            } else {
                word.push_char(ch, face, size);
            }
        }
    }

    if word.is_empty() { Vec::new() } else { vec![word] }
}

/// Break an over-wide word into chunks no wider than `max_width`, each holding
/// at least one character.
fn hard_break(word: &Word, size: f32, max_width: f32) -> Vec<Word> {
    let mut chunks: Vec<Word> = Vec::new();
    let mut chunk = Word::default();

    for (ch, face) in word.chars() {
        let advance = face.char_width(ch, size);
        if !chunk.is_empty() && chunk.width + advance > max_width {
            chunks.push(std::mem::take(&mut chunk));
        }
        chunk.push_char(ch, face, size);
    }

    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}
