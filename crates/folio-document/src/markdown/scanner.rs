// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Block classifier — a single-pass, line-oriented state machine that turns
// markdown text into an ordered sequence of typed blocks.
//
// # States
//
//   Normal      : classify each line by prefix
//   InCodeFence : every line (blank included) is buffered verbatim
//   InBlockquote: `>` lines and lazy continuation lines are buffered
//   QuoteBreak  : a blank line followed quote content; the next non-blank
//                  line decides whether the quote continues (`>`) or closes
//
// Buffers are owned by one `BlockScanner`, so concurrent conversions never
// share state.

use tracing::{debug, instrument, warn};

/// Glyph prefixed to bullet items, inside and outside blockquotes.
pub const BULLET: &str = "\u{2022} ";

/// Code fence marker. Anything after the backticks (a language tag) is ignored.
const FENCE: &str = "```";

/// Block kind, used as the style-registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    BulletItem,
    BlockquoteGroup,
    CodeGroup,
    BlankSpacer,
}

/// One classified unit of document content.
///
/// Simple kinds carry the raw (unformatted) line text with the markdown marker
/// removed. Group kinds carry their buffered sub-lines and are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading1(String),
    Heading2(String),
    Heading3(String),
    Paragraph(String),
    BulletItem(String),
    BlockquoteGroup(Vec<String>),
    CodeGroup(Vec<String>),
    BlankSpacer,
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Heading1(_) => BlockKind::Heading1,
            Self::Heading2(_) => BlockKind::Heading2,
            Self::Heading3(_) => BlockKind::Heading3,
            Self::Paragraph(_) => BlockKind::Paragraph,
            Self::BulletItem(_) => BlockKind::BulletItem,
            Self::BlockquoteGroup(_) => BlockKind::BlockquoteGroup,
            Self::CodeGroup(_) => BlockKind::CodeGroup,
            Self::BlankSpacer => BlockKind::BlankSpacer,
        }
    }
}

/// A multi-line construct still open when input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    CodeFence,
    Blockquote,
}

/// Result of classifying one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub blocks: Vec<Block>,
    /// Set when end of input closed a construct implicitly. The buffered
    /// content is still emitted as the final block.
    pub unclosed: Option<Construct>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InCodeFence,
    InBlockquote,
    QuoteBreak { extra_blanks: usize },
}

/// Incremental block classifier. Feed lines with [`BlockScanner::push_line`],
/// then call [`BlockScanner::finish`].
#[derive(Debug)]
pub struct BlockScanner {
    state: State,
    blocks: Vec<Block>,
    code: Vec<String>,
    quote: Vec<String>,
}

impl Default for BlockScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockScanner {
    pub fn new() -> Self {
        Self {
            state: State::Normal,
            blocks: Vec::new(),
            code: Vec::new(),
            quote: Vec::new(),
        }
    }

    /// Consume one line (without its line terminator).
    pub fn push_line(&mut self, line: &str) {
        let blank = line.trim().is_empty();
        let fence = line.starts_with(FENCE);

        match self.state {
            State::Normal => self.push_normal(line),

            State::InCodeFence => {
                if fence {
                    self.flush_code();
                    self.state = State::Normal;
                } else {
                    self.code.push(line.to_owned());
                }
            }

            State::InBlockquote => {
                if fence {
                    self.flush_quote();
                    self.state = State::InCodeFence;
                } else if blank {
                    self.state = State::QuoteBreak { extra_blanks: 0 };
                } else {
                    let content = line.strip_prefix('>').unwrap_or(line);
                    self.quote.push(quote_line(content));
                }
            }

            State::QuoteBreak { extra_blanks } => {
                if blank {
                    self.state = State::QuoteBreak {
                        extra_blanks: extra_blanks + 1,
                    };
                } else if let Some(content) = line.strip_prefix('>') {
                    // Paragraph break inside the quote.
                    self.quote.push(String::new());
                    self.quote.push(quote_line(content));
                    self.state = State::InBlockquote;
                } else {
                    self.flush_quote();
                    for _ in 0..extra_blanks {
                        self.blocks.push(Block::BlankSpacer);
                    }
                    self.state = State::Normal;
                    self.push_normal(line);
                }
            }
        }
    }

    /// Flush any open construct and return the classified blocks.
    pub fn finish(mut self) -> ScanOutcome {
        let unclosed = match self.state {
            State::Normal => None,
            State::InCodeFence => {
                warn!(lines = self.code.len(), "code fence not closed before end of input");
                self.flush_code();
                Some(Construct::CodeFence)
            }
            State::InBlockquote => {
                debug!(lines = self.quote.len(), "blockquote runs to end of input");
                self.flush_quote();
                Some(Construct::Blockquote)
            }
            State::QuoteBreak { extra_blanks } => {
                self.flush_quote();
                for _ in 0..extra_blanks {
                    self.blocks.push(Block::BlankSpacer);
                }
                None
            }
        };

        ScanOutcome {
            blocks: self.blocks,
            unclosed,
        }
    }

    fn push_normal(&mut self, line: &str) {
        if line.starts_with(FENCE) {
            self.state = State::InCodeFence;
        } else if line.trim().is_empty() {
            self.blocks.push(Block::BlankSpacer);
        } else if let Some(content) = line.strip_prefix('>') {
            self.quote.push(quote_line(content));
            self.state = State::InBlockquote;
        } else {
            self.blocks.push(classify_line(line));
        }
    }

    fn flush_code(&mut self) {
        if !self.code.is_empty() {
            self.blocks
                .push(Block::CodeGroup(std::mem::take(&mut self.code)));
        }
    }

    fn flush_quote(&mut self) {
        if !self.quote.is_empty() {
            self.blocks
                .push(Block::BlockquoteGroup(std::mem::take(&mut self.quote)));
        }
    }
}

/// Classify a whole document.
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn classify(text: &str) -> ScanOutcome {
    let mut scanner = BlockScanner::new();
    for line in text.lines() {
        scanner.push_line(line);
    }
    let outcome = scanner.finish();
    debug!(blocks = outcome.blocks.len(), "Classification complete");
    outcome
}

/// Classify a single non-blank, non-fence, non-quote line by its prefix.
fn classify_line(line: &str) -> Block {
    if let Some(text) = line
        .strip_prefix("#### ")
        .or_else(|| line.strip_prefix("### "))
    {
        Block::Heading3(text.trim().to_owned())
    } else if let Some(text) = line.strip_prefix("## ") {
        Block::Heading2(text.trim().to_owned())
    } else if let Some(text) = line.strip_prefix("# ") {
        Block::Heading1(text.trim().to_owned())
    } else if let Some(text) = line.strip_prefix("- ") {
        Block::BulletItem(format!("{BULLET}{}", text.trim()))
    } else {
        Block::Paragraph(line.trim().to_owned())
    }
}

/// Normalise one line of quote content: trim, and turn a leading `-` into a
/// bullet.
fn quote_line(content: &str) -> String {
    let content = content.trim();
    match content.strip_prefix('-') {
        Some(item) => format!("{BULLET}{}", item.trim()),
        None => content.to_owned(),
    }
}
