// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Markdown module — block classification, inline formatting, and the
// blockquote/code formatters.

pub mod format;
pub mod inline;
pub mod scanner;

pub use format::{format_blockquote, format_code_block};
pub use inline::{escape, format_inline};
pub use scanner::{Block, BlockKind, BlockScanner, Construct, ScanOutcome, classify};
