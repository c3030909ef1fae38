// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Block formatters — turn buffered blockquote and code lines into the lines
// the page composer draws.

use super::inline::format_inline;
use super::scanner::BULLET;

/// Separator that splits a code line into a header and bullet items.
const CODE_ITEM_SEPARATOR: &str = " - ";

/// Format blockquote content into markup lines.
///
/// Bullet runs are kept together and set apart from surrounding text by one
/// empty line; explicit empty lines are kept (collapsed to one). Every
/// non-empty line goes through the inline formatter.
pub fn format_blockquote(lines: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 4);
    let mut previous_was_bullet: Option<bool> = None;

    for line in lines {
        if line.is_empty() {
            push_separator(&mut out);
            previous_was_bullet = None;
            continue;
        }

        let is_bullet = line.starts_with(BULLET.trim_end());
        if previous_was_bullet.is_some_and(|prev| prev != is_bullet) {
            push_separator(&mut out);
        }
        out.push(format_inline(line));
        previous_was_bullet = Some(is_bullet);
    }

    if out.last().is_some_and(|last| last.is_empty()) {
        out.pop();
    }
    out
}

/// Format code content into literal lines.
///
/// A line containing ` - ` becomes a `header:` line followed by one `- item`
/// line per remaining segment, with an empty line before each header that is
/// not the first output. Other lines are trimmed and passed through. No inline
/// formatting is applied.
pub fn format_code_block(lines: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    for line in lines {
        if line.trim() == "```" {
            continue;
        }

        if line.contains(CODE_ITEM_SEPARATOR) {
            let mut parts = line.split(CODE_ITEM_SEPARATOR);
            let header = parts.next().unwrap_or_default().trim();
            if !header.is_empty() {
                if !out.is_empty() {
                    out.push(String::new());
                }
                out.push(format!("{header}:"));
            }
            for item in parts.map(str::trim).filter(|item| !item.is_empty()) {
                out.push(format!("- {item}"));
            }
        } else {
            out.push(line.trim().to_owned());
        }
    }

    out
}

fn push_separator(out: &mut Vec<String>) {
    if out.last().is_some_and(|last| !last.is_empty()) {
        out.push(String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bullet_runs_are_separated_from_text() {
        let input = lines(&["intro", "\u{2022} a", "\u{2022} b", "after"]);
        assert_eq!(
            format_blockquote(&input),
            lines(&["intro", "", "\u{2022} a", "\u{2022} b", "", "after"])
        );
    }

    #[test]
    fn explicit_breaks_are_kept_once() {
        let input = lines(&["a", "", "b"]);
        assert_eq!(format_blockquote(&input), lines(&["a", "", "b"]));

        let input = lines(&["\u{2022} a", "", "text", ""]);
        assert_eq!(format_blockquote(&input), lines(&["\u{2022} a", "", "text"]));
    }

    #[test]
    fn quote_lines_get_inline_formatting() {
        let input = lines(&["**key** point", "it's"]);
        assert_eq!(
            format_blockquote(&input),
            lines(&["<b>key</b> point", "it&#39;s"])
        );
    }

    #[test]
    fn code_lines_split_into_header_and_items() {
        let input = lines(&["Tools - hammer - saw", "Parts - nail"]);
        assert_eq!(
            format_code_block(&input),
            lines(&["Tools:", "- hammer", "- saw", "", "Parts:", "- nail"])
        );
    }

    #[test]
    fn code_lines_without_separator_are_literal() {
        let input = lines(&["  let a = *b;  ", "", "x-y"]);
        assert_eq!(format_code_block(&input), lines(&["let a = *b;", "", "x-y"]));
    }

    #[test]
    fn code_item_without_header() {
        let input = lines(&[" - only item"]);
        assert_eq!(format_code_block(&input), lines(&["- only item"]));
    }
}
