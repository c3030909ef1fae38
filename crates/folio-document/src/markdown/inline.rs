// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inline formatter — escape reserved characters and turn `*` / `**` spans into
// `<i>` / `<b>` markup.

/// Reserved characters and their replacements, in application order.
///
/// `&` must come first so the entities introduced by later replacements are
/// not escaped a second time.
const ESCAPES: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#39;"),
];

/// Escape the five reserved markup characters.
pub fn escape(text: &str) -> String {
    let mut out = text.to_owned();
    for (ch, entity) in ESCAPES {
        if out.contains(ch) {
            out = out.replace(ch, entity);
        }
    }
    out
}

/// Format one raw line into markup text.
///
/// Emphasis is resolved by split parity, not by pairing delimiters: the text
/// is split on `**` and every odd segment is wrapped in `<b>`, then the result
/// is split on `*` and every odd segment is wrapped in `<i>`. Delimiters are
/// always consumed; a dangling one simply shifts which segments are wrapped.
pub fn format_inline(raw: &str) -> String {
    let escaped = escape(raw);
    let bold = wrap_odd_segments(&escaped, "**", "<b>", "</b>");
    wrap_odd_segments(&bold, "*", "<i>", "</i>")
}

fn wrap_odd_segments(text: &str, delimiter: &str, open: &str, close: &str) -> String {
    if !text.contains(delimiter) {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len() + 16);
    for (index, segment) in text.split(delimiter).enumerate() {
        if index % 2 == 1 {
            out.push_str(open);
            out.push_str(segment);
            out.push_str(close);
        } else {
            out.push_str(segment);
        }
    }
    out
}
