// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Markup tokenizer — split inline-formatter output into styled text runs.
//
// Recognised tags are `<b>`, `</b>`, `<i>`, `</i>`; each toggles its own flag,
// so `<b><i>x</b></i>` still yields a bold-italic `x`. The five entities the
// inline formatter produces are decoded back to literal characters. Anything
// else (an unknown `&name;`, a stray `<`) is kept as literal text.

/// A span of text drawn in one face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Run {
    /// An unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }
}

const TAGS: [(&str, Tag); 4] = [
    ("<b>", Tag::Bold(true)),
    ("</b>", Tag::Bold(false)),
    ("<i>", Tag::Italic(true)),
    ("</i>", Tag::Italic(false)),
];

const ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
];

#[derive(Debug, Clone, Copy)]
enum Tag {
    Bold(bool),
    Italic(bool),
}

/// Tokenize markup into runs. Adjacent text with the same style is merged and
/// empty runs are dropped.
pub fn parse_markup(markup: &str) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    let mut current = String::new();
    let (mut bold, mut italic) = (false, false);
    let mut rest = markup;

    while let Some(ch) = rest.chars().next() {
        let tag = if ch == '<' { match_prefix(rest, &TAGS) } else { None };
        if let Some((tag, len)) = tag {
            push_run(&mut runs, &mut current, bold, italic);
            match tag {
                Tag::Bold(on) => bold = on,
                Tag::Italic(on) => italic = on,
            }
            rest = &rest[len..];
            continue;
        }

        let entity = if ch == '&' { match_prefix(rest, &ENTITIES) } else { None };
        if let Some((decoded, len)) = entity {
            current.push(decoded);
            rest = &rest[len..];
            continue;
        }

        current.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    push_run(&mut runs, &mut current, bold, italic);
    runs
}

/// Concatenated text of a run sequence.
#[cfg(test)]
pub fn plain_text(runs: &[Run]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

fn match_prefix<T: Copy>(text: &str, table: &[(&str, T)]) -> Option<(T, usize)> {
    table
        .iter()
        .find(|(token, _)| text.starts_with(token))
        .map(|(token, value)| (*value, token.len()))
}

fn push_run(runs: &mut Vec<Run>, current: &mut String, bold: bool, italic: bool) {
    if current.is_empty() {
        return;
    }
    let text = std::mem::take(current);
    match runs.last_mut() {
        Some(last) if last.bold == bold && last.italic == italic => last.text.push_str(&text),
        _ => runs.push(Run { text, bold, italic }),
    }
}
