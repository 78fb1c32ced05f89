//! Plain text <-> document conversion.
//!
//! Canonical text writes references as `@value` / `#value`. Parsing
//! turns that syntax back into marked runs, showing `#file:` and `#dir:`
//! references by their last path segment only.

use crate::document::{Document, Inline, Mark};
use once_cell::sync::Lazy;
use regex::Regex;

/// File/dir references first, then mentions.
pub(crate) static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(#(?:file|dir):(\S+))|(@([A-Za-z0-9_-]+))").expect("reference pattern is valid")
});

/// Parse canonical text into a document.
pub fn parse(text: &str) -> Document {
    Document::new(parse_inlines(text))
}

/// Parse canonical text into inline content. `\n` (and `\r\n`) become
/// hard breaks. Used for initial load and for pasted text.
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut nodes = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            nodes.push(Inline::HardBreak);
        }
        parse_line(line.strip_suffix('\r').unwrap_or(line), &mut nodes);
    }
    nodes
}

fn parse_line(line: &str, nodes: &mut Vec<Inline>) {
    let mut last = 0;
    for caps in REFERENCE_PATTERN.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            nodes.push(Inline::text(&line[last..whole.start()]));
        }

        if let (Some(reference), Some(path)) = (caps.get(1), caps.get(2)) {
            let label = display_name(path.as_str());
            let value = &reference.as_str()[1..];
            nodes.push(Inline::marked(
                format!("#{label}"),
                Mark::hashtag(label, value),
            ));
        } else if let Some(name) = caps.get(4) {
            let name = name.as_str();
            nodes.push(Inline::marked(format!("@{name}"), Mark::mention(name, name)));
        }
        last = whole.end();
    }
    if last < line.len() {
        nodes.push(Inline::text(&line[last..]));
    }
}

/// Last non-empty `/` segment of a path.
pub fn display_name(path: &str) -> &str {
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
}

/// Serialize a document to canonical text.
///
/// Marked runs emit `@value` / `#value` followed by a space, unless the
/// following text already starts with whitespace. Hard breaks emit `\n`.
pub fn serialize(doc: &Document) -> String {
    serialize_content(doc.content())
}

pub fn serialize_content(content: &[Inline]) -> String {
    let mut out = String::new();
    for (i, node) in content.iter().enumerate() {
        match node {
            Inline::HardBreak => out.push('\n'),
            Inline::Text { text, mark: None } => out.push_str(text),
            Inline::Text {
                mark: Some(mark), ..
            } => {
                out.push_str(&mark.canonical());
                if !starts_with_whitespace(content.get(i + 1)) {
                    out.push(' ');
                }
            }
        }
    }
    out
}

fn starts_with_whitespace(next: Option<&Inline>) -> bool {
    match next {
        Some(Inline::Text { text, mark: None }) => {
            text.chars().next().is_some_and(char::is_whitespace)
        }
        _ => false,
    }
}

/// `serialize(parse(text))`.
pub fn normalize(text: &str) -> String {
    serialize(&parse(text))
}
