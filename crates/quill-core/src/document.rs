//! Document model: one paragraph of text runs and hard line breaks.
//!
//! Positions are character offsets into the paragraph. A hard break
//! occupies exactly one position, a text run occupies one position per
//! `char`. Marked runs are never merged with their neighbours, so every
//! reference token stays its own run.

use serde::{Deserialize, Serialize};

/// The two kinds of reference annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkKind {
    /// `@name` agent mention.
    Mention,
    /// `#file:...` / `#dir:...` reference.
    Hashtag,
}

impl MarkKind {
    /// Character that introduces this reference in canonical text.
    pub fn sigil(self) -> char {
        match self {
            MarkKind::Mention => '@',
            MarkKind::Hashtag => '#',
        }
    }
}

/// An annotation attached to a text run.
///
/// `label` is what a person reads (last path segment, username); `value`
/// is what gets written back into canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
}

impl Mark {
    pub fn new(kind: MarkKind, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn mention(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(MarkKind::Mention, label, value)
    }

    pub fn hashtag(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(MarkKind::Hashtag, label, value)
    }

    /// Build a mark from possibly-missing attributes. Missing attributes
    /// become empty strings so the document always stays renderable.
    pub fn from_attrs(kind: MarkKind, label: Option<&str>, value: Option<&str>) -> Self {
        Self::new(kind, label.unwrap_or_default(), value.unwrap_or_default())
    }

    /// `@value` or `#value`, without the separating space.
    pub fn canonical(&self) -> String {
        format!("{}{}", self.kind.sigil(), self.value)
    }
}

/// Inline content of the paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mark: Option<Mark>,
    },
    HardBreak,
}

impl Inline {
    /// Unannotated text.
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text {
            text: text.into(),
            mark: None,
        }
    }

    /// Text carrying a reference mark.
    pub fn marked(text: impl Into<String>, mark: Mark) -> Self {
        Inline::Text {
            text: text.into(),
            mark: Some(mark),
        }
    }

    /// Number of positions this node occupies.
    pub fn size(&self) -> usize {
        match self {
            Inline::Text { text, .. } => text.chars().count(),
            Inline::HardBreak => 1,
        }
    }

    pub fn mark(&self) -> Option<&Mark> {
        match self {
            Inline::Text { mark, .. } => mark.as_ref(),
            Inline::HardBreak => None,
        }
    }

    /// Cut `[from, to)` (node-relative) out of this node.
    fn cut(&self, from: usize, to: usize) -> Inline {
        match self {
            Inline::Text { text, mark } => Inline::Text {
                text: text.chars().skip(from).take(to - from).collect(),
                mark: mark.clone(),
            },
            Inline::HardBreak => Inline::HardBreak,
        }
    }
}

/// Total size of a sequence of inline nodes.
pub fn content_size(content: &[Inline]) -> usize {
    content.iter().map(Inline::size).sum()
}

/// A text run located in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSpan<'a> {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub node: &'a Inline,
}

/// The editable document. Currently always a single paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DocSnapshot", from = "DocSnapshot")]
pub struct Document {
    content: Vec<Inline>,
}

impl Document {
    /// Build a document, normalizing the content.
    pub fn new(content: Vec<Inline>) -> Self {
        Self {
            content: normalize(content),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &[Inline] {
        &self.content
    }

    pub fn size(&self) -> usize {
        content_size(&self.content)
    }

    /// True when the document holds no visible, non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.content.iter().all(|node| match node {
            Inline::Text { text, .. } => text.trim().is_empty(),
            Inline::HardBreak => true,
        })
    }

    /// Display text with hard breaks rendered as `\n`.
    pub fn text_content(&self) -> String {
        self.text_between(0, self.size())
    }

    /// Display text of `[from, to)` with hard breaks rendered as `\n`.
    pub fn text_between(&self, from: usize, to: usize) -> String {
        let mut out = String::new();
        for span in self.spans() {
            if span.end <= from || span.start >= to {
                continue;
            }
            match span.node {
                Inline::Text { text, .. } => {
                    let a = from.saturating_sub(span.start);
                    let b = to.min(span.end) - span.start;
                    out.extend(text.chars().skip(a).take(b - a));
                }
                Inline::HardBreak => out.push('\n'),
            }
        }
        out
    }

    /// Iterate over every node together with its position range.
    pub fn spans(&self) -> impl Iterator<Item = RunSpan<'_>> {
        let mut offset = 0;
        self.content.iter().enumerate().map(move |(index, node)| {
            let start = offset;
            offset += node.size();
            RunSpan {
                index,
                start,
                end: offset,
                node,
            }
        })
    }

    /// The node holding the character at `offset` (the one right after
    /// position `offset`).
    pub fn span_at(&self, offset: usize) -> Option<RunSpan<'_>> {
        self.spans()
            .find(|span| span.start <= offset && offset < span.end)
    }

    /// Mark of the character at `offset`, if any.
    pub fn mark_at(&self, offset: usize) -> Option<&Mark> {
        self.span_at(offset).and_then(|span| span.node.mark())
    }

    /// Mark of the character immediately before `pos`.
    pub fn mark_before(&self, pos: usize) -> Option<&Mark> {
        pos.checked_sub(1).and_then(|offset| self.mark_at(offset))
    }

    /// Mark of the character immediately after `pos`.
    pub fn mark_after(&self, pos: usize) -> Option<&Mark> {
        self.mark_at(pos)
    }

    /// Whether `pos` sits inside a reference token: the characters on
    /// both sides carry the same mark. Marks are non-inclusive, so the
    /// edges of a marked run are outside it.
    pub fn inside_token(&self, pos: usize) -> bool {
        match (self.mark_before(pos), self.mark_after(pos)) {
            (Some(before), Some(after)) => before == after,
            _ => false,
        }
    }

    /// Whether any character in `[from, to)` carries a mark.
    pub fn has_mark_between(&self, from: usize, to: usize) -> bool {
        self.spans().any(|span| {
            span.node.mark().is_some() && span.start < to && from < span.end
        })
    }

    /// The marked run containing the character before `pos`.
    pub fn marked_run_before(&self, pos: usize) -> Option<RunSpan<'_>> {
        let offset = pos.checked_sub(1)?;
        self.span_at(offset).filter(|span| span.node.mark().is_some())
    }

    /// The marked run containing the character after `pos`.
    pub fn marked_run_after(&self, pos: usize) -> Option<RunSpan<'_>> {
        self.span_at(pos).filter(|span| span.node.mark().is_some())
    }

    /// Start and end of the line holding `pos`, bounded by hard breaks.
    pub fn line_bounds(&self, pos: usize) -> (usize, usize) {
        let mut start = 0;
        let mut end = self.size();
        for span in self.spans() {
            if !matches!(span.node, Inline::HardBreak) {
                continue;
            }
            if span.end <= pos {
                start = span.end;
            } else if span.start >= pos {
                end = span.start;
                break;
            }
        }
        (start, end)
    }

    /// Copy of the content in `[from, to)`. Partially covered runs keep
    /// their mark.
    pub fn slice_content(&self, from: usize, to: usize) -> Vec<Inline> {
        let mut out = Vec::new();
        for span in self.spans() {
            if span.end <= from || span.start >= to {
                continue;
            }
            let a = from.max(span.start) - span.start;
            let b = to.min(span.end) - span.start;
            out.push(span.node.cut(a, b));
        }
        out
    }

    /// Sub-document covering `[from, to)`.
    pub fn slice(&self, from: usize, to: usize) -> Document {
        Document::new(self.slice_content(from, to))
    }

    /// New document with `[from, to)` replaced by `insert`.
    /// Out-of-range bounds are clamped.
    pub fn replace(&self, from: usize, to: usize, insert: Vec<Inline>) -> Document {
        let size = self.size();
        let to = to.min(size);
        let from = from.min(to);
        let mut content = self.slice_content(0, from);
        content.extend(insert);
        content.extend(self.slice_content(to, size));
        Document::new(content)
    }

    /// New document with `text` spliced into the marked run that
    /// strictly contains `pos`. Returns `None` if `pos` is not inside a
    /// token.
    pub fn insert_into_token(&self, pos: usize, text: &str) -> Option<Document> {
        if !self.inside_token(pos) {
            return None;
        }
        let span = self.span_at(pos)?;
        if span.start == pos {
            // Between two distinct runs that happen to carry equal marks.
            let prev = self.span_at(pos - 1)?;
            return self.append_to_run(prev.index, text);
        }
        let mut content = self.content.clone();
        if let Inline::Text { text: run, .. } = &mut content[span.index] {
            let byte = run
                .char_indices()
                .nth(pos - span.start)
                .map(|(i, _)| i)
                .unwrap_or(run.len());
            run.insert_str(byte, text);
        }
        Some(Document::new(content))
    }

    fn append_to_run(&self, index: usize, text: &str) -> Option<Document> {
        let mut content = self.content.clone();
        match content.get_mut(index)? {
            Inline::Text { text: run, .. } => run.push_str(text),
            Inline::HardBreak => return None,
        }
        Some(Document::new(content))
    }
}

/// Drop empty runs and merge adjacent unmarked text.
fn normalize(content: Vec<Inline>) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::with_capacity(content.len());
    for node in content {
        if let Inline::Text { text, mark } = &node {
            if text.is_empty() {
                continue;
            }
            if mark.is_none() {
                if let Some(Inline::Text {
                    text: prev,
                    mark: None,
                }) = out.last_mut()
                {
                    prev.push_str(text);
                    continue;
                }
            }
        }
        out.push(node);
    }
    out
}

// ── Snapshot shape ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocSnapshot {
    #[serde(rename = "type", default = "doc_type")]
    kind: String,
    #[serde(default)]
    content: Vec<BlockSnapshot>,
}

fn doc_type() -> String {
    "doc".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BlockSnapshot {
    Paragraph {
        #[serde(default)]
        content: Vec<Inline>,
    },
}

impl From<Document> for DocSnapshot {
    fn from(doc: Document) -> Self {
        DocSnapshot {
            kind: doc_type(),
            content: vec![BlockSnapshot::Paragraph {
                content: doc.content,
            }],
        }
    }
}

impl From<DocSnapshot> for Document {
    fn from(snapshot: DocSnapshot) -> Self {
        // Several paragraphs collapse into one, separated by hard breaks.
        let mut content = Vec::new();
        for (i, BlockSnapshot::Paragraph { content: inlines }) in
            snapshot.content.into_iter().enumerate()
        {
            if i > 0 {
                content.push(Inline::HardBreak);
            }
            content.extend(inlines);
        }
        Document::new(content)
    }
}
