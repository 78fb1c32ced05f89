//! Lays the document out into terminal rows.
//!
//! Reference runs get their own styles, hard breaks start a new row and
//! long rows wrap at the available width. The layout remembers which
//! document offset each cell shows so pointer presses can be mapped back.

use crate::theme;
use quill_core::{Document, Inline, MarkKind, Selection};
use ratatui::prelude::*;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    col: u16,
    width: u16,
    offset: usize,
}

#[derive(Debug, Default)]
struct Row {
    pieces: Vec<(String, Style)>,
    cells: Vec<Cell>,
    end: usize,
    width: u16,
}

impl Row {
    fn push(&mut self, c: char, style: Style, offset: usize, width: u16) {
        self.cells.push(Cell {
            col: self.width,
            width,
            offset,
        });
        self.width += width;
        match self.pieces.last_mut() {
            Some((text, last)) if *last == style => text.push(c),
            _ => self.pieces.push((c.to_string(), style)),
        }
    }
}

/// Rendered rows plus the caret position, in content coordinates.
#[derive(Debug)]
pub struct ComposerLayout {
    rows: Vec<Row>,
    caret: (u16, u16),
}

impl ComposerLayout {
    pub fn new(doc: &Document, selection: Selection, width: u16) -> Self {
        let width = width.max(1);
        let cursor = selection.head;
        let mut rows = vec![Row::default()];
        let mut caret = None;

        for span in doc.spans() {
            match span.node {
                Inline::HardBreak => {
                    if span.start == cursor {
                        caret.get_or_insert(Self::position(&rows));
                    }
                    if let Some(row) = rows.last_mut() {
                        row.end = span.start;
                    }
                    rows.push(Row::default());
                }
                Inline::Text { text, mark } => {
                    let base = match mark.as_ref().map(|m| m.kind) {
                        Some(MarkKind::Mention) => Style::default().fg(theme::MENTION).bold(),
                        Some(MarkKind::Hashtag) => Style::default().fg(theme::HASHTAG).underlined(),
                        None => Style::default(),
                    };
                    for (i, c) in text.chars().enumerate() {
                        let offset = span.start + i;
                        let w = c.width().unwrap_or(0) as u16;
                        let full = rows.last().is_some_and(|r| r.width > 0 && r.width + w > width);
                        if full {
                            if let Some(row) = rows.last_mut() {
                                row.end = offset;
                            }
                            rows.push(Row::default());
                        }
                        if offset == cursor {
                            caret.get_or_insert(Self::position(&rows));
                        }
                        let style = if offset >= selection.from() && offset < selection.to() {
                            base.reversed()
                        } else {
                            base
                        };
                        if let Some(row) = rows.last_mut() {
                            row.push(c, style, offset, w);
                        }
                    }
                }
            }
        }
        if let Some(row) = rows.last_mut() {
            row.end = doc.size();
        }
        let caret = caret.unwrap_or_else(|| Self::position(&rows));
        Self { rows, caret }
    }

    fn position(rows: &[Row]) -> (u16, u16) {
        let row = rows.len().saturating_sub(1) as u16;
        let col = rows.last().map(|r| r.width).unwrap_or(0);
        (col, row)
    }

    /// Caret as (column, row).
    pub fn caret(&self) -> (u16, u16) {
        self.caret
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        self.rows
            .iter()
            .map(|row| {
                Line::from(
                    row.pieces
                        .iter()
                        .map(|(text, style)| Span::styled(text.clone(), *style))
                        .collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    /// Document offset shown at (column, row). Past the end of a row maps
    /// to the row end.
    pub fn offset_at(&self, col: u16, row: u16) -> usize {
        let Some(row) = self.rows.get(row as usize).or(self.rows.last()) else {
            return 0;
        };
        row.cells
            .iter()
            .find(|cell| col < cell.col + cell.width.max(1))
            .map(|cell| cell.offset)
            .unwrap_or(row.end)
    }
}

/// First row to show so the caret row stays inside `visible` rows.
pub fn first_visible_row(caret_row: u16, visible: u16) -> u16 {
    caret_row.saturating_sub(visible.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::parse;

    fn at_end(doc: &Document) -> Selection {
        Selection::cursor(doc.size())
    }

    #[test]
    fn test_mention_gets_own_span() {
        let doc = parse("hi @alice now");
        let layout = ComposerLayout::new(&doc, at_end(&doc), 80);
        let lines = layout.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[1].content, "@alice");
        assert_eq!(lines[0].spans[1].style.fg, Some(theme::MENTION));
        assert_eq!(layout.caret(), (13, 0));
    }

    #[test]
    fn test_hard_breaks_start_rows() {
        let doc = parse("ab\ncd");
        let layout = ComposerLayout::new(&doc, at_end(&doc), 80);
        assert_eq!(layout.row_count(), 2);
        assert_eq!(layout.caret(), (2, 1));
        assert_eq!(layout.offset_at(0, 1), 3);
        assert_eq!(layout.offset_at(9, 0), 2);
        assert_eq!(layout.offset_at(9, 5), 5);
    }

    #[test]
    fn test_caret_before_break() {
        let doc = parse("ab\ncd");
        let layout = ComposerLayout::new(&doc, Selection::cursor(2), 80);
        assert_eq!(layout.caret(), (2, 0));
    }

    #[test]
    fn test_long_rows_wrap() {
        let doc = parse("abcdef");
        let layout = ComposerLayout::new(&doc, at_end(&doc), 4);
        assert_eq!(layout.row_count(), 2);
        assert_eq!(layout.caret(), (2, 1));
        assert_eq!(layout.offset_at(1, 1), 5);
    }

    #[test]
    fn test_selection_is_reversed() {
        let doc = parse("abc");
        let layout = ComposerLayout::new(&doc, Selection::new(0, 2), 80);
        let lines = layout.lines();
        assert_eq!(lines[0].spans[0].content, "ab");
        assert!(lines[0].spans[0]
            .style
            .add_modifier
            .contains(Modifier::REVERSED));
    }

    #[test]
    fn test_first_visible_row() {
        assert_eq!(first_visible_row(0, 4), 0);
        assert_eq!(first_visible_row(6, 4), 3);
    }
}
