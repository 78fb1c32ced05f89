//! Suggestion popup geometry and rendering.
//!
//! The popup sits above the caret when there is room and drops below it
//! otherwise. It is clamped horizontally to the viewport.

use crate::icons::IconCache;
use crate::theme;
use quill_core::{PopupConfig, Suggestion};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

/// Rows and columns taken by the border.
const CHROME: u16 = 2;

/// Outer size for `suggestions`, before placement.
pub fn popup_size(suggestions: &[Suggestion], config: &PopupConfig) -> (u16, u16) {
    let widest = suggestions
        .iter()
        .map(|s| row_width(s) as u16)
        .max()
        .unwrap_or(0);
    let rows = (suggestions.len() as u16).max(1);
    let width = (widest + CHROME).clamp(16, config.max_width.max(16));
    let height = (rows + CHROME).min(config.max_height.max(CHROME + 1));
    (width, height)
}

fn row_width(s: &Suggestion) -> usize {
    // icon + name + chip + description, separated by single spaces
    let chip = s.kind.as_deref().map(|k| k.width() + 3).unwrap_or(0);
    let description = s.description.as_deref().map(|d| d.width() + 1).unwrap_or(0);
    3 + s.name.width() + chip + description
}

/// Place a `size` popup for a caret at `caret` inside `viewport`.
pub fn place(caret: Position, size: (u16, u16), viewport: Rect, gap: u16) -> Rect {
    let width = size.0.min(viewport.width);
    let right = viewport.x + viewport.width;
    let x = caret.x.min(right.saturating_sub(width)).max(viewport.x);

    let wanted = size.1;
    let room_above = caret.y.saturating_sub(viewport.y).saturating_sub(gap);
    if room_above >= wanted {
        return Rect::new(x, caret.y - gap - wanted, width, wanted);
    }

    let below = caret.y + 1 + gap;
    let bottom = viewport.y + viewport.height;
    let room_below = bottom.saturating_sub(below);
    if room_below >= wanted || room_below >= room_above {
        Rect::new(x, below.min(bottom), width, wanted.min(room_below))
    } else {
        Rect::new(x, caret.y - gap - room_above, width, room_above)
    }
}

/// First visible row so that `selected` stays in a window of `rows`.
pub fn scroll_start(selected: usize, count: usize, rows: usize, current: usize) -> usize {
    if rows == 0 || count <= rows {
        return 0;
    }
    let start = if selected < current {
        selected
    } else if selected >= current + rows {
        selected + 1 - rows
    } else {
        current
    };
    start.min(count - rows)
}

/// Where the popup was last drawn, for pointer hit tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopupView {
    pub area: Rect,
    pub first: usize,
    pub count: usize,
}

impl PopupView {
    /// Suggestion index under a terminal cell.
    pub fn item_at(&self, column: u16, row: u16) -> Option<usize> {
        let inner = Rect::new(
            self.area.x + 1,
            self.area.y + 1,
            self.area.width.saturating_sub(CHROME),
            self.area.height.saturating_sub(CHROME),
        );
        if !inner.contains(Position::new(column, row)) {
            return None;
        }
        let index = self.first + (row - inner.y) as usize;
        (index < self.count).then_some(index)
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.area.contains(Position::new(column, row))
    }
}

/// Draw the list into `area`.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    suggestions: &[Suggestion],
    selected: usize,
    hovered: Option<usize>,
    first: usize,
    icons: &mut IconCache,
) {
    let rows = area.height.saturating_sub(CHROME) as usize;
    let mut lines = Vec::new();
    if suggestions.is_empty() {
        lines.push(Line::from(Span::styled(
            " no matches",
            Style::default().fg(theme::DIM).italic(),
        )));
    }
    for (index, s) in suggestions.iter().enumerate().skip(first).take(rows) {
        let glyph = match s.icon.as_deref() {
            Some(icon) => icons.get(icon),
            None => "",
        };
        let mut spans = vec![
            Span::styled(format!("{glyph:>2} "), Style::default().fg(theme::ICON)),
            Span::styled(s.name.clone(), Style::default().bold()),
        ];
        if let Some(kind) = &s.kind {
            spans.push(Span::styled(
                format!(" [{kind}]"),
                Style::default().fg(theme::CHIP),
            ));
        }
        if let Some(description) = &s.description {
            spans.push(Span::styled(
                format!(" {description}"),
                Style::default().fg(theme::DIM),
            ));
        }
        let style = if index == selected {
            Style::default().bg(theme::SELECTED_BG)
        } else if Some(index) == hovered {
            Style::default().bg(theme::HOVER_BG)
        } else {
            Style::default()
        };
        lines.push(Line::from(spans).style(style));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::BORDER));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_above() {
        let viewport = Rect::new(0, 0, 80, 24);
        let rect = place(Position::new(10, 20), (30, 6), viewport, 0);
        assert_eq!(rect, Rect::new(10, 14, 30, 6));
    }

    #[test]
    fn test_falls_back_below() {
        let viewport = Rect::new(0, 0, 80, 24);
        let rect = place(Position::new(10, 2), (30, 6), viewport, 0);
        assert_eq!(rect, Rect::new(10, 3, 30, 6));
    }

    #[test]
    fn test_gap_is_respected() {
        let viewport = Rect::new(0, 0, 80, 24);
        let rect = place(Position::new(0, 20), (20, 5), viewport, 1);
        assert_eq!(rect.y + rect.height, 19);
    }

    #[test]
    fn test_clamps_to_right_edge() {
        let viewport = Rect::new(0, 0, 40, 24);
        let rect = place(Position::new(35, 20), (30, 6), viewport, 0);
        assert_eq!(rect.x, 10);
        assert!(rect.x + rect.width <= 40);
    }

    #[test]
    fn test_shrinks_when_neither_side_fits() {
        let viewport = Rect::new(0, 0, 40, 8);
        let rect = place(Position::new(0, 5), (20, 10), viewport, 0);
        assert_eq!(rect, Rect::new(0, 0, 20, 5));
        assert!(rect.y + rect.height <= 8);
    }

    #[test]
    fn test_scroll_keeps_selection_visible() {
        assert_eq!(scroll_start(0, 3, 5, 0), 0);
        assert_eq!(scroll_start(7, 20, 5, 0), 3);
        assert_eq!(scroll_start(2, 20, 5, 3), 2);
        assert_eq!(scroll_start(19, 20, 5, 0), 15);
        assert_eq!(scroll_start(4, 20, 5, 2), 2);
    }

    #[test]
    fn test_item_hit_testing() {
        let view = PopupView {
            area: Rect::new(10, 5, 20, 5),
            first: 4,
            count: 6,
        };
        assert_eq!(view.item_at(12, 6), Some(4));
        assert_eq!(view.item_at(12, 7), Some(5));
        assert_eq!(view.item_at(12, 8), None);
        assert_eq!(view.item_at(10, 6), None);
        assert!(view.contains(10, 5));
        assert!(!view.contains(9, 5));
    }

    #[test]
    fn test_popup_size_limits() {
        let config = PopupConfig::default();
        let many: Vec<Suggestion> = (0..30)
            .map(|i| Suggestion::new(format!("file{i}.rs"), format!("file:file{i}.rs")))
            .collect();
        let (w, h) = popup_size(&many, &config);
        assert_eq!(h, config.max_height);
        assert!(w <= config.max_width);

        let (_, h) = popup_size(&[], &config);
        assert_eq!(h, 3);
    }
}
