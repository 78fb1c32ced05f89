//! TUI application state and rendering.
//!
//! Layout: header | transcript | composer | footer, with the suggestion
//! popup drawn over everything next to the caret.

use crate::composer::{first_visible_row, ComposerLayout};
use crate::event::{to_input_key, MouseAction};
use crate::icons::IconCache;
use crate::popup::{self, PopupView};
use crate::theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use quill_core::{references, ChatInput, Config, InputEvent, PopupConfig, Reference};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

const MAX_COMPOSER_ROWS: u16 = 6;

#[derive(Debug, Clone)]
pub struct ChatLine {
    pub role: String,
    pub content: String,
    pub style: ChatStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStyle {
    User,
    System,
    Error,
}

pub struct App {
    pub running: bool,
    pub input: ChatInput,
    pub chat_lines: Vec<ChatLine>,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub status: String,
    pub workspace: String,
    /// Text taken by the last copy or cut.
    pub clipboard: String,
    icons: IconCache,
    popup_config: PopupConfig,
    popup_view: Option<PopupView>,
    popup_first: usize,
    composer_area: Rect,
    composer_first_row: u16,
    layout: Option<ComposerLayout>,
}

impl App {
    pub fn new(config: &Config, workspace: &str) -> Self {
        Self {
            running: true,
            input: ChatInput::new(config),
            chat_lines: Vec::new(),
            scroll_offset: 0,
            auto_scroll: true,
            status: "Ready".to_string(),
            workspace: workspace.to_string(),
            clipboard: String::new(),
            icons: IconCache::new(config.icon_dir.clone()),
            popup_config: config.popup,
            popup_view: None,
            popup_first: 0,
            composer_area: Rect::default(),
            composer_first_row: 0,
            layout: None,
        }
    }

    // ── State mutators ─────────────────────────────────────────────────

    pub fn push_chat(&mut self, role: &str, content: &str, style: ChatStyle) {
        self.chat_lines.push(ChatLine {
            role: role.to_string(),
            content: content.to_string(),
            style,
        });
        self.auto_scroll = true;
    }

    /// Handle a key press. Editor keys go to the engine; chords are
    /// clipboard and selection shortcuts.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        if shift && matches!(key.code, KeyCode::Left | KeyCode::Right) {
            let selection = self.input.selection();
            let head = if key.code == KeyCode::Left {
                selection.head.saturating_sub(1)
            } else {
                selection.head + 1
            };
            self.input.select(selection.anchor, head);
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') => return self.input.select_all(),
                KeyCode::Char('x') => {
                    if let Some(text) = self.input.cut() {
                        self.clipboard = text;
                    }
                    return;
                }
                KeyCode::Char('y') => {
                    let text = self.clipboard.clone();
                    return self.input.paste(&text);
                }
                _ => {}
            }
        }
        if key.modifiers.contains(KeyModifiers::ALT) && key.code == KeyCode::Char('w') {
            self.clipboard = self.input.copy();
            self.status = "Copied".to_string();
            return;
        }
        if let Some(mapped) = to_input_key(&key) {
            self.input.handle_key(mapped);
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        self.input.paste(&text.replace("\r\n", "\n"));
    }

    /// Pointer press or move at a terminal cell.
    pub fn handle_mouse(&mut self, action: MouseAction, column: u16, row: u16) {
        let item = self.popup_view.and_then(|view| view.item_at(column, row));
        match action {
            MouseAction::Moved => self.input.hover(item),
            MouseAction::Down => {
                if let Some(index) = item {
                    self.input.accept(index);
                    return;
                }
                let on_popup = self.popup_view.is_some_and(|v| v.contains(column, row));
                if self.input.session().is_active() && !on_popup {
                    // The backdrop swallows the press.
                    self.input.dismiss();
                    return;
                }
                if let Some(offset) = self.composer_offset(column, row) {
                    self.input.click(offset);
                }
            }
        }
    }

    fn composer_offset(&self, column: u16, row: u16) -> Option<usize> {
        let inner = Block::default().borders(Borders::ALL).inner(self.composer_area);
        if !inner.contains(Position::new(column, row)) {
            return None;
        }
        let layout = self.layout.as_ref()?;
        let col = column - inner.x;
        let line = row - inner.y + self.composer_first_row;
        Some(layout.offset_at(col, line))
    }

    pub fn focus_lost(&mut self) {
        self.input.blur();
    }

    /// Apply the engine's pending notifications. Returns submitted values.
    pub fn process_events(&mut self) -> Vec<String> {
        let mut sent = Vec::new();
        for event in self.input.drain_events() {
            match event {
                InputEvent::Send { value } => {
                    let trimmed = value.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if self.handle_slash_command(trimmed) {
                        self.input.clear();
                        continue;
                    }
                    self.push_chat("you", trimmed, ChatStyle::User);
                    let refs = references(&value);
                    if !refs.is_empty() {
                        self.push_chat("refs", &describe(&refs), ChatStyle::System);
                    }
                    self.input.clear();
                    self.status = "Sent".to_string();
                    sent.push(value);
                }
                InputEvent::HashtagClicked { value } => {
                    self.status = format!("#{value}");
                }
                InputEvent::Blur { value, .. } => {
                    tracing::debug!(len = value.len(), "composer blurred");
                }
                InputEvent::ValueChanged { .. } => {}
            }
        }
        sent
    }

    pub fn handle_slash_command(&mut self, cmd: &str) -> bool {
        match cmd {
            "/help" => {
                self.push_chat(
                    "system",
                    "@ mention an agent, # reference a file or directory\n\
                     enter: send or accept   shift+enter / ctrl+j: new line\n\
                     ctrl+a select all   ctrl+x cut   alt+w copy   ctrl+y paste\n\
                     /clear: clear transcript   /quit: exit",
                    ChatStyle::System,
                );
                true
            }
            "/clear" => {
                self.chat_lines.clear();
                true
            }
            "/quit" | "/exit" => {
                self.running = false;
                true
            }
            _ if cmd.starts_with('/') && !cmd.contains(' ') => {
                self.push_chat(
                    "system",
                    &format!("Unknown: {cmd}. Try /help"),
                    ChatStyle::Error,
                );
                true
            }
            _ => false,
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let composer_width = area.width.saturating_sub(2);
        let layout = ComposerLayout::new(
            self.input.document(),
            self.input.selection(),
            composer_width,
        );
        let visible_rows = (layout.row_count() as u16).clamp(1, MAX_COMPOSER_ROWS);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(visible_rows + 2),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.render_messages(frame, chunks[1]);
        let caret = self.render_composer(frame, chunks[2], layout, visible_rows);
        self.render_footer(frame, chunks[3]);
        self.render_popup(frame, area, caret);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(" ● ", Style::default().fg(theme::ACCENT)),
            Span::styled("quill", Style::default().fg(theme::ACCENT).bold()),
            Span::styled(format!("  {}", self.status), Style::default().fg(theme::BAR_FG)),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(theme::BAR_BG)),
            area,
        );
    }

    fn render_messages(&mut self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        for msg in &self.chat_lines {
            let (role_style, content_style) = match msg.style {
                ChatStyle::User => (Style::default().fg(theme::USER).bold(), Style::default()),
                ChatStyle::System => (
                    Style::default().fg(theme::SYSTEM).bold(),
                    Style::default().fg(theme::SYSTEM),
                ),
                ChatStyle::Error => (
                    Style::default().fg(theme::ERROR).bold(),
                    Style::default().fg(theme::ERROR),
                ),
            };
            let indent = " ".repeat(msg.role.len() + 2);
            for (i, content_line) in msg.content.lines().enumerate() {
                let prefix = if i == 0 {
                    Span::styled(format!("{}  ", msg.role), role_style)
                } else {
                    Span::raw(indent.clone())
                };
                lines.push(Line::from(vec![
                    Span::raw(" "),
                    prefix,
                    Span::styled(content_line.to_string(), content_style),
                ]));
            }
            lines.push(Line::from(""));
        }

        let content_height = lines.len() as u16;
        if self.auto_scroll && content_height > area.height {
            self.scroll_offset = content_height.saturating_sub(area.height);
        }
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset, 0));
        frame.render_widget(paragraph, area);
    }

    /// Draw the composer and return the caret's screen position.
    fn render_composer(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        layout: ComposerLayout,
        visible_rows: u16,
    ) -> Position {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ACCENT));
        let inner = block.inner(area);

        let (caret_col, caret_row) = layout.caret();
        let first_row = first_visible_row(caret_row, visible_rows);
        let body = if self.input.shows_placeholder() {
            Paragraph::new(Line::from(Span::styled(
                self.input.placeholder().to_string(),
                Style::default().fg(theme::DIM).italic(),
            )))
        } else {
            Paragraph::new(layout.lines()).scroll((first_row, 0))
        };
        frame.render_widget(body.block(block), area);

        let caret = Position::new(
            (inner.x + caret_col).min(inner.right().saturating_sub(1)),
            inner.y + caret_row - first_row,
        );
        frame.set_cursor_position(caret);

        self.composer_area = area;
        self.composer_first_row = first_row;
        self.layout = Some(layout);
        caret
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let session = self.input.session();
        let mode = match session.trigger() {
            Some(trigger) => format!(" {trigger}{} ", session.query()),
            None => " COMPOSE ".to_string(),
        };
        let line = Line::from(vec![
            Span::styled(
                mode,
                Style::default().fg(Color::Black).bg(theme::ACCENT).bold(),
            ),
            Span::styled(
                format!("  {}", self.workspace),
                Style::default().fg(theme::BAR_FG),
            ),
            Span::styled("  │  ", Style::default().fg(theme::BORDER)),
            Span::styled(
                format!("{} chars", self.input.value().chars().count()),
                Style::default().fg(theme::DIM),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(theme::BAR_BG)),
            area,
        );
    }

    fn render_popup(&mut self, frame: &mut Frame, viewport: Rect, caret: Position) {
        let Some(active) = self.input.session().active() else {
            self.popup_view = None;
            self.popup_first = 0;
            return;
        };
        let suggestions = active.suggestions.clone();
        let selected = active.selected_index;

        let size = popup::popup_size(&suggestions, &self.popup_config);
        let area = popup::place(caret, size, viewport, self.popup_config.gap);
        let rows = area.height.saturating_sub(2) as usize;
        self.popup_first = popup::scroll_start(selected, suggestions.len(), rows, self.popup_first);

        popup::render(
            frame,
            area,
            &suggestions,
            selected,
            self.input.hovered(),
            self.popup_first,
            &mut self.icons,
        );
        self.popup_view = Some(PopupView {
            area,
            first: self.popup_first,
            count: suggestions.len(),
        });
    }
}

fn describe(refs: &[Reference]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("  ")
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{Suggestion, SuggestionRequest, Trigger};
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(&Config::default(), "~/project")
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    #[test]
    fn test_send_echoes_and_clears() {
        let mut app = app();
        app.input.set_initial_value("see #file:src/lib.rs");
        press(&mut app, KeyCode::Enter);

        let sent = app.process_events();
        assert_eq!(sent, vec!["see #file:src/lib.rs ".to_string()]);
        assert_eq!(app.chat_lines[0].content, "see #file:src/lib.rs");
        assert_eq!(app.chat_lines[1].content, "#file:src/lib.rs");
        assert_eq!(app.input.value(), "");
    }

    #[test]
    fn test_blank_send_is_ignored() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.process_events().is_empty());
        assert!(app.chat_lines.is_empty());
    }

    #[test]
    fn test_slash_commands() {
        let mut app = app();
        assert!(app.handle_slash_command("/help"));
        assert_eq!(app.chat_lines.len(), 1);
        assert!(app.handle_slash_command("/clear"));
        assert!(app.chat_lines.is_empty());
        assert!(app.handle_slash_command("/nope"));
        assert_eq!(app.chat_lines[0].style, ChatStyle::Error);
        assert!(!app.handle_slash_command("hello"));
        assert!(app.handle_slash_command("/quit"));
        assert!(!app.running);
    }

    #[test]
    fn test_clipboard_chords() {
        let mut app = app();
        app.input.set_initial_value("ping @ops");
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert_eq!(app.clipboard, "ping @ops ");
        assert_eq!(app.input.value(), "");

        app.handle_key(KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL));
        assert_eq!(app.input.value(), "ping @ops ");
    }

    #[test]
    fn test_popup_click_accepts() {
        let mut app = app();
        type_str(&mut app, "@re");
        app.input.receive_suggestions(
            &SuggestionRequest::new(Trigger::Mention, "re"),
            vec![
                Suggestion::new("reasoner", "reasoner").with_kind("agent"),
                Suggestion::new("reviewer", "reviewer").with_kind("agent"),
            ],
        );
        draw(&mut app);

        let view = app.popup_view.expect("popup drawn");
        let (column, row) = (view.area.x + 2, view.area.y + 2);
        app.handle_mouse(MouseAction::Moved, column, row);
        assert_eq!(app.input.hovered(), Some(1));

        app.handle_mouse(MouseAction::Down, column, row);
        assert_eq!(app.input.value(), "@reviewer ");
        assert!(!app.input.session().is_active());
    }

    #[test]
    fn test_backdrop_click_dismisses() {
        let mut app = app();
        type_str(&mut app, "#sr");
        draw(&mut app);
        assert!(app.popup_view.is_some());

        app.handle_mouse(MouseAction::Down, 0, 1);
        assert!(!app.input.session().is_active());
        assert_eq!(app.input.value(), "#sr");
    }

    #[test]
    fn test_backdrop_press_inside_token_stays_dismissed() {
        let mut app = app();
        type_str(&mut app, "#sr");
        app.input.receive_suggestions(
            &SuggestionRequest::new(Trigger::Hashtag, "sr"),
            vec![Suggestion::new("src", "dir:src").with_kind("directory")],
        );
        draw(&mut app);

        let inner = Block::default().borders(Borders::ALL).inner(app.composer_area);
        let (column, row) = (inner.x + 2, inner.y);
        assert!(!app.popup_view.is_some_and(|v| v.contains(column, row)));
        app.handle_mouse(MouseAction::Down, column, row);
        assert!(!app.input.session().is_active());
        assert_eq!(app.input.cursor(), 3);

        // With the session gone, the next press reaches the composer.
        app.handle_mouse(MouseAction::Down, column, row);
        assert_eq!(app.input.cursor(), 2);
    }

    #[test]
    fn test_render_shows_placeholder() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Type here"));
    }
}
