//! The chat input engine.
//!
//! `ChatInput` owns the editor state and turns host input (keys, paste,
//! pointer actions, suggestion deliveries) into transactions. It never
//! returns errors to the host: failures degrade to an inactive or empty
//! session and are logged.

use crate::codec;
use crate::config::Config;
use crate::document::{Document, MarkKind};
use crate::error::QuillError;
use crate::guards;
use crate::session::{Session, Suggestion, SuggestionRequest};
use crate::state::{Applied, Effect, EditorState, Selection, Transaction};
use crate::trigger::Trigger;
use serde::Serialize;
use tracing::{debug, warn};

/// Receives the engine's outgoing callbacks.
///
/// `request_suggestions` is fire-and-forget: the answer comes back later
/// through [`ChatInput::receive_suggestions`].
pub trait SuggestionHandler: Send {
    fn request_suggestions(&mut self, request: &SuggestionRequest) -> Result<(), QuillError>;

    /// Called right before an accepted suggestion is inserted.
    fn suggestion_accepted(&mut self, _suggestion: &Suggestion, _trigger: Trigger) {}
}

/// Handler that drops every request.
#[derive(Debug, Default)]
pub struct NoopHandler;

impl SuggestionHandler for NoopHandler {
    fn request_suggestions(&mut self, _request: &SuggestionRequest) -> Result<(), QuillError> {
        Ok(())
    }
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    ShiftEnter,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

/// Whether the engine consumed a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

/// Notifications for the host, collected until drained.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    /// Enter with no open session.
    Send { value: String },
    Blur {
        value: String,
        snapshot: serde_json::Value,
    },
    HashtagClicked { value: String },
    ValueChanged { value: String },
}

pub struct ChatInput {
    state: EditorState,
    handler: Box<dyn SuggestionHandler>,
    placeholder: String,
    reject_stale: bool,
    value: String,
    hovered: Option<usize>,
    events: Vec<InputEvent>,
    attached: bool,
}

impl ChatInput {
    pub fn new(config: &Config) -> Self {
        Self {
            state: EditorState::default(),
            handler: Box::new(NoopHandler),
            placeholder: config.placeholder.clone(),
            reject_stale: config.reject_stale_suggestions,
            value: String::new(),
            hovered: None,
            events: Vec::new(),
            attached: true,
        }
    }

    /// Set the callback receiver.
    pub fn with_handler(mut self, handler: Box<dyn SuggestionHandler>) -> Self {
        self.handler = handler;
        self
    }

    pub fn set_handler(&mut self, handler: Box<dyn SuggestionHandler>) {
        self.handler = handler;
    }

    // --- accessors ---

    /// Canonical plain-text value.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn document(&self) -> &Document {
        self.state.doc()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        self.state.session()
    }

    pub fn selection(&self) -> Selection {
        self.state.selection()
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor()
    }

    /// Row under the pointer, if any.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Whether the placeholder should be drawn instead of the document.
    pub fn shows_placeholder(&self) -> bool {
        self.state.doc().is_blank()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn drain_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    // --- content loading ---

    /// Replace the whole content with parsed `text`. The session closes,
    /// nothing is requested and the cursor goes to the end.
    pub fn set_initial_value(&mut self, text: &str) {
        if !self.attached {
            return;
        }
        let doc = codec::parse(text);
        let end = doc.size();
        let tr = Transaction::new()
            .replace(0, self.state.doc().size(), doc.content().to_vec())
            .select(Selection::cursor(end))
            .reset();
        self.dispatch(tr);
    }

    pub fn clear(&mut self) {
        self.set_initial_value("");
    }

    pub fn focus(&mut self) {
        if !self.attached || self.state.doc().is_blank() {
            return;
        }
        let end = self.state.doc().size();
        self.dispatch(Transaction::new().select(Selection::cursor(end)));
    }

    // --- editing ---

    pub fn insert_text(&mut self, text: &str) {
        if !self.attached || text.is_empty() {
            return;
        }
        let tr = guards::type_text(&self.state, text);
        self.dispatch(tr);
    }

    pub fn paste(&mut self, text: &str) {
        if !self.attached || text.is_empty() {
            return;
        }
        let tr = guards::paste(&self.state, text);
        self.dispatch(tr);
    }

    /// Canonical text of the selection, or of the whole document when
    /// nothing is selected.
    pub fn copy(&self) -> String {
        let selection = self.state.selection();
        if selection.is_empty() {
            return codec::serialize(self.state.doc());
        }
        let slice = self.state.doc().slice_content(selection.from(), selection.to());
        codec::serialize_content(&slice)
    }

    pub fn cut(&mut self) -> Option<String> {
        if !self.attached || self.state.selection().is_empty() {
            return None;
        }
        let text = self.copy();
        let tr = guards::replace_selection(&self.state, Vec::new());
        self.dispatch(tr);
        Some(text)
    }

    pub fn select(&mut self, anchor: usize, head: usize) {
        if !self.attached {
            return;
        }
        self.dispatch(Transaction::new().select(Selection::new(anchor, head)));
    }

    pub fn select_all(&mut self) {
        let end = self.state.doc().size();
        self.select(0, end);
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        if !self.attached {
            return KeyOutcome::Ignored;
        }
        match key {
            Key::Char(c) => {
                self.insert_text(c.encode_utf8(&mut [0; 4]));
                KeyOutcome::Handled
            }
            Key::Up | Key::Down => self.navigate(key == Key::Down),
            Key::Enter => {
                self.enter();
                KeyOutcome::Handled
            }
            Key::ShiftEnter => {
                let tr = guards::hard_break(&self.state);
                self.dispatch(tr);
                KeyOutcome::Handled
            }
            Key::Escape => {
                if self.state.session().is_active() {
                    self.dismiss();
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::Ignored
                }
            }
            Key::Backspace => self.dispatch_opt(guards::delete_backward(&self.state)),
            Key::Delete => self.dispatch_opt(guards::delete_forward(&self.state)),
            Key::Left | Key::Right | Key::Home | Key::End => {
                let pos = self.moved_cursor(key);
                self.dispatch(Transaction::new().select(Selection::cursor(pos)));
                KeyOutcome::Handled
            }
        }
    }

    /// Autocomplete first; submission only with no open session.
    fn enter(&mut self) {
        let Some(active) = self.state.session().active() else {
            let value = self.value.clone();
            debug!(len = value.len(), "send");
            self.events.push(InputEvent::Send { value });
            return;
        };
        if active.suggestions.is_empty() {
            let tr = guards::hard_break(&self.state);
            self.dispatch(tr);
        } else {
            let index = active.selected_index;
            self.accept(index);
        }
    }

    fn navigate(&mut self, down: bool) -> KeyOutcome {
        let Some(active) = self.state.session().active() else {
            return KeyOutcome::Ignored;
        };
        let mut next = active.clone();
        if down {
            next.select_next();
        } else {
            next.select_previous();
        }
        self.dispatch(Transaction::new().set_session(Session::Active(next)));
        KeyOutcome::Handled
    }

    fn moved_cursor(&self, key: Key) -> usize {
        let selection = self.state.selection();
        let size = self.state.doc().size();
        let head = selection.head;
        match key {
            Key::Left if !selection.is_empty() => selection.from(),
            Key::Right if !selection.is_empty() => selection.to(),
            Key::Left => head.saturating_sub(1),
            Key::Right => (head + 1).min(size),
            Key::Home => self.state.doc().line_bounds(head).0,
            Key::End => self.state.doc().line_bounds(head).1,
            _ => head,
        }
    }

    // --- autocomplete ---

    /// Deliver suggestions for `request`. Returns whether they were
    /// applied.
    pub fn receive_suggestions(
        &mut self,
        request: &SuggestionRequest,
        suggestions: Vec<Suggestion>,
    ) -> bool {
        if !self.attached {
            debug!("dropping suggestions for detached input");
            return false;
        }
        let Some(active) = self.state.session().active() else {
            debug!(query = %request.query, "dropping suggestions, no open session");
            return false;
        };
        if self.reject_stale && !active.answers(request) {
            debug!(
                trigger = %request.trigger,
                query = %request.query,
                current = %active.query,
                "dropping stale suggestions"
            );
            return false;
        }
        let mut next = active.clone();
        next.replace_suggestions(suggestions);
        self.dispatch(Transaction::new().set_session(Session::Active(next)));
        true
    }

    /// Accept the suggestion at `index`. Returns whether anything was
    /// inserted.
    pub fn accept(&mut self, index: usize) -> bool {
        if !self.attached {
            return false;
        }
        let Some(active) = self.state.session().active() else {
            return false;
        };
        let Some(suggestion) = active.suggestions.get(index).cloned() else {
            return false;
        };
        let active = active.clone();
        self.handler.suggestion_accepted(&suggestion, active.trigger);
        debug!(trigger = %active.trigger, value = %suggestion.value, "accepted suggestion");
        self.dispatch(guards::accept(&active, &suggestion));
        true
    }

    pub fn hover(&mut self, index: Option<usize>) {
        let count = self.state.session().suggestions().len();
        self.hovered = index.filter(|i| *i < count);
    }

    pub fn dismiss(&mut self) {
        if !self.attached || !self.state.session().is_active() {
            return;
        }
        self.dispatch(Transaction::new().set_session(Session::Inactive));
    }

    // --- host notifications ---

    pub fn blur(&mut self) {
        if !self.attached {
            return;
        }
        let snapshot = match serde_json::to_value(self.state.doc()) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "could not snapshot document");
                serde_json::Value::Null
            }
        };
        self.events.push(InputEvent::Blur {
            value: self.value.clone(),
            snapshot,
        });
    }

    /// Pointer press at document offset `pos`. Moves the cursor there and
    /// returns the hashtag value under it, if any.
    pub fn click(&mut self, pos: usize) -> Option<String> {
        if !self.attached {
            return None;
        }
        let clicked = self
            .state
            .doc()
            .mark_at(pos)
            .filter(|mark| mark.kind == MarkKind::Hashtag)
            .map(|mark| mark.value.clone());
        self.dispatch(Transaction::new().select(Selection::cursor(pos)));
        if let Some(value) = &clicked {
            self.events.push(InputEvent::HashtagClicked {
                value: value.clone(),
            });
        }
        clicked
    }

    /// Detach the engine. Every later call is a no-op.
    pub fn dispose(&mut self) {
        self.attached = false;
        self.hovered = None;
    }

    // --- internals ---

    fn dispatch_opt(&mut self, tr: Option<Transaction>) -> KeyOutcome {
        match tr {
            Some(tr) => {
                self.dispatch(tr);
                KeyOutcome::Handled
            }
            None => KeyOutcome::Ignored,
        }
    }

    fn dispatch(&mut self, tr: Transaction) {
        let Applied { state, effects } = self.state.apply(tr);
        self.state = state;

        for effect in effects {
            match effect {
                Effect::RequestSuggestions(request) => {
                    debug!(trigger = %request.trigger, query = %request.query, "requesting suggestions");
                    if let Err(err) = self.handler.request_suggestions(&request) {
                        warn!(error = %err, "suggestion request failed");
                        self.empty_suggestions();
                    }
                }
            }
        }

        let value = codec::serialize(self.state.doc());
        if value != self.value {
            self.value = value.clone();
            self.events.push(InputEvent::ValueChanged { value });
        }

        let count = self.state.session().suggestions().len();
        if self.hovered.is_some_and(|i| i >= count) {
            self.hovered = None;
        }
    }

    fn empty_suggestions(&mut self) {
        if let Some(active) = self.state.session().active() {
            let mut next = active.clone();
            next.replace_suggestions(Vec::new());
            self.state = self
                .state
                .apply(Transaction::new().set_session(Session::Active(next)))
                .state;
        }
    }
}
