//! Editor state and transactions.
//!
//! A transaction is applied to an immutable state and yields a new one.
//! Any transaction that changes the document or the selection re-runs
//! trigger detection, unless it explicitly overwrites the session.

use crate::document::{content_size, Document, Inline};
use crate::session::{Session, SuggestionRequest};
use crate::trigger;

/// Anchor/head selection. Collapsed when both are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    fn clamp(self, size: usize) -> Self {
        Self::new(self.anchor.min(size), self.head.min(size))
    }

    fn map(self, from: usize, to: usize, inserted: usize) -> Self {
        Self::new(
            map_pos(self.anchor, from, to, inserted),
            map_pos(self.head, from, to, inserted),
        )
    }
}

/// Map a position through the replacement of `[from, to)` by `inserted`
/// positions. Positions inside the replaced range land after the insert.
fn map_pos(pos: usize, from: usize, to: usize, inserted: usize) -> usize {
    if pos < from || (pos == from && from < to) {
        pos
    } else if pos < to {
        from + inserted
    } else {
        pos - (to - from) + inserted
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    /// Replace `[from, to)` with `content`.
    Replace {
        from: usize,
        to: usize,
        content: Vec<Inline>,
    },
    /// Typing strictly inside a reference token extends that token.
    ExtendToken { pos: usize, text: String },
}

/// A batch of changes applied atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    steps: Vec<Step>,
    selection: Option<Selection>,
    session: Option<Session>,
    reset: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(mut self, from: usize, to: usize, content: Vec<Inline>) -> Self {
        self.steps.push(Step::Replace { from, to, content });
        self
    }

    pub fn delete(self, from: usize, to: usize) -> Self {
        self.replace(from, to, Vec::new())
    }

    pub fn extend_token(mut self, pos: usize, text: impl Into<String>) -> Self {
        self.steps.push(Step::ExtendToken {
            pos,
            text: text.into(),
        });
        self
    }

    pub fn select(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Overwrite the session without re-running trigger detection.
    pub fn set_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Content load: the session closes and no suggestions are requested.
    pub fn reset(mut self) -> Self {
        self.reset = true;
        self
    }

    pub fn changes_document(&self) -> bool {
        !self.steps.is_empty()
    }
}

/// Side effects requested while applying a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestSuggestions(SuggestionRequest),
}

/// Result of applying a transaction.
#[derive(Debug, Clone)]
pub struct Applied {
    pub state: EditorState,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    doc: Document,
    selection: Selection,
    session: Session,
}

impl EditorState {
    /// State for `doc` with the cursor at the end and no session.
    pub fn new(doc: Document) -> Self {
        let end = doc.size();
        Self {
            doc,
            selection: Selection::cursor(end),
            session: Session::Inactive,
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Head of the selection.
    pub fn cursor(&self) -> usize {
        self.selection.head
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn apply(&self, tr: Transaction) -> Applied {
        let mut doc = self.doc.clone();
        let mut selection = self.selection;

        for step in tr.steps {
            match step {
                Step::Replace { from, to, content } => {
                    let size = doc.size();
                    let to = to.min(size);
                    let from = from.min(to);
                    let inserted = content_size(&content);
                    doc = doc.replace(from, to, content);
                    selection = selection.map(from, to, inserted);
                }
                Step::ExtendToken { pos, text } => {
                    let inserted = text.chars().count();
                    if let Some(next) = doc.insert_into_token(pos, &text) {
                        doc = next;
                        selection = selection.map(pos, pos, inserted);
                    }
                }
            }
        }
        if let Some(explicit) = tr.selection {
            selection = explicit;
        }
        selection = selection.clamp(doc.size());

        let mut effects = Vec::new();
        let session = if tr.reset {
            Session::Inactive
        } else if let Some(session) = tr.session {
            session
        } else if doc != self.doc || selection != self.selection {
            let found = if selection.is_empty() {
                trigger::detect(&doc, selection.head)
            } else {
                None
            };
            let next = self.session.recomputed(found);
            if let Some(active) = next.active() {
                effects.push(Effect::RequestSuggestions(active.request()));
            }
            next
        } else {
            self.session.clone()
        };

        Applied {
            state: EditorState {
                doc,
                selection,
                session,
            },
            effects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::Trigger;

    fn typed(state: &EditorState, text: &str) -> Applied {
        let pos = state.cursor();
        state.apply(Transaction::new().replace(pos, pos, vec![Inline::text(text)]))
    }

    #[test]
    fn test_insert_moves_cursor_after_text() {
        let state = EditorState::default();
        let applied = typed(&state, "hey");
        assert_eq!(applied.state.cursor(), 3);
        assert_eq!(applied.state.doc().text_content(), "hey");
    }

    #[test]
    fn test_typing_trigger_requests_suggestions() {
        let state = EditorState::default();
        let applied = typed(&state, "@al");
        assert_eq!(applied.state.session().trigger(), Some(Trigger::Mention));
        assert_eq!(
            applied.effects,
            vec![Effect::RequestSuggestions(SuggestionRequest::new(
                Trigger::Mention,
                "al"
            ))]
        );

        let closed = typed(&applied.state, " ");
        assert!(!closed.state.session().is_active());
        assert!(closed.effects.is_empty());
    }

    #[test]
    fn test_explicit_session_skips_recompute() {
        let state = typed(&EditorState::default(), "@al").state;
        let applied = state.apply(Transaction::new().set_session(Session::Inactive));
        assert!(!applied.state.session().is_active());
        assert!(applied.effects.is_empty());
    }

    #[test]
    fn test_reset_closes_session_without_request() {
        let state = EditorState::default();
        let applied = state.apply(
            Transaction::new()
                .replace(0, 0, vec![Inline::text("@al")])
                .select(Selection::cursor(3))
                .reset(),
        );
        assert!(!applied.state.session().is_active());
        assert!(applied.effects.is_empty());
    }

    #[test]
    fn test_unchanged_state_keeps_session() {
        let state = typed(&EditorState::default(), "#x").state;
        let applied = state.apply(Transaction::new());
        assert!(applied.state.session().is_active());
        assert!(applied.effects.is_empty());
    }

    #[test]
    fn test_selection_is_clamped() {
        let state = EditorState::default();
        let applied = state.apply(Transaction::new().select(Selection::new(5, 9)));
        assert_eq!(applied.state.selection(), Selection::cursor(0));
    }

    #[test]
    fn test_map_pos() {
        assert_eq!(map_pos(2, 4, 6, 1), 2);
        assert_eq!(map_pos(4, 4, 6, 1), 4);
        assert_eq!(map_pos(5, 4, 6, 1), 5);
        assert_eq!(map_pos(8, 4, 6, 1), 7);
        assert_eq!(map_pos(4, 4, 4, 3), 7);
    }
}
