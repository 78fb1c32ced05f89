//! Edit guards: keep reference tokens atomic and place the cursor after
//! insertions.

use crate::codec;
use crate::document::{content_size, Document, Inline, Mark};
use crate::session::{ActiveSession, Session, Suggestion};
use crate::state::{EditorState, Selection, Transaction};

/// Grow a non-empty range so it never cuts a reference token in half.
pub fn widen_to_tokens(doc: &Document, from: usize, to: usize) -> (usize, usize) {
    if from >= to {
        return (from, to);
    }
    let from = match doc.span_at(from) {
        Some(span) if span.node.mark().is_some() => span.start,
        _ => from,
    };
    let to = match to.checked_sub(1).and_then(|last| doc.span_at(last)) {
        Some(span) if span.node.mark().is_some() => span.end,
        _ => to,
    };
    (from, to)
}

/// Replace `[from, to)` with `content` and put the cursor right after it.
pub fn replace_range(from: usize, to: usize, content: Vec<Inline>) -> Transaction {
    let end = from + content_size(&content);
    Transaction::new()
        .replace(from, to, content)
        .select(Selection::cursor(end))
}

/// Replace the current selection, widened to whole tokens.
pub fn replace_selection(state: &EditorState, content: Vec<Inline>) -> Transaction {
    let selection = state.selection();
    let (from, to) = widen_to_tokens(state.doc(), selection.from(), selection.to());
    replace_range(from, to, content)
}

/// Backspace with a collapsed selection right after a reference token
/// removes the whole token and leaves the cursor at its start.
pub fn atomic_backspace(state: &EditorState) -> Option<Transaction> {
    let selection = state.selection();
    if !selection.is_empty() {
        return None;
    }
    let span = state.doc().marked_run_before(selection.head)?;
    Some(
        Transaction::new()
            .delete(span.start, span.end)
            .select(Selection::cursor(span.start)),
    )
}

/// Forward delete counterpart of [`atomic_backspace`].
pub fn atomic_delete(state: &EditorState) -> Option<Transaction> {
    let selection = state.selection();
    if !selection.is_empty() {
        return None;
    }
    let span = state.doc().marked_run_after(selection.head)?;
    Some(
        Transaction::new()
            .delete(span.start, span.end)
            .select(Selection::cursor(span.start)),
    )
}

/// Full Backspace behaviour: token guard, then selection, then one
/// position.
pub fn delete_backward(state: &EditorState) -> Option<Transaction> {
    if let Some(tr) = atomic_backspace(state) {
        return Some(tr);
    }
    let selection = state.selection();
    if !selection.is_empty() {
        return Some(replace_selection(state, Vec::new()));
    }
    let pos = selection.head.checked_sub(1)?;
    Some(replace_range(pos, selection.head, Vec::new()))
}

/// Full Delete behaviour.
pub fn delete_forward(state: &EditorState) -> Option<Transaction> {
    if let Some(tr) = atomic_delete(state) {
        return Some(tr);
    }
    let selection = state.selection();
    if !selection.is_empty() {
        return Some(replace_selection(state, Vec::new()));
    }
    if selection.head >= state.doc().size() {
        return None;
    }
    Some(replace_range(selection.head, selection.head + 1, Vec::new()))
}

/// Typed text. Inside a token it extends the token; anywhere else it is
/// plain text replacing the selection.
pub fn type_text(state: &EditorState, text: &str) -> Transaction {
    let selection = state.selection();
    if selection.is_empty() && state.doc().inside_token(selection.head) {
        let end = selection.head + text.chars().count();
        return Transaction::new()
            .extend_token(selection.head, text)
            .select(Selection::cursor(end));
    }
    replace_selection(state, plain_inlines(text))
}

/// Plain text with `\n` turned into hard breaks, no reference parsing.
fn plain_inlines(text: &str) -> Vec<Inline> {
    let mut nodes = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            nodes.push(Inline::HardBreak);
        }
        nodes.push(Inline::text(line));
    }
    nodes
}

/// Pasted text is re-tokenized so reference syntax becomes live tokens.
pub fn paste(state: &EditorState, text: &str) -> Transaction {
    replace_selection(state, codec::parse_inlines(text))
}

/// Hard line break at the cursor.
pub fn hard_break(state: &EditorState) -> Transaction {
    replace_selection(state, vec![Inline::HardBreak])
}

/// Replace the session's anchor range with the accepted suggestion as a
/// single marked run and close the session.
pub fn accept(session: &ActiveSession, suggestion: &Suggestion) -> Transaction {
    let kind = session.trigger.mark_kind();
    let mark = Mark::new(kind, suggestion.name.clone(), suggestion.value.clone());
    let text = format!("{}{} ", kind.sigil(), suggestion.name);
    replace_range(
        session.anchor_from,
        session.anchor_to,
        vec![Inline::marked(text, mark)],
    )
    .set_session(Session::Inactive)
}
