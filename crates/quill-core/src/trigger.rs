//! Trigger detection: does the text before the cursor open an
//! autocomplete session?

use crate::document::{Document, MarkKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Character that opens an autocomplete session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    #[serde(rename = "@")]
    Mention,
    #[serde(rename = "#")]
    Hashtag,
}

impl Trigger {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '@' => Some(Trigger::Mention),
            '#' => Some(Trigger::Hashtag),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Trigger::Mention => '@',
            Trigger::Hashtag => '#',
        }
    }

    /// Mark applied to a suggestion accepted under this trigger.
    pub fn mark_kind(self) -> MarkKind {
        match self {
            Trigger::Mention => MarkKind::Mention,
            Trigger::Hashtag => MarkKind::Hashtag,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A detected trigger: the token `[from, to)` is the trigger character
/// followed by `query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    pub trigger: Trigger,
    pub query: String,
    pub from: usize,
    pub to: usize,
}

/// Look at the whitespace-delimited token ending at `cursor`.
///
/// Returns `None` when the cursor is inside a reference token, when the
/// token is empty or does not start with `@`/`#`, or when any part of the
/// token already belongs to a reference.
pub fn detect(doc: &Document, cursor: usize) -> Option<TriggerMatch> {
    let cursor = cursor.min(doc.size());
    if doc.inside_token(cursor) {
        return None;
    }

    let (line_start, _) = doc.line_bounds(cursor);
    let before = doc.text_between(line_start, cursor);
    let token_len = before
        .chars()
        .rev()
        .take_while(|c| !c.is_whitespace())
        .count();
    if token_len == 0 {
        return None;
    }

    let from = cursor - token_len;
    if doc.has_mark_between(from, cursor) {
        return None;
    }

    let token = doc.text_between(from, cursor);
    let mut chars = token.chars();
    let trigger = chars.next().and_then(Trigger::from_char)?;
    Some(TriggerMatch {
        trigger,
        query: chars.as_str().to_string(),
        from,
        to: cursor,
    })
}
