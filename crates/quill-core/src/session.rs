//! Autocomplete session state and suggestion types.

use crate::trigger::{Trigger, TriggerMatch};
use serde::{Deserialize, Serialize};

/// An externally supplied completion candidate. Only `name` and `value`
/// matter to the engine; the rest is for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Suggestion {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: None,
            description: None,
            icon: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// What the engine asks the host for. Responses are tagged with the
/// request they answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuggestionRequest {
    #[serde(rename = "type")]
    pub trigger: Trigger,
    pub query: String,
}

impl SuggestionRequest {
    pub fn new(trigger: Trigger, query: impl Into<String>) -> Self {
        Self {
            trigger,
            query: query.into(),
        }
    }
}

/// State of an open autocomplete session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub trigger: Trigger,
    pub query: String,
    /// Start of the trigger character.
    pub anchor_from: usize,
    /// Cursor position at the last recompute.
    pub anchor_to: usize,
    pub suggestions: Vec<Suggestion>,
    pub selected_index: usize,
}

impl ActiveSession {
    pub fn from_match(found: TriggerMatch) -> Self {
        Self {
            trigger: found.trigger,
            query: found.query,
            anchor_from: found.from,
            anchor_to: found.to,
            suggestions: Vec::new(),
            selected_index: 0,
        }
    }

    pub fn request(&self) -> SuggestionRequest {
        SuggestionRequest::new(self.trigger, self.query.clone())
    }

    /// Whether `request` was issued for this session's current query.
    pub fn answers(&self, request: &SuggestionRequest) -> bool {
        self.trigger == request.trigger && self.query == request.query
    }

    pub fn selected(&self) -> Option<&Suggestion> {
        self.suggestions.get(self.selected_index)
    }

    pub fn select_next(&mut self) {
        let count = self.suggestions.len();
        self.selected_index = if count == 0 {
            0
        } else {
            (self.selected_index + 1) % count
        };
    }

    pub fn select_previous(&mut self) {
        let count = self.suggestions.len();
        self.selected_index = if count == 0 {
            0
        } else {
            (self.selected_index + count - 1) % count
        };
    }

    /// Swap in a new list, keeping the selection when it is still valid.
    pub fn replace_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        if self.selected_index >= suggestions.len() {
            self.selected_index = 0;
        }
        self.suggestions = suggestions;
    }
}

/// The single autocomplete session. Inactive carries no trigger, no
/// suggestions and a zero selection by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Inactive,
    Active(ActiveSession),
}

impl Session {
    pub fn is_active(&self) -> bool {
        matches!(self, Session::Active(_))
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            Session::Active(active) => Some(active),
            Session::Inactive => None,
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveSession> {
        match self {
            Session::Active(active) => Some(active),
            Session::Inactive => None,
        }
    }

    pub fn trigger(&self) -> Option<Trigger> {
        self.active().map(|a| a.trigger)
    }

    pub fn query(&self) -> &str {
        self.active().map(|a| a.query.as_str()).unwrap_or("")
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        self.active().map(|a| a.suggestions.as_slice()).unwrap_or(&[])
    }

    pub fn selected_index(&self) -> usize {
        self.active().map(|a| a.selected_index).unwrap_or(0)
    }

    /// Session after a recompute. A requery under the same trigger keeps
    /// the previous list visible until the new one arrives; the
    /// selection always resets.
    pub fn recomputed(&self, found: Option<TriggerMatch>) -> Session {
        let Some(found) = found else {
            return Session::Inactive;
        };
        let mut next = ActiveSession::from_match(found);
        if let Some(prev) = self.active() {
            if prev.trigger == next.trigger {
                next.suggestions = prev.suggestions.clone();
            }
        }
        Session::Active(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(count: usize, selected: usize) -> ActiveSession {
        ActiveSession {
            trigger: Trigger::Mention,
            query: "a".to_string(),
            anchor_from: 0,
            anchor_to: 2,
            suggestions: (0..count)
                .map(|i| Suggestion::new(format!("s{i}"), format!("v{i}")))
                .collect(),
            selected_index: selected,
        }
    }

    #[test]
    fn test_navigation_wraps_down() {
        let mut s = session_with(3, 2);
        s.select_next();
        assert_eq!(s.selected_index, 0);
    }

    #[test]
    fn test_navigation_wraps_up() {
        let mut s = session_with(3, 0);
        s.select_previous();
        assert_eq!(s.selected_index, 2);
    }

    #[test]
    fn test_navigation_on_empty_list_stays_zero() {
        let mut s = session_with(0, 0);
        s.select_previous();
        assert_eq!(s.selected_index, 0);
        s.select_next();
        assert_eq!(s.selected_index, 0);
    }

    #[test]
    fn test_inactive_accessors() {
        let s = Session::Inactive;
        assert!(!s.is_active());
        assert_eq!(s.trigger(), None);
        assert!(s.suggestions().is_empty());
        assert_eq!(s.selected_index(), 0);
        assert_eq!(s.query(), "");
    }

    #[test]
    fn test_recompute_keeps_list_for_same_trigger() {
        let prev = Session::Active(session_with(2, 1));
        let next = prev.recomputed(Some(TriggerMatch {
            trigger: Trigger::Mention,
            query: "ab".to_string(),
            from: 0,
            to: 3,
        }));
        assert_eq!(next.suggestions().len(), 2);
        assert_eq!(next.selected_index(), 0);
        assert_eq!(next.query(), "ab");

        let switched = prev.recomputed(Some(TriggerMatch {
            trigger: Trigger::Hashtag,
            query: String::new(),
            from: 0,
            to: 1,
        }));
        assert!(switched.suggestions().is_empty());
        assert_eq!(prev.recomputed(None), Session::Inactive);
    }

    #[test]
    fn test_replace_suggestions_clamps_selection() {
        let mut s = session_with(3, 2);
        s.replace_suggestions(vec![Suggestion::new("x", "x")]);
        assert_eq!(s.selected_index, 0);
    }

    #[test]
    fn test_suggestion_wire_shape() {
        let json = r#"{"name":"foo.py","value":"file:foo.py","type":"file","icon":"python.svg"}"#;
        let s: Suggestion = serde_json::from_str(json).unwrap();
        assert_eq!(s.kind.as_deref(), Some("file"));
        assert!(s.description.is_none());
        let back = serde_json::to_value(&s).unwrap();
        assert!(back.get("description").is_none());
    }
}
