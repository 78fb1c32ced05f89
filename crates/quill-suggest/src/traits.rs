//! Suggestion source trait.

use crate::error::SuggestError;
use async_trait::async_trait;
use quill_core::{Suggestion, Trigger};

/// Something that can answer autocomplete queries for one trigger.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Machine-readable source name (e.g., "workspace").
    fn name(&self) -> &str;

    /// The trigger character this source answers.
    fn trigger(&self) -> Trigger;

    /// Candidates for `query` (the text typed after the trigger).
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, SuggestError>;
}

// Compile-time check: SuggestionSource must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn SuggestionSource) {}
};
