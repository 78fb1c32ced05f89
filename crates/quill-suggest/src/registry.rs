//! Registry routing suggestion requests to sources by trigger.

use crate::error::SuggestError;
use crate::traits::SuggestionSource;
use quill_core::{Suggestion, SuggestionRequest, Trigger};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of suggestion sources.
///
/// Holds at most one source per trigger character.
#[derive(Clone)]
pub struct SuggestionRegistry {
    sources: HashMap<Trigger, Arc<dyn SuggestionSource>>,
}

impl SuggestionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Register a source. Replaces any source for the same trigger.
    pub fn register(&mut self, source: Arc<dyn SuggestionSource>) {
        self.sources.insert(source.trigger(), source);
    }

    pub fn get(&self, trigger: Trigger) -> Option<Arc<dyn SuggestionSource>> {
        self.sources.get(&trigger).cloned()
    }

    pub fn has(&self, trigger: Trigger) -> bool {
        self.sources.contains_key(&trigger)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Answer a request with the source registered for its trigger.
    pub async fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<Suggestion>, SuggestError> {
        let source = self
            .get(request.trigger)
            .ok_or(SuggestError::NoSource(request.trigger))?;
        let suggestions = source.suggest(&request.query).await?;
        tracing::debug!(
            source = source.name(),
            query = %request.query,
            count = suggestions.len(),
            "suggestions ready"
        );
        Ok(suggestions)
    }
}

impl Default for SuggestionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
