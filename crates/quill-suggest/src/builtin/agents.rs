//! Agent source: named agents for `@` mentions.

use crate::error::SuggestError;
use crate::score::similarity;
use crate::traits::SuggestionSource;
use async_trait::async_trait;
use quill_core::{AgentEntry, Suggestion, Trigger};

const MIN_SCORE: f64 = 0.2;

pub struct AgentSource {
    agents: Vec<AgentEntry>,
    limit: usize,
}

impl AgentSource {
    pub fn new(agents: Vec<AgentEntry>, limit: usize) -> Self {
        Self { agents, limit }
    }

    fn to_suggestion(agent: &AgentEntry) -> Suggestion {
        Suggestion::new(agent.name.clone(), agent.name.clone())
            .with_kind("agent")
            .with_description(agent.description.clone())
    }

    /// Match quality of `name` against `query`.
    fn score(name: &str, query: &str) -> f64 {
        let name = name.to_lowercase();
        let query = query.to_lowercase();
        if name == query {
            1.0
        } else if name.starts_with(&query) {
            0.9
        } else if name.contains(&query) {
            0.7
        } else {
            similarity(&name, &query)
        }
    }

    /// Ranked matches for `query`. An empty query lists every agent.
    pub fn matches(&self, query: &str) -> Vec<Suggestion> {
        if query.is_empty() {
            return self.agents.iter().map(Self::to_suggestion).collect();
        }
        let mut scored: Vec<(&AgentEntry, f64)> = self
            .agents
            .iter()
            .map(|agent| (agent, Self::score(&agent.name, query)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| a.0.name.len().cmp(&b.0.name.len()))
        });
        scored
            .into_iter()
            .take(self.limit)
            .filter(|(_, score)| *score > MIN_SCORE)
            .map(|(agent, _)| Self::to_suggestion(agent))
            .collect()
    }
}

#[async_trait]
impl SuggestionSource for AgentSource {
    fn name(&self) -> &str {
        "agents"
    }

    fn trigger(&self) -> Trigger {
        Trigger::Mention
    }

    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, SuggestError> {
        Ok(self.matches(query))
    }
}
