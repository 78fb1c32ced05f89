//! Built-in suggestion sources.

pub mod agents;
pub mod workspace;

use crate::SuggestionRegistry;
use quill_core::Config;
use std::path::Path;
use std::sync::Arc;

/// Register the workspace and agent sources into a registry.
pub fn register_all(registry: &mut SuggestionRegistry, config: &Config, workspace_root: &Path) {
    registry.register(Arc::new(workspace::WorkspaceSource::new(
        workspace_root,
        config.max_suggestions,
    )));
    registry.register(Arc::new(agents::AgentSource::new(
        config.agents.clone(),
        config.max_suggestions,
    )));
}
