use quill_core::{Config, SuggestionRequest, Trigger};
use std::path::Path;

/// Answer one request and print the suggestions as JSON.
pub async fn run(config: &Config, workspace: &Path, trigger: char, query: &str) -> anyhow::Result<()> {
    let trigger = Trigger::from_char(trigger)
        .ok_or_else(|| anyhow::anyhow!("Unknown trigger: {trigger}. Available: @, #"))?;
    let registry = super::build_registry(config, workspace);
    let suggestions = registry
        .suggest(&SuggestionRequest::new(trigger, query))
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("{}", serde_json::to_string_pretty(&suggestions)?);
    Ok(())
}
