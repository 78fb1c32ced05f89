use quill_core::Config;
use std::path::Path;

/// Run the interactive composer.
pub async fn run(config: Config, workspace: &Path) -> anyhow::Result<()> {
    let registry = super::build_registry(&config, workspace);
    let label = workspace.display().to_string();

    quill_tui::run_tui(config, registry, &label)
        .await
        .map_err(|e| anyhow::anyhow!("TUI error: {e}"))?;

    Ok(())
}
