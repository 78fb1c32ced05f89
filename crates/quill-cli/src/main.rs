//! quill: terminal chat composer.
//!
//! Type `@` to pick an agent and `#` to reference workspace files.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use quill_core::ConfigStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("quill=debug,quill_core=debug,quill_suggest=debug,quill_tui=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let config_store = match &cli.config {
        Some(path) => ConfigStore::at(path.clone()),
        None => ConfigStore::new(),
    };
    let mut config = config_store.load();
    if !cli.agents.is_empty() {
        config.agents = cli.agents.iter().map(|a| commands::parse_agent(a)).collect();
    }
    let workspace = commands::resolve_workspace(cli.workspace.as_deref(), &config)?;

    match cli.command {
        None | Some(Commands::Chat) => commands::chat::run(config, &workspace).await?,
        Some(Commands::Parse { ref text }) => commands::text::parse(text)?,
        Some(Commands::Normalize { ref text }) => commands::text::normalize(text),
        Some(Commands::Refs { ref text, files }) => commands::text::refs(text, files),
        Some(Commands::Suggest { trigger, ref query }) => {
            commands::suggest::run(&config, &workspace, trigger, query).await?
        }
    }

    Ok(())
}
