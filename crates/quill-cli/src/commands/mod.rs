//! Command implementations.

pub mod chat;
pub mod suggest;
pub mod text;

use quill_core::{AgentEntry, Config};
use quill_suggest::SuggestionRegistry;
use std::path::{Path, PathBuf};

/// Pick the workspace root: flag, then config, then the current directory.
pub fn resolve_workspace(flag: Option<&Path>, config: &Config) -> anyhow::Result<PathBuf> {
    match flag.or(config.workspace_root.as_deref()) {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(std::env::current_dir()?),
    }
}

/// Registry with every built-in source rooted at `workspace`.
pub fn build_registry(config: &Config, workspace: &Path) -> SuggestionRegistry {
    let mut registry = SuggestionRegistry::new();
    quill_suggest::register_all(&mut registry, config, workspace);
    tracing::debug!(sources = registry.len(), root = %workspace.display(), "registry ready");
    registry
}

/// `NAME` or `NAME=DESCRIPTION`.
pub fn parse_agent(spec: &str) -> AgentEntry {
    match spec.split_once('=') {
        Some((name, description)) => AgentEntry::new(name.trim(), description.trim()),
        None => AgentEntry::new(spec.trim(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_agent() {
        let agent = parse_agent("search=Web search first");
        assert_eq!(agent.name, "search");
        assert_eq!(agent.description, "Web search first");
        assert_eq!(parse_agent("plain").description, "");
    }

    #[test]
    fn test_workspace_flag_wins() {
        let config = Config {
            workspace_root: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };
        let root = resolve_workspace(Some(Path::new("/from/flag")), &config).unwrap();
        assert_eq!(root, PathBuf::from("/from/flag"));
        let root = resolve_workspace(None, &config).unwrap();
        assert_eq!(root, PathBuf::from("/from/config"));
    }
}
