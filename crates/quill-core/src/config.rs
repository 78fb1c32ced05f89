use crate::error::QuillError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_PLACEHOLDER: &str = "Type here... (use # for files, @ for agents)";

/// A named agent that can be mentioned with `@`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl AgentEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Suggestion popup geometry, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    pub max_width: u16,
    pub max_height: u16,
    /// Rows kept free between the caret and the popup.
    pub gap: u16,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            max_width: 48,
            max_height: 10,
            gap: 0,
        }
    }
}

/// Serialized settings from ~/.quill/config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub placeholder: String,
    pub agents: Vec<AgentEntry>,
    pub workspace_root: Option<PathBuf>,
    pub icon_dir: Option<PathBuf>,
    pub popup: PopupConfig,
    pub max_suggestions: usize,
    /// Drop suggestion responses whose query no longer matches the
    /// session.
    pub reject_stale_suggestions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            agents: vec![
                AgentEntry::new("default", "General coding assistant"),
                AgentEntry::new("search", "Searches the web before answering"),
                AgentEntry::new("reasoner", "Thinks step by step on hard problems"),
                AgentEntry::new("vanilla", "Plain model without tools"),
            ],
            workspace_root: None,
            icon_dir: None,
            popup: PopupConfig::default(),
            max_suggestions: 10,
            reject_stale_suggestions: true,
        }
    }
}

/// Helper struct for storing the location to read/write global settings
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".quill");
        path.push("config.json");
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the user's saved config, or fallback to Default
    pub fn load(&self) -> Config {
        if let Ok(content) = fs::read_to_string(&self.path) {
            match serde_json::from_str(&content) {
                Ok(config) => return config,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable config")
                }
            }
        }
        Config::default()
    }

    /// Save the user's config back to disk
    pub fn save(&self, config: &Config) -> Result<(), QuillError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
