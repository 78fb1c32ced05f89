//! CLI argument and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quill", version, about = "Chat composer with @agent and #file references")]
pub struct Cli {
    /// Workspace root for #file suggestions (defaults to config, then the cwd).
    #[arg(long, short = 'w', global = true, env = "QUILL_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Config file to use instead of ~/.quill/config.json.
    #[arg(long, global = true, env = "QUILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Agent offered after `@`, as NAME or NAME=DESCRIPTION. Repeat to
    /// list several; replaces the configured agents.
    #[arg(long = "agent", global = true, value_name = "AGENT")]
    pub agents: Vec<String>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive composer (default).
    Chat,

    /// Print the document snapshot for a serialized value.
    Parse {
        /// Serialized text, e.g. "ask @search about #file:src/main.rs".
        text: String,
    },

    /// Parse and re-serialize a value.
    Normalize { text: String },

    /// List the references a value contains, one per line.
    Refs {
        text: String,

        /// Only print referenced file paths.
        #[arg(long)]
        files: bool,
    },

    /// Ask a suggestion source directly and print the list as JSON.
    Suggest {
        /// Trigger character: '@' or '#'.
        trigger: char,

        /// Query typed after the trigger.
        #[arg(default_value = "")]
        query: String,
    },
}
