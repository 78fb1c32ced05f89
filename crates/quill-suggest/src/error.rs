//! Error types for the quill-suggest crate.

use quill_core::Trigger;

/// Errors that can occur while producing suggestions.
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    /// No source is registered for the trigger
    #[error("No suggestion source for trigger '{0}'")]
    NoSource(Trigger),

    /// Walking the workspace failed
    #[error("Workspace scan failed: {0}")]
    Scan(String),

    /// A background task did not finish
    #[error("Task failed: {0}")]
    Task(String),
}
