//! Error types for the quill-core crate.

/// Core error type.
///
/// Engine operations never return this to the host; it is used by
/// configuration saving and suggestion handlers.
#[derive(Debug, thiserror::Error)]
pub enum QuillError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The suggestion source could not take the request
    #[error("Suggestion source unavailable: {0}")]
    SuggestionSource(String),
}
