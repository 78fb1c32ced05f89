//! quill-suggest: Suggestion sources (workspace files, agents) and routing.

pub mod builtin;
mod error;
pub mod icons;
pub mod registry;
pub mod score;
pub mod traits;

pub use builtin::agents::AgentSource;
pub use builtin::register_all;
pub use builtin::workspace::{DirEntry, FileEntry, WorkspaceIndex, WorkspaceSource};
pub use error::SuggestError;
pub use registry::SuggestionRegistry;
pub use traits::SuggestionSource;
