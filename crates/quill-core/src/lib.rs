//! quill-core: Document model, reference codec, and the chat input engine.

pub mod codec;
pub mod config;
pub mod document;
pub mod editor;
mod error;
pub mod guards;
pub mod references;
pub mod session;
pub mod state;
pub mod trigger;

pub use codec::{normalize, parse, serialize};
pub use config::{AgentEntry, Config, ConfigStore, PopupConfig};
pub use document::{Document, Inline, Mark, MarkKind};
pub use editor::{ChatInput, InputEvent, Key, KeyOutcome, NoopHandler, SuggestionHandler};
pub use error::QuillError;
pub use references::{referenced_files, references, Reference};
pub use session::{ActiveSession, Session, Suggestion, SuggestionRequest};
pub use state::{EditorState, Selection, Transaction};
pub use trigger::{Trigger, TriggerMatch};
