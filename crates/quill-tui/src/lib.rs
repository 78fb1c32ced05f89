//! quill-tui: Terminal composer for quill.

pub mod app;
pub mod composer;
pub mod event;
pub mod icons;
pub mod popup;
pub mod runner;
mod theme;

pub use app::{App, ChatStyle};
pub use icons::IconCache;
pub use runner::run_tui;
