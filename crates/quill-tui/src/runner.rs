//! TUI runner: sets up the terminal and runs the main loop.
//!
//! Suggestion requests leave the engine through a channel and are
//! answered by background tokio tasks, so the composer stays responsive
//! while the workspace is scanned.

use crate::app::App;
use crate::event::{is_quit, poll_event, TermEvent};
use crossterm::event::{
    DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use quill_core::{Config, QuillError, Suggestion, SuggestionHandler, SuggestionRequest};
use quill_suggest::{SuggestError, SuggestionRegistry};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use std::io::stdout;
use std::time::Duration;

/// Forwards engine requests to the runner.
pub struct ChannelHandler {
    tx: mpsc::UnboundedSender<SuggestionRequest>,
}

impl ChannelHandler {
    pub fn new(tx: mpsc::UnboundedSender<SuggestionRequest>) -> Self {
        Self { tx }
    }
}

impl SuggestionHandler for ChannelHandler {
    fn request_suggestions(&mut self, request: &SuggestionRequest) -> Result<(), QuillError> {
        self.tx
            .send(request.clone())
            .map_err(|_| QuillError::SuggestionSource("suggestion worker stopped".to_string()))
    }
}

/// A finished lookup, tagged with the request it answers.
type Answer = (SuggestionRequest, Result<Vec<Suggestion>, SuggestError>);

/// Answer every queued request in the background.
fn dispatch_requests(
    registry: &SuggestionRegistry,
    requests: &mut mpsc::UnboundedReceiver<SuggestionRequest>,
    answers: &mpsc::UnboundedSender<Answer>,
) {
    while let Ok(request) = requests.try_recv() {
        let registry = registry.clone();
        let answers = answers.clone();
        tokio::spawn(async move {
            let result = registry.suggest(&request).await;
            let _ = answers.send((request, result));
        });
    }
}

/// Hand a finished lookup to the engine. Failures become an empty list.
pub fn deliver(app: &mut App, request: SuggestionRequest, result: Result<Vec<Suggestion>, SuggestError>) {
    let suggestions = match result {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(error = %e, query = %request.query, "suggestion lookup failed");
            Vec::new()
        }
    };
    app.input.receive_suggestions(&request, suggestions);
}

/// Run the TUI application.
pub async fn run_tui(
    config: Config,
    registry: SuggestionRegistry,
    workspace: &str,
) -> std::io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    stdout().execute(EnableBracketedPaste)?;
    stdout().execute(EnableFocusChange)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<SuggestionRequest>();
    let (answer_tx, mut answer_rx) = mpsc::unbounded_channel::<Answer>();

    let mut app = App::new(&config, workspace);
    app.input
        .set_handler(Box::new(ChannelHandler::new(request_tx)));
    app.handle_slash_command("/help");

    // Main loop
    while app.running {
        dispatch_requests(&registry, &mut request_rx, &answer_tx);
        while let Ok((request, result)) = answer_rx.try_recv() {
            deliver(&mut app, request, result);
        }
        for value in app.process_events() {
            tracing::info!(len = value.len(), "message submitted");
        }

        terminal.draw(|frame| app.render(frame))?;

        match poll_event(Duration::from_millis(50))? {
            TermEvent::Key(key) => {
                if is_quit(&key) {
                    app.running = false;
                    continue;
                }
                app.handle_key(key);
            }
            TermEvent::Paste(text) => app.handle_paste(&text),
            TermEvent::Mouse {
                action,
                column,
                row,
            } => app.handle_mouse(action, column, row),
            TermEvent::MouseScroll(delta) => {
                if delta < 0 {
                    app.auto_scroll = false;
                    app.scroll_offset = app.scroll_offset.saturating_sub((-delta) as u16);
                } else {
                    app.scroll_offset = app.scroll_offset.saturating_add(delta as u16);
                }
            }
            TermEvent::FocusLost => app.focus_lost(),
            TermEvent::Resize(_, _) => {}
            TermEvent::Tick => {}
        }
    }

    app.input.dispose();

    // Cleanup
    disable_raw_mode()?;
    stdout().execute(DisableFocusChange)?;
    stdout().execute(DisableBracketedPaste)?;
    stdout().execute(DisableMouseCapture)?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::Trigger;

    #[test]
    fn test_channel_handler_forwards_requests() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handler = ChannelHandler::new(tx);
        let request = SuggestionRequest::new(Trigger::Hashtag, "src");
        handler.request_suggestions(&request).unwrap();
        assert_eq!(rx.try_recv().unwrap(), request);

        drop(rx);
        assert!(handler.request_suggestions(&request).is_err());
    }

    #[tokio::test]
    async fn test_round_trip_through_registry() {
        let mut registry = SuggestionRegistry::new();
        quill_suggest::register_all(
            &mut registry,
            &Config::default(),
            std::path::Path::new("."),
        );

        let (request_tx, mut request_rx) = mpsc::unbounded_channel();
        let (answer_tx, mut answer_rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::default(), ".");
        app.input.set_handler(Box::new(ChannelHandler::new(request_tx)));

        for c in "@reason".chars() {
            app.input.handle_key(quill_core::Key::Char(c));
        }
        dispatch_requests(&registry, &mut request_rx, &answer_tx);
        drop(answer_tx);
        while let Some((request, result)) = answer_rx.recv().await {
            deliver(&mut app, request, result);
        }

        let names: Vec<&str> = app
            .input
            .session()
            .suggestions()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names.first(), Some(&"reasoner"));
    }

    #[test]
    fn test_failed_lookup_leaves_empty_list() {
        let mut app = App::new(&Config::default(), ".");
        for c in "#x".chars() {
            app.input.handle_key(quill_core::Key::Char(c));
        }
        let request = SuggestionRequest::new(Trigger::Hashtag, "x");
        deliver(
            &mut app,
            request,
            Err(SuggestError::NoSource(Trigger::Hashtag)),
        );
        assert!(app.input.session().is_active());
        assert!(app.input.session().suggestions().is_empty());
    }
}
