//! Integration tests for quill.
//!
//! These drive the composer against real suggestion sources rooted in a
//! temporary workspace, without a terminal.

use quill_core::{
    normalize, references, ChatInput, Config, ConfigStore, InputEvent, Key, QuillError,
    Reference, SuggestionHandler, SuggestionRequest, Trigger,
};
use quill_suggest::SuggestionRegistry;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

// -- Handler that queues requests for the test to answer --

#[derive(Clone, Default)]
struct Queue {
    requests: Arc<Mutex<Vec<SuggestionRequest>>>,
}

impl SuggestionHandler for Queue {
    fn request_suggestions(&mut self, request: &SuggestionRequest) -> Result<(), QuillError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/main.rs"), "fn main() {}").unwrap();
    fs::write(dir.path().join("src/lib.rs"), "").unwrap();
    fs::write(dir.path().join("README.md"), "# demo").unwrap();
    dir
}

fn registry(root: &Path) -> SuggestionRegistry {
    let mut registry = SuggestionRegistry::new();
    quill_suggest::register_all(&mut registry, &Config::default(), root);
    registry
}

fn type_str(input: &mut ChatInput, text: &str) {
    for c in text.chars() {
        input.handle_key(Key::Char(c));
    }
}

/// Answer every queued request, oldest first.
async fn answer_all(queue: &Queue, registry: &SuggestionRegistry, input: &mut ChatInput) {
    let pending: Vec<SuggestionRequest> = queue.requests.lock().unwrap().drain(..).collect();
    for request in pending {
        let suggestions = registry.suggest(&request).await.unwrap_or_default();
        input.receive_suggestions(&request, suggestions);
    }
}

// -- Integration tests --

#[tokio::test]
async fn test_file_reference_end_to_end() {
    let dir = workspace();
    let registry = registry(dir.path());
    let queue = Queue::default();
    let mut input = ChatInput::new(&Config::default()).with_handler(Box::new(queue.clone()));

    type_str(&mut input, "look at #main");
    answer_all(&queue, &registry, &mut input).await;

    let index = input
        .session()
        .suggestions()
        .iter()
        .position(|s| s.value == "file:src/main.rs")
        .expect("main.rs is suggested");
    assert!(input.accept(index));
    assert_eq!(input.value(), "look at #file:src/main.rs ");
    assert!(!input.session().is_active());

    input.drain_events();
    input.handle_key(Key::Enter);
    let sent: Vec<String> = input
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            InputEvent::Send { value } => Some(value),
            _ => None,
        })
        .collect();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        references(&sent[0]),
        vec![Reference::File("src/main.rs".to_string())]
    );
}

#[tokio::test]
async fn test_agent_mention_end_to_end() {
    let dir = workspace();
    let registry = registry(dir.path());
    let queue = Queue::default();
    let mut input = ChatInput::new(&Config::default()).with_handler(Box::new(queue.clone()));

    type_str(&mut input, "@sea");
    answer_all(&queue, &registry, &mut input).await;
    assert_eq!(
        input.session().suggestions().first().map(|s| s.name.as_str()),
        Some("search")
    );

    input.handle_key(Key::Enter);
    assert_eq!(input.value(), "@search ");
    type_str(&mut input, "why?");
    assert_eq!(input.value(), "@search why?");
    assert_eq!(
        references(input.value()),
        vec![Reference::Mention("search".to_string())]
    );
}

#[tokio::test]
async fn test_stale_answer_is_ignored() {
    let dir = workspace();
    let registry = registry(dir.path());
    let queue = Queue::default();
    let mut input = ChatInput::new(&Config::default()).with_handler(Box::new(queue.clone()));

    type_str(&mut input, "#lib");
    let stale = SuggestionRequest::new(Trigger::Hashtag, "li");
    let answer = registry.suggest(&stale).await.unwrap();
    assert!(!input.receive_suggestions(&stale, answer));
}

#[tokio::test]
async fn test_unknown_root_yields_no_suggestions() {
    let registry = registry(Path::new("/definitely/not/here"));
    let request = SuggestionRequest::new(Trigger::Hashtag, "x");
    assert!(registry.suggest(&request).await.is_err());
}

#[test]
fn test_loaded_value_round_trips() {
    let value = "ask @reasoner about #file:src/lib.rs\nand #dir:src";
    let mut input = ChatInput::new(&Config::default());
    input.set_initial_value(value);
    assert_eq!(input.value(), normalize(value));
    assert_eq!(normalize(input.value()), input.value());
    assert_eq!(
        references(input.value()),
        vec![
            Reference::Mention("reasoner".to_string()),
            Reference::File("src/lib.rs".to_string()),
            Reference::Dir("src".to_string()),
        ]
    );
}

#[test]
fn test_config_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::at(dir.path().join("config.json"));
    let config = Config {
        placeholder: "Say something".to_string(),
        max_suggestions: 3,
        ..Config::default()
    };
    store.save(&config).unwrap();

    let loaded = store.load();
    assert_eq!(loaded.placeholder, "Say something");
    assert_eq!(loaded.max_suggestions, 3);
    assert_eq!(loaded.agents.len(), config.agents.len());
}
