//! Terminal event handling.

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use quill_core::Key;
use std::time::Duration;

/// Pointer actions the composer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Moved,
}

/// Terminal event types.
#[derive(Debug)]
pub enum TermEvent {
    /// A key was pressed.
    Key(KeyEvent),
    /// Bracketed paste.
    Paste(String),
    /// Left button press or pointer movement.
    Mouse {
        action: MouseAction,
        column: u16,
        row: u16,
    },
    /// Mouse scroll.
    MouseScroll(i16),
    FocusLost,
    /// Terminal was resized.
    Resize(u16, u16),
    /// No event (tick).
    Tick,
}

/// Poll for terminal events with a timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<TermEvent> {
    if !event::poll(timeout)? {
        return Ok(TermEvent::Tick);
    }
    let ev = match event::read()? {
        Event::Key(key) if key.kind != KeyEventKind::Release => TermEvent::Key(key),
        Event::Paste(text) => TermEvent::Paste(text),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => TermEvent::MouseScroll(-3),
            MouseEventKind::ScrollDown => TermEvent::MouseScroll(3),
            MouseEventKind::Down(MouseButton::Left) => TermEvent::Mouse {
                action: MouseAction::Down,
                column: mouse.column,
                row: mouse.row,
            },
            MouseEventKind::Moved => TermEvent::Mouse {
                action: MouseAction::Moved,
                column: mouse.column,
                row: mouse.row,
            },
            _ => TermEvent::Tick,
        },
        Event::FocusLost => TermEvent::FocusLost,
        Event::Resize(w, h) => TermEvent::Resize(w, h),
        _ => TermEvent::Tick,
    };
    Ok(ev)
}

/// Check if a key event is Ctrl+C.
pub fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Translate a terminal key into an editor key. Control and Alt chords
/// are left to the app.
pub fn to_input_key(key: &KeyEvent) -> Option<Key> {
    let chord = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    let mapped = match key.code {
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            Key::ShiftEnter
        }
        KeyCode::Enter => Key::Enter,
        KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::ShiftEnter,
        KeyCode::Char(_) if chord => return None,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_quit_chord() {
        assert!(is_quit(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            to_input_key(&key(KeyCode::Char('@'), KeyModifiers::SHIFT)),
            Some(Key::Char('@'))
        );
        assert_eq!(
            to_input_key(&key(KeyCode::Enter, KeyModifiers::SHIFT)),
            Some(Key::ShiftEnter)
        );
        assert_eq!(
            to_input_key(&key(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Some(Key::ShiftEnter)
        );
        assert_eq!(to_input_key(&key(KeyCode::Enter, KeyModifiers::NONE)), Some(Key::Enter));
        assert_eq!(to_input_key(&key(KeyCode::Char('a'), KeyModifiers::CONTROL)), None);
        assert_eq!(to_input_key(&key(KeyCode::F(2), KeyModifiers::NONE)), None);
    }
}
