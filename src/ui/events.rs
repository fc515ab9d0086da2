// ============================================================================
// Event handling
// ============================================================================
// Polls crossterm for keyboard events with a tick fallback, plus small
// predicates the event loop matches on.
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Application-level events.
#[derive(Debug, Clone)]
pub enum Event {
    /// Key pressed.
    Key(KeyEvent),

    /// Regular tick (no input within the poll window).
    Tick,
}

/// Keyboard event source.
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Reads the next event, blocking at most 250 ms.
    ///
    /// Only key presses are forwarded; releases (reported on some platforms)
    /// and non-key events collapse into ticks.
    pub fn next(&self) -> Result<Event> {
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    Ok(Event::Key(key))
                }
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Key predicates
// ============================================================================

fn key_code(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) => Some(key.code),
        _ => None,
    }
}

/// 'q' : quit (two-step confirmation).
pub fn is_quit_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('q') | KeyCode::Char('Q')))
}

/// 's' : open the sell dialog for the selected holding.
pub fn is_sell_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('s') | KeyCode::Char('S')))
}

pub fn is_escape_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Esc))
}

pub fn is_enter_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Enter))
}

pub fn is_tab_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Tab))
}

pub fn is_backspace_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Backspace))
}

/// Up arrow or 'k' (vim).
pub fn is_up_event(event: &Event) -> bool {
    matches!(
        key_code(event),
        Some(KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K'))
    )
}

/// Down arrow or 'j' (vim).
pub fn is_down_event(event: &Event) -> bool {
    matches!(
        key_code(event),
        Some(KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J'))
    )
}

/// Digit or decimal point, the only characters the dialog inputs accept.
pub fn is_value_char_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char(c)) if c.is_ascii_digit() || c == '.')
}

/// Extracts the character of a key event, if any.
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match key_code(event)? {
        KeyCode::Char(c) => Some(c),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_quit_and_sell_predicates() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(is_sell_event(&key(KeyCode::Char('s'))));
        assert!(!is_quit_event(&key(KeyCode::Char('s'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_value_char_predicate() {
        assert!(is_value_char_event(&key(KeyCode::Char('7'))));
        assert!(is_value_char_event(&key(KeyCode::Char('.'))));
        assert!(!is_value_char_event(&key(KeyCode::Char('x'))));
        assert!(!is_value_char_event(&key(KeyCode::Enter)));
    }

    #[test]
    fn test_get_char_from_event() {
        assert_eq!(get_char_from_event(&key(KeyCode::Char('3'))), Some('3'));
        assert_eq!(get_char_from_event(&key(KeyCode::Enter)), None);
    }
}
