//! Key bindings: WASD (classic), arrows, and vim-style.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press. One event maps to exactly one action, so a
/// swap can never race a cursor move within the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    Swap,
    Pause,
    Quit,
    None,
}

/// Map key event to game action. Supports the classic layout (WASD +
/// space), arrows + enter, and vim (hjkl).
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p') => Action::Pause,
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Action::CursorLeft,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Action::CursorRight,
        KeyCode::Char(' ') | KeyCode::Enter => Action::Swap,
        _ => Action::None,
    }
}

impl Action {
    /// Cursor delta for directional actions.
    pub fn direction(self) -> Option<(i32, i32)> {
        match self {
            Action::CursorUp => Some((0, -1)),
            Action::CursorDown => Some((0, 1)),
            Action::CursorLeft => Some((-1, 0)),
            Action::CursorRight => Some((1, 0)),
            _ => None,
        }
    }
}
