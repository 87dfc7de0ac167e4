mod modal;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::App;
use super::text_input::TextInput;

/// Handle a key event: alert first, then the open dialog, then the screen
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.alert.is_some() {
        app.alert = None;
        return;
    }

    if app.modal.is_some() {
        modal::handle_modal(app, key);
        return;
    }

    navigate::handle_navigate(app, key);
}

/// Apply a line-editing key to `input`. Returns false when the key is not an
/// editing key.
fn edit_text(input: &mut TextInput, key: KeyEvent) -> bool {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => input.insert(c),
        (_, KeyCode::Backspace) => input.backspace(),
        (_, KeyCode::Delete) => input.delete(),
        (_, KeyCode::Left) => input.left(),
        (_, KeyCode::Right) => input.right(),
        (_, KeyCode::Home) => input.home(),
        (_, KeyCode::End) => input.end(),
        _ => return false,
    }
    true
}
