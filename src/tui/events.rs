use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    OpenPreview,
    Back,
    Refresh,
    PreviewScrollUp,
    PreviewScrollDown,
    OpenEditor,
    Input(char),
    DeleteChar,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
    {
        return Ok(key_to_action(key));
    }
    Ok(Action::None)
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Selection
        (KeyCode::Tab, _) => Action::MoveDown,
        (KeyCode::BackTab, _) => Action::MoveUp,
        (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::Up, _) => Action::MoveUp,

        // Preview
        (KeyCode::Enter, _) => Action::OpenPreview,
        (KeyCode::Esc, _) => Action::Back,
        (KeyCode::Char('k'), KeyModifiers::CONTROL) => Action::PreviewScrollUp,
        (KeyCode::Char('j'), KeyModifiers::CONTROL) => Action::PreviewScrollDown,

        // Index lifecycle
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Action::Refresh,
        (KeyCode::Char('o'), KeyModifiers::CONTROL) => Action::OpenEditor,

        // Query input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::Input(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}
