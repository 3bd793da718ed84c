use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::focus::Focus;
use crate::state::mode::Mode;

/// Everything the user can ask for. Keys are mapped to actions by
/// [`action_for`], and [`crate::app::App::dispatch`] carries them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    FocusNext,
    FocusPrev,
    FocusPane(Focus),
    MoveUp,
    MoveDown,
    Select,
    ToggleStar,
    CycleCategory,
    EditSearch,
    ToggleRegex,
    EnterInsert,
    LeaveInsert,
    CancelSend,
    HistoryBack,
    HistoryForward,
    ToggleHttps,
    Copy,
    Send,

    // Insert mode
    InsertChar(char),
    Newline,
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,
}

pub fn action_for(key: KeyEvent, mode: Mode, focus: Focus) -> Option<Action> {
    // Ctrl+R fires globally regardless of mode or focus
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('r') => Some(Action::Send),
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    match mode {
        Mode::Normal => normal_action(key, focus),
        Mode::Insert => insert_action(key, focus),
    }
}

fn normal_action(key: KeyEvent, focus: Focus) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Tab => Action::FocusNext,
        KeyCode::BackTab => Action::FocusPrev,
        KeyCode::Char(c @ '1'..='4') => Action::FocusPane(Focus::from_digit(c)?),
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Enter => match focus {
            Focus::RequestList => Action::Select,
            Focus::Filter => Action::EditSearch,
            Focus::Editor => Action::EnterInsert,
            Focus::Response => return None,
        },
        KeyCode::Char('s') => Action::ToggleStar,
        KeyCode::Char('c') => Action::CycleCategory,
        KeyCode::Char('/') => Action::EditSearch,
        KeyCode::Char('R') => Action::ToggleRegex,
        KeyCode::Char('i') => Action::EnterInsert,
        KeyCode::Esc => Action::CancelSend,
        KeyCode::Char('[') => Action::HistoryBack,
        KeyCode::Char(']') => Action::HistoryForward,
        KeyCode::Char('t') => Action::ToggleHttps,
        KeyCode::Char('y') => Action::Copy,
        _ => return None,
    };
    Some(action)
}

fn insert_action(key: KeyEvent, focus: Focus) -> Option<Action> {
    let action = match key.code {
        KeyCode::Esc => Action::LeaveInsert,
        KeyCode::Enter if focus == Focus::Filter => Action::LeaveInsert,
        KeyCode::Enter => Action::Newline,
        KeyCode::Char(c) => Action::InsertChar(c),
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::Delete,
        KeyCode::Left => Action::CursorLeft,
        KeyCode::Right => Action::CursorRight,
        KeyCode::Up => Action::CursorUp,
        KeyCode::Down => Action::CursorDown,
        KeyCode::Home => Action::CursorHome,
        KeyCode::End => Action::CursorEnd,
        _ => return None,
    };
    Some(action)
}
