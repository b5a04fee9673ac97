//! Keyboard event handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::{GalleryState, Mode};

/// Actions that can result from key handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Quit the application
    Quit,
    /// Move focus up
    MoveUp,
    /// Move focus down
    MoveDown,
    /// Enter BrowseView from Normal
    EnterEdit,
    /// Enter SelectView from BrowseView
    EnterSelect,
    /// One level back toward Normal
    StepBack,
    /// Toggle selection of the focused item
    ToggleFocused,
    /// Select all, or deselect all when everything is selected
    ToggleSelectAll,
    /// Start delete confirmation
    ConfirmDelete,
    /// Execute the pending confirmation
    ExecutePending,
    /// Drop the pending confirmation
    CancelPending,
    /// Move the selection to the top of the gallery
    MoveSelectionToTop,
    /// Move the selection to the bottom of the gallery
    MoveSelectionToBottom,
    /// Open the focused item full-screen
    OpenViewer,
    /// Close the full-screen viewer
    CloseViewer,
    /// Previous item in the viewer
    ViewerPrev,
    /// Next item in the viewer
    ViewerNext,
    /// Reload items from the server
    Reload,
    /// Ask to delete the focused item
    DeleteFocused,
    /// Start the upload path prompt
    StartUpload,
    /// Start editing the focused item's title
    EditTitle,
    /// Start editing the focused item's description
    EditDescription,
    /// Submit the open prompt
    SubmitInput { value: String },
    /// Close the open prompt
    CancelInput,
}

/// Handle key event and return the resulting action
pub fn handle_key_event(state: &GalleryState, key: KeyEvent) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }

    if state.pending.is_some() {
        return handle_confirm_mode(key);
    }
    if let Some(prompt) = &state.prompt {
        return handle_input_mode(key, &prompt.buffer.text);
    }
    if state.viewing.is_some() {
        return handle_viewer_mode(key);
    }

    match state.mode {
        Mode::Normal => handle_normal_mode(key),
        Mode::BrowseView => handle_browse_mode(key),
        Mode::SelectView => handle_select_mode(state, key),
    }
}

/// Keys shared by every mode
fn handle_common(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Up | KeyCode::Char('k') => KeyAction::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => KeyAction::MoveDown,
        KeyCode::Char('r') | KeyCode::F(5) => KeyAction::Reload,
        _ => KeyAction::None,
    }
}

fn handle_normal_mode(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('e') => KeyAction::EnterEdit,
        KeyCode::Enter => KeyAction::OpenViewer,
        _ => handle_common(key),
    }
}

fn handle_browse_mode(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => KeyAction::StepBack,
        KeyCode::Char('s') => KeyAction::EnterSelect,
        KeyCode::Char('a') => KeyAction::StartUpload,
        KeyCode::Char('n') => KeyAction::EditTitle,
        KeyCode::Char('c') => KeyAction::EditDescription,
        KeyCode::Char('d') | KeyCode::Delete => KeyAction::DeleteFocused,
        KeyCode::Enter => KeyAction::OpenViewer,
        _ => handle_common(key),
    }
}

fn handle_select_mode(state: &GalleryState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => KeyAction::StepBack,
        // Ctrl+A (Cmd+A arrives as SUPER on terminals that report it)
        KeyCode::Char('a')
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER) =>
        {
            KeyAction::ToggleSelectAll
        }
        KeyCode::Char(' ') => KeyAction::ToggleFocused,
        KeyCode::Delete | KeyCode::Char('D') if !state.selection.is_empty() => {
            KeyAction::ConfirmDelete
        }
        KeyCode::Char('t') => KeyAction::MoveSelectionToTop,
        KeyCode::Char('b') => KeyAction::MoveSelectionToBottom,
        // Viewer is gated in this mode
        KeyCode::Enter => KeyAction::ToggleFocused,
        _ => handle_common(key),
    }
}

/// Handle keys in confirm mode
fn handle_confirm_mode(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => KeyAction::ExecutePending,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => KeyAction::CancelPending,
        _ => KeyAction::None,
    }
}

/// Handle keys in a text prompt
fn handle_input_mode(key: KeyEvent, current_buffer: &str) -> KeyAction {
    match key.code {
        KeyCode::Enter => KeyAction::SubmitInput {
            value: current_buffer.to_string(),
        },
        KeyCode::Esc => KeyAction::CancelInput,
        _ => KeyAction::None, // Buffer updates handled separately
    }
}

/// Handle keys in the full-screen viewer
fn handle_viewer_mode(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => KeyAction::CloseViewer,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
            KeyAction::ViewerPrev
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
            KeyAction::ViewerNext
        }
        _ => KeyAction::None,
    }
}

/// Update input buffer based on key event
/// Returns the new buffer content, or None if no change
pub fn update_input_buffer(key: KeyEvent, buffer: &str, cursor: usize) -> Option<(String, usize)> {
    match key.code {
        KeyCode::Char(c) => {
            let mut new_buffer = buffer.to_string();
            new_buffer.insert(cursor, c);
            Some((new_buffer, cursor + c.len_utf8()))
        }
        KeyCode::Backspace => {
            let prev = buffer[..cursor].chars().next_back()?;
            let mut new_buffer = buffer.to_string();
            let at = cursor - prev.len_utf8();
            new_buffer.remove(at);
            Some((new_buffer, at))
        }
        KeyCode::Delete => {
            if cursor < buffer.len() {
                let mut new_buffer = buffer.to_string();
                new_buffer.remove(cursor);
                Some((new_buffer, cursor))
            } else {
                None
            }
        }
        KeyCode::Left => {
            let prev = buffer[..cursor].chars().next_back()?;
            Some((buffer.to_string(), cursor - prev.len_utf8()))
        }
        KeyCode::Right => {
            let next = buffer[cursor..].chars().next()?;
            Some((buffer.to_string(), cursor + next.len_utf8()))
        }
        KeyCode::Home => (cursor > 0).then(|| (buffer.to_string(), 0)),
        KeyCode::End => (cursor < buffer.len()).then(|| (buffer.to_string(), buffer.len())),
        _ => None,
    }
}
