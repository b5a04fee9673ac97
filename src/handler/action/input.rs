//! Text prompt handlers (upload paths, title, description)

use crossterm::event::KeyEvent;

use crate::core::{Mode, ModeController, Prompt, PromptKind};
use crate::handler::key::update_input_buffer;

/// Open the upload prompt
pub fn start_upload(controller: &mut ModeController) {
    let state = controller.state_mut();
    state.prompt = Some(Prompt::new(PromptKind::Upload, ""));
    state.set_message("Upload: image paths, quote any with spaces (Enter to send, Esc to cancel)");
}

/// Open a title or description prompt for the focused item, prefilled with
/// its current text. BrowseView only.
pub fn start_edit(controller: &mut ModeController, description: bool) {
    if controller.current_mode() != Mode::BrowseView {
        return;
    }
    let state = controller.state_mut();
    let Some(item) = state.focused() else {
        return;
    };
    let id = item.id.clone();
    let (kind, text) = if description {
        (PromptKind::Description(id), item.description.clone())
    } else {
        (PromptKind::Title(id), item.title.clone())
    };
    state.prompt = Some(Prompt::new(kind, text.unwrap_or_default()));
    state.set_message("Enter to save, Esc to cancel");
}

/// Close the prompt without submitting
pub fn cancel(controller: &mut ModeController) {
    let state = controller.state_mut();
    if state.prompt.take().is_some() {
        state.clear_message();
    }
}

/// Apply an editing key to the open prompt
pub fn update_prompt_buffer(controller: &mut ModeController, key: KeyEvent) {
    if let Some(prompt) = controller.state_mut().prompt.as_mut() {
        let input = &mut prompt.buffer;
        if let Some((text, cursor)) = update_input_buffer(key, &input.text, input.cursor) {
            input.text = text;
            input.cursor = cursor;
        }
    }
}
