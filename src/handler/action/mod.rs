//! Action execution handler
//!
//! This module handles the execution of KeyActions, translating them into
//! controller calls and persistence requests.

mod bulk;
mod input;
mod navigation;
mod selection;

pub use bulk::{
    delete_item, delete_selected, execute_pending, move_selected, reload_items, stage_uploads,
    update_item_text, upload_files, RejectReason, StagedUpload, UploadReport,
    DEFAULT_MAX_UPLOAD_BYTES, IMAGE_EXTENSIONS,
};
pub use input::update_prompt_buffer;

use std::path::PathBuf;

use crate::api::{GalleryApi, TextUpdate};
use crate::core::{ModeController, Placement, PromptKind};
use crate::handler::key::KeyAction;

/// Result of action execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    /// Continue the event loop
    Continue,
    /// Leave the event loop
    Quit,
}

/// Settings the handlers need (extracted from Config)
#[derive(Debug, Clone)]
pub struct ActionContext {
    /// Largest file accepted for upload
    pub max_upload_bytes: u64,
}

impl Default for ActionContext {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Split the upload prompt into paths.
///
/// Paths are separated by whitespace. A path containing spaces can be
/// quoted ('...' or "...") or have its spaces escaped with a backslash, as
/// terminals do for dropped files. Other backslashes are kept.
pub fn parse_upload_paths(value: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    in_token = true;
                }
                '\\' => {
                    match chars.next_if(|n| n.is_whitespace() || matches!(n, '"' | '\'' | '\\')) {
                        Some(escaped) => current.push(escaped),
                        None => current.push(c),
                    }
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        paths.push(PathBuf::from(std::mem::take(&mut current)));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }
    if in_token {
        paths.push(PathBuf::from(current));
    }
    paths
}

/// Handle a KeyAction and update the controller accordingly
pub async fn handle_action<A: GalleryApi>(
    action: KeyAction,
    controller: &mut ModeController,
    api: &A,
    context: &ActionContext,
) -> anyhow::Result<ActionResult> {
    match action {
        // No action
        KeyAction::None => {}

        // App control
        KeyAction::Quit => return Ok(ActionResult::Quit),

        // Navigation and viewer
        KeyAction::MoveUp
        | KeyAction::MoveDown
        | KeyAction::OpenViewer
        | KeyAction::CloseViewer
        | KeyAction::ViewerPrev
        | KeyAction::ViewerNext => navigation::handle(action, controller),

        // Mode and selection
        KeyAction::EnterEdit
        | KeyAction::EnterSelect
        | KeyAction::StepBack
        | KeyAction::ToggleFocused
        | KeyAction::ToggleSelectAll
        | KeyAction::ConfirmDelete
        | KeyAction::DeleteFocused
        | KeyAction::CancelPending => selection::handle(action, controller),

        // Bulk operations
        KeyAction::ExecutePending => execute_pending(controller, api).await,
        KeyAction::MoveSelectionToTop => {
            // Failure is already reported to the user
            let _ = move_selected(controller, api, Placement::Top).await;
        }
        KeyAction::MoveSelectionToBottom => {
            let _ = move_selected(controller, api, Placement::Bottom).await;
        }
        KeyAction::Reload => {
            if let Ok(added) = reload_items(controller, api).await {
                let total = controller.state().items.len();
                controller
                    .state_mut()
                    .set_message(format!("Loaded {} artworks ({} new)", total, added.len()));
            }
        }

        // Text prompts
        KeyAction::StartUpload => input::start_upload(controller),
        KeyAction::EditTitle => input::start_edit(controller, false),
        KeyAction::EditDescription => input::start_edit(controller, true),
        KeyAction::CancelInput => input::cancel(controller),
        KeyAction::SubmitInput { value } => {
            let Some(prompt) = controller.state_mut().prompt.take() else {
                return Ok(ActionResult::Continue);
            };
            match prompt.kind {
                PromptKind::Upload => {
                    let paths = parse_upload_paths(&value);
                    upload_files(controller, api, &paths, context.max_upload_bytes).await;
                }
                PromptKind::Title(id) => {
                    let update = TextUpdate {
                        title: Some(value),
                        description: None,
                    };
                    let _ = update_item_text(controller, api, &id, update).await;
                }
                PromptKind::Description(id) => {
                    let update = TextUpdate {
                        title: None,
                        description: Some(value),
                    };
                    let _ = update_item_text(controller, api, &id, update).await;
                }
            }
        }
    }
    Ok(ActionResult::Continue)
}

#[cfg(test)]
mod tests;
