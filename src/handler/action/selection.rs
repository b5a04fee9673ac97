//! Mode and selection action handlers
//!
//! Handles EnterEdit, EnterSelect, StepBack, ToggleFocused, ToggleSelectAll,
//! ConfirmDelete, DeleteFocused, CancelPending

use crate::core::{Mode, ModeController};
use crate::handler::key::KeyAction;

/// Handle mode transitions and selection changes
pub fn handle(action: KeyAction, controller: &mut ModeController) {
    let transition = match action {
        KeyAction::EnterEdit => Some(controller.switch_to(Mode::BrowseView)),
        KeyAction::EnterSelect => Some(controller.switch_to(Mode::SelectView)),
        KeyAction::StepBack => Some(controller.step_back()),
        KeyAction::ToggleFocused => {
            let focused = controller.state().focused().map(|item| item.id.clone());
            if let Some(id) = focused {
                controller.toggle(&id);
            }
            None
        }
        KeyAction::ToggleSelectAll => {
            controller.toggle_select_all();
            None
        }
        KeyAction::ConfirmDelete => {
            controller.request_delete();
            None
        }
        KeyAction::DeleteFocused => {
            let focused = controller.state().focused().map(|item| item.id.clone());
            if let Some(id) = focused {
                controller.request_delete_item(&id);
            }
            None
        }
        KeyAction::CancelPending => {
            controller.cancel_pending();
            None
        }
        _ => None,
    };

    // Rejected transitions are silent
    if let Some(Err(e)) = transition {
        tracing::debug!(error = %e, "Ignored mode request");
    }
}
