//! Navigation and viewer handlers
//!
//! Handles MoveUp, MoveDown, OpenViewer, CloseViewer, ViewerPrev, ViewerNext

use crate::core::ModeController;
use crate::handler::key::KeyAction;

/// Handle navigation actions
pub fn handle(action: KeyAction, controller: &mut ModeController) {
    match action {
        KeyAction::MoveUp => move_focus(controller, -1),
        KeyAction::MoveDown => move_focus(controller, 1),
        KeyAction::OpenViewer => open_viewer(controller),
        KeyAction::CloseViewer => {
            controller.state_mut().viewing = None;
        }
        KeyAction::ViewerPrev => {
            move_focus(controller, -1);
            follow_focus(controller);
        }
        KeyAction::ViewerNext => {
            move_focus(controller, 1);
            follow_focus(controller);
        }
        _ => {}
    }
}

fn move_focus(controller: &mut ModeController, delta: isize) {
    let state = controller.state_mut();
    let last = state.items.len().saturating_sub(1);
    state.focus_index = state.focus_index.saturating_add_signed(delta).min(last);
}

/// Keep the viewer on the focused item
fn follow_focus(controller: &mut ModeController) {
    let focused = controller.state().focused().map(|item| item.id.clone());
    let state = controller.state_mut();
    if state.viewing.is_some() {
        state.viewing = focused;
    }
}

fn open_viewer(controller: &mut ModeController) {
    if !controller.viewer_allowed() {
        controller
            .state_mut()
            .set_message("Viewer disabled in select mode");
        return;
    }
    let focused = controller.state().focused().map(|item| item.id.clone());
    if let Some(id) = focused {
        tracing::debug!(item = %id, "Opening viewer");
        controller.state_mut().viewing = Some(id);
    }
}
