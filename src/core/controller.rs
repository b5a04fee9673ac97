//! Mode state machine
//!
//! `ModeController` is the only writer of `GalleryState::mode`. A
//! transition runs every exit action of the old mode before any entry
//! action of the new one, and `&mut self` keeps transitions from
//! interleaving.

use std::collections::HashSet;
use std::sync::Arc;

use super::chrome::{DESELECT_ALL_LABEL, SELECT_ALL_LABEL};
use super::{GalleryState, Item, ItemId, Mode, PendingAction, Stats};
use crate::api::{Notifier, Severity, Viewer};
use crate::error::{GalleryError, Result};
use crate::scheduler::AnimationScheduler;

pub const MSG_RETURNED_NORMAL: &str = "Returned to normal gallery view";
pub const MSG_RETURNED_BROWSE: &str = "Returned to edit view mode";
pub const MSG_BROWSE_HINT: &str =
    "Edit Mode: Click thumbnails to open lightbox, or use \"Select\" for batch operations";
pub const MSG_SELECT_HINT: &str =
    "Select Mode: Click thumbnails to select/deselect. Lightbox disabled. Use \"Cancel\" to return.";

/// Where a reorder puts the selected items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Top,
    Bottom,
}

impl Placement {
    pub fn display_name(&self) -> &'static str {
        match self {
            Placement::Top => "top",
            Placement::Bottom => "bottom",
        }
    }
}

/// Owns the gallery state and drives every mode transition
pub struct ModeController {
    state: GalleryState,
    notifier: Option<Arc<dyn Notifier>>,
    viewer: Option<Arc<dyn Viewer>>,
    scheduler: Option<AnimationScheduler>,
}

impl ModeController {
    pub fn new(state: GalleryState) -> Self {
        Self {
            state,
            notifier: None,
            viewer: None,
            scheduler: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_viewer(mut self, viewer: Arc<dyn Viewer>) -> Self {
        self.viewer = Some(viewer);
        self
    }

    pub fn with_scheduler(mut self, scheduler: AnimationScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    /// Mutable access for focus and input bookkeeping. Mode and selection
    /// changes go through the controller methods.
    pub(crate) fn state_mut(&mut self) -> &mut GalleryState {
        &mut self.state
    }

    pub fn scheduler(&self) -> Option<&AnimationScheduler> {
        self.scheduler.as_ref()
    }

    pub fn current_mode(&self) -> Mode {
        self.state.mode
    }

    /// Selected ids in selection order
    pub fn selected_items(&self) -> Vec<ItemId> {
        self.state.selection.to_vec()
    }

    pub fn stats(&self) -> Stats {
        self.state.stats()
    }

    /// Show a message on the status line and forward it to the notifier
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        match severity {
            Severity::Error => tracing::warn!(%severity, "{}", message),
            _ => tracing::info!(%severity, "{}", message),
        }
        if let Some(notifier) = &self.notifier {
            notifier.notify(&message, severity);
        }
        self.state.set_message(message);
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Move to `target`, running exit actions then entry actions.
    ///
    /// Same-mode requests and non-edges return `TransitionRejected`
    /// without touching any state.
    pub fn switch_to(&mut self, target: Mode) -> Result<()> {
        let from = self.state.mode;
        if !from.can_switch_to(target) {
            tracing::debug!(%from, to = %target, "Transition rejected");
            return Err(GalleryError::rejected(from, target));
        }

        self.exit_actions(from, target);
        self.state.mode = target;
        self.entry_actions(target);

        tracing::debug!(%from, to = %target, "Mode transition");
        Ok(())
    }

    /// One hop toward Normal (Escape)
    pub fn step_back(&mut self) -> Result<()> {
        let from = self.state.mode;
        match from.parent() {
            Some(parent) => self.switch_to(parent),
            None => Err(GalleryError::rejected(from, from)),
        }
    }

    fn exit_actions(&mut self, from: Mode, target: Mode) {
        self.state.pending = None;
        self.state.prompt = None;

        self.state.selection.clear();
        for item in &mut self.state.items {
            item.flags.selected = false;
            item.flags.has_affordance = false;
        }

        let chrome = &mut self.state.chrome;
        chrome.browse_header.set_visible(false);
        chrome.select_header.set_visible(false);
        chrome.action_bar.set_visible(false);
        if target == Mode::Normal {
            chrome.restore_floating();
        }
        chrome.animation_suppressed = false;
        chrome.release_offset();

        if from == Mode::SelectView {
            self.reopen_gate();
        }
    }

    fn entry_actions(&mut self, target: Mode) {
        match target {
            Mode::Normal => {
                self.state.chrome.entry_control.set_visible(true);
                self.notify(MSG_RETURNED_NORMAL, Severity::Success);
            }
            Mode::BrowseView => {
                self.enter_edit_layout();
                self.state.chrome.browse_header.set_visible(true);
                self.refresh_counters();

                if std::mem::take(&mut self.state.was_in_select) {
                    self.notify(MSG_RETURNED_BROWSE, Severity::Success);
                } else {
                    self.notify(MSG_BROWSE_HINT, Severity::Info);
                }
            }
            Mode::SelectView => {
                self.enter_edit_layout();
                self.state.chrome.browse_header.set_visible(false);
                self.state.chrome.select_header.set_visible(true);
                self.attach_affordances();
                self.state.gate.close();
                self.state.viewing = None;
                self.refresh_counters();
                self.state.chrome.select_all_label = SELECT_ALL_LABEL;
                self.update_action_bar();

                self.state.was_in_select = true;
                self.notify(MSG_SELECT_HINT, Severity::Info);
            }
        }
    }

    /// Layout shared by both edit modes
    fn enter_edit_layout(&mut self) {
        let rows = self.state.header_rows;
        let chrome = &mut self.state.chrome;
        chrome.hide_floating();
        chrome.entry_control.set_visible(false);
        chrome.reserve_offset(rows);
        chrome.animation_suppressed = true;
    }

    fn attach_affordances(&mut self) {
        for item in &mut self.state.items {
            item.flags.has_affordance = true;
            item.flags.pointer_suppressed = true;
        }
    }

    fn reopen_gate(&mut self) {
        if self.state.gate.open() {
            for item in &mut self.state.items {
                item.flags.pointer_suppressed = false;
            }
            if let Some(viewer) = &self.viewer {
                viewer.refresh();
            }
        }
    }

    // ------------------------------------------------------------------
    // Viewer gate
    // ------------------------------------------------------------------

    /// Whether the full-screen viewer may open right now
    pub fn viewer_allowed(&self) -> bool {
        self.state.gate.is_open() && self.state.mode != Mode::SelectView
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Flip membership of a rendered item. Returns the new membership, or
    /// `None` when ignored (wrong mode or unknown id).
    pub fn toggle(&mut self, id: &ItemId) -> Option<bool> {
        if self.state.mode != Mode::SelectView {
            return None;
        }
        let index = self.state.index_of(id)?;

        let selected = self.state.selection.toggle(id);
        self.state.items[index].flags.selected = selected;
        self.refresh_counters();
        self.update_action_bar();
        self.update_select_all_label();
        Some(selected)
    }

    /// Select everything, or deselect everything if all are selected
    pub fn toggle_select_all(&mut self) {
        if self.state.mode != Mode::SelectView {
            return;
        }

        if self.state.selection.len() == self.state.items.len() {
            self.clear_selection();
            return;
        }

        for item in &mut self.state.items {
            self.state.selection.insert(item.id.clone());
            item.flags.selected = true;
        }
        self.refresh_counters();
        self.update_action_bar();
        self.update_select_all_label();
    }

    /// Empty the selection and reset every item's selected flag
    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
        for item in &mut self.state.items {
            item.flags.selected = false;
        }
        self.refresh_counters();
        self.update_action_bar();
        self.update_select_all_label();
    }

    /// Recompute the header counters
    pub fn refresh_counters(&mut self) {
        let counters = &mut self.state.chrome.counters;
        counters.total = self.state.items.len();
        counters.selected = self.state.selection.len();
    }

    /// Action bar is visible iff SelectView with a non-empty selection
    pub fn update_action_bar(&mut self) {
        let visible = self.state.mode == Mode::SelectView && !self.state.selection.is_empty();
        self.state.chrome.action_bar.set_visible(visible);
    }

    fn update_select_all_label(&mut self) {
        let all = !self.state.items.is_empty()
            && self.state.selection.len() == self.state.items.len();
        self.state.chrome.select_all_label = if all {
            DESELECT_ALL_LABEL
        } else {
            SELECT_ALL_LABEL
        };
    }

    // ------------------------------------------------------------------
    // Confirmation
    // ------------------------------------------------------------------

    /// Ask for confirmation before deleting the selection
    pub fn request_delete(&mut self) -> bool {
        if self.state.mode != Mode::SelectView || self.state.selection.is_empty() {
            return false;
        }
        let count = self.state.selection.len();
        self.state.pending = Some(PendingAction::Delete { count });
        self.state
            .set_message(format!("Delete {} selected items? (y/n)", count));
        true
    }

    /// Ask for confirmation before deleting one artwork (BrowseView only)
    pub fn request_delete_item(&mut self, id: &ItemId) -> bool {
        if self.state.mode != Mode::BrowseView {
            return false;
        }
        let Some(item) = self.state.item(id) else {
            return false;
        };
        let title = item.display_title();
        self.state.set_message(format!("Delete \"{}\"? (y/n)", title));
        self.state.pending = Some(PendingAction::DeleteItem {
            id: id.clone(),
            title,
        });
        true
    }

    /// Store edited text on a rendered item; blank text clears the field
    pub fn apply_text(
        &mut self,
        id: &ItemId,
        title: Option<&str>,
        description: Option<&str>,
    ) -> bool {
        let Some(item) = self.state.item_mut(id) else {
            return false;
        };
        let normalize = |text: &str| {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        };
        if let Some(title) = title {
            item.title = normalize(title);
        }
        if let Some(description) = description {
            item.description = normalize(description);
        }
        true
    }

    /// Take the pending action for execution
    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.state.pending.take()
    }

    pub fn cancel_pending(&mut self) {
        if self.state.pending.take().is_some() {
            self.state.set_message("Cancelled");
        }
    }

    // ------------------------------------------------------------------
    // Item collection
    // ------------------------------------------------------------------

    /// Replace the rendered collection. Returns ids that were not rendered
    /// before.
    pub fn replace_items(&mut self, mut items: Vec<Item>) -> Vec<ItemId> {
        let previous: HashSet<ItemId> = self.state.items.iter().map(|i| i.id.clone()).collect();
        let rendered: HashSet<ItemId> = items.iter().map(|i| i.id.clone()).collect();

        let added: Vec<ItemId> = items
            .iter()
            .filter(|i| !previous.contains(&i.id))
            .map(|i| i.id.clone())
            .collect();

        if let Some(scheduler) = &self.scheduler {
            for gone in previous.difference(&rendered) {
                scheduler.cancel(gone);
            }
        }

        self.state.selection.retain(|id| rendered.contains(id));
        let editing_select = self.state.mode == Mode::SelectView;
        for item in &mut items {
            item.flags.selected = self.state.selection.contains(&item.id);
            item.flags.has_affordance = editing_select;
            item.flags.pointer_suppressed = editing_select;
        }
        self.state.items = items;
        self.state.clamp_focus();

        self.refresh_counters();
        self.update_action_bar();
        self.update_select_all_label();
        added
    }

    /// Drop one rendered item. Returns false if it was not rendered.
    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        let Some(index) = self.state.index_of(id) else {
            return false;
        };
        self.state.items.remove(index);
        self.state.selection.remove(id);
        if let Some(scheduler) = &self.scheduler {
            scheduler.cancel(id);
        }
        self.state.clamp_focus();
        self.refresh_counters();
        self.update_action_bar();
        true
    }

    /// Reassemble the display order with the selection at one end.
    /// Relative order inside both groups is kept. Returns the new order.
    pub fn arrange_selected(&mut self, placement: Placement) -> Vec<ItemId> {
        let items = std::mem::take(&mut self.state.items);
        let (selected, rest): (Vec<Item>, Vec<Item>) = items
            .into_iter()
            .partition(|item| self.state.selection.contains(&item.id));

        self.state.items = match placement {
            Placement::Top => selected.into_iter().chain(rest).collect(),
            Placement::Bottom => rest.into_iter().chain(selected).collect(),
        };
        self.state.item_ids()
    }
}
