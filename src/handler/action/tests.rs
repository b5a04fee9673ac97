//! Tests for action handlers

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::runtime::Handle;

use crate::api::{GalleryApi, OrderEntry, RemoteItem, TextUpdate};
use crate::core::{GalleryState, Item, ItemId, Mode, ModeController, PendingAction, PromptKind};
use crate::error::{GalleryError, Result};
use crate::handler::key::KeyAction;
use crate::scheduler::{AnimationScheduler, ItemSurface, SchedulerConfig, TransitionPhase};

use super::{
    delete_item, delete_selected, handle_action, move_selected, parse_upload_paths,
    update_prompt_buffer, upload_files, ActionContext, ActionResult,
};
use crate::core::Placement;

/// In-memory server
#[derive(Default)]
struct FakeApi {
    fail_remove: HashSet<ItemId>,
    fail_reorder: bool,
    fail_update: bool,
    removed: Mutex<Vec<ItemId>>,
    texts: Mutex<Vec<(ItemId, TextUpdate)>>,
    orders: Mutex<Vec<Vec<OrderEntry>>>,
    uploads: Mutex<Vec<PathBuf>>,
    listing: Mutex<Vec<RemoteItem>>,
}

impl FakeApi {
    fn failing_remove(ids: &[&str]) -> Self {
        Self {
            fail_remove: ids.iter().map(|id| ItemId::from(*id)).collect(),
            ..Default::default()
        }
    }

    fn set_listing(&self, ids: &[&str]) {
        let entries: Vec<(&str, Option<i64>)> = ids.iter().map(|id| (*id, None)).collect();
        self.set_listing_with_positions(&entries);
    }

    /// Listing in server order, each record with its stored position
    fn set_listing_with_positions(&self, entries: &[(&str, Option<i64>)]) {
        *self.listing.lock().unwrap() = entries
            .iter()
            .map(|(id, position)| RemoteItem {
                id: ItemId::from(*id),
                title: None,
                description: None,
                image_path: None,
                thumbnail_path: None,
                position: *position,
            })
            .collect();
    }
}

/// Surface that keeps every item rendered and records applied phases
#[derive(Default)]
struct RecordingSurface {
    log: Mutex<Vec<(ItemId, TransitionPhase)>>,
}

impl RecordingSurface {
    fn phases_for(&self, id: &str) -> Vec<TransitionPhase> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(item, _)| item.as_str() == id)
            .map(|(_, phase)| *phase)
            .collect()
    }
}

impl ItemSurface for RecordingSurface {
    fn is_live(&self, _id: &ItemId) -> bool {
        true
    }

    fn set_phase(&self, id: &ItemId, phase: TransitionPhase) -> Result<()> {
        self.log.lock().unwrap().push((id.clone(), phase));
        Ok(())
    }
}

fn with_scheduler(controller: ModeController) -> (ModeController, Arc<RecordingSurface>) {
    let surface = Arc::new(RecordingSurface::default());
    let scheduler = AnimationScheduler::new(
        surface.clone() as Arc<dyn ItemSurface>,
        SchedulerConfig::default(),
        Handle::current(),
    );
    (controller.with_scheduler(scheduler), surface)
}

impl GalleryApi for FakeApi {
    async fn remove_item(&self, id: &ItemId) -> Result<()> {
        if self.fail_remove.contains(id) {
            return Err(GalleryError::network("Delete", "HTTP 500"));
        }
        self.removed.lock().unwrap().push(id.clone());
        Ok(())
    }

    async fn reorder(&self, order: &[OrderEntry]) -> Result<()> {
        self.orders.lock().unwrap().push(order.to_vec());
        if self.fail_reorder {
            return Err(GalleryError::network("Reorder", "HTTP 500"));
        }
        Ok(())
    }

    async fn upload(&self, path: &Path) -> Result<()> {
        self.uploads.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn update_text(&self, id: &ItemId, update: &TextUpdate) -> Result<()> {
        if self.fail_update {
            return Err(GalleryError::network("Update", "HTTP 500"));
        }
        self.texts.lock().unwrap().push((id.clone(), update.clone()));
        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<RemoteItem>> {
        Ok(self.listing.lock().unwrap().clone())
    }
}

fn browse_view(items: Vec<Item>) -> ModeController {
    let mut controller = ModeController::new(GalleryState::new(items, &[]));
    controller.switch_to(Mode::BrowseView).unwrap();
    controller
}

fn type_text(controller: &mut ModeController, text: &str) {
    for c in text.chars() {
        update_prompt_buffer(controller, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
}

fn prompt_text(controller: &ModeController) -> String {
    controller
        .state()
        .prompt
        .as_ref()
        .map(|p| p.buffer.text.clone())
        .unwrap_or_default()
}

fn create_controller(ids: &[&str]) -> ModeController {
    let items = ids.iter().map(|id| Item::new(*id)).collect();
    ModeController::new(GalleryState::new(items, &[]))
}

fn select_view(ids: &[&str], selected: &[&str]) -> ModeController {
    let mut controller = create_controller(ids);
    controller.switch_to(Mode::BrowseView).unwrap();
    controller.switch_to(Mode::SelectView).unwrap();
    for id in selected {
        controller.toggle(&ItemId::from(*id));
    }
    controller
}

fn ids(controller: &ModeController) -> Vec<&str> {
    controller
        .state()
        .items
        .iter()
        .map(|i| i.id.as_str())
        .collect()
}

async fn run(action: KeyAction, controller: &mut ModeController, api: &FakeApi) -> ActionResult {
    handle_action(action, controller, api, &ActionContext::default())
        .await
        .unwrap()
}

#[test]
fn test_action_result_equality() {
    assert_eq!(ActionResult::Continue, ActionResult::Continue);
    assert_ne!(ActionResult::Continue, ActionResult::Quit);
}

#[test]
fn test_parse_upload_paths() {
    assert_eq!(
        parse_upload_paths("  a.png  dir/b.jpg "),
        vec![PathBuf::from("a.png"), PathBuf::from("dir/b.jpg")]
    );
    assert!(parse_upload_paths("   ").is_empty());
}

#[test]
fn test_parse_upload_paths_with_spaces() {
    assert_eq!(
        parse_upload_paths(r#""my art/sun set.png" 'b c.jpg' d\ e.gif f.png"#),
        vec![
            PathBuf::from("my art/sun set.png"),
            PathBuf::from("b c.jpg"),
            PathBuf::from("d e.gif"),
            PathBuf::from("f.png"),
        ]
    );
    // Backslashes that do not escape anything stay in the path
    assert_eq!(
        parse_upload_paths(r"C:\art\a.png"),
        vec![PathBuf::from(r"C:\art\a.png")]
    );
    assert_eq!(parse_upload_paths("''"), vec![PathBuf::from("")]);
}

#[tokio::test]
async fn test_quit() {
    let api = FakeApi::default();
    let mut controller = create_controller(&["1"]);
    assert_eq!(run(KeyAction::Quit, &mut controller, &api).await, ActionResult::Quit);
}

#[tokio::test]
async fn test_move_focus_is_clamped() {
    let api = FakeApi::default();
    let mut controller = create_controller(&["1", "2"]);

    run(KeyAction::MoveUp, &mut controller, &api).await;
    assert_eq!(controller.state().focus_index, 0);
    run(KeyAction::MoveDown, &mut controller, &api).await;
    run(KeyAction::MoveDown, &mut controller, &api).await;
    assert_eq!(controller.state().focus_index, 1);
}

#[tokio::test]
async fn test_enter_edit_then_select_then_back() {
    let api = FakeApi::default();
    let mut controller = create_controller(&["1"]);

    run(KeyAction::EnterEdit, &mut controller, &api).await;
    assert_eq!(controller.current_mode(), Mode::BrowseView);
    run(KeyAction::EnterSelect, &mut controller, &api).await;
    assert_eq!(controller.current_mode(), Mode::SelectView);
    run(KeyAction::StepBack, &mut controller, &api).await;
    assert_eq!(controller.current_mode(), Mode::BrowseView);
    run(KeyAction::StepBack, &mut controller, &api).await;
    assert_eq!(controller.current_mode(), Mode::Normal);
    // Escape in Normal is a silent no-op
    run(KeyAction::StepBack, &mut controller, &api).await;
    assert_eq!(controller.current_mode(), Mode::Normal);
}

#[tokio::test]
async fn test_toggle_focused() {
    let api = FakeApi::default();
    let mut controller = select_view(&["1", "2"], &[]);
    run(KeyAction::MoveDown, &mut controller, &api).await;
    run(KeyAction::ToggleFocused, &mut controller, &api).await;
    assert_eq!(controller.selected_items(), vec![ItemId::from("2")]);
}

#[tokio::test]
async fn test_viewer_gated_in_select_view() {
    let api = FakeApi::default();
    let mut controller = select_view(&["1"], &[]);
    run(KeyAction::OpenViewer, &mut controller, &api).await;
    assert!(controller.state().viewing.is_none());

    run(KeyAction::StepBack, &mut controller, &api).await;
    run(KeyAction::OpenViewer, &mut controller, &api).await;
    assert_eq!(controller.state().viewing, Some(ItemId::from("1")));
    run(KeyAction::CloseViewer, &mut controller, &api).await;
    assert!(controller.state().viewing.is_none());
}

#[tokio::test]
async fn test_viewer_follows_focus() {
    let api = FakeApi::default();
    let mut controller = create_controller(&["1", "2", "3"]);
    run(KeyAction::OpenViewer, &mut controller, &api).await;
    run(KeyAction::ViewerNext, &mut controller, &api).await;
    assert_eq!(controller.state().viewing, Some(ItemId::from("2")));
    run(KeyAction::ViewerPrev, &mut controller, &api).await;
    assert_eq!(controller.state().viewing, Some(ItemId::from("1")));
}

#[tokio::test]
async fn test_confirm_then_execute_delete() {
    let api = FakeApi::default();
    let mut controller = select_view(&["1", "2", "3"], &["1", "3"]);

    run(KeyAction::ConfirmDelete, &mut controller, &api).await;
    assert_eq!(
        controller.state().pending,
        Some(PendingAction::Delete { count: 2 })
    );
    run(KeyAction::ExecutePending, &mut controller, &api).await;

    assert_eq!(ids(&controller), vec!["2"]);
    assert_eq!(controller.current_mode(), Mode::BrowseView);
    assert!(controller.selected_items().is_empty());
    assert_eq!(api.removed.lock().unwrap().len(), 2);
    assert_eq!(
        controller.state().message.as_deref(),
        Some("Successfully deleted 2 items!")
    );
}

#[tokio::test]
async fn test_cancel_delete_keeps_items() {
    let api = FakeApi::default();
    let mut controller = select_view(&["1", "2"], &["1"]);

    run(KeyAction::ConfirmDelete, &mut controller, &api).await;
    run(KeyAction::CancelPending, &mut controller, &api).await;

    assert!(controller.state().pending.is_none());
    assert_eq!(ids(&controller), vec!["1", "2"]);
    assert_eq!(controller.current_mode(), Mode::SelectView);
    assert!(api.removed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_delete_failure() {
    let api = FakeApi::failing_remove(&["B"]);
    let mut controller = select_view(&["A", "B", "C", "D"], &["B", "D"]);

    let outcome = delete_selected(&mut controller, &api).await;

    assert_eq!(outcome.succeeded, vec![ItemId::from("D")]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(ids(&controller), vec!["A", "B", "C"]);
    assert!(controller.selected_items().is_empty());
    assert_eq!(controller.current_mode(), Mode::BrowseView);
    assert_eq!(
        controller.state().message.as_deref(),
        Some("Deleted 1 of 2 items; 1 failed")
    );
}

#[tokio::test]
async fn test_delete_outside_select_view_does_nothing() {
    let api = FakeApi::default();
    let mut controller = create_controller(&["1"]);
    let outcome = delete_selected(&mut controller, &api).await;
    assert_eq!(outcome.total(), 0);
    assert_eq!(controller.current_mode(), Mode::Normal);
}

#[tokio::test]
async fn test_move_to_top_persists_positions() {
    let api = FakeApi::default();
    let mut controller = select_view(&["A", "B", "C", "D"], &["B", "D"]);

    let moved = move_selected(&mut controller, &api, Placement::Top)
        .await
        .unwrap();

    assert_eq!(moved, 2);
    assert_eq!(ids(&controller), vec!["B", "D", "A", "C"]);
    let orders = api.orders.lock().unwrap();
    let sent: Vec<(&str, usize)> = orders[0]
        .iter()
        .map(|e| (e.id.as_str(), e.position))
        .collect();
    assert_eq!(sent, vec![("B", 4), ("D", 3), ("A", 2), ("C", 1)]);
    assert_eq!(controller.current_mode(), Mode::BrowseView);
    assert_eq!(
        controller.state().message.as_deref(),
        Some("2 items moved to top!")
    );
}

#[tokio::test]
async fn test_move_to_bottom() {
    let api = FakeApi::default();
    let mut controller = select_view(&["A", "B", "C"], &["A"]);
    run(KeyAction::MoveSelectionToBottom, &mut controller, &api).await;
    assert_eq!(ids(&controller), vec!["B", "C", "A"]);
}

#[tokio::test]
async fn test_failed_reorder_keeps_local_order_and_mode() {
    let api = FakeApi {
        fail_reorder: true,
        ..Default::default()
    };
    let mut controller = select_view(&["A", "B", "C"], &["C"]);

    let result = move_selected(&mut controller, &api, Placement::Top).await;

    assert!(result.is_err());
    assert_eq!(ids(&controller), vec!["C", "A", "B"]);
    assert!(controller.selected_items().is_empty());
    assert_eq!(controller.current_mode(), Mode::SelectView);
    assert_eq!(
        controller.state().message.as_deref(),
        Some("Failed to update order on server")
    );
}

#[tokio::test]
async fn test_reload_replaces_items() {
    let api = FakeApi::default();
    api.set_listing(&["9", "1"]);
    let mut controller = create_controller(&["1"]);

    run(KeyAction::Reload, &mut controller, &api).await;

    assert_eq!(ids(&controller), vec!["9", "1"]);
    assert_eq!(
        controller.state().message.as_deref(),
        Some("Loaded 2 artworks (1 new)")
    );
}

#[tokio::test]
async fn test_reload_orders_by_position_not_server_order() {
    let api = FakeApi::default();
    // Newest first, as the listing endpoint reports it
    api.set_listing_with_positions(&[("3", Some(1)), ("2", Some(3)), ("1", Some(2))]);
    let mut controller = create_controller(&[]);

    run(KeyAction::Reload, &mut controller, &api).await;

    assert_eq!(ids(&controller), vec!["2", "1", "3"]);
}

#[tokio::test]
async fn test_upload_prompt_flow() {
    let api = FakeApi::default();
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("sun set.png");
    std::fs::write(&image, b"png").unwrap();
    api.set_listing(&["1", "2"]);

    let mut controller = create_controller(&["1"]);
    run(KeyAction::EnterEdit, &mut controller, &api).await;
    run(KeyAction::StartUpload, &mut controller, &api).await;
    assert!(matches!(
        controller.state().prompt.as_ref().map(|p| &p.kind),
        Some(PromptKind::Upload)
    ));

    type_text(&mut controller, &format!("\"{}\"", image.display()));
    let value = prompt_text(&controller);
    run(KeyAction::SubmitInput { value }, &mut controller, &api).await;

    assert!(controller.state().prompt.is_none());
    assert_eq!(*api.uploads.lock().unwrap(), vec![image]);
    assert_eq!(ids(&controller), vec!["1", "2"]);
}

#[tokio::test]
async fn test_upload_rejects_non_images_and_reports_count() {
    let api = FakeApi::default();
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("a.jpg");
    let bad = dir.path().join("a.txt");
    std::fs::write(&good, b"jpg").unwrap();
    std::fs::write(&bad, b"txt").unwrap();
    api.set_listing(&["5"]);

    let mut controller = create_controller(&[]);
    let report = upload_files(&mut controller, &api, &[bad, good.clone()], 1024).await;

    assert_eq!(report.uploads.succeeded, vec![good]);
    assert_eq!(report.added, vec![ItemId::from("5")]);
    assert_eq!(
        controller.state().message.as_deref(),
        Some("Uploaded 1 of 1 images!")
    );
}

#[tokio::test]
async fn test_upload_nothing_valid() {
    let api = FakeApi::default();
    let mut controller = create_controller(&[]);
    let report = upload_files(&mut controller, &api, &[PathBuf::from("x.doc")], 1024).await;
    assert_eq!(report.uploads.total(), 0);
    assert!(api.uploads.lock().unwrap().is_empty());
    assert_eq!(
        controller.state().message.as_deref(),
        Some("No valid images to upload")
    );
}

#[tokio::test]
async fn test_cancel_upload_prompt() {
    let api = FakeApi::default();
    let mut controller = create_controller(&["1"]);
    run(KeyAction::EnterEdit, &mut controller, &api).await;
    run(KeyAction::StartUpload, &mut controller, &api).await;
    run(KeyAction::CancelInput, &mut controller, &api).await;
    assert!(controller.state().prompt.is_none());
}

#[tokio::test]
async fn test_delete_focused_asks_first() {
    let api = FakeApi::default();
    let mut controller = browse_view(vec![Item::new("1"), Item::new("2").with_title("Dusk")]);

    run(KeyAction::MoveDown, &mut controller, &api).await;
    run(KeyAction::DeleteFocused, &mut controller, &api).await;
    assert_eq!(
        controller.state().pending,
        Some(PendingAction::DeleteItem {
            id: ItemId::from("2"),
            title: "Dusk".to_string()
        })
    );

    run(KeyAction::CancelPending, &mut controller, &api).await;
    assert_eq!(ids(&controller), vec!["1", "2"]);
    assert!(api.removed.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_single_delete_plays_exit_then_removes() {
    let api = FakeApi::default();
    let (mut controller, surface) =
        with_scheduler(browse_view(vec![Item::new("1"), Item::new("2")]));

    run(KeyAction::DeleteFocused, &mut controller, &api).await;
    run(KeyAction::ExecutePending, &mut controller, &api).await;

    assert_eq!(*api.removed.lock().unwrap(), vec![ItemId::from("1")]);
    assert_eq!(
        surface.phases_for("1"),
        vec![TransitionPhase::Idle, TransitionPhase::Removing]
    );
    assert_eq!(ids(&controller), vec!["2"]);
    assert_eq!(controller.current_mode(), Mode::BrowseView);
    assert_eq!(controller.state().message.as_deref(), Some("Artwork deleted"));
}

#[tokio::test(start_paused = true)]
async fn test_single_delete_failure_keeps_item_without_exit() {
    let api = FakeApi::failing_remove(&["1"]);
    let (mut controller, surface) = with_scheduler(browse_view(vec![Item::new("1")]));

    let result = delete_item(&mut controller, &api, &ItemId::from("1")).await;

    assert!(result.is_err());
    assert_eq!(ids(&controller), vec!["1"]);
    assert!(surface.phases_for("1").is_empty());
    assert_eq!(
        controller.state().message.as_deref(),
        Some("Failed to delete artwork")
    );
}

#[tokio::test(start_paused = true)]
async fn test_edit_title_saves_and_pulses() {
    let api = FakeApi::default();
    let (mut controller, surface) =
        with_scheduler(browse_view(vec![Item::new("7").with_title("Dawn")]));

    run(KeyAction::EditTitle, &mut controller, &api).await;
    assert_eq!(prompt_text(&controller), "Dawn");
    type_text(&mut controller, " II");
    let value = prompt_text(&controller);
    run(KeyAction::SubmitInput { value }, &mut controller, &api).await;

    assert_eq!(
        *api.texts.lock().unwrap(),
        vec![(
            ItemId::from("7"),
            TextUpdate {
                title: Some("Dawn II".to_string()),
                description: None,
            }
        )]
    );
    assert_eq!(controller.state().items[0].title.as_deref(), Some("Dawn II"));
    assert!(controller.state().prompt.is_none());
    assert_eq!(controller.state().message.as_deref(), Some("Artwork updated"));

    let scheduler = controller.scheduler().unwrap().clone();
    while scheduler.is_processing() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(surface.phases_for("7").contains(&TransitionPhase::Pulse));
}

#[tokio::test]
async fn test_clearing_description_sends_empty_text() {
    let api = FakeApi::default();
    let item = Item::new("7").with_title("Dawn");
    let mut controller = browse_view(vec![Item {
        description: Some("old".to_string()),
        ..item
    }]);

    run(KeyAction::EditDescription, &mut controller, &api).await;
    assert_eq!(prompt_text(&controller), "old");
    for _ in 0..3 {
        update_prompt_buffer(
            &mut controller,
            KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE),
        );
    }
    run(KeyAction::SubmitInput { value: prompt_text(&controller) }, &mut controller, &api).await;

    let texts = api.texts.lock().unwrap();
    assert_eq!(texts[0].1.description.as_deref(), Some(""));
    assert!(texts[0].1.title.is_none());
    assert!(controller.state().items[0].description.is_none());
    assert_eq!(controller.state().items[0].title.as_deref(), Some("Dawn"));
}

#[tokio::test]
async fn test_failed_edit_keeps_old_text() {
    let api = FakeApi {
        fail_update: true,
        ..Default::default()
    };
    let mut controller = browse_view(vec![Item::new("7").with_title("Dawn")]);

    run(KeyAction::EditTitle, &mut controller, &api).await;
    type_text(&mut controller, "!");
    run(KeyAction::SubmitInput { value: prompt_text(&controller) }, &mut controller, &api).await;

    assert_eq!(controller.state().items[0].title.as_deref(), Some("Dawn"));
    assert_eq!(
        controller.state().message.as_deref(),
        Some("Failed to update artwork")
    );
}

#[tokio::test]
async fn test_edit_prompt_needs_browse_view() {
    let api = FakeApi::default();
    let mut controller = create_controller(&["1"]);
    run(KeyAction::EditTitle, &mut controller, &api).await;
    assert!(controller.state().prompt.is_none());
    run(KeyAction::DeleteFocused, &mut controller, &api).await;
    assert!(controller.state().pending.is_none());
}
