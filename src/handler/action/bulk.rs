//! Bulk operation handlers
//!
//! Handles delete, move-to-top/bottom, batch upload and reload, plus the
//! single-item delete and text edit. Each takes the controller by `&mut`,
//! so two operations never overlap.

use std::path::{Path, PathBuf};

use futures_util::stream::{FuturesUnordered, StreamExt};

use crate::api::{
    sort_by_position, BatchOutcome, GalleryApi, OrderEntry, RemoteItem, Severity, TextUpdate,
};
use crate::core::{ItemId, Mode, ModeController, PendingAction, Placement};
use crate::error::Result;

/// File extensions accepted for upload
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Default upload size limit (15 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 15 * 1024 * 1024;

/// Why a file was not staged for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NotAnImage,
    TooLarge { bytes: u64 },
    Unreadable(String),
}

/// Files sorted into accepted and rejected
#[derive(Debug, Default)]
pub struct StagedUpload {
    pub accepted: Vec<PathBuf>,
    pub rejected: Vec<(PathBuf, RejectReason)>,
}

/// Result of a batch upload
#[derive(Debug)]
pub struct UploadReport {
    pub uploads: BatchOutcome<PathBuf>,
    /// Ids that appeared after the reload
    pub added: Vec<ItemId>,
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let ext = e.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Check type and size of every candidate file
pub async fn stage_uploads(paths: &[PathBuf], max_bytes: u64) -> StagedUpload {
    let mut staged = StagedUpload::default();
    for path in paths {
        if !is_image(path) {
            staged
                .rejected
                .push((path.clone(), RejectReason::NotAnImage));
            continue;
        }
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.len() > max_bytes => staged.rejected.push((
                path.clone(),
                RejectReason::TooLarge { bytes: meta.len() },
            )),
            Ok(_) => staged.accepted.push(path.clone()),
            Err(e) => staged
                .rejected
                .push((path.clone(), RejectReason::Unreadable(e.to_string()))),
        }
    }
    staged
}

/// Run the confirmed pending action
pub async fn execute_pending<A: GalleryApi>(controller: &mut ModeController, api: &A) {
    match controller.take_pending() {
        Some(PendingAction::Delete { .. }) => {
            delete_selected(controller, api).await;
        }
        Some(PendingAction::DeleteItem { id, .. }) => {
            // Failure is already reported to the user
            let _ = delete_item(controller, api, &id).await;
        }
        None => {}
    }
}

/// Delete every selected item.
///
/// Requests run concurrently and each success removes its item at once.
/// Afterwards the selection is cleared and the mode returns to BrowseView,
/// whatever failed. Failures are reported, not rolled back.
pub async fn delete_selected<A: GalleryApi>(
    controller: &mut ModeController,
    api: &A,
) -> BatchOutcome<ItemId> {
    let mut outcome = BatchOutcome::default();
    let ids = controller.selected_items();
    if controller.current_mode() != Mode::SelectView || ids.is_empty() {
        return outcome;
    }

    let count = ids.len();
    controller.notify(format!("Deleting {} items...", count), Severity::Info);

    let mut requests: FuturesUnordered<_> = ids
        .into_iter()
        .map(|id| async move {
            let result = api.remove_item(&id).await;
            (id, result)
        })
        .collect();

    while let Some((id, result)) = requests.next().await {
        match &result {
            Ok(()) => {
                controller.remove_item(&id);
            }
            Err(e) => tracing::warn!(item = %id, error = %e, "Delete failed"),
        }
        outcome.record(id, result);
    }

    controller.clear_selection();
    if let Err(e) = controller.switch_to(Mode::BrowseView) {
        tracing::debug!(error = %e, "Already out of select mode");
    }

    let failed = outcome.failed.len();
    if outcome.is_complete_success() {
        controller.notify(
            format!("Successfully deleted {} items!", count),
            Severity::Success,
        );
    } else if outcome.is_total_failure() {
        controller.notify(format!("Failed to delete {} items", failed), Severity::Error);
    } else {
        controller.notify(
            format!(
                "Deleted {} of {} items; {} failed",
                outcome.succeeded.len(),
                count,
                failed
            ),
            Severity::Warning,
        );
    }
    tracing::info!(
        deleted = outcome.succeeded.len(),
        failed,
        "Bulk delete finished"
    );
    outcome
}

/// Delete one artwork.
///
/// The server is asked first. On success the item plays its exit
/// transition and is dropped once that finishes; on failure it stays.
pub async fn delete_item<A: GalleryApi>(
    controller: &mut ModeController,
    api: &A,
    id: &ItemId,
) -> Result<()> {
    if let Err(e) = api.remove_item(id).await {
        tracing::warn!(item = %id, error = %e, "Delete failed");
        controller.notify("Failed to delete artwork", Severity::Error);
        return Err(e);
    }

    let exit = controller
        .scheduler()
        .map(|scheduler| scheduler.animate_remove(id.clone()));
    if let Some(exit) = exit {
        exit.await;
    }
    controller.remove_item(id);
    controller.notify("Artwork deleted", Severity::Success);
    Ok(())
}

/// Save a new title and/or description, then pulse the item.
/// The rendered text only changes once the server accepted it.
pub async fn update_item_text<A: GalleryApi>(
    controller: &mut ModeController,
    api: &A,
    id: &ItemId,
    update: TextUpdate,
) -> Result<()> {
    if let Err(e) = api.update_text(id, &update).await {
        tracing::warn!(item = %id, error = %e, "Update failed");
        controller.notify("Failed to update artwork", Severity::Error);
        return Err(e);
    }

    controller.apply_text(id, update.title.as_deref(), update.description.as_deref());
    if let Some(scheduler) = controller.scheduler() {
        scheduler.animate_update(id.clone());
    }
    controller.notify("Artwork updated", Severity::Success);
    Ok(())
}

/// Move the selection to one end and persist the whole order.
///
/// On failure the local order stays reassembled, the selection is cleared
/// and the mode stays SelectView.
pub async fn move_selected<A: GalleryApi>(
    controller: &mut ModeController,
    api: &A,
    placement: Placement,
) -> Result<usize> {
    let count = controller.selected_items().len();
    if controller.current_mode() != Mode::SelectView || count == 0 {
        return Ok(0);
    }

    let order = controller.arrange_selected(placement);
    let entries = OrderEntry::for_order(&order);

    match api.reorder(&entries).await {
        Ok(()) => {
            controller.clear_selection();
            if let Err(e) = controller.switch_to(Mode::BrowseView) {
                tracing::debug!(error = %e, "Already out of select mode");
            }
            controller.notify(
                format!("{} items moved to {}!", count, placement.display_name()),
                Severity::Success,
            );
            Ok(count)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Reorder failed");
            controller.clear_selection();
            controller.notify("Failed to update order on server", Severity::Error);
            Err(e)
        }
    }
}

/// Fetch the item list and sync the rendered collection in position order.
/// Returns the ids that were not rendered before.
pub async fn reload_items<A: GalleryApi>(
    controller: &mut ModeController,
    api: &A,
) -> Result<Vec<ItemId>> {
    match api.list_items().await {
        Ok(mut remote) => {
            sort_by_position(&mut remote);
            let items = remote.into_iter().map(RemoteItem::into_item).collect();
            Ok(controller.replace_items(items))
        }
        Err(e) => {
            controller.notify("Failed to load artworks", Severity::Error);
            Err(e)
        }
    }
}

/// Upload images one after another, then reload and animate the arrivals
pub async fn upload_files<A: GalleryApi>(
    controller: &mut ModeController,
    api: &A,
    paths: &[PathBuf],
    max_bytes: u64,
) -> UploadReport {
    let staged = stage_uploads(paths, max_bytes).await;
    let mut report = UploadReport {
        uploads: BatchOutcome::default(),
        added: Vec::new(),
    };

    for (path, reason) in &staged.rejected {
        let message = match reason {
            RejectReason::NotAnImage => format!("{}: not an image file", file_name(path)),
            RejectReason::TooLarge { bytes } => format!(
                "{}: too large ({:.1} MB, max {} MB)",
                file_name(path),
                *bytes as f64 / (1024.0 * 1024.0),
                max_bytes / (1024 * 1024)
            ),
            RejectReason::Unreadable(e) => format!("{}: {}", file_name(path), e),
        };
        controller.notify(message, Severity::Warning);
    }

    if staged.accepted.is_empty() {
        controller.notify("No valid images to upload", Severity::Warning);
        return report;
    }

    let total = staged.accepted.len();
    controller.notify(format!("Uploading {} images...", total), Severity::Info);
    for path in staged.accepted {
        let result = api.upload(&path).await;
        if let Err(e) = &result {
            tracing::warn!(file = %path.display(), error = %e, "Upload failed");
        }
        report.uploads.record(path, result);
    }

    let uploaded = report.uploads.succeeded.len();
    let severity = if uploaded == total {
        Severity::Success
    } else if uploaded == 0 {
        Severity::Error
    } else {
        Severity::Warning
    };
    controller.notify(format!("Uploaded {} of {} images!", uploaded, total), severity);

    if uploaded > 0 {
        if let Ok(added) = reload_items(controller, api).await {
            if let Some(scheduler) = controller.scheduler() {
                for id in &added {
                    scheduler.animate_new(id.clone());
                }
            }
            report.added = added;
        }
    }
    report
}
