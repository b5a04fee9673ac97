//! Collaborators outside the core: persistence, notifications, viewer
//!
//! The core only sees these traits. `http` carries the one concrete
//! persistence adapter.

mod batch;
mod http;

pub use batch::BatchOutcome;
pub use http::{HttpGalleryApi, DEFAULT_TIMEOUT_SECS};

use std::fmt;
use std::future::Future;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::{Item, ItemId};
use crate::error::Result;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Short tag for the status line
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Success => "ok",
            Severity::Info => "info",
            Severity::Warning => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fire-and-forget user notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Full-screen viewer that needs its item index rebuilt when it is
/// allowed again
pub trait Viewer: Send + Sync {
    fn refresh(&self);
}

/// One entry of a full-order update; higher positions sort first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderEntry {
    pub id: ItemId,
    pub position: usize,
}

impl OrderEntry {
    /// Positions for an ordered id list: first gets `len`, last gets 1
    pub fn for_order(ids: &[ItemId]) -> Vec<OrderEntry> {
        let total = ids.len();
        ids.iter()
            .enumerate()
            .map(|(index, id)| OrderEntry {
                id: id.clone(),
                position: total - index,
            })
            .collect()
    }
}

/// Artwork record as the server reports it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteItem {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: ItemId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
}

/// Put server records into display order: highest position first.
///
/// The listing endpoint reports newest first, not display order. The sort
/// is stable and records without a position go last.
pub fn sort_by_position(items: &mut [RemoteItem]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.position));
}

/// New title and description for one artwork; `None` fields are left out
/// of the request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RemoteItem {
    /// Convert into a rendered item with fresh flags
    pub fn into_item(self) -> Item {
        Item {
            id: self.id,
            title: self.title,
            description: self.description,
            flags: Default::default(),
        }
    }
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<ItemId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => ItemId::new(n.to_string()),
        RawId::Text(s) => ItemId::new(s),
    })
}

/// Persistence endpoints. No method retries.
pub trait GalleryApi: Send + Sync {
    /// Delete one artwork
    fn remove_item(&self, id: &ItemId) -> impl Future<Output = Result<()>> + Send;

    /// Replace the whole display order
    fn reorder(&self, order: &[OrderEntry]) -> impl Future<Output = Result<()>> + Send;

    /// Upload one image file as a new artwork
    fn upload(&self, path: &Path) -> impl Future<Output = Result<()>> + Send;

    /// Change the title and/or description of one artwork
    fn update_text(
        &self,
        id: &ItemId,
        update: &TextUpdate,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Fetch every artwork. Order is the server's; see [`sort_by_position`]
    fn list_items(&self) -> impl Future<Output = Result<Vec<RemoteItem>>> + Send;
}
