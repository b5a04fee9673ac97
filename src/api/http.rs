//! HTTP persistence adapter

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use super::{GalleryApi, OrderEntry, RemoteItem, TextUpdate};
use crate::core::ItemId;
use crate::error::{GalleryError, Result};

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Common response envelope of the gallery server
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    artworks: Vec<RemoteItem>,
}

fn default_success() -> bool {
    true
}

#[derive(Serialize)]
struct OrderBody<'a> {
    order: &'a [OrderEntry],
}

/// `GalleryApi` over the gallery server's HTTP endpoints
#[derive(Debug, Clone)]
pub struct HttpGalleryApi {
    client: Client,
    base_url: String,
}

impl HttpGalleryApi {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a response to the envelope, treating non-2xx and
    /// `"success": false` as failures of `operation`
    async fn settle(operation: &str, response: Response) -> Result<Envelope> {
        let status = response.status();
        let body = response.text().await?;
        let envelope: Option<Envelope> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let reason = envelope
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(GalleryError::network(operation, reason));
        }

        match envelope {
            Some(envelope) if !envelope.success => Err(GalleryError::network(
                operation,
                envelope
                    .message
                    .unwrap_or_else(|| "server reported failure".to_string()),
            )),
            Some(envelope) => Ok(envelope),
            // Form posts answer with a redirect page rather than JSON
            None => Ok(Envelope {
                success: true,
                message: None,
                artworks: Vec::new(),
            }),
        }
    }
}

/// MIME type guessed from the file extension
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

impl GalleryApi for HttpGalleryApi {
    async fn remove_item(&self, id: &ItemId) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!("/delete/{}", id)))
            .send()
            .await
            .map_err(|e| GalleryError::network("Delete", e.to_string()))?;
        Self::settle("Delete", response).await?;
        tracing::debug!(item = %id, "Deleted artwork");
        Ok(())
    }

    async fn reorder(&self, order: &[OrderEntry]) -> Result<()> {
        let response = self
            .client
            .post(self.url("/update-order"))
            .json(&OrderBody { order })
            .send()
            .await
            .map_err(|e| GalleryError::network("Reorder", e.to_string()))?;
        Self::settle("Reorder", response).await?;
        Ok(())
    }

    async fn upload(&self, path: &Path) -> Result<()> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(mime_for(path))?;
        let form = Form::new()
            .part("image", part)
            .text("title", "")
            .text("description", "");

        let response = self
            .client
            .post(self.url("/add"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| GalleryError::network("Upload", e.to_string()))?;
        Self::settle("Upload", response).await?;
        Ok(())
    }

    async fn update_text(&self, id: &ItemId, update: &TextUpdate) -> Result<()> {
        let response = self
            .client
            .patch(self.url(&format!("/api/artwork/{}/update-text", id)))
            .json(update)
            .send()
            .await
            .map_err(|e| GalleryError::network("Update", e.to_string()))?;
        Self::settle("Update", response).await?;
        tracing::debug!(item = %id, "Updated artwork text");
        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<RemoteItem>> {
        let response = self
            .client
            .get(self.url("/api/artworks"))
            .send()
            .await
            .map_err(|e| GalleryError::network("Load", e.to_string()))?;
        let envelope = Self::settle("Load", response).await?;
        Ok(envelope.artworks)
    }
}
