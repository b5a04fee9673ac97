//! Unified error types for GalleryView
//!
//! Provides a consistent error handling approach across all modules.

use crate::core::{ItemId, Mode};

/// Unified error type for GalleryView operations
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    /// Requested mode change is a no-op or not an edge of the state machine
    #[error("Transition rejected: {from} -> {to}")]
    TransitionRejected { from: Mode, to: Mode },

    /// A persistence request failed (surfaced to the user, never retried)
    #[error("{operation} failed: {reason}")]
    NetworkOperationFailed { operation: String, reason: String },

    /// An animation task failed while executing
    #[error("Animation for {item} faulted: {reason}")]
    AnimationTaskFaulted { item: ItemId, reason: String },

    /// The render layer refused a visual update
    #[error("Surface error: {0}")]
    Surface(String),

    /// I/O errors (reading upload files, config, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed JSON payloads
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

/// Convenience Result type using GalleryError
pub type Result<T> = std::result::Result<T, GalleryError>;

impl GalleryError {
    /// Create a TransitionRejected error
    pub fn rejected(from: Mode, to: Mode) -> Self {
        Self::TransitionRejected { from, to }
    }

    /// Create a NetworkOperationFailed error
    pub fn network(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NetworkOperationFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create an AnimationTaskFaulted error
    pub fn animation(item: ItemId, reason: impl Into<String>) -> Self {
        Self::AnimationTaskFaulted {
            item,
            reason: reason.into(),
        }
    }

    /// Create a Surface error
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Create a Config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error is a silent state-machine rejection
    pub fn is_rejected_transition(&self) -> bool {
        matches!(self, Self::TransitionRejected { .. })
    }
}
