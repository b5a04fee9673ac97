//! Best-effort batch results

use crate::error::GalleryError;

/// Per-key results of a batch where each request settles on its own
#[derive(Debug)]
pub struct BatchOutcome<K> {
    pub succeeded: Vec<K>,
    pub failed: Vec<(K, GalleryError)>,
}

impl<K> Default for BatchOutcome<K> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<K> BatchOutcome<K> {
    pub fn record(&mut self, key: K, result: crate::error::Result<()>) {
        match result {
            Ok(()) => self.succeeded.push(key),
            Err(e) => self.failed.push((key, e)),
        }
    }

    /// Number of requests that settled
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Every request failed (and at least one was made)
    pub fn is_total_failure(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }
}
