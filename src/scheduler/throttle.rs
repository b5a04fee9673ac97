//! Rate limiting for duplicate-submission diagnostics

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use super::task::AnimationKind;
use crate::core::ItemId;

/// Entries kept before stale keys are pruned
const PRUNE_THRESHOLD: usize = 64;

/// Remembers when a duplicate was last reported per (item, kind)
#[derive(Debug)]
pub struct DuplicateThrottle {
    window: Duration,
    last_seen: HashMap<(ItemId, AnimationKind), Instant>,
}

impl DuplicateThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    /// Whether a duplicate for this key should be reported at `now`
    pub fn should_report(&mut self, item: &ItemId, kind: AnimationKind, now: Instant) -> bool {
        if self.last_seen.len() > PRUNE_THRESHOLD {
            let window = self.window;
            self.last_seen
                .retain(|_, seen| now.saturating_duration_since(*seen) <= window);
        }

        let key = (item.clone(), kind);
        match self.last_seen.get(&key) {
            Some(seen) if now.saturating_duration_since(*seen) <= self.window => false,
            _ => {
                self.last_seen.insert(key, now);
                true
            }
        }
    }

    pub fn tracked(&self) -> usize {
        self.last_seen.len()
    }
}
