//! Animation task definitions

use std::fmt;

use serde::Serialize;

use crate::core::ItemId;

/// Kind of visual transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    /// First reveal of an item
    Entrance,
    /// Arrival flourish for a freshly added item
    New,
    /// Highlight pulse after an edit
    Update,
    /// Exit transition before the element is removed
    Remove,
}

impl AnimationKind {
    /// Priority used by the convenience submitters
    pub fn default_priority(self) -> Priority {
        match self {
            AnimationKind::Entrance => Priority::Low,
            AnimationKind::New | AnimationKind::Update => Priority::Medium,
            AnimationKind::Remove => Priority::High,
        }
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnimationKind::Entrance => "entrance",
            AnimationKind::New => "new",
            AnimationKind::Update => "update",
            AnimationKind::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// Scheduling priority; higher runs first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
}

/// Visual phase the render layer applies to an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// No transitional styling
    #[default]
    Idle,
    /// Starting state of the entrance reveal
    Entering,
    /// Target state of the entrance reveal
    Visible,
    /// Arrival flourish of a new item
    Arrival,
    /// Highlight pulse
    Pulse,
    /// Exit transition
    Removing,
    /// Finished; the item is never revealed again
    Done,
}

/// Callback run after a task completes
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// A queued visual transition for one item
pub struct AnimationTask {
    pub item: ItemId,
    pub kind: AnimationKind,
    pub priority: Priority,
    pub(crate) on_done: Option<Completion>,
}

impl AnimationTask {
    pub fn new(item: ItemId, kind: AnimationKind, priority: Priority) -> Self {
        Self {
            item,
            kind,
            priority,
            on_done: None,
        }
    }

    /// Attach a completion callback
    pub fn with_callback(mut self, on_done: impl FnOnce() + Send + 'static) -> Self {
        self.on_done = Some(Box::new(on_done));
        self
    }
}

impl fmt::Debug for AnimationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationTask")
            .field("item", &self.item)
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("has_callback", &self.on_done.is_some())
            .finish()
    }
}
