//! Gallery item identity and per-item visual flags

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a rendered artwork
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Visual state the core tracks for each rendered item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFlags {
    /// Reflects membership in the selection set
    pub selected: bool,
    /// A selection checkbox is attached
    pub has_affordance: bool,
    /// Direct pointer interaction on the imagery is disabled
    pub pointer_suppressed: bool,
}

/// A rendered gallery item
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub flags: ItemFlags,
}

impl Item {
    /// Create an item with no metadata
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            flags: ItemFlags::default(),
        }
    }

    /// Attach a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title for display, falling back to the id
    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => format!("Untitled #{}", self.id),
        }
    }
}
