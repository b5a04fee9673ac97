//! Interaction mode definitions

use std::fmt;

use serde::Serialize;

use super::ItemId;

/// Current interaction mode of the gallery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Regular gallery with the edit entry control
    #[default]
    Normal,
    /// Edit view: compact grid, viewer allowed
    BrowseView,
    /// Edit select: checkboxes, viewer gated
    SelectView,
}

impl Mode {
    /// Whether `self -> target` is an edge of the state machine
    pub fn can_switch_to(self, target: Mode) -> bool {
        matches!(
            (self, target),
            (Mode::Normal, Mode::BrowseView)
                | (Mode::BrowseView, Mode::Normal)
                | (Mode::BrowseView, Mode::SelectView)
                | (Mode::SelectView, Mode::BrowseView)
        )
    }

    /// The mode one level closer to Normal (Escape)
    pub fn parent(self) -> Option<Mode> {
        match self {
            Mode::Normal => None,
            Mode::BrowseView => Some(Mode::Normal),
            Mode::SelectView => Some(Mode::BrowseView),
        }
    }

    /// Whether this is one of the edit modes
    pub fn is_editing(self) -> bool {
        self != Mode::Normal
    }

    /// Get display name for the status bar
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "Gallery",
            Mode::BrowseView => "Edit",
            Mode::SelectView => "Select",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Normal => "normal",
            Mode::BrowseView => "browse-view",
            Mode::SelectView => "select-view",
        };
        f.write_str(name)
    }
}

/// Action pending confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Delete the current selection
    Delete { count: usize },
    /// Delete one artwork from BrowseView
    DeleteItem { id: ItemId, title: String },
}
