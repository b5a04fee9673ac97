//! Mode-dependent chrome: headers, floating controls, layout offset
//!
//! Floating controls stash their visibility once when hidden and get it
//! back exactly once when restored. The stash is a single slot.

use serde::Deserialize;

/// Floating controls that edit modes hide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChromeElement {
    /// Light/dark theme switch
    ThemeToggle,
    /// Metadata viewer toggle
    MetadataToggle,
    /// Add-artwork button
    AddButton,
}

impl ChromeElement {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ChromeElement::ThemeToggle => "theme",
            ChromeElement::MetadataToggle => "metadata",
            ChromeElement::AddButton => "add",
        }
    }
}

/// A single element whose visibility can be stashed and restored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    visible: bool,
    previous: Option<bool>,
}

impl Control {
    /// Create a control with the given initial visibility
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            previous: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a visibility value is stashed
    pub fn has_snapshot(&self) -> bool {
        self.previous.is_some()
    }

    /// Hide, capturing the current visibility unless already captured
    pub fn hide(&mut self) {
        if self.previous.is_none() {
            self.previous = Some(self.visible);
        }
        self.visible = false;
    }

    /// Restore the captured visibility and clear the snapshot.
    /// Without a snapshot the control is simply shown.
    pub fn restore(&mut self) {
        self.visible = self.previous.take().unwrap_or(true);
    }

    /// Set visibility directly, discarding nothing
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Item and selection counters shown in the headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub total: usize,
    pub selected: usize,
}

/// All mode-dependent chrome
#[derive(Debug, Clone)]
pub struct Chrome {
    /// Primary "enter edit mode" control
    pub entry_control: Control,
    /// Header shown in BrowseView
    pub browse_header: Control,
    /// Header shown in SelectView
    pub select_header: Control,
    /// Bulk action bar (SelectView with a non-empty selection)
    pub action_bar: Control,
    /// Floating controls hidden during edit modes
    pub floating: Vec<(ChromeElement, Control)>,
    /// Rows currently reserved for a header
    pub layout_offset: u16,
    /// Offset captured when a header reserved space
    pub saved_offset: Option<u16>,
    /// Hover/transition effects are disabled
    pub animation_suppressed: bool,
    /// Label of the select-all button
    pub select_all_label: &'static str,
    /// Last refreshed counters
    pub counters: Counters,
}

pub const SELECT_ALL_LABEL: &str = "Select All";
pub const DESELECT_ALL_LABEL: &str = "Deselect All";

impl Chrome {
    /// Chrome for a freshly loaded gallery in Normal mode
    pub fn new(floating: &[ChromeElement]) -> Self {
        Self {
            entry_control: Control::new(true),
            browse_header: Control::new(false),
            select_header: Control::new(false),
            action_bar: Control::new(false),
            floating: floating.iter().map(|e| (*e, Control::new(true))).collect(),
            layout_offset: 0,
            saved_offset: None,
            animation_suppressed: false,
            select_all_label: SELECT_ALL_LABEL,
            counters: Counters::default(),
        }
    }

    /// Hide every floating control, stashing their visibility
    pub fn hide_floating(&mut self) {
        for (_, control) in &mut self.floating {
            control.hide();
        }
    }

    /// Restore every floating control from its stash
    pub fn restore_floating(&mut self) {
        for (_, control) in &mut self.floating {
            control.restore();
        }
    }

    /// Look up a floating control
    pub fn floating(&self, element: ChromeElement) -> Option<&Control> {
        self.floating
            .iter()
            .find(|(e, _)| *e == element)
            .map(|(_, c)| c)
    }

    /// Reserve rows for a header; the previous offset is captured once
    pub fn reserve_offset(&mut self, rows: u16) {
        if self.saved_offset.is_none() {
            self.saved_offset = Some(self.layout_offset);
        }
        self.layout_offset = rows;
    }

    /// Give back the reserved rows
    pub fn release_offset(&mut self) {
        if let Some(previous) = self.saved_offset.take() {
            self.layout_offset = previous;
        }
    }
}
