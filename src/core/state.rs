//! Gallery state management

use serde::Serialize;

use super::{Chrome, ChromeElement, Item, ItemId, Mode, PendingAction, SelectionSet, ViewerGate};

/// Rows a mode header occupies by default
pub const DEFAULT_HEADER_ROWS: u16 = 3;

/// Single-line text input with a cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    pub text: String,
    pub cursor: usize,
}

impl InputBuffer {
    /// Buffer holding `text` with the cursor at its end
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }
}

/// What a text prompt collects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Image paths to upload
    Upload,
    /// New title for an artwork
    Title(ItemId),
    /// New description for an artwork
    Description(ItemId),
}

impl PromptKind {
    /// Popup title
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::Upload => "Upload images (space-separated paths)",
            PromptKind::Title(_) => "Edit title",
            PromptKind::Description(_) => "Edit description",
        }
    }
}

/// Open text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: InputBuffer,
}

impl Prompt {
    pub fn new(kind: PromptKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            buffer: InputBuffer::with_text(text),
        }
    }
}

/// Snapshot for diagnostics and `--status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub mode: Mode,
    pub selected_count: usize,
    pub total_items: usize,
}

/// Main gallery state; the single context object the controller mutates
#[derive(Debug, Clone)]
pub struct GalleryState {
    /// Current interaction mode
    pub mode: Mode,
    /// Rendered items in display order
    pub items: Vec<Item>,
    /// Selected ids (SelectView only)
    pub selection: SelectionSet,
    /// Headers, floating controls and layout offset
    pub chrome: Chrome,
    /// Full-screen viewer permission
    pub gate: ViewerGate,
    /// SelectView was entered since the last BrowseView notification
    pub was_in_select: bool,
    /// Confirmation overlay
    pub pending: Option<PendingAction>,
    /// Text prompt (upload paths, title or description)
    pub prompt: Option<Prompt>,
    /// Item shown in the full-screen viewer
    pub viewing: Option<ItemId>,
    /// Focused item index
    pub focus_index: usize,
    /// Top of viewport (scroll position)
    pub viewport_top: usize,
    /// Rows reserved for a mode header
    pub header_rows: u16,
    /// Status message
    pub message: Option<String>,
    /// Exit flag
    pub should_quit: bool,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self::new(
            Vec::new(),
            &[
                ChromeElement::ThemeToggle,
                ChromeElement::MetadataToggle,
                ChromeElement::AddButton,
            ],
        )
    }
}

impl GalleryState {
    /// Create state for a gallery in Normal mode
    pub fn new(items: Vec<Item>, floating: &[ChromeElement]) -> Self {
        let mut chrome = Chrome::new(floating);
        chrome.counters.total = items.len();
        Self {
            mode: Mode::Normal,
            items,
            selection: SelectionSet::new(),
            chrome,
            gate: ViewerGate::default(),
            was_in_select: false,
            pending: None,
            prompt: None,
            viewing: None,
            focus_index: 0,
            viewport_top: 0,
            header_rows: DEFAULT_HEADER_ROWS,
            message: None,
            should_quit: false,
        }
    }

    /// Position of an item in display order
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Item under the focus cursor
    pub fn focused(&self) -> Option<&Item> {
        self.items.get(self.focus_index)
    }

    /// Ids in display order
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Keep the focus index inside the item list
    pub fn clamp_focus(&mut self) {
        if self.items.is_empty() {
            self.focus_index = 0;
        } else if self.focus_index >= self.items.len() {
            self.focus_index = self.items.len() - 1;
        }
    }

    /// Adjust viewport to keep focus visible
    pub fn adjust_viewport(&mut self, visible_height: usize) {
        // A collapsed list still shows the focused row
        let visible_height = visible_height.max(1);
        if self.focus_index < self.viewport_top {
            self.viewport_top = self.focus_index;
        } else if self.focus_index >= self.viewport_top + visible_height {
            self.viewport_top = self.focus_index.saturating_sub(visible_height) + 1;
        }
    }

    /// Set status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Clear status message
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn stats(&self) -> Stats {
        Stats {
            mode: self.mode,
            selected_count: self.selection.len(),
            total_items: self.items.len(),
        }
    }
}
