//! Core module - Gallery state, interaction modes and the mode controller

pub mod chrome;
pub mod controller;
pub mod gate;
pub mod item;
pub mod mode;
pub mod selection;
pub mod state;

pub use chrome::{Chrome, ChromeElement, Control, Counters};
pub use controller::{ModeController, Placement};
pub use gate::ViewerGate;
pub use item::{Item, ItemFlags, ItemId};
pub use mode::{Mode, PendingAction};
pub use selection::SelectionSet;
pub use state::{GalleryState, InputBuffer, Prompt, PromptKind, Stats, DEFAULT_HEADER_ROWS};
