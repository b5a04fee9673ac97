//! Permission for the full-screen viewer

/// Whether the external viewer may activate.
///
/// This is the single authoritative flag; the controller additionally
/// refuses while the mode is SelectView.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerGate {
    open: bool,
}

impl Default for ViewerGate {
    fn default() -> Self {
        Self { open: true }
    }
}

impl ViewerGate {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Close the gate; returns true if it was open
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    /// Open the gate; returns true on a closed -> open transition
    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.open, true)
    }
}
