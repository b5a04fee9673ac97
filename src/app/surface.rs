//! Terminal-side item surface for the animation scheduler
//!
//! The scheduler worker writes phases here from its own task; the renderer
//! reads them every frame.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use crate::core::{Item, ItemId};
use crate::error::{GalleryError, Result};
use crate::scheduler::{ItemSurface, TransitionPhase};

#[derive(Default)]
struct SurfaceState {
    live: HashSet<ItemId>,
    phases: HashMap<ItemId, TransitionPhase>,
}

/// Phase table shared between the scheduler and the renderer
#[derive(Default)]
pub struct TerminalSurface {
    state: Mutex<SurfaceState>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the currently rendered items, dropping phases of gone ones
    pub fn sync(&self, items: &[Item]) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.live = items.iter().map(|i| i.id.clone()).collect();
        let SurfaceState { live, phases } = &mut *state;
        phases.retain(|id, _| live.contains(id));
    }

    /// Phase to draw the item with
    pub fn phase(&self, id: &ItemId) -> TransitionPhase {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .phases
            .get(id)
            .copied()
            .unwrap_or_default()
    }

    /// Whether any item is mid-transition (the loop redraws faster then)
    pub fn is_animating(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .phases
            .values()
            .any(|p| !matches!(p, TransitionPhase::Idle | TransitionPhase::Done))
    }
}

impl ItemSurface for TerminalSurface {
    fn is_live(&self, id: &ItemId) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .live
            .contains(id)
    }

    fn set_phase(&self, id: &ItemId, phase: TransitionPhase) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.live.contains(id) {
            return Err(GalleryError::surface(format!("item {} is not rendered", id)));
        }
        state.phases.insert(id.clone(), phase);
        Ok(())
    }
}
