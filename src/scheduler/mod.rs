//! Animation scheduler
//!
//! Serializes per-item visual transitions. At most one task per item is
//! queued or running, tasks run one at a time in priority order, and a
//! worker is spawned on demand and exits once the queue is empty.

mod queue;
mod task;
mod throttle;

pub use queue::{TaskQueue, DEFAULT_CAPACITY, DEFAULT_KEEP};
pub use task::{AnimationKind, AnimationTask, Completion, Priority, TransitionPhase};
pub use throttle::DuplicateThrottle;

use std::collections::HashSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::future::{self, BoxFuture, FutureExt};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::time::{sleep, Instant};

use crate::core::ItemId;
use crate::error::{GalleryError, Result};

/// Render-layer side of the scheduler: owns the actual item elements
pub trait ItemSurface: Send + Sync + 'static {
    /// Whether the item is still rendered
    fn is_live(&self, id: &ItemId) -> bool;

    /// Apply a visual phase to the item
    fn set_phase(&self, id: &ItemId, phase: TransitionPhase) -> Result<()>;

    /// Resolves when the item's current transition signals completion.
    ///
    /// Surfaces without such a signal keep the default, and the arrival
    /// fallback timer ends the transition instead.
    fn transition_end(&self, _id: &ItemId) -> BoxFuture<'static, ()> {
        future::pending().boxed()
    }
}

/// Timing and capacity knobs
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Pause between two tasks
    pub inter_task_delay: Duration,
    /// One render frame (entrance waits two)
    pub frame: Duration,
    /// Entrance settle time after the reveal starts
    pub entrance_settle: Duration,
    /// Upper bound on waiting for the arrival transition-end signal
    pub arrival_fallback: Duration,
    /// Pulse shown after the arrival flourish
    pub arrival_pulse: Duration,
    /// Exit transition length
    pub remove: Duration,
    /// Update pulse length
    pub update: Duration,
    /// Queue length above which low-priority tasks are shed
    pub capacity: usize,
    /// Leading tasks kept when shedding
    pub keep: usize,
    /// Window for duplicate-submission diagnostics
    pub duplicate_window: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            inter_task_delay: Duration::from_millis(50),
            frame: Duration::from_millis(16),
            entrance_settle: Duration::from_millis(300),
            arrival_fallback: Duration::from_millis(1500),
            arrival_pulse: Duration::from_millis(500),
            remove: Duration::from_millis(500),
            update: Duration::from_millis(1000),
            capacity: DEFAULT_CAPACITY,
            keep: DEFAULT_KEEP,
            duplicate_window: Duration::from_secs(2),
        }
    }
}

/// Snapshot for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerStatus {
    pub queue_length: usize,
    pub is_processing: bool,
    pub current: Option<(ItemId, AnimationKind)>,
}

/// Why a submission was not queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Queued,
    /// A task for this item is already queued or running
    Duplicate,
    /// Entrance requested for an item that already finished one
    AlreadyAnimated,
}

struct SchedulerState {
    queue: TaskQueue,
    /// Items with a queued or running task
    active: HashSet<ItemId>,
    /// Items that completed an entrance or arrival
    animated: HashSet<ItemId>,
    current: Option<(ItemId, AnimationKind)>,
    processing: bool,
    throttle: DuplicateThrottle,
}

struct Inner {
    state: Mutex<SchedulerState>,
    surface: Arc<dyn ItemSurface>,
    config: SchedulerConfig,
    runtime: Handle,
}

enum Executed {
    Completed,
    /// Item was no longer rendered
    Skipped,
}

/// Handle to the shared scheduler; clones refer to the same queue
#[derive(Clone)]
pub struct AnimationScheduler {
    inner: Arc<Inner>,
}

impl AnimationScheduler {
    /// Create a scheduler whose worker runs on `runtime`
    pub fn new(surface: Arc<dyn ItemSurface>, config: SchedulerConfig, runtime: Handle) -> Self {
        let state = SchedulerState {
            queue: TaskQueue::new(config.capacity, config.keep),
            active: HashSet::new(),
            animated: HashSet::new(),
            current: None,
            processing: false,
            throttle: DuplicateThrottle::new(config.duplicate_window),
        };
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                surface,
                config,
                runtime,
            }),
        }
    }

    /// Queue a task. Duplicates for an item with a pending task are dropped.
    pub fn submit(&self, task: AnimationTask) -> Submission {
        let mut state = self.inner.lock();

        if task.kind == AnimationKind::Entrance && state.animated.contains(&task.item) {
            return Submission::AlreadyAnimated;
        }

        if state.active.contains(&task.item) {
            if state
                .throttle
                .should_report(&task.item, task.kind, Instant::now())
            {
                tracing::debug!(item = %task.item, kind = %task.kind, "Skipping duplicate animation");
            }
            return Submission::Duplicate;
        }

        state.active.insert(task.item.clone());
        let dropped = state.queue.push(task);
        if !dropped.is_empty() {
            tracing::warn!(
                dropped = dropped.len(),
                "Animation queue too large, dropped oldest low-priority tasks"
            );
            for task in &dropped {
                state.active.remove(&task.item);
            }
        }

        if !state.processing {
            state.processing = true;
            self.inner.runtime.spawn(run_worker(Arc::clone(&self.inner)));
        }
        Submission::Queued
    }

    /// Queue with an explicit priority and callback
    pub fn submit_with(
        &self,
        item: ItemId,
        kind: AnimationKind,
        priority: Priority,
        on_done: impl FnOnce() + Send + 'static,
    ) -> Submission {
        self.submit(AnimationTask::new(item, kind, priority).with_callback(on_done))
    }

    /// Reveal an item for the first time
    pub fn animate_entrance(&self, item: ItemId) -> Submission {
        self.submit(AnimationTask::new(
            item,
            AnimationKind::Entrance,
            AnimationKind::Entrance.default_priority(),
        ))
    }

    /// Arrival flourish for a newly added item
    pub fn animate_new(&self, item: ItemId) -> Submission {
        self.submit(AnimationTask::new(
            item,
            AnimationKind::New,
            AnimationKind::New.default_priority(),
        ))
    }

    /// Highlight pulse for an edited item
    pub fn animate_update(&self, item: ItemId) -> Submission {
        self.submit(AnimationTask::new(
            item,
            AnimationKind::Update,
            AnimationKind::Update.default_priority(),
        ))
    }

    /// Exit transition. The returned future resolves once the transition
    /// finished or the task was dropped; remove the element afterwards.
    pub fn animate_remove(&self, item: ItemId) -> impl Future<Output = ()> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        self.submit(
            AnimationTask::new(
                item,
                AnimationKind::Remove,
                AnimationKind::Remove.default_priority(),
            )
            .with_callback(move || {
                let _ = tx.send(());
            }),
        );
        async move {
            let _ = rx.await;
        }
    }

    /// Cancel the task for `item`.
    ///
    /// A queued task is removed. A running task keeps running, but its
    /// transitional styling is cleared.
    pub fn cancel(&self, item: &ItemId) -> bool {
        let (removed, running) = {
            let mut state = self.inner.lock();
            let removed = state.queue.remove(item);
            if removed.is_some() {
                state.active.remove(item);
            }
            let running = state.current.as_ref().is_some_and(|(id, _)| id == item);
            (removed.is_some(), running)
        };

        if running {
            if let Err(e) = self.inner.surface.set_phase(item, TransitionPhase::Idle) {
                tracing::warn!(item = %item, error = %e, "Failed to clear cancelled animation");
            }
        }
        removed || running
    }

    /// Drop every queued task
    pub fn clear(&self) {
        let mut state = self.inner.lock();
        state.queue.drain();
        let current = state.current.as_ref().map(|(id, _)| id.clone());
        state.active.retain(|id| Some(id) == current.as_ref());
    }

    /// Number of queued (not yet started) tasks
    pub fn queue_len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Task currently in flight
    pub fn current(&self) -> Option<(ItemId, AnimationKind)> {
        self.inner.lock().current.clone()
    }

    pub fn is_processing(&self) -> bool {
        self.inner.lock().processing
    }

    /// Whether the item finished its entrance or arrival
    pub fn is_animated(&self, item: &ItemId) -> bool {
        self.inner.lock().animated.contains(item)
    }

    pub fn status(&self) -> SchedulerStatus {
        let state = self.inner.lock();
        SchedulerStatus {
            queue_length: state.queue.len(),
            is_processing: state.processing,
            current: state.current.clone(),
        }
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn phase(&self, item: &ItemId, phase: TransitionPhase) -> Result<()> {
        self.surface
            .set_phase(item, phase)
            .map_err(|e| GalleryError::animation(item.clone(), e.to_string()))
    }

    async fn execute(&self, item: &ItemId, kind: AnimationKind) -> Result<Executed> {
        if !self.surface.is_live(item) {
            return Ok(Executed::Skipped);
        }

        let config = &self.config;
        match kind {
            AnimationKind::Entrance => {
                self.phase(item, TransitionPhase::Entering)?;
                // Let the starting state reach the screen before revealing
                sleep(config.frame).await;
                sleep(config.frame).await;
                self.phase(item, TransitionPhase::Visible)?;
                sleep(config.entrance_settle).await;
                self.phase(item, TransitionPhase::Done)?;
                self.lock().animated.insert(item.clone());
            }
            AnimationKind::New => {
                self.phase(item, TransitionPhase::Idle)?;
                self.phase(item, TransitionPhase::Arrival)?;
                let end = self.surface.transition_end(item);
                tokio::select! {
                    _ = end => {}
                    _ = sleep(config.arrival_fallback) => {}
                }
                self.phase(item, TransitionPhase::Pulse)?;
                sleep(config.arrival_pulse).await;
                self.phase(item, TransitionPhase::Done)?;
                self.lock().animated.insert(item.clone());
            }
            AnimationKind::Remove => {
                self.phase(item, TransitionPhase::Idle)?;
                self.phase(item, TransitionPhase::Removing)?;
                sleep(config.remove).await;
            }
            AnimationKind::Update => {
                self.phase(item, TransitionPhase::Idle)?;
                self.phase(item, TransitionPhase::Pulse)?;
                sleep(config.update).await;
                self.phase(item, TransitionPhase::Idle)?;
            }
        }
        Ok(Executed::Completed)
    }
}

async fn run_worker(inner: Arc<Inner>) {
    loop {
        let task = {
            let mut state = inner.lock();
            match state.queue.pop_front() {
                Some(task) => {
                    state.current = Some((task.item.clone(), task.kind));
                    task
                }
                None => {
                    state.processing = false;
                    state.current = None;
                    return;
                }
            }
        };

        let AnimationTask {
            item, kind, on_done, ..
        } = task;

        let outcome = AssertUnwindSafe(inner.execute(&item, kind))
            .catch_unwind()
            .await;

        {
            let mut state = inner.lock();
            state.active.remove(&item);
            state.current = None;
        }

        let settled = match outcome {
            Ok(Ok(Executed::Completed)) => {
                if let Some(on_done) = on_done {
                    if std::panic::catch_unwind(AssertUnwindSafe(on_done)).is_err() {
                        tracing::error!(item = %item, kind = %kind, "Animation callback panicked");
                    }
                }
                true
            }
            Ok(Ok(Executed::Skipped)) => {
                tracing::debug!(item = %item, kind = %kind, "Item gone, animation skipped");
                true
            }
            Ok(Err(e)) => {
                tracing::error!(item = %item, kind = %kind, error = %e, "Animation error");
                false
            }
            Err(_) => {
                tracing::error!(item = %item, kind = %kind, "Animation task panicked");
                false
            }
        };

        if settled {
            sleep(inner.config.inter_task_delay).await;
        }
    }
}
