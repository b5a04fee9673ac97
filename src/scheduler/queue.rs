//! Priority-ordered task queue with a soft capacity bound

use std::collections::VecDeque;

use super::task::{AnimationTask, Priority};
use crate::core::ItemId;

/// Queue length above which low-priority tasks are shed
pub const DEFAULT_CAPACITY: usize = 200;
/// Number of leading tasks kept regardless of priority when shedding
pub const DEFAULT_KEEP: usize = 150;

/// Pending animation tasks, priority-descending and FIFO within a tier
#[derive(Debug)]
pub struct TaskQueue {
    tasks: VecDeque<AnimationTask>,
    capacity: usize,
    keep: usize,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_KEEP)
    }
}

impl TaskQueue {
    pub fn new(capacity: usize, keep: usize) -> Self {
        Self {
            tasks: VecDeque::new(),
            capacity,
            keep: keep.min(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Whether a task for `item` is queued
    pub fn contains(&self, item: &ItemId) -> bool {
        self.tasks.iter().any(|t| &t.item == item)
    }

    /// Insert behind every task of equal or higher priority.
    ///
    /// Returns the tasks shed by the capacity bound.
    pub fn push(&mut self, task: AnimationTask) -> Vec<AnimationTask> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.priority < task.priority)
            .unwrap_or(self.tasks.len());
        self.tasks.insert(index, task);

        if self.tasks.len() > self.capacity {
            self.shed()
        } else {
            Vec::new()
        }
    }

    /// Drop low-priority tasks beyond the keep window
    fn shed(&mut self) -> Vec<AnimationTask> {
        let mut kept = VecDeque::with_capacity(self.tasks.len());
        let mut dropped = Vec::new();
        for (index, task) in self.tasks.drain(..).enumerate() {
            if index < self.keep || task.priority > Priority::Low {
                kept.push_back(task);
            } else {
                dropped.push(task);
            }
        }
        self.tasks = kept;
        dropped
    }

    pub fn pop_front(&mut self) -> Option<AnimationTask> {
        self.tasks.pop_front()
    }

    /// Remove the queued task for `item`, if any
    pub fn remove(&mut self, item: &ItemId) -> Option<AnimationTask> {
        let index = self.tasks.iter().position(|t| &t.item == item)?;
        self.tasks.remove(index)
    }

    /// Remove every queued task
    pub fn drain(&mut self) -> Vec<AnimationTask> {
        self.tasks.drain(..).collect()
    }

    /// Ids in execution order
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.tasks.iter().map(|t| t.item.clone()).collect()
    }
}
