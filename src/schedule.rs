//! Scheduling
//!
//! Cancellable timers on an explicit logical clock. Nothing here spawns a
//! thread or suspends: time only moves when the owner calls
//! [`Scheduler::advance`], which keeps every timing behavior (search
//! debounce, notification dismissal) deterministic and synchronous.

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Key identifying a scheduled task.
    pub struct TaskKey;
}

#[derive(Debug)]
struct Scheduled<T> {
    due_ms: u64,
    seq: u64,
    payload: T,
}

/// Deterministic single-owner timer queue.
///
/// Tasks fire when the clock passes their due time, in (due time, schedule
/// order). Cancelled keys become harmlessly stale: a key never targets
/// anything but its own task.
#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_seq: u64,
    tasks: SlotMap<TaskKey, Scheduled<T>>,
}

impl<T> Scheduler<T> {
    /// Creates a scheduler with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            tasks: SlotMap::with_key(),
        }
    }

    /// The current logical time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedules `payload` to fire `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, payload: T) -> TaskKey {
        let due_ms = self.now_ms.saturating_add(delay_ms);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);

        self.tasks.insert(Scheduled {
            due_ms,
            seq,
            payload,
        })
    }

    /// Cancels a pending task, returning its payload if it had not fired.
    pub fn cancel(&mut self, key: TaskKey) -> Option<T> {
        self.tasks.remove(key).map(|task| task.payload)
    }

    /// Number of tasks still pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Advances the clock by `delta_ms`, returning the payloads of every
    /// task that came due, in firing order.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<T> {
        self.now_ms = self.now_ms.saturating_add(delta_ms);

        let mut due: Vec<(u64, u64, TaskKey)> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.due_ms <= self.now_ms)
            .map(|(key, task)| (task.due_ms, task.seq, key))
            .collect();

        due.sort_unstable_by_key(|&(due_ms, seq, _)| (due_ms, seq));

        due.into_iter()
            .filter_map(|(_, _, key)| self.tasks.remove(key))
            .map(|task| task.payload)
            .collect()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Quiescence-window debouncer.
///
/// The raw value updates immediately on every [`Debouncer::set`]; the
/// settled value updates only once `delay_ms` passes with no further input.
/// Each `set` cancels the previously scheduled update, and dropping the
/// debouncer drops any pending update with it, so no callback can outlive
/// its owner.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay_ms: u64,
    value: T,
    settled: T,
    pending: Option<TaskKey>,
    scheduler: Scheduler<T>,
}

impl<T: Clone> Debouncer<T> {
    /// Creates a debouncer whose raw and settled values start at `initial`.
    pub fn new(initial: T, delay_ms: u64) -> Self {
        Self {
            delay_ms,
            value: initial.clone(),
            settled: initial,
            pending: None,
            scheduler: Scheduler::new(),
        }
    }

    /// The raw value, reflecting every `set` immediately.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The settled value, lagging the raw value by the quiescence window.
    pub fn settled(&self) -> &T {
        &self.settled
    }

    /// Whether a settled-value update is still pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Updates the raw value and restarts the quiescence window.
    pub fn set(&mut self, value: T) {
        self.value = value.clone();

        if let Some(key) = self.pending.take() {
            self.scheduler.cancel(key);
        }

        self.pending = Some(self.scheduler.schedule(self.delay_ms, value));
    }

    /// Cancels any pending settled-value update, keeping the raw value.
    pub fn cancel_pending(&mut self) {
        if let Some(key) = self.pending.take() {
            self.scheduler.cancel(key);
        }
    }

    /// Advances the debouncer's clock by `delta_ms`.
    pub fn advance(&mut self, delta_ms: u64) {
        if let Some(value) = self.scheduler.advance(delta_ms).into_iter().next_back() {
            self.settled = value;
            self.pending = None;
        }
    }
}
