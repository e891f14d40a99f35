//! One-shot timers fired from the host's tick loop.
//!
//! Nothing here runs on its own: the owner asks for the entries that are due
//! and runs their continuations on the same thread as every other state
//! transition.

use std::time::Instant;

use stagehand_types::TimerId;

#[derive(Debug)]
struct TimerEntry<T> {
    id: TimerId,
    deadline: Instant,
    payload: T,
}

/// Queue of pending one-shot timers keyed by [`TimerId`].
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<TimerEntry<T>>,
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }

    pub fn schedule(&mut self, deadline: Instant, payload: T) -> TimerId {
        let id = TimerId::new(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            deadline,
            payload,
        });
        id
    }

    /// Remove a timer before it fires. Returns its payload if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index).payload)
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }

    /// Remove and return every timer whose deadline is at or before `now`,
    /// earliest first (ties fire in scheduling order).
    pub fn take_due(&mut self, now: Instant) -> Vec<(TimerId, T)> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.deadline <= now);
        self.entries = pending;
        due.sort_by_key(|entry| (entry.deadline, entry.id));
        due.into_iter()
            .map(|entry| (entry.id, entry.payload))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
