//! Logical clock and deferred task queue.
//!
//! Every delay in the terminal (deferred command results, reveal pre-delays,
//! typewriter ticks) is a task queued against this clock. Nothing sleeps:
//! the host advances the clock, by wall time in the app or by exact amounts
//! in tests, and due tasks pop out in deadline order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Entry<T> {
    due: u64,
    seq: u64,
    task: T,
}

// Ordering is on (due, seq) only, reversed so the heap yields the earliest
// deadline first and ties resolve in scheduling order.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

/// A single-threaded timeline of pending tasks.
pub struct Scheduler<T> {
    now: u64,
    next_seq: u64,
    queue: BinaryHeap<Entry<T>>,
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler at time zero.
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current logical time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Queue `task` to fire `delay_ms` from now.
    pub fn schedule_in(&mut self, delay_ms: u64, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            due: self.now.saturating_add(delay_ms),
            seq,
            task,
        });
    }

    /// Pop the earliest task due at or before `deadline`, moving the clock
    /// to that task's due time.
    pub fn pop_due(&mut self, deadline: u64) -> Option<T> {
        if self.queue.peek().is_some_and(|e| e.due <= deadline) {
            let entry = self.queue.pop()?;
            self.now = self.now.max(entry.due);
            return Some(entry.task);
        }
        None
    }

    /// Move the clock forward to `time`. Never moves it backward.
    pub fn advance_to(&mut self, time: u64) {
        self.now = self.now.max(time);
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|e| e.due)
    }

    /// Number of pending tasks.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
