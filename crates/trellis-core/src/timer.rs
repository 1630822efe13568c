//! Deferred one-shot timer queue for Trellis.
//!
//! Controllers schedule fire-once callbacks (for example, the delayed stage
//! of an underlay transition) against whatever event loop the host framework
//! runs. A host embeds a [`DeferredQueue`], asks it how long until the next
//! deadline, and drains expired entries each loop iteration, routing the
//! returned [`TimerId`]s back into the controllers that scheduled them.
//!
//! Cancelled entries are inert: they never come back out of
//! [`DeferredQueue::fire_expired`], so a controller torn down before its
//! deadline leaves nothing behind that can fire late.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};

new_key_type! {
    /// A unique identifier for a deferred entry.
    pub struct TimerId;
}

/// Internal state of a deferred entry.
#[derive(Debug)]
struct Deferred {
    /// When this entry should fire.
    fire_at: Instant,
    /// Whether this entry is still live (not cancelled).
    active: bool,
}

/// An entry in the deadline queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    id: TimerId,
    fire_at: Instant,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_at.cmp(&self.fire_at)
    }
}

/// A queue of fire-once deferred deadlines.
pub struct DeferredQueue {
    /// All live entries.
    entries: SlotMap<TimerId, Deferred>,
    /// Priority queue of deadlines (min-heap by fire time).
    queue: BinaryHeap<QueueEntry>,
}

impl DeferredQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// Schedule a one-shot entry that fires after `delay`.
    ///
    /// Returns the ID that [`fire_expired`](Self::fire_expired) will yield
    /// once the delay elapses.
    pub fn defer(&mut self, delay: Duration) -> TimerId {
        let fire_at = Instant::now() + delay;
        let id = self.entries.insert(Deferred {
            fire_at,
            active: true,
        });
        self.queue.push(QueueEntry { id, fire_at });
        tracing::trace!(target: "trellis_core::timer", ?id, ?delay, "deferred entry scheduled");
        id
    }

    /// Cancel a pending entry.
    ///
    /// Returns an error if the ID is unknown, already fired, or already
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> Result<()> {
        if self.entries.remove(id).is_some() {
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId.into())
        }
    }

    /// Check if an entry is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.entries.get(id).is_some_and(|t| t.active)
    }

    /// Get the duration until the next entry fires, if any.
    ///
    /// Returns `None` when nothing is pending.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        // Drop cancelled entries from the front of the queue.
        while let Some(entry) = self.queue.peek() {
            if self.entries.get(entry.id).is_some_and(|t| t.active) {
                break;
            }
            self.queue.pop();
        }

        self.queue.peek().map(|entry| {
            entry.fire_at.saturating_duration_since(Instant::now())
        })
    }

    /// Drain all entries whose deadline has passed.
    ///
    /// Each ID is yielded exactly once; fired entries are removed.
    pub fn fire_expired(&mut self) -> Vec<TimerId> {
        let now = Instant::now();
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek() {
            if entry.fire_at > now {
                break;
            }

            let Some(entry) = self.queue.pop() else {
                break;
            };

            // Skip entries cancelled after scheduling.
            if self.entries.remove(entry.id).is_none() {
                continue;
            }

            tracing::trace!(target: "trellis_core::timer", id = ?entry.id, "deferred entry fired");
            fired.push(entry.id);
        }

        fired
    }

    /// Number of pending entries.
    pub fn active_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for DeferredQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_delay_fires_immediately() {
        let mut queue = DeferredQueue::new();
        let id = queue.defer(Duration::ZERO);

        let fired = queue.fire_expired();
        assert_eq!(fired, vec![id]);
        assert_eq!(queue.active_count(), 0);
    }

    #[test]
    fn test_fires_exactly_once() {
        let mut queue = DeferredQueue::new();
        let id = queue.defer(Duration::ZERO);

        assert_eq!(queue.fire_expired(), vec![id]);
        assert!(queue.fire_expired().is_empty());
        assert!(!queue.is_active(id));
    }

    #[test]
    fn test_pending_until_deadline() {
        let mut queue = DeferredQueue::new();
        let id = queue.defer(Duration::from_secs(3600));

        assert!(queue.is_active(id));
        assert!(queue.fire_expired().is_empty());
        assert!(queue.time_until_next().is_some());
    }

    #[test]
    fn test_cancel() {
        let mut queue = DeferredQueue::new();
        let id = queue.defer(Duration::ZERO);

        assert!(queue.cancel(id).is_ok());
        assert!(!queue.is_active(id));
        // A cancelled entry never fires.
        assert!(queue.fire_expired().is_empty());
        // Cancelling again is an error.
        assert!(queue.cancel(id).is_err());
    }

    #[test]
    fn test_fire_order_is_deadline_order() {
        let mut queue = DeferredQueue::new();
        let late = queue.defer(Duration::from_millis(5));
        let early = queue.defer(Duration::ZERO);

        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(queue.fire_expired(), vec![early, late]);
    }

    #[test]
    fn test_time_until_next_skips_cancelled() {
        let mut queue = DeferredQueue::new();
        let soon = queue.defer(Duration::from_millis(1));
        let _later = queue.defer(Duration::from_secs(3600));

        queue.cancel(soon).unwrap();
        let remaining = queue.time_until_next().unwrap();
        assert!(remaining > Duration::from_secs(1800));
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = DeferredQueue::new();
        assert!(queue.time_until_next().is_none());
        assert!(queue.fire_expired().is_empty());
        assert_eq!(queue.active_count(), 0);
    }
}
