#![forbid(unsafe_code)]

//! Scheduling port and deterministic timer queue.
//!
//! Components never call a wall-clock timer directly. They receive a
//! [`Scheduler`] and ask it for one-shot or repeating deliveries of a
//! *payload*; the host later hands fired payloads back to the component that
//! scheduled them. This keeps every component single-threaded and
//! cooperative: scheduling returns immediately, and state changes happen only
//! when the host delivers a payload.
//!
//! [`TimerQueue`] is the one implementation of the port. It does not read any
//! clock itself: the host advances it to an explicit instant with
//! [`TimerQueue::pop_due`]. A real-time host passes `Instant::elapsed()`,
//! tests pass virtual instants, and both observe identical ordering.
//!
//! # Invariants
//!
//! 1. Time never moves backwards: `now()` is non-decreasing.
//! 2. Payloads fire in ascending due time; timers due at the same instant
//!    fire in the order they were scheduled.
//! 3. A cancelled timer never fires again, including repeating timers.
//! 4. A repeating timer fires at `start + k * period` for `k = 1, 2, ...`,
//!    never twice for the same instant.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle to a scheduled timer, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw numeric value, for logging.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// The injectable scheduling port.
///
/// Delays are measured from [`Scheduler::now`].
pub trait Scheduler<T> {
    /// Current scheduler time, measured from the scheduler's epoch.
    fn now(&self) -> Duration;

    /// Deliver `payload` once, `delay` from now.
    fn schedule_once(&mut self, delay: Duration, payload: T) -> TimerId;

    /// Deliver a copy of `payload` every `period`, starting one period from now.
    fn schedule_repeating(&mut self, period: Duration, payload: T) -> TimerId;

    /// Cancel a timer. Returns `false` if it already fired (one-shot) or was
    /// already cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;
}

/// A payload delivered by [`TimerQueue::pop_due`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    /// Timer that produced this delivery.
    pub id: TimerId,
    /// Instant the timer was due at.
    pub at: Duration,
    /// The scheduled payload.
    pub payload: T,
}

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    period: Option<Duration>,
    payload: T,
}

/// Ordering key: due time, then scheduling sequence number.
type Slot = (Duration, u64);

/// Virtual-time timer queue.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    entries: BTreeMap<Slot, Entry<T>>,
    slots: HashMap<TimerId, Slot>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue at time zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
            entries: BTreeMap::new(),
            slots: HashMap::new(),
        }
    }

    /// Number of outstanding timers.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no timers are outstanding.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether `id` is still scheduled.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Due time of the earliest outstanding timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    /// Cancel every outstanding timer. Returns how many were cancelled.
    pub fn clear(&mut self) -> usize {
        let count = self.slots.len();
        self.entries.clear();
        self.slots.clear();
        if count > 0 {
            crate::debug!(count, "timer queue cleared");
        }
        count
    }

    fn insert(&mut self, due: Duration, entry: Entry<T>) {
        let slot = (due, self.next_seq);
        self.next_seq += 1;
        self.slots.insert(entry.id, slot);
        self.entries.insert(slot, entry);
    }

    fn allocate_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Pop the earliest timer due at or before `until`.
    ///
    /// On success the queue's clock moves to the timer's due time and a
    /// repeating timer is re-armed one period later. When nothing is due,
    /// the clock moves to `until` and `None` is returned. Call in a loop to
    /// drain everything due by `until`:
    ///
    /// ```
    /// use std::time::Duration;
    /// use termboot_core::scheduler::{Scheduler, TimerQueue};
    ///
    /// let mut queue = TimerQueue::new();
    /// queue.schedule_once(Duration::from_millis(20), "b");
    /// queue.schedule_once(Duration::from_millis(10), "a");
    ///
    /// let mut seen = Vec::new();
    /// while let Some(fired) = queue.pop_due(Duration::from_millis(50)) {
    ///     seen.push(fired.payload);
    /// }
    /// assert_eq!(seen, ["a", "b"]);
    /// assert_eq!(queue.now(), Duration::from_millis(50));
    /// ```
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<T>> {
        let slot = match self.entries.keys().next() {
            Some(slot) if slot.0 <= until => *slot,
            _ => {
                self.now = self.now.max(until);
                return None;
            }
        };
        let entry = self.entries.remove(&slot)?;
        let due = slot.0;
        self.now = self.now.max(due);

        let fired = Fired {
            id: entry.id,
            at: due,
            payload: entry.payload.clone(),
        };

        match entry.period {
            Some(period) => {
                crate::trace!(timer = entry.id.get(), due_us = due.as_micros() as u64, "repeating timer fired");
                self.insert(due + period, entry);
            }
            None => {
                crate::trace!(timer = entry.id.get(), due_us = due.as_micros() as u64, "timer fired");
                self.slots.remove(&entry.id);
            }
        }
        Some(fired)
    }
}

impl<T: Clone> Scheduler<T> for TimerQueue<T> {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule_once(&mut self, delay: Duration, payload: T) -> TimerId {
        let id = self.allocate_id();
        let due = self.now.saturating_add(delay);
        self.insert(
            due,
            Entry {
                id,
                period: None,
                payload,
            },
        );
        id
    }

    fn schedule_repeating(&mut self, period: Duration, payload: T) -> TimerId {
        // A zero period would fire forever at one instant.
        let period = if period.is_zero() {
            Duration::from_nanos(1)
        } else {
            period
        };
        let id = self.allocate_id();
        let due = self.now.saturating_add(period);
        self.insert(
            due,
            Entry {
                id,
                period: Some(period),
                payload,
            },
        );
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.slots.remove(&id) {
            Some(slot) => {
                self.entries.remove(&slot);
                crate::trace!(timer = id.get(), "timer cancelled");
                true
            }
            None => false,
        }
    }
}

/// A set of timers owned by one component, cancelled together on teardown.
#[derive(Debug, Default, Clone)]
pub struct TimerGroup {
    ids: Vec<TimerId>,
}

impl TimerGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `id` for later cancellation.
    pub fn track(&mut self, id: TimerId) {
        self.ids.push(id);
    }

    /// Number of tracked handles (fired or not).
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no handles are tracked.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Cancel every tracked timer and forget the handles.
    ///
    /// Returns how many timers were still outstanding.
    pub fn cancel_all<T, S: Scheduler<T> + ?Sized>(&mut self, scheduler: &mut S) -> usize {
        self.ids
            .drain(..)
            .filter(|id| scheduler.cancel(*id))
            .count()
    }
}
