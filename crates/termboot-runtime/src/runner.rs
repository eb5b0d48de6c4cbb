#![forbid(unsafe_code)]

//! Host-driven runner for a [`BootScreen`].
//!
//! `BootRunner` owns the timer queue and the screen, and advances both to an
//! instant supplied by the host. It never reads a clock: the terminal demo
//! feeds it `Instant::elapsed()`, tests feed it virtual time, and the two see
//! exactly the same sequence of state changes.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use termboot_runtime::{BootRunner, BootScreen, FixedSequence, ProgressSimulator, SequenceConfig, Stage};
//!
//! let screen = BootScreen::new(
//!     SequenceConfig::default(),
//!     ProgressSimulator::new(FixedSequence::constant(0.5)),
//! )
//! .unwrap();
//! let mut runner = BootRunner::new(screen);
//! runner.mount();
//! runner.advance_to(Duration::from_millis(2_500));
//! assert_eq!(runner.view().sequence.stage, Stage::InfoShown);
//! ```

use std::time::Duration;

use termboot_core::scheduler::{Scheduler, TimerQueue};

use crate::screen::{BootEvent, BootScreen, BootTimer, BootView};

/// An event together with the scheduler instant it happened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub at: Duration,
    pub event: BootEvent,
}

/// Deterministic driver owning the boot screen and its timers.
#[derive(Debug)]
pub struct BootRunner {
    screen: BootScreen,
    queue: TimerQueue<BootTimer>,
    events: Vec<TimedEvent>,
    deliveries: u64,
}

impl BootRunner {
    /// Wrap a screen. Nothing is scheduled until [`mount`](Self::mount).
    pub fn new(screen: BootScreen) -> Self {
        Self {
            screen,
            queue: TimerQueue::new(),
            events: Vec::new(),
            deliveries: 0,
        }
    }

    /// Mount the screen at the current instant.
    pub fn mount(&mut self) {
        self.screen.mount(&mut self.queue);
    }

    /// Unmount the screen, cancelling every outstanding timer.
    pub fn unmount(&mut self) {
        self.screen.unmount(&mut self.queue);
    }

    /// Deliver every timer due at or before `now`.
    ///
    /// Returns the number of timer deliveries processed. Instants earlier than
    /// [`now`](Self::now) are treated as `now`.
    pub fn advance_to(&mut self, now: Duration) -> usize {
        let mut delivered = 0;
        while let Some(fired) = self.queue.pop_due(now) {
            delivered += 1;
            for event in self.screen.handle(fired.payload, &mut self.queue) {
                tracing::trace!(at_ms = fired.at.as_millis() as u64, event = ?event, "boot event");
                self.events.push(TimedEvent {
                    at: fired.at,
                    event,
                });
            }
        }
        self.deliveries += delivered as u64;
        delivered
    }

    /// Advance by `dt` from the current instant.
    pub fn advance_by(&mut self, dt: Duration) -> usize {
        let target = self.queue.now().saturating_add(dt);
        self.advance_to(target)
    }

    /// Step timer by timer until `done` holds for the view or `limit` passes.
    ///
    /// Returns `true` if the predicate was satisfied.
    pub fn run_until(&mut self, limit: Duration, mut done: impl FnMut(&BootView<'_>) -> bool) -> bool {
        loop {
            if done(&self.screen.view()) {
                return true;
            }
            match self.queue.next_deadline() {
                Some(deadline) if deadline <= limit => {
                    self.advance_to(deadline);
                }
                _ => {
                    self.advance_to(limit);
                    return done(&self.screen.view());
                }
            }
        }
    }

    /// Current scheduler instant.
    pub fn now(&self) -> Duration {
        self.queue.now()
    }

    /// When the next timer is due, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.next_deadline()
    }

    /// Outstanding timers.
    pub fn pending_timers(&self) -> usize {
        self.queue.len()
    }

    /// Total timer deliveries since creation.
    pub fn deliveries(&self) -> u64 {
        self.deliveries
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    /// Take and clear the recorded events.
    pub fn take_events(&mut self) -> Vec<TimedEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current view.
    pub fn view(&self) -> BootView<'_> {
        self.screen.view()
    }

    /// The wrapped screen.
    pub fn screen(&self) -> &BootScreen {
        &self.screen
    }

    /// Mutable access to the wrapped screen.
    pub fn screen_mut(&mut self) -> &mut BootScreen {
        &mut self.screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SequenceConfig;
    use crate::progress::{FixedSequence, ProgressSimulator};
    use crate::sequence::{SequenceEvent, Stage};

    fn runner() -> BootRunner {
        BootRunner::new(
            BootScreen::new(
                SequenceConfig::default(),
                ProgressSimulator::new(FixedSequence::constant(0.5)),
            )
            .unwrap(),
        )
    }

    #[test]
    fn advance_by_accumulates() {
        let mut runner = runner();
        runner.mount();
        runner.advance_by(Duration::from_millis(400));
        assert_eq!(runner.view().sequence.stage, Stage::Idle);
        runner.advance_by(Duration::from_millis(100));
        assert_eq!(runner.view().sequence.stage, Stage::HeaderShown);
        assert_eq!(runner.now(), Duration::from_millis(500));
    }

    #[test]
    fn run_until_stops_at_first_satisfying_instant() {
        let mut runner = runner();
        runner.mount();
        let reached = runner.run_until(Duration::from_secs(60), |view| view.sequence.is_connected());
        assert!(reached);
        let established = runner
            .events()
            .iter()
            .find(|e| e.event == BootEvent::Sequence(SequenceEvent::ConnectionEstablished))
            .unwrap();
        assert_eq!(runner.now(), established.at);
    }

    #[test]
    fn run_until_reports_unmet_predicate() {
        let mut runner = runner();
        runner.mount();
        let reached = runner.run_until(Duration::from_millis(1_000), |view| {
            view.sequence.shows(Stage::InfoShown)
        });
        assert!(!reached);
        assert_eq!(runner.now(), Duration::from_millis(1_000));
    }

    #[test]
    fn take_events_drains() {
        let mut runner = runner();
        runner.mount();
        runner.advance_to(Duration::from_millis(600));
        assert_eq!(runner.take_events().len(), 1);
        assert!(runner.events().is_empty());
        assert!(runner.deliveries() >= 1);
    }
}
