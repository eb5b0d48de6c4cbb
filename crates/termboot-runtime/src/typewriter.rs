#![forbid(unsafe_code)]

//! Character-by-character text reveal.
//!
//! [`TypewriterReveal`] owns its own timer chain, independent of the boot
//! sequence: one one-shot timer for the start delay, then one repeating timer
//! at the per-character speed.
//!
//! # Timeline
//!
//! With `speed = s` and `start_delay = d`, character `k` (1-based) appears at
//! `d + k*s`. The tick that reveals the last character also reports
//! [`RevealEvent::Completed`], exactly once. Empty text completes at `d`.
//!
//! # Invariants
//!
//! 1. The revealed length is in `0..=char_count` and never overshoots.
//! 2. It only grows, except when the text is replaced, which resets it to 0.
//! 3. Replacing the text cancels the old chain and advances the generation,
//!    so a delivery from the old chain is a no-op even if it was already in
//!    flight.

use std::time::Duration;

use termboot_core::generation::{Generation, GenerationCounter};
use termboot_core::scheduler::{Scheduler, TimerId};

use crate::config::RevealConfig;

/// Timer payload for a reveal chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTimer {
    generation: Generation,
    step: RevealStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealStep {
    Start,
    Char,
}

/// Observable outcome of a reveal timer delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// One more character is visible.
    Advanced { revealed: usize },
    /// The full text is visible. Fires once per text.
    Completed,
}

/// Lazily growing prefix of a string.
#[derive(Debug, Clone)]
pub struct TypewriterReveal {
    text: String,
    char_count: usize,
    revealed: usize,
    config: RevealConfig,
    generation: GenerationCounter,
    pending: Option<TimerId>,
    running: bool,
    completed: bool,
}

impl TypewriterReveal {
    /// An idle reveal with no text.
    pub fn new(config: RevealConfig) -> Self {
        Self {
            text: String::new(),
            char_count: 0,
            revealed: 0,
            config,
            generation: GenerationCounter::new(),
            pending: None,
            running: false,
            completed: false,
        }
    }

    /// Show `text`, restarting the reveal from empty.
    ///
    /// Passing the text that is already being revealed (or fully revealed)
    /// leaves the reveal untouched; only a different text restarts it.
    pub fn set_text<S, P>(&mut self, text: &str, scheduler: &mut S)
    where
        S: Scheduler<P> + ?Sized,
        P: From<RevealTimer>,
    {
        if text == self.text && (self.running || self.completed) {
            return;
        }
        self.text.clear();
        self.text.push_str(text);
        self.char_count = self.text.chars().count();
        self.restart(scheduler);
    }

    /// Restart the current text from empty with a fresh timer chain.
    pub fn restart<S, P>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<P> + ?Sized,
        P: From<RevealTimer>,
    {
        self.cancel(scheduler);
        self.revealed = 0;
        self.completed = false;
        self.running = true;
        let generation = self.generation.current();
        let id = scheduler.schedule_once(
            self.config.start_delay,
            RevealTimer {
                generation,
                step: RevealStep::Start,
            }
            .into(),
        );
        self.pending = Some(id);
        tracing::trace!(
            generation = generation.get(),
            chars = self.char_count,
            "typewriter reveal started"
        );
    }

    /// Tear down the timer chain. The revealed prefix stays as it is.
    pub fn cancel<S, P>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<P> + ?Sized,
        P: From<RevealTimer>,
    {
        if let Some(id) = self.pending.take() {
            scheduler.cancel(id);
        }
        self.running = false;
        self.generation.advance();
    }

    /// Handle a delivery of this reveal's timer.
    pub fn on_timer<S, P>(&mut self, timer: RevealTimer, scheduler: &mut S) -> Option<RevealEvent>
    where
        S: Scheduler<P> + ?Sized,
        P: From<RevealTimer>,
    {
        if !self.running || !self.generation.is_current(timer.generation) {
            tracing::trace!(
                stale = timer.generation.get(),
                current = self.generation.current().get(),
                "ignoring stale typewriter timer"
            );
            return None;
        }

        match timer.step {
            RevealStep::Start => {
                self.pending = None;
                if self.char_count == 0 {
                    return Some(self.finish(scheduler));
                }
                let id = scheduler.schedule_repeating(
                    self.config.speed,
                    RevealTimer {
                        generation: timer.generation,
                        step: RevealStep::Char,
                    }
                    .into(),
                );
                self.pending = Some(id);
                None
            }
            RevealStep::Char => {
                if self.revealed >= self.char_count {
                    return Some(self.finish(scheduler));
                }
                self.revealed += 1;
                if self.revealed == self.char_count {
                    Some(self.finish(scheduler))
                } else {
                    Some(RevealEvent::Advanced {
                        revealed: self.revealed,
                    })
                }
            }
        }
    }

    fn finish<S, P>(&mut self, scheduler: &mut S) -> RevealEvent
    where
        S: Scheduler<P> + ?Sized,
        P: From<RevealTimer>,
    {
        self.cancel(scheduler);
        self.completed = true;
        tracing::trace!(chars = self.char_count, "typewriter reveal complete");
        RevealEvent::Completed
    }

    /// The full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The visible prefix.
    pub fn revealed_text(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.revealed)
            .map_or(self.text.len(), |(index, _)| index);
        &self.text[..end]
    }

    /// Number of visible characters.
    pub fn revealed_len(&self) -> usize {
        self.revealed
    }

    /// Whether the whole text has been revealed.
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Whether a timer chain is live.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Cadence in use.
    pub fn config(&self) -> RevealConfig {
        self.config
    }

    /// Time from (re)start until the final character: `start_delay + n*speed`.
    pub fn total_duration(&self) -> Duration {
        let chars = u32::try_from(self.char_count).unwrap_or(u32::MAX);
        self.config.start_delay + self.config.speed.saturating_mul(chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termboot_core::scheduler::TimerQueue;

    const MS_10: Duration = Duration::from_millis(10);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Deliver everything due by `until`, collecting events with their time.
    fn run(
        reveal: &mut TypewriterReveal,
        queue: &mut TimerQueue<RevealTimer>,
        until: Duration,
    ) -> Vec<(u128, RevealEvent)> {
        let mut events = Vec::new();
        while let Some(fired) = queue.pop_due(until) {
            if let Some(event) = reveal.on_timer(fired.payload, queue) {
                events.push((fired.at.as_millis(), event));
            }
        }
        events
    }

    #[test]
    fn two_chars_at_ten_ms() {
        let mut queue = TimerQueue::new();
        let mut reveal = TypewriterReveal::new(RevealConfig::new(MS_10));
        reveal.set_text("AB", &mut queue);
        assert_eq!(reveal.revealed_text(), "");

        assert!(run(&mut reveal, &mut queue, ms(9)).is_empty());
        assert_eq!(reveal.revealed_text(), "");

        let events = run(&mut reveal, &mut queue, ms(10));
        assert_eq!(events, vec![(10, RevealEvent::Advanced { revealed: 1 })]);
        assert_eq!(reveal.revealed_text(), "A");

        let events = run(&mut reveal, &mut queue, ms(20));
        assert_eq!(events, vec![(20, RevealEvent::Completed)]);
        assert_eq!(reveal.revealed_text(), "AB");
        assert!(reveal.is_complete());

        assert!(run(&mut reveal, &mut queue, ms(1_000)).is_empty());
        assert_eq!(reveal.revealed_text(), "AB");
        assert!(queue.is_empty());
    }

    #[test]
    fn start_delay_shifts_timeline() {
        let mut queue = TimerQueue::new();
        let mut reveal = TypewriterReveal::new(RevealConfig::new(MS_10).start_delay(ms(100)));
        reveal.set_text("xyz", &mut queue);
        let events = run(&mut reveal, &mut queue, ms(200));
        let times: Vec<_> = events.iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![110, 120, 130]);
        assert_eq!(events.last().unwrap().1, RevealEvent::Completed);
        assert_eq!(reveal.total_duration(), ms(130));
    }

    #[test]
    fn text_change_resets_and_ignores_old_chain() {
        let mut queue = TimerQueue::new();
        let mut reveal = TypewriterReveal::new(RevealConfig::new(MS_10).start_delay(ms(5)));
        reveal.set_text("OLD TEXT", &mut queue);
        run(&mut reveal, &mut queue, ms(35));
        assert_eq!(reveal.revealed_text(), "OLD");

        reveal.set_text("new", &mut queue);
        assert_eq!(reveal.revealed_len(), 0);
        assert_eq!(reveal.revealed_text(), "");

        // The new chain restarts from the new start delay (now = 35ms).
        let events = run(&mut reveal, &mut queue, ms(49));
        assert!(events.is_empty());
        assert_eq!(reveal.revealed_text(), "");

        let events = run(&mut reveal, &mut queue, ms(70));
        let times: Vec<_> = events.iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![50, 60, 70]);
        assert_eq!(reveal.revealed_text(), "new");
        assert!(queue.is_empty());
    }

    #[test]
    fn stale_delivery_is_ignored() {
        let mut queue = TimerQueue::new();
        let mut reveal = TypewriterReveal::new(RevealConfig::new(MS_10));
        reveal.set_text("abc", &mut queue);
        run(&mut reveal, &mut queue, ms(10));
        let stale = RevealTimer {
            generation: reveal.generation.current(),
            step: RevealStep::Char,
        };

        reveal.set_text("zzz", &mut queue);
        assert_eq!(reveal.on_timer(stale, &mut queue), None);
        assert_eq!(reveal.revealed_len(), 0);
    }

    #[test]
    fn same_text_does_not_restart() {
        let mut queue = TimerQueue::new();
        let mut reveal = TypewriterReveal::new(RevealConfig::new(MS_10));
        reveal.set_text("abcd", &mut queue);
        run(&mut reveal, &mut queue, ms(20));
        reveal.set_text("abcd", &mut queue);
        assert_eq!(reveal.revealed_text(), "ab");
    }

    #[test]
    fn completion_fires_once_and_never_overshoots() {
        let mut queue = TimerQueue::new();
        let mut reveal = TypewriterReveal::new(RevealConfig::new(MS_10));
        reveal.set_text("héllo", &mut queue);
        let events = run(&mut reveal, &mut queue, ms(10_000));
        let completions = events
            .iter()
            .filter(|(_, e)| *e == RevealEvent::Completed)
            .count();
        assert_eq!(completions, 1);
        assert_eq!(reveal.revealed_len(), 5);
        assert_eq!(reveal.revealed_text(), "héllo");
    }

    #[test]
    fn multibyte_prefix_respects_char_boundaries() {
        let mut queue = TimerQueue::new();
        let mut reveal = TypewriterReveal::new(RevealConfig::new(MS_10));
        reveal.set_text("ÄÖÜ", &mut queue);
        run(&mut reveal, &mut queue, ms(20));
        assert_eq!(reveal.revealed_text(), "ÄÖ");
    }

    #[test]
    fn empty_text_completes_at_start_delay() {
        let mut queue = TimerQueue::new();
        let mut reveal = TypewriterReveal::new(RevealConfig::new(MS_10).start_delay(ms(40)));
        reveal.set_text("", &mut queue);
        let events = run(&mut reveal, &mut queue, ms(100));
        assert_eq!(events, vec![(40, RevealEvent::Completed)]);
    }

    #[test]
    fn cancel_stops_the_chain() {
        let mut queue = TimerQueue::new();
        let mut reveal = TypewriterReveal::new(RevealConfig::new(MS_10));
        reveal.set_text("abcdef", &mut queue);
        run(&mut reveal, &mut queue, ms(30));
        reveal.cancel(&mut queue);
        assert!(queue.is_empty());
        assert!(run(&mut reveal, &mut queue, ms(1_000)).is_empty());
        assert_eq!(reveal.revealed_text(), "abc");
        assert!(!reveal.is_running());
        assert!(!reveal.is_complete());
    }
}
