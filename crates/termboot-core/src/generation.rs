#![forbid(unsafe_code)]

//! Generation tokens for invalidating stale timer deliveries.
//!
//! Every restart of a timer chain advances its counter, and every payload the
//! chain schedules carries the generation it was scheduled under. A delivery
//! whose generation is no longer current belongs to an abandoned chain and
//! must be ignored, even if cancellation somehow missed it.

/// A generation stamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// Raw numeric value, for logging.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic generation counter owned by one timer chain.
#[derive(Debug, Default, Clone)]
pub struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    /// Start at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The live generation.
    #[inline]
    pub fn current(&self) -> Generation {
        self.current
    }

    /// Invalidate everything stamped so far and return the new generation.
    pub fn advance(&mut self) -> Generation {
        self.current = Generation(self.current.0.wrapping_add(1));
        self.current
    }

    /// Whether `stamp` belongs to the live generation.
    #[inline]
    pub fn is_current(&self, stamp: Generation) -> bool {
        self.current == stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_invalidates_previous() {
        let mut counter = GenerationCounter::new();
        let first = counter.advance();
        assert!(counter.is_current(first));
        let second = counter.advance();
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn fresh_counter_is_generation_zero() {
        let counter = GenerationCounter::new();
        assert_eq!(counter.current().get(), 0);
        assert!(counter.is_current(Generation::default()));
    }
}
