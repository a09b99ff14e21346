//! Time sources
//!
//! The engine never reads wall-clock time directly. All timing flows through
//! the [`Clock`] trait so tests can drive time deterministically.

use std::time::Instant;

/// Millisecond time source
pub trait Clock {
    /// Returns the current time in milliseconds since an arbitrary origin.
    /// Must be monotonic.
    fn now_ms(&mut self) -> u64;
}

/// Wall-clock backed time source
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock with its origin at construction time
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&mut self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Simulated clock with controllable time progression
///
/// Only advances when explicitly instructed via `advance_ms()`, making
/// timing tests predictable and reproducible.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now_ms: u64,
}

impl SimClock {
    /// Creates a simulated clock starting at 0 ms
    pub fn new() -> Self {
        Self { now_ms: 0 }
    }

    /// Creates a simulated clock starting at a specific time
    pub fn with_now_ms(now_ms: u64) -> Self {
        Self { now_ms }
    }

    /// Advances the clock by the specified number of milliseconds
    ///
    /// # Panics
    ///
    /// Panics if advancing would overflow u64.
    pub fn advance_ms(&mut self, delta: u64) {
        self.now_ms = self.now_ms.checked_add(delta).expect("Clock overflow");
    }

    /// Returns the current time without advancing it
    pub fn current_ms(&self) -> u64 {
        self.now_ms
    }
}

impl Clock for SimClock {
    fn now_ms(&mut self) -> u64 {
        self.now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_clock_starts_at_zero() {
        let mut clock = SimClock::new();
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn test_sim_clock_advances() {
        let mut clock = SimClock::new();
        clock.advance_ms(100);
        assert_eq!(clock.now_ms(), 100);
        clock.advance_ms(50);
        assert_eq!(clock.now_ms(), 150);
    }

    #[test]
    fn test_sim_clock_with_initial_time() {
        let mut clock = SimClock::with_now_ms(1000);
        assert_eq!(clock.now_ms(), 1000);
    }

    #[test]
    fn test_sim_clock_current_ms_immutable() {
        let clock = SimClock::with_now_ms(42);
        assert_eq!(clock.current_ms(), 42);
        assert_eq!(clock.current_ms(), 42);
    }

    #[test]
    #[should_panic(expected = "Clock overflow")]
    fn test_sim_clock_overflow_panics() {
        let mut clock = SimClock::with_now_ms(u64::MAX);
        clock.advance_ms(1);
    }

    #[test]
    fn test_monotonic_clock_is_monotonic() {
        let mut clock = MonotonicClock::new();
        let t1 = clock.now_ms();
        let t2 = clock.now_ms();
        assert!(t2 >= t1);
    }
}
