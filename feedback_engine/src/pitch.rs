//! Pitch escalation
//!
//! A decaying counter that raises feedback pitch during rapid consecutive
//! typing. Each qualifying insert increments the counter and re-arms a
//! single decay deadline (cancel-then-reschedule, so at most one decay is
//! ever pending). When the deadline passes with no further insert, the
//! counter drops back to zero.

/// Escalation value at which the multiplier saturates
const ESCALATION_CAP: f64 = 20.0;

/// Multiplier gained per escalation point
const PITCH_STEP: f64 = 0.05;

/// Decaying pitch-escalation counter
///
/// Time is supplied by the caller in milliseconds; the decay is a cooperative
/// deadline checked on the event loop, not a background timer, so it can
/// never race an insert on the same loop.
#[derive(Debug, Clone)]
pub struct PitchEscalation {
    streak_timeout_ms: u64,
    counter: f64,
    decay_deadline_ms: Option<u64>,
}

impl PitchEscalation {
    /// Creates a new escalation counter at zero
    pub fn new(streak_timeout_ms: u64) -> Self {
        Self {
            streak_timeout_ms,
            counter: 0.0,
            decay_deadline_ms: None,
        }
    }

    /// Registers one qualifying insert at the given time
    ///
    /// Applies any expired decay first, then increments the counter by
    /// exactly 1.0 and replaces the pending decay deadline.
    pub fn on_qualifying_insert(&mut self, now_ms: u64) {
        self.tick(now_ms);
        self.counter += 1.0;
        self.decay_deadline_ms = Some(now_ms.saturating_add(self.streak_timeout_ms));
    }

    /// Applies the decay if its deadline has passed
    pub fn tick(&mut self, now_ms: u64) {
        if let Some(deadline) = self.decay_deadline_ms {
            if now_ms >= deadline {
                self.counter = 0.0;
                self.decay_deadline_ms = None;
            }
        }
    }

    /// Returns the feedback-intensity multiplier, in `[1.0, 2.0]`
    ///
    /// Saturates at exactly 2.0 after 20 rapid, unbroken keystrokes.
    pub fn current_multiplier(&self) -> f64 {
        1.0 + self.counter.min(ESCALATION_CAP) * PITCH_STEP
    }

    /// Forces the counter to zero and cancels any pending decay
    pub fn reset(&mut self) {
        self.counter = 0.0;
        self.decay_deadline_ms = None;
    }

    /// Current escalation value
    pub fn escalation(&self) -> f64 {
        self.counter
    }

    /// Returns true if a decay is scheduled and has not fired
    pub fn has_pending_decay(&self) -> bool {
        self.decay_deadline_ms.is_some()
    }

    /// Updates the decay window (applies to the next insert)
    pub fn set_streak_timeout_ms(&mut self, streak_timeout_ms: u64) {
        self.streak_timeout_ms = streak_timeout_ms;
    }

    /// Current decay window in milliseconds
    pub fn streak_timeout_ms(&self) -> u64 {
        self.streak_timeout_ms
    }
}
