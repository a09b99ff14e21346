//! XP and leveling
//!
//! A state machine over `(xp, level)` with a non-linear threshold curve.
//! The absolute curve decides level transitions; the relative curve reports
//! the span of the current level for progress-bar display. The two are
//! computed by independent formulas and are deliberately not unified.

use crate::store::{ProgressRecord, ProgressStore};
use feedback_types::ProgressionSnapshot;

/// Progress through the current level, for progress-bar rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// XP accumulated inside the current level
    pub current: f64,
    /// XP span of the current level
    pub max: f64,
}

/// The XP/level state machine
///
/// Created at session start from the persisted `(xp, level)` pair, or the
/// `(0, 1)` default when the store has nothing (or fails to read). Every
/// mutation is persisted through the store, best-effort.
pub struct ProgressionEngine<S: ProgressStore> {
    store: S,
    base_xp: f64,
    xp: u64,
    level: u32,
    xp_current_level_abs: f64,
    xp_next_level_abs: f64,
    xp_next_level_rel: f64,
}

impl<S: ProgressStore> ProgressionEngine<S> {
    /// Creates an engine, restoring persisted state when present
    ///
    /// `base_xp` must be positive; a non-positive scale is a configuration
    /// contract violation, not a runtime condition the engine detects.
    pub fn new(mut store: S, base_xp: f64) -> Self {
        let record = match store.load() {
            Ok(Some(record)) => record,
            // A failed read is treated the same as an empty store
            Ok(None) | Err(_) => ProgressRecord::initial(),
        };

        let mut engine = Self {
            store,
            base_xp,
            xp: record.xp,
            level: record.level,
            xp_current_level_abs: 0.0,
            xp_next_level_abs: 0.0,
            xp_next_level_rel: 0.0,
        };
        engine.update_level_xps();
        engine
    }

    /// Adds XP, returning whether at least one level transition occurred
    ///
    /// Level increments repeat until the threshold invariant holds again, so
    /// arbitrarily large deltas resolve correctly even though ordinary typing
    /// only ever adds 1.
    pub fn add_xp(&mut self, n: u64) -> bool {
        self.xp = self.xp.saturating_add(n);

        let mut leveled_up = false;
        while self.xp as f64 >= self.xp_next_level_abs {
            self.level += 1;
            self.update_level_xps();
            leveled_up = true;
        }

        self.persist();
        leveled_up
    }

    /// Re-bases the curve onto a new XP scale
    ///
    /// The level is recomputed from total XP under the new scale; this can
    /// move the reported level without changing `xp`.
    pub fn set_base_xp(&mut self, base_xp: f64) {
        self.base_xp = base_xp;
        self.level = self.inverse_level(self.xp);
        self.update_level_xps();
        self.persist();
    }

    /// Resets progression to level 1, 0 XP
    pub fn reset(&mut self) {
        self.level = 1;
        self.xp = 0;
        self.update_level_xps();
        self.persist();
    }

    /// Progress through the current level
    pub fn progress(&self) -> Progress {
        Progress {
            current: self.xp as f64 - self.xp_current_level_abs,
            max: self.xp_next_level_rel,
        }
    }

    /// Snapshot for the renderer
    pub fn snapshot(&self) -> ProgressionSnapshot {
        ProgressionSnapshot {
            xp: self.xp,
            level: self.level,
            xp_next: self.xp_next_level_abs,
            xp_level_start: self.xp_current_level_abs,
        }
    }

    /// Total experience points
    pub fn xp(&self) -> u64 {
        self.xp
    }

    /// Current level
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Current XP scale
    pub fn base_xp(&self) -> f64 {
        self.base_xp
    }

    /// Cumulative XP at which the next level begins
    pub fn xp_to_next_level(&self) -> f64 {
        self.xp_next_level_abs
    }

    /// Cumulative XP at which the current level began
    pub fn xp_start_of_level(&self) -> f64 {
        self.xp_current_level_abs
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    fn update_level_xps(&mut self) {
        self.xp_current_level_abs = self.level_threshold_absolute(self.level as i64 - 1);
        self.xp_next_level_abs = self.level_threshold_absolute(self.level as i64);
        self.xp_next_level_rel = self.level_threshold_relative(self.level);
    }

    /// Cumulative XP required to reach the given level
    fn level_threshold_absolute(&self, level: i64) -> f64 {
        if level <= 0 {
            return 0.0;
        }
        let l = (level - 1) as f64;
        (l * l * 0.5 + l * 1.5 + 2.0) * self.base_xp
    }

    /// XP span of the given level (progress reporting only)
    fn level_threshold_relative(&self, level: u32) -> f64 {
        level.max(2) as f64 * self.base_xp
    }

    /// Closed-form estimate of the level containing an XP total
    ///
    /// An approximation used only when re-basing; `update_level_xps` plus the
    /// `add_xp` increment loop restore the threshold invariant afterwards.
    fn inverse_level(&self, xp: u64) -> u32 {
        let xp = xp as f64;
        if xp < 2.0 * self.base_xp {
            return 1;
        }
        let factor = xp / self.base_xp;
        let level = ((2.0 * factor - 1.75).sqrt() - 1.5).floor();
        level.max(0.0) as u32
    }

    // Best-effort: a failed write leaves stale persisted state, corrected by
    // the next successful save.
    fn persist(&mut self) {
        let _ = self
            .store
            .save(&ProgressRecord::new(self.xp, self.level));
    }
}
