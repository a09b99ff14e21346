#![no_std]

//! # Feedback Settings
//!
//! Typed configuration for the typing-feedback engine.
//!
//! ## Philosophy
//!
//! - **Typed settings**: every setting is a struct field, not a stringly-typed
//!   key-path looked up at runtime
//! - **Enumerated toggles**: the set of boolean toggles is fixed and known at
//!   build time ([`ToggleKey`]), so no reflection or proxying is needed
//! - **Deterministic**: the whole tree is serializable and reproducible
//! - **Testable**: defaults and toggle mappings can be tested independently
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A general-purpose settings registry
//! - A persistence backend (the host decides where bytes go; see
//!   [`persistence`] for the wire format)
//! - A change-notification system

pub mod persistence;

extern crate alloc;

use alloc::string::{String, ToString};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Insertion "blip" feedback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlipSettings {
    /// Whether blip decorations are shown
    pub enabled: bool,
    /// Blip audio volume (0.0..=1.0), multiplied with the master volume
    pub volume: f64,
    /// Visual scale factor
    pub scale: f64,
    /// Decoration lifetime in milliseconds
    pub duration_ms: u64,
    /// Pause length after which the pitch escalation decays, in milliseconds
    pub streak_timeout_ms: u64,
}

impl Default for BlipSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.7,
            scale: 1.0,
            duration_ms: 400,
            streak_timeout_ms: 180,
        }
    }
}

/// Newline/delete "boom" feedback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoomSettings {
    /// Whether boom decorations are shown
    pub enabled: bool,
    /// Boom audio volume (0.0..=1.0), multiplied with the master volume
    pub volume: f64,
    /// Decoration lifetime in milliseconds
    pub duration_ms: u64,
    /// Visual scale factor
    pub scale: f64,
}

impl Default for BoomSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.5,
            duration_ms: 650,
            scale: 1.0,
        }
    }
}

/// Line-slam feedback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlamSettings {
    /// Whether slam decorations are shown
    pub enabled: bool,
    /// Slam audio volume (0.0..=1.0)
    pub volume: f64,
    /// Decoration lifetime in milliseconds
    pub duration_ms: u64,
}

impl Default for SlamSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.5,
            duration_ms: 300,
        }
    }
}

/// Floating character-label settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeySettings {
    /// Whether character labels are attached to decorations
    pub enabled: bool,
    /// Maximum number of simultaneous labels
    pub max_count: u32,
    /// Label lifetime in milliseconds
    pub duration_ms: u64,
    /// Base scale of a label
    pub scale_base: f64,
    /// Additional scale applied per escalation
    pub scale_add: f64,
    /// Distance a label floats before fading
    pub float_distance: f64,
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_count: 10,
            duration_ms: 300,
            scale_base: 1.0,
            scale_add: 1.0,
            float_distance: 1.0,
        }
    }
}

/// Screen-shake settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShakeSettings {
    /// Whether shakes accompany decorations
    pub enabled: bool,
    /// Shake duration in milliseconds
    pub duration_ms: u64,
    /// Shake displacement intensity
    pub intensity: f64,
}

impl Default for ShakeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 120,
            intensity: 4.0,
        }
    }
}

/// Level-up fireworks settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FireworkSettings {
    /// Whether the level-up celebration fires
    pub enabled: bool,
    /// Fireworks audio volume (0.0..=1.0)
    pub volume: f64,
}

impl Default for FireworkSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.7,
        }
    }
}

/// Master audio settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SoundSettings {
    /// Whether any audio commands are emitted
    pub enabled: bool,
    /// Master volume (0.0..=1.0), multiplied into every audio command
    pub volume: f64,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.7,
        }
    }
}

/// Reduced-effects mode
///
/// When enabled, every outbound command except the progression snapshot is
/// suppressed. XP accounting continues unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReducedEffectsSettings {
    pub enabled: bool,
}

impl Default for ReducedEffectsSettings {
    fn default() -> Self {
        Self { enabled: false }
    }
}

/// General engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralSettings {
    /// Maximum number of simultaneous decorations
    pub max_decoration_count: u32,
    /// Minimum interval between renderer updates, in milliseconds
    pub update_rate_ms: u64,
    /// XP scale (`base_xp` of the progression curve); must be positive
    pub xp_scale: f64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            max_decoration_count: 10,
            update_rate_ms: 50,
            xp_scale: 50.0,
        }
    }
}

/// Status-line settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusBarSettings {
    /// Whether the status line is rendered
    pub enabled: bool,
    /// Template with `{level}`, `{currentXP}` and `{targetXP}` placeholders
    pub template: String,
}

impl Default for StatusBarSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            template: "$(rocket) Lv.{level} — {currentXP} / {targetXP} XP".to_string(),
        }
    }
}

/// The full typed configuration tree for the feedback engine
///
/// The engine only ever reads these fields; it never depends on where the
/// host stores them. Missing fields deserialize to their defaults, so a
/// partial snapshot from the host is always valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedbackConfig {
    pub blips: BlipSettings,
    pub booms: BoomSettings,
    pub slams: SlamSettings,
    pub keys: KeySettings,
    pub shakes: ShakeSettings,
    pub fireworks: FireworkSettings,
    pub sounds: SoundSettings,
    pub reduced_effects: ReducedEffectsSettings,
    pub general: GeneralSettings,
    pub status_bar: StatusBarSettings,
}

impl FeedbackConfig {
    /// Creates a configuration with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the enabled flag addressed by a toggle key
    pub fn toggle_value(&self, key: ToggleKey) -> bool {
        match key {
            ToggleKey::Blips => self.blips.enabled,
            ToggleKey::Booms => self.booms.enabled,
            ToggleKey::Keys => self.keys.enabled,
            ToggleKey::Shakes => self.shakes.enabled,
            ToggleKey::Sounds => self.sounds.enabled,
            ToggleKey::Fireworks => self.fireworks.enabled,
            ToggleKey::ReducedEffects => self.reduced_effects.enabled,
        }
    }

    /// Sets the enabled flag addressed by a toggle key
    pub fn apply_toggle(&mut self, key: ToggleKey, value: bool) {
        match key {
            ToggleKey::Blips => self.blips.enabled = value,
            ToggleKey::Booms => self.booms.enabled = value,
            ToggleKey::Keys => self.keys.enabled = value,
            ToggleKey::Shakes => self.shakes.enabled = value,
            ToggleKey::Sounds => self.sounds.enabled = value,
            ToggleKey::Fireworks => self.fireworks.enabled = value,
            ToggleKey::ReducedEffects => self.reduced_effects.enabled = value,
        }
    }

    /// Flips the enabled flag addressed by a toggle key, returning the new value
    pub fn flip_toggle(&mut self, key: ToggleKey) -> bool {
        let value = !self.toggle_value(key);
        self.apply_toggle(key, value);
        value
    }
}

/// Identifier for a boolean feedback toggle
///
/// The set of toggles is fixed at build time; each key maps to exactly one
/// `enabled` field of [`FeedbackConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToggleKey {
    Blips,
    Booms,
    Keys,
    Shakes,
    Sounds,
    Fireworks,
    ReducedEffects,
}

impl ToggleKey {
    /// All toggle keys, in a stable order
    pub const ALL: [ToggleKey; 7] = [
        ToggleKey::Blips,
        ToggleKey::Booms,
        ToggleKey::Keys,
        ToggleKey::Shakes,
        ToggleKey::Sounds,
        ToggleKey::Fireworks,
        ToggleKey::ReducedEffects,
    ];

    /// Returns the key as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleKey::Blips => "blips",
            ToggleKey::Booms => "booms",
            ToggleKey::Keys => "keys",
            ToggleKey::Shakes => "shakes",
            ToggleKey::Sounds => "sounds",
            ToggleKey::Fireworks => "fireworks",
            ToggleKey::ReducedEffects => "reducedEffects",
        }
    }
}

impl fmt::Display for ToggleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
