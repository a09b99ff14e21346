#![no_std]

//! # Feedback Types
//!
//! This crate defines the fundamental event and message types for the
//! typing-feedback engine.
//!
//! ## Philosophy
//!
//! - **Events, not hooks**: text mutations arrive as structured events, not
//!   callbacks into host internals
//! - **Messages, not calls**: everything sent to the renderer is a
//!   serializable, fire-and-forget message
//! - **Testable**: events and messages can be constructed and injected freely
//! - **Stable**: the message schema mirrors the panel wire protocol
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A rendering model (the renderer decides what a "blip" looks like)
//! - An editor API (the host decides how mutations are observed)
//! - A persistence schema (see the engine's store module)

extern crate alloc;

use alloc::string::String;
use core::fmt;
use feedback_settings::{FeedbackConfig, ToggleKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Well-known label strings for character-label effects
pub mod labels {
    /// Visible placeholder glyph for a tab insertion
    pub const TAB: &str = "↹";
    /// Label for any blank/whitespace insertion
    pub const SPACE: &str = "SPACE";
    /// Label for a deletion
    pub const BACKSPACE: &str = "BACKSPACE";
}

/// Unique identifier for one editor session
///
/// The dispatcher keys its per-editor bookkeeping by session ID; the host
/// reports session end so entries can be dropped explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new unique session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a SessionId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// A raw text-mutation event supplied by the host editor surface
///
/// One event per editor action. Events with no insertion and no removal
/// carry no information and are ignored by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMutationEvent {
    /// Text inserted by the action (may be multiple characters, e.g. paste)
    pub inserted_text: String,
    /// Number of characters removed by the action
    pub removed_len: usize,
    /// Caret line after the action
    pub caret_line: usize,
}

impl TextMutationEvent {
    /// Creates a new text-mutation event
    pub fn new(inserted_text: impl Into<String>, removed_len: usize, caret_line: usize) -> Self {
        Self {
            inserted_text: inserted_text.into(),
            removed_len,
            caret_line,
        }
    }

    /// Creates a pure insertion event
    pub fn insertion(text: impl Into<String>, caret_line: usize) -> Self {
        Self::new(text, 0, caret_line)
    }

    /// Creates a pure deletion event
    pub fn deletion(removed_len: usize, caret_line: usize) -> Self {
        Self::new("", removed_len, caret_line)
    }

    /// Returns true if the event neither inserts nor removes text
    pub fn is_noop(&self) -> bool {
        self.inserted_text.is_empty() && self.removed_len == 0
    }
}

/// Semantic category of a text-mutation event
///
/// Derived per event by the classifier, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeCategory {
    /// One or more characters inserted (first character is not a newline)
    Insert,
    /// Characters removed with nothing inserted
    Delete,
    /// Insertion beginning with a line break
    Newline,
    /// Neither insertion nor removal; produces no downstream effect
    None,
}

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeCategory::Insert => write!(f, "Insert"),
            ChangeCategory::Delete => write!(f, "Delete"),
            ChangeCategory::Newline => write!(f, "Newline"),
            ChangeCategory::None => write!(f, "None"),
        }
    }
}

/// Result of classifying a text-mutation event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Semantic category
    pub category: ChangeCategory,
    /// Character label for label effects, when enabled and applicable
    pub label: Option<String>,
}

impl Classification {
    /// Creates a classification without a label
    pub fn bare(category: ChangeCategory) -> Self {
        Self {
            category,
            label: None,
        }
    }

    /// Creates a classification with a label
    pub fn labeled(category: ChangeCategory, label: impl Into<String>) -> Self {
        Self {
            category,
            label: Some(label.into()),
        }
    }
}

/// Progression snapshot sent to the renderer for status display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionSnapshot {
    /// Total experience points
    pub xp: u64,
    /// Current level (starts at 1)
    pub level: u32,
    /// Cumulative XP at which the next level begins
    pub xp_next: f64,
    /// Cumulative XP at which the current level began
    pub xp_level_start: f64,
}

/// Outbound message to the renderer
///
/// All emission is fire-and-forget; the engine never waits for an
/// acknowledgment. The serialized form is the panel wire protocol
/// (`{"type": "blip", ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FeedbackMessage {
    /// Panel-ready handshake reply: full configuration plus snapshot
    Init {
        settings: FeedbackConfig,
        #[serde(flatten)]
        snapshot: ProgressionSnapshot,
    },
    /// Progression snapshot for UI display
    State {
        #[serde(flatten)]
        snapshot: ProgressionSnapshot,
    },
    /// Configuration snapshot reply
    Settings { settings: FeedbackConfig },
    /// Insertion audio feedback; pitch is the escalation multiplier
    Blip { volume: f64, pitch: f64 },
    /// Newline/delete audio feedback
    Boom { volume: f64 },
    /// Level-up celebration
    Fireworks,
    /// Insertion decoration, optionally carrying a character label
    ShowBlip { label: Option<String>, shake: bool },
    /// Deletion decoration, optionally carrying a character label
    ShowBoom { label: Option<String>, shake: bool },
    /// Newline decoration
    ShowNewline { shake: bool },
    /// Drop all live decorations (entering reduced-effects mode)
    ClearDecorations,
}

/// Inbound request from the panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PanelRequest {
    /// Panel finished loading and wants the init message
    Ready,
    /// Set one feedback toggle
    Toggle { key: ToggleKey, value: bool },
    /// Reset progression to level 1, 0 XP
    ResetXp,
    /// Ask for a fresh progression snapshot
    RequestState,
    /// Ask for a fresh configuration snapshot
    RequestSettings,
}
