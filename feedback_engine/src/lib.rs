//! # Typing-Feedback Engine
//!
//! This crate implements the typing-event classification and progression
//! engine behind gamified editor feedback.
//!
//! ## Philosophy
//!
//! - **Classify, then dispatch**: raw text mutations become semantic
//!   categories before anything reacts to them
//! - **Messages, not rendering**: the engine emits fire-and-forget commands;
//!   the renderer decides what they look and sound like
//! - **Explicit time**: the pitch-decay timer is a deadline checked on the
//!   event loop, driven through an injectable [`Clock`]
//! - **Best-effort persistence**: progression is saved after every mutation;
//!   a failed write is stale state, not an error
//! - **Testable**: every seam (renderer, store, clock) is a trait that can be
//!   replaced under test
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A renderer (no visuals, no audio playback, no particle animation)
//! - A settings backend (configuration arrives as a typed snapshot)
//! - An editor integration (the host supplies [`TextMutationEvent`]s)
//!
//! [`TextMutationEvent`]: feedback_types::TextMutationEvent

pub mod classify;
pub mod clock;
pub mod dispatcher;
pub mod pitch;
pub mod progression;
pub mod status;
pub mod store;

pub use classify::classify;
pub use clock::{Clock, MonotonicClock, SimClock};
pub use dispatcher::{Dispatcher, EffectSink};
pub use pitch::PitchEscalation;
pub use progression::{Progress, ProgressionEngine};
pub use status::render_status;
pub use store::{
    ConfigStore, MemoryConfigStore, MemoryProgressStore, ProgressRecord, ProgressStore, StoreError,
};
