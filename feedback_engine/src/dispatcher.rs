//! Event dispatch
//!
//! The dispatcher composes the classifier, pitch escalation and progression
//! per incoming event: classify, update pitch, update XP, emit renderer
//! commands. It owns all mutable engine state for one editor session context
//! and runs every step to completion on a single loop; the only timed element
//! is the pitch-decay deadline, checked cooperatively at each step.

use std::collections::HashMap;

use crate::classify::classify;
use crate::clock::Clock;
use crate::pitch::PitchEscalation;
use crate::progression::ProgressionEngine;
use crate::status::render_status;
use crate::store::{ConfigStore, ProgressStore};
use feedback_settings::FeedbackConfig;
use feedback_types::{
    ChangeCategory, FeedbackMessage, PanelRequest, SessionId, TextMutationEvent,
};

/// Renderer message outlet
///
/// Fire-and-forget: implementations must accept the message without blocking
/// the caller, and the dispatcher never waits for an acknowledgment.
pub trait EffectSink {
    fn send(&mut self, message: FeedbackMessage);
}

/// Collecting sink, convenient for tests and buffering hosts
impl EffectSink for Vec<FeedbackMessage> {
    fn send(&mut self, message: FeedbackMessage) {
        self.push(message);
    }
}

/// The typing-feedback dispatcher
///
/// Owns the progression and pitch state exclusively; nothing else mutates
/// them. Per-session caret-line bookkeeping is an explicit map keyed by
/// [`SessionId`], with entries removed when the host reports session end.
pub struct Dispatcher<S: ProgressStore, C: ConfigStore, T: Clock> {
    config: FeedbackConfig,
    progression: ProgressionEngine<S>,
    pitch: PitchEscalation,
    config_store: C,
    clock: T,
    last_line: HashMap<SessionId, usize>,
}

impl<S: ProgressStore, C: ConfigStore, T: Clock> Dispatcher<S, C, T> {
    /// Creates a dispatcher, restoring persisted progression
    pub fn new(config: FeedbackConfig, progress_store: S, config_store: C, clock: T) -> Self {
        let pitch = PitchEscalation::new(config.blips.streak_timeout_ms);
        let progression = ProgressionEngine::new(progress_store, config.general.xp_scale);
        Self {
            config,
            progression,
            pitch,
            config_store,
            clock,
            last_line: HashMap::new(),
        }
    }

    /// Processes one text-mutation event
    ///
    /// Runs to completion before the next event is handled; emits renderer
    /// commands through `sink` according to the current configuration.
    pub fn handle_event(
        &mut self,
        session: SessionId,
        event: &TextMutationEvent,
        sink: &mut dyn EffectSink,
    ) {
        let now_ms = self.clock.now_ms();
        self.pitch.tick(now_ms);

        let classification = classify(event, self.config.keys.enabled);
        if classification.category == ChangeCategory::None {
            return;
        }

        let reduced = self.config.reduced_effects.enabled;
        match classification.category {
            ChangeCategory::Newline => {
                if !reduced {
                    if self.config.booms.enabled {
                        sink.send(FeedbackMessage::ShowNewline {
                            shake: self.config.shakes.enabled,
                        });
                    }
                    self.send_boom(sink);
                }
            }
            ChangeCategory::Insert => {
                self.pitch.on_qualifying_insert(now_ms);
                if !reduced {
                    if self.config.sounds.enabled {
                        sink.send(FeedbackMessage::Blip {
                            volume: self.config.blips.volume * self.config.sounds.volume,
                            pitch: self.pitch.current_multiplier(),
                        });
                    }
                    if self.config.blips.enabled {
                        sink.send(FeedbackMessage::ShowBlip {
                            label: classification.label.clone(),
                            shake: self.config.shakes.enabled,
                        });
                    }
                }
            }
            ChangeCategory::Delete => {
                if !reduced {
                    self.send_boom(sink);
                    if self.config.booms.enabled {
                        sink.send(FeedbackMessage::ShowBoom {
                            label: classification.label.clone(),
                            shake: self.config.shakes.enabled,
                        });
                    }
                }
            }
            // Already filtered out above
            ChangeCategory::None => {}
        }

        // Only qualifying inserts earn XP; the snapshot follows every XP
        // mutation even when no level changed.
        if classification.category == ChangeCategory::Insert {
            let leveled_up = self.progression.add_xp(1);
            if leveled_up && self.config.fireworks.enabled && !reduced {
                sink.send(FeedbackMessage::Fireworks);
            }
            self.push_state(sink);
        }

        self.last_line.insert(session, event.caret_line);
    }

    /// Handles one inbound panel request
    pub fn handle_request(&mut self, request: PanelRequest, sink: &mut dyn EffectSink) {
        match request {
            PanelRequest::Ready => {
                sink.send(FeedbackMessage::Init {
                    settings: self.config.clone(),
                    snapshot: self.progression.snapshot(),
                });
            }
            PanelRequest::Toggle { key, value } => {
                self.config.apply_toggle(key, value);
                // Best-effort, like progression persistence
                let _ = self.config_store.save(&self.config);
            }
            PanelRequest::ResetXp => {
                self.progression.reset();
                self.push_state(sink);
            }
            PanelRequest::RequestState => self.push_state(sink),
            PanelRequest::RequestSettings => {
                sink.send(FeedbackMessage::Settings {
                    settings: self.config.clone(),
                });
            }
        }
    }

    /// Applies a changed configuration snapshot
    ///
    /// Re-bases the progression onto the (possibly changed) XP scale and
    /// pushes a fresh snapshot. Entering reduced-effects mode drops all live
    /// decorations.
    pub fn refresh_config(&mut self, config: FeedbackConfig, sink: &mut dyn EffectSink) {
        self.config = config;
        self.pitch
            .set_streak_timeout_ms(self.config.blips.streak_timeout_ms);

        if self.config.reduced_effects.enabled {
            sink.send(FeedbackMessage::ClearDecorations);
        }

        self.progression.set_base_xp(self.config.general.xp_scale);
        self.push_state(sink);
    }

    /// Drops bookkeeping for an ended editor session
    pub fn session_ended(&mut self, session: SessionId) {
        self.last_line.remove(&session);
    }

    /// Renders the status line for the current progression
    pub fn status_line(&self) -> Option<String> {
        render_status(
            &self.config.status_bar,
            self.progression.level(),
            &self.progression.progress(),
        )
    }

    /// Current configuration
    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    /// The progression state machine
    pub fn progression(&self) -> &ProgressionEngine<S> {
        &self.progression
    }

    /// The pitch-escalation counter
    pub fn pitch(&self) -> &PitchEscalation {
        &self.pitch
    }

    /// The configuration store
    pub fn config_store(&self) -> &C {
        &self.config_store
    }

    /// Mutable clock access, for hosts that drive simulated time
    pub fn clock_mut(&mut self) -> &mut T {
        &mut self.clock
    }

    /// Last caret line seen for a session
    pub fn last_line(&self, session: SessionId) -> Option<usize> {
        self.last_line.get(&session).copied()
    }

    fn send_boom(&mut self, sink: &mut dyn EffectSink) {
        if self.config.sounds.enabled {
            sink.send(FeedbackMessage::Boom {
                volume: self.config.booms.volume * self.config.sounds.volume,
            });
        }
    }

    fn push_state(&mut self, sink: &mut dyn EffectSink) {
        sink.send(FeedbackMessage::State {
            snapshot: self.progression.snapshot(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SimClock;
    use crate::store::{MemoryConfigStore, MemoryProgressStore, ProgressRecord};
    use feedback_settings::ToggleKey;

    type TestDispatcher = Dispatcher<MemoryProgressStore, MemoryConfigStore, SimClock>;

    fn dispatcher(config: FeedbackConfig) -> TestDispatcher {
        Dispatcher::new(
            config,
            MemoryProgressStore::new(),
            MemoryConfigStore::new(),
            SimClock::new(),
        )
    }

    fn insert(text: &str) -> TextMutationEvent {
        TextMutationEvent::insertion(text, 0)
    }

    fn kinds(messages: &[FeedbackMessage]) -> Vec<&'static str> {
        messages
            .iter()
            .map(|m| match m {
                FeedbackMessage::Init { .. } => "init",
                FeedbackMessage::State { .. } => "state",
                FeedbackMessage::Settings { .. } => "settings",
                FeedbackMessage::Blip { .. } => "blip",
                FeedbackMessage::Boom { .. } => "boom",
                FeedbackMessage::Fireworks => "fireworks",
                FeedbackMessage::ShowBlip { .. } => "showBlip",
                FeedbackMessage::ShowBoom { .. } => "showBoom",
                FeedbackMessage::ShowNewline { .. } => "showNewline",
                FeedbackMessage::ClearDecorations => "clearDecorations",
            })
            .collect()
    }

    #[test]
    fn test_insert_emits_blip_decoration_and_state() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let mut sink = Vec::new();

        dispatcher.handle_event(SessionId::new(), &insert("a"), &mut sink);

        assert_eq!(kinds(&sink), vec!["blip", "showBlip", "state"]);
        match &sink[0] {
            FeedbackMessage::Blip { volume, pitch } => {
                assert_eq!(*volume, 0.7 * 0.7);
                assert_eq!(*pitch, 1.05);
            }
            other => panic!("expected blip, got {:?}", other),
        }
        match &sink[1] {
            FeedbackMessage::ShowBlip { label, shake } => {
                assert_eq!(label.as_deref(), Some("a"));
                assert!(*shake);
            }
            other => panic!("expected showBlip, got {:?}", other),
        }
        assert_eq!(dispatcher.progression().xp(), 1);
    }

    #[test]
    fn test_delete_emits_boom_with_label_and_no_xp() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let mut sink = Vec::new();

        dispatcher.handle_event(SessionId::new(), &TextMutationEvent::deletion(3, 1), &mut sink);

        assert_eq!(kinds(&sink), vec!["boom", "showBoom"]);
        match &sink[0] {
            FeedbackMessage::Boom { volume } => assert_eq!(*volume, 0.5 * 0.7),
            other => panic!("expected boom, got {:?}", other),
        }
        match &sink[1] {
            FeedbackMessage::ShowBoom { label, .. } => {
                assert_eq!(label.as_deref(), Some("BACKSPACE"));
            }
            other => panic!("expected showBoom, got {:?}", other),
        }
        assert_eq!(dispatcher.progression().xp(), 0);
    }

    #[test]
    fn test_newline_emits_impact_without_xp() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let mut sink = Vec::new();

        dispatcher.handle_event(SessionId::new(), &insert("\n"), &mut sink);

        assert_eq!(kinds(&sink), vec!["showNewline", "boom"]);
        assert_eq!(dispatcher.progression().xp(), 0);
        assert_eq!(dispatcher.pitch().escalation(), 0.0);
    }

    #[test]
    fn test_noop_event_is_dropped() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let mut sink = Vec::new();

        dispatcher.handle_event(SessionId::new(), &TextMutationEvent::new("", 0, 9), &mut sink);

        assert!(sink.is_empty());
        assert_eq!(dispatcher.progression().xp(), 0);
    }

    #[test]
    fn test_reduced_effects_keeps_xp_and_state_only() {
        let mut config = FeedbackConfig::default();
        config.reduced_effects.enabled = true;
        let mut dispatcher = dispatcher(config);
        let mut sink = Vec::new();

        dispatcher.handle_event(SessionId::new(), &insert("a"), &mut sink);
        dispatcher.handle_event(SessionId::new(), &TextMutationEvent::deletion(1, 0), &mut sink);

        assert_eq!(kinds(&sink), vec!["state"]);
        assert_eq!(dispatcher.progression().xp(), 1);
    }

    #[test]
    fn test_sounds_disabled_suppresses_audio_only() {
        let mut config = FeedbackConfig::default();
        config.sounds.enabled = false;
        let mut dispatcher = dispatcher(config);
        let mut sink = Vec::new();

        dispatcher.handle_event(SessionId::new(), &insert("a"), &mut sink);
        dispatcher.handle_event(SessionId::new(), &TextMutationEvent::deletion(1, 0), &mut sink);

        assert_eq!(kinds(&sink), vec!["showBlip", "state", "showBoom"]);
    }

    #[test]
    fn test_labels_disabled_strips_labels() {
        let mut config = FeedbackConfig::default();
        config.keys.enabled = false;
        let mut dispatcher = dispatcher(config);
        let mut sink = Vec::new();

        dispatcher.handle_event(SessionId::new(), &insert("a"), &mut sink);

        match &sink[1] {
            FeedbackMessage::ShowBlip { label, .. } => assert_eq!(*label, None),
            other => panic!("expected showBlip, got {:?}", other),
        }
    }

    #[test]
    fn test_level_up_fires_fireworks_before_state() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let session = SessionId::new();

        // Level 2 begins at 100 XP with the default scale of 50
        for _ in 0..99 {
            dispatcher.handle_event(session, &insert("a"), &mut Vec::<FeedbackMessage>::new());
        }

        let mut sink = Vec::new();
        dispatcher.handle_event(session, &insert("a"), &mut sink);

        assert_eq!(kinds(&sink), vec!["blip", "showBlip", "fireworks", "state"]);
        assert_eq!(dispatcher.progression().level(), 2);
    }

    #[test]
    fn test_fireworks_disabled_still_pushes_state() {
        let mut config = FeedbackConfig::default();
        config.fireworks.enabled = false;
        let mut dispatcher = dispatcher(config);
        let session = SessionId::new();

        for _ in 0..99 {
            dispatcher.handle_event(session, &insert("a"), &mut Vec::<FeedbackMessage>::new());
        }
        let mut sink = Vec::new();
        dispatcher.handle_event(session, &insert("a"), &mut sink);

        assert_eq!(kinds(&sink), vec!["blip", "showBlip", "state"]);
        assert_eq!(dispatcher.progression().level(), 2);
    }

    #[test]
    fn test_pitch_rises_and_decays_across_events() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let session = SessionId::new();

        let mut sink = Vec::new();
        dispatcher.handle_event(session, &insert("a"), &mut sink);
        dispatcher.clock_mut().advance_ms(50);
        dispatcher.handle_event(session, &insert("b"), &mut sink);

        match &sink[3] {
            FeedbackMessage::Blip { pitch, .. } => assert_eq!(*pitch, 1.1),
            other => panic!("expected blip, got {:?}", other),
        }

        // Pause past the streak timeout: escalation restarts
        dispatcher.clock_mut().advance_ms(500);
        let mut sink = Vec::new();
        dispatcher.handle_event(session, &insert("c"), &mut sink);

        match &sink[0] {
            FeedbackMessage::Blip { pitch, .. } => assert_eq!(*pitch, 1.05),
            other => panic!("expected blip, got {:?}", other),
        }
    }

    #[test]
    fn test_ready_request_gets_init() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let mut sink = Vec::new();

        dispatcher.handle_request(PanelRequest::Ready, &mut sink);

        match &sink[0] {
            FeedbackMessage::Init { settings, snapshot } => {
                assert_eq!(*settings, FeedbackConfig::default());
                assert_eq!(snapshot.level, 1);
            }
            other => panic!("expected init, got {:?}", other),
        }
    }

    #[test]
    fn test_toggle_request_flips_flag_and_persists() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let mut sink = Vec::new();

        dispatcher.handle_request(
            PanelRequest::Toggle {
                key: ToggleKey::Sounds,
                value: false,
            },
            &mut sink,
        );

        assert!(sink.is_empty());
        assert!(!dispatcher.config().sounds.enabled);

        let saved = dispatcher.config_store().config().unwrap();
        assert!(!saved.sounds.enabled);
    }

    #[test]
    fn test_reset_request_resets_and_pushes_state() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let session = SessionId::new();
        for _ in 0..10 {
            dispatcher.handle_event(session, &insert("a"), &mut Vec::<FeedbackMessage>::new());
        }

        let mut sink = Vec::new();
        dispatcher.handle_request(PanelRequest::ResetXp, &mut sink);

        assert_eq!(kinds(&sink), vec!["state"]);
        assert_eq!(dispatcher.progression().xp(), 0);
        assert_eq!(dispatcher.progression().level(), 1);
    }

    #[test]
    fn test_state_and_settings_requests() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let mut sink = Vec::new();

        dispatcher.handle_request(PanelRequest::RequestState, &mut sink);
        dispatcher.handle_request(PanelRequest::RequestSettings, &mut sink);

        assert_eq!(kinds(&sink), vec!["state", "settings"]);
    }

    #[test]
    fn test_refresh_config_rebases_progression() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let session = SessionId::new();
        for _ in 0..100 {
            dispatcher.handle_event(session, &insert("a"), &mut Vec::<FeedbackMessage>::new());
        }
        assert_eq!(dispatcher.progression().level(), 2);

        let mut config = FeedbackConfig::default();
        config.general.xp_scale = 10.0;
        let mut sink = Vec::new();
        dispatcher.refresh_config(config, &mut sink);

        assert_eq!(kinds(&sink), vec!["state"]);
        assert!(dispatcher.progression().level() > 2);
        assert_eq!(dispatcher.progression().xp(), 100);
    }

    #[test]
    fn test_refresh_into_reduced_effects_clears_decorations() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());

        let mut config = FeedbackConfig::default();
        config.reduced_effects.enabled = true;
        let mut sink = Vec::new();
        dispatcher.refresh_config(config, &mut sink);

        assert_eq!(kinds(&sink), vec!["clearDecorations", "state"]);
    }

    #[test]
    fn test_refresh_config_updates_streak_timeout() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());

        let mut config = FeedbackConfig::default();
        config.blips.streak_timeout_ms = 999;
        dispatcher.refresh_config(config, &mut Vec::<FeedbackMessage>::new());

        assert_eq!(dispatcher.pitch().streak_timeout_ms(), 999);
    }

    #[test]
    fn test_last_line_tracking_and_session_end() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let session = SessionId::new();
        let other = SessionId::new();

        dispatcher.handle_event(session, &TextMutationEvent::insertion("a", 7), &mut Vec::<FeedbackMessage>::new());
        assert_eq!(dispatcher.last_line(session), Some(7));
        assert_eq!(dispatcher.last_line(other), None);

        dispatcher.session_ended(session);
        assert_eq!(dispatcher.last_line(session), None);
    }

    #[test]
    fn test_restored_progression_survives_dispatch() {
        let store = MemoryProgressStore::with_record(ProgressRecord::new(99, 1));
        let mut dispatcher = Dispatcher::new(
            FeedbackConfig::default(),
            store,
            MemoryConfigStore::new(),
            SimClock::new(),
        );

        let mut sink = Vec::new();
        dispatcher.handle_event(SessionId::new(), &insert("a"), &mut sink);

        // 100 XP crosses into level 2
        assert!(kinds(&sink).contains(&"fireworks"));
        assert_eq!(dispatcher.progression().level(), 2);
    }

    #[test]
    fn test_status_line_reflects_progression() {
        let mut dispatcher = dispatcher(FeedbackConfig::default());
        let session = SessionId::new();
        for _ in 0..30 {
            dispatcher.handle_event(session, &insert("a"), &mut Vec::<FeedbackMessage>::new());
        }

        let line = dispatcher.status_line().unwrap();
        assert!(line.contains("Lv.1"));
        assert!(line.contains("30 / 100 XP"));
    }
}
