//! One prompter run, owned by a single controller.
//!
//! The session wires the countdown, playback engine, voice aligner and pace
//! tracker together and republishes everything they emit as
//! [`PrompterEvent`]s. Presentation code subscribes to those events and sends
//! [`SessionCommand`]s back; it never touches the components directly.

use crate::clock::SharedClock;
use crate::config::PrompterConfig;
use crate::countdown::{Countdown, CountdownEvent};
use crate::engine::{EndReason, PlaybackEngine, PlaybackEvent, PlaybackSnapshot};
use crate::events::EventBus;
use crate::pace::{PaceEvent, PaceTracker, PracticeSummary};
use crate::store::ScriptStore;
use crate::timeline::{self, WordTimeline};
use crate::voice::{
    SpeechRecognizer, VoiceAligner, VoiceEvent, VoiceSettings, VoiceStartError, VoiceStatus,
};
use serde::Serialize;
use std::sync::mpsc::Receiver;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrompterEvent {
    Playback(PlaybackEvent),
    Countdown(CountdownEvent),
    Voice(VoiceEvent),
    Pace(PaceEvent),
    Session(SessionNotice),
}

impl PrompterEvent {
    /// One event as a single JSON line, the shape consumers read from stdout.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SessionNotice {
    PracticeSummary(PracticeSummary),
    SessionClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    CountingDown,
    Playing,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    GetSnapshot,
    Begin,
    SkipCountdown,
    TogglePause,
    Pause,
    Resume,
    SpeedUp { step: f32 },
    SpeedDown { step: f32 },
    SetSpeed { speed: f32 },
    SetFontSize { font_size: f32 },
    JumpForward,
    JumpBack,
    ToggleDirection,
    ToggleVoice,
    Close,
}

impl SessionCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetSnapshot => "prompter_get_snapshot",
            Self::Begin => "prompter_begin",
            Self::SkipCountdown => "prompter_skip_countdown",
            Self::TogglePause => "prompter_toggle_pause",
            Self::Pause => "prompter_pause",
            Self::Resume => "prompter_resume",
            Self::SpeedUp { .. } => "prompter_speed_up",
            Self::SpeedDown { .. } => "prompter_speed_down",
            Self::SetSpeed { .. } => "prompter_set_speed",
            Self::SetFontSize { .. } => "prompter_set_font_size",
            Self::JumpForward => "prompter_jump_forward",
            Self::JumpBack => "prompter_jump_back",
            Self::ToggleDirection => "prompter_toggle_direction",
            Self::ToggleVoice => "prompter_toggle_voice",
            Self::Close => "prompter_close",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub playback: PlaybackSnapshot,
    pub countdown_remaining: u32,
    pub current_word: Option<String>,
    pub progress_pct: f64,
    pub elapsed_clock: String,
    pub estimated_read_time: String,
    pub voice_listening: bool,
    pub voice_last_matched: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionEvent {
    pub action: &'static str,
    pub snapshot: SessionSnapshot,
}

pub struct PrompterSession {
    clock: SharedClock,
    config: PrompterConfig,
    script_id: Option<String>,
    script_text: String,
    timeline: WordTimeline,
    phase: SessionPhase,
    engine: PlaybackEngine,
    engine_rx: Receiver<PlaybackEvent>,
    countdown: Countdown,
    countdown_rx: Receiver<CountdownEvent>,
    aligner: Option<VoiceAligner>,
    voice_rx: Option<Receiver<VoiceEvent>>,
    voice_wanted: bool,
    pace: Option<PaceTracker>,
    pace_rx: Option<Receiver<PaceEvent>>,
    store: Option<Box<dyn ScriptStore>>,
    summary: Option<PracticeSummary>,
    events: EventBus<PrompterEvent>,
}

impl PrompterSession {
    pub fn new(
        clock: SharedClock,
        config: PrompterConfig,
        recognizer: Option<Box<dyn SpeechRecognizer>>,
    ) -> Self {
        let config = config.sanitized();
        let mut engine = PlaybackEngine::new(clock.clone(), &config);
        let engine_rx = engine.subscribe();
        let mut countdown = Countdown::new(clock.clone());
        let countdown_rx = countdown.subscribe();

        let mut aligner = recognizer.map(|recognizer| {
            VoiceAligner::new(clock.clone(), recognizer, VoiceSettings::from_config(&config))
        });
        let voice_rx = aligner.as_mut().map(VoiceAligner::subscribe);

        let mut pace = config.practice_tracking.then(|| PaceTracker::new(&config));
        let pace_rx = pace.as_mut().map(PaceTracker::subscribe);

        Self {
            voice_wanted: config.voice_scroll_enabled,
            clock,
            config,
            script_id: None,
            script_text: String::new(),
            timeline: WordTimeline::default(),
            phase: SessionPhase::Idle,
            engine,
            engine_rx,
            countdown,
            countdown_rx,
            aligner,
            voice_rx,
            pace,
            pace_rx,
            store: None,
            summary: None,
            events: EventBus::new(),
        }
    }

    /// Practice stats are reported here when the session finishes.
    pub fn with_store(mut self, store: Box<dyn ScriptStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn subscribe(&mut self) -> Receiver<PrompterEvent> {
        self.events.subscribe()
    }

    pub fn load_script(&mut self, script_id: Option<String>, text: &str) {
        if matches!(self.phase, SessionPhase::CountingDown | SessionPhase::Playing) {
            self.countdown.cancel();
            self.engine.stop();
            if let Some(aligner) = self.aligner.as_mut() {
                if aligner.is_listening() {
                    aligner.stop();
                }
            }
            if let Some(pace) = self.pace.as_mut() {
                pace.stop();
            }
        }
        self.timeline = WordTimeline::build(text);
        self.script_text = text.to_string();
        self.script_id = script_id;
        self.engine.load(self.timeline.clone());
        if let Some(aligner) = self.aligner.as_mut() {
            aligner.load(&self.timeline);
        }
        self.phase = SessionPhase::Idle;
        self.summary = None;
        info!(
            words = self.timeline.len(),
            lines = self.timeline.line_count(),
            read_time = %timeline::estimated_read_time(text, timeline::DEFAULT_READ_WPM),
            "Loaded script"
        );
        self.pump_events(self.clock.now());
    }

    /// Start the countdown; playback begins when it completes.
    pub fn begin(&mut self) {
        if matches!(self.phase, SessionPhase::CountingDown | SessionPhase::Playing) {
            return;
        }
        self.phase = SessionPhase::CountingDown;
        self.summary = None;
        debug!(seconds = self.config.countdown_seconds, "Beginning countdown");
        self.countdown.start(self.config.countdown_seconds);
        self.pump_events(self.clock.now());
    }

    pub fn skip_countdown(&mut self) {
        self.countdown.skip();
        self.pump_events(self.clock.now());
    }

    /// One scheduler step for every component, in dependency order.
    pub fn advance_time(&mut self, now: Instant) {
        self.countdown.poll(now);
        self.pump_events(now);

        self.engine.advance_time(now);
        if let Some(aligner) = self.aligner.as_mut() {
            aligner.poll(now, &mut self.engine);
        }
        if let Some(pace) = self.pace.as_mut() {
            pace.poll(now, &self.engine);
        }
        self.pump_events(now);
    }

    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.advance_time(now);
    }

    pub fn apply_command(&mut self, command: SessionCommand) -> SessionEvent {
        let action = command.action();
        debug!(action, "Applying session command");
        match command {
            SessionCommand::GetSnapshot => {}
            SessionCommand::Begin => self.begin(),
            SessionCommand::SkipCountdown => self.skip_countdown(),
            SessionCommand::TogglePause => self.engine.toggle_pause(),
            SessionCommand::Pause => self.engine.pause(),
            SessionCommand::Resume => self.engine.resume(),
            SessionCommand::SpeedUp { step } => self.engine.increase_speed(step),
            SessionCommand::SpeedDown { step } => self.engine.decrease_speed(step),
            SessionCommand::SetSpeed { speed } => self.engine.set_speed(speed),
            SessionCommand::SetFontSize { font_size } => self.engine.set_font_size(font_size),
            SessionCommand::JumpForward => self.engine.jump_forward(),
            SessionCommand::JumpBack => self.engine.jump_back(),
            SessionCommand::ToggleDirection => self.engine.toggle_direction(),
            SessionCommand::ToggleVoice => self.toggle_voice(),
            SessionCommand::Close => {
                self.close();
            }
        }
        self.pump_events(self.clock.now());
        SessionEvent {
            action,
            snapshot: self.snapshot(),
        }
    }

    pub fn toggle_voice(&mut self) {
        let Some(aligner) = self.aligner.as_mut() else {
            warn!("Voice scrolling requested without a speech recognizer");
            self.events.emit(PrompterEvent::Voice(VoiceEvent::VoiceStatusChanged {
                status: VoiceStatus::Unsupported,
            }));
            return;
        };
        if aligner.is_listening() {
            self.voice_wanted = false;
            aligner.stop();
        } else {
            self.voice_wanted = true;
            if self.phase == SessionPhase::Playing {
                let _ = self.start_voice();
            }
        }
        self.pump_events(self.clock.now());
    }

    fn start_voice(&mut self) -> Result<(), VoiceStartError> {
        let Some(aligner) = self.aligner.as_mut() else {
            return Err(VoiceStartError::Unsupported);
        };
        let result = aligner.start();
        match &result {
            Ok(()) => {
                if self.engine.is_paused() {
                    aligner.pause();
                }
            }
            Err(err) => {
                warn!("Voice scrolling unavailable: {err}");
                self.voice_wanted = false;
            }
        }
        result
    }

    /// Stop everything and report the practice summary. Returns the summary
    /// the first time; later calls return the cached one.
    pub fn close(&mut self) -> Option<PracticeSummary> {
        if self.phase == SessionPhase::Finished {
            return self.summary;
        }
        self.countdown.cancel();
        self.engine.stop();
        self.finish();
        self.summary
    }

    fn finish(&mut self) {
        if self.phase == SessionPhase::Finished {
            return;
        }
        self.phase = SessionPhase::Finished;
        let now = self.clock.now();

        if let Some(aligner) = self.aligner.as_mut() {
            if aligner.is_listening() {
                aligner.stop();
            }
        }
        self.forward_voice_events();

        if let Some(pace) = self.pace.as_mut() {
            pace.end_pause(now);
            pace.stop();
            let summary = pace.summary(&self.engine);
            info!(
                average_wpm = summary.average_wpm,
                pauses = summary.pause_count,
                duration_secs = summary.total_duration_seconds,
                "Practice summary"
            );
            self.summary = Some(summary);
            self.events.emit(PrompterEvent::Session(SessionNotice::PracticeSummary(summary)));

            let average_wpm = pace.average_wpm();
            if let (Some(store), Some(id)) = (self.store.as_mut(), self.script_id.as_deref()) {
                if average_wpm > 0.0 {
                    if let Err(err) =
                        store.update_practice_stats(id, average_wpm, self.engine.elapsed_seconds())
                    {
                        warn!(id, "Failed to record practice stats: {err}");
                    }
                }
            }
        }

        info!("Prompter session closed");
        self.events.emit(PrompterEvent::Session(SessionNotice::SessionClosed));
    }

    /// Forward component events and react to the ones that affect siblings.
    /// Reactions can emit more events, so keep draining until quiet.
    fn pump_events(&mut self, now: Instant) {
        loop {
            let mut progressed = false;

            let countdown_events: Vec<CountdownEvent> = self.countdown_rx.try_iter().collect();
            for event in countdown_events {
                progressed = true;
                if event == CountdownEvent::CountdownCompleted {
                    self.on_countdown_completed(now);
                }
                self.events.emit(PrompterEvent::Countdown(event));
            }

            let playback_events: Vec<PlaybackEvent> = self.engine_rx.try_iter().collect();
            for event in playback_events {
                progressed = true;
                self.events.emit(PrompterEvent::Playback(event.clone()));
                self.on_playback_event(&event, now);
            }

            progressed |= self.forward_voice_events();

            if let Some(rx) = self.pace_rx.as_ref() {
                for event in rx.try_iter() {
                    progressed = true;
                    self.events.emit(PrompterEvent::Pace(event));
                }
            }

            if !progressed {
                break;
            }
        }
    }

    fn forward_voice_events(&mut self) -> bool {
        let Some(rx) = self.voice_rx.as_ref() else {
            return false;
        };
        let mut forwarded = false;
        for event in rx.try_iter() {
            forwarded = true;
            self.events.emit(PrompterEvent::Voice(event));
        }
        forwarded
    }

    fn on_countdown_completed(&mut self, now: Instant) {
        if self.phase != SessionPhase::CountingDown {
            return;
        }
        self.phase = SessionPhase::Playing;
        self.engine.start();
        if let Some(pace) = self.pace.as_mut() {
            pace.start(now);
        }
        if self.voice_wanted {
            let _ = self.start_voice();
        }
    }

    fn on_playback_event(&mut self, event: &PlaybackEvent, now: Instant) {
        match event {
            PlaybackEvent::PauseStateChanged { paused: true } => {
                if let Some(pace) = self.pace.as_mut() {
                    pace.record_pause(now);
                }
                if let Some(aligner) = self.aligner.as_mut() {
                    aligner.pause();
                }
            }
            PlaybackEvent::PauseStateChanged { paused: false } => {
                if let Some(pace) = self.pace.as_mut() {
                    pace.end_pause(now);
                }
                if let Some(aligner) = self.aligner.as_mut() {
                    aligner.resume();
                }
            }
            PlaybackEvent::PlaybackEnded {
                reason: EndReason::Close,
            } => self.finish(),
            _ => {}
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let playback = self.engine.snapshot();
        let current_word = self
            .timeline
            .word(playback.word_index)
            .map(|word| word.text.clone());
        let progress_pct = if self.timeline.len() > 1 {
            playback.word_index as f64 / (self.timeline.len() - 1) as f64 * 100.0
        } else {
            0.0
        };
        SessionSnapshot {
            phase: self.phase,
            countdown_remaining: self.countdown.remaining(),
            current_word,
            progress_pct,
            elapsed_clock: timeline::format_clock(playback.elapsed_seconds),
            estimated_read_time: timeline::estimated_read_time(
                &self.script_text,
                timeline::DEFAULT_READ_WPM,
            ),
            voice_listening: self
                .aligner
                .as_ref()
                .is_some_and(VoiceAligner::is_listening),
            voice_last_matched: self
                .aligner
                .as_ref()
                .and_then(VoiceAligner::last_matched_index),
            playback,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_countdown_active(&self) -> bool {
        self.countdown.is_active()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn config(&self) -> &PrompterConfig {
        &self.config
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    pub fn timeline(&self) -> &WordTimeline {
        &self.timeline
    }

    pub fn summary(&self) -> Option<PracticeSummary> {
        self.summary
    }

    pub fn store(&self) -> Option<&dyn ScriptStore> {
        self.store.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::EndAction;
    use crate::engine::PlaybackState;
    use crate::events::drain;
    use crate::store::{MemoryScriptStore, Script};
    use crate::voice::ChannelRecognizer;
    use std::sync::Arc;
    use std::time::Duration;

    const SCRIPT: &str = "Good evening everyone and welcome\n\
                          Tonight we launch something new\n\
                          It has been a long road\n\
                          Thank you all for coming\n";

    fn build_session(config: PrompterConfig) -> (PrompterSession, ManualClock) {
        let clock = ManualClock::new();
        let mut session = PrompterSession::new(Arc::new(clock.clone()), config, None);
        session.load_script(Some("keynote".to_string()), SCRIPT);
        (session, clock)
    }

    fn run_for(session: &mut PrompterSession, clock: &ManualClock, secs: f64) {
        let steps = (secs / 0.033).ceil() as usize;
        for _ in 0..steps {
            clock.advance(Duration::from_millis(33));
            session.tick();
        }
    }

    #[test]
    fn countdown_gates_playback() {
        let (mut session, clock) = build_session(PrompterConfig::default());
        session.begin();
        assert_eq!(session.phase(), SessionPhase::CountingDown);
        assert!(session.is_countdown_active());

        run_for(&mut session, &clock, 2.5);
        assert_eq!(session.engine().state(), PlaybackState::Idle);

        run_for(&mut session, &clock, 0.6);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert!(session.engine().is_running());
    }

    #[test]
    fn zero_countdown_starts_immediately() {
        let mut config = PrompterConfig::default();
        config.countdown_seconds = 0;
        let (mut session, _) = build_session(config);
        let rx = session.subscribe();
        session.begin();

        assert_eq!(session.phase(), SessionPhase::Playing);
        assert!(drain(&rx).contains(&PrompterEvent::Countdown(
            CountdownEvent::CountdownCompleted
        )));
    }

    #[test]
    fn zero_pace_interval_is_floored_and_ticking_returns() {
        let mut config = PrompterConfig::default();
        config.countdown_seconds = 0;
        config.pace_sample_interval_secs = 0.0;
        let (mut session, clock) = build_session(config);
        assert_eq!(session.config().pace_sample_interval_secs, 0.25);
        let rx = session.subscribe();
        session.begin();

        run_for(&mut session, &clock, 3.0);

        assert!(session.engine().is_running());
        let samples = drain(&rx)
            .into_iter()
            .filter(|event| matches!(event, PrompterEvent::Pace(_)))
            .count();
        assert!((1..=12).contains(&samples), "got {samples} pace samples");
    }

    #[test]
    fn skip_command_starts_playback() {
        let (mut session, _) = build_session(PrompterConfig::default());
        session.apply_command(SessionCommand::Begin);
        let event = session.apply_command(SessionCommand::SkipCountdown);

        assert_eq!(event.action, "prompter_skip_countdown");
        assert_eq!(event.snapshot.phase, SessionPhase::Playing);
        assert_eq!(event.snapshot.current_word.as_deref(), Some("Good"));
    }

    #[test]
    fn pauses_are_bracketed_into_the_summary() {
        let mut config = PrompterConfig::default();
        config.countdown_seconds = 0;
        let (mut session, clock) = build_session(config);
        session.begin();

        run_for(&mut session, &clock, 2.0);
        session.apply_command(SessionCommand::TogglePause);
        clock.advance(Duration::from_secs(3));
        session.apply_command(SessionCommand::TogglePause);
        run_for(&mut session, &clock, 2.5);

        let summary = session.close().expect("summary");
        assert_eq!(summary.pause_count, 1);
        assert_eq!(summary.total_pause_seconds, 3);
        assert!(summary.readings_count >= 1);
        assert!(summary.average_wpm > 0);
        assert_eq!(session.close(), Some(summary));
    }

    #[test]
    fn close_reports_stats_to_the_store() {
        let mut config = PrompterConfig::default();
        config.countdown_seconds = 0;
        let clock = ManualClock::new();
        let mut store = MemoryScriptStore::new();
        store
            .save(&Script::new("keynote", "Keynote", SCRIPT))
            .expect("save");
        let mut session = PrompterSession::new(Arc::new(clock.clone()), config, None)
            .with_store(Box::new(store));
        session.load_script(Some("keynote".to_string()), SCRIPT);
        let rx = session.subscribe();

        session.begin();
        run_for(&mut session, &clock, 4.2);
        let event = session.apply_command(SessionCommand::Close);
        assert_eq!(event.snapshot.phase, SessionPhase::Finished);

        let stored = session
            .store()
            .expect("store")
            .get("keynote")
            .expect("get")
            .expect("script");
        assert!(stored.words_per_minute.unwrap_or(0.0) > 0.0);
        let duration = stored.last_practice_duration.unwrap_or(0.0);
        assert!((4.0..4.1).contains(&duration), "duration {duration}");

        let events = drain(&rx);
        assert!(events.iter().any(|event| matches!(
            event,
            PrompterEvent::Session(SessionNotice::PracticeSummary(_))
        )));
        assert_eq!(
            events.last(),
            Some(&PrompterEvent::Session(SessionNotice::SessionClosed))
        );
    }

    #[test]
    fn close_end_action_finishes_session() {
        let mut config = PrompterConfig::default();
        config.countdown_seconds = 0;
        config.end_action = EndAction::Close;
        config.scroll_speed = 200.0;
        let (mut session, clock) = build_session(config);
        session.begin();

        run_for(&mut session, &clock, 3.0);
        assert!(session.is_finished());
        assert!(session.summary().is_some());
    }

    #[test]
    fn voice_toggle_without_recognizer_reports_unsupported() {
        let (mut session, _) = build_session(PrompterConfig::default());
        let rx = session.subscribe();
        session.apply_command(SessionCommand::ToggleVoice);
        assert_eq!(
            drain(&rx),
            vec![PrompterEvent::Voice(VoiceEvent::VoiceStatusChanged {
                status: VoiceStatus::Unsupported
            })]
        );
    }

    #[test]
    fn voice_transcripts_drive_the_engine() {
        let mut config = PrompterConfig::default();
        config.countdown_seconds = 0;
        config.voice_scroll_enabled = true;
        config.scroll_speed = 10.0;
        let clock = ManualClock::new();
        let (recognizer, feed) = ChannelRecognizer::new();
        let mut session =
            PrompterSession::new(Arc::new(clock.clone()), config, Some(Box::new(recognizer)));
        session.load_script(None, SCRIPT);
        session.begin();
        assert!(session.snapshot().voice_listening);

        feed.push_text("tonight we launch");
        clock.advance(Duration::from_millis(33));
        session.tick();

        assert_eq!(session.engine().word_index(), 7);
        assert_eq!(session.snapshot().voice_last_matched, Some(7));
    }

    #[test]
    fn pausing_playback_pauses_voice() {
        let mut config = PrompterConfig::default();
        config.countdown_seconds = 0;
        config.voice_scroll_enabled = true;
        let clock = ManualClock::new();
        let (recognizer, feed) = ChannelRecognizer::new();
        let mut session =
            PrompterSession::new(Arc::new(clock.clone()), config, Some(Box::new(recognizer)));
        session.load_script(None, SCRIPT);
        session.begin();

        session.apply_command(SessionCommand::Pause);
        feed.push_text("it has been");
        clock.advance(Duration::from_millis(33));
        session.tick();
        assert_eq!(session.snapshot().voice_last_matched, None);

        session.apply_command(SessionCommand::Resume);
        feed.push_text("a long road");
        clock.advance(Duration::from_millis(33));
        session.tick();
        assert_eq!(session.snapshot().voice_last_matched, Some(15));
    }

    #[test]
    fn events_serialize_with_kebab_tags() {
        let line = PrompterEvent::Playback(PlaybackEvent::WordIndexChanged { index: 4 })
            .to_json_line()
            .expect("json");
        assert_eq!(line, r#"{"event":"word-index-changed","index":4}"#);

        let summary = PracticeSummary {
            average_wpm: 148,
            pause_count: 2,
            total_pause_seconds: 5,
            total_duration_seconds: 90,
            readings_count: 44,
        };
        let value: serde_json::Value = serde_json::from_str(
            &PrompterEvent::Session(SessionNotice::PracticeSummary(summary))
                .to_json_line()
                .expect("json"),
        )
        .expect("parse");
        assert_eq!(value["event"], "practice-summary");
        assert_eq!(value["average_wpm"], 148);
    }

    #[test]
    fn command_actions_are_stable() {
        assert_eq!(SessionCommand::TogglePause.action(), "prompter_toggle_pause");
        assert_eq!(
            SessionCommand::SpeedUp { step: 5.0 }.action(),
            "prompter_speed_up"
        );
        assert_eq!(SessionCommand::Close.action(), "prompter_close");
    }
}
