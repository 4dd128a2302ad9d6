//! Time-anchored playback engine.
//!
//! Position is never integrated frame by frame. Instead the engine keeps a
//! [`TimingAnchor`] and extrapolates linearly from it on every tick; any
//! discontinuity (resume, speed change, reverse, jump, loop, voice advance)
//! re-anchors at the currently displayed position.

use crate::clock::SharedClock;
use crate::config::{
    EndAction, MAX_FONT_SIZE, MAX_SCROLL_SPEED, MIN_FONT_SIZE, MIN_SCROLL_SPEED, PrompterConfig,
};
use crate::events::EventBus;
use crate::pace::WpmSource;
use crate::timeline::WordTimeline;
use crate::voice::WordPointer;
use serde::Serialize;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const ELAPSED_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Running,
    Paused,
    /// Reached the end with [`EndAction::Close`]; only `load`/`start` leave it.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Stop,
    Close,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum PlaybackEvent {
    WordIndexChanged { index: usize },
    ScrollOffsetChanged { pixels: f64 },
    ElapsedTimeChanged { seconds: f64 },
    PauseStateChanged { paused: bool },
    SpeedChanged { speed: f32, display_wpm: f64 },
    DirectionChanged { direction: Direction },
    PlaybackEnded { reason: EndReason },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingAnchor {
    pub wall_clock: Instant,
    pub word_index: usize,
    pub pixel_offset: f64,
    pub paused_for: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedRate {
    pub words_per_second: f64,
    pub pixels_per_second: f64,
    pub line_height_px: f64,
    pub avg_words_per_line: f64,
}

impl DerivedRate {
    pub fn compute(
        speed: f32,
        wpm_per_speed_unit: f64,
        font_size: f32,
        timeline: &WordTimeline,
    ) -> Self {
        let words_per_second = speed as f64 * wpm_per_speed_unit / 60.0;
        let line_height_px = font_size as f64 * 1.2 + 16.0;
        let avg_words_per_line = timeline.avg_words_per_line();
        Self {
            words_per_second,
            pixels_per_second: words_per_second / avg_words_per_line * line_height_px,
            line_height_px,
            avg_words_per_line,
        }
    }
}

/// Point-in-time view of the engine for presentation and logging.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub direction: Direction,
    pub word_index: usize,
    pub word_count: usize,
    pub pixel_offset: f64,
    pub speed: f32,
    pub display_wpm: f64,
    pub elapsed_seconds: f64,
}

pub struct PlaybackEngine {
    clock: SharedClock,
    timeline: WordTimeline,
    speed: f32,
    font_size: f32,
    wpm_per_speed_unit: f64,
    end_action: EndAction,
    rate: DerivedRate,
    state: PlaybackState,
    direction: Direction,
    anchor: TimingAnchor,
    word_index: usize,
    pixel_offset: f64,
    emitted_index: Option<usize>,
    emitted_offset: Option<f64>,
    started_at: Option<Instant>,
    pause_started_at: Option<Instant>,
    accumulated_pause: Duration,
    elapsed_seconds: f64,
    next_elapsed_tick: Option<Instant>,
    events: EventBus<PlaybackEvent>,
}

impl PlaybackEngine {
    pub fn new(clock: SharedClock, config: &PrompterConfig) -> Self {
        let timeline = WordTimeline::default();
        let speed = config.scroll_speed.clamp(MIN_SCROLL_SPEED, MAX_SCROLL_SPEED);
        let font_size = config.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        let rate = DerivedRate::compute(speed, config.wpm_per_speed_unit, font_size, &timeline);
        let now = clock.now();
        Self {
            clock,
            timeline,
            speed,
            font_size,
            wpm_per_speed_unit: config.wpm_per_speed_unit,
            end_action: config.end_action,
            rate,
            state: PlaybackState::Idle,
            direction: Direction::Forward,
            anchor: TimingAnchor {
                wall_clock: now,
                word_index: 0,
                pixel_offset: 0.0,
                paused_for: Duration::ZERO,
            },
            word_index: 0,
            pixel_offset: 0.0,
            emitted_index: None,
            emitted_offset: None,
            started_at: None,
            pause_started_at: None,
            accumulated_pause: Duration::ZERO,
            elapsed_seconds: 0.0,
            next_elapsed_tick: None,
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Replace the script. Everything positional is reset.
    pub fn load(&mut self, timeline: WordTimeline) {
        self.timeline = timeline;
        self.state = PlaybackState::Idle;
        self.word_index = 0;
        self.pixel_offset = 0.0;
        self.emitted_index = None;
        self.emitted_offset = None;
        self.started_at = None;
        self.pause_started_at = None;
        self.accumulated_pause = Duration::ZERO;
        self.elapsed_seconds = 0.0;
        self.next_elapsed_tick = None;
        self.recompute_rate();
        self.reanchor(self.clock.now());
        debug!(
            words = self.timeline.len(),
            lines = self.timeline.line_count(),
            "Loaded script into playback engine"
        );
    }

    pub fn start(&mut self) {
        if self.timeline.is_empty() {
            debug!("Ignoring start on empty script");
            return;
        }
        let now = self.clock.now();
        self.state = PlaybackState::Running;
        self.word_index = 0;
        self.pixel_offset = 0.0;
        self.emitted_index = None;
        self.emitted_offset = None;
        self.started_at = Some(now);
        self.pause_started_at = None;
        self.accumulated_pause = Duration::ZERO;
        self.elapsed_seconds = 0.0;
        self.next_elapsed_tick = Some(now + ELAPSED_TICK);
        self.reanchor(now);
        self.publish_position();
        info!(
            words = self.timeline.len(),
            speed = self.speed,
            wps = self.rate.words_per_second,
            "Playback started"
        );
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Running {
            return;
        }
        self.state = PlaybackState::Paused;
        self.pause_started_at = Some(self.clock.now());
        debug!(index = self.word_index, "Playback paused");
        self.events.emit(PlaybackEvent::PauseStateChanged { paused: true });
    }

    pub fn resume(&mut self) {
        if self.state != PlaybackState::Paused {
            return;
        }
        let now = self.clock.now();
        if let Some(paused_at) = self.pause_started_at.take() {
            self.accumulated_pause += now.saturating_duration_since(paused_at);
        }
        self.state = PlaybackState::Running;
        self.reanchor(now);
        debug!(
            index = self.word_index,
            paused_total_ms = self.accumulated_pause.as_millis() as u64,
            "Playback resumed"
        );
        self.events.emit(PlaybackEvent::PauseStateChanged { paused: false });
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            PlaybackState::Running => self.pause(),
            PlaybackState::Paused => self.resume(),
            _ => {}
        }
    }

    /// Cancel both schedules and return to `Idle`. A closed engine stays closed.
    pub fn stop(&mut self) {
        self.next_elapsed_tick = None;
        self.pause_started_at = None;
        if matches!(self.state, PlaybackState::Running | PlaybackState::Paused) {
            self.state = PlaybackState::Idle;
            info!(index = self.word_index, "Playback stopped");
        }
    }

    pub fn set_speed(&mut self, speed: f32) {
        if !speed.is_finite() {
            return;
        }
        self.speed = speed.clamp(MIN_SCROLL_SPEED, MAX_SCROLL_SPEED);
        self.recompute_rate();
        self.reanchor(self.clock.now());
        debug!(speed = self.speed, wps = self.rate.words_per_second, "Speed changed");
        self.events.emit(PlaybackEvent::SpeedChanged {
            speed: self.speed,
            display_wpm: self.display_wpm(),
        });
    }

    pub fn increase_speed(&mut self, step: f32) {
        self.set_speed(self.speed + step.abs());
    }

    pub fn decrease_speed(&mut self, step: f32) {
        self.set_speed(self.speed - step.abs());
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        if !font_size.is_finite() {
            return;
        }
        self.font_size = font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.recompute_rate();
        self.pixel_offset = self.offset_for_word(self.word_index);
        self.reanchor(self.clock.now());
        self.publish_position();
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.flipped();
        self.reanchor(self.clock.now());
        debug!(direction = ?self.direction, "Direction toggled");
        self.events.emit(PlaybackEvent::DirectionChanged {
            direction: self.direction,
        });
    }

    pub fn jump_forward(&mut self) {
        if self.timeline.is_empty() || self.state == PlaybackState::Closed {
            return;
        }
        let line = self.timeline.line_of_word(self.word_index);
        let target = (line + 1).min(self.timeline.last_line());
        self.jump_to_line(target);
    }

    pub fn jump_back(&mut self) {
        if self.timeline.is_empty() || self.state == PlaybackState::Closed {
            return;
        }
        let line = self.timeline.line_of_word(self.word_index);
        self.jump_to_line(line.saturating_sub(1));
    }

    fn jump_to_line(&mut self, line: usize) {
        let index = self.timeline.line_start(line).min(self.timeline.len() - 1);
        self.word_index = index;
        self.pixel_offset = self.offset_for_word(index);
        self.reanchor(self.clock.now());
        debug!(line, index, "Jumped to line");
        self.publish_position();
    }

    /// Move straight to `index`; out-of-range indices are ignored.
    pub fn advance_to_word(&mut self, index: usize) {
        if index >= self.timeline.len() || self.state == PlaybackState::Closed {
            return;
        }
        self.word_index = index;
        self.pixel_offset = self.offset_for_word(index);
        self.reanchor(self.clock.now());
        self.publish_position();
    }

    /// One scheduler tick: recompute position, handle end of script, then run
    /// the one-second elapsed-time schedule.
    pub fn advance_time(&mut self, now: Instant) {
        if self.state == PlaybackState::Running {
            self.recompute_position(now);
        }
        self.tick_elapsed(now);
    }

    /// Tick using the engine's own clock.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.advance_time(now);
    }

    fn recompute_position(&mut self, now: Instant) {
        let total = self.timeline.len();
        if total == 0 {
            return;
        }
        let elapsed = now
            .saturating_duration_since(self.anchor.wall_clock)
            .saturating_sub(self.anchor.paused_for)
            .as_secs_f64();
        let sign = self.direction.sign();
        let last = (total - 1) as f64;

        let raw = self.anchor.word_index as f64 + elapsed * self.rate.words_per_second * sign;
        self.word_index = raw.clamp(0.0, last).floor() as usize;
        self.pixel_offset =
            (self.anchor.pixel_offset + elapsed * self.rate.pixels_per_second * sign).max(0.0);
        self.publish_position();

        if self.direction == Direction::Forward && self.word_index >= total - 1 {
            self.handle_end(now);
        }
    }

    fn handle_end(&mut self, now: Instant) {
        match self.end_action {
            EndAction::Loop => {
                info!("End of script reached; looping");
                self.word_index = 0;
                self.pixel_offset = 0.0;
                self.reanchor(now);
                self.publish_position();
            }
            EndAction::Close => {
                info!("End of script reached; closing");
                self.stop();
                self.state = PlaybackState::Closed;
                self.events.emit(PlaybackEvent::PlaybackEnded {
                    reason: EndReason::Close,
                });
            }
            EndAction::Stop => {
                info!("End of script reached; stopping");
                self.pause();
                self.events.emit(PlaybackEvent::PlaybackEnded {
                    reason: EndReason::Stop,
                });
            }
        }
    }

    fn tick_elapsed(&mut self, now: Instant) {
        let Some(mut due) = self.next_elapsed_tick else {
            return;
        };
        if now < due {
            return;
        }
        while due <= now {
            due += ELAPSED_TICK;
        }
        self.next_elapsed_tick = Some(due);

        if self.state != PlaybackState::Running {
            return;
        }
        if let Some(seconds) = self.playback_elapsed(now) {
            self.elapsed_seconds = seconds;
            self.events.emit(PlaybackEvent::ElapsedTimeChanged { seconds });
        }
    }

    /// Seconds of running time since `start`, excluding completed pauses.
    pub fn playback_elapsed(&self, now: Instant) -> Option<f64> {
        let started = self.started_at?;
        Some(
            now.saturating_duration_since(started)
                .saturating_sub(self.accumulated_pause)
                .as_secs_f64(),
        )
    }

    fn reanchor(&mut self, now: Instant) {
        self.anchor = TimingAnchor {
            wall_clock: now,
            word_index: self.word_index,
            pixel_offset: self.pixel_offset,
            paused_for: Duration::ZERO,
        };
    }

    fn recompute_rate(&mut self) {
        self.rate = DerivedRate::compute(
            self.speed,
            self.wpm_per_speed_unit,
            self.font_size,
            &self.timeline,
        );
    }

    fn offset_for_word(&self, index: usize) -> f64 {
        index as f64 / self.rate.avg_words_per_line * self.rate.line_height_px
    }

    fn publish_position(&mut self) {
        if self.emitted_offset != Some(self.pixel_offset) {
            self.emitted_offset = Some(self.pixel_offset);
            self.events.emit(PlaybackEvent::ScrollOffsetChanged {
                pixels: self.pixel_offset,
            });
        }
        if self.emitted_index != Some(self.word_index) {
            self.emitted_index = Some(self.word_index);
            self.events.emit(PlaybackEvent::WordIndexChanged {
                index: self.word_index,
            });
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    pub fn pixel_offset(&self) -> f64 {
        self.pixel_offset
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn display_wpm(&self) -> f64 {
        self.speed as f64 * self.wpm_per_speed_unit
    }

    pub fn rate(&self) -> DerivedRate {
        self.rate
    }

    pub fn anchor(&self) -> TimingAnchor {
        self.anchor
    }

    pub fn timeline(&self) -> &WordTimeline {
        &self.timeline
    }

    /// Elapsed seconds as of the last one-second tick.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn current_wpm(&self) -> f64 {
        if self.elapsed_seconds <= 0.0 {
            return 0.0;
        }
        self.word_index as f64 / self.elapsed_seconds * 60.0
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state,
            direction: self.direction,
            word_index: self.word_index,
            word_count: self.timeline.len(),
            pixel_offset: self.pixel_offset,
            speed: self.speed,
            display_wpm: self.display_wpm(),
            elapsed_seconds: self.elapsed_seconds,
        }
    }
}

impl WordPointer for PlaybackEngine {
    fn word_count(&self) -> usize {
        self.timeline.len()
    }

    fn advance_to_word(&mut self, index: usize) {
        PlaybackEngine::advance_to_word(self, index);
    }
}

impl WpmSource for PlaybackEngine {
    fn current_wpm(&self) -> f64 {
        PlaybackEngine::current_wpm(self)
    }

    fn elapsed_seconds(&self) -> f64 {
        PlaybackEngine::elapsed_seconds(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::events::drain;
    use std::sync::Arc;

    fn script(words: usize, per_line: usize) -> String {
        (0..words)
            .map(|i| {
                if (i + 1) % per_line == 0 {
                    format!("w{i}\n")
                } else {
                    format!("w{i} ")
                }
            })
            .collect()
    }

    fn build_engine(
        words: usize,
        per_line: usize,
        end_action: EndAction,
    ) -> (PlaybackEngine, ManualClock) {
        let clock = ManualClock::new();
        let mut config = PrompterConfig::default();
        config.end_action = end_action;
        let mut engine = PlaybackEngine::new(Arc::new(clock.clone()), &config);
        engine.load(WordTimeline::build(&script(words, per_line)));
        (engine, clock)
    }

    fn step(engine: &mut PlaybackEngine, clock: &ManualClock, secs: f64) {
        clock.advance_secs_f64(secs);
        engine.tick();
    }

    fn ended_events(events: &[PlaybackEvent]) -> Vec<EndReason> {
        events
            .iter()
            .filter_map(|event| match event {
                PlaybackEvent::PlaybackEnded { reason } => Some(*reason),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn derived_rate_matches_display_speed() {
        let (engine, _) = build_engine(100, 10, EndAction::Stop);
        let rate = engine.rate();
        assert_eq!(rate.words_per_second, 2.5);
        assert_eq!(rate.avg_words_per_line, 10.0);
        assert!((rate.line_height_px - 54.4).abs() < 1e-9);
        assert!((rate.pixels_per_second - 2.5 / 10.0 * 54.4).abs() < 1e-9);
        assert_eq!(engine.display_wpm(), 150.0);
    }

    #[test]
    fn index_follows_anchor_extrapolation() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
        engine.start();

        step(&mut engine, &clock, 10.0);
        assert_eq!(engine.word_index(), 25);

        step(&mut engine, &clock, 0.3);
        assert_eq!(engine.word_index(), 25);
        step(&mut engine, &clock, 0.1);
        assert_eq!(engine.word_index(), 26);
    }

    #[test]
    fn index_matches_floor_for_many_instants() {
        for k in 0..75u64 {
            let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
            engine.start();
            clock.advance(Duration::from_millis(k * 400 + 100));
            engine.tick();
            assert_eq!(engine.word_index(), k as usize, "k={k}");
        }
    }

    #[test]
    fn word_index_events_are_discrete() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
        let rx = engine.subscribe();
        engine.start();
        for _ in 0..30 {
            step(&mut engine, &clock, 0.033);
        }
        let indices: Vec<usize> = drain(&rx)
            .into_iter()
            .filter_map(|event| match event {
                PlaybackEvent::WordIndexChanged { index } => Some(index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn pause_resume_keeps_displayed_position() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
        engine.start();
        step(&mut engine, &clock, 2.0);
        let index = engine.word_index();
        let offset = engine.pixel_offset();

        engine.pause();
        step(&mut engine, &clock, 120.0);
        engine.resume();
        engine.tick();

        assert_eq!(engine.word_index(), index);
        assert_eq!(engine.pixel_offset(), offset);
        assert!(engine.is_running());
    }

    #[test]
    fn pause_and_resume_are_noops_in_wrong_state() {
        let (mut engine, _) = build_engine(10, 5, EndAction::Stop);
        let rx = engine.subscribe();
        engine.pause();
        engine.resume();
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn paused_time_is_excluded_from_elapsed() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
        engine.start();
        step(&mut engine, &clock, 2.0);
        engine.pause();
        step(&mut engine, &clock, 5.0);
        engine.resume();
        step(&mut engine, &clock, 1.0);

        assert_eq!(engine.elapsed_seconds(), 3.0);
        assert_eq!(engine.current_wpm(), engine.word_index() as f64 / 3.0 * 60.0);
    }

    #[test]
    fn toggling_direction_twice_is_identity() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
        engine.start();
        step(&mut engine, &clock, 4.0);
        let index = engine.word_index();

        engine.toggle_direction();
        engine.toggle_direction();

        assert_eq!(engine.direction(), Direction::Forward);
        assert_eq!(engine.word_index(), index);
    }

    #[test]
    fn reverse_playback_clamps_at_zero_without_ending() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Close);
        let rx = engine.subscribe();
        engine.start();
        step(&mut engine, &clock, 2.0);
        assert_eq!(engine.word_index(), 5);

        engine.toggle_direction();
        step(&mut engine, &clock, 1.0);
        assert_eq!(engine.word_index(), 2);
        step(&mut engine, &clock, 30.0);
        assert_eq!(engine.word_index(), 0);
        assert_eq!(engine.pixel_offset(), 0.0);
        assert!(engine.is_running());
        assert!(ended_events(&drain(&rx)).is_empty());
    }

    #[test]
    fn speed_change_reanchors_at_current_position() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
        engine.start();
        step(&mut engine, &clock, 4.0);
        assert_eq!(engine.word_index(), 10);

        engine.set_speed(100.0);
        assert_eq!(engine.anchor().word_index, 10);
        step(&mut engine, &clock, 2.0);
        assert_eq!(engine.word_index(), 20);
    }

    #[test]
    fn speed_is_clamped() {
        let (mut engine, _) = build_engine(10, 5, EndAction::Stop);
        engine.set_speed(5000.0);
        assert_eq!(engine.speed(), MAX_SCROLL_SPEED);
        engine.decrease_speed(1000.0);
        assert_eq!(engine.speed(), MIN_SCROLL_SPEED);
        engine.increase_speed(10.0);
        assert_eq!(engine.speed(), 20.0);
    }

    #[test]
    fn jumps_move_one_line_and_clamp() {
        let (mut engine, _) = build_engine(30, 10, EndAction::Stop);
        engine.advance_to_word(14);

        engine.jump_forward();
        assert_eq!(engine.word_index(), 20);
        engine.jump_forward();
        assert_eq!(engine.word_index(), 20);

        engine.advance_to_word(14);
        engine.jump_back();
        assert_eq!(engine.word_index(), 0);
        engine.jump_back();
        assert_eq!(engine.word_index(), 0);
    }

    #[test]
    fn advance_to_word_ignores_out_of_range() {
        let (mut engine, _) = build_engine(20, 10, EndAction::Stop);
        engine.advance_to_word(12);
        let offset = engine.pixel_offset();
        assert_eq!(engine.word_index(), 12);
        assert!((offset - 12.0 / 10.0 * 54.4).abs() < 1e-9);

        engine.advance_to_word(20);
        assert_eq!(engine.word_index(), 12);
        assert_eq!(engine.pixel_offset(), offset);
    }

    #[test]
    fn jumps_while_running_reanchor_extrapolation() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
        engine.start();
        step(&mut engine, &clock, 2.0);
        assert_eq!(engine.word_index(), 5);

        engine.jump_forward();
        engine.jump_forward();
        assert_eq!(engine.word_index(), 20);
        step(&mut engine, &clock, 2.0);
        assert_eq!(engine.word_index(), 25);
        assert!((engine.pixel_offset() - (2.0 * 54.4 + 2.0 * 13.6)).abs() < 1e-6);

        engine.jump_back();
        assert_eq!(engine.word_index(), 10);
        step(&mut engine, &clock, 2.0);
        assert_eq!(engine.word_index(), 15);
        assert!(engine.is_running());
    }

    #[test]
    fn advance_to_word_while_running_continues_from_target() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
        engine.start();
        step(&mut engine, &clock, 1.0);

        engine.advance_to_word(40);
        assert_eq!(engine.word_index(), 40);
        step(&mut engine, &clock, 4.0);
        assert_eq!(engine.word_index(), 50);
    }

    #[test]
    fn font_size_change_rederives_rate_and_offset() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
        let rx = engine.subscribe();
        engine.start();
        step(&mut engine, &clock, 4.0);
        assert_eq!(engine.word_index(), 10);
        drain(&rx);

        engine.set_font_size(48.0);
        let rate = engine.rate();
        assert!((rate.line_height_px - 73.6).abs() < 1e-6);
        assert!((rate.pixels_per_second - 18.4).abs() < 1e-6);
        assert_eq!(rate.words_per_second, 2.5);
        assert_eq!(engine.word_index(), 10);
        assert!((engine.pixel_offset() - 73.6).abs() < 1e-6);
        assert!(drain(&rx).iter().any(|event| matches!(
            event,
            PlaybackEvent::ScrollOffsetChanged { .. }
        )));

        step(&mut engine, &clock, 1.0);
        assert_eq!(engine.word_index(), 12);
        assert!((engine.pixel_offset() - (73.6 + 18.4)).abs() < 1e-6);

        engine.set_font_size(1000.0);
        assert!((engine.rate().line_height_px - 188.8).abs() < 1e-6);
        engine.set_font_size(f32::NAN);
        assert!((engine.rate().line_height_px - 188.8).abs() < 1e-6);
    }

    #[test]
    fn loop_restarts_from_the_top() {
        let (mut engine, clock) = build_engine(10, 5, EndAction::Loop);
        let rx = engine.subscribe();
        engine.start();

        step(&mut engine, &clock, 4.0);
        assert_eq!(engine.word_index(), 0);
        assert!(engine.is_running());

        let events = drain(&rx);
        let last_indices: Vec<usize> = events
            .iter()
            .filter_map(|event| match event {
                PlaybackEvent::WordIndexChanged { index } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(last_indices, vec![0, 9, 0]);
        assert!(ended_events(&events).is_empty());

        step(&mut engine, &clock, 0.5);
        assert_eq!(engine.word_index(), 1);
    }

    #[test]
    fn stop_action_pauses_at_last_word_once() {
        let (mut engine, clock) = build_engine(10, 5, EndAction::Stop);
        let rx = engine.subscribe();
        engine.start();

        step(&mut engine, &clock, 4.0);
        for _ in 0..5 {
            step(&mut engine, &clock, 0.5);
        }

        assert_eq!(engine.state(), PlaybackState::Paused);
        assert_eq!(engine.word_index(), 9);
        assert_eq!(ended_events(&drain(&rx)), vec![EndReason::Stop]);
    }

    #[test]
    fn close_action_ends_once_and_goes_quiet() {
        let (mut engine, clock) = build_engine(10, 5, EndAction::Close);
        let rx = engine.subscribe();
        engine.start();

        step(&mut engine, &clock, 4.0);
        assert_eq!(engine.state(), PlaybackState::Closed);
        assert_eq!(ended_events(&drain(&rx)), vec![EndReason::Close]);

        for _ in 0..10 {
            step(&mut engine, &clock, 1.0);
        }
        engine.advance_to_word(2);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn stop_cancels_both_schedules() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
        let rx = engine.subscribe();
        engine.start();
        step(&mut engine, &clock, 1.0);
        drain(&rx);

        engine.stop();
        engine.stop();
        step(&mut engine, &clock, 5.0);

        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn elapsed_ticks_only_while_running() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
        let rx = engine.subscribe();
        engine.start();
        step(&mut engine, &clock, 1.0);
        engine.pause();
        step(&mut engine, &clock, 3.0);

        let seconds: Vec<f64> = drain(&rx)
            .into_iter()
            .filter_map(|event| match event {
                PlaybackEvent::ElapsedTimeChanged { seconds } => Some(seconds),
                _ => None,
            })
            .collect();
        assert_eq!(seconds, vec![1.0]);
    }

    #[test]
    fn empty_script_cannot_start() {
        let clock = ManualClock::new();
        let mut engine = PlaybackEngine::new(Arc::new(clock), &PrompterConfig::default());
        engine.load(WordTimeline::build("  \n "));
        engine.start();
        engine.jump_forward();
        engine.advance_to_word(0);
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert_eq!(engine.word_index(), 0);
    }

    #[test]
    fn load_resets_positional_state() {
        let (mut engine, clock) = build_engine(100, 10, EndAction::Stop);
        engine.start();
        step(&mut engine, &clock, 5.0);
        engine.load(WordTimeline::build("one two three"));

        assert_eq!(engine.state(), PlaybackState::Idle);
        assert_eq!(engine.word_index(), 0);
        assert_eq!(engine.pixel_offset(), 0.0);
        assert_eq!(engine.elapsed_seconds(), 0.0);
    }
}
