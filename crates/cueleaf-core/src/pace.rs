//! Practice pace tracking.

use crate::config::PrompterConfig;
use crate::events::EventBus;
use serde::Serialize;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tracing::debug;

/// Source of the instantaneous speaking rate, normally the playback engine.
pub trait WpmSource {
    fn current_wpm(&self) -> f64;
    fn elapsed_seconds(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceZone {
    Slow,
    Optimal,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum PaceEvent {
    PaceSampled { wpm: f64, zone: PaceZone, position: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PracticeSummary {
    pub average_wpm: u32,
    pub pause_count: u32,
    pub total_pause_seconds: u64,
    pub total_duration_seconds: u64,
    pub readings_count: usize,
}

pub struct PaceTracker {
    target_min_wpm: f64,
    target_max_wpm: f64,
    max_wpm: f64,
    sample_interval: Duration,
    readings: Vec<f64>,
    pause_count: u32,
    total_pause: Duration,
    pause_started_at: Option<Instant>,
    next_sample_at: Option<Instant>,
    events: EventBus<PaceEvent>,
}

impl PaceTracker {
    pub fn new(config: &PrompterConfig) -> Self {
        Self {
            target_min_wpm: config.target_min_wpm,
            target_max_wpm: config.target_max_wpm,
            max_wpm: config.pace_max_wpm,
            sample_interval: config.pace_sample_interval(),
            readings: Vec::new(),
            pause_count: 0,
            total_pause: Duration::ZERO,
            pause_started_at: None,
            next_sample_at: None,
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<PaceEvent> {
        self.events.subscribe()
    }

    pub fn start(&mut self, now: Instant) {
        self.readings.clear();
        self.pause_count = 0;
        self.total_pause = Duration::ZERO;
        self.pause_started_at = None;
        self.next_sample_at = Some(now + self.sample_interval);
        debug!(
            interval_ms = self.sample_interval.as_millis() as u64,
            "Pace tracking started"
        );
    }

    pub fn stop(&mut self) {
        self.next_sample_at = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_sample_at.is_some()
    }

    /// Take any samples that have come due. A late poll takes one sample,
    /// not one per missed interval.
    pub fn poll(&mut self, now: Instant, source: &dyn WpmSource) {
        let Some(mut due) = self.next_sample_at else {
            return;
        };
        if now < due {
            return;
        }
        while due <= now {
            due += self.sample_interval;
        }
        self.next_sample_at = Some(due);

        let wpm = source.current_wpm();
        if wpm <= 0.0 || !wpm.is_finite() {
            return;
        }
        self.readings.push(wpm);
        self.events.emit(PaceEvent::PaceSampled {
            wpm,
            zone: self.pace_zone(wpm),
            position: self.pace_position(wpm),
        });
    }

    pub fn record_pause(&mut self, now: Instant) {
        if self.pause_started_at.is_some() {
            return;
        }
        self.pause_count += 1;
        self.pause_started_at = Some(now);
    }

    pub fn end_pause(&mut self, now: Instant) {
        if let Some(started) = self.pause_started_at.take() {
            self.total_pause += now.saturating_duration_since(started);
        }
    }

    pub fn pace_zone(&self, wpm: f64) -> PaceZone {
        if wpm < self.target_min_wpm {
            PaceZone::Slow
        } else if wpm > self.target_max_wpm {
            PaceZone::Fast
        } else {
            PaceZone::Optimal
        }
    }

    /// Marker position on the pace gauge, in `[0, 1]`.
    pub fn pace_position(&self, wpm: f64) -> f64 {
        (wpm / self.max_wpm).clamp(0.0, 1.0)
    }

    pub fn average_wpm(&self) -> f64 {
        if self.readings.is_empty() {
            return 0.0;
        }
        self.readings.iter().sum::<f64>() / self.readings.len() as f64
    }

    pub fn readings(&self) -> &[f64] {
        &self.readings
    }

    pub fn summary(&self, source: &dyn WpmSource) -> PracticeSummary {
        PracticeSummary {
            average_wpm: self.average_wpm().round() as u32,
            pause_count: self.pause_count,
            total_pause_seconds: self.total_pause.as_secs_f64().round() as u64,
            total_duration_seconds: source.elapsed_seconds().max(0.0).round() as u64,
            readings_count: self.readings.len(),
        }
    }
}
