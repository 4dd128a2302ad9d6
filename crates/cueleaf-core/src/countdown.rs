//! Pre-roll countdown that gates playback.

use crate::clock::SharedClock;
use crate::events::EventBus;
use serde::Serialize;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tracing::debug;

const STEP: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum CountdownEvent {
    CountdownRemaining { seconds: u32 },
    CountdownCompleted,
}

pub struct Countdown {
    clock: SharedClock,
    remaining: u32,
    next_at: Option<Instant>,
    events: EventBus<CountdownEvent>,
}

impl Countdown {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            remaining: 0,
            next_at: None,
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<CountdownEvent> {
        self.events.subscribe()
    }

    /// Begin counting down. Zero completes before returning. Restarting an
    /// active countdown abandons the previous run without completing it.
    pub fn start(&mut self, seconds: u32) {
        if seconds == 0 {
            self.finish();
            return;
        }
        self.remaining = seconds;
        self.next_at = Some(self.clock.now() + STEP);
        debug!(seconds, "Countdown started");
        self.events.emit(CountdownEvent::CountdownRemaining { seconds });
    }

    pub fn poll(&mut self, now: Instant) {
        while let Some(due) = self.next_at {
            if now < due {
                break;
            }
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.finish();
                break;
            }
            self.next_at = Some(due + STEP);
            self.events.emit(CountdownEvent::CountdownRemaining {
                seconds: self.remaining,
            });
        }
    }

    pub fn skip(&mut self) {
        if self.is_active() {
            debug!(remaining = self.remaining, "Countdown skipped");
            self.finish();
        }
    }

    /// Abandon the countdown without completing it.
    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!(remaining = self.remaining, "Countdown cancelled");
        }
        self.next_at = None;
        self.remaining = 0;
    }

    pub fn is_active(&self) -> bool {
        self.next_at.is_some()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    fn finish(&mut self) {
        self.next_at = None;
        self.remaining = 0;
        self.events.emit(CountdownEvent::CountdownCompleted);
    }
}
