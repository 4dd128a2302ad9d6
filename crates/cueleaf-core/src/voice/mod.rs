//! Voice-driven scrolling.
//!
//! A [`VoiceAligner`] consumes [`RecognizerEvent`]s from a
//! [`SpeechRecognizer`], matches the spoken words forward against the script
//! and moves a [`WordPointer`] (normally the playback engine) when it finds
//! them. The recognizer session is expected to die on its own from time to
//! time; the aligner restarts it transparently.

mod matcher;
mod recognizer;

pub use matcher::{ForwardMatcher, transcript_tail};
pub use recognizer::{
    ChannelRecognizer, RecognitionError, RecognizerEvent, SpeechRecognizer, TranscriptFeed,
    VoiceStartError,
};

use crate::clock::SharedClock;
use crate::config::PrompterConfig;
use crate::events::EventBus;
use crate::timeline::WordTimeline;
use serde::Serialize;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Anything the aligner can move to a matched word.
pub trait WordPointer {
    fn word_count(&self) -> usize;
    fn advance_to_word(&mut self, index: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceStatus {
    Listening,
    Restarting,
    Silence,
    Denied,
    Unsupported,
    Stopped,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum VoiceEvent {
    VoiceStatusChanged { status: VoiceStatus },
    VoiceWpmChanged { wpm: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignerState {
    Stopped,
    Starting,
    Listening,
    Restarting { at: Instant },
    Paused,
}

#[derive(Debug, Clone, Copy)]
pub struct VoiceSettings {
    pub lookahead: usize,
    pub min_token_chars: usize,
    pub transcript_tail_words: usize,
    pub silence_threshold: Duration,
    pub restart_delay: Duration,
}

impl VoiceSettings {
    pub fn from_config(config: &PrompterConfig) -> Self {
        Self {
            lookahead: config.voice_lookahead_window,
            min_token_chars: config.voice_min_token_chars,
            transcript_tail_words: config.voice_transcript_tail_words,
            silence_threshold: config.voice_silence_threshold(),
            restart_delay: config.voice_restart_delay(),
        }
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self::from_config(&PrompterConfig::default())
    }
}

pub struct VoiceAligner {
    clock: SharedClock,
    recognizer: Box<dyn SpeechRecognizer>,
    settings: VoiceSettings,
    words: Vec<String>,
    matcher: ForwardMatcher,
    state: AlignerState,
    is_listening: bool,
    words_spoken: u64,
    started_at: Option<Instant>,
    silence_deadline: Option<Instant>,
    events: EventBus<VoiceEvent>,
}

impl VoiceAligner {
    pub fn new(
        clock: SharedClock,
        recognizer: Box<dyn SpeechRecognizer>,
        settings: VoiceSettings,
    ) -> Self {
        Self {
            clock,
            recognizer,
            matcher: ForwardMatcher::new(settings.lookahead, settings.min_token_chars),
            settings,
            words: Vec::new(),
            state: AlignerState::Stopped,
            is_listening: false,
            words_spoken: 0,
            started_at: None,
            silence_deadline: None,
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<VoiceEvent> {
        self.events.subscribe()
    }

    /// Take the normalized words of a freshly built timeline.
    pub fn load(&mut self, timeline: &WordTimeline) {
        self.words = timeline
            .words()
            .iter()
            .map(|word| word.normalized.clone())
            .collect();
        self.matcher.reset();
    }

    /// Acquire the recognizer and begin listening from the top of the script.
    pub fn start(&mut self) -> Result<(), VoiceStartError> {
        if self.is_listening {
            self.release();
        }
        let now = self.clock.now();

        if !self.recognizer.is_supported() {
            warn!("Speech recognition unsupported; voice scrolling unavailable");
            return Err(self.fail_start(VoiceStartError::Unsupported));
        }
        if let Err(err) = self.recognizer.request_permission() {
            warn!("Microphone permission request failed: {err}");
            return Err(self.fail_start(err));
        }

        self.words_spoken = 0;
        self.started_at = Some(now);
        self.matcher.reset();
        self.state = AlignerState::Starting;

        match self.recognizer.start_session() {
            Ok(()) => {
                self.is_listening = true;
                self.state = AlignerState::Listening;
                self.silence_deadline = Some(now + self.settings.silence_threshold);
                info!(words = self.words.len(), "Voice alignment listening");
                self.set_status(VoiceStatus::Listening);
                Ok(())
            }
            Err(err) => {
                warn!("Failed to start speech recognition: {err}");
                Err(self.fail_start(err))
            }
        }
    }

    fn fail_start(&mut self, err: VoiceStartError) -> VoiceStartError {
        self.release();
        self.is_listening = false;
        self.state = AlignerState::Stopped;
        let status = match err {
            VoiceStartError::Unsupported => VoiceStatus::Unsupported,
            VoiceStartError::PermissionDenied => VoiceStatus::Denied,
            VoiceStartError::Failed(_) => VoiceStatus::Error,
        };
        self.set_status(status);
        err
    }

    /// Stop consuming transcripts; alignment progress is kept.
    pub fn pause(&mut self) {
        if !self.is_listening || self.state == AlignerState::Paused {
            return;
        }
        self.recognizer.stop_session();
        self.state = AlignerState::Paused;
        self.silence_deadline = None;
        debug!("Voice alignment paused");
    }

    pub fn resume(&mut self) {
        if !self.is_listening || self.state != AlignerState::Paused {
            return;
        }
        let now = self.clock.now();
        self.open_session(now);
        debug!("Voice alignment resumed");
    }

    pub fn stop(&mut self) {
        self.is_listening = false;
        self.silence_deadline = None;
        self.release();
        self.state = AlignerState::Stopped;
        info!(words_spoken = self.words_spoken, "Voice alignment stopped");
        self.set_status(VoiceStatus::Stopped);
    }

    /// Drain pending recognizer events, then run the restart and silence
    /// timers.
    pub fn poll(&mut self, now: Instant, pointer: &mut dyn WordPointer) {
        while let Some(event) = self.recognizer.poll_event() {
            self.handle_event(event, now, pointer);
        }

        if let AlignerState::Restarting { at } = self.state {
            if now >= at && self.is_listening {
                self.open_session(now);
            }
        }

        if let Some(deadline) = self.silence_deadline {
            if now >= deadline {
                self.silence_deadline = None;
                debug!("No speech heard within the silence threshold");
                self.set_status(VoiceStatus::Silence);
            }
        }
    }

    pub fn handle_event(
        &mut self,
        event: RecognizerEvent,
        now: Instant,
        pointer: &mut dyn WordPointer,
    ) {
        match event {
            RecognizerEvent::Result { transcript, .. } => {
                self.handle_transcript(&transcript, now, pointer)
            }
            RecognizerEvent::Ended => {
                if self.is_listening && self.state != AlignerState::Paused {
                    info!(
                        delay_ms = self.settings.restart_delay.as_millis() as u64,
                        "Recognition session ended; restarting"
                    );
                    self.state = AlignerState::Restarting {
                        at: now + self.settings.restart_delay,
                    };
                    self.set_status(VoiceStatus::Restarting);
                }
            }
            RecognizerEvent::Error(RecognitionError::NoSpeech | RecognitionError::Aborted) => {
                debug!("Benign recognition error; waiting for session end");
            }
            RecognizerEvent::Error(RecognitionError::NotAllowed) => {
                warn!("Microphone access revoked; voice alignment stopped");
                self.is_listening = false;
                self.silence_deadline = None;
                self.release();
                self.state = AlignerState::Stopped;
                self.set_status(VoiceStatus::Denied);
            }
            RecognizerEvent::Error(RecognitionError::Other(message)) => {
                warn!("Speech recognition error: {message}");
                self.set_status(VoiceStatus::Error);
            }
        }
    }

    fn handle_transcript(&mut self, transcript: &str, now: Instant, pointer: &mut dyn WordPointer) {
        if !matches!(
            self.state,
            AlignerState::Listening | AlignerState::Restarting { .. }
        ) {
            return;
        }
        self.silence_deadline = Some(now + self.settings.silence_threshold);

        let limit = pointer.word_count().min(self.words.len());
        let words = &self.words[..limit];
        for token in transcript_tail(transcript, self.settings.transcript_tail_words) {
            let Some(index) = self.matcher.match_token(token, words) else {
                continue;
            };
            debug!(token, index, "Matched spoken word");
            pointer.advance_to_word(index);
            self.words_spoken += 1;
            if let Some(wpm) = self.spoken_wpm(now) {
                self.events.emit(VoiceEvent::VoiceWpmChanged { wpm });
            }
        }
    }

    fn open_session(&mut self, now: Instant) {
        match self.recognizer.start_session() {
            Ok(()) => {
                self.state = AlignerState::Listening;
                self.silence_deadline = Some(now + self.settings.silence_threshold);
                self.set_status(VoiceStatus::Listening);
            }
            Err(err) => {
                warn!("Failed to reopen recognition session: {err}");
                self.state = AlignerState::Restarting {
                    at: now + self.settings.restart_delay,
                };
                self.set_status(VoiceStatus::Restarting);
            }
        }
    }

    fn release(&mut self) {
        self.recognizer.stop_session();
    }

    fn spoken_wpm(&self, now: Instant) -> Option<u32> {
        let elapsed = now.saturating_duration_since(self.started_at?).as_secs_f64();
        if elapsed <= 0.0 {
            return None;
        }
        Some((self.words_spoken as f64 / elapsed * 60.0).round() as u32)
    }

    fn set_status(&mut self, status: VoiceStatus) {
        self.events.emit(VoiceEvent::VoiceStatusChanged { status });
    }

    pub fn state(&self) -> AlignerState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.is_listening
    }

    pub fn is_paused(&self) -> bool {
        self.state == AlignerState::Paused
    }

    pub fn last_matched_index(&self) -> Option<usize> {
        self.matcher.last_matched()
    }

    pub fn words_spoken(&self) -> u64 {
        self.words_spoken
    }
}

impl Drop for VoiceAligner {
    fn drop(&mut self) {
        self.recognizer.stop_session();
    }
}
