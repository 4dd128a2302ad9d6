use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use thiserror::Error;

/// Why a recognition session could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceStartError {
    #[error("speech recognition is not supported on this host")]
    Unsupported,
    #[error("microphone permission was denied")]
    PermissionDenied,
    #[error("speech recognition failed to start: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// The recognizer heard nothing before its own timeout.
    NoSpeech,
    Aborted,
    NotAllowed,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerEvent {
    Result { transcript: String, is_final: bool },
    /// The capture session terminated on its own.
    Ended,
    Error(RecognitionError),
}

/// A speech-to-text capability with an acquire/release lifecycle.
///
/// `stop_session` releases the capture session and must be safe to call when
/// nothing is open.
pub trait SpeechRecognizer: Send {
    fn is_supported(&self) -> bool;
    fn request_permission(&mut self) -> Result<(), VoiceStartError>;
    fn start_session(&mut self) -> Result<(), VoiceStartError>;
    fn stop_session(&mut self);
    /// Next pending event, without blocking.
    fn poll_event(&mut self) -> Option<RecognizerEvent>;
}

/// Recognizer fed from an in-process channel (console input, another thread,
/// or an external engine bridged in by the host).
pub struct ChannelRecognizer {
    rx: Receiver<RecognizerEvent>,
    capturing: bool,
}

/// Sending half of a [`ChannelRecognizer`].
#[derive(Clone)]
pub struct TranscriptFeed {
    tx: Sender<RecognizerEvent>,
}

impl ChannelRecognizer {
    pub fn new() -> (Self, TranscriptFeed) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                rx,
                capturing: false,
            },
            TranscriptFeed { tx },
        )
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }
}

impl SpeechRecognizer for ChannelRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn request_permission(&mut self) -> Result<(), VoiceStartError> {
        Ok(())
    }

    fn start_session(&mut self) -> Result<(), VoiceStartError> {
        self.capturing = true;
        Ok(())
    }

    fn stop_session(&mut self) {
        self.capturing = false;
    }

    fn poll_event(&mut self) -> Option<RecognizerEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if self.capturing => return Some(event),
                // Speech while no session is open is never heard.
                Ok(_) => continue,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return None,
            }
        }
    }
}

impl TranscriptFeed {
    /// Push a final transcript. Returns false once the recognizer is gone.
    pub fn push_text(&self, transcript: &str) -> bool {
        self.send(RecognizerEvent::Result {
            transcript: transcript.to_string(),
            is_final: true,
        })
    }

    pub fn push_interim(&self, transcript: &str) -> bool {
        self.send(RecognizerEvent::Result {
            transcript: transcript.to_string(),
            is_final: false,
        })
    }

    pub fn end_session(&self) -> bool {
        self.send(RecognizerEvent::Ended)
    }

    pub fn send(&self, event: RecognizerEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_dropped_while_not_capturing() {
        let (mut recognizer, feed) = ChannelRecognizer::new();
        assert!(feed.push_text("before start"));
        assert_eq!(recognizer.poll_event(), None);

        recognizer.start_session().expect("start");
        assert!(feed.push_interim("hello there"));
        assert_eq!(
            recognizer.poll_event(),
            Some(RecognizerEvent::Result {
                transcript: "hello there".to_string(),
                is_final: false,
            })
        );

        recognizer.stop_session();
        assert!(!recognizer.is_capturing());
        assert!(feed.end_session());
        assert_eq!(recognizer.poll_event(), None);
    }

    #[test]
    fn feed_reports_a_dropped_recognizer() {
        let (recognizer, feed) = ChannelRecognizer::new();
        drop(recognizer);
        assert!(!feed.push_text("anyone?"));
    }
}
