//! Terminal front end: stdin controls in, rendered prompter events out.

use cueleaf_core::engine::{Direction, EndReason, PlaybackEvent};
use cueleaf_core::pace::PaceEvent;
use cueleaf_core::session::SessionNotice;
use cueleaf_core::shortcuts::{Modifiers, command_for_key, parse_chord};
use cueleaf_core::timeline::{WordTimeline, format_clock};
use cueleaf_core::{
    CancellationToken, CountdownEvent, PrompterEvent, SharedSession, TranscriptFeed, VoiceEvent,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::BufRead;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

static KEY_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:(?P<chord>\S+)\s*$").expect("valid key-line pattern"));

/// What a line typed on stdin asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum InputLine {
    Key(String, Modifiers),
    Transcript(String),
    Blank,
}

/// `:space`, `:ctrl+p` and friends are key presses; anything else is speech.
pub fn classify_line(line: &str) -> InputLine {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(caps) = KEY_LINE.captures(line) {
        if let Some((key, modifiers)) = parse_chord(&caps["chord"]) {
            return InputLine::Key(key, modifiers);
        }
    }
    if line.trim().is_empty() {
        InputLine::Blank
    } else {
        InputLine::Transcript(line.trim().to_string())
    }
}

/// Read stdin on a detached thread until EOF or cancellation.
pub fn spawn_input(
    session: SharedSession,
    feed: Option<TranscriptFeed>,
    cancel: CancellationToken,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("prompter-input".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                if cancel.is_cancelled() {
                    break;
                }
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!("Failed to read stdin: {err}");
                        break;
                    }
                };
                match classify_line(&line) {
                    InputLine::Key(key, modifiers) => press_key(&session, &key, modifiers),
                    InputLine::Transcript(text) => match feed.as_ref() {
                        Some(feed) if feed.push_text(&text) => {}
                        Some(_) => debug!("Recognizer gone; dropping transcript"),
                        None => debug!("Voice input disabled; ignoring line"),
                    },
                    InputLine::Blank => {}
                }
            }
            debug!("Input thread finished");
        })
}

fn press_key(session: &SharedSession, key: &str, modifiers: Modifiers) {
    let Ok(mut session) = session.lock() else {
        warn!("Session lock poisoned; ignoring key");
        return;
    };
    let command = command_for_key(
        session.config(),
        key,
        modifiers,
        session.is_countdown_active(),
    );
    match command {
        Some(command) => {
            let event = session.apply_command(command);
            debug!(action = event.action, "Key handled");
        }
        None => debug!(key, "Unbound key"),
    }
}

/// Words per row and rows shown by the compact strip.
const STRIP_WORDS_PER_LINE: usize = 8;
const STRIP_LINES: usize = 2;

/// Turns the event stream into terminal lines. The full view shows each
/// script line once as it is reached; the compact strip redraws a window of
/// words around the current one on every word change.
pub struct ConsoleView {
    timeline: WordTimeline,
    current_line: Option<usize>,
    compact: bool,
}

impl ConsoleView {
    pub fn new(timeline: WordTimeline) -> Self {
        Self {
            timeline,
            current_line: None,
            compact: false,
        }
    }

    pub fn compact(timeline: WordTimeline) -> Self {
        Self {
            compact: true,
            ..Self::new(timeline)
        }
    }

    pub fn render(&mut self, event: &PrompterEvent) -> Option<String> {
        match event {
            PrompterEvent::Countdown(CountdownEvent::CountdownRemaining { seconds }) => {
                Some(format!("Starting in {seconds}"))
            }
            PrompterEvent::Countdown(CountdownEvent::CountdownCompleted) => Some("Go".to_string()),
            PrompterEvent::Playback(event) => self.render_playback(event),
            PrompterEvent::Voice(VoiceEvent::VoiceStatusChanged { status }) => {
                Some(format!("[voice] {}", format!("{status:?}").to_lowercase()))
            }
            PrompterEvent::Voice(VoiceEvent::VoiceWpmChanged { wpm }) => {
                debug!(wpm, "Spoken pace");
                None
            }
            PrompterEvent::Pace(PaceEvent::PaceSampled { wpm, zone, .. }) => Some(format!(
                "[pace] {:.0} wpm ({})",
                wpm,
                format!("{zone:?}").to_lowercase()
            )),
            PrompterEvent::Session(SessionNotice::PracticeSummary(summary)) => Some(format!(
                "Practice summary: {} wpm average, {} pauses ({}s), {} total",
                summary.average_wpm,
                summary.pause_count,
                summary.total_pause_seconds,
                format_clock(summary.total_duration_seconds as f64)
            )),
            PrompterEvent::Session(SessionNotice::SessionClosed) => {
                Some("Session closed".to_string())
            }
        }
    }

    fn render_playback(&mut self, event: &PlaybackEvent) -> Option<String> {
        match event {
            PlaybackEvent::WordIndexChanged { index } if self.compact => {
                Some(format!("> {}", self.strip_text(*index)))
            }
            PlaybackEvent::WordIndexChanged { index } => {
                let line = self.timeline.line_of_word(*index);
                if self.current_line == Some(line) {
                    return None;
                }
                self.current_line = Some(line);
                Some(format!("> {}", self.line_text(line)))
            }
            PlaybackEvent::ScrollOffsetChanged { .. } => None,
            PlaybackEvent::ElapsedTimeChanged { seconds } => {
                debug!(elapsed = %format_clock(*seconds), "Elapsed");
                None
            }
            PlaybackEvent::PauseStateChanged { paused: true } => Some("[paused]".to_string()),
            PlaybackEvent::PauseStateChanged { paused: false } => Some("[resumed]".to_string()),
            PlaybackEvent::SpeedChanged { speed, display_wpm } => {
                Some(format!("[speed] {speed:.0} ({display_wpm:.0} wpm)"))
            }
            PlaybackEvent::DirectionChanged { direction } => Some(match direction {
                Direction::Forward => "[direction] forward".to_string(),
                Direction::Backward => "[direction] reverse".to_string(),
            }),
            PlaybackEvent::PlaybackEnded { reason } => Some(match reason {
                EndReason::Stop => "End of script".to_string(),
                EndReason::Close => "End of script; closing".to_string(),
            }),
        }
    }

    fn line_text(&self, line: usize) -> String {
        let start = self.timeline.line_start(line);
        let count = self.timeline.lines().get(line).copied().unwrap_or(0);
        self.timeline
            .words()
            .iter()
            .skip(start)
            .take(count)
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn strip_text(&self, current: usize) -> String {
        let window = self
            .timeline
            .visible_window(current, STRIP_WORDS_PER_LINE, STRIP_LINES);
        let words = self.timeline.words();
        window
            .filter_map(|index| {
                let word = words.get(index)?;
                Some(if index == current {
                    format!("[{}]", word.text)
                } else {
                    word.text.clone()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn log_startup_hint(voice: bool) {
    info!("Controls: type :space, :up, :down, :left, :right, :r, :v, :escape then Enter");
    if voice {
        info!("Voice scrolling: any other line is treated as spoken text");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cueleaf_core::pace::{PaceZone, PracticeSummary};

    #[test]
    fn classifies_key_lines_and_speech() {
        assert_eq!(
            classify_line(":space\n"),
            InputLine::Key("space".to_string(), Modifiers::NONE)
        );
        assert_eq!(
            classify_line(":Ctrl+P"),
            InputLine::Key("p".to_string(), Modifiers::CTRL)
        );
        assert_eq!(
            classify_line("  good evening everyone "),
            InputLine::Transcript("good evening everyone".to_string())
        );
        assert_eq!(classify_line("   "), InputLine::Blank);
        assert_eq!(
            classify_line(": not a key"),
            InputLine::Transcript(": not a key".to_string())
        );
    }

    #[test]
    fn renders_each_line_once() {
        let mut view = ConsoleView::new(WordTimeline::build("one two\nthree four\n"));
        let word = |index| PrompterEvent::Playback(PlaybackEvent::WordIndexChanged { index });

        assert_eq!(view.render(&word(0)), Some("> one two".to_string()));
        assert_eq!(view.render(&word(1)), None);
        assert_eq!(view.render(&word(2)), Some("> three four".to_string()));
    }

    #[test]
    fn compact_strip_brackets_the_current_word() {
        let text = (0..40).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let mut view = ConsoleView::compact(WordTimeline::build(&text));
        let word = |index| PrompterEvent::Playback(PlaybackEvent::WordIndexChanged { index });

        let first = view.render(&word(0)).expect("strip");
        assert!(first.starts_with("> [w0] w1 w2"));
        assert!(first.ends_with("w15"));

        let middle = view.render(&word(20)).expect("strip");
        assert!(middle.starts_with("> w16 w17 w18 w19 [w20] w21"));
        assert!(middle.ends_with("w31"));

        let tail = view.render(&word(39)).expect("strip");
        assert_eq!(tail, "> w35 w36 w37 w38 [w39]");
    }

    #[test]
    fn renders_status_events() {
        let mut view = ConsoleView::new(WordTimeline::default());
        assert_eq!(
            view.render(&PrompterEvent::Pace(PaceEvent::PaceSampled {
                wpm: 151.4,
                zone: PaceZone::Optimal,
                position: 0.6,
            })),
            Some("[pace] 151 wpm (optimal)".to_string())
        );
        let summary = PracticeSummary {
            average_wpm: 140,
            pause_count: 1,
            total_pause_seconds: 4,
            total_duration_seconds: 75,
            readings_count: 30,
        };
        assert_eq!(
            view.render(&PrompterEvent::Session(SessionNotice::PracticeSummary(summary))),
            Some("Practice summary: 140 wpm average, 1 pauses (4s), 1:15 total".to_string())
        );
    }
}
