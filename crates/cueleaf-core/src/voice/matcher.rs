use crate::timeline::normalize_token;
use std::ops::Range;

/// Forward-only transcript matcher.
///
/// Only the `lookahead` words after the last confirmed match are eligible, and
/// the first equal word wins. Nothing before the last match is ever searched,
/// so progress is monotonic.
#[derive(Debug, Clone)]
pub struct ForwardMatcher {
    last_matched: Option<usize>,
    lookahead: usize,
    min_token_chars: usize,
}

impl ForwardMatcher {
    pub fn new(lookahead: usize, min_token_chars: usize) -> Self {
        Self {
            last_matched: None,
            lookahead: lookahead.max(1),
            min_token_chars,
        }
    }

    pub fn last_matched(&self) -> Option<usize> {
        self.last_matched
    }

    pub fn reset(&mut self) {
        self.last_matched = None;
    }

    /// Word indices currently eligible for a match.
    pub fn window(&self, word_count: usize) -> Range<usize> {
        let start = self.last_matched.map_or(0, |idx| idx + 1).min(word_count);
        let end = (start + self.lookahead).min(word_count);
        start..end
    }

    /// Match one spoken token against the normalized script words.
    pub fn match_token(&mut self, spoken: &str, words: &[String]) -> Option<usize> {
        let spoken = normalize_token(spoken);
        if spoken.chars().count() < self.min_token_chars {
            return None;
        }
        let window = self.window(words.len());
        let offset = window.start;
        let hit = words[window]
            .iter()
            .position(|word| *word == spoken)
            .map(|pos| offset + pos)?;
        self.last_matched = Some(hit);
        Some(hit)
    }
}

/// The last `count` whitespace-separated words of a transcript. Interim
/// results repeat the whole phrase so far; only the tail is new.
pub fn transcript_tail(transcript: &str, count: usize) -> Vec<&str> {
    let words: Vec<&str> = transcript.split_whitespace().collect();
    let skip = words.len().saturating_sub(count);
    words[skip..].to_vec()
}
