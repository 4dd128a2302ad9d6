//! Word and line splitting for prompter scripts.
//!
//! A [`WordTimeline`] is rebuilt from scratch whenever the script text
//! changes; a word's position in the sequence is its only identity.

use serde::Serialize;
use std::ops::Range;
use unicode_normalization::UnicodeNormalization;

/// Reading rate assumed by [`estimated_read_time`].
pub const DEFAULT_READ_WPM: f64 = 150.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Word {
    pub text: String,
    /// Byte offset of the word in the source text.
    pub source_offset: usize,
    pub normalized: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WordTimeline {
    words: Vec<Word>,
    lines: Vec<usize>,
}

impl WordTimeline {
    /// Split `text` into words (whitespace) and non-blank lines (line breaks).
    pub fn build(text: &str) -> Self {
        let words = split_words(text);
        let lines = text
            .lines()
            .map(|line| line.split_whitespace().count())
            .filter(|count| *count > 0)
            .collect();
        Self { words, lines }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word(&self, idx: usize) -> Option<&Word> {
        self.words.get(idx)
    }

    /// Word count of every non-blank line, in order.
    pub fn lines(&self) -> &[usize] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn last_line(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    pub fn avg_words_per_line(&self) -> f64 {
        if self.lines.is_empty() {
            return 1.0;
        }
        (self.words.len() as f64 / self.lines.len() as f64).max(1.0)
    }

    /// Index of the first word on `line` (cumulative count of earlier lines).
    pub fn line_start(&self, line: usize) -> usize {
        self.lines.iter().take(line).sum()
    }

    /// Line containing the word at `word_idx`; indices past the end map to the
    /// last line.
    pub fn line_of_word(&self, word_idx: usize) -> usize {
        let mut seen = 0usize;
        for (line, count) in self.lines.iter().copied().enumerate() {
            seen += count;
            if word_idx < seen {
                return line;
            }
        }
        self.last_line()
    }

    /// Range of words shown by the compact single-strip view: a quarter of the
    /// strip sits behind the current word.
    pub fn visible_window(
        &self,
        current: usize,
        words_per_line: usize,
        line_count: usize,
    ) -> Range<usize> {
        let total = words_per_line.max(1) * line_count.max(1);
        let start = current.saturating_sub(total / 4).min(self.words.len());
        let end = (start + total).min(self.words.len());
        start..end
    }
}

/// Lowercase, decompose, and keep only alphanumeric characters.
pub fn normalize_token(raw: &str) -> String {
    raw.nfkd()
        .flat_map(char::to_lowercase)
        .filter(|ch| ch.is_alphanumeric())
        .collect()
}

fn split_words(text: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;

    for (offset, ch) in text.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(begin)) => {
                words.push(make_word(&text[begin..offset], begin));
                start = None;
            }
            (false, None) => start = Some(offset),
            _ => {}
        }
    }
    if let Some(begin) = start {
        words.push(make_word(&text[begin..], begin));
    }

    words
}

fn make_word(text: &str, source_offset: usize) -> Word {
    Word {
        text: text.to_string(),
        source_offset,
        normalized: normalize_token(text),
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Human-readable read time estimate, e.g. `"~3 min"`.
pub fn estimated_read_time(text: &str, wpm: f64) -> String {
    let minutes = word_count(text) as f64 / wpm.max(1.0);
    if minutes < 1.0 {
        "under 1 min".to_string()
    } else {
        format!("~{} min", minutes.round() as u64)
    }
}

/// Format seconds as `M:SS`.
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
