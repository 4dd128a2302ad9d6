use serde::Deserialize;
use std::time::Duration;

/// Lowest accepted scroll speed, in speed units.
pub const MIN_SCROLL_SPEED: f32 = 10.0;
/// Highest accepted scroll speed, in speed units.
pub const MAX_SCROLL_SPEED: f32 = 200.0;
pub const MIN_FONT_SIZE: f32 = 8.0;
pub const MAX_FONT_SIZE: f32 = 144.0;
pub const MIN_PACE_SAMPLE_SECS: f32 = 0.25;
pub const MAX_PACE_SAMPLE_SECS: f32 = 60.0;
pub const MAX_COUNTDOWN_SECONDS: u32 = 60;

/// Prompter configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct PrompterConfig {
    #[serde(default = "crate::config::defaults::default_scroll_speed")]
    pub scroll_speed: f32,
    #[serde(default = "crate::config::defaults::default_font_size")]
    pub font_size: f32,
    #[serde(default = "crate::config::defaults::default_end_action")]
    pub end_action: EndAction,
    #[serde(default = "crate::config::defaults::default_countdown_seconds")]
    pub countdown_seconds: u32,
    #[serde(default = "crate::config::defaults::default_target_min_wpm")]
    pub target_min_wpm: f64,
    #[serde(default = "crate::config::defaults::default_target_max_wpm")]
    pub target_max_wpm: f64,
    #[serde(default = "crate::config::defaults::default_voice_scroll_enabled")]
    pub voice_scroll_enabled: bool,
    #[serde(default = "crate::config::defaults::default_practice_tracking")]
    pub practice_tracking: bool,
    #[serde(default = "crate::config::defaults::default_speed_step")]
    pub speed_step: f32,
    #[serde(default = "crate::config::defaults::default_wpm_per_speed_unit")]
    pub wpm_per_speed_unit: f64,
    #[serde(default = "crate::config::defaults::default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_pace_sample_interval_secs")]
    pub pace_sample_interval_secs: f32,
    #[serde(default = "crate::config::defaults::default_pace_max_wpm")]
    pub pace_max_wpm: f64,
    #[serde(default = "crate::config::defaults::default_voice_lookahead_window")]
    pub voice_lookahead_window: usize,
    #[serde(default = "crate::config::defaults::default_voice_silence_threshold_ms")]
    pub voice_silence_threshold_ms: u64,
    #[serde(default = "crate::config::defaults::default_voice_restart_delay_ms")]
    pub voice_restart_delay_ms: u64,
    #[serde(default = "crate::config::defaults::default_voice_min_token_chars")]
    pub voice_min_token_chars: usize,
    #[serde(default = "crate::config::defaults::default_voice_transcript_tail_words")]
    pub voice_transcript_tail_words: usize,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "crate::config::defaults::default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_pause")]
    pub key_toggle_pause: String,
    #[serde(default = "crate::config::defaults::default_key_speed_up")]
    pub key_speed_up: String,
    #[serde(default = "crate::config::defaults::default_key_speed_down")]
    pub key_speed_down: String,
    #[serde(default = "crate::config::defaults::default_key_jump_forward")]
    pub key_jump_forward: String,
    #[serde(default = "crate::config::defaults::default_key_jump_back")]
    pub key_jump_back: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_direction")]
    pub key_toggle_direction: String,
    #[serde(default = "crate::config::defaults::default_key_close")]
    pub key_close: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_voice")]
    pub key_toggle_voice: String,
    #[serde(default = "crate::config::defaults::default_key_skip_countdown")]
    pub key_skip_countdown: String,
}

impl Default for PrompterConfig {
    fn default() -> Self {
        PrompterConfig {
            scroll_speed: crate::config::defaults::default_scroll_speed(),
            font_size: crate::config::defaults::default_font_size(),
            end_action: crate::config::defaults::default_end_action(),
            countdown_seconds: crate::config::defaults::default_countdown_seconds(),
            target_min_wpm: crate::config::defaults::default_target_min_wpm(),
            target_max_wpm: crate::config::defaults::default_target_max_wpm(),
            voice_scroll_enabled: crate::config::defaults::default_voice_scroll_enabled(),
            practice_tracking: crate::config::defaults::default_practice_tracking(),
            speed_step: crate::config::defaults::default_speed_step(),
            wpm_per_speed_unit: crate::config::defaults::default_wpm_per_speed_unit(),
            tick_interval_ms: crate::config::defaults::default_tick_interval_ms(),
            pace_sample_interval_secs:
                crate::config::defaults::default_pace_sample_interval_secs(),
            pace_max_wpm: crate::config::defaults::default_pace_max_wpm(),
            voice_lookahead_window: crate::config::defaults::default_voice_lookahead_window(),
            voice_silence_threshold_ms:
                crate::config::defaults::default_voice_silence_threshold_ms(),
            voice_restart_delay_ms: crate::config::defaults::default_voice_restart_delay_ms(),
            voice_min_token_chars: crate::config::defaults::default_voice_min_token_chars(),
            voice_transcript_tail_words:
                crate::config::defaults::default_voice_transcript_tail_words(),
            log_level: crate::config::defaults::default_log_level(),
            cache_dir: crate::config::defaults::default_cache_dir(),
            key_toggle_pause: crate::config::defaults::default_key_toggle_pause(),
            key_speed_up: crate::config::defaults::default_key_speed_up(),
            key_speed_down: crate::config::defaults::default_key_speed_down(),
            key_jump_forward: crate::config::defaults::default_key_jump_forward(),
            key_jump_back: crate::config::defaults::default_key_jump_back(),
            key_toggle_direction: crate::config::defaults::default_key_toggle_direction(),
            key_close: crate::config::defaults::default_key_close(),
            key_toggle_voice: crate::config::defaults::default_key_toggle_voice(),
            key_skip_countdown: crate::config::defaults::default_key_skip_countdown(),
        }
    }
}

impl PrompterConfig {
    /// Clamp every tunable into its supported range. Config can come from a
    /// hand-edited file, so nothing downstream trusts raw values.
    pub fn sanitized(mut self) -> Self {
        let defaults = PrompterConfig::default();
        self.scroll_speed = clamp_or(
            self.scroll_speed,
            MIN_SCROLL_SPEED,
            MAX_SCROLL_SPEED,
            defaults.scroll_speed,
        );
        self.font_size = clamp_or(
            self.font_size,
            MIN_FONT_SIZE,
            MAX_FONT_SIZE,
            defaults.font_size,
        );
        self.countdown_seconds = self.countdown_seconds.min(MAX_COUNTDOWN_SECONDS);
        if !self.target_min_wpm.is_finite() || self.target_min_wpm < 0.0 {
            self.target_min_wpm = defaults.target_min_wpm;
        }
        if !self.target_max_wpm.is_finite() || self.target_max_wpm < self.target_min_wpm {
            self.target_max_wpm = self.target_min_wpm.max(defaults.target_max_wpm);
        }
        self.speed_step = clamp_or(self.speed_step, 1.0, 50.0, defaults.speed_step);
        if !self.wpm_per_speed_unit.is_finite() || self.wpm_per_speed_unit <= 0.0 {
            self.wpm_per_speed_unit = defaults.wpm_per_speed_unit;
        }
        self.tick_interval_ms = self.tick_interval_ms.clamp(5, 1000);
        self.pace_sample_interval_secs = clamp_or(
            self.pace_sample_interval_secs,
            MIN_PACE_SAMPLE_SECS,
            MAX_PACE_SAMPLE_SECS,
            defaults.pace_sample_interval_secs,
        );
        if !self.pace_max_wpm.is_finite() || self.pace_max_wpm <= 0.0 {
            self.pace_max_wpm = defaults.pace_max_wpm;
        }
        self.voice_lookahead_window = self.voice_lookahead_window.max(1);
        self.voice_transcript_tail_words = self.voice_transcript_tail_words.max(1);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Never zero, so pace polling always makes progress.
    pub fn pace_sample_interval(&self) -> Duration {
        let secs = clamp_or(
            self.pace_sample_interval_secs,
            MIN_PACE_SAMPLE_SECS,
            MAX_PACE_SAMPLE_SECS,
            crate::config::defaults::default_pace_sample_interval_secs(),
        );
        Duration::from_secs_f32(secs)
    }

    pub fn voice_silence_threshold(&self) -> Duration {
        Duration::from_millis(self.voice_silence_threshold_ms)
    }

    pub fn voice_restart_delay(&self) -> Duration {
        Duration::from_millis(self.voice_restart_delay_ms)
    }

    /// Words per minute shown for the configured scroll speed.
    pub fn display_wpm(&self) -> f64 {
        self.scroll_speed as f64 * self.wpm_per_speed_unit
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// What playback does once the last word is reached.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EndAction {
    #[default]
    Stop,
    Loop,
    Close,
}

impl std::fmt::Display for EndAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EndAction::Stop => "stop",
            EndAction::Loop => "loop",
            EndAction::Close => "close",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
