pub(crate) fn default_scroll_speed() -> f32 {
    50.0
}

pub(crate) fn default_font_size() -> f32 {
    32.0
}

pub(crate) fn default_end_action() -> crate::config::EndAction {
    crate::config::EndAction::Stop
}

pub(crate) fn default_countdown_seconds() -> u32 {
    3
}

pub(crate) fn default_target_min_wpm() -> f64 {
    130.0
}

pub(crate) fn default_target_max_wpm() -> f64 {
    170.0
}

pub(crate) fn default_voice_scroll_enabled() -> bool {
    false
}

pub(crate) fn default_practice_tracking() -> bool {
    true
}

pub(crate) fn default_speed_step() -> f32 {
    10.0
}

pub(crate) fn default_wpm_per_speed_unit() -> f64 {
    3.0
}

pub(crate) fn default_tick_interval_ms() -> u64 {
    33
}

pub(crate) fn default_pace_sample_interval_secs() -> f32 {
    2.0
}

pub(crate) fn default_pace_max_wpm() -> f64 {
    250.0
}

pub(crate) fn default_voice_lookahead_window() -> usize {
    50
}

pub(crate) fn default_voice_silence_threshold_ms() -> u64 {
    1500
}

pub(crate) fn default_voice_restart_delay_ms() -> u64 {
    100
}

pub(crate) fn default_voice_min_token_chars() -> usize {
    2
}

pub(crate) fn default_voice_transcript_tail_words() -> usize {
    3
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_key_toggle_pause() -> String {
    "space".to_string()
}

pub(crate) fn default_key_speed_up() -> String {
    "up".to_string()
}

pub(crate) fn default_key_speed_down() -> String {
    "down".to_string()
}

pub(crate) fn default_key_jump_forward() -> String {
    "right".to_string()
}

pub(crate) fn default_key_jump_back() -> String {
    "left".to_string()
}

pub(crate) fn default_key_toggle_direction() -> String {
    "r".to_string()
}

pub(crate) fn default_key_close() -> String {
    "escape".to_string()
}

pub(crate) fn default_key_toggle_voice() -> String {
    "v".to_string()
}

pub(crate) fn default_key_skip_countdown() -> String {
    "space".to_string()
}
