//! Keyboard shortcut resolution for prompter controls.

use crate::config::PrompterConfig;
use crate::session::SessionCommand;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub logo: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        logo: false,
        shift: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
}

/// Split a typed chord such as `ctrl+space` into its key and modifiers.
pub fn parse_chord(raw: &str) -> Option<(String, Modifiers)> {
    let mut modifiers = Modifiers::NONE;
    let mut key = None;
    for token in raw
        .trim()
        .to_ascii_lowercase()
        .split('+')
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        match token {
            "ctrl" | "control" => modifiers.ctrl = true,
            "alt" => modifiers.alt = true,
            "logo" | "meta" | "super" | "cmd" | "command" => modifiers.logo = true,
            "shift" => modifiers.shift = true,
            other => key = Some(canonical_key(other).to_string()),
        }
    }
    key.map(|key| (key, modifiers))
}

/// Map a key press to a control. While the countdown runs only the skip key
/// does anything.
pub fn command_for_key(
    config: &PrompterConfig,
    pressed: &str,
    modifiers: Modifiers,
    countdown_active: bool,
) -> Option<SessionCommand> {
    let lowered = pressed.to_ascii_lowercase();
    let trimmed = lowered.trim();
    let pressed = if trimmed.is_empty() && !lowered.is_empty() {
        "space"
    } else {
        canonical_key(trimmed)
    };

    if countdown_active {
        return shortcut_matches(&config.key_skip_countdown, "space", pressed, modifiers)
            .then_some(SessionCommand::SkipCountdown);
    }

    if shortcut_matches(&config.key_close, "escape", pressed, modifiers) {
        Some(SessionCommand::Close)
    } else if shortcut_matches(&config.key_toggle_pause, "space", pressed, modifiers) {
        Some(SessionCommand::TogglePause)
    } else if shortcut_matches(&config.key_speed_up, "up", pressed, modifiers) {
        Some(SessionCommand::SpeedUp {
            step: config.speed_step,
        })
    } else if shortcut_matches(&config.key_speed_down, "down", pressed, modifiers) {
        Some(SessionCommand::SpeedDown {
            step: config.speed_step,
        })
    } else if shortcut_matches(&config.key_jump_forward, "right", pressed, modifiers) {
        Some(SessionCommand::JumpForward)
    } else if shortcut_matches(&config.key_jump_back, "left", pressed, modifiers) {
        Some(SessionCommand::JumpBack)
    } else if shortcut_matches(&config.key_toggle_direction, "r", pressed, modifiers) {
        Some(SessionCommand::ToggleDirection)
    } else if shortcut_matches(&config.key_toggle_voice, "v", pressed, modifiers) {
        Some(SessionCommand::ToggleVoice)
    } else {
        None
    }
}

pub fn shortcut_matches(raw: &str, fallback: &str, pressed: &str, modifiers: Modifiers) -> bool {
    let normalized = normalize_shortcut_token(raw, fallback);
    let Some((required_key, required)) = parse_chord(&normalized) else {
        return pressed == fallback && modifiers == Modifiers::NONE;
    };
    pressed == required_key && modifiers == required
}

pub fn normalize_shortcut_token(raw: &str, fallback: &str) -> String {
    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        fallback.to_string()
    } else {
        normalized.replace("spacebar", "space")
    }
}

fn canonical_key(key: &str) -> &str {
    match key {
        " " | "spacebar" => "space",
        "esc" => "escape",
        "arrowup" => "up",
        "arrowdown" => "down",
        "arrowleft" => "left",
        "arrowright" => "right",
        other => other,
    }
}
