//! Configuration loading for the prompter.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! sensible defaults so a session can still start.

mod defaults;
mod io;
mod models;

pub use io::{load_config, parse_config, serialize_config};
pub use models::{
    EndAction, LogLevel, MAX_FONT_SIZE, MAX_SCROLL_SPEED, MIN_FONT_SIZE, MIN_SCROLL_SPEED,
    PrompterConfig,
};
