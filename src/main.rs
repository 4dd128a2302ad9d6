//! Entry point for the terminal teleprompter.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Register the script with the on-disk store under `cache_dir`.
//! - Run the prompter session until it closes or Ctrl-C is pressed.

mod console;

use crate::console::{ConsoleView, log_startup_hint, spawn_input};
use anyhow::{Context, Result, anyhow};
use cueleaf_core::config::{PrompterConfig, load_config};
use cueleaf_core::{
    CancellationToken, ChannelRecognizer, FileScriptStore, PlaybackRunner, PrompterSession, Script,
    ScriptStore, SpeechRecognizer, system_clock,
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const EVENT_WAIT: Duration = Duration::from_millis(100);

struct CliArgs {
    script_path: PathBuf,
    voice: bool,
    json: bool,
    compact: bool,
    countdown: Option<u32>,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args()?;
    let config = apply_overrides(load_config(Path::new("conf/config.toml")), &args);
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        path = %args.script_path.display(),
        level = %config.log_level,
        speed = config.scroll_speed,
        end_action = %config.end_action,
        "Starting teleprompter"
    );

    let text = fs::read_to_string(&args.script_path)
        .with_context(|| format!("Failed to read {}", args.script_path.display()))?;
    let script_id = fs::canonicalize(&args.script_path)
        .unwrap_or_else(|_| args.script_path.clone())
        .display()
        .to_string();
    let store = register_script(&config.cache_dir, &script_id, &args.script_path, &text);

    let (recognizer, feed) = ChannelRecognizer::new();
    let recognizer: Box<dyn SpeechRecognizer> = Box::new(recognizer);
    let tick_interval = config.tick_interval();
    let mut session = PrompterSession::new(system_clock(), config, Some(recognizer));
    if let Some(store) = store {
        session = session.with_store(Box::new(store));
    }
    session.load_script(Some(script_id), &text);
    let events = session.subscribe();
    let mut view = if args.compact {
        ConsoleView::compact(session.timeline().clone())
    } else {
        ConsoleView::new(session.timeline().clone())
    };
    session.begin();
    let session = Arc::new(Mutex::new(session));

    let cancel = CancellationToken::new();
    let handler_cancel = cancel.clone();
    ctrlc::set_handler(move || handler_cancel.cancel())
        .context("Failed to install Ctrl-C handler")?;

    let runner = PlaybackRunner::spawn(session.clone(), tick_interval, cancel.clone())?;
    spawn_input(session.clone(), Some(feed), cancel.clone())
        .context("Failed to start input thread")?;
    log_startup_hint(args.voice);

    while !cancel.is_cancelled() && !runner.is_finished() {
        match events.recv_timeout(EVENT_WAIT) {
            Ok(event) => emit(&mut view, &event, args.json),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    runner.shutdown()?;
    let mut session = session
        .lock()
        .map_err(|_| anyhow!("prompter session lock poisoned"))?;
    if !session.is_finished() {
        info!("Interrupted; closing session");
        session.close();
    }
    drop(session);
    for event in events.try_iter() {
        emit(&mut view, &event, args.json);
    }
    Ok(())
}

/// Command-line flags win over the config file, within the same limits.
fn apply_overrides(mut config: PrompterConfig, args: &CliArgs) -> PrompterConfig {
    if args.voice {
        config.voice_scroll_enabled = true;
    }
    if let Some(seconds) = args.countdown {
        config.countdown_seconds = seconds;
    }
    config.sanitized()
}

fn emit(view: &mut ConsoleView, event: &cueleaf_core::PrompterEvent, json: bool) {
    if json {
        match event.to_json_line() {
            Ok(line) => println!("{line}"),
            Err(err) => warn!("Failed to encode event: {err}"),
        }
    } else if let Some(line) = view.render(event) {
        println!("{line}");
    }
}

/// Make sure the store has an up-to-date copy of the script so practice stats
/// have somewhere to land. Storage problems only disable stats.
fn register_script(
    cache_dir: &str,
    script_id: &str,
    path: &Path,
    text: &str,
) -> Option<FileScriptStore> {
    let mut store = FileScriptStore::new(cache_dir);
    let existing = match store.get(script_id) {
        Ok(existing) => existing,
        Err(err) => {
            warn!("Script store unavailable; practice stats disabled: {err}");
            return None;
        }
    };
    let script = match existing {
        Some(mut script) if script.content != text => {
            info!(id = script_id, "Script changed since last run");
            script.content = text.to_string();
            script
        }
        Some(script) => {
            if let Some(wpm) = script.words_per_minute {
                let last_duration = script.last_practice_duration.unwrap_or(0.0);
                info!(
                    last_wpm = wpm.round() as u64,
                    last_duration_secs = last_duration.round() as u64,
                    "Previous practice run"
                );
            }
            return Some(store);
        }
        None => {
            let title = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| script_id.to_string());
            Script::new(script_id, title, text)
        }
    };
    if let Err(err) = store.save(&script) {
        warn!("Failed to save script; practice stats disabled: {err}");
        return None;
    }
    Some(store)
}

fn parse_args() -> Result<CliArgs> {
    let mut script_path = None;
    let mut voice = false;
    let mut json = false;
    let mut compact = false;
    let mut countdown = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--voice" => voice = true,
            "--json" => json = true,
            "--compact" => compact = true,
            "--countdown" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("--countdown needs a number of seconds"))?;
                countdown = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid --countdown value: {value}"))?,
                );
            }
            other if script_path.is_none() => script_path = Some(PathBuf::from(other)),
            other => return Err(anyhow!("Unexpected argument: {other}")),
        }
    }

    let script_path = script_path.ok_or_else(|| {
        anyhow!("Usage: cueleaf <script.txt> [--voice] [--json] [--compact] [--countdown <secs>]")
    })?;
    if !script_path.exists() {
        return Err(anyhow!("File not found: {}", script_path.display()));
    }
    Ok(CliArgs {
        script_path,
        voice,
        json,
        compact,
        countdown,
    })
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
