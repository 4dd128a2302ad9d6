//! Background scheduler that ticks a shared session at a fixed cadence.

use crate::cancellation::CancellationToken;
use crate::session::PrompterSession;
use anyhow::{Result, anyhow};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

pub type SharedSession = Arc<Mutex<PrompterSession>>;

pub struct PlaybackRunner {
    cancel: CancellationToken,
    handle: Option<JoinHandle<Result<()>>>,
}

impl PlaybackRunner {
    /// Tick `session` every `interval` until it finishes or `cancel` fires.
    pub fn spawn(
        session: SharedSession,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let worker_cancel = cancel.clone();
        let handle = thread::Builder::new()
            .name("prompter-runner".to_string())
            .spawn(move || run_loop(&session, interval, &worker_cancel))?;
        info!(interval_ms = interval.as_millis() as u64, "Playback runner started");
        Ok(Self {
            cancel,
            handle: Some(handle),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .is_none_or(|handle| handle.is_finished())
    }

    /// Stop ticking and wait for the thread to exit.
    pub fn shutdown(mut self) -> Result<()> {
        self.cancel.cancel();
        self.join_inner()
    }

    /// Wait for the session to finish on its own.
    pub fn join(mut self) -> Result<()> {
        self.join_inner()
    }

    fn join_inner(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        handle
            .join()
            .map_err(|_| anyhow!("prompter runner thread panicked"))?
    }
}

impl Drop for PlaybackRunner {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.cancel();
            let _ = self.join_inner();
        }
    }
}

fn run_loop(session: &SharedSession, interval: Duration, cancel: &CancellationToken) -> Result<()> {
    while !cancel.is_cancelled() {
        {
            let mut session = session
                .lock()
                .map_err(|_| anyhow!("prompter session lock poisoned"))?;
            session.tick();
            if session.is_finished() {
                info!("Session finished; playback runner exiting");
                return Ok(());
            }
        }
        if cancel.sleep(interval) {
            break;
        }
    }
    debug!("Playback runner cancelled");
    Ok(())
}
