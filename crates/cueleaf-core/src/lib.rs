pub mod cancellation;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod engine;
pub mod events;
pub mod pace;
pub mod runner;
pub mod session;
pub mod shortcuts;
pub mod store;
pub mod timeline;
pub mod voice;

pub use cancellation::CancellationToken;
pub use clock::{Clock, ManualClock, SharedClock, SystemClock, system_clock};
pub use config::{EndAction, LogLevel, PrompterConfig};
pub use countdown::{Countdown, CountdownEvent};
pub use engine::{Direction, EndReason, PlaybackEngine, PlaybackEvent, PlaybackState};
pub use pace::{PaceEvent, PaceTracker, PaceZone, PracticeSummary};
pub use runner::{PlaybackRunner, SharedSession};
pub use session::{
    PrompterEvent, PrompterSession, SessionCommand, SessionEvent, SessionNotice, SessionPhase,
    SessionSnapshot,
};
pub use store::{FileScriptStore, MemoryScriptStore, Script, ScriptStore, StoreError};
pub use timeline::{Word, WordTimeline};
pub use voice::{
    ChannelRecognizer, SpeechRecognizer, TranscriptFeed, VoiceAligner, VoiceEvent, VoiceStatus,
};
