//! Script persistence seam.
//!
//! The prompter only ever reads a script and reports practice stats back.
//! [`FileScriptStore`] keeps one small TOML file per script under a directory
//! named by a SHA-256 of the script id, so arbitrary ids (paths, titles) are
//! safe as file names.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info};

const SCRIPT_FILE: &str = "script.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub updated_at: u64,
    #[serde(default)]
    pub words_per_minute: Option<f64>,
    #[serde(default)]
    pub last_practice_duration: Option<f64>,
}

impl Script {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            updated_at: unix_now(),
            words_per_minute: None,
            last_practice_duration: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("script not found: {0}")]
    NotFound(String),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize script: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub trait ScriptStore: Send {
    fn get(&self, id: &str) -> Result<Option<Script>, StoreError>;
    fn save(&mut self, script: &Script) -> Result<(), StoreError>;
    fn update_practice_stats(
        &mut self,
        id: &str,
        average_wpm: f64,
        duration_secs: f64,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryScriptStore {
    scripts: HashMap<String, Script>,
}

impl MemoryScriptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScriptStore for MemoryScriptStore {
    fn get(&self, id: &str) -> Result<Option<Script>, StoreError> {
        Ok(self.scripts.get(id).cloned())
    }

    fn save(&mut self, script: &Script) -> Result<(), StoreError> {
        self.scripts.insert(script.id.clone(), script.clone());
        Ok(())
    }

    fn update_practice_stats(
        &mut self,
        id: &str,
        average_wpm: f64,
        duration_secs: f64,
    ) -> Result<(), StoreError> {
        let script = self
            .scripts
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply_stats(script, average_wpm, duration_secs);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileScriptStore {
    root: PathBuf,
}

impl FileScriptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn hash_dir(&self, id: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(id.as_bytes());
        let hash = format!("{:x}", hasher.finalize());
        self.root.join(hash)
    }

    fn script_path(&self, id: &str) -> PathBuf {
        self.hash_dir(id).join(SCRIPT_FILE)
    }
}

impl ScriptStore for FileScriptStore {
    fn get(&self, id: &str) -> Result<Option<Script>, StoreError> {
        let path = self.script_path(id);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let script = toml::from_str(&data).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded stored script");
        Ok(Some(script))
    }

    fn save(&mut self, script: &Script) -> Result<(), StoreError> {
        let path = self.script_path(&script.id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = toml::to_string(script)?;
        fs::write(&path, contents).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Saved script");
        Ok(())
    }

    fn update_practice_stats(
        &mut self,
        id: &str,
        average_wpm: f64,
        duration_secs: f64,
    ) -> Result<(), StoreError> {
        let mut script = self
            .get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply_stats(&mut script, average_wpm, duration_secs);
        self.save(&script)?;
        info!(id, average_wpm, duration_secs, "Recorded practice stats");
        Ok(())
    }
}

fn apply_stats(script: &mut Script, average_wpm: f64, duration_secs: f64) {
    script.words_per_minute = Some(average_wpm);
    script.last_practice_duration = Some(duration_secs);
    script.updated_at = unix_now();
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_updates_existing_scripts_only() {
        let mut store = MemoryScriptStore::new();
        assert!(matches!(
            store.update_practice_stats("missing", 140.0, 60.0),
            Err(StoreError::NotFound(_))
        ));

        store
            .save(&Script::new("s1", "Keynote", "Good evening"))
            .expect("save");
        store.update_practice_stats("s1", 142.5, 75.0).expect("update");

        let script = store.get("s1").expect("get").expect("present");
        assert_eq!(script.words_per_minute, Some(142.5));
        assert_eq!(script.last_practice_duration, Some(75.0));
    }

    #[test]
    fn file_store_round_trips_through_hashed_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileScriptStore::new(dir.path());
        let id = "/home/me/talks/keynote.txt";

        assert_eq!(store.get(id).expect("get"), None);
        store
            .save(&Script::new(id, "keynote", "Good evening everyone"))
            .expect("save");
        store.update_practice_stats(id, 151.0, 92.0).expect("update");

        let hashed = store.hash_dir(id);
        assert!(hashed.starts_with(dir.path()));
        assert_eq!(hashed.file_name().map(|n| n.len()), Some(64));
        assert!(hashed.join(SCRIPT_FILE).exists());

        let reopened = FileScriptStore::new(dir.path());
        let script = reopened.get(id).expect("get").expect("present");
        assert_eq!(script.content, "Good evening everyone");
        assert_eq!(script.words_per_minute, Some(151.0));
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileScriptStore::new(dir.path());
        let path = store.hash_dir("broken").join(SCRIPT_FILE);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "id = [").expect("write");

        assert!(matches!(store.get("broken"), Err(StoreError::Parse { .. })));
    }
}
