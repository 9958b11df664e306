//! Persisted scalar state: current pack version and stored custom links.
//!
//! Readable without network access so the presentation layer can show the
//! last known version and links. Only the sequential part of a sync writes it.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use url::Url;

use crate::links::parse_links;

/// Snapshot of the persisted slots. Missing slots take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheState {
    #[serde(default)]
    pub current_version: i64,
    #[serde(default)]
    pub stored_links: Vec<String>,
}

impl CacheState {
    /// Stored links re-parsed; invalid entries dropped, at most five.
    pub fn links(&self) -> Vec<Url> {
        parse_links(&self.stored_links)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("state {op} failed for {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("state file {} is corrupt: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("state encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Keyed scalar store used by the sync engine.
pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<CacheState, StateError>;
    fn set_version(&self, version: i64) -> Result<(), StateError>;
    fn set_links(&self, links: &[Url]) -> Result<(), StateError>;
}

/// State kept in a JSON file, rewritten atomically (temp file + rename).
#[derive(Debug)]
pub struct JsonStateStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    write_lock: Mutex<()>,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Default path: `~/.local/state/packsync/state.json`.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("packsync")?;
        Ok(xdg_dirs.get_state_home().join("state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<CacheState, StateError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CacheState::default()),
            Err(source) => {
                return Err(StateError::Io {
                    op: "read",
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| StateError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, state: &CacheState) -> Result<(), StateError> {
        let io = |op: &'static str, source: std::io::Error| StateError::Io {
            op,
            path: self.path.clone(),
            source,
        };
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|e| io("create dir", e))?;
        let json = serde_json::to_vec_pretty(state).map_err(StateError::Encode)?;
        let mut tmp = tempfile::Builder::new()
            .prefix(".state")
            .suffix(".part")
            .tempfile_in(&parent)
            .map_err(|e| io("create temp", e))?;
        tmp.write_all(&json).map_err(|e| io("write", e))?;
        tmp.as_file().sync_all().map_err(|e| io("sync", e))?;
        tmp.persist(&self.path).map_err(|e| io("rename", e.error))?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut CacheState)) -> Result<(), StateError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = self.read()?;
        f(&mut state);
        self.write(&state)
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<CacheState, StateError> {
        self.read()
    }

    fn set_version(&self, version: i64) -> Result<(), StateError> {
        self.update(|s| s.current_version = version)
    }

    fn set_links(&self, links: &[Url]) -> Result<(), StateError> {
        self.update(|s| s.stored_links = links.iter().map(|u| u.to_string()).collect())
    }
}

/// In-memory state, for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<CacheState>,
}

impl MemoryStateStore {
    pub fn new(initial: CacheState) -> Self {
        Self {
            state: Mutex::new(initial),
        }
    }

    pub fn with_version(version: i64) -> Self {
        Self::new(CacheState {
            current_version: version,
            stored_links: Vec::new(),
        })
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<CacheState, StateError> {
        Ok(self.state.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn set_version(&self, version: i64) -> Result<(), StateError> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current_version = version;
        Ok(())
    }

    fn set_links(&self, links: &[Url]) -> Result<(), StateError> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stored_links = links.iter().map(|u| u.to_string()).collect();
        Ok(())
    }
}
