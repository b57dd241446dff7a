//! Session store persisted as JSON files, one per stored search
//!
//! Each `context:session` key owns its own file in the session directory, so
//! sessions never rewrite each other's data:
//!
//! ```json
//! { "version": 1, "saved_at": "2024-05-01T10:00:00Z", "state": { ... } }
//! ```
//!
//! Files are replaced whole: the new content goes to a temporary file in the
//! same directory which is then renamed over the old one. An interrupted save
//! leaves the previous file in place.
//!
//! A corrupt file or a file from another format version is treated as absent
//! and replaced on the next save.

use super::{SessionError, SessionStore};
use crate::search::{SearchKey, SearchState};
use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const FILE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SessionEntry {
    version: u32,
    saved_at: DateTime<Utc>,
    state: SearchState,
}

/// Search states stored as JSON files, expiring after a time-to-live
pub struct FileSessions {
    dir: PathBuf,
    ttl: Duration,
}

impl FileSessions {
    /// Create a store in `dir`; entries older than `ttl` are ignored and removed
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, ttl: std::time::Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the state stored under `key`
    #[must_use]
    pub fn path_for(&self, key: &SearchKey) -> PathBuf {
        self.dir.join(file_name(key))
    }

    fn read(&self, path: &Path) -> Result<Option<SessionEntry>, SessionError> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<SessionEntry>(&data) {
            Ok(entry) if entry.version == FILE_VERSION => Ok(Some(entry)),
            Ok(entry) => {
                warn!(
                    "ignoring session file {} with version {}",
                    path.display(),
                    entry.version
                );
                Ok(None)
            }
            Err(e) => {
                warn!("ignoring corrupt session file {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    fn write(&self, path: &Path, entry: &SessionEntry) -> Result<(), SessionError> {
        fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_vec_pretty(entry)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(path: &Path) -> Result<(), SessionError> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn is_expired(&self, entry: &SessionEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.saved_at) > self.ttl
    }
}

impl SessionStore for FileSessions {
    fn save_state(&self, key: &SearchKey, state: &SearchState) -> Result<(), SessionError> {
        let entry = SessionEntry {
            version: FILE_VERSION,
            saved_at: Utc::now(),
            state: state.clone(),
        };
        self.write(&self.path_for(key), &entry)
    }

    fn load_state(&self, key: &SearchKey) -> Result<Option<SearchState>, SessionError> {
        let path = self.path_for(key);
        let Some(entry) = self.read(&path)? else {
            return Ok(None);
        };
        if self.is_expired(&entry, Utc::now()) {
            debug!("session {key} expired");
            Self::remove(&path)?;
            return Ok(None);
        }
        Ok(Some(entry.state))
    }

    fn clear_state(&self, key: &SearchKey) -> Result<(), SessionError> {
        Self::remove(&self.path_for(key))
    }
}

/// `<context>-<session>.json`, with bytes outside `[A-Za-z0-9_-]` in the
/// session name written as `%XX`
fn file_name(key: &SearchKey) -> String {
    let mut name = format!("{}-", key.context);
    for byte in key.session.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            name.push(char::from(byte));
        } else {
            let _ = write!(name, "%{byte:02X}");
        }
    }
    name.push_str(".json");
    name
}
