//! Per-session capture cursors.
//!
//! Every session gets one tracker file under
//! `~/.supermemory-claude/trackers` holding the uuid of the last transcript
//! entry that made it into a capture. Reads trim surrounding whitespace;
//! writes replace the whole record. There is no locking: overlapping
//! captures may read the same cursor, and the later write wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = ".supermemory-claude";
const TRACKER_DIR_NAME: &str = "trackers";

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("could not determine home directory")]
    HomeUnavailable,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// On-disk cursor store, one `<session_id>.txt` per session.
#[derive(Debug, Clone)]
pub struct TrackerStore {
    dir: PathBuf,
}

impl TrackerStore {
    /// The store under the user's home directory.
    pub fn open_default() -> Result<Self, TrackerError> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| TrackerError::HomeUnavailable)?;
        Ok(Self::at(
            PathBuf::from(home).join(DATA_DIR_NAME).join(TRACKER_DIR_NAME),
        ))
    }

    /// A store rooted at an explicit directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The uuid recorded by the last successful capture, if any.
    /// An empty or missing record means no capture has happened yet.
    pub fn last_captured(&self, session_id: &str) -> Result<Option<String>, TrackerError> {
        fs::create_dir_all(&self.dir)?;
        match fs::read_to_string(self.tracker_path(session_id)) {
            Ok(raw) => {
                let uuid = raw.trim();
                if uuid.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(uuid.to_string()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the cursor for `session_id`.
    pub fn record_captured(&self, session_id: &str, uuid: &str) -> Result<(), TrackerError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.tracker_path(session_id), uuid)?;
        Ok(())
    }

    /// Drop the cursor for `session_id` so the next capture starts from the
    /// top of the transcript. Returns whether a record existed.
    pub fn clear(&self, session_id: &str) -> Result<bool, TrackerError> {
        match fs::remove_file(self.tracker_path(session_id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn tracker_path(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{session_id}.txt"))
    }
}
