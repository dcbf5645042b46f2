//! Single-run guard.
//!
//! A scheduled run and a manual run can overlap. The guard is a lock file
//! created with create-new semantics next to the deck; whoever creates it
//! owns the run until the guard is dropped.
//!
//! ```text
//! announcements.json.lock   # { "pid": 4242, "acquired_at": "2024-01-15T07:00:00Z" }
//! ```
//!
//! A lock older than the configured staleness window belongs to a run that
//! died without cleaning up, and is reclaimed.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AnnounceError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LockBody {
    pid: u32,
    acquired_at: DateTime<Utc>,
}

/// Holds the lock file until dropped.
#[derive(Debug)]
pub struct RunGuard {
    path: PathBuf,
}

impl RunGuard {
    /// Lock path used for a deck file.
    pub fn lock_path_for(deck_path: &Path) -> PathBuf {
        let mut name = deck_path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    pub fn acquire(path: &Path, stale_after: Duration) -> Result<Self> {
        match Self::try_create(path) {
            Ok(guard) => Ok(guard),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                if !Self::is_stale(path, stale_after) {
                    return Err(AnnounceError::RunInProgress(path.to_path_buf()));
                }
                warn!(path = %path.display(), "Reclaiming stale run lock");
                fs_err::remove_file(path).map_err(|source| AnnounceError::Io {
                    context: "removing stale run lock".to_string(),
                    source,
                })?;
                Self::try_create(path).map_err(|err| match err.kind() {
                    ErrorKind::AlreadyExists => AnnounceError::RunInProgress(path.to_path_buf()),
                    _ => AnnounceError::Io {
                        context: format!("creating run lock {}", path.display()),
                        source: err,
                    },
                })
            }
            Err(source) => Err(AnnounceError::Io {
                context: format!("creating run lock {}", path.display()),
                source,
            }),
        }
    }

    fn try_create(path: &Path) -> std::io::Result<Self> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let body = LockBody {
            pid: std::process::id(),
            acquired_at: Utc::now(),
        };
        let content = serde_json::to_string(&body).map_err(std::io::Error::other)?;
        file.write_all(content.as_bytes())?;
        debug!(path = %path.display(), "Acquired run lock");
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Unreadable or unparsable lock bodies count as stale.
    fn is_stale(path: &Path, stale_after: Duration) -> bool {
        let body = fs_err::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str::<LockBody>(&content).ok());
        match body {
            Some(body) => {
                let age = Utc::now().signed_duration_since(body.acquired_at);
                age.to_std().map(|age| age > stale_after).unwrap_or(false)
            }
            None => true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if let Err(err) = fs_err::remove_file(&self.path) {
            warn!(error = %err, "Failed to release run lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const STALE: Duration = Duration::from_secs(900);

    #[test]
    fn test_second_acquire_is_rejected_until_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck.json.lock");

        let guard = RunGuard::acquire(&path, STALE).unwrap();
        assert!(path.exists());
        assert!(matches!(
            RunGuard::acquire(&path, STALE),
            Err(AnnounceError::RunInProgress(_))
        ));

        drop(guard);
        assert!(!path.exists());
        assert!(RunGuard::acquire(&path, STALE).is_ok());
    }

    #[test]
    fn test_stale_lock_is_reclaimed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck.json.lock");
        let old = LockBody {
            pid: 1,
            acquired_at: Utc::now() - chrono::Duration::hours(2),
        };
        fs_err::write(&path, serde_json::to_string(&old).unwrap()).unwrap();

        let guard = RunGuard::acquire(&path, STALE).unwrap();
        assert_eq!(guard.path(), path.as_path());
    }

    #[test]
    fn test_garbage_lock_is_reclaimed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck.json.lock");
        fs_err::write(&path, "not json").unwrap();
        assert!(RunGuard::acquire(&path, STALE).is_ok());
    }

    #[test]
    fn test_lock_path_for_deck() {
        assert_eq!(
            RunGuard::lock_path_for(Path::new("/tmp/announcements.json")),
            PathBuf::from("/tmp/announcements.json.lock")
        );
    }
}
