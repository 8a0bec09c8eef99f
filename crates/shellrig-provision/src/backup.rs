//! Timestamped backups for user-owned files
//!
//! Before a step overwrites a file it does not own, the previous content is
//! copied aside. Backups are never deleted by this crate.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Record of a completed backup copy.
#[derive(Debug, Clone)]
pub struct BackupRecord {
    /// Path that was about to be overwritten
    pub original: PathBuf,
    /// Where the previous content was copied to
    pub backup: PathBuf,
    /// When the copy was taken
    pub created_at: DateTime<Utc>,
}

/// Creates timestamped copies of files before they are overwritten.
pub struct BackupManager;

impl BackupManager {
    /// Copy `path` to `path.<timestamp>` if it exists.
    ///
    /// Returns `None` when there is nothing to protect. The copy is fully
    /// written to disk before this function returns, so callers may
    /// overwrite `path` immediately afterwards.
    pub fn protect(path: &Path) -> io::Result<Option<BackupRecord>> {
        if !path.exists() {
            return Ok(None);
        }

        let created_at = Utc::now();
        let stamp = created_at.format("%Y%m%d%H%M%S");
        let backup = PathBuf::from(format!("{}.{stamp}", path.display()));
        fs::copy(path, &backup)?;

        Ok(Some(BackupRecord {
            original: path.to_path_buf(),
            backup,
            created_at,
        }))
    }
}
