//! Managed file write actions

use std::fs;
use std::path::PathBuf;

use crate::backup::BackupManager;
use crate::probe::sha256_hex;

use super::{Action, ActionError};

/// Overwrite a user-owned file, preserving the previous content as a
/// timestamped backup first.
///
/// The backup copy is fully on disk before the overwrite begins. Callers
/// pair this action with a content-digest precondition so an unchanged
/// re-run skips without touching the file.
pub struct WriteManagedFile {
    path: PathBuf,
    content: String,
    mode: Option<u32>,
}

impl WriteManagedFile {
    /// Create a new managed write action.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            mode: None,
        }
    }

    /// Set the file mode applied after writing (Unix only).
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Hex-encoded SHA-256 of the content this action writes.
    pub fn content_digest(&self) -> String {
        sha256_hex(self.content.as_bytes())
    }
}

impl Action for WriteManagedFile {
    fn describe(&self) -> String {
        format!("write {}", self.path.display())
    }

    fn run(&self) -> Result<(), ActionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        BackupManager::protect(&self.path)?;
        fs::write(&self.path, &self.content)?;

        #[cfg(unix)]
        if let Some(mode) = self.mode {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(mode))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_new_file_without_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf/.zshrc");

        WriteManagedFile::new(&path, "export A=1\n").run().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "export A=1\n");
        // No sibling backup file appeared.
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn backs_up_previous_content_before_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".zshrc");
        fs::write(&path, "old content\n").unwrap();

        WriteManagedFile::new(&path, "new content\n").run().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new content\n");
        let backup = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .find(|p| p != &path)
            .expect("backup file should exist");
        assert_eq!(fs::read_to_string(backup).unwrap(), "old content\n");
    }

    #[cfg(unix)]
    #[test]
    fn applies_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rc");
        WriteManagedFile::new(&path, "x")
            .with_mode(0o600)
            .run()
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn digest_matches_probe() {
        use crate::probe::Capability;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rc");
        let action = WriteManagedFile::new(&path, "alpha\n");
        action.run().unwrap();

        assert!(Capability::file_with_content(&path, "alpha\n").exists());
        assert_eq!(action.content_digest(), sha256_hex(b"alpha\n"));
    }
}
