//! Capability probing
//!
//! A [`Capability`] names a host property a step depends on or produces.
//! Probing is query-only: absence is a normal `false`, never an error.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// A host-environment property that may or may not be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// A program resolvable on the current `PATH`
    Executable(String),
    /// An existing directory
    Directory(PathBuf),
    /// A regular file with length > 0
    NonEmptyFile(PathBuf),
    /// A regular file whose content matches a SHA-256 digest
    FileDigest {
        /// File path
        path: PathBuf,
        /// Expected hex-encoded SHA-256 of the content
        sha256: String,
    },
}

impl Capability {
    /// Capability for an executable on `PATH`.
    pub fn executable(name: impl Into<String>) -> Self {
        Self::Executable(name.into())
    }

    /// Capability for an existing directory.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::Directory(path.into())
    }

    /// Capability for a non-empty regular file.
    pub fn non_empty_file(path: impl Into<PathBuf>) -> Self {
        Self::NonEmptyFile(path.into())
    }

    /// Capability for a file holding exactly `content`.
    pub fn file_with_content(path: impl Into<PathBuf>, content: &str) -> Self {
        Self::FileDigest {
            path: path.into(),
            sha256: sha256_hex(content.as_bytes()),
        }
    }

    /// Probe the host for this capability. Never mutates host state.
    pub fn exists(&self) -> bool {
        match self {
            Self::Executable(name) => which::which(name).is_ok(),
            Self::Directory(path) => path.is_dir(),
            Self::NonEmptyFile(path) => fs::metadata(path)
                .map(|m| m.is_file() && m.len() > 0)
                .unwrap_or(false),
            Self::FileDigest { path, sha256 } => file_digest_matches(path, sha256),
        }
    }

    /// One-line description for plan output.
    pub fn describe(&self) -> String {
        match self {
            Self::Executable(name) => format!("{name} on PATH"),
            Self::Directory(path) => format!("directory {}", path.display()),
            Self::NonEmptyFile(path) => format!("non-empty file {}", path.display()),
            Self::FileDigest { path, .. } => format!("{} up to date", path.display()),
        }
    }
}

fn file_digest_matches(path: &Path, expected: &str) -> bool {
    let Ok(meta) = fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    fs::read(path)
        .map(|bytes| sha256_hex(&bytes) == expected)
        .unwrap_or(false)
}

/// Hex-encoded SHA-256 of a byte slice.
pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_executable_is_false() {
        assert!(!Capability::executable("definitely-not-a-real-tool-4af1").exists());
    }

    #[cfg(unix)]
    #[test]
    fn sh_is_always_present() {
        assert!(Capability::executable("sh").exists());
    }

    #[test]
    fn directory_probe() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Capability::directory(dir.path()).exists());
        assert!(!Capability::directory(dir.path().join("missing")).exists());
    }

    #[test]
    fn empty_file_is_not_non_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, "").unwrap();
        assert!(!Capability::non_empty_file(&path).exists());

        fs::write(&path, "x").unwrap();
        assert!(Capability::non_empty_file(&path).exists());
    }

    #[test]
    fn directory_is_not_a_non_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!Capability::non_empty_file(dir.path()).exists());
    }

    #[test]
    fn file_digest_matches_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("managed.conf");
        fs::write(&path, "alpha\n").unwrap();

        assert!(Capability::file_with_content(&path, "alpha\n").exists());
        assert!(!Capability::file_with_content(&path, "beta\n").exists());
    }

    #[test]
    fn file_digest_on_missing_file_is_false() {
        assert!(!Capability::file_with_content("/nonexistent/managed.conf", "alpha").exists());
    }
}
