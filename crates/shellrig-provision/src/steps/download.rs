//! Idempotent file download actions

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use tempfile::NamedTempFile;

use super::command::run_with_timeout;
use super::{Action, ActionError};

/// Download tool to drive. Declared per action so a step can list a curl
/// primary with a wget fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTool {
    /// `curl -fsSL`
    Curl,
    /// `wget -q`
    Wget,
}

impl FetchTool {
    /// Executable name to look up on `PATH`.
    pub fn executable(self) -> &'static str {
        match self {
            Self::Curl => "curl",
            Self::Wget => "wget",
        }
    }
}

/// Fetch a URL to a destination path.
///
/// The download lands in a temporary file next to the destination and is
/// only moved into place when it completed and is non-empty, so a failed
/// transfer never clobbers a previous good copy.
pub struct FetchFile {
    url: String,
    dest: PathBuf,
    tool: FetchTool,
    timeout: Duration,
}

impl FetchFile {
    /// Create a new download action.
    pub fn new(
        url: impl Into<String>,
        dest: impl Into<PathBuf>,
        tool: FetchTool,
        timeout: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
            tool,
            timeout,
        }
    }
}

impl Action for FetchFile {
    fn describe(&self) -> String {
        format!(
            "download {} with {}",
            self.url,
            self.tool.executable()
        )
    }

    fn run(&self) -> Result<(), ActionError> {
        let exe = self.tool.executable();
        if which::which(exe).is_err() {
            return Err(ActionError::ToolMissing(exe.to_string()));
        }

        let parent = self.dest.parent().map_or_else(|| PathBuf::from("."), PathBuf::from);
        fs::create_dir_all(&parent)?;
        let staging = NamedTempFile::new_in(&parent)?;

        let mut cmd = Command::new(exe);
        match self.tool {
            FetchTool::Curl => {
                cmd.args(["-fsSL", "-o"]).arg(staging.path()).arg(&self.url);
            }
            FetchTool::Wget => {
                cmd.args(["-q", "-O"]).arg(staging.path()).arg(&self.url);
            }
        }
        run_with_timeout(&mut cmd, self.timeout)?;

        if staging.as_file().metadata()?.len() == 0 {
            return Err(ActionError::EmptyDownload(self.dest.clone()));
        }

        staging
            .persist(&self.dest)
            .map_err(|err| ActionError::Io(err.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_names_url_and_tool() {
        let action = FetchFile::new(
            "https://example.com/f.ttf",
            "/tmp/f.ttf",
            FetchTool::Curl,
            Duration::from_secs(1),
        );
        assert_eq!(
            action.describe(),
            "download https://example.com/f.ttf with curl"
        );
    }

    #[cfg(unix)]
    #[test]
    fn fetch_from_file_url() {
        if which::which("curl").is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.txt");
        fs::write(&source, "payload").unwrap();

        let dest = dir.path().join("fetched/asset.txt");
        let action = FetchFile::new(
            format!("file://{}", source.display()),
            &dest,
            FetchTool::Curl,
            Duration::from_secs(10),
        );

        action.run().unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "payload");
    }

    #[cfg(unix)]
    #[test]
    fn empty_download_is_rejected() {
        if which::which("curl").is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("empty.txt");
        fs::write(&source, "").unwrap();

        let dest = dir.path().join("asset.txt");
        let action = FetchFile::new(
            format!("file://{}", source.display()),
            &dest,
            FetchTool::Curl,
            Duration::from_secs(10),
        );

        let err = action.run().unwrap_err();
        assert!(matches!(err, ActionError::EmptyDownload(_)));
        assert!(!dest.exists());
    }
}
