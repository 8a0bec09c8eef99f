//! Git repository fetch actions

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use super::command::run_with_timeout;
use super::{Action, ActionError};

/// Clone a git repository to a local directory.
pub struct GitClone {
    url: String,
    dest: PathBuf,
    depth: Option<u32>,
    timeout: Duration,
}

impl GitClone {
    /// Create a shallow (depth 1) clone action.
    pub fn new(url: impl Into<String>, dest: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
            depth: Some(1),
            timeout,
        }
    }

    /// Override the clone depth (`None` for full history).
    pub fn with_depth(mut self, depth: Option<u32>) -> Self {
        self.depth = depth;
        self
    }
}

impl Action for GitClone {
    fn describe(&self) -> String {
        format!("git clone {}", self.url)
    }

    fn run(&self) -> Result<(), ActionError> {
        if which::which("git").is_err() {
            return Err(ActionError::ToolMissing("git".to_string()));
        }

        let mut cmd = Command::new("git");
        cmd.arg("clone");
        if let Some(depth) = self.depth {
            cmd.arg("--depth").arg(depth.to_string());
        }
        cmd.arg(&self.url).arg(&self.dest);

        run_with_timeout(&mut cmd, self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_names_repository() {
        let action = GitClone::new(
            "https://github.com/zsh-users/zsh-autosuggestions",
            "/tmp/x",
            Duration::from_secs(1),
        );
        assert_eq!(
            action.describe(),
            "git clone https://github.com/zsh-users/zsh-autosuggestions"
        );
    }

    #[cfg(unix)]
    #[test]
    fn clone_from_local_repository() {
        if which::which("git").is_err() {
            return;
        }
        let timeout = Duration::from_secs(30);
        let source = tempfile::tempdir().unwrap();
        let setup = ShellCommandFixture::init_repo(source.path());
        if !setup {
            return;
        }

        let dest = tempfile::tempdir().unwrap();
        let target = dest.path().join("clone");
        let action = GitClone::new(source.path().display().to_string(), &target, timeout);

        action.run().unwrap();
        assert!(target.join("seed.txt").exists());
    }

    /// Creates a one-commit repository for the clone test.
    struct ShellCommandFixture;

    impl ShellCommandFixture {
        fn init_repo(dir: &std::path::Path) -> bool {
            let script = format!(
                "cd '{0}' && git init -q && git config user.email t@t && git config user.name t \
                 && echo seed > seed.txt && git add . && git commit -qm seed",
                dir.display()
            );
            std::process::Command::new("sh")
                .args(["-c", &script])
                .status()
                .map(|s| s.success())
                .unwrap_or(false)
        }
    }
}
