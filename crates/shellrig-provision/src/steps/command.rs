//! Generic external command actions

use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::{Action, ActionError};

/// Run an external command with a time budget.
pub struct ShellCommand {
    description: String,
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ShellCommand {
    /// Create a new command action.
    pub fn new(
        description: impl Into<String>,
        program: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            description: description.into(),
            program: program.into(),
            args: vec![],
            timeout,
        }
    }

    /// Run a shell snippet via `sh -c`.
    pub fn sh(description: impl Into<String>, script: impl Into<String>, timeout: Duration) -> Self {
        Self::new(description, "sh", timeout).with_args(["-c".to_string(), script.into()])
    }

    /// Set the command arguments.
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl Action for ShellCommand {
    fn describe(&self) -> String {
        self.description.clone()
    }

    fn run(&self) -> Result<(), ActionError> {
        if which::which(&self.program).is_err() {
            return Err(ActionError::ToolMissing(self.program.clone()));
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        run_with_timeout(&mut cmd, self.timeout)
    }
}

/// Spawn `cmd` detached from our stdio and poll it until it exits or the
/// budget runs out. Timeout kills the child and counts as action failure.
pub(crate) fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<(), ActionError> {
    let program = cmd.get_program().to_string_lossy().into_owned();

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ActionError::ToolMissing(program.clone())
            } else {
                ActionError::Io(err)
            }
        })?;

    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                return if status.success() {
                    Ok(())
                } else {
                    Err(ActionError::CommandFailed { program, status })
                };
            }
            Ok(None) => {
                if started.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ActionError::Timeout {
                        program,
                        secs: timeout.as_secs(),
                    });
                }
                thread::sleep(Duration::from_millis(100));
            }
            Err(err) => return Err(ActionError::Io(err)),
        }
    }
}

#[cfg(unix)]
#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn successful_command() {
        let action = ShellCommand::sh("no-op", "true", TIMEOUT);
        assert!(action.run().is_ok());
    }

    #[test]
    fn failing_command_reports_status() {
        let action = ShellCommand::sh("always fails", "exit 3", TIMEOUT);
        let err = action.run().unwrap_err();
        assert!(matches!(err, ActionError::CommandFailed { .. }));
    }

    #[test]
    fn missing_program_is_tool_missing() {
        let action = ShellCommand::new("ghost", "no-such-program-91c2", TIMEOUT);
        let err = action.run().unwrap_err();
        assert!(matches!(err, ActionError::ToolMissing(_)));
    }

    #[test]
    fn slow_command_times_out() {
        let action = ShellCommand::sh("sleeper", "sleep 5", Duration::from_millis(300));
        let err = action.run().unwrap_err();
        assert!(matches!(err, ActionError::Timeout { .. }));
    }
}
