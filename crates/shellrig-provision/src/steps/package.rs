//! Package installation actions

use std::process::Command;
use std::time::Duration;

use super::command::run_with_timeout;
use super::{Action, ActionError};

/// A package-manager front end this crate knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Debian/Ubuntu `apt-get`
    Apt,
    /// Fedora `dnf`
    Dnf,
    /// Arch `pacman`
    Pacman,
    /// openSUSE `zypper`
    Zypper,
    /// Homebrew
    Brew,
}

impl PackageManager {
    /// Executable name to look up on `PATH`.
    pub fn executable(self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
            Self::Zypper => "zypper",
            Self::Brew => "brew",
        }
    }

    /// Non-interactive install arguments, package name appended last.
    fn install_args(self) -> &'static [&'static str] {
        match self {
            Self::Apt => &["install", "-y"],
            Self::Dnf => &["install", "-y"],
            Self::Pacman => &["-S", "--noconfirm", "--needed"],
            Self::Zypper => &["--non-interactive", "install"],
            Self::Brew => &["install"],
        }
    }

    /// System package managers need root; Homebrew must not run as root.
    fn needs_root(self) -> bool {
        !matches!(self, Self::Brew)
    }
}

/// Install one package through one package-manager front end.
///
/// A missing front end fails fast with `ToolMissing`, feeding the step's
/// cross-distribution fallback chain: the same package is declared once
/// per candidate manager and tried in order.
pub struct PackageInstall {
    manager: PackageManager,
    package: String,
    timeout: Duration,
}

impl PackageInstall {
    /// Create a new package install action.
    pub fn new(manager: PackageManager, package: impl Into<String>, timeout: Duration) -> Self {
        Self {
            manager,
            package: package.into(),
            timeout,
        }
    }
}

impl Action for PackageInstall {
    fn describe(&self) -> String {
        format!("install {} with {}", self.package, self.manager.executable())
    }

    fn run(&self) -> Result<(), ActionError> {
        let exe = self.manager.executable();
        if which::which(exe).is_err() {
            return Err(ActionError::ToolMissing(exe.to_string()));
        }

        let mut cmd = if self.manager.needs_root() {
            let mut c = Command::new("sudo");
            c.arg("-n").arg(exe);
            c
        } else {
            Command::new(exe)
        };
        cmd.args(self.manager.install_args()).arg(&self.package);

        run_with_timeout(&mut cmd, self.timeout)
    }
}

/// Refresh one package-manager front end's package index.
pub struct RefreshIndex {
    manager: PackageManager,
    timeout: Duration,
}

impl RefreshIndex {
    /// Create a new index refresh action.
    pub fn new(manager: PackageManager, timeout: Duration) -> Self {
        Self { manager, timeout }
    }
}

impl Action for RefreshIndex {
    fn describe(&self) -> String {
        format!("refresh {} package index", self.manager.executable())
    }

    fn run(&self) -> Result<(), ActionError> {
        let exe = self.manager.executable();
        if which::which(exe).is_err() {
            return Err(ActionError::ToolMissing(exe.to_string()));
        }

        let refresh_args: &[&str] = match self.manager {
            PackageManager::Apt => &["update"],
            PackageManager::Dnf => &["makecache"],
            PackageManager::Pacman => &["-Sy"],
            PackageManager::Zypper => &["--non-interactive", "refresh"],
            PackageManager::Brew => &["update"],
        };

        let mut cmd = if self.manager.needs_root() {
            let mut c = Command::new("sudo");
            c.arg("-n").arg(exe);
            c
        } else {
            Command::new(exe)
        };
        cmd.args(refresh_args);

        run_with_timeout(&mut cmd, self.timeout)
    }
}
