//! Host platform detection
//!
//! The platform is probed once at startup and threaded through step
//! construction, so steps never consult process-global state themselves.

use std::env;
use std::fs;

use crate::error::ProvisionError;
use crate::steps::PackageManager;

/// Supported host platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Native Linux distribution
    Linux,
    /// macOS
    MacOs,
    /// Windows Subsystem for Linux (treated as Linux for packaging)
    Wsl,
}

impl Platform {
    /// Detect the current platform.
    ///
    /// This is the only fatal probe in the pipeline: an unrecognized host
    /// aborts before any step runs.
    pub fn detect() -> Result<Self, ProvisionError> {
        if cfg!(target_os = "macos") {
            Ok(Self::MacOs)
        } else if cfg!(target_os = "linux") {
            if is_wsl() {
                Ok(Self::Wsl)
            } else {
                Ok(Self::Linux)
            }
        } else {
            Err(ProvisionError::UnsupportedPlatform {
                os: env::consts::OS.to_string(),
            })
        }
    }

    /// Package-manager front ends to try on this platform, in preference
    /// order. The first is used as the primary action, the rest become
    /// fallbacks.
    pub fn package_managers(self) -> &'static [PackageManager] {
        match self {
            Self::MacOs => &[PackageManager::Brew],
            Self::Linux | Self::Wsl => &[
                PackageManager::Apt,
                PackageManager::Dnf,
                PackageManager::Pacman,
                PackageManager::Zypper,
            ],
        }
    }

    /// Human-readable platform label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::MacOs => "macOS",
            Self::Wsl => "WSL",
        }
    }
}

/// WSL leaves an environment signature on every process; the kernel
/// version string is the fallback signal for older releases.
fn is_wsl() -> bool {
    if env::var_os("WSL_DISTRO_NAME").is_some() || env::var_os("WSL_INTEROP").is_some() {
        return true;
    }
    fs::read_to_string("/proc/version")
        .map(|v| v.to_lowercase().contains("microsoft"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_succeeds_on_supported_hosts() {
        // The test suite only runs on Linux and macOS.
        let platform = Platform::detect().unwrap();
        assert!(!platform.package_managers().is_empty());
    }

    #[test]
    fn linux_prefers_apt() {
        let managers = Platform::Linux.package_managers();
        assert_eq!(managers[0], PackageManager::Apt);
        assert!(managers.contains(&PackageManager::Pacman));
    }

    #[test]
    fn macos_uses_brew_only() {
        assert_eq!(Platform::MacOs.package_managers(), &[PackageManager::Brew]);
    }

    #[test]
    fn wsl_packages_match_linux() {
        assert_eq!(
            Platform::Wsl.package_managers(),
            Platform::Linux.package_managers()
        );
    }
}
