//! Top-level provisioning errors

use thiserror::Error;

/// Fatal conditions raised before any step executes.
///
/// Per-action failures never surface here; they are absorbed by the step
/// fallback chain and end up in the run report instead.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The host did not match any supported platform signature.
    #[error("unsupported platform: {os}")]
    UnsupportedPlatform {
        /// Value of `std::env::consts::OS` on the host
        os: String,
    },

    /// The user home directory could not be resolved.
    #[error("could not determine the user home directory")]
    MissingHomeDir,
}
