//! Shellrig Provision - Terminal Environment Step Library
//!
//! This crate provides types and an execution engine for idempotent
//! terminal-environment provisioning: install a shell and its ecosystem
//! tools, write a managed configuration file (backing the old one up
//! first), and report exactly what happened.
//!
//! # Architecture
//!
//! - [`Capability`]: host properties steps depend on, probed without mutation
//! - [`Step`]: a precondition, a primary [`Action`], and ordered fallbacks
//! - [`steps`] module: concrete actions (packages, clones, downloads, files)
//! - [`Orchestrator`]: sequential execution with failure isolation
//! - [`BackupManager`]: timestamped copies before destructive overwrites
//! - [`Manifest`]: the complete terminal-environment step sequence
//! - [`render`] module: plan output for dry runs
//!
//! # Example
//!
//! ```ignore
//! use shellrig_provision::{Manifest, Orchestrator, Platform, RigConfig};
//!
//! let platform = Platform::detect()?;
//! let config = RigConfig::for_current_user()?
//!     .zshrc_content(rendered_zshrc)
//!     .build();
//!
//! let manifest = Manifest::terminal(&config, platform);
//! let report = Orchestrator::new().run(&manifest.steps, &mut listener);
//! ```

pub mod backup;
pub mod config;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod platform;
pub mod probe;
pub mod render;
pub mod report;
pub mod steps;

pub use backup::{BackupManager, BackupRecord};
pub use config::RigConfig;
pub use engine::{NullListener, Orchestrator, ProgressListener, StepEvent};
pub use error::ProvisionError;
pub use manifest::Manifest;
pub use platform::Platform;
pub use probe::Capability;
pub use render::{Renderer, TextPlanRenderer, YamlPlanRenderer};
pub use report::{ReportPrinter, RunReport};
pub use steps::{Action, ActionError, Step, StepOutcome, StepResult};
