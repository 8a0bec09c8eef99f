//! Provisioning step definitions
//!
//! A [`Step`] pairs an idempotency precondition with a primary [`Action`]
//! and an ordered list of fallback actions. All steps must be:
//! - **Idempotent**: a satisfied precondition short-circuits to `Skipped`
//! - **Isolated**: action errors never escape the step; they become the
//!   next fallback attempt or the step's terminal outcome

mod clone;
mod command;
mod download;
mod file;
mod package;

pub use clone::GitClone;
pub use command::ShellCommand;
pub use download::{FetchFile, FetchTool};
pub use file::WriteManagedFile;
pub use package::{PackageInstall, PackageManager, RefreshIndex};

use std::path::PathBuf;
use std::process::ExitStatus;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::probe::Capability;

/// Failure of a single action's external call.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The executable behind the action is not installed
    #[error("required tool `{0}` is not installed")]
    ToolMissing(String),

    /// The external command exited non-zero
    #[error("`{program}` exited with {status}")]
    CommandFailed {
        /// Program that was invoked
        program: String,
        /// Its exit status
        status: ExitStatus,
    },

    /// The external command exceeded its time budget and was killed
    #[error("`{program}` timed out after {secs}s")]
    Timeout {
        /// Program that was invoked
        program: String,
        /// Configured budget in seconds
        secs: u64,
    },

    /// A download completed but produced an empty file
    #[error("downloaded file {0} is empty")]
    EmptyDownload(PathBuf),

    /// A nested step exhausted all of its actions
    #[error("step `{name}` did not complete: {detail}")]
    StepFailed {
        /// Nested step name
        name: String,
        /// Last recorded failure
        detail: String,
    },

    /// Filesystem error while performing the action
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A unit of work, opaque to the orchestrator.
pub trait Action: Send + Sync {
    /// One-line description of what running this action does
    fn describe(&self) -> String;

    /// Perform the work. Blocking; errors feed the step's fallback chain.
    fn run(&self) -> Result<(), ActionError>;
}

/// Outcome of executing one step. Exactly one per step per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Precondition already satisfied; no action was run
    Skipped,
    /// The primary action or one of the fallbacks completed
    Succeeded,
    /// All actions failed on a required step
    Failed,
    /// All actions failed on an optional step; the run continues
    Degraded,
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Skipped => "skipped",
            Self::Succeeded => "ok",
            Self::Failed => "FAILED",
            Self::Degraded => "degraded",
        };
        f.write_str(label)
    }
}

/// Immutable record of one step execution.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Name of the step this result belongs to
    pub step_name: String,
    /// Terminal outcome
    pub outcome: StepOutcome,
    /// Free-text reason (which fallback ran, why the step failed, ...)
    pub detail: Option<String>,
    /// When the result was recorded
    pub timestamp: DateTime<Utc>,
}

impl StepResult {
    fn new(step_name: &str, outcome: StepOutcome, detail: Option<String>) -> Self {
        Self {
            step_name: step_name.to_string(),
            outcome,
            detail,
            timestamp: Utc::now(),
        }
    }

    /// Result for a step that never ran (halt or cancellation).
    pub(crate) fn skipped(step_name: &str, reason: impl Into<String>) -> Self {
        Self::new(step_name, StepOutcome::Skipped, Some(reason.into()))
    }
}

/// A named provisioning step: precondition, primary action, fallbacks.
///
/// Steps are built before a run starts and never mutated during one.
pub struct Step {
    name: String,
    precondition: Option<Capability>,
    primary: Box<dyn Action>,
    fallbacks: Vec<Box<dyn Action>>,
    required: bool,
}

impl Step {
    /// Create an optional step with a primary action.
    pub fn new(name: impl Into<String>, primary: impl Action + 'static) -> Self {
        Self {
            name: name.into(),
            precondition: None,
            primary: Box::new(primary),
            fallbacks: vec![],
            required: false,
        }
    }

    /// Skip this step entirely when `capability` is already present.
    pub fn unless(mut self, capability: Capability) -> Self {
        self.precondition = Some(capability);
        self
    }

    /// Append a fallback action, tried after everything before it failed.
    pub fn or_else(mut self, fallback: impl Action + 'static) -> Self {
        self.fallbacks.push(Box::new(fallback));
        self
    }

    /// Mark this step as required: if every action fails, the whole run
    /// halts.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Step name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether failure of this step aborts the run.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The idempotency precondition, if any.
    pub fn precondition(&self) -> Option<&Capability> {
        self.precondition.as_ref()
    }

    /// Descriptions of the primary action and each fallback, in try order.
    pub fn action_descriptions(&self) -> Vec<String> {
        let mut out = vec![self.primary.describe()];
        out.extend(self.fallbacks.iter().map(|a| a.describe()));
        out
    }

    /// Execute the step: precondition check, then primary, then fallbacks
    /// in declared order. Each action runs at most once.
    pub fn execute(&self) -> StepResult {
        if let Some(capability) = &self.precondition {
            if capability.exists() {
                return StepResult::new(
                    &self.name,
                    StepOutcome::Skipped,
                    Some("already satisfied".into()),
                );
            }
        }

        let mut last_error = match self.primary.run() {
            Ok(()) => return StepResult::new(&self.name, StepOutcome::Succeeded, None),
            Err(err) => err,
        };

        for fallback in &self.fallbacks {
            match fallback.run() {
                Ok(()) => {
                    return StepResult::new(
                        &self.name,
                        StepOutcome::Succeeded,
                        Some(format!("via fallback: {}", fallback.describe())),
                    );
                }
                Err(err) => last_error = err,
            }
        }

        let outcome = if self.required {
            StepOutcome::Failed
        } else {
            StepOutcome::Degraded
        };
        StepResult::new(&self.name, outcome, Some(last_error.to_string()))
    }
}

/// Steps compose: an action with sub-fallbacks of its own is modeled as a
/// nested step rather than special-cased.
impl Action for Step {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn run(&self) -> Result<(), ActionError> {
        let result = self.execute();
        match result.outcome {
            StepOutcome::Succeeded | StepOutcome::Skipped => Ok(()),
            StepOutcome::Failed | StepOutcome::Degraded => Err(ActionError::StepFailed {
                name: self.name.clone(),
                detail: result.detail.unwrap_or_default(),
            }),
        }
    }
}
