//! Sequential step orchestration
//!
//! Runs a step list strictly in declaration order: later steps assume the
//! side effects of earlier ones (a plugin step needs the framework
//! directory), which is why nothing here is parallel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::report::RunReport;
use crate::steps::{Step, StepOutcome, StepResult};

const ABORT_DETAIL: &str = "run aborted by prior failure";
const CANCEL_DETAIL: &str = "run cancelled";

/// Progress notification emitted while a run is in flight.
#[derive(Debug, Clone, Copy)]
pub enum StepEvent<'a> {
    /// A step is about to execute
    Started {
        /// 1-based position in the step list
        index: usize,
        /// Total number of steps
        total: usize,
        /// Step name
        name: &'a str,
    },
    /// A step produced its result (including halt/cancel skips)
    Finished {
        /// 1-based position in the step list
        index: usize,
        /// Total number of steps
        total: usize,
        /// The recorded result
        result: &'a StepResult,
    },
}

/// Receives [`StepEvent`]s during a run.
pub trait ProgressListener {
    /// Called for every event, in order.
    fn on_event(&mut self, event: StepEvent<'_>);
}

/// Listener that discards all events.
pub struct NullListener;

impl ProgressListener for NullListener {
    fn on_event(&mut self, _event: StepEvent<'_>) {}
}

/// Runs an ordered step list with failure isolation and cooperative
/// cancellation.
pub struct Orchestrator {
    cancel: Arc<AtomicBool>,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new() -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag checked between steps; set it to stop the run at the next
    /// step boundary. A step already mid-action is not interrupted.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Execute every step in order and return the run report.
    ///
    /// A required step that exhausts all of its actions halts the run;
    /// every remaining step is recorded as skipped. Re-invoking `run`
    /// with the same list is safe: satisfied preconditions short-circuit.
    pub fn run(&self, steps: &[Step], listener: &mut dyn ProgressListener) -> RunReport {
        let mut report = RunReport::new();
        let total = steps.len();
        let mut halt_reason: Option<&str> = None;

        for (i, step) in steps.iter().enumerate() {
            let index = i + 1;

            if halt_reason.is_none() && self.cancel.load(Ordering::SeqCst) {
                halt_reason = Some(CANCEL_DETAIL);
            }

            if let Some(reason) = halt_reason {
                let result = StepResult::skipped(step.name(), reason);
                listener.on_event(StepEvent::Finished {
                    index,
                    total,
                    result: &result,
                });
                report.push(result);
                continue;
            }

            listener.on_event(StepEvent::Started {
                index,
                total,
                name: step.name(),
            });

            let result = step.execute();
            if step.is_required() && result.outcome == StepOutcome::Failed {
                halt_reason = Some(ABORT_DETAIL);
            }

            listener.on_event(StepEvent::Finished {
                index,
                total,
                result: &result,
            });
            report.push(result);
        }

        report
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}
