//! Run reports and their text rendering

use std::fmt::Write as _;

use crate::steps::{StepOutcome, StepResult};

/// Ordered record of one orchestrator run, one result per step.
///
/// Built incrementally during the run and read once at the end; never
/// persisted beyond the process.
#[derive(Debug, Default)]
pub struct RunReport {
    results: Vec<StepResult>,
}

impl RunReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, result: StepResult) {
        self.results.push(result);
    }

    /// All results in execution order.
    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    /// True when no step failed. Degraded optional steps do not count as
    /// failure.
    pub fn is_success(&self) -> bool {
        !self
            .results
            .iter()
            .any(|r| r.outcome == StepOutcome::Failed)
    }

    /// Steps that failed, in execution order.
    pub fn failed(&self) -> impl Iterator<Item = &StepResult> {
        self.results
            .iter()
            .filter(|r| r.outcome == StepOutcome::Failed)
    }

    /// Optional steps that exhausted their actions, in execution order.
    pub fn degraded(&self) -> impl Iterator<Item = &StepResult> {
        self.results
            .iter()
            .filter(|r| r.outcome == StepOutcome::Degraded)
    }
}

/// Renders a [`RunReport`] as plain text. Printing is the caller's job.
pub struct ReportPrinter;

impl ReportPrinter {
    /// One line per step plus a closing summary of everything that did
    /// not succeed outright.
    pub fn render(report: &RunReport) -> String {
        let mut out = String::new();

        for result in report.results() {
            let _ = write!(out, "{:>8}  {}", result.outcome.to_string(), result.step_name);
            if let Some(detail) = &result.detail {
                let _ = write!(out, " ({detail})");
            }
            out.push('\n');
        }

        let needs_attention: Vec<&StepResult> =
            report.failed().chain(report.degraded()).collect();

        if needs_attention.is_empty() {
            out.push_str("\nall steps completed or were already satisfied\n");
        } else {
            out.push_str("\nneeds attention:\n");
            for result in needs_attention {
                let _ = writeln!(
                    out,
                    "  {} [{}] {}",
                    result.step_name,
                    result.outcome,
                    result.detail.as_deref().unwrap_or("no detail")
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::testing::FakeAction;
    use crate::steps::Step;
    use std::sync::{Arc, Mutex};

    fn report_from(specs: &[(&str, bool, bool)]) -> RunReport {
        let log = Arc::new(Mutex::new(Vec::new()));
        let steps: Vec<Step> = specs
            .iter()
            .map(|(name, ok, required)| {
                let step = Step::new(*name, FakeAction::new(name, *ok, &log));
                if *required { step.required() } else { step }
            })
            .collect();
        crate::engine::Orchestrator::new().run(&steps, &mut crate::engine::NullListener)
    }

    #[test]
    fn render_lists_every_step() {
        let report = report_from(&[("Install zsh", true, true), ("Install fzf", false, false)]);
        let text = ReportPrinter::render(&report);

        assert!(text.contains("Install zsh"));
        assert!(text.contains("Install fzf"));
        assert!(text.contains("needs attention:"));
        assert!(text.contains("degraded"));
    }

    #[test]
    fn clean_run_reports_no_attention_needed() {
        let report = report_from(&[("A", true, false), ("B", true, false)]);
        let text = ReportPrinter::render(&report);
        assert!(text.contains("all steps completed"));
        assert!(!text.contains("needs attention"));
    }

    #[test]
    fn success_ignores_degraded() {
        let report = report_from(&[("A", false, false)]);
        assert!(report.is_success());
        assert_eq!(report.degraded().count(), 1);
        assert_eq!(report.failed().count(), 0);
    }

    #[test]
    fn failure_is_not_success() {
        let report = report_from(&[("A", false, true)]);
        assert!(!report.is_success());
        assert_eq!(report.failed().count(), 1);
    }
}
