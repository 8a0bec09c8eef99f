//! Terminal progress display for a provisioning run
//!
//! Translates engine events into a spinner for the in-flight step and a
//! printed status line for each completed one.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use shellrig_provision::{ProgressListener, StepEvent, StepOutcome};

/// Listener that renders one spinner per running step.
pub struct SpinnerListener {
    current: Option<ProgressBar>,
}

impl SpinnerListener {
    /// Create a new listener.
    pub fn new() -> Self {
        Self { current: None }
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.current.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Default for SpinnerListener {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressListener for SpinnerListener {
    fn on_event(&mut self, event: StepEvent<'_>) {
        match event {
            StepEvent::Started { index, total, name } => {
                self.clear_spinner();

                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::default_spinner()
                        .template(&format!("{{spinner:.cyan}} [{index}/{total}] {{msg}}"))
                        .unwrap(),
                );
                spinner.set_message(name.to_string());
                spinner.enable_steady_tick(Duration::from_millis(100));
                self.current = Some(spinner);
            }
            StepEvent::Finished {
                index,
                total,
                result,
            } => {
                self.clear_spinner();

                match result.outcome {
                    StepOutcome::Succeeded => {
                        let detail = result
                            .detail
                            .as_deref()
                            .map(|d| format!(" {}", style(format!("({d})")).dim()))
                            .unwrap_or_default();
                        println!(
                            "[{index}/{total}] {} {}{detail}",
                            style("v").green(),
                            result.step_name
                        );
                    }
                    StepOutcome::Skipped => {
                        println!(
                            "[{index}/{total}] {} {} {}",
                            style("o").yellow(),
                            result.step_name,
                            style("(skipped)").dim()
                        );
                    }
                    StepOutcome::Degraded => {
                        println!(
                            "[{index}/{total}] {} {} {}",
                            style("!").yellow(),
                            result.step_name,
                            style("(degraded)").yellow()
                        );
                    }
                    StepOutcome::Failed => {
                        println!(
                            "[{index}/{total}] {} {}",
                            style("x").red(),
                            result.step_name
                        );
                    }
                }
            }
        }
    }
}
