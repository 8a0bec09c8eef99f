//! Plan renderers
//!
//! Serialize the planned step list without executing anything; consumed
//! by `show` and dry runs.

use std::convert::Infallible;
use std::fmt::Write as _;

use serde::Serialize;

use crate::Manifest;
use crate::steps::Step;

use super::Renderer;

/// One step as it appears in a rendered plan.
#[derive(Debug, Serialize)]
struct PlanStep {
    name: String,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_when: Option<String>,
    actions: Vec<String>,
}

impl PlanStep {
    fn from_step(step: &Step) -> Self {
        Self {
            name: step.name().to_string(),
            required: step.is_required(),
            skip_when: step.precondition().map(crate::probe::Capability::describe),
            actions: step.action_descriptions(),
        }
    }
}

/// Renders the plan as a YAML document.
#[derive(Debug, Clone, Default)]
pub struct YamlPlanRenderer;

impl YamlPlanRenderer {
    /// Create a new YAML plan renderer.
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for YamlPlanRenderer {
    type Output = String;
    type Error = serde_yaml::Error;

    fn render(&self, manifest: &Manifest) -> Result<String, Self::Error> {
        let plan: Vec<PlanStep> = manifest.steps.iter().map(PlanStep::from_step).collect();
        serde_yaml::to_string(&plan)
    }
}

/// Renders the plan as a numbered human-readable listing.
#[derive(Debug, Clone, Default)]
pub struct TextPlanRenderer;

impl TextPlanRenderer {
    /// Create a new text plan renderer.
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TextPlanRenderer {
    type Output = String;
    type Error = Infallible;

    fn render(&self, manifest: &Manifest) -> Result<String, Self::Error> {
        let total = manifest.steps.len();
        let mut out = String::new();

        for (i, step) in manifest.steps.iter().enumerate() {
            let marker = if step.is_required() { "!" } else { " " };
            let _ = writeln!(out, "[{:>2}/{total}]{marker} {}", i + 1, step.name());
            if let Some(capability) = step.precondition() {
                let _ = writeln!(out, "        skip when: {}", capability.describe());
            }
            for (j, action) in step.action_descriptions().iter().enumerate() {
                let kind = if j == 0 { "do" } else { "else" };
                let _ = writeln!(out, "        {kind}: {action}");
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RigConfig;
    use crate::platform::Platform;

    fn manifest() -> Manifest {
        let dir = tempfile::tempdir().unwrap();
        let config = RigConfig::test_config(dir.path());
        Manifest::terminal(&config, Platform::Linux)
    }

    #[test]
    fn yaml_plan_lists_every_step() {
        let manifest = manifest();
        let yaml = YamlPlanRenderer::new().render(&manifest).unwrap();

        for step in &manifest.steps {
            assert!(yaml.contains(step.name()), "missing step: {}", step.name());
        }
        assert!(yaml.contains("required: true"));
        assert!(yaml.contains("skip_when:"));
    }

    #[test]
    fn text_plan_is_numbered_and_flags_required_steps() {
        let manifest = manifest();
        let text = TextPlanRenderer::new().render(&manifest).unwrap();

        assert!(text.contains("[ 1/"));
        assert!(text.contains("! Install zsh"));
        assert!(text.contains("skip when: zsh on PATH"));
        assert!(text.contains("else:"));
    }
}
