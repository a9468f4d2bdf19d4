// crates/auditgate-core/src/planner.rs
// ============================================================================
// Module: Planner
// Description: Dry-run analysis of a spec without executing any block.
// Purpose: Let `auditgate plan` and `auditgate run` preflight a pipeline and
//          surface the same issues a real run would hit, before it runs.
// Dependencies: none beyond this crate's own types
// ============================================================================

//! ## Overview
//! [`Planner::plan`] never touches a block's entry point; it only asks the
//! [`BlockResolver`] whether an identifier resolves and stats the
//! filesystem for non-glob inputs.

use std::path::Path;

use crate::block::BlockResolver;
use crate::model::OutputProfile;
use crate::model::Spec;
use crate::model::Step;

/// The existence status of one declared input, as of planning time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputStatus {
    /// The path exists on disk.
    Exists,
    /// The path contains a glob wildcard and is deferred to the block.
    GlobPattern,
    /// The path does not exist and is not a glob.
    Missing,
}

/// One step's planned execution status.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PlannedStep {
    /// Position within the pipeline.
    pub index: usize,
    /// Effective step name.
    pub name: String,
    /// Block identifier this step binds to.
    pub block: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Whether `block` resolves through the registry.
    pub block_resolved: bool,
    /// Per-input existence status, in declaration order.
    pub inputs: Vec<(String, InputStatus)>,
    /// Declared output paths, unchecked.
    pub outputs: Vec<String>,
}

/// A dry-run plan over an entire spec.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Plan {
    /// Suite name, copied from the spec.
    pub suite: String,
    /// Per-step planned status, in pipeline order.
    pub steps: Vec<PlannedStep>,
    /// Total declared inputs across all steps.
    pub total_inputs: usize,
    /// Total declared outputs across all steps.
    pub total_outputs: usize,
    /// Block identifiers that failed to resolve.
    pub missing_blocks: Vec<String>,
    /// Number of gates declared.
    pub gate_count: usize,
    /// Requested profiles paired with whether each is in the closed set.
    pub profiles: Vec<(String, bool)>,
    /// Aggregated human-readable issues across the whole plan.
    pub issues: Vec<String>,
    /// True iff every block resolves, every non-glob input exists, and
    /// every profile is recognized.
    pub executable: bool,
}

/// Produces dry-run plans from a validated or about-to-run spec.
#[derive(Debug, Default, Clone, Copy)]
pub struct Planner;

impl Planner {
    /// Builds a plan for `spec` against `project_root`, resolving block
    /// identifiers through `resolver`.
    #[must_use]
    pub fn plan(&self, spec: &Spec, project_root: &Path, resolver: &dyn BlockResolver) -> Plan {
        let mut issues = Vec::new();
        let mut missing_blocks = Vec::new();
        let mut total_inputs = 0usize;
        let mut total_outputs = 0usize;

        if spec.pipeline.is_empty() {
            issues.push("pipeline is empty".to_owned());
        }

        let steps: Vec<PlannedStep> = spec
            .pipeline
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let planned = Self::plan_step(index, step, project_root, resolver, &mut issues);
                if !planned.block_resolved {
                    missing_blocks.push(planned.block.clone());
                }
                total_inputs += planned.inputs.len();
                total_outputs += planned.outputs.len();
                planned
            })
            .collect();

        let mut unknown_profile = false;
        let profiles: Vec<(String, bool)> = spec
            .output
            .profiles
            .iter()
            .map(|profile| {
                let known = OutputProfile::parse(profile).is_some();
                if !known {
                    unknown_profile = true;
                    issues.push(format!("output.profiles: unknown profile '{profile}'"));
                }
                (profile.clone(), known)
            })
            .collect();

        let missing_inputs = steps
            .iter()
            .flat_map(|step| step.inputs.iter())
            .any(|(_, status)| *status == InputStatus::Missing);

        let executable = missing_blocks.is_empty() && !missing_inputs && !unknown_profile;

        Plan {
            suite: spec.suite.clone(),
            steps,
            total_inputs,
            total_outputs,
            missing_blocks,
            gate_count: spec.gates.len(),
            profiles,
            issues,
            executable,
        }
    }

    fn plan_step(
        index: usize,
        step: &Step,
        project_root: &Path,
        resolver: &dyn BlockResolver,
        issues: &mut Vec<String>,
    ) -> PlannedStep {
        let block_resolved = resolver.resolves(&step.block);
        if !block_resolved {
            issues.push(format!("step[{index}]: cannot import blocks.{}.main", step.block));
        }

        let inputs: Vec<(String, InputStatus)> = step
            .inputs
            .iter()
            .map(|input| {
                let status = if Step::has_glob_input(input) {
                    InputStatus::GlobPattern
                } else if project_root.join(input).exists() {
                    InputStatus::Exists
                } else {
                    issues.push(format!("step[{index}]: input not found: {input}"));
                    InputStatus::Missing
                };
                (input.clone(), status)
            })
            .collect();

        PlannedStep {
            index,
            name: step.effective_name(index),
            block: step.block.clone(),
            description: step.description.clone(),
            block_resolved,
            inputs,
            outputs: step.outputs.clone(),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]
mod tests {
    use super::*;
    use crate::model::OutputConfig;

    struct AllowAll;
    impl BlockResolver for AllowAll {
        fn resolves(&self, _block_id: &str) -> bool {
            true
        }
    }

    struct AllowNone;
    impl BlockResolver for AllowNone {
        fn resolves(&self, _block_id: &str) -> bool {
            false
        }
    }

    fn step(block: &str, inputs: Vec<&str>) -> Step {
        Step {
            name: None,
            block: block.to_owned(),
            description: None,
            inputs: inputs.into_iter().map(ToOwned::to_owned).collect(),
            outputs: Vec::new(),
        }
    }

    #[test]
    fn empty_pipeline_is_a_warning_not_an_error() {
        let spec = Spec {
            suite: "demo".to_owned(),
            description: None,
            pipeline: Vec::new(),
            gates: Vec::new(),
            output: OutputConfig::default(),
        };
        let planner = Planner;
        let plan = planner.plan(&spec, Path::new("."), &AllowAll);
        assert!(plan.executable);
        assert!(plan.issues.iter().any(|issue| issue.contains("empty")));
    }

    #[test]
    fn missing_block_makes_plan_non_executable() {
        let spec = Spec {
            suite: "demo".to_owned(),
            description: None,
            pipeline: vec![step("site.a11y", vec![])],
            gates: Vec::new(),
            output: OutputConfig::default(),
        };
        let planner = Planner;
        let plan = planner.plan(&spec, Path::new("."), &AllowNone);
        assert!(!plan.executable);
        assert_eq!(plan.missing_blocks, vec!["site.a11y".to_owned()]);
    }

    #[test]
    fn missing_non_glob_input_makes_plan_non_executable() {
        let spec = Spec {
            suite: "demo".to_owned(),
            description: None,
            pipeline: vec![step("site.a11y", vec!["fixtures/absent.html"])],
            gates: Vec::new(),
            output: OutputConfig::default(),
        };
        let planner = Planner;
        let plan = planner.plan(&spec, Path::new("."), &AllowAll);
        assert!(!plan.executable);
        assert_eq!(plan.steps[0].inputs[0].1, InputStatus::Missing);
    }

    #[test]
    fn glob_input_does_not_block_executability() {
        let spec = Spec {
            suite: "demo".to_owned(),
            description: None,
            pipeline: vec![step("site.a11y", vec!["fixtures/*.html"])],
            gates: Vec::new(),
            output: OutputConfig::default(),
        };
        let planner = Planner;
        let plan = planner.plan(&spec, Path::new("."), &AllowAll);
        assert!(plan.executable);
        assert_eq!(plan.steps[0].inputs[0].1, InputStatus::GlobPattern);
    }

    #[test]
    fn unknown_profile_makes_plan_non_executable() {
        let spec = Spec {
            suite: "demo".to_owned(),
            description: None,
            pipeline: Vec::new(),
            gates: Vec::new(),
            output: OutputConfig { profiles: vec!["unknown.format".to_owned()] },
        };
        let planner = Planner;
        let plan = planner.plan(&spec, Path::new("."), &AllowAll);
        assert!(!plan.executable);
    }
}
