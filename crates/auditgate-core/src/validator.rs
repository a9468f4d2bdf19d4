// crates/auditgate-core/src/validator.rs
// ============================================================================
// Module: Spec Validator
// Description: Shape-checks a parsed Spec against the rules in the design's
//              component design section for SpecLoader & Validator.
// Purpose: Produce a validated Spec or a list of structured errors; never
//          raises through.
// Dependencies: none beyond this crate's own types
// ============================================================================

//! ## Overview
//! [`Validator::validate`] never panics and never returns `Err`: every rule
//! violation becomes one entry in [`ValidationReport::errors`], each
//! prefixed with its location (`step[i]: …`, `gates[i]: …`,
//! `output.profiles: …`), matching the "errors are values" propagation
//! policy.

use std::path::Path;

use crate::block::BlockResolver;
use crate::model::Gate;
use crate::model::OutputProfile;
use crate::model::Spec;
use crate::model::Step;
use crate::model::GLOBAL_GATE_METRICS;

/// The result of validating one spec against one project root.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationReport {
    /// Whether every rule passed.
    pub valid: bool,
    /// Suite name, copied from the spec.
    pub suite: String,
    /// Block identifiers referenced by the pipeline, in step order.
    pub blocks: Vec<String>,
    /// Number of gates declared.
    pub gates: usize,
    /// Requested output profiles, in declaration order.
    pub profiles: Vec<String>,
    /// Number of steps in the pipeline.
    pub steps: usize,
    /// Total number of declared inputs across all steps.
    pub inputs: usize,
    /// Total number of declared outputs across all steps.
    pub outputs: usize,
    /// Location-prefixed error messages, empty iff `valid`.
    pub errors: Vec<String>,
}

/// Validates parsed specs against a project root and a block resolver.
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    /// Validates `spec` against `project_root`, resolving block identifiers
    /// through `resolver`.
    #[must_use]
    pub fn validate(&self, spec: &Spec, project_root: &Path, resolver: &dyn BlockResolver) -> ValidationReport {
        let mut errors = Vec::new();

        if spec.suite.trim().is_empty() {
            errors.push("suite: required".to_owned());
        }

        let mut blocks = Vec::with_capacity(spec.pipeline.len());
        let mut input_count = 0usize;
        let mut output_count = 0usize;
        for (index, step) in spec.pipeline.iter().enumerate() {
            blocks.push(step.block.clone());
            input_count += step.inputs.len();
            output_count += step.outputs.len();
            Self::validate_step(index, step, project_root, resolver, &mut errors);
        }

        for (index, gate) in spec.gates.iter().enumerate() {
            Self::validate_gate(index, gate, &mut errors);
        }

        for profile in &spec.output.profiles {
            if OutputProfile::parse(profile).is_none() {
                errors.push(format!("output.profiles: unknown profile '{profile}'"));
            }
        }

        ValidationReport {
            valid: errors.is_empty(),
            suite: spec.suite.clone(),
            blocks,
            gates: spec.gates.len(),
            profiles: spec.output.profiles.clone(),
            steps: spec.pipeline.len(),
            inputs: input_count,
            outputs: output_count,
            errors,
        }
    }

    fn validate_step(
        index: usize,
        step: &Step,
        project_root: &Path,
        resolver: &dyn BlockResolver,
        errors: &mut Vec<String>,
    ) {
        if step.block.trim().is_empty() {
            errors.push(format!("step[{index}]: block is required"));
            return;
        }
        if !resolver.resolves(&step.block) {
            errors.push(format!("step[{index}]: cannot import blocks.{}.main", step.block));
        }
        for input in &step.inputs {
            if Step::has_glob_input(input) {
                continue;
            }
            if !project_root.join(input).exists() {
                errors.push(format!("step[{index}]: input not found: {input}"));
            }
        }
    }

    fn validate_gate(index: usize, gate: &Gate, errors: &mut Vec<String>) {
        match gate {
            Gate::Global { metric, .. } => {
                if !GLOBAL_GATE_METRICS.contains(&metric.as_str()) {
                    errors.push(format!("gates[{index}]: unrecognized global metric '{metric}'"));
                }
            }
            Gate::Check { check_id, .. } => {
                if check_id.trim().is_empty() {
                    errors.push(format!("gates[{index}]: check_id is required"));
                }
            }
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
    use crate::model::GateOp;
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

    fn sample_spec() -> Spec {
        Spec {
            suite: "demo".to_owned(),
            description: None,
            pipeline: vec![Step {
                name: Some("a".to_owned()),
                block: "site.a11y".to_owned(),
                description: None,
                inputs: Vec::new(),
                outputs: Vec::new(),
            }],
            gates: vec![Gate::Global {
                metric: "issues_total".to_owned(),
                op: GateOp::Le,
                value: 0,
            }],
            output: OutputConfig { profiles: vec!["developer.json".to_owned()] },
        }
    }

    #[test]
    fn valid_spec_passes() {
        let validator = Validator;
        let report = validator.validate(&sample_spec(), Path::new("."), &AllowAll);
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn unresolvable_block_is_an_error() {
        let validator = Validator;
        let report = validator.validate(&sample_spec(), Path::new("."), &AllowNone);
        assert!(!report.valid);
        assert!(report.errors[0].contains("cannot import blocks.site.a11y.main"));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let mut spec = sample_spec();
        spec.output.profiles = vec!["unknown.format".to_owned()];
        let validator = Validator;
        let report = validator.validate(&spec, Path::new("."), &AllowAll);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("unknown profile")));
    }

    #[test]
    fn unrecognized_global_metric_is_an_error() {
        let mut spec = sample_spec();
        spec.gates = vec![Gate::Global {
            metric: "bogus_metric".to_owned(),
            op: GateOp::Le,
            value: 0,
        }];
        let validator = Validator;
        let report = validator.validate(&spec, Path::new("."), &AllowAll);
        assert!(!report.valid);
    }

    #[test]
    fn missing_non_glob_input_is_an_error() {
        let mut spec = sample_spec();
        spec.pipeline[0].inputs = vec!["fixtures/absent.html".to_owned()];
        let validator = Validator;
        let report = validator.validate(&spec, Path::new("."), &AllowAll);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("input not found")));
    }

    #[test]
    fn glob_input_is_not_checked_for_existence() {
        let mut spec = sample_spec();
        spec.pipeline[0].inputs = vec!["fixtures/*.html".to_owned()];
        let validator = Validator;
        let report = validator.validate(&spec, Path::new("."), &AllowAll);
        assert!(report.valid, "{:?}", report.errors);
    }
}
