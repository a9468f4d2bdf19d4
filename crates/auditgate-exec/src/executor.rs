// crates/auditgate-exec/src/executor.rs
// ============================================================================
// Module: Executor
// Description: Runs a pipeline step by step, builds the CanonicalRun,
//              validates it, evaluates gates, and renders requested
//              profiles.
// Purpose: The one place that owns a CanonicalRun while it is in progress.
// Dependencies: auditgate-core, auditgate-registry, auditgate-render,
//               time
// ============================================================================

//! ## Overview
//! [`Executor::execute`] iterates `spec.pipeline` in declared order (see the
//! single-threaded, sequential concurrency model), one step at a time. A
//! step whose block cannot be resolved or raises does not abort the
//! pipeline; the failure is logged and the next step runs. When `from_run`
//! is supplied, execution is skipped entirely and the referenced
//! [`CanonicalRun`] is adopted as-is (artifact pinning).

use std::path::Path;
use std::path::PathBuf;

use auditgate_core::model::Gate;
use auditgate_core::model::OutputProfile;
use auditgate_core::CanonicalRun;
use auditgate_core::GateEvaluator;
use auditgate_core::GateReport;
use auditgate_core::Spec;
use auditgate_registry::BlockRegistry;
use time::OffsetDateTime;

use crate::error::ExecutorError;
use crate::schema::SchemaMode;
use crate::schema::SchemaValidator;

/// The full result of one execution: the finalized run, its gate report,
/// any schema warnings collected, and the paths of any profiles rendered.
#[derive(Debug)]
pub struct ExecOutcome {
    /// The finalized canonical run.
    pub run: CanonicalRun,
    /// Gate evaluation report, `None` when `run.results` is empty (no
    /// gates are evaluated over an empty run).
    pub gate_report: Option<GateReport>,
    /// Warnings collected during schema validation.
    pub schema_warnings: Vec<String>,
    /// Paths written by the renderer, in requested-profile order.
    pub rendered: Vec<PathBuf>,
}

/// Runs pipelines and builds canonical run records.
#[derive(Debug, Default, Clone, Copy)]
pub struct Executor;

impl Executor {
    /// Executes `spec` against `project_root`, or adopts the run pinned at
    /// `from_run` if supplied.
    ///
    /// # Errors
    /// Returns [`ExecutorError::Spec`] if a pinned run cannot be loaded,
    /// [`ExecutorError::SchemaViolation`] under `SchemaMode::Strict` if the
    /// finalized run fails schema validation, or
    /// [`ExecutorError::Render`] if a requested profile cannot be rendered.
    pub fn execute(
        spec: &Spec,
        project_root: &Path,
        registry: &BlockRegistry,
        schema_mode: SchemaMode,
        from_run: Option<&Path>,
    ) -> Result<ExecOutcome, ExecutorError> {
        let mut run = match from_run {
            Some(path) => CanonicalRun::load(path)?,
            None => Self::run_steps(spec, registry),
        };

        if run.results.is_empty() {
            return Ok(ExecOutcome { run, gate_report: None, schema_warnings: Vec::new(), rendered: Vec::new() });
        }

        let runs_dir = project_root.join("product").join("runs").join(&spec.suite);
        std::fs::create_dir_all(&runs_dir).ok();

        let schema_path = project_root.join("schemas").join("audit_run.v1.json");
        let schema_warnings = SchemaValidator::validate(&run, &schema_path, schema_mode)?;

        let gate_report = GateEvaluator.evaluate(&spec.gates, &run);
        run.stamp_gate_status(gate_report.overall);

        let run_path = runs_dir.join("run.json");
        if let Ok(text) = serde_json::to_string_pretty(&run) {
            let _ = std::fs::write(&run_path, text);
        }

        let mut rendered = Vec::new();
        for profile_name in &spec.output.profiles {
            let Some(profile) = OutputProfile::parse(profile_name) else { continue };
            let out_path = runs_dir.join(profile.as_str());
            auditgate_render::render_profile(&run, profile, &out_path)?;
            rendered.push(out_path);
        }

        Ok(ExecOutcome { run, gate_report: Some(gate_report), schema_warnings, rendered })
    }

    fn run_steps(spec: &Spec, registry: &BlockRegistry) -> CanonicalRun {
        let started = now();
        let mut run = CanonicalRun::new(&spec.suite, started);
        let total = spec.pipeline.len();

        for (index, step) in spec.pipeline.iter().enumerate() {
            let name = step.effective_name(index);
            log_progress(index, total, &step.block, &name);

            match registry.invoke(&step.block, &step.inputs, &step.outputs) {
                Ok(Some(result)) => run.absorb_block_result(result),
                Ok(None) => {}
                Err(source) => log_step_error(&step.block, &source),
            }
        }

        run
    }
}

#[allow(clippy::print_stdout, reason = "Executor progress is user-facing CLI output, not diagnostic logging")]
fn log_progress(index: usize, total: usize, block: &str, step_name: &str) {
    println!("[{}/{total}] Running Block: '{block}' (Step: '{step_name}')", index + 1);
}

#[allow(clippy::print_stderr, reason = "a non-fatal per-step failure is reported to stderr and the pipeline continues")]
fn log_step_error(block: &str, source: &auditgate_registry::RegistryError) {
    eprintln!("  Error: block '{block}' failed: {source}");
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
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
    use auditgate_blocks::register_builtin_blocks;
    use auditgate_core::model::GateOp;
    use auditgate_core::model::OutputConfig;
    use auditgate_core::model::Step;
    use auditgate_registry::AccessPolicy;

    fn step(block: &str) -> Step {
        Step { name: None, block: block.to_owned(), description: None, inputs: Vec::new(), outputs: Vec::new() }
    }

    #[test]
    fn empty_pipeline_produces_empty_run_and_no_gate_report() {
        let spec = Spec {
            suite: "demo".to_owned(),
            description: None,
            pipeline: Vec::new(),
            gates: Vec::new(),
            output: OutputConfig::default(),
        };
        let registry = register_builtin_blocks(AccessPolicy::allow_all());
        let dir = tempfile::tempdir().expect("tempdir");
        let outcome = Executor::execute(&spec, dir.path(), &registry, SchemaMode::Off, None).expect("executes");
        assert!(outcome.run.results.is_empty());
        assert!(outcome.gate_report.is_none());
    }

    #[test]
    fn two_step_pipeline_fails_strict_issues_total_gate() {
        let spec = Spec {
            suite: "demo".to_owned(),
            description: None,
            pipeline: vec![step("site.a11y"), step("site.links-assets")],
            gates: vec![Gate::Global { metric: "issues_total".to_owned(), op: GateOp::Le, value: 0 }],
            output: OutputConfig::default(),
        };
        let registry = register_builtin_blocks(AccessPolicy::allow_all());
        let dir = tempfile::tempdir().expect("tempdir");
        let outcome = Executor::execute(&spec, dir.path(), &registry, SchemaMode::Off, None).expect("executes");
        assert_eq!(outcome.run.results.len(), 2);
        let gate_report = outcome.gate_report.expect("gate report present");
        assert!(!gate_report.overall);
        assert_eq!(outcome.run.meta.get("overall_gate_status").and_then(|v| v.as_str()), Some("fail"));
    }

    #[test]
    fn unresolvable_block_does_not_abort_remaining_steps() {
        let spec = Spec {
            suite: "demo".to_owned(),
            description: None,
            pipeline: vec![step("no.such.block"), step("site.a11y")],
            gates: Vec::new(),
            output: OutputConfig::default(),
        };
        let registry = register_builtin_blocks(AccessPolicy::allow_all());
        let dir = tempfile::tempdir().expect("tempdir");
        let outcome = Executor::execute(&spec, dir.path(), &registry, SchemaMode::Off, None).expect("executes");
        assert_eq!(outcome.run.results.len(), 1);
    }

    #[test]
    fn artifact_pinning_skips_execution() {
        let started = OffsetDateTime::from_unix_timestamp(0).expect("valid epoch");
        let mut pinned = CanonicalRun::new("demo", started);
        pinned.absorb_block_result(auditgate_core::model::BlockResult {
            block_id: "site.a11y@1.0.0".to_owned(),
            check_results: vec![auditgate_core::model::RawCheckResult {
                check_id: "a11y.img-alt".to_owned(),
                block_id: "site.a11y@1.0.0".to_owned(),
                status: auditgate_core::model::CheckStatus::Pass,
                metrics: std::collections::BTreeMap::new(),
                issues: Vec::new(),
            }],
            meta: std::collections::BTreeMap::new(),
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let pinned_path = dir.path().join("run.json");
        std::fs::write(&pinned_path, serde_json::to_string(&pinned).expect("serialize")).expect("write");

        let spec = Spec {
            suite: "demo".to_owned(),
            description: None,
            pipeline: vec![step("site.a11y"), step("site.links-assets")],
            gates: Vec::new(),
            output: OutputConfig::default(),
        };
        let registry = register_builtin_blocks(AccessPolicy::allow_all());
        let outcome =
            Executor::execute(&spec, dir.path(), &registry, SchemaMode::Off, Some(&pinned_path)).expect("executes");
        assert_eq!(outcome.run.results.len(), 1);
    }
}
