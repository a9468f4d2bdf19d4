// crates/auditgate-exec/tests/pipeline_scenarios.rs
// ============================================================================
// Module: Pipeline Integration Scenarios
// Description: End-to-end exercises of SpecLoader -> Executor -> GateEvaluator
//              -> renderer, against real compiled-in blocks and real files.
// Purpose: Catch regressions at the seams unit tests inside each module
//          can't see: real YAML parsing, real filesystem output, real
//          cross-crate wiring.
// Dependencies: auditgate-core, auditgate-registry, auditgate-blocks,
//               auditgate-exec, serde_json, tempfile
// ============================================================================

#![allow(
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

use auditgate_blocks::register_builtin_blocks;
use auditgate_core::CanonicalRun;
use auditgate_core::SpecLoader;
use auditgate_core::Validator;
use auditgate_exec::ExecutorError;
use auditgate_exec::{Executor, SchemaMode};
use auditgate_registry::AccessPolicy;
use auditgate_registry::BlockRegistry;

fn write_spec(dir: &std::path::Path, yaml: &str) -> std::path::PathBuf {
    let path = dir.join("suite.yaml");
    std::fs::write(&path, yaml).expect("write spec");
    path
}

#[test]
fn happy_path_two_step_pipeline_fails_the_issues_total_gate() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("fixtures")).expect("mkdir");
    std::fs::write(
        dir.path().join("fixtures/page.html"),
        r#"<html><body><img src="a.png"></body></html>"#,
    )
    .expect("write fixture");

    let spec_path = write_spec(
        dir.path(),
        r#"
suite: demo-site
pipeline:
  - block: site.a11y
    inputs: ["fixtures/page.html"]
  - block: site.links-assets
    inputs: ["fixtures/page.html"]
gates:
  - type: global
    metric: issues_total
    op: "<="
    value: 0
output:
  profiles: ["developer.json", "exec.csv"]
"#,
    );

    let spec = SpecLoader.load(&spec_path).expect("spec parses");
    let registry = register_builtin_blocks(AccessPolicy::allow_all());
    let outcome = Executor::execute(&spec, dir.path(), &registry, SchemaMode::Soft, None).expect("executes");

    assert_eq!(outcome.run.results.len(), 2);
    let gate_report = outcome.gate_report.expect("gate report present");
    assert!(!gate_report.overall, "at least one missing-alt issue should fail issues_total <= 0");

    let runs_dir = dir.path().join("product").join("runs").join("demo-site");
    assert!(runs_dir.join("run.json").exists());
    assert!(runs_dir.join("developer.json").exists());
    assert!(runs_dir.join("exec.csv").exists());
    assert_eq!(outcome.rendered.len(), 2);
}

#[test]
fn strict_schema_violation_blocks_the_run_and_writes_no_projections() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("schemas")).expect("mkdir");
    // A stricter schema than the real one: requires a top-level key this
    // engine never produces, so a structurally valid run still fails it.
    std::fs::write(
        dir.path().join("schemas/audit_run.v1.json"),
        r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "required": ["run", "requested_checks", "blocks_used", "results", "meta", "environment"],
            "properties": {}
        }"#,
    )
    .expect("write schema");
    std::fs::create_dir_all(dir.path().join("fixtures")).expect("mkdir");
    std::fs::write(dir.path().join("fixtures/page.html"), "<html></html>").expect("write fixture");

    let spec_path = write_spec(
        dir.path(),
        r#"
suite: demo-strict
pipeline:
  - block: site.a11y
    inputs: ["fixtures/page.html"]
output:
  profiles: ["developer.json"]
"#,
    );

    let spec = SpecLoader.load(&spec_path).expect("spec parses");
    let registry = register_builtin_blocks(AccessPolicy::allow_all());
    let err = Executor::execute(&spec, dir.path(), &registry, SchemaMode::Strict, None)
        .expect_err("schema violation under strict mode");
    assert!(matches!(err, ExecutorError::SchemaViolation { .. }));

    let runs_dir = dir.path().join("product").join("runs").join("demo-strict");
    assert!(!runs_dir.join("run.json").exists());
    assert!(!runs_dir.join("developer.json").exists());
}

#[test]
fn missing_schema_file_degrades_strict_mode_to_a_warning() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("fixtures")).expect("mkdir");
    std::fs::write(dir.path().join("fixtures/page.html"), "<html></html>").expect("write fixture");

    let spec_path = write_spec(
        dir.path(),
        r#"
suite: demo-degrade
pipeline:
  - block: site.a11y
    inputs: ["fixtures/page.html"]
output:
  profiles: ["developer.json"]
"#,
    );

    let spec = SpecLoader.load(&spec_path).expect("spec parses");
    let registry = register_builtin_blocks(AccessPolicy::allow_all());
    // No schemas/ directory exists at all under this project root.
    let outcome =
        Executor::execute(&spec, dir.path(), &registry, SchemaMode::Strict, None).expect("degrades, does not error");

    assert_eq!(outcome.schema_warnings.len(), 1);
    assert!(outcome.schema_warnings[0].contains("schema file not found"));
    let runs_dir = dir.path().join("product").join("runs").join("demo-degrade");
    assert!(runs_dir.join("run.json").exists());
    assert!(runs_dir.join("developer.json").exists());
}

#[test]
fn from_run_pinning_is_idempotent_across_repeated_invocations() {
    let dir = tempfile::tempdir().expect("tempdir");
    let started = time::OffsetDateTime::from_unix_timestamp(0).expect("valid epoch");
    let mut pinned = CanonicalRun::new("demo-pinned", started);
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
    let pinned_path = dir.path().join("pinned-run.json");
    std::fs::write(&pinned_path, serde_json::to_string(&pinned).expect("serialize")).expect("write");

    let spec_path = write_spec(
        dir.path(),
        r#"
suite: demo-pinned
pipeline:
  - block: site.a11y
  - block: site.links-assets
output:
  profiles: ["developer.json", "exec.csv"]
"#,
    );
    let spec = SpecLoader.load(&spec_path).expect("spec parses");
    let registry = register_builtin_blocks(AccessPolicy::allow_all());

    let first =
        Executor::execute(&spec, dir.path(), &registry, SchemaMode::Off, Some(&pinned_path)).expect("first run");
    assert_eq!(first.run.results.len(), 1, "pinned run has exactly the one absorbed result, not the two blocks");

    let runs_dir = dir.path().join("product").join("runs").join("demo-pinned");
    let first_developer = std::fs::read_to_string(runs_dir.join("developer.json")).expect("read developer.json");
    let first_exec = std::fs::read_to_string(runs_dir.join("exec.csv")).expect("read exec.csv");

    let second =
        Executor::execute(&spec, dir.path(), &registry, SchemaMode::Off, Some(&pinned_path)).expect("second run");
    assert_eq!(second.run.results.len(), 1);

    let second_developer = std::fs::read_to_string(runs_dir.join("developer.json")).expect("read developer.json");
    let second_exec = std::fs::read_to_string(runs_dir.join("exec.csv")).expect("read exec.csv");
    assert_eq!(first_developer, second_developer);
    assert_eq!(first_exec, second_exec);
}

#[test]
fn denylisted_block_is_rejected_even_when_compiled_in() {
    let mut policy = AccessPolicy::allow_all();
    policy.denylist.insert("brand.palette".to_owned());

    let mut registry = BlockRegistry::new(policy);
    registry.register("brand.palette", auditgate_blocks::BrandPaletteBlock);

    let spec = auditgate_core::Spec {
        suite: "demo-denied".to_owned(),
        description: None,
        pipeline: vec![auditgate_core::Step {
            name: None,
            block: "brand.palette".to_owned(),
            description: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }],
        gates: Vec::new(),
        output: auditgate_core::model::OutputConfig::default(),
    };

    let report = Validator.validate(&spec, std::path::Path::new("."), &registry);
    assert!(!report.valid);
    assert!(report.errors.iter().any(|e| e == "step[0]: cannot import blocks.brand.palette.main"));

    // The denial also holds at invocation time, not only at validation time.
    let err = registry.invoke("brand.palette", &[], &[]).expect_err("denied");
    assert!(matches!(err, auditgate_registry::RegistryError::DeniedByPolicy { .. }));
}
