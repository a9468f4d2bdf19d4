// crates/auditgate-cli/src/main.rs
// ============================================================================
// Module: Auditgate CLI Entry Point
// Description: Command dispatcher for the four pipeline sub-commands (run,
//              validate-spec, plan, render).
// Purpose: The single process boundary where every crate's error type is
//          wrapped into one phase-prefixed line and mapped to an exit code.
// Dependencies: clap, auditgate-core, auditgate-registry, auditgate-blocks,
//               auditgate-exec, auditgate-render, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Each sub-command loads a spec (or a canonical run), delegates to the
//! appropriate crate, and prints a single phase-prefixed summary line
//! (`Validate:`, `Plan:`, `Run:`, `Render:`). Fatal errors are wrapped in
//! [`CliError`], the only place in this binary that owns a `thiserror` enum
//! composed via `#[source]` from every collaborator's own error type.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use auditgate_blocks::register_builtin_blocks;
use auditgate_core::CanonicalRun;
use auditgate_core::CoreError;
use auditgate_core::OutputProfile;
use auditgate_core::Planner;
use auditgate_core::SpecLoader;
use auditgate_core::Validator;
use auditgate_exec::run_watch_loop;
use auditgate_exec::ExecOutcome;
use auditgate_exec::Executor;
use auditgate_exec::ExecutorError;
use auditgate_exec::SchemaMode;
use auditgate_registry::AccessPolicy;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "auditgate", disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// The four entry points this binary exposes.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a pipeline, or adopt a pinned run.
    Run(RunArgs),
    /// Validate one or many specs.
    ValidateSpec(ValidateSpecArgs),
    /// Emit a dry-run plan without executing any block.
    Plan(PlanArgs),
    /// Render a projection from a previously persisted canonical run.
    Render(RenderArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunArgs {
    /// Path to the pipeline spec YAML file.
    #[arg(long, value_name = "PATH")]
    spec: PathBuf,
    /// Adopt a previously persisted canonical run instead of executing.
    #[arg(long = "from-run", value_name = "PATH")]
    from_run: Option<PathBuf>,
    /// Skip schema validation entirely.
    #[arg(long = "no-validate", conflicts_with = "strict_validate")]
    no_validate: bool,
    /// Treat a schema validation failure as a fatal error.
    #[arg(long = "strict-validate")]
    strict_validate: bool,
    /// Re-run on every detected change instead of exiting after one run.
    #[arg(long)]
    watch: bool,
    /// Use interval-based polling instead of filesystem notifications.
    #[arg(long, value_name = "SECONDS")]
    interval: Option<u64>,
}

/// Arguments for `validate-spec`.
#[derive(Args, Debug)]
struct ValidateSpecArgs {
    /// A spec path, or a glob matching several.
    #[arg(long, value_name = "PATH_OR_GLOB")]
    spec: String,
    /// Emit a machine-readable JSON summary instead of text lines.
    #[arg(long)]
    json: bool,
}

/// Arguments for `plan`.
#[derive(Args, Debug)]
struct PlanArgs {
    /// Path to the pipeline spec YAML file.
    #[arg(long, value_name = "PATH")]
    spec: PathBuf,
    /// Emit the plan as JSON instead of a text summary.
    #[arg(long)]
    json: bool,
}

/// Arguments for `render`.
#[derive(Args, Debug)]
struct RenderArgs {
    /// Path to a persisted canonical run (`run.json`).
    #[arg(long, value_name = "PATH")]
    run: PathBuf,
    /// Output profile to render.
    #[arg(long, value_name = "PROFILE")]
    profile: String,
    /// Output path; defaults to a sibling file named after the profile.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure composing a render: the run could not be loaded, the profile is
/// outside the closed set, or the projection itself could not be written.
#[derive(Debug, thiserror::Error)]
enum RenderFailure {
    /// The canonical run at `--run` could not be loaded.
    #[error(transparent)]
    Load(#[from] CoreError),
    /// The projection could not be rendered or written.
    #[error(transparent)]
    Render(#[from] auditgate_render::RenderError),
    /// `--profile` named something outside the closed set.
    #[error("unknown profile '{0}'")]
    UnknownProfile(String),
}

/// Top-level process-boundary error: every variant renders as a single
/// phase-prefixed line (`Validate:`, `Plan:`, `Run:`, `Render:`).
#[derive(Debug, thiserror::Error)]
enum CliError {
    /// A fatal failure while validating a spec (the spec itself could not
    /// be loaded or expanded; per-rule violations are reported, not raised).
    #[error("Validate: {0}")]
    Validate(#[source] CoreError),
    /// A fatal failure while planning (the spec could not be loaded).
    #[error("Plan: {0}")]
    Plan(#[source] CoreError),
    /// A fatal failure while running a pipeline.
    #[error("Run: {0}")]
    Run(#[source] ExecutorError),
    /// A fatal failure while rendering a projection.
    #[error("Render: {0}")]
    Render(#[source] RenderFailure),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning a process exit code.
fn main() -> ExitCode {
    match dispatch(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            print_stderr_line(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Dispatches the parsed CLI to its sub-command handler.
fn dispatch(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Commands::Run(args) => command_run(&args),
        Commands::ValidateSpec(args) => command_validate_spec(&args),
        Commands::Plan(args) => command_plan(&args),
        Commands::Render(args) => command_render(&args),
    }
}

/// Resolves the project root every relative path (inputs, `schemas/`,
/// `product/runs/`) is anchored to: the current working directory, resolved
/// once per invocation.
fn project_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// ============================================================================
// SECTION: run
// ============================================================================

fn command_run(args: &RunArgs) -> Result<ExitCode, CliError> {
    let spec = SpecLoader.load(&args.spec).map_err(|source| CliError::Run(ExecutorError::from(source)))?;
    let project_root = project_root();
    let registry = register_builtin_blocks(AccessPolicy::allow_all());
    let schema_mode = SchemaMode::from_flags(args.no_validate, args.strict_validate);
    let from_run = args.from_run.as_deref();

    if args.watch {
        let interval = args.interval.map(Duration::from_secs);
        return run_watch_loop(&spec, &args.spec, &project_root, &registry, schema_mode, from_run, interval, |result| {
            report_run_iteration(&result);
        })
        .map(|()| ExitCode::SUCCESS)
        .map_err(CliError::Run);
    }

    match Executor::execute(&spec, &project_root, &registry, schema_mode, from_run) {
        Ok(outcome) => {
            report_run_success(&outcome);
            Ok(ExitCode::SUCCESS)
        }
        Err(source) => Err(CliError::Run(source)),
    }
}

fn report_run_iteration(result: &Result<ExecOutcome, ExecutorError>) {
    match result {
        Ok(outcome) => report_run_success(outcome),
        Err(source) => print_stderr_line(&format!("Run: {source}")),
    }
}

fn report_run_success(outcome: &ExecOutcome) {
    for warning in &outcome.schema_warnings {
        print_stderr_line(&format!("Run: warning: {warning}"));
    }
    let status = outcome.run.meta.get("overall_gate_status").and_then(|value| value.as_str()).unwrap_or("n/a");
    print_stdout_line(&format!(
        "Run: suite '{}' completed, {} result(s), gate status: {status}",
        outcome.run.run.suite,
        outcome.run.results.len()
    ));
}

// ============================================================================
// SECTION: validate-spec
// ============================================================================

fn command_validate_spec(args: &ValidateSpecArgs) -> Result<ExitCode, CliError> {
    let paths = SpecLoader.expand(&args.spec).map_err(CliError::Validate)?;
    let registry = register_builtin_blocks(AccessPolicy::allow_all());
    let project_root = project_root();

    let mut specs_json = Vec::with_capacity(paths.len());
    let mut valid_count = 0usize;

    for path in &paths {
        let (valid, errors) = match SpecLoader.load(path) {
            Ok(spec) => {
                let report = Validator.validate(&spec, &project_root, &registry);
                (report.valid, report.errors)
            }
            Err(source) => (false, vec![source.to_string()]),
        };

        if valid {
            valid_count += 1;
            if !args.json {
                print_stdout_line(&format!("Validate: {} OK", path.display()));
            }
        } else if !args.json {
            print_stdout_line(&format!("Validate: {} FAILED", path.display()));
            for error in &errors {
                print_stdout_line(&format!("  {error}"));
            }
        }

        specs_json.push(serde_json::json!({
            "path": path.display().to_string(),
            "valid": valid,
            "errors": errors,
        }));
    }

    let total = paths.len();
    let all_valid = total > 0 && valid_count == total;

    if args.json {
        let payload = serde_json::json!({
            "valid": all_valid,
            "total_specs": total,
            "valid_specs": valid_count,
            "invalid_specs": total - valid_count,
            "specs": specs_json,
        });
        print_stdout_line(&serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string()));
    }

    Ok(if all_valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ============================================================================
// SECTION: plan
// ============================================================================

fn command_plan(args: &PlanArgs) -> Result<ExitCode, CliError> {
    let spec = SpecLoader.load(&args.spec).map_err(CliError::Plan)?;
    let project_root = project_root();
    let registry = register_builtin_blocks(AccessPolicy::allow_all());
    let plan = Planner.plan(&spec, &project_root, &registry);

    if args.json {
        print_stdout_line(&serde_json::to_string_pretty(&plan).unwrap_or_else(|_| "{}".to_owned()));
    } else {
        print_stdout_line(&format!(
            "Plan: suite '{}', {} step(s), executable: {}",
            plan.suite,
            plan.steps.len(),
            plan.executable
        ));
        for issue in &plan.issues {
            print_stdout_line(&format!("  {issue}"));
        }
    }

    Ok(if plan.executable { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ============================================================================
// SECTION: render
// ============================================================================

fn command_render(args: &RenderArgs) -> Result<ExitCode, CliError> {
    let run = CanonicalRun::load(&args.run).map_err(|source| CliError::Render(RenderFailure::Load(source)))?;
    let Some(profile) = OutputProfile::parse(&args.profile) else {
        return Err(CliError::Render(RenderFailure::UnknownProfile(args.profile.clone())));
    };
    let out_path = args.out.clone().unwrap_or_else(|| args.run.with_file_name(profile.as_str()));

    auditgate_render::render_profile(&run, profile, &out_path)
        .map_err(|source| CliError::Render(RenderFailure::Render(source)))?;

    print_stdout_line(&format!("Render: wrote {}", out_path.display()));
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output
// ============================================================================

#[allow(clippy::print_stdout, reason = "the single call site for this CLI's user-facing stdout output")]
fn print_stdout_line(text: &str) {
    println!("{text}");
}

#[allow(clippy::print_stderr, reason = "the single call site for this CLI's user-facing stderr output")]
fn print_stderr_line(text: &str) {
    eprintln!("{text}");
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

    #[test]
    fn project_root_resolves_to_an_existing_directory() {
        assert!(project_root().is_dir());
    }

    #[test]
    fn cli_parses_run_with_watch_and_interval() {
        let cli = Cli::parse_from(["auditgate", "run", "--spec", "demo.yaml", "--watch", "--interval", "5"]);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.watch);
                assert_eq!(args.interval, Some(5));
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_conflicting_validate_flags() {
        let result = Cli::try_parse_from([
            "auditgate",
            "run",
            "--spec",
            "demo.yaml",
            "--no-validate",
            "--strict-validate",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_validate_spec_json_flag() {
        let cli = Cli::parse_from(["auditgate", "validate-spec", "--spec", "specs/*.yaml", "--json"]);
        match cli.command {
            Commands::ValidateSpec(args) => {
                assert_eq!(args.spec, "specs/*.yaml");
                assert!(args.json);
            }
            other => panic!("expected ValidateSpec, got {other:?}"),
        }
    }
}
