// crates/auditgate-exec/src/lib.rs
// ============================================================================
// Module: Auditgate Exec
// Description: The Executor (spec -> canonical run -> gates -> renders) and
//              the watch loop that re-triggers it on change.
// Purpose: Own the side-effecting parts of the pipeline: block invocation,
//          filesystem watching, and persistence.
// Dependencies: auditgate-core, auditgate-registry, auditgate-render,
//               jsonschema, notify, thiserror
// ============================================================================

//! ## Overview
//! `auditgate-exec` is the only crate that drives a pipeline to completion.
//! [`Executor::execute`] performs one run; [`run_watch_loop`] repeats it on
//! every detected filesystem change.

mod error;
mod executor;
mod schema;
mod watch;

pub use error::ExecutorError;
pub use executor::ExecOutcome;
pub use executor::Executor;
pub use schema::SchemaMode;
pub use schema::SchemaValidator;
pub use watch::gather_watch_paths;
pub use watch::run_watch_loop;
pub use watch::NotifyWatcher;
pub use watch::PollWatcher;
