// crates/auditgate-core/src/error.rs
// ============================================================================
// Module: Core Error Taxonomy
// Description: Structured error values for spec loading, validation,
//              planning, and gate evaluation.
// Purpose: Errors are values everywhere in this crate; nothing panics on a
//          malformed-but-well-typed input.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! `CoreError` is the error type shared by [`crate::loader`] and
//! [`crate::run`]; [`crate::validator`] and [`crate::planner`] instead
//! collect per-item issues into a report rather than raising, per the
//! "errors are values aggregated into a report" propagation policy.

use std::path::PathBuf;

/// Errors raised while loading a spec or a persisted canonical run.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced file does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// Path that was missing.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file exists but could not be parsed.
    #[error("parse error: {detail}")]
    ParseError {
        /// Human-readable parse failure detail.
        detail: String,
    },
}
