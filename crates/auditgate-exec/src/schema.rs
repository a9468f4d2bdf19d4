// crates/auditgate-exec/src/schema.rs
// ============================================================================
// Module: Schema Validator
// Description: Validates a canonical run against the audit_run.v1.json
//              schema under off/soft/strict modes.
// Purpose: Catch shape drift between the Executor's output and the
//          documented wire contract before it reaches a renderer.
// Dependencies: auditgate-core, jsonschema, serde_json
// ============================================================================

//! ## Overview
//! `off` performs no validation. `soft` validates and collects a warning on
//! failure. `strict` validates and returns
//! [`crate::error::ExecutorError::SchemaViolation`] on failure. In both
//! non-`off` modes, a missing schema file degrades to a single warning
//! rather than a fatal error, even under `strict`.

use std::path::Path;

use auditgate_core::CanonicalRun;

use crate::error::ExecutorError;

/// Schema validation strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMode {
    /// Perform no validation.
    Off,
    /// Validate; on failure, collect a warning and continue.
    Soft,
    /// Validate; on failure, return an error.
    Strict,
}

impl SchemaMode {
    /// Parses `--no-validate`/`--strict-validate` flag combinations into a
    /// mode, defaulting to `soft`.
    #[must_use]
    pub const fn from_flags(no_validate: bool, strict_validate: bool) -> Self {
        if no_validate {
            Self::Off
        } else if strict_validate {
            Self::Strict
        } else {
            Self::Soft
        }
    }
}

/// Validates canonical runs against the `audit_run.v1.json` schema.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validates `run` against the schema at `schema_path` under `mode`.
    ///
    /// Returns a list of warning strings on success (empty in `off` mode or
    /// a clean `soft`/`strict` pass).
    ///
    /// # Errors
    /// Returns [`ExecutorError::SchemaViolation`] only when `mode` is
    /// [`SchemaMode::Strict`] and the schema file is present but the run
    /// fails validation against it.
    pub fn validate(run: &CanonicalRun, schema_path: &Path, mode: SchemaMode) -> Result<Vec<String>, ExecutorError> {
        if mode == SchemaMode::Off {
            return Ok(Vec::new());
        }

        if !schema_path.exists() {
            return Ok(vec![format!("schema file not found at {}; skipping validation", schema_path.display())]);
        }

        let schema_text = match std::fs::read_to_string(schema_path) {
            Ok(text) => text,
            Err(source) => return Ok(vec![format!("failed to read schema {}: {source}", schema_path.display())]),
        };
        let schema: serde_json::Value = match serde_json::from_str(&schema_text) {
            Ok(value) => value,
            Err(source) => return Ok(vec![format!("malformed schema {}: {source}", schema_path.display())]),
        };

        let instance = serde_json::to_value(run)
            .map_err(|source| ExecutorError::SchemaViolation { detail: source.to_string() })?;

        let validator = match jsonschema::validator_for(&schema) {
            Ok(validator) => validator,
            Err(source) => return Ok(vec![format!("invalid schema {}: {source}", schema_path.display())]),
        };

        if let Err(first_error) = validator.validate(&instance) {
            let detail = first_error.to_string();
            return match mode {
                SchemaMode::Strict => Err(ExecutorError::SchemaViolation { detail }),
                SchemaMode::Soft | SchemaMode::Off => Ok(vec![format!("schema validation failed: {detail}")]),
            };
        }

        Ok(Vec::new())
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
    use time::OffsetDateTime;

    fn sample_run() -> CanonicalRun {
        let started = OffsetDateTime::from_unix_timestamp(0).expect("valid epoch");
        CanonicalRun::new("demo", started)
    }

    #[test]
    fn off_mode_never_validates() {
        let warnings = SchemaValidator::validate(&sample_run(), Path::new("/no/such/schema.json"), SchemaMode::Off)
            .expect("off mode never errors");
        assert!(warnings.is_empty());
    }

    #[test]
    fn missing_schema_degrades_strict_to_warning() {
        let warnings =
            SchemaValidator::validate(&sample_run(), Path::new("/no/such/schema.json"), SchemaMode::Strict)
                .expect("missing schema degrades, does not error");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("schema file not found"));
    }

    #[test]
    fn from_flags_precedence() {
        assert_eq!(SchemaMode::from_flags(true, true), SchemaMode::Off);
        assert_eq!(SchemaMode::from_flags(false, true), SchemaMode::Strict);
        assert_eq!(SchemaMode::from_flags(false, false), SchemaMode::Soft);
    }
}
