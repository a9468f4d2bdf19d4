// crates/auditgate-render/src/developer_json.rs
// ============================================================================
// Module: developer.json Renderer
// Description: Pretty-printed mirror of the canonical run with stable key
//              order and no content rewriting.
// Purpose: Byte-stable projection for identical inputs.
// Dependencies: auditgate-core, serde_json
// ============================================================================

//! ## Overview
//! Field declaration order in [`auditgate_core::CanonicalRun`] already
//! guarantees stable key order; this module only adds pretty-printing.

use auditgate_core::CanonicalRun;

use crate::error::RenderError;

/// Renders `run` as pretty-printed JSON, identical in shape to the
/// canonical record.
///
/// # Errors
/// Returns [`RenderError::Format`] if `run` cannot be serialized (this
/// should not happen for a well-formed `CanonicalRun`).
pub fn render(run: &CanonicalRun) -> Result<String, RenderError> {
    serde_json::to_string_pretty(run)
        .map_err(|source| RenderError::Format { profile: "developer.json".to_owned(), detail: source.to_string() })
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

    #[test]
    fn renders_pretty_json_with_run_header_first() {
        let started = OffsetDateTime::from_unix_timestamp(0).expect("valid epoch");
        let run = CanonicalRun::new("demo", started);
        let rendered = render(&run).expect("render succeeds");
        assert!(rendered.starts_with("{\n  \"run\""));
    }
}
