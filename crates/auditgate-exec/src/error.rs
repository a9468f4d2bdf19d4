// crates/auditgate-exec/src/error.rs
// ============================================================================
// Module: Executor Error
// Description: The top-level error this crate raises, composed from its
//              collaborators' error types via #[from].
// Purpose: One error type for the CLI's `run`/`render` call sites.
// Dependencies: auditgate-core, auditgate-registry, auditgate-render,
//               thiserror
// ============================================================================

//! ## Overview
//! `ExecutorError` is the only error type this crate exposes; each variant
//! wraps a collaborator's own error via `#[from]` so the CLI can match on
//! phase without this crate leaking its dependency graph.

/// Errors raised while executing a pipeline or watching for changes.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The spec could not be loaded or parsed.
    #[error(transparent)]
    Spec(#[from] auditgate_core::CoreError),
    /// A projection could not be rendered.
    #[error(transparent)]
    Render(#[from] auditgate_render::RenderError),
    /// The canonical run failed strict JSON-schema validation.
    #[error("schema validation failed: {detail}")]
    SchemaViolation {
        /// Human-readable violation detail.
        detail: String,
    },
    /// A filesystem watch could not be established.
    #[error("failed to watch {path}: {source}")]
    Watch {
        /// Path that could not be watched.
        path: std::path::PathBuf,
        /// Underlying notify error.
        #[source]
        source: notify::Error,
    },
}
