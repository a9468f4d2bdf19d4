// crates/auditgate-render/src/error.rs
// ============================================================================
// Module: Render Error
// Description: Errors raised while rendering or writing a projection.
// Purpose: Let the Renderer report I/O and formatting failures as values.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! `RenderError` is returned by every profile renderer and by the
//! dispatching entry point in [`crate::render_profile`].

/// Errors raised while rendering a canonical run into a profile.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The projection could not be serialized.
    #[error("failed to format {profile}: {detail}")]
    Format {
        /// Profile being rendered.
        profile: String,
        /// Formatting failure detail.
        detail: String,
    },
    /// The rendered content could not be written to disk.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination path.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
