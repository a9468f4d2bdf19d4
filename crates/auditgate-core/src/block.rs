// crates/auditgate-core/src/block.rs
// ============================================================================
// Module: Block Contract
// Description: The entry-point trait every block implements, and the
//              resolver seam the Validator/Planner use to check block ids.
// Purpose: Keep this crate ignorant of how blocks are discovered (compiled-in
//          table, plugin scan, etc.) while still letting the Validator and
//          Planner ask "does this block identifier resolve?".
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A block is an opaque executable unit invoked by the Executor. It exposes
//! one entry point accepting two sequences of strings (`inputs`, `outputs`)
//! and returning an optional [`BlockResult`](crate::model::BlockResult).
//! [`BlockRegistry`](crate) in `auditgate-registry` implements both traits
//! declared here; this crate only depends on the trait objects, never the
//! registry's concrete type, avoiding a circular crate dependency.

use crate::model::BlockResult;

/// Errors a block's entry point may raise during invocation.
#[derive(Debug, thiserror::Error)]
pub enum BlockExecutionError {
    /// The block failed for a domain-specific reason.
    #[error("block execution failed: {0}")]
    Failed(String),
    /// An input file could not be read.
    #[error("failed to read input {path}: {source}")]
    InputRead {
        /// Path that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An output file could not be written.
    #[error("failed to write output {path}: {source}")]
    OutputWrite {
        /// Path that could not be written.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// The contract every block implements: one entry point, two sequences of
/// strings, an optional structured return.
pub trait Block {
    /// The versioned block identifier this implementation reports in its
    /// results, e.g. `site.a11y@1.0.0`.
    fn block_id(&self) -> &str;

    /// Invokes this block's entry point with its declared inputs and
    /// outputs. Returning `Ok(None)` means the block ran but produced no
    /// structured result (its outputs are still treated as produced).
    ///
    /// # Errors
    /// Returns [`BlockExecutionError`] if the block could not complete.
    fn run(
        &self,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Option<BlockResult>, BlockExecutionError>;
}

/// The seam the Validator and Planner use to ask "does this block
/// identifier resolve, and is it permitted?" without depending on how
/// blocks are actually loaded.
pub trait BlockResolver {
    /// Returns `true` iff `block_id` resolves to a loadable, permitted
    /// block.
    fn resolves(&self, block_id: &str) -> bool;
}
