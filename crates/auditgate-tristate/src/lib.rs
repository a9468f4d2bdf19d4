// crates/auditgate-tristate/src/lib.rs
// ============================================================================
// Module: Tri-State Logic
// Description: Tri-state truth values used for fail-closed gate evaluation.
// Purpose: Represent "skipped" gate outcomes as a value instead of an absence.
// Dependencies: serde::{Deserialize, Serialize}
// ============================================================================

//! ## Overview
//! Defines the tri-state truth value (`true`/`false`/`unknown`) used by the
//! gate evaluator so that a skipped gate is a distinct, representable
//! outcome rather than an `Option<bool>` with an ambiguous `None`.

mod tristate;

pub use tristate::fold_overall;
pub use tristate::TriState;
