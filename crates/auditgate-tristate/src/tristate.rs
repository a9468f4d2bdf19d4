// crates/auditgate-tristate/src/tristate.rs
// ============================================================================
// Module: Tri-State Value
// Description: The `TriState` truth value and its folding rules.
// Purpose: Provide deterministic tri-state evaluation for gate predicates.
// Dependencies: serde::{Deserialize, Serialize}
// ============================================================================

//! ## Overview
//! `TriState` is a closed three-valued logic used wherever an evaluation may
//! be definitively true, definitively false, or indeterminate because the
//! predicate did not apply (e.g. a gate referencing a missing check).

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Tri-State Value
// ============================================================================

/// Tri-state truth value for gate evaluation.
///
/// # Invariants
/// - Represents a closed set of truth values: true, false, or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriState {
    /// Definitively true.
    True,
    /// Definitively false.
    False,
    /// Indeterminate; the predicate did not apply (skipped).
    Unknown,
}

impl TriState {
    /// Returns true if the value is `True`.
    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::True)
    }

    /// Returns true if the value is `False`.
    #[must_use]
    pub const fn is_false(self) -> bool {
        matches!(self, Self::False)
    }

    /// Returns true if the value is `Unknown`.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

// ============================================================================
// SECTION: Folding
// ============================================================================

/// Folds a sequence of gate outcomes into an overall tri-state.
///
/// `Unknown` entries are skipped: they contribute neither a pass nor a fail.
/// The fold is `True` iff every non-`Unknown` entry is `True` (vacuously
/// `True` when every entry is `Unknown`, matching the "pass by convention
/// when no gate applies" rule).
#[must_use]
pub fn fold_overall<I: IntoIterator<Item = TriState>>(outcomes: I) -> TriState {
    let saw_false = outcomes.into_iter().any(|outcome| outcome == TriState::False);
    if saw_false { TriState::False } else { TriState::True }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

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
    fn is_true_false_unknown() {
        assert!(TriState::True.is_true());
        assert!(TriState::False.is_false());
        assert!(TriState::Unknown.is_unknown());
        assert!(!TriState::True.is_false());
    }

    #[test]
    fn from_bool() {
        assert_eq!(TriState::from(true), TriState::True);
        assert_eq!(TriState::from(false), TriState::False);
    }

    #[test]
    fn fold_empty_is_vacuously_true() {
        assert_eq!(fold_overall(Vec::new()), TriState::True);
    }

    #[test]
    fn fold_all_unknown_is_true_by_convention() {
        assert_eq!(
            fold_overall([TriState::Unknown, TriState::Unknown]),
            TriState::True
        );
    }

    #[test]
    fn fold_any_false_is_false() {
        assert_eq!(
            fold_overall([TriState::True, TriState::False, TriState::Unknown]),
            TriState::False
        );
    }

    #[test]
    fn fold_all_true_is_true() {
        assert_eq!(fold_overall([TriState::True, TriState::True]), TriState::True);
    }
}
