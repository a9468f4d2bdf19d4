// crates/auditgate-core/src/run.rs
// ============================================================================
// Module: Canonical Run
// Description: The in-memory and persisted record of a single execution.
// Purpose: Provide the single source of truth consumed by SchemaValidator,
//          GateEvaluator, and the Renderer.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! [`CanonicalRun`] is constructed empty by the Executor, mutated only while
//! a run is in progress, then frozen. Field order mirrors the original
//! wire shape (`run`, `requested_checks`, `blocks_used`, `results`, `meta`)
//! so `developer.json` renders with a stable key order.
//!
//! Invariants:
//! - `requested_checks` and `blocks_used` never contain duplicates; see
//!   [`OrderedSet`].
//! - `started_at` is stamped once, at construction, and never rewritten.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::model::BlockResult;
use crate::model::CheckStatus;
use crate::model::Issue;
use crate::model::MetricValue;

/// Schema version stamped onto every canonical run produced by this engine.
pub const SCHEMA_VERSION: &str = "1.0.0";

// ============================================================================
// SECTION: Run Identifier
// ============================================================================

/// A stable run identifier incorporating the start instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Builds a run id from a suite name and an RFC 3339 timestamp,
    /// matching the historical `<suite>-<compact-timestamp>` shape.
    #[must_use]
    pub fn new(suite: &str, started_at: &OffsetDateTime) -> Self {
        let compact = started_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| started_at.unix_timestamp().to_string())
            .replace([':', '.', '+'], "-");
        Self(format!("{suite}-{compact}"))
    }

    /// Returns the string form of this run id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Ordered Set
// ============================================================================

/// An insertion-ordered set of strings: preserves first-insertion order
/// while rejecting duplicates.
///
/// Serializes and deserializes as a plain JSON array of its items; the
/// membership guard is private bookkeeping, not part of the wire shape.
#[derive(Debug, Clone, Default)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl Serialize for OrderedSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OrderedSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<String>::deserialize(deserializer)?;
        let seen = items.iter().cloned().collect();
        Ok(Self { items, seen })
    }
}

impl OrderedSet {
    /// Builds an empty ordered set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item` if not already present; no-op otherwise.
    pub fn insert(&mut self, item: impl Into<String>) {
        let item = item.into();
        if self.seen.insert(item.clone()) {
            self.items.push(item);
        }
    }

    /// Returns the items in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Returns the number of distinct items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if this set holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}


// ============================================================================
// SECTION: Canonical Check Result
// ============================================================================

/// The canonical, run-attached form of a check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Stable identifier for this check, unique within a run.
    pub check_id: String,
    /// Identifier of the block that produced this result.
    pub block_id: String,
    /// Pass/fail/error status.
    pub status: CheckStatus,
    /// Named metrics produced by the check; see [`MetricValue`].
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricValue>,
    /// Individual findings.
    #[serde(default)]
    pub issues: Vec<Issue>,
}

// ============================================================================
// SECTION: Run Header
// ============================================================================

/// The `run` object nested inside [`CanonicalRun`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunHeader {
    /// Stable run identifier.
    pub id: RunId,
    /// Suite name this run was produced from.
    pub suite: String,
    /// ISO-8601 UTC start instant.
    pub started_at: String,
    /// Schema version of the canonical run shape.
    pub schema_version: String,
}

// ============================================================================
// SECTION: Canonical Run
// ============================================================================

/// The engine's single source of truth for one execution.
///
/// Field order matches the historical wire shape (`run`, `requested_checks`,
/// `blocks_used`, `results`, `meta`) so `developer.json` is byte-stable for
/// identical inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalRun {
    /// Run header (id/suite/started_at/schema_version).
    pub run: RunHeader,
    /// Insertion-ordered, deduplicated set of check ids encountered.
    pub requested_checks: OrderedSet,
    /// Insertion-ordered, deduplicated set of block ids encountered.
    pub blocks_used: OrderedSet,
    /// Flat sequence of check results, in execution order.
    pub results: Vec<CheckResult>,
    /// Mapping merged from block meta plus engine-added keys.
    pub meta: BTreeMap<String, Value>,
}

impl CanonicalRun {
    /// Constructs an empty canonical run, stamping `started_at` at the
    /// current instant.
    #[must_use]
    pub fn new(suite: &str, started_at: OffsetDateTime) -> Self {
        let id = RunId::new(suite, &started_at);
        let started_at_text = started_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| started_at.unix_timestamp().to_string());
        Self {
            run: RunHeader {
                id,
                suite: suite.to_owned(),
                started_at: started_at_text,
                schema_version: SCHEMA_VERSION.to_owned(),
            },
            requested_checks: OrderedSet::new(),
            blocks_used: OrderedSet::new(),
            results: Vec::new(),
            meta: BTreeMap::new(),
        }
    }

    /// Loads a previously persisted canonical run from `path` (artifact
    /// pinning).
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not contain
    /// valid JSON matching this shape.
    pub fn load(path: &std::path::Path) -> Result<Self, crate::error::CoreError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| crate::error::CoreError::NotFound { path: path.to_owned(), source })?;
        let run: Self = serde_json::from_str(&text)
            .map_err(|source| crate::error::CoreError::ParseError { detail: source.to_string() })?;
        Ok(run)
    }

    /// Appends one block's results into this run: each `CheckResult` is
    /// appended to `results`, new `check_id`s and the `block_id` are
    /// inserted into their respective ordered sets, and `meta` is merged
    /// with last-write-wins semantics.
    pub fn absorb_block_result(&mut self, result: BlockResult) {
        self.blocks_used.insert(result.block_id.clone());
        for raw in result.check_results {
            self.requested_checks.insert(raw.check_id.clone());
            self.results.push(CheckResult {
                check_id: raw.check_id,
                block_id: raw.block_id,
                status: raw.status,
                metrics: raw.metrics,
                issues: raw.issues,
            });
        }
        for (key, value) in result.meta {
            self.meta.insert(key, value);
        }
    }

    /// Stamps `meta.overall_gate_status` with `"pass"` or `"fail"`.
    pub fn stamp_gate_status(&mut self, passed: bool) {
        let status = if passed { "pass" } else { "fail" };
        self.meta.insert("overall_gate_status".to_owned(), Value::String(status.to_owned()));
    }

    /// Looks up a check result by id.
    #[must_use]
    pub fn find_check(&self, check_id: &str) -> Option<&CheckResult> {
        self.results.iter().find(|result| result.check_id == check_id)
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
    use crate::model::RawCheckResult;
    use std::collections::BTreeMap as Map;

    #[test]
    fn ordered_set_deduplicates() {
        let mut set = OrderedSet::new();
        set.insert("a");
        set.insert("b");
        set.insert("a");
        assert_eq!(set.as_slice(), ["a".to_owned(), "b".to_owned()]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn absorb_block_result_merges_meta_last_write_wins() {
        let started = OffsetDateTime::from_unix_timestamp(0).expect("valid epoch");
        let mut run = CanonicalRun::new("demo", started);
        run.meta.insert("k".to_owned(), Value::String("first".to_owned()));

        let mut meta = Map::new();
        meta.insert("k".to_owned(), Value::String("second".to_owned()));
        run.absorb_block_result(BlockResult {
            block_id: "site.a11y@1.0.0".to_owned(),
            check_results: vec![RawCheckResult {
                check_id: "a11y.img-alt".to_owned(),
                block_id: "site.a11y@1.0.0".to_owned(),
                status: CheckStatus::Pass,
                metrics: Map::new(),
                issues: Vec::new(),
            }],
            meta,
        });

        assert_eq!(run.meta.get("k"), Some(&Value::String("second".to_owned())));
        assert_eq!(run.requested_checks.as_slice(), ["a11y.img-alt".to_owned()]);
        assert_eq!(run.blocks_used.as_slice(), ["site.a11y@1.0.0".to_owned()]);
        assert_eq!(run.results.len(), 1);
    }

    #[test]
    fn find_check_locates_by_id() {
        let started = OffsetDateTime::from_unix_timestamp(0).expect("valid epoch");
        let mut run = CanonicalRun::new("demo", started);
        run.results.push(CheckResult {
            check_id: "x".to_owned(),
            block_id: "b".to_owned(),
            status: CheckStatus::Pass,
            metrics: Map::new(),
            issues: Vec::new(),
        });
        assert!(run.find_check("x").is_some());
        assert!(run.find_check("y").is_none());
    }
}
