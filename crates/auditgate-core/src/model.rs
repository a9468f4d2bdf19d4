// crates/auditgate-core/src/model.rs
// ============================================================================
// Module: Spec Data Model
// Description: Typed representation of a pipeline spec (suite, steps, gates,
//              output profiles) and the block result wire shape.
// Purpose: Give every other component a single, shared vocabulary for the
//          spec and for what a block may return.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Types in this module mirror the YAML spec wire format and the JSON
//! `BlockResult` contract a block may optionally return. They carry no
//! behavior beyond `serde` (de)serialization and small accessors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Spec
// ============================================================================

/// A validated or about-to-be-validated pipeline spec.
///
/// # Invariants
/// - `suite` is non-empty once loaded from YAML (enforced by the validator,
///   not by this type, since an invalid spec must still be representable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spec {
    /// Name of this pipeline spec instance.
    pub suite: String,
    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered sequence of steps to execute.
    #[serde(default)]
    pub pipeline: Vec<Step>,
    /// Gate predicates evaluated against the canonical run.
    #[serde(default)]
    pub gates: Vec<Gate>,
    /// Output rendering configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output rendering configuration (the `output:` spec key).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Requested render profiles, in declaration order.
    #[serde(default)]
    pub profiles: Vec<String>,
}

/// A single pipeline step binding a block identifier to inputs/outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Step name; defaulted to `step_{index}` by the loader when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Block identifier (e.g. `site.a11y`).
    pub block: String,
    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Declared input paths; may contain `*`/`?` glob wildcards.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Declared output paths.
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl Step {
    /// Returns this step's effective name, defaulting to `step_{index}`.
    #[must_use]
    pub fn effective_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("step_{index}"))
    }

    /// Returns true if any declared input contains a glob wildcard.
    #[must_use]
    pub fn has_glob_input(input: &str) -> bool {
        input.contains('*') || input.contains('?')
    }
}

// ============================================================================
// SECTION: Output Profiles
// ============================================================================

/// The closed set of renderable output profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputProfile {
    /// Pretty-printed mirror of the canonical run.
    DeveloperJson,
    /// Executive summary, one row per issue.
    ExecCsv,
    /// Static HTML presentation projection.
    BrandGuideHtml,
}

impl OutputProfile {
    /// All profiles in the closed set, in a stable order.
    pub const ALL: [Self; 3] = [Self::DeveloperJson, Self::ExecCsv, Self::BrandGuideHtml];

    /// Returns the wire/file-name form of this profile.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeveloperJson => "developer.json",
            Self::ExecCsv => "exec.csv",
            Self::BrandGuideHtml => "brand-guide.html",
        }
    }

    /// Parses a profile name, returning `None` for anything outside the
    /// closed set.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|profile| profile.as_str() == name)
    }
}

impl std::fmt::Display for OutputProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Gates
// ============================================================================

/// The closed set of global (run-wide) gate metrics.
pub const GLOBAL_GATE_METRICS: [&str; 5] = [
    "issues_total",
    "issues_critical",
    "issues_major",
    "issues_minor",
    "issues_info",
];

/// A gate predicate, tagged by whether it compares global counts or a
/// specific check's metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gate {
    /// Compares an aggregate count (`issues_total` and friends).
    Global {
        /// Metric name, drawn from [`GLOBAL_GATE_METRICS`].
        metric: String,
        /// Comparison operator.
        op: GateOp,
        /// Right-hand side value.
        value: i64,
    },
    /// Compares one named check's metric.
    Check {
        /// The `check_id` this gate targets.
        check_id: String,
        /// Metric name within that check's `metrics` map.
        metric: String,
        /// Comparison operator.
        op: GateOp,
        /// Right-hand side value.
        value: i64,
    },
}

/// Comparison operators usable in a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateOp {
    /// `==`
    #[serde(rename = "==")]
    Eq,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `<=`
    #[serde(rename = "<=")]
    Le,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `>=`
    #[serde(rename = ">=")]
    Ge,
}

impl GateOp {
    /// Evaluates `lhs <op> rhs`.
    #[must_use]
    pub const fn apply(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
        }
    }

    /// Returns the wire form of this operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl std::fmt::Display for GateOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Block Result Wire Shape
// ============================================================================

/// The optional structured value a block's entry point may return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockResult {
    /// Versioned block identifier, e.g. `brand.palette@1.0.0`.
    pub block_id: String,
    /// One or more structured check results.
    #[serde(default)]
    pub check_results: Vec<RawCheckResult>,
    /// Free-form metadata merged into the run's meta (last-write-wins).
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
}

/// A single check's structured report, as returned by a block.
///
/// This is distinct from [`crate::run::CheckResult`]: the raw form is what a
/// block hands back; the canonical form is what the executor appends to the
/// run after stamping it in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCheckResult {
    /// Stable identifier for this check, unique within a run.
    pub check_id: String,
    /// Identifier of the block that produced this result.
    pub block_id: String,
    /// Pass/fail/error status.
    pub status: CheckStatus,
    /// Named metrics produced by the check; most are numeric counts, but a
    /// block may also report a descriptive label (e.g. a configured naming
    /// prefix) a gate can never compare against.
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricValue>,
    /// Individual findings.
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// A single entry in a check's `metrics` map.
///
/// Gates only ever compare [`Self::Number`] values (see
/// [`crate::gate::GateEvaluator`]); [`Self::Text`] entries exist purely to
/// carry a descriptive value (such as `brand.tokens-naming`'s configured
/// prefix) without widening the map to hold unrelated free-form JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// A numeric count, usable as the left-hand side of a gate comparison.
    Number(f64),
    /// A descriptive, non-comparable label.
    Text(String),
}

impl MetricValue {
    /// Returns the numeric value, or `None` if this metric is a text label.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

/// The status of a single check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// The check found no violations.
    Pass,
    /// The check found at least one violation.
    Fail,
    /// The check could not complete.
    Error,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Error => "error",
        };
        f.write_str(text)
    }
}

/// A single finding within a check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Stable identifier suitable as a deduplication key.
    pub id: String,
    /// Severity label. Kept as free text (not a closed enum) because the
    /// aggregator must still count unrecognized severities toward
    /// `issues_total`; see [`Severity::parse`] for the recognized subset.
    pub severity: String,
    /// Confidence in `[0, 1]`.
    #[serde(default)]
    pub confidence: f64,
    /// Optional location hints (`url`, `selector`, `viewport`).
    #[serde(default)]
    pub location: BTreeMap<String, String>,
    /// Evidence describing why this issue was raised.
    #[serde(default)]
    pub evidence: BTreeMap<String, Value>,
    /// Human-readable rationale.
    #[serde(default)]
    pub rationale: String,
    /// Suggested remediation.
    #[serde(default)]
    pub suggested_fix: String,
    /// Free-form metadata.
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
}

/// The closed set of recognized issue severities used by gate aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Critical severity.
    Critical,
    /// Major severity.
    Major,
    /// Minor severity.
    Minor,
    /// Informational severity.
    Info,
}

impl Severity {
    /// Parses a severity string case-insensitively; returns `None` for any
    /// value outside the closed set (it still counts toward
    /// `issues_total`, just not toward a per-severity bucket).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "major" => Some(Self::Major),
            "minor" => Some(Self::Minor),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    /// Returns the global gate metric name for this severity
    /// (e.g. `issues_major`).
    #[must_use]
    pub const fn metric_name(self) -> &'static str {
        match self {
            Self::Critical => "issues_critical",
            Self::Major => "issues_major",
            Self::Minor => "issues_minor",
            Self::Info => "issues_info",
        }
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

    #[test]
    fn step_defaults_name_from_index() {
        let step = Step {
            name: None,
            block: "site.a11y".to_owned(),
            description: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
        };
        assert_eq!(step.effective_name(2), "step_2");
    }

    #[test]
    fn glob_detection() {
        assert!(Step::has_glob_input("fixtures/*.html"));
        assert!(Step::has_glob_input("fixtures/file?.html"));
        assert!(!Step::has_glob_input("fixtures/file.html"));
    }

    #[test]
    fn profile_round_trip() {
        for profile in OutputProfile::ALL {
            assert_eq!(OutputProfile::parse(profile.as_str()), Some(profile));
        }
        assert_eq!(OutputProfile::parse("unknown.format"), None);
    }

    #[test]
    fn gate_op_apply() {
        assert!(GateOp::Le.apply(0, 0));
        assert!(!GateOp::Le.apply(2, 0));
        assert!(GateOp::Gt.apply(3, 2));
    }

    #[test]
    fn severity_parse_is_case_insensitive() {
        assert_eq!(Severity::parse("MAJOR"), Some(Severity::Major));
        assert_eq!(Severity::parse("unknown-severity"), None);
    }

    #[test]
    fn gate_deserializes_tagged_variants() {
        let global: Gate =
            serde_json::from_str(r#"{"type":"global","metric":"issues_total","op":"<=","value":0}"#)
                .expect("valid global gate json");
        assert!(matches!(global, Gate::Global { .. }));

        let check: Gate = serde_json::from_str(
            r#"{"type":"check","check_id":"a11y.img-alt","metric":"missing_alt","op":"==","value":0}"#,
        )
        .expect("valid check gate json");
        assert!(matches!(check, Gate::Check { .. }));
    }
}
