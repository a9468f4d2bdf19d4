// crates/auditgate-core/src/gate.rs
// ============================================================================
// Module: Gate Evaluator
// Description: Evaluates gate predicates against a canonical run's
//              aggregated metrics and folds them into an overall status.
// Purpose: Decide pass/fail for a run without re-walking `results` per gate.
// Dependencies: auditgate-tristate
// ============================================================================

//! ## Overview
//! [`GateEvaluator::evaluate`] computes the five global counts once, then
//! walks `spec.gates` in order. Each gate's outcome is a
//! [`auditgate_tristate::TriState`] rather than `Option<bool>`: a skipped
//! gate is `Unknown`, a first-class value, not an absence.

use std::collections::BTreeMap;

use auditgate_tristate::fold_overall;
use auditgate_tristate::TriState;

use crate::model::Gate;
use crate::model::Severity;
use crate::run::CanonicalRun;

/// One gate's evaluation outcome.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GateOutcome {
    /// Human-readable description of the gate, e.g. `issues_total <= 0`.
    pub description: String,
    /// The observed left-hand value, if the gate applied.
    pub observed: Option<i64>,
    /// Tri-state result: `True`/`False`, or `Unknown` if skipped.
    pub outcome: TriState,
    /// Present iff `outcome` is `Unknown`: why this gate was skipped.
    pub skip_reason: Option<String>,
}

/// The result of evaluating every gate in a spec against a run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GateReport {
    /// Aggregate counts computed once over `results`.
    pub counts: BTreeMap<String, i64>,
    /// Per-gate outcomes, in declaration order.
    pub gates: Vec<GateOutcome>,
    /// Overall pass/fail: `True` iff every non-skipped gate passed.
    pub overall: bool,
}

/// Evaluates gate predicates against a canonical run.
#[derive(Debug, Default, Clone, Copy)]
pub struct GateEvaluator;

impl GateEvaluator {
    /// Evaluates every gate in `gates` against `run`.
    #[must_use]
    pub fn evaluate(&self, gates: &[Gate], run: &CanonicalRun) -> GateReport {
        let counts = Self::aggregate_counts(run);

        let outcomes: Vec<GateOutcome> = gates
            .iter()
            .map(|gate| Self::evaluate_gate(gate, &counts, run))
            .collect();

        let overall = fold_overall(outcomes.iter().map(|outcome| outcome.outcome)).is_true();

        GateReport { counts, gates: outcomes, overall }
    }

    fn aggregate_counts(run: &CanonicalRun) -> BTreeMap<String, i64> {
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        let mut total = 0i64;
        for result in &run.results {
            for issue in &result.issues {
                total += 1;
                if let Some(severity) = Severity::parse(&issue.severity) {
                    *counts.entry(severity.metric_name().to_owned()).or_insert(0) += 1;
                }
            }
        }
        counts.insert("issues_total".to_owned(), total);
        counts
    }

    fn evaluate_gate(gate: &Gate, counts: &BTreeMap<String, i64>, run: &CanonicalRun) -> GateOutcome {
        match gate {
            Gate::Global { metric, op, value } => {
                let Some(observed) = counts.get(metric).copied() else {
                    return GateOutcome {
                        description: format!("{metric} {op} {value}"),
                        observed: None,
                        outcome: TriState::Unknown,
                        skip_reason: Some(format!("unrecognized global metric '{metric}'")),
                    };
                };
                GateOutcome {
                    description: format!("{metric} {op} {value}"),
                    observed: Some(observed),
                    outcome: TriState::from(op.apply(observed, *value)),
                    skip_reason: None,
                }
            }
            Gate::Check { check_id, metric, op, value } => {
                let Some(check) = run.find_check(check_id) else {
                    return GateOutcome {
                        description: format!("{check_id}.{metric} {op} {value}"),
                        observed: None,
                        outcome: TriState::Unknown,
                        skip_reason: Some(format!("check_id '{check_id}' not found in run")),
                    };
                };
                let Some(raw) = check.metrics.get(metric) else {
                    return GateOutcome {
                        description: format!("{check_id}.{metric} {op} {value}"),
                        observed: None,
                        outcome: TriState::Unknown,
                        skip_reason: Some(format!("metric '{metric}' not found on check '{check_id}'")),
                    };
                };
                let Some(observed) = raw.as_f64() else {
                    return GateOutcome {
                        description: format!("{check_id}.{metric} {op} {value}"),
                        observed: None,
                        outcome: TriState::Unknown,
                        skip_reason: Some(format!("metric '{metric}' on check '{check_id}' is not numeric")),
                    };
                };
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "check metrics are small counters produced in-process, never exceeding i64 range"
                )]
                let observed = observed as i64;
                GateOutcome {
                    description: format!("{check_id}.{metric} {op} {value}"),
                    observed: Some(observed),
                    outcome: TriState::from(op.apply(observed, *value)),
                    skip_reason: None,
                }
            }
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
    use crate::model::CheckStatus;
    use crate::model::GateOp;
    use crate::model::Issue;
    use crate::model::MetricValue;
    use crate::run::CheckResult;
    use std::collections::BTreeMap as Map;
    use time::OffsetDateTime;

    fn run_with_one_major_issue() -> CanonicalRun {
        let started = OffsetDateTime::from_unix_timestamp(0).expect("valid epoch");
        let mut run = CanonicalRun::new("demo", started);
        run.results.push(CheckResult {
            check_id: "a11y.img-alt".to_owned(),
            block_id: "site.a11y@1.0.0".to_owned(),
            status: CheckStatus::Fail,
            metrics: Map::from([("missing_alt".to_owned(), MetricValue::Number(1.0))]),
            issues: vec![Issue {
                id: "img-1".to_owned(),
                severity: "major".to_owned(),
                confidence: 1.0,
                location: Map::new(),
                evidence: Map::new(),
                rationale: String::new(),
                suggested_fix: String::new(),
                meta: Map::new(),
            }],
        });
        run
    }

    #[test]
    fn global_gate_fails_when_threshold_exceeded() {
        let run = run_with_one_major_issue();
        let gates = vec![Gate::Global { metric: "issues_total".to_owned(), op: GateOp::Le, value: 0 }];
        let evaluator = GateEvaluator;
        let report = evaluator.evaluate(&gates, &run);
        assert!(!report.overall);
        assert_eq!(report.gates[0].observed, Some(1));
        assert_eq!(report.gates[0].outcome, TriState::False);
    }

    #[test]
    fn unrecognized_global_metric_is_skipped_as_unknown() {
        let run = run_with_one_major_issue();
        let gates = vec![Gate::Global { metric: "bogus".to_owned(), op: GateOp::Le, value: 0 }];
        let evaluator = GateEvaluator;
        let report = evaluator.evaluate(&gates, &run);
        assert!(report.overall, "unknown gates pass by convention");
        assert_eq!(report.gates[0].outcome, TriState::Unknown);
    }

    #[test]
    fn check_gate_skipped_when_check_id_missing() {
        let run = run_with_one_major_issue();
        let gates = vec![Gate::Check {
            check_id: "absent.check".to_owned(),
            metric: "missing_alt".to_owned(),
            op: GateOp::Eq,
            value: 0,
        }];
        let evaluator = GateEvaluator;
        let report = evaluator.evaluate(&gates, &run);
        assert!(report.overall);
        assert_eq!(report.gates[0].outcome, TriState::Unknown);
    }

    #[test]
    fn check_gate_passes_on_matching_metric() {
        let run = run_with_one_major_issue();
        let gates = vec![Gate::Check {
            check_id: "a11y.img-alt".to_owned(),
            metric: "missing_alt".to_owned(),
            op: GateOp::Eq,
            value: 1,
        }];
        let evaluator = GateEvaluator;
        let report = evaluator.evaluate(&gates, &run);
        assert!(report.overall);
        assert_eq!(report.gates[0].outcome, TriState::True);
    }

    #[test]
    fn check_gate_skipped_when_metric_is_text() {
        let mut run = run_with_one_major_issue();
        run.results[0].metrics.insert("prefix".to_owned(), MetricValue::Text("fb-".to_owned()));
        let gates = vec![Gate::Check {
            check_id: "a11y.img-alt".to_owned(),
            metric: "prefix".to_owned(),
            op: GateOp::Eq,
            value: 0,
        }];
        let evaluator = GateEvaluator;
        let report = evaluator.evaluate(&gates, &run);
        assert!(report.overall);
        assert_eq!(report.gates[0].outcome, TriState::Unknown);
    }

    #[test]
    fn empty_gate_list_passes_vacuously() {
        let run = run_with_one_major_issue();
        let evaluator = GateEvaluator;
        let report = evaluator.evaluate(&[], &run);
        assert!(report.overall);
    }
}
