// crates/auditgate-render/src/exec_csv.rs
// ============================================================================
// Module: exec.csv Renderer
// Description: Executive summary, one row per issue, RFC 4180-escaped.
// Purpose: Give a non-technical reader a flat, spreadsheet-friendly view.
// Dependencies: auditgate-core, csv
// ============================================================================

//! ## Overview
//! Header row is `check_id,status,url,selector,severity`. A check with no
//! issues still contributes a single row with empty `url`/`selector`/
//! `severity`.

use auditgate_core::CanonicalRun;

use crate::error::RenderError;

/// Renders `run` as an executive-summary CSV: one row per issue, or one
/// empty-field row per issueless check.
///
/// # Errors
/// Returns [`RenderError::Format`] if the CSV writer fails.
pub fn render(run: &CanonicalRun) -> Result<String, RenderError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    let to_err = |source: csv::Error| RenderError::Format { profile: "exec.csv".to_owned(), detail: source.to_string() };

    writer
        .write_record(["check_id", "status", "url", "selector", "severity"])
        .map_err(to_err)?;

    for result in &run.results {
        let status = result.status.to_string();
        if result.issues.is_empty() {
            writer
                .write_record([result.check_id.as_str(), status.as_str(), "", "", ""])
                .map_err(to_err)?;
            continue;
        }
        for issue in &result.issues {
            let url = issue.location.get("url").map_or("", String::as_str);
            let selector = issue.location.get("selector").map_or("", String::as_str);
            writer
                .write_record([
                    result.check_id.as_str(),
                    status.as_str(),
                    url,
                    selector,
                    issue.severity.as_str(),
                ])
                .map_err(to_err)?;
        }
    }

    let bytes = writer.into_inner().map_err(|source| RenderError::Format {
        profile: "exec.csv".to_owned(),
        detail: source.to_string(),
    })?;
    String::from_utf8(bytes)
        .map_err(|source| RenderError::Format { profile: "exec.csv".to_owned(), detail: source.to_string() })
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
    use auditgate_core::model::CheckStatus;
    use auditgate_core::model::Issue;
    use auditgate_core::run::CheckResult;
    use std::collections::BTreeMap;
    use time::OffsetDateTime;

    #[test]
    fn issueless_check_contributes_one_empty_row() {
        let started = OffsetDateTime::from_unix_timestamp(0).expect("valid epoch");
        let mut run = CanonicalRun::new("demo", started);
        run.results.push(CheckResult {
            check_id: "links.broken".to_owned(),
            block_id: "site.links-assets@1.0.0".to_owned(),
            status: CheckStatus::Pass,
            metrics: BTreeMap::new(),
            issues: Vec::new(),
        });
        let rendered = render(&run).expect("render succeeds");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "links.broken,pass,,,");
    }

    #[test]
    fn one_row_per_issue() {
        let started = OffsetDateTime::from_unix_timestamp(0).expect("valid epoch");
        let mut run = CanonicalRun::new("demo", started);
        run.results.push(CheckResult {
            check_id: "a11y.img-alt".to_owned(),
            block_id: "site.a11y@1.0.0".to_owned(),
            status: CheckStatus::Fail,
            metrics: BTreeMap::new(),
            issues: vec![Issue {
                id: "img-1".to_owned(),
                severity: "major".to_owned(),
                confidence: 0.9,
                location: BTreeMap::from([("selector".to_owned(), "img:nth-of-type(1)".to_owned())]),
                evidence: BTreeMap::new(),
                rationale: String::new(),
                suggested_fix: String::new(),
                meta: BTreeMap::new(),
            }],
        });
        let rendered = render(&run).expect("render succeeds");
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.contains("a11y.img-alt,fail,,img:nth-of-type(1),major"));
    }
}
