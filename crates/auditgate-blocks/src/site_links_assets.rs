// crates/auditgate-blocks/src/site_links_assets.rs
// ============================================================================
// Module: site.links-assets Block
// Description: Flags links whose recorded HTTP status is >= 400.
// Purpose: Reference block exercising the JSON-input shape of the Block
//          contract.
// Dependencies: auditgate-core, serde_json
// ============================================================================

//! ## Overview
//! Reads a declared JSON input shaped `{"links": [{"href": ..., "status":
//! ...}]}`; falls back to a two-link baked sample when no matching input is
//! supplied.

use std::collections::BTreeMap;

use auditgate_core::block::BlockExecutionError;
use auditgate_core::model::BlockResult;
use auditgate_core::model::CheckStatus;
use auditgate_core::model::Issue;
use auditgate_core::model::MetricValue;
use auditgate_core::model::RawCheckResult;
use auditgate_core::Block;
use serde::Deserialize;
use serde_json::json;

const BLOCK_ID: &str = "site.links-assets@1.0.0";

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(default)]
    href: String,
    #[serde(default)]
    status: i64,
}

#[derive(Debug, Deserialize)]
struct LinksConfig {
    links: Vec<Link>,
}

fn fallback_links() -> Vec<Link> {
    vec![
        Link { href: "/ok".to_owned(), status: 200 },
        Link { href: "/missing".to_owned(), status: 404 },
    ]
}

/// Flags links whose recorded status is a client or server error.
#[derive(Debug, Default, Clone, Copy)]
pub struct SiteLinksAssetsBlock;

impl Block for SiteLinksAssetsBlock {
    fn block_id(&self) -> &str {
        BLOCK_ID
    }

    fn run(&self, inputs: &[String], _outputs: &[String]) -> Result<Option<BlockResult>, BlockExecutionError> {
        let links = read_links(inputs)?;

        let mut broken = 0i64;
        let mut issues = Vec::new();
        for (index, link) in links.iter().enumerate() {
            if link.status < 400 {
                continue;
            }
            broken += 1;
            let key = if link.href.is_empty() { index.to_string() } else { link.href.clone() };
            let selector = if link.href.is_empty() { String::new() } else { format!("a[href='{}']", link.href) };
            issues.push(Issue {
                id: format!("links.broken:{key}"),
                severity: "major".to_owned(),
                confidence: 0.9,
                location: BTreeMap::from([("url".to_owned(), String::new()), ("selector".to_owned(), selector)]),
                evidence: BTreeMap::from([
                    ("type".to_owned(), json!("http")),
                    ("note".to_owned(), json!(format!("status {}", link.status))),
                ]),
                rationale: "Links should not return client or server errors.".to_owned(),
                suggested_fix: "Update link or fix target resource.".to_owned(),
                meta: BTreeMap::from([("status".to_owned(), json!(link.status))]),
            });
        }

        let status = if broken == 0 { CheckStatus::Pass } else { CheckStatus::Fail };
        let metrics = BTreeMap::from([
            ("links_total".to_owned(), MetricValue::Number(links.len() as f64)),
            ("links_broken".to_owned(), MetricValue::Number(broken as f64)),
        ]);

        Ok(Some(BlockResult {
            block_id: BLOCK_ID.to_owned(),
            check_results: vec![RawCheckResult {
                check_id: "links.broken".to_owned(),
                block_id: BLOCK_ID.to_owned(),
                status,
                metrics,
                issues,
            }],
            meta: BTreeMap::new(),
        }))
    }
}

fn read_links(inputs: &[String]) -> Result<Vec<Link>, BlockExecutionError> {
    for path in inputs {
        if path.ends_with(".json") && std::path::Path::new(path).is_file() {
            let text = std::fs::read_to_string(path)
                .map_err(|source| BlockExecutionError::InputRead { path: path.clone(), source })?;
            if let Ok(config) = serde_json::from_str::<LinksConfig>(&text) {
                return Ok(config.links);
            }
            return Ok(fallback_links());
        }
    }
    Ok(fallback_links())
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

    fn metric_f64(check: &auditgate_core::model::RawCheckResult, key: &str) -> f64 {
        check.metrics[key].as_f64().expect("numeric metric")
    }

    #[test]
    fn fallback_sample_has_one_broken_link() {
        let block = SiteLinksAssetsBlock;
        let result = block.run(&[], &[]).expect("block runs").expect("result present");
        let check = &result.check_results[0];
        assert_eq!(check.status, CheckStatus::Fail);
        assert!((metric_f64(check, "links_total") - 2.0).abs() < f64::EPSILON);
        assert!((metric_f64(check, "links_broken") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn all_ok_links_pass() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("links.json");
        std::fs::write(&path, r#"{"links":[{"href":"/a","status":200}]}"#).expect("write");
        let block = SiteLinksAssetsBlock;
        let result = block
            .run(&[path.to_string_lossy().into_owned()], &[])
            .expect("block runs")
            .expect("result present");
        assert_eq!(result.check_results[0].status, CheckStatus::Pass);
    }
}
