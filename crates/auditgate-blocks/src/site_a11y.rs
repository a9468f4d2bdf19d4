// crates/auditgate-blocks/src/site_a11y.rs
// ============================================================================
// Module: site.a11y Block
// Description: Flags <img> elements missing meaningful alt text.
// Purpose: Reference block exercising the text-input, zero-output shape of
//          the Block contract.
// Dependencies: auditgate-core
// ============================================================================

//! ## Overview
//! Treats `aria-hidden="true"` or `role="presentation"` as decorative and
//! exempt. Falls back to a single-image baked sample when no `.html` input
//! is supplied.

use std::collections::BTreeMap;

use auditgate_core::block::BlockExecutionError;
use auditgate_core::model::BlockResult;
use auditgate_core::model::CheckStatus;
use auditgate_core::model::Issue;
use auditgate_core::model::MetricValue;
use auditgate_core::model::RawCheckResult;
use auditgate_core::Block;
use serde_json::json;

const BLOCK_ID: &str = "site.a11y@1.0.0";
const FALLBACK_HTML: &str = "<main><img src=\"/hero.png\"><a href=\"/ok\">Ok</a></main>";

/// Scans an HTML input for images missing alt text.
#[derive(Debug, Default, Clone, Copy)]
pub struct SiteA11yBlock;

impl Block for SiteA11yBlock {
    fn block_id(&self) -> &str {
        BLOCK_ID
    }

    fn run(&self, inputs: &[String], _outputs: &[String]) -> Result<Option<BlockResult>, BlockExecutionError> {
        let html = read_first_html_input(inputs)?;

        let mut total_images = 0i64;
        let mut missing_alt = 0i64;
        let mut issues = Vec::new();

        for (index, img_tag) in iter_img_tags(&html).enumerate() {
            let ordinal = i64::try_from(index + 1).unwrap_or(i64::MAX);
            total_images += 1;
            if is_decorative(img_tag) {
                continue;
            }
            if alt_text(img_tag).is_none_or(|alt| alt.trim().is_empty()) {
                missing_alt += 1;
                issues.push(Issue {
                    id: format!("a11y.img-alt:{ordinal}"),
                    severity: "major".to_owned(),
                    confidence: 0.9,
                    location: BTreeMap::from([("selector".to_owned(), format!("img:nth-of-type({ordinal})"))]),
                    evidence: BTreeMap::from([
                        ("type".to_owned(), json!("dom")),
                        ("note".to_owned(), json!("img missing alt")),
                    ]),
                    rationale: "Images must have meaningful alternative text.".to_owned(),
                    suggested_fix: "Add descriptive alt text or mark decorative.".to_owned(),
                    meta: BTreeMap::from([("wcag".to_owned(), json!("1.1.1"))]),
                });
            }
        }

        let status = if missing_alt == 0 { CheckStatus::Pass } else { CheckStatus::Fail };
        let metrics = BTreeMap::from([
            ("total_images".to_owned(), MetricValue::Number(total_images as f64)),
            ("missing_alt".to_owned(), MetricValue::Number(missing_alt as f64)),
        ]);

        Ok(Some(BlockResult {
            block_id: BLOCK_ID.to_owned(),
            check_results: vec![RawCheckResult {
                check_id: "a11y.img-alt".to_owned(),
                block_id: BLOCK_ID.to_owned(),
                status,
                metrics,
                issues,
            }],
            meta: BTreeMap::new(),
        }))
    }
}

fn read_first_html_input(inputs: &[String]) -> Result<String, BlockExecutionError> {
    for path in inputs {
        if path.ends_with(".html") && std::path::Path::new(path).is_file() {
            return std::fs::read_to_string(path)
                .map_err(|source| BlockExecutionError::InputRead { path: path.clone(), source });
        }
    }
    Ok(FALLBACK_HTML.to_owned())
}

fn iter_img_tags(html: &str) -> impl Iterator<Item = &str> {
    let mut rest = html;
    std::iter::from_fn(move || {
        let open = {
            let lower = rest.to_ascii_lowercase();
            lower.find("<img")
        }?;
        let tag_start = open + 4;
        let remainder = &rest[tag_start..];
        let close = remainder.find('>')?;
        let attrs = &remainder[..close];
        rest = &remainder[close + 1..];
        Some(attrs)
    })
}

fn is_decorative(attrs: &str) -> bool {
    let lower = attrs.to_ascii_lowercase();
    lower.contains("aria-hidden=\"true\"") || lower.contains("role=\"presentation\"")
}

fn alt_text(attrs: &str) -> Option<&str> {
    let lower = attrs.to_ascii_lowercase();
    let rel = lower.find("alt")?;
    let after = &attrs[rel..];
    let eq = after.find('=')?;
    let value_part = after[eq + 1..].trim_start();
    let quote = value_part.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let value_body = &value_part[1..];
    let end = value_body.find(quote)?;
    Some(&value_body[..end])
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
    fn fallback_sample_flags_one_missing_alt() {
        let block = SiteA11yBlock;
        let result = block.run(&[], &[]).expect("block runs").expect("result present");
        let check = &result.check_results[0];
        assert_eq!(check.status, CheckStatus::Fail);
        assert!((metric_f64(check, "total_images") - 1.0).abs() < f64::EPSILON);
        assert!((metric_f64(check, "missing_alt") - 1.0).abs() < f64::EPSILON);
        assert_eq!(check.issues.len(), 1);
    }

    #[test]
    fn decorative_image_is_exempt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page.html");
        std::fs::write(&path, r#"<img src="x.png" aria-hidden="true">"#).expect("write");
        let block = SiteA11yBlock;
        let result = block
            .run(&[path.to_string_lossy().into_owned()], &[])
            .expect("block runs")
            .expect("result present");
        let check = &result.check_results[0];
        assert_eq!(check.status, CheckStatus::Pass);
        assert!((metric_f64(check, "missing_alt") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn image_with_alt_text_passes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page.html");
        std::fs::write(&path, r#"<img src="x.png" alt="A descriptive caption">"#).expect("write");
        let block = SiteA11yBlock;
        let result = block
            .run(&[path.to_string_lossy().into_owned()], &[])
            .expect("block runs")
            .expect("result present");
        assert_eq!(result.check_results[0].status, CheckStatus::Pass);
    }
}
