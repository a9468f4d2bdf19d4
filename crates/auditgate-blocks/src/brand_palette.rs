// crates/auditgate-blocks/src/brand_palette.rs
// ============================================================================
// Module: brand.palette Block
// Description: Checks every unordered pair of palette colors for WCAG 2.x
//              contrast against a configurable minimum ratio.
// Purpose: Reference block exercising the optional-output and meta-merge
//          shape of the Block contract.
// Dependencies: auditgate-core, serde_json
// ============================================================================

//! ## Overview
//! Relative luminance follows the WCAG 2.x sRGB-to-linear transform
//! (`L = 0.2126 R + 0.7152 G + 0.0722 B`); contrast is `(L1 + 0.05) / (L2 +
//! 0.05)` with `L1 >= L2`. Falls back to a five-swatch baked default and
//! `min_ratio = 4.5` when no matching JSON input is supplied.

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

const BLOCK_ID: &str = "brand.palette@1.0.0";
const DEFAULT_MIN_RATIO: f64 = 4.5;

fn default_palette() -> Vec<String> {
    ["#111111", "#FFFFFF", "#E63946", "#1D3557", "#F1FAEE"].map(ToOwned::to_owned).to_vec()
}

#[derive(Debug, Deserialize)]
struct PaletteConfig {
    #[serde(default = "default_palette")]
    palette: Vec<String>,
    #[serde(default)]
    min_ratio: Option<f64>,
}

/// Checks a color palette's pairwise contrast against a minimum ratio.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrandPaletteBlock;

impl Block for BrandPaletteBlock {
    fn block_id(&self) -> &str {
        BLOCK_ID
    }

    fn run(&self, inputs: &[String], outputs: &[String]) -> Result<Option<BlockResult>, BlockExecutionError> {
        let (colors, min_ratio) = read_config(inputs)?;

        let mut pairs_tested = 0i64;
        let mut issues = Vec::new();
        for i in 0..colors.len() {
            for j in (i + 1)..colors.len() {
                pairs_tested += 1;
                let Some(ratio) = contrast_ratio(&colors[i], &colors[j]) else { continue };
                if ratio < min_ratio {
                    issues.push(Issue {
                        id: format!("brand.palette-contrast:{}:{}", colors[i], colors[j]),
                        severity: "major".to_owned(),
                        confidence: 0.95,
                        location: BTreeMap::new(),
                        evidence: BTreeMap::from([
                            ("type".to_owned(), json!("color_pair")),
                            ("note".to_owned(), json!(format!("{} vs {}", colors[i], colors[j]))),
                        ]),
                        rationale: format!("Contrast ratio {ratio:.2} below minimum {min_ratio}"),
                        suggested_fix: "Increase contrast or adjust palette steps".to_owned(),
                        meta: BTreeMap::from([("ratio".to_owned(), json!(round2(ratio)))]),
                    });
                }
            }
        }
        let pairs_failing = issues.len() as i64;

        for output in outputs {
            if output.ends_with(".json") {
                let body = json!({ "palette": colors });
                let text = serde_json::to_string_pretty(&body)
                    .unwrap_or_else(|_| "{}".to_owned());
                std::fs::write(output, text)
                    .map_err(|source| BlockExecutionError::OutputWrite { path: output.clone(), source })?;
            }
        }

        let status = if pairs_failing == 0 { CheckStatus::Pass } else { CheckStatus::Fail };
        let metrics = BTreeMap::from([
            ("pairs_tested".to_owned(), MetricValue::Number(pairs_tested as f64)),
            ("pairs_failing".to_owned(), MetricValue::Number(pairs_failing as f64)),
            ("min_ratio".to_owned(), MetricValue::Number(min_ratio)),
        ]);

        Ok(Some(BlockResult {
            block_id: BLOCK_ID.to_owned(),
            check_results: vec![RawCheckResult {
                check_id: "brand.palette-contrast".to_owned(),
                block_id: BLOCK_ID.to_owned(),
                status,
                metrics,
                issues,
            }],
            meta: BTreeMap::from([(
                "palettes".to_owned(),
                json!([{ "name": "default", "colors": colors }]),
            )]),
        }))
    }
}

fn read_config(inputs: &[String]) -> Result<(Vec<String>, f64), BlockExecutionError> {
    for path in inputs {
        if path.ends_with(".json") && std::path::Path::new(path).is_file() {
            let text = std::fs::read_to_string(path)
                .map_err(|source| BlockExecutionError::InputRead { path: path.clone(), source })?;
            if let Ok(config) = serde_json::from_str::<PaletteConfig>(&text) {
                return Ok((config.palette, config.min_ratio.unwrap_or(DEFAULT_MIN_RATIO)));
            }
        }
    }
    Ok((default_palette(), DEFAULT_MIN_RATIO))
}

fn hex_to_rgb(hex: &str) -> Option<(f64, f64, f64)> {
    let trimmed = hex.trim().trim_start_matches('#');
    let expanded: String = if trimmed.len() == 3 {
        trimmed.chars().flat_map(|c| [c, c]).collect()
    } else {
        trimmed.to_owned()
    };
    if expanded.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some((f64::from(r) / 255.0, f64::from(g) / 255.0, f64::from(b) / 255.0))
}

fn to_linear(channel: f64) -> f64 {
    if channel <= 0.039_28 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

fn relative_luminance(rgb: (f64, f64, f64)) -> f64 {
    let (r, g, b) = rgb;
    0.2126 * to_linear(r) + 0.7152 * to_linear(g) + 0.0722 * to_linear(b)
}

fn contrast_ratio(c1: &str, c2: &str) -> Option<f64> {
    let l1 = relative_luminance(hex_to_rgb(c1)?);
    let l2 = relative_luminance(hex_to_rgb(c2)?);
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    Some((lighter + 0.05) / (darker + 0.05))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
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
    fn black_on_white_has_maximum_contrast() {
        let ratio = contrast_ratio("#000000", "#FFFFFF").expect("valid hex");
        assert!((ratio - 21.0).abs() < 0.01);
    }

    #[test]
    fn default_palette_yields_ten_pairs() {
        let block = BrandPaletteBlock;
        let result = block.run(&[], &[]).expect("block runs").expect("result present");
        let check = &result.check_results[0];
        assert!((check.metrics["pairs_tested"].as_f64().expect("numeric") - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn low_contrast_pair_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("palette.json");
        std::fs::write(&path, r#"{"palette":["#777777","#888888"],"min_ratio":4.5}"#).expect("write");
        let block = BrandPaletteBlock;
        let result = block
            .run(&[path.to_string_lossy().into_owned()], &[])
            .expect("block runs")
            .expect("result present");
        assert_eq!(result.check_results[0].status, CheckStatus::Fail);
    }
}
