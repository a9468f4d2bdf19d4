// crates/auditgate-blocks/src/brand_tokens.rs
// ============================================================================
// Module: brand.tokens Block
// Description: Flags design token names that do not start with a configured
//              naming prefix.
// Purpose: Reference block exercising grouped-map input and meta-merge.
// Dependencies: auditgate-core, serde_json
// ============================================================================

//! ## Overview
//! Reads a declared JSON input shaped `{"tokens": {<group>: {<name>:
//! <value>}}, "naming_prefix": ...}`; falls back to a two-token baked
//! default and prefix `"fb-"`. `metrics` carries `tokens_total` and
//! `tokens_bad` as numeric counts alongside `prefix`, the configured naming
//! prefix, as a [`MetricValue::Text`] entry — a gate can compare the counts
//! but never the prefix itself.

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
use serde_json::Value;

const BLOCK_ID: &str = "brand.tokens@1.0.0";
const DEFAULT_PREFIX: &str = "fb-";

fn default_tokens() -> BTreeMap<String, BTreeMap<String, Value>> {
    BTreeMap::from([(
        "color".to_owned(),
        BTreeMap::from([
            ("fb-primary".to_owned(), json!("#1D3557")),
            ("fb-accent".to_owned(), json!("#E63946")),
        ]),
    )])
}

#[derive(Debug, Deserialize)]
struct TokensConfig {
    #[serde(default = "default_tokens")]
    tokens: BTreeMap<String, BTreeMap<String, Value>>,
    #[serde(default)]
    naming_prefix: Option<String>,
}

/// Flags token names that do not start with the configured naming prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrandTokensBlock;

impl Block for BrandTokensBlock {
    fn block_id(&self) -> &str {
        BLOCK_ID
    }

    fn run(&self, inputs: &[String], outputs: &[String]) -> Result<Option<BlockResult>, BlockExecutionError> {
        let (tokens, prefix) = read_config(inputs)?;

        let mut total = 0i64;
        let mut bad = 0i64;
        let mut issues = Vec::new();
        for (group, entries) in &tokens {
            for name in entries.keys() {
                total += 1;
                if name.starts_with(&prefix) {
                    continue;
                }
                bad += 1;
                issues.push(Issue {
                    id: format!("brand.tokens-naming:{name}"),
                    severity: "minor".to_owned(),
                    confidence: 0.9,
                    location: BTreeMap::new(),
                    evidence: BTreeMap::from([
                        ("type".to_owned(), json!("token_name")),
                        ("note".to_owned(), json!(name)),
                    ]),
                    rationale: format!("Token names must start with prefix '{prefix}'"),
                    suggested_fix: format!("Rename to '{prefix}{name}'"),
                    meta: BTreeMap::from([("group".to_owned(), json!(group))]),
                });
            }
        }

        for output in outputs {
            if output.ends_with(".json") {
                let body = json!({ "tokens": tokens });
                let text = serde_json::to_string_pretty(&body)
                    .unwrap_or_else(|_| "{}".to_owned());
                std::fs::write(output, text)
                    .map_err(|source| BlockExecutionError::OutputWrite { path: output.clone(), source })?;
            }
        }

        let status = if bad == 0 { CheckStatus::Pass } else { CheckStatus::Fail };
        let metrics = BTreeMap::from([
            ("tokens_total".to_owned(), MetricValue::Number(total as f64)),
            ("tokens_bad".to_owned(), MetricValue::Number(bad as f64)),
            ("prefix".to_owned(), MetricValue::Text(prefix)),
        ]);

        let tokens_value = tokens
            .into_iter()
            .map(|(group, entries)| (group, Value::Object(entries.into_iter().collect())))
            .collect::<serde_json::Map<String, Value>>();

        Ok(Some(BlockResult {
            block_id: BLOCK_ID.to_owned(),
            check_results: vec![RawCheckResult {
                check_id: "brand.tokens-naming".to_owned(),
                block_id: BLOCK_ID.to_owned(),
                status,
                metrics,
                issues,
            }],
            meta: BTreeMap::from([("tokens".to_owned(), Value::Object(tokens_value))]),
        }))
    }
}

fn read_config(inputs: &[String]) -> Result<(BTreeMap<String, BTreeMap<String, Value>>, String), BlockExecutionError> {
    for path in inputs {
        if path.ends_with(".json") && std::path::Path::new(path).is_file() {
            let text = std::fs::read_to_string(path)
                .map_err(|source| BlockExecutionError::InputRead { path: path.clone(), source })?;
            if let Ok(config) = serde_json::from_str::<TokensConfig>(&text) {
                return Ok((config.tokens, config.naming_prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_owned())));
            }
        }
    }
    Ok((default_tokens(), DEFAULT_PREFIX.to_owned()))
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
    fn default_tokens_all_conform() {
        let block = BrandTokensBlock;
        let result = block.run(&[], &[]).expect("block runs").expect("result present");
        let check = &result.check_results[0];
        assert_eq!(check.status, CheckStatus::Pass);
        assert!((metric_f64(check, "tokens_bad") - 0.0).abs() < f64::EPSILON);
        assert_eq!(check.metrics["prefix"], MetricValue::Text(DEFAULT_PREFIX.to_owned()));
    }

    #[test]
    fn non_conforming_name_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tokens.json");
        std::fs::write(
            &path,
            r#"{"tokens":{"color":{"fb-primary":"#1D3557","primary":"#E63946"}},"naming_prefix":"fb-"}"#,
        )
        .expect("write");
        let block = BrandTokensBlock;
        let result = block
            .run(&[path.to_string_lossy().into_owned()], &[])
            .expect("block runs")
            .expect("result present");
        let check = &result.check_results[0];
        assert_eq!(check.status, CheckStatus::Fail);
        assert!((metric_f64(check, "tokens_total") - 2.0).abs() < f64::EPSILON);
        assert!((metric_f64(check, "tokens_bad") - 1.0).abs() < f64::EPSILON);
        assert_eq!(check.metrics["prefix"], MetricValue::Text("fb-".to_owned()));
    }
}
