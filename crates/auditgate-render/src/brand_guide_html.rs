// crates/auditgate-render/src/brand_guide_html.rs
// ============================================================================
// Module: brand-guide.html Renderer
// Description: Static HTML presentation projection of palettes, color
//              tokens, and an issue-counts table.
// Purpose: Give a designer-facing view that degrades gracefully when a run
//          carries no brand metadata.
// Dependencies: auditgate-core, serde_json
// ============================================================================

//! ## Overview
//! The Palettes and Tokens sections read `meta.palettes`/`meta.tokens.color`
//! respectively and degrade to an `<em>None</em>` placeholder when absent.
//! The counts table groups issues by `(check_id, severity)` in sorted order.

use std::collections::BTreeMap;

use auditgate_core::CanonicalRun;
use serde_json::Value;

use crate::error::RenderError;

const TEMPLATE: &str = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>Brand Guide (Projection)</title>
    <style>
      body { font-family: -apple-system, system-ui, Segoe UI, Roboto, sans-serif; margin: 40px; }
      h1 { margin-bottom: 0; }
      .meta { color: #666; }
      .section { margin: 24px 0; }
      .swatch { display: inline-block; width: 80px; height: 40px; margin: 6px; border: 1px solid #ddd; }
      .token { font-family: ui-monospace, SFMono-Regular, Menlo, monospace; background: #f5f5f5; padding: 2px 6px; border-radius: 4px; }
      table { border-collapse: collapse; }
      th, td { border: 1px solid #ddd; padding: 6px 10px; }
    </style>
  </head>
  <body>
    <h1>Brand Guide</h1>
    <div class="meta">Suite: {{suite}} &bull; Run: {{run_id}}</div>

    <div class="section">
      <h2>Palettes</h2>
      {{palette_html}}
    </div>

    <div class="section">
      <h2>Tokens (Color)</h2>
      {{token_html}}
    </div>

    <div class="section">
      <h2>Issues Summary</h2>
      <table>
        <thead><tr><th>Check</th><th>Severity</th><th>Count</th></tr></thead>
        <tbody>
          {{issue_rows}}
        </tbody>
      </table>
    </div>
  </body>
</html>
"#;

/// Renders `run` as the static brand-guide HTML presentation.
///
/// # Errors
/// This renderer never fails on a well-formed `CanonicalRun`; the `Result`
/// is kept for symmetry with the other profile renderers.
pub fn render(run: &CanonicalRun) -> Result<String, RenderError> {
    let palette_html = render_palettes(&run.meta);
    let token_html = render_tokens(&run.meta);
    let issue_rows = render_issue_rows(run);

    let html = TEMPLATE
        .replace("{{suite}}", &html_escape(&run.run.suite))
        .replace("{{run_id}}", &html_escape(run.run.id.as_str()))
        .replace("{{palette_html}}", &palette_html)
        .replace("{{token_html}}", &token_html)
        .replace("{{issue_rows}}", &issue_rows);
    Ok(html)
}

fn render_palettes(meta: &BTreeMap<String, Value>) -> String {
    let Some(Value::Array(palettes)) = meta.get("palettes") else {
        return "<em>None</em>".to_owned();
    };
    if palettes.is_empty() {
        return "<em>None</em>".to_owned();
    }
    palettes
        .iter()
        .flat_map(|palette| palette.get("colors").and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_str)
        .map(|color| format!(r#"<div class="swatch" title="{color}" style="background:{color}"></div>"#))
        .collect()
}

fn render_tokens(meta: &BTreeMap<String, Value>) -> String {
    let color_tokens = meta
        .get("tokens")
        .and_then(|tokens| tokens.get("color"))
        .and_then(Value::as_object);
    let Some(color_tokens) = color_tokens else {
        return "<em>None</em>".to_owned();
    };
    if color_tokens.is_empty() {
        return "<em>None</em>".to_owned();
    }
    let items: String = color_tokens
        .iter()
        .map(|(name, value)| {
            let value_text = value.as_str().map_or_else(|| value.to_string(), ToOwned::to_owned);
            format!(r#"<li><span class="token">{name}</span>: {value_text}</li>"#)
        })
        .collect();
    format!("<ul>{items}</ul>")
}

fn render_issue_rows(run: &CanonicalRun) -> String {
    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
    for result in &run.results {
        for issue in &result.issues {
            let severity = if issue.severity.is_empty() { "unknown".to_owned() } else { issue.severity.clone() };
            *counts.entry((result.check_id.clone(), severity)).or_insert(0) += 1;
        }
    }
    if counts.is_empty() {
        return "<tr><td colspan=3><em>No issues</em></td></tr>".to_owned();
    }
    counts
        .into_iter()
        .map(|((check, severity), count)| format!("<tr><td>{check}</td><td>{severity}</td><td>{count}</td></tr>"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
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
    use serde_json::json;
    use time::OffsetDateTime;

    #[test]
    fn empty_meta_degrades_to_none_placeholders() {
        let started = OffsetDateTime::from_unix_timestamp(0).expect("valid epoch");
        let run = CanonicalRun::new("demo", started);
        let html = render(&run).expect("render succeeds");
        assert_eq!(html.matches("<em>None</em>").count(), 2);
        assert!(html.contains("<em>No issues</em>"));
    }

    #[test]
    fn populated_palette_renders_swatches() {
        let started = OffsetDateTime::from_unix_timestamp(0).expect("valid epoch");
        let mut run = CanonicalRun::new("demo", started);
        run.meta.insert(
            "palettes".to_owned(),
            json!([{ "name": "default", "colors": ["#111111", "#FFFFFF"] }]),
        );
        let html = render(&run).expect("render succeeds");
        assert_eq!(html.matches("swatch").count(), 4);
    }
}
