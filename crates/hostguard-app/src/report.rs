//! Saved run reports: JSON (de)serialization and Markdown rendering.

use anyhow::Context;
use camino::Utf8Path;
use hostguard_types::{RunReport, SCHEMA_RUN_REPORT_V1};

pub fn serialize_report(report: &RunReport) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(report).context("serialize report")?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn parse_report_json(text: &str) -> anyhow::Result<RunReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_RUN_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_RUN_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse hostguard report")
}

/// Write the report as JSON, creating parent directories as needed.
pub fn write_report(path: &Utf8Path, report: &RunReport) -> anyhow::Result<()> {
    let bytes = serialize_report(report)?;
    write_bytes(path, &bytes)
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}

fn write_bytes(path: &Utf8Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write {path}"))
}

/// Render a saved report file to Markdown.
pub fn run_markdown(report_path: &Utf8Path) -> anyhow::Result<String> {
    let text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report {report_path}"))?;
    let report = parse_report_json(&text)?;
    Ok(hostguard_render::render_markdown(&report))
}
