//! Shared test utilities for the hostguard workspace.
//!
//! Lives outside `#[cfg(test)]` because `xtask` normalizes reports at runtime too.

use serde_json::Value;

pub const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";
pub const VERSION_PLACEHOLDER: &str = "__VERSION__";

/// Normalize the fields of a run report that differ between runs, for golden comparison.
///
/// Only the root envelope is touched (`tool.version`, `run.started_at`, `run.finished_at`,
/// `run.duration_ms`). Rule descriptions and manual instructions are user text and may
/// legitimately contain anything, so nested objects are left alone.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    let Some(root) = value.as_object_mut() else {
        return value;
    };
    let is_envelope = ["schema", "tool", "run", "tally", "rules"]
        .iter()
        .all(|k| root.contains_key(*k));
    if !is_envelope {
        return value;
    }

    if let Some(tool) = root.get_mut("tool").and_then(Value::as_object_mut)
        && tool.contains_key("version")
    {
        tool.insert("version".to_string(), VERSION_PLACEHOLDER.into());
    }

    if let Some(run) = root.get_mut("run").and_then(Value::as_object_mut) {
        for key in ["started_at", "finished_at"] {
            if run.contains_key(key) {
                run.insert(key.to_string(), TIMESTAMP_PLACEHOLDER.into());
            }
        }
        if run.contains_key("duration_ms") {
            run.insert("duration_ms".to_string(), Value::Number(0.into()));
        }
    }
    value
}
