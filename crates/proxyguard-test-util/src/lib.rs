//! Shared test utilities for the proxyguard workspace.
//!
//! Lives in its own crate because `xtask` needs `normalize_nondeterministic` at runtime,
//! outside `#[cfg(test)]`.

use serde_json::Value;

const ENVELOPE_KEYS: [&str; 6] = ["schema", "tool", "verdict", "summary", "endpoints", "data"];

/// Normalize non-deterministic report fields for golden comparison.
///
/// Root-only, and only when the root looks like a report envelope: `tool.version` becomes
/// `"__VERSION__"` and `data.bundle` becomes `"__BUNDLE__"`. Nested objects that happen to
/// share those keys are left alone.
///
/// Recursive: `started_at` and `finished_at` become `"__TIMESTAMP__"` at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut()
        && ENVELOPE_KEYS.iter().all(|k| obj.contains_key(*k))
    {
        if let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
            && tool.contains_key("version")
        {
            tool.insert("version".to_string(), placeholder("__VERSION__"));
        }
        if let Some(data) = obj.get_mut("data").and_then(Value::as_object_mut)
            && data.contains_key("bundle")
        {
            data.insert("bundle".to_string(), placeholder("__BUNDLE__"));
        }
    }
    normalize_timestamps(&mut value);
    value
}

fn placeholder(s: &str) -> Value {
    Value::String(s.to_string())
}

fn normalize_timestamps(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at"] {
                if map.contains_key(key) {
                    map.insert(key.to_string(), placeholder("__TIMESTAMP__"));
                }
            }
            for val in map.values_mut() {
                normalize_timestamps(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps(val);
            }
        }
        _ => {}
    }
}
