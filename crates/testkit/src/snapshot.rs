//! Golden-file snapshots of session state.
//!
//! Snapshots are stored as pretty JSON with object keys sorted so that map
//! ordering never causes churn. Set `ARPLACE_UPDATE_SNAPSHOTS=1` to rewrite
//! the golden files instead of comparing against them.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Environment variable that enables snapshot updates.
pub const UPDATE_SNAPSHOTS_ENV: &str = "ARPLACE_UPDATE_SNAPSHOTS";

/// Compare `value` with the golden JSON at `path`.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let actual = to_canonical_json(value)?;

    if update_requested() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return fs::write(path, &actual)
            .with_context(|| format!("Failed to write snapshot {}", path.display()));
    }

    let expected = fs::read_to_string(path).with_context(|| {
        format!(
            "Snapshot missing at {} (rerun with {UPDATE_SNAPSHOTS_ENV}=1)",
            path.display()
        )
    })?;

    // Tolerate CRLF checkouts.
    let expected = expected.replace("\r\n", "\n");
    if let Some((line, want, got)) = first_difference(&expected, &actual) {
        anyhow::bail!(
            "Snapshot mismatch at {} line {line}: expected `{want}`, got `{got}` (rerun with {UPDATE_SNAPSHOTS_ENV}=1)",
            path.display()
        );
    }
    Ok(())
}

fn update_requested() -> bool {
    std::env::var(UPDATE_SNAPSHOTS_ENV)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Serialize `value` as pretty JSON with sorted keys and a trailing newline.
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize snapshot value")?;
    let mut text = serde_json::to_string_pretty(&sort_keys(value))?;
    text.push('\n');
    Ok(text)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn first_difference(expected: &str, actual: &str) -> Option<(usize, String, String)> {
    let mut want = expected.lines();
    let mut got = actual.lines();
    let mut line = 1;
    loop {
        match (want.next(), got.next()) {
            (None, None) => return None,
            (w, g) if w == g => line += 1,
            (w, g) => {
                return Some((
                    line,
                    w.unwrap_or("<eof>").to_string(),
                    g.unwrap_or("<eof>").to_string(),
                ))
            }
        }
    }
}
