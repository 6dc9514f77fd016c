use anyhow::{anyhow, Result};
use serde_json::Value;

/// Walk a path of object keys into a JSON value.
pub fn field_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

/// Like [`field_at`], but renders the leaf as display text and names the
/// missing path on failure.
///
/// Move `u64` fields arrive as JSON strings and addresses as strings, so both
/// strings and numbers are accepted. Any other leaf is rendered as JSON.
pub fn field_text(value: &Value, path: &[&str]) -> Result<String> {
    let leaf = field_at(value, path).ok_or_else(|| anyhow!("missing field {}", path.join(".")))?;
    Ok(match leaf {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}
