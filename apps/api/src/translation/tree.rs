//! String-leaf traversal over `serde_json::Value`.
//!
//! Both walks visit leaves in the same order (arrays front to back, objects in
//! key order), so a list collected by one can be fed back through the other.

use serde_json::Value;

/// Whether a leaf carries text worth translating. Blank and purely numeric strings are skipped.
pub fn is_translatable(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

pub fn collect_string_leaves(value: &Value) -> Vec<&str> {
    let mut leaves = Vec::new();
    collect_into(value, &mut leaves);
    leaves
}

fn collect_into<'a>(value: &'a Value, leaves: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => leaves.push(s),
        Value::Array(items) => items.iter().for_each(|v| collect_into(v, leaves)),
        Value::Object(map) => map.values().for_each(|v| collect_into(v, leaves)),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Replaces every string leaf with `f(leaf)?`. Keys and non-string values are left untouched.
pub fn map_string_leaves<F, E>(value: Value, f: &mut F) -> Result<Value, E>
where
    F: FnMut(String) -> Result<String, E>,
{
    Ok(match value {
        Value::String(s) => Value::String(f(s)?),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| map_string_leaves(v, f))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| map_string_leaves(v, f).map(|v| (k, v)))
                .collect::<Result<_, _>>()?,
        ),
        other => other,
    })
}
