//! Tolerant payload coercion.
//!
//! Job payloads are human- and modeler-authored, so values arrive in loose
//! shapes: numbers as strings, booleans as "yes". Absent, blank, and
//! unparseable values all coerce to `None`; unknown fields are ignored by
//! callers simply not asking for them.

use serde_json::Value;
use tracing::warn;

use crate::job::Variables;

/// Integer field: accepts numbers and numeric strings.
pub fn get_i64(variables: &Variables, key: &str) -> Option<i64> {
    match variables.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            match s.parse::<i64>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(key, value = s, error = %e, "failed to parse integer variable");
                    None
                }
            }
        }
        _ => None,
    }
}

/// String field: trimmed; blank coerces to `None`; scalar values stringify.
pub fn get_str(variables: &Variables, key: &str) -> Option<String> {
    match variables.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() { None } else { Some(s.to_string()) }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Boolean field: accepts booleans and the strings `"true"`, `"1"`, `"yes"`
/// (case-insensitive); any other non-blank string coerces to `false`.
pub fn get_bool(variables: &Variables, key: &str) -> Option<bool> {
    match variables.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            if s.is_empty() {
                return None;
            }
            Some(matches!(s.as_str(), "true" | "1" | "yes"))
        }
        _ => None,
    }
}
