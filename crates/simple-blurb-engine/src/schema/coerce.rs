use serde_json::Value;

use super::FieldKind;
use crate::length::Length;

/// Result of coercing a raw value to a field's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Value(Value),
    /// Recognisably not a value for this field (e.g. an unknown enum member);
    /// the field keeps its default.
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {found}")]
pub struct CoercionError {
    pub expected: &'static str,
    pub found: String,
}

impl CoercionError {
    fn new(kind: FieldKind, found: impl Into<String>) -> Self {
        Self {
            expected: kind.describe(),
            found: found.into(),
        }
    }
}

/// Coerce text read out of markup (an attribute value, text or inner HTML).
pub fn coerce_markup(kind: FieldKind, raw: &str) -> Result<Coerced, CoercionError> {
    match kind {
        FieldKind::String => Ok(Coerced::Value(Value::String(raw.to_string()))),
        FieldKind::Integer => raw
            .trim()
            .parse::<u64>()
            .map(|n| Coerced::Value(Value::from(n)))
            .map_err(|_| CoercionError::new(kind, format!("{raw:?}"))),
        FieldKind::Boolean => match raw.trim() {
            "true" => Ok(Coerced::Value(Value::Bool(true))),
            "false" => Ok(Coerced::Value(Value::Bool(false))),
            _ => Err(CoercionError::new(kind, format!("{raw:?}"))),
        },
        FieldKind::Enum(allowed) => Ok(enum_member(allowed, raw)),
        FieldKind::Length => length(kind, raw),
        FieldKind::Object => match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => Ok(Coerced::Value(value)),
            _ => Err(CoercionError::new(kind, format!("{raw:?}"))),
        },
    }
}

/// Coerce a JSON value from the comment delimiter or a host-supplied record.
/// `null` is always absent.
pub fn coerce_json(kind: FieldKind, value: &Value) -> Result<Coerced, CoercionError> {
    if value.is_null() {
        return Ok(Coerced::Absent);
    }
    match (kind, value) {
        (FieldKind::String, Value::String(_)) => Ok(Coerced::Value(value.clone())),
        (FieldKind::Integer, Value::Number(n)) => {
            let integer = n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64));
            integer
                .map(|n| Coerced::Value(Value::from(n)))
                .ok_or_else(|| CoercionError::new(kind, n.to_string()))
        }
        (FieldKind::Boolean, Value::Bool(_)) => Ok(Coerced::Value(value.clone())),
        (FieldKind::Enum(allowed), Value::String(s)) => Ok(enum_member(allowed, s)),
        (FieldKind::Length, Value::String(s)) => length(kind, s),
        (FieldKind::Object, Value::Object(_)) => Ok(Coerced::Value(value.clone())),
        _ => Err(CoercionError::new(kind, value.to_string())),
    }
}

fn enum_member(allowed: &[&str], raw: &str) -> Coerced {
    if allowed.contains(&raw) {
        Coerced::Value(Value::String(raw.to_string()))
    } else {
        Coerced::Absent
    }
}

fn length(kind: FieldKind, raw: &str) -> Result<Coerced, CoercionError> {
    if raw.is_empty() {
        return Ok(Coerced::Absent);
    }
    raw.parse::<Length>()
        .map(|_| Coerced::Value(Value::String(raw.to_string())))
        .map_err(|_| CoercionError::new(kind, format!("{raw:?}")))
}
