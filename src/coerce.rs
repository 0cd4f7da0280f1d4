//! Value coercion utilities shared by the category decoders
//!
//! Every raw field in the log is a string; these helpers convert them to
//! typed values with explicit failure semantics. Conversion failures for
//! declared numeric fields degrade to `Value::Null` with a warning rather
//! than failing the record.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A typed field value produced by coercion
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Target type for [`coerce`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Infer: int when no decimal point, then float, then raw string.
    /// `True`/`False` are kept as strings.
    Auto,
    /// Keep the raw trimmed text
    Str,
    Float,
    Int,
    /// Case-insensitive true/false to 1/0; anything else is a reported
    /// conversion failure
    BoolNumeric,
}

/// Normalize a raw field: empty, `None`, and trailing-comma artifacts all
/// become null. Returns the trimmed text otherwise.
fn normalize(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "None" || trimmed == "None," {
        return None;
    }
    Some(trimmed)
}

/// Convert one raw field to a typed [`Value`] according to `kind`.
///
/// Numeric kinds report failed conversions with a warning and yield
/// `Value::Null`; the surrounding record is still produced.
pub fn coerce(raw: &str, kind: Kind) -> Value {
    let value = match normalize(raw) {
        Some(v) => v,
        None => return Value::Null,
    };

    match kind {
        Kind::Str => Value::Str(value.to_string()),
        Kind::Float => match value.parse::<f64>() {
            Ok(f) => Value::Float(f),
            Err(_) => {
                eprintln!("Warning: failed to convert '{}' to float", value);
                Value::Null
            }
        },
        Kind::Int => match value.parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => {
                eprintln!("Warning: failed to convert '{}' to int", value);
                Value::Null
            }
        },
        Kind::BoolNumeric => match value.to_ascii_lowercase().as_str() {
            "true" => Value::Int(1),
            "false" => Value::Int(0),
            _ => {
                eprintln!("Warning: unexpected boolean value: '{}'", value);
                Value::Null
            }
        },
        Kind::Auto => {
            if value == "True" || value == "False" {
                return Value::Str(value.to_string());
            }
            if value.contains('.') {
                match value.parse::<f64>() {
                    Ok(f) => Value::Float(f),
                    Err(_) => Value::Str(value.to_string()),
                }
            } else {
                match value.parse::<i64>() {
                    Ok(i) => Value::Int(i),
                    Err(_) => Value::Str(value.to_string()),
                }
            }
        }
    }
}

/// Coerce to `Option<f64>`, accepting int-shaped input
pub fn coerce_f64(raw: &str) -> Option<f64> {
    match coerce(raw, Kind::Float) {
        Value::Float(f) => Some(f),
        _ => None,
    }
}

/// Coerce to `Option<i64>`
pub fn coerce_i64(raw: &str) -> Option<i64> {
    match coerce(raw, Kind::Int) {
        Value::Int(i) => Some(i),
        _ => None,
    }
}

/// Coerce to `Option<String>`, normalizing empties and `None` literals
pub fn coerce_str(raw: &str) -> Option<String> {
    normalize(raw).map(|s| s.to_string())
}

/// Parse `[1,2,3]` or `1,2,3` into a list of values.
///
/// Each element independently converts float first, then int, then keeps
/// the raw string. Empty input yields an empty list.
pub fn parse_delimited_list(text: &str) -> Vec<Value> {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return Vec::new();
    }
    let inner = if cleaned.starts_with('[') && cleaned.ends_with(']') {
        &cleaned[1..cleaned.len() - 1]
    } else {
        cleaned
    };

    inner
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|part| {
            if let Ok(f) = part.parse::<f64>() {
                Value::Float(f)
            } else if let Ok(i) = part.parse::<i64>() {
                Value::Int(i)
            } else {
                Value::Str(part.to_string())
            }
        })
        .collect()
}

/// Convert case-insensitive true/false to 1/0, anything else to null.
///
/// Unlike [`Kind::BoolNumeric`] this never reports a failure; unknown
/// input is silently null. Both behaviors exist in the wire format.
pub fn boolean_to_numeric(text: &str) -> Value {
    match normalize(text) {
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "true" => Value::Int(1),
            "false" => Value::Int(0),
            _ => Value::Null,
        },
        None => Value::Null,
    }
}
