/// LiveGrid Cell Values
///
/// A `CellValue` is what a column projects out of a row. Every stage of the
/// pipeline works on cell values, so coercion rules live here: how a value
/// is stringified for search and text filters, how it is read as a number or
/// a timestamp for sorting, and how multi-select filters compare it.
///
/// Coercion never fails. Missing fields are `Null`, which stringifies to an
/// empty string and coerces to `NaN`.

use crate::dates::{format_date, format_datetime, parse_datetime, MS_PER_DAY};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single projected cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Days since 1970-01-01
    Date(i32),
    /// Milliseconds since 1970-01-01T00:00:00
    DateTime(i64),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Textual form used by search, text filters, the default comparator
    /// and export.
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(n) => n.to_string(),
            CellValue::Float(f) => format_float(*f),
            CellValue::Text(s) => s.clone(),
            CellValue::Date(days) => format_date(*days),
            CellValue::DateTime(ms) => format_datetime(*ms),
        }
    }

    /// Numeric coercion for number columns. Unparsable values give `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            CellValue::Null => f64::NAN,
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::Int(n) => *n as f64,
            CellValue::Float(f) => *f,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            CellValue::Date(days) => (*days as i64 * MS_PER_DAY) as f64,
            CellValue::DateTime(ms) => *ms as f64,
        }
    }

    /// Timestamp coercion (epoch milliseconds) for date columns.
    /// Numbers are read as epoch milliseconds; text must be ISO 8601.
    pub fn to_timestamp(&self) -> f64 {
        match self {
            CellValue::Date(days) => (*days as i64 * MS_PER_DAY) as f64,
            CellValue::DateTime(ms) => *ms as f64,
            CellValue::Int(n) => *n as f64,
            CellValue::Float(f) => *f,
            CellValue::Text(s) => parse_datetime(s).map(|ms| ms as f64).unwrap_or(f64::NAN),
            CellValue::Null | CellValue::Bool(_) => f64::NAN,
        }
    }

    /// Equality used for multi-select filter membership: same-variant
    /// equality, with integers and floats compared numerically.
    pub fn loose_eq(&self, other: &CellValue) -> bool {
        match (self, other) {
            (CellValue::Int(a), CellValue::Float(b)) | (CellValue::Float(b), CellValue::Int(a)) => {
                (*a as f64) == *b
            }
            (CellValue::Date(d), CellValue::DateTime(ms))
            | (CellValue::DateTime(ms), CellValue::Date(d)) => *d as i64 * MS_PER_DAY == *ms,
            (a, b) => a == b,
        }
    }
}

/// `3.0` prints as `3`, non-finite values as `NaN`/`Infinity`.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        f.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        CellValue::from(&value)
    }
}

impl From<&serde_json::Value> for CellValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => CellValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => CellValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => CellValue::Text(value.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(value: Option<V>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}
