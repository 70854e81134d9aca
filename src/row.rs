/// Row projection and row identity
///
/// The engine treats rows as opaque. Columns reach into them either through
/// an accessor closure or, for field-keyed columns, through the `Row` trait.
/// Row identity is separate: a `RowKey` turns a row (and its index in the
/// full, unfiltered row array) into a `RowId` that selection is keyed by.

use crate::value::CellValue;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

/// Field access by name. Absent fields project to `CellValue::Null`.
pub trait Row {
    fn field(&self, name: &str) -> CellValue;
}

impl Row for HashMap<String, CellValue> {
    fn field(&self, name: &str) -> CellValue {
        self.get(name).cloned().unwrap_or_default()
    }
}

impl Row for BTreeMap<String, CellValue> {
    fn field(&self, name: &str) -> CellValue {
        self.get(name).cloned().unwrap_or_default()
    }
}

impl Row for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> CellValue {
        self.get(name).map(CellValue::from).unwrap_or_default()
    }
}

impl Row for serde_json::Value {
    fn field(&self, name: &str) -> CellValue {
        match self {
            serde_json::Value::Object(map) => map.field(name),
            _ => CellValue::Null,
        }
    }
}

impl<R: Row + ?Sized> Row for &R {
    fn field(&self, name: &str) -> CellValue {
        (**self).field(name)
    }
}

/// Logical identity of a row.
///
/// `Index` ids only come from the positional fallback and never compare equal
/// to a `Key`, so a fallback index cannot alias a real key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Index(usize),
    Key(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Key(k) => f.write_str(k),
            RowId::Index(i) => write!(f, "#{}", i),
        }
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        RowId::Key(value.to_string())
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        RowId::Key(value)
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        RowId::Key(value.to_string())
    }
}

impl From<i32> for RowId {
    fn from(value: i32) -> Self {
        RowId::Key(value.to_string())
    }
}

type KeyFn<T> = Rc<dyn Fn(&T, usize) -> RowId>;

/// How to derive a `RowId` for a row.
///
/// `Index` (and the fallback used when a `Field` value is missing) is lossy:
/// the id follows the row's position in the full row array, so replacing or
/// reordering the data moves selection onto different rows.
pub enum RowKey<T> {
    /// Use the stringified value of this field
    Field(String),
    /// Caller-supplied identity function, given the row and its source index
    Func(KeyFn<T>),
    /// Position in the full row array
    Index,
}

impl<T> Clone for RowKey<T> {
    fn clone(&self) -> Self {
        match self {
            RowKey::Field(name) => RowKey::Field(name.clone()),
            RowKey::Func(f) => RowKey::Func(Rc::clone(f)),
            RowKey::Index => RowKey::Index,
        }
    }
}

impl<T> fmt::Debug for RowKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Field(name) => f.debug_tuple("Field").field(name).finish(),
            RowKey::Func(_) => f.write_str("Func(..)"),
            RowKey::Index => f.write_str("Index"),
        }
    }
}

impl<T> Default for RowKey<T> {
    fn default() -> Self {
        RowKey::Index
    }
}

impl<T> RowKey<T> {
    pub fn field(name: impl Into<String>) -> Self {
        RowKey::Field(name.into())
    }

    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&T, usize) -> RowId + 'static,
    {
        RowKey::Func(Rc::new(f))
    }

    /// True when ids are positional and therefore not stable across data changes.
    pub fn is_positional(&self) -> bool {
        matches!(self, RowKey::Index)
    }
}

impl<T: Row> RowKey<T> {
    /// Identity of `row`, which sits at `index` in the full row array.
    pub fn id_of(&self, row: &T, index: usize) -> RowId {
        match self {
            RowKey::Field(name) => {
                let value = row.field(name);
                let key = value.to_display_string();
                if key.is_empty() {
                    debug!("row {} has no '{}' value, falling back to index identity", index, name);
                    RowId::Index(index)
                } else {
                    RowId::Key(key)
                }
            }
            RowKey::Func(f) => f(row, index),
            RowKey::Index => RowId::Index(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_row_projection() {
        let row = json!({"id": 1, "name": "Ann"});
        assert_eq!(row.field("name"), CellValue::Text("Ann".into()));
        assert_eq!(row.field("missing"), CellValue::Null);
        assert_eq!(json!(5).field("id"), CellValue::Null);
    }

    #[test]
    fn test_field_key() {
        let key: RowKey<serde_json::Value> = RowKey::field("id");
        assert_eq!(key.id_of(&json!({"id": 7}), 0), RowId::from("7"));
        assert_eq!(key.id_of(&json!({"name": "x"}), 3), RowId::Index(3));
    }

    #[test]
    fn test_index_never_aliases_key() {
        let key: RowKey<serde_json::Value> = RowKey::field("id");
        let keyed = key.id_of(&json!({"id": 3}), 0);
        let fallback = key.id_of(&json!({}), 3);
        assert_ne!(keyed, fallback);
    }

    #[test]
    fn test_func_key() {
        let key: RowKey<serde_json::Value> = RowKey::func(|row: &serde_json::Value, _| {
            RowId::Key(format!("{}-{}", row.field("a"), row.field("b")))
        });
        assert_eq!(key.id_of(&json!({"a": 1, "b": "x"}), 9), RowId::from("1-x"));
        assert!(!key.is_positional());
        assert!(RowKey::<serde_json::Value>::default().is_positional());
    }
}
