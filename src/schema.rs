/// LiveGrid Schema
///
/// An ordered list of columns with unique ids. The schema is supplied once
/// per grid (callers may swap it, e.g. when toggling view modes) and is
/// never mutated by column visibility changes; those live in the query
/// state as a hidden-id overlay.
///
/// # Examples
///
/// ```
/// use livegrid::{Column, ColumnKind, Schema};
/// use std::collections::BTreeSet;
///
/// let schema = Schema::<serde_json::Value>::new(vec![
///     Column::new("id", "ID", ColumnKind::Number),
///     Column::new("name", "Name", ColumnKind::Text),
///     Column::new("email", "Email", ColumnKind::Text),
/// ]).unwrap();
///
/// let hidden: BTreeSet<String> = ["name".to_string()].into_iter().collect();
/// let visible: Vec<&str> = schema.visible_columns(&hidden).map(|c| c.id()).collect();
/// assert_eq!(visible, vec!["id", "email"]);
/// ```

use crate::column::Column;
use crate::error::{GridError, Result};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

pub struct Schema<T> {
    columns: Vec<Column<T>>,
}

impl<T> Clone for Schema<T> {
    fn clone(&self) -> Self {
        Schema {
            columns: self.columns.clone(),
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}

impl<T> Schema<T> {
    /// Build a schema, rejecting duplicate column ids.
    pub fn new(columns: Vec<Column<T>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.id()) {
                return Err(GridError::DuplicateColumnId(column.id().to_string()));
            }
        }
        Ok(Schema { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn get(&self, id: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn column_ids(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.id()).collect()
    }

    /// Columns not in `hidden`, in declared order.
    pub fn visible_columns<'a>(
        &'a self,
        hidden: &'a BTreeSet<String>,
    ) -> impl Iterator<Item = &'a Column<T>> + 'a {
        self.columns.iter().filter(move |c| !hidden.contains(c.id()))
    }

    /// Columns taking part in free-text search
    pub fn searchable(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns.iter().filter(|c| c.is_searchable())
    }

    /// Ids of columns declared as initially hidden
    pub fn default_hidden(&self) -> BTreeSet<String> {
        self.columns
            .iter()
            .filter(|c| c.is_hidden())
            .map(|c| c.id().to_string())
            .collect()
    }
}
