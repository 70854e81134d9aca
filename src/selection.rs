/// Selection tracking
///
/// Selection is keyed by `RowId`, not by position, so it survives paging,
/// sorting and filtering: a row hidden by a filter stays selected and shows
/// up selected again once the filter is cleared. The tracker only ever adds
/// the keys it is given, so "select all" over the visible rows can never
/// pick up rows a filter is hiding.

use crate::row::{Row, RowId, RowKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionTracker {
    selected: BTreeSet<RowId>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: BTreeSet<RowId>) -> Self {
        SelectionTracker { selected: ids }
    }

    /// Flip one row. Returns true if the row is selected afterwards.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn select(&mut self, id: RowId) -> bool {
        self.selected.insert(id)
    }

    pub fn deselect(&mut self, id: &RowId) -> bool {
        self.selected.remove(id)
    }

    /// Add every id in `ids`. Returns how many were newly selected.
    pub fn select_all<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = RowId>,
    {
        ids.into_iter().filter(|id| self.selected.insert(id.clone())).count()
    }

    /// Header-checkbox behaviour: if every id is already selected, deselect
    /// them all; otherwise select them all. Ids outside `ids` are untouched.
    pub fn toggle_all(&mut self, ids: &[RowId]) {
        if !ids.is_empty() && ids.iter().all(|id| self.selected.contains(id)) {
            for id in ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(ids.iter().cloned());
        }
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> &BTreeSet<RowId> {
        &self.selected
    }

    pub fn into_ids(self) -> BTreeSet<RowId> {
        self.selected
    }

    /// Resolve the selection against the full, unfiltered row array, in
    /// source order. Rows hidden by the current filters are included.
    pub fn resolve<'a, T: Row>(&self, rows: &'a [T], row_key: &RowKey<T>) -> Vec<&'a T> {
        if self.selected.is_empty() {
            return Vec::new();
        }
        rows.iter()
            .enumerate()
            .filter(|(i, row)| self.selected.contains(&row_key.id_of(*row, *i)))
            .map(|(_, row)| row)
            .collect()
    }
}
