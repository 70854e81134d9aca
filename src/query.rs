/// Query State
///
/// Everything the UI can change about what the grid shows: search text,
/// per-column filters, the active sort, selected row ids, hidden columns
/// and the page window. It is a plain serializable value; the pipeline only
/// reads it, and `DataGrid` is the one place that writes it.

use crate::error::Result;
use crate::selection::SelectionTracker;
use crate::value::CellValue;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort order specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// The single active sort column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(column: impl Into<String>) -> Self {
        SortState {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        SortState {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// A per-column filter value
///
/// Serialized as a JSON array (multi-select) or string (text). When
/// deserializing, any other scalar is accepted as the text of its display
/// string, so `{"score": 5}` restores as the text filter `"5"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Multi-select: the cell must equal one of these values
    Set(Vec<CellValue>),
    /// Case-insensitive substring match on the cell's display string
    Text(String),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    pub fn set<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        FilterValue::Set(values.into_iter().map(Into::into).collect())
    }

    /// Blank text and empty sets filter nothing.
    pub fn is_active(&self) -> bool {
        match self {
            FilterValue::Text(s) => !s.trim().is_empty(),
            FilterValue::Set(values) => !values.is_empty(),
        }
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Array(items) => {
                Ok(FilterValue::Set(items.into_iter().map(CellValue::from).collect()))
            }
            serde_json::Value::Object(_) => Err(de::Error::custom(
                "filter value must be an array or a scalar",
            )),
            scalar => Ok(FilterValue::Text(CellValue::from(scalar).to_display_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryState {
    pub search: String,
    pub filters: BTreeMap<String, FilterValue>,
    pub sort: Option<SortState>,
    pub selected: SelectionTracker,
    pub hidden_columns: BTreeSet<String>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        QueryState {
            search: String::new(),
            filters: BTreeMap::new(),
            sort: None,
            selected: SelectionTracker::new(),
            hidden_columns: BTreeSet::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, column: impl Into<String>, value: FilterValue) -> Self {
        self.filters.insert(column.into(), value);
        self
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Filters that actually narrow the result
    pub fn active_filters(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.filters.iter().filter(|(_, v)| v.is_active())
    }

    pub fn has_search(&self) -> bool {
        !self.search.trim().is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Number of pages for `total` rows; never less than one.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

/// Clamp a 1-based page into `[1, total_pages]`.
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(total, page_size))
}
