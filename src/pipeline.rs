/// LiveGrid Pipeline
///
/// Pure functions turning (rows, schema, query state) into a `DerivedView`.
/// The stages always run in the same order:
///
/// 1. search: keep rows where any searchable column contains the query
/// 2. filter: keep rows matching every active column filter
/// 3. sort: stable sort on the single active sort column
/// 4. paginate: slice the page window out of the sorted sequence
///
/// Stages 1-3 work on a vector of source indices, so rows are never cloned
/// and the final view borrows from the caller's row slice. Every stage is
/// total: missing fields, unparsable numbers and dates, stale sort columns
/// and out-of-range pages all degrade to a well-defined result.
///
/// Each call recomputes everything in O(n) per stage (plus the sort). No
/// intermediate result is cached; debounce search input upstream if that
/// matters for large row counts.
///
/// # Examples
///
/// ```
/// use livegrid::{derive_view, Column, ColumnKind, QueryState, RowKey, Schema};
/// use serde_json::json;
///
/// let rows = vec![
///     json!({"id": 1, "name": "Ann"}),
///     json!({"id": 2, "name": "ann"}),
///     json!({"id": 3, "name": "Bob"}),
/// ];
/// let schema = Schema::new(vec![
///     Column::new("id", "ID", ColumnKind::Number),
///     Column::new("name", "Name", ColumnKind::Text),
/// ]).unwrap();
///
/// let query = QueryState::new().with_search("ann");
/// let view = derive_view(&rows, &schema, &query, &RowKey::field("id"), true);
/// assert_eq!(view.total_filtered, 2);
/// assert_eq!(view.indices, vec![0, 1]);
/// ```

use crate::column::Column;
use crate::query::{clamp_page, total_pages, FilterValue, QueryState, SortDirection};
use crate::row::{Row, RowId, RowKey};
use crate::schema::Schema;
use log::{debug, trace};
use serde::Serialize;

/// Does any searchable column of `row` contain `needle`?
///
/// `needle` must already be trimmed and lowercased. An empty needle
/// matches every row.
pub fn search_matches<T: Row>(row: &T, schema: &Schema<T>, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    schema
        .searchable()
        .any(|column| column.value(row).to_display_string().to_lowercase().contains(needle))
}

/// Does `row` pass a single column filter?
///
/// Sets are multi-select filters (any member matches). Text filters are a
/// case-insensitive substring match, the same rule the search stage uses.
pub fn filter_matches<T: Row>(row: &T, column: &Column<T>, filter: &FilterValue) -> bool {
    let value = column.value(row);
    match filter {
        FilterValue::Set(options) => options.iter().any(|option| value.loose_eq(option)),
        FilterValue::Text(text) => value
            .to_display_string()
            .to_lowercase()
            .contains(&text.to_lowercase()),
    }
}

/// Active filters resolved against the schema. Filters naming a missing or
/// non-filterable column are dropped.
fn resolve_filters<'s, 'q, T>(
    schema: &'s Schema<T>,
    query: &'q QueryState,
) -> Vec<(&'s Column<T>, &'q FilterValue)> {
    query
        .active_filters()
        .filter_map(|(id, value)| match schema.get(id) {
            Some(column) if column.is_filterable() => Some((column, value)),
            Some(_) => {
                trace!("ignoring filter on non-filterable column '{}'", id);
                None
            }
            None => {
                trace!("ignoring filter on unknown column '{}'", id);
                None
            }
        })
        .collect()
}

/// The sort column, if the query names one that exists and is sortable.
pub fn resolve_sort<'s, T>(
    schema: &'s Schema<T>,
    query: &QueryState,
) -> Option<(&'s Column<T>, SortDirection)> {
    let sort = query.sort.as_ref()?;
    match schema.get(&sort.column) {
        Some(column) if column.is_sortable() => Some((column, sort.direction)),
        Some(_) => {
            debug!("sort column '{}' is not sortable, leaving rows unsorted", sort.column);
            None
        }
        None => {
            debug!("sort column '{}' not in schema, leaving rows unsorted", sort.column);
            None
        }
    }
}

/// Stable sort of `indices` (positions into `rows`) by `column`.
///
/// Values the column kind cannot compare (`NaN` numbers, unparsable dates)
/// keep their slot in the sequence; the comparable entries are stably sorted
/// into the remaining slots. Descending order reverses the comparator, not
/// the sequence, so rows with equal keys keep their input order either way.
pub fn sort_indices<T: Row>(
    rows: &[T],
    indices: &mut [usize],
    column: &Column<T>,
    direction: SortDirection,
) {
    let kind = column.kind();
    let mut slots = Vec::with_capacity(indices.len());
    let mut entries = Vec::with_capacity(indices.len());

    for (slot, &index) in indices.iter().enumerate() {
        if let Some(key) = kind.sort_key(&column.value(&rows[index])) {
            slots.push(slot);
            entries.push((index, key));
        }
    }

    entries.sort_by(|(_, a), (_, b)| {
        let ord = a.compare(b);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    for (slot, (index, _)) in slots.into_iter().zip(entries) {
        indices[slot] = index;
    }
}

/// Source indices of every row passing search and filters, in sorted order.
/// This is the full sequence the page window is cut from.
pub fn filtered_indices<T: Row>(rows: &[T], schema: &Schema<T>, query: &QueryState) -> Vec<usize> {
    let needle = query.search.trim().to_lowercase();
    let filters = resolve_filters(schema, query);

    let mut indices: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| search_matches(*row, schema, &needle))
        .filter(|(_, row)| {
            filters
                .iter()
                .all(|(column, value)| filter_matches(*row, column, value))
        })
        .map(|(i, _)| i)
        .collect();

    if let Some((column, direction)) = resolve_sort(schema, query) {
        sort_indices(rows, &mut indices, column, direction);
    }

    indices
}

/// Page window over a sequence of `total` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// Effective 1-based page, clamped into range
    pub page: usize,
    pub total_pages: usize,
    /// 0-based inclusive start
    pub start: usize,
    /// 0-based exclusive end
    pub end: usize,
}

/// Compute the window for `page` (clamped to `[1, total_pages]`).
pub fn paginate(total: usize, page: usize, page_size: usize) -> PageWindow {
    let page_size = page_size.max(1);
    let page = clamp_page(page, total, page_size);
    let start = ((page - 1) * page_size).min(total);
    let end = (start + page_size).min(total);
    PageWindow {
        page,
        total_pages: total_pages(total, page_size),
        start,
        end,
    }
}

/// The derived, read-only view handed to the UI layer.
#[derive(Debug)]
pub struct DerivedView<'a, T> {
    /// Rows of the current page (or the whole filtered set without pagination)
    pub rows: Vec<&'a T>,
    /// Index of each page row in the full row array
    pub indices: Vec<usize>,
    pub row_ids: Vec<RowId>,
    pub selected: Vec<bool>,
    /// Visible column ids in schema order
    pub visible_columns: Vec<String>,
    /// Rows before search and filters
    pub total_rows: usize,
    pub total_filtered: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl<'a, T> DerivedView<'a, T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when nothing passes search and filters.
    pub fn is_empty(&self) -> bool {
        self.total_filtered == 0
    }

    /// Every row on the page is selected (and there is at least one row).
    pub fn all_selected(&self) -> bool {
        !self.selected.is_empty() && self.selected.iter().all(|s| *s)
    }

    /// Some but not all rows on the page are selected.
    pub fn some_selected(&self) -> bool {
        self.selected.iter().any(|s| *s) && !self.all_selected()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a T, &RowId, bool)> + '_ {
        self.rows
            .iter()
            .copied()
            .zip(self.row_ids.iter())
            .zip(self.selected.iter().copied())
            .map(|((row, id), selected)| (row, id, selected))
    }

    /// "11-20 of 25", or "0 of 0" when empty.
    pub fn range_label(&self) -> String {
        if self.total_filtered == 0 {
            "0 of 0".to_string()
        } else {
            format!("{}-{} of {}", self.start_index + 1, self.end_index, self.total_filtered)
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }
}

/// Run the full pipeline.
///
/// With `paginate == false` the whole filtered sequence is returned as a
/// single page.
pub fn derive_view<'a, T: Row>(
    rows: &'a [T],
    schema: &Schema<T>,
    query: &QueryState,
    row_key: &RowKey<T>,
    paginate_rows: bool,
) -> DerivedView<'a, T> {
    let ordered = filtered_indices(rows, schema, query);
    let total_filtered = ordered.len();
    let page_size = query.page_size.max(1);

    let window = if paginate_rows {
        paginate(total_filtered, query.page, page_size)
    } else {
        PageWindow {
            page: 1,
            total_pages: 1,
            start: 0,
            end: total_filtered,
        }
    };
    if window.page != query.page {
        trace!("page {} out of range, showing page {}", query.page, window.page);
    }

    let indices = ordered[window.start..window.end].to_vec();
    let row_ids: Vec<RowId> = indices.iter().map(|&i| row_key.id_of(&rows[i], i)).collect();
    let selected = row_ids.iter().map(|id| query.selected.is_selected(id)).collect();

    trace!(
        "derived view: {} of {} rows pass, page {}/{} [{}, {})",
        total_filtered,
        rows.len(),
        window.page,
        window.total_pages,
        window.start,
        window.end
    );

    DerivedView {
        rows: indices.iter().map(|&i| &rows[i]).collect(),
        indices,
        row_ids,
        selected,
        visible_columns: schema
            .visible_columns(&query.hidden_columns)
            .map(|c| c.id().to_string())
            .collect(),
        total_rows: rows.len(),
        total_filtered,
        total_pages: window.total_pages,
        page: window.page,
        page_size,
        start_index: window.start,
        end_index: window.end,
    }
}
