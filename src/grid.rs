/// LiveGrid DataGrid
///
/// `DataGrid` is the single owner of a grid instance's state: the caller's
/// rows, the column schema, the query state and the listeners. Every change
/// goes through a setter here, which keeps the page in range, notifies
/// listeners, and leaves the pipeline to recompute the view on demand.
///
/// Rules the setters enforce:
///
/// - changing the search text or any filter resets to page 1
/// - changing rows, schema or page size clamps the page into range
/// - selection is keyed by `RowId` and is only changed by selection calls
///
/// # Examples
///
/// ```
/// use livegrid::{Column, ColumnKind, DataGrid, FilterValue, RowKey, Schema};
/// use serde_json::json;
///
/// let rows: Vec<_> = (1..=25)
///     .map(|i| {
///         let team = if i % 2 == 0 { "red" } else { "blue" };
///         json!({"id": i, "team": team})
///     })
///     .collect();
/// let schema = Schema::new(vec![
///     Column::new("id", "ID", ColumnKind::Number),
///     Column::new("team", "Team", ColumnKind::Select),
/// ]).unwrap();
///
/// let mut grid = DataGrid::new(rows, schema).with_row_key(RowKey::field("id"));
/// grid.set_page(3);
/// assert_eq!(grid.view().len(), 5);
///
/// grid.set_filter("team", FilterValue::set(["red"])).unwrap();
/// let view = grid.view();
/// assert_eq!(view.page, 1);
/// assert_eq!(view.total_filtered, 12);
/// ```

use crate::column::Column;
use crate::config::GridOptions;
use crate::error::{GridError, Result};
use crate::events::{ExportFormat, GridEvent, Listener};
use crate::export::{ExportScope, ExportSnapshot};
use crate::pipeline::{derive_view, filtered_indices, DerivedView};
use crate::query::{clamp_page, FilterValue, QueryState, SortDirection, SortState};
use crate::row::{Row, RowId, RowKey};
use crate::schema::Schema;
use log::{debug, warn};

/// Which rows "select all" covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectScope {
    /// Rows on the current page
    Page,
    /// Every row passing search and filters, across all pages
    Filtered,
}

pub struct DataGrid<T> {
    rows: Vec<T>,
    schema: Schema<T>,
    query: QueryState,
    row_key: RowKey<T>,
    options: GridOptions,
    listeners: Vec<Listener>,
}

impl<T: Row> DataGrid<T> {
    /// New grid with default options and positional row identity.
    pub fn new(rows: Vec<T>, schema: Schema<T>) -> Self {
        let options = GridOptions::default();
        let query = QueryState {
            hidden_columns: schema.default_hidden(),
            page_size: options.page_size,
            ..QueryState::default()
        };
        DataGrid {
            rows,
            schema,
            query,
            row_key: RowKey::Index,
            options,
            listeners: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: GridOptions) -> Result<Self> {
        options.validate()?;
        self.query.page_size = options.page_size;
        self.options = options;
        self.clamp_page();
        Ok(self)
    }

    /// Identity used for selection. Without one, rows are identified by
    /// position, which does not survive replacing or reordering the rows.
    pub fn with_row_key(mut self, row_key: RowKey<T>) -> Self {
        self.row_key = row_key;
        self
    }

    /// Start from a caller-provided query state (e.g. restored from JSON).
    pub fn with_query(mut self, query: QueryState) -> Self {
        self.query = query;
        self.query.page_size = self.query.page_size.max(1);
        self.clamp_page();
        self
    }

    /// Register a listener. Listeners run synchronously, in registration order.
    pub fn on_event<F>(&mut self, listener: F)
    where
        F: FnMut(&GridEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn schema(&self) -> &Schema<T> {
        &self.schema
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn row_key(&self) -> &RowKey<T> {
        &self.row_key
    }

    // ========================================================================
    // Data and schema
    // ========================================================================

    /// Replace the row array. Selection is kept by id.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        if self.row_key.is_positional() && !self.query.selected.is_empty() {
            warn!("replacing rows with positional row identity; selection may move to other rows");
        }
        self.rows = rows;
        self.clamp_page();
    }

    /// Swap the column schema.
    ///
    /// Hidden-column and filter entries for columns that no longer exist
    /// are dropped, as is a sort on a vanished column. Columns new to this
    /// schema that are declared hidden start hidden.
    pub fn set_schema(&mut self, schema: Schema<T>) {
        self.query.hidden_columns.retain(|id| schema.contains(id));
        for column in schema.columns() {
            if column.is_hidden() && !self.schema.contains(column.id()) {
                self.query.hidden_columns.insert(column.id().to_string());
            }
        }

        let before = self.query.filters.len();
        self.query.filters.retain(|id, _| schema.contains(id));
        if self.query.filters.len() != before {
            debug!("dropped {} filter(s) on removed columns", before - self.query.filters.len());
        }

        if let Some(sort) = &self.query.sort {
            if !schema.contains(&sort.column) {
                debug!("sort column '{}' removed from schema, clearing sort", sort.column);
                self.query.sort = None;
            }
        }

        self.schema = schema;
        self.clamp_page();
    }

    // ========================================================================
    // Search and filters
    // ========================================================================

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.query.page = 1;
        let query = self.query.search.clone();
        self.emit(GridEvent::Search { query });
    }

    /// Set (or, with an inactive value, remove) the filter on one column.
    pub fn set_filter(&mut self, column_id: &str, value: FilterValue) -> Result<()> {
        let column = self.column(column_id)?;
        if !column.is_filterable() {
            return Err(GridError::NotFilterable(column_id.to_string()));
        }

        if value.is_active() {
            self.query.filters.insert(column_id.to_string(), value);
        } else {
            self.query.filters.remove(column_id);
        }
        self.query.page = 1;
        self.emit_filters();
        Ok(())
    }

    pub fn clear_filter(&mut self, column_id: &str) {
        if self.query.filters.remove(column_id).is_some() {
            self.query.page = 1;
            self.emit_filters();
        }
    }

    pub fn clear_filters(&mut self) {
        if !self.query.filters.is_empty() {
            self.query.filters.clear();
            self.query.page = 1;
            self.emit_filters();
        }
    }

    // ========================================================================
    // Sorting
    // ========================================================================

    pub fn set_sort(&mut self, column_id: &str, direction: SortDirection) -> Result<()> {
        let column = self.column(column_id)?;
        if !column.is_sortable() {
            return Err(GridError::NotSortable(column_id.to_string()));
        }
        self.query.sort = Some(SortState {
            column: column_id.to_string(),
            direction,
        });
        self.emit(GridEvent::Sort {
            column: Some(column_id.to_string()),
            direction,
        });
        Ok(())
    }

    /// Header click: the active column flips direction, any other column
    /// becomes the sort column in ascending order.
    pub fn toggle_sort(&mut self, column_id: &str) -> Result<SortDirection> {
        let direction = match &self.query.sort {
            Some(sort) if sort.column == column_id => sort.direction.toggled(),
            _ => SortDirection::Asc,
        };
        self.set_sort(column_id, direction)?;
        Ok(direction)
    }

    pub fn clear_sort(&mut self) {
        if self.query.sort.take().is_some() {
            self.emit(GridEvent::Sort {
                column: None,
                direction: SortDirection::Asc,
            });
        }
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Go to `page`, clamped into range. Returns the page actually shown.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.query.page = page;
        self.clamp_page();
        self.query.page
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.query.page + 1)
    }

    pub fn prev_page(&mut self) -> usize {
        self.set_page(self.query.page.saturating_sub(1))
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize);
        }
        self.query.page_size = page_size;
        self.clamp_page();
        Ok(())
    }

    /// Number of pages for the current search, filters and page size.
    pub fn total_pages(&self) -> usize {
        if !self.options.pagination {
            return 1;
        }
        crate::query::total_pages(self.filtered_len(), self.query.page_size)
    }

    // ========================================================================
    // Column visibility
    // ========================================================================

    /// Flip a column's visibility. Returns true if it is visible afterwards.
    pub fn toggle_column(&mut self, column_id: &str) -> Result<bool> {
        self.column(column_id)?;
        if self.query.hidden_columns.remove(column_id) {
            Ok(true)
        } else {
            self.query.hidden_columns.insert(column_id.to_string());
            Ok(false)
        }
    }

    pub fn show_column(&mut self, column_id: &str) -> Result<()> {
        self.column(column_id)?;
        self.query.hidden_columns.remove(column_id);
        Ok(())
    }

    pub fn hide_column(&mut self, column_id: &str) -> Result<()> {
        self.column(column_id)?;
        self.query.hidden_columns.insert(column_id.to_string());
        Ok(())
    }

    /// Visible columns in schema order
    pub fn visible_columns(&self) -> Vec<&Column<T>> {
        self.schema.visible_columns(&self.query.hidden_columns).collect()
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Flip one row's selection. Returns true if it is selected afterwards.
    pub fn toggle_row(&mut self, id: RowId) -> bool {
        if !self.options.selectable {
            debug!("selection disabled, ignoring toggle of {}", id);
            return false;
        }
        let selected = self.query.selected.toggle(id);
        self.emit_selection();
        selected
    }

    /// Select every row in `scope`. Rows hidden by search or filters are
    /// never added. Returns how many rows were newly selected.
    pub fn select_all(&mut self, scope: SelectScope) -> usize {
        if !self.options.selectable {
            return 0;
        }
        let ids = self.scope_ids(scope);
        let added = self.query.selected.select_all(ids);
        self.emit_selection();
        added
    }

    /// Header checkbox: deselect the page if it is fully selected,
    /// otherwise select all of it.
    pub fn toggle_all_on_page(&mut self) {
        if !self.options.selectable {
            return;
        }
        let ids = self.scope_ids(SelectScope::Page);
        self.query.selected.toggle_all(&ids);
        self.emit_selection();
    }

    pub fn clear_selection(&mut self) {
        if !self.query.selected.is_empty() {
            self.query.selected.clear_all();
            self.emit_selection();
        }
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.query.selected.is_selected(id)
    }

    /// Selected rows resolved against the full row array, in source order,
    /// including rows currently hidden by search or filters.
    pub fn selected_rows(&self) -> Vec<&T> {
        self.query.selected.resolve(&self.rows, &self.row_key)
    }

    // ========================================================================
    // Views and export
    // ========================================================================

    /// Recompute the derived view from the current rows and query state.
    pub fn view(&self) -> DerivedView<'_, T> {
        derive_view(
            &self.rows,
            &self.schema,
            &self.query,
            &self.row_key,
            self.options.pagination,
        )
    }

    /// Snapshot rows for export over the visible columns and notify
    /// listeners. Encoding the snapshot is up to the caller.
    pub fn export(&mut self, format: ExportFormat, scope: ExportScope) -> ExportSnapshot {
        let snapshot = {
            let columns = self.visible_columns();
            match scope {
                ExportScope::Filtered => {
                    let indices = filtered_indices(&self.rows, &self.schema, &self.query);
                    ExportSnapshot::build(format, &columns, indices.iter().map(|&i| &self.rows[i]))
                }
                ExportScope::Selected => ExportSnapshot::build(format, &columns, self.selected_rows()),
            }
        };
        debug!("export {}: {} rows x {} columns", format, snapshot.len(), snapshot.headers.len());
        self.emit(GridEvent::Export { format });
        snapshot
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn column(&self, column_id: &str) -> Result<&Column<T>> {
        self.schema
            .get(column_id)
            .ok_or_else(|| GridError::UnknownColumn(column_id.to_string()))
    }

    fn filtered_len(&self) -> usize {
        filtered_indices(&self.rows, &self.schema, &self.query).len()
    }

    fn scope_ids(&self, scope: SelectScope) -> Vec<RowId> {
        match scope {
            SelectScope::Page => self.view().row_ids,
            SelectScope::Filtered => filtered_indices(&self.rows, &self.schema, &self.query)
                .into_iter()
                .map(|i| self.row_key.id_of(&self.rows[i], i))
                .collect(),
        }
    }

    fn clamp_page(&mut self) {
        if !self.options.pagination {
            self.query.page = 1;
            return;
        }
        let clamped = clamp_page(self.query.page, self.filtered_len(), self.query.page_size);
        if clamped != self.query.page {
            debug!("page {} out of range, clamped to {}", self.query.page, clamped);
            self.query.page = clamped;
        }
    }

    fn emit_filters(&mut self) {
        let filters = self.query.filters.clone();
        self.emit(GridEvent::Filter { filters });
    }

    fn emit_selection(&mut self) {
        let selected = self.query.selected.ids().clone();
        self.emit(GridEvent::RowSelect { selected });
    }

    fn emit(&mut self, event: GridEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}
