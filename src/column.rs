/// LiveGrid Column Implementation
///
/// A Column describes one field of the grid: how to project a value out of a
/// row, what type that value is, and which pipeline stages it takes part in.
///
/// The column type is a closed set. Each `ColumnKind` maps to exactly one
/// comparator, chosen by a single `match` in `ColumnKind::compare`, so sorting
/// never dispatches on the runtime shape of a value.
///
/// # Examples
///
/// ```
/// use livegrid::{Align, CellValue, Column, ColumnKind};
/// use serde_json::json;
///
/// let score = Column::<serde_json::Value>::new("score", "Score", ColumnKind::Number)
///     .align(Align::Right);
/// let shouting = Column::<serde_json::Value>::new("name", "Name", ColumnKind::Custom)
///     .render(|value, _row| value.to_display_string().to_uppercase());
///
/// let row = json!({"name": "Ann", "score": 5});
/// assert_eq!(score.value(&row), CellValue::Int(5));
/// assert_eq!(shouting.display(&row), "ANN");
/// ```

use crate::row::Row;
use crate::value::CellValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
    Select,
    Custom,
}

impl ColumnKind {
    /// Ascending comparison of two projected values.
    ///
    /// Number and date columns return `None` when either side coerces to
    /// `NaN`; such values are incomparable and the sort stage leaves them in
    /// place. All other kinds compare the display strings with `collate`.
    /// This is the same ordering the sort stage applies to its sort keys.
    pub fn compare(&self, a: &CellValue, b: &CellValue) -> Option<Ordering> {
        Some(self.sort_key(a)?.compare(&self.sort_key(b)?))
    }

    /// Sort key for this kind, or `None` when the value is incomparable.
    pub(crate) fn sort_key(&self, value: &CellValue) -> Option<SortKeyValue> {
        match self {
            ColumnKind::Number => finite(value.to_number()).map(SortKeyValue::Number),
            ColumnKind::Date => finite(value.to_timestamp()).map(SortKeyValue::Number),
            _ => Some(SortKeyValue::Text(value.to_display_string())),
        }
    }
}

/// Precomputed sort key, one per row, so the comparator does not re-coerce.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SortKeyValue {
    Number(f64),
    Text(String),
}

impl SortKeyValue {
    pub(crate) fn compare(&self, other: &SortKeyValue) -> Ordering {
        match (self, other) {
            (SortKeyValue::Number(a), SortKeyValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortKeyValue::Text(a), SortKeyValue::Text(b)) => collate(a, b),
            (SortKeyValue::Number(_), SortKeyValue::Text(_)) => Ordering::Less,
            (SortKeyValue::Text(_), SortKeyValue::Number(_)) => Ordering::Greater,
        }
    }
}

fn finite(v: f64) -> Option<f64> {
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}

/// Case-insensitive string collation.
///
/// Strings are ordered by their lowercase form first; strings equal under
/// case folding are then ordered lowercase-before-uppercase, character by
/// character. This is a total order.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }
    a.chars()
        .map(|c| (c.is_uppercase(), c))
        .cmp(b.chars().map(|c| (c.is_uppercase(), c)))
}

/// Horizontal alignment hint for renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// One entry of a column's filter menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: CellValue,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<CellValue>) -> Self {
        FilterOption {
            label: label.into(),
            value: value.into(),
        }
    }
}

type Accessor<T> = Rc<dyn Fn(&T) -> CellValue>;
type Renderer<T> = Rc<dyn Fn(&CellValue, &T) -> String>;

/// How a column projects its value out of a row
pub enum ColumnKey<T> {
    /// Look the value up by field name through `Row`
    Field(String),
    /// Compute the value with a closure
    Accessor(Accessor<T>),
}

impl<T> Clone for ColumnKey<T> {
    fn clone(&self) -> Self {
        match self {
            ColumnKey::Field(name) => ColumnKey::Field(name.clone()),
            ColumnKey::Accessor(f) => ColumnKey::Accessor(Rc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for ColumnKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Field(name) => f.debug_tuple("Field").field(name).finish(),
            ColumnKey::Accessor(_) => f.write_str("Accessor(..)"),
        }
    }
}

/// Declarative description of one grid column.
pub struct Column<T> {
    id: String,
    key: ColumnKey<T>,
    title: String,
    kind: ColumnKind,
    sortable: bool,
    filterable: bool,
    searchable: bool,
    hidden: bool,
    align: Align,
    width: Option<u32>,
    filter_options: Vec<FilterOption>,
    renderer: Option<Renderer<T>>,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Column {
            id: self.id.clone(),
            key: self.key.clone(),
            title: self.title.clone(),
            kind: self.kind,
            sortable: self.sortable,
            filterable: self.filterable,
            searchable: self.searchable,
            hidden: self.hidden,
            align: self.align,
            width: self.width,
            filter_options: self.filter_options.clone(),
            renderer: self.renderer.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("searchable", &self.searchable)
            .field("hidden", &self.hidden)
            .field("align", &self.align)
            .field("custom_render", &self.renderer.is_some())
            .finish()
    }
}

impl<T> Column<T> {
    /// New column keyed by the field named `id`. Sortable, filterable and
    /// searchable by default.
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: ColumnKind) -> Self {
        let id = id.into();
        Column {
            key: ColumnKey::Field(id.clone()),
            id,
            title: title.into(),
            kind,
            sortable: true,
            filterable: true,
            searchable: true,
            hidden: false,
            align: Align::default(),
            width: None,
            filter_options: Vec::new(),
            renderer: None,
        }
    }

    /// Read the value from a differently-named field
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.key = ColumnKey::Field(name.into());
        self
    }

    /// Compute the value with a closure instead of a field lookup
    pub fn accessor<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> CellValue + 'static,
    {
        self.key = ColumnKey::Accessor(Rc::new(f));
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Start out hidden. Only seeds the grid's hidden-column set.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn filter_options(mut self, options: Vec<FilterOption>) -> Self {
        self.filter_options = options;
        self
    }

    /// Custom cell renderer. Sorting, filtering and search still use the raw
    /// projected value; opt out with `sortable(false)` and friends.
    pub fn render<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellValue, &T) -> String + 'static,
    {
        self.renderer = Some(Rc::new(f));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn key(&self) -> &ColumnKey<T> {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn alignment(&self) -> Align {
        self.align
    }

    pub fn column_width(&self) -> Option<u32> {
        self.width
    }

    pub fn options(&self) -> &[FilterOption] {
        &self.filter_options
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }
}

impl<T: Row> Column<T> {
    /// Project this column's raw value out of `row`
    pub fn value(&self, row: &T) -> CellValue {
        match &self.key {
            ColumnKey::Field(name) => row.field(name),
            ColumnKey::Accessor(f) => f(row),
        }
    }

    /// Text shown for this cell: the custom renderer's output when present,
    /// the display string otherwise.
    pub fn display(&self, row: &T) -> String {
        let value = self.value(row);
        match &self.renderer {
            Some(render) => render(&value, row),
            None => value.to_display_string(),
        }
    }
}
