/// Export snapshots
///
/// An export hands the caller a plain table of strings: the visible column
/// titles and the rendered cells of the rows being exported. Turning that
/// into CSV, XLSX or JSON bytes is the caller's job.

use crate::column::Column;
use crate::events::ExportFormat;
use crate::row::Row;
use serde::Serialize;

/// Which rows go into an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    /// Every row passing search and filters, in sorted order
    #[default]
    Filtered,
    /// Selected rows, in source order, whether or not they are filtered out
    Selected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSnapshot {
    pub format: ExportFormat,
    pub column_ids: Vec<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportSnapshot {
    pub fn build<'r, T, I>(format: ExportFormat, columns: &[&Column<T>], rows: I) -> Self
    where
        T: Row + 'r,
        I: IntoIterator<Item = &'r T>,
    {
        ExportSnapshot {
            format,
            column_ids: columns.iter().map(|c| c.id().to_string()).collect(),
            headers: columns.iter().map(|c| c.title().to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|row| columns.iter().map(|c| c.display(row)).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Suggested download name, e.g. `users.csv`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.format.extension())
    }
}
