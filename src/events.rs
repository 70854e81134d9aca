/// Notifications the grid sends to its owner
///
/// Events are informational: the grid has already updated its own state by
/// the time a listener sees one, and it never waits on the listener.
/// Listeners that kick off async work (server-side filtering, an export
/// download) do so on their own schedule.

use crate::error::GridError;
use crate::query::{FilterValue, SortDirection};
use crate::row::RowId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Export formats the UI can request. Encoding is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "json" => Ok(ExportFormat::Json),
            _ => Err(GridError::UnknownExportFormat(s.to_string())),
        }
    }
}

/// Grid state change notifications
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GridEvent {
    /// Sort changed; `column` is `None` when sorting was cleared
    Sort {
        column: Option<String>,
        direction: SortDirection,
    },
    /// Filters changed; carries the full filter map
    Filter {
        filters: BTreeMap<String, FilterValue>,
    },
    /// Search text changed
    Search { query: String },
    /// Selection changed; carries the full selected set
    RowSelect { selected: BTreeSet<RowId> },
    /// Export requested
    Export { format: ExportFormat },
}

/// Listener callback type
pub type Listener = Box<dyn FnMut(&GridEvent)>;
