use thiserror::Error;

/// Errors raised when caller input to the grid is invalid.
///
/// The view pipeline itself never fails; only setters that validate
/// schema, options or column references return these.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("duplicate column id '{0}'")]
    DuplicateColumnId(String),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is not sortable")]
    NotSortable(String),

    #[error("column '{0}' is not filterable")]
    NotFilterable(String),

    #[error("page size must be greater than zero")]
    InvalidPageSize,

    #[error("unknown export format '{0}'. Use 'csv', 'xlsx' or 'json'")]
    UnknownExportFormat(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = GridError> = std::result::Result<T, E>;
