/// Grid configuration
///
/// Options are fixed per grid instance. They can be built in code or loaded
/// from JSON; missing keys take their defaults.
///
/// ```
/// use livegrid::GridOptions;
///
/// let options = GridOptions::from_json(r#"{"page_size": 25, "pagination": true}"#).unwrap();
/// assert_eq!(options.page_size, 25);
/// assert!(options.selectable);
/// ```

use crate::error::{GridError, Result};
use crate::query::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// When false the view holds the whole filtered set
    pub pagination: bool,
    /// Initial page size
    pub page_size: usize,
    /// Page sizes offered to the user
    pub page_size_options: Vec<usize>,
    /// Whether row selection is enabled at all
    pub selectable: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            pagination: true,
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![10, 20, 50, 100],
            selectable: true,
        }
    }
}

impl GridOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        let options: GridOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size_options.contains(&0) {
            return Err(GridError::InvalidPageSize);
        }
        Ok(())
    }

    pub fn without_pagination(mut self) -> Self {
        self.pagination = false;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}
