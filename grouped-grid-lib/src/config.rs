//! Grid configuration

use serde::Deserialize;
use serde::Serialize;

use crate::error::GridError;
use crate::selection::ALL_ITEMS;

/// Page size requested while bulk loading the dataset.
pub const DEFAULT_PAGE_SIZE: usize = 5000;

/// Static configuration of one grid instance.
///
/// # Example
///
/// ```
/// use grouped_grid_lib::GridConfig;
///
/// let config: GridConfig = serde_json::from_str(r#"{"groupingColumn": "statuscode"}"#).unwrap();
/// assert!(config.allow_group_change);
/// assert_eq!(config.page_size, 5000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Whether users may change the grouping columns.
    pub allow_group_change: bool,
    /// Collapse state of groups nobody has toggled yet.
    pub collapsed: bool,
    pub grouping_column: Option<String>,
    pub grouping_column2: Option<String>,
    pub page_size: usize,
    /// Width the layout engine distributes across columns.
    pub container_width: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            allow_group_change: true,
            collapsed: false,
            grouping_column: None,
            grouping_column2: None,
            page_size: DEFAULT_PAGE_SIZE,
            container_width: 1200,
        }
    }
}

impl GridConfig {
    /// Checks the configuration for contradictions.
    pub fn validate(&self) -> Result<(), GridError> {
        let primary = selected(&self.grouping_column);
        if primary.is_some() && primary == selected(&self.grouping_column2) {
            return Err(GridError::InvalidConfig(format!(
                "grouping columns must differ, both are '{}'",
                primary.unwrap_or_default()
            )));
        }
        if self.page_size == 0 {
            return Err(GridError::InvalidConfig(
                "page size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn selected(column: &Option<String>) -> Option<&str> {
    column
        .as_deref()
        .filter(|c| !c.is_empty() && *c != ALL_ITEMS)
}
