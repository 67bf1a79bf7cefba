//! User intents forwarded to the host

use crate::model::ConditionOperator;
use crate::model::FilterValue;

/// Something the user asked for that the host has to carry out.
///
/// Menu items and state transitions produce intents instead of calling back
/// into the host directly; [`DatasetController`](crate::controller::DatasetController)
/// applies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridIntent {
    /// Replace the sort with a single column.
    Sort { column: String, descending: bool },
    /// Replace the filter with a single condition.
    Filter {
        column: String,
        operator: ConditionOperator,
        value: FilterValue,
        entity_alias: Option<String>,
    },
    ClearFilter,
    /// Open the filter editor on a column.
    EditFilter { column: String },
    GroupBy { column: String },
    ClearGroupBy { column: String },
    FirstPage,
    NextPage,
    PreviousPage,
    Select { ids: Vec<String> },
    /// Open a dataset record through the dataset.
    Open { id: String },
    /// Open any record's form, e.g. the target of a lookup cell.
    Navigate { entity: Option<String>, id: String },
    FullScreen,
}
