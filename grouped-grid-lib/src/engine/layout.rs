//! Column descriptors and width allocation

use serde::Serialize;

use crate::model::Column;
use crate::model::ColumnKind;
use crate::model::FilterExpression;
use crate::model::SortDirection;
use crate::model::SortStatus;
use crate::model::UNSET_SIZE_FACTOR;
use crate::selection::GroupSelection;

/// Minimum width of a column that reports no size factor.
pub const FALLBACK_MIN_WIDTH: i32 = 100;

/// Subtracted from every maximum width.
pub const WIDTH_PADDING: i32 = 20;

/// Presentation state of one visible column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub key: String,
    pub name: String,
    pub field_name: String,
    #[serde(skip)]
    pub kind: ColumnKind,
    pub is_sorted: bool,
    pub is_sorted_descending: bool,
    pub is_filtered: bool,
    pub is_grouped: bool,
    pub is_resizable: bool,
    pub min_width: i32,
    pub max_width: i32,
}

/// Derives descriptors for the visible columns, ordered by `order`.
///
/// Leftover container width is split evenly (floor division) across the
/// visible columns and added to each maximum width.
pub fn layout_columns(
    columns: &[Column],
    sorting: &[SortStatus],
    filtering: &FilterExpression,
    selection: &GroupSelection,
    container_width: u32,
) -> Vec<ColumnDescriptor> {
    let mut visible: Vec<&Column> = columns.iter().filter(|c| c.is_visible()).collect();
    visible.sort_by_key(|c| c.order);

    let aggregate: i64 = visible.iter().map(|c| i64::from(c.visual_size_factor)).sum();
    let count = visible.len() as i64;
    let container = i64::from(container_width);
    let buffer = if container > aggregate && count > 0 {
        (container - aggregate).div_euclid(count)
    } else {
        0
    };

    visible
        .into_iter()
        .map(|column| {
            let min_width = min_width(column);
            let sort = sorting.iter().find(|s| s.name == column.name);
            ColumnDescriptor {
                key: column.name.clone(),
                name: column.display_name.clone(),
                field_name: column.name.clone(),
                kind: column.kind(),
                is_sorted: sort.is_some(),
                is_sorted_descending: sort
                    .is_some_and(|s| s.sort_direction == SortDirection::Descending),
                is_filtered: filtering.condition_for(&column.name).is_some(),
                is_grouped: selection.uses(&column.name),
                is_resizable: true,
                min_width,
                max_width: clamp_width(i64::from(min_width) + buffer - i64::from(WIDTH_PADDING)),
            }
        })
        .collect()
}

fn min_width(column: &Column) -> i32 {
    if column.visual_size_factor == UNSET_SIZE_FACTOR {
        FALLBACK_MIN_WIDTH
    } else {
        column.visual_size_factor
    }
}

fn clamp_width(width: i64) -> i32 {
    i32::try_from(width).unwrap_or(if width < 0 { i32::MIN } else { i32::MAX })
}
