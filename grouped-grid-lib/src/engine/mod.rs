//! Grouping, sorting and column layout
//!
//! The engines are pure transformations over one update cycle's records and
//! columns. Only [`GroupEngine`] reaches the host, for option-set metadata.

mod collapse;
mod group;
mod layout;
mod sort;

pub use collapse::CollapseState;
pub use group::GroupEngine;
pub use layout::ColumnDescriptor;
pub use layout::FALLBACK_MIN_WIDTH;
pub use layout::WIDTH_PADDING;
pub use layout::layout_columns;
pub use sort::first_visible_column;
pub use sort::locale_cmp;
pub use sort::sort_by_property;
pub use sort::sort_records;
