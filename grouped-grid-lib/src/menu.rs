//! Column context menu

use crate::engine::ColumnDescriptor;
use crate::filter::FilterState;
use crate::intent::GridIntent;
use crate::model::ColumnKind;
use crate::resources::Resources;
use crate::selection::GroupSelection;

/// Menu sections, rendered with a divider between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSection {
    Sort,
    Group,
    Filter,
}

/// One entry of a column's context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub key: &'static str,
    pub text: String,
    pub section: MenuSection,
    /// `Some` for checkable items.
    pub checked: Option<bool>,
    pub disabled: bool,
    pub intent: GridIntent,
}

/// Builds the context menu for one column.
pub fn column_menu(
    column: &ColumnDescriptor,
    selection: &GroupSelection,
    filter: &FilterState,
    allow_group_change: bool,
    resources: &dyn Resources,
) -> Vec<MenuItem> {
    let mut items = Vec::new();
    let (up, down) = sort_labels(column.kind);
    let grouped = selection.uses(&column.key);

    items.push(MenuItem {
        key: "aToZ",
        text: resources.get_string(up),
        section: MenuSection::Sort,
        checked: Some(column.is_sorted && !column.is_sorted_descending),
        disabled: grouped,
        intent: GridIntent::Sort {
            column: column.key.clone(),
            descending: false,
        },
    });
    items.push(MenuItem {
        key: "zToA",
        text: resources.get_string(down),
        section: MenuSection::Sort,
        checked: Some(column.is_sorted && column.is_sorted_descending),
        disabled: grouped,
        intent: GridIntent::Sort {
            column: column.key.clone(),
            descending: true,
        },
    });

    if allow_group_change {
        items.push(if grouped {
            let blocked =
                selection.primary() == Some(column.key.as_str()) && selection.secondary().is_some();
            MenuItem {
                key: "clearGroupBy",
                text: resources.get_string(if blocked {
                    "Label_ClearGroupBySecondary"
                } else {
                    "Label_ClearGroupBy"
                }),
                section: MenuSection::Group,
                checked: None,
                disabled: blocked,
                intent: GridIntent::ClearGroupBy {
                    column: column.key.clone(),
                },
            }
        } else {
            MenuItem {
                key: "groupBy",
                text: resources.get_string("Label_GroupBy"),
                section: MenuSection::Group,
                checked: None,
                disabled: selection.is_full(),
                intent: GridIntent::GroupBy {
                    column: column.key.clone(),
                },
            }
        });
    }

    items.push(MenuItem {
        key: "filter",
        text: resources.get_string("Label_ColumnFilter"),
        section: MenuSection::Filter,
        checked: None,
        disabled: false,
        intent: GridIntent::EditFilter {
            column: column.key.clone(),
        },
    });
    if filter.is_active_for(&column.key) {
        items.push(MenuItem {
            key: "clearFilter",
            text: resources.get_string("Label_ClearColumnFilter"),
            section: MenuSection::Filter,
            checked: None,
            disabled: false,
            intent: GridIntent::ClearFilter,
        });
    }

    items
}

fn sort_labels(kind: ColumnKind) -> (&'static str, &'static str) {
    match kind {
        ColumnKind::Number => ("Label_SortNumberUp", "Label_SortNumberDown"),
        ColumnKind::Date => ("Label_SortDateUp", "Label_SortDateDown"),
        _ => ("Label_SortAZ", "Label_SortZA"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::layout_columns;
    use crate::model::Column;
    use crate::model::FilterExpression;
    use crate::model::SortDirection;
    use crate::model::SortStatus;
    use crate::resources::DefaultResources;

    fn descriptors(selection: &GroupSelection) -> Vec<ColumnDescriptor> {
        let columns = vec![
            Column::new("region", "Region", "SingleLine.Text").with_order(0),
            Column::new("amount", "Amount", "Money.None").with_order(1),
            Column::new("status", "Status", "OptionSet").with_order(2),
        ];
        let sorting = vec![SortStatus::new("amount", SortDirection::Descending)];
        layout_columns(&columns, &sorting, &FilterExpression::default(), selection, 900)
    }

    fn keys(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.key).collect()
    }

    #[test]
    fn ungrouped_column_offers_group_by() {
        let selection = GroupSelection::default();
        let columns = descriptors(&selection);
        let items = column_menu(
            &columns[1],
            &selection,
            &FilterState::new(),
            true,
            &DefaultResources::new(),
        );
        assert_eq!(keys(&items), vec!["aToZ", "zToA", "groupBy", "filter"]);
        assert_eq!(items[0].text, "Sort smallest to largest");
        assert_eq!(items[1].checked, Some(true));
        assert!(!items[0].disabled);
    }

    #[test]
    fn primary_cannot_be_cleared_before_secondary() {
        let selection = GroupSelection::from_keys(Some("region"), Some("status")).unwrap();
        let columns = descriptors(&selection);
        let resources = DefaultResources::new();

        let items = column_menu(&columns[0], &selection, &FilterState::new(), true, &resources);
        let clear = &items[2];
        assert_eq!(clear.key, "clearGroupBy");
        assert!(clear.disabled);
        assert_eq!(clear.text, resources.get_string("Label_ClearGroupBySecondary"));
        assert!(items[0].disabled && items[1].disabled);

        let items = column_menu(&columns[2], &selection, &FilterState::new(), true, &resources);
        assert!(!items[2].disabled);
        assert_eq!(items[2].text, resources.get_string("Label_ClearGroupBy"));
    }

    #[test]
    fn group_items_hidden_when_group_change_disallowed() {
        let selection = GroupSelection::default();
        let columns = descriptors(&selection);
        let items = column_menu(
            &columns[0],
            &selection,
            &FilterState::new(),
            false,
            &DefaultResources::new(),
        );
        assert_eq!(keys(&items), vec!["aToZ", "zToA", "filter"]);
    }

    #[test]
    fn active_filter_adds_clear_item() {
        let selection = GroupSelection::default();
        let columns = descriptors(&selection);
        let mut filter = FilterState::new();
        filter.open(&Column::new("region", "Region", "SingleLine.Text"));
        filter.set_value("North");

        let items = column_menu(&columns[0], &selection, &filter, true, &DefaultResources::new());
        assert_eq!(keys(&items).last(), Some(&"clearFilter"));

        let items = column_menu(&columns[1], &selection, &filter, true, &DefaultResources::new());
        assert_eq!(keys(&items).last(), Some(&"filter"));
    }
}
