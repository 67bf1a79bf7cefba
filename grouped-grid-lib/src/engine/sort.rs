//! Record ordering

use std::cmp::Ordering;

use crate::model::Column;
use crate::model::Record;

/// Orders records for display.
///
/// - No grouping: by the first visible column, relational comparison.
/// - Primary only: by the primary column, relational comparison.
/// - Both: by the primary then the secondary column, string comparison.
///
/// The sort is stable and the input is left untouched.
pub fn sort_records<'a, I>(
    records: I,
    columns: &[Column],
    primary: Option<&Column>,
    secondary: Option<&Column>,
) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    match (primary, secondary) {
        (Some(primary), Some(secondary)) => {
            let mut sorted: Vec<&Record> = records.into_iter().collect();
            sorted.sort_by(|a, b| {
                string_cmp(a, b, &primary.name).then_with(|| string_cmp(a, b, &secondary.name))
            });
            sorted
        }
        (Some(primary), None) => sort_by_property(records, &primary.name),
        (None, _) => match first_visible_column(columns) {
            Some(first) => sort_by_property(records, &first.name),
            None => records.into_iter().collect(),
        },
    }
}

/// Stable ascending sort on one column's raw values.
pub fn sort_by_property<'a, I>(records: I, column: &str) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut sorted: Vec<&Record> = records.into_iter().collect();
    sorted.sort_by(|a, b| a.get_value(column).sort_cmp(b.get_value(column)));
    sorted
}

/// The visible column with the lowest `order`; the first one on ties.
pub fn first_visible_column(columns: &[Column]) -> Option<&Column> {
    columns
        .iter()
        .filter(|c| c.is_visible())
        .min_by_key(|c| c.order)
}

/// Case-insensitive comparison, ties broken by the exact text.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn string_cmp(a: &Record, b: &Record, column: &str) -> Ordering {
    locale_cmp(
        &a.get_value(column).to_key_string(),
        &b.get_value(column).to_key_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.record_id().to_string()).collect()
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("priority", "Priority", "Whole.None").with_order(1),
            Column::new("title", "Title", "SingleLine.Text").with_order(0),
            Column::new("secret", "Secret", "SingleLine.Text").with_order(-1),
        ]
    }

    #[test]
    fn ungrouped_sorts_by_first_visible_column() {
        let records = vec![
            Record::new("incident", "1").set("title", "b"),
            Record::new("incident", "2").set("title", "a"),
            Record::new("incident", "3").set("title", "c"),
        ];
        let sorted = sort_records(&records, &columns(), None, None);
        assert_eq!(ids(&sorted), vec!["2", "1", "3"]);
    }

    #[test]
    fn equal_values_keep_input_order() {
        let records = vec![
            Record::new("incident", "1").set("priority", 2),
            Record::new("incident", "2").set("priority", 1),
            Record::new("incident", "3").set("priority", 2),
            Record::new("incident", "4").set("priority", 1),
        ];
        let sorted = sort_by_property(&records, "priority");
        assert_eq!(ids(&sorted), vec!["2", "4", "1", "3"]);
        // input untouched
        assert_eq!(records[0].record_id(), "1");
    }

    #[test]
    fn nulls_sort_first() {
        let records = vec![
            Record::new("incident", "1").set("title", "b"),
            Record::new("incident", "2").set("title", Value::Null),
            Record::new("incident", "3"),
            Record::new("incident", "4").set("title", "a"),
        ];
        let sorted = sort_by_property(&records, "title");
        assert_eq!(ids(&sorted), vec!["2", "3", "4", "1"]);
    }

    #[test]
    fn nested_sort_orders_by_primary_then_secondary() {
        let region = Column::new("region", "Region", "SingleLine.Text");
        let status = Column::new("status", "Status", "SingleLine.Text");
        let records = vec![
            Record::new("incident", "1").set("region", "B").set("status", "y"),
            Record::new("incident", "2").set("region", "a").set("status", "y"),
            Record::new("incident", "3").set("region", "B").set("status", "x"),
            Record::new("incident", "4").set("region", "A").set("status", "x"),
        ];
        let sorted = sort_records(&records, &[], Some(&region), Some(&status));
        assert_eq!(ids(&sorted), vec!["4", "2", "3", "1"]);

        let again = sort_records(sorted.iter().copied(), &[], Some(&region), Some(&status));
        assert_eq!(ids(&again), ids(&sorted));
    }

    #[test]
    fn locale_cmp_ignores_case_first() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("a", "A"), Ordering::Greater);
        assert_eq!(locale_cmp("x", "x"), Ordering::Equal);
    }
}
