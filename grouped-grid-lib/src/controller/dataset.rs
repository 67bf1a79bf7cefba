//! Outbound requests to the dataset

use crate::config::DEFAULT_PAGE_SIZE;
use crate::host::DatasetHost;
use crate::intent::GridIntent;
use crate::model::FilterCondition;
use crate::model::FilterExpression;
use crate::model::PagingInfo;
use crate::model::Record;
use crate::model::SortDirection;
use crate::model::SortStatus;

/// Applies [`GridIntent`]s to a [`DatasetHost`] and tracks the current page.
#[derive(Debug)]
pub struct DatasetController<D> {
    host: D,
    current_page: u32,
    page_size: usize,
    full_screen: bool,
}

impl<D: DatasetHost> DatasetController<D> {
    pub fn new(host: D) -> Self {
        Self {
            host,
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            full_screen: false,
        }
    }

    /// Page size requested by [`bulk_load`](Self::bulk_load).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn host(&self) -> &D {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut D {
        &mut self.host
    }

    pub fn into_host(self) -> D {
        self.host
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Returns `true` when more pages must be pulled before rendering.
    pub fn needs_bulk_load(paging: &PagingInfo, loading: bool) -> bool {
        !loading && paging.has_next_page
    }

    /// Widens the page size and requests the next page.
    pub fn bulk_load(&mut self) {
        log::debug!("loading next page with page size {}", self.page_size);
        self.host.set_page_size(self.page_size);
        self.host.load_next_page();
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// Carries out `intent`.
    ///
    /// Returns `false` for intents that concern grid-local state (grouping,
    /// the filter editor, record lookups) and are left to the caller.
    pub fn apply(&mut self, intent: &GridIntent) -> bool {
        match intent {
            GridIntent::Sort { column, descending } => self.sort(column, *descending),
            GridIntent::Filter {
                column,
                operator,
                value,
                entity_alias,
            } => {
                let mut condition = FilterCondition::new(column.clone(), *operator, value.clone());
                condition.entity_alias_name = entity_alias.clone();
                self.filter(condition);
            }
            GridIntent::ClearFilter => self.clear_filter(),
            GridIntent::FirstPage => self.first_page(),
            GridIntent::NextPage => self.next_page(),
            GridIntent::PreviousPage => self.previous_page(),
            GridIntent::Select { ids } => self.host.set_selected_record_ids(ids),
            GridIntent::FullScreen => {
                self.full_screen = true;
                self.host.set_full_screen(true);
            }
            GridIntent::EditFilter { .. }
            | GridIntent::GroupBy { .. }
            | GridIntent::ClearGroupBy { .. }
            | GridIntent::Open { .. }
            | GridIntent::Navigate { .. } => return false,
        }
        true
    }

    /// Replaces the sort with `column` alone and refreshes.
    pub fn sort(&mut self, column: &str, descending: bool) {
        let direction = if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let sorting = self.host.sorting_mut();
        sorting.clear();
        sorting.push(SortStatus::new(column, direction));
        self.host.refresh();
    }

    /// Replaces the filter with one condition and refreshes.
    pub fn filter(&mut self, condition: FilterCondition) {
        self.host.set_filter(FilterExpression::single(condition));
        self.host.refresh();
    }

    pub fn clear_filter(&mut self) {
        self.host.clear_filter();
        self.host.refresh();
    }

    pub fn first_page(&mut self) {
        self.current_page = 1;
        self.host.load_exact_page(self.current_page);
    }

    pub fn next_page(&mut self) {
        self.current_page += 1;
        self.host.load_exact_page(self.current_page);
    }

    /// Steps back one page, staying on the first page.
    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
        self.host.load_exact_page(self.current_page);
    }

    /// Opens `record` through the dataset.
    ///
    /// Records without a GUID id cannot be opened and are skipped.
    pub fn open(&mut self, record: &Record, name_column: Option<&str>) {
        match record.named_reference(name_column) {
            Some(reference) => self.host.open_dataset_item(&reference),
            None => log::warn!("record '{}' has no GUID id, not opening", record.record_id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticDataset;
    use crate::model::ConditionOperator;
    use crate::model::FilterValue;

    #[test]
    fn sort_replaces_existing_entries() {
        let mut dataset = StaticDataset::default();
        dataset.sorting.push(SortStatus::new("a", SortDirection::Ascending));
        dataset.sorting.push(SortStatus::new("b", SortDirection::Ascending));

        let mut controller = DatasetController::new(dataset);
        assert!(controller.apply(&GridIntent::Sort {
            column: "title".to_string(),
            descending: true,
        }));

        let host = controller.host();
        assert_eq!(host.sorting, vec![SortStatus::new("title", SortDirection::Descending)]);
        assert_eq!(host.refresh_count, 1);
    }

    #[test]
    fn filter_and_clear_refresh() {
        let mut controller = DatasetController::new(StaticDataset::default());
        controller.apply(&GridIntent::Filter {
            column: "name".to_string(),
            operator: ConditionOperator::Like,
            value: FilterValue::from("%north"),
            entity_alias: Some("acct".to_string()),
        });
        let condition = &controller.host().filtering.conditions[0];
        assert_eq!(condition.qualified_name(), "acct.name");

        controller.apply(&GridIntent::ClearFilter);
        assert!(controller.host().filtering.conditions.is_empty());
        assert_eq!(controller.host().refresh_count, 2);
    }

    #[test]
    fn paging_tracks_current_page() {
        let mut controller = DatasetController::new(StaticDataset::default());
        controller.apply(&GridIntent::NextPage);
        controller.apply(&GridIntent::NextPage);
        controller.apply(&GridIntent::PreviousPage);
        controller.apply(&GridIntent::FirstPage);
        controller.apply(&GridIntent::PreviousPage);
        assert_eq!(controller.host().pages_loaded, vec![2, 3, 2, 1, 1]);
        assert_eq!(controller.current_page(), 1);
    }

    #[test]
    fn bulk_load_when_more_pages_wait() {
        let paging = PagingInfo {
            has_next_page: true,
            ..PagingInfo::default()
        };
        assert!(DatasetController::<StaticDataset>::needs_bulk_load(&paging, false));
        assert!(!DatasetController::<StaticDataset>::needs_bulk_load(&paging, true));
        assert!(!DatasetController::<StaticDataset>::needs_bulk_load(
            &PagingInfo::default(),
            false
        ));

        let mut controller = DatasetController::new(StaticDataset::default());
        controller.bulk_load();
        assert_eq!(controller.host().page_size, Some(5000));
        assert_eq!(controller.host().next_page_requests, 1);
    }

    #[test]
    fn local_intents_are_left_to_caller() {
        let mut controller = DatasetController::new(StaticDataset::default());
        assert!(!controller.apply(&GridIntent::GroupBy {
            column: "region".to_string(),
        }));
        assert!(controller.apply(&GridIntent::FullScreen));
        assert!(controller.host().full_screen);
        assert!(controller.is_full_screen());
    }

    #[test]
    fn open_skips_non_guid_records() {
        let mut controller = DatasetController::new(StaticDataset::default());
        controller.open(&Record::new("incident", "1"), None);
        assert!(controller.host().opened.is_empty());

        let record = Record::new("incident", "8f7d1c2e-0000-0000-0000-000000000001")
            .set("title", "Printer");
        controller.open(&record, Some("title"));
        assert_eq!(controller.host().opened[0].name.as_deref(), Some("Printer"));
    }
}
