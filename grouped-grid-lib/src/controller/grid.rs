//! Update cycle driver

use std::sync::Arc;

use super::DatasetController;
use super::DatasetUpdate;
use super::Generation;
use super::GridSnapshotView;
use super::GridStore;
use crate::config::GridConfig;
use crate::engine::GroupEngine;
use crate::error::Error;
use crate::error::GridError;
use crate::filter::FilterState;
use crate::footer::Footer;
use crate::host::DatasetHost;
use crate::host::MetadataHost;
use crate::intent::GridIntent;
use crate::menu::MenuItem;
use crate::menu::column_menu;
use crate::resources::DefaultResources;
use crate::resources::Resources;
use crate::selection::ALL_ITEMS;
use crate::selection::GroupByOption;
use crate::selection::GroupSelection;
use crate::selection::group_by_options;
use crate::service::GridService;

/// Result of feeding one host update to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// More pages were requested; the host will update again.
    Loading,
    /// The cycle ran to completion.
    Rendered(Generation),
}

/// Drives the engines for one grid.
///
/// Each [`update`](Self::update) sorts, groups, lays out and rebuilds the
/// collapse state, notifying the store's subscribers along the way.
///
/// # Example
///
/// ```ignore
/// let service = GridService::new(Arc::new(host), "incident");
/// let mut grid = GridController::new(service, StaticDataset::default(), GridConfig::default())?;
/// grid.update(snapshot.into()).await;
/// grid.dispatch(GridIntent::GroupBy { column: "statuscode".into() }).await?;
/// ```
pub struct GridController<H, D> {
    service: GridService<H>,
    dataset: DatasetController<D>,
    store: GridStore,
    filter: FilterState,
    config: GridConfig,
    resources: Arc<dyn Resources>,
}

impl<H: MetadataHost, D: DatasetHost> GridController<H, D> {
    pub fn new(service: GridService<H>, dataset: D, config: GridConfig) -> Result<Self, Error> {
        config.validate()?;
        let store = GridStore::new(&config)?;
        Ok(Self {
            service,
            dataset: DatasetController::new(dataset).with_page_size(config.page_size),
            store,
            filter: FilterState::new(),
            config,
            resources: Arc::new(DefaultResources::new()),
        })
    }

    pub fn with_resources(mut self, resources: Arc<dyn Resources>) -> Self {
        self.resources = resources;
        self
    }

    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: Fn(&GridSnapshotView<'_>) + Send + Sync + 'static,
    {
        self.store.subscribe(subscriber);
    }

    // =========================================================================
    // Cycle
    // =========================================================================

    /// Feeds one host update through the engines.
    ///
    /// While the host has more pages, the rest of the dataset is requested
    /// instead of rendering a partial one.
    pub async fn update(&mut self, update: DatasetUpdate) -> UpdateOutcome {
        if DatasetController::<D>::needs_bulk_load(&update.paging, update.loading) {
            self.dataset.bulk_load();
            self.store.set_loading(true);
            return UpdateOutcome::Loading;
        }
        let generation = self.store.begin_cycle(update);
        self.regroup(generation).await;
        UpdateOutcome::Rendered(generation)
    }

    async fn regroup(&mut self, generation: Generation) {
        if !self.store.groups_loading() {
            return;
        }
        let grouping = GroupEngine::new(&self.service)
            .group(
                self.store.records(),
                self.store.primary_column(),
                self.store.secondary_column(),
                self.store.collapse_default(),
                self.store.collapse(),
            )
            .await;
        self.store.apply_grouping(generation, grouping);
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// Carries out a user intent.
    pub async fn dispatch(&mut self, intent: GridIntent) -> Result<(), Error> {
        if self.dataset.apply(&intent) {
            match intent {
                GridIntent::ClearFilter => self.filter.dismiss(),
                GridIntent::Select { ids } => self.store.set_selected_ids(ids),
                _ => {}
            }
            return Ok(());
        }

        match intent {
            GridIntent::EditFilter { column } => {
                let column = self
                    .store
                    .column(&column)
                    .ok_or(GridError::UnknownColumn(column))?;
                self.filter.open(column);
                self.filter.load_choices(&self.service).await?;
            }
            GridIntent::GroupBy { column } => {
                self.ensure_group_change(&column)?;
                let mut selection = self.store.selection().clone();
                selection.group_by(&column)?;
                self.set_selection(selection).await;
            }
            GridIntent::ClearGroupBy { column } => {
                self.ensure_group_change(&column)?;
                let mut selection = self.store.selection().clone();
                selection.clear(&column)?;
                self.set_selection(selection).await;
            }
            GridIntent::Open { id } => {
                let record = self
                    .store
                    .record(&id)
                    .ok_or(GridError::UnknownRecord(id))?;
                self.dataset.open(record, None);
            }
            GridIntent::Navigate { entity, id } => {
                self.service
                    .navigate_to_item(entity.as_deref(), &id)
                    .await?;
            }
            other => log::warn!("unhandled intent {:?}", other),
        }
        Ok(())
    }

    fn ensure_group_change(&self, column: &str) -> Result<(), GridError> {
        self.ensure_unlocked()?;
        if self.store.column(column).is_none() {
            return Err(GridError::UnknownColumn(column.to_string()));
        }
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<(), GridError> {
        if self.config.allow_group_change {
            Ok(())
        } else {
            Err(GridError::GroupingLocked)
        }
    }

    /// Checks a dropdown key: unset keys always pass, columns must exist.
    fn ensure_group_key(&self, key: Option<&str>) -> Result<(), GridError> {
        self.ensure_unlocked()?;
        match key {
            Some(column) if !column.is_empty() && column != ALL_ITEMS => {
                self.ensure_group_change(column)
            }
            _ => Ok(()),
        }
    }

    /// Applies the filter editor's condition.
    pub async fn apply_filter(&mut self) -> Result<(), Error> {
        match self.filter.apply() {
            Some(intent) => self.dispatch(intent).await,
            None => Ok(()),
        }
    }

    /// Sets the primary grouping from the dropdown.
    ///
    /// Unsetting the primary also unsets the secondary, whose dropdown is
    /// only offered while a primary is chosen.
    pub async fn select_primary(&mut self, key: Option<&str>) -> Result<(), Error> {
        self.ensure_group_key(key)?;
        let mut selection = self.store.selection().clone();
        selection.set_primary(key)?;
        if !selection.is_grouped() {
            selection.set_secondary(None)?;
        }
        self.set_selection(selection).await;
        Ok(())
    }

    /// Sets the secondary grouping from the dropdown.
    pub async fn select_secondary(&mut self, key: Option<&str>) -> Result<(), Error> {
        self.ensure_group_key(key)?;
        let mut selection = self.store.selection().clone();
        selection.set_secondary(key)?;
        self.set_selection(selection).await;
        Ok(())
    }

    async fn set_selection(&mut self, selection: GroupSelection) {
        let generation = self.store.set_selection(selection);
        self.regroup(generation).await;
    }

    /// Changes the collapse state of untouched groups and regroups.
    pub async fn set_collapse_default(&mut self, collapsed: bool) {
        let generation = self.store.set_collapse_default(collapsed);
        self.regroup(generation).await;
    }

    pub fn toggle_collapse(&mut self, key: &str) -> bool {
        self.store.toggle_collapse(key)
    }

    pub fn set_container_width(&mut self, width: u32) {
        self.store.set_container_width(width);
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Context menu for a visible column.
    pub fn column_menu(&self, column: &str) -> Option<Vec<MenuItem>> {
        let descriptor = self.store.descriptors().iter().find(|d| d.key == column)?;
        Some(column_menu(
            descriptor,
            self.store.selection(),
            &self.filter,
            self.config.allow_group_change,
            self.resources.as_ref(),
        ))
    }

    pub fn group_by_options(&self) -> Vec<GroupByOption> {
        group_by_options(self.store.columns(), self.store.selection())
    }

    pub fn footer(&self) -> Footer {
        Footer::new(
            self.store.paging(),
            self.store.selected_ids().len(),
            self.dataset.current_page(),
            self.dataset.is_full_screen(),
            self.resources.as_ref(),
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn store(&self) -> &GridStore {
        &self.store
    }

    pub fn service(&self) -> &GridService<H> {
        &self.service
    }

    pub fn dataset(&self) -> &DatasetController<D> {
        &self.dataset
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn resources(&self) -> &dyn Resources {
        self.resources.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticDataset;
    use crate::host::StaticHost;
    use crate::model::Column;
    use crate::model::EntityMetadata;
    use crate::model::PagingInfo;
    use crate::model::Record;
    use crate::model::metadata::AttributeMetadata;
    use crate::model::metadata::AttributeType;
    use crate::model::metadata::OptionDescriptor;

    fn controller(config: GridConfig) -> GridController<StaticHost, StaticDataset> {
        let metadata = EntityMetadata::new("incident", "incidentid").with_attribute(
            AttributeMetadata::new("statuscode", AttributeType::Status).with_options(vec![
                OptionDescriptor::new(1, "Open"),
                OptionDescriptor::new(2, "Closed"),
            ]),
        );
        let service = GridService::new(Arc::new(StaticHost::new().with_metadata(metadata)), "incident");
        GridController::new(service, StaticDataset::default(), config).unwrap()
    }

    fn update() -> DatasetUpdate {
        DatasetUpdate {
            columns: vec![
                Column::new("title", "Title", "SingleLine.Text").with_order(0),
                Column::new("statuscode", "status", "OptionSet").with_order(1),
            ],
            records: vec![
                Record::new("incident", "1").set("title", "c").set_option("statuscode", 2, "Closed"),
                Record::new("incident", "2").set("title", "a").set_option("statuscode", 1, "Open"),
                Record::new("incident", "3").set("title", "b").set_option("statuscode", 1, "Open"),
            ],
            ..DatasetUpdate::default()
        }
    }

    #[tokio::test]
    async fn group_by_intent_regroups() {
        let mut grid = controller(GridConfig::default());
        grid.update(update()).await;
        assert!(grid.store().grouping().is_none());

        grid.dispatch(GridIntent::GroupBy {
            column: "statuscode".to_string(),
        })
        .await
        .unwrap();

        let grouping = grid.store().grouping().unwrap();
        let keys: Vec<_> = grouping.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Open", "Closed"]);
        assert_eq!(grouping.groups[0].name, "Status: Open");
        assert_eq!(grid.store().rendered_ids(), ["2", "3", "1"]);
    }

    #[tokio::test]
    async fn pending_pages_are_loaded_first() {
        let mut grid = controller(GridConfig::default());
        let mut first = update();
        first.paging = PagingInfo {
            has_next_page: true,
            ..PagingInfo::default()
        };
        assert_eq!(grid.update(first).await, UpdateOutcome::Loading);
        assert_eq!(grid.dataset().host().next_page_requests, 1);
        assert!(grid.store().records().is_empty());

        assert!(matches!(grid.update(update()).await, UpdateOutcome::Rendered(_)));
        assert_eq!(grid.store().records().len(), 3);
    }

    #[tokio::test]
    async fn locked_grouping_rejects_changes() {
        let mut grid = controller(GridConfig {
            allow_group_change: false,
            ..GridConfig::default()
        });
        grid.update(update()).await;
        let result = grid
            .dispatch(GridIntent::GroupBy {
                column: "statuscode".to_string(),
            })
            .await;
        assert!(matches!(result, Err(Error::Grid(GridError::GroupingLocked))));
    }

    #[tokio::test]
    async fn locked_grouping_rejects_dropdown_changes() {
        let mut grid = controller(GridConfig {
            allow_group_change: false,
            grouping_column: Some("statuscode".to_string()),
            ..GridConfig::default()
        });
        grid.update(update()).await;

        let primary = grid.select_primary(Some("title")).await;
        assert!(matches!(primary, Err(Error::Grid(GridError::GroupingLocked))));
        let cleared = grid.select_primary(None).await;
        assert!(matches!(cleared, Err(Error::Grid(GridError::GroupingLocked))));
        let secondary = grid.select_secondary(Some("title")).await;
        assert!(matches!(secondary, Err(Error::Grid(GridError::GroupingLocked))));
        assert_eq!(grid.store().selection().primary(), Some("statuscode"));
        assert_eq!(grid.store().selection().secondary(), None);
    }

    #[tokio::test]
    async fn dropdown_refuses_the_secondary_as_primary() {
        let mut grid = controller(GridConfig::default());
        grid.update(update()).await;
        grid.select_primary(Some("title")).await.unwrap();
        grid.select_secondary(Some("statuscode")).await.unwrap();

        let result = grid.select_primary(Some("statuscode")).await;
        assert!(matches!(
            result,
            Err(Error::Grid(GridError::GroupingConflict(_)))
        ));
        assert_eq!(grid.store().selection().primary(), Some("title"));

        let unknown = grid.select_secondary(Some("nope")).await;
        assert!(matches!(unknown, Err(Error::Grid(GridError::UnknownColumn(_)))));
    }

    #[tokio::test]
    async fn clearing_primary_from_dropdown_ungroups() {
        let mut grid = controller(GridConfig::default());
        grid.update(update()).await;
        grid.select_primary(Some("title")).await.unwrap();
        grid.select_secondary(Some("statuscode")).await.unwrap();
        assert!(grid.store().grouping().unwrap().groups[0].children.is_some());

        grid.select_primary(Some(ALL_ITEMS)).await.unwrap();
        let selection = grid.store().selection();
        assert_eq!(selection.primary(), None);
        assert_eq!(selection.secondary(), None);
        assert!(grid.store().grouping().is_none());
        assert_eq!(grid.store().rendered_ids(), ["2", "3", "1"]);
    }

    #[tokio::test]
    async fn collapse_default_reseeds_untoggled_groups() {
        let mut grid = controller(GridConfig {
            grouping_column: Some("statuscode".to_string()),
            ..GridConfig::default()
        });
        grid.update(update()).await;
        assert!(grid.toggle_collapse("Open"));

        let collapsed = |grid: &GridController<StaticHost, StaticDataset>| -> Vec<bool> {
            let grouping = grid.store().grouping().unwrap();
            grouping.groups.iter().map(|g| g.is_collapsed).collect()
        };

        grid.set_collapse_default(true).await;
        assert_eq!(collapsed(&grid), vec![true, true]);

        grid.set_collapse_default(false).await;
        assert_eq!(collapsed(&grid), vec![true, false]);
        assert!(!grid.store().collapse_default());
    }

    #[tokio::test]
    async fn edit_filter_loads_choices() {
        let mut grid = controller(GridConfig::default());
        grid.update(update()).await;
        grid.dispatch(GridIntent::EditFilter {
            column: "statuscode".to_string(),
        })
        .await
        .unwrap();
        assert!(grid.filter().is_visible());
        assert_eq!(grid.filter().choices().len(), 2);

        grid.filter_mut().toggle_choice("1", true);
        grid.apply_filter().await.unwrap();
        assert_eq!(grid.dataset().host().filtering.conditions.len(), 1);
        assert_eq!(grid.dataset().host().refresh_count, 1);
    }

    #[tokio::test]
    async fn selection_feeds_footer() {
        let mut grid = controller(GridConfig::default());
        grid.update(update()).await;
        grid.dispatch(GridIntent::Select {
            ids: vec!["1".to_string(), "2".to_string()],
        })
        .await
        .unwrap();
        assert_eq!(grid.dataset().host().selected_ids.len(), 2);
        assert_eq!(grid.footer().selected, 2);
        assert_eq!(grid.footer().rows, "0");
    }
}
