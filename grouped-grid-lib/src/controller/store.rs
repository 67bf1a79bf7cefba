//! Grid state store with change notification

use std::collections::HashMap;
use std::fmt;

use crate::config::GridConfig;
use crate::engine::CollapseState;
use crate::engine::ColumnDescriptor;
use crate::engine::layout_columns;
use crate::engine::sort_records;
use crate::error::GridError;
use crate::host::Snapshot;
use crate::model::Column;
use crate::model::FilterExpression;
use crate::model::Grouping;
use crate::model::PagingInfo;
use crate::model::Record;
use crate::model::SortStatus;
use crate::selection::GroupSelection;

/// Counter identifying one recomputation cycle.
///
/// Grouping results carry the generation they were started for; results
/// from an older generation are discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the host hands over on one update.
#[derive(Debug, Clone, Default)]
pub struct DatasetUpdate {
    pub columns: Vec<Column>,
    pub records: Vec<Record>,
    pub sorting: Vec<SortStatus>,
    pub filtering: FilterExpression,
    pub paging: PagingInfo,
    /// The host is still fetching records.
    pub loading: bool,
}

impl From<Snapshot> for DatasetUpdate {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            columns: snapshot.columns,
            records: snapshot.records,
            sorting: snapshot.sorting,
            filtering: snapshot.filtering,
            paging: snapshot.paging,
            loading: snapshot.loading,
        }
    }
}

/// Read-only view handed to subscribers.
#[derive(Debug, Clone, Copy)]
pub struct GridSnapshotView<'a> {
    pub generation: Generation,
    pub columns: &'a [ColumnDescriptor],
    /// Record ids in rendering order.
    pub rendered_ids: &'a [String],
    pub grouping: Option<&'a Grouping>,
    pub selection: &'a GroupSelection,
    pub paging: &'a PagingInfo,
    /// Records are still being fetched.
    pub loading: bool,
    /// Groups for the current generation have not arrived yet.
    pub groups_loading: bool,
}

type Subscriber = Box<dyn Fn(&GridSnapshotView<'_>) + Send + Sync>;

/// State of one grid instance.
///
/// Every change notifies the subscribers with a [`GridSnapshotView`].
pub struct GridStore {
    columns: Vec<Column>,
    records: Vec<Record>,
    record_index: HashMap<String, usize>,
    sorting: Vec<SortStatus>,
    filtering: FilterExpression,
    paging: PagingInfo,
    loading: bool,

    selection: GroupSelection,
    collapse: CollapseState,
    collapse_default: bool,
    container_width: u32,
    selected_ids: Vec<String>,

    sorted_ids: Vec<String>,
    descriptors: Vec<ColumnDescriptor>,
    grouping: Option<Grouping>,
    groups_loading: bool,
    generation: Generation,

    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for GridStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridStore")
            .field("generation", &self.generation)
            .field("records", &self.records.len())
            .field("selection", &self.selection)
            .field("groups_loading", &self.groups_loading)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl GridStore {
    /// Empty store seeded with the configured grouping and collapse default.
    pub fn new(config: &GridConfig) -> Result<Self, GridError> {
        let selection = GroupSelection::from_keys(
            config.grouping_column.as_deref(),
            config.grouping_column2.as_deref(),
        )?;
        Ok(Self {
            columns: Vec::new(),
            records: Vec::new(),
            record_index: HashMap::new(),
            sorting: Vec::new(),
            filtering: FilterExpression::default(),
            paging: PagingInfo::default(),
            loading: false,
            selection,
            collapse: CollapseState::new(),
            collapse_default: config.collapsed,
            container_width: config.container_width,
            selected_ids: Vec::new(),
            sorted_ids: Vec::new(),
            descriptors: Vec::new(),
            grouping: None,
            groups_loading: false,
            generation: Generation::default(),
            subscribers: Vec::new(),
        })
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Registers a callback run after every change.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: Fn(&GridSnapshotView<'_>) + Send + Sync + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn view(&self) -> GridSnapshotView<'_> {
        GridSnapshotView {
            generation: self.generation,
            columns: &self.descriptors,
            rendered_ids: self.rendered_ids(),
            grouping: self.grouping.as_ref(),
            selection: &self.selection,
            paging: &self.paging,
            loading: self.loading,
            groups_loading: self.groups_loading,
        }
    }

    fn notify(&self) {
        if self.subscribers.is_empty() {
            return;
        }
        let view = self.view();
        for subscriber in &self.subscribers {
            subscriber(&view);
        }
    }

    // =========================================================================
    // Cycles
    // =========================================================================

    /// Replaces the dataset and starts a new cycle.
    ///
    /// Columns bound to the grouping aliases take over the grouping slots.
    pub fn begin_cycle(&mut self, update: DatasetUpdate) -> Generation {
        match GroupSelection::from_columns(
            &update.columns,
            self.selection.primary(),
            self.selection.secondary(),
        ) {
            Ok(selection) => self.selection = selection,
            Err(e) => log::warn!("ignoring grouping bound by the host: {}", e),
        }
        self.columns = update.columns;
        self.records = update.records;
        self.record_index = self
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| (record.record_id().to_string(), index))
            .collect();
        self.sorting = update.sorting;
        self.filtering = update.filtering;
        self.paging = update.paging;
        self.loading = update.loading;
        self.recompute()
    }

    /// Replaces the grouping selection and starts a new cycle.
    pub fn set_selection(&mut self, selection: GroupSelection) -> Generation {
        self.selection = selection;
        self.recompute()
    }

    /// Changes the flag used for groups nobody has toggled, and starts a new cycle.
    pub fn set_collapse_default(&mut self, collapsed: bool) -> Generation {
        self.collapse_default = collapsed;
        self.recompute()
    }

    fn recompute(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.sorted_ids = sort_records(
            &self.records,
            &self.columns,
            self.primary_column(),
            self.secondary_column(),
        )
        .into_iter()
        .map(|r| r.record_id().to_string())
        .collect();
        self.relayout();
        self.groups_loading = self.selection.is_grouped();
        if !self.groups_loading {
            self.grouping = None;
        }
        log::debug!(
            "cycle {} started with {} records",
            self.generation,
            self.records.len()
        );
        self.notify();
        self.generation
    }

    fn relayout(&mut self) {
        self.descriptors = layout_columns(
            &self.columns,
            &self.sorting,
            &self.filtering,
            &self.selection,
            self.container_width,
        );
    }

    /// Stores the grouping computed for `generation`.
    ///
    /// Returns `false`, leaving the state untouched, when a newer cycle has
    /// started since.
    pub fn apply_grouping(&mut self, generation: Generation, grouping: Option<Grouping>) -> bool {
        if generation != self.generation {
            log::debug!(
                "discarding groups of cycle {}, current cycle is {}",
                generation,
                self.generation
            );
            return false;
        }
        if let Some(grouping) = &grouping {
            self.collapse.rebuild_from(&grouping.groups);
        }
        self.grouping = grouping;
        self.groups_loading = false;
        self.notify();
        true
    }

    /// Inverts the collapse flag of one group and returns the new value.
    pub fn toggle_collapse(&mut self, key: &str) -> bool {
        let collapsed = self.collapse.toggle(key);
        if let Some(grouping) = self.grouping.as_mut() {
            self.collapse.apply_to(&mut grouping.groups);
        }
        self.notify();
        collapsed
    }

    pub fn set_container_width(&mut self, width: u32) {
        self.container_width = width;
        self.relayout();
        self.notify();
    }

    /// Marks the records as being fetched.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.notify();
    }

    pub fn set_selected_ids(&mut self, ids: Vec<String>) {
        self.selected_ids = ids;
        self.notify();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&Record> {
        self.record_index.get(id).map(|&index| &self.records[index])
    }

    pub fn primary_column(&self) -> Option<&Column> {
        self.selection.primary().and_then(|name| self.column(name))
    }

    pub fn secondary_column(&self) -> Option<&Column> {
        self.selection.secondary().and_then(|name| self.column(name))
    }

    pub fn selection(&self) -> &GroupSelection {
        &self.selection
    }

    pub fn collapse(&self) -> &CollapseState {
        &self.collapse
    }

    pub fn collapse_default(&self) -> bool {
        self.collapse_default
    }

    pub fn sorting(&self) -> &[SortStatus] {
        &self.sorting
    }

    pub fn filtering(&self) -> &FilterExpression {
        &self.filtering
    }

    pub fn paging(&self) -> &PagingInfo {
        &self.paging
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn groups_loading(&self) -> bool {
        self.groups_loading
    }

    pub fn selected_ids(&self) -> &[String] {
        &self.selected_ids
    }

    pub fn descriptors(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    pub fn grouping(&self) -> Option<&Grouping> {
        self.grouping.as_ref()
    }

    /// Ids as output by the sort engine.
    pub fn sorted_ids(&self) -> &[String] {
        &self.sorted_ids
    }

    /// Ids in rendering order: the grouping's order when grouped.
    ///
    /// A grouping that failed for this cycle is empty and renders nothing.
    pub fn rendered_ids(&self) -> &[String] {
        match &self.grouping {
            Some(grouping) => &grouping.ordered_ids,
            None => &self.sorted_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::model::Group;

    fn update() -> DatasetUpdate {
        DatasetUpdate {
            columns: vec![
                Column::new("title", "Title", "SingleLine.Text").with_order(0),
                Column::new("region", "Region", "SingleLine.Text").with_order(1),
            ],
            records: vec![
                Record::new("incident", "1").set("title", "b").set("region", "B"),
                Record::new("incident", "2").set("title", "a").set("region", "A"),
            ],
            ..DatasetUpdate::default()
        }
    }

    fn grouping(key: &str) -> Grouping {
        Grouping {
            groups: vec![Group {
                key: key.to_string(),
                name: format!("Region: {}", key),
                start_index: 0,
                count: 1,
                level: 0,
                is_collapsed: false,
                color: "black".to_string(),
                children: None,
            }],
            ordered_ids: vec!["2".to_string()],
        }
    }

    fn grouped_config() -> GridConfig {
        GridConfig {
            grouping_column: Some("region".to_string()),
            ..GridConfig::default()
        }
    }

    #[test]
    fn ungrouped_cycle_sorts_by_first_column() {
        let mut store = GridStore::new(&GridConfig::default()).unwrap();
        store.begin_cycle(update());
        assert_eq!(store.rendered_ids(), ["2", "1"]);
        assert!(!store.groups_loading());
        assert_eq!(store.descriptors().len(), 2);
    }

    #[test]
    fn stale_grouping_is_discarded() {
        let mut store = GridStore::new(&grouped_config()).unwrap();
        let first = store.begin_cycle(update());
        let second = store.begin_cycle(update());
        assert!(store.groups_loading());

        assert!(!store.apply_grouping(first, Some(grouping("stale"))));
        assert!(store.grouping().is_none());

        assert!(store.apply_grouping(second, Some(grouping("A"))));
        assert_eq!(store.grouping().unwrap().groups[0].key, "A");
        assert!(!store.groups_loading());
    }

    #[test]
    fn toggle_updates_groups_in_place() {
        let mut store = GridStore::new(&grouped_config()).unwrap();
        let generation = store.begin_cycle(update());
        store.apply_grouping(generation, Some(grouping("A")));

        assert!(store.toggle_collapse("A"));
        assert!(store.grouping().unwrap().groups[0].is_collapsed);
        assert!(store.collapse().resolve("A", false));
    }

    #[test]
    fn subscribers_see_every_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut store = GridStore::new(&grouped_config()).unwrap();
        let seen = Arc::clone(&calls);
        store.subscribe(move |view| {
            assert!(view.selection.is_grouped());
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let generation = store.begin_cycle(update());
        store.apply_grouping(generation, Some(grouping("A")));
        store.set_container_width(800);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn failed_grouping_renders_nothing() {
        let mut store = GridStore::new(&grouped_config()).unwrap();
        let generation = store.begin_cycle(update());
        assert!(store.apply_grouping(generation, Some(Grouping::default())));
        assert!(store.rendered_ids().is_empty());
        assert!(store.view().rendered_ids.is_empty());
        assert_eq!(store.sorted_ids().len(), 2);
    }

    #[test]
    fn records_are_found_by_id_after_each_cycle() {
        let mut store = GridStore::new(&GridConfig::default()).unwrap();
        store.begin_cycle(update());
        assert_eq!(store.record("2").map(|r| r.record_id()), Some("2"));

        let mut next = update();
        next.records.remove(1);
        store.begin_cycle(next);
        assert!(store.record("2").is_none());
        assert_eq!(store.record("1").map(|r| r.record_id()), Some("1"));
    }

    #[test]
    fn alias_bound_column_takes_primary_slot() {
        let mut store = GridStore::new(&GridConfig::default()).unwrap();
        let mut update = update();
        update.columns[1].alias = Some("groupingColumn".to_string());
        store.begin_cycle(update);
        assert_eq!(store.selection().primary(), Some("region"));
        assert_eq!(store.primary_column().map(|c| c.name.as_str()), Some("region"));
        assert!(store.groups_loading());
    }
}
