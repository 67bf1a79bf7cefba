//! Partitioning of records into display groups

use indexmap::IndexMap;

use super::CollapseState;
use super::locale_cmp;
use super::sort_by_property;
use crate::error::Error;
use crate::host::MetadataHost;
use crate::model::Column;
use crate::model::ColumnKind;
use crate::model::Group;
use crate::model::Grouping;
use crate::model::Record;
use crate::model::metadata::OptionDescriptor;
use crate::service::GridService;
use crate::service::option_color;

/// Builds one- or two-level groups, resolving option-set order and colors
/// through a [`GridService`].
///
/// # Example
///
/// ```ignore
/// let engine = GroupEngine::new(&service);
/// let grouping = engine
///     .group(&records, Some(&status), None, false, &CollapseState::new())
///     .await;
/// ```
pub struct GroupEngine<'s, H> {
    service: &'s GridService<H>,
}

impl<'s, H: MetadataHost> GroupEngine<'s, H> {
    pub fn new(service: &'s GridService<H>) -> Self {
        Self { service }
    }

    /// Groups `records`, or returns `Ok(None)` when no primary column is set.
    pub async fn try_group<'a, I>(
        &self,
        records: I,
        primary: Option<&Column>,
        secondary: Option<&Column>,
        collapse_default: bool,
        prior: &CollapseState,
    ) -> Result<Option<Grouping>, Error>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let Some(primary) = primary else {
            return Ok(None);
        };

        let (primary_options, secondary_options) = futures::try_join!(
            self.options_for(Some(primary)),
            self.options_for(secondary),
        )?;
        let primary = Level::new(primary, primary_options);
        let grouping = match secondary {
            None => single_level(records, &primary, collapse_default, prior),
            Some(secondary) => {
                let secondary = Level::new(secondary, secondary_options);
                two_level(records, &primary, &secondary, collapse_default, prior)
            }
        };

        log::debug!(
            "grouped {} records into {} groups by {}",
            grouping.ordered_ids.len(),
            grouping.groups.len(),
            primary.column.name
        );
        Ok(Some(grouping))
    }

    /// Like [`try_group`](Self::try_group), but a failure is logged and
    /// yields an empty grouping for this cycle.
    pub async fn group<'a, I>(
        &self,
        records: I,
        primary: Option<&Column>,
        secondary: Option<&Column>,
        collapse_default: bool,
        prior: &CollapseState,
    ) -> Option<Grouping>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        match self
            .try_group(records, primary, secondary, collapse_default, prior)
            .await
        {
            Ok(grouping) => grouping,
            Err(e) => {
                log::error!("Error fetching groups: {}", e);
                Some(Grouping::default())
            }
        }
    }

    async fn options_for(&self, column: Option<&Column>) -> Result<Vec<OptionDescriptor>, Error> {
        match column {
            Some(column) if column.kind() == ColumnKind::OptionSet => {
                self.service.get_option_set(&column.name, None).await
            }
            _ => Ok(Vec::new()),
        }
    }
}

/// One grouping column together with its declared options.
struct Level<'c> {
    column: &'c Column,
    options: Vec<OptionDescriptor>,
    label: String,
}

impl<'c> Level<'c> {
    fn new(column: &'c Column, options: Vec<OptionDescriptor>) -> Self {
        Self {
            label: column.capitalized_name(),
            column,
            options,
        }
    }

    fn is_option_set(&self) -> bool {
        self.column.kind() == ColumnKind::OptionSet
    }

    /// Grouping value: the display label for option sets, else the raw value.
    fn key(&self, record: &Record) -> String {
        if self.is_option_set() {
            if let Some(label) = record.get_formatted_value(&self.column.name) {
                return label.to_string();
            }
        }
        record.get_value(&self.column.name).to_key_string()
    }

    /// Position of `key` among the option labels; `-1` when absent.
    fn rank(&self, key: &str) -> i64 {
        self.options
            .iter()
            .position(|o| o.label == key)
            .map_or(-1, |i| i as i64)
    }

    fn group(&self, key: String, start_index: usize, count: usize, level: u8, collapsed: bool) -> Group {
        Group {
            name: format!("{}: {}", self.label, key),
            color: option_color(&self.options, &key),
            key,
            start_index,
            count,
            level,
            is_collapsed: collapsed,
            children: None,
        }
    }
}

fn single_level<'a, I>(
    records: I,
    primary: &Level,
    collapse_default: bool,
    prior: &CollapseState,
) -> Grouping
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut buckets: IndexMap<String, Vec<&Record>> = IndexMap::new();
    for record in sort_by_property(records, &primary.column.name) {
        buckets.entry(primary.key(record)).or_default().push(record);
    }
    if primary.is_option_set() {
        buckets.sort_by(|a, _, b, _| primary.rank(a).cmp(&primary.rank(b)));
    }

    let mut grouping = Grouping::default();
    for (key, members) in buckets {
        let collapsed = prior.resolve(&key, collapse_default);
        let group = primary.group(key, grouping.ordered_ids.len(), members.len(), 0, collapsed);
        grouping
            .ordered_ids
            .extend(members.iter().map(|r| r.record_id().to_string()));
        grouping.groups.push(group);
    }
    grouping
}

fn two_level<'a, I>(
    records: I,
    primary: &Level,
    secondary: &Level,
    collapse_default: bool,
    prior: &CollapseState,
) -> Grouping
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut buckets: IndexMap<String, IndexMap<String, Vec<&Record>>> = IndexMap::new();
    for record in sort_by_property(records, &primary.column.name) {
        buckets
            .entry(primary.key(record))
            .or_default()
            .entry(secondary.key(record))
            .or_default()
            .push(record);
    }
    if primary.is_option_set() {
        buckets.sort_by(|a, _, b, _| primary.rank(a).cmp(&primary.rank(b)));
    }

    let mut grouping = Grouping::default();
    for (primary_key, mut sub_buckets) in buckets {
        if secondary.is_option_set() {
            sub_buckets.sort_by(|a, _, b, _| secondary.rank(a).cmp(&secondary.rank(b)));
        } else {
            sub_buckets.sort_by(|a, _, b, _| locale_cmp(a, b));
        }

        let start_index = grouping.ordered_ids.len();
        let mut children = Vec::with_capacity(sub_buckets.len());
        for (key, members) in sub_buckets {
            let collapsed = prior.resolve(&key, collapse_default);
            children.push(secondary.group(
                key,
                grouping.ordered_ids.len(),
                members.len(),
                1,
                collapsed,
            ));
            grouping
                .ordered_ids
                .extend(members.iter().map(|r| r.record_id().to_string()));
        }

        let count = grouping.ordered_ids.len() - start_index;
        let collapsed = prior.resolve(&primary_key, collapse_default);
        let mut group = primary.group(primary_key, start_index, count, 0, collapsed);
        group.children = Some(children);
        grouping.groups.push(group);
    }
    grouping
}
