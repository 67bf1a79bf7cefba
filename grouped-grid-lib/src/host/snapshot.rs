//! In-memory host backed by a dataset snapshot

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;

use super::DatasetHost;
use super::MetadataHost;
use crate::error::ApiError;
use crate::error::Error;
use crate::error::MetadataError;
use crate::model::Column;
use crate::model::EntityMetadata;
use crate::model::FilterExpression;
use crate::model::PagingInfo;
use crate::model::Record;
use crate::model::SortStatus;
use crate::model::types::EntityReference;

/// A dataset as the host hands it over on one update cycle.
///
/// Records use the Web API JSON shape; their ids are taken from the primary id
/// attribute of the matching entry in `metadata` when parsed with
/// [`Snapshot::from_json`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Logical name of the dataset's entity.
    pub entity: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub records: Vec<Record>,
    /// Metadata of the dataset's entity and of any lookup targets.
    #[serde(default)]
    pub metadata: Vec<EntityMetadata>,
    #[serde(default)]
    pub sorting: Vec<SortStatus>,
    #[serde(default)]
    pub filtering: FilterExpression,
    #[serde(default)]
    pub paging: PagingInfo,
    #[serde(default)]
    pub loading: bool,
}

impl Snapshot {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Self::default()
        }
    }

    /// Parses a snapshot and assigns record ids.
    ///
    /// Records missing their primary id fall back to their position.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let mut snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| ApiError::parse(format!("Invalid snapshot: {}", e)))?;

        let primary_id = snapshot
            .metadata
            .iter()
            .find(|m| m.logical_name == snapshot.entity)
            .map(|m| m.primary_id_attribute.clone())
            .unwrap_or_else(|| format!("{}id", snapshot.entity));

        for (index, record) in snapshot.records.iter_mut().enumerate() {
            record.set_entity_name(snapshot.entity.as_str());
            if !record.assign_id_from(&primary_id) {
                record.set_record_id(index.to_string());
            }
        }
        Ok(snapshot)
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    pub fn with_metadata(mut self, metadata: EntityMetadata) -> Self {
        self.metadata.push(metadata);
        self
    }

    /// Record ids in the order the host supplied them.
    pub fn record_ids(&self) -> Vec<String> {
        self.records.iter().map(|r| r.record_id().to_string()).collect()
    }
}

// =============================================================================
// StaticHost
// =============================================================================

/// [`MetadataHost`] answering from in-memory metadata.
///
/// Queries are not evaluated: `retrieve_multiple_records` returns the canned
/// response registered for the entity and records the query it was asked.
#[derive(Debug, Default)]
pub struct StaticHost {
    metadata: HashMap<String, EntityMetadata>,
    responses: HashMap<String, Vec<Record>>,
    queries: Mutex<Vec<(String, String)>>,
    opened: Mutex<Vec<(String, String)>>,
}

impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host serving the metadata carried by a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        snapshot
            .metadata
            .iter()
            .cloned()
            .fold(Self::new(), Self::with_metadata)
    }

    pub fn with_metadata(mut self, metadata: EntityMetadata) -> Self {
        self.metadata.insert(metadata.logical_name.clone(), metadata);
        self
    }

    /// Registers the records returned for any query against `entity`.
    pub fn with_query_response(mut self, entity: impl Into<String>, records: Vec<Record>) -> Self {
        self.responses.insert(entity.into(), records);
        self
    }

    /// `(entity, query)` pairs received so far.
    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// `(entity, id)` pairs of the forms opened so far.
    pub fn opened_forms(&self) -> Vec<(String, String)> {
        self.opened
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl MetadataHost for StaticHost {
    async fn get_entity_metadata(
        &self,
        entity: &str,
        attributes: &[&str],
    ) -> Result<EntityMetadata, Error> {
        let metadata = self
            .metadata
            .get(entity)
            .ok_or_else(|| MetadataError::EntityNotFound {
                name: entity.to_string(),
            })?;

        if attributes.is_empty() {
            Ok(metadata.clone())
        } else {
            Ok(metadata.restricted_to(attributes))
        }
    }

    async fn retrieve_multiple_records(
        &self,
        entity: &str,
        query: &str,
    ) -> Result<Vec<Record>, Error> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((entity.to_string(), query.to_string()));

        match self.responses.get(entity) {
            Some(records) => Ok(records.clone()),
            None if self.metadata.contains_key(entity) => Ok(Vec::new()),
            None => Err(MetadataError::EntityNotFound {
                name: entity.to_string(),
            }
            .into()),
        }
    }

    async fn open_form(&self, entity: &str, id: &str) -> Result<(), Error> {
        self.opened
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((entity.to_string(), id.to_string()));
        Ok(())
    }
}

// =============================================================================
// StaticDataset
// =============================================================================

/// [`DatasetHost`] that records every request made to it.
#[derive(Debug, Clone, Default)]
pub struct StaticDataset {
    pub sorting: Vec<SortStatus>,
    pub filtering: FilterExpression,
    pub selected_ids: Vec<String>,
    pub opened: Vec<EntityReference>,
    pub page_size: Option<usize>,
    pub pages_loaded: Vec<u32>,
    pub next_page_requests: usize,
    pub refresh_count: usize,
    pub full_screen: bool,
}

impl StaticDataset {
    /// Dataset seeded with a snapshot's sort and filter state.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            sorting: snapshot.sorting.clone(),
            filtering: snapshot.filtering.clone(),
            ..Self::default()
        }
    }
}

impl DatasetHost for StaticDataset {
    fn set_selected_record_ids(&mut self, ids: &[String]) {
        self.selected_ids = ids.to_vec();
    }

    fn open_dataset_item(&mut self, reference: &EntityReference) {
        self.opened.push(reference.clone());
    }

    fn sorting_mut(&mut self) -> &mut Vec<SortStatus> {
        &mut self.sorting
    }

    fn set_filter(&mut self, filter: FilterExpression) {
        self.filtering = filter;
    }

    fn clear_filter(&mut self) {
        self.filtering = FilterExpression::default();
    }

    fn refresh(&mut self) {
        self.refresh_count += 1;
    }

    fn set_page_size(&mut self, size: usize) {
        self.page_size = Some(size);
    }

    fn load_next_page(&mut self) {
        self.next_page_requests += 1;
    }

    fn load_exact_page(&mut self, page: u32) {
        self.pages_loaded.push(page);
    }

    fn set_full_screen(&mut self, full_screen: bool) {
        self.full_screen = full_screen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "entity": "incident",
        "columns": [
            {"name": "title", "displayName": "Title", "dataType": "SingleLine.Text", "order": 0}
        ],
        "records": [
            {"incidentid": "8f7d1c2e-0000-0000-0000-000000000001", "title": "First"},
            {"title": "No id"}
        ],
        "metadata": [
            {"LogicalName": "incident", "PrimaryIdAttribute": "incidentid"}
        ]
    }"#;

    #[test]
    fn from_json_assigns_record_ids() {
        let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();
        assert_eq!(
            snapshot.record_ids(),
            vec!["8f7d1c2e-0000-0000-0000-000000000001", "1"]
        );
        assert_eq!(snapshot.records[0].entity_name(), "incident");
        assert_eq!(snapshot.columns[0].visual_size_factor, -1);
    }

    #[tokio::test]
    async fn static_host_serves_metadata_and_records_queries() {
        let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();
        let host = StaticHost::from_snapshot(&snapshot);

        let metadata = host.get_entity_metadata("incident", &[]).await.unwrap();
        assert_eq!(metadata.primary_id_attribute, "incidentid");

        let missing = host.get_entity_metadata("account", &[]).await;
        assert!(matches!(
            missing,
            Err(Error::Metadata(MetadataError::EntityNotFound { .. }))
        ));

        let records = host
            .retrieve_multiple_records("incident", "?$select=title")
            .await
            .unwrap();
        assert!(records.is_empty());
        assert_eq!(
            host.queries(),
            vec![("incident".to_string(), "?$select=title".to_string())]
        );
    }
}
