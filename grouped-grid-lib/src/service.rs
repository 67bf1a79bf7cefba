//! Metadata and navigation adapter over a [`MetadataHost`]

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::MetadataError;
use crate::host::MetadataHost;
use crate::model::DEFAULT_GROUP_COLOR;
use crate::model::metadata::OptionDescriptor;

/// One match returned by [`GridService::search_lookup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupItem {
    pub id: String,
    pub name: String,
}

/// Thin async pass-through to the host for everything the grid looks up.
///
/// Nothing is cached: every call reaches the host, and errors are returned to
/// the caller unchanged.
///
/// # Example
///
/// ```ignore
/// let service = GridService::new(Arc::new(host), "incident");
/// let options = service.get_option_set("statuscode", None).await?;
/// let color = service.get_option_color("statuscode", "Open").await?;
/// ```
pub struct GridService<H> {
    host: Arc<H>,
    entity: String,
}

impl<H> Clone for GridService<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            entity: self.entity.clone(),
        }
    }
}

impl<H: MetadataHost> GridService<H> {
    pub fn new(host: Arc<H>, entity: impl Into<String>) -> Self {
        Self {
            host,
            entity: entity.into(),
        }
    }

    /// Logical name of the dataset's entity.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Declared options of a choice column, in display order.
    ///
    /// `entity` defaults to the dataset's entity. Columns that are not
    /// choices yield an empty list.
    pub async fn get_option_set(
        &self,
        column: &str,
        entity: Option<&str>,
    ) -> Result<Vec<OptionDescriptor>, Error> {
        let entity = entity.unwrap_or(&self.entity);
        let metadata = self.host.get_entity_metadata(entity, &[column]).await?;
        let attribute = metadata
            .attribute(column)
            .ok_or_else(|| MetadataError::attribute_not_found(entity, column))?;
        Ok(attribute.option_set.clone())
    }

    /// Option labels of a choice column, in declared order.
    pub async fn option_labels(&self, column: &str) -> Result<Vec<String>, Error> {
        let options = self.get_option_set(column, None).await?;
        Ok(options.into_iter().map(|o| o.label).collect())
    }

    /// Color configured for the option whose label is `label`.
    ///
    /// Falls back to [`DEFAULT_GROUP_COLOR`] when the column has no options,
    /// no option carries that label, or the option has no color.
    pub async fn get_option_color(&self, column: &str, label: &str) -> Result<String, Error> {
        let options = self.get_option_set(column, None).await?;
        Ok(option_color(&options, label))
    }

    /// Records of the lookup's target entity whose primary name contains `text`.
    ///
    /// Names containing the reserved `"# "` marker are excluded.
    pub async fn search_lookup(&self, column: &str, text: &str) -> Result<Vec<LookupItem>, Error> {
        let metadata = self.host.get_entity_metadata(&self.entity, &[column]).await?;
        let target = metadata
            .attribute(column)
            .ok_or_else(|| MetadataError::attribute_not_found(&self.entity, column))?
            .targets
            .first()
            .cloned()
            .ok_or_else(|| MetadataError::NoLookupTarget {
                attribute: column.to_string(),
            })?;

        let target_metadata = self.host.get_entity_metadata(&target, &[]).await?;
        let id_attribute = target_metadata.primary_id_attribute.clone();
        let name_attribute = target_metadata
            .primary_name_attribute
            .clone()
            .unwrap_or_else(|| "name".to_string());

        let query = lookup_query(&id_attribute, &name_attribute, text);
        log::debug!("lookup search on {}: {}", target, query);

        let records = self.host.retrieve_multiple_records(&target, &query).await?;
        Ok(records
            .iter()
            .map(|record| LookupItem {
                id: record.get_value(&id_attribute).to_key_string(),
                name: record.get_value(&name_attribute).to_key_string(),
            })
            .collect())
    }

    /// Opens the host form for a record; does nothing without an entity name.
    pub async fn navigate_to_item(&self, entity: Option<&str>, id: &str) -> Result<(), Error> {
        match entity {
            Some(entity) => self.host.open_form(entity, id).await,
            None => {
                log::debug!("navigation to {} skipped: no entity name", id);
                Ok(())
            }
        }
    }
}

/// Color of the option labelled `label`, or the default.
pub(crate) fn option_color(options: &[OptionDescriptor], label: &str) -> String {
    options
        .iter()
        .find(|o| o.label == label)
        .and_then(|o| o.color.clone())
        .unwrap_or_else(|| DEFAULT_GROUP_COLOR.to_string())
}

/// OData query matching `text` against the primary name.
fn lookup_query(id_attribute: &str, name_attribute: &str, text: &str) -> String {
    let escaped = text.replace('\'', "''");
    format!(
        "?$select={id},{name}&$filter=contains({name},'{text}') and not contains({name},%27%23%20%27)",
        id = id_attribute,
        name = name_attribute,
        text = urlencoding::encode(&escaped),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticHost;
    use crate::model::EntityMetadata;
    use crate::model::Record;
    use crate::model::metadata::AttributeMetadata;
    use crate::model::metadata::AttributeType;

    fn service() -> GridService<StaticHost> {
        let incident = EntityMetadata::new("incident", "incidentid")
            .with_attribute(
                AttributeMetadata::new("customerid", AttributeType::Customer)
                    .with_targets(vec!["contact".to_string()]),
            )
            .with_attribute(
                AttributeMetadata::new("parentid", AttributeType::Lookup)
                    .with_targets(vec!["account".to_string()]),
            )
            .with_attribute(AttributeMetadata::new("ownerid", AttributeType::Owner))
            .with_attribute(
                AttributeMetadata::new("statuscode", AttributeType::Status).with_options(vec![
                    OptionDescriptor::new(1, "Open").with_color("#2e7d32"),
                    OptionDescriptor::new(2, "Closed"),
                ]),
            );
        let host = StaticHost::new()
            .with_metadata(incident)
            .with_metadata(EntityMetadata::new("contact", "contactid").with_primary_name("fullname"))
            .with_metadata(EntityMetadata::new("account", "accountid"))
            .with_query_response(
                "contact",
                vec![
                    Record::new("contact", "c1")
                        .set("contactid", "c1")
                        .set("fullname", "Ann Lee"),
                ],
            );
        GridService::new(Arc::new(host), "incident")
    }

    #[tokio::test]
    async fn search_lookup_queries_the_target_entity() {
        let service = service();
        let items = service.search_lookup("customerid", "Ann").await.unwrap();
        assert_eq!(
            items,
            vec![LookupItem {
                id: "c1".to_string(),
                name: "Ann Lee".to_string(),
            }]
        );
        assert_eq!(
            service.host().queries(),
            vec![(
                "contact".to_string(),
                lookup_query("contactid", "fullname", "Ann")
            )]
        );
    }

    #[tokio::test]
    async fn search_lookup_falls_back_to_name_attribute() {
        let service = service();
        let items = service.search_lookup("parentid", "Contoso").await.unwrap();
        assert!(items.is_empty());

        let queries = service.host().queries();
        assert_eq!(queries[0].0, "account");
        assert!(queries[0].1.starts_with("?$select=accountid,name&"));
        assert!(queries[0].1.contains("contains(name,'Contoso')"));
    }

    #[tokio::test]
    async fn search_lookup_requires_a_target() {
        let service = service();
        let result = service.search_lookup("ownerid", "x").await;
        assert!(matches!(
            result,
            Err(Error::Metadata(MetadataError::NoLookupTarget { .. }))
        ));

        let missing = service.search_lookup("nope", "x").await;
        assert!(matches!(
            missing,
            Err(Error::Metadata(MetadataError::AttributeNotFound { .. }))
        ));
        assert!(service.host().queries().is_empty());
    }

    #[tokio::test]
    async fn get_option_color_reads_host_options() {
        let service = service();
        assert_eq!(service.get_option_color("statuscode", "Open").await.unwrap(), "#2e7d32");
        assert_eq!(service.get_option_color("statuscode", "Closed").await.unwrap(), "black");
        assert_eq!(service.get_option_color("statuscode", "Other").await.unwrap(), "black");
        assert_eq!(service.get_option_color("customerid", "Ann").await.unwrap(), "black");
        assert!(service.get_option_color("nope", "Open").await.is_err());
    }

    #[tokio::test]
    async fn navigate_to_item_opens_forms_with_an_entity() {
        let service = service();
        service.navigate_to_item(Some("account"), "a1").await.unwrap();
        service.navigate_to_item(None, "a2").await.unwrap();
        assert_eq!(
            service.host().opened_forms(),
            vec![("account".to_string(), "a1".to_string())]
        );
    }

    #[test]
    fn lookup_query_escapes_quotes() {
        let query = lookup_query("contactid", "fullname", "O'Brien");
        assert_eq!(
            query,
            "?$select=contactid,fullname&$filter=contains(fullname,'O%27%27Brien') and not contains(fullname,%27%23%20%27)"
        );
    }

    #[test]
    fn option_color_falls_back_to_black() {
        let options = vec![
            OptionDescriptor::new(1, "Open").with_color("#00ff00"),
            OptionDescriptor::new(2, "Closed"),
        ];
        assert_eq!(option_color(&options, "Open"), "#00ff00");
        assert_eq!(option_color(&options, "Closed"), "black");
        assert_eq!(option_color(&options, "Missing"), "black");
        assert_eq!(option_color(&[], "Open"), "black");
    }
}
