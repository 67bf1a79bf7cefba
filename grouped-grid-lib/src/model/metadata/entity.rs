//! Entity metadata types

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

use super::AttributeMetadata;

/// Entity metadata as returned by `getEntityMetadata`.
///
/// `attributes` only holds the attributes that were asked for (or every
/// attribute the host chose to return).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityMetadata {
    /// The logical name of the entity (e.g., "incident").
    pub logical_name: String,

    /// The entity set name used in Web API URLs (e.g., "incidents").
    #[serde(default)]
    pub entity_set_name: Option<String>,

    /// The logical name of the primary ID attribute (e.g., "incidentid").
    pub primary_id_attribute: String,

    /// The logical name of the primary name attribute (e.g., "title").
    #[serde(default)]
    pub primary_name_attribute: Option<String>,

    /// Attributes keyed by logical name.
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeMetadata>,
}

impl EntityMetadata {
    pub fn new(logical_name: impl Into<String>, primary_id_attribute: impl Into<String>) -> Self {
        Self {
            logical_name: logical_name.into(),
            primary_id_attribute: primary_id_attribute.into(),
            ..Self::default()
        }
    }

    pub fn with_primary_name(mut self, name: impl Into<String>) -> Self {
        self.primary_name_attribute = Some(name.into());
        self
    }

    pub fn with_entity_set(mut self, name: impl Into<String>) -> Self {
        self.entity_set_name = Some(name.into());
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeMetadata) -> Self {
        self.attributes
            .insert(attribute.logical_name.clone(), attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeMetadata> {
        self.attributes.get(name)
    }

    /// Copy of this metadata restricted to the named attributes.
    pub fn restricted_to(&self, names: &[&str]) -> Self {
        Self {
            attributes: self
                .attributes
                .iter()
                .filter(|(name, _)| names.contains(&name.as_str()))
                .map(|(name, attr)| (name.clone(), attr.clone()))
                .collect(),
            ..self.clone()
        }
    }
}
