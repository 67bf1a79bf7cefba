//! Lookup reference type

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// A reference to another record, as held by lookup columns.
///
/// Also used as the "named reference" handed to the host when opening a
/// dataset item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityReference {
    /// The referenced record id.
    pub id: Uuid,
    /// Logical name of the referenced entity (e.g., "contact").
    pub logical_name: String,
    /// Display name of the referenced record, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityReference {
    pub fn new(logical_name: impl Into<String>, id: Uuid) -> Self {
        Self {
            id,
            logical_name: logical_name.into(),
            name: None,
        }
    }

    pub fn with_name(logical_name: impl Into<String>, id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            logical_name: logical_name.into(),
            name: Some(name.into()),
        }
    }

    /// Returns the display name, falling back to the hyphenated id.
    pub fn display(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}
