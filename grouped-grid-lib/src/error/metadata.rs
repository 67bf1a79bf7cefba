//! Metadata lookup errors

/// Errors raised when entity or attribute metadata cannot be resolved.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MetadataError {
    /// The entity does not exist.
    #[error("Entity '{name}' not found")]
    EntityNotFound { name: String },

    /// The attribute does not exist on the entity.
    #[error("Attribute '{attribute}' not found on entity '{entity}'")]
    AttributeNotFound { entity: String, attribute: String },

    /// A lookup attribute declares no target entity.
    #[error("Lookup attribute '{attribute}' has no target entity")]
    NoLookupTarget { attribute: String },
}

impl MetadataError {
    /// Creates a new attribute-not-found error.
    pub fn attribute_not_found(entity: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::AttributeNotFound {
            entity: entity.into(),
            attribute: attribute.into(),
        }
    }
}
