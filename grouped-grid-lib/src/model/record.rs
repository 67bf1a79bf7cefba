//! Dataset record

use std::collections::HashMap;

use uuid::Uuid;

use super::Value;
use super::types::EntityReference;
use super::types::OptionSetValue;
use crate::error::FieldError;

/// A record handed to the grid by the host.
///
/// The grid never mutates records it renders; the mutating helpers exist so
/// hosts and tests can build them.
///
/// # Example
///
/// ```
/// use grouped_grid_lib::model::Record;
///
/// let record = Record::new("incident", "r1")
///     .set("title", "Printer on fire")
///     .formatted("title", "Printer on fire");
///
/// assert_eq!(record.record_id(), "r1");
/// assert_eq!(record.get_formatted_value("title"), Some("Printer on fire"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// The logical name of the entity.
    pub(crate) entity_name: String,

    /// Stable identifier used by `sortedRecordIds`.
    pub(crate) record_id: String,

    /// Raw column values.
    pub(crate) fields: HashMap<String, Value>,

    /// Display strings (from @OData.Community.Display.V1.FormattedValue).
    pub(crate) formatted_values: HashMap<String, String>,
}

impl Record {
    /// Creates an empty record.
    pub fn new(entity_name: impl Into<String>, record_id: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            record_id: record_id.into(),
            fields: HashMap::new(),
            formatted_values: HashMap::new(),
        }
    }

    /// Returns the entity logical name.
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Returns the stable record identifier.
    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn set_entity_name(&mut self, name: impl Into<String>) {
        self.entity_name = name.into();
    }

    pub fn set_record_id(&mut self, id: impl Into<String>) {
        self.record_id = id.into();
    }

    /// Returns the raw value of a column, or `Null` when absent.
    pub fn get_value(&self, column: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(column).unwrap_or(&NULL)
    }

    /// Returns the display string of a column, if the host supplied one.
    pub fn get_formatted_value(&self, column: &str) -> Option<&str> {
        self.formatted_values.get(column).map(|s| s.as_str())
    }

    /// Returns `true` if the record carries a raw value for the column.
    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    pub fn formatted_values(&self) -> &HashMap<String, String> {
        &self.formatted_values
    }

    /// Reference handed to the host when the record is opened.
    ///
    /// `None` when the record id is not a GUID (e.g. synthetic test ids).
    pub fn named_reference(&self, name_column: Option<&str>) -> Option<EntityReference> {
        let id = Uuid::parse_str(&self.record_id).ok()?;
        let mut reference = EntityReference::new(&self.entity_name, id);
        if let Some(column) = name_column {
            let name = self
                .get_formatted_value(column)
                .map(str::to_string)
                .unwrap_or_else(|| self.get_value(column).to_key_string());
            if !name.is_empty() {
                reference.name = Some(name);
            }
        }
        Some(reference)
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Sets a column value (builder pattern).
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Sets a display string (builder pattern).
    pub fn formatted(mut self, column: impl Into<String>, text: impl Into<String>) -> Self {
        self.formatted_values.insert(column.into(), text.into());
        self
    }

    /// Sets a choice value together with its label as the display string.
    pub fn set_option(self, column: impl Into<String>, value: i32, label: impl Into<String>) -> Self {
        let column = column.into();
        let label = label.into();
        self.set(column.clone(), OptionSetValue::with_label(value, label.clone()))
            .formatted(column, label)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn insert_formatted(&mut self, column: impl Into<String>, text: impl Into<String>) {
        self.formatted_values.insert(column.into(), text.into());
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if the column is missing or holds another type.
    // Return Ok(None) only if the column exists and is Value::Null.
    // =========================================================================

    /// Gets a text column value.
    pub fn get_string(&self, column: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(column) {
            None => Err(FieldError::missing(column)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(column, "string", other.type_name())),
        }
    }

    /// Gets a lookup column value.
    pub fn get_entity_reference(&self, column: &str) -> Result<Option<&EntityReference>, FieldError> {
        match self.fields.get(column) {
            None => Err(FieldError::missing(column)),
            Some(Value::Null) => Ok(None),
            Some(Value::EntityReference(r)) => Ok(Some(r)),
            Some(other) => Err(FieldError::type_mismatch(
                column,
                "entity_reference",
                other.type_name(),
            )),
        }
    }

    /// Gets a choice column value.
    pub fn get_option_set(&self, column: &str) -> Result<Option<&OptionSetValue>, FieldError> {
        match self.fields.get(column) {
            None => Err(FieldError::missing(column)),
            Some(Value::Null) => Ok(None),
            Some(Value::OptionSet(o)) => Ok(Some(o)),
            Some(other) => Err(FieldError::type_mismatch(
                column,
                "option_set",
                other.type_name(),
            )),
        }
    }
}
