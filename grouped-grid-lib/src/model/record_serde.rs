//! Deserialization of records from Web API JSON.
//!
//! - Formatted values: `"field@OData.Community.Display.V1.FormattedValue": "Display Text"`
//! - Lookup fields: `"_parentcustomerid_value": "guid"` plus the
//!   `@Microsoft.Dynamics.CRM.lookuplogicalname` annotation
//! - Other `@odata.*` / `@Microsoft.*` annotations are dropped
//!
//! The record id is not known at this point; the host assigns it from the
//! entity's primary id attribute (see [`Record::assign_id_from`]).

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use uuid::Uuid;

use super::Record;
use super::Value;
use super::types::EntityReference;

const FORMATTED_SUFFIX: &str = "@OData.Community.Display.V1.FormattedValue";
const LOOKUP_NAME_SUFFIX: &str = "@Microsoft.Dynamics.CRM.lookuplogicalname";

impl Record {
    /// Sets the record id from the value of the given column.
    ///
    /// Returns `false` when the column is missing or null.
    pub fn assign_id_from(&mut self, column: &str) -> bool {
        let id = self.get_value(column).to_key_string();
        if id.is_empty() {
            return false;
        }
        self.record_id = id;
        true
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map representing a dataset record")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Record, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut record = Record::default();
        let mut formatted_values: HashMap<String, String> = HashMap::new();
        let mut lookup_logical_names: HashMap<String, String> = HashMap::new();
        let mut raw_fields: Vec<(String, serde_json::Value)> = Vec::new();

        while let Some(key) = map.next_key::<String>()? {
            let value: serde_json::Value = map.next_value()?;

            if let Some(field) = key.strip_suffix(FORMATTED_SUFFIX) {
                if let serde_json::Value::String(s) = value {
                    formatted_values.insert(field.to_string(), s);
                }
            } else if let Some(field) = key.strip_suffix(LOOKUP_NAME_SUFFIX) {
                if let serde_json::Value::String(s) = value {
                    lookup_logical_names.insert(field.to_string(), s);
                }
            } else if key.contains('@') {
                // Remaining annotations carry nothing the grid renders
            } else {
                raw_fields.push((key, value));
            }
        }

        for (key, json_value) in raw_fields {
            let (column, value) = match lookup_column(&key).map(str::to_string) {
                Some(column) => {
                    let value = match json_value {
                        serde_json::Value::String(guid) => match Uuid::parse_str(&guid) {
                            Ok(id) => {
                                let logical_name = lookup_logical_names
                                    .get(&key)
                                    .cloned()
                                    .unwrap_or_default();
                                match formatted_values.get(&key) {
                                    Some(name) => Value::EntityReference(
                                        EntityReference::with_name(logical_name, id, name.clone()),
                                    ),
                                    None => Value::EntityReference(EntityReference::new(
                                        logical_name,
                                        id,
                                    )),
                                }
                            }
                            Err(_) => Value::String(guid),
                        },
                        other => json_value_to_value(other),
                    };
                    (column, value)
                }
                None => (key, json_value_to_value(json_value)),
            };
            record.fields.insert(column, value);
        }

        for (key, text) in formatted_values {
            let column = lookup_column(&key).map(str::to_string).unwrap_or(key);
            record.formatted_values.insert(column, text);
        }

        Ok(record)
    }
}

/// Maps `_field_value` to `field`.
fn lookup_column(key: &str) -> Option<&str> {
    key.strip_prefix('_')
        .and_then(|rest| rest.strip_suffix("_value"))
        .filter(|column| !column.is_empty())
}

/// Converts a serde_json::Value to our Value enum.
fn json_value_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => Value::Int(small),
                    Err(_) => Value::Long(i),
                }
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Json(serde_json::Value::Number(n))
            }
        }
        serde_json::Value::String(s) => {
            if let Ok(uuid) = Uuid::parse_str(&s) {
                Value::Guid(uuid)
            } else if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                Value::DateTime(dt.with_timezone(&chrono::Utc))
            } else {
                Value::String(s)
            }
        }
        other => Value::Json(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_simple_fields() {
        let json = r#"{"title": "Printer", "priority": 2}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(record.get_string("title").unwrap(), Some("Printer"));
        assert_eq!(record.get_value("priority"), &Value::Int(2));
    }

    #[test]
    fn deserialize_formatted_option_value() {
        let json = r#"{
            "statuscode": 1,
            "statuscode@OData.Community.Display.V1.FormattedValue": "Open",
            "@odata.etag": "W/\"1\""
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(record.get_formatted_value("statuscode"), Some("Open"));
        assert!(!record.contains("@odata.etag"));
    }

    #[test]
    fn deserialize_lookup_field() {
        let json = r#"{
            "_customerid_value": "12345678-1234-1234-1234-123456789012",
            "_customerid_value@Microsoft.Dynamics.CRM.lookuplogicalname": "account",
            "_customerid_value@OData.Community.Display.V1.FormattedValue": "Contoso"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();

        let reference = record.get_entity_reference("customerid").unwrap().unwrap();
        assert_eq!(reference.logical_name, "account");
        assert_eq!(reference.name.as_deref(), Some("Contoso"));
        assert_eq!(record.get_formatted_value("customerid"), Some("Contoso"));
    }

    #[test]
    fn assign_id_from_primary_column() {
        let json = r#"{"incidentid": "12345678-1234-1234-1234-123456789012"}"#;
        let mut record: Record = serde_json::from_str(json).unwrap();

        assert!(record.assign_id_from("incidentid"));
        assert_eq!(record.record_id(), "12345678-1234-1234-1234-123456789012");
        assert!(!record.assign_id_from("missing"));
    }
}
