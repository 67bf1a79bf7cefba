//! Value enum for dynamic field values

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::types::EntityReference;
use super::types::Money;
use super::types::OptionSetValue;

/// A dynamic value read from a record column.
///
/// | Host type | Variant |
/// |-----------|---------|
/// | null | `Null` |
/// | TwoOptions | `Bool` |
/// | Whole number | `Int` / `Long` |
/// | Floating point | `Float` |
/// | Decimal | `Decimal` |
/// | Text | `String` |
/// | Unique identifier | `Guid` |
/// | Date and time | `DateTime` |
/// | Currency | `Money` |
/// | Lookup | `EntityReference` |
/// | Choice | `OptionSet` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    Guid(Uuid),
    DateTime(DateTime<Utc>),
    Money(Money),
    EntityReference(EntityReference),
    OptionSet(OptionSetValue),
    /// Fallback for JSON shapes with no typed counterpart.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Guid(_) => "guid",
            Value::DateTime(_) => "datetime",
            Value::Money(_) => "money",
            Value::EntityReference(_) => "entity_reference",
            Value::OptionSet(_) => "option_set",
            Value::Json(_) => "json",
        }
    }

    /// Numeric view of the value, for the number-like variants.
    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            Value::Decimal(d) => d.to_f64(),
            Value::Money(m) => m.value().to_f64(),
            _ => None,
        }
    }

    /// Relational (`<` / `>`) comparison between two raw values.
    ///
    /// Returns `None` when the values are not comparable: different families,
    /// a null on either side, or a NaN. Callers treat `None` as "keep order".
    pub fn relational_cmp(&self, other: &Value) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a.partial_cmp(&b);
        }
        match (self, other) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Guid(a), Value::Guid(b)) => Some(a.to_string().cmp(&b.to_string())),
            (Value::OptionSet(a), Value::OptionSet(b)) => Some(a.value.cmp(&b.value)),
            (Value::EntityReference(a), Value::EntityReference(b)) => {
                Some(a.display().cmp(&b.display()))
            }
            _ => None,
        }
    }

    /// Total order used when sorting records.
    ///
    /// Follows [`relational_cmp`](Self::relational_cmp) within a family. Values
    /// of different families are ranked by family with nulls first, and NaN
    /// sorts after every other number, so the order is consistent for any mix.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a.total_cmp(&b);
        }
        self.relational_cmp(other)
            .unwrap_or_else(|| self.family_rank().cmp(&other.family_rank()))
    }

    fn family_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Decimal(_) | Value::Money(_) => 2,
            Value::String(_) => 3,
            Value::Guid(_) => 4,
            Value::DateTime(_) => 5,
            Value::OptionSet(_) => 6,
            Value::EntityReference(_) => 7,
            Value::Json(_) => 8,
        }
    }

    /// Text form used for group keys and string ordering. Null is empty.
    pub fn to_key_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Long(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::String(s) => s.clone(),
            Value::Guid(g) => g.to_string(),
            Value::DateTime(dt) => dt.to_rfc3339(),
            Value::Money(m) => m.value().to_string(),
            Value::EntityReference(r) => r.display(),
            Value::OptionSet(o) => o.display(),
            Value::Json(json) => json.to_string(),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Guid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<Money> for Value {
    fn from(v: Money) -> Self {
        Value::Money(v)
    }
}

impl From<EntityReference> for Value {
    fn from(v: EntityReference) -> Self {
        Value::EntityReference(v)
    }
}

impl From<OptionSetValue> for Value {
    fn from(v: OptionSetValue) -> Self {
        Value::OptionSet(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_across_widths() {
        assert_eq!(
            Value::Int(3).relational_cmp(&Value::Float(2.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::Long(7).relational_cmp(&Value::Decimal(Decimal::new(70, 1))),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn mixed_families_are_incomparable() {
        assert_eq!(Value::from("a").relational_cmp(&Value::Int(1)), None);
        assert_eq!(Value::Null.relational_cmp(&Value::from("a")), None);
        assert_eq!(Value::Float(f64::NAN).relational_cmp(&Value::Float(1.0)), None);
    }

    #[test]
    fn sort_order_puts_nulls_first() {
        let mut values = vec![
            Value::from("b"),
            Value::Null,
            Value::Int(2),
            Value::from("a"),
            Value::Float(f64::NAN),
            Value::Int(1),
        ];
        values.sort_by(|a, b| a.sort_cmp(b));
        assert!(values[0].is_null());
        assert_eq!(values[1], Value::Int(1));
        assert_eq!(values[2], Value::Int(2));
        assert!(matches!(values[3], Value::Float(f) if f.is_nan()));
        assert_eq!(values[4], Value::from("a"));
        assert_eq!(values[5], Value::from("b"));
    }

    #[test]
    fn option_sets_compare_by_value() {
        let open = Value::from(OptionSetValue::with_label(2, "Open"));
        let closed = Value::from(OptionSetValue::with_label(1, "Closed"));
        assert_eq!(open.relational_cmp(&closed), Some(Ordering::Greater));
    }

    #[test]
    fn key_strings() {
        assert_eq!(Value::Null.to_key_string(), "");
        assert_eq!(Value::Float(2.0).to_key_string(), "2");
        assert_eq!(
            Value::from(OptionSetValue::new(5)).to_key_string(),
            "5"
        );
        let id = Uuid::nil();
        assert_eq!(
            Value::from(EntityReference::with_name("contact", id, "Ann")).to_key_string(),
            "Ann"
        );
    }
}
