//! Sorting, filtering and paging state exchanged with the host

use serde::Deserialize;
use serde::Serialize;

use super::ConditionOperator;

/// Sort direction, carried on the wire as 0 (ascending) or 1 (descending).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl From<SortDirection> for u8 {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Ascending => 0,
            SortDirection::Descending => 1,
        }
    }
}

impl From<u8> for SortDirection {
    fn from(code: u8) -> Self {
        if code == 1 {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// One entry of the dataset's sort list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortStatus {
    pub name: String,
    pub sort_direction: SortDirection,
}

impl SortStatus {
    pub fn new(name: impl Into<String>, sort_direction: SortDirection) -> Self {
        Self {
            name: name.into(),
            sort_direction,
        }
    }
}

/// Value of a filter condition: a single text or a set of option keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    Many(Vec<String>),
}

impl FilterValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Single(s) => s.is_empty(),
            FilterValue::Many(values) => values.is_empty(),
        }
    }
}

impl Default for FilterValue {
    fn default() -> Self {
        FilterValue::Single(String::new())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Single(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::Many(values)
    }
}

/// One filter condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub attribute_name: String,
    pub condition_operator: ConditionOperator,
    #[serde(default)]
    pub value: FilterValue,
    /// Alias of the linked entity the attribute belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_alias_name: Option<String>,
}

impl FilterCondition {
    pub fn new(
        attribute_name: impl Into<String>,
        condition_operator: ConditionOperator,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            condition_operator,
            value: value.into(),
            entity_alias_name: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.entity_alias_name = Some(alias.into());
        self
    }

    /// Column name the condition applies to, alias-qualified when linked.
    pub fn qualified_name(&self) -> String {
        match &self.entity_alias_name {
            Some(alias) => format!("{}.{}", alias, self.attribute_name),
            None => self.attribute_name.clone(),
        }
    }
}

/// The dataset's current filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterExpression {
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
}

impl FilterExpression {
    pub fn single(condition: FilterCondition) -> Self {
        Self {
            conditions: vec![condition],
        }
    }

    /// Returns the condition applying to `column`, if any.
    pub fn condition_for(&self, column: &str) -> Option<&FilterCondition> {
        self.conditions.iter().find(|c| c.qualified_name() == column)
    }
}

/// Paging state reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
    /// Total matching records, or -1 when the host does not know.
    #[serde(default)]
    pub total_result_count: i64,
}
