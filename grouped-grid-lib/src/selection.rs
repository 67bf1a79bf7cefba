//! Primary and secondary grouping columns

use serde::Deserialize;
use serde::Serialize;

use crate::error::GridError;
use crate::model::Column;
use crate::model::capitalize;

/// Host-side key meaning "no grouping column selected".
pub const ALL_ITEMS: &str = "all-items";

/// Column aliases the host binds grouping columns to.
pub const PRIMARY_ALIAS: &str = "groupingColumn";
pub const SECONDARY_ALIAS: &str = "groupingColumn2";

/// The two grouping slots. A column can occupy at most one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSelection {
    primary: Option<String>,
    secondary: Option<String>,
}

impl GroupSelection {
    /// Builds a selection from host keys, where empty or [`ALL_ITEMS`] means unset.
    pub fn from_keys(primary: Option<&str>, secondary: Option<&str>) -> Result<Self, GridError> {
        let primary = normalize(primary);
        let secondary = normalize(secondary);
        if primary.is_some() && primary == secondary {
            return Err(GridError::GroupingConflict(primary.unwrap_or_default()));
        }
        Ok(Self { primary, secondary })
    }

    /// Selection bound through the column aliases, falling back to the given keys.
    pub fn from_columns(
        columns: &[Column],
        primary: Option<&str>,
        secondary: Option<&str>,
    ) -> Result<Self, GridError> {
        let bound = |alias: &str| {
            columns
                .iter()
                .find(|c| c.alias.as_deref() == Some(alias))
                .map(|c| c.name.as_str())
        };
        Self::from_keys(
            bound(PRIMARY_ALIAS).or(primary),
            bound(SECONDARY_ALIAS).or(secondary),
        )
    }

    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    pub fn secondary(&self) -> Option<&str> {
        self.secondary.as_deref()
    }

    /// Primary key as the host sees it.
    pub fn primary_key(&self) -> &str {
        self.primary().unwrap_or(ALL_ITEMS)
    }

    /// Secondary key as the host sees it.
    pub fn secondary_key(&self) -> &str {
        self.secondary().unwrap_or(ALL_ITEMS)
    }

    pub fn is_grouped(&self) -> bool {
        self.primary.is_some()
    }

    /// Returns `true` if either slot holds `column`.
    pub fn uses(&self, column: &str) -> bool {
        self.primary() == Some(column) || self.secondary() == Some(column)
    }

    pub fn is_full(&self) -> bool {
        self.primary.is_some() && self.secondary.is_some()
    }

    /// Puts `column` in the first free slot.
    pub fn group_by(&mut self, column: &str) -> Result<(), GridError> {
        if self.uses(column) {
            return Err(GridError::GroupingConflict(column.to_string()));
        }
        if self.primary.is_none() {
            self.primary = Some(column.to_string());
        } else if self.secondary.is_none() {
            self.secondary = Some(column.to_string());
        } else {
            return Err(GridError::GroupingFull);
        }
        Ok(())
    }

    /// Empties the slot holding `column`.
    ///
    /// The primary slot cannot be cleared while a secondary grouping exists.
    pub fn clear(&mut self, column: &str) -> Result<(), GridError> {
        if self.primary() == Some(column) {
            if self.secondary.is_some() {
                return Err(GridError::SecondaryGroupingActive(column.to_string()));
            }
            self.primary = None;
        } else if self.secondary() == Some(column) {
            self.secondary = None;
        } else {
            return Err(GridError::UnknownColumn(column.to_string()));
        }
        Ok(())
    }

    /// Sets the primary slot from a dropdown key.
    pub fn set_primary(&mut self, key: Option<&str>) -> Result<(), GridError> {
        let key = normalize(key);
        if key.is_some() && key == self.secondary {
            return Err(GridError::GroupingConflict(key.unwrap_or_default()));
        }
        self.primary = key;
        Ok(())
    }

    /// Sets the secondary slot from a dropdown key.
    pub fn set_secondary(&mut self, key: Option<&str>) -> Result<(), GridError> {
        let key = normalize(key);
        if key.is_some() && key == self.primary {
            return Err(GridError::GroupingConflict(key.unwrap_or_default()));
        }
        self.secondary = key;
        Ok(())
    }
}

fn normalize(key: Option<&str>) -> Option<String> {
    key.filter(|k| !k.is_empty() && *k != ALL_ITEMS)
        .map(str::to_string)
}

/// One entry of the group-by dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupByOption {
    pub key: String,
    pub text: String,
    pub disabled: bool,
}

/// Dropdown entries: "Not selected" first, then every column.
///
/// Columns already used by either slot are disabled.
pub fn group_by_options(columns: &[Column], selection: &GroupSelection) -> Vec<GroupByOption> {
    std::iter::once(GroupByOption {
        key: ALL_ITEMS.to_string(),
        text: "Not selected".to_string(),
        disabled: false,
    })
    .chain(columns.iter().map(|column| GroupByOption {
        key: column.name.clone(),
        text: capitalize(&column.display_name),
        disabled: selection.uses(&column.name),
    }))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_by_fills_primary_then_secondary() {
        let mut selection = GroupSelection::default();
        selection.group_by("region").unwrap();
        selection.group_by("status").unwrap();
        assert_eq!(selection.primary(), Some("region"));
        assert_eq!(selection.secondary(), Some("status"));
        assert_eq!(selection.group_by("owner"), Err(GridError::GroupingFull));
    }

    #[test]
    fn a_column_cannot_fill_both_slots() {
        let mut selection = GroupSelection::default();
        selection.group_by("region").unwrap();
        assert_eq!(
            selection.group_by("region"),
            Err(GridError::GroupingConflict("region".to_string()))
        );
        assert!(selection.set_secondary(Some("region")).is_err());
        assert!(GroupSelection::from_keys(Some("a"), Some("a")).is_err());
    }

    #[test]
    fn primary_clears_only_without_secondary() {
        let mut selection = GroupSelection::from_keys(Some("region"), Some("status")).unwrap();
        assert_eq!(
            selection.clear("region"),
            Err(GridError::SecondaryGroupingActive("region".to_string()))
        );
        selection.clear("status").unwrap();
        selection.clear("region").unwrap();
        assert!(!selection.is_grouped());
        assert_eq!(selection.primary_key(), ALL_ITEMS);
    }

    #[test]
    fn sentinel_keys_mean_unset() {
        let selection = GroupSelection::from_keys(Some(ALL_ITEMS), Some("")).unwrap();
        assert_eq!(selection, GroupSelection::default());
    }

    #[test]
    fn alias_bound_columns_win() {
        let columns = vec![
            Column::new("region", "region", "SingleLine.Text").with_alias(PRIMARY_ALIAS),
            Column::new("status", "Status", "OptionSet"),
        ];
        let selection = GroupSelection::from_columns(&columns, Some("status"), None).unwrap();
        assert_eq!(selection.primary(), Some("region"));

        let options = group_by_options(&columns, &selection);
        assert_eq!(options[0].key, ALL_ITEMS);
        assert_eq!(options[1].text, "Region");
        assert!(options[1].disabled);
        assert!(!options[2].disabled);
    }
}
