//! Display groups produced by the group engine

use serde::Serialize;

/// Color used when a group value has no option color.
pub const DEFAULT_GROUP_COLOR: &str = "black";

/// A contiguous slice of the rendered record sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Grouping value, stringified.
    pub key: String,
    /// Header text, `"{Column}: {key}"`.
    pub name: String,
    /// Offset of the first record in [`Grouping::ordered_ids`].
    pub start_index: usize,
    pub count: usize,
    /// 0 for primary groups, 1 for subgroups.
    pub level: u8,
    pub is_collapsed: bool,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Group>>,
}

impl Group {
    /// Returns `true` when the color is the fallback and renders without highlight.
    pub fn has_highlight(&self) -> bool {
        self.color != DEFAULT_GROUP_COLOR
    }

    /// Index range covered by this group.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start_index..self.start_index + self.count
    }
}

/// Result of grouping one record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grouping {
    pub groups: Vec<Group>,
    /// Record ids in rendering order; leaf groups address slices of it.
    pub ordered_ids: Vec<String>,
}

impl Grouping {
    /// Returns `true` when no groups were produced.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups that carry records directly: subgroups when present, else primaries.
    pub fn leaves(&self) -> Vec<&Group> {
        let mut leaves = Vec::new();
        for group in &self.groups {
            match &group.children {
                Some(children) if !children.is_empty() => leaves.extend(children.iter()),
                _ => leaves.push(group),
            }
        }
        leaves
    }

    /// Record ids covered by a group.
    pub fn ids_of(&self, group: &Group) -> &[String] {
        let end = (group.start_index + group.count).min(self.ordered_ids.len());
        let start = group.start_index.min(end);
        &self.ordered_ids[start..end]
    }

    /// Total records covered by the primary groups.
    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }
}
