//! Per-group collapse flags

use std::collections::HashMap;

use crate::model::Group;

/// Collapse flag per group key, kept for the lifetime of the grid.
///
/// `flags` mirrors the groups of the latest cycle; `toggled` holds the flags
/// a user has set. Groups nobody toggled follow the collapse default.
///
/// Subgroups are keyed by their own value only, so two subgroups with the
/// same value under different primaries share one flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    flags: HashMap<String, bool>,
    toggled: HashMap<String, bool>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The flag a user set for `key`, else `default`.
    pub fn resolve(&self, key: &str, default: bool) -> bool {
        self.toggled.get(key).copied().unwrap_or(default)
    }

    /// Inverts the flag for `key` (an unknown key counts as expanded) and
    /// returns the new value. Children are not touched.
    pub fn toggle(&mut self, key: &str) -> bool {
        let current = self
            .flags
            .get(key)
            .or_else(|| self.toggled.get(key))
            .copied()
            .unwrap_or(false);
        self.flags.insert(key.to_string(), !current);
        self.toggled.insert(key.to_string(), !current);
        !current
    }

    /// Replaces the current flags with those carried by freshly built groups.
    pub fn rebuild_from(&mut self, groups: &[Group]) {
        self.flags.clear();
        for group in groups {
            self.flags.insert(group.key.clone(), group.is_collapsed);
            for child in group.children.iter().flatten() {
                self.flags.insert(child.key.clone(), child.is_collapsed);
            }
        }
    }

    /// Writes the current flags back onto groups.
    pub fn apply_to(&self, groups: &mut [Group]) {
        for group in groups {
            if let Some(flag) = self.flags.get(&group.key) {
                group.is_collapsed = *flag;
            }
            if let Some(children) = group.children.as_mut() {
                self.apply_to(children);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(key: &str, collapsed: bool, children: Option<Vec<Group>>) -> Group {
        Group {
            key: key.to_string(),
            name: format!("Region: {}", key),
            start_index: 0,
            count: 1,
            level: if children.is_some() { 0 } else { 1 },
            is_collapsed: collapsed,
            color: "black".to_string(),
            children,
        }
    }

    #[test]
    fn resolve_prefers_prior_state() {
        let mut state = CollapseState::new();
        assert!(state.resolve("A", true));
        state.toggle("A");
        assert!(!state.resolve("B", false));
        assert!(state.resolve("A", false));
    }

    #[test]
    fn untoggled_groups_follow_the_default() {
        let mut state = CollapseState::new();
        state.rebuild_from(&[group("A", false, None), group("B", false, None)]);
        state.toggle("A");

        assert!(state.resolve("A", false));
        assert!(!state.resolve("B", false));
        assert!(state.resolve("B", true));

        state.rebuild_from(&[group("A", true, None), group("B", true, None)]);
        assert!(!state.toggle("A"));
        assert!(!state.resolve("A", true));
    }

    #[test]
    fn toggle_does_not_cascade() {
        let mut groups = vec![group("A", false, Some(vec![group("x", false, None)]))];
        let mut state = CollapseState::new();
        state.rebuild_from(&groups);
        assert_eq!(state.len(), 2);

        assert!(state.toggle("A"));
        state.apply_to(&mut groups);
        assert!(groups[0].is_collapsed);
        let children = groups[0].children.as_ref().unwrap();
        assert!(!children[0].is_collapsed);

        assert!(!state.toggle("A"));
    }
}
