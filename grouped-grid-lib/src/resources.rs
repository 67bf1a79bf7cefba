//! Localized strings

use std::collections::HashMap;

/// Source of localized UI strings, looked up by resource key.
pub trait Resources: Send + Sync {
    /// Returns the string for `key`, or the key itself when unknown.
    fn get_string(&self, key: &str) -> String;
}

const ENGLISH: &[(&str, &str)] = &[
    ("Label_SortAZ", "Sort A to Z"),
    ("Label_SortZA", "Sort Z to A"),
    ("Label_SortNumberUp", "Sort smallest to largest"),
    ("Label_SortNumberDown", "Sort largest to smallest"),
    ("Label_SortDateUp", "Sort oldest to newest"),
    ("Label_SortDateDown", "Sort newest to oldest"),
    ("Label_GroupBy", "Group by"),
    ("Label_ClearGroupBy", "Clear group by"),
    ("Label_ClearGroupBySecondary", "Clear secondary group by first"),
    ("Label_ColumnFilter", "Filter by"),
    ("Label_ClearColumnFilter", "Clear filter"),
    ("Label_ShowFullScreen", "Show full screen"),
    ("Label_NoRecords", "No records found"),
    ("Label_Grid_Footer", "Page {0} ({1} selected)"),
    ("Label_Grid_Footer_RecordCount", "{0} records ({1} selected)"),
];

/// English strings, with optional overrides.
#[derive(Debug, Clone, Default)]
pub struct DefaultResources {
    overrides: HashMap<String, String>,
}

impl DefaultResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }
}

impl Resources for DefaultResources {
    fn get_string(&self, key: &str) -> String {
        if let Some(value) = self.overrides.get(key) {
            return value.clone();
        }
        ENGLISH
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

/// Replaces `{0}`, `{1}`, ... in `template` with `args`.
pub fn format_resource(template: &str, args: &[&str]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |text, (i, arg)| {
            text.replacen(&format!("{{{}}}", i), arg, 1)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_then_english_then_key() {
        let resources = DefaultResources::new().with_string("Label_SortAZ", "A-Z");
        assert_eq!(resources.get_string("Label_SortAZ"), "A-Z");
        assert_eq!(resources.get_string("Label_SortZA"), "Sort Z to A");
        assert_eq!(resources.get_string("Label_Unknown"), "Label_Unknown");
    }

    #[test]
    fn format_fills_placeholders() {
        assert_eq!(
            format_resource("Page {0} ({1} selected)", &["2", "5"]),
            "Page 2 (5 selected)"
        );
    }
}
