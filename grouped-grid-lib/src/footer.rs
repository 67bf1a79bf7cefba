//! Pagination footer

use crate::model::PagingInfo;
use crate::resources::Resources;

/// Row count shown when the host does not know the total.
pub const UNKNOWN_TOTAL: &str = "5000+";

/// Contents of the grid footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    /// Total rows, or [`UNKNOWN_TOTAL`].
    pub rows: String,
    pub selected: usize,
    pub current_page: u32,
    /// Link text, absent once the grid is full screen.
    pub full_screen_label: Option<String>,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl Footer {
    pub fn new(
        paging: &PagingInfo,
        selected: usize,
        current_page: u32,
        is_full_screen: bool,
        resources: &dyn Resources,
    ) -> Self {
        let rows = if paging.total_result_count < 0 {
            UNKNOWN_TOTAL.to_string()
        } else {
            paging.total_result_count.to_string()
        };
        Self {
            rows,
            selected,
            current_page,
            full_screen_label: (!is_full_screen)
                .then(|| resources.get_string("Label_ShowFullScreen")),
            has_previous_page: paging.has_previous_page,
            has_next_page: paging.has_next_page,
        }
    }

    /// The status text, e.g. `Rows: 12  Selected: 0`.
    pub fn status(&self) -> String {
        format!("Rows: {}  Selected: {}", self.rows, self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::DefaultResources;

    #[test]
    fn unknown_total_shows_placeholder() {
        let paging = PagingInfo {
            total_result_count: -1,
            ..PagingInfo::default()
        };
        let footer = Footer::new(&paging, 2, 1, false, &DefaultResources::new());
        assert_eq!(footer.status(), "Rows: 5000+  Selected: 2");
        assert_eq!(footer.full_screen_label.as_deref(), Some("Show full screen"));
    }

    #[test]
    fn full_screen_hides_link() {
        let paging = PagingInfo {
            total_result_count: 42,
            ..PagingInfo::default()
        };
        let footer = Footer::new(&paging, 0, 1, true, &DefaultResources::new());
        assert_eq!(footer.rows, "42");
        assert!(footer.full_screen_label.is_none());
    }
}
