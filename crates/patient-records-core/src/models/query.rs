//! Query state: the filters, sort order and page applied to the record cache.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Active filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterSpec {
    /// Case-insensitive substring matched against name and registration number
    pub search: String,
    /// Exact facility match
    pub hospital: Option<String>,
    /// Inclusive lower date bound
    pub date_start: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub date_end: Option<NaiveDate>,
}

impl FilterSpec {
    /// Filter that matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Restrict to one facility. An empty name clears the restriction.
    pub fn with_hospital(mut self, hospital: Option<String>) -> Self {
        self.hospital = hospital.filter(|h| !h.is_empty());
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_start = start;
        self.date_end = end;
        self
    }

    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.hospital.is_none()
            && self.date_start.is_none()
            && self.date_end.is_none()
    }
}

/// Sort order by visit date.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortDirection {
    /// Newest first
    #[default]
    Descending,
    /// Oldest first
    Ascending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Descending => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::Descending,
        }
    }

    pub fn is_descending(self) -> bool {
        matches!(self, SortDirection::Descending)
    }

    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Descending => "Newest First",
            SortDirection::Ascending => "Oldest First",
        }
    }
}

/// Everything the presentation layer controls, as one immutable value.
///
/// Each mutator consumes the state and returns the next one. `page` is
/// 1-based and never drops below 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryState {
    pub filter: FilterSpec,
    pub sort: SortDirection,
    pub page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            filter: FilterSpec::default(),
            sort: SortDirection::default(),
            page: 1,
        }
    }
}

impl QueryState {
    /// Replace the filter. Any filter change returns to the first page.
    pub fn with_filter(self, filter: FilterSpec) -> Self {
        Self {
            filter,
            page: 1,
            ..self
        }
    }

    /// Clear all filters, keeping the sort order.
    pub fn reset_filters(self) -> Self {
        self.with_filter(FilterSpec::default())
    }

    pub fn toggle_sort(self) -> Self {
        Self {
            sort: self.sort.toggled(),
            ..self
        }
    }

    /// Advance one page, stopping at `total_pages`.
    pub fn next_page(self, total_pages: usize) -> Self {
        let page = if self.page < total_pages {
            self.page + 1
        } else {
            self.page
        };
        Self { page, ..self }
    }

    /// Go back one page, stopping at 1.
    pub fn previous_page(self) -> Self {
        Self {
            page: self.page.saturating_sub(1).max(1),
            ..self
        }
    }

    /// Pull `page` back into `1..=total_pages` (or 1 when there are no pages).
    pub fn clamp_page(self, total_pages: usize) -> Self {
        Self {
            page: self.page.min(total_pages).max(1),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_change_resets_page() {
        let state = QueryState::default().next_page(5).next_page(5);
        assert_eq!(state.page, 3);

        let state = state.with_filter(FilterSpec::all().with_search("ann"));
        assert_eq!(state.page, 1);
        assert_eq!(state.filter.search, "ann");
    }

    #[test]
    fn test_page_navigation_is_clamped() {
        let state = QueryState::default().previous_page();
        assert_eq!(state.page, 1);

        let state = state.next_page(2).next_page(2).next_page(2);
        assert_eq!(state.page, 2);

        // No pages at all: stays on page 1
        let state = QueryState::default().next_page(0);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_clamp_page() {
        let state = QueryState {
            page: 7,
            ..QueryState::default()
        };
        assert_eq!(state.clone().clamp_page(3).page, 3);
        assert_eq!(state.clamp_page(0).page, 1);
    }

    #[test]
    fn test_empty_hospital_clears_filter() {
        let filter = FilterSpec::all().with_hospital(Some(String::new()));
        assert!(filter.hospital.is_none());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_toggle_sort_keeps_page() {
        let state = QueryState::default().next_page(4).toggle_sort();
        assert_eq!(state.sort, SortDirection::Ascending);
        assert_eq!(state.page, 2);
        assert_eq!(state.sort.label(), "Oldest First");
    }
}
