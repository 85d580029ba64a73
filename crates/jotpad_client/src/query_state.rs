//! Immutable list-view query state.
//!
//! # Responsibility
//! - Model the current page/search/tags/sort selection as a value
//!   object with pure transition methods.
//!
//! # Invariants
//! - Every filter or sort change resets the page to 1; only explicit
//!   pagination keeps the current page.
//! - Selected tags are stored normalized (trimmed, lowercase) and
//!   deduplicated.

use jotpad_core::{normalize_tag, SortDirection, SortField, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

/// Snapshot of the list view's query selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub tags: Vec<String>,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            tags: Vec::new(),
            sort: SortField::default(),
            direction: SortDirection::default(),
        }
    }
}

impl QueryState {
    /// Moves to another page, keeping all filters.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Replaces the search text and returns to the first page.
    pub fn with_search(&self, search: &str) -> Self {
        Self {
            page: DEFAULT_PAGE,
            search: search.to_string(),
            ..self.clone()
        }
    }

    /// Toggles one tag in the selection and returns to the first page.
    ///
    /// The tag is normalized first; blank input is a no-op.
    pub fn with_tag_toggled(&self, tag: &str) -> Self {
        let Some(normalized) = normalize_tag(tag) else {
            return self.clone();
        };

        let mut tags = self.tags.clone();
        match tags.iter().position(|existing| *existing == normalized) {
            Some(index) => {
                tags.remove(index);
            }
            None => {
                tags.push(normalized);
                tags.sort();
            }
        }

        Self {
            page: DEFAULT_PAGE,
            tags,
            ..self.clone()
        }
    }

    /// Replaces the sort selection and returns to the first page.
    pub fn with_sort(&self, sort: SortField, direction: SortDirection) -> Self {
        Self {
            page: DEFAULT_PAGE,
            sort,
            direction,
            ..self.clone()
        }
    }

    /// Drops search and tag filters, keeping the sort selection.
    pub fn cleared_filters(&self) -> Self {
        Self {
            page: DEFAULT_PAGE,
            search: String::new(),
            tags: Vec::new(),
            ..self.clone()
        }
    }

    /// URL query pairs for `GET /notes`.
    ///
    /// Blank search and empty tag selections are omitted entirely; the
    /// server treats absence as "no constraint".
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.page_size.to_string()),
            ("sortBy", self.sort.as_str().to_string()),
            ("sortOrder", self.direction.as_str().to_string()),
        ];
        if !self.search.trim().is_empty() {
            params.push(("search", self.search.clone()));
        }
        if !self.tags.is_empty() {
            params.push(("tags", self.tags.join(",")));
        }
        params
    }
}
