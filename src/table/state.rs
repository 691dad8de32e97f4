//! Table view state and options.

use std::collections::{BTreeMap, BTreeSet};

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One active sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSort {
    pub id: String,
    pub direction: SortDirection,
}

impl ColumnSort {
    pub fn asc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationState {
    pub page_index: usize,
}

/// Ephemeral per-table state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
    /// Active sorts, highest priority first
    pub sorting: Vec<ColumnSort>,
    /// Free-text filter over the default filter columns
    pub filter: String,
    /// Column id -> shown. Missing ids are shown.
    pub column_visibility: BTreeMap<String, bool>,
    /// Ids of selected rows
    pub row_selection: BTreeSet<String>,
    pub pagination: PaginationState,
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_column_visible(&self, id: &str) -> bool {
        self.column_visibility.get(id).copied().unwrap_or(true)
    }

    pub fn sort_direction(&self, id: &str) -> Option<SortDirection> {
        self.sorting.iter().find(|s| s.id == id).map(|s| s.direction)
    }
}

/// How many columns may be sorted at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Sorting a column clears every other sort.
    #[default]
    Single,
    /// Sorting a column appends it as the lowest-priority sort.
    Multi,
}

/// Case policy for the free-text filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    pub fn matches(&self, haystack: &str, needle: &str) -> bool {
        match self {
            CaseSensitivity::Sensitive => haystack.contains(needle),
            CaseSensitivity::Insensitive => haystack.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

/// Fixed configuration of a table instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    pub page_size: usize,
    /// Columns the free-text filter searches. Empty disables filtering.
    pub filter_columns: Vec<String>,
    pub case_sensitivity: CaseSensitivity,
    pub sort_mode: SortMode,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            filter_columns: Vec::new(),
            case_sensitivity: CaseSensitivity::Sensitive,
            sort_mode: SortMode::Single,
        }
    }
}

impl TableOptions {
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn filter_on(mut self, column: impl Into<String>) -> Self {
        self.filter_columns.push(column.into());
        self
    }

    pub fn case_sensitivity(mut self, case_sensitivity: CaseSensitivity) -> Self {
        self.case_sensitivity = case_sensitivity;
        self
    }

    pub fn sort_mode(mut self, sort_mode: SortMode) -> Self {
        self.sort_mode = sort_mode;
        self
    }
}

/// Tri-state checkbox value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Indeterminate,
    Checked,
}
