//! Generic data table.
//!
//! A [`TableDef`] fixes the columns and options of one table. Each time the page renders, a
//! [`DataTable`] is built over the definition, the table's [`TableState`], and the caller's
//! rows. The table only reads rows; all it ever changes is its own state.
//!
//! ```ignore
//! let def = TableDef::new(columns, TableOptions::default().filter_on("title"))?;
//! let mut state = TableState::new();
//!
//! let mut table = DataTable::new(&def, &mut state, store.records());
//! table.set_filter("Camp");
//! table.toggle_sort("date");
//! for row in table.page_rows() { /* ... */ }
//! ```

mod cell;
mod column;
mod state;
mod view;

pub use cell::*;
pub use column::*;
pub use state::*;
pub use view::*;

use std::collections::HashSet;
use std::fmt;

use crate::errors::AppError;
use crate::validation::ValidationErrors;

type RowIdFn<T> = Box<dyn Fn(&T, usize) -> String>;

/// Hook run by [`DataTable::trigger_export`].
pub type ExportHook<T> = Box<dyn Fn(&DataTable<'_, T>) -> Result<(), AppError>>;

/// Caller-supplied extensions.
pub struct TableMeta<T> {
    pub on_export: Option<ExportHook<T>>,
}

impl<T> Default for TableMeta<T> {
    fn default() -> Self {
        Self { on_export: None }
    }
}

/// Columns, options, row identity and extensions of one table.
pub struct TableDef<T> {
    columns: Vec<Column<T>>,
    options: TableOptions,
    row_id: RowIdFn<T>,
    meta: TableMeta<T>,
}

impl<T> TableDef<T> {
    /// Column ids must be unique and must not use the reserved `select` id.
    pub fn new(columns: Vec<Column<T>>, options: TableOptions) -> Result<Self, AppError> {
        let mut errors = ValidationErrors::new();
        let mut seen = HashSet::new();
        for column in &columns {
            if column.id() == SELECT_COLUMN_ID {
                errors.add("columns", format!("Column id '{}' is reserved", SELECT_COLUMN_ID));
            } else if !seen.insert(column.id()) {
                errors.add("columns", format!("Duplicate column id '{}'", column.id()));
            }
        }
        errors.into_result()?;

        Ok(Self {
            columns,
            options,
            row_id: Box::new(|_, index| index.to_string()),
            meta: TableMeta::default(),
        })
    }

    /// Key rows by a stable id instead of their position.
    pub fn with_row_id<F>(mut self, row_id: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        self.row_id = Box::new(move |row, _| row_id(row));
        self
    }

    pub fn with_meta(mut self, meta: TableMeta<T>) -> Self {
        self.meta = meta;
        self
    }

    pub fn on_export<F>(mut self, hook: F) -> Self
    where
        F: Fn(&DataTable<'_, T>) -> Result<(), AppError> + 'static,
    {
        self.meta.on_export = Some(Box::new(hook));
        self
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.id() == id)
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn meta(&self) -> &TableMeta<T> {
        &self.meta
    }
}

impl<T> fmt::Debug for TableDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDef")
            .field("columns", &self.columns)
            .field("options", &self.options)
            .field("has_export", &self.meta.on_export.is_some())
            .finish_non_exhaustive()
    }
}

/// A row as the table sees it.
#[derive(Debug)]
pub struct Row<'a, T> {
    pub id: String,
    /// Position in the caller's data
    pub index: usize,
    pub original: &'a T,
    pub selected: bool,
}

impl<T> Clone for Row<'_, T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            index: self.index,
            original: self.original,
            selected: self.selected,
        }
    }
}

/// One render of a table over a data slice.
pub struct DataTable<'a, T> {
    def: &'a TableDef<T>,
    state: &'a mut TableState,
    data: &'a [T],
    ids: Vec<String>,
    /// Data indices after sorting, before filtering
    sorted: Vec<usize>,
    /// Data indices after filtering and sorting
    rows: Vec<usize>,
}

impl<'a, T> DataTable<'a, T> {
    /// Build the table. Selected ids that match no row are dropped and the page is clamped.
    pub fn new(def: &'a TableDef<T>, state: &'a mut TableState, data: &'a [T]) -> Self {
        let ids: Vec<String> = data
            .iter()
            .enumerate()
            .map(|(index, row)| (def.row_id)(row, index))
            .collect();

        let known: HashSet<&str> = ids.iter().map(String::as_str).collect();
        state.row_selection.retain(|id| known.contains(id.as_str()));

        let mut table = Self {
            def,
            state,
            data,
            ids,
            sorted: Vec::new(),
            rows: Vec::new(),
        };
        table.recompute();
        table
    }

    pub fn def(&self) -> &'a TableDef<T> {
        self.def
    }

    pub fn state(&self) -> &TableState {
        &*self.state
    }

    pub fn data(&self) -> &'a [T] {
        self.data
    }

    fn recompute(&mut self) {
        let mut sorted: Vec<usize> = (0..self.data.len()).collect();
        self.sort_rows(&mut sorted);
        self.rows = sorted
            .iter()
            .copied()
            .filter(|&index| self.passes_filter(&self.data[index]))
            .collect();
        self.sorted = sorted;
        self.clamp_page();
    }

    fn passes_filter(&self, row: &T) -> bool {
        let needle = self.state.filter.as_str();
        if needle.is_empty() {
            return true;
        }

        let options = &self.def.options;
        let mut columns = options
            .filter_columns
            .iter()
            .filter_map(|id| self.def.column(id))
            .peekable();
        if columns.peek().is_none() {
            return true;
        }
        columns.any(|c| options.case_sensitivity.matches(&c.value(row).to_text(), needle))
    }

    fn sort_rows(&self, rows: &mut [usize]) {
        let sorts: Vec<(&Column<T>, SortDirection)> = self
            .state
            .sorting
            .iter()
            .filter_map(|s| {
                self.def
                    .column(&s.id)
                    .filter(|c| c.is_sortable())
                    .map(|c| (c, s.direction))
            })
            .collect();
        if sorts.is_empty() {
            return;
        }

        // Accessors run once per row, not once per comparison.
        let mut keyed: Vec<(usize, Vec<CellValue>)> = rows
            .iter()
            .map(|&index| {
                let keys = sorts.iter().map(|(c, _)| c.value(&self.data[index])).collect();
                (index, keys)
            })
            .collect();

        // Stable: equal keys keep their input order in both directions.
        keyed.sort_by(|(_, a), (_, b)| {
            for (position, (_, direction)) in sorts.iter().enumerate() {
                let ordering = a[position].compare(&b[position]);
                let ordering = match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering.is_ne() {
                    return ordering;
                }
            }
            std::cmp::Ordering::Equal
        });

        for (slot, (index, _)) in rows.iter_mut().zip(keyed) {
            *slot = index;
        }
    }

    fn clamp_page(&mut self) {
        let last = self.page_count() - 1;
        if self.state.pagination.page_index > last {
            self.state.pagination.page_index = last;
        }
    }

    fn row(&self, index: usize) -> Row<'a, T> {
        let id = self.ids[index].clone();
        let selected = self.state.row_selection.contains(&id);
        Row {
            id,
            index,
            original: &self.data[index],
            selected,
        }
    }

    // ==================== ROW MODEL ====================

    /// Filtered and sorted rows.
    pub fn rows(&self) -> Vec<Row<'a, T>> {
        self.rows.iter().map(|&index| self.row(index)).collect()
    }

    /// Number of rows before filtering.
    pub fn total_count(&self) -> usize {
        self.data.len()
    }

    /// Number of rows after filtering.
    pub fn filtered_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<Row<'a, T>> {
        self.page_range()
            .map(|position| self.row(self.rows[position]))
            .collect()
    }

    fn page_range(&self) -> std::ops::Range<usize> {
        let size = self.page_size();
        let start = (self.page_index() * size).min(self.rows.len());
        let end = (start + size).min(self.rows.len());
        start..end
    }

    /// Data columns currently shown, in definition order.
    pub fn visible_columns(&self) -> Vec<&'a Column<T>> {
        self.def
            .columns
            .iter()
            .filter(|c| !c.is_hideable() || self.state.is_column_visible(c.id()))
            .collect()
    }

    pub fn cell(&self, row: &Row<'_, T>, column: &Column<T>) -> CellValue {
        column.value(row.original)
    }

    // ==================== SORTING ====================

    pub fn sorting(&self) -> &[ColumnSort] {
        &self.state.sorting
    }

    /// Cycle a column through ascending, descending, and unsorted.
    pub fn toggle_sort(&mut self, id: &str) {
        let Some(column) = self.def.column(id) else {
            return;
        };
        if !column.is_sortable() {
            return;
        }

        let next = match self.state.sort_direction(id) {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        };

        match self.def.options.sort_mode {
            SortMode::Single => {
                self.state.sorting.clear();
                if let Some(direction) = next {
                    self.state.sorting.push(ColumnSort {
                        id: id.to_string(),
                        direction,
                    });
                }
            }
            SortMode::Multi => {
                let existing = self.state.sorting.iter().position(|s| s.id == id);
                match (existing, next) {
                    (Some(position), Some(direction)) => {
                        self.state.sorting[position].direction = direction
                    }
                    (Some(position), None) => {
                        self.state.sorting.remove(position);
                    }
                    (None, Some(direction)) => self.state.sorting.push(ColumnSort {
                        id: id.to_string(),
                        direction,
                    }),
                    (None, None) => {}
                }
            }
        }

        self.recompute();
    }

    /// Replace the active sorts. Single-sort tables keep only the first.
    pub fn set_sorting(&mut self, mut sorting: Vec<ColumnSort>) {
        if self.def.options.sort_mode == SortMode::Single {
            sorting.truncate(1);
        }
        self.state.sorting = sorting;
        self.recompute();
    }

    // ==================== FILTERING ====================

    pub fn filter(&self) -> &str {
        &self.state.filter
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.state.filter = text.into();
        self.recompute();
    }

    // ==================== VISIBILITY ====================

    pub fn is_column_visible(&self, id: &str) -> bool {
        match self.def.column(id) {
            Some(column) => !column.is_hideable() || self.state.is_column_visible(id),
            None => false,
        }
    }

    /// Show or hide a hideable column. Other columns are left alone.
    pub fn set_column_visible(&mut self, id: &str, visible: bool) {
        if self.def.column(id).is_some_and(|c| c.is_hideable()) {
            self.state.column_visibility.insert(id.to_string(), visible);
        }
    }

    pub fn toggle_column_visibility(&mut self, id: &str) {
        let visible = self.is_column_visible(id);
        self.set_column_visible(id, !visible);
    }

    // ==================== PAGINATION ====================

    pub fn page_size(&self) -> usize {
        self.def.options.page_size.max(1)
    }

    /// Always at least one page, even with no rows.
    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size()).max(1)
    }

    pub fn page_index(&self) -> usize {
        self.state.pagination.page_index.min(self.page_count() - 1)
    }

    pub fn set_page_index(&mut self, page_index: usize) {
        self.state.pagination.page_index = page_index.min(self.page_count() - 1);
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index() > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index() + 1 < self.page_count()
    }

    pub fn next_page(&mut self) {
        self.set_page_index(self.page_index() + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page_index(self.page_index().saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.set_page_index(0);
    }

    pub fn last_page(&mut self) {
        self.set_page_index(self.page_count() - 1);
    }

    // ==================== SELECTION ====================

    /// Select or deselect a row by id. Unknown ids are ignored.
    pub fn set_row_selected(&mut self, id: &str, selected: bool) {
        if !self.ids.iter().any(|known| known == id) {
            return;
        }
        if selected {
            self.state.row_selection.insert(id.to_string());
        } else {
            self.state.row_selection.remove(id);
        }
    }

    pub fn toggle_row_selected(&mut self, id: &str) {
        let selected = self.state.row_selection.contains(id);
        self.set_row_selected(id, !selected);
    }

    /// Header checkbox: affects the rows on the current page only.
    pub fn toggle_page_selected(&mut self, selected: bool) {
        for position in self.page_range() {
            let id = &self.ids[self.rows[position]];
            if selected {
                self.state.row_selection.insert(id.clone());
            } else {
                self.state.row_selection.remove(id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.state.row_selection.clear();
    }

    /// Header checkbox state for the current page.
    pub fn page_selection(&self) -> CheckState {
        let range = self.page_range();
        let on_page = range.len();
        let selected = range
            .filter(|&position| {
                self.state
                    .row_selection
                    .contains(&self.ids[self.rows[position]])
            })
            .count();

        if selected == 0 {
            CheckState::Unchecked
        } else if selected == on_page {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    /// Every selected row in sort order, including rows the filter currently hides.
    pub fn selected_rows(&self) -> Vec<Row<'a, T>> {
        self.sorted
            .iter()
            .filter(|&&index| self.state.row_selection.contains(&self.ids[index]))
            .map(|&index| self.row(index))
            .collect()
    }

    /// Size of the selection. Stale ids are dropped on construction, so every id counts.
    pub fn selected_count(&self) -> usize {
        self.state.row_selection.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.state.row_selection.is_empty()
    }

    // ==================== EXTENSIONS ====================

    pub fn can_export(&self) -> bool {
        self.def.meta.on_export.is_some()
    }

    /// Run the export hook, if one is installed.
    pub fn trigger_export(&self) -> Result<(), AppError> {
        match &self.def.meta.on_export {
            Some(hook) => hook(self),
            None => Ok(()),
        }
    }
}
