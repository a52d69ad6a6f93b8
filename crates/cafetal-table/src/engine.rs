//! Table engine
//!
//! Applies a [`TableViewState`] to a row collection. Rows keep the order the
//! caller supplied; the engine only sorts when asked to, and then stably.

use crate::column::{ColumnDescriptor, ColumnSet, DisplayValue};
use crate::error::TableError;
use crate::row::TableRow;
use crate::state::{clamp_page, total_pages, TableViewState, DEFAULT_PAGE_SIZE};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Outcome of [`TableEngine::toggle_row_selection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionToggle {
    /// Row is now selected
    Selected,
    /// Row is no longer selected
    Deselected,
    /// No row with that id exists; nothing changed
    UnknownRow,
}

/// Outcome of [`TableEngine::toggle_column_visibility`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnToggle {
    /// Column is now visible
    Shown,
    /// Column is now hidden
    Hidden,
    /// Column is the last visible one; nothing changed
    LastVisible,
    /// No column with that key exists; nothing changed
    UnknownColumn,
}

impl ColumnToggle {
    /// Whether the toggle changed anything
    #[inline]
    #[must_use]
    pub fn applied(self) -> bool {
        matches!(self, Self::Shown | Self::Hidden)
    }
}

/// One rendered row of the current page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow<Id> {
    /// Row id
    pub id: Id,
    /// Cells of the visible columns, in column order
    pub cells: Vec<DisplayValue>,
    /// Whether the row is selected
    pub selected: bool,
}

/// Builder for [`TableEngine`]
pub struct TableBuilder<T: TableRow> {
    columns: Vec<ColumnDescriptor<T>>,
    hidden: Vec<String>,
    search_key: Option<String>,
    page_size: usize,
}

impl<T: TableRow> TableBuilder<T> {
    fn new() -> Self {
        Self {
            columns: Vec::new(),
            hidden: Vec::new(),
            search_key: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Append a column
    #[must_use]
    pub fn column(mut self, column: ColumnDescriptor<T>) -> Self {
        self.columns.push(column);
        self
    }

    /// Start with a column hidden
    #[must_use]
    pub fn hidden(mut self, key: impl Into<String>) -> Self {
        self.hidden.push(key.into());
        self
    }

    /// Field searched by [`TableEngine::set_search_term`]
    #[must_use]
    pub fn search_key(mut self, key: impl Into<String>) -> Self {
        self.search_key = Some(key.into());
        self
    }

    /// Rows per page (values below 1 become 1)
    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Build the engine over `rows`
    pub fn build(self, rows: Vec<T>) -> Result<TableEngine<T>, TableError> {
        let mut columns = ColumnSet::new();
        for column in self.columns {
            columns.push(column)?;
        }

        let mut state = TableViewState::new(self.page_size);
        state.visible_column_keys = columns.keys().map(str::to_string).collect();
        for key in &self.hidden {
            if !columns.contains(key) {
                return Err(TableError::UnknownColumn(key.clone()));
            }
            state.visible_column_keys.remove(key);
        }
        if !columns.is_empty() && state.visible_column_keys.is_empty() {
            return Err(TableError::NoVisibleColumns);
        }

        let mut engine = TableEngine {
            rows,
            columns,
            search_key: self.search_key,
            state,
            filtered: Vec::new(),
        };
        engine.refilter();
        Ok(engine)
    }
}

/// Client-side search, pagination, selection and column visibility
pub struct TableEngine<T: TableRow> {
    rows: Vec<T>,
    columns: ColumnSet<T>,
    search_key: Option<String>,
    state: TableViewState<T::Id>,
    /// Indices into `rows` that pass the search filter, in row order
    filtered: Vec<usize>,
}

impl<T: TableRow> TableEngine<T> {
    /// Start building a table
    #[must_use]
    pub fn builder() -> TableBuilder<T> {
        TableBuilder::new()
    }

    /// Current view state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &TableViewState<T::Id> {
        &self.state
    }

    /// All rows, unfiltered
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Configured search field
    #[inline]
    #[must_use]
    pub fn search_key(&self) -> Option<&str> {
        self.search_key.as_deref()
    }

    /// Column definitions
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &ColumnSet<T> {
        &self.columns
    }

    /// Replace the row collection
    ///
    /// Selections of rows that no longer exist are dropped and the current
    /// page is clamped to the new page count.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        let present: BTreeSet<T::Id> = self.rows.iter().map(TableRow::row_id).collect();
        self.state.selected_row_ids.retain(|id| present.contains(id));
        self.refilter();
    }

    /// Stable sort of the collection with a caller comparator
    pub fn sort_rows_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.rows.sort_by(compare);
        self.refilter();
    }

    /// Set the search term and go back to page 1
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
        self.state.current_page = 1;
        self.refilter();
        tracing::debug!(
            "Search '{}' matched {} of {} rows",
            self.state.search_term,
            self.filtered.len(),
            self.rows.len()
        );
    }

    /// Move to page `n`, clamped into `[1, total_pages]`; returns the page
    pub fn set_page(&mut self, page: usize) -> usize {
        self.state.current_page = clamp_page(page, self.total_pages());
        self.state.current_page
    }

    /// Advance one page (stays on the last page)
    pub fn next_page(&mut self) -> usize {
        self.set_page(self.state.current_page.saturating_add(1))
    }

    /// Go back one page (stays on page 1)
    pub fn previous_page(&mut self) -> usize {
        self.set_page(self.state.current_page.saturating_sub(1))
    }

    /// Change rows per page (values below 1 become 1)
    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.page_size = page_size.max(1);
        self.clamp_current_page();
    }

    /// `max(1, ceil(filtered_count / page_size))`
    #[inline]
    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.state.page_size)
    }

    /// Number of rows passing the search filter
    #[inline]
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    /// Rows passing the search filter, in collection order
    pub fn filtered_rows(&self) -> impl Iterator<Item = &T> {
        self.filtered.iter().map(|&i| &self.rows[i])
    }

    /// Rows of the current page
    ///
    /// Empty only when the filtered collection is empty.
    #[must_use]
    pub fn page_rows(&self) -> Vec<&T> {
        let size = self.state.page_size;
        let start = (self.state.current_page - 1) * size;
        self.filtered
            .iter()
            .skip(start)
            .take(size)
            .map(|&i| &self.rows[i])
            .collect()
    }

    /// Flip selection of a row, wherever it is displayed
    pub fn toggle_row_selection(&mut self, id: &T::Id) -> SelectionToggle {
        if !self.rows.iter().any(|row| row.row_id() == *id) {
            return SelectionToggle::UnknownRow;
        }
        if self.state.selected_row_ids.remove(id) {
            SelectionToggle::Deselected
        } else {
            self.state.selected_row_ids.insert(id.clone());
            SelectionToggle::Selected
        }
    }

    /// Select every row passing the current filter
    pub fn select_all_filtered(&mut self) {
        for &i in &self.filtered {
            self.state.selected_row_ids.insert(self.rows[i].row_id());
        }
    }

    /// Drop every selection
    pub fn clear_selection(&mut self) {
        self.state.selected_row_ids.clear();
    }

    /// Whether the row is selected
    #[inline]
    #[must_use]
    pub fn is_selected(&self, id: &T::Id) -> bool {
        self.state.selected_row_ids.contains(id)
    }

    /// Selected rows in collection order, regardless of search or page
    #[must_use]
    pub fn selected_rows(&self) -> Vec<&T> {
        self.rows
            .iter()
            .filter(|row| self.state.selected_row_ids.contains(&row.row_id()))
            .collect()
    }

    /// Flip visibility of a column; the last visible column cannot be hidden
    pub fn toggle_column_visibility(&mut self, key: &str) -> ColumnToggle {
        if !self.columns.contains(key) {
            return ColumnToggle::UnknownColumn;
        }
        let visible = &mut self.state.visible_column_keys;
        if !visible.contains(key) {
            visible.insert(key.to_string());
            return ColumnToggle::Shown;
        }
        if visible.len() == 1 {
            tracing::debug!("Refusing to hide last visible column '{}'", key);
            return ColumnToggle::LastVisible;
        }
        visible.remove(key);
        ColumnToggle::Hidden
    }

    /// Whether the column is visible
    #[inline]
    #[must_use]
    pub fn is_column_visible(&self, key: &str) -> bool {
        self.state.visible_column_keys.contains(key)
    }

    /// Visible columns in definition order
    #[must_use]
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor<T>> {
        self.columns
            .iter()
            .filter(|c| self.state.visible_column_keys.contains(c.key()))
            .collect()
    }

    /// Headers of the visible columns
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        self.visible_columns()
            .into_iter()
            .map(ColumnDescriptor::header)
            .collect()
    }

    /// Render the current page through the visible columns
    #[must_use]
    pub fn render_page(&self) -> Vec<RenderedRow<T::Id>> {
        let columns = self.visible_columns();
        self.page_rows()
            .into_iter()
            .map(|row| {
                let id = row.row_id();
                RenderedRow {
                    selected: self.state.selected_row_ids.contains(&id),
                    cells: columns.iter().map(|c| c.render(row)).collect(),
                    id,
                }
            })
            .collect()
    }

    /// Adopt a previously saved state, re-establishing every invariant
    pub fn restore_state(&mut self, mut state: TableViewState<T::Id>) {
        state.page_size = state.page_size.max(1);

        let present: BTreeSet<T::Id> = self.rows.iter().map(TableRow::row_id).collect();
        state.selected_row_ids.retain(|id| present.contains(id));

        state.visible_column_keys.retain(|k| self.columns.contains(k));
        if state.visible_column_keys.is_empty() {
            state.visible_column_keys = self.columns.keys().map(str::to_string).collect();
        }

        let requested_page = state.current_page;
        self.state = state;
        self.refilter();
        self.set_page(requested_page);
    }

    fn refilter(&mut self) {
        let needle = self.state.search_term.trim().to_lowercase();
        let filtered: Vec<usize> = match self.search_key.as_deref() {
            Some(key) if !needle.is_empty() => self
                .rows
                .iter()
                .enumerate()
                .filter(|(_, row)| {
                    row.field_text(key)
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
                .map(|(i, _)| i)
                .collect(),
            _ => (0..self.rows.len()).collect(),
        };
        self.filtered = filtered;
        self.clamp_current_page();
    }

    fn clamp_current_page(&mut self) {
        self.state.current_page = clamp_page(self.state.current_page, self.total_pages());
    }
}

impl<T: TableRow> std::fmt::Debug for TableEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableEngine")
            .field("rows", &self.rows.len())
            .field("filtered", &self.filtered.len())
            .field("columns", &self.columns)
            .field("state", &self.state)
            .finish()
    }
}
