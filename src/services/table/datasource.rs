//! Table Data Source
//!
//! Holds the rows behind one table and derives the visible page from the
//! current filter, sort and pagination settings. Also tracks row selection
//! with a tri-state "select all".
//!
//! In `Client` mode the source holds the full row set and slices pages
//! itself. In `Server` mode the rows already are the requested page and the
//! total comes from the backend.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::filter::{matches_props, resolve_path};
use super::memo::RowIdentity;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Active sort column (a serialized field path) and direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    #[default]
    Client,
    Server,
}

/// State of the "select all" checkbox.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectState {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Result of one `load_all` call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Rows were published.
    Loaded(usize),
    /// A fetch failed; the table was emptied.
    Failed,
    /// A newer load started first; nothing was published.
    Superseded,
}

/// Filter predicate: `(row, search term) -> keep`.
pub type RowPredicate<T> = Arc<dyn Fn(&T, &str) -> bool + Send + Sync>;

pub const DEFAULT_PAGE_SIZE: usize = 25;

pub struct TableDataSource<T> {
    rows: Vec<T>,
    view: Vec<T>,
    mode: PaginationMode,
    sort: Option<SortState>,
    filter_term: String,
    filter_props: Vec<String>,
    predicate: Option<RowPredicate<T>>,
    page_size: usize,
    page_index: usize,
    server_total: usize,
    selected: HashSet<String>,
    loading: bool,
}

impl<T> Default for TableDataSource<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            view: Vec::new(),
            mode: PaginationMode::Client,
            sort: None,
            filter_term: String::new(),
            filter_props: Vec::new(),
            predicate: None,
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
            server_total: 0,
            selected: HashSet::new(),
            loading: false,
        }
    }
}

impl<T> TableDataSource<T>
where
    T: Clone + Serialize + RowIdentity,
{
    pub fn new(mode: PaginationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    /// Fields searched by the default term filter.
    pub fn set_filter_props(&mut self, props: &[&str]) {
        self.filter_props = props.iter().map(|p| p.to_string()).collect();
        self.refresh();
    }

    /// Replace the row set. Selection of rows no longer present is dropped.
    pub fn set_data(&mut self, rows: Vec<T>) {
        let keys: HashSet<String> = rows.iter().map(RowIdentity::row_key).collect();
        self.selected.retain(|key| keys.contains(key));
        self.rows = rows;
        self.refresh();
    }

    /// Drop rows, selection and paging position. Sort and filter settings stay.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.view.clear();
        self.selected.clear();
        self.page_index = 0;
        self.server_total = 0;
    }

    pub fn data(&self) -> &[T] {
        &self.rows
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_sort(&mut self, column: impl Into<String>, direction: SortDirection) {
        self.sort = Some(SortState {
            column: column.into(),
            direction,
        });
        self.sort_data();
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.refresh();
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Stable sort of the filtered rows by the active column. Missing and
    /// null values sort last in either direction.
    pub fn sort_data(&mut self) {
        let Some(sort) = self.sort.clone() else {
            return;
        };
        let mut keyed: Vec<(Option<Value>, T)> = self
            .view
            .drain(..)
            .map(|row| {
                let key = serde_json::to_value(&row)
                    .ok()
                    .and_then(|v| resolve_path(&sort.column, &v).cloned())
                    .filter(|v| !v.is_null());
                (key, row)
            })
            .collect();
        keyed.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => {
                let ord = compare_values(a, b);
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        self.view = keyed.into_iter().map(|(_, row)| row).collect();
    }

    /// Search term for the active predicate (or the default property filter).
    pub fn set_filter_term(&mut self, term: impl Into<String>) {
        self.filter_term = term.into();
        self.page_index = 0;
        self.refresh();
    }

    pub fn filter_term(&self) -> &str {
        &self.filter_term
    }

    /// Install a custom predicate and re-filter.
    pub fn filter_data(&mut self, predicate: RowPredicate<T>) {
        self.predicate = Some(predicate);
        self.page_index = 0;
        self.refresh();
    }

    pub fn clear_filter(&mut self) {
        self.predicate = None;
        self.filter_term.clear();
        self.refresh();
    }

    /// `total` is only used in `Server` mode.
    pub fn set_pagination_config(&mut self, page_size: usize, page_index: usize, total: usize) {
        self.page_size = page_size.max(1);
        self.page_index = page_index;
        self.server_total = total;
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Rows matching the current filter, in sort order.
    pub fn filtered_rows(&self) -> &[T] {
        &self.view
    }

    /// Rows on the current page.
    pub fn visible_rows(&self) -> &[T] {
        match self.mode {
            PaginationMode::Server => &self.view,
            PaginationMode::Client => {
                let start = self.page_index.saturating_mul(self.page_size).min(self.view.len());
                let end = start.saturating_add(self.page_size).min(self.view.len());
                &self.view[start..end]
            }
        }
    }

    pub fn total_items(&self) -> usize {
        match self.mode {
            PaginationMode::Server => self.server_total,
            PaginationMode::Client => self.view.len(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.total_items().div_ceil(self.page_size)
    }

    pub fn toggle_row(&mut self, row: &T) {
        let key = row.row_key();
        if !self.selected.remove(&key) {
            self.selected.insert(key);
        }
    }

    pub fn is_selected(&self, row: &T) -> bool {
        self.selected.contains(&row.row_key())
    }

    pub fn has_selected(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Every filtered row is selected (false for an empty table).
    pub fn is_all_selected(&self) -> bool {
        !self.view.is_empty() && self.view.iter().all(|row| self.is_selected(row))
    }

    /// Select every filtered row, or clear the selection if all already are.
    pub fn toggle_all(&mut self) {
        if self.is_all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.view.iter().map(RowIdentity::row_key).collect();
        }
    }

    pub fn select_state(&self) -> SelectState {
        if self.is_all_selected() {
            SelectState::Checked
        } else if self.view.iter().any(|row| self.is_selected(row)) {
            SelectState::Indeterminate
        } else {
            SelectState::Unchecked
        }
    }

    pub fn selected_rows(&self) -> Vec<T> {
        self.rows
            .iter()
            .filter(|row| self.is_selected(row))
            .cloned()
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn keep(&self, row: &T) -> bool {
        if let Some(predicate) = &self.predicate {
            return predicate(row, &self.filter_term);
        }
        if self.filter_term.trim().is_empty() || self.filter_props.is_empty() {
            return true;
        }
        serde_json::to_value(row)
            .map(|value| matches_props(&value, &self.filter_term, &self.filter_props))
            .unwrap_or(false)
    }

    fn refresh(&mut self) {
        let view: Vec<T> = self.rows.iter().filter(|row| self.keep(row)).cloned().collect();
        self.view = view;
        self.sort_data();
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
