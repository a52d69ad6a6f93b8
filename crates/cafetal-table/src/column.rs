//! Column descriptors
//!
//! Columns are kept in insertion order and are unique by key.

use crate::error::TableError;
use crate::row::TableRow;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Placeholder shown for empty cells
const EMPTY_CELL: &str = "—";

/// Value produced by a column render function
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayValue {
    /// Text cell
    Text(String),
    /// Numeric cell
    Number(f64),
    /// Missing value
    Empty,
}

impl DisplayValue {
    /// Whether the cell has no value
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{n:.0}"),
            Self::Number(n) if n.is_finite() => write!(f, "{n}"),
            Self::Number(_) | Self::Empty => f.write_str(EMPTY_CELL),
        }
    }
}

impl From<String> for DisplayValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for DisplayValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for DisplayValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<T: Into<DisplayValue>> From<Option<T>> for DisplayValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// Shared render function
pub type RenderFn<T> = Arc<dyn Fn(&T) -> DisplayValue + Send + Sync>;

/// One table column
pub struct ColumnDescriptor<T> {
    key: String,
    header: String,
    render: RenderFn<T>,
}

impl<T> ColumnDescriptor<T> {
    /// Create column with a custom render function
    pub fn new<F>(key: impl Into<String>, header: impl Into<String>, render: F) -> Self
    where
        F: Fn(&T) -> DisplayValue + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            header: header.into(),
            render: Arc::new(render),
        }
    }

    /// Column key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Column header
    #[inline]
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Render the cell for `row`
    #[inline]
    pub fn render(&self, row: &T) -> DisplayValue {
        (self.render)(row)
    }
}

impl<T: TableRow + 'static> ColumnDescriptor<T> {
    /// Column that shows the row's field of the same key as text
    pub fn field(key: impl Into<String>, header: impl Into<String>) -> Self {
        let key = key.into();
        let field = key.clone();
        Self::new(key, header, move |row: &T| {
            row.field_text(&field)
                .map_or(DisplayValue::Empty, |text| DisplayValue::Text(text.into_owned()))
        })
    }
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            render: Arc::clone(&self.render),
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

/// Ordered, key-unique column collection
pub struct ColumnSet<T> {
    columns: IndexMap<String, ColumnDescriptor<T>>,
}

impl<T> ColumnSet<T> {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: IndexMap::new(),
        }
    }

    /// Append a column, rejecting duplicate keys
    pub fn push(&mut self, column: ColumnDescriptor<T>) -> Result<(), TableError> {
        if self.columns.contains_key(column.key()) {
            return Err(TableError::DuplicateColumn(column.key().to_string()));
        }
        self.columns.insert(column.key().to_string(), column);
        Ok(())
    }

    /// Lookup by key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ColumnDescriptor<T>> {
        self.columns.get(key)
    }

    /// Check if key exists
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.columns.contains_key(key)
    }

    /// Columns in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor<T>> {
        self.columns.values()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of columns
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<T> Default for ColumnSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ColumnSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.values()).finish()
    }
}
