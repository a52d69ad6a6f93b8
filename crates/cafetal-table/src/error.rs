//! Error types for table construction
//!
//! Runtime usage (paging, toggles) never fails; out-of-range input is
//! clamped or reported through the toggle outcome enums instead.

/// Table construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Two columns share a key
    #[error("duplicate column key: {0}")]
    DuplicateColumn(String),

    /// A column key that is not part of the table
    #[error("unknown column key: {0}")]
    UnknownColumn(String),

    /// Every column was configured hidden
    #[error("at least one column must stay visible")]
    NoVisibleColumns,
}
