//! Error types for screen sessions

use cafetal_client::ClientError;
use cafetal_table::TableError;

/// Session error
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Backend call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Table configuration rejected
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// Export could not be written
    #[error("export failed: {0}")]
    Export(String),
}

impl CoreError {
    /// Check if the failure came from the network or backend
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Client(_))
    }
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result alias for session operations
pub type Result<T> = std::result::Result<T, CoreError>;
