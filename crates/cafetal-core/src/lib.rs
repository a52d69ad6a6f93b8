//! Cafetal Screen Sessions
//!
//! Filter state, fetches and derived views for the dashboard, employee
//! directory and inventory catalog screens.
//!
//! # Core Concepts
//!
//! - [`DashboardSession`]: overview filters, stale-guarded refresh and the
//!   reconciled [`DashboardView`](cafetal_metrics::DashboardView)
//! - [`EmployeeDirectory`]: server-side paging with a client-side status
//!   fallback and CSV export
//! - [`InventoryCatalog`]: concurrent catalog load and a product table
//!
//! # Example
//!
//! ```rust,ignore
//! use cafetal_core::DashboardSession;
//! use cafetal_metrics::Period;
//!
//! let mut session = DashboardSession::new(api);
//! session.set_period(Period::Quarter);
//! session.refresh().await;
//! if let Some(view) = session.view() {
//!     println!("{} alertas críticas", view.critical_alerts);
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod dashboard;
mod employees;
mod error;
mod inventory;

pub use dashboard::{DashboardSession, LoadedOverview};
pub use employees::{EmployeeDirectory, Export, StatusCounts, DIRECTORY_PAGE_SIZE};
pub use error::{CoreError, Result};
pub use inventory::{CatalogCompletion, CatalogCounts, InventoryCatalog, CATALOG_PAGE_SIZE};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
