//! Cafetal REST Client
//!
//! Typed access to the Cafetal backend plus the fetch state each screen keeps.
//!
//! # Core Concepts
//!
//! - [`ClientConfig`]: base URL and limits, from defaults, TOML and environment
//! - [`Backend`]: the transport seam; [`HttpBackend`] speaks HTTP via reqwest
//! - [`ApiClient`]: typed endpoint calls over any backend
//! - [`Resource`]: loading/data/error state with a stale-response guard
//!
//! # Example
//!
//! ```rust,ignore
//! use cafetal_client::{ApiClient, ClientConfig, OverviewQuery, Resource};
//!
//! let api = ApiClient::new(ClientConfig::from_env()?)?;
//! let overview = Resource::new("overview");
//! overview.run(api.dashboard_overview(&OverviewQuery::default())).await;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod api;
mod backend;
mod config;
mod error;
mod model;
mod resource;

pub use api::{paths, ApiClient, CatalogLoad};
pub use backend::{Backend, HttpBackend};
pub use config::{ClientConfig, API_BASE_ENV, DEFAULT_API_BASE, DEFAULT_EXPORT_PAGE_SIZE};
pub use error::{ClientError, Result};
pub use model::{
    DashboardMeta, Employee, EmployeePage, EmployeeQuery, EmployeeStatus, MetaOption, OptionId,
    OverviewQuery, Product, ProductQuery, StatusFilter, Uom, Warehouse, ALL,
};
pub use resource::{
    allowed_transitions, is_valid_transition, Completion, FetchPhase, RequestTicket, Resource,
    ResourceSnapshot,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
