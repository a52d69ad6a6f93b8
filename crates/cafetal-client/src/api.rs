//! Typed API calls

use crate::backend::{Backend, HttpBackend};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::model::{
    DashboardMeta, Employee, EmployeePage, EmployeeQuery, OverviewQuery, Product, ProductQuery,
    StatusFilter, Uom, Warehouse,
};
use cafetal_metrics::OverviewPayload;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Endpoint paths, relative to the base URL
pub mod paths {
    /// Warehouses
    pub const WAREHOUSES: &str = "/warehouses";
    /// Units of measure
    pub const UOMS: &str = "/uoms";
    /// Products
    pub const PRODUCTS: &str = "/products";
    /// Employees
    pub const EMPLOYEES: &str = "/rrhh/empleados";
    /// Dashboard overview
    pub const DASHBOARD_OVERVIEW: &str = "/dashboard/overview";
    /// Dashboard filter catalogs
    pub const DASHBOARD_META: &str = "/dashboard/meta";
}

/// Outcome of a concurrent catalog load; each part fails independently
#[derive(Debug)]
pub struct CatalogLoad {
    /// Warehouses
    pub warehouses: Result<Vec<Warehouse>>,
    /// Units of measure
    pub uoms: Result<Vec<Uom>>,
    /// Products
    pub products: Result<Vec<Product>>,
}

/// Typed client over a [`Backend`]
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct ApiClient {
    backend: Arc<dyn Backend>,
    config: ClientConfig,
}

impl ApiClient {
    /// HTTP client from configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let backend = HttpBackend::new(config.clone())?;
        Ok(Self::with_backend(Arc::new(backend), config))
    }

    /// Client over any backend
    #[must_use]
    pub fn with_backend(backend: Arc<dyn Backend>, config: ClientConfig) -> Self {
        Self { backend, config }
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let value = self.backend.get_json(path, query).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// All warehouses
    pub async fn warehouses(&self) -> Result<Vec<Warehouse>> {
        self.get(paths::WAREHOUSES, &[]).await
    }

    /// All units of measure
    pub async fn uoms(&self) -> Result<Vec<Uom>> {
        self.get(paths::UOMS, &[]).await
    }

    /// Products matching server-side filters
    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        self.get(paths::PRODUCTS, &query.params()).await
    }

    /// One page of employees
    pub async fn employees(&self, query: &EmployeeQuery) -> Result<EmployeePage> {
        self.get(paths::EMPLOYEES, &query.params()).await
    }

    /// Every employee matching `q` and `status`, walking all pages
    pub async fn all_employees(&self, q: &str, status: StatusFilter) -> Result<Vec<Employee>> {
        let page_size = self.config.export_page_size.max(1);
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let query = EmployeeQuery {
                q: q.to_string(),
                page,
                page_size,
                status,
            };
            let batch = self.employees(&query).await?;
            let received = batch.items.len();
            all.extend(batch.items);

            let total = usize::try_from(batch.total).unwrap_or(usize::MAX);
            let pages = total.div_ceil(page_size);
            if received == 0 || page >= pages {
                break;
            }
            page += 1;
        }
        tracing::debug!("Fetched {} employees over {} page(s)", all.len(), page);
        Ok(all)
    }

    /// Dashboard overview for a period and filters
    pub async fn dashboard_overview(&self, query: &OverviewQuery) -> Result<OverviewPayload> {
        self.get(paths::DASHBOARD_OVERVIEW, &query.params()).await
    }

    /// Warehouse and category catalogs for the dashboard filters
    pub async fn dashboard_meta(&self) -> Result<DashboardMeta> {
        self.get(paths::DASHBOARD_META, &[]).await
    }

    /// Warehouses, units and products, fetched concurrently
    pub async fn catalog(&self, products: &ProductQuery) -> CatalogLoad {
        let (warehouses, uoms, products) =
            tokio::join!(self.warehouses(), self.uoms(), self.products(products));
        CatalogLoad {
            warehouses,
            uoms,
            products,
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("backend", &self.backend.name())
            .field("base_url", &self.config.base_url)
            .finish()
    }
}
