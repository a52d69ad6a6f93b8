//! Inventory catalog session

use crate::error::Result;
use cafetal_client::{
    ApiClient, Completion, Product, ProductQuery, Resource, ResourceSnapshot, Uom, Warehouse, ALL,
};
use cafetal_table::{ColumnDescriptor, RenderedRow, TableEngine};
use serde::Serialize;
use std::collections::BTreeSet;

/// Rows per page of the product table
pub const CATALOG_PAGE_SIZE: usize = 20;

/// Outcome of each part of a catalog refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCompletion {
    /// Warehouses
    pub warehouses: Completion,
    /// Units of measure
    pub uoms: Completion,
    /// Products
    pub products: Completion,
}

/// Summary figures of the loaded catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    /// Products
    pub products: usize,
    /// Distinct non-blank product categories
    pub categories: usize,
    /// Units of measure
    pub uoms: usize,
    /// Warehouses
    pub warehouses: usize,
}

/// Warehouses, units and products with a searchable product table
#[derive(Debug)]
pub struct InventoryCatalog {
    api: ApiClient,
    query: ProductQuery,
    warehouses: Resource<Vec<Warehouse>>,
    uoms: Resource<Vec<Uom>>,
    products: Resource<Vec<Product>>,
    table: TableEngine<Product>,
}

impl InventoryCatalog {
    /// New catalog with no filters; nothing is fetched yet
    pub fn new(api: ApiClient) -> Result<Self> {
        let table = TableEngine::builder()
            .column(ColumnDescriptor::field("sku", "SKU"))
            .column(ColumnDescriptor::field("name", "Producto"))
            .column(ColumnDescriptor::field("category", "Categoría"))
            .column(ColumnDescriptor::field("uom", "Unidad"))
            .search_key("name")
            .page_size(CATALOG_PAGE_SIZE)
            .build(Vec::new())?;
        Ok(Self {
            api,
            query: ProductQuery::default(),
            warehouses: Resource::new("catalog.warehouses"),
            uoms: Resource::new("catalog.uoms"),
            products: Resource::new("catalog.products"),
            table,
        })
    }

    /// Current product filters
    #[must_use]
    pub fn query(&self) -> &ProductQuery {
        &self.query
    }

    /// Search products by name
    ///
    /// Filters the loaded table right away; the next refresh also sends the
    /// term to the server.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.query.search = term.into();
        self.table.set_search_term(self.query.search.clone());
    }

    /// Restrict the next refresh to one category (`all` for every category)
    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        self.query.category = if category.trim().is_empty() {
            ALL.to_string()
        } else {
            category
        };
    }

    /// Fetch warehouses, units and products concurrently
    ///
    /// Each part completes on its own; a failure in one keeps the others.
    pub async fn refresh(&mut self) -> CatalogCompletion {
        let tickets = (
            self.warehouses.begin(),
            self.uoms.begin(),
            self.products.begin(),
        );
        if tickets.0.is_none() && tickets.1.is_none() && tickets.2.is_none() {
            return CatalogCompletion {
                warehouses: Completion::Closed,
                uoms: Completion::Closed,
                products: Completion::Closed,
            };
        }
        let load = self.api.catalog(&self.query).await;

        let completion = CatalogCompletion {
            warehouses: complete(&self.warehouses, tickets.0, load.warehouses),
            uoms: complete(&self.uoms, tickets.1, load.uoms),
            products: complete(&self.products, tickets.2, load.products),
        };
        if completion.products == Completion::Applied {
            let products = self.products.data().unwrap_or_default();
            self.table.set_rows(products);
        }
        tracing::debug!("Catalog refresh: {:?}", completion);
        completion
    }

    /// Warehouse fetch state
    #[must_use]
    pub fn warehouses(&self) -> ResourceSnapshot<Vec<Warehouse>> {
        self.warehouses.snapshot()
    }

    /// Unit fetch state
    #[must_use]
    pub fn uoms(&self) -> ResourceSnapshot<Vec<Uom>> {
        self.uoms.snapshot()
    }

    /// Product fetch state
    #[must_use]
    pub fn products(&self) -> ResourceSnapshot<Vec<Product>> {
        self.products.snapshot()
    }

    /// Distinct non-blank categories of the loaded products, sorted
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.products.with_data(|products| {
            products
                .into_iter()
                .flatten()
                .map(|p| p.category.trim())
                .filter(|c| !c.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        })
    }

    /// Product, category, unit and warehouse counts
    #[must_use]
    pub fn counts(&self) -> CatalogCounts {
        CatalogCounts {
            products: self.products.with_data(|p| p.map_or(0, Vec::len)),
            categories: self.categories().len(),
            uoms: self.uoms.with_data(|u| u.map_or(0, Vec::len)),
            warehouses: self.warehouses.with_data(|w| w.map_or(0, Vec::len)),
        }
    }

    /// Products passing the name search
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.table.filtered_count()
    }

    /// Move to `page` of the product table; returns the clamped page
    pub fn set_page(&mut self, page: usize) -> usize {
        self.table.set_page(page)
    }

    /// Current product page rendered through the visible columns
    #[must_use]
    pub fn render(&self) -> Vec<RenderedRow<i64>> {
        self.table.render_page()
    }

    /// Headers of the visible columns
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        self.table.headers()
    }

    /// Tear down; in-flight responses are dropped
    pub fn close(&self) {
        self.warehouses.close();
        self.uoms.close();
        self.products.close();
    }
}

impl Drop for InventoryCatalog {
    fn drop(&mut self) {
        self.close();
    }
}

fn complete<T>(
    resource: &Resource<T>,
    ticket: Option<cafetal_client::RequestTicket>,
    result: cafetal_client::Result<T>,
) -> Completion {
    match ticket {
        Some(ticket) => resource.complete(ticket, result),
        None => Completion::Closed,
    }
}
