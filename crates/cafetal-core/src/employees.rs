//! Employee directory session
//!
//! Pagination is server-side: the table engine only ever holds one page and
//! is used for column visibility and rendering.

use crate::error::{CoreError, Result};
use cafetal_client::{
    ApiClient, Completion, Employee, EmployeePage, EmployeeQuery, EmployeeStatus, Resource,
    ResourceSnapshot, StatusFilter,
};
use cafetal_metrics::format::{format_money, EMPTY};
use cafetal_table::{ColumnDescriptor, ColumnToggle, DisplayValue, RenderedRow, TableEngine};
use serde::Serialize;

/// Rows per page of the directory
pub const DIRECTORY_PAGE_SIZE: usize = 10;

/// Active and inactive employees on the current page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Active employees
    pub active: usize,
    /// Inactive employees
    pub inactive: usize,
}

/// A full listing rendered through the visible columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Export {
    /// Column headers
    pub headers: Vec<String>,
    /// One row of cell text per employee
    pub rows: Vec<Vec<String>>,
}

impl Export {
    /// Number of exported employees
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when nothing was exported
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize as CSV with a header line
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| CoreError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| CoreError::Export(e.to_string()))
    }
}

fn employee_columns() -> Vec<ColumnDescriptor<Employee>> {
    vec![
        ColumnDescriptor::new("name", "Empleado", |e: &Employee| {
            DisplayValue::Text(e.full_name())
        }),
        ColumnDescriptor::field("email", "Correo"),
        ColumnDescriptor::field("doc_id", "Documento"),
        ColumnDescriptor::field("telefono", "Teléfono"),
        ColumnDescriptor::new("position_id", "Puesto (ID)", |e: &Employee| {
            DisplayValue::from(e.position_id.map(|p| p.to_string()))
        }),
        ColumnDescriptor::new("base_salary", "Salario", |e: &Employee| {
            e.base_salary
                .filter(|s| s.is_finite())
                .map_or(DisplayValue::Empty, |s| DisplayValue::Text(format_money(s)))
        }),
        ColumnDescriptor::field("fecha_ingreso", "Fecha Ingreso"),
        ColumnDescriptor::new("estado", "Estado", |e: &Employee| {
            DisplayValue::Text(e.status.as_str().to_uppercase())
        }),
    ]
}

/// Search, status filter and server-side paging over the employee listing
#[derive(Debug)]
pub struct EmployeeDirectory {
    api: ApiClient,
    query: EmployeeQuery,
    listing: Resource<EmployeePage>,
    table: TableEngine<Employee>,
}

impl EmployeeDirectory {
    /// New directory on page 1 with no filters; nothing is fetched yet
    pub fn new(api: ApiClient) -> Result<Self> {
        let mut builder = TableEngine::builder()
            .search_key("name")
            .page_size(DIRECTORY_PAGE_SIZE)
            .hidden("email");
        for column in employee_columns() {
            builder = builder.column(column);
        }
        Ok(Self {
            api,
            query: EmployeeQuery {
                page_size: DIRECTORY_PAGE_SIZE,
                ..EmployeeQuery::default()
            },
            listing: Resource::new("employees"),
            table: builder.build(Vec::new())?,
        })
    }

    /// Current query
    #[must_use]
    pub fn query(&self) -> &EmployeeQuery {
        &self.query
    }

    /// Set the search text and go back to page 1
    pub fn set_search(&mut self, q: impl Into<String>) {
        self.query.q = q.into();
        self.query.page = 1;
    }

    /// Set the status filter and go back to page 1
    pub fn set_status(&mut self, status: StatusFilter) {
        self.query.status = status;
        self.query.page = 1;
    }

    /// Move to `page`, clamped into `[1, total_pages]`; returns the page
    pub fn set_page(&mut self, page: usize) -> usize {
        self.query.page = page.clamp(1, self.total_pages());
        self.query.page
    }

    /// Advance one page (stays on the last page)
    pub fn next_page(&mut self) -> usize {
        self.set_page(self.query.page.saturating_add(1))
    }

    /// Go back one page (stays on page 1)
    pub fn previous_page(&mut self) -> usize {
        self.set_page(self.query.page.saturating_sub(1))
    }

    /// Fetch the current page
    ///
    /// On success the table holds the page's employees that pass the status
    /// filter, in case the server ignored it. When the reported total no
    /// longer reaches the requested page, the page is clamped and fetched
    /// again.
    pub async fn refresh(&mut self) -> Completion {
        let completion = self.fetch_page().await;
        if completion != Completion::Applied || self.query.page <= self.total_pages() {
            return completion;
        }
        tracing::debug!(
            "Employee page {} past the last page {}, refetching",
            self.query.page,
            self.total_pages()
        );
        self.query.page = self.total_pages();
        self.fetch_page().await
    }

    async fn fetch_page(&mut self) -> Completion {
        let completion = self.listing.run(self.api.employees(&self.query)).await;
        if completion == Completion::Applied {
            self.sync_rows();
        }
        completion
    }

    fn sync_rows(&mut self) {
        let status = self.query.status;
        let rows: Vec<Employee> = self.listing.with_data(|page| {
            page.map(|p| p.items.iter().filter(|e| status.matches(e)).cloned().collect())
                .unwrap_or_default()
        });
        self.table.set_rows(rows);
    }

    /// Tear down; in-flight responses are dropped
    pub fn close(&self) {
        self.listing.close();
    }

    /// Listing fetch state
    #[must_use]
    pub fn state(&self) -> ResourceSnapshot<EmployeePage> {
        self.listing.snapshot()
    }

    /// Total matching employees reported by the server
    #[must_use]
    pub fn total(&self) -> u64 {
        self.listing.with_data(|page| page.map_or(0, |p| p.total))
    }

    /// `max(1, ceil(total / page_size))`
    #[must_use]
    pub fn total_pages(&self) -> usize {
        let total = usize::try_from(self.total()).unwrap_or(usize::MAX);
        total.div_ceil(self.query.page_size.max(1)).max(1)
    }

    /// Employees of the current page
    #[must_use]
    pub fn rows(&self) -> Vec<&Employee> {
        self.table.page_rows()
    }

    /// Current page rendered through the visible columns
    #[must_use]
    pub fn render(&self) -> Vec<RenderedRow<i64>> {
        self.table.render_page()
    }

    /// Headers of the visible columns
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        self.table.headers()
    }

    /// Active/inactive split of the current page
    #[must_use]
    pub fn status_counts(&self) -> StatusCounts {
        self.table
            .filtered_rows()
            .fold(StatusCounts::default(), |mut counts, e| {
                match e.status {
                    EmployeeStatus::Active => counts.active += 1,
                    EmployeeStatus::Inactive => counts.inactive += 1,
                }
                counts
            })
    }

    /// Show or hide a column
    pub fn toggle_column(&mut self, key: &str) -> ColumnToggle {
        self.table.toggle_column_visibility(key)
    }

    /// Every employee matching the current search and status, rendered
    /// through the visible columns
    pub async fn export(&self) -> Result<Export> {
        let employees = self
            .api
            .all_employees(&self.query.q, self.query.status)
            .await?;
        let columns = self.table.visible_columns();
        let headers = columns.iter().map(|c| c.header().to_string()).collect();
        let rows: Vec<Vec<String>> = employees
            .iter()
            .filter(|e| self.query.status.matches(e))
            .map(|e| columns.iter().map(|c| cell_text(&c.render(e))).collect())
            .collect();
        tracing::info!("Exported {} employees", rows.len());
        Ok(Export { headers, rows })
    }
}

impl Drop for EmployeeDirectory {
    fn drop(&mut self) {
        self.close();
    }
}

fn cell_text(value: &DisplayValue) -> String {
    if value.is_empty() {
        EMPTY.to_string()
    } else {
        value.to_string()
    }
}
