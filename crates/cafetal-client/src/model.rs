//! Wire types and query parameters

use cafetal_metrics::Period;
use cafetal_table::TableRow;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Filter value meaning "no filter"
pub const ALL: &str = "all";

/// Storage location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    /// Id
    pub id: i64,
    /// Short code
    pub code: String,
    /// Display name
    pub name: String,
}

/// Unit of measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uom {
    /// Id
    pub id: i64,
    /// Short code
    pub code: String,
    /// Description
    pub description: String,
}

/// Catalog product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Id
    pub id: i64,
    /// Stock keeping unit
    pub sku: String,
    /// Display name
    pub name: String,
    /// Category name
    #[serde(default)]
    pub category: String,
    /// Unit of measure code
    #[serde(default)]
    pub uom: String,
}

impl TableRow for Product {
    type Id = i64;

    fn row_id(&self) -> i64 {
        self.id
    }

    fn field_text(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "sku" => Some(Cow::Borrowed(&self.sku)),
            "name" => Some(Cow::Borrowed(&self.name)),
            "category" => Some(Cow::Borrowed(&self.category)),
            "uom" => Some(Cow::Borrowed(&self.uom)),
            _ => None,
        }
    }
}

/// Employment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeStatus {
    /// Currently employed
    #[serde(rename = "activo")]
    Active,
    /// No longer employed
    #[serde(rename = "inactivo")]
    Inactive,
}

impl EmployeeStatus {
    /// Wire value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "activo",
            Self::Inactive => "inactivo",
        }
    }
}

/// Employee row of the HR listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Id
    pub id: i64,
    /// National id document
    pub doc_id: String,
    /// Given names
    #[serde(rename = "nombres")]
    pub first_names: String,
    /// Family names
    #[serde(rename = "apellidos")]
    pub last_names: String,
    /// Email
    #[serde(default)]
    pub email: Option<String>,
    /// Phone
    #[serde(default, rename = "telefono")]
    pub phone: Option<String>,
    /// Position id
    #[serde(default)]
    pub position_id: Option<i64>,
    /// Monthly base salary
    #[serde(default)]
    pub base_salary: Option<f64>,
    /// Hire date, `YYYY-MM-DD`
    #[serde(rename = "fecha_ingreso")]
    pub hire_date: String,
    /// Status
    #[serde(rename = "estado")]
    pub status: EmployeeStatus,
}

impl Employee {
    /// `nombres apellidos`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.last_names)
            .trim()
            .to_string()
    }

    /// Uppercase initials, `E` when both names are blank
    #[must_use]
    pub fn initials(&self) -> String {
        let initials: String = [&self.first_names, &self.last_names]
            .iter()
            .filter_map(|s| s.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            "E".to_string()
        } else {
            initials
        }
    }
}

impl TableRow for Employee {
    type Id = i64;

    fn row_id(&self) -> i64 {
        self.id
    }

    fn field_text(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "name" => Some(Cow::Owned(self.full_name())),
            "doc_id" => Some(Cow::Borrowed(&self.doc_id)),
            "email" => self.email.as_deref().map(Cow::Borrowed),
            "telefono" => self.phone.as_deref().map(Cow::Borrowed),
            "position_id" => self.position_id.map(|p| Cow::Owned(p.to_string())),
            "base_salary" => self.base_salary.map(|s| Cow::Owned(s.to_string())),
            "fecha_ingreso" => Some(Cow::Borrowed(&self.hire_date)),
            "estado" => Some(Cow::Borrowed(self.status.as_str())),
            _ => None,
        }
    }
}

/// One page of the employee listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeePage {
    /// Rows of this page
    #[serde(default)]
    pub items: Vec<Employee>,
    /// Total rows across all pages
    #[serde(default)]
    pub total: u64,
}

/// Id of a filter option; the backend sends numbers or strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionId {
    /// Numeric id
    Number(i64),
    /// Text id
    Text(String),
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One selectable dashboard filter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaOption {
    /// Value sent back as the filter
    pub id: OptionId,
    /// Display name
    pub name: String,
}

impl MetaOption {
    /// Filter value for an overview query
    #[must_use]
    pub fn value(&self) -> String {
        self.id.to_string()
    }
}

/// Dashboard filter catalogs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMeta {
    /// Warehouses to filter by
    #[serde(default)]
    pub warehouses: Vec<MetaOption>,
    /// Product categories to filter by
    #[serde(default)]
    pub categories: Vec<MetaOption>,
}

fn is_filter_set(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != ALL
}

/// Product listing filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Free-text search, trimmed before sending
    pub search: String,
    /// Category, [`ALL`] for none
    pub category: String,
}

impl ProductQuery {
    /// Query string pairs; empty search and `all` category are omitted
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        if is_filter_set(&self.category) {
            params.push(("category", self.category.trim().to_string()));
        }
        params
    }
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL.to_string(),
        }
    }
}

/// Employee status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    /// Every employee
    #[default]
    #[serde(rename = "todos")]
    All,
    /// Active only
    #[serde(rename = "activo")]
    Active,
    /// Inactive only
    #[serde(rename = "inactivo")]
    Inactive,
}

impl StatusFilter {
    /// Status this filter keeps, `None` for all
    #[must_use]
    pub fn status(self) -> Option<EmployeeStatus> {
        match self {
            Self::All => None,
            Self::Active => Some(EmployeeStatus::Active),
            Self::Inactive => Some(EmployeeStatus::Inactive),
        }
    }

    /// Check if an employee passes the filter
    #[must_use]
    pub fn matches(self, employee: &Employee) -> bool {
        self.status().map_or(true, |s| s == employee.status)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status().map_or("todos", EmployeeStatus::as_str))
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todos" | "all" | "" => Ok(Self::All),
            "activo" | "active" => Ok(Self::Active),
            "inactivo" | "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown status filter '{other}'")),
        }
    }
}

/// Employee listing filters and page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeQuery {
    /// Free-text search
    pub q: String,
    /// 1-based page
    pub page: usize,
    /// Rows per page
    pub page_size: usize,
    /// Status filter
    pub status: StatusFilter,
}

impl EmployeeQuery {
    /// Query string pairs; empty `q` and the `todos` filter are omitted
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.max(1).to_string()),
            ("page_size", self.page_size.max(1).to_string()),
        ];
        let q = self.q.trim();
        if !q.is_empty() {
            params.push(("q", q.to_string()));
        }
        if let Some(status) = self.status.status() {
            params.push(("estado", status.as_str().to_string()));
        }
        params
    }
}

impl Default for EmployeeQuery {
    fn default() -> Self {
        Self {
            q: String::new(),
            page: 1,
            page_size: 10,
            status: StatusFilter::All,
        }
    }
}

/// Dashboard overview filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewQuery {
    /// Reporting period
    pub period: Period,
    /// Warehouse code, [`ALL`] for none
    pub warehouse: String,
    /// Category, [`ALL`] for none
    pub category: String,
}

impl OverviewQuery {
    /// Query string pairs; `all` filters are omitted
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("period", self.period.as_str().to_string())];
        if is_filter_set(&self.warehouse) {
            params.push(("warehouse", self.warehouse.trim().to_string()));
        }
        if is_filter_set(&self.category) {
            params.push(("category", self.category.trim().to_string()));
        }
        params
    }
}

impl Default for OverviewQuery {
    fn default() -> Self {
        Self {
            period: Period::default(),
            warehouse: ALL.to_string(),
            category: ALL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn meta_accepts_string_and_numeric_ids() {
        let meta: DashboardMeta = serde_json::from_value(json!({
            "warehouses": [{ "id": "ALM-01", "name": "Almacén Central" }],
            "categories": [{ "id": 1, "name": "Tostado" }],
        }))
        .unwrap();
        assert_eq!(meta.warehouses[0].id, OptionId::Text("ALM-01".into()));
        assert_eq!(meta.warehouses[0].value(), "ALM-01");
        assert_eq!(meta.categories[0].id, OptionId::Number(1));
        assert_eq!(meta.categories[0].value(), "1");
        assert_eq!(meta.categories[0].name, "Tostado");

        let empty: DashboardMeta = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, DashboardMeta::default());
    }

    fn employee() -> Employee {
        serde_json::from_value(json!({
            "id": 1,
            "doc_id": "45678912",
            "nombres": "Rosa",
            "apellidos": "Quispe",
            "email": null,
            "fecha_ingreso": "2023-02-01",
            "estado": "activo",
        }))
        .unwrap()
    }

    #[test]
    fn employee_wire_names() {
        let e = employee();
        assert_eq!(e.full_name(), "Rosa Quispe");
        assert_eq!(e.initials(), "RQ");
        assert_eq!(e.status, EmployeeStatus::Active);
        assert_eq!(e.phone, None);
        assert_eq!(e.field_text("estado").as_deref(), Some("activo"));
        assert_eq!(e.field_text("telefono"), None);
    }

    #[test]
    fn product_query_params() {
        let q = ProductQuery {
            search: "  geisha ".into(),
            category: ALL.into(),
        };
        assert_eq!(q.params(), vec![("search", "geisha".to_string())]);

        let q = ProductQuery {
            search: "   ".into(),
            category: "Tostado".into(),
        };
        assert_eq!(q.params(), vec![("category", "Tostado".to_string())]);
    }

    #[test]
    fn employee_query_params() {
        let q = EmployeeQuery {
            q: "rosa".into(),
            page: 2,
            page_size: 10,
            status: StatusFilter::Inactive,
        };
        assert_eq!(
            q.params(),
            vec![
                ("page", "2".to_string()),
                ("page_size", "10".to_string()),
                ("q", "rosa".to_string()),
                ("estado", "inactivo".to_string()),
            ]
        );
        assert_eq!(EmployeeQuery::default().params().len(), 2);
    }

    #[test]
    fn overview_query_params() {
        let q = OverviewQuery {
            period: Period::Quarter,
            warehouse: "ALM-01".into(),
            category: ALL.into(),
        };
        assert_eq!(
            q.params(),
            vec![
                ("period", "quarter".to_string()),
                ("warehouse", "ALM-01".to_string())
            ]
        );
    }

    #[test]
    fn status_filter_parsing() {
        assert_eq!("todos".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("Activo".parse::<StatusFilter>(), Ok(StatusFilter::Active));
        assert!("retired".parse::<StatusFilter>().is_err());
        assert!(StatusFilter::Active.matches(&employee()));
        assert!(!StatusFilter::Inactive.matches(&employee()));
        assert_eq!(StatusFilter::All.to_string(), "todos");
    }
}
