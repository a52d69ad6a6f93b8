//! Fallback-key table
//!
//! The backend has renamed fields over time. Each logical metric lists the
//! names it may arrive under, newest first; resolution is first-match-wins.

use crate::sanitize::coerce_number;
use serde_json::{Map, Value};

/// A logical field and the candidate names it may arrive under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKey {
    /// Logical name, used in logs
    pub name: &'static str,
    /// Candidate source names, in priority order
    pub candidates: &'static [&'static str],
}

impl FieldKey {
    /// Declare a field key
    #[must_use]
    pub const fn new(name: &'static str, candidates: &'static [&'static str]) -> Self {
        Self { name, candidates }
    }

    /// First candidate that is present and not null
    #[must_use]
    pub fn lookup<'a>(&self, record: &'a Value) -> Option<(&'static str, &'a Value)> {
        self.candidates
            .iter()
            .find_map(|c| record.get(c).filter(|v| !v.is_null()).map(|v| (*c, v)))
    }

    /// First candidate that coerces to a finite number
    ///
    /// A candidate holding garbage does not shadow a later usable one.
    #[must_use]
    pub fn number(&self, record: &Value) -> Option<f64> {
        self.candidates
            .iter()
            .find_map(|c| record.get(c).and_then(coerce_number))
    }

    /// First candidate with a non-blank text form (strings and numbers)
    #[must_use]
    pub fn text(&self, record: &Value) -> Option<String> {
        self.candidates.iter().find_map(|c| match record.get(c)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// First candidate holding an array
    #[must_use]
    pub fn array<'a>(&self, record: &'a Value) -> Option<&'a Vec<Value>> {
        self.candidates
            .iter()
            .find_map(|c| record.get(c).and_then(Value::as_array))
    }

    /// First candidate holding an object
    #[must_use]
    pub fn object<'a>(&self, record: &'a Value) -> Option<&'a Map<String, Value>> {
        self.candidates
            .iter()
            .find_map(|c| record.get(c).and_then(Value::as_object))
    }
}

/// Top-level sections of the overview payload
pub mod section {
    use super::FieldKey;

    /// KPI object
    pub const KPIS: FieldKey = FieldKey::new("kpis", &["kpis"]);
    /// Series object
    pub const SERIES: FieldKey = FieldKey::new("series", &["series"]);
    /// Alert lists object
    pub const ALERTS: FieldKey = FieldKey::new("alerts", &["alertas", "alerts"]);
    /// Invoice list, looked up in `series` and then at top level
    pub const INVOICES: FieldKey = FieldKey::new("invoices", &["invoices"]);
}

/// KPI fields
pub mod kpi {
    use super::FieldKey;

    /// Sales total for the selected period
    pub const SALES: FieldKey = FieldKey::new("sales", &["ventas_periodo", "ventas_mes"]);
    /// Sales delta, percent
    pub const SALES_DELTA: FieldKey =
        FieldKey::new("sales_delta", &["delta_ventas", "delta_ventas_mes"]);
    /// Stock on hand, kg
    pub const STOCK_KG: FieldKey = FieldKey::new("stock_kg", &["stock_total_kg"]);
    /// Approved lots, percent
    pub const APPROVED_LOTS: FieldKey =
        FieldKey::new("approved_lots", &["lotes_aprobados_pct"]);
    /// Approved lots delta
    pub const APPROVED_LOTS_DELTA: FieldKey =
        FieldKey::new("approved_lots_delta", &["delta_lotes_aprobados"]);
    /// On-time deliveries, percent
    pub const ON_TIME: FieldKey = FieldKey::new("on_time", &["entregas_a_tiempo_pct"]);
    /// On-time deliveries delta
    pub const ON_TIME_DELTA: FieldKey = FieldKey::new("on_time_delta", &["delta_entregas"]);
    /// Production cost for the period
    pub const PRODUCTION_COST: FieldKey = FieldKey::new(
        "production_cost",
        &["costo_produccion_periodo", "costo_produccion_mes"],
    );
    /// Production cost delta
    pub const PRODUCTION_COST_DELTA: FieldKey =
        FieldKey::new("production_cost_delta", &["delta_costo_produccion"]);
    /// Payroll for the period
    pub const PAYROLL: FieldKey = FieldKey::new("payroll", &["nomina_periodo", "nomina_mes"]);
    /// Active headcount, the payroll placeholder
    pub const ACTIVE_EMPLOYEES: FieldKey =
        FieldKey::new("active_employees", &["empleados_activos"]);
}

/// Series lists and point fields
pub mod series {
    use super::FieldKey;

    /// Sales per month
    pub const SALES: FieldKey = FieldKey::new("sales_series", &["ventas", "ventas_por_mes"]);
    /// Stock per category
    pub const STOCK_BY_CATEGORY: FieldKey =
        FieldKey::new("stock_by_category", &["stock_por_categoria"]);
    /// Quality approval rate per month
    pub const QUALITY: FieldKey =
        FieldKey::new("quality_series", &["calidad", "tasa_aprobacion_calidad"]);
    /// Product sales ranking source
    pub const TOP_PRODUCTS: FieldKey = FieldKey::new(
        "top_products",
        &[
            "top_productos_vendidos",
            "top_products",
            "ventas_por_producto",
            "product_sales",
            "items",
        ],
    );

    /// Point label
    pub const LABEL: FieldKey = FieldKey::new("label", &["label"]);
    /// Year-month of a point, formatted into a short label
    pub const MONTH: FieldKey = FieldKey::new("month", &["ym", "month"]);
    /// Sales point value
    pub const SALES_VALUE: FieldKey = FieldKey::new("sales_value", &["total", "value"]);
    /// Stock category name
    pub const CATEGORY: FieldKey = FieldKey::new("category", &["categoria", "label"]);
    /// Stock point value
    pub const STOCK_VALUE: FieldKey = FieldKey::new("stock_value", &["kg", "value"]);
    /// Quality point value
    pub const QUALITY_VALUE: FieldKey = FieldKey::new("quality_value", &["pct", "value"]);
}

/// Product ranking fields
pub mod product {
    use super::FieldKey;

    /// Display name
    pub const NAME: FieldKey = FieldKey::new("product_name", &["producto", "product_name", "name"]);
    /// Identifier used when the name is missing
    pub const ID: FieldKey = FieldKey::new("product_id", &["product_id"]);
    /// Quantity sold
    pub const QUANTITY: FieldKey = FieldKey::new(
        "quantity",
        &["qty", "quantity", "cantidad", "total_qty", "units", "amount", "total"],
    );
}

/// Invoice fields
pub mod invoice {
    use super::FieldKey;

    /// Invoice status
    pub const STATUS: FieldKey = FieldKey::new("invoice_status", &["status", "state"]);
}

/// Alert list names and record fields
pub mod alert {
    use super::FieldKey;

    /// Products below minimum stock
    pub const LOW_STOCK: FieldKey = FieldKey::new("low_stock", &["stock_bajo"]);
    /// Production orders past due
    pub const OVERDUE_ORDERS: FieldKey =
        FieldKey::new("overdue_orders", &["orden_produccion_atrasada"]);
    /// Invoices past due
    pub const OVERDUE_INVOICES: FieldKey =
        FieldKey::new("overdue_invoices", &["facturas_vencidas"]);
    /// Quality tests waiting for approval
    pub const PENDING_QUALITY: FieldKey =
        FieldKey::new("pending_quality", &["lotes_pendientes_aprobacion"]);

    /// Low-stock natural key
    pub const PRODUCT_KEY: FieldKey = FieldKey::new("product_key", &["product_id", "name"]);
    /// Production order natural key
    pub const ORDER_KEY: FieldKey = FieldKey::new(
        "order_key",
        &["productionorder_id", "production_order_id", "order_id"],
    );
    /// Invoice natural key
    pub const INVOICE_KEY: FieldKey = FieldKey::new("invoice_key", &["invoice_id"]);
    /// Quality test natural key
    pub const QUALITY_TEST_KEY: FieldKey = FieldKey::new("quality_test_key", &["qualitytest_id"]);

    /// Product name
    pub const NAME: FieldKey = FieldKey::new("name", &["name"]);
    /// Quantity on hand
    pub const QTY: FieldKey = FieldKey::new("qty", &["qty"]);
    /// Minimum stock level
    pub const MIN_STOCK: FieldKey = FieldKey::new("min_stock", &["min_stock"]);
    /// Production order code
    pub const ORDER_CODE: FieldKey = FieldKey::new("order_code", &["code"]);
    /// Due date
    pub const DUE_DATE: FieldKey = FieldKey::new("due_date", &["due_date"]);
    /// Invoice number
    pub const INVOICE_NUMBER: FieldKey = FieldKey::new("invoice_number", &["number", "inv_code"]);
    /// Invoice amount
    pub const TOTAL_AMOUNT: FieldKey = FieldKey::new("total_amount", &["total_amount"]);
    /// Lot under test
    pub const LOT: FieldKey = FieldKey::new("lot", &["lot_id"]);
    /// Test date
    pub const TEST_DATE: FieldKey = FieldKey::new("test_date", &["test_date"]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_usable_candidate_wins() {
        let record = json!({ "ventas_mes": 900 });
        assert_eq!(kpi::SALES.number(&record), Some(900.0));

        let both = json!({ "ventas_periodo": 1200, "ventas_mes": 900 });
        assert_eq!(kpi::SALES.number(&both), Some(1200.0));
    }

    #[test]
    fn garbage_does_not_shadow_later_candidate() {
        let record = json!({ "ventas_periodo": "n/a", "ventas_mes": "750.5" });
        assert_eq!(kpi::SALES.number(&record), Some(750.5));
        assert_eq!(kpi::SALES.number(&json!({})), None);
    }

    #[test]
    fn text_and_containers() {
        let record = json!({ "producto": "", "product_name": 7, "items": [1], "alertas": {} });
        assert_eq!(product::NAME.text(&record).as_deref(), Some("7"));
        assert_eq!(series::TOP_PRODUCTS.array(&record).map(Vec::len), Some(1));
        assert!(section::ALERTS.object(&record).is_some());
        assert_eq!(
            section::ALERTS.lookup(&record).map(|(name, _)| name),
            Some("alertas")
        );
    }
}
