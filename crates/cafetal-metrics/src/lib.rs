//! Cafetal Metrics Reconciler
//!
//! Turns the dashboard overview payload, whose field names and types have
//! drifted over time, into chart-ready series, KPI cards and alert rows.
//!
//! # Core Concepts
//!
//! - [`keys`]: per-metric candidate field names, first match wins
//! - [`sanitize`]: non-negative magnitudes, clamped rates, previous-period math
//! - [`NormalizedSeries`]: sanitized points plus a trend sufficiency flag
//! - [`Reconciler`]: payload in, [`DashboardView`] out; never fails
//!
//! # Example
//!
//! ```rust,ignore
//! use cafetal_metrics::{OverviewPayload, Period, Reconciler};
//!
//! let payload: OverviewPayload = serde_json::from_str(body)?;
//! let view = Reconciler::new().reconcile(&payload, Period::Month);
//! for card in &view.kpis {
//!     println!("{}: {}", card.title, card.value);
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod alerts;
mod charts;
mod dashboard;
pub mod format;
pub mod keys;
mod kpi;
mod ledger;
mod payload;
mod ranking;
pub mod sanitize;
mod series;
pub mod status;

pub use alerts::{critical_count, unify_alerts, AlertCategory, AlertRow, Severity};
pub use charts::{
    category_chart_mode, CategoryChart, CategoryChartMode, ProductPanel, QualityChart,
    SalesChart, PROPORTION_MAX_CATEGORIES,
};
pub use dashboard::{DashboardView, ParsePeriodError, Period, Reconciler};
pub use kpi::{DeltaDirection, KpiCard, KpiSnapshot, NO_DATA};
pub use ledger::{
    movement_totals, running_balance, BalancePoint, InvoiceRecord, InvoiceSummary, MovementTotals,
    StockMovement, PAID_STATUS,
};
pub use payload::OverviewPayload;
pub use ranking::{invoices_by_status, top_n, top_products, StatusCount, TOP_N, UNKNOWN_STATUS};
pub use series::{
    quality_series, sales_series, stock_by_category, NormalizedSeries, SeriesKind, SeriesPoint,
    SeriesSufficiency, MIN_TREND_POINTS,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn full_payload_reconciles() {
        let payload: OverviewPayload = serde_json::from_value(json!({
            "kpis": {
                "ventas_periodo": 12500.5,
                "delta_ventas": 12.3,
                "stock_total_kg": 8400,
                "lotes_aprobados_pct": 91.2,
                "entregas_a_tiempo_pct": 97,
                "costo_produccion_periodo": 5400,
                "delta_costo_produccion": -2.5,
                "nomina_periodo": 18200,
            },
            "series": {
                "ventas": [
                    { "ym": "2024-02", "total": 9800 },
                    { "ym": "2024-03", "total": 12500.5 },
                ],
                "stock_por_categoria": [
                    { "categoria": "Verde", "kg": 5000 },
                    { "categoria": "Tostado", "kg": 3400 },
                ],
                "calidad": [{ "ym": "2024-03", "pct": 91.2 }],
                "top_productos_vendidos": [
                    { "producto": "Geisha 250g", "qty": 40 },
                    { "producto": "Bourbon 1kg", "qty": 55 },
                ],
            },
            "alertas": {
                "facturas_vencidas": [{ "invoice_id": 1, "number": "F-1" }],
            },
        }))
        .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let view = Reconciler::at(now).reconcile(&payload, Period::Quarter);

        assert_eq!(view.period_label, "últimos 3 meses");
        assert_eq!(view.kpis[0].value, "S/ 12,500.50");
        assert!(matches!(view.sales, SalesChart::Trend { .. }));
        assert_eq!(view.quality, QualityChart::Gauge { pct: 91.2 });
        assert_eq!(view.category_chart.mode(), Some(CategoryChartMode::Proportion));
        match &view.products {
            ProductPanel::TopProducts { items } => assert_eq!(items[0].label, "Bourbon 1kg"),
            other => panic!("unexpected panel {other:?}"),
        }
        assert_eq!(view.critical_alerts, 1);
        assert!(serde_json::to_value(&view).is_ok());
    }
}
