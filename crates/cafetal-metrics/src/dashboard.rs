//! Dashboard reconciliation
//!
//! [`Reconciler::reconcile`] turns one overview payload into everything the
//! dashboard draws. It never fails; malformed input degrades to defaults.

use crate::alerts::{critical_count, unify_alerts, AlertRow};
use crate::charts::{CategoryChart, ProductPanel, QualityChart, SalesChart};
use crate::keys;
use crate::kpi::{KpiCard, KpiSnapshot};
use crate::payload::OverviewPayload;
use crate::ranking::{invoices_by_status, top_products};
use crate::series::{quality_series, sales_series, stock_by_category, NormalizedSeries};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reporting period of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Last 7 days
    Week,
    /// Last 30 days
    #[default]
    Month,
    /// Last 3 months
    Quarter,
    /// Last 12 months
    Year,
}

impl Period {
    /// Every period, shortest first
    pub const ALL: [Self; 4] = [Self::Week, Self::Month, Self::Quarter, Self::Year];

    /// Query-string value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Human-readable span
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "últimos 7 días",
            Self::Month => "últimos 30 días",
            Self::Quarter => "últimos 3 meses",
            Self::Year => "últimos 12 meses",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized period name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown period '{0}', expected week, month, quarter or year")]
pub struct ParsePeriodError(pub String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| ParsePeriodError(s.to_string()))
    }
}

/// Everything the dashboard renders for one payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Period the payload covers
    pub period: Period,
    /// Human-readable period
    pub period_label: &'static str,
    /// KPI figures
    pub snapshot: KpiSnapshot,
    /// KPI cards
    pub kpis: Vec<KpiCard>,
    /// Sales chart
    pub sales: SalesChart,
    /// Stock per category
    pub stock_by_category: NormalizedSeries,
    /// Category breakdown of the stock
    pub category_chart: CategoryChart,
    /// Quality chart
    pub quality: QualityChart,
    /// Product panel
    pub products: ProductPanel,
    /// Unified alerts
    pub alerts: Vec<AlertRow>,
    /// Error-severity alert count
    pub critical_alerts: usize,
}

/// Stateless payload-to-view transformation
///
/// The clock is injected so alert dates are reproducible.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    now: DateTime<Utc>,
}

impl Reconciler {
    /// Reconciler using the current time
    #[must_use]
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Reconciler with a fixed clock
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Build the dashboard view
    #[must_use]
    pub fn reconcile(&self, payload: &OverviewPayload, period: Period) -> DashboardView {
        let snapshot = KpiSnapshot::resolve(payload);
        let stock = stock_by_category(payload);
        let alerts = unify_alerts(payload, self.now);
        let products = ProductPanel::choose(
            top_products(payload.series_list(&keys::series::TOP_PRODUCTS)),
            invoices_by_status(payload.invoices()),
            &stock,
        );

        tracing::debug!(
            "Reconciled {} payload: {} alerts, {} stock categories",
            period,
            alerts.len(),
            stock.len()
        );

        DashboardView {
            period,
            period_label: period.label(),
            kpis: snapshot.cards(),
            sales: SalesChart::choose(
                sales_series(payload),
                snapshot.sales,
                snapshot.sales_delta,
            ),
            category_chart: CategoryChart::from_series(&stock),
            stock_by_category: stock,
            quality: QualityChart::choose(quality_series(payload), snapshot.approved_pct),
            products,
            critical_alerts: critical_count(&alerts),
            alerts,
            snapshot,
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}
