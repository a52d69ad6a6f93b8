//! The loosely-typed dashboard overview payload

use crate::keys::{self, FieldKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dashboard overview response, split into its sections
///
/// Deserialization never fails on shape: missing or mistyped sections become
/// empty, so a partial payload still reconciles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct OverviewPayload {
    kpis: Value,
    series: Value,
    alerts: Value,
    invoices: Vec<Value>,
}

impl OverviewPayload {
    /// Section accessor: KPI object
    #[must_use]
    pub fn kpis(&self) -> &Value {
        &self.kpis
    }

    /// Section accessor: series object
    #[must_use]
    pub fn series(&self) -> &Value {
        &self.series
    }

    /// Section accessor: alert lists object
    #[must_use]
    pub fn alerts(&self) -> &Value {
        &self.alerts
    }

    /// Invoices, from `series.invoices` or the top-level `invoices`
    #[must_use]
    pub fn invoices(&self) -> &[Value] {
        &self.invoices
    }

    /// Resolve a KPI number through its fallback keys
    #[must_use]
    pub fn kpi(&self, key: &FieldKey) -> Option<f64> {
        key.number(&self.kpis)
    }

    /// Series list by fallback keys; empty when absent
    #[must_use]
    pub fn series_list(&self, key: &FieldKey) -> &[Value] {
        key.array(&self.series).map_or(&[], Vec::as_slice)
    }

    /// Alert list by fallback keys; empty when absent
    #[must_use]
    pub fn alert_list(&self, key: &FieldKey) -> &[Value] {
        key.array(&self.alerts).map_or(&[], Vec::as_slice)
    }
}

impl Default for OverviewPayload {
    fn default() -> Self {
        Self {
            kpis: Value::Object(Map::new()),
            series: Value::Object(Map::new()),
            alerts: Value::Object(Map::new()),
            invoices: Vec::new(),
        }
    }
}

fn section(root: &Value, key: &FieldKey) -> Value {
    Value::Object(key.object(root).cloned().unwrap_or_default())
}

impl From<Value> for OverviewPayload {
    fn from(root: Value) -> Self {
        let kpis = section(&root, &keys::section::KPIS);
        let series = section(&root, &keys::section::SERIES);
        let alerts = section(&root, &keys::section::ALERTS);
        let invoices = keys::section::INVOICES
            .array(&series)
            .or_else(|| keys::section::INVOICES.array(&root))
            .cloned()
            .unwrap_or_default();
        Self {
            kpis,
            series,
            alerts,
            invoices,
        }
    }
}
