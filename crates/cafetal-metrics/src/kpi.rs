//! KPI cards

use crate::format::{format_money, format_pct, format_quantity};
use crate::keys::{kpi, FieldKey};
use crate::payload::OverviewPayload;
use crate::sanitize::{clamp_pct, previous_period, to_non_negative_number};
use serde::Serialize;

/// Payroll card value when neither payroll nor headcount is known
pub const NO_DATA: &str = "Sin datos";

/// Arrow shown next to a KPI delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaDirection {
    /// Favorable change
    Up,
    /// Unfavorable change
    Down,
    /// No direction shown
    Neutral,
}

impl DeltaDirection {
    /// Up when the metric grew
    #[must_use]
    pub fn rising(delta: f64) -> Self {
        if delta >= 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }

    /// Up when the metric shrank (costs)
    #[must_use]
    pub fn falling(delta: f64) -> Self {
        if delta <= 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// One dashboard KPI card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    /// Title
    pub title: String,
    /// Formatted value
    pub value: String,
    /// Change against the previous period, percent
    pub delta: f64,
    /// Arrow direction
    pub delta_direction: DeltaDirection,
    /// Tooltip
    pub tooltip: String,
}

impl KpiCard {
    fn new(
        title: &str,
        value: String,
        delta: f64,
        delta_direction: DeltaDirection,
        tooltip: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            value,
            delta,
            delta_direction,
            tooltip: tooltip.to_string(),
        }
    }

    /// Delta formatted for display, empty for neutral cards
    #[must_use]
    pub fn delta_label(&self) -> String {
        match self.delta_direction {
            DeltaDirection::Neutral => String::new(),
            DeltaDirection::Up | DeltaDirection::Down => format_pct(self.delta),
        }
    }
}

/// KPI figures after fallback resolution and sanitization
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSnapshot {
    /// Sales in the period
    pub sales: f64,
    /// Sales delta, percent
    pub sales_delta: f64,
    /// Reconstructed sales of the previous period
    pub sales_previous: f64,
    /// Stock on hand, kg
    pub stock_kg: f64,
    /// Approved lots, percent
    pub approved_pct: f64,
    /// Approved lots delta
    pub approved_delta: f64,
    /// On-time deliveries, percent
    pub on_time_pct: f64,
    /// On-time deliveries delta
    pub on_time_delta: f64,
    /// Production cost in the period
    pub production_cost: f64,
    /// Production cost delta
    pub production_cost_delta: f64,
    /// Payroll, when reported
    pub payroll: Option<f64>,
    /// Active headcount, when reported
    pub active_employees: Option<f64>,
}

impl KpiSnapshot {
    /// Resolve every KPI from a payload
    #[must_use]
    pub fn resolve(payload: &OverviewPayload) -> Self {
        let magnitude = |key: &FieldKey| to_non_negative_number(payload.kpi(key).unwrap_or(0.0), 0.0);
        let delta = |key: &FieldKey| payload.kpi(key).unwrap_or(0.0);

        let sales = magnitude(&kpi::SALES);
        let sales_delta = delta(&kpi::SALES_DELTA);
        Self {
            sales,
            sales_delta,
            sales_previous: previous_period(sales, sales_delta),
            stock_kg: magnitude(&kpi::STOCK_KG),
            approved_pct: clamp_pct(payload.kpi(&kpi::APPROVED_LOTS).unwrap_or(0.0)),
            approved_delta: delta(&kpi::APPROVED_LOTS_DELTA),
            on_time_pct: clamp_pct(payload.kpi(&kpi::ON_TIME).unwrap_or(0.0)),
            on_time_delta: delta(&kpi::ON_TIME_DELTA),
            production_cost: magnitude(&kpi::PRODUCTION_COST),
            production_cost_delta: delta(&kpi::PRODUCTION_COST_DELTA),
            payroll: payload.kpi(&kpi::PAYROLL).filter(|n| *n > 0.0),
            active_employees: payload.kpi(&kpi::ACTIVE_EMPLOYEES).filter(|n| *n > 0.0),
        }
    }

    fn payroll_value(&self) -> String {
        if let Some(payroll) = self.payroll {
            return format_money(payroll);
        }
        match self.active_employees {
            Some(headcount) => {
                tracing::debug!("Payroll missing, showing headcount {}", headcount);
                format!("{} empleados", format_quantity(headcount.round()))
            }
            None => {
                tracing::debug!("Payroll and headcount missing");
                NO_DATA.to_string()
            }
        }
    }

    /// The six dashboard cards, in display order
    #[must_use]
    pub fn cards(&self) -> Vec<KpiCard> {
        vec![
            KpiCard::new(
                "Ventas del Periodo",
                format_money(self.sales),
                self.sales_delta,
                DeltaDirection::rising(self.sales_delta),
                "Suma de ventas del periodo seleccionado",
            ),
            KpiCard::new(
                "Stock Total",
                format!("{} KG", format_quantity(self.stock_kg)),
                0.0,
                DeltaDirection::Neutral,
                "Inventario total en kg",
            ),
            KpiCard::new(
                "Lotes Aprobados",
                format_pct(self.approved_pct),
                self.approved_delta,
                DeltaDirection::rising(self.approved_delta),
                "Aprobación de calidad",
            ),
            KpiCard::new(
                "Entregas a Tiempo",
                format_pct(self.on_time_pct),
                self.on_time_delta,
                DeltaDirection::rising(self.on_time_delta),
                "Órdenes entregadas dentro del SLA",
            ),
            KpiCard::new(
                "Costo de Producción",
                format_money(self.production_cost),
                self.production_cost_delta,
                DeltaDirection::falling(self.production_cost_delta),
                "Costos del periodo seleccionado",
            ),
            KpiCard::new(
                "Nómina del Periodo",
                self.payroll_value(),
                0.0,
                DeltaDirection::Neutral,
                "Total de sueldos del periodo seleccionado",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn snapshot(kpis: serde_json::Value) -> KpiSnapshot {
        KpiSnapshot::resolve(&OverviewPayload::from(json!({ "kpis": kpis })))
    }

    #[test]
    fn legacy_sales_key_is_used() {
        let s = snapshot(json!({ "ventas_mes": 900 }));
        assert_eq!(s.sales, 900.0);
        assert_eq!(s.cards()[0].value, "S/ 900.00");
    }

    #[test]
    fn sanitizes_and_reconstructs() {
        let s = snapshot(json!({
            "ventas_periodo": 1000,
            "delta_ventas": 25,
            "stock_total_kg": -10,
            "lotes_aprobados_pct": 140,
            "entregas_a_tiempo_pct": "88.5",
        }));
        assert_eq!(s.sales_previous, 800.0);
        assert_eq!(s.stock_kg, 0.0);
        assert_eq!(s.approved_pct, 100.0);
        assert_eq!(s.on_time_pct, 88.5);
    }

    #[test]
    fn cost_direction_is_inverted() {
        let cards = snapshot(json!({ "costo_produccion_mes": 500, "delta_costo_produccion": -4 })).cards();
        let cost = &cards[4];
        assert_eq!(cost.title, "Costo de Producción");
        assert_eq!(cost.delta_direction, DeltaDirection::Up);
        assert_eq!(cost.delta_label(), "-4.0%");

        let cards = snapshot(json!({ "delta_costo_produccion": 3 })).cards();
        assert_eq!(cards[4].delta_direction, DeltaDirection::Down);
    }

    #[test]
    fn payroll_fallbacks() {
        assert_eq!(
            snapshot(json!({ "nomina_periodo": 4200 })).cards()[5].value,
            "S/ 4,200.00"
        );
        assert_eq!(
            snapshot(json!({ "empleados_activos": 12 })).cards()[5].value,
            "12 empleados"
        );
        assert_eq!(snapshot(json!({})).cards()[5].value, NO_DATA);
    }

    #[test]
    fn neutral_cards_have_no_delta_label() {
        let cards = snapshot(json!({ "stock_total_kg": 12500 })).cards();
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[1].value, "12,500 KG");
        assert_eq!(cards[1].delta_label(), "");
    }
}
