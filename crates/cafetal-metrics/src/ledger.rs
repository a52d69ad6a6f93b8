//! Stock movement and invoice aggregates
//!
//! Client-side summaries over records a screen already holds: the kardex
//! running balance with inbound/outbound totals, and invoice totals.

use crate::sanitize::to_non_negative_number;
use crate::status::days_overdue;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Invoice status that is never overdue
pub const PAID_STATUS: &str = "PAID";

/// One inventory movement; positive quantities enter, negative leave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Product moved
    pub product_id: String,
    /// When it happened
    pub timestamp: DateTime<Utc>,
    /// Signed quantity
    pub qty: f64,
}

/// Balance after one movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalancePoint {
    /// Movement time
    pub timestamp: DateTime<Utc>,
    /// Signed quantity of the movement
    pub movement: f64,
    /// Cumulative balance including this movement
    pub balance: f64,
}

/// Inbound, outbound and net quantities
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MovementTotals {
    /// Sum of positive quantities
    pub inflow: f64,
    /// Sum of the magnitudes of negative quantities
    pub outflow: f64,
    /// `inflow - outflow`
    pub net: f64,
}

fn finite_qty(qty: f64) -> f64 {
    if qty.is_finite() {
        qty
    } else {
        0.0
    }
}

/// Running balance of one product, oldest movement first
///
/// Movements with the same timestamp keep their input order. Non-finite
/// quantities count as 0.
#[must_use]
pub fn running_balance(movements: &[StockMovement], product_id: &str) -> Vec<BalancePoint> {
    let mut own: Vec<&StockMovement> = movements
        .iter()
        .filter(|m| m.product_id == product_id)
        .collect();
    own.sort_by_key(|m| m.timestamp);

    let mut balance = 0.0;
    own.into_iter()
        .map(|m| {
            let movement = finite_qty(m.qty);
            balance += movement;
            BalancePoint {
                timestamp: m.timestamp,
                movement,
                balance,
            }
        })
        .collect()
}

/// Inflow, outflow and net over `movements`
#[must_use]
pub fn movement_totals<'a>(
    movements: impl IntoIterator<Item = &'a StockMovement>,
) -> MovementTotals {
    let (inflow, outflow) = movements
        .into_iter()
        .map(|m| finite_qty(m.qty))
        .fold((0.0, 0.0), |(inflow, outflow), qty| {
            if qty > 0.0 {
                (inflow + qty, outflow)
            } else {
                (inflow, outflow - qty)
            }
        });
    MovementTotals {
        inflow,
        outflow,
        net: inflow - outflow,
    }
}

/// Invoice fields the summary needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice total
    pub total: f64,
    /// Amount paid so far
    #[serde(default, alias = "paidAmount")]
    pub paid_amount: f64,
    /// Due date
    #[serde(alias = "dueDate")]
    pub due_date: NaiveDate,
    /// Status code (`OPEN`, `PAID`, `PARTIAL`, `OVERDUE`)
    pub status: String,
}

/// Totals over a list of invoices
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InvoiceSummary {
    /// Number of invoices
    pub count: usize,
    /// Sum of totals
    pub total: f64,
    /// Sum of paid amounts
    pub paid: f64,
    /// `total - paid`
    pub pending: f64,
    /// Unpaid invoices past their due date
    pub overdue: usize,
}

impl InvoiceSummary {
    /// Summarize `invoices` as of `today`
    ///
    /// Amounts are sanitized to non-negative numbers first.
    #[must_use]
    pub fn of(invoices: &[InvoiceRecord], today: NaiveDate) -> Self {
        let mut summary = Self {
            count: invoices.len(),
            ..Self::default()
        };
        for invoice in invoices {
            summary.total += to_non_negative_number(invoice.total, 0.0);
            summary.paid += to_non_negative_number(invoice.paid_amount, 0.0);
            let paid = invoice.status.trim().eq_ignore_ascii_case(PAID_STATUS);
            if !paid && days_overdue(invoice.due_date, today) > 0 {
                summary.overdue += 1;
            }
        }
        summary.pending = summary.total - summary.paid;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn movement(product: &str, day: u32, qty: f64) -> StockMovement {
        StockMovement {
            product_id: product.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 4, day, 8, 0, 0).unwrap(),
            qty,
        }
    }

    #[test]
    fn running_balance_follows_time_order() {
        let movements = vec![
            movement("p1", 3, -20.0),
            movement("p2", 1, 500.0),
            movement("p1", 1, 100.0),
            movement("p1", 2, f64::NAN),
            movement("p1", 4, 15.0),
        ];
        let balances: Vec<f64> = running_balance(&movements, "p1")
            .iter()
            .map(|b| b.balance)
            .collect();
        assert_eq!(balances, vec![100.0, 100.0, 80.0, 95.0]);
        assert!(running_balance(&movements, "p9").is_empty());
    }

    #[test]
    fn totals_split_inflow_and_outflow() {
        let movements = vec![
            movement("p1", 1, 100.0),
            movement("p1", 2, -30.0),
            movement("p2", 3, -20.0),
            movement("p2", 4, f64::INFINITY),
        ];
        assert_eq!(
            movement_totals(&movements),
            MovementTotals {
                inflow: 100.0,
                outflow: 50.0,
                net: 50.0
            }
        );
        assert_eq!(
            movement_totals(&Vec::<StockMovement>::new()),
            MovementTotals::default()
        );
    }

    #[test]
    fn invoice_summary_counts_unpaid_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let invoices: Vec<InvoiceRecord> = serde_json::from_value(serde_json::json!([
            { "total": 1000.0, "paidAmount": 1000.0, "dueDate": "2024-04-01", "status": "PAID" },
            { "total": 500.0, "paid_amount": 200.0, "due_date": "2024-04-15", "status": "PARTIAL" },
            { "total": 300.0, "due_date": "2024-05-20", "status": "OPEN" },
            { "total": -50.0, "due_date": "2024-05-01", "status": "OPEN" },
        ]))
        .unwrap();

        let summary = InvoiceSummary::of(&invoices, today);
        assert_eq!(
            summary,
            InvoiceSummary {
                count: 4,
                total: 1800.0,
                paid: 1200.0,
                pending: 600.0,
                overdue: 1
            }
        );
    }
}
