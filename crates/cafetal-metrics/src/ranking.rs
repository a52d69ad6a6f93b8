//! Top-N rankings and status grouping

use crate::keys;
use crate::sanitize::to_non_negative_number;
use crate::series::SeriesPoint;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Entries kept by a ranking
pub const TOP_N: usize = 10;

/// Status used when an invoice carries none
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Stable descending sort by value, truncated to [`TOP_N`]
///
/// Ties keep their input order.
#[must_use]
pub fn top_n(mut points: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
    points.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    points.truncate(TOP_N);
    points
}

fn product_name(record: &Value) -> Option<String> {
    keys::product::NAME.text(record).or_else(|| {
        keys::product::ID
            .text(record)
            .map(|id| format!("ID {id}"))
    })
}

/// Best-selling products from heterogeneous sales records
///
/// Quantity comes from the first usable quantity field. Records with no
/// display name or a non-positive quantity are dropped.
#[must_use]
pub fn top_products(records: &[Value]) -> Vec<SeriesPoint> {
    let points = records
        .iter()
        .filter_map(|record| {
            let name = product_name(record)?;
            let qty = to_non_negative_number(
                keys::product::QUANTITY.number(record).unwrap_or(0.0),
                0.0,
            );
            (qty > 0.0).then(|| SeriesPoint::new(name, qty))
        })
        .collect();
    top_n(points)
}

/// Invoice count for one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    /// Upper-cased status
    pub status: String,
    /// Number of invoices
    pub count: usize,
}

/// Group invoices by upper-cased status, in first-seen order
#[must_use]
pub fn invoices_by_status(invoices: &[Value]) -> Vec<StatusCount> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for invoice in invoices {
        let status = keys::invoice::STATUS
            .text(invoice)
            .map_or_else(|| UNKNOWN_STATUS.to_string(), |s| s.to_uppercase());
        *counts.entry(status).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect()
}
