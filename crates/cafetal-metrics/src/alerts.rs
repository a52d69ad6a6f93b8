//! Alert unification
//!
//! Four backend alert lists, each with its own record shape, become one list
//! of [`AlertRow`]s with deterministic ids.

use crate::format::{date_prefix, format_money, safe_timestamp};
use crate::keys::{self, FieldKey};
use crate::payload::OverviewPayload;
use crate::sanitize::to_non_negative_number;
use cafetal_table::TableRow;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Needs attention
    Warning,
    /// Critical
    Error,
}

impl Severity {
    /// Lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Source category of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    /// Product below minimum stock
    LowStock,
    /// Production order past its due date
    OverdueProductionOrder,
    /// Invoice past its due date
    OverdueInvoice,
    /// Quality test waiting for approval
    PendingQualityApproval,
}

impl AlertCategory {
    /// All categories, in display order
    pub const ALL: [Self; 4] = [
        Self::LowStock,
        Self::OverdueProductionOrder,
        Self::OverdueInvoice,
        Self::PendingQualityApproval,
    ];

    /// Id prefix
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::LowStock => "stock",
            Self::OverdueProductionOrder => "op",
            Self::OverdueInvoice => "inv",
            Self::PendingQualityApproval => "qt",
        }
    }

    /// Severity of every alert in this category
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::LowStock | Self::PendingQualityApproval => Severity::Warning,
            Self::OverdueProductionOrder | Self::OverdueInvoice => Severity::Error,
        }
    }

    /// Suggested action label
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::LowStock => "Generar OC",
            Self::OverdueProductionOrder => "Revisar",
            Self::OverdueInvoice => "Gestionar",
            Self::PendingQualityApproval => "Aprobar",
        }
    }

    fn source(self) -> &'static FieldKey {
        match self {
            Self::LowStock => &keys::alert::LOW_STOCK,
            Self::OverdueProductionOrder => &keys::alert::OVERDUE_ORDERS,
            Self::OverdueInvoice => &keys::alert::OVERDUE_INVOICES,
            Self::PendingQualityApproval => &keys::alert::PENDING_QUALITY,
        }
    }

    fn natural_key(self) -> &'static FieldKey {
        match self {
            Self::LowStock => &keys::alert::PRODUCT_KEY,
            Self::OverdueProductionOrder => &keys::alert::ORDER_KEY,
            Self::OverdueInvoice => &keys::alert::INVOICE_KEY,
            Self::PendingQualityApproval => &keys::alert::QUALITY_TEST_KEY,
        }
    }
}

/// One row of the unified alert table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRow {
    /// Deterministic id
    pub id: String,
    /// Source category
    pub category: AlertCategory,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Severity
    pub severity: Severity,
    /// When the alert applies
    pub date: DateTime<Utc>,
    /// Suggested action
    pub action: String,
    /// For low stock: `max(0, min_stock - qty)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder_qty: Option<f64>,
}

impl TableRow for AlertRow {
    type Id = String;

    fn row_id(&self) -> String {
        self.id.clone()
    }

    fn field_text(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "id" => Some(Cow::Borrowed(&self.id)),
            "title" => Some(Cow::Borrowed(&self.title)),
            "description" => Some(Cow::Borrowed(&self.description)),
            "severity" => Some(Cow::Borrowed(self.severity.as_str())),
            "action" => Some(Cow::Borrowed(&self.action)),
            "date" => Some(Cow::Owned(self.date.format("%Y-%m-%d").to_string())),
            _ => None,
        }
    }
}

/// Short content digest for records without a natural key
fn content_token(record: &Value) -> String {
    let canonical = serde_json::to_string(record).unwrap_or_default();
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(&digest[..8])
}

/// Assigns ids, disambiguating repeats within one reconciliation
///
/// A repeat gets the first free `~n` suffix; natural keys may themselves
/// contain `~`, so every candidate is checked against the ids issued so far.
#[derive(Debug, Default)]
struct IdAllocator {
    issued: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl IdAllocator {
    fn allocate(&mut self, category: AlertCategory, record: &Value) -> String {
        // natural keys use '-', content tokens '#', so the two never collide
        let base = match category.natural_key().text(record) {
            Some(key) => format!("{}-{key}", category.prefix()),
            None => format!("{}#{}", category.prefix(), content_token(record)),
        };
        if self.issued.insert(base.clone()) {
            return base;
        }
        let n = self.next_suffix.entry(base.clone()).or_insert(2);
        loop {
            let candidate = format!("{base}~{n}");
            *n += 1;
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

fn build_row(
    category: AlertCategory,
    record: &Value,
    id: String,
    now: DateTime<Utc>,
) -> AlertRow {
    let due = keys::alert::DUE_DATE.text(record);
    let mut reorder_qty = None;
    let (title, description, date) = match category {
        AlertCategory::LowStock => {
            let qty = keys::alert::QTY.number(record).unwrap_or(0.0);
            let min_stock = keys::alert::MIN_STOCK.number(record);
            reorder_qty = Some(to_non_negative_number(
                min_stock.unwrap_or(0.0) - qty.max(0.0),
                0.0,
            ));
            let description = format!(
                "{} — {} / mín {}",
                keys::alert::NAME.text(record).unwrap_or_else(|| "Producto".to_string()),
                qty.round(),
                keys::alert::MIN_STOCK.text(record).unwrap_or_else(|| "-".to_string()),
            );
            ("Stock bajo".to_string(), description, now)
        }
        AlertCategory::OverdueProductionOrder => (
            format!(
                "Orden {} con retraso",
                keys::alert::ORDER_CODE.text(record).unwrap_or_else(|| "OP".to_string())
            ),
            format!("Vence: {}", date_prefix(due.as_deref())),
            safe_timestamp(due.as_deref(), now),
        ),
        AlertCategory::OverdueInvoice => {
            let title = match keys::alert::INVOICE_NUMBER.text(record) {
                Some(number) => format!("Factura {number} vencida"),
                None => "Factura vencida".to_string(),
            };
            let amount = keys::alert::TOTAL_AMOUNT.number(record).unwrap_or(0.0);
            (
                title,
                format!(
                    "Vence: {} — {}",
                    date_prefix(due.as_deref()),
                    format_money(amount)
                ),
                safe_timestamp(due.as_deref(), now),
            )
        }
        AlertCategory::PendingQualityApproval => {
            let tested = keys::alert::TEST_DATE.text(record);
            (
                format!(
                    "Lote {} pendiente de aprobación",
                    keys::alert::LOT.text(record).unwrap_or_else(|| "-".to_string())
                ),
                format!("Test: {}", date_prefix(tested.as_deref())),
                safe_timestamp(tested.as_deref(), now),
            )
        }
    };
    AlertRow {
        id,
        category,
        title,
        description,
        severity: category.severity(),
        date,
        action: category.action().to_string(),
        reorder_qty,
    }
}

/// Merge every alert list into one, categories in display order
#[must_use]
pub fn unify_alerts(payload: &OverviewPayload, now: DateTime<Utc>) -> Vec<AlertRow> {
    let mut ids = IdAllocator::default();
    let mut rows = Vec::new();
    for category in AlertCategory::ALL {
        for record in payload.alert_list(category.source()) {
            if !record.is_object() {
                tracing::debug!("Skipping non-object {:?} alert record", category);
                continue;
            }
            let id = ids.allocate(category, record);
            rows.push(build_row(category, record, id, now));
        }
    }
    rows
}

/// Number of error-severity alerts
#[must_use]
pub fn critical_count(rows: &[AlertRow]) -> usize {
    rows.iter().filter(|r| r.severity == Severity::Error).count()
}
