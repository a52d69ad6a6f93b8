//! Testing utilities for the Cafetal workspace
//!
//! Payload fixtures and an in-memory backend.

#![allow(missing_docs)]

use async_trait::async_trait;
use cafetal_client::{paths, ApiClient, Backend, ClientConfig, ClientError};
use cafetal_metrics::OverviewPayload;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// A canned reply
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
}

#[derive(Debug, Clone)]
struct Scripted {
    reply: Reply,
    delay: Duration,
}

/// Backend serving canned replies per path, without a network
///
/// A path can hold a queue of replies (consumed in order, the last one
/// repeating) and an optional delay, which lets tests finish requests out of
/// order.
#[derive(Debug, Default)]
pub struct StaticBackend {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<(String, Vec<(&'static str, String)>)>>,
}

impl StaticBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply for `path`
    pub fn with_json(self, path: &str, body: Value) -> Self {
        self.push(path, Reply::Json(body), Duration::ZERO);
        self
    }

    /// Queue a status reply for `path`
    pub fn with_status(self, path: &str, status: u16) -> Self {
        self.push(path, Reply::Status(status), Duration::ZERO);
        self
    }

    /// Queue a JSON reply that arrives after `delay`
    pub fn with_delayed_json(self, path: &str, body: Value, delay: Duration) -> Self {
        self.push(path, Reply::Json(body), delay);
        self
    }

    pub fn push(&self, path: &str, reply: Reply, delay: Duration) {
        self.routes
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(Scripted { reply, delay });
    }

    /// Every call so far: path and query pairs
    pub fn calls(&self) -> Vec<(String, Vec<(&'static str, String)>)> {
        self.calls.lock().clone()
    }

    /// Number of calls to `path`
    pub fn call_count(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|(p, _)| p == path).count()
    }

    fn next(&self, path: &str) -> Option<Scripted> {
        let mut routes = self.routes.lock();
        let queue = routes.get_mut(path)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    /// Wrap in an [`ApiClient`] with default configuration
    pub fn into_client(self) -> (ApiClient, Arc<StaticBackend>) {
        let backend = Arc::new(self);
        let client = ApiClient::with_backend(backend.clone(), ClientConfig::default());
        (client, backend)
    }
}

#[async_trait]
impl Backend for StaticBackend {
    async fn get_json(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> cafetal_client::Result<Value> {
        self.calls.lock().push((path.to_string(), query.to_vec()));
        let Some(scripted) = self.next(path) else {
            return Err(ClientError::Http { status: 404 });
        };
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        match scripted.reply {
            Reply::Json(body) => Ok(body),
            Reply::Status(status) => Err(ClientError::Http { status }),
        }
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Fixed clock for reconciliation tests
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// Overview payload using current field names
pub fn overview_json() -> Value {
    json!({
        "kpis": {
            "ventas_periodo": 48250.75,
            "delta_ventas": 12.5,
            "stock_total_kg": 15230.5,
            "lotes_aprobados_pct": 92.4,
            "delta_lotes_aprobados": 1.2,
            "entregas_a_tiempo_pct": 96,
            "delta_entregas": -0.8,
            "costo_produccion_periodo": 21800,
            "delta_costo_produccion": -3.1,
            "nomina_periodo": 36400,
        },
        "series": {
            "ventas": [
                { "ym": "2024-02", "total": 39100 },
                { "ym": "2024-03", "total": 42900 },
                { "ym": "2024-04", "total": 48250.75 },
            ],
            "stock_por_categoria": [
                { "categoria": "Café verde", "kg": 9800 },
                { "categoria": "Tostado", "kg": 4200.5 },
                { "categoria": "Molido", "kg": 1230 },
            ],
            "calidad": [
                { "ym": "2024-03", "pct": 90.1 },
                { "ym": "2024-04", "pct": 92.4 },
            ],
            "top_productos_vendidos": [
                { "producto": "Geisha 250g", "qty": 320 },
                { "producto": "Bourbon 1kg", "qty": 410 },
                { "producto": "Caturra 500g", "qty": 0 },
            ],
        },
        "alertas": {
            "stock_bajo": [
                { "product_id": 12, "name": "Bolsa kraft 1kg", "qty": 40, "min_stock": 200 },
            ],
            "orden_produccion_atrasada": [
                { "productionorder_id": 31, "code": "OP-031", "due_date": "2024-04-25" },
            ],
            "facturas_vencidas": [
                { "invoice_id": 88, "number": "F001-88", "due_date": "2024-04-10", "total_amount": 5400 },
            ],
            "lotes_pendientes_aprobacion": [
                { "qualitytest_id": 7, "lot_id": "L-2024-07", "test_date": "2024-04-29" },
            ],
        },
    })
}

/// Overview payload using legacy field names and a single-point series
pub fn legacy_overview_json() -> Value {
    json!({
        "kpis": {
            "ventas_mes": 900,
            "delta_ventas_mes": 25,
            "costo_produccion_mes": 400,
            "empleados_activos": 14,
        },
        "series": {
            "ventas_por_mes": [{ "ym": "2024-04", "total": 900 }],
            "tasa_aprobacion_calidad": [{ "ym": "2024-04", "value": 88 }],
            "invoices": [
                { "status": "paid" },
                { "state": "open" },
                { "status": "PAID" },
            ],
        },
        "alerts": {},
    })
}

pub fn overview_payload() -> OverviewPayload {
    OverviewPayload::from(overview_json())
}

pub fn legacy_overview_payload() -> OverviewPayload {
    OverviewPayload::from(legacy_overview_json())
}

pub fn employee_json(id: i64, estado: &str) -> Value {
    json!({
        "id": id,
        "doc_id": format!("{:08}", 40_000_000 + id),
        "nombres": format!("Nombre{id}"),
        "apellidos": "Huamán",
        "email": format!("empleado{id}@cafetal.pe"),
        "telefono": null,
        "position_id": 3,
        "base_salary": 1800.0,
        "fecha_ingreso": "2023-01-15",
        "estado": estado,
    })
}

/// One page of a listing of `total` employees; even ids active, odd inactive
pub fn employee_page_json(page: usize, page_size: usize, total: usize) -> Value {
    let start = (page.max(1) - 1) * page_size;
    let end = (start + page_size).min(total);
    let items: Vec<Value> = (start..end)
        .map(|i| {
            let id = i64::try_from(i).unwrap() + 1;
            employee_json(id, if id % 2 == 0 { "activo" } else { "inactivo" })
        })
        .collect();
    json!({ "items": items, "total": total })
}

pub fn warehouses_json() -> Value {
    json!([
        { "id": 1, "code": "ALM-01", "name": "Almacén Central" },
        { "id": 2, "code": "ALM-02", "name": "Planta Chanchamayo" },
    ])
}

pub fn uoms_json() -> Value {
    json!([
        { "id": 1, "code": "KG", "description": "Kilogramo" },
        { "id": 2, "code": "UND", "description": "Unidad" },
    ])
}

pub fn products_json() -> Value {
    json!([
        { "id": 1, "sku": "CV-001", "name": "Café verde Typica", "category": "Café verde", "uom": "KG" },
        { "id": 2, "sku": "CT-010", "name": "Tostado medio", "category": "Tostado", "uom": "KG" },
        { "id": 3, "sku": "EM-100", "name": "Bolsa kraft 1kg", "category": "Empaque", "uom": "UND" },
        { "id": 4, "sku": "CT-011", "name": "Tostado oscuro", "category": "Tostado", "uom": "KG" },
    ])
}

/// Backend with every catalog endpoint populated
pub fn catalog_backend() -> StaticBackend {
    StaticBackend::new()
        .with_json(paths::WAREHOUSES, warehouses_json())
        .with_json(paths::UOMS, uoms_json())
        .with_json(paths::PRODUCTS, products_json())
}
