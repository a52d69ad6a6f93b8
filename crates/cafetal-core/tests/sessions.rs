use cafetal_client::{paths, Completion, FetchPhase, MetaOption, StatusFilter};
use cafetal_core::{CatalogCounts, DashboardSession, EmployeeDirectory, InventoryCatalog, StatusCounts};
use cafetal_metrics::{Period, SalesChart};
use cafetal_table::ColumnToggle;
use cafetal_test_utils::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

fn sales_only(sales: f64) -> serde_json::Value {
    json!({ "kpis": { "ventas_periodo": sales }, "series": {}, "alertas": {} })
}

#[tokio::test]
async fn slow_response_for_old_filter_is_dropped() {
    let (api, backend) = StaticBackend::new()
        .with_delayed_json(
            paths::DASHBOARD_OVERVIEW,
            sales_only(100.0),
            Duration::from_millis(50),
        )
        .with_json(paths::DASHBOARD_OVERVIEW, sales_only(200.0))
        .into_client();
    let mut session = DashboardSession::new(api).with_clock(fixed_now());

    let old = session.refresh();
    assert!(session.set_period(Period::Week));
    let new = session.refresh();
    let (old, new) = tokio::join!(old, new);

    assert_eq!(old, Completion::Stale);
    assert_eq!(new, Completion::Applied);
    let view = session.view().unwrap();
    assert_eq!(view.period, Period::Week);
    assert_eq!(view.snapshot.sales, 200.0);
    assert_eq!(backend.call_count(paths::DASHBOARD_OVERVIEW), 2);
    assert!(backend.calls()[1].1.contains(&("period", "week".to_string())));
}

#[tokio::test]
async fn unchanged_filter_reports_no_change() {
    let (api, _) = StaticBackend::new().into_client();
    let mut session = DashboardSession::new(api);
    assert!(!session.set_period(Period::Month));
    assert!(session.set_warehouse("2"));
    assert!(!session.set_warehouse("2"));
}

#[tokio::test]
async fn legacy_payload_falls_back_to_comparison() {
    let (api, _) = StaticBackend::new()
        .with_json(paths::DASHBOARD_OVERVIEW, legacy_overview_json())
        .into_client();
    let session = DashboardSession::new(api).with_clock(fixed_now());
    assert_eq!(session.refresh().await, Completion::Applied);

    let view = session.view().unwrap();
    assert_eq!(
        view.sales,
        SalesChart::Comparison {
            previous: 720.0,
            current: 900.0
        }
    );
    assert!(view.alerts.is_empty());
}

#[tokio::test]
async fn failed_refresh_keeps_previous_view() {
    let (api, _) = StaticBackend::new()
        .with_json(paths::DASHBOARD_OVERVIEW, overview_json())
        .with_status(paths::DASHBOARD_OVERVIEW, 500)
        .into_client();
    let session = DashboardSession::new(api).with_clock(fixed_now());

    session.refresh().await;
    session.refresh().await;

    let state = session.overview_state();
    assert_eq!(state.phase, FetchPhase::Failed);
    assert_eq!(state.error.as_deref(), Some("HTTP 500"));
    assert_eq!(session.view().unwrap().alerts.len(), 4);
}

#[tokio::test]
async fn close_drops_late_response() {
    let (api, _) = StaticBackend::new()
        .with_json(paths::DASHBOARD_OVERVIEW, overview_json())
        .into_client();
    let session = DashboardSession::new(api);

    let pending = session.refresh();
    session.close();
    assert_eq!(pending.await, Completion::Closed);
    assert!(session.view().is_none());
    assert_eq!(session.refresh().await, Completion::Closed);
}

#[tokio::test]
async fn meta_loads_alongside_overview() {
    let (api, _) = StaticBackend::new()
        .with_json(paths::DASHBOARD_OVERVIEW, overview_json())
        .with_json(
            paths::DASHBOARD_META,
            json!({
                "warehouses": [
                    { "id": "ALM-01", "name": "Almacén Central" },
                    { "id": 2, "name": "Planta Chanchamayo" },
                ],
                "categories": [{ "id": 1, "name": "Tostado" }],
            }),
        )
        .into_client();
    let mut session = DashboardSession::new(api).with_clock(fixed_now());

    let (overview, meta) = session.refresh_all().await;
    assert_eq!((overview, meta), (Completion::Applied, Completion::Applied));
    let meta = session.meta().unwrap();
    let warehouses: Vec<String> = meta.warehouses.iter().map(MetaOption::value).collect();
    assert_eq!(warehouses, vec!["ALM-01", "2"]);
    assert_eq!(meta.categories[0].name, "Tostado");

    // an option's value feeds straight back into the overview filter
    assert!(session.set_category(meta.categories[0].value()));
    assert_eq!(session.query().category, "1");
}

#[tokio::test]
async fn directory_pages_are_clamped_to_total() {
    let (api, backend) = StaticBackend::new()
        .with_json(paths::EMPLOYEES, employee_page_json(1, 10, 23))
        .with_json(paths::EMPLOYEES, employee_page_json(3, 10, 23))
        .into_client();
    let mut directory = EmployeeDirectory::new(api).unwrap();

    assert_eq!(directory.refresh().await, Completion::Applied);
    assert_eq!(directory.total(), 23);
    assert_eq!(directory.total_pages(), 3);
    assert_eq!(directory.rows().len(), 10);
    assert_eq!(
        directory.status_counts(),
        StatusCounts {
            active: 5,
            inactive: 5
        }
    );

    assert_eq!(directory.set_page(7), 3);
    directory.refresh().await;
    assert_eq!(directory.rows().len(), 3);
    assert!(backend.calls()[1].1.contains(&("page", "3".to_string())));

    directory.set_search("huamán");
    assert_eq!(directory.query().page, 1);
    assert_eq!(directory.previous_page(), 1);
}

#[tokio::test]
async fn shrinking_total_refetches_the_last_page() {
    let (api, backend) = StaticBackend::new()
        .with_json(paths::EMPLOYEES, employee_page_json(1, 10, 23))
        .with_json(paths::EMPLOYEES, employee_page_json(3, 10, 12))
        .with_json(paths::EMPLOYEES, employee_page_json(2, 10, 12))
        .into_client();
    let mut directory = EmployeeDirectory::new(api).unwrap();

    directory.refresh().await;
    assert_eq!(directory.set_page(3), 3);
    assert_eq!(directory.refresh().await, Completion::Applied);

    assert_eq!(directory.query().page, 2);
    assert_eq!(directory.total(), 12);
    let ids: Vec<i64> = directory.rows().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![11, 12]);

    let calls = backend.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[2].1.contains(&("page", "2".to_string())));
}

#[tokio::test]
async fn closed_sessions_drop_every_refresh() {
    let (api, backend) = catalog_backend()
        .with_json(paths::EMPLOYEES, employee_page_json(1, 10, 3))
        .into_client();

    let mut directory = EmployeeDirectory::new(api.clone()).unwrap();
    directory.close();
    assert_eq!(directory.refresh().await, Completion::Closed);
    assert!(directory.rows().is_empty());

    let mut catalog = InventoryCatalog::new(api).unwrap();
    catalog.close();
    let completion = catalog.refresh().await;
    assert_eq!(completion.products, Completion::Closed);
    assert_eq!(catalog.counts(), CatalogCounts::default());

    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn status_filter_is_applied_when_server_ignores_it() {
    let (api, backend) = StaticBackend::new()
        .with_json(paths::EMPLOYEES, employee_page_json(1, 10, 10))
        .into_client();
    let mut directory = EmployeeDirectory::new(api).unwrap();

    directory.set_status(StatusFilter::Active);
    directory.refresh().await;

    assert_eq!(directory.rows().len(), 5);
    assert_eq!(
        directory.status_counts(),
        StatusCounts {
            active: 5,
            inactive: 0
        }
    );
    assert!(backend.calls()[0].1.contains(&("estado", "activo".to_string())));
}

#[tokio::test]
async fn export_renders_visible_columns() {
    let (api, _) = StaticBackend::new()
        .with_json(paths::EMPLOYEES, employee_page_json(1, 100, 3))
        .into_client();
    let mut directory = EmployeeDirectory::new(api).unwrap();

    let export = directory.export().await.unwrap();
    assert_eq!(
        export.headers,
        vec![
            "Empleado",
            "Documento",
            "Teléfono",
            "Puesto (ID)",
            "Salario",
            "Fecha Ingreso",
            "Estado"
        ]
    );
    assert_eq!(
        export.rows[0],
        vec![
            "Nombre1 Huamán",
            "40000001",
            "—",
            "3",
            "S/ 1,800.00",
            "2023-01-15",
            "INACTIVO"
        ]
    );

    assert_eq!(directory.toggle_column("telefono"), ColumnToggle::Hidden);
    let export = directory.export().await.unwrap();
    assert_eq!(export.headers.len(), 6);
    let csv = export.to_csv().unwrap();
    assert!(csv.starts_with("Empleado,Documento,Puesto (ID),Salario,Fecha Ingreso,Estado\n"));
    assert!(csv.contains("Nombre2 Huamán,40000002,3,\"S/ 1,800.00\",2023-01-15,ACTIVO"));
}

#[tokio::test]
async fn catalog_counts_and_categories() {
    let (api, _) = catalog_backend().into_client();
    let mut catalog = InventoryCatalog::new(api).unwrap();

    let completion = catalog.refresh().await;
    assert_eq!(completion.products, Completion::Applied);
    assert_eq!(
        catalog.counts(),
        CatalogCounts {
            products: 4,
            categories: 3,
            uoms: 2,
            warehouses: 2
        }
    );
    assert_eq!(catalog.categories(), vec!["Café verde", "Empaque", "Tostado"]);

    catalog.set_search("tostado");
    assert_eq!(catalog.filtered_count(), 2);
    assert_eq!(catalog.render().len(), 2);
}

#[tokio::test]
async fn catalog_part_failure_keeps_the_rest() {
    let (api, _) = StaticBackend::new()
        .with_json(paths::WAREHOUSES, warehouses_json())
        .with_json(paths::PRODUCTS, products_json())
        .into_client();
    let mut catalog = InventoryCatalog::new(api).unwrap();

    catalog.refresh().await;
    assert_eq!(catalog.uoms().error.as_deref(), Some("HTTP 404"));
    assert_eq!(catalog.counts().uoms, 0);
    assert_eq!(catalog.counts().products, 4);
    assert_eq!(catalog.headers(), vec!["SKU", "Producto", "Categoría", "Unidad"]);
}
