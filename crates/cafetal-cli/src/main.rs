//! `cafetal` command-line front end

use anyhow::{bail, Context};
use cafetal_client::{ApiClient, ClientConfig, Completion, StatusFilter};
use cafetal_core::{DashboardSession, EmployeeDirectory, InventoryCatalog};
use cafetal_metrics::format::{format_money, format_quantity};
use cafetal_metrics::{
    CategoryChart, DashboardView, Period, ProductPanel, QualityChart, SalesChart,
};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("cafetal")
        .version(cafetal_core::VERSION)
        .about("Cafetal ERP dashboard, employee directory and catalog")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("API base URL (overrides config and CAFETAL_API_BASE)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a TOML client config"),
        )
        .subcommand(
            Command::new("overview")
                .about("Reconciled dashboard for a period")
                .arg(
                    Arg::new("period")
                        .long("period")
                        .default_value("month")
                        .value_parser(["week", "month", "quarter", "year"])
                        .help("Reporting period"),
                )
                .arg(
                    Arg::new("warehouse")
                        .long("warehouse")
                        .default_value("all")
                        .help("Warehouse id or 'all'"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .default_value("all")
                        .help("Product category or 'all'"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("employees")
                .about("Employee directory")
                .arg(Arg::new("q").long("q").default_value("").help("Search text"))
                .arg(
                    Arg::new("page")
                        .long("page")
                        .default_value("1")
                        .value_parser(value_parser!(usize))
                        .help("Page number"),
                )
                .arg(
                    Arg::new("estado")
                        .long("estado")
                        .default_value("todos")
                        .value_parser(["todos", "activo", "inactivo"])
                        .help("Status filter"),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Export every matching employee as CSV"),
                ),
        )
        .subcommand(Command::new("catalog").about("Warehouses, units and products"))
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<ClientConfig> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {path}"))?;
            ClientConfig::from_toml_str(&source)?
        }
        None => ClientConfig::default(),
    };
    let mut config = config.apply_env()?;
    if let Some(base) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base.as_str());
        config.validate()?;
    }
    tracing::debug!("API base: {}", config.base_url);
    Ok(config)
}

fn arg(args: &ArgMatches, name: &str) -> String {
    args.get_one::<String>(name).cloned().unwrap_or_default()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let api = ApiClient::new(load_config(&matches)?)?;

    match matches.subcommand() {
        Some(("overview", args)) => overview(api, args).await,
        Some(("employees", args)) => employees(api, args).await,
        Some(("catalog", _)) => catalog(api).await,
        _ => Ok(()),
    }
}

async fn overview(api: ApiClient, args: &ArgMatches) -> anyhow::Result<()> {
    let period: Period = arg(args, "period").parse()?;
    let mut session = DashboardSession::new(api);
    session.set_period(period);
    session.set_warehouse(arg(args, "warehouse"));
    session.set_category(arg(args, "category"));

    session.refresh().await;
    let state = session.overview_state();
    if let Some(error) = state.error {
        bail!("overview failed: {error}");
    }
    let Some(view) = session.view() else {
        bail!("overview returned no data");
    };

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }
    Ok(())
}

fn print_view(view: &DashboardView) {
    println!("Dashboard ({})", view.period_label);
    println!();
    for card in &view.kpis {
        let delta = card.delta_label();
        if delta.is_empty() {
            println!("  {:<28} {}", card.title, card.value);
        } else {
            println!("  {:<28} {}  ({delta})", card.title, card.value);
        }
    }

    println!();
    match &view.sales {
        SalesChart::Trend { series } => {
            println!("Ventas ({} meses)", series.len());
            for point in series.points() {
                println!("  {:<8} {}", point.label, format_money(point.value));
            }
        }
        SalesChart::Comparison { previous, current } => {
            println!(
                "Ventas: periodo anterior {} / actual {}",
                format_money(*previous),
                format_money(*current)
            );
        }
    }

    match &view.quality {
        QualityChart::Trend { series } => {
            let last = series.last().map_or(0.0, |p| p.value);
            println!("Calidad: {last:.1}% ({} meses)", series.len());
        }
        QualityChart::Gauge { pct } => println!("Calidad: {pct:.1}%"),
    }

    match &view.category_chart {
        CategoryChart::NoData => println!("Stock por categoría: sin datos"),
        CategoryChart::Proportion { slices: points } | CategoryChart::Hierarchical { tiles: points } => {
            println!("Stock por categoría");
            for point in points {
                println!("  {:<20} {} kg", point.label, format_quantity(point.value));
            }
        }
    }

    match &view.products {
        ProductPanel::TopProducts { items } => {
            println!("Productos más vendidos");
            for item in items {
                println!("  {:<24} {}", item.label, format_quantity(item.value));
            }
        }
        ProductPanel::InvoicesByStatus { counts } => {
            println!("Facturas por estado");
            for count in counts {
                println!("  {:<24} {}", count.status, count.count);
            }
        }
        ProductPanel::TopStockCategories { items } => {
            println!("Categorías con más stock");
            for item in items {
                println!("  {:<24} {} kg", item.label, format_quantity(item.value));
            }
        }
        ProductPanel::NoData => println!("Productos: sin datos"),
    }

    println!();
    println!(
        "Alertas: {} ({} críticas)",
        view.alerts.len(),
        view.critical_alerts
    );
    for alert in &view.alerts {
        println!(
            "  [{}] {}: {} -> {}",
            alert.severity.as_str(),
            alert.title,
            alert.description,
            alert.action
        );
    }
}

async fn employees(api: ApiClient, args: &ArgMatches) -> anyhow::Result<()> {
    let status: StatusFilter = arg(args, "estado").parse().map_err(anyhow::Error::msg)?;
    let mut directory = EmployeeDirectory::new(api)?;
    directory.set_search(arg(args, "q"));
    directory.set_status(status);

    if args.get_flag("all") {
        let export = directory.export().await?;
        print!("{}", export.to_csv()?);
        tracing::info!("{} employees exported", export.len());
        return Ok(());
    }

    // the page is clamped against the total, which is only known after a fetch
    let page = args.get_one::<usize>("page").copied().unwrap_or(1);
    if directory.refresh().await == Completion::Applied && page > 1 {
        directory.set_page(page);
        directory.refresh().await;
    }
    if let Some(error) = directory.state().error {
        bail!("employee listing failed: {error}");
    }

    println!("{}", directory.headers().join("\t"));
    for row in directory.render() {
        let cells: Vec<String> = row.cells.iter().map(ToString::to_string).collect();
        println!("{}", cells.join("\t"));
    }
    let counts = directory.status_counts();
    println!();
    println!(
        "Página {} de {} · {} empleados · {} activos / {} inactivos en esta página",
        directory.query().page,
        directory.total_pages(),
        directory.total(),
        counts.active,
        counts.inactive
    );
    Ok(())
}

async fn catalog(api: ApiClient) -> anyhow::Result<()> {
    let mut catalog = InventoryCatalog::new(api)?;
    catalog.refresh().await;

    for (name, error) in [
        ("almacenes", catalog.warehouses().error),
        ("unidades", catalog.uoms().error),
        ("productos", catalog.products().error),
    ] {
        if let Some(error) = error {
            tracing::warn!("Could not load {}: {}", name, error);
        }
    }

    let counts = catalog.counts();
    println!(
        "{} productos · {} categorías · {} unidades · {} almacenes",
        counts.products, counts.categories, counts.uoms, counts.warehouses
    );
    println!("Categorías: {}", catalog.categories().join(", "));
    println!();
    println!("{}", catalog.headers().join("\t"));
    for row in catalog.render() {
        let cells: Vec<String> = row.cells.iter().map(ToString::to_string).collect();
        println!("{}", cells.join("\t"));
    }
    Ok(())
}
