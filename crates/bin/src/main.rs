//! Painel CLI binary.
//!
//! Loads the five sales sources, joins them and prints or exports the
//! dashboard views.

use clap::{Parser, Subcommand, ValueEnum};
use painel::Dashboard;
use painel_data::{JoinMode, MonthKey, SourceConfig};
use painel_output::{DashboardSummary, ExportFormat, Exporter, ReportBuilder};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "painel")]
#[command(about = "Painel: month-filtered sales dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML file with source and column settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the CSV sources
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Join semantics for reference lookups (inner or left)
    #[arg(long, global = true)]
    join_mode: Option<JoinMode>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the months present in the sales data
    Months,

    /// Sales per seller and category for one month
    Sales {
        /// Month as YYYY-MM (defaults to the first month in the data)
        #[arg(long)]
        month: Option<MonthKey>,
    },

    /// Product mix and customer distribution
    Products,

    /// Profit per product and regional sales distribution
    Report,

    /// Every dashboard view
    Dashboard {
        /// Month as YYYY-MM (defaults to the first month in the data)
        #[arg(long)]
        month: Option<MonthKey>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Export a single view to a file
    Export {
        /// View to export
        #[arg(value_enum)]
        view: View,

        /// File format (csv, json or pretty-json)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Output file
        #[arg(long)]
        output: PathBuf,

        /// Month as YYYY-MM for the sales view
        #[arg(long)]
        month: Option<MonthKey>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum View {
    Sales,
    Products,
    Customers,
    Profit,
    Regions,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = source_config(&cli)?;
    info!(data_dir = %config.data_dir.display(), join_mode = ?config.join_mode, "loading sources");
    let mut dashboard = Dashboard::new(config);

    match cli.command {
        Commands::Months => {
            for month in dashboard.months()? {
                println!("{}", month);
            }
        }
        Commands::Sales { month } => {
            select(&mut dashboard, month);
            print_sales(&dashboard)?;
        }
        Commands::Products => print_products(&dashboard)?,
        Commands::Report => print_report(&dashboard)?,
        Commands::Dashboard { month, format } => {
            select(&mut dashboard, month);
            let summary = dashboard.summary()?;
            print_summary(&summary, format)?;
        }
        Commands::Export {
            view,
            format,
            output,
            month,
        } => {
            select(&mut dashboard, month);
            export_view(&dashboard, view, format, &output)?;
            println!("Wrote {} to {}", view_name(view), output.display());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("painel=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("painel=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// File settings first, command-line flags on top.
fn source_config(cli: &Cli) -> Result<SourceConfig, painel::DataError> {
    let mut config = SourceConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir.clone());
    }
    if let Some(mode) = cli.join_mode {
        config = config.with_join_mode(mode);
    }
    Ok(config)
}

fn select(dashboard: &mut Dashboard, month: Option<MonthKey>) {
    if let Some(month) = month {
        dashboard.select_month(month);
    }
}

fn print_header(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", title);
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

/// Sum of a column for a table footer; an empty table totals `0.00`, not `-0.00`.
fn column_total<T>(rows: &[T], value: impl Fn(&T) -> f64) -> f64 {
    rows.iter().fold(0.0, |acc, row| acc + value(row))
}

fn print_sales(dashboard: &Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let month = dashboard
        .selected_month()?
        .map_or_else(|| "-".to_string(), |m| m.to_string());
    print_header(&format!("SALES SUMMARY: {}", month));

    let rows = dashboard.sales_summary()?;
    if rows.is_empty() {
        println!("No sales in {}", month);
        return Ok(());
    }

    println!("{:<24} {:<20} {:>14}", "Seller", "Category", "Total");
    println!("{}", "-".repeat(60));
    for row in &rows {
        println!(
            "{:<24} {:<20} {:>14.2}",
            row.seller_name, row.category, row.total_sales
        );
    }
    println!("{}", "-".repeat(60));
    let total = column_total(&rows, |r| r.total_sales);
    println!("{:<45} {:>14.2}", "Total", total);
    Ok(())
}

fn print_products(dashboard: &Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    print_header("PRODUCT MIX");
    println!("{:<32} {:>12} {:>10}", "Product", "Quantity", "Share");
    println!("{}", "-".repeat(56));
    for row in dashboard.product_mix()? {
        println!(
            "{:<32} {:>12.2} {:>9.1}%",
            row.product_name, row.quantity, row.share_pct
        );
    }

    print_header("CUSTOMERS BY STATE");
    println!("{:<32} {:>12}", "State", "Records");
    println!("{}", "-".repeat(45));
    for row in dashboard.customer_distribution()? {
        println!("{:<32} {:>12}", row.state, row.records);
    }
    Ok(())
}

fn print_report(dashboard: &Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    print_header("PROFIT BY PRODUCT");
    let profit = dashboard.profit_report()?;
    println!("{:<32} {:>14}", "Product", "Profit");
    println!("{}", "-".repeat(47));
    for row in &profit {
        println!("{:<32} {:>14.2}", row.product_name, row.profit);
    }
    let total = column_total(&profit, |p| p.profit);
    println!("{}", "-".repeat(47));
    println!("{:<32} {:>14.2}", "Total", total);
    println!("\nNote: profit = total_price - quantity * unit_price");

    print_header("SALES BY REGION");
    let regions = match dashboard.region_distribution() {
        Ok(rows) => rows,
        Err(painel::DataError::MissingColumn(column)) => {
            println!("Region column '{}' not found in the joined data", column);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    println!(
        "{:<16} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Region", "Count", "Min", "Q1", "Median", "Q3", "Max"
    );
    println!("{}", "-".repeat(78));
    for r in regions {
        println!(
            "{:<16} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            r.region, r.count, r.min, r.q1, r.median, r.q3, r.max
        );
    }
    Ok(())
}

fn print_summary(
    summary: &DashboardSummary,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Text => println!("{}", summary.to_ascii_table()),
        OutputFormat::Markdown => println!("{}", summary.to_markdown()),
        OutputFormat::Json => {
            let report = ReportBuilder::new()
                .month(summary.selected_month)
                .contents(summary)?
                .build();
            println!("{}", report.to_json()?);
        }
    }
    Ok(())
}

fn export_view(
    dashboard: &Dashboard,
    view: View,
    format: ExportFormat,
    output: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    match view {
        View::Sales => dashboard.sales_summary()?.export_to_file(output, format)?,
        View::Products => dashboard.product_mix()?.export_to_file(output, format)?,
        View::Customers => dashboard
            .customer_distribution()?
            .export_to_file(output, format)?,
        View::Profit => dashboard.profit_report()?.export_to_file(output, format)?,
        View::Regions => dashboard
            .region_distribution()?
            .export_to_file(output, format)?,
    }
    Ok(())
}

const fn view_name(view: View) -> &'static str {
    match view {
        View::Sales => "sales summary",
        View::Products => "product mix",
        View::Customers => "customer distribution",
        View::Profit => "profit report",
        View::Regions => "regional distribution",
    }
}
