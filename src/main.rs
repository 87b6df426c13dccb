// Entry point and high-level CLI flow.
//
// Each subcommand mirrors one dashboard mode:
// - `operational` filters the tenant roster and writes the board report,
// - `development` filters (and optionally simulates) the leasing pipeline.
// Both print a markdown preview of what went into the PDF.
use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use harare_report::config::AppConfig;
use harare_report::filters::{PipelineFilter, TenantFilter};
use harare_report::{
    loader, metrics, output, recommend, render, summarize, util, MetricsSnapshot,
    Portfolio,
};

#[derive(Parser)]
#[command(
    name = "harare-report",
    about = "Harare Asset Intelligence: filtered board reports for retail portfolios"
)]
struct Cli {
    /// Path to a TOML config file. Falls back to $HARARE_CONFIG, then defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter (e.g. `info`, `harare_report=debug`). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Terrace Africa: revenue protection report over the tenant roster.
    Operational(OperationalArgs),
    /// WestProp: feasibility report over the leasing pipeline.
    Development(DevelopmentArgs),
}

#[derive(Args)]
struct OperationalArgs {
    /// Restrict to these assets (repeatable). Defaults to every asset.
    #[arg(long = "asset")]
    assets: Vec<String>,

    /// Shortest lease expiry in months (inclusive).
    #[arg(long)]
    expiry_min: Option<u32>,

    /// Longest lease expiry in months (inclusive).
    #[arg(long)]
    expiry_max: Option<u32>,

    /// Show high-risk tenants only.
    #[arg(long, default_value_t = false)]
    risk_only: bool,

    /// PDF destination. Defaults to the configured output path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write a JSON summary of metrics and recommendations.
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Also export the filtered tenant list as CSV.
    #[arg(long)]
    export_csv: Option<PathBuf>,
}

#[derive(Args)]
struct DevelopmentArgs {
    /// Minimum fit-out budget in USD.
    #[arg(long, default_value_t = 0.0)]
    min_budget: f64,

    /// Simulate closing every deal still in negotiation.
    #[arg(long, default_value_t = false)]
    simulate: bool,

    /// PDF destination. Defaults to the configured output path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write a JSON summary of metrics and recommendations.
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .compact()
        .init();
}

fn run_operational(config: &AppConfig, args: OperationalArgs) -> Result<()> {
    let path = &config.data.tenants_csv;
    let (rows, load_report) = loader::load_tenants(path)
        .with_context(|| format!("loading tenant roster from {}", path.display()))?;
    println!(
        "Processing dataset... ({} tenants loaded, {} rows skipped)\n",
        util::format_int(load_report.loaded_rows),
        util::format_int(load_report.parse_errors)
    );

    let (default_lo, default_hi) = config.operational.default_expiry;
    let filter = TenantFilter {
        assets: if args.assets.is_empty() { None } else { Some(args.assets) },
        expiry: (
            args.expiry_min.unwrap_or(default_lo),
            args.expiry_max.unwrap_or(default_hi),
        ),
        risk_only: args.risk_only,
    };
    let visible = filter.apply(&rows);
    if visible.is_empty() {
        println!("No tenants match your filters.\n");
    } else {
        println!("Dashboard:\n");
        println!("{}\n", output::metrics_table(&metrics::operational_headline(&visible)));
    }

    let snapshot = metrics::operational_metrics(&filter, &rows, &visible);
    let portfolio = Portfolio::Operational(&visible);
    print_preview(&portfolio, &snapshot);
    println!("Sector Exposure:\n");
    output::preview_table_rows(&metrics::sector_exposure(&visible), 10);

    let out = args.out.unwrap_or_else(|| config.operational_report_path());
    write_report(&portfolio, &snapshot, &out, args.summary_json.as_deref())?;

    if let Some(csv_path) = args.export_csv {
        let mut listing = visible.clone();
        listing.sort_by_key(|r| r.lease_expiry_months);
        output::write_csv(&csv_path, &listing)
            .with_context(|| format!("exporting tenant list to {}", csv_path.display()))?;
        println!("(Tenant list exported to {})", csv_path.display());
    }
    Ok(())
}

fn run_development(config: &AppConfig, args: DevelopmentArgs) -> Result<()> {
    let path = &config.data.pipeline_csv;
    let (rows, load_report) = loader::load_pipeline(path)
        .with_context(|| format!("loading leasing pipeline from {}", path.display()))?;
    println!(
        "Processing dataset... ({} deals loaded, {} rows skipped)\n",
        util::format_int(load_report.loaded_rows),
        util::format_int(load_report.parse_errors)
    );

    let filter = PipelineFilter { min_budget: args.min_budget, simulate: args.simulate };
    let visible = filter.apply(&rows);
    if filter.simulate {
        println!("Simulation Active: projecting 100% conversion of pipeline deals.\n");
    }

    let master_plan_gla = config.development.master_plan_gla;
    println!("Dashboard:\n");
    let headline = metrics::development_headline(&visible, master_plan_gla);
    println!("{}\n", output::metrics_table(&headline));
    println!("Leasing Velocity Tracker:\n");
    output::preview_table_rows(&metrics::leasing_velocity(&visible, master_plan_gla), 20);

    let snapshot = metrics::development_metrics(&filter, &visible, master_plan_gla);
    let portfolio = Portfolio::Development(&visible);
    print_preview(&portfolio, &snapshot);
    println!("Anchor Tenant Status:\n");
    output::preview_table_rows(&metrics::anchor_tenants(&visible), 10);

    let out = args.out.unwrap_or_else(|| config.development_report_path());
    write_report(&portfolio, &snapshot, &out, args.summary_json.as_deref())
}

fn print_preview(portfolio: &Portfolio<'_>, snapshot: &MetricsSnapshot) {
    println!("Key Performance Indicators:\n");
    println!("{}\n", output::metrics_table(snapshot));
    println!("Strategic Recommendations:");
    for rec in recommend(portfolio, snapshot) {
        println!("- {}", rec);
    }
    println!();
}

fn write_report(
    portfolio: &Portfolio<'_>,
    snapshot: &MetricsSnapshot,
    out: &Path,
    summary_json: Option<&Path>,
) -> Result<()> {
    let generated_at = Local::now().naive_local();
    let bytes = render(portfolio, snapshot, generated_at).context("rendering board report")?;
    output::write_bytes(out, &bytes)
        .with_context(|| format!("writing report to {}", out.display()))?;
    info!(path = %out.display(), "report saved");
    println!("(Board report saved to {})", out.display());

    if let Some(path) = summary_json {
        let summary = summarize(portfolio, snapshot, generated_at);
        output::write_json(path, &summary)
            .with_context(|| format!("writing summary to {}", path.display()))?;
        println!("(Summary saved to {})", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let result = AppConfig::load(cli.config.as_deref())
        .context("loading configuration")
        .and_then(|config| match cli.command {
            Commands::Operational(args) => run_operational(&config, args),
            Commands::Development(args) => run_development(&config, args),
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
