use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use comfy_table::{Cell, Color, Table, presets::UTF8_FULL};
use configuration::{Config, LogFormat};
use core_types::Quadrant;
use indicatif::{ProgressBar, ProgressStyle};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use web_server::{AppState, DashboardView, page};

/// The main entry point for the sentiment quadrant dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = configuration::load_config(cli.global.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(format) = cli.global.log_format {
        config.logging.format = format;
    }
    // Keep the guard alive so buffered file logs are flushed on exit.
    let _guard = configuration::init_tracing(&config.logging)?;

    match cli.command {
        Commands::Serve(args) => handle_serve(args, config).await,
        Commands::Report(args) => handle_report(args, &config).await,
        Commands::Render(args) => handle_render(args, &config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Z-score scatter of the CNN Fear & Greed strength and breadth indicators.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Path to a TOML config file. Defaults to ./config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured console log format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard web server.
    Serve(ServeArgs),
    /// Fetch the feed once and print the current window.
    Report(ReportArgs),
    /// Fetch the feed once and write the chart to an SVG file.
    Render(RenderArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind (e.g. "0.0.0.0:8501"), overriding `server.host`/`server.port`.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[derive(Args)]
struct ReportArgs {
    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RenderArgs {
    /// Where to write the SVG.
    #[arg(long, short)]
    output: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(addr) = args.addr {
        config.server.host = addr.ip().to_string();
        config.server.port = addr.port();
    }
    web_server::run_server(&config).await
}

async fn handle_report(args: ReportArgs, config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let view = fetch_with_spinner(&state).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", report_table(&view));
    let latest = &view.report.latest;
    println!(
        "As of {}: {} ({})",
        view.report.as_of_date,
        latest.quadrant,
        latest.quadrant.description()
    );
    println!("Days per quadrant: {}", page::quadrant_counts(&view.report));
    if let Some(headline) = &view.headline {
        println!("Fear & Greed index: {:.0} ({})", headline.score, headline.rating);
    }
    if let Some(ratings) = page::indicator_ratings(&view) {
        println!("Feed ratings: {ratings}");
    }
    Ok(())
}

async fn handle_render(args: RenderArgs, config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let view = fetch_with_spinner(&state).await?;

    let svg = state.chart.render(&view.report);
    tokio::fs::write(&args.output, svg)
        .await
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    tracing::info!(path = %args.output.display(), as_of = %view.report.as_of_date, "Chart written.");
    println!("Wrote {} (as of {})", args.output.display(), view.report.as_of_date);
    Ok(())
}

/// Fetches and analyses the feed once, with a spinner while the request runs.
async fn fetch_with_spinner(state: &AppState) -> anyhow::Result<DashboardView> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message("Fetching sentiment feed...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = web_server::load_view(state.feed.as_ref(), &state.engine).await;
    spinner.finish_and_clear();

    result.context(state.dashboard.fallback_message.clone())
}

fn report_table(view: &DashboardView) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Date",
        "Breadth (z)",
        "Strength (z)",
        "Quadrant",
    ]);

    for p in &view.report.points {
        table.add_row(vec![
            Cell::new(p.point.date),
            Cell::new(format!("{:+.2}", p.point.z_breadth)),
            Cell::new(format!("{:+.2}", p.point.z_strength)),
            Cell::new(p.quadrant).fg(quadrant_color(p.quadrant)),
        ]);
    }
    table
}

fn quadrant_color(quadrant: Quadrant) -> Color {
    match quadrant {
        Quadrant::Greed => Color::Green,
        Quadrant::Mixed => Color::DarkYellow,
        Quadrant::Fear => Color::Red,
        Quadrant::Recovery => Color::Blue,
    }
}
