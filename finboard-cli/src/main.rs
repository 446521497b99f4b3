//! finboard CLI: statement dashboards and ticker price history.
//!
//! Commands:
//! - `statements` — load a spreadsheet and render the overview or a user drill-down
//! - `views` — list the selector options for a spreadsheet
//! - `ticker` — fetch a year of daily prices and render the history page

mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use finboard_core::ticker::YahooProvider;
use finboard_core::{fetch_history, selector_options, LoadCache, Selection};
use finboard_dashboard::{
    build_statement_page, build_ticker_page, DashboardConfig, Page, StatementRequest,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "finboard", about = "Financial statement and ticker price dashboards")]
struct Cli {
    /// Optional TOML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render statement pages from a spreadsheet (xlsx, xls, ods or csv).
    Statements {
        /// Spreadsheet file.
        file: PathBuf,

        /// "Overview" or a UserID. Repeat for several pages.
        #[arg(long = "view", default_value = "Overview")]
        views: Vec<String>,

        /// Print the page model as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the selector options for a spreadsheet.
    Views {
        /// Spreadsheet file.
        file: PathBuf,
    },
    /// Fetch daily price history for a symbol and render it.
    Ticker {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,

        /// Print the page model as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Raw data rows to print.
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Statements { file, views, json } => run_statements(&config, &file, &views, json),
        Commands::Views { file } => run_views(&file),
        Commands::Ticker { symbol, json, rows } => run_ticker(&config, &symbol, json, rows),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(path) => Ok(DashboardConfig::from_file(path)?),
        None => Ok(DashboardConfig::default()),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))
}

fn run_statements(
    config: &DashboardConfig,
    file: &Path,
    views: &[String],
    json: bool,
) -> Result<()> {
    let bytes = read_file(file)?;
    let cache = LoadCache::new();

    let mut pages = Vec::with_capacity(views.len());
    for view in views {
        // Each view reloads through the cache, so only the first one parses.
        let table = cache
            .load(&bytes)
            .with_context(|| format!("failed to load '{}'", file.display()))?;
        let request = StatementRequest {
            selection: view.parse::<Selection>()?,
        };
        pages.push(build_statement_page(&table, &request, &config.statements)?);
    }

    let stats = cache.stats();
    tracing::debug!(hits = stats.hits, misses = stats.misses, "load cache");

    if json {
        print_json(&pages)
    } else {
        for page in &pages {
            render::print_page(page, None)?;
        }
        Ok(())
    }
}

fn run_views(file: &Path) -> Result<()> {
    let table = LoadCache::new()
        .load(&read_file(file)?)
        .with_context(|| format!("failed to load '{}'", file.display()))?;
    for option in selector_options(&table) {
        println!("{option}");
    }
    Ok(())
}

fn run_ticker(config: &DashboardConfig, symbol: &str, json: bool, rows: usize) -> Result<()> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        bail!("ticker symbol must not be empty");
    }

    let provider = YahooProvider::new(&config.ticker.yahoo())?;
    let series = fetch_history(&provider, symbol, &config.ticker.history_request())?;
    let page = build_ticker_page(&series)?;

    if json {
        print_json(std::slice::from_ref(&page))
    } else {
        render::print_page(&page, Some(rows))
    }
}

/// One page prints as an object, several as an array.
fn print_json(pages: &[Page]) -> Result<()> {
    let out = match pages {
        [page] => serde_json::to_string_pretty(page)?,
        _ => serde_json::to_string_pretty(pages)?,
    };
    println!("{out}");
    Ok(())
}
