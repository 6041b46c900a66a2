//! Kalshi hourly BTC market history collector entry point.

use clap::{Parser, Subcommand};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kalshi_history::config::Config;
use kalshi_history::dataset::RunContext;
use kalshi_history::market::{parse_timestamp, CloseWindow, KalshiClient};
use kalshi_history::pipeline::run_collection;
use kalshi_history::utils::shutdown_signal;

/// Kalshi hourly BTC market history collector.
#[derive(Parser, Debug)]
#[command(name = "kalshi-history")]
#[command(about = "Collect settled Kalshi hourly BTC markets into a CSV dataset")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Days of history to collect, counted back from today.
    #[arg(long)]
    days: Option<i64>,

    /// Earliest close time to include (RFC 3339).
    #[arg(long)]
    min_close: Option<String>,

    /// Latest close time to include (RFC 3339).
    #[arg(long)]
    max_close: Option<String>,

    /// Output CSV path.
    #[arg(short, long)]
    out: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the collection pipeline (default).
    Run {
        /// Days of history to collect, counted back from today.
        #[arg(long)]
        days: Option<i64>,

        /// Earliest close time to include (RFC 3339).
        #[arg(long)]
        min_close: Option<String>,

        /// Latest close time to include (RFC 3339).
        #[arg(long)]
        max_close: Option<String>,

        /// Output CSV path.
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("kalshi_history=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Run {
            days,
            min_close,
            max_close,
            out,
        }) => cmd_run(days, min_close, max_close, out).await,
        None => cmd_run(args.days, args.min_close, args.max_close, args.out).await,
    }
}

/// Run the collection pipeline.
async fn cmd_run(
    days_override: Option<i64>,
    min_close: Option<String>,
    max_close: Option<String>,
    out_override: Option<String>,
) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(days) = days_override {
        config.lookback_days = days;
    }
    if let Some(out) = out_override {
        config.output_file = out;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let window = resolve_window(&config, min_close.as_deref(), max_close.as_deref())?;
    let client = KalshiClient::new(&config)?;
    let context = RunContext::new(&config.output_file);

    info!("========================================");
    info!("KALSHI HOURLY BTC HISTORY COLLECTOR");
    info!("========================================");
    info!("Series: {}", config.series_ticker);
    info!(
        "Close window: {} -> {}",
        describe_bound(window.min_close),
        describe_bound(window.max_close)
    );
    info!("Output: {}", context.output_path().display());
    info!("========================================");

    tokio::select! {
        outcome = run_collection(&client, &config, &window, &context) => {
            let summary = outcome?;
            info!("========================================");
            info!("COLLECTION COMPLETE");
            info!("========================================");
            info!("Markets discovered: {}", summary.markets_discovered);
            info!("Events: {}", summary.events);
            info!("Strikes analyzed: {}", summary.strikes_selected);
            info!("Strikes skipped: {}", summary.markets_skipped);
            info!("Rows written: {}", summary.rows_written);
            info!("========================================");
        }
        _ = shutdown_signal() => {
            warn!("Interrupted, saving collected rows...");
            if context.row_count() == 0 {
                info!("Nothing collected yet, no file written");
            } else {
                let written = context.flush()?;
                info!("Saved {} rows to {}", written, context.output_path().display());
            }
        }
    }

    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("KALSHI HISTORY COLLECTOR - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Build the API client (exercises the credential header)
    print!("Building API client... ");
    let client = match KalshiClient::new(&config) {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("API client construction failed"));
        }
    };

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  API Base URL: {}", client.base_url());
    println!("  Series: {}", config.series_ticker);
    println!("  Lookback: {} days", config.lookback_days);
    println!("  Page Limit: {}", config.page_limit);
    println!("  Trades Limit: {}", config.trades_limit);
    println!("  Strikes Per Event: {}", config.strikes_per_event);
    println!("  Page Delay: {}ms", config.page_delay_ms);
    println!("  Market Delay: {}ms", config.market_delay_ms);
    println!("  Output File: {}", config.output_file);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Build the close-time window from explicit CLI bounds, falling back to
/// the configured trailing lookback.
fn resolve_window(
    config: &Config,
    min_close: Option<&str>,
    max_close: Option<&str>,
) -> anyhow::Result<CloseWindow> {
    if min_close.is_none() && max_close.is_none() {
        return Ok(CloseWindow::trailing_days(
            config.lookback_days,
            OffsetDateTime::now_utc(),
        ));
    }

    let parse_bound = |label: &str, raw: Option<&str>| -> anyhow::Result<Option<OffsetDateTime>> {
        raw.map(|value| {
            parse_timestamp(value)
                .map_err(|e| anyhow::anyhow!("invalid {} '{}': {}", label, value, e))
        })
        .transpose()
    };

    Ok(CloseWindow {
        min_close: parse_bound("--min-close", min_close)?,
        max_close: parse_bound("--max-close", max_close)?,
    })
}

fn describe_bound(bound: Option<OffsetDateTime>) -> String {
    match bound {
        Some(t) => t.format(&Rfc3339).unwrap_or_else(|_| t.to_string()),
        None => "open".to_string(),
    }
}
