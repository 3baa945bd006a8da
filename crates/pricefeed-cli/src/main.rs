//! pricefeed - Entry Point
//!
//! Prints one comma-separated line of USD prices for the symbols given on
//! the command line. On failure prints the reason to stderr and exits 1.

use anyhow::Result;
use clap::Parser;
use pricefeed_cli::AppConfig;
use std::process::ExitCode;
use tracing::info;

/// Multi-source price oracle aggregator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Asset symbols, case-sensitive (e.g. ETH USDT)
    symbols: Vec<String>,

    /// Configuration file path (can also be set via PRICEFEED_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Primary source, overrides the configured one
    #[arg(short, long)]
    source: Option<String>,

    /// Peg-rate fan-out deadline in milliseconds
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Write Prometheus metrics to stderr after the run
    #[arg(long)]
    dump_metrics: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize TLS crypto provider (must be before any WS connections)
    pricefeed_ws::init_crypto();

    let args = Args::parse();

    let outcome = run(&args).await;

    if args.dump_metrics {
        match pricefeed_telemetry::Metrics::gather_text() {
            Ok(text) => eprint!("{text}"),
            Err(e) => eprintln!("{e}"),
        }
    }

    match outcome {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<String> {
    // CLI arg > PRICEFEED_CONFIG env var > config/default.toml > defaults
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };
    if let Some(source) = &args.source {
        config.primary = source.clone();
    }
    if let Some(deadline_ms) = args.deadline_ms {
        config.peg.deadline_ms = deadline_ms;
    }

    pricefeed_telemetry::init_logging(&config.telemetry.log_level)?;
    info!(
        primary = %config.primary,
        symbols = args.symbols.len(),
        "Starting pricefeed v{}",
        env!("CARGO_PKG_VERSION")
    );

    Ok(pricefeed_cli::run_once(&config, &args.symbols).await?)
}
