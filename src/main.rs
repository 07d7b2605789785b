//! CLI entry point for the zone ranker tool.
//!
//! Provides subcommands for analyzing a trip record CSV and exporting the
//! full report as JSON.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::io::Cursor;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use zone_ranker::{
    analysis::TripAnalysis,
    fetch::{BasicClient, fetch_bytes, maybe_gunzip},
    output::{append_summary, print_json, render_slot_table, render_zone_table},
    parser::Strictness,
    ranking::DEFAULT_TOP_N,
    report::{AnalysisReport, RunSummary},
};

#[derive(Parser)]
#[command(name = "zone_ranker")]
#[command(about = "Ranks the busiest pickup zones in trip record exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a trip CSV from a file or URL and print the ranked tables
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Number of entries per ranking
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        /// Also validate the distance and fare fields
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// CSV file to append a run summary row to
        #[arg(short, long)]
        summary: Option<String>,
    },
    /// Write the full analysis report as JSON
    Export {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Number of entries per ranking
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        /// Also validate the distance and fare fields
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/zone_ranker.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("zone_ranker.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            source,
            top,
            strict,
            summary,
        } => {
            let analysis = run_ingestion(&source, strict).await?;

            println!("=== Top {} Pickup Zones ===", top);
            print!("{}", render_zone_table(&analysis.top_zones(top)));
            println!("\n=== Top {} Busy Slots ===", top);
            print!("{}", render_slot_table(&analysis.top_busy_slots(top)));

            let stats = analysis.stats();
            info!(
                total = stats.total,
                valid = stats.valid,
                skipped = stats.skipped,
                "Run counters"
            );

            if let Some(path) = summary {
                let row = RunSummary::from_analysis(&source, &analysis);
                append_summary(&path, &row)?;
                info!(path, "Summary row appended");
            }
        }
        Commands::Export {
            source,
            top,
            strict,
            output,
        } => {
            let analysis = run_ingestion(&source, strict).await?;
            let report = AnalysisReport::build(&source, &analysis, top);

            match output {
                Some(path) => {
                    std::fs::write(&path, serde_json::to_vec_pretty(&report)?)?;
                    info!(path, "Report written");
                }
                None => print_json(&report)?,
            }
        }
    }

    Ok(())
}

/// Ingests a local path (streamed) or an HTTP source (fetched, then read in
/// memory).
#[tracing::instrument(fields(source = %source))]
async fn run_ingestion(source: &str, strict: bool) -> Result<TripAnalysis> {
    let strictness = if strict {
        Strictness::Extended
    } else {
        Strictness::Minimal
    };
    let mut analysis = TripAnalysis::with_strictness(strictness);

    if source.starts_with("http") {
        let client = BasicClient::new();
        let bytes = fetch_bytes(&client, source).await?;
        let bytes = maybe_gunzip(source, bytes)?;
        analysis.ingest_reader(Cursor::new(bytes))?;
    } else {
        analysis.ingest_path(source)?;
    }

    Ok(analysis)
}
