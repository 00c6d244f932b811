use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wxhist::{default_data_root, IngestConfig, WeatherHistory};

/// Download and cache daily weather history for every location in a list.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// CSV file with a header row: key, region, latitude, longitude, ...
    locations: PathBuf,

    /// Cache directory [default: <user data dir>/wxhist/data]
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// First day to ingest [default: 2004-01-01]
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day to ingest [default: today]
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Number of locations ingested at the same time
    #[arg(long, default_value_t = 8)]
    concurrency: usize,

    /// Pause before every report download, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wxhist=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let data_root = match cli.data_root {
        Some(path) => path,
        None => default_data_root().context("Could not determine the user data directory")?,
    };
    let config = IngestConfig::builder()
        .data_root(data_root)
        .maybe_start_date(cli.start)
        .maybe_end_date(cli.end)
        .concurrency(cli.concurrency)
        .maybe_request_delay(cli.delay_ms.map(Duration::from_millis))
        .build();

    let history = WeatherHistory::new(config).await?;
    let report = history.run(&cli.locations).await?;

    for summary in &report.summaries {
        println!("{summary}");
    }
    for (location_id, err) in &report.unresolved {
        eprintln!("{location_id} skipped: {err}");
    }
    println!("Done with all locations");
    Ok(())
}
