// batchscrape CLI
//
// Fetches the given URLs with a local Chromium, stores successful pages as
// JSON under the output directory, and prints the batch statistics.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Fetch a batch of web pages and extract their main text
#[derive(Debug, Parser)]
#[command(name = "batchscrape", version)]
struct Cli {
    /// Path segment grouping this batch's results (default: today's UTC date, YYYY/MM/DD)
    #[arg(long)]
    group: Option<String>,

    /// Directory results are written to
    #[arg(long, default_value = "output")]
    output: std::path::PathBuf,

    /// URLs to fetch
    #[arg(required = true)]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    for url in &cli.urls {
        if !batchscrape::utils::is_valid_url(url) {
            tracing::warn!("{url} is not an http(s) URL, it will most likely fail");
        }
    }

    let group = cli
        .group
        .unwrap_or_else(|| chrono::Utc::now().format("%Y/%m/%d").to_string());

    let stats = batchscrape::scrape(&cli.urls, Some(group.as_str()), &cli.output)
        .await
        .context("Batch failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("Failed to encode statistics")?
    );
    Ok(())
}
