pub mod browser_setup;
pub mod config;
pub mod driver;
pub mod scrape_engine;
pub mod storage;
pub mod utils;

use std::path::Path;
use std::sync::Arc;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{ScrapeConfig, ScrapeConfigBuilder};
pub use driver::{
    BrowserLauncher, BrowserSession, ChromiumLauncher, ContextSettings, HtmlPage, PageHandle,
    ResourceKind, should_block,
};
pub use scrape_engine::{
    BatchStatistics, CancellationToken, FetchRequest, NoOpProgress, PageResult, ProgressReporter,
    ScrapeError, ScrapeResult, WebScraper,
};
pub use storage::{LocalStorage, ResultStore};
pub use utils::{clean_url_for_file, normalize_text, result_key};

/// Scrape `urls` with a local Chromium and store results under `output_dir`
///
/// Configuration comes from the `SCRAPER_*` environment variables.
pub async fn scrape(
    urls: &[String],
    group: Option<&str>,
    output_dir: impl AsRef<Path>,
) -> ScrapeResult<BatchStatistics> {
    let config = ScrapeConfig::from_env()?;
    let store = LocalStorage::new(output_dir.as_ref())
        .map_err(|e| ScrapeError::Storage(format!("{e:#}")))?;
    let scraper = WebScraper::new(config, ChromiumLauncher::new(), Arc::new(store));
    scraper.scrape_multiple(urls, group).await
}
