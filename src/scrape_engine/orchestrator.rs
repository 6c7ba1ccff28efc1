//! Batch orchestration
//!
//! Coordinates one batch with:
//! - a single shared browser context, launched up front
//! - one spawned task per URL, gated by a semaphore
//! - per-URL outcome accounting and result persistence
//! - exactly one browser shutdown once every task has been joined

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use log::{debug, error, info, warn};
use tokio::sync::Semaphore;

use super::cancel::CancellationToken;
use super::page_processor::PageGuard;
use super::progress::{NoOpProgress, ProgressReporter};
use super::scrape_types::{FetchRequest, PageResult, ScrapeError, ScrapeResult};
use super::stats::{BatchStatistics, StatisticsAccumulator};
use crate::config::ScrapeConfig;
use crate::driver::{BrowserLauncher, BrowserSession, ContextSettings};
use crate::storage::{ResultStore, persist_result};
use crate::utils::{CANCELLED_MESSAGE, SUCCESS_STATUS, result_key};

/// Fetches batches of URLs through one browser context per batch
pub struct WebScraper<L: BrowserLauncher> {
    config: Arc<ScrapeConfig>,
    launcher: L,
    store: Arc<dyn ResultStore>,
    cancel: Option<CancellationToken>,
    progress: Arc<dyn ProgressReporter>,
}

impl<L: BrowserLauncher> WebScraper<L> {
    pub fn new(config: ScrapeConfig, launcher: L, store: Arc<dyn ResultStore>) -> Self {
        Self {
            config: Arc::new(config),
            launcher,
            store,
            cancel: None,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Stop starting new pages once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Fetch every URL and return the batch statistics
    ///
    /// Per-URL failures are recorded in the statistics, never returned.
    /// `group` prefixes the storage keys of this batch's results.
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Config` when the configuration fails
    /// [`ScrapeConfig::validate`], and `ScrapeError::BrowserLaunch` when the
    /// browser context cannot be started. No URL is attempted in either case.
    pub async fn scrape_multiple(
        &self,
        urls: &[String],
        group: Option<&str>,
    ) -> ScrapeResult<BatchStatistics> {
        self.config.validate()?;

        if urls.is_empty() {
            debug!("Empty batch, browser not launched");
            return Ok(BatchStatistics::default());
        }

        let start_time = Instant::now();
        info!(
            "Scraping {} URL(s) with concurrency {}",
            urls.len(),
            self.config.concurrent_limit()
        );

        self.progress.report_initializing();
        let settings = ContextSettings::from_config(&self.config);
        let session = self
            .launcher
            .launch(&settings)
            .await
            .map_err(|e| ScrapeError::BrowserLaunch(format!("{e:#}")))?;
        let session = Arc::new(session);
        self.progress.report_browser_launched();

        let semaphore = Arc::new(Semaphore::new(self.config.concurrent_limit()));
        let stats = Arc::new(StatisticsAccumulator::new());
        let mut active_tasks = FuturesUnordered::new();

        for url in urls {
            let request = FetchRequest::new(url.clone(), group.map(str::to_string));
            let recorded = Arc::new(AtomicBool::new(false));
            let ctx = TaskContext {
                session: Arc::clone(&session),
                semaphore: Arc::clone(&semaphore),
                config: Arc::clone(&self.config),
                stats: Arc::clone(&stats),
                store: Arc::clone(&self.store),
                cancel: self.cancel.clone(),
                progress: Arc::clone(&self.progress),
                recorded: Arc::clone(&recorded),
            };

            let task = tokio::spawn(run_fetch_task(ctx, request));
            let url = url.clone();
            active_tasks.push(async move { (url, recorded, task.await) });
        }

        while let Some((url, recorded, joined)) = active_tasks.next().await {
            if let Err(e) = joined {
                error!("Task for {url} panicked: {e}");
                self.progress.report_error(&format!("Task for {url} panicked: {e}"));
                // A task that died after recording keeps its outcome
                if !recorded.swap(true, Ordering::SeqCst) {
                    stats.record_failure(&url);
                    self.progress.report_page_finished(&url, false);
                }
            }
        }

        self.progress.report_cleanup_started();
        if let Err(e) = session.close().await {
            warn!("Browser shutdown incomplete: {e:#}");
            self.progress.report_error(&format!("Browser shutdown incomplete: {e:#}"));
        }

        let snapshot = stats.snapshot();
        info!(
            "Batch finished in {}ms: {} succeeded, {} failed",
            start_time.elapsed().as_millis(),
            snapshot.successful_requests,
            snapshot.failed_requests
        );
        self.progress.report_completed(&snapshot);
        Ok(snapshot)
    }
}

/// Shared state handed to every per-URL task
struct TaskContext<S: BrowserSession> {
    session: Arc<S>,
    semaphore: Arc<Semaphore>,
    config: Arc<ScrapeConfig>,
    stats: Arc<StatisticsAccumulator>,
    store: Arc<dyn ResultStore>,
    cancel: Option<CancellationToken>,
    progress: Arc<dyn ProgressReporter>,
    recorded: Arc<AtomicBool>,
}

impl<S: BrowserSession> TaskContext<S> {
    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    fn record(&self, result: &PageResult) {
        if self.recorded.swap(true, Ordering::SeqCst) {
            return;
        }
        if result.success() {
            self.stats.record_success(result.url());
        } else {
            self.stats.record_failure(result.url());
        }
        self.progress.report_page_finished(result.url(), result.success());
    }
}

async fn run_fetch_task<S: BrowserSession>(ctx: TaskContext<S>, request: FetchRequest) {
    let url = request.url.as_str();

    if ctx.is_cancelled() {
        debug!("Skipping {url}: batch cancelled");
        ctx.record(&PageResult::failed(url, CANCELLED_MESSAGE));
        return;
    }

    let Ok(_permit) = Arc::clone(&ctx.semaphore).acquire_owned().await else {
        error!("Semaphore closed unexpectedly");
        ctx.record(&PageResult::failed(url, "concurrency gate closed"));
        return;
    };

    if ctx.is_cancelled() {
        debug!("Skipping {url}: batch cancelled while waiting");
        ctx.record(&PageResult::failed(url, CANCELLED_MESSAGE));
        return;
    }

    ctx.progress.report_page_started(url);

    let page = match ctx.session.new_page().await {
        Ok(page) => PageGuard::new(page, url),
        Err(e) => {
            warn!("Failed to open page for {url}: {e:#}");
            ctx.record(&PageResult::failed(url, format!("failed to open page: {e:#}")));
            return;
        }
    };

    let result = page.fetch(url, &ctx.config).await;
    ctx.record(&result);

    if result.success() {
        let key = result_key(
            ctx.config.folder_name(),
            request.group.as_deref(),
            SUCCESS_STATUS,
            url,
        );
        if let Err(e) = persist_result(Arc::clone(&ctx.store), key, &result).await {
            warn!("Failed to store result for {url}: {e:#}");
            ctx.progress.report_error(&format!("Failed to store result for {url}: {e:#}"));
        }
    }

    page.close().await;
}
