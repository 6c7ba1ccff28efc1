//! Single page processing logic
//!
//! Drives one page through the retry state machine: install handlers,
//! navigate, and on success read the title and select the main content.

use std::time::Instant;

use log::{debug, info, warn};

use super::backoff::AttemptState;
use super::content_selector::select_main_content;
use super::scrape_types::PageResult;
use crate::config::ScrapeConfig;
use crate::driver::PageHandle;

/// Fetch `url` on `page` and build its result
///
/// Navigation errors (including timeouts) are retried with exponential
/// backoff up to `config.retries()` attempts in total. Extraction never
/// fails, so a loaded page always yields a successful result.
pub async fn fetch_page<P: PageHandle>(page: &P, url: &str, config: &ScrapeConfig) -> PageResult {
    let started = Instant::now();
    let max_attempts = config.retries().max(1);
    let mut state = AttemptState::start();

    loop {
        state = match state {
            AttemptState::Attempting(attempt) => {
                debug!("Attempt {}/{max_attempts} for {url}", attempt + 1);
                match load(page, url, config).await {
                    Ok(()) => AttemptState::Succeeded,
                    Err(e) => AttemptState::after_failure(
                        attempt,
                        max_attempts,
                        config.wait_time(),
                        format!("{e:#}"),
                    ),
                }
            }
            AttemptState::Retrying { next, delay } => {
                warn!(
                    "Attempt {next}/{max_attempts} failed for {url}, retrying in {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                AttemptState::Attempting(next)
            }
            AttemptState::Succeeded => break,
            AttemptState::Failed(message) => {
                warn!("Giving up on {url} after {max_attempts} attempt(s): {message}");
                return PageResult::failed(url, message);
            }
        };
    }

    info!("Page loaded: {url} ({}ms)", started.elapsed().as_millis());

    let title = match page.title().await {
        Ok(title) => title,
        Err(e) => {
            debug!("Title unavailable for {url}: {e:#}");
            None
        }
    };
    let content = select_main_content(
        page,
        config.content_selectors(),
        config.min_content_chars(),
    )
    .await;

    PageResult::succeeded(url, title, content)
}

async fn load<P: PageHandle>(page: &P, url: &str, config: &ScrapeConfig) -> anyhow::Result<()> {
    page.install_event_handlers().await?;
    page.navigate(url, config.timeout()).await
}

/// Owns an open page and guarantees it is closed
///
/// `close()` closes it inline. If the guard is dropped instead (early
/// return, panic), the close is spawned onto the runtime.
pub struct PageGuard<P: PageHandle> {
    page: Option<P>,
    label: String,
}

impl<P: PageHandle> PageGuard<P> {
    pub fn new(page: P, label: impl Into<String>) -> Self {
        Self {
            page: Some(page),
            label: label.into(),
        }
    }

    /// Run [`fetch_page`] on the guarded page
    pub async fn fetch(&self, url: &str, config: &ScrapeConfig) -> PageResult {
        match &self.page {
            Some(page) => fetch_page(page, url, config).await,
            None => PageResult::failed(url, "page already closed"),
        }
    }

    pub async fn close(mut self) {
        if let Some(page) = self.page.take()
            && let Err(e) = page.close().await
        {
            debug!("Failed to close page for {}: {e:#}", self.label);
        }
    }
}

impl<P: PageHandle> Drop for PageGuard<P> {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };
        let label = std::mem::take(&mut self.label);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = page.close().await {
                        debug!("Deferred page close failed for {label}: {e:#}");
                    }
                });
            }
            Err(_) => warn!("No runtime to close page for {label}"),
        }
    }
}
