//! Fluent builder for `ScrapeConfig`
//!
//! Every field has a default, so the builder carries no type states; the
//! numeric invariants are checked once in `build()`.

use std::collections::BTreeMap;
use std::time::Duration;

use super::types::{ScrapeConfig, Viewport};
use crate::scrape_engine::{ScrapeError, ScrapeResult};

#[derive(Debug, Clone, Default)]
pub struct ScrapeConfigBuilder {
    inner: ScrapeConfig,
}

impl ScrapeConfig {
    /// Create a builder seeded with the default configuration
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::default()
    }
}

impl ScrapeConfigBuilder {
    #[must_use]
    pub fn folder_name(mut self, name: impl Into<String>) -> Self {
        self.inner.folder_name = name.into();
        self
    }

    /// Backoff base unit; attempt `n` waits `2^n * wait_time` after failing
    #[must_use]
    pub fn wait_time(mut self, wait_time: Duration) -> Self {
        self.inner.wait_time = wait_time;
        self
    }

    /// Total navigation attempts per URL (must be >= 1)
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.inner.retries = retries;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner.timeout = timeout;
        self
    }

    #[must_use]
    pub fn concurrent_limit(mut self, limit: usize) -> Self {
        self.inner.concurrent_limit = limit;
        self
    }

    /// Replace the content selector list (order matters, first match wins)
    #[must_use]
    pub fn content_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.content_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn elements_to_remove<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.elements_to_remove = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Replace all request headers
    #[must_use]
    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.inner.headers = headers;
        self
    }

    /// Set a single header, replacing any existing value under the same
    /// (case-insensitive) name
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.inner
            .headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.inner.headers.insert(name, value.into());
        self
    }

    #[must_use]
    pub fn min_content_chars(mut self, chars: usize) -> Self {
        self.inner.min_content_chars = chars;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.inner.headless = headless;
        self
    }

    #[must_use]
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.inner.viewport = Viewport { width, height };
        self
    }

    /// Validate and produce the configuration
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Config` when the concurrency limit or retry count
    /// is zero, or the navigation timeout is zero.
    pub fn build(self) -> ScrapeResult<ScrapeConfig> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

impl ScrapeConfig {
    /// Check the numeric invariants a batch relies on
    ///
    /// A zero concurrency limit would leave every fetch task waiting for a
    /// slot forever.
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Config` naming the first invalid field.
    pub fn validate(&self) -> ScrapeResult<()> {
        if self.concurrent_limit == 0 {
            return Err(ScrapeError::Config(
                "concurrent_limit must be at least 1".to_string(),
            ));
        }
        if self.retries == 0 {
            return Err(ScrapeError::Config("retries must be at least 1".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(ScrapeError::Config(
                "navigation timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
