//! Getter methods for `ScrapeConfig`

use std::collections::BTreeMap;
use std::time::Duration;

use super::types::{ScrapeConfig, Viewport};
use crate::utils::CHROME_USER_AGENT;

impl ScrapeConfig {
    #[must_use]
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    #[must_use]
    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }

    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn concurrent_limit(&self) -> usize {
        self.concurrent_limit
    }

    #[must_use]
    pub fn content_selectors(&self) -> &[String] {
        &self.content_selectors
    }

    #[must_use]
    pub fn elements_to_remove(&self) -> &[String] {
        &self.elements_to_remove
    }

    #[must_use]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// The `User-Agent` header (matched case-insensitively), or the built-in
    /// Chrome user agent when none is configured
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("user-agent"))
            .map_or(CHROME_USER_AGENT, |(_, value)| value.as_str())
    }

    /// Every configured header except `User-Agent`, which is applied separately
    #[must_use]
    pub fn extra_headers(&self) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("user-agent"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    #[must_use]
    pub fn min_content_chars(&self) -> usize {
        self.min_content_chars
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// True when wait time, retries, and timeout are all positive
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.wait_time.is_zero() && self.retries > 0 && !self.timeout.is_zero()
    }
}
