//! Core configuration types for batch scraping
//!
//! `ScrapeConfig` is built once (builder or environment) and shared read-only
//! by every fetch task of a batch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::utils::{
    DEFAULT_CONCURRENT_LIMIT, DEFAULT_CONTENT_SELECTORS, DEFAULT_ELEMENTS_TO_REMOVE,
    DEFAULT_FOLDER_NAME, DEFAULT_HEADERS, DEFAULT_MIN_CONTENT_CHARS, DEFAULT_RETRIES,
    DEFAULT_TIMEOUT_MS, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, DEFAULT_WAIT_TIME_SECS,
};

/// Browser viewport applied to every page of the shared context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

/// Main configuration struct for batch scraping
///
/// Serializable for logging and reports. There is no `Deserialize`: every
/// config goes through [`ScrapeConfigBuilder::build`](super::ScrapeConfigBuilder::build).
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeConfig {
    /// Folder under which results are persisted (`<folder>/success/...`)
    pub(crate) folder_name: String,

    /// Backoff base unit between attempts.
    ///
    /// Failed attempt `n` (0-based) waits `2^n * wait_time`.
    pub(crate) wait_time: Duration,

    /// Total navigation attempts per URL. Always >= 1.
    pub(crate) retries: u32,

    /// Per-navigation-attempt timeout.
    ///
    /// Covers loading the document and waiting for the network to go idle.
    /// There is no per-task or per-batch deadline.
    pub(crate) timeout: Duration,

    /// Maximum number of pages open and navigating at once. Always >= 1.
    pub(crate) concurrent_limit: usize,

    /// Ordered content selectors, most specific first
    pub(crate) content_selectors: Vec<String>,

    /// Selectors of elements to strip before extraction (reserved)
    pub(crate) elements_to_remove: Vec<String>,

    /// Request headers; `User-Agent` is applied as the page user agent
    pub(crate) headers: BTreeMap<String, String>,

    /// A selector match is accepted when its normalized text is longer than this
    pub(crate) min_content_chars: usize,

    pub(crate) headless: bool,
    pub(crate) viewport: Viewport,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            folder_name: DEFAULT_FOLDER_NAME.to_string(),
            wait_time: Duration::from_secs(DEFAULT_WAIT_TIME_SECS),
            retries: DEFAULT_RETRIES,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            concurrent_limit: DEFAULT_CONCURRENT_LIMIT,
            content_selectors: default_content_selectors(),
            elements_to_remove: DEFAULT_ELEMENTS_TO_REMOVE
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            headers: default_headers(),
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            headless: true,
            viewport: Viewport::default(),
        }
    }
}

/// Built-in selector list as owned strings
#[must_use]
pub fn default_content_selectors() -> Vec<String> {
    DEFAULT_CONTENT_SELECTORS
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

/// Built-in request headers as an owned map
#[must_use]
pub fn default_headers() -> BTreeMap<String, String> {
    DEFAULT_HEADERS
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
