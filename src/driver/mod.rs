//! Browser driver abstraction
//!
//! The fetch engine talks to the browser only through the traits in this
//! module. `chromium` implements them on top of chromiumoxide; `html`
//! provides an in-memory page over a static document for tests and offline
//! extraction.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use anyhow::Result;

use crate::config::{ScrapeConfig, Viewport};

pub mod chromium;
pub mod cleanup;
pub mod html;
pub mod interception;

pub use chromium::{ChromiumLauncher, ChromiumPage, ChromiumSession};
pub use html::HtmlPage;
pub use interception::{ResourceKind, should_block};

/// Settings for the one browser context shared by every page of a batch
#[derive(Debug, Clone)]
pub struct ContextSettings {
    pub javascript_enabled: bool,
    pub viewport: Viewport,
    pub user_agent: String,
    /// Headers sent with every request, `User-Agent` excluded
    pub extra_headers: BTreeMap<String, String>,
    pub headless: bool,
    /// Upper bound for a single CDP request
    pub request_timeout: Duration,
    /// Interception rule applied to every outgoing request
    pub block: fn(ResourceKind) -> bool,
}

impl ContextSettings {
    #[must_use]
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self {
            javascript_enabled: false,
            viewport: config.viewport(),
            user_agent: config.user_agent().to_string(),
            extra_headers: config.extra_headers(),
            headless: config.headless(),
            request_timeout: config.timeout(),
            block: should_block,
        }
    }
}

/// Starts a browser context
pub trait BrowserLauncher: Send + Sync + 'static {
    type Session: BrowserSession;

    fn launch(&self, settings: &ContextSettings)
    -> impl Future<Output = Result<Self::Session>> + Send;
}

/// A running browser context shared by all tasks of a batch
pub trait BrowserSession: Send + Sync + 'static {
    type Page: PageHandle;

    /// Open a fresh blank page in this context
    fn new_page(&self) -> impl Future<Output = Result<Self::Page>> + Send;

    /// Shut the context down. Calling it again is a no-op.
    fn close(&self) -> impl Future<Output = Result<()>> + Send;
}

/// One open page
pub trait PageHandle: Send + Sync + 'static {
    /// Register dialog and popup handlers. Idempotent.
    fn install_event_handlers(&self) -> impl Future<Output = Result<()>> + Send;

    /// Load `url` and wait for the network to go idle, failing after `timeout`
    fn navigate(&self, url: &str, timeout: Duration) -> impl Future<Output = Result<()>> + Send;

    fn title(&self) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Raw `textContent` of the first element matching `selector`,
    /// `Ok(None)` when nothing matches
    fn text_content(&self, selector: &str)
    -> impl Future<Output = Result<Option<String>>> + Send;

    fn close(self) -> impl Future<Output = Result<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_settings_from_config() {
        let config = ScrapeConfig::builder()
            .header("User-Agent", "Bot/1.0")
            .header("X-Trace", "on")
            .viewport(1024, 768)
            .build()
            .expect("valid config");

        let settings = ContextSettings::from_config(&config);
        assert!(!settings.javascript_enabled);
        assert_eq!(settings.user_agent, "Bot/1.0");
        assert_eq!(settings.viewport, Viewport { width: 1024, height: 768 });
        assert!(!settings.extra_headers.contains_key("User-Agent"));
        assert_eq!(settings.extra_headers.get("X-Trace").map(String::as_str), Some("on"));
        assert!((settings.block)(ResourceKind::Image));
        assert!(!(settings.block)(ResourceKind::Document));
    }
}
