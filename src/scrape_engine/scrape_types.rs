//! Core types for batch scraping.
//!
//! Error type, per-URL request, and the per-URL result record that gets
//! persisted for successful pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for scrape operations
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Error types for batch scraping
///
/// Per-URL failures never surface here; they are recorded in the batch
/// statistics. Only configuration and browser-level problems are fatal.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The shared browser context could not be started
    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    /// Result persistence failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the context chain
        Self::Other(format!("{err:#}"))
    }
}

/// One URL to fetch, plus the optional group segment used in result keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub url: String,
    pub group: Option<String>,
}

impl FetchRequest {
    #[must_use]
    pub fn new(url: impl Into<String>, group: Option<String>) -> Self {
        Self {
            url: url.into(),
            group,
        }
    }
}

/// Outcome of fetching a single URL
///
/// On success `content` is `Some` (possibly empty) and `error_message` is
/// `None`. On failure `title` and `content` are `None` and `error_message`
/// holds a non-empty message. Fields are private so only the two
/// constructors can build a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    url: String,
    success: bool,
    created_at: DateTime<Utc>,
    title: Option<String>,
    content: Option<String>,
    error_message: Option<String>,
}

impl PageResult {
    #[must_use]
    pub fn succeeded(url: impl Into<String>, title: Option<String>, content: String) -> Self {
        Self {
            url: url.into(),
            success: true,
            created_at: Utc::now(),
            title,
            content: Some(content),
            error_message: None,
        }
    }

    /// Build a failed result; an empty message is replaced with a generic one
    #[must_use]
    pub fn failed(url: impl Into<String>, error_message: impl Into<String>) -> Self {
        let mut error_message = error_message.into();
        if error_message.trim().is_empty() {
            error_message = "unknown error".to_string();
        }
        Self {
            url: url.into(),
            success: false,
            created_at: Utc::now(),
            title: None,
            content: None,
            error_message: Some(error_message),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
