//! Shared configuration constants for batchscrape
//!
//! Default values used by `ScrapeConfig` and the fetch engine so that the
//! same numbers are not repeated across modules.

/// Default number of pages navigating concurrently
pub const DEFAULT_CONCURRENT_LIMIT: usize = 2;

/// Default number of navigation attempts per URL (1 = no retry)
pub const DEFAULT_RETRIES: u32 = 1;

/// Default per-navigation timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

/// Default backoff base unit in seconds
///
/// Attempt `n` (0-based) that fails waits `2^n * base` before attempt `n + 1`.
pub const DEFAULT_WAIT_TIME_SECS: u64 = 1;

/// Default folder under which results are persisted
pub const DEFAULT_FOLDER_NAME: &str = "scrape";

/// Minimum normalized text length (in characters) for a selector match to
/// count as real content. A match must be strictly longer than this.
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 50;

/// Default viewport applied to every page of the shared context
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 720;

/// Maximum length of the URL-derived part of a result file name
pub const MAX_FILE_STEM_CHARS: usize = 100;

/// Folder segment for successfully scraped pages
pub const SUCCESS_STATUS: &str = "success";

/// Chrome user agent sent when the configured headers carry none
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Request headers used when none are configured
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    ("User-Agent", CHROME_USER_AGENT),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("Connection", "keep-alive"),
];

/// Main-content selectors, most specific first
pub const DEFAULT_CONTENT_SELECTORS: &[&str] = &[
    "article.main-content",
    "main#main-content",
    "div.article-body",
    "article.entry-content",
    "article",
    "main",
    ".main-content",
    ".post-content",
    ".entry-content",
    ".page-content",
    ".content",
    "[role=\"main\"]",
    "#main",
    ".body-content",
    ".site-content",
    ".container",
];

/// Elements excluded from extraction (reserved, not applied yet)
pub const DEFAULT_ELEMENTS_TO_REMOVE: &[&str] = &[
    "header", "footer", "nav", "script", "style", "iframe", ".header", ".footer", ".nav",
    ".menu", "#header", "#footer", "#nav", "#menu",
];

/// Upper bound for one blocking result write
pub const STORAGE_WRITE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Error recorded for URLs skipped after the batch was cancelled
pub const CANCELLED_MESSAGE: &str = "batch cancelled";

/// Upper bound on subscribing to a CDP event stream
pub const EVENT_SUBSCRIBE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
