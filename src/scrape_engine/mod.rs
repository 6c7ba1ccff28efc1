//! Scrape Engine Module
//!
//! The batch fetch engine: concurrency control, retry policy, main-content
//! selection, and statistics accounting.

// Sub-modules
pub mod backoff;
pub mod cancel;
pub mod content_selector;
pub mod orchestrator;
pub mod page_processor;
pub mod page_timeout;
pub mod progress;
pub mod scrape_types;
pub mod stats;

// Re-exports for public API
pub use backoff::{AttemptState, backoff_delay};
pub use cancel::CancellationToken;
pub use content_selector::select_main_content;
pub use orchestrator::WebScraper;
pub use page_processor::{PageGuard, fetch_page};
pub use page_timeout::with_page_timeout;
pub use progress::{NoOpProgress, ProgressReporter};
pub use scrape_types::{FetchRequest, PageResult, ScrapeError, ScrapeResult};
pub use stats::{BatchStatistics, StatisticsAccumulator};
