//! Progress reporting abstraction for batch scraping
//!
//! Defines the `ProgressReporter` trait for lifecycle event reporting
//! and provides a no-op implementation for simple use cases.

use super::stats::BatchStatistics;

/// Trait for reporting batch progress at key lifecycle events
///
/// Callbacks for individual pages arrive from concurrent tasks in no
/// particular order.
pub trait ProgressReporter: Send + Sync {
    /// Report that the browser is being launched
    fn report_initializing(&self);

    /// Report that the browser has launched successfully
    fn report_browser_launched(&self);

    /// Report that a task obtained its slot and is opening a page
    fn report_page_started(&self, url: &str);

    /// Report the final outcome of one URL
    fn report_page_finished(&self, url: &str, success: bool);

    /// Report that browser shutdown has started
    fn report_cleanup_started(&self);

    /// Report that the batch is complete
    fn report_completed(&self, stats: &BatchStatistics);

    /// Report a non-fatal error
    fn report_error(&self, error: &str);
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_initializing(&self) {}

    #[inline(always)]
    fn report_browser_launched(&self) {}

    #[inline(always)]
    fn report_page_started(&self, _url: &str) {}

    #[inline(always)]
    fn report_page_finished(&self, _url: &str, _success: bool) {}

    #[inline(always)]
    fn report_cleanup_started(&self) {}

    #[inline(always)]
    fn report_completed(&self, _stats: &BatchStatistics) {}

    #[inline(always)]
    fn report_error(&self, _error: &str) {}
}
