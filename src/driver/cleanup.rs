//! Browser shutdown and profile cleanup

use std::path::Path;

use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Result of cleanup operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    /// All cleanup operations succeeded
    Success,
    /// Some cleanup operations failed, with error details
    PartialFailure(Vec<String>),
}

impl CleanupResult {
    fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::Success
        } else {
            Self::PartialFailure(errors)
        }
    }
}

/// Close the browser, wait for its process, stop the CDP handler, and
/// remove the profile directory
///
/// The handler is aborted only after the browser has exited; aborting it
/// first would cut the connection the close command travels over.
pub async fn cleanup_browser_and_data(
    mut browser: Browser,
    handler: Option<JoinHandle<()>>,
    user_data_dir: &Path,
) -> CleanupResult {
    let mut errors = Vec::new();

    debug!(target: "batchscrape::cleanup", "Closing browser");
    if let Err(e) = browser.close().await {
        warn!(target: "batchscrape::cleanup", "Failed to close browser: {e}");
        errors.push(format!("Browser close failed: {e}"));
    }

    debug!(target: "batchscrape::cleanup", "Waiting for browser process to exit");
    if let Err(e) = browser.wait().await {
        warn!(target: "batchscrape::cleanup", "Failed to wait for browser exit: {e}");
        errors.push(format!("Browser wait failed: {e}"));
    }

    if let Some(handler) = handler {
        handler.abort();
        if let Err(e) = handler.await
            && !e.is_cancelled()
        {
            warn!(target: "batchscrape::cleanup", "Handler task failed during abort: {e}");
            errors.push(format!("Handler task failed: {e}"));
        }
    }

    if let Err(e) = remove_profile_dir(user_data_dir) {
        errors.push(e);
    }

    CleanupResult::from_errors(errors)
}

/// Remove a browser profile directory; a missing directory is not an error
pub fn remove_profile_dir(user_data_dir: &Path) -> Result<(), String> {
    match std::fs::remove_dir_all(user_data_dir) {
        Ok(()) => {
            debug!(target: "batchscrape::cleanup", "Removed profile directory {}", user_data_dir.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            warn!(target: "batchscrape::cleanup", "Failed to remove profile directory: {e}");
            Err(format!("Directory cleanup failed: {e}"))
        }
    }
}
