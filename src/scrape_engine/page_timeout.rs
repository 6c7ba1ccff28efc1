//! Timeout utilities for page operations

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Run a page operation under `timeout`
///
/// Elapsing is reported as an error naming the operation, distinct from the
/// operation's own failure.
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {}ms",
            timeout.as_millis()
        )),
    }
}
