//! Result persistence
//!
//! The engine hands each successful `PageResult` to a [`ResultStore`] under
//! a key built by [`crate::utils::result_key`]. Stores are synchronous and
//! are always called from a blocking thread.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use tokio::time::timeout;
use tracing::debug;

use crate::scrape_engine::PageResult;
use crate::utils::STORAGE_WRITE_TIMEOUT;

pub mod local;

pub use local::LocalStorage;

/// Destination for persisted page results
pub trait ResultStore: Send + Sync {
    /// Store `value` as a JSON document under `key`, replacing any previous one
    fn write_json(&self, key: &str, value: &serde_json::Value) -> Result<()>;
}

/// Serialize `result` and write it through `store` on a blocking thread
///
/// The write is abandoned after a fixed timeout so a stuck filesystem cannot
/// hold a batch open.
pub async fn persist_result(
    store: Arc<dyn ResultStore>,
    key: String,
    result: &PageResult,
) -> Result<()> {
    let value = serde_json::to_value(result)?;
    let write_key = key.clone();
    let blocking_task = tokio::task::spawn_blocking(move || store.write_json(&write_key, &value));

    match timeout(STORAGE_WRITE_TIMEOUT, blocking_task).await {
        Ok(Ok(written)) => {
            written?;
            debug!("Stored result at {key}");
            Ok(())
        }
        Ok(Err(e)) => Err(anyhow!("Result write task panicked: {e}")),
        Err(_) => Err(anyhow!(
            "Result write timed out after {STORAGE_WRITE_TIMEOUT:?} for {key}"
        )),
    }
}
