//! chromiumoxide-backed driver
//!
//! One `ChromiumSession` owns the browser process, its CDP handler task, a
//! popup watcher, and a throwaway profile directory. Pages opened from it
//! carry the context settings (scripts off, viewport, user agent, headers)
//! and a request-interception listener applying the blocking rule.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetScriptExecutionDisabledParams,
};
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EventRequestPaused, FailRequestParams,
};
use chromiumoxide::cdp::browser_protocol::network::{
    ErrorReason, Headers, SetExtraHttpHeadersParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, EventLifecycleEvent, HandleJavaScriptDialogParams,
    SetLifecycleEventsEnabledParams,
};
use chromiumoxide::cdp::browser_protocol::target::{CloseTargetParams, EventTargetCreated};
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::cleanup::{CleanupResult, cleanup_browser_and_data, remove_profile_dir};
use super::{BrowserLauncher, BrowserSession, ContextSettings, PageHandle, ResourceKind};
use crate::browser_setup::launch_browser;
use crate::utils::EVENT_SUBSCRIBE_TIMEOUT;

/// Lifecycle event Chrome emits once the network has been quiet for 500ms
const NETWORK_IDLE_EVENT: &str = "networkIdle";
/// Lifecycle event that starts every new document load
const INIT_EVENT: &str = "init";

/// Launches a local Chrome/Chromium for each batch
///
/// Every batch gets a fresh profile directory under the system temp dir.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromiumLauncher;

impl ChromiumLauncher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Subscribe to a CDP event stream, bounded by `EVENT_SUBSCRIBE_TIMEOUT`
async fn subscribe<T, E, F>(listen: F, what: &str) -> Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    tokio::time::timeout(EVENT_SUBSCRIBE_TIMEOUT, listen)
        .await
        .map_err(|_| {
            anyhow!(
                "Timed out after {}s subscribing to {what}",
                EVENT_SUBSCRIBE_TIMEOUT.as_secs()
            )
        })?
        .with_context(|| format!("Failed to subscribe to {what}"))
}

impl BrowserLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self, settings: &ContextSettings) -> Result<ChromiumSession> {
        let user_data_dir = std::env::temp_dir().join(format!("batchscrape_chrome_{}", uuid::Uuid::new_v4()));

        let (browser, handler) = match launch_browser(settings, &user_data_dir).await {
            Ok(launched) => launched,
            Err(e) => {
                let _ = remove_profile_dir(&user_data_dir);
                return Err(e);
            }
        };
        info!("Browser launched with profile {}", user_data_dir.display());

        let popup_events =
            subscribe(browser.event_listener::<EventTargetCreated>(), "target creation").await;
        let browser = Arc::new(RwLock::new(Some(browser)));

        let popup_watcher = match popup_events {
            Ok(mut created) => {
                let browser_ref = Arc::clone(&browser);
                Some(tokio::spawn(async move {
                    while let Some(event) = created.next().await {
                        let target = &event.target_info;
                        if target.r#type != "page" || target.opener_id.is_none() {
                            continue;
                        }
                        debug!("Closing popup target {:?}", target.target_id);
                        let guard = browser_ref.read().await;
                        let Some(browser) = guard.as_ref() else {
                            break;
                        };
                        if let Err(e) = browser
                            .execute(CloseTargetParams::new(target.target_id.clone()))
                            .await
                        {
                            debug!("Failed to close popup: {e}");
                        }
                    }
                }))
            }
            Err(e) => {
                warn!("Popup watcher unavailable: {e:#}");
                None
            }
        };

        Ok(ChromiumSession {
            browser,
            handler: Mutex::new(Some(handler)),
            popup_watcher: Mutex::new(popup_watcher),
            user_data_dir,
            settings: settings.clone(),
        })
    }
}

pub struct ChromiumSession {
    browser: Arc<RwLock<Option<Browser>>>,
    handler: Mutex<Option<JoinHandle<()>>>,
    popup_watcher: Mutex<Option<JoinHandle<()>>>,
    user_data_dir: PathBuf,
    settings: ContextSettings,
}

impl ChromiumSession {
    async fn configure_page(&self, page: &Page) -> Result<Vec<JoinHandle<()>>> {
        let settings = &self.settings;

        page.execute(SetScriptExecutionDisabledParams::new(
            !settings.javascript_enabled,
        ))
        .await
        .context("Failed to disable scripts")?;

        page.execute(SetDeviceMetricsOverrideParams::new(
            i64::from(settings.viewport.width),
            i64::from(settings.viewport.height),
            1.0,
            false,
        ))
        .await
        .context("Failed to set viewport")?;

        page.execute(SetUserAgentOverrideParams::new(settings.user_agent.clone()))
            .await
            .context("Failed to set user agent")?;

        if !settings.extra_headers.is_empty() {
            let headers = serde_json::to_value(&settings.extra_headers)
                .context("Failed to encode extra headers")?;
            page.execute(SetExtraHttpHeadersParams::new(Headers::new(headers)))
                .await
                .context("Failed to set extra headers")?;
        }

        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await
            .context("Failed to enable lifecycle events")?;

        let mut paused =
            subscribe(page.event_listener::<EventRequestPaused>(), "paused requests").await?;
        let block = settings.block;
        let intercept_page = page.clone();
        let interceptor = tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let kind = ResourceKind::from(&event.resource_type);
                let outcome = if block(kind) {
                    intercept_page
                        .execute(FailRequestParams::new(
                            event.request_id.clone(),
                            ErrorReason::BlockedByClient,
                        ))
                        .await
                        .map(|_| ())
                } else {
                    intercept_page
                        .execute(ContinueRequestParams::new(event.request_id.clone()))
                        .await
                        .map(|_| ())
                };
                if let Err(e) = outcome {
                    debug!("Interception reply failed for {}: {e}", event.request.url);
                }
            }
        });

        Ok(vec![interceptor])
    }
}

impl BrowserSession for ChromiumSession {
    type Page = ChromiumPage;

    async fn new_page(&self) -> Result<ChromiumPage> {
        let page = {
            let guard = self.browser.read().await;
            let browser = guard
                .as_ref()
                .ok_or_else(|| anyhow!("browser session already closed"))?;
            browser
                .new_page("about:blank")
                .await
                .context("Failed to open page")?
        };

        match self.configure_page(&page).await {
            Ok(listeners) => Ok(ChromiumPage {
                page,
                listeners: Mutex::new(listeners),
                handlers_installed: AtomicBool::new(false),
            }),
            Err(e) => {
                if let Err(close_err) = page.close().await {
                    debug!("Failed to close unconfigured page: {close_err}");
                }
                Err(e)
            }
        }
    }

    async fn close(&self) -> Result<()> {
        let Some(browser) = self.browser.write().await.take() else {
            return Ok(());
        };

        if let Some(watcher) = self.popup_watcher.lock().take() {
            watcher.abort();
        }
        let handler = self.handler.lock().take();

        match cleanup_browser_and_data(browser, handler, &self.user_data_dir).await {
            CleanupResult::Success => {
                info!("Browser closed");
                Ok(())
            }
            CleanupResult::PartialFailure(errors) => {
                Err(anyhow!("browser cleanup incomplete: {}", errors.join("; ")))
            }
        }
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        // Only reached without close(): the process dies with the handler
        if let Some(watcher) = self.popup_watcher.get_mut().take() {
            watcher.abort();
        }
        if let Some(handler) = self.handler.get_mut().take() {
            warn!("Browser session dropped without close()");
            handler.abort();
            let _ = remove_profile_dir(&self.user_data_dir);
        }
    }
}

pub struct ChromiumPage {
    page: Page,
    listeners: Mutex<Vec<JoinHandle<()>>>,
    handlers_installed: AtomicBool,
}

impl ChromiumPage {
    async fn wait_for_network_idle(&self, url: &str) -> Result<()> {
        let main_frame = self
            .page
            .mainframe()
            .await
            .context("Failed to resolve main frame")?;
        let mut lifecycle = subscribe(
            self.page.event_listener::<EventLifecycleEvent>(),
            "lifecycle events",
        )
        .await?;

        self.page
            .goto(url)
            .await
            .with_context(|| format!("Navigation to {url} failed"))?;

        let mut navigation_started = false;
        while let Some(event) = lifecycle.next().await {
            if main_frame.as_ref().is_some_and(|id| *id != event.frame_id) {
                continue;
            }
            match event.name.as_str() {
                INIT_EVENT => navigation_started = true,
                NETWORK_IDLE_EVENT if navigation_started => return Ok(()),
                _ => {}
            }
        }
        Err(anyhow!("lifecycle events ended before network idle"))
    }
}

impl PageHandle for ChromiumPage {
    async fn install_event_handlers(&self) -> Result<()> {
        if self.handlers_installed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut dialogs = match subscribe(
            self.page.event_listener::<EventJavascriptDialogOpening>(),
            "dialogs",
        )
        .await
        {
            Ok(stream) => stream,
            Err(e) => {
                self.handlers_installed.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let page = self.page.clone();
        let dismisser = tokio::spawn(async move {
            while let Some(dialog) = dialogs.next().await {
                debug!("Dismissing {:?} dialog: {}", dialog.r#type, dialog.message);
                if let Err(e) = page.execute(HandleJavaScriptDialogParams::new(false)).await {
                    debug!("Failed to dismiss dialog: {e}");
                }
            }
        });
        self.listeners.lock().push(dismisser);
        Ok(())
    }

    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        crate::scrape_engine::with_page_timeout(
            self.wait_for_network_idle(url),
            timeout,
            "Navigation",
        )
        .await
    }

    async fn title(&self) -> Result<Option<String>> {
        self.page.get_title().await.context("Failed to read title")
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .with_context(|| format!("Query {selector:?} failed"))?;
        let Some(element) = elements.into_iter().next() else {
            return Ok(None);
        };
        let returned = element
            .call_js_fn("function() { return this.textContent; }", false)
            .await
            .with_context(|| format!("Reading text of {selector:?} failed"))?;
        Ok(returned
            .result
            .value
            .and_then(|value| value.as_str().map(str::to_string)))
    }

    async fn close(self) -> Result<()> {
        for listener in self.listeners.lock().drain(..) {
            listener.abort();
        }
        self.page
            .clone()
            .close()
            .await
            .context("Failed to close page")
    }
}

impl Drop for ChromiumPage {
    fn drop(&mut self) {
        for listener in self.listeners.get_mut().drain(..) {
            listener.abort();
        }
    }
}
