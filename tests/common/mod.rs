//! Test utilities and in-memory browser fakes for the batchscrape test suite

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use parking_lot::Mutex;

use batchscrape::driver::{BrowserLauncher, BrowserSession, ContextSettings, HtmlPage, PageHandle};
use batchscrape::storage::ResultStore;

/// How a fake page reacts to navigating to a given URL
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Behavior {
    /// Loads the document
    Load(String),
    /// Fails the first `n` navigations, then loads the document
    FailTimes(u32, String),
    /// Every navigation fails with this message
    AlwaysFail(String),
    /// Navigation succeeds but every DOM query errors
    BrokenDom,
    /// Navigation panics
    Panic,
}

/// Shared observation point for everything a fake browser does
#[derive(Debug, Default)]
pub struct FakeBrowser {
    behaviors: Mutex<HashMap<String, Behavior>>,
    delay: Mutex<Duration>,
    attempts: Mutex<HashMap<String, u32>>,
    settings: Mutex<Option<ContextSettings>>,
    fail_launch: AtomicBool,
    page_open_failures: AtomicUsize,
    pub launches: AtomicUsize,
    pub session_closes: AtomicUsize,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
    open_pages: AtomicUsize,
    pub peak_open_pages: AtomicUsize,
    pub handler_installs: AtomicUsize,
}

#[allow(dead_code)]
impl FakeBrowser {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(self: &Arc<Self>, url: &str, behavior: Behavior) -> Arc<Self> {
        self.behaviors.lock().insert(url.to_string(), behavior);
        Arc::clone(self)
    }

    /// Every navigation takes this long before resolving
    pub fn with_navigation_delay(self: &Arc<Self>, delay: Duration) -> Arc<Self> {
        *self.delay.lock() = delay;
        Arc::clone(self)
    }

    pub fn failing_launch(self: &Arc<Self>) -> Arc<Self> {
        self.fail_launch.store(true, Ordering::SeqCst);
        Arc::clone(self)
    }

    /// The next `n` page opens fail
    pub fn failing_page_opens(self: &Arc<Self>, n: usize) -> Arc<Self> {
        self.page_open_failures.store(n, Ordering::SeqCst);
        Arc::clone(self)
    }

    pub fn launcher(self: &Arc<Self>) -> FakeLauncher {
        FakeLauncher {
            browser: Arc::clone(self),
        }
    }

    pub fn attempts(&self, url: &str) -> u32 {
        self.attempts.lock().get(url).copied().unwrap_or(0)
    }

    pub fn total_attempts(&self) -> u32 {
        self.attempts.lock().values().sum()
    }

    pub fn launched_settings(&self) -> Option<ContextSettings> {
        self.settings.lock().clone()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub struct FakeLauncher {
    browser: Arc<FakeBrowser>,
}

impl BrowserLauncher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self, settings: &ContextSettings) -> Result<FakeSession> {
        self.browser.launches.fetch_add(1, Ordering::SeqCst);
        if self.browser.fail_launch.load(Ordering::SeqCst) {
            bail!("chrome executable not found");
        }
        *self.browser.settings.lock() = Some(settings.clone());
        Ok(FakeSession {
            browser: Arc::clone(&self.browser),
        })
    }
}

pub struct FakeSession {
    browser: Arc<FakeBrowser>,
}

impl BrowserSession for FakeSession {
    type Page = FakePage;

    async fn new_page(&self) -> Result<FakePage> {
        let browser = &self.browser;
        if browser
            .page_open_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            bail!("target crashed");
        }

        browser.pages_opened.fetch_add(1, Ordering::SeqCst);
        let open = browser.open_pages.fetch_add(1, Ordering::SeqCst) + 1;
        browser.peak_open_pages.fetch_max(open, Ordering::SeqCst);

        Ok(FakePage {
            browser: Arc::clone(browser),
            document: Mutex::new(None),
            broken: AtomicBool::new(false),
        })
    }

    async fn close(&self) -> Result<()> {
        self.browser.session_closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakePage {
    browser: Arc<FakeBrowser>,
    document: Mutex<Option<HtmlPage>>,
    broken: AtomicBool,
}

impl FakePage {
    fn loaded(&self) -> Result<HtmlPage> {
        if self.broken.load(Ordering::SeqCst) {
            bail!("Execution context was destroyed");
        }
        self.document
            .lock()
            .clone()
            .ok_or_else(|| anyhow!("no document loaded"))
    }
}

impl PageHandle for FakePage {
    async fn install_event_handlers(&self) -> Result<()> {
        self.browser.handler_installs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<()> {
        let attempt = {
            let mut attempts = self.browser.attempts.lock();
            let count = attempts.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let delay = *self.browser.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let behavior = self
            .browser
            .behaviors
            .lock()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Behavior::Load(article_page("Untitled", &filler(80))));

        match behavior {
            Behavior::Load(html) => {
                *self.document.lock() = Some(HtmlPage::new(html));
                Ok(())
            }
            Behavior::FailTimes(n, html) if attempt > n => {
                *self.document.lock() = Some(HtmlPage::new(html));
                Ok(())
            }
            Behavior::FailTimes(..) => Err(anyhow!("net::ERR_CONNECTION_RESET (attempt {attempt})")),
            Behavior::AlwaysFail(message) => Err(anyhow!(message)),
            Behavior::BrokenDom => {
                self.broken.store(true, Ordering::SeqCst);
                Ok(())
            }
            Behavior::Panic => panic!("renderer exploded on {url}"),
        }
    }

    async fn title(&self) -> Result<Option<String>> {
        self.loaded()?.title().await
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        self.loaded()?.text_content(selector).await
    }

    async fn close(self) -> Result<()> {
        self.browser.open_pages.fetch_sub(1, Ordering::SeqCst);
        self.browser.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory result store
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<String, serde_json::Value>>,
    fail_writes: AtomicBool,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let store = Self::default();
        store.fail_writes.store(true, Ordering::SeqCst);
        Arc::new(store)
    }

    pub fn keys(&self) -> Vec<String> {
        self.documents.lock().keys().cloned().collect()
    }

    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.documents.lock().get(key).cloned()
    }
}

impl ResultStore for MemoryStore {
    fn write_json(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("disk full");
        }
        self.documents.lock().insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// `n` characters of readable filler text
#[allow(dead_code)]
pub fn filler(n: usize) -> String {
    "lorem ipsum dolor sit amet ".chars().cycle().take(n).collect::<String>()
}

/// A page with navigation chrome around an `<article>`
#[allow(dead_code)]
pub fn article_page(title: &str, article: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>{title}</title></head>
<body>
    <nav>Home | About | Contact</nav>
    <article>
        {article}
    </article>
    <footer>Copyright</footer>
</body>
</html>"#
    )
}

#[allow(dead_code)]
pub fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|u| (*u).to_string()).collect()
}
