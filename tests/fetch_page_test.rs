//! Retry, backoff, and content selection for a single page

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use batchscrape::ScrapeConfig;
use batchscrape::driver::{BrowserLauncher, BrowserSession, ContextSettings};
use batchscrape::scrape_engine::fetch_page;
use common::{Behavior, FakeBrowser, FakePage, article_page, filler};

const URL: &str = "https://example.com/post";

async fn open_page(browser: &Arc<FakeBrowser>, config: &ScrapeConfig) -> FakePage {
    let session = browser
        .launcher()
        .launch(&ContextSettings::from_config(config))
        .await
        .expect("fake launch");
    session.new_page().await.expect("fake page")
}

fn config(retries: u32) -> ScrapeConfig {
    ScrapeConfig::builder()
        .retries(retries)
        .wait_time(Duration::from_secs(1))
        .build()
        .expect("valid config")
}

#[tokio::test(start_paused = true)]
async fn test_retries_bound_attempts_and_back_off() {
    let browser = FakeBrowser::new().on(URL, Behavior::AlwaysFail("net::ERR_TIMED_OUT".into()));
    let config = config(3);
    let page = open_page(&browser, &config).await;

    let started = tokio::time::Instant::now();
    let result = fetch_page(&page, URL, &config).await;
    let elapsed = started.elapsed();

    assert!(!result.success());
    assert_eq!(result.error_message(), Some("net::ERR_TIMED_OUT"));
    assert!(result.content().is_none());
    assert_eq!(browser.attempts(URL), 3);
    // 1s after the first failure, 2s after the second, none after the last
    assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(4), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_single_attempt_means_no_retry() {
    let browser = FakeBrowser::new().on(URL, Behavior::AlwaysFail("boom".into()));
    let config = config(1);
    let page = open_page(&browser, &config).await;

    let started = tokio::time::Instant::now();
    let result = fetch_page(&page, URL, &config).await;

    assert!(!result.success());
    assert_eq!(browser.attempts(URL), 1);
    assert!(started.elapsed() < Duration::from_millis(1));
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_recovers() {
    let browser = FakeBrowser::new().on(
        URL,
        Behavior::FailTimes(1, article_page("Recovered", &filler(120))),
    );
    let config = config(2);
    let page = open_page(&browser, &config).await;

    let result = fetch_page(&page, URL, &config).await;

    assert!(result.success());
    assert_eq!(result.title(), Some("Recovered"));
    assert_eq!(browser.attempts(URL), 2);
    // handlers are (idempotently) installed before every attempt
    assert_eq!(browser.handler_installs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_second_selector_wins_when_first_is_too_short() {
    let long = filler(200);
    let html = format!(
        "<html><head><title>T</title></head><body>\
         <article class=\"main-content\">Too short</article>\
         <main id=\"main-content\">\n\t{long}\n</main></body></html>"
    );
    let browser = FakeBrowser::new().on(URL, Behavior::Load(html));
    let config = config(1);
    let page = open_page(&browser, &config).await;

    let result = fetch_page(&page, URL, &config).await;

    assert_eq!(result.content(), Some(long.trim()));
}

#[tokio::test]
async fn test_body_fallback_is_normalized() {
    let html = "<html><head><title>Plain</title></head>\
                <body><p>Just\n\n a   short\tpage</p></body></html>";
    let browser = FakeBrowser::new().on(URL, Behavior::Load(html.into()));
    let config = config(1);
    let page = open_page(&browser, &config).await;

    let result = fetch_page(&page, URL, &config).await;

    assert!(result.success());
    assert_eq!(result.content(), Some("Just a short page"));
}

#[tokio::test]
async fn test_broken_dom_still_succeeds_with_empty_content() {
    let browser = FakeBrowser::new().on(URL, Behavior::BrokenDom);
    let config = config(1);
    let page = open_page(&browser, &config).await;

    let result = fetch_page(&page, URL, &config).await;

    assert!(result.success());
    assert_eq!(result.content(), Some(""));
    assert_eq!(result.title(), None);
    assert!(result.error_message().is_none());
}

#[tokio::test]
async fn test_custom_threshold_and_selectors() {
    let html = "<html><body><div class=\"story\">twelve chars</div><p>other</p></body></html>";
    let browser = FakeBrowser::new().on(URL, Behavior::Load(html.into()));
    let config = ScrapeConfig::builder()
        .content_selectors([".story"])
        .min_content_chars(5)
        .build()
        .expect("valid config");
    let page = open_page(&browser, &config).await;

    let result = fetch_page(&page, URL, &config).await;

    assert_eq!(result.content(), Some("twelve chars"));
}

#[tokio::test]
async fn test_page_without_text_yields_empty_content() {
    let html = "<html><head><title>Blank</title></head><body>\n   \t</body></html>";
    let browser = FakeBrowser::new().on(URL, Behavior::Load(html.into()));
    let config = config(1);
    let page = open_page(&browser, &config).await;

    let result = fetch_page(&page, URL, &config).await;

    assert!(result.success());
    assert_eq!(result.content(), Some(""));
    assert_eq!(result.title(), Some("Blank"));
}
