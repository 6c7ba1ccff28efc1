//! In-memory page over a static HTML document
//!
//! Implements [`PageHandle`] with `scraper`, so content selection can run
//! against a fixed document without a browser. Navigation is a no-op.

use std::future::Future;
use std::time::Duration;

use anyhow::{Result, anyhow};
use scraper::{Html, Selector};

use super::PageHandle;

#[derive(Debug, Clone)]
pub struct HtmlPage {
    source: String,
}

impl HtmlPage {
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            source: html.into(),
        }
    }

    // scraper::Html is not Send, so every query parses and drops the
    // document before returning
    fn query_text(&self, selector: &str) -> Result<Option<String>> {
        let selector =
            Selector::parse(selector).map_err(|e| anyhow!("invalid selector {selector:?}: {e}"))?;
        let document = Html::parse_document(&self.source);
        Ok(document
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>()))
    }
}

impl PageHandle for HtmlPage {
    fn install_event_handlers(&self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }

    fn navigate(&self, _url: &str, _timeout: Duration) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }

    fn title(&self) -> impl Future<Output = Result<Option<String>>> + Send {
        let title = self.query_text("title");
        async move { title }
    }

    fn text_content(&self, selector: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        let text = self.query_text(selector);
        async move { text }
    }

    fn close(self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
}
