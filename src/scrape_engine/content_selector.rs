//! Main-content selection
//!
//! Walks the configured selectors in order and keeps the first one whose
//! normalized text is long enough to be real content. Pages matching none
//! fall back to the whole `body`. Selection never fails; the worst case is
//! an empty string.

use log::{debug, info};

use crate::driver::PageHandle;
use crate::utils::normalize_text_opt;

const FALLBACK_SELECTOR: &str = "body";

/// Pick the main text of `page`
///
/// A selector is accepted when its first match's normalized text is
/// strictly longer than `min_chars` characters.
pub async fn select_main_content<P: PageHandle>(
    page: &P,
    selectors: &[String],
    min_chars: usize,
) -> String {
    for selector in selectors {
        let selector = selector.trim();
        if selector.is_empty() {
            continue;
        }

        match page.text_content(selector).await {
            Ok(Some(raw)) => {
                let text = normalize_text_opt(Some(&raw));
                let chars = text.chars().count();
                if chars > min_chars {
                    info!("Content selected with {selector:?} ({chars} chars)");
                    return text;
                }
                debug!("Selector {selector:?} matched only {chars} chars");
            }
            Ok(None) => debug!("Selector {selector:?} matched nothing"),
            Err(e) => debug!("Selector {selector:?} failed: {e:#}"),
        }
    }

    match page.text_content(FALLBACK_SELECTOR).await {
        Ok(text) => {
            debug!("No selector matched, using body text");
            normalize_text_opt(text.as_deref())
        }
        Err(e) => {
            debug!("Body text unavailable: {e:#}");
            String::new()
        }
    }
}
