//! Environment-driven configuration
//!
//! Recognized variables (all optional):
//!
//! | variable                     | meaning                              | default |
//! |------------------------------|--------------------------------------|---------|
//! | `SCRAPER_FOLDER_NAME`        | result folder                        | `scrape` |
//! | `SCRAPER_WAIT_TIME`          | backoff base, seconds                | `1` |
//! | `SCRAPER_RETRIES`            | attempts per URL                     | `1` |
//! | `SCRAPER_TIMEOUT`            | navigation timeout, milliseconds     | `20000` |
//! | `SCRAPER_CONCURRENT_LIMIT`   | pages navigating at once             | `2` |
//! | `SCRAPER_CONTENT_SELECTORS`  | comma-separated selectors            | built-in list |
//! | `SCRAPER_ELEMENTS_TO_REMOVE` | comma-separated selectors            | built-in list |
//! | `SCRAPER_HEADERS`            | JSON object of request headers       | built-in headers |
//! | `SCRAPER_MIN_CONTENT_CHARS`  | meaningfulness threshold             | `50` |
//! | `SCRAPER_HEADLESS`           | `true`/`false`                       | `true` |

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::time::Duration;

use super::types::ScrapeConfig;
use crate::scrape_engine::{ScrapeError, ScrapeResult};

const ENV_PREFIX: &str = "SCRAPER_";

impl ScrapeConfig {
    /// Load configuration from `SCRAPER_*` process environment variables
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Config` when a numeric or boolean variable does
    /// not parse, or when the resulting configuration fails validation.
    pub fn from_env() -> ScrapeResult<Self> {
        let values: HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect();
        Self::from_values(&values)
    }

    /// Load configuration from an explicit variable map
    ///
    /// Keys are the full variable names (`SCRAPER_RETRIES`, ...). Blank values
    /// count as unset.
    ///
    /// # Errors
    ///
    /// Same as [`ScrapeConfig::from_env`].
    pub fn from_values(values: &HashMap<String, String>) -> ScrapeResult<Self> {
        let get = |name: &str| {
            values
                .get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let mut builder = Self::builder();

        if let Some(folder) = get("SCRAPER_FOLDER_NAME") {
            builder = builder.folder_name(folder);
        }
        if let Some(secs) = get("SCRAPER_WAIT_TIME") {
            builder = builder.wait_time(Duration::from_secs(parse_number::<u64>(
                "SCRAPER_WAIT_TIME",
                secs,
            )?));
        }
        if let Some(retries) = get("SCRAPER_RETRIES") {
            builder = builder.retries(parse_number("SCRAPER_RETRIES", retries)?);
        }
        if let Some(ms) = get("SCRAPER_TIMEOUT") {
            builder = builder.timeout(Duration::from_millis(parse_number::<u64>(
                "SCRAPER_TIMEOUT",
                ms,
            )?));
        }
        if let Some(limit) = get("SCRAPER_CONCURRENT_LIMIT") {
            builder = builder.concurrent_limit(parse_number("SCRAPER_CONCURRENT_LIMIT", limit)?);
        }
        if let Some(selectors) = get("SCRAPER_CONTENT_SELECTORS") {
            builder = builder.content_selectors(split_list(selectors));
        }
        if let Some(selectors) = get("SCRAPER_ELEMENTS_TO_REMOVE") {
            builder = builder.elements_to_remove(split_list(selectors));
        }
        if let Some(raw) = get("SCRAPER_HEADERS") {
            match serde_json::from_str::<BTreeMap<String, String>>(raw) {
                Ok(headers) => builder = builder.headers(headers),
                Err(e) => {
                    log::warn!("Ignoring malformed SCRAPER_HEADERS ({e}), using default headers");
                }
            }
        }
        if let Some(chars) = get("SCRAPER_MIN_CONTENT_CHARS") {
            builder = builder.min_content_chars(parse_number("SCRAPER_MIN_CONTENT_CHARS", chars)?);
        }
        if let Some(flag) = get("SCRAPER_HEADLESS") {
            builder = builder.headless(parse_bool("SCRAPER_HEADLESS", flag)?);
        }

        builder.build()
    }
}

fn parse_number<T>(name: &str, raw: &str) -> ScrapeResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ScrapeError::Config(format!("{name}={raw:?} is not a valid number: {e}")))
}

fn parse_bool(name: &str, raw: &str) -> ScrapeResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ScrapeError::Config(format!(
            "{name}={raw:?} is not a valid boolean"
        ))),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
