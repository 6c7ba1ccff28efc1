//! Configuration through the public API

use std::collections::HashMap;
use std::time::Duration;

use batchscrape::config::default_content_selectors;
use batchscrape::{ScrapeConfig, ScrapeError};

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn test_default_selector_order() {
    let selectors = default_content_selectors();
    assert_eq!(selectors.first().map(String::as_str), Some("article.main-content"));
    assert_eq!(selectors.last().map(String::as_str), Some(".container"));
    let article = selectors.iter().position(|s| s == "article");
    let main = selectors.iter().position(|s| s == "main");
    assert!(article < main, "article is tried before main");
}

#[test]
fn test_builder_and_environment_agree() {
    let built = ScrapeConfig::builder()
        .retries(3)
        .concurrent_limit(4)
        .timeout(Duration::from_millis(7500))
        .build()
        .expect("valid builder config");
    let loaded = ScrapeConfig::from_values(&vars(&[
        ("SCRAPER_RETRIES", "3"),
        ("SCRAPER_CONCURRENT_LIMIT", "4"),
        ("SCRAPER_TIMEOUT", "7500"),
    ]))
    .expect("valid environment config");

    assert_eq!(built.retries(), loaded.retries());
    assert_eq!(built.concurrent_limit(), loaded.concurrent_limit());
    assert_eq!(built.timeout(), loaded.timeout());
}

#[test]
fn test_blank_values_count_as_unset() {
    let config = ScrapeConfig::from_values(&vars(&[
        ("SCRAPER_RETRIES", "  "),
        ("SCRAPER_FOLDER_NAME", ""),
    ]))
    .expect("blank values ignored");
    assert_eq!(config.retries(), 1);
    assert_eq!(config.folder_name(), "scrape");
}

#[test]
fn test_invalid_boolean_is_rejected() {
    let err = ScrapeConfig::from_values(&vars(&[("SCRAPER_HEADLESS", "maybe")]))
        .expect_err("not a boolean");
    assert!(matches!(err, ScrapeError::Config(_)));
}

#[test]
fn test_zero_wait_time_is_not_configured() {
    let config = ScrapeConfig::builder()
        .wait_time(Duration::ZERO)
        .build()
        .expect("zero backoff is allowed");
    assert!(!config.is_configured());
}

#[test]
fn test_config_serializes() {
    let config = ScrapeConfig::default();
    let json = serde_json::to_value(&config).expect("serializes");
    assert_eq!(json["retries"], 1);
    assert_eq!(json["concurrent_limit"], 2);
}

#[test]
fn test_built_configs_pass_validation() {
    ScrapeConfig::default()
        .validate()
        .expect("defaults are valid");
    let loaded = ScrapeConfig::from_values(&vars(&[("SCRAPER_CONCURRENT_LIMIT", "1")]))
        .expect("valid environment config");
    loaded.validate().expect("loaded config is valid");

    let err = ScrapeConfig::from_values(&vars(&[("SCRAPER_CONCURRENT_LIMIT", "0")]))
        .expect_err("zero concurrency rejected");
    assert!(matches!(err, ScrapeError::Config(ref msg) if msg.contains("concurrent_limit")));
}
