//! Configuration module for batch scraping
//!
//! This module provides the `ScrapeConfig` struct, its builder, and an
//! environment loader for the `SCRAPER_*` variables.

// Sub-modules
pub mod builder;
pub mod env;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::ScrapeConfigBuilder;
pub use types::{ScrapeConfig, Viewport, default_content_selectors, default_headers};
