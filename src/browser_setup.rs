//! Chrome/Chromium discovery and launch
//!
//! A system browser is preferred (`CHROMIUM_PATH`, then well-known install
//! locations, then `which`). When none exists a managed Chromium is
//! downloaded into the user cache directory.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use tokio::task::{self, JoinHandle};
use tracing::{error, info, trace, warn};

use crate::driver::ContextSettings;

#[cfg(target_os = "windows")]
const INSTALL_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"%LOCALAPPDATA%\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files\Chromium\Application\chrome.exe",
];

#[cfg(target_os = "macos")]
const INSTALL_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "~/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/opt/homebrew/bin/chromium",
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const INSTALL_PATHS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    "/usr/local/bin/chromium",
    "/opt/google/chrome/chrome",
];

const WHICH_CANDIDATES: &[&str] = &["chromium", "chromium-browser", "google-chrome", "chrome"];

/// Locate an installed Chrome/Chromium executable
pub fn find_browser_executable() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Using browser from CHROMIUM_PATH: {}", path.display());
            return Some(path);
        }
        warn!(
            "CHROMIUM_PATH points to a missing file: {}",
            path.display()
        );
    }

    if let Some(path) = INSTALL_PATHS
        .iter()
        .filter_map(|candidate| expand_install_path(candidate))
        .find(|path| path.exists())
    {
        info!("Found browser at: {}", path.display());
        return Some(path);
    }

    if cfg!(not(target_os = "windows")) {
        for cmd in WHICH_CANDIDATES {
            let Ok(output) = Command::new("which").arg(cmd).output() else {
                continue;
            };
            if !output.status.success() {
                continue;
            }
            let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !found.is_empty() {
                info!("Found browser using 'which {cmd}': {found}");
                return Some(PathBuf::from(found));
            }
        }
    }

    None
}

fn expand_install_path(candidate: &str) -> Option<PathBuf> {
    if let Some(rest) = candidate.strip_prefix("~/") {
        return dirs::home_dir().map(|home| home.join(rest));
    }
    if candidate.contains('%') {
        return Some(PathBuf::from(expand_windows_env_vars(candidate)));
    }
    Some(PathBuf::from(candidate))
}

/// Replace `%VAR%` tokens with environment values; unknown variables and
/// unterminated tokens are kept verbatim, `%%` becomes `%`
fn expand_windows_env_vars(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(start) = rest.find('%') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(0) => {
                result.push('%');
                rest = &after[1..];
            }
            Some(end) => {
                let name = &after[..end];
                match std::env::var(name) {
                    Ok(value) => result.push_str(&value),
                    Err(_) => {
                        result.push('%');
                        result.push_str(name);
                        result.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

/// Download a managed Chromium and return its executable path
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(|| {
            let fallback = std::env::temp_dir();
            warn!(
                "No user cache directory, downloading browser under {}",
                fallback.display()
            );
            fallback
        })
        .join("batchscrape")
        .join("chromium");

    info!("Downloading managed Chromium into {}", cache_dir.display());
    std::fs::create_dir_all(&cache_dir).context("Failed to create browser cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );
    let revision = fetcher.fetch().await.context("Failed to fetch browser")?;

    info!("Downloaded Chromium to: {}", revision.folder_path.display());
    Ok(revision.executable_path)
}

/// Launch a browser for the given context settings
///
/// Request interception is enabled so each page can apply the blocking
/// rule. The returned handler task drives the CDP connection and must stay
/// alive until the browser is closed.
pub async fn launch_browser(
    settings: &ContextSettings,
    user_data_dir: &Path,
) -> Result<(Browser, JoinHandle<()>)> {
    let chrome_path = match find_browser_executable() {
        Some(path) => path,
        None => {
            warn!("No Chrome/Chromium executable found, using a managed download");
            download_managed_browser().await?
        }
    };

    std::fs::create_dir_all(user_data_dir).context("Failed to create user data directory")?;

    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(settings.request_timeout)
        .window_size(settings.viewport.width, settings.viewport.height)
        .user_data_dir(user_data_dir)
        .chrome_executable(chrome_path)
        .enable_request_intercept();

    builder = if settings.headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    builder = builder
        .arg(format!("--user-agent={}", settings.user_agent))
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--no-sandbox")
        .arg("--disable-setuid-sandbox")
        .arg("--disable-extensions")
        .arg("--disable-notifications")
        .arg("--disable-background-networking")
        .arg("--disable-breakpad")
        .arg("--password-store=basic")
        .arg("--use-mock-keychain")
        .arg("--mute-audio");

    let config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .context("Failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let message = e.to_string();
                // chromiumoxide cannot decode every CDP message Chrome sends
                if message.contains("data did not match any variant of untagged enum Message")
                    || message.contains("Failed to deserialize WS response")
                {
                    trace!("Suppressed CDP decode error: {message}");
                } else {
                    error!("Browser handler error: {e:?}");
                }
            }
        }
        info!("Browser handler task completed");
    });

    Ok((browser, handler_task))
}
