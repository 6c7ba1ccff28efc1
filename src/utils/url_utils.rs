//! URL-to-file-name utilities.
//!
//! Successful page results are persisted under a key derived from the URL.
//! The derivation is deterministic so re-running a batch overwrites the same
//! files instead of piling up duplicates.

use super::constants::MAX_FILE_STEM_CHARS;
use super::string_utils::safe_truncate_chars;

/// Convert a URL into a readable file stem.
///
/// The scheme is dropped, query and fragment are removed from the path, dots
/// in the host become dashes, host and path are joined, `/` and `_` become
/// dashes, dash runs collapse, and the result is cut to 100 characters.
///
/// ```
/// # use batchscrape::utils::url_utils::clean_url_for_file;
/// assert_eq!(
///     clean_url_for_file("https://www.example.com/blog/my_post?id=3#top"),
///     "www-example-com-blog-my-post"
/// );
/// assert_eq!(clean_url_for_file(""), "unnamed");
/// ```
#[must_use]
pub fn clean_url_for_file(url: &str) -> String {
    if url.is_empty() {
        return "unnamed".to_string();
    }

    let without_scheme = url.rsplit("://").next().unwrap_or(url).replace("&amp;", "&");

    let (host, path) = match without_scheme.split_once('/') {
        Some((host, rest)) => {
            let path = rest.split('?').next().unwrap_or_default();
            let path = path.split('#').next().unwrap_or_default();
            (host, path)
        }
        None => (without_scheme.as_str(), ""),
    };

    let host = host.replace('.', "-");
    let joined = if path.is_empty() {
        host
    } else {
        format!("{host}--{path}")
    };
    let joined = joined.replace(['/', '_'], "-");

    let collapsed = joined
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    safe_truncate_chars(&collapsed, MAX_FILE_STEM_CHARS).to_string()
}

/// Storage key for a page result.
///
/// Layout: `[<group>/]<folder>/<status>/<clean-url>_scraped.json`.
#[must_use]
pub fn result_key(folder_name: &str, group: Option<&str>, status: &str, url: &str) -> String {
    let folder = match group.map(|g| g.trim_matches('/')).filter(|g| !g.is_empty()) {
        Some(group) => format!("{group}/{folder_name}/{status}"),
        None => format!("{folder_name}/{status}"),
    };
    format!("{folder}/{}_scraped.json", clean_url_for_file(url))
}

/// Check if a URL is an absolute http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    match url::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
