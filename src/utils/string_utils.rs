//! Text normalization and UTF-8-safe truncation
//!
//! Extracted page text carries layout noise (indentation, line breaks,
//! tab runs). `normalize_text` turns it into a single line of words.

/// Collapse layout whitespace into single spaces.
///
/// Tabs and newlines become spaces, any run of whitespace collapses to one
/// space, and leading/trailing whitespace is trimmed.
///
/// # Examples
/// ```
/// # use batchscrape::utils::string_utils::normalize_text;
/// assert_eq!(normalize_text("  Hello  \n  World  \t  "), "Hello World");
/// assert_eq!(normalize_text(""), "");
/// ```
pub fn normalize_text(text: &str) -> String {
    // split_whitespace covers '\t' and '\n' as well as Unicode spaces
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// `normalize_text` for text that may be absent; `None` yields `""`.
#[inline]
pub fn normalize_text_opt(text: Option<&str>) -> String {
    text.map(normalize_text).unwrap_or_default()
}

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// Respects UTF-8 character boundaries and never panics on multi-byte input.
///
/// # Examples
/// ```
/// # use batchscrape::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("🎉🎊🎈", 2), "🎉🎊");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}
