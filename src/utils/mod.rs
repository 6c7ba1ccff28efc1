pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{normalize_text, normalize_text_opt, safe_truncate_chars};
pub use url_utils::{clean_url_for_file, is_valid_url, result_key};
