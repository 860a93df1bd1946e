// src/urls/loader.rs
// =============================================================================
// Loads the URL list file.
//
// Example file:
//
//   # blog posts
//   https://example.com/blog/first-post
//
//   https://example.com/blog/second-post
//
// gives ["https://example.com/blog/first-post", "https://example.com/blog/second-post"].
//
// We deliberately don't validate the URLs here. A malformed entry is sent
// as-is and comes back as a failure from the API, which the report shows.
//
// Rust concepts:
// - Iterator chains: lines() -> map() -> filter() -> collect()
// - ErrorKind: telling "file missing" apart from other I/O errors
// =============================================================================

use crate::error::ConfigurationError;
use std::io::ErrorKind;
use std::path::Path;

// Reads a URL list file from disk
//
// Returns: URLs in file order, or a ConfigurationError if the file is
// missing or can't be read as UTF-8 text
pub fn load_urls(path: &Path) -> Result<Vec<String>, ConfigurationError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ConfigurationError::UrlListNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigurationError::UrlListUnreadable {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let urls = parse_url_list(&text);
    tracing::debug!(path = %path.display(), count = urls.len(), "URL list loaded");
    Ok(urls)
}

// Splits file contents into URLs
//
// Each line is trimmed, then dropped if it is empty or a '#' comment.
// Order is kept and duplicates are NOT removed.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why trim() before checking for '#'?
//    - "   # note" is still a comment, so we look at the first
//      non-whitespace character
//
// 2. What does str::trim mean inside map()?
//    - It's a function path used as a closure
//    - .map(str::trim) is the same as .map(|line| line.trim())
//
// 3. Why return Vec<String> instead of Vec<&str>?
//    - &str would borrow from `text`, which is dropped at the end of
//      load_urls(); owned Strings can outlive it
// -----------------------------------------------------------------------------
