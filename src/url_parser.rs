//! Share link parsing and link list loading.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::error;

use crate::error::{Result, ShareError};

/// Public share links look like `https://cloud.mail.ru/public/<id>`.
static PUBLIC_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://cloud\.mail\.ru/public/(.+)").expect("Invalid public URL regex")
});

/// Extract the share identifier (everything after `/public/`) from a share link.
///
/// Logs one error line and returns [`ShareError::InvalidLink`] when the link
/// is not a public share link.
///
/// # Examples
///
/// ```
/// use mailru_share::url_parser::extract_share_id;
///
/// let id = extract_share_id("https://cloud.mail.ru/public/AbCd/xYz12").unwrap();
/// assert_eq!(id, "AbCd/xYz12");
/// ```
pub fn extract_share_id(url: &str) -> Result<String> {
    let trimmed = url.trim();

    if let Some(captures) = PUBLIC_URL_REGEX.captures(trimmed) {
        if let Some(id) = captures.get(1) {
            return Ok(id.as_str().to_string());
        }
    }

    error!("Wrong link {}", url);
    Err(ShareError::InvalidLink(url.to_string()))
}

/// Keep the lines of a link list that look like URLs.
pub fn parse_link_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("http"))
        .map(str::to_string)
        .collect()
}

/// Read a link list file, one share URL per line.
pub fn read_link_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_link_list(&content))
}
