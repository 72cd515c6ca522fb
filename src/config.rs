//! Run configuration shared by every request the client makes.

use std::path::PathBuf;
use std::time::Duration;

/// Base URL for the Cloud Mail.ru web API.
pub const DEFAULT_API_BASE: &str = "https://cloud.mail.ru/api/v2";

/// Prefix of public share landing pages.
pub const DEFAULT_PUBLIC_BASE: &str = "https://cloud.mail.ru/public";

/// Directory that downloaded shares are mirrored into.
pub const DEFAULT_DOWNLOAD_ROOT: &str = "Downloads";

/// Link list read when no other file is given.
pub const DEFAULT_LINKS_FILE: &str = "links.txt";

/// Retries after an empty (zero content-length) download response.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Maximum folder nesting followed below a share root.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Browser identities rotated across requests.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
];

/// Backoff applied when the server answers a download with an empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    /// Delay before the next attempt when `retries_remaining` retries are left.
    ///
    /// Grows linearly: the first retry waits one unit times 60, the last one
    /// `max_retries` times that.
    pub fn delay(&self, retries_remaining: u32) -> Duration {
        let step = self.max_retries.saturating_sub(retries_remaining) + 1;
        self.backoff_unit * 60 * step
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

/// Settings for one run, built once and handed to [`crate::ShareClient`].
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub public_base: String,
    pub download_root: PathBuf,
    pub user_agents: Vec<String>,
    pub retry: RetryPolicy,
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            public_base: DEFAULT_PUBLIC_BASE.to_string(),
            download_root: PathBuf::from(DEFAULT_DOWNLOAD_ROOT),
            user_agents: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
            retry: RetryPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backoff_sequence() {
        let policy = RetryPolicy::default();
        let delays: Vec<u64> = (1..=5).rev().map(|r| policy.delay(r).as_secs()).collect();
        assert_eq!(delays, vec![60, 120, 180, 240, 300]);
    }

    #[test]
    fn test_zero_unit_never_sleeps() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff_unit: Duration::ZERO,
        };
        assert_eq!(policy.delay(3), Duration::ZERO);
        assert_eq!(policy.delay(1), Duration::ZERO);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.public_base, "https://cloud.mail.ru/public");
        assert_eq!(config.download_root, PathBuf::from("Downloads"));
        assert_eq!(config.user_agents.len(), DEFAULT_USER_AGENTS.len());
        assert_eq!(config.max_depth, 64);
    }
}
