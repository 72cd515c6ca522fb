//! Page token and download shard resolution for a share.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error};

use crate::client::ShareClient;
use crate::error::{Result, ShareError};
use crate::models::DispatcherResponse;

/// `pageId` as embedded in the landing page script, quoted or bare.
static PAGE_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)pageId['"]*:['"]*([^"'\s,]+)"#).expect("Invalid page id regex")
});

/// Find the page id in a share landing page.
pub fn extract_page_id(html: &str) -> Option<String> {
    PAGE_ID_REGEX
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}

impl ShareClient {
    /// Fetch the share landing page and scrape its page id.
    pub async fn resolve_session_token(&self, share_link: &str) -> Result<String> {
        let response = self.get(share_link).send().await?;
        let html = response.text().await?;

        match extract_page_id(&html) {
            Some(token) => {
                debug!("Page id for {}: {}", share_link, token);
                Ok(token)
            }
            None => {
                error!("Page id not found for {}", share_link);
                Err(ShareError::TokenNotFound(share_link.to_string()))
            }
        }
    }

    /// Ask the dispatcher which shard serves public downloads.
    ///
    /// Never panics on a malformed body: a missing key, a wrong shape and a
    /// non-JSON body each come back as their own error and are logged.
    pub async fn resolve_base_url(&self, token: &str) -> Result<String> {
        let url = format!("{}/dispatcher?x-page-id={}", self.config().api_base, token);

        let result = match self.get_json(&url).await {
            Ok(value) => DispatcherResponse::from_value(&value),
            Err(e) => Err(e),
        };

        match result {
            Ok(dispatcher) => {
                debug!("Download base URL: {}", dispatcher.weblink_get);
                Ok(dispatcher.weblink_get)
            }
            Err(e) => {
                match &e {
                    ShareError::MissingKey(key) => {
                        error!("Dispatcher response is missing key '{}'", key)
                    }
                    ShareError::UnexpectedType(what) => {
                        error!("Unexpected dispatcher response structure: {}", what)
                    }
                    other => error!("Dispatcher request failed: {}", other),
                }
                Err(e)
            }
        }
    }
}
