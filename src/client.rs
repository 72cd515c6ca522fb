//! HTTP client for Cloud Mail.ru public shares.

use std::sync::atomic::{AtomicUsize, Ordering};

use reqwest::header::USER_AGENT;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::config::Config;
use crate::error::{Result, ShareError};

/// Client for reading public shares.
///
/// Requests are made one at a time; the only state shared between them is
/// the user-agent rotation counter.
pub struct ShareClient {
    config: Config,
    http: Client,
    next_agent: AtomicUsize,
}

impl ShareClient {
    /// Create a new ShareClient.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: Client::new(),
            next_agent: AtomicUsize::new(0),
        }
    }

    /// Get the run configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The next browser identity in the rotation.
    pub(crate) fn user_agent(&self) -> Option<&str> {
        let agents = &self.config.user_agents;
        if agents.is_empty() {
            return None;
        }
        let idx = self.next_agent.fetch_add(1, Ordering::Relaxed) % agents.len();
        Some(agents[idx].as_str())
    }

    /// Start a GET request carrying the next user agent.
    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        let request = self.http.get(url);
        match self.user_agent() {
            Some(agent) => request.header(USER_AGENT, agent),
            None => request,
        }
    }

    /// GET a URL and parse the body as JSON.
    pub(crate) async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.get(url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(ShareError::ApiError {
                status: status.as_u16(),
                message: text,
            }),
            Err(e) => Err(ShareError::Json(e)),
        }
    }
}
