//! HTTP fetcher implementation
//!
//! This module handles the listing-page requests of a run:
//! - Building the shared HTTP client with a descriptive user agent
//! - GET requests for listing pages
//! - Classifying failures so the walker can log and skip them

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;

/// Result of a page fetch
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Formats the user agent string: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// The same client serves page fetches and file downloads, so redirects are
/// followed with reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use netco_harvest::config::UserAgentConfig;
/// use netco_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "NetcoHarvest".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a listing page
///
/// A single attempt is made; the caller decides what to do with failures.
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with readable body | Success |
/// | Any other status | HttpError |
/// | Connect/timeout/body error | NetworkError |
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}
