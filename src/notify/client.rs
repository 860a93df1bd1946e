// src/notify/client.rs
// =============================================================================
// The real Notifier: talks to the Indexing API over HTTPS.
//
// For every URL:
// 1. Get an access token (cached after the first request)
// 2. POST { url, type } to urlNotifications:publish with a Bearer header
// 3. Turn whatever happens into a NotificationResult
//
// Nothing in here returns an error to the caller. A timeout, a refused
// connection, a 429 from the API - they all become a Failure for that one
// URL and the batch moves on to the next.
//
// Rust concepts:
// - impl Trait for Struct: IndexingClient implements our Notifier trait
// - reqwest::Error helpers: is_timeout(), is_connect(), is_decode()
// =============================================================================

use super::{FailureKind, NotificationRequest, NotificationResult, Notifier, UpdateType};
use crate::auth::{Credentials, TokenSource};
use crate::error::ConfigurationError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Google's publish endpoint for URL notifications
pub const DEFAULT_ENDPOINT: &str = "https://indexing.googleapis.com/v3/urlNotifications:publish";

pub struct IndexingClient {
    http: Client,
    tokens: TokenSource,
    endpoint: Url,
    update_type: UpdateType,
}

impl IndexingClient {
    // Builds the client
    //
    // Parameters:
    //   credentials: loaded service account credentials
    //   endpoint: publish endpoint (DEFAULT_ENDPOINT outside of tests)
    //   update_type: URL_UPDATED or URL_DELETED, sent with every URL
    //   timeout: per-request timeout, so one hung call can't stall the batch
    pub fn new(
        credentials: Credentials,
        endpoint: Url,
        update_type: UpdateType,
        timeout: Duration,
    ) -> Result<Self, ConfigurationError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ConfigurationError::ClientInit)?;

        Ok(Self {
            tokens: TokenSource::new(credentials, http.clone()),
            http,
            endpoint,
            update_type,
        })
    }

    async fn publish(&self, token: &str, url: &str) -> NotificationResult {
        let request = NotificationRequest::new(url, self.update_type);

        let response = match self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return categorize_error(e),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return categorize_error(e),
        };

        tracing::debug!(url, status = status.as_u16(), "publish response");

        if status.is_success() {
            if text.trim().is_empty() {
                return NotificationResult::Success(Value::Null);
            }
            return match serde_json::from_str(&text) {
                Ok(body) => NotificationResult::Success(body),
                Err(e) => NotificationResult::failure(
                    FailureKind::Transport,
                    format!("Malformed response: {}", e),
                ),
            };
        }

        // Error responses normally carry { "error": { "message": ... } }.
        // Anything else (an HTML error page from a proxy, say) just gets the status.
        match serde_json::from_str::<Value>(&text) {
            Ok(body) => NotificationResult::remote_failure(body),
            Err(_) => NotificationResult::failure(FailureKind::Remote, format!("HTTP {}", status)),
        }
    }
}

#[async_trait]
impl Notifier for IndexingClient {
    async fn notify(&self, url: &str) -> NotificationResult {
        let token = match self.tokens.access_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "could not obtain access token");
                return NotificationResult::failure(FailureKind::Auth, e.to_string());
            }
        };

        self.publish(&token, url).await
    }
}

// Turns a reqwest error into a readable Transport failure
fn categorize_error(error: reqwest::Error) -> NotificationResult {
    let message = if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if error.is_decode() || error.is_body() {
        format!("Malformed response: {}", error)
    } else {
        error.to_string()
    };

    tracing::warn!(error = %error, "publish request failed");
    NotificationResult::failure(FailureKind::Transport, message)
}
