// src/notify/types.rs
// =============================================================================
// Types that travel to and from the Indexing API.
//
// Request body (what we send):
//   { "url": "https://example.com/page", "type": "URL_UPDATED" }
//
// Error body (what the API sends back on failure):
//   { "error": { "code": 429, "message": "Quota exceeded ...", "status": "RESOURCE_EXHAUSTED" } }
// =============================================================================

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

/// Kind of change we are telling the API about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
pub enum UpdateType {
    /// The page is new or has changed (URL_UPDATED)
    #[default]
    #[serde(rename = "URL_UPDATED")]
    Updated,
    /// The page has been removed (URL_DELETED)
    #[serde(rename = "URL_DELETED")]
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRequest<'a> {
    pub url: &'a str,
    #[serde(rename = "type")]
    pub update_type: UpdateType,
}

impl<'a> NotificationRequest<'a> {
    pub fn new(url: &'a str, update_type: UpdateType) -> Self {
        Self { url, update_type }
    }
}

/// Why a URL could not be submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The API answered with an error response
    Remote,
    /// The request never got a usable answer (network, timeout, bad body)
    Transport,
    /// We could not get an access token
    Auth,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationFailure {
    pub kind: FailureKind,
    /// Human-readable message, shown in the report
    pub message: String,
    /// Raw error body, when the API sent one
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationResult {
    /// Accepted; holds the raw response body (we don't look inside it)
    Success(Value),
    Failure(NotificationFailure),
}

impl NotificationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, NotificationResult::Success(_))
    }

    // Builds a Remote failure from an API error body.
    // Falls back to "Unknown error" when there is no error.message field.
    pub fn remote_failure(body: Value) -> Self {
        let message = body
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();

        NotificationResult::Failure(NotificationFailure {
            kind: FailureKind::Remote,
            message,
            body: Some(body),
        })
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        NotificationResult::Failure(NotificationFailure {
            kind,
            message: message.into(),
            body: None,
        })
    }

    /// Failure message, or None for a success
    pub fn message(&self) -> Option<&str> {
        match self {
            NotificationResult::Success(_) => None,
            NotificationResult::Failure(failure) => Some(&failure.message),
        }
    }
}
