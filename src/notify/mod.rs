// src/notify/mod.rs
// =============================================================================
// This module submits a single URL to the Indexing API.
//
// Submodules:
// - types: request body and result types
// - client: the reqwest-based implementation of Notifier
//
// The Notifier trait is the seam between "what the batch does" and "how
// one URL gets submitted". The batch driver only ever sees the trait, so
// tests can swap in a stub that never touches the network.
// =============================================================================

mod client;
mod types;

use async_trait::async_trait;

pub use client::{IndexingClient, DEFAULT_ENDPOINT};
pub use types::{FailureKind, NotificationRequest, NotificationResult, UpdateType};

// Submits one URL and reports what happened
//
// Implementations must never fail the whole batch: every problem with a
// single URL becomes a NotificationResult::Failure.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, url: &str) -> NotificationResult;
}
