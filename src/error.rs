// src/error.rs
// =============================================================================
// Fatal configuration errors.
//
// Anything in here stops the program before a single URL is submitted.
// main.rs maps every variant to exit code 1.
//
// Per-URL failures are NOT errors in this sense - they are ordinary values
// (see notify::NotificationResult) so one bad URL never stops the batch.
//
// Rust concepts:
// - thiserror: derive Display and Error for our own error enum
// - #[source]: keeps the underlying cause so it shows up in error chains
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The service account key file does not exist
    #[error("credentials file not found: {}", path.display())]
    CredentialsNotFound { path: PathBuf },

    /// The key file exists but could not be read
    #[error("could not read credentials file {}: {source}", path.display())]
    CredentialsUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key file was read but is not usable authorization material
    #[error("invalid credentials in {}: {reason}", path.display())]
    InvalidCredentials { path: PathBuf, reason: String },

    /// The URL list file does not exist
    #[error("URL list not found: {}", path.display())]
    UrlListNotFound { path: PathBuf },

    /// The URL list exists but is unreadable (permissions, not UTF-8, ...)
    #[error("could not read URL list {}: {source}", path.display())]
    UrlListUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be built
    #[error("failed to initialize API client: {0}")]
    ClientInit(#[source] reqwest::Error),
}

impl ConfigurationError {
    // Shorthand used by the credential loader for all "parsed but wrong" cases
    pub fn invalid_credentials(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidCredentials {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// An extra line of advice printed under the error, if we have one
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ConfigurationError::CredentialsNotFound { .. } => Some(
                "Create a service account key with the Indexing API enabled \
                 and save it at that path (or pass --credentials)",
            ),
            ConfigurationError::UrlListNotFound { .. } => {
                Some("Create a text file with one URL per line (or pass --urls)")
            }
            _ => None,
        }
    }
}
