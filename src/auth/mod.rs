// src/auth/mod.rs
// =============================================================================
// This module turns a service account key file into bearer tokens.
//
// Submodules:
// - credentials: Reads and validates the JSON key file (fatal on failure)
// - token: Signs a JWT assertion and exchanges it for an access token
//
// The only permission we ever ask for is the Indexing API scope.
// =============================================================================

mod credentials;
mod token;

pub use credentials::{load_credentials, Credentials};
pub use token::TokenSource;

#[cfg(test)]
pub(crate) use credentials::tests::test_credentials;
