// src/auth/token.rs
// =============================================================================
// Exchanges service account credentials for an OAuth2 access token.
//
// How it works (the "JWT bearer" grant):
// 1. Build a small set of claims: who we are, what scope we want, which
//    token endpoint we are talking to, and a one hour validity window
// 2. Sign them with the service account's RSA key (RS256)
// 3. POST the signed assertion to the token endpoint as a form
// 4. Get back { access_token, expires_in, token_type }
//
// The token is cached and reused until shortly before it expires, so a
// batch of a few hundred URLs needs a single token request.
//
// Rust concepts:
// - tokio::sync::Mutex: an async-aware lock (held across an .await)
// - thiserror: a typed error the notifier can classify
// =============================================================================

use super::Credentials;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

// Google caps assertion lifetime at one hour
const ASSERTION_LIFETIME_SECS: i64 = 3600;

// Treat a token as expired this long before it actually is
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token endpoint rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

// Error body from the token endpoint, e.g.
// { "error": "invalid_grant", "error_description": "Invalid JWT Signature." }
#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

// Hands out access tokens for one set of credentials
pub struct TokenSource {
    credentials: Credentials,
    client: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(credentials: Credentials, client: Client) -> Self {
        Self {
            credentials,
            client,
            cached: Mutex::new(None),
        }
    }

    // Returns a valid access token, fetching a new one only when needed
    pub async fn access_token(&self) -> Result<String, TokenError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
            tracing::debug!("cached access token expired, requesting a new one");
        }

        let token = self.fetch_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = AssertionClaims {
            iss: self.credentials.client_email(),
            scope: self.credentials.scope(),
            aud: self.credentials.token_uri().as_str(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.credentials.key_id().map(str::to_string);

        Ok(encode(&header, &claims, self.credentials.signing_key())?)
    }

    async fn fetch_token(&self) -> Result<CachedToken, TokenError> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        tracing::debug!(
            token_uri = %self.credentials.token_uri(),
            client_email = self.credentials.client_email(),
            "requesting access token"
        );

        let response = self
            .client
            .post(self.credentials.token_uri().clone())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TokenError::Rejected {
                status: status.as_u16(),
                message: describe_token_error(&text),
            });
        }

        let body: TokenResponse = response.json().await?;
        let lifetime = token_lifetime(body.expires_in);

        tracing::info!(expires_in = lifetime, "access token obtained");

        Ok(CachedToken {
            value: body.access_token,
            expires_at: now + Duration::seconds(lifetime),
        })
    }
}

// Seconds we trust a token for.
// The endpoint's expires_in is capped at one hour, never below zero.
fn token_lifetime(expires_in: Option<i64>) -> i64 {
    expires_in
        .unwrap_or(ASSERTION_LIFETIME_SECS)
        .clamp(0, ASSERTION_LIFETIME_SECS)
}

// Picks the most readable message out of a token endpoint error body
fn describe_token_error(text: &str) -> String {
    match serde_json::from_str::<TokenErrorBody>(text) {
        Ok(TokenErrorBody {
            error_description: Some(description),
            ..
        }) => description,
        Ok(TokenErrorBody {
            error: Some(error), ..
        }) => error,
        _ if !text.trim().is_empty() => text.trim().to_string(),
        _ => "no error details".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_credentials;
    use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_PUBLIC_KEY_PEM: &str =
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/test-rsa-key.pub.pem"));

    #[derive(Debug, Deserialize)]
    struct DecodedClaims {
        iss: String,
        scope: String,
        aud: String,
        iat: i64,
        exp: i64,
    }

    #[test]
    fn test_assertion_claims() {
        let creds = test_credentials("https://oauth2.googleapis.com/token");
        let source = TokenSource::new(creds, Client::new());
        let jwt = source.sign_assertion(Utc::now()).unwrap();

        let header = decode_header(&jwt).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("test-key-id"));

        let public_key = DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY_PEM.as_bytes()).unwrap();
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&["https://oauth2.googleapis.com/token"]);
        let data = decode::<DecodedClaims>(&jwt, &public_key, &validation).unwrap();

        assert_eq!(data.claims.iss, "indexer@test-project.iam.gserviceaccount.com");
        assert_eq!(data.claims.scope, "https://www.googleapis.com/auth/indexing");
        assert_eq!(data.claims.aud, "https://oauth2.googleapis.com/token");
        assert_eq!(data.claims.exp - data.claims.iat, ASSERTION_LIFETIME_SECS);
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains(
                "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
            ))
            .and(body_string_contains("assertion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.test-token",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let creds = test_credentials(&format!("{}/token", server.uri()));
        let source = TokenSource::new(creds, Client::new());

        assert_eq!(source.access_token().await.unwrap(), "ya29.test-token");
        assert_eq!(source.access_token().await.unwrap(), "ya29.test-token");
        // MockServer verifies .expect(1) on drop
    }

    #[tokio::test]
    async fn test_rejected_token_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Invalid JWT Signature."
            })))
            .mount(&server)
            .await;

        let creds = test_credentials(&format!("{}/token", server.uri()));
        let source = TokenSource::new(creds, Client::new());

        match source.access_token().await {
            Err(TokenError::Rejected { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid JWT Signature.");
            }
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_huge_expires_in_is_capped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "t",
                "expires_in": 1_000_000_000_000_000i64
            })))
            .mount(&server)
            .await;

        let creds = test_credentials(&format!("{}/token", server.uri()));
        let source = TokenSource::new(creds, Client::new());

        let token = source.fetch_token().await.unwrap();
        assert_eq!(token.value, "t");
        assert!(token.expires_at <= Utc::now() + Duration::seconds(ASSERTION_LIFETIME_SECS));
    }

    #[test]
    fn test_token_lifetime_bounds() {
        assert_eq!(token_lifetime(None), ASSERTION_LIFETIME_SECS);
        assert_eq!(token_lifetime(Some(3599)), 3599);
        assert_eq!(token_lifetime(Some(i64::MAX)), ASSERTION_LIFETIME_SECS);
        assert_eq!(token_lifetime(Some(i64::MIN)), 0);
    }

    #[test]
    fn test_describe_token_error() {
        assert_eq!(describe_token_error(r#"{"error":"invalid_grant"}"#), "invalid_grant");
        assert_eq!(describe_token_error("Bad Gateway"), "Bad Gateway");
        assert_eq!(describe_token_error(""), "no error details");
    }

    #[test]
    fn test_expiry_margin() {
        let now = Utc::now();
        let token = CachedToken {
            value: "t".to_string(),
            expires_at: now + Duration::seconds(30),
        };
        assert!(!token.is_fresh(now));

        let token = CachedToken {
            value: "t".to_string(),
            expires_at: now + Duration::seconds(3600),
        };
        assert!(token.is_fresh(now));
    }
}
