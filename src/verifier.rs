//! SSO cookie verification.
//!
//! The service never validates session cookies itself. Each request acquires a
//! [`CookieVerifier`] from a [`VerifierFactory`], hands it the raw `Cookie`
//! header, and releases it with [`CookieVerifier::stop`]. Finding the
//! [`AUTH_COOKIE_NAME`] cookie in that header is up to the verifier.
//!
//! [`RemoteVerifier`] is the production implementation: it forwards the header
//! unchanged to an SSO verification endpoint and decodes the [`AuthResult`]
//! it returns.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::VerifierError;

/// Name of the SSO session cookie.
pub const AUTH_COOKIE_NAME: &str = "gutoolsAuth-assym";

/// Default timeout for calls to the remote verifier.
pub const DEFAULT_VERIFIER_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Types
// =============================================================================

/// Verification status reported by the SSO verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthStatus {
    #[serde(rename = "Authorised")]
    Authorised,
    #[serde(rename = "Not Authorised")]
    NotAuthorised,
    #[serde(rename = "Invalid Cookie")]
    InvalidCookie,
    #[serde(rename = "Expired")]
    Expired,
}

/// Identity of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub authenticating_system: String,
    pub authenticated_in: Vec<String>,
    /// Session expiry, milliseconds since the Unix epoch
    pub expires: i64,
    pub multifactor: bool,
}

/// Result of verifying a session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    pub status: AuthStatus,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthResult {
    /// Result for a request that carried no usable cookie.
    pub fn not_authorised() -> Self {
        Self {
            status: AuthStatus::NotAuthorised,
            user: None,
        }
    }

    /// Whether the verifier accepted the cookie.
    pub fn is_authorised(&self) -> bool {
        self.status == AuthStatus::Authorised
    }
}

// =============================================================================
// Traits
// =============================================================================

/// Verifies SSO session cookies.
#[async_trait]
pub trait CookieVerifier: Send + Sync {
    /// Verify a request's raw `Cookie` header (`""` when it had none).
    async fn verify(&self, cookies: &str) -> Result<AuthResult, VerifierError>;

    /// Release any resources held by this verifier.
    fn stop(&self) {}
}

/// Creates a fresh verifier for each request.
pub trait VerifierFactory: Send + Sync + 'static {
    type Verifier: CookieVerifier + 'static;

    fn create(&self) -> Self::Verifier;
}

// =============================================================================
// Remote Verifier
// =============================================================================

/// Connection settings for the remote SSO verifier.
#[derive(Debug, Clone)]
pub struct RemoteVerifierSettings {
    /// Verification endpoint
    pub endpoint: Url,

    /// Public settings file the verifier should check signatures against
    pub settings_file: String,

    /// AWS region the settings live in
    pub region: String,

    /// Per-request timeout
    pub timeout: Duration,
}

/// Factory sharing one HTTP connection pool across requests.
#[derive(Clone)]
pub struct RemoteVerifierFactory {
    client: reqwest::Client,
    settings: RemoteVerifierSettings,
}

impl RemoteVerifierFactory {
    pub fn new(settings: RemoteVerifierSettings) -> Result<Self, VerifierError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| VerifierError::Connection(e.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &RemoteVerifierSettings {
        &self.settings
    }
}

impl VerifierFactory for RemoteVerifierFactory {
    type Verifier = RemoteVerifier;

    fn create(&self) -> RemoteVerifier {
        RemoteVerifier {
            client: self.client.clone(),
            settings: self.settings.clone(),
        }
    }
}

/// Verifier that delegates to the SSO verification endpoint over HTTP.
pub struct RemoteVerifier {
    client: reqwest::Client,
    settings: RemoteVerifierSettings,
}

#[async_trait]
impl CookieVerifier for RemoteVerifier {
    async fn verify(&self, cookies: &str) -> Result<AuthResult, VerifierError> {
        let mut request = self
            .client
            .get(self.settings.endpoint.clone())
            .query(&[
                ("settingsFile", self.settings.settings_file.as_str()),
                ("region", self.settings.region.as_str()),
            ]);
        if !cookies.is_empty() {
            request = request.header(COOKIE, cookies);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VerifierError::Connection(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "SSO verifier responded");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(AuthResult::not_authorised()),
            s if s.is_success() => response
                .json::<AuthResult>()
                .await
                .map_err(|e| VerifierError::InvalidResponse(e.to_string())),
            s => Err(VerifierError::UnexpectedStatus { status: s.as_u16() }),
        }
    }

    fn stop(&self) {
        debug!(endpoint = %self.settings.endpoint, "Releasing SSO verifier");
    }
}

// =============================================================================
// Tests
// =============================================================================
