//! SSO cookie authentication gate.
//!
//! [`check_auth`] hands the request's raw `Cookie` header to a freshly
//! created verifier and returns an [`AuthOutcome`]. Picking the
//! `gutoolsAuth-assym` cookie out of the header is the verifier's job.
//! Handlers branch on the outcome: API routes turn
//! [`AuthOutcome::NotAuthorized`] into a 403 JSON error, UI routes into the
//! login page.
//!
//! The verifier is stopped when the check finishes, whether it succeeded,
//! failed, or the request future was dropped mid-flight.

use std::ops::Deref;

use axum::{
    http::{header::COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, warn};

use super::handlers::ErrorResponse;
use crate::error::VerifierError;
use crate::verifier::{AuthResult, CookieVerifier, VerifierFactory};

// =============================================================================
// Types
// =============================================================================

/// Outcome of an authentication check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The verifier accepted the session cookie
    Authorized(AuthResult),

    /// No cookie, or the verifier rejected it
    NotAuthorized,
}

impl AuthOutcome {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthOutcome::Authorized(_))
    }
}

/// Authentication failures surfaced to API callers.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// Session cookie missing or rejected
    NotAuthorized,

    /// The verifier itself failed
    Verifier(VerifierError),
}

impl From<VerifierError> for AuthError {
    fn from(err: VerifierError) -> Self {
        AuthError::Verifier(err)
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::NotAuthorized => write!(f, "User not authorised"),
            AuthError::Verifier(_) => write!(f, "Error verifying user"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::NotAuthorized => {
                debug!(status = 403, "Authentication failed: {}", self);
                (
                    StatusCode::FORBIDDEN,
                    Json(ErrorResponse::new(self.to_string())),
                )
                    .into_response()
            }
            AuthError::Verifier(cause) => {
                error!(status = 500, cause = %cause, "Authentication failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::with_cause(self.to_string(), cause.to_string())),
                )
                    .into_response()
            }
        }
    }
}

// =============================================================================
// Verifier Lifetime
// =============================================================================

/// Stops the wrapped verifier when dropped.
struct VerifierGuard<V: CookieVerifier> {
    verifier: V,
}

impl<V: CookieVerifier> Deref for VerifierGuard<V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.verifier
    }
}

impl<V: CookieVerifier> Drop for VerifierGuard<V> {
    fn drop(&mut self) {
        self.verifier.stop();
    }
}

// =============================================================================
// Auth Check
// =============================================================================

/// Raw `Cookie` header of a request, `""` when absent.
///
/// Multiple `Cookie` header fields are joined with `"; "`.
pub fn cookie_header(headers: &HeaderMap) -> String {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check the request's session cookie.
///
/// Every request is put to the verifier, including ones without cookies.
pub async fn check_auth<F: VerifierFactory>(
    factory: &F,
    headers: &HeaderMap,
) -> Result<AuthOutcome, VerifierError> {
    let cookies = cookie_header(headers);

    let verifier = VerifierGuard {
        verifier: factory.create(),
    };

    let result = verifier.verify(&cookies).await.map_err(|e| {
        warn!(error = %e, "SSO verification failed");
        e
    })?;

    if result.is_authorised() {
        Ok(AuthOutcome::Authorized(result))
    } else {
        debug!(
            status = ?result.status,
            has_cookies = !cookies.is_empty(),
            "Session cookie rejected"
        );
        Ok(AuthOutcome::NotAuthorized)
    }
}

/// Like [`check_auth`], but maps a rejected cookie to [`AuthError::NotAuthorized`].
pub async fn require_auth<F: VerifierFactory>(
    factory: &F,
    headers: &HeaderMap,
) -> Result<AuthResult, AuthError> {
    match check_auth(factory, headers).await? {
        AuthOutcome::Authorized(result) => Ok(result),
        AuthOutcome::NotAuthorized => Err(AuthError::NotAuthorized),
    }
}

// =============================================================================
// Tests
// =============================================================================
