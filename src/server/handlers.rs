//! HTTP request handlers for the image URL signing service.
//!
//! # Endpoints
//!
//! - `GET|POST /signed-image-url` - Sign an image URL (requires SSO session)
//! - `GET /userdetails` - Details of the signed-in user
//! - `GET /healthcheck` - Health check endpoint
//! - `GET /` and `GET /ui` - Signing form, or login page without a session

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{OriginalUri, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;

use crate::error::SignError;
use crate::signer::{ImageSigner, ResizeProfile};
use crate::stage::Stage;
use crate::verifier::{AuthResult, VerifierFactory};

use super::auth::{check_auth, require_auth, AuthError, AuthOutcome};
use super::ui;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<F: VerifierFactory> {
    /// Creates one SSO verifier per request
    pub verifiers: Arc<F>,

    /// Image signer, absent when no salt is configured
    pub signer: Option<ImageSigner>,

    /// Deployment stage
    pub stage: Stage,
}

impl<F: VerifierFactory> AppState<F> {
    /// Create state without a signing salt.
    pub fn new(verifiers: F, stage: Stage) -> Self {
        Self {
            verifiers: Arc::new(verifiers),
            signer: None,
            stage,
        }
    }

    /// Set the signing salt. Empty salts count as unconfigured.
    pub fn with_salt(mut self, salt: Option<&str>) -> Self {
        self.signer = salt.filter(|s| !s.is_empty()).map(ImageSigner::new);
        self
    }
}

impl<F: VerifierFactory> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            verifiers: Arc::clone(&self.verifiers),
            signer: self.signer.clone(),
            stage: self.stage,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Decoded query string.
///
/// Keys that appear more than once are treated as non-string values and
/// ignored.
#[derive(Debug, Default)]
struct QueryParams(HashMap<String, Vec<String>>);

impl QueryParams {
    fn parse(query: Option<&str>) -> Self {
        let mut params: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in form_urlencoded::parse(query.unwrap_or("").as_bytes()) {
            params
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        Self(params)
    }

    fn single(&self, key: &str) -> Option<&str> {
        match self.0.get(key).map(Vec::as_slice) {
            Some([value]) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// A request to sign an image URL, assembled from the JSON body or query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignRequest {
    /// Source image URL
    pub url: Option<String>,

    /// Resize parameters
    pub profile: ResizeProfile,
}

impl SignRequest {
    /// Build a sign request.
    ///
    /// The body `url` wins over the query `url` when it is a non-empty
    /// string. A body `profile` object replaces the query `width`, `height`
    /// and `quality`. Profile values may be integral numbers or numeric
    /// strings. Anything else, and values outside the resizer's limits, are
    /// ignored, so an unusable width falls back to the default.
    pub fn from_parts(body: Option<&Value>, query: Option<&str>) -> Self {
        let query = QueryParams::parse(query);

        let url = body
            .and_then(|b| b.get("url"))
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
            .or_else(|| query.single("url"))
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        let profile = match body.and_then(|b| b.get("profile")).filter(|p| p.is_object()) {
            Some(profile) => ResizeProfile::from_parts(
                profile.get("width").and_then(json_number).filter(is_dimension),
                profile.get("height").and_then(json_number).filter(is_dimension),
                profile.get("quality").and_then(json_number).filter(is_quality),
            ),
            None => ResizeProfile::from_parts(
                query.single("width").and_then(parse_number).filter(is_dimension),
                query.single("height").and_then(parse_number).filter(is_dimension),
                query.single("quality").and_then(parse_number).filter(is_quality),
            ),
        };

        Self { url, profile }
    }

    /// The source URL, or [`SignError::MissingUrl`].
    pub fn require_url(&self) -> Result<&str, SignError> {
        self.url.as_deref().ok_or(SignError::MissingUrl)
    }
}

fn parse_number(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

fn json_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(n) => u32::try_from(n).ok(),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
                .map(|f| f as u32),
        },
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn is_dimension(value: &u32) -> bool {
    ResizeProfile::is_valid_dimension(*value)
}

fn is_quality(value: &u32) -> bool {
    ResizeProfile::is_valid_quality(*value)
}

/// Parse a request body as JSON. Empty or malformed bodies yield `None`.
fn parse_body(body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "Ignoring non-JSON request body");
            None
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Underlying cause, for server errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ex: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ex: None,
        }
    }

    pub fn with_cause(error: impl Into<String>, ex: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ex: Some(ex.into()),
        }
    }
}

/// Response from the signing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlResponse {
    pub signed_url: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Deployment stage
    pub stage: Stage,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert SignError to HTTP response.
///
/// Client errors are logged at WARN level, server errors at ERROR level.
impl IntoResponse for SignError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match &self {
            SignError::MissingUrl => (StatusCode::BAD_REQUEST, ErrorResponse::new(message)),
            SignError::MissingSecret => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(message),
            ),
            SignError::Signing(cause) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_cause(message, cause.to_string()),
            ),
        };

        if status.is_server_error() {
            error!(
                status = status.as_u16(),
                cause = body.ex.as_deref().unwrap_or(""),
                "Server error: {}",
                body.error
            );
        } else {
            warn!(status = status.as_u16(), "Client error: {}", body.error);
        }

        (status, Json(body)).into_response()
    }
}

/// Errors from API handlers.
#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    Sign(SignError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(err) => err.into_response(),
            ApiError::Sign(err) => err.into_response(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<SignError> for ApiError {
    fn from(err: SignError) -> Self {
        ApiError::Sign(err)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle image URL signing requests.
///
/// # Endpoint
///
/// `GET /signed-image-url?url=...&width=...&height=...&quality=...`
///
/// `POST /signed-image-url` with JSON body:
/// ```json
/// { "url": "https://media.guim.co.uk/...", "profile": { "width": 400, "quality": 75 } }
/// ```
///
/// # Response
///
/// `200 OK` with JSON body `{ "signedUrl": "https://i.guim.co.uk/img/..." }`
///
/// # Errors
///
/// - `400 Bad Request`: No URL provided
/// - `403 Forbidden`: Missing or rejected session cookie
/// - `500 Internal Server Error`: No salt configured, verifier or signer failure
pub async fn signed_image_url_handler<F: VerifierFactory>(
    State(state): State<AppState<F>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<SignedUrlResponse>, ApiError> {
    let auth = require_auth(state.verifiers.as_ref(), &headers).await?;

    let body = parse_body(&body);
    let request = SignRequest::from_parts(body.as_ref(), query.as_deref());
    let url = request.require_url()?;

    let signer = state.signer.as_ref().ok_or(SignError::MissingSecret)?;
    let signed_url = signer
        .sign(url, &request.profile)
        .map_err(SignError::from)?;

    info!(
        user = auth.user.as_ref().map(|u| u.email.as_str()).unwrap_or(""),
        width = request.profile.width,
        "Signed image url"
    );

    Ok(Json(SignedUrlResponse { signed_url }))
}

/// Handle user details requests.
///
/// # Endpoint
///
/// `GET /userdetails`
///
/// # Response
///
/// `200 OK` with the verifier's result:
/// ```json
/// { "status": "Authorised", "user": { "firstName": "...", "email": "..." } }
/// ```
pub async fn user_details_handler<F: VerifierFactory>(
    State(state): State<AppState<F>>,
    headers: HeaderMap,
) -> Result<Json<AuthResult>, AuthError> {
    let result = require_auth(state.verifiers.as_ref(), &headers).await?;
    Ok(Json(result))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /healthcheck`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// { "status": "OK", "stage": "PROD" }
/// ```
pub async fn health_handler<F: VerifierFactory>(
    State(state): State<AppState<F>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        stage: state.stage,
    })
}

/// Serve the signing form, or the login page when there is no session.
///
/// # Endpoint
///
/// `GET /` or `GET /ui`
pub async fn ui_handler<F: VerifierFactory>(
    State(state): State<AppState<F>>,
    headers: HeaderMap,
    OriginalUri(original_uri): OriginalUri,
) -> Result<Response, AuthError> {
    match check_auth(state.verifiers.as_ref(), &headers).await? {
        AuthOutcome::Authorized(_) => Ok(Html(ui::signing_form_html()).into_response()),
        AuthOutcome::NotAuthorized => {
            let proto = header_str(&headers, "x-forwarded-proto").unwrap_or("http");
            let host = header_str(&headers, header::HOST.as_str()).unwrap_or("");
            let path_and_query = original_uri
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");

            let return_url = ui::return_url(proto, host, path_and_query);
            let login_url = ui::login_url(state.stage, &return_url);
            debug!(login_url = %login_url, "Redirecting to login");

            Ok((StatusCode::FORBIDDEN, Html(ui::login_page_html(&login_url))).into_response())
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

// =============================================================================
// Tests
// =============================================================================
