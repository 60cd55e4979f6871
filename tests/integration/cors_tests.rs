//! CORS integration tests.
//!
//! Tests verify:
//! - Without configured origins any origin is allowed, without credentials
//! - Listed origins are echoed back and may send credentials
//! - Unlisted origins get no CORS headers

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use tower::ServiceExt;

use image_url_signer::RouterConfig;

use super::test_utils::{router_with_config, MockVerifierFactory};

const ALLOW_ORIGIN: &str = "access-control-allow-origin";
const ALLOW_CREDENTIALS: &str = "access-control-allow-credentials";
const ALLOW_METHODS: &str = "access-control-allow-methods";

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/signed-image-url")
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap()
}

fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

fn config() -> RouterConfig {
    RouterConfig::new().with_tracing(false)
}

#[tokio::test]
async fn test_preflight_any_origin_by_default() {
    let factory = MockVerifierFactory::new();
    let router = router_with_config(factory.clone(), config());

    let response = router
        .oneshot(preflight("https://composer.gutools.co.uk"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, ALLOW_ORIGIN), Some("*"));
    assert!(header(&response, ALLOW_CREDENTIALS).is_none());
    assert!(header(&response, ALLOW_METHODS).is_some_and(|m| m.contains("POST")));
    assert_eq!(factory.created_count(), 0);
}

#[tokio::test]
async fn test_preflight_listed_origin_allows_credentials() {
    let origins = vec![
        "https://composer.gutools.co.uk".to_string(),
        "https://media.gutools.co.uk".to_string(),
    ];
    let router = router_with_config(
        MockVerifierFactory::new(),
        config().with_cors_origins(origins),
    );

    let response = router
        .oneshot(preflight("https://media.gutools.co.uk"))
        .await
        .unwrap();

    assert_eq!(
        header(&response, ALLOW_ORIGIN),
        Some("https://media.gutools.co.uk")
    );
    assert_eq!(header(&response, ALLOW_CREDENTIALS), Some("true"));
}

#[tokio::test]
async fn test_preflight_unlisted_origin_gets_no_cors_headers() {
    let origins = vec!["https://composer.gutools.co.uk".to_string()];
    let router = router_with_config(
        MockVerifierFactory::new(),
        config().with_cors_origins(origins),
    );

    let response = router
        .oneshot(preflight("https://evil.example.com"))
        .await
        .unwrap();

    assert!(header(&response, ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_preflight_empty_origin_list_disallows_all() {
    let router = router_with_config(
        MockVerifierFactory::new(),
        config().with_cors_origins(vec![]),
    );

    let response = router
        .oneshot(preflight("https://composer.gutools.co.uk"))
        .await
        .unwrap();

    assert!(header(&response, ALLOW_ORIGIN).is_none());
}
