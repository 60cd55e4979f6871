//! Signing endpoint integration tests.
//!
//! Tests verify:
//! - Missing URL yields 400 JSON for GET and POST
//! - The known source URL signs to the expected literal
//! - POST profiles (numbers and strings) reach the signed URL
//! - Missing salt and signer failures yield 500

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use image_url_signer::Stage;

use super::test_utils::{
    body_json, default_router, get, is_json, post_json, test_router, MockVerifierFactory,
    EXPECTED_SIGNED_URL, SOURCE_URL, VALID_COOKIE,
};

// =============================================================================
// Missing URL
// =============================================================================

#[tokio::test]
async fn test_get_without_url_is_bad_request() {
    let router = default_router(MockVerifierFactory::new());

    let response = router
        .oneshot(get("/signed-image-url", Some(VALID_COOKIE)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(is_json(&response));
    let body = body_json(response).await;
    assert_eq!(body["error"], "No URL provided");
}

#[tokio::test]
async fn test_post_without_url_is_bad_request() {
    let router = default_router(MockVerifierFactory::new());

    let response = router
        .oneshot(post_json(
            "/signed-image-url",
            Some(VALID_COOKIE),
            json!({ "profile": { "width": 400 } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(is_json(&response));
}

#[tokio::test]
async fn test_empty_url_is_bad_request() {
    let router = default_router(MockVerifierFactory::new());

    let response = router
        .oneshot(get("/signed-image-url?url=", Some(VALID_COOKIE)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Signed URLs
// =============================================================================

#[tokio::test]
async fn test_get_signs_known_url() {
    let factory = MockVerifierFactory::new();
    let router = default_router(factory.clone());

    let uri = format!(
        "/signed-image-url?url={}",
        urlencoding::encode(SOURCE_URL)
    );
    let response = router.oneshot(get(&uri, Some(VALID_COOKIE))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["signedUrl"], EXPECTED_SIGNED_URL);
    assert_eq!(factory.verified_cookies(), vec![VALID_COOKIE.to_string()]);
}

#[tokio::test]
async fn test_unencoded_query_url_signs() {
    let router = default_router(MockVerifierFactory::new());

    let uri = format!("/signed-image-url?url={}", SOURCE_URL);
    let response = router.oneshot(get(&uri, Some(VALID_COOKIE))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["signedUrl"], EXPECTED_SIGNED_URL);
}

#[tokio::test]
async fn test_post_signs_known_url_with_default_width() {
    let router = default_router(MockVerifierFactory::new());

    let response = router
        .oneshot(post_json(
            "/signed-image-url",
            Some(VALID_COOKIE),
            json!({ "url": SOURCE_URL }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["signedUrl"], EXPECTED_SIGNED_URL);
}

#[tokio::test]
async fn test_post_profile_from_form_strings() {
    let router = default_router(MockVerifierFactory::new());

    let response = router
        .oneshot(post_json(
            "/signed-image-url",
            Some(VALID_COOKIE),
            json!({ "url": SOURCE_URL, "profile": { "width": "400", "quality": "75" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let signed = body["signedUrl"].as_str().unwrap();
    assert!(signed.contains("/master/5584.jpg?width=400&quality=75&s="));
}

#[tokio::test]
async fn test_get_query_profile() {
    let router = default_router(MockVerifierFactory::new());

    let uri = format!(
        "/signed-image-url?url={}&width=320&height=200",
        urlencoding::encode(SOURCE_URL)
    );
    let response = router.oneshot(get(&uri, Some(VALID_COOKIE))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let signed = body["signedUrl"].as_str().unwrap();
    assert!(signed.contains("?width=320&height=200&s="));
    assert_ne!(signed, EXPECTED_SIGNED_URL);
}

// =============================================================================
// Server Errors
// =============================================================================

#[tokio::test]
async fn test_missing_salt_is_server_error() {
    let router = test_router(MockVerifierFactory::new(), Stage::Code, None);

    let uri = format!(
        "/signed-image-url?url={}",
        urlencoding::encode(SOURCE_URL)
    );
    let response = router.oneshot(get(&uri, Some(VALID_COOKIE))).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Service incorrectly configured. No salt provided"
    );
}

#[tokio::test]
async fn test_unsignable_url_is_server_error() {
    let router = default_router(MockVerifierFactory::new());

    let response = router
        .oneshot(post_json(
            "/signed-image-url",
            Some(VALID_COOKIE),
            json!({ "url": "not a url" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Error signing url");
    assert!(body["ex"].as_str().unwrap().contains("Invalid image url"));
}
