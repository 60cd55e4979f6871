//! UI integration tests.
//!
//! Tests verify:
//! - Signed-in users get the signing form on `/` and `/ui`
//! - Everyone else gets a 403 login page linking to the stage's login domain

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use image_url_signer::Stage;

use super::test_utils::{body_text, get, test_router, MockVerifierFactory, VALID_COOKIE};

#[tokio::test]
async fn test_ui_shows_form_when_logged_in() {
    for path in ["/", "/ui"] {
        let router = test_router(MockVerifierFactory::new(), Stage::Prod, Some("fake"));

        let response = router.oneshot(get(path, Some(VALID_COOKIE))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let html = body_text(response).await;
        assert!(html.contains("You are logged in"));
    }
}

#[tokio::test]
async fn test_ui_login_page_when_logged_out() {
    let router = test_router(MockVerifierFactory::new(), Stage::Prod, Some("fake"));

    let request = Request::builder()
        .uri("/ui")
        .header("host", "image-url-signing-service.gutools.co.uk")
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let html = body_text(response).await;
    assert!(html.contains("You must be logged in"));
    assert!(html.contains(concat!(
        "https://login.gutools.co.uk/login",
        "?returnUrl=https%3A%2F%2Fimage-url-signing-service.gutools.co.uk%2Fui"
    )));
}

#[tokio::test]
async fn test_ui_login_page_on_localhost() {
    let router = test_router(MockVerifierFactory::new(), Stage::Local, Some("fake"));

    let request = Request::builder()
        .uri("/")
        .header("host", "localhost:3232")
        .header("cookie", "gutoolsAuth-assym=forged")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let html = body_text(response).await;
    assert!(html.contains(concat!(
        "https://login.local.dev-gutools.co.uk/login",
        "?returnUrl=https%3A%2F%2Fimage-url-signing-service.local.dev-gutools.co.uk%2F"
    )));
}
