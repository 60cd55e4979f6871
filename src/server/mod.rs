//! HTTP server layer for the image URL signing service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        GET|POST /signed-image-url   GET /userdetails  GET /ui   │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────┐  ┌───────────┐  │
//! │  │  handlers   │  │    auth     │  │    ui    │  │  routes   │  │
//! │  │ (requests)  │  │ (SSO gate)  │  │  (HTML)  │  │ (router)  │  │
//! │  └─────────────┘  └─────────────┘  └──────────┘  └───────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod ui;

pub use auth::{check_auth, require_auth, AuthError, AuthOutcome};
pub use handlers::{
    health_handler, signed_image_url_handler, ui_handler, user_details_handler, ApiError,
    AppState, ErrorResponse, HealthResponse, SignRequest, SignedUrlResponse,
};
pub use routes::{create_router, RouterConfig};
