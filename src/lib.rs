//! # Image URL Signer
//!
//! An HTTP service that hands out signed image resizer URLs to users with a
//! valid SSO session.
//!
//! ## Features
//!
//! - **Signed resizer URLs**: keyed MD5 signatures over the resize path and parameters
//! - **SSO gate**: session cookies are checked by an external verifier, one per request
//! - **Built-in UI**: a signing form, or a login link when there is no session
//! - **Stage awareness**: CODE/PROD/LOCAL derived from the function name
//!
//! ## Architecture
//!
//! - [`signer`] - Resizer URL signing
//! - [`verifier`] - SSO cookie verifier trait and HTTP client
//! - [`server`] - Axum-based HTTP server and routes
//! - [`stage`] - Deployment stage and derived settings
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use image_url_signer::{
//!     create_router, AppState, RemoteVerifierFactory, RemoteVerifierSettings, RouterConfig,
//!     Stage,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let stage = Stage::Prod;
//!     let factory = RemoteVerifierFactory::new(RemoteVerifierSettings {
//!         endpoint: "https://sso.example.com/verify".parse().unwrap(),
//!         settings_file: stage.settings_file().to_string(),
//!         region: "eu-west-1".to_string(),
//!         timeout: std::time::Duration::from_secs(10),
//!     })
//!     .unwrap();
//!
//!     let state = AppState::new(factory, stage).with_salt(Some("salt"));
//!     let router = create_router(state, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3232").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod signer;
pub mod stage;
pub mod verifier;

pub use config::{Cli, Command, ServeConfig, SignConfig, SignOutputFormat};
pub use error::{SignError, SigningError, VerifierError};
pub use server::{create_router, AppState, AuthOutcome, RouterConfig};
pub use signer::{ImageSigner, ResizeProfile};
pub use stage::Stage;
pub use verifier::{
    AuthResult, AuthStatus, CookieVerifier, RemoteVerifier, RemoteVerifierFactory,
    RemoteVerifierSettings, User, VerifierFactory, AUTH_COOKIE_NAME,
};
