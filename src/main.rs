//! Image URL Signer - signs image resizer URLs for SSO users.
//!
//! This binary starts the HTTP server or signs a single URL offline.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_url_signer::{
    config::{Cli, Command, ServeConfig, SignConfig, SignOutputFormat},
    server::{create_router, AppState, RouterConfig},
    signer::ImageSigner,
    verifier::RemoteVerifierFactory,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Sign(config) => run_sign(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let stage = config.stage();
    let verifier_settings = match config.verifier_settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let factory = match RemoteVerifierFactory::new(verifier_settings) {
        Ok(factory) => factory,
        Err(e) => {
            error!("Failed to create SSO verifier client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let verifier_settings = factory.settings();
    info!("Configuration:");
    info!("  Stage: {}", stage);
    info!("  Region: {}", verifier_settings.region);
    info!("  SSO verifier: {}", verifier_settings.endpoint);
    info!("  SSO settings: {}", verifier_settings.settings_file);
    info!("  SSO timeout: {:?}", verifier_settings.timeout);
    info!("  Login domain: {}", stage.login_domain());
    if !config.has_salt() {
        warn!("  Salt: NOT SET - signing requests will fail with 500");
        warn!("        Set --salt or SALT");
    }

    let state = AppState::new(factory, stage).with_salt(config.salt.as_deref());
    let router = create_router(state, build_router_config(&config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Listening on http://{}", addr);
    info!("  curl http://{}/healthcheck", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_url_signer=debug,tower_http=debug"
    } else {
        "image_url_signer=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new();

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}

// =============================================================================
// Sign Command
// =============================================================================

fn run_sign(config: SignConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let profile = config.profile();
    let signed_url = match ImageSigner::new(&config.salt).sign(&config.url, &profile) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match config.format {
        SignOutputFormat::Url => {
            println!("{}", signed_url);
        }
        SignOutputFormat::Json => {
            let json = serde_json::json!({
                "signedUrl": signed_url,
                "url": config.url,
                "profile": {
                    "width": profile.width,
                    "height": profile.height,
                    "quality": profile.quality,
                },
            });
            match serde_json::to_string_pretty(&json) {
                Ok(out) => println!("{}", out),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}
