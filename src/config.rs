//! Configuration management for the image URL signing service.
//!
//! Configuration comes from command-line arguments via clap, with
//! environment variable fallbacks and defaults for all optional settings.
//!
//! # Environment Variables
//!
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 3232)
//! - `SALT` - Signing salt for resizer URLs
//! - `AWS_LAMBDA_FUNCTION_NAME` - Function name the stage is derived from
//! - `AWS_REGION` - Region of the SSO settings (default: eu-west-1)
//! - `LOCAL` - Force the LOCAL stage
//! - `VERIFIER_URL` - SSO cookie verification endpoint (required)
//! - `VERIFIER_TIMEOUT_SECS` - Verifier request timeout (default: 10)
//! - `CORS_ORIGINS` - Allowed CORS origins, comma-separated

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

use crate::signer::ResizeProfile;
use crate::stage::Stage;
use crate::verifier::{RemoteVerifierSettings, DEFAULT_VERIFIER_TIMEOUT};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3232;

/// Default AWS region.
pub const DEFAULT_REGION: &str = "eu-west-1";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Image URL signing service.
///
/// Signs image resizer URLs for users with a valid SSO session.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-url-signer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeConfig),

    /// Sign an image URL offline and print the result
    Sign(SignConfig),
}

// =============================================================================
// Serve
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // Signing Configuration
    // =========================================================================
    /// Salt used to sign resizer URLs.
    ///
    /// Without it the server starts, but signing requests fail with 500.
    #[arg(long, env = "SALT", hide_env_values = true)]
    pub salt: Option<String>,

    // =========================================================================
    // Stage Configuration
    // =========================================================================
    /// Function name the deployment stage is derived from (e.g. `service-PROD`).
    #[arg(long, env = "AWS_LAMBDA_FUNCTION_NAME")]
    pub function_name: Option<String>,

    /// Running on a developer machine; forces the LOCAL stage.
    #[arg(long, default_value_t = false, env = "LOCAL")]
    pub local: bool,

    /// AWS region holding the SSO settings.
    #[arg(long, default_value = DEFAULT_REGION, env = "AWS_REGION")]
    pub region: String,

    // =========================================================================
    // Verifier Configuration
    // =========================================================================
    /// SSO cookie verification endpoint.
    #[arg(long, env = "VERIFIER_URL")]
    pub verifier_url: Option<String>,

    /// Timeout in seconds for verifier requests.
    #[arg(
        long,
        default_value_t = DEFAULT_VERIFIER_TIMEOUT.as_secs(),
        env = "VERIFIER_TIMEOUT_SECS"
    )]
    pub verifier_timeout_secs: u64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin without credentials.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        let Some(verifier_url) = self.verifier_url.as_deref() else {
            return Err(
                "No SSO verifier configured. Set --verifier-url or VERIFIER_URL".to_string(),
            );
        };

        if let Err(e) = Url::parse(verifier_url) {
            return Err(format!("Invalid verifier url '{}': {}", verifier_url, e));
        }

        if self.verifier_timeout_secs == 0 {
            return Err("verifier_timeout_secs must be greater than 0".to_string());
        }

        if self.region.is_empty() {
            return Err("region must not be empty".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Deployment stage of this process.
    pub fn stage(&self) -> Stage {
        if self.local {
            Stage::Local
        } else {
            Stage::from_function_name(self.function_name.as_deref())
        }
    }

    /// Whether a non-empty salt is configured.
    pub fn has_salt(&self) -> bool {
        self.salt.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Settings for the remote verifier (call validate() first).
    pub fn verifier_settings(&self) -> Result<RemoteVerifierSettings, String> {
        let endpoint = self
            .verifier_url
            .as_deref()
            .ok_or_else(|| "No SSO verifier configured".to_string())
            .and_then(|u| Url::parse(u).map_err(|e| e.to_string()))?;

        Ok(RemoteVerifierSettings {
            endpoint,
            settings_file: self.stage().settings_file().to_string(),
            region: self.region.clone(),
            timeout: Duration::from_secs(self.verifier_timeout_secs),
        })
    }
}

// =============================================================================
// Sign
// =============================================================================

/// Output format of the `sign` command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignOutputFormat {
    /// The signed URL only
    #[default]
    Url,
    /// JSON object with the signed URL and inputs
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct SignConfig {
    /// Source image URL (e.g. https://media.guim.co.uk/...).
    #[arg(long)]
    pub url: String,

    /// Salt used to sign resizer URLs.
    #[arg(long, env = "SALT", hide_env_values = true)]
    pub salt: String,

    /// Target width in pixels (default: 800).
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Output quality (0-100).
    #[arg(long)]
    pub quality: Option<u32>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = SignOutputFormat::Url)]
    pub format: SignOutputFormat,
}

impl SignConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("No URL provided".to_string());
        }
        if self.salt.is_empty() {
            return Err("No salt provided. Set --salt or SALT".to_string());
        }
        self.profile().validate()
    }

    pub fn profile(&self) -> ResizeProfile {
        ResizeProfile::from_parts(self.width, self.height, self.quality)
    }
}

// =============================================================================
// Tests
// =============================================================================
