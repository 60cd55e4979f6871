//! Deployment stage and the values derived from it.

use std::fmt;

use serde::Serialize;

/// Return URL used in login links when the service runs on localhost.
pub const LOCAL_RETURN_URL: &str = "https://image-url-signing-service.local.dev-gutools.co.uk/";

/// Deployment stage of the running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stage {
    /// Staging
    Code,
    /// Production
    Prod,
    /// Developer machine
    Local,
}

impl Stage {
    /// Derive the stage from a function name such as `image-url-signing-service-CODE`.
    ///
    /// The last `-`-separated token equal to `CODE` or `PROD` decides; anything
    /// else is [`Stage::Local`].
    pub fn from_function_name(name: Option<&str>) -> Self {
        name.unwrap_or("")
            .split('-')
            .filter_map(|token| match token {
                "CODE" => Some(Stage::Code),
                "PROD" => Some(Stage::Prod),
                _ => None,
            })
            .last()
            .unwrap_or(Stage::Local)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Code => "CODE",
            Stage::Prod => "PROD",
            Stage::Local => "LOCAL",
        }
    }

    /// Public settings file the SSO verifier reads its keys from.
    pub fn settings_file(&self) -> &'static str {
        match self {
            Stage::Prod => "gutools.co.uk.settings.public",
            Stage::Code => "code.dev-gutools.co.uk.settings.public",
            Stage::Local => "local.dev-gutools.co.uk.settings.public",
        }
    }

    /// Origin of the SSO login service for this stage.
    pub fn login_domain(&self) -> &'static str {
        match self {
            Stage::Prod => "https://login.gutools.co.uk",
            Stage::Code => "https://login.code.dev-gutools.co.uk",
            Stage::Local => "https://login.local.dev-gutools.co.uk",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
