use thiserror::Error;

/// Errors raised while turning a sign request into a signed URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    /// No usable `url` in the body or query
    #[error("No URL provided")]
    MissingUrl,

    /// The signing salt is not configured
    #[error("Service incorrectly configured. No salt provided")]
    MissingSecret,

    /// The signer rejected the input
    #[error("Error signing url")]
    Signing(#[from] SigningError),
}

/// Errors from the image URL signer itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// Input is not a parseable absolute URL
    #[error("Invalid image url: {0}")]
    InvalidUrl(String),

    /// Only http and https sources can be resized
    #[error("Unsupported url scheme: {0}")]
    UnsupportedScheme(String),

    /// URL has no host to derive the image service from
    #[error("Image url has no host")]
    MissingHost,
}

/// Errors raised by the SSO cookie verifier.
#[derive(Debug, Clone, Error)]
pub enum VerifierError {
    /// Network or connection error talking to the verifier
    #[error("Connection error: {0}")]
    Connection(String),

    /// Verifier answered with an unexpected status
    #[error("Verifier returned status {status}")]
    UnexpectedStatus { status: u16 },

    /// Verifier response body could not be decoded
    #[error("Invalid verifier response: {0}")]
    InvalidResponse(String),
}
