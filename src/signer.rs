//! Image resizer URL signing.
//!
//! Source images live on content hosts such as `media.guim.co.uk`. The
//! resizer serves them from `https://i.guim.co.uk/img/{service}{path}` and
//! only honours requests whose query carries a signature over the path and
//! resize parameters:
//!
//! ```text
//! path      = "{source_path}?width=800&height=...&quality=..."
//! signature = hex(MD5(salt + path))
//! url       = "https://i.guim.co.uk/img/{service}{path}&s={signature}"
//! ```
//!
//! The service is the first label of the source host (`media` for
//! `media.guim.co.uk`).
//!
//! # Example
//!
//! ```rust
//! use image_url_signer::signer::{ImageSigner, ResizeProfile};
//!
//! let signer = ImageSigner::new("fake");
//! let signed = signer
//!     .sign("https://media.guim.co.uk/abc/master/1.jpg", &ResizeProfile::default())
//!     .unwrap();
//! assert!(signed.starts_with("https://i.guim.co.uk/img/media/abc/master/1.jpg?width=800&s="));
//! ```

use md5::{Digest, Md5};
use url::{form_urlencoded, Url};

use crate::error::SigningError;

/// Resizer origin that signed URLs point at.
pub const IMAGE_SERVICE_URL: &str = "https://i.guim.co.uk";

/// Width used when a request does not ask for one.
pub const DEFAULT_WIDTH: u32 = 800;

/// Highest quality the resizer accepts.
pub const MAX_QUALITY: u32 = 100;

// =============================================================================
// Resize Profile
// =============================================================================

/// Resize parameters encoded into a signed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeProfile {
    /// Target width in pixels
    pub width: u32,

    /// Target height in pixels
    pub height: Option<u32>,

    /// Output quality (0-100)
    pub quality: Option<u32>,
}

impl Default for ResizeProfile {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: None,
            quality: None,
        }
    }
}

impl ResizeProfile {
    /// Build a profile from optional parts, falling back to [`DEFAULT_WIDTH`].
    pub fn from_parts(width: Option<u32>, height: Option<u32>, quality: Option<u32>) -> Self {
        Self {
            width: width.unwrap_or(DEFAULT_WIDTH),
            height,
            quality,
        }
    }

    /// Whether `value` is a usable width or height.
    pub fn is_valid_dimension(value: u32) -> bool {
        value > 0
    }

    /// Whether `value` is a usable quality (0-100).
    pub fn is_valid_quality(value: u32) -> bool {
        value <= MAX_QUALITY
    }

    /// Check every part against the resizer's limits.
    pub fn validate(&self) -> Result<(), String> {
        if !Self::is_valid_dimension(self.width) {
            return Err("width must be greater than 0".to_string());
        }
        if self.height.is_some_and(|h| !Self::is_valid_dimension(h)) {
            return Err("height must be greater than 0".to_string());
        }
        if self.quality.is_some_and(|q| !Self::is_valid_quality(q)) {
            return Err(format!("quality must be between 0 and {}", MAX_QUALITY));
        }
        Ok(())
    }

    /// Query string for the resizer, in the fixed order width, height, quality.
    fn query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("width", &self.width.to_string());
        if let Some(height) = self.height {
            serializer.append_pair("height", &height.to_string());
        }
        if let Some(quality) = self.quality {
            serializer.append_pair("quality", &quality.to_string());
        }
        serializer.finish()
    }
}

// =============================================================================
// Signer
// =============================================================================

/// Signs source image URLs with a shared salt.
#[derive(Clone)]
pub struct ImageSigner {
    salt: String,
}

impl std::fmt::Debug for ImageSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSigner").finish_non_exhaustive()
    }
}

impl ImageSigner {
    /// Create a signer for the given salt.
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Produce the signed resizer URL for `source_url`.
    pub fn sign(&self, source_url: &str, profile: &ResizeProfile) -> Result<String, SigningError> {
        let parsed =
            Url::parse(source_url).map_err(|e| SigningError::InvalidUrl(e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(SigningError::UnsupportedScheme(other.to_string())),
        }

        let service = parsed
            .host_str()
            .and_then(|host| host.split('.').next())
            .filter(|label| !label.is_empty())
            .ok_or(SigningError::MissingHost)?;

        let path = format!("{}?{}", parsed.path(), profile.query());
        let signature = self.compute_signature(&path);

        Ok(format!(
            "{}/img/{}{}&s={}",
            IMAGE_SERVICE_URL, service, path, signature
        ))
    }

    fn compute_signature(&self, path: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(path.as_bytes());
        hex::encode(hasher.finalize())
    }
}

// =============================================================================
// Tests
// =============================================================================
