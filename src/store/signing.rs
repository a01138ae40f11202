//! Request signing for the content store.
//!
//! The store authenticates both uploads and retrievals with the same
//! construction: a canonical parameter string with the raw API secret
//! appended, hashed with SHA-1. This is not an HMAC.
//!
//! # Canonical String
//!
//! Parameters are sorted by name and joined as `name=value` pairs with `&`.
//! The secret follows the last value without a delimiter:
//!
//! ```text
//! signature = hex(SHA1("public_id=barcode-1&timestamp=1700000000" + secret))
//! ```
//!
//! The verifier rebuilds this string byte-for-byte, so adding, renaming or
//! reordering parameters produces a signature it will reject.
//!
//! # Retrieval URLs
//!
//! Retrieval URLs carry `public_id`, `timestamp` (the expiry), `signature`
//! and `api_key`, in that order:
//!
//! ```text
//! https://res.cloudinary.com/demo/image/upload?public_id=barcode-1&timestamp=1700003600&signature=3f2a...&api_key=1234
//! ```
//!
//! # Example
//!
//! ```rust
//! use pass_forge::store::signing::{api_sign_request, RetrievalSigner, UrlTtl};
//!
//! let signature = api_sign_request(
//!     &[("timestamp", "1700000000"), ("public_id", "barcode-test-1")],
//!     "shhh",
//! );
//! assert_eq!(signature.len(), 40);
//!
//! let signer = RetrievalSigner::new("https://res.cloudinary.com", "demo", "key", "shhh");
//! let signed = signer
//!     .signed_url("barcode-test-1", UrlTtl::from_secs(3600).unwrap())
//!     .unwrap();
//! assert!(signer
//!     .verify("barcode-test-1", &signed.signature, signed.expires_at)
//!     .is_ok());
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;
use url::form_urlencoded;

use crate::config::{DEFAULT_URL_TTL_SECS, MAX_URL_TTL_SECS, MIN_URL_TTL_SECS};
use crate::error::SignatureError;

/// Path segment for image assets uploaded through the image API.
pub const RESOURCE_PATH: &str = "image/upload";

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Compute the store's signature over a parameter set.
///
/// Returns the lowercase hex SHA-1 digest of the canonical query with the
/// secret appended.
pub fn api_sign_request(params: &[(&str, &str)], secret: &str) -> String {
    let mut to_sign = canonical_query(params);
    to_sign.push_str(secret);

    hex::encode(Sha1::digest(to_sign.as_bytes()))
}

fn canonical_query(params: &[(&str, &str)]) -> String {
    let mut pairs = params.to_vec();
    pairs.sort_by(|a, b| a.0.cmp(b.0).then(a.1.cmp(b.1)));
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

// =============================================================================
// URL Lifetime
// =============================================================================

/// Lifetime of a signed retrieval URL.
///
/// Always within `MIN_URL_TTL_SECS..=MAX_URL_TTL_SECS`, so a URL is never
/// expired on issue and its expiry cannot run past the clock's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlTtl(Duration);

impl UrlTtl {
    /// Accept a lifetime in whole seconds.
    pub fn from_secs(secs: u64) -> Result<Self, SignatureError> {
        if !(MIN_URL_TTL_SECS..=MAX_URL_TTL_SECS).contains(&secs) {
            return Err(SignatureError::LifetimeOutOfRange {
                secs,
                min: MIN_URL_TTL_SECS,
                max: MAX_URL_TTL_SECS,
            });
        }
        Ok(Self(Duration::from_secs(secs)))
    }

    /// Accept a lifetime; sub-second precision is dropped.
    pub fn new(ttl: Duration) -> Result<Self, SignatureError> {
        Self::from_secs(ttl.as_secs())
    }

    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Unix timestamp `self` from now.
    pub fn expiry_from_now(&self) -> Result<u64, SignatureError> {
        unix_now()
            .checked_add(self.as_secs())
            .ok_or(SignatureError::ExpiryOverflow)
    }
}

impl Default for UrlTtl {
    fn default() -> Self {
        Self(Duration::from_secs(DEFAULT_URL_TTL_SECS))
    }
}

// =============================================================================
// Upload Signer
// =============================================================================

/// Signs authenticated upload requests.
#[derive(Clone)]
pub struct UploadSigner {
    api_secret: String,
}

impl UploadSigner {
    pub fn new(api_secret: impl Into<String>) -> Self {
        Self {
            api_secret: api_secret.into(),
        }
    }

    /// Sign an upload of `public_id` at `timestamp`.
    ///
    /// The signed set is `public_id` and `timestamp`, plus `upload_preset`
    /// when one is sent with the upload.
    pub fn sign(&self, public_id: &str, timestamp: u64, upload_preset: Option<&str>) -> String {
        let timestamp = timestamp.to_string();
        let mut params = vec![("public_id", public_id), ("timestamp", timestamp.as_str())];
        if let Some(preset) = upload_preset {
            params.push(("upload_preset", preset));
        }

        api_sign_request(&params, &self.api_secret)
    }
}

// =============================================================================
// Retrieval Signer
// =============================================================================

/// A signed, time-limited retrieval URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    /// Fully qualified URL
    pub url: String,

    /// Hex-encoded signature embedded in the URL
    pub signature: String,

    /// Unix timestamp after which the store refuses the URL
    pub expires_at: u64,
}

/// Builds signed retrieval URLs for uploaded assets.
#[derive(Clone)]
pub struct RetrievalSigner {
    delivery_base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl RetrievalSigner {
    /// Create a signer for one cloud namespace.
    pub fn new(
        delivery_base_url: impl Into<String>,
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            delivery_base_url: delivery_base_url.into(),
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Sign retrieval of `public_id` for `ttl` from now.
    ///
    /// Returns the hex-encoded signature and the expiry timestamp.
    pub fn sign(&self, public_id: &str, ttl: UrlTtl) -> Result<(String, u64), SignatureError> {
        let expiry = ttl.expiry_from_now()?;
        Ok((self.sign_with_expiry(public_id, expiry), expiry))
    }

    /// Sign retrieval of `public_id` until a specific Unix timestamp.
    pub fn sign_with_expiry(&self, public_id: &str, expiry: u64) -> String {
        let expiry = expiry.to_string();
        api_sign_request(
            &[("public_id", public_id), ("timestamp", expiry.as_str())],
            &self.api_secret,
        )
    }

    /// Build a signed URL valid for `ttl` from now.
    pub fn signed_url(&self, public_id: &str, ttl: UrlTtl) -> Result<SignedUrl, SignatureError> {
        let expiry = ttl.expiry_from_now()?;
        Ok(self.signed_url_with_expiry(public_id, expiry))
    }

    /// Build a signed URL valid until `expiry`.
    pub fn signed_url_with_expiry(&self, public_id: &str, expiry: u64) -> SignedUrl {
        let signature = self.sign_with_expiry(public_id, expiry);

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("public_id", public_id)
            .append_pair("timestamp", &expiry.to_string())
            .append_pair("signature", &signature)
            .append_pair("api_key", &self.api_key);

        let url = format!(
            "{}/{}/{}?{}",
            self.delivery_base_url.trim_end_matches('/'),
            self.cloud_name,
            RESOURCE_PATH,
            serializer.finish()
        );

        SignedUrl {
            url,
            signature,
            expires_at: expiry,
        }
    }

    /// Verify a retrieval signature the way the store does.
    ///
    /// Checks expiry first, then compares signatures in constant time.
    pub fn verify(
        &self,
        public_id: &str,
        signature: &str,
        expiry: u64,
    ) -> Result<(), SignatureError> {
        let current_time = unix_now();
        if current_time > expiry {
            return Err(SignatureError::Expired {
                expired_at: expiry,
                current_time,
            });
        }

        let provided = hex::decode(signature).map_err(|_| SignatureError::InvalidSignatureFormat)?;
        let expected = hex::decode(self.sign_with_expiry(public_id, expiry))
            .map_err(|_| SignatureError::InvalidSignatureFormat)?;

        if provided.ct_eq(&expected).into() {
            Ok(())
        } else {
            Err(SignatureError::InvalidSignature)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
