use thiserror::Error;

/// Errors raised while turning a barcode value into a symbol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Nothing to encode
    #[error("Barcode value is empty")]
    EmptyValue,

    /// Character cannot be represented in Code 128 set B
    #[error("Unsupported character {character:?} at position {position} (only printable ASCII is allowed)")]
    UnsupportedCharacter { character: char, position: usize },

    /// The symbol renderer rejected the input or failed internally
    #[error("Barcode renderer failed: {0}")]
    Renderer(String),
}

/// Errors returned by the content store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Network or connection error, including timeouts
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered with a non-success status
    #[error("Upload rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The store accepted the request but returned no asset identifier
    #[error("Upload response did not contain a public_id")]
    MissingPublicId,

    /// The response body could not be decoded
    #[error("Invalid upload response: {0}")]
    InvalidResponse(String),
}

/// Errors in the inbound pass request payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Body is not a JSON object with string fields
    #[error("Request body is not valid JSON: {0}")]
    MalformedBody(String),

    /// A required field is absent, empty or whitespace-only
    #[error("Field '{0}' is missing or empty")]
    EmptyField(&'static str),
}

/// Errors from verifying a retrieval signature
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The embedded expiry timestamp has elapsed
    #[error("Signature expired at {expired_at} (current time: {current_time})")]
    Expired { expired_at: u64, current_time: u64 },

    /// Signature does not match the canonical string
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature is not valid hex
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Requested URL lifetime is outside the accepted window
    #[error("URL lifetime of {secs}s is outside the accepted range {min}..={max}s")]
    LifetimeOutOfRange { secs: u64, min: u64, max: u64 },

    /// Expiry timestamp does not fit in a u64
    #[error("Expiry timestamp overflows")]
    ExpiryOverflow,
}

/// Errors surfaced by the pass pipeline.
///
/// Only `InvalidMethod` and `Validation` are reported to callers in any
/// detail; every other variant collapses into one generic failure response.
#[derive(Debug, Clone, Error)]
pub enum PassError {
    /// Request used a method other than POST
    #[error("Method {method} not allowed")]
    InvalidMethod { method: String },

    /// Payload failed validation before any work was attempted
    #[error("Invalid pass request: {0}")]
    Validation(#[from] ValidationError),

    /// The barcode could not be produced
    #[error("Barcode encoding failed: {0}")]
    Encoding(#[from] EncodeError),

    /// The content store rejected the upload or could not be reached
    #[error("Upload failed: {0}")]
    Upload(#[from] StoreError),

    /// The retrieval URL could not be signed
    #[error("Signing failed: {0}")]
    Signing(#[from] SignatureError),
}
