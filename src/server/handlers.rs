//! HTTP request handlers for the pass API.
//!
//! # Endpoints
//!
//! - `POST /api/pass` - Issue a pass and return its signed URL
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::PassError;
use crate::pass::{BarcodeEncoder, PassRequest, PassService};
use crate::store::ContentStore;

/// Body returned for wrong-method requests.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Only POST allowed";

/// `error` value for every processing failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Image generation or upload failed";

/// `error` value for payload validation failures.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid pass request";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the pass service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<E, S> {
    /// The service that issues passes
    pub pass_service: Arc<PassService<E, S>>,
}

impl<E, S> AppState<E, S> {
    pub fn new(pass_service: PassService<E, S>) -> Self {
        Self {
            pass_service: Arc::new(pass_service),
        }
    }
}

impl<E, S> Clone for AppState<E, S> {
    fn clone(&self) -> Self {
        Self {
            pass_service: Arc::clone(&self.pass_service),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Successful issuance.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassResponse {
    /// Signed, time-limited retrieval URL
    pub image_url: String,
}

/// JSON error response.
///
/// Processing failures carry only `error`; validation failures add a
/// `message` naming the offending field.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert PassError to HTTP response.
///
/// Internal failures are logged with full detail and reported to the caller
/// as one generic payload.
impl IntoResponse for PassError {
    fn into_response(self) -> Response {
        match &self {
            PassError::InvalidMethod { method } => {
                debug!(method = %method, status = 405, "Rejected request method");
                (
                    StatusCode::METHOD_NOT_ALLOWED,
                    [(header::ALLOW, "POST")],
                    METHOD_NOT_ALLOWED_MESSAGE,
                )
                    .into_response()
            }
            PassError::Validation(err) => {
                warn!(status = 400, "Client error: {}", err);
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::with_message(
                        INVALID_REQUEST_MESSAGE,
                        err.to_string(),
                    )),
                )
                    .into_response()
            }
            PassError::Encoding(_) | PassError::Upload(_) | PassError::Signing(_) => {
                error!(status = 500, "Server error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(GENERIC_FAILURE_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle pass issuance requests.
///
/// # Endpoint
///
/// `POST /api/pass`
///
/// # Request Body
///
/// ```json
/// {
///   "memberName": "Jane Doe",
///   "sessionTime": "6:00 PM",
///   "sessionDate": "2024-01-01",
///   "barcodeValue": "A12345"
/// }
/// ```
///
/// # Response
///
/// `200 OK` with `{"imageUrl": "https://..."}`.
///
/// # Errors
///
/// - `400 Bad Request`: malformed body or missing/empty field
/// - `500 Internal Server Error`: encoding, upload or signing failed
///
/// Other methods never reach this handler; see [`method_not_allowed`].
pub async fn pass_handler<E, S>(
    State(state): State<AppState<E, S>>,
    body: Bytes,
) -> Result<Json<PassResponse>, PassError>
where
    E: BarcodeEncoder + 'static,
    S: ContentStore + 'static,
{
    let request = PassRequest::from_json(&body)?;
    let issued = state.pass_service.issue(&request).await?;

    Ok(Json(PassResponse {
        image_url: issued.image_url,
    }))
}

/// Reject every method other than POST on the pass route.
///
/// Extracts only the method, so the body is never read or size-checked.
pub async fn method_not_allowed(method: Method) -> PassError {
    PassError::InvalidMethod {
        method: method.to_string(),
    }
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
