//! Router configuration for Pass Forge.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! request tracing and body size limits.
//!
//! # Route Structure
//!
//! ```text
//! /health      - Health check
//! /api/pass    - Pass issuance (POST only; other methods get 405)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pass_forge::server::{create_router, RouterConfig};
//!
//! let router = create_router(pass_service, RouterConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, method_not_allowed, pass_handler, AppState};
use crate::pass::{BarcodeEncoder, PassService};
use crate::store::ContentStore;

/// Default request body limit (64 KiB). Pass requests are four short strings.
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Path of the pass issuance endpoint.
pub const PASS_ROUTE: &str = "/api/pass";

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,

    /// Maximum accepted request body in bytes
    pub body_limit: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl RouterConfig {
    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Set the maximum request body size in bytes.
    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Non-POST requests on the pass route fall through to
/// [`method_not_allowed`] before any body extraction, so the body limit
/// never applies to them.
pub fn create_router<E, S>(pass_service: PassService<E, S>, config: RouterConfig) -> Router
where
    E: BarcodeEncoder + 'static,
    S: ContentStore + 'static,
{
    let app_state = AppState::new(pass_service);
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route(
            PASS_ROUTE,
            post(pass_handler::<E, S>).fallback(method_not_allowed),
        )
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
