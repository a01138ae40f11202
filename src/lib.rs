//! # Pass Forge
//!
//! Issues barcode session passes. A pass request (member name, session time,
//! session date and barcode value) is rendered as a Code 128 barcode inside a
//! fixed 600×400 SVG layout, uploaded to a content store with a signed
//! request, and returned as a time-limited signed retrieval URL.
//!
//! ## Features
//!
//! - **Deterministic composition**: identical inputs produce byte-identical documents
//! - **Escaped caller text**: names and dates cannot alter the SVG structure
//! - **Signed uploads**: every upload is authenticated with the store's SHA-1 signature
//! - **Signed retrieval URLs**: expiring URLs with a configurable, bounded lifetime
//! - **Single-attempt uploads**: explicit timeout, no retries, no partial success
//!
//! ## Architecture
//!
//! - [`pass`] - Request validation, barcode encoding, composition and orchestration
//! - [`store`] - Content store client, asset identifiers and request signing
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types for every layer
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use pass_forge::{create_router, Code128Encoder, CloudinaryStore, PassService, RouterConfig, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store_config = StoreConfig {
//!         cloud_name: "demo".to_string(),
//!         api_key: "1234".to_string(),
//!         api_secret: "secret".to_string(),
//!         upload_preset: None,
//!         api_base_url: "https://api.cloudinary.com/v1_1".to_string(),
//!         delivery_base_url: "https://res.cloudinary.com".to_string(),
//!     };
//!
//!     let store = CloudinaryStore::new(&store_config, Duration::from_secs(30)).unwrap();
//!     let service = PassService::new(Code128Encoder::default(), store, &store_config);
//!     let router = create_router(service, RouterConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod pass;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::{
    Cli, Command, RenderConfig, ServeConfig, SignConfig, SignOutputFormat, StoreConfig,
};
pub use error::{EncodeError, PassError, SignatureError, StoreError, ValidationError};
pub use pass::{
    render_pass, xml_escape, BarcodeEncoder, BarcodeSymbol, Code128Encoder, IssuedPass,
    PassComposer, PassImage, PassRequest, PassService, DEFAULT_PASS_TITLE, PASS_HEIGHT,
    PASS_IMAGE_CONTENT_TYPE, PASS_WIDTH,
};
pub use server::{
    create_router, health_handler, method_not_allowed, pass_handler, AppState, ErrorResponse,
    HealthResponse, PassResponse, RouterConfig, GENERIC_FAILURE_MESSAGE, INVALID_REQUEST_MESSAGE,
    METHOD_NOT_ALLOWED_MESSAGE, PASS_ROUTE,
};
pub use store::{
    api_sign_request, unix_now, AssetId, CloudinaryStore, ContentStore, RetrievalSigner,
    SignedUrl, UploadRequest, UploadSigner, UrlTtl, ASSET_ID_PREFIX,
};
