//! Test utilities for integration tests.
//!
//! Provides spy collaborators for the pass service and a local fake of the
//! content store's upload endpoint for exercising the real HTTP client.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use sha1::{Digest, Sha1};

use pass_forge::config::StoreConfig;
use pass_forge::error::{EncodeError, StoreError};
use pass_forge::pass::{BarcodeEncoder, BarcodeSymbol, Code128Encoder};
use pass_forge::store::{AssetId, ContentStore, UploadRequest};

pub const TEST_CLOUD: &str = "demo";
pub const TEST_API_KEY: &str = "1234567890";
pub const TEST_SECRET: &str = "test-secret";

pub const VALID_BODY: &str = r#"{"memberName":"Jane Doe","sessionTime":"6:00 PM","sessionDate":"2024-01-01","barcodeValue":"A12345"}"#;

/// Store configuration pointing at the given API and delivery bases.
pub fn store_config(api_base_url: impl Into<String>) -> StoreConfig {
    StoreConfig {
        cloud_name: TEST_CLOUD.to_string(),
        api_key: TEST_API_KEY.to_string(),
        api_secret: TEST_SECRET.to_string(),
        upload_preset: None,
        api_base_url: api_base_url.into(),
        delivery_base_url: "https://res.example.com".to_string(),
    }
}

/// Reference signature computed independently of the crate's signer.
pub fn reference_signature(canonical: &str, secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(canonical.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

// =============================================================================
// Spy Encoder
// =============================================================================

/// Delegates to the real Code 128 encoder and counts calls.
#[derive(Clone, Default)]
pub struct SpyEncoder {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl SpyEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// An encoder whose every call fails.
    pub fn failing() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BarcodeEncoder for SpyEncoder {
    fn encode(&self, value: &str) -> Result<BarcodeSymbol, EncodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EncodeError::Renderer(
                "renderer crashed at /opt/internal/lib.so".to_string(),
            ));
        }
        Code128Encoder::default().encode(value)
    }
}

// =============================================================================
// Spy Store
// =============================================================================

/// How the spy store answers an upload.
#[derive(Clone, Debug)]
pub enum SpyOutcome {
    /// Confirm the requested id
    Echo,
    /// Confirm a different, fixed id
    Fixed(AssetId),
    /// Fail every upload
    Fail(StoreError),
}

/// Records uploads and answers according to a [`SpyOutcome`].
#[derive(Clone)]
pub struct SpyStore {
    uploads: Arc<Mutex<Vec<UploadRequest>>>,
    outcome: SpyOutcome,
}

impl SpyStore {
    pub fn new(outcome: SpyOutcome) -> Self {
        Self {
            uploads: Arc::new(Mutex::new(Vec::new())),
            outcome,
        }
    }

    /// A store that confirms the requested id.
    pub fn accepting() -> Self {
        Self::new(SpyOutcome::Echo)
    }

    /// A store that confirms a fixed id.
    pub fn assigning(id: &str) -> Self {
        Self::new(SpyOutcome::Fixed(AssetId::new(id)))
    }

    /// A store whose every upload fails.
    pub fn failing(err: StoreError) -> Self {
        Self::new(SpyOutcome::Fail(err))
    }

    pub fn calls(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn uploads(&self) -> Vec<UploadRequest> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for SpyStore {
    async fn upload(&self, request: UploadRequest) -> Result<AssetId, StoreError> {
        let requested = request.asset_id.clone();
        self.uploads.lock().unwrap().push(request);
        match &self.outcome {
            SpyOutcome::Echo => Ok(requested),
            SpyOutcome::Fixed(id) => Ok(id.clone()),
            SpyOutcome::Fail(err) => Err(err.clone()),
        }
    }
}

// =============================================================================
// Fake Content Store Server
// =============================================================================

/// How the fake upload endpoint answers.
#[derive(Clone, Debug)]
pub enum FakeBehavior {
    /// 200 echoing the submitted `public_id`
    Accept,
    /// 200 with a different `public_id`
    Assign(String),
    /// 200 without any `public_id`
    OmitPublicId,
    /// Non-2xx status with a raw body
    Reject { status: u16, body: String },
    /// Wait before answering
    Stall(Duration),
}

/// One upload received by the fake endpoint.
#[derive(Clone, Debug)]
pub struct CapturedUpload {
    pub content_type: String,
    pub body: String,
}

impl CapturedUpload {
    /// Value of a text field in the multipart body.
    pub fn field(&self, name: &str) -> Option<String> {
        let marker = format!("name=\"{}\"\r\n\r\n", name);
        let start = self.body.find(&marker)? + marker.len();
        let rest = &self.body[start..];
        let end = rest.find("\r\n--")?;
        Some(rest[..end].to_string())
    }
}

struct FakeStoreState {
    behavior: FakeBehavior,
    uploads: Mutex<Vec<CapturedUpload>>,
}

/// Fake content store listening on a local ephemeral port.
pub struct FakeStore {
    addr: SocketAddr,
    state: Arc<FakeStoreState>,
}

impl FakeStore {
    pub async fn start(behavior: FakeBehavior) -> Self {
        let state = Arc::new(FakeStoreState {
            behavior,
            uploads: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route(
                &format!("/v1_1/{}/image/upload", TEST_CLOUD),
                post(fake_upload),
            )
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Base URL to use as `api_base_url`.
    pub fn api_base_url(&self) -> String {
        format!("http://{}/v1_1", self.addr)
    }

    pub fn uploads(&self) -> Vec<CapturedUpload> {
        self.state.uploads.lock().unwrap().clone()
    }
}

async fn fake_upload(
    State(state): State<Arc<FakeStoreState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let captured = CapturedUpload {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    let public_id = captured.field("public_id").unwrap_or_default();
    state.uploads.lock().unwrap().push(captured);

    match &state.behavior {
        FakeBehavior::Accept => Json(serde_json::json!({
            "public_id": public_id,
            "version": 1,
            "format": "svg",
        }))
        .into_response(),
        FakeBehavior::Assign(id) => Json(serde_json::json!({ "public_id": id })).into_response(),
        FakeBehavior::OmitPublicId => Json(serde_json::json!({ "version": 1 })).into_response(),
        FakeBehavior::Reject { status, body } => (
            StatusCode::from_u16(*status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        FakeBehavior::Stall(delay) => {
            tokio::time::sleep(*delay).await;
            Json(serde_json::json!({ "public_id": public_id })).into_response()
        }
    }
}

/// An address nothing is listening on.
pub async fn closed_port_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1_1", addr)
}
