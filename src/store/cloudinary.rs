//! HTTP content store client.
//!
//! Uploads pass images to the store's image upload endpoint as a signed
//! multipart form. Each upload is a single attempt bounded by the client
//! timeout; failures are never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::pass::PASS_IMAGE_CONTENT_TYPE;

use super::{AssetId, ContentStore, UploadRequest};

/// Longest response excerpt carried into a `Rejected` error.
const MAX_ERROR_EXCERPT: usize = 200;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    public_id: Option<String>,

    #[serde(default)]
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

/// Content store backed by the Cloudinary upload API.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use pass_forge::store::CloudinaryStore;
///
/// let store = CloudinaryStore::new(&config.store, Duration::from_secs(30))?;
/// let asset_id = store.upload(request).await?;
/// ```
#[derive(Clone)]
pub struct CloudinaryStore {
    client: Client,
    upload_url: String,
    api_key: String,
}

impl CloudinaryStore {
    /// Create a store client with the given request timeout.
    pub fn new(config: &StoreConfig, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            upload_url: config.upload_url(),
            api_key: config.api_key.clone(),
        })
    }

    /// Endpoint that receives uploads.
    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    fn build_form(&self, request: UploadRequest) -> Result<Form, StoreError> {
        let file_name = request.asset_id.file_name();
        let length = request.image.len() as u64;
        let file = Part::stream_with_length(Body::from(request.image.into_bytes()), length)
            .file_name(file_name)
            .mime_str(PASS_IMAGE_CONTENT_TYPE)
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.api_key.clone())
            .text("timestamp", request.timestamp.to_string())
            .text("public_id", request.asset_id.to_string())
            .text("signature", request.signature);

        if let Some(preset) = request.upload_preset {
            form = form.text("upload_preset", preset);
        }

        Ok(form)
    }
}

#[async_trait]
impl ContentStore for CloudinaryStore {
    async fn upload(&self, request: UploadRequest) -> Result<AssetId, StoreError> {
        let requested_id = request.asset_id.clone();
        let form = self.build_form(request)?;

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        debug!(
            status = status.as_u16(),
            bytes = body.len(),
            public_id = %requested_id,
            "Upload response received"
        );

        let parsed = serde_json::from_slice::<UploadResponse>(&body);

        if !status.is_success() {
            let message = match parsed {
                Ok(UploadResponse {
                    error: Some(error), ..
                }) => error.message,
                _ => excerpt(&body),
            };
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = parsed.map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        match parsed.public_id {
            Some(id) if !id.is_empty() => {
                if id != requested_id.as_str() {
                    warn!(
                        requested = %requested_id,
                        confirmed = %id,
                        "Store assigned a different public_id"
                    );
                }
                Ok(AssetId::new(id))
            }
            _ => Err(StoreError::MissingPublicId),
        }
    }
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_EXCERPT).collect()
}
