//! Pass service orchestrating pass issuance.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          PassService                           │
//! │                                                                │
//! │  issue():  validate ─► encode ─► compose ─► sign upload        │
//! │                                                 │              │
//! │            respond ◄─ sign retrieval ◄─ upload ◄┘              │
//! │                                                                │
//! │     ┌────────────────┐  ┌─────────────┐  ┌──────────────────┐  │
//! │     │ BarcodeEncoder │  │PassComposer │  │   ContentStore   │  │
//! │     └────────────────┘  └─────────────┘  └──────────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step runs in sequence for each request. The only suspension point
//! is the upload; there is no shared mutable state between requests.

use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::PassError;
use crate::store::{
    unix_now, AssetId, ContentStore, RetrievalSigner, UploadRequest, UploadSigner, UrlTtl,
};

use super::barcode::BarcodeEncoder;
use super::composer::{PassComposer, PassImage};
use super::request::PassRequest;

/// Result of a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedPass {
    /// Identifier confirmed by the store
    pub asset_id: AssetId,

    /// Signed retrieval URL
    pub image_url: String,

    /// Unix timestamp at which `image_url` stops working
    pub expires_at: u64,
}

/// Validate, encode and compose a pass without uploading it.
///
/// Shared by [`PassService::render`] and the `render` command.
pub fn render_pass<E: BarcodeEncoder + ?Sized>(
    encoder: &E,
    composer: &PassComposer,
    request: &PassRequest,
) -> Result<PassImage, PassError> {
    request.validate()?;

    let symbol = encoder.encode(&request.barcode_value)?;
    debug!(bytes = symbol.markup().len(), "Barcode encoded");

    Ok(composer.compose(
        &symbol,
        &request.member_name,
        &request.session_time,
        &request.session_date,
    ))
}

/// Service that turns pass requests into signed retrieval URLs.
///
/// # Type Parameters
///
/// * `E` - The barcode encoder
/// * `S` - The content store
///
/// # Example
///
/// ```ignore
/// use pass_forge::pass::{Code128Encoder, PassRequest, PassService};
/// use pass_forge::store::CloudinaryStore;
///
/// let store = CloudinaryStore::new(&config.store, timeout)?;
/// let service = PassService::new(Code128Encoder::default(), store, &config.store);
///
/// let request = PassRequest::new("Jane Doe", "6:00 PM", "2024-01-01", "A12345");
/// let issued = service.issue(&request).await?;
/// println!("{}", issued.image_url);
/// ```
pub struct PassService<E, S> {
    encoder: E,
    composer: PassComposer,
    store: S,
    upload_signer: UploadSigner,
    retrieval_signer: RetrievalSigner,
    upload_preset: Option<String>,
    url_ttl: UrlTtl,
}

impl<E, S> PassService<E, S>
where
    E: BarcodeEncoder,
    S: ContentStore,
{
    /// Create a service with the default composer and URL lifetime.
    pub fn new(encoder: E, store: S, config: &StoreConfig) -> Self {
        Self {
            encoder,
            composer: PassComposer::default(),
            store,
            upload_signer: UploadSigner::new(config.api_secret.clone()),
            retrieval_signer: RetrievalSigner::new(
                config.delivery_base_url.clone(),
                config.cloud_name.clone(),
                config.api_key.clone(),
                config.api_secret.clone(),
            ),
            upload_preset: config.upload_preset.clone(),
            url_ttl: UrlTtl::default(),
        }
    }

    /// Replace the composer (e.g. to change the title).
    pub fn with_composer(mut self, composer: PassComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Set the lifetime of issued retrieval URLs.
    pub fn with_url_ttl(mut self, ttl: UrlTtl) -> Self {
        self.url_ttl = ttl;
        self
    }

    pub fn url_ttl(&self) -> UrlTtl {
        self.url_ttl
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate, encode and compose a pass without uploading it.
    pub fn render(&self, request: &PassRequest) -> Result<PassImage, PassError> {
        render_pass(&self.encoder, &self.composer, request)
    }

    /// Issue a pass: compose it, upload it and sign a retrieval URL.
    ///
    /// Either a complete signed URL is returned or a single error; there is
    /// no partial success. The upload is attempted exactly once.
    pub async fn issue(&self, request: &PassRequest) -> Result<IssuedPass, PassError> {
        let image = self.render(request)?;

        let asset_id = AssetId::generate();
        let timestamp = unix_now();
        let signature = self.upload_signer.sign(
            asset_id.as_str(),
            timestamp,
            self.upload_preset.as_deref(),
        );

        debug!(
            public_id = %asset_id,
            bytes = image.len(),
            timestamp = timestamp,
            "Uploading pass image"
        );

        let confirmed = self
            .store
            .upload(UploadRequest {
                asset_id,
                image,
                timestamp,
                signature,
                upload_preset: self.upload_preset.clone(),
            })
            .await?;

        let signed = self
            .retrieval_signer
            .signed_url(confirmed.as_str(), self.url_ttl)?;

        info!(
            public_id = %confirmed,
            expires_at = signed.expires_at,
            "Pass issued"
        );

        Ok(IssuedPass {
            asset_id: confirmed,
            image_url: signed.url,
            expires_at: signed.expires_at,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
