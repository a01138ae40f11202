//! Content store layer.
//!
//! Everything that talks to, or authenticates against, the remote content
//! store lives here:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              PassService                │
//! └──────────┬─────────────────┬────────────┘
//!            │                 │
//!            ▼                 ▼
//! ┌───────────────────┐  ┌──────────────────┐
//! │  UploadSigner /   │  │   ContentStore   │
//! │  RetrievalSigner  │  │      trait       │
//! └───────────────────┘  └────────┬─────────┘
//!                                 │
//!                                 ▼
//!                        ┌──────────────────┐
//!                        │ CloudinaryStore  │
//!                        │ (signed upload)  │
//!                        └──────────────────┘
//! ```

mod asset_id;
mod cloudinary;
pub mod signing;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::pass::PassImage;

pub use asset_id::{AssetId, ASSET_ID_PREFIX};
pub use cloudinary::CloudinaryStore;
pub use signing::{
    api_sign_request, unix_now, RetrievalSigner, SignedUrl, UploadSigner, UrlTtl, RESOURCE_PATH,
};

/// An authenticated upload of one pass image.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Identifier requested for the new asset
    pub asset_id: AssetId,

    /// The composed document
    pub image: PassImage,

    /// Unix timestamp included in the signature
    pub timestamp: u64,

    /// Upload signature over the signed parameter set
    pub signature: String,

    /// Upload preset, sent only when it was part of the signed set
    pub upload_preset: Option<String>,
}

/// Trait for stores that accept pass uploads.
///
/// Implementations perform exactly one attempt and return the identifier
/// confirmed by the store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Upload a pass image and return the store-confirmed identifier.
    async fn upload(&self, request: UploadRequest) -> Result<AssetId, StoreError>;
}
