//! Content store client tests against a local fake upload endpoint.
//!
//! Tests verify:
//! - Multipart form contents and signing
//! - Store-confirmed identifiers
//! - Rejections, malformed responses, transport failures and timeouts

use std::time::Duration;

use pass_forge::error::StoreError;
use pass_forge::pass::{BarcodeEncoder, Code128Encoder, PassComposer};
use pass_forge::store::{AssetId, CloudinaryStore, ContentStore, UploadRequest, UploadSigner};

use super::test_utils::{
    closed_port_base_url, reference_signature, store_config, FakeBehavior, FakeStore,
    TEST_API_KEY, TEST_SECRET,
};

fn upload_request(preset: Option<&str>) -> UploadRequest {
    let symbol = Code128Encoder::default().encode("A12345").unwrap();
    let image = PassComposer::default().compose(&symbol, "Jane Doe", "6:00 PM", "2024-01-01");
    let asset_id = AssetId::generate();
    let timestamp = 1_700_000_000;
    let signature = UploadSigner::new(TEST_SECRET).sign(asset_id.as_str(), timestamp, preset);

    UploadRequest {
        asset_id,
        image,
        timestamp,
        signature,
        upload_preset: preset.map(str::to_string),
    }
}

fn store_for(fake: &FakeStore) -> CloudinaryStore {
    CloudinaryStore::new(&store_config(fake.api_base_url()), Duration::from_secs(5)).unwrap()
}

// =============================================================================
// Successful Uploads
// =============================================================================

#[tokio::test]
async fn test_upload_sends_signed_multipart_form() {
    let fake = FakeStore::start(FakeBehavior::Accept).await;
    let store = store_for(&fake);

    let request = upload_request(None);
    let requested = request.asset_id.clone();
    let confirmed = store.upload(request).await.unwrap();
    assert_eq!(confirmed, requested);

    let uploads = fake.uploads();
    assert_eq!(uploads.len(), 1);
    let upload = &uploads[0];

    assert!(upload.content_type.starts_with("multipart/form-data"));
    assert_eq!(upload.field("api_key").as_deref(), Some(TEST_API_KEY));
    assert_eq!(upload.field("timestamp").as_deref(), Some("1700000000"));
    assert_eq!(upload.field("public_id").as_deref(), Some(requested.as_str()));
    assert_eq!(
        upload.field("signature").unwrap(),
        reference_signature(
            &format!("public_id={}&timestamp=1700000000", requested),
            TEST_SECRET
        )
    );
    assert!(upload.field("upload_preset").is_none());

    let lower = upload.body.to_lowercase();
    assert!(lower.contains(&format!("filename=\"{}.svg\"", requested)));
    assert!(lower.contains("content-type: image/svg+xml"));
    assert!(upload.body.contains("Name: Jane Doe"));
}

#[tokio::test]
async fn test_upload_sends_signed_preset() {
    let fake = FakeStore::start(FakeBehavior::Accept).await;
    let store = store_for(&fake);

    let request = upload_request(Some("passes"));
    let requested = request.asset_id.clone();
    store.upload(request).await.unwrap();

    let upload = &fake.uploads()[0];
    assert_eq!(upload.field("upload_preset").as_deref(), Some("passes"));
    assert_eq!(
        upload.field("signature").unwrap(),
        reference_signature(
            &format!(
                "public_id={}&timestamp=1700000000&upload_preset=passes",
                requested
            ),
            TEST_SECRET
        )
    );
}

#[tokio::test]
async fn test_store_assigned_id_is_returned() {
    let fake = FakeStore::start(FakeBehavior::Assign("barcode-abc".to_string())).await;
    let store = store_for(&fake);

    let confirmed = store.upload(upload_request(None)).await.unwrap();
    assert_eq!(confirmed.as_str(), "barcode-abc");
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_missing_public_id() {
    let fake = FakeStore::start(FakeBehavior::OmitPublicId).await;
    let store = store_for(&fake);

    let err = store.upload(upload_request(None)).await.unwrap_err();
    assert_eq!(err, StoreError::MissingPublicId);
}

#[tokio::test]
async fn test_rejection_carries_store_message() {
    let fake = FakeStore::start(FakeBehavior::Reject {
        status: 401,
        body: r#"{"error":{"message":"Invalid Signature"}}"#.to_string(),
    })
    .await;
    let store = store_for(&fake);

    let err = store.upload(upload_request(None)).await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Rejected {
            status: 401,
            message: "Invalid Signature".to_string(),
        }
    );
}

#[tokio::test]
async fn test_rejection_with_plain_body() {
    let fake = FakeStore::start(FakeBehavior::Reject {
        status: 502,
        body: "Bad Gateway".to_string(),
    })
    .await;
    let store = store_for(&fake);

    let err = store.upload(upload_request(None)).await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Rejected {
            status: 502,
            message: "Bad Gateway".to_string(),
        }
    );
}

#[tokio::test]
async fn test_transport_failure() {
    let config = store_config(closed_port_base_url().await);
    let store = CloudinaryStore::new(&config, Duration::from_secs(5)).unwrap();

    let err = store.upload(upload_request(None)).await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}

#[tokio::test]
async fn test_timeout_is_single_attempt() {
    let fake = FakeStore::start(FakeBehavior::Stall(Duration::from_secs(3))).await;
    let config = store_config(fake.api_base_url());
    let store = CloudinaryStore::new(&config, Duration::from_millis(500)).unwrap();

    let err = store.upload(upload_request(None)).await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
    assert_eq!(fake.uploads().len(), 1);
}
