//! Asset identifiers for uploaded passes.

use std::fmt;

use uuid::Uuid;

/// Prefix shared by every generated asset identifier.
pub const ASSET_ID_PREFIX: &str = "barcode-";

/// Public identifier of an asset in the content store.
///
/// Generated client-side before upload. Uniqueness within a cloud namespace
/// relies on the random v4 UUID suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetId(String);

impl AssetId {
    /// Generate a fresh identifier of the form `barcode-<uuid>`.
    pub fn generate() -> Self {
        Self(format!("{}{}", ASSET_ID_PREFIX, Uuid::new_v4()))
    }

    /// Wrap an identifier returned by the store or supplied by an operator.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name used for the uploaded SVG document.
    pub fn file_name(&self) -> String {
        format!("{}.svg", self.0)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
