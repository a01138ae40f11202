//! Pass generation layer.
//!
//! This module turns a pass request into a composed SVG document and, through
//! [`PassService`], into an uploaded asset with a signed retrieval URL.
//!
//! # Components
//!
//! - [`PassRequest`]: Caller-supplied fields and their validation
//! - [`BarcodeEncoder`]: Trait for rendering a value as barcode markup
//! - [`Code128Encoder`]: Code 128 implementation backed by `barcoders`
//! - [`PassComposer`]: Fixed 600×400 layout with escaped caller text
//! - [`PassService`]: Orchestrates encode, compose, upload and signing
//!
//! # Example
//!
//! ```
//! use pass_forge::pass::{BarcodeEncoder, Code128Encoder, PassComposer};
//!
//! let symbol = Code128Encoder::default().encode("A12345").unwrap();
//! let image = PassComposer::default().compose(&symbol, "Jane Doe", "6:00 PM", "2024-01-01");
//! assert!(image.as_str().contains("Name: Jane Doe"));
//! ```

mod barcode;
mod composer;
mod request;
mod service;

pub use barcode::{
    BarcodeEncoder, BarcodeSymbol, Code128Encoder, DEFAULT_BAR_HEIGHT, DEFAULT_MODULE_WIDTH,
};
pub use composer::{
    xml_escape, PassComposer, PassImage, DEFAULT_PASS_TITLE, PASS_HEIGHT,
    PASS_IMAGE_CONTENT_TYPE, PASS_WIDTH,
};
pub use request::PassRequest;
pub use service::{render_pass, IssuedPass, PassService};
