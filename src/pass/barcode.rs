//! Barcode symbol encoding.
//!
//! Symbol rendering (turning a string into module-width bars) is delegated to
//! the `barcoders` crate. This module validates the input for the chosen
//! symbology and makes sure the produced markup can be embedded inside
//! another SVG document.
//!
//! # Design Decisions
//!
//! - **Code 128, set B**: covers printable ASCII, which is what member
//!   barcodes use. Anything else is rejected up front with the offending
//!   character and position.
//!
//! - **No human-readable text**: only bars are rendered; the pass prints its
//!   own labels.

use barcoders::generators::svg::SVG;
use barcoders::sym::code128::Code128;

use crate::error::EncodeError;

/// Width of the narrowest bar in document units.
pub const DEFAULT_MODULE_WIDTH: u32 = 3;

/// Height of the bars in document units.
pub const DEFAULT_BAR_HEIGHT: u32 = 30;

/// Character-set selector for Code 128 set B.
const CODE128_SET_B: char = 'Ɓ';

/// An embeddable SVG fragment containing one rendered barcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeSymbol {
    markup: String,
}

impl BarcodeSymbol {
    /// Wrap markup produced by a trusted encoder.
    pub fn from_markup(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// Trait for turning a text value into a barcode symbol.
///
/// Implementations must be pure: the same value always yields the same
/// markup.
pub trait BarcodeEncoder: Send + Sync {
    fn encode(&self, value: &str) -> Result<BarcodeSymbol, EncodeError>;
}

/// Code 128 encoder rendering SVG markup.
#[derive(Debug, Clone)]
pub struct Code128Encoder {
    module_width: u32,
    bar_height: u32,
}

impl Code128Encoder {
    pub fn new(module_width: u32, bar_height: u32) -> Self {
        Self {
            module_width: module_width.max(1),
            bar_height: bar_height.max(1),
        }
    }
}

impl Default for Code128Encoder {
    fn default() -> Self {
        Self::new(DEFAULT_MODULE_WIDTH, DEFAULT_BAR_HEIGHT)
    }
}

impl BarcodeEncoder for Code128Encoder {
    fn encode(&self, value: &str) -> Result<BarcodeSymbol, EncodeError> {
        check_code128_set_b(value)?;

        let barcode = Code128::new(format!("{}{}", CODE128_SET_B, value))
            .map_err(|e| EncodeError::Renderer(format!("{:?}", e)))?;
        let encoded = barcode.encode();

        let svg = SVG {
            height: self.bar_height,
            xdim: self.module_width,
            ..SVG::new(self.bar_height)
        };
        let markup = svg
            .generate(&encoded)
            .map_err(|e| EncodeError::Renderer(format!("{:?}", e)))?;

        Ok(BarcodeSymbol::from_markup(strip_xml_declaration(&markup)))
    }
}

/// Reject values that Code 128 set B cannot represent.
fn check_code128_set_b(value: &str) -> Result<(), EncodeError> {
    if value.is_empty() {
        return Err(EncodeError::EmptyValue);
    }

    match value
        .chars()
        .enumerate()
        .find(|(_, c)| !(' '..='~').contains(c))
    {
        Some((position, character)) => Err(EncodeError::UnsupportedCharacter {
            character,
            position,
        }),
        None => Ok(()),
    }
}

/// Drop a leading `<?xml ...?>` declaration; it is only legal at the start of
/// a document.
fn strip_xml_declaration(markup: &str) -> &str {
    let trimmed = markup.trim_start();
    if trimmed.starts_with("<?xml") {
        if let Some(end) = trimmed.find("?>") {
            return trimmed[end + 2..].trim_start();
        }
    }
    trimmed
}
