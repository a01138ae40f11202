//! Pass composer - lays out the barcode and caller text in a fixed SVG template.

use bytes::Bytes;

use super::barcode::BarcodeSymbol;

/// Logical width of a pass document.
pub const PASS_WIDTH: u32 = 600;

/// Logical height of a pass document.
pub const PASS_HEIGHT: u32 = 400;

/// MIME type of composed passes.
pub const PASS_IMAGE_CONTENT_TYPE: &str = "image/svg+xml";

/// Title printed when none is configured.
pub const DEFAULT_PASS_TITLE: &str = "Tribe Sauna + Ice";

const MARGIN_X: u32 = 40;
const TITLE_Y: u32 = 40;
const FIRST_LABEL_Y: u32 = 80;
const LABEL_SPACING: u32 = 30;
const BARCODE_Y: u32 = 180;

/// Escape XML special characters so caller text cannot alter document structure.
pub fn xml_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// A composed pass document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassImage {
    document: String,
}

impl PassImage {
    pub fn as_str(&self) -> &str {
        &self.document
    }

    /// Size of the serialized document in bytes.
    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Serialize to an upload buffer.
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.document)
    }
}

/// Composes pass documents from a barcode symbol and caller text.
#[derive(Debug, Clone)]
pub struct PassComposer {
    title: String,
}

impl PassComposer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Compose a pass.
    ///
    /// The symbol markup is trusted and embedded as-is. Every text value,
    /// including the configured title, is escaped. Identical inputs always
    /// produce byte-identical documents.
    pub fn compose(
        &self,
        symbol: &BarcodeSymbol,
        member_name: &str,
        session_time: &str,
        session_date: &str,
    ) -> PassImage {
        let document = format!(
            r#"<svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">
  <style>
    .title {{ font: bold 24px sans-serif; }}
    .label {{ font: 16px sans-serif; }}
  </style>
  <rect width="100%" height="100%" fill="white"/>
  <text x="{x}" y="{title_y}" class="title">{title}</text>
  <text x="{x}" y="{name_y}" class="label">Name: {member_name}</text>
  <text x="{x}" y="{time_y}" class="label">Time: {session_time}</text>
  <text x="{x}" y="{date_y}" class="label">Date: {session_date}</text>
  <g transform="translate({x}, {barcode_y})">
    {barcode}
  </g>
</svg>"#,
            width = PASS_WIDTH,
            height = PASS_HEIGHT,
            x = MARGIN_X,
            title_y = TITLE_Y,
            name_y = FIRST_LABEL_Y,
            time_y = FIRST_LABEL_Y + LABEL_SPACING,
            date_y = FIRST_LABEL_Y + 2 * LABEL_SPACING,
            barcode_y = BARCODE_Y,
            title = xml_escape(&self.title),
            member_name = xml_escape(member_name),
            session_time = xml_escape(session_time),
            session_date = xml_escape(session_date),
            barcode = symbol.markup(),
        );

        PassImage { document }
    }
}

impl Default for PassComposer {
    fn default() -> Self {
        Self::new(DEFAULT_PASS_TITLE)
    }
}
