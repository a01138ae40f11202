//! Inbound pass request payload and its validation.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Fields supplied by the caller for one pass.
///
/// Missing keys deserialize as empty strings so that validation can report
/// which field is absent instead of a generic decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassRequest {
    /// Member name printed on the pass
    pub member_name: String,

    /// Session time, printed verbatim (e.g. "6:00 PM")
    pub session_time: String,

    /// Session date, printed verbatim (e.g. "2024-01-01")
    pub session_date: String,

    /// Value encoded in the barcode
    pub barcode_value: String,
}

impl PassRequest {
    pub fn new(
        member_name: impl Into<String>,
        session_time: impl Into<String>,
        session_date: impl Into<String>,
        barcode_value: impl Into<String>,
    ) -> Self {
        Self {
            member_name: member_name.into(),
            session_time: session_time.into(),
            session_date: session_date.into(),
            barcode_value: barcode_value.into(),
        }
    }

    /// Decode a request body. Does not validate field contents.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        serde_json::from_slice(body).map_err(|e| ValidationError::MalformedBody(e.to_string()))
    }

    /// Check that every field is present and non-blank.
    ///
    /// Fields are checked in wire order and the first failure is reported.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("memberName", &self.member_name),
            ("sessionTime", &self.session_time),
            ("sessionDate", &self.session_date),
            ("barcodeValue", &self.barcode_value),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField(name));
            }
        }

        Ok(())
    }
}
