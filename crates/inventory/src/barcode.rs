//! Normalized decoded barcodes and the symbologies that produce them.

use serde::{Deserialize, Serialize};

use flipstock_core::{DomainError, DomainResult, ValueObject};

/// Maximum stored barcode length.
pub const MAX_BARCODE_LEN: usize = 64;

/// A decoded product code (UPC/EAN/Code-128 payload), normalized.
///
/// Normalization matches what USB scanners and the camera decoder emit in
/// practice: surrounding whitespace and any non-alphanumeric characters
/// (check-digit separators, stray newlines from keyboard-wedge scanners)
/// are stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Barcode(String);

impl Barcode {
    /// Normalize and validate a raw decoded string.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        if normalized.is_empty() {
            return Err(DomainError::validation("barcode cannot be empty"));
        }
        if normalized.len() > MAX_BARCODE_LEN {
            return Err(DomainError::validation(format!(
                "barcode longer than {MAX_BARCODE_LEN} characters"
            )));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl ValueObject for Barcode {}

impl core::fmt::Display for Barcode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Barcode symbologies the camera decoder is configured for and the label
/// planner can emit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbology {
    #[serde(rename = "ean-13")]
    Ean13,
    #[serde(rename = "ean-8")]
    Ean8,
    #[serde(rename = "upc-a")]
    UpcA,
    #[serde(rename = "upc-e")]
    UpcE,
    #[serde(rename = "code-128")]
    Code128,
}

impl Symbology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbology::Ean13 => "ean-13",
            Symbology::Ean8 => "ean-8",
            Symbology::UpcA => "upc-a",
            Symbology::UpcE => "upc-e",
            Symbology::Code128 => "code-128",
        }
    }
}

impl core::fmt::Display for Symbology {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
