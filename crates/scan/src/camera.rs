//! Configuration contract for the external camera decoding library.

use serde::{Deserialize, Serialize};

use flipstock_inventory::Symbology;

/// Which camera the live stream should prefer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear camera; what you point at a clothing tag.
    Environment,
    /// Front camera.
    User,
}

impl FacingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }
}

/// Whether the environment exposes a live camera API at all.
///
/// Determined by the page before any decoder setup; when capture is
/// unsupported no initialization is ever attempted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CaptureCapability {
    Available,
    Unsupported,
}

/// The decoder configuration handed to the camera library: a live stream
/// bound to a viewport element, a facing-mode preference, and the enabled
/// symbology set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub viewport_selector: String,
    pub facing_mode: FacingMode,
    pub decoders: Vec<Symbology>,
}

impl CameraConfig {
    /// Rear-camera config covering the retail symbologies: EAN-13, EAN-8,
    /// UPC-A, UPC-E, and Code-128.
    pub fn default_rear() -> Self {
        Self {
            viewport_selector: "#viewport".to_string(),
            facing_mode: FacingMode::Environment,
            decoders: vec![
                Symbology::Ean13,
                Symbology::Ean8,
                Symbology::UpcA,
                Symbology::UpcE,
                Symbology::Code128,
            ],
        }
    }
}
