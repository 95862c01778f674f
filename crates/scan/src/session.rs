//! One-shot scan session.
//!
//! State machine: `Idle -> Capturing -> Submitted`, with `Failed` terminal.
//! The first usable detection produces exactly one submission and stops the
//! session; every failure is terminal and surfaced to the page inline.
//! Nothing retries; reloading the page starts a fresh session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use flipstock_inventory::Barcode;

use crate::camera::{CameraConfig, CaptureCapability};

/// Endpoint the submission is POSTed to, form-encoded.
pub const SCAN_ENDPOINT: &str = "/scan";

/// Sole form field of a scan submission.
pub const BARCODE_FIELD: &str = "barcode";

/// Decoded-code payload nested inside a detection callback, as the camera
/// library delivers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeResult {
    pub code: String,
}

/// A detection event from the camera library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "codeResult")]
    pub code_result: CodeResult,
}

impl Detection {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code_result: CodeResult { code: code.into() },
        }
    }
}

/// Terminal scan failures, displayed in place of scan results.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The environment lacks the required camera API; initialization is
    /// never attempted.
    #[error("camera capture is not supported in this browser")]
    CaptureUnsupported,

    /// The decoding library reported an error during setup. The message is
    /// surfaced verbatim.
    #[error("scanner initialization failed: {0}")]
    CaptureInit(String),
}

/// The single form submission a session can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSubmission {
    pub barcode: Barcode,
}

impl ScanSubmission {
    pub fn endpoint(&self) -> &'static str {
        SCAN_ENDPOINT
    }

    /// Form-encoded body pairs: the sole `barcode` field.
    pub fn form_pairs(&self) -> [(&'static str, &str); 1] {
        [(BARCODE_FIELD, self.barcode.as_str())]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Capturing,
    Submitted,
    Failed(ScanError),
}

/// A single page-load's scan lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSession {
    config: CameraConfig,
    state: ScanState,
}

impl ScanSession {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            state: ScanState::Idle,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Begin capturing, if the environment supports it.
    ///
    /// Without camera capability the session fails immediately and no
    /// decoder initialization happens. Calling `start` again while already
    /// capturing (or after submission) is a no-op.
    pub fn start(&mut self, capability: CaptureCapability) -> Result<(), ScanError> {
        if let ScanState::Failed(err) = &self.state {
            return Err(err.clone());
        }
        if !matches!(self.state, ScanState::Idle) {
            return Ok(());
        }

        match capability {
            CaptureCapability::Available => {
                self.state = ScanState::Capturing;
                Ok(())
            }
            CaptureCapability::Unsupported => {
                let err = ScanError::CaptureUnsupported;
                self.state = ScanState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// The decoding library's initialization-error callback.
    ///
    /// Terminal for the session; the message is kept for inline display.
    pub fn init_failed(&mut self, message: impl Into<String>) {
        if matches!(self.state, ScanState::Capturing) {
            self.state = ScanState::Failed(ScanError::CaptureInit(message.into()));
        }
    }

    /// The decoding library's detection callback.
    ///
    /// The first detection whose code normalizes to a non-empty barcode
    /// yields the session's one submission and stops capture for good.
    /// Unusable codes are ignored and capture continues; detections outside
    /// `Capturing` yield nothing.
    pub fn detected(&mut self, detection: &Detection) -> Option<ScanSubmission> {
        if !matches!(self.state, ScanState::Capturing) {
            return None;
        }

        let barcode = Barcode::parse(&detection.code_result.code).ok()?;
        self.state = ScanState::Submitted;
        Some(ScanSubmission { barcode })
    }

    /// Inline error text for the page, when the session has failed.
    pub fn error_message(&self) -> Option<String> {
        match &self.state {
            ScanState::Failed(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capturing_session() -> ScanSession {
        let mut session = ScanSession::new(CameraConfig::default_rear());
        session.start(CaptureCapability::Available).unwrap();
        session
    }

    #[test]
    fn submits_exactly_once_per_session() {
        let mut session = capturing_session();

        let submission = session.detected(&Detection::new("012345678905")).unwrap();
        assert_eq!(submission.barcode.as_str(), "012345678905");
        assert_eq!(submission.endpoint(), "/scan");
        assert_eq!(submission.form_pairs(), [("barcode", "012345678905")]);
        assert_eq!(session.state(), &ScanState::Submitted);

        // Subsequent detections in the same session yield nothing.
        assert!(session.detected(&Detection::new("012345678905")).is_none());
        assert!(session.detected(&Detection::new("4002971024692")).is_none());
    }

    #[test]
    fn unusable_codes_do_not_consume_the_one_shot() {
        let mut session = capturing_session();

        assert!(session.detected(&Detection::new("   ")).is_none());
        assert_eq!(session.state(), &ScanState::Capturing);

        let submission = session.detected(&Detection::new("0123456789012")).unwrap();
        assert_eq!(submission.barcode.as_str(), "0123456789012");
    }

    #[test]
    fn detection_before_start_is_ignored() {
        let mut session = ScanSession::new(CameraConfig::default_rear());
        assert!(session.detected(&Detection::new("012345678905")).is_none());
        assert_eq!(session.state(), &ScanState::Idle);
    }

    #[test]
    fn unsupported_capture_fails_without_initialization() {
        let mut session = ScanSession::new(CameraConfig::default_rear());

        let err = session.start(CaptureCapability::Unsupported).unwrap_err();
        assert_eq!(err, ScanError::CaptureUnsupported);
        assert_eq!(
            session.error_message().unwrap(),
            "camera capture is not supported in this browser"
        );

        // Terminal: detections do nothing, restarting keeps the failure.
        assert!(session.detected(&Detection::new("012345678905")).is_none());
        assert!(session.start(CaptureCapability::Available).is_err());
    }

    #[test]
    fn init_error_is_terminal_and_surfaced_verbatim() {
        let mut session = capturing_session();
        session.init_failed("NotAllowedError: Permission denied");

        assert_eq!(
            session.error_message().unwrap(),
            "scanner initialization failed: NotAllowedError: Permission denied"
        );
        assert!(session.detected(&Detection::new("012345678905")).is_none());
    }

    #[test]
    fn detection_deserializes_from_library_payload() {
        let detection: Detection =
            serde_json::from_str(r#"{"codeResult":{"code":"012345678905"}}"#).unwrap();
        assert_eq!(detection.code_result.code, "012345678905");
    }

    #[test]
    fn normalizes_codes_before_submitting() {
        let mut session = capturing_session();
        let submission = session.detected(&Detection::new(" 4-002971-024692 ")).unwrap();
        assert_eq!(submission.barcode.as_str(), "4002971024692");
    }
}
