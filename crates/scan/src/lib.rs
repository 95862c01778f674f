//! Barcode scan intake.
//!
//! The actual symbol decoding happens in an external camera library (or a
//! USB scanner typing into a form). This crate models the piece that is
//! ours: the configuration handed to the decoder and the one-shot session
//! that turns its callbacks into at most one form submission per page load.

pub mod camera;
pub mod session;

pub use camera::{CameraConfig, CaptureCapability, FacingMode};
pub use session::{
    CodeResult, Detection, ScanError, ScanSession, ScanState, ScanSubmission, BARCODE_FIELD,
    SCAN_ENDPOINT,
};
