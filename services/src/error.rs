use db::StoreError;
use thiserror::Error;

/// Reasons a check-in submission is rejected. Each maps to a distinct
/// client-facing message; only the store variants indicate server trouble.
#[derive(Debug, Error)]
pub enum CheckInError {
    /// Token absent, stale or unknown. The student must rescan the QR code.
    #[error("Submission time expired. Please rescan the QR code.")]
    ExpiredToken,

    /// A required field was blank. The token is untouched and may be reused.
    #[error("{0}")]
    Validation(&'static str),

    /// The origin already has a record for today.
    #[error("Attendance has already been marked from this device/network for today.")]
    DuplicateSubmission,

    #[error("Failed to record attendance: {0}")]
    StoreWrite(StoreError),

    #[error("Failed to read attendance records: {0}")]
    StoreRead(StoreError),
}

impl CheckInError {
    /// True for failures caused by infrastructure rather than user input.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::StoreWrite(_) | Self::StoreRead(_))
    }
}
