use thiserror::Error;

/// Failures surfaced by an [`AttendanceStore`](crate::store::AttendanceStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Attendance store I/O error: {0}")]
    Io(#[from] std::io::Error),
}
