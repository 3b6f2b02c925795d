use db::AttendanceRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Default)]
pub struct AttendanceRecordResponse {
    pub name: String,
    pub identifier: String,
    pub timestamp: String,
    pub origin: String,
}

impl From<AttendanceRecord> for AttendanceRecordResponse {
    fn from(r: AttendanceRecord) -> Self {
        Self {
            timestamp: r.formatted_timestamp(),
            name: r.name,
            identifier: r.identifier,
            origin: r.origin,
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct CurrentTokenResponse {
    pub token: String,
    pub issued_at: String,
    /// When the dashboard should fetch a fresh QR code.
    pub next_rotation_at: String,
    pub rotation_seconds: u64,
    /// URL to encode in the QR image.
    pub check_in_url: String,
}

#[derive(Debug, Serialize, Default)]
pub struct CheckTokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckTokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAttendanceReq {
    pub token: Option<String>,
    #[serde(default, alias = "student_name")]
    pub name: String,
    #[serde(default, alias = "student_mis", alias = "mis")]
    pub identifier: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordsListQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
    /// Case-insensitive match on name, identifier or origin.
    pub q: Option<String>,
    /// `timestamp` (oldest first) or `-timestamp` (newest first, default).
    pub sort: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct RecordsListResponse {
    pub records: Vec<AttendanceRecordResponse>,
    pub page: i32,
    pub per_page: i32,
    pub total: i32,
}
