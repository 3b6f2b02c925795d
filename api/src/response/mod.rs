use serde::Serialize;
use validator::ValidationErrors;

/// Envelope for every JSON body the API returns:
/// ```json
/// { "success": true, "data": { ... }, "message": "Attendance recorded" }
/// ```
///
/// On failure `data` is the payload type's `Default` and `message` carries the
/// text shown to the student or the dashboard user:
/// ```json
/// { "success": false, "data": {}, "message": "Submission time expired. Please rescan the QR code." }
/// ```
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Error response; `T` must implement `Default` since no payload is sent.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Joins every field error message from a failed `validate()` call.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}
