//! The check-in workflow: the only state-changing operation reachable from
//! untrusted input.
//!
//! Checks run in a fixed order: token, then input shape, then the duplicate
//! guard. The guard and the append share one critical section so two
//! concurrent submissions from the same origin cannot both be recorded.

use crate::{clock::truncate_to_seconds, error::CheckInError, token_rotator::TokenRotator};
use chrono::NaiveDateTime;
use db::{AttendanceRecord, AttendanceStore, StoreError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct SubmitAttendance {
    pub token: Option<String>,
    pub name: String,
    pub identifier: String,
    /// Network origin of the request (peer IP).
    pub origin: String,
}

pub struct CheckInService {
    rotator: Arc<TokenRotator>,
    store: Arc<dyn AttendanceStore>,
    submit_lock: Mutex<()>,
}

impl CheckInService {
    pub fn new(rotator: Arc<TokenRotator>, store: Arc<dyn AttendanceStore>) -> Self {
        Self {
            rotator,
            store,
            submit_lock: Mutex::new(()),
        }
    }

    pub fn rotator(&self) -> &Arc<TokenRotator> {
        &self.rotator
    }

    /// Landing-page pre-check: is this scanned token still accepted?
    pub fn check_token(&self, token: Option<&str>, now: NaiveDateTime) -> bool {
        self.rotator.is_valid(token, now)
    }

    pub async fn submit(
        &self,
        params: SubmitAttendance,
        now: NaiveDateTime,
    ) -> Result<AttendanceRecord, CheckInError> {
        if !self.rotator.is_valid(params.token.as_deref(), now) {
            debug!(origin = %params.origin, "Rejected check-in with expired token");
            return Err(CheckInError::ExpiredToken);
        }

        let name = params.name.trim();
        let identifier = params.identifier.trim();
        match (name.is_empty(), identifier.is_empty()) {
            (true, true) => return Err(CheckInError::Validation("Both Name and MIS are required.")),
            (true, false) => return Err(CheckInError::Validation("Name is required.")),
            (false, true) => return Err(CheckInError::Validation("MIS is required.")),
            (false, false) => {}
        }

        let timestamp = truncate_to_seconds(now);

        let _guard = self.submit_lock.lock().await;

        if self
            .store
            .has_origin_attended_on(&params.origin, timestamp.date())
            .await
            .map_err(CheckInError::StoreRead)?
        {
            info!(origin = %params.origin, identifier, "Duplicate check-in blocked");
            return Err(CheckInError::DuplicateSubmission);
        }

        let record = AttendanceRecord::new(name, identifier, timestamp, params.origin.as_str());
        self.store
            .append(&record)
            .await
            .map_err(CheckInError::StoreWrite)?;

        info!(
            origin = %record.origin,
            identifier = %record.identifier,
            at = %record.formatted_timestamp(),
            "Attendance recorded"
        );
        Ok(record)
    }

    /// Every record in storage order, for the dashboard.
    pub async fn records(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.store.all().await
    }
}
