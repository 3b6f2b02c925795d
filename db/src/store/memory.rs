use super::AttendanceStore;
use crate::{error::StoreError, models::AttendanceRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

/// Volatile store backed by a vector. Duplicate checks are a linear scan.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<AttendanceRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<AttendanceRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn append(&self, record: &AttendanceRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn has_origin_attended_on(
        &self,
        origin: &str,
        day: NaiveDate,
    ) -> Result<bool, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .any(|r| r.day() == day && r.origin == origin))
    }

    async fn all(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }
}
