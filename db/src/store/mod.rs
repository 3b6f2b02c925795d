//! Append-only attendance ledger.
//!
//! The check-in workflow only depends on [`AttendanceStore`]; the flat file
//! and in-memory backends are interchangeable behind it.

use crate::{error::StoreError, models::AttendanceRecord};
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Appends one record at the end of the ledger. Each record is written as a
    /// single indivisible unit; concurrent writers are serialized.
    async fn append(&self, record: &AttendanceRecord) -> Result<(), StoreError>;

    /// True iff a record from `origin` exists on `day`. An empty store is not an error.
    async fn has_origin_attended_on(&self, origin: &str, day: NaiveDate)
    -> Result<bool, StoreError>;

    /// Every record in storage (append) order.
    async fn all(&self) -> Result<Vec<AttendanceRecord>, StoreError>;
}
