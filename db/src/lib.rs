//! Attendance persistence: the record model, the store contract and its backends.

pub mod csv;
pub mod error;
pub mod models;
pub mod store;

pub use error::StoreError;
pub use models::AttendanceRecord;
pub use store::{AttendanceStore, FileStore, MemoryStore};
