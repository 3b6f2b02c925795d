use super::AttendanceStore;
use crate::{
    csv::{self, HEADER},
    error::StoreError,
    models::AttendanceRecord,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
    sync::RwLock,
};
use tracing::{error, info, warn};

/// Origins seen per calendar day.
type OriginIndex = HashMap<NaiveDate, HashSet<String>>;

/// Flat CSV file store.
///
/// The duplicate-guard index is rebuilt from the file on [`FileStore::open`] and
/// updated under the same write lock that serializes appends, so it never
/// disagrees with what is on disk. A failed append is truncated back to the
/// previous file length: a row is either fully written or absent.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    index: RwLock<OriginIndex>,
    #[cfg(test)]
    fail_next_write: AtomicBool,
}

impl FileStore {
    /// Opens (creating with a header if needed) the attendance file at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let contents = match fs::read(&path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::write(&path, csv::encode_row(&HEADER)).await?;
                info!(path = %path.display(), "Created attendance file");
                String::new()
            }
            Err(e) => return Err(e.into()),
        };

        // A hand-edited file may lack its final newline; the next append must start a new row.
        if !contents.is_empty() && !contents.ends_with('\n') {
            let mut file = OpenOptions::new().append(true).open(&path).await?;
            file.write_all(b"\n").await?;
            file.flush().await?;
        }

        let records = decode(&path, &contents);
        let mut index = OriginIndex::new();
        for record in &records {
            index
                .entry(record.day())
                .or_default()
                .insert(record.origin.clone());
        }

        info!(
            path = %path.display(),
            records = records.len(),
            "Opened attendance store"
        );

        Ok(Self {
            path,
            index: RwLock::new(index),
            #[cfg(test)]
            fail_next_write: AtomicBool::new(false),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_row(&self, file: &mut File, line: &[u8]) -> io::Result<()> {
        // Tests tear the next write halfway to exercise the rollback.
        #[cfg(test)]
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            file.write_all(&line[..line.len() / 2]).await?;
            file.flush().await?;
            return Err(io::Error::other("torn write"));
        }

        file.write_all(line).await?;
        file.flush().await?;
        file.sync_data().await
    }
}

fn decode(path: &Path, contents: &str) -> Vec<AttendanceRecord> {
    let (records, skipped) = csv::decode_records(contents);
    if skipped > 0 {
        warn!(
            path = %path.display(),
            skipped,
            "Skipped malformed attendance rows"
        );
    }
    records
}

#[async_trait]
impl AttendanceStore for FileStore {
    async fn append(&self, record: &AttendanceRecord) -> Result<(), StoreError> {
        let line = csv::encode_record(record);

        let mut index = self.index.write().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let original_len = file.metadata().await?.len();

        if let Err(e) = self.write_row(&mut file, line.as_bytes()).await {
            if let Err(truncate_err) = file.set_len(original_len).await {
                error!(
                    path = %self.path.display(),
                    error = %truncate_err,
                    "Failed to roll back partial attendance row"
                );
            } else {
                warn!(path = %self.path.display(), error = %e, "Rolled back failed append");
            }
            return Err(e.into());
        }

        index
            .entry(record.day())
            .or_default()
            .insert(record.origin.clone());
        Ok(())
    }

    async fn has_origin_attended_on(
        &self,
        origin: &str,
        day: NaiveDate,
    ) -> Result<bool, StoreError> {
        Ok(self
            .index
            .read()
            .await
            .get(&day)
            .is_some_and(|origins| origins.contains(origin)))
    }

    async fn all(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        let _guard = self.index.read().await;
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(decode(&self.path, &String::from_utf8_lossy(&bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}
