use async_trait::async_trait;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use horn_core::model::{InquiryData, InquiryRecord};
use horn_core::repository::{InquiryRepository, StoreError};

/// File-backed inquiry store: the whole database is one JSON array in a
/// single slot file, and every mutation is a full read-modify-write of
/// that slot. Acceptable because a travel agency's inquiry list stays
/// small; the mutex serializes writers within the process.
pub struct FileInquiryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileInquiryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_slot(&self) -> Result<Vec<InquiryRecord>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            // Nothing written yet: the database is empty.
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::Io(err)),
        };

        serde_json::from_str(&raw).map_err(|err| {
            tracing::error!(path = %self.path.display(), error = %err, "inquiry slot failed to parse");
            StoreError::Corrupted(err.to_string())
        })
    }

    /// Write through a sibling temp file and rename, so an interrupted
    /// write never leaves a truncated slot behind.
    async fn write_slot(&self, records: &[InquiryRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let encoded = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, encoded).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl InquiryRepository for FileInquiryStore {
    async fn load(&self) -> Result<Vec<InquiryRecord>, StoreError> {
        self.read_slot().await
    }

    async fn save(&self, data: InquiryData) -> Result<InquiryRecord, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_slot().await?;
        let record = InquiryRecord::from_data(data);
        records.insert(0, record.clone());
        self.write_slot(&records).await?;

        tracing::info!(reference = %record.id, total = records.len(), "inquiry saved");
        Ok(record)
    }

    async fn update(&self, record: InquiryRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_slot().await?;
        let slot = records
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or_else(|| StoreError::NotFound(record.id.clone()))?;
        *slot = record;
        self.write_slot(&records).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_slot().await?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            // Deleting an absent id is a no-op; skip the rewrite.
            return Ok(());
        }
        self.write_slot(&records).await
    }

    async fn import_merge(&self, candidates: Vec<InquiryRecord>) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;

        let existing = self.read_slot().await?;
        let existing_ids: HashSet<&str> = existing.iter().map(|r| r.id.as_str()).collect();

        let mut merged: Vec<InquiryRecord> = candidates
            .into_iter()
            .filter(|candidate| !existing_ids.contains(candidate.id.as_str()))
            .collect();
        let imported = merged.len();
        merged.extend(existing);
        self.write_slot(&merged).await?;

        tracing::info!(imported, total = merged.len(), "backup merged into inquiry slot");
        Ok(imported)
    }
}
