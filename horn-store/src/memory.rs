use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

use horn_core::model::{InquiryData, InquiryRecord};
use horn_core::repository::{InquiryRepository, StoreError};

/// In-memory inquiry store with the same semantics as the file slot.
/// Used by tests and demos; nothing survives the process.
#[derive(Default)]
pub struct InMemoryInquiryStore {
    records: RwLock<Vec<InquiryRecord>>,
}

impl InMemoryInquiryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, given most recent first.
    pub fn with_records(records: Vec<InquiryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl InquiryRepository for InMemoryInquiryStore {
    async fn load(&self) -> Result<Vec<InquiryRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn save(&self, data: InquiryData) -> Result<InquiryRecord, StoreError> {
        let record = InquiryRecord::from_data(data);
        self.records.write().await.insert(0, record.clone());
        Ok(record)
    }

    async fn update(&self, record: InquiryRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or_else(|| StoreError::NotFound(record.id.clone()))?;
        *slot = record;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.records.write().await.retain(|record| record.id != id);
        Ok(())
    }

    async fn import_merge(&self, candidates: Vec<InquiryRecord>) -> Result<usize, StoreError> {
        let mut records = self.records.write().await;
        let existing_ids: HashSet<String> = records.iter().map(|r| r.id.clone()).collect();

        let fresh: Vec<InquiryRecord> = candidates
            .into_iter()
            .filter(|candidate| !existing_ids.contains(&candidate.id))
            .collect();
        let imported = fresh.len();
        for (offset, record) in fresh.into_iter().enumerate() {
            records.insert(offset, record);
        }
        Ok(imported)
    }
}
