use async_trait::async_trait;

use crate::model::{InquiryData, InquiryRecord};

/// Repository trait for inquiry record access. Call sites never touch the
/// storage primitive directly; the file-backed store and the in-memory
/// store used in tests both implement this.
#[async_trait]
pub trait InquiryRepository: Send + Sync {
    /// Full list of stored records, most recent submission first.
    /// An absent slot is the empty list; a corrupt slot fails loud.
    async fn load(&self) -> Result<Vec<InquiryRecord>, StoreError>;

    /// Stamp the form data into a new record (generated reference,
    /// submission timestamp, status New), prepend it, and return it.
    async fn save(&self, data: InquiryData) -> Result<InquiryRecord, StoreError>;

    /// Replace the stored record with the same id.
    async fn update(&self, record: InquiryRecord) -> Result<(), StoreError>;

    /// Remove the record with the given id. Deleting an id that is not
    /// present is a no-op.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Merge imported records: candidates whose id already exists are
    /// dropped, never overwritten; the rest are prepended in candidate
    /// order. Returns how many records were actually merged.
    async fn import_merge(&self, candidates: Vec<InquiryRecord>) -> Result<usize, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The slot exists but does not parse as a record list. Surfaced
    /// rather than defaulted to empty: a silent default would rewrite the
    /// slot and destroy whatever the bytes used to be.
    #[error("Stored inquiry data is corrupted: {0}")]
    Corrupted(String),

    #[error("Inquiry not found: {0}")]
    NotFound(String),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
