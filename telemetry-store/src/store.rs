use crate::errors::Result;
use crate::model::{GpsRecord, NewGpsRecord};
use async_trait::async_trait;

/// Persistence seam for GPS records.
///
/// Implementations return records in insertion order and must be safe to
/// share across request handlers.
#[async_trait]
pub trait GpsStore: Send + Sync {
    /// Persists a reading and returns it with its assigned id and timestamp.
    async fn insert(&self, reading: NewGpsRecord) -> Result<GpsRecord>;

    /// Returns up to `limit` records after skipping `offset`.
    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<GpsRecord>>;

    async fn count(&self) -> Result<u64>;

    /// Removes every record, returning how many were removed.
    async fn delete_all(&self) -> Result<u64>;

    /// Releases underlying connections. Called once at shutdown.
    async fn close(&self) {}

    fn backend_name(&self) -> &'static str;
}
