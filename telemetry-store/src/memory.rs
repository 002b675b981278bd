use crate::errors::Result;
use crate::model::{GpsRecord, NewGpsRecord};
use crate::store::GpsStore;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

/// In-process store keeping records in insertion order.
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<GpsRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GpsStore for MemoryStore {
    async fn insert(&self, reading: NewGpsRecord) -> Result<GpsRecord> {
        let record = reading.into_record(Utc::now());
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<GpsRecord>> {
        let records = self.records.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(records.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut records = self.records.write().await;
        let removed = records.len() as u64;
        records.clear();
        Ok(removed)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn reading(latitude: f64) -> NewGpsRecord {
        NewGpsRecord {
            latitude,
            longitude: 100.5,
            altitude: 10.0,
            speed: 5.0,
            satellites: 8,
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let store = MemoryStore::new();
        let before = Utc::now();

        let a = assert_ok!(store.insert(reading(1.0)).await);
        let b = assert_ok!(store.insert(reading(2.0)).await);

        assert_ne!(a.id, b.id);
        assert!(a.timestamp >= before);
        assert_eq!(assert_ok!(store.count().await), 2);
    }

    #[tokio::test]
    async fn test_find_page_keeps_insertion_order() {
        let store = MemoryStore::new();
        for i in 1..=5 {
            store.insert(reading(i as f64)).await.unwrap();
        }

        let page = store.find_page(2, 2).await.unwrap();
        let lats: Vec<f64> = page.iter().map(|r| r.latitude).collect();
        assert_eq!(lats, vec![3.0, 4.0]);

        assert!(store.find_page(10, 2).await.unwrap().is_empty());
        assert_eq!(store.find_page(0, u64::MAX).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_delete_all_reports_removed_count() {
        let store = MemoryStore::new();
        store.insert(reading(1.0)).await.unwrap();
        store.insert(reading(2.0)).await.unwrap();

        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert_eq!(store.delete_all().await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
