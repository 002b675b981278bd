//! HTTP service that stores GPS telemetry readings and serves them back in
//! offset-based pages.

pub mod config;
pub mod db;
pub mod errors;
pub mod memory;
pub mod metrics;
pub mod model;
pub mod pagination;
pub mod rest;
pub mod store;
pub mod validate;

use config::{Config, StorageBackend};
use std::sync::Arc;
use store::GpsStore;

/// Opens the store selected by `config`.
pub async fn open_store(config: &Config) -> errors::Result<Arc<dyn GpsStore>> {
    match config.storage {
        StorageBackend::Postgres => {
            let store: Arc<dyn GpsStore> =
                Arc::new(db::PgStore::connect(&config.database_url).await?);
            Ok(store)
        }
        StorageBackend::Memory => {
            let store: Arc<dyn GpsStore> = Arc::new(memory::MemoryStore::new());
            Ok(store)
        }
    }
}
