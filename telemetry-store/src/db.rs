use crate::errors::Result;
use crate::model::{GpsRecord, NewGpsRecord};
use crate::store::GpsStore;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

const SELECT_COLUMNS: &str =
    "id, latitude, longitude, altitude, speed, satellites, ts AS timestamp";

pub async fn make_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;

    info!("Database connection established");
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations completed");

    Ok(pool)
}

/// Postgres-backed store over the `gps_records` table
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        Ok(Self::new(make_pool(database_url).await?))
    }
}

#[async_trait]
impl GpsStore for PgStore {
    async fn insert(&self, reading: NewGpsRecord) -> Result<GpsRecord> {
        let record = reading.into_record(Utc::now());

        let query = format!(
            "INSERT INTO gps_records (id, latitude, longitude, altitude, speed, satellites, ts)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            SELECT_COLUMNS
        );

        let stored = sqlx::query_as::<_, GpsRecord>(&query)
            .bind(record.id)
            .bind(record.latitude)
            .bind(record.longitude)
            .bind(record.altitude)
            .bind(record.speed)
            .bind(record.satellites)
            .bind(record.timestamp)
            .fetch_one(&self.pool)
            .await?;

        Ok(stored)
    }

    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<GpsRecord>> {
        let query = format!(
            "SELECT {} FROM gps_records ORDER BY seq ASC LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        );

        let records = sqlx::query_as::<_, GpsRecord>(&query)
            .bind(clamp_i64(limit))
            .bind(clamp_i64(offset))
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn count(&self) -> Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gps_records")
            .fetch_one(&self.pool)
            .await?;

        Ok(total.max(0) as u64)
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM gps_records")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn close(&self) {
        info!("Closing database pool");
        self.pool.close().await;
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

// Postgres LIMIT/OFFSET take a bigint
fn clamp_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Strips credentials from a database URL for logging.
pub fn redact_url(database_url: &str) -> &str {
    database_url.rsplit('@').next().unwrap_or("***")
}
